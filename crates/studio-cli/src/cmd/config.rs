use crate::output::print_json;
use anyhow::Context;
use clap::Subcommand;
use studio_core::config::{Config, Secrets, WarnLevel};
use std::path::Path;

#[derive(Subcommand)]
pub enum ConfigSubcommand {
    /// Check config and credentials
    Validate,
    /// Print the effective config
    Show,
}

pub fn run(root: &Path, subcmd: ConfigSubcommand, json: bool) -> anyhow::Result<()> {
    let config = Config::load(root).context("failed to load config")?;
    match subcmd {
        ConfigSubcommand::Validate => validate(&config, json),
        ConfigSubcommand::Show => show(&config, json),
    }
}

fn validate(config: &Config, json: bool) -> anyhow::Result<()> {
    let warnings = config.validate(&Secrets::from_env());
    let errors = warnings
        .iter()
        .filter(|w| w.level == WarnLevel::Error)
        .count();

    if json {
        print_json(&serde_json::json!({ "ok": errors == 0, "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Config OK.");
    } else {
        for w in &warnings {
            let tag = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{tag}] {}", w.message);
        }
    }

    if errors > 0 {
        anyhow::bail!("config has {errors} error(s)");
    }
    Ok(())
}

fn show(config: &Config, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(config);
    }
    println!("project: {}", config.project);
    println!("port:    {}", config.port);
    println!("anthropic:");
    println!("  model:      {}", config.anthropic.model);
    println!("  max_tokens: {}", config.anthropic.max_tokens);
    println!("  api_base:   {}", config.anthropic.api_base);
    println!("stripe:");
    println!("  api_base:   {}", config.stripe.api_base);
    println!("  portal_return_url: {}", config.stripe.portal_return_url);
    println!("capture:");
    println!("  timeout_secs: {}", config.capture.timeout_secs);
    Ok(())
}
