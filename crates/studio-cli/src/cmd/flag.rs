use crate::cmd::open_store;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use studio_core::flags::FeatureFlags;
use std::path::Path;

#[derive(Subcommand)]
pub enum FlagSubcommand {
    /// List stored feature flags
    List,
    /// Turn a feature on
    Enable { name: String },
    /// Turn a feature off
    Disable { name: String },
}

pub fn run(root: &Path, subcmd: FlagSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        FlagSubcommand::List => {
            let flags: FeatureFlags = open_store(root)?.load()?;
            if json {
                print_json(&flags)?;
            } else if flags.iter().next().is_none() {
                println!("No flags set. Unknown flags are off.");
            } else {
                let rows = flags
                    .iter()
                    .map(|(name, on)| vec![name.to_string(), if on { "on" } else { "off" }.into()])
                    .collect();
                print_table(&["FLAG", "STATE"], rows);
            }
            Ok(())
        }
        FlagSubcommand::Enable { name } => set(root, &name, true, json),
        FlagSubcommand::Disable { name } => set(root, &name, false, json),
    }
}

fn set(root: &Path, name: &str, enabled: bool, json: bool) -> anyhow::Result<()> {
    open_store(root)?.update::<FeatureFlags, _, _>(|flags| {
        if enabled {
            flags.enable(name);
        } else {
            flags.disable(name);
        }
        Ok(())
    })?;

    if json {
        print_json(&serde_json::json!({ "name": name, "enabled": enabled }))?;
    } else {
        println!("{name}: {}", if enabled { "on" } else { "off" });
    }
    Ok(())
}
