use crate::output::print_json;
use anyhow::Context;
use studio_core::{paths, Store};
use std::path::Path;

pub fn run(root: &Path, json: bool) -> anyhow::Result<()> {
    let project = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "studio".to_string());

    let store = Store::new(root);
    let existed = paths::config_path(root).exists();
    store
        .init(&project)
        .with_context(|| format!("failed to initialize {}", root.display()))?;

    if json {
        print_json(&serde_json::json!({
            "root": root.display().to_string(),
            "project": project,
            "created_config": !existed,
        }))?;
    } else {
        println!("Initialized studio in: {}", root.display());
        if existed {
            println!("  exists:  {}", paths::CONFIG_FILE);
        } else {
            println!("  created: {}", paths::CONFIG_FILE);
        }
        println!("  storage: {}", paths::STORAGE_DIR);
    }
    Ok(())
}
