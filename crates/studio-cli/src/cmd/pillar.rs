use crate::cmd::open_store;
use crate::output::{print_json, print_table};
use clap::Subcommand;
use studio_core::content::{self, Pillar};
use std::path::Path;

#[derive(Subcommand)]
pub enum PillarSubcommand {
    /// List pillars with content counts
    List,
    /// Create a pillar
    Create {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Rename a pillar
    Rename {
        id: String,
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Delete a pillar and everything in it
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: PillarSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        PillarSubcommand::List => list(root, json),
        PillarSubcommand::Create { name } => create(root, &name.join(" "), json),
        PillarSubcommand::Rename { id, name } => rename(root, &id, &name.join(" "), json),
        PillarSubcommand::Delete { id } => delete(root, &id, json),
    }
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let pillars: Vec<Pillar> = open_store(root)?.load()?;

    if json {
        print_json(&pillars)?;
        return Ok(());
    }
    if pillars.is_empty() {
        println!("No pillars. Create one with: studio pillar create <name>");
        return Ok(());
    }
    let rows = pillars
        .iter()
        .map(|p| vec![p.id.clone(), p.name.clone(), p.content.len().to_string()])
        .collect();
    print_table(&["ID", "NAME", "CONTENT"], rows);
    Ok(())
}

fn create(root: &Path, name: &str, json: bool) -> anyhow::Result<()> {
    let id = open_store(root)?.update::<Vec<Pillar>, _, _>(|p| content::create_pillar(p, name))?;

    if json {
        print_json(&serde_json::json!({ "id": id, "name": name }))?;
    } else {
        println!("Created pillar [{id}]: {name}");
    }
    Ok(())
}

fn rename(root: &Path, id: &str, name: &str, json: bool) -> anyhow::Result<()> {
    open_store(root)?.update::<Vec<Pillar>, _, _>(|p| content::rename_pillar(p, id, name))?;

    if json {
        print_json(&serde_json::json!({ "id": id, "name": name }))?;
    } else {
        println!("Renamed pillar [{id}] to {name}");
    }
    Ok(())
}

fn delete(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let removed =
        open_store(root)?.update::<Vec<Pillar>, _, _>(|p| content::delete_pillar(p, id))?;

    if json {
        print_json(&removed)?;
    } else {
        println!(
            "Deleted pillar [{id}] {} ({} content items)",
            removed.name,
            removed.content.len()
        );
    }
    Ok(())
}
