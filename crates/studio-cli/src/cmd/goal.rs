use crate::cmd::open_store;
use crate::output::{clip, print_json, print_table};
use clap::Subcommand;
use studio_core::goal::{self, Goal};
use studio_core::types::GoalStatus;
use std::path::Path;

#[derive(Subcommand)]
pub enum GoalSubcommand {
    /// Add a goal
    Add {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List goals with overall progress
    List,
    /// Set a goal's status: not-started, in-progress or completed
    Status { id: String, status: GoalStatus },
    /// Link a goal to another goal
    Link { id: String, target: String },
    /// Remove a goal's link
    Unlink { id: String },
    /// Delete a goal
    Delete { id: String },
}

pub fn run(root: &Path, subcmd: GoalSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        GoalSubcommand::Add { text } => add(root, &text.join(" "), json),
        GoalSubcommand::List => list(root, json),
        GoalSubcommand::Status { id, status } => {
            mutate(root, json, |g| goal::set_status(g, &id, status))?;
            if !json {
                println!("Goal [{id}] is {status}");
            }
            Ok(())
        }
        GoalSubcommand::Link { id, target } => {
            mutate(root, json, |g| goal::link(g, &id, &target))?;
            if !json {
                println!("Linked goal [{id}] to [{target}]");
            }
            Ok(())
        }
        GoalSubcommand::Unlink { id } => {
            mutate(root, json, |g| goal::unlink(g, &id))?;
            if !json {
                println!("Unlinked goal [{id}]");
            }
            Ok(())
        }
        GoalSubcommand::Delete { id } => {
            mutate(root, json, |g| goal::delete_goal(g, &id).map(|_| ()))?;
            if !json {
                println!("Deleted goal [{id}]");
            }
            Ok(())
        }
    }
}

/// Apply a change and, in JSON mode, print the resulting goal list.
fn mutate<F>(root: &Path, json: bool, f: F) -> anyhow::Result<()>
where
    F: FnOnce(&mut Vec<Goal>) -> studio_core::Result<()>,
{
    let goals = open_store(root)?.update::<Vec<Goal>, _, _>(|goals| {
        f(goals)?;
        Ok(goals.clone())
    })?;
    if json {
        print_json(&serde_json::json!({ "goals": goals, "progress": goal::progress(&goals) }))?;
    }
    Ok(())
}

fn add(root: &Path, text: &str, json: bool) -> anyhow::Result<()> {
    let id = open_store(root)?.update::<Vec<Goal>, _, _>(|g| goal::add_goal(g, text))?;

    if json {
        print_json(&serde_json::json!({ "id": id, "text": text.trim() }))?;
    } else {
        println!("Added goal [{id}]: {}", text.trim());
    }
    Ok(())
}

fn list(root: &Path, json: bool) -> anyhow::Result<()> {
    let goals: Vec<Goal> = open_store(root)?.load()?;
    let progress = goal::progress(&goals);

    if json {
        print_json(&serde_json::json!({ "goals": goals, "progress": progress }))?;
        return Ok(());
    }
    if goals.is_empty() {
        println!("No goals.");
        return Ok(());
    }
    let rows = goals
        .iter()
        .map(|g| {
            vec![
                g.id.clone(),
                clip(&g.text, 48),
                g.status.to_string(),
                g.linked_goal_id.clone().unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "GOAL", "STATUS", "LINKED"], rows);
    println!("\nProgress: {:.0}%", progress * 100.0);
    Ok(())
}
