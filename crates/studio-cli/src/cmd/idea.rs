use crate::cmd::open_store;
use crate::output::{clip, print_json, print_table};
use clap::Subcommand;
use studio_core::ideas::{IdeaTable, MAX_PINNED};
use std::path::Path;

#[derive(Subcommand)]
pub enum IdeaSubcommand {
    /// Show the ideation table
    Show,
    /// Add a custom column
    AddColumn {
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Rename a column
    RenameColumn {
        id: String,
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Delete a column and its cells
    DeleteColumn { id: String },
    /// Append an empty row
    AddRow,
    /// Delete a row
    DeleteRow { id: String },
    /// Set a cell; no text clears it
    Set {
        row: String,
        column: String,
        text: Vec<String>,
    },
    /// Pin a row
    Pin { row: String },
    /// Unpin a row
    Unpin { row: String },
}

pub fn run(root: &Path, subcmd: IdeaSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        IdeaSubcommand::Show => show(root, json),
        IdeaSubcommand::AddColumn { name } => {
            let name = name.join(" ");
            let id = open_store(root)?.update::<IdeaTable, _, _>(|t| t.add_column(&name))?;
            report(json, serde_json::json!({ "id": id, "name": name }), || {
                format!("Added column [{id}]: {name}")
            })
        }
        IdeaSubcommand::RenameColumn { id, name } => {
            let name = name.join(" ");
            open_store(root)?.update::<IdeaTable, _, _>(|t| t.rename_column(&id, &name))?;
            report(json, serde_json::json!({ "id": id, "name": name }), || {
                format!("Renamed column [{id}] to {name}")
            })
        }
        IdeaSubcommand::DeleteColumn { id } => {
            let column = open_store(root)?.update::<IdeaTable, _, _>(|t| t.delete_column(&id))?;
            report(json, serde_json::to_value(&column)?, || {
                format!("Deleted column [{id}] {}", column.name)
            })
        }
        IdeaSubcommand::AddRow => {
            let id = open_store(root)?.update::<IdeaTable, _, _>(|t| Ok(t.add_row()))?;
            report(json, serde_json::json!({ "id": id }), || format!("Added row [{id}]"))
        }
        IdeaSubcommand::DeleteRow { id } => {
            let row = open_store(root)?.update::<IdeaTable, _, _>(|t| t.delete_row(&id))?;
            report(json, serde_json::to_value(&row)?, || format!("Deleted row [{id}]"))
        }
        IdeaSubcommand::Set { row, column, text } => {
            let text = text.join(" ");
            open_store(root)?
                .update::<IdeaTable, _, _>(|t| t.set_cell(&row, &column, text.clone()))?;
            report(
                json,
                serde_json::json!({ "row": row, "column": column, "text": text }),
                || format!("Set [{row}].{column}"),
            )
        }
        IdeaSubcommand::Pin { row } => {
            let pinned = open_store(root)?.update::<IdeaTable, _, _>(|t| {
                t.pin(&row)?;
                Ok(t.pinned.len())
            })?;
            report(json, serde_json::json!({ "row": row, "pinned": true }), || {
                format!("Pinned row [{row}] ({pinned}/{MAX_PINNED})")
            })
        }
        IdeaSubcommand::Unpin { row } => {
            let was_pinned = open_store(root)?.update::<IdeaTable, _, _>(|t| Ok(t.unpin(&row)))?;
            report(json, serde_json::json!({ "row": row, "pinned": false }), || {
                if was_pinned {
                    format!("Unpinned row [{row}]")
                } else {
                    format!("Row [{row}] was not pinned")
                }
            })
        }
    }
}

fn report(
    json: bool,
    value: serde_json::Value,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        print_json(&value)
    } else {
        println!("{}", text());
        Ok(())
    }
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let table: IdeaTable = open_store(root)?.load()?;

    if json {
        print_json(&table)?;
        return Ok(());
    }
    let mut headers = vec!["ROW", "PIN"];
    headers.extend(table.columns.iter().map(|c| c.name.as_str()));
    let rows = table
        .rows
        .iter()
        .map(|r| {
            let pinned = table.pinned.iter().any(|p| p == &r.id);
            let mut row = vec![r.id.clone(), if pinned { "*" } else { "" }.to_string()];
            row.extend(
                table
                    .columns
                    .iter()
                    .map(|c| clip(r.cells.get(&c.id).map(String::as_str).unwrap_or(""), 24)),
            );
            row
        })
        .collect();
    print_table(&headers, rows);

    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("{}={}", c.id, c.name))
        .collect();
    println!("\nColumns: {}", columns.join(", "));
    Ok(())
}
