use crate::cmd::open_store;
use crate::output::{clip, print_json, print_table};
use anyhow::Context;
use clap::Subcommand;
use studio_core::calendar::{self, Calendar};
use studio_core::content::{self, ContentBlob, ContentItem, ContentPatch, Pillar};
use studio_core::types::ContentStatus;
use std::path::Path;

#[derive(Subcommand)]
pub enum ContentSubcommand {
    /// List content in a pillar
    List { pillar: String },
    /// Add a content item to a pillar
    Add {
        pillar: String,
        #[arg(required = true)]
        title: Vec<String>,
        #[arg(long)]
        description: Option<String>,
        /// Format, e.g. reel, carousel, story
        #[arg(long)]
        format: Option<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Platform (repeatable)
        #[arg(long = "platform")]
        platforms: Vec<String>,
        /// Opening hook, stored with the item's drafting notes
        #[arg(long)]
        hook: Option<String>,
    },
    /// Show one content item including drafting notes
    Show { pillar: String, id: String },
    /// Edit fields of a content item
    Edit {
        pillar: String,
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        format: Option<String>,
        /// idea, draft, ready, scheduled or published
        #[arg(long)]
        status: Option<ContentStatus>,
        #[arg(long)]
        script: Option<String>,
        #[arg(long)]
        caption: Option<String>,
    },
    /// Remove a content item
    Remove { pillar: String, id: String },
    /// Move a content item to another pillar
    Move {
        pillar: String,
        id: String,
        #[arg(long)]
        to: String,
    },
    /// Put a content item on the calendar's ready-to-schedule list
    Send { pillar: String, id: String },
}

pub fn run(root: &Path, subcmd: ContentSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        ContentSubcommand::List { pillar } => list(root, &pillar, json),
        ContentSubcommand::Add {
            pillar,
            title,
            description,
            format,
            tags,
            platforms,
            hook,
        } => {
            let mut item = ContentItem::new(title.join(" "));
            item.description = description.unwrap_or_default();
            item.format = format.unwrap_or_default();
            item.tags = tags;
            item.platforms = platforms;
            if hook.is_some() {
                item.set_blob(&ContentBlob {
                    hook,
                    ..Default::default()
                })?;
            }
            add(root, &pillar, item, json)
        }
        ContentSubcommand::Show { pillar, id } => show(root, &pillar, &id, json),
        ContentSubcommand::Edit {
            pillar,
            id,
            title,
            description,
            format,
            status,
            script,
            caption,
        } => {
            let patch = ContentPatch {
                title,
                description,
                format,
                status,
                ..Default::default()
            };
            edit(root, &pillar, &id, patch, script, caption, json)
        }
        ContentSubcommand::Remove { pillar, id } => remove(root, &pillar, &id, json),
        ContentSubcommand::Move { pillar, id, to } => move_to(root, &pillar, &id, &to, json),
        ContentSubcommand::Send { pillar, id } => send(root, &pillar, &id, json),
    }
}

fn list(root: &Path, pillar_id: &str, json: bool) -> anyhow::Result<()> {
    let pillars: Vec<Pillar> = open_store(root)?.load()?;
    let pillar = pillars
        .iter()
        .find(|p| p.id == pillar_id)
        .with_context(|| format!("pillar '{pillar_id}' not found"))?;

    if json {
        print_json(&pillar.content)?;
        return Ok(());
    }
    if pillar.content.is_empty() {
        println!("No content in {}.", pillar.name);
        return Ok(());
    }
    let rows = pillar
        .content
        .iter()
        .map(|c| {
            vec![
                c.id.clone(),
                clip(&c.title, 40),
                c.format.clone(),
                c.status.to_string(),
                c.scheduled_date.map(|d| d.to_string()).unwrap_or_default(),
            ]
        })
        .collect();
    print_table(&["ID", "TITLE", "FORMAT", "STATUS", "DATE"], rows);
    Ok(())
}

fn add(root: &Path, pillar_id: &str, item: ContentItem, json: bool) -> anyhow::Result<()> {
    let title = item.title.clone();
    let id = open_store(root)?
        .update::<Vec<Pillar>, _, _>(|p| content::add_content(p, pillar_id, item))?;

    if json {
        print_json(&serde_json::json!({ "pillar_id": pillar_id, "id": id, "title": title }))?;
    } else {
        println!("Added content [{id}]: {title}");
    }
    Ok(())
}

fn show(root: &Path, pillar_id: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let pillars: Vec<Pillar> = open_store(root)?.load()?;
    let item = content::find_content(&pillars, pillar_id, id)?;
    let blob = item.blob();

    if json {
        print_json(&serde_json::json!({ "item": item, "notes": blob }))?;
        return Ok(());
    }
    println!("{} [{}]", item.title, item.id);
    println!("  status:    {}", item.status);
    if !item.format.is_empty() {
        println!("  format:    {}", item.format);
    }
    if !item.platforms.is_empty() {
        println!("  platforms: {}", item.platforms.join(", "));
    }
    if !item.tags.is_empty() {
        println!("  tags:      {}", item.tags.join(", "));
    }
    if let Some(date) = item.scheduled_date {
        println!("  date:      {date}");
    }
    if !item.description.is_empty() {
        println!("\n{}", item.description);
    }
    for (label, value) in [
        ("Hook", &blob.hook),
        ("Script", &blob.script),
        ("Caption", &blob.caption),
        ("Notes", &blob.notes),
        ("Source", &blob.source_url),
    ] {
        if let Some(v) = value {
            println!("\n{label}:\n{v}");
        }
    }
    Ok(())
}

fn edit(
    root: &Path,
    pillar_id: &str,
    id: &str,
    mut patch: ContentPatch,
    script: Option<String>,
    caption: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let item = open_store(root)?.update::<Vec<Pillar>, _, _>(|pillars| {
        if script.is_some() || caption.is_some() {
            let mut blob = content::find_content(pillars, pillar_id, id)?.blob();
            if script.is_some() {
                blob.script = script;
            }
            if caption.is_some() {
                blob.caption = caption;
            }
            patch.url = Some(serde_json::to_string(&blob)?);
        }
        content::update_content(pillars, pillar_id, id, patch)
    })?;

    if json {
        print_json(&item)?;
    } else {
        println!("Updated content [{id}]");
    }
    Ok(())
}

fn remove(root: &Path, pillar_id: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let item = open_store(root)?
        .update::<Vec<Pillar>, _, _>(|p| content::remove_content(p, pillar_id, id))?;

    if json {
        print_json(&item)?;
    } else {
        println!("Removed content [{id}]: {}", item.title);
    }
    Ok(())
}

fn move_to(root: &Path, from: &str, id: &str, to: &str, json: bool) -> anyhow::Result<()> {
    open_store(root)?.update::<Vec<Pillar>, _, _>(|p| content::move_content(p, from, to, id))?;

    if json {
        print_json(&serde_json::json!({ "id": id, "from": from, "to": to }))?;
    } else {
        println!("Moved content [{id}] to pillar [{to}]");
    }
    Ok(())
}

fn send(root: &Path, pillar_id: &str, id: &str, json: bool) -> anyhow::Result<()> {
    let store = open_store(root)?;
    let pillars: Vec<Pillar> = store.load()?;
    store.update::<Calendar, _, _>(|cal| calendar::send_to_calendar(&pillars, cal, pillar_id, id))?;

    if json {
        print_json(&serde_json::json!({ "id": id, "state": "ready" }))?;
    } else {
        println!("Content [{id}] is ready to schedule");
    }
    Ok(())
}
