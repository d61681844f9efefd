use crate::cmd::open_store;
use crate::output::{clip, print_json, print_table};
use anyhow::Context;
use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use studio_core::calendar::{self, Calendar};
use studio_core::content::ContentItem;
use std::path::Path;

#[derive(Subcommand)]
pub enum CalendarSubcommand {
    /// Show ready-to-schedule and scheduled content
    Show,
    /// Show one month of scheduled content (YYYY-MM, default: this month)
    Month { month: Option<String> },
    /// Schedule an item on a day (YYYY-MM-DD); reschedules if already dated
    Schedule { id: String, date: String },
    /// Return an item to the ready-to-schedule list
    Unschedule { id: String },
    /// Take an item off the calendar
    Remove { id: String },
    /// List scheduled items whose day has passed
    Overdue {
        /// Reference day (default: today)
        #[arg(long)]
        today: Option<String>,
    },
}

pub fn run(root: &Path, subcmd: CalendarSubcommand, json: bool) -> anyhow::Result<()> {
    match subcmd {
        CalendarSubcommand::Show => show(root, json),
        CalendarSubcommand::Month { month } => month_view(root, month.as_deref(), json),
        CalendarSubcommand::Schedule { id, date } => schedule(root, &id, &date, json),
        CalendarSubcommand::Unschedule { id } => unschedule(root, &id, json),
        CalendarSubcommand::Remove { id } => remove(root, &id, json),
        CalendarSubcommand::Overdue { today } => overdue(root, today.as_deref(), json),
    }
}

fn item_rows(items: &[&ContentItem]) -> Vec<Vec<String>> {
    items
        .iter()
        .map(|c| {
            vec![
                c.scheduled_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
                c.id.clone(),
                clip(&c.title, 40),
                c.format.clone(),
            ]
        })
        .collect()
}

fn show(root: &Path, json: bool) -> anyhow::Result<()> {
    let cal: Calendar = open_store(root)?.load()?;

    if json {
        print_json(&cal)?;
        return Ok(());
    }
    let ready = cal.ready();
    let scheduled = cal.scheduled();
    println!("Ready to schedule ({})", ready.len());
    if !ready.is_empty() {
        print_table(&["DATE", "ID", "TITLE", "FORMAT"], item_rows(&ready));
    }
    println!("\nScheduled ({})", scheduled.len());
    if !scheduled.is_empty() {
        print_table(&["DATE", "ID", "TITLE", "FORMAT"], item_rows(&scheduled));
    }
    Ok(())
}

fn parse_month(s: Option<&str>) -> anyhow::Result<(i32, u32)> {
    let Some(s) = s else {
        let today = chrono::Local::now().date_naive();
        return Ok((today.year(), today.month()));
    };
    let first = NaiveDate::parse_from_str(&format!("{s}-01"), "%Y-%m-%d")
        .with_context(|| format!("invalid month '{s}': expected YYYY-MM"))?;
    Ok((first.year(), first.month()))
}

fn month_view(root: &Path, month: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (year, month) = parse_month(month)?;
    let cal: Calendar = open_store(root)?.load()?;
    let days = cal.month(year, month)?;

    if json {
        print_json(&days)?;
        return Ok(());
    }
    if days.is_empty() {
        println!("Nothing scheduled in {year}-{month:02}.");
        return Ok(());
    }
    for (day, items) in &days {
        println!("{} {}", day.format("%a %d"), day);
        for item in items {
            println!("    [{}] {}", item.id, item.title);
        }
    }
    Ok(())
}

fn schedule(root: &Path, id: &str, date: &str, json: bool) -> anyhow::Result<()> {
    let date = calendar::parse_day(date)?;
    let item = open_store(root)?
        .update::<Calendar, _, _>(|cal| cal.schedule(id, date).cloned())?;

    if json {
        print_json(&item)?;
    } else {
        println!("Scheduled [{id}] {} on {date}", item.title);
    }
    Ok(())
}

fn unschedule(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let item = open_store(root)?.update::<Calendar, _, _>(|cal| cal.unschedule(id).cloned())?;

    if json {
        print_json(&item)?;
    } else {
        println!("Unscheduled [{id}] {}", item.title);
    }
    Ok(())
}

fn remove(root: &Path, id: &str, json: bool) -> anyhow::Result<()> {
    let item = open_store(root)?.update::<Calendar, _, _>(|cal| cal.remove(id))?;

    if json {
        print_json(&item)?;
    } else {
        println!("Removed [{id}] {} from the calendar", item.title);
    }
    Ok(())
}

fn overdue(root: &Path, today: Option<&str>, json: bool) -> anyhow::Result<()> {
    let today = match today {
        Some(day) => calendar::parse_day(day)?,
        None => chrono::Local::now().date_naive(),
    };
    let cal: Calendar = open_store(root)?.load()?;
    let items = cal.overdue(today);

    if json {
        print_json(&items)?;
    } else if items.is_empty() {
        println!("Nothing overdue.");
    } else {
        print_table(&["DATE", "ID", "TITLE", "FORMAT"], item_rows(&items));
    }
    Ok(())
}
