use chrono::{DateTime, Local};
use colored::*;

use crate::core::item::{Category, Chart, Item};
use crate::core::orchestrator::Status;

const TITLE_WIDTH: usize = 24;
const BAR_WIDTH: usize = 20;

/// "[######--------------] 30%"
pub fn usage_bar(chart: &Chart) -> String {
    let percent = chart.percent_used().clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * BAR_WIDTH as f32).round() as usize;
    format!(
        "[{}{}] {:.0}%",
        "#".repeat(filled),
        "-".repeat(BAR_WIDTH - filled),
        percent
    )
}

/// Plain, uncolored rendering of one item line
pub fn item_line(item: &Item) -> String {
    let value = match item.display_subtitle() {
        Some(text) if !text.trim().is_empty() => text.into_owned(),
        _ => "Not found".to_string(),
    };
    format!("{:<width$} {}", item.title, value, width = TITLE_WIDTH)
}

pub fn print_section_header(title: &str) {
    println!("\n{}", title.bold().green());
    println!("{}", "-".repeat(title.len()));
}

fn print_item(item: &Item) {
    let title = format!("  {:<width$}", item.title, width = TITLE_WIDTH);

    if let Some(reason) = item.unavailable_reason() {
        println!("{} {}", title.bright_black(), reason.message().yellow().dimmed());
        return;
    }

    match item.subtitle() {
        Some(text) if !text.trim().is_empty() => println!("{} {}", title, text.cyan()),
        _ => println!("{} {}", title, "Not found".bright_black()),
    }

    if let Some(chart) = item.chart() {
        let bar = usage_bar(chart);
        let colored_bar = if chart.percent_used() >= 90.0 {
            bar.red()
        } else {
            bar.green()
        };
        println!("  {:<width$} {}", "", colored_bar, width = TITLE_WIDTH);
    }
}

/// Items grouped under one header per category, keeping their order
pub fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("{}", "No matching items.".yellow());
        return;
    }

    for category in Category::ALL {
        let mut section = items.iter().filter(|i| i.category == category).peekable();
        if section.peek().is_none() {
            continue;
        }
        print_section_header(&category.to_string());
        for item in section {
            print_item(item);
        }
    }
    println!();
}

pub fn format_status(status: Status) -> ColoredString {
    match status {
        Status::Idle => "idle".dimmed(),
        Status::Loading => "loading".yellow(),
        Status::Succeeded => "ready".green(),
    }
}

/// Banner printed before each refresh of a live view
pub fn print_refresh_banner(count: usize, status: Status) {
    let now: DateTime<Local> = Local::now();
    println!(
        "{} {} item(s), {}",
        format!("[{}]", now.format("%H:%M:%S")).dimmed(),
        count.to_string().bold(),
        format_status(status)
    );
}
