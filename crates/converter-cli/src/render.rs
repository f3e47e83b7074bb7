use colored::Colorize;
use converter_core::{HistoryEntry, STRUCTURED_FORM_KEY};

pub fn print_entry(entry: &HistoryEntry, show_ast: bool) {
    if !entry.succeeded() {
        println!("{}", format!("❌ {}", entry.result()).red());
        return;
    }

    println!("{}", entry.result().green());

    if show_ast {
        if let Some(tree) = entry.artifacts().get(STRUCTURED_FORM_KEY) {
            println!("{}", "─".repeat(50).dimmed());
            println!("{}", "Syntax tree:".cyan());
            let pretty = serde_json::to_string_pretty(tree).unwrap_or_else(|_| tree.to_string());
            println!("{}", pretty.dimmed());
        }
    }
}

pub fn print_history(entries: &[std::sync::Arc<HistoryEntry>]) {
    if entries.is_empty() {
        println!("{}", "No conversions yet".dimmed());
        return;
    }

    for (index, entry) in entries.iter().enumerate() {
        let marker = if entry.succeeded() { "✅" } else { "❌" };
        println!(
            "{} {} {}",
            format!("#{}", index + 1).cyan().bold(),
            marker,
            entry.recorded_at().format("%H:%M:%S").to_string().dimmed()
        );
        println!("{}", entry.request().yellow());
        if entry.succeeded() {
            println!("{}", entry.result().green());
        } else {
            println!("{}", entry.result().red());
        }
        println!();
    }
}
