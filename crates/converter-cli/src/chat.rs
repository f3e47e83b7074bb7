//! Interactive session: statements in, conversions out, history kept.

use std::io::{self, Write};

use colored::Colorize;
use converter_core::ConversionHistory;
use converter_pipeline::Pipeline;

use crate::render;

#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Statement(String),
    ShowHistory,
    Quit,
    Pending,
}

/// Collects lines until a statement is complete.
///
/// A statement ends with a `;` at the end of a line or with a blank line.
/// Commands (`:history`, `:quit`) are only recognised on an empty buffer.
#[derive(Debug, Default)]
pub struct StatementBuffer {
    lines: Vec<String>,
}

impl StatementBuffer {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push_line(&mut self, line: &str) -> Input {
        let trimmed = line.trim();

        if self.lines.is_empty() {
            match trimmed {
                ":history" => return Input::ShowHistory,
                ":quit" | "quit" | "exit" => return Input::Quit,
                "" => return Input::Pending,
                _ => {}
            }
        }

        if trimmed.is_empty() {
            return self.take();
        }

        self.lines.push(line.trim_end().to_string());
        if trimmed.ends_with(';') {
            return self.take();
        }
        Input::Pending
    }

    /// Flush whatever is buffered, e.g. at end of input.
    pub fn take(&mut self) -> Input {
        if self.lines.is_empty() {
            return Input::Pending;
        }
        let statement = self.lines.join("\n");
        self.lines.clear();
        Input::Statement(statement)
    }
}

pub async fn run_interactive(
    pipeline: &Pipeline,
    history: &ConversionHistory,
) -> anyhow::Result<()> {
    println!(
        "{}",
        "End a statement with ';' or a blank line. ':history' lists conversions, ':quit' exits."
            .dimmed()
    );
    println!();

    let mut buffer = StatementBuffer::default();

    loop {
        let prompt = if buffer.is_empty() { "SQL>" } else { "  ->" };
        print!("{} ", prompt.cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        let input = if io::stdin().read_line(&mut line)? == 0 {
            match buffer.take() {
                Input::Pending => Input::Quit,
                statement => statement,
            }
        } else {
            buffer.push_line(&line)
        };

        match input {
            Input::Pending => continue,
            Input::Quit => {
                println!("{}", "👋 Goodbye!".cyan());
                break;
            }
            Input::ShowHistory => render::print_history(&history.entries()),
            Input::Statement(sql) => {
                let outcome = pipeline.convert(&sql).await;
                let entry = history.record(sql, &outcome);
                render::print_entry(&entry, true);
                println!();
            }
        }
    }

    Ok(())
}
