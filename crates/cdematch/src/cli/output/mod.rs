//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use cdematch_index::ScoredMatch;
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL_CONDENSED};
use serde::Serialize;

/// ANSI escape codes.
mod colors {
    /// Reset all attributes.
    pub const RESET: &str = "\x1b[0m";
    /// Bold text.
    pub const BOLD: &str = "\x1b[1m";
    /// Dimmed text.
    pub const DIM: &str = "\x1b[2m";
    /// Cyan foreground.
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow foreground.
    pub const YELLOW: &str = "\x1b[33m";
}

/// Formats text as a section header (bold cyan).
pub fn header(text: &str) -> String {
    format!("{}{}{}{}", colors::BOLD, colors::CYAN, text, colors::RESET)
}

/// Formats text as a subheader (bold).
pub fn subheader(text: &str) -> String {
    format!("{}{}{}", colors::BOLD, text, colors::RESET)
}

/// Formats text as dimmed/less important.
pub fn dim(text: &str) -> String {
    format!("{}{}{}", colors::DIM, text, colors::RESET)
}

/// Formats text as a warning (yellow).
pub fn warning(text: &str) -> String {
    format!("{}{}{}", colors::YELLOW, text, colors::RESET)
}

/// Prints a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Strips the storage prefix from a document id for display.
pub fn display_id(id: &str) -> &str {
    id.strip_prefix("question:").unwrap_or(id)
}

/// Joins tags for a table cell.
fn join_tags<'a>(tags: impl IntoIterator<Item = &'a String>) -> String {
    tags.into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds a table of ranked matches.
pub fn match_table(matches: &[ScoredMatch], show_tags: bool) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);

    if show_tags {
        table.set_header(vec!["#", "Score", "ID", "Question", "Tags"]);
    } else {
        table.set_header(vec!["#", "Score", "ID", "Question"]);
    }

    for (rank, m) in matches.iter().enumerate() {
        let mut row = vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", m.score)).set_alignment(CellAlignment::Right),
            Cell::new(display_id(&m.document_id)),
            Cell::new(&m.question_text),
        ];
        if show_tags {
            row.push(Cell::new(join_tags(&m.tags)));
        }
        table.add_row(row);
    }
    table
}

/// Builds a two-column table of tag frequencies.
pub fn frequency_table(entries: &[(&str, u32)]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Tag", "Documents"]);
    for (tag, count) in entries {
        table.add_row(vec![
            Cell::new(tag),
            Cell::new(count).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// A scored match as rendered in JSON output.
#[derive(Serialize)]
pub struct JsonMatch<'a> {
    /// One-based rank.
    pub rank: usize,
    /// Document id with any storage prefix removed.
    pub id: &'a str,
    /// Matched question text.
    pub question: &'a str,
    /// Matched document's tags.
    pub tags: Vec<&'a str>,
    /// Rarity-weighted overlap score.
    pub score: f32,
}

/// Converts ranked matches for JSON output.
pub fn json_matches(matches: &[ScoredMatch]) -> Vec<JsonMatch<'_>> {
    matches
        .iter()
        .enumerate()
        .map(|(i, m)| JsonMatch {
            rank: i + 1,
            id: display_id(&m.document_id),
            question: &m.question_text,
            tags: m.tags.iter().map(String::as_str).collect(),
            score: m.score,
        })
        .collect()
}
