//! Implementation of `cdematch tags`.

use std::process::ExitCode;

use cdematch_tags::extract_phrases;
use serde::Serialize;

use crate::cli::{
    args::TagsCommand,
    context::CommandContext,
    output::{dim, print_json, subheader},
};

/// JSON output for `cdematch tags`.
#[derive(Serialize)]
struct JsonTags<'a> {
    /// The question text.
    text: &'a str,
    /// Extracted tags in canonical order.
    tags: Vec<&'a str>,
    /// Phrase tags with the rule that produced each.
    phrases: Vec<JsonPhrase<'a>>,
}

/// A phrase tag and its rule.
#[derive(Serialize)]
struct JsonPhrase<'a> {
    /// Producing rule name.
    rule: &'a str,
    /// The phrase tag.
    phrase: String,
}

/// Prints the tags extracted from question text.
pub fn run(ctx: &CommandContext, cmd: &TagsCommand) -> ExitCode {
    let text = cmd.text.join(" ");
    let extractor = ctx.extractor();
    let tags = extractor.extract(&text);

    let phrases: Vec<JsonPhrase<'_>> = extract_phrases(&text.to_lowercase())
        .into_iter()
        .filter(|m| tags.contains(&m.phrase))
        .map(|m| JsonPhrase {
            rule: m.rule,
            phrase: m.phrase,
        })
        .collect();

    if cmd.json {
        return print_json(&JsonTags {
            text: &text,
            tags: tags.iter().map(String::as_str).collect(),
            phrases,
        });
    }

    if tags.is_empty() {
        println!("{}", dim("No tags extracted."));
        return ExitCode::SUCCESS;
    }

    for tag in &tags {
        println!("{tag}");
    }

    if !phrases.is_empty() {
        println!();
        println!("{}", subheader("Phrase tags:"));
        for p in &phrases {
            println!("  {} {}", p.phrase, dim(&format!("({})", p.rule)));
        }
    }

    ExitCode::SUCCESS
}
