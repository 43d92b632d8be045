//! Implementation of `cdematch index`.

use std::process::ExitCode;

use cdematch_index::{FrequencyIndex, TagFrequencies};
use serde::Serialize;

use crate::cli::{
    args::IndexCommand,
    context::CommandContext,
    output::{dim, frequency_table, header, print_json, subheader},
};

/// A tag and its document frequency.
#[derive(Serialize)]
struct JsonTagCount<'a> {
    /// The tag.
    tag: &'a str,
    /// Number of documents carrying it.
    documents: u32,
}

/// JSON output for `cdematch index`.
#[derive(Serialize)]
struct JsonIndexSummary<'a> {
    /// Partition the scan was scoped to.
    partition: Option<&'a str>,
    /// Tagged documents scanned.
    documents: usize,
    /// Distinct tags indexed.
    tags: usize,
    /// Smallest document frequency.
    min_frequency: Option<u32>,
    /// Largest document frequency.
    max_frequency: Option<u32>,
    /// Least frequent tags.
    rarest: Vec<JsonTagCount<'a>>,
    /// Most frequent tags.
    most_common: Vec<JsonTagCount<'a>>,
}

/// Converts `(tag, count)` pairs for JSON output.
fn to_json(entries: Vec<(&str, u32)>) -> Vec<JsonTagCount<'_>> {
    entries
        .into_iter()
        .map(|(tag, documents)| JsonTagCount { tag, documents })
        .collect()
}

/// Builds the frequency index and prints a summary.
pub fn run(ctx: &CommandContext, cmd: &IndexCommand) -> ExitCode {
    let corpus = match ctx.open_corpus(&cmd.corpus) {
        Ok(corpus) => corpus,
        Err(code) => return code,
    };
    let index = match ctx.build_index(&corpus, &cmd.corpus) {
        Ok(index) => index,
        Err(code) => return code,
    };

    if cmd.json {
        let range = index.frequency_range();
        return print_json(&JsonIndexSummary {
            partition: index.partition(),
            documents: index.documents(),
            tags: index.len(),
            min_frequency: range.map(|(lo, _)| lo),
            max_frequency: range.map(|(_, hi)| hi),
            rarest: to_json(index.rarest(cmd.top)),
            most_common: to_json(index.most_common(cmd.top)),
        });
    }

    print_summary(&index, cmd.top);
    ExitCode::SUCCESS
}

/// Prints a human-readable index summary.
fn print_summary(index: &FrequencyIndex, top: usize) {
    println!("{}", header("Frequency index"));
    println!();
    if let Some(partition) = index.partition() {
        println!("Partition: {partition}");
    }
    println!("Documents: {}", index.documents());
    println!("Tags:      {}", index.len());

    let Some((lo, hi)) = index.frequency_range() else {
        println!();
        println!("{}", dim("The corpus has no tagged documents."));
        return;
    };
    println!("Frequency: {lo}..={hi}");
    if lo == hi {
        println!("{}", dim("All tags are equally frequent; every shared tag weighs 1.0."));
    }

    if top == 0 {
        return;
    }
    println!();
    println!("{}", subheader("Rarest tags:"));
    println!("{}", frequency_table(&index.rarest(top)));
    println!();
    println!("{}", subheader("Most common tags:"));
    println!("{}", frequency_table(&index.most_common(top)));
}
