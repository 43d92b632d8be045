//! Implementation of `cdematch match`.

use std::process::ExitCode;

use serde::Serialize;

use crate::cli::{
    args::MatchCommand,
    context::CommandContext,
    output::{JsonMatch, dim, json_matches, match_table, print_json, subheader},
};

/// JSON output for `cdematch match`.
#[derive(Serialize)]
struct JsonMatchOutput<'a> {
    /// The question as given.
    query: &'a str,
    /// Tags extracted from the question.
    tags: Vec<&'a str>,
    /// Ranked matches.
    matches: Vec<JsonMatch<'a>>,
}

/// Ranks catalogued questions against one question.
pub fn run(ctx: &CommandContext, cmd: &MatchCommand) -> ExitCode {
    let corpus = match ctx.open_corpus(&cmd.corpus) {
        Ok(corpus) => corpus,
        Err(code) => return code,
    };
    let index = match ctx.build_index(&corpus, &cmd.corpus) {
        Ok(index) => index,
        Err(code) => return code,
    };

    let matcher = ctx.matcher(&cmd.params);
    let query = matcher.query(&cmd.query.join(" "));
    let matches = match matcher.rank(&query, &corpus, &index) {
        Ok(matches) => matches,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if cmd.json {
        return print_json(&JsonMatchOutput {
            query: &query.raw_text,
            tags: query.tags.iter().map(String::as_str).collect(),
            matches: json_matches(&matches),
        });
    }

    let tags: Vec<&str> = query.tags.iter().map(String::as_str).collect();
    println!("{} {}", subheader("Tags:"), tags.join(", "));
    println!();

    if query.tags.is_empty() {
        println!("{}", dim("No tags extracted; nothing to match."));
    } else if matches.is_empty() {
        println!("{}", dim("No matches found."));
    } else {
        println!("{}", match_table(&matches, cmd.params.show_tags));
    }

    ExitCode::SUCCESS
}
