//! Implementation of `cdematch crf`.
//!
//! Walks a directory of case report form (CRF) JSON files and matches the label of every
//! form element against the corpus. One frequency index is shared by the whole batch and
//! refreshed only when it goes stale.

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use cdematch_index::{CorpusError, CorpusReader, Matcher, ScoredMatch, SharedIndex};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::cli::{
    args::CrfCommand,
    context::CommandContext,
    output::{JsonMatch, dim, header, json_matches, match_table, print_json, subheader},
};

/// A case report form as exported by the NIH CDE repository.
#[derive(Debug, Deserialize)]
struct Crf {
    /// Names given to the form; the last one is the current name.
    #[serde(default)]
    designations: Vec<Designation>,
    /// Questions on the form.
    #[serde(default, rename = "formElements")]
    form_elements: Vec<FormElement>,
}

impl Crf {
    /// Returns the form's current name.
    fn name(&self) -> &str {
        self.designations
            .last()
            .map_or("", |d| d.designation.as_str())
    }
}

/// One name of a form.
#[derive(Debug, Deserialize)]
struct Designation {
    /// The name.
    #[serde(default)]
    designation: String,
}

/// One question on a form.
#[derive(Debug, Deserialize)]
struct FormElement {
    /// Question text.
    #[serde(default)]
    label: String,
}

/// Why a CRF file was skipped.
#[derive(Debug, Error)]
enum CrfFileError {
    /// The file could not be read.
    #[error("failed to read file: {0}")]
    Read(#[from] io::Error),
    /// The file is not a CRF export.
    #[error("not a CRF document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Matches for one form element.
#[derive(Debug)]
struct ElementMatches {
    /// Question text.
    question: String,
    /// Ranked matches.
    matches: Vec<ScoredMatch>,
}

/// Matches for every element of one form file.
#[derive(Debug)]
struct FormMatches {
    /// Path to the CRF file.
    path: PathBuf,
    /// Form name.
    form: String,
    /// Per-element matches, in form order.
    elements: Vec<ElementMatches>,
}

/// JSON output for one form element.
#[derive(Serialize)]
struct JsonElement<'a> {
    /// Question text.
    question: &'a str,
    /// Ranked matches.
    matches: Vec<JsonMatch<'a>>,
}

/// JSON output for one form file.
#[derive(Serialize)]
struct JsonForm<'a> {
    /// Path to the CRF file.
    file: String,
    /// Form name.
    form: &'a str,
    /// Per-element matches.
    elements: Vec<JsonElement<'a>>,
}

/// JSON output for `cdematch crf`.
#[derive(Serialize)]
struct JsonCrfOutput<'a> {
    /// Forms processed.
    forms: Vec<JsonForm<'a>>,
    /// Total form elements matched.
    total_elements: usize,
    /// Files skipped because they could not be read or parsed.
    skipped_files: usize,
}

/// Matches every form element in a directory of CRF files.
pub fn run(ctx: &CommandContext, cmd: &CrfCommand) -> ExitCode {
    let dir = ctx.cwd.join(&cmd.dir);
    if !dir.is_dir() {
        eprintln!("error: not a directory: {}", dir.display());
        return ExitCode::FAILURE;
    }

    let corpus = match ctx.open_corpus(&cmd.corpus) {
        Ok(corpus) => corpus,
        Err(code) => return code,
    };
    let shared = match ctx.shared_index(&corpus, &cmd.corpus) {
        Ok(shared) => shared,
        Err(code) => return code,
    };
    let matcher = ctx.matcher(&cmd.params);

    let mut forms = Vec::new();
    let mut skipped = 0usize;
    for path in crf_files(&dir) {
        let crf = match read_crf(&path) {
            Ok(crf) => crf,
            Err(e) => {
                eprintln!("warning: skipping {}: {e}", path.display());
                skipped += 1;
                continue;
            }
        };
        match match_form(&matcher, &corpus, &shared, &path, &crf) {
            Ok(form) => forms.push(form),
            Err(e) => {
                eprintln!("error: failed to match {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        }
    }

    let total_elements: usize = forms.iter().map(|f| f.elements.len()).sum();
    info!(
        files = forms.len(),
        elements = total_elements,
        skipped,
        "matched CRF directory"
    );

    if cmd.json {
        return print_json(&JsonCrfOutput {
            forms: forms.iter().map(to_json).collect(),
            total_elements,
            skipped_files: skipped,
        });
    }

    print_forms(&forms, cmd.params.show_tags);
    println!(
        "{}",
        dim(&format!(
            "Matched {total_elements} elements in {} files.",
            forms.len()
        ))
    );
    ExitCode::SUCCESS
}

/// Lists `.json` files under `dir`, sorted by path.
fn crf_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("error reading directory entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.to_lowercase().ends_with(".json"))
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

/// Reads and decodes one CRF file.
fn read_crf(path: &Path) -> Result<Crf, CrfFileError> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

/// Matches every element of one form, refreshing the shared index first if it is stale.
fn match_form<C: CorpusReader>(
    matcher: &Matcher,
    corpus: &C,
    shared: &SharedIndex,
    path: &Path,
    crf: &Crf,
) -> Result<FormMatches, CorpusError> {
    shared.refresh_if_stale(corpus)?;
    let index = shared.snapshot();

    debug!(path = %path.display(), elements = crf.form_elements.len(), "matching form");
    let mut elements = Vec::with_capacity(crf.form_elements.len());
    for element in &crf.form_elements {
        let matches = matcher.find_matches(&element.label, corpus, index.as_ref())?;
        elements.push(ElementMatches {
            question: element.label.clone(),
            matches,
        });
    }

    Ok(FormMatches {
        path: path.to_path_buf(),
        form: crf.name().to_string(),
        elements,
    })
}

/// Converts one form's matches for JSON output.
fn to_json(form: &FormMatches) -> JsonForm<'_> {
    JsonForm {
        file: form.path.display().to_string(),
        form: &form.form,
        elements: form
            .elements
            .iter()
            .map(|e| JsonElement {
                question: &e.question,
                matches: json_matches(&e.matches),
            })
            .collect(),
    }
}

/// Prints each form and its element matches.
fn print_forms(forms: &[FormMatches], show_tags: bool) {
    for form in forms {
        let title = if form.form.is_empty() {
            form.path.display().to_string()
        } else {
            format!("{} ({})", form.form, form.path.display())
        };
        println!("{}", header(&title));
        println!();

        for element in &form.elements {
            println!("{}", subheader(&element.question));
            if element.matches.is_empty() {
                println!("  {}", dim("no matches"));
            } else {
                println!("{}", match_table(&element.matches, show_tags));
            }
            println!();
        }
    }
}
