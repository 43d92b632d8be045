//! Configuration templates for `cdematch init`.
//!
//! The templates are valid TOML listing every setting with its default. `init` writes them
//! commented out, so a fresh file changes nothing until the user opts in. The one exception
//! is a corpus path given to `init`, which is written as a live `[corpus] path`.

use toml::Value;

/// Project template (valid TOML).
const LOCAL_TEMPLATE: &str = include_str!("../templates/config.toml");

/// Global template (valid TOML). It has no `[corpus]` section.
const GLOBAL_TEMPLATE: &str = include_str!("../templates/config-global.toml");

/// Returns the project template, with `corpus` written as the live corpus path if given.
pub fn local_template(corpus: Option<&str>) -> String {
    render(LOCAL_TEMPLATE, corpus)
}

/// Returns the global template with every setting commented out.
pub fn global_template() -> String {
    render(GLOBAL_TEMPLATE, None)
}

/// Comments out every setting in `template` except the corpus path, when one is given.
///
/// Existing comments and blank lines pass through unchanged.
fn render(template: &str, corpus: Option<&str>) -> String {
    let mut out = String::with_capacity(template.len() + 256);
    let mut section = "";
    for line in template.lines() {
        if let Some(name) = section_name(line) {
            section = name;
        }

        match corpus {
            Some(path) if section == "corpus" && is_key(line, "path") => {
                out.push_str("path = ");
                out.push_str(&Value::from(path).to_string());
            }
            Some(_) if section == "corpus" && section_name(line).is_some() => out.push_str(line),
            _ if line.is_empty() || line.starts_with('#') => out.push_str(line),
            _ => {
                out.push_str("# ");
                out.push_str(line);
            }
        }
        out.push('\n');
    }
    out
}

/// Returns the table name if `line` is a table header.
fn section_name(line: &str) -> Option<&str> {
    line.strip_prefix('[')?.strip_suffix(']')
}

/// Returns true if `line` assigns `key`.
fn is_key(line: &str, key: &str) -> bool {
    line.split_once('=')
        .is_some_and(|(lhs, _)| lhs.trim() == key)
}
