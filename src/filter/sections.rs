use std::sync::OnceLock;

use regex::Regex;

use super::rewrite::{PathRewriteTable, fix_absolute_path_in_line};

/// Section whose content is purely informational and always discarded.
pub const NOTICE_SECTION: &str = "com.apple.actool.compilation-results";

fn section_header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^/\* ([^ ]*) \*/$").expect("invalid section header regex"))
}

/// Return the section name when `line` is a `/* name */` header.
pub fn parse_section_header(line: &str) -> Option<&str> {
    section_header_pattern()
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|name| name.as_str())
}

/// Where the filter stands relative to the most recent section header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionState<'a> {
    /// Before any header, or after a header with an empty name.
    Unsectioned,
    /// Inside the notice section.
    Discarding,
    /// Inside a reported section whose header has not been written yet.
    AwaitingFirstContent(&'a str),
    /// Inside a reported section whose header has already been written.
    Emitting(&'a str),
}

impl<'a> SectionState<'a> {
    fn entering(name: &'a str) -> Self {
        if name.is_empty() {
            Self::Unsectioned
        } else if name == NOTICE_SECTION {
            Self::Discarding
        } else {
            Self::AwaitingFirstContent(name)
        }
    }
}

/// Filter the merged stdout/stderr of `actool`.
///
/// The output is made of sections, each introduced by a `/* name */` line. Anything before the
/// first header is noise and gets dropped, as does the whole notice section. Every other
/// section is kept with its lines path-corrected, and its header is written only once a
/// content line shows up, so empty sections vanish. An empty result means the compilation
/// succeeded.
pub fn filter_compiler_output(output: &str, table: &PathRewriteTable) -> String {
    let mut filtered = String::new();
    let mut state = SectionState::Unsectioned;

    for line in split_lines(output) {
        if let Some(name) = parse_section_header(line) {
            state = SectionState::entering(name);
            continue;
        }

        match state {
            SectionState::Unsectioned | SectionState::Discarding => {}
            SectionState::AwaitingFirstContent(name) => {
                push_line(&mut filtered, &format!("/* {name} */"));
                push_line(&mut filtered, &fix_absolute_path_in_line(line, table));
                state = SectionState::Emitting(name);
            }
            SectionState::Emitting(_) => {
                push_line(&mut filtered, &fix_absolute_path_in_line(line, table));
            }
        }
    }

    filtered
}

/// Path-correct every line of `output` without any section filtering.
///
/// Used when `actool` exits with a failure status, where nothing may be hidden from the user.
pub fn rewrite_all_lines(output: &str, table: &PathRewriteTable) -> String {
    let mut rewritten = String::with_capacity(output.len());
    for line in split_lines(output) {
        push_line(&mut rewritten, &fix_absolute_path_in_line(line, table));
    }
    rewritten
}

/// Split on `\n`, `\r\n` and lone `\r`, the separators `actool` mixes into its output.
fn split_lines(output: &str) -> impl Iterator<Item = &str> {
    output.split_inclusive('\n').flat_map(|chunk| {
        let chunk = chunk.strip_suffix('\n').unwrap_or(chunk);
        let chunk = chunk.strip_suffix('\r').unwrap_or(chunk);
        chunk.split('\r')
    })
}

fn push_line(buffer: &mut String, line: &str) {
    buffer.push_str(line);
    buffer.push('\n');
}
