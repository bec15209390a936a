//! Suppression directives and generated-file filtering.
//!
//! Directives ride along in the SSA export as per-file comment lists,
//! so the filter never touches source files itself. A finding is
//! silenced by a comment on the flagged line or the line directly
//! above; whole files are silenced by a directive within the first ten
//! lines or by looking machine-generated.

use crate::ir::{Comment, FileComments, Unit};
use std::collections::{HashMap, HashSet};

/// Directive token that targets this tool specifically.
pub const LINT_DIRECTIVE: &str = "nolint:spannercheck";

/// Directive token that silences every tool.
pub const LINT_DIRECTIVE_ALL: &str = "nolint:all";

/// Bare token, honored only when the comment names no tool at all.
const LINT_TOKEN: &str = "nolint";

/// A file-wide directive must appear within this many leading lines.
const FILE_DIRECTIVE_MAX_LINE: usize = 10;

/// File name suffixes that mark generated code.
const GENERATED_SUFFIXES: [&str; 3] = [".yo.go", ".pb.go", "_gen.go"];

/// Substring that marks generated code anywhere in the path.
const GENERATED_MARKER: &str = "generated";

/// Per-unit suppression filter.
pub struct SuppressionFilter<'a> {
    /// Comments keyed by file path.
    comments: HashMap<&'a str, &'a [Comment]>,

    /// Files with a directive in their first ten lines.
    suppressed_files: HashSet<&'a str>,

    /// Extra generated-code markers from configuration.
    extra_markers: &'a [String],
}

impl<'a> SuppressionFilter<'a> {
    pub fn new(unit: &'a Unit, extra_markers: &'a [String]) -> Self {
        let mut comments = HashMap::new();
        let mut suppressed_files = HashSet::new();

        for file in &unit.files {
            comments.insert(file.path.as_str(), file.comments.as_slice());
            if has_file_directive(file) {
                suppressed_files.insert(file.path.as_str());
            }
        }

        Self {
            comments,
            suppressed_files,
            extra_markers,
        }
    }

    /// Whether the file should be skipped entirely, either because it
    /// looks generated or because it carries a file-wide directive.
    pub fn should_skip_file(&self, path: &str) -> bool {
        self.is_generated(path) || self.suppressed_files.contains(path)
    }

    /// Whether a finding at `line` in `file` is silenced by a directive
    /// on the same line or the line directly above. Two or more lines of
    /// separation never suppress.
    pub fn is_line_suppressed(&self, file: &str, line: usize) -> bool {
        let Some(comments) = self.comments.get(file) else {
            return false;
        };

        comments
            .iter()
            .filter(|c| c.line == line || c.line + 1 == line)
            .any(|c| matches_directive(&c.text))
    }

    fn is_generated(&self, path: &str) -> bool {
        if GENERATED_SUFFIXES.iter().any(|s| path.ends_with(s)) {
            return true;
        }
        if path.contains(GENERATED_MARKER) {
            return true;
        }
        self.extra_markers.iter().any(|m| path.contains(m.as_str()))
    }
}

/// Line-level directives match the targeted token, the all-tools token,
/// or a bare token in a comment that contains no colon at all. A colon
/// means the author targeted some tool, so a non-matching tool list
/// must not silence this one.
fn matches_directive(text: &str) -> bool {
    text.contains(LINT_DIRECTIVE)
        || text.contains(LINT_DIRECTIVE_ALL)
        || (text.contains(LINT_TOKEN) && !text.contains(':'))
}

/// File-wide suppression accepts only the explicit tokens. A bare
/// `nolint` near the top of a file is too ambiguous to wipe out every
/// finding in it.
fn has_file_directive(file: &FileComments) -> bool {
    file.comments
        .iter()
        .filter(|c| c.line <= FILE_DIRECTIVE_MAX_LINE)
        .any(|c| text_has_explicit_token(&c.text))
}

fn text_has_explicit_token(text: &str) -> bool {
    text.contains(LINT_DIRECTIVE) || text.contains(LINT_DIRECTIVE_ALL)
}
