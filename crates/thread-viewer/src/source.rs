//! Extraction of the `(depth, comment)` sequence from a text page
//!
//! A page lists one comment per line in reading order. Nesting is encoded
//! purely visually, as leading spaces: `indent_width` spaces per level.
//! Blank lines are ignored.

use std::fmt;
use std::path::Path;

use anyhow::{bail, Context, Result};
use log::debug;
use thread_tree::tree::Depth;

/// One comment as read from a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    /// 1-based line number in the source page
    pub line: usize,
    /// Comment text with indentation stripped
    pub text: String,
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Parse page text into the pre-order `(depth, comment)` sequence
///
/// Indentation that is not a whole number of levels, or that contains
/// tabs, is rejected rather than guessed at.
pub fn parse_page(text: &str, indent_width: usize) -> Result<Vec<(Depth, Comment)>> {
    if indent_width == 0 {
        bail!("indent width must be at least 1");
    }

    let mut sequence = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = index + 1;
        if raw.trim().is_empty() {
            continue;
        }

        let body = raw.trim_start_matches(' ');
        if body.starts_with('\t') {
            bail!("line {}: tabs are not allowed in indentation", line);
        }

        let columns = raw.len() - body.len();
        if columns % indent_width != 0 {
            bail!(
                "line {}: indentation of {} spaces is not a multiple of {}",
                line,
                columns,
                indent_width
            );
        }
        let depth = Depth::try_from(columns / indent_width)
            .with_context(|| format!("line {}: nesting too deep", line))?;

        sequence.push((
            depth,
            Comment {
                line,
                text: body.trim_end().to_string(),
            },
        ));
    }
    Ok(sequence)
}

/// Read and parse one page file
pub fn load_page(path: &Path, indent_width: usize) -> Result<Vec<(Depth, Comment)>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read page: {}", path.display()))?;
    let sequence = parse_page(&text, indent_width)
        .with_context(|| format!("Failed to parse page: {}", path.display()))?;
    debug!("{}: {} comments", path.display(), sequence.len());
    Ok(sequence)
}
