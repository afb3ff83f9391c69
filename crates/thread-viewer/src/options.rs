//! Configuration options for the thread viewer.
//!
//! Options come from an optional TOML file and can be overridden from the
//! command line.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use thread_tree::InitialView;

/// Configuration options for the viewer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    /// Number of leading spaces that make up one nesting level.
    pub indent_width: usize,

    /// How each page looks when it is first opened.
    pub initial_view: InitialView,

    /// Whether to print `collapse [N]` / `expand [N]` after parent comments.
    pub show_labels: bool,

    /// Whether to print how many comments are hidden at the bottom of a page.
    pub show_hidden_count: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            indent_width: 2,
            initial_view: InitialView::Collapsed,
            show_labels: true,
            show_hidden_count: true,
        }
    }
}

impl ViewerOptions {
    /// Create new viewer options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load options from a TOML file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let options: ViewerOptions = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        options.validate()?;
        Ok(options)
    }

    /// Set the indentation width of one nesting level.
    pub fn indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the initial view of every page.
    pub fn initial_view(mut self, view: InitialView) -> Self {
        self.initial_view = view;
        self
    }

    /// Enable or disable toggle labels.
    pub fn show_labels(mut self, show: bool) -> Self {
        self.show_labels = show;
        self
    }

    /// Enable or disable the hidden-comment summary.
    pub fn show_hidden_count(mut self, show: bool) -> Self {
        self.show_hidden_count = show;
        self
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(self.indent_width > 0, "indent_width must be at least 1");
        Ok(())
    }
}
