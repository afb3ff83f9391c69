mod app;
mod commands;
mod options;
mod render;
mod source;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use log::info;
use thread_tree::InitialView;

use crate::app::Viewer;
use crate::options::ViewerOptions;

/// Browse indented discussion pages as collapsible comment threads.
#[derive(Parser)]
#[command(version)]
struct Cli {
    /// Page files, one comment per line, nesting shown by indentation
    #[arg(required = true)]
    pages: Vec<PathBuf>,

    /// TOML file with viewer options
    #[arg(long)]
    config: Option<PathBuf>,

    /// Spaces per nesting level (overrides the config file)
    #[arg(long)]
    indent_width: Option<usize>,

    /// Start with every thread open instead of collapsed
    #[arg(long)]
    expanded: bool,

    /// Hide the collapse/expand labels
    #[arg(long)]
    no_labels: bool,

    /// Do not report how many comments are hidden
    #[arg(long)]
    no_hidden_count: bool,
}

impl Cli {
    fn options(&self) -> Result<ViewerOptions> {
        let mut options = match &self.config {
            Some(path) => ViewerOptions::load(path)?,
            None => ViewerOptions::new(),
        };
        if let Some(width) = self.indent_width {
            options = options.indent_width(width);
        }
        if self.expanded {
            options = options.initial_view(InitialView::Expanded);
        }
        if self.no_labels {
            options = options.show_labels(false);
        }
        if self.no_hidden_count {
            options = options.show_hidden_count(false);
        }
        options.validate()?;
        Ok(options)
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let options = cli.options()?;
    info!("starting with {:?}", options);

    let mut viewer = Viewer::open(&cli.pages, options)?;
    viewer.run(std::io::stdin().lock(), std::io::stdout().lock())
}
