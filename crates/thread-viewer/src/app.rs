//! The viewer: one independent session per page, driven by line commands

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, info, warn};
use thread_tree::prelude::*;

use crate::commands::{self, Command, HELP};
use crate::options::ViewerOptions;
use crate::render::render;
use crate::source::{load_page, Comment};

/// A loaded page and the session that owns its tree
pub struct Page {
    pub path: PathBuf,
    pub session: Session<Comment, MemoryDisplay>,
}

impl Page {
    /// Build a page from an extracted sequence and apply the initial view
    pub fn new(
        path: impl Into<PathBuf>,
        sequence: Vec<(Depth, Comment)>,
        options: &ViewerOptions,
    ) -> Result<Self> {
        let path = path.into();
        let tree = try_build(sequence)
            .with_context(|| format!("Malformed page: {}", path.display()))?;
        let mut session = Session::with_display(tree, MemoryDisplay::new());
        session.activate(options.initial_view)?;
        Ok(Self { path, session })
    }

    pub fn open(path: &Path, options: &ViewerOptions) -> Result<Self> {
        let sequence = load_page(path, options.indent_width)?;
        Self::new(path, sequence, options)
    }
}

/// What the input loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Viewer {
    pages: Vec<Page>,
    current: usize,
    options: ViewerOptions,
}

impl Viewer {
    pub fn new(pages: Vec<Page>, options: ViewerOptions) -> Result<Self> {
        if pages.is_empty() {
            bail!("no pages to show");
        }
        Ok(Self {
            pages,
            current: 0,
            options,
        })
    }

    /// Load every page file; each becomes its own session
    pub fn open(paths: &[PathBuf], options: ViewerOptions) -> Result<Self> {
        let pages = paths
            .iter()
            .map(|path| Page::open(path, &options))
            .collect::<Result<Vec<_>>>()?;
        info!("opened {} page(s)", pages.len());
        Self::new(pages, options)
    }

    pub fn current(&self) -> &Page {
        &self.pages[self.current]
    }

    /// Text of the current page, with a header naming it
    pub fn screen(&self) -> String {
        let page = self.current();
        format!(
            "== page {}/{}: {}\n{}",
            self.current + 1,
            self.pages.len(),
            page.path.display(),
            render(&page.session, &self.options)
        )
    }

    /// Apply one command, writing any output to `out`
    pub fn execute(&mut self, command: Command, out: &mut impl Write) -> Result<Flow> {
        debug!("executing {:?}", command);
        match command {
            Command::Event(event) => {
                let session = &mut self.pages[self.current].session;
                session.handle(event)?;
                if let Some(comment) = session.selected().and_then(|id| session.tree().item(id)) {
                    debug!("selection is on line {}", comment.line);
                }
                write!(out, "{}", self.screen())?;
            }
            Command::Toggle(id) => {
                self.pages[self.current].session.toggle(id, None)?;
                write!(out, "{}", self.screen())?;
            }
            Command::Page(number) => {
                if number == 0 || number > self.pages.len() {
                    bail!("no page {} (have {})", number, self.pages.len());
                }
                self.current = number - 1;
                write!(out, "{}", self.screen())?;
            }
            Command::Show => write!(out, "{}", self.screen())?,
            Command::Help => write!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Read commands until `quit` or end of input
    ///
    /// A failing command is reported and the loop carries on; only I/O
    /// errors end it early.
    pub fn run(&mut self, input: impl BufRead, mut out: impl Write) -> Result<()> {
        write!(out, "{}", self.screen())?;
        for line in input.lines() {
            let line = line.context("Failed to read command")?;
            let result = commands::parse(&line)
                .and_then(|command| match command {
                    Some(command) => self.execute(command, &mut out),
                    None => Ok(Flow::Continue),
                });
            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => {
                    warn!("command failed: {:#}", e);
                    writeln!(out, "error: {:#}", e)?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}
