//! Line commands accepted on standard input

use anyhow::{bail, Context, Result};
use thread_tree::tree::NodeId;
use thread_tree::SessionEvent;

/// One parsed command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Forward a user event to the current page's session
    Event(SessionEvent),
    /// Flip one comment's subtree without touching the selection
    Toggle(NodeId),
    /// Switch to another page (1-based)
    Page(usize),
    Show,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  click N          select comment #N
  dblclick N       select comment #N and toggle its replies
  toggle N         toggle the replies of comment #N
  expand-all       open every comment
  collapse-all     collapse each top-level thread
  page N           switch to page N
  show             print the current page
  help             print this help
  quit             exit
";

fn node_arg(verb: &str, arg: Option<&str>) -> Result<NodeId> {
    let arg = arg.with_context(|| format!("{} needs a comment number", verb))?;
    let index: usize = arg
        .parse()
        .with_context(|| format!("not a comment number: {}", arg))?;
    Ok(NodeId::new(index))
}

/// Parse one input line; blank lines yield `None`
pub fn parse(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    if let Some(extra) = words.next() {
        bail!("unexpected argument: {}", extra);
    }

    let command = match verb {
        "click" | "c" => Command::Event(SessionEvent::Click(node_arg(verb, arg)?)),
        "dblclick" | "d" => Command::Event(SessionEvent::DoubleClick(node_arg(verb, arg)?)),
        "toggle" | "t" => Command::Toggle(node_arg(verb, arg)?),
        "expand-all" => Command::Event(SessionEvent::ExpandAll),
        "collapse-all" => Command::Event(SessionEvent::CollapseAll),
        "page" | "p" => {
            let page: usize = arg
                .context("page needs a page number")?
                .parse()
                .context("not a page number")?;
            Command::Page(page)
        }
        "show" | "s" => Command::Show,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => bail!("unknown command: {} (try `help`)", other),
    };
    Ok(Some(command))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_events() {
        assert_eq!(
            parse("click 3").unwrap(),
            Some(Command::Event(SessionEvent::Click(NodeId(3))))
        );
        assert_eq!(
            parse("  d 7 ").unwrap(),
            Some(Command::Event(SessionEvent::DoubleClick(NodeId(7))))
        );
        assert_eq!(
            parse("collapse-all").unwrap(),
            Some(Command::Event(SessionEvent::CollapseAll))
        );
        assert_eq!(
            parse("expand-all").unwrap(),
            Some(Command::Event(SessionEvent::ExpandAll))
        );
    }

    #[test]
    fn test_parse_viewer_commands() {
        assert_eq!(parse("toggle 2").unwrap(), Some(Command::Toggle(NodeId(2))));
        assert_eq!(parse("page 2").unwrap(), Some(Command::Page(2)));
        assert_eq!(parse("q").unwrap(), Some(Command::Quit));
        assert_eq!(parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse("click").is_err());
        assert!(parse("click x").is_err());
        assert!(parse("click 1 2").is_err());
        assert!(parse("page").is_err());
        assert_eq!(
            parse("fold 1").unwrap_err().to_string(),
            "unknown command: fold (try `help`)"
        );
    }
}
