//! Terminal rendering of a page from the state its display has recorded

use std::fmt::Write as _;

use thread_tree::prelude::*;

use crate::options::ViewerOptions;
use crate::source::Comment;

/// Marker printed in the gutter for each highlight tier
fn gutter(highlight: Highlight) -> char {
    match highlight {
        Highlight::None => ' ',
        Highlight::Context => '|',
        Highlight::Selected => '>',
    }
}

/// Render every visible comment of a session
///
/// Only what the display was told is used for visibility, highlight and
/// labels; the tree supplies structure and text.
pub fn render(session: &Session<Comment, MemoryDisplay>, options: &ViewerOptions) -> String {
    let mut out = String::new();
    let Some(display) = session.display() else {
        return out;
    };
    let tree = session.tree();

    let mut hidden = 0;
    for (id, comment) in tree.items() {
        if !display.is_visible(id) {
            hidden += 1;
            continue;
        }
        let indent = (tree.level(id) - 1) * 2;
        let _ = write!(
            out,
            "{} {:indent$}#{} {}",
            gutter(display.highlight(id)),
            "",
            id.get(),
            comment,
            indent = indent
        );
        if options.show_labels {
            if let Some(label) = display.label(id) {
                let _ = write!(out, " | {}", label);
            }
        }
        out.push('\n');
    }

    if options.show_hidden_count && hidden > 0 {
        let _ = writeln!(out, "({} hidden)", hidden);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_page;
    use pretty_assertions::assert_eq;

    fn session() -> Session<Comment, MemoryDisplay> {
        let sequence = parse_page("a\n  b\n    c\n  d\ne\n", 2).unwrap();
        Session::with_display(build(sequence), MemoryDisplay::new())
    }

    #[test]
    fn test_render_collapsed() {
        let mut session = session();
        session.activate(InitialView::Collapsed).unwrap();

        assert_eq!(
            render(&session, &ViewerOptions::new()),
            "  #1 a | expand [3]\n  #5 e\n(3 hidden)\n"
        );
    }

    #[test]
    fn test_render_selection() {
        let mut session = session();
        session.activate(InitialView::Expanded).unwrap();
        session.handle(SessionEvent::Click(NodeId(3))).unwrap();

        let options = ViewerOptions::new().show_labels(false);
        assert_eq!(
            render(&session, &options),
            "| #1 a\n|   #2 b\n>     #3 c\n|   #4 d\n  #5 e\n"
        );
    }

    #[test]
    fn test_render_without_display() {
        let sequence = parse_page("a\n", 2).unwrap();
        let session: Session<Comment, MemoryDisplay> = Session::new(build(sequence));
        assert_eq!(render(&session, &ViewerOptions::new()), "");
    }
}
