//! Key hint bar for the focused control.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::events::{get_context_hints, KeyContext};
use crate::ui::theme::theme;

/// Render the hints for `context` on one line.
pub fn render_context_help(frame: &mut Frame, area: Rect, context: KeyContext) {
    let line = Line::from(hint_spans(get_context_hints(context)));
    frame.render_widget(Paragraph::new(line), area);
}

/// Split hint text into key spans (`[..]`) and description spans.
fn hint_spans(hints: &str) -> Vec<Span<'static>> {
    let t = theme();
    let key_style = Style::default().fg(t.accent);
    let text_style = Style::default().fg(t.muted);

    let mut spans = Vec::new();
    let mut rest = hints;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            spans.push(Span::styled(rest.to_string(), text_style));
            break;
        };
        if open > 0 {
            spans.push(Span::styled(rest[..open].to_string(), text_style));
        }
        match rest[open..].find(']') {
            Some(close) => {
                let end = open + close + 1;
                spans.push(Span::styled(rest[open..end].to_string(), key_style));
                rest = &rest[end..];
            }
            None => {
                spans.push(Span::styled(rest[open..].to_string(), text_style));
                break;
            }
        }
    }
    spans
}
