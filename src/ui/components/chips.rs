//! Removable chips for committed multi-select values.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::ui::theme::theme;

/// Close glyph drawn at the end of every chip.
const CLOSE_GLYPH: &str = "×";

/// Where a chip was laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChipSlot {
    /// The value the chip stands for.
    pub value: String,
    /// Text shown on the chip.
    pub label: String,
    /// The whole chip.
    pub body: Rect,
    /// The close control inside the chip.
    pub close: Rect,
}

/// Chips laid out on one row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChipRow {
    /// Chips that fit.
    pub slots: Vec<ChipSlot>,
    /// Number of chips that did not fit.
    pub hidden: usize,
    /// First free column after the chips.
    pub end_x: u16,
}

impl ChipRow {
    /// The chip whose close control contains `position`.
    pub fn close_hit(&self, position: Position) -> Option<&ChipSlot> {
        self.slots.iter().find(|slot| slot.close.contains(position))
    }
}

/// Lay `(value, label)` chips out left to right on the first row of `area`.
pub fn layout_chips(area: Rect, chips: &[(String, String)]) -> ChipRow {
    let mut row = ChipRow {
        end_x: area.x,
        ..ChipRow::default()
    };
    if area.is_empty() {
        row.hidden = chips.len();
        return row;
    }

    let mut x = area.x;
    for (i, (value, label)) in chips.iter().enumerate() {
        let label_width = Span::raw(label.as_str()).width() as u16;
        // " label × "
        let width = label_width + 4;
        if x.saturating_add(width) > area.right() {
            row.hidden = chips.len() - i;
            break;
        }
        row.slots.push(ChipSlot {
            value: value.clone(),
            label: label.clone(),
            body: Rect::new(x, area.y, width, 1),
            close: Rect::new(x + label_width + 2, area.y, 2, 1),
        });
        x += width + 1;
    }
    row.end_x = x.min(area.right());
    row
}

/// Draw a laid out chip row.
pub fn render_chips(frame: &mut Frame, row: &ChipRow, area: Rect) {
    let t = theme();
    let style = Style::default().fg(t.chip_fg).bg(t.chip_bg);

    for slot in &row.slots {
        let line = Line::from(vec![
            Span::styled(format!(" {} ", slot.label), style),
            Span::styled(CLOSE_GLYPH, style.add_modifier(Modifier::BOLD)),
            Span::styled(" ", style),
        ]);
        frame.render_widget(line, slot.body);
    }

    if row.hidden > 0 {
        let more = format!("+{}", row.hidden);
        let width = (more.len() as u16).min(area.right().saturating_sub(row.end_x));
        if width > 0 {
            let rect = Rect::new(row.end_x, area.y, width, 1);
            frame.render_widget(Span::styled(more, Style::default().fg(t.muted)), rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chips(labels: &[&str]) -> Vec<(String, String)> {
        labels
            .iter()
            .map(|l| (l.to_lowercase(), l.to_string()))
            .collect()
    }

    #[test]
    fn test_layout_positions() {
        let row = layout_chips(Rect::new(2, 1, 40, 1), &chips(&["Bug", "UI"]));
        assert_eq!(row.slots.len(), 2);
        assert_eq!(row.hidden, 0);
        // " Bug × " is 7 wide.
        assert_eq!(row.slots[0].body, Rect::new(2, 1, 7, 1));
        assert_eq!(row.slots[0].close, Rect::new(7, 1, 2, 1));
        assert_eq!(row.slots[1].body.x, 10);
        assert_eq!(row.end_x, 10 + 6 + 1);
    }

    #[test]
    fn test_overflow_is_counted() {
        let row = layout_chips(Rect::new(0, 0, 12, 1), &chips(&["Alpha", "Beta", "Gamma"]));
        assert_eq!(row.slots.len(), 1);
        assert_eq!(row.hidden, 2);
    }

    #[test]
    fn test_close_hit() {
        let row = layout_chips(Rect::new(0, 0, 40, 1), &chips(&["Bug", "UI"]));
        assert_eq!(row.close_hit(Position::new(5, 0)).unwrap().value, "bug");
        // The label part of the chip is not the close control.
        assert!(row.close_hit(Position::new(1, 0)).is_none());
    }

    #[test]
    fn test_empty_area_hides_everything() {
        let row = layout_chips(Rect::new(0, 0, 0, 0), &chips(&["Bug"]));
        assert!(row.slots.is_empty());
        assert_eq!(row.hidden, 1);
    }
}
