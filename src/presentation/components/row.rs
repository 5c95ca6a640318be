use ratatui::{
    Frame,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::UnicodeWidthChar;

use crate::form::{CardForm, FieldSlot};

use super::super::badge::badge_for;

const BADGE_WIDTH: u16 = 6;
const ARROW_WIDTH: u16 = 3;
const LEFT_ARROW: &str = "◀";
const RIGHT_ARROW: &str = "▶";

/// Screen areas of the row that react to mouse clicks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowHits {
    pub left_arrow: Option<Rect>,
    pub right_arrow: Option<Rect>,
    pub viewport: Rect,
}

pub fn render_card_row(
    frame: &mut Frame<'_>,
    area: Rect,
    form: &mut CardForm,
    title: Option<&str>,
    enable_cursor: bool,
) -> RowHits {
    let error_shown = form.is_validation_error();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .style(form.style().container_style(error_shown));
    if let Some(title) = title {
        block = block.title(title.to_string());
    }
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(BADGE_WIDTH),
            Constraint::Length(ARROW_WIDTH),
            Constraint::Min(1),
            Constraint::Length(ARROW_WIDTH),
        ])
        .split(inner);
    let (badge_area, left_area, viewport, right_area) =
        (columns[0], columns[1], columns[2], columns[3]);

    render_badge(frame, badge_area, form);
    form.measure(viewport.width);

    let arrow_style = form.style().arrow_style(error_shown);
    let left_arrow = (!form.scroll().left_hidden()).then(|| {
        render_arrow(frame, left_area, LEFT_ARROW, arrow_style);
        left_area
    });
    let right_arrow = (!form.scroll().right_hidden()).then(|| {
        render_arrow(frame, right_area, RIGHT_ARROW, arrow_style);
        right_area
    });

    let position = i32::from(form.scroll().position());
    for slot in form.slots() {
        let origin = i32::from(slot.offset) - position;
        let (cell, cursor) = render_cell(form, slot, viewport.height);
        blit(&cell, frame.buffer_mut(), viewport, origin);

        if enable_cursor && let Some(column) = cursor {
            let x = origin + i32::from(column);
            if (0..i32::from(viewport.width)).contains(&x) {
                let x = viewport.x + u16::try_from(x).unwrap_or_default();
                frame.set_cursor_position((x, viewport.y + 1));
            }
        }
    }

    RowHits {
        left_arrow,
        right_arrow,
        viewport,
    }
}

fn render_badge(frame: &mut Frame<'_>, area: Rect, form: &CardForm) {
    let badge = badge_for(&form.card().brand_type);
    let style = Style::default().fg(badge.color).patch(form.style().icon);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let label = Paragraph::new(Line::from(Span::styled(badge.label.clone(), style)));
    frame.render_widget(label, rows[1]);
}

fn render_arrow(frame: &mut Frame<'_>, area: Rect, glyph: &str, style: Style) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(area);
    let arrow = Paragraph::new(Line::from(Span::styled(format!(" {glyph} "), style)));
    frame.render_widget(arrow, rows[1]);
}

/// Draws one cell into a scratch buffer of its full width. Returns the
/// buffer and, for the focused cell, the caret column inside it.
fn render_cell(form: &CardForm, slot: FieldSlot, height: u16) -> (Buffer, Option<u16>) {
    let area = Rect::new(0, 0, slot.width, height.min(3));
    let mut buffer = Buffer::empty(area);
    let focused = form.focused() == Some(slot.id);
    let field_style = form.field_style(slot.id);

    let border_style = if focused {
        field_style.fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        field_style
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style);

    let text = form.text(slot.id);
    let visible_width = usize::from(slot.width.saturating_sub(3));
    let caret = if focused {
        form.cursor_column(slot.id)
    } else {
        0
    };
    let skip = caret.saturating_sub(visible_width);

    let line = if text.is_empty() {
        Line::from(Span::styled(
            form.placeholder(slot.id).to_string(),
            form.placeholder_style(slot.id),
        ))
    } else {
        Line::from(Span::styled(skip_columns(text, skip), field_style))
    };
    Paragraph::new(line).block(block).render(area, &mut buffer);

    let cursor = focused.then(|| u16::try_from(1 + caret - skip).unwrap_or(u16::MAX));
    (buffer, cursor)
}

fn skip_columns(text: &str, columns: usize) -> String {
    let mut skipped = 0;
    text.chars()
        .skip_while(|ch| {
            if skipped >= columns {
                return false;
            }
            skipped += ch.width().unwrap_or(0);
            true
        })
        .collect()
}

/// Copies the columns of `cell` that fall inside `viewport`, with the cell's
/// left edge at `origin` columns from the viewport start.
fn blit(cell: &Buffer, target: &mut Buffer, viewport: Rect, origin: i32) {
    for dx in 0..cell.area.width {
        let x = origin + i32::from(dx);
        if !(0..i32::from(viewport.width)).contains(&x) {
            continue;
        }
        let Ok(x) = u16::try_from(x) else {
            continue;
        };
        for dy in 0..cell.area.height.min(viewport.height) {
            let Some(source) = cell.cell((dx, dy)) else {
                continue;
            };
            if let Some(dest) = target.cell_mut((viewport.x + x, viewport.y + dy)) {
                *dest = source.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::form::{CardInstance, FieldId, FormOptions};
    use crate::validator::DefaultValidator;

    fn row_text(terminal: &Terminal<TestBackend>, y: u16) -> String {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.width)
            .filter_map(|x| buffer.cell((x, y)).map(|cell| cell.symbol().to_string()))
            .collect()
    }

    fn render(form: &mut CardForm, width: u16) -> (Terminal<TestBackend>, RowHits) {
        let mut terminal = Terminal::new(TestBackend::new(width, 5)).unwrap();
        let mut hits = RowHits::default();
        terminal
            .draw(|frame| {
                let area = frame.area();
                hits = render_card_row(frame, area, form, Some("Card"), true);
            })
            .unwrap();
        (terminal, hits)
    }

    fn form(options: FormOptions) -> CardForm {
        CardForm::new(Arc::new(DefaultValidator::new()), options)
    }

    #[test]
    fn wide_row_shows_every_cell_and_no_arrows() {
        let mut form = form(FormOptions::default());
        let (terminal, hits) = render(&mut form, 80);
        let middle = row_text(&terminal, 2);
        assert!(middle.contains("CARD"));
        assert!(middle.contains("Card number"));
        assert!(middle.contains("MM/YY"));
        assert!(middle.contains("CVC"));
        assert!(hits.left_arrow.is_none());
        assert!(hits.right_arrow.is_none());
    }

    #[test]
    fn narrow_row_offers_right_arrow() {
        let mut form = form(FormOptions::default().with_card_holder(true));
        let (terminal, hits) = render(&mut form, 40);
        assert!(hits.left_arrow.is_none());
        assert!(hits.right_arrow.is_some());
        assert!(row_text(&terminal, 2).contains(RIGHT_ARROW));

        form.press_arrow(1);
        let (terminal, hits) = render(&mut form, 40);
        assert!(hits.left_arrow.is_some());
        assert!(row_text(&terminal, 2).contains(LEFT_ARROW));
    }

    #[test]
    fn badge_and_text_follow_the_number() {
        let mut form = form(FormOptions::default());
        form.set_text(FieldId::Number, "4111111111111111");
        form.set_validation_error(true);
        let (terminal, _) = render(&mut form, 80);
        let middle = row_text(&terminal, 2);
        assert!(middle.contains("VISA"));
        assert!(middle.contains("4111 1111 1111 1111"));
        assert!(middle.contains("CVV"));
    }

    #[test]
    fn long_text_keeps_the_caret_visible() {
        assert_eq!(skip_columns("Jane Doe", 0), "Jane Doe");
        assert_eq!(skip_columns("Jane Doe", 5), "Doe");
    }
}
