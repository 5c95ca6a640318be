use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::form::CardForm;

use super::components::{RowHits, render_card_row, render_footer};

const ROW_HEIGHT: u16 = 5;
const FOOTER_HEIGHT: u16 = 4;

pub struct UiContext<'a> {
    pub title: Option<&'a str>,
    pub status_message: &'a str,
    pub help: Option<&'a str>,
    pub focus_label: Option<&'a str>,
    pub brand: Option<&'a str>,
    pub is_valid: bool,
    pub error_shown: bool,
}

pub fn draw(frame: &mut Frame<'_>, form: &mut CardForm, ctx: UiContext<'_>) -> RowHits {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(ROW_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.area());

    let hits = render_card_row(frame, chunks[0], form, ctx.title, true);
    render_footer(frame, chunks[2], &ctx);
    hits
}
