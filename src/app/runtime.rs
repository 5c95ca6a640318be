use anyhow::{Result, anyhow};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use log::debug;
use ratatui::layout::{Position, Rect};

use crate::{
    form::{CardForm, CardInstance, CardValue, FormCommand, apply_command},
    presentation::{self, RowHits, UiContext},
};

use super::{
    input::{self, KeyCommand},
    options::UiOptions,
    status::StatusLine,
    terminal::TerminalGuard,
};

pub(crate) struct App {
    form: CardForm,
    title: Option<String>,
    options: UiOptions,
    status: StatusLine,
    hits: RowHits,
    exit_armed: bool,
    should_quit: bool,
    result: Option<CardValue>,
}

impl App {
    pub fn new(form: CardForm, title: Option<String>, options: UiOptions) -> Self {
        Self {
            form,
            title,
            options,
            status: StatusLine::new(),
            hits: RowHits::default(),
            exit_armed: false,
            should_quit: false,
            result: None,
        }
    }

    pub fn run(&mut self) -> Result<CardValue> {
        let mut terminal = TerminalGuard::new()?;
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            if !event::poll(self.options.tick_rate)? {
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                Event::Resize(_, _) => {}
                Event::FocusGained | Event::FocusLost | Event::Paste(_) => {}
            }
        }

        self.result
            .take()
            .ok_or_else(|| anyhow!("user exited without saving"))
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let help = self.options.show_help.then(input::help_text);
        let focus_label = self.form.focused().map(|id| self.form.placeholder(id).to_string());
        let brand = (!self.form.card().is_unknown()).then(|| self.form.card().nice_type.clone());
        let is_valid = self.form.is_valid();
        let error_shown = self.form.is_validation_error();

        self.hits = presentation::draw(
            frame,
            &mut self.form,
            UiContext {
                title: self.title.as_deref(),
                status_message: self.status.message(),
                help,
                focus_label: focus_label.as_deref(),
                brand: brand.as_deref(),
                is_valid,
                error_shown,
            },
        );
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match input::classify(&key) {
            KeyCommand::Submit => {
                self.exit_armed = false;
                self.on_submit();
            }
            KeyCommand::Quit => self.on_exit(),
            KeyCommand::NextField => self.apply(FormCommand::FocusNextField),
            KeyCommand::PrevField => self.apply(FormCommand::FocusPrevField),
            KeyCommand::PressArrow(direction) => self.apply(FormCommand::PressArrow(direction)),
            KeyCommand::ResetStatus => {
                self.exit_armed = false;
                self.status.ready();
            }
            KeyCommand::Edit(key) => {
                if self.form.handle_key(&key) {
                    self.exit_armed = false;
                    if let Some(id) = self.form.focused() {
                        let label = self.form.placeholder(id).to_string();
                        self.status.editing(&label);
                    }
                }
            }
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let position = Position::new(mouse.column, mouse.row);
        if contains(self.hits.left_arrow, position) {
            self.apply(FormCommand::PressArrow(-1));
        } else if contains(self.hits.right_arrow, position) {
            self.apply(FormCommand::PressArrow(1));
        } else if self.hits.viewport.contains(position) {
            self.exit_armed = false;
            if !self.form.click(mouse.column - self.hits.viewport.x) {
                self.apply(FormCommand::Blur);
            }
        }
    }

    fn apply(&mut self, command: FormCommand) {
        self.exit_armed = false;
        apply_command(&mut self.form, command);
    }

    fn on_submit(&mut self) {
        match self.form.value() {
            Some(value) if self.form.is_valid() => {
                debug!("card submitted");
                self.status.submitted();
                self.result = Some(value);
                self.should_quit = true;
            }
            _ => {
                self.form.set_validation_error(true);
                self.status.invalid();
            }
        }
    }

    fn on_exit(&mut self) {
        if self.options.confirm_exit && self.form.is_dirty() && !self.exit_armed {
            self.exit_armed = true;
            self.status.pending_exit();
            return;
        }
        self.should_quit = true;
        self.result = None;
    }
}

fn contains(area: Option<Rect>, position: Position) -> bool {
    area.is_some_and(|area| area.contains(position))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::{Terminal, backend::TestBackend};

    use super::*;
    use crate::form::{FieldId, FormOptions};
    use crate::validator::DefaultValidator;

    fn app(options: UiOptions) -> App {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let validator = DefaultValidator::new().with_today(today);
        let form = CardForm::new(Arc::new(validator), options.form.clone());
        App::new(form, Some("Payment".into()), options)
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn ctrl(app: &mut App, ch: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL));
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        });
    }

    fn render(app: &mut App, width: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, 12)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
    }

    #[test]
    fn typing_a_full_card_and_submitting_captures_it() {
        let mut app = app(UiOptions::default());
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "4111111111111111");
        assert_eq!(app.form.focused(), Some(FieldId::Number));
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "1230");
        assert_eq!(app.form.focused(), Some(FieldId::Cvc));
        type_text(&mut app, "123");

        press(&mut app, KeyCode::Enter);
        assert!(app.should_quit);
        let value = app.result.take().unwrap();
        assert_eq!(value.number, "4111111111111111");
        assert_eq!(value.expired.month, 12);
        assert_eq!(value.expired.year, 30);
        assert_eq!(value.cvc, "123");
    }

    #[test]
    fn submitting_an_incomplete_card_raises_the_error() {
        let mut app = app(UiOptions::default());
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "4111");
        ctrl(&mut app, 's');
        assert!(!app.should_quit);
        assert!(app.form.is_validation_error());
        assert_eq!(app.status.message(), "Card details are incomplete or invalid");

        type_text(&mut app, "1");
        assert!(!app.form.is_validation_error());
    }

    #[test]
    fn quitting_a_dirty_form_needs_confirmation() {
        let mut app = app(UiOptions::default());
        ctrl(&mut app, 'q');
        assert!(app.should_quit);

        let mut app = self::app(UiOptions::default());
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "4");
        ctrl(&mut app, 'q');
        assert!(!app.should_quit);
        ctrl(&mut app, 'c');
        assert!(app.should_quit);
        assert!(app.result.is_none());
    }

    #[test]
    fn escape_disarms_the_exit() {
        let mut app = app(UiOptions::default());
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "4");
        ctrl(&mut app, 'q');
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.status.message(), super::super::status::READY_STATUS);
        ctrl(&mut app, 'q');
        assert!(!app.should_quit);
    }

    #[test]
    fn mouse_presses_arrows_and_focuses_fields() {
        let mut app = app(UiOptions::default().with_card_holder(true));
        render(&mut app, 40);
        let right = app.hits.right_arrow.unwrap();
        click(&mut app, right.x + 1, right.y + 1);
        assert!(app.form.scroll().position() > 0);

        render(&mut app, 40);
        let viewport = app.hits.viewport;
        click(&mut app, viewport.x + viewport.width - 2, viewport.y + 1);
        assert_eq!(app.form.focused(), Some(FieldId::Cvc));
    }

    #[test]
    fn clicking_between_cells_blurs() {
        let mut app = app(UiOptions::default());
        render(&mut app, 80);
        let viewport = app.hits.viewport;
        let number = app.form.slots()[0];
        click(&mut app, viewport.x + 1, viewport.y + 1);
        assert_eq!(app.form.focused(), Some(FieldId::Number));

        click(&mut app, viewport.x + number.width, viewport.y + 1);
        assert_eq!(app.form.focused(), None);
    }

    #[test]
    fn footer_shows_the_brand_once_detected() {
        let mut app = app(UiOptions::default());
        press(&mut app, KeyCode::Tab);
        type_text(&mut app, "4111");
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        let screen = buffer
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(screen.contains("Visa"));
        assert!(screen.contains("Editing Card number"));
    }
}
