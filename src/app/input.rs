use crossterm::event::KeyEvent;

use super::keymap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    Submit,
    Quit,
    NextField,
    PrevField,
    /// `-1` presses the left arrow, `1` the right one.
    PressArrow(i32),
    ResetStatus,
    Edit(KeyEvent),
}

pub fn classify(key: &KeyEvent) -> KeyCommand {
    keymap::classify_key(key).unwrap_or(KeyCommand::Edit(*key))
}

pub fn help_text() -> &'static str {
    keymap::help_text()
}
