mod card_ui;
pub(crate) mod input;
mod keymap;
mod options;
mod runtime;
mod status;
mod terminal;

pub use card_ui::CardUI;
pub use options::UiOptions;
