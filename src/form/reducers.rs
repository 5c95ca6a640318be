use super::{actions::FormCommand, control::CardForm};

pub fn apply_command(form: &mut CardForm, command: FormCommand) {
    match command {
        FormCommand::FocusNextField => form.focus_next_field(),
        FormCommand::FocusPrevField => form.focus_prev_field(),
        FormCommand::Focus(id) => form.focus(id),
        FormCommand::PressArrow(direction) => form.press_arrow(direction),
        FormCommand::Blur => form.blur(),
    }
}
