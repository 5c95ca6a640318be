use super::control::FieldId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormCommand {
    FocusNextField,
    FocusPrevField,
    Focus(FieldId),
    /// `-1` scrolls left, `1` scrolls right.
    PressArrow(i32),
    Blur,
}
