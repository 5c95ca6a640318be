mod actions;
mod control;
mod field;
pub mod format;
mod hook;
mod options;
mod reducers;
mod scroll;
mod style;

pub use actions::FormCommand;
pub use control::{CardForm, CardInstance, CardValue, ExpiryValue, FieldId, FieldSlot};
pub use field::{Field, FieldInstance, FieldResponse, FocusMove, ValidatorFn};
pub use hook::{NoopValidationHook, ValidationHook};
pub use options::{FormLabels, FormOptions};
pub use reducers::apply_command;
pub use scroll::ScrollState;
pub use style::CardStyle;
