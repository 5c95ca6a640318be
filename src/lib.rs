#![deny(rust_2018_idioms)]

mod app;
pub mod form;
pub mod presentation;
pub mod validator;

pub use app::{CardUI, UiOptions};
pub use form::{CardForm, CardInstance, CardValue, ExpiryValue, FieldId, FieldInstance};

pub mod prelude {
    pub use super::{CardForm, CardInstance, CardUI, CardValue, FieldId, UiOptions};
    pub use crate::form::{CardStyle, FormLabels, FormOptions, ValidationHook};
    pub use crate::validator::{BrandCatalog, CardValidator, DefaultValidator};
}
