use std::sync::Arc;

use anyhow::Result;

use crate::form::{CardForm, CardValue, ValidationHook};
use crate::validator::CardValidator;

use super::{options::UiOptions, runtime::App};

/// Terminal front-end around a [`CardForm`].
///
/// ```no_run
/// use cardui::prelude::*;
///
/// let card = CardUI::new(UiOptions::default().with_card_holder(true))
///     .with_title("Payment")
///     .run()?;
/// println!("{}", card.number);
/// # Ok::<(), anyhow::Error>(())
/// ```
#[derive(Debug)]
pub struct CardUI {
    form: CardForm,
    title: Option<String>,
    options: UiOptions,
}

impl CardUI {
    pub fn new(options: UiOptions) -> Self {
        let form = CardForm::new(options.validator(), options.form.clone());
        Self {
            form,
            title: None,
            options,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Swaps the validator; text entered so far is dropped.
    pub fn with_validator(mut self, validator: Arc<dyn CardValidator>) -> Self {
        self.form.set_validator(validator);
        self
    }

    pub fn with_validation_hook(mut self, hook: impl ValidationHook + 'static) -> Self {
        self.form.set_validation_hook(hook);
        self
    }

    pub fn form(&self) -> &CardForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut CardForm {
        &mut self.form
    }

    pub fn run(self) -> Result<CardValue> {
        let CardUI {
            form,
            title,
            options,
        } = self;
        let mut app = App::new(form, title, options);
        app.run()
    }
}
