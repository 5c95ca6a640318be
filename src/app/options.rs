use std::{borrow::Cow, sync::Arc, time::Duration};

use crate::form::{CardStyle, FormLabels, FormOptions};
use crate::validator::{BrandCatalog, CardValidator, DefaultValidator};

#[derive(Debug, Clone)]
pub struct UiOptions {
    pub tick_rate: Duration,
    pub confirm_exit: bool,
    pub show_help: bool,
    pub form: FormOptions,
    pub catalog: Option<Arc<BrandCatalog>>,
    pub luhn_validate_union_pay: bool,
}

impl Default for UiOptions {
    fn default() -> Self {
        Self {
            tick_rate: Duration::from_millis(250),
            confirm_exit: true,
            show_help: true,
            form: FormOptions::default(),
            catalog: None,
            luhn_validate_union_pay: false,
        }
    }
}

impl UiOptions {
    pub fn with_help(mut self, show: bool) -> Self {
        self.show_help = show;
        self
    }

    pub fn with_confirm_exit(mut self, confirm: bool) -> Self {
        self.confirm_exit = confirm;
        self
    }

    pub fn with_tick_rate(mut self, tick_rate: Duration) -> Self {
        self.tick_rate = tick_rate;
        self
    }

    pub fn with_form(mut self, form: FormOptions) -> Self {
        self.form = form;
        self
    }

    pub fn with_labels(self, labels: FormLabels) -> Self {
        self.map_form(|form| form.with_labels(labels))
    }

    pub fn with_number_label(self, label: impl Into<Cow<'static, str>>) -> Self {
        self.map_form(|form| form.with_number_label(label))
    }

    pub fn with_card_holder(self, show: bool) -> Self {
        self.map_form(|form| form.with_card_holder(show))
    }

    pub fn with_postal_code(self, show: bool) -> Self {
        self.map_form(|form| form.with_postal_code(show))
    }

    pub fn with_style(self, style: CardStyle) -> Self {
        self.map_form(|form| form.with_style(style))
    }

    pub fn with_max_elapsed_years(self, years: usize) -> Self {
        self.map_form(|form| form.with_max_elapsed_years(years))
    }

    pub fn with_postal_code_min_length(self, min_length: usize) -> Self {
        self.map_form(|form| form.with_postal_code_min_length(min_length))
    }

    pub fn with_catalog(mut self, catalog: impl Into<Arc<BrandCatalog>>) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn with_union_pay_luhn(mut self, enabled: bool) -> Self {
        self.luhn_validate_union_pay = enabled;
        self
    }

    /// The stock validator configured from these options.
    pub fn validator(&self) -> Arc<dyn CardValidator> {
        let mut validator = DefaultValidator::new().with_union_pay_luhn(self.luhn_validate_union_pay);
        if let Some(catalog) = &self.catalog {
            validator = validator.with_catalog(Arc::clone(catalog));
        }
        Arc::new(validator)
    }

    fn map_form(mut self, f: impl FnOnce(FormOptions) -> FormOptions) -> Self {
        self.form = f(self.form);
        self
    }
}
