use std::borrow::Cow;

use super::style::CardStyle;

/// Placeholder texts of the cells. The CVC cell is labelled with the
/// detected brand's code name instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLabels {
    pub number: Cow<'static, str>,
    pub expiry: Cow<'static, str>,
    pub card_holder: Cow<'static, str>,
    pub postal_code: Cow<'static, str>,
}

impl Default for FormLabels {
    fn default() -> Self {
        Self {
            number: Cow::Borrowed("Card number"),
            expiry: Cow::Borrowed("MM/YY"),
            card_holder: Cow::Borrowed("Card holder name"),
            postal_code: Cow::Borrowed("Postal code"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormOptions {
    pub labels: FormLabels,
    pub show_card_holder: bool,
    pub show_postal_code: bool,
    pub style: CardStyle,
    pub postal_code_min_length: Option<usize>,
    pub max_elapsed_years: Option<usize>,
}

impl FormOptions {
    pub fn with_labels(mut self, labels: FormLabels) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_number_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.labels.number = label.into();
        self
    }

    pub fn with_card_holder_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.labels.card_holder = label.into();
        self
    }

    pub fn with_postal_code_label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.labels.postal_code = label.into();
        self
    }

    pub fn with_card_holder(mut self, show: bool) -> Self {
        self.show_card_holder = show;
        self
    }

    pub fn with_postal_code(mut self, show: bool) -> Self {
        self.show_postal_code = show;
        self
    }

    pub fn with_style(mut self, style: CardStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_postal_code_min_length(mut self, min_length: usize) -> Self {
        self.postal_code_min_length = Some(min_length);
        self
    }

    pub fn with_max_elapsed_years(mut self, years: usize) -> Self {
        self.max_elapsed_years = Some(years);
        self
    }
}
