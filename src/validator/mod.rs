//! Card verdicts and the validator contract consumed by the form.
//!
//! Every field of the form is bound to one of the [`CardValidator`] entry
//! points. Validators never fail: malformed input simply produces a verdict
//! whose `is_valid` is `false`.

mod brand;
mod error;
mod rules;

use std::sync::Arc;

use chrono::{Local, NaiveDate};

pub use brand::{BrandCatalog, BrandInfo, Pattern, SecurityCode, default_catalog};
pub use error::CatalogError;

pub trait Verdict: Clone + std::fmt::Debug {
    fn is_valid(&self) -> bool;
    fn is_potentially_valid(&self) -> bool;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Verification {
    pub is_valid: bool,
    pub is_potentially_valid: bool,
}

impl Verification {
    pub const fn new(is_valid: bool, is_potentially_valid: bool) -> Self {
        Self {
            is_valid,
            is_potentially_valid,
        }
    }
}

impl Verdict for Verification {
    fn is_valid(&self) -> bool {
        self.is_valid
    }

    fn is_potentially_valid(&self) -> bool {
        self.is_potentially_valid
    }
}

/// Verdict for the card number; `card` is set only when exactly one brand
/// matches the digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardNumberVerification {
    pub is_valid: bool,
    pub is_potentially_valid: bool,
    pub card: Option<BrandInfo>,
}

impl CardNumberVerification {
    pub fn new(card: Option<BrandInfo>, is_potentially_valid: bool, is_valid: bool) -> Self {
        Self {
            is_valid,
            is_potentially_valid,
            card,
        }
    }
}

impl Verdict for CardNumberVerification {
    fn is_valid(&self) -> bool {
        self.is_valid
    }

    fn is_potentially_valid(&self) -> bool {
        self.is_potentially_valid
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationDateVerification {
    pub is_valid: bool,
    pub is_potentially_valid: bool,
    pub month: Option<String>,
    pub year: Option<String>,
}

impl ExpirationDateVerification {
    pub fn new(
        is_valid: bool,
        is_potentially_valid: bool,
        month: Option<String>,
        year: Option<String>,
    ) -> Self {
        Self {
            is_valid,
            is_potentially_valid,
            month,
            year,
        }
    }
}

impl Verdict for ExpirationDateVerification {
    fn is_valid(&self) -> bool {
        self.is_valid
    }

    fn is_potentially_valid(&self) -> bool {
        self.is_potentially_valid
    }
}

/// Extra positional arguments handed to a validator after the text.
///
/// Assigning a single number produces a one-element sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorParams(Vec<usize>);

impl ValidatorParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first(&self) -> Option<usize> {
        self.0.first().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<usize> for ValidatorParams {
    fn from(value: usize) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<usize>> for ValidatorParams {
    fn from(values: Vec<usize>) -> Self {
        Self(values)
    }
}

impl From<&[usize]> for ValidatorParams {
    fn from(values: &[usize]) -> Self {
        Self(values.to_vec())
    }
}

impl From<Option<usize>> for ValidatorParams {
    fn from(value: Option<usize>) -> Self {
        Self(value.into_iter().collect())
    }
}

/// The validation library contract.
///
/// * `card_number`: `params[0]` overrides the maximum digit count.
/// * `expiration_date`: `params[0]` is the number of years accepted in the future.
/// * `cvv`: `params` lists the accepted code sizes.
/// * `postal_code`: `params[0]` is the minimum length.
/// * `cardholder_name`: no params.
pub trait CardValidator: Send + Sync + std::fmt::Debug {
    fn card_number(&self, text: &str, params: &ValidatorParams) -> CardNumberVerification;
    fn expiration_date(&self, text: &str, params: &ValidatorParams)
    -> ExpirationDateVerification;
    fn cvv(&self, text: &str, params: &ValidatorParams) -> Verification;
    fn postal_code(&self, text: &str, params: &ValidatorParams) -> Verification;
    fn cardholder_name(&self, text: &str, params: &ValidatorParams) -> Verification;
}

#[derive(Debug, Clone)]
pub struct DefaultValidator {
    catalog: Arc<BrandCatalog>,
    luhn_validate_union_pay: bool,
    today: Option<NaiveDate>,
}

impl Default for DefaultValidator {
    fn default() -> Self {
        Self {
            catalog: Arc::new(default_catalog().clone()),
            luhn_validate_union_pay: false,
            today: None,
        }
    }
}

impl DefaultValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(mut self, catalog: impl Into<Arc<BrandCatalog>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    pub fn with_union_pay_luhn(mut self, enabled: bool) -> Self {
        self.luhn_validate_union_pay = enabled;
        self
    }

    /// Pins the date used by expiry checks instead of reading the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn catalog(&self) -> &BrandCatalog {
        &self.catalog
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl CardValidator for DefaultValidator {
    fn card_number(&self, text: &str, params: &ValidatorParams) -> CardNumberVerification {
        rules::card_number(
            &self.catalog,
            text,
            params.first(),
            self.luhn_validate_union_pay,
        )
    }

    fn expiration_date(
        &self,
        text: &str,
        params: &ValidatorParams,
    ) -> ExpirationDateVerification {
        rules::expiration_date(text, params.first(), self.today())
    }

    fn cvv(&self, text: &str, params: &ValidatorParams) -> Verification {
        rules::cvv(text, params.as_slice())
    }

    fn postal_code(&self, text: &str, params: &ValidatorParams) -> Verification {
        rules::postal_code(text, params.first())
    }

    fn cardholder_name(&self, text: &str, _params: &ValidatorParams) -> Verification {
        rules::cardholder_name(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> DefaultValidator {
        DefaultValidator::new().with_today(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())
    }

    #[test]
    fn scalar_params_become_single_element() {
        let params = ValidatorParams::from(4);
        assert_eq!(params.as_slice(), &[4]);
        assert_eq!(ValidatorParams::from(None).as_slice(), &[] as &[usize]);
    }

    #[test]
    fn cvv_honours_size_params() {
        let validator = validator();
        assert!(validator.cvv("123", &ValidatorParams::new()).is_valid);
        assert!(!validator.cvv("123", &ValidatorParams::from(4)).is_valid);
        assert!(validator.cvv("1234", &ValidatorParams::from(4)).is_valid);
    }

    #[test]
    fn union_pay_skips_luhn_unless_requested() {
        let number = "6200000000000000";
        let lenient = validator();
        assert!(lenient.card_number(number, &ValidatorParams::new()).is_valid);
        let strict = validator().with_union_pay_luhn(true);
        assert!(!strict.card_number(number, &ValidatorParams::new()).is_valid);
    }
}
