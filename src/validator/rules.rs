use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use super::{BrandCatalog, CardNumberVerification, ExpirationDateVerification, Verification};

const DEFAULT_CVV_LENGTH: usize = 3;
const DEFAULT_MIN_POSTAL_CODE_LENGTH: usize = 3;
const DEFAULT_YEARS_IN_FUTURE: usize = 19;
const MAX_CARDHOLDER_NAME_LENGTH: usize = 255;

static CARD_NUMBER_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s-]*$").expect("card number pattern"));
static MONTH_SPACE_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{2}) ([0-9]{2}([0-9]{2})?)$").expect("month year pattern"));
static ISO_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{1,2}$").expect("iso month pattern"));
static SLASH_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*/\s*").expect("slash pattern"));
static SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" +").expect("space pattern"));

fn is_digits(value: &str) -> bool {
    value.chars().all(|ch| ch.is_ascii_digit())
}

pub(super) fn luhn(digits: &str) -> bool {
    let mut sum = 0;
    let mut double = false;
    for ch in digits.chars().rev() {
        let Some(mut digit) = ch.to_digit(10) else {
            return false;
        };
        if double {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
        double = !double;
    }
    sum % 10 == 0
}

pub(super) fn card_number(
    catalog: &BrandCatalog,
    text: &str,
    max_length: Option<usize>,
    luhn_validate_union_pay: bool,
) -> CardNumberVerification {
    let value = text
        .chars()
        .filter(|ch| *ch != '-' && !ch.is_whitespace())
        .collect::<String>();
    if value.is_empty() || !is_digits(&value) {
        return CardNumberVerification::new(None, false, false);
    }

    let mut candidates = catalog.detect(&value);
    if candidates.len() != 1 {
        return CardNumberVerification::new(None, true, false);
    }
    let card = candidates.remove(0);
    let length = value.len();

    let limit = max_length.filter(|max| *max > 0);
    if limit.is_some_and(|max| length > max) {
        return CardNumberVerification::new(Some(card), false, false);
    }

    let is_valid = if card.is_union_pay() && !luhn_validate_union_pay {
        true
    } else {
        luhn(&value)
    };
    let max = limit.unwrap_or_else(|| card.max_length());

    if card.lengths.contains(&length) {
        let potential = length < max || is_valid;
        return CardNumberVerification::new(Some(card), potential, is_valid);
    }
    CardNumberVerification::new(Some(card), length < max, false)
}

struct ParsedDate {
    month: String,
    year: String,
}

struct MonthCheck {
    verdict: Verification,
    is_valid_for_this_year: bool,
}

struct YearCheck {
    verdict: Verification,
    is_current_year: bool,
}

pub(super) fn expiration_date(
    text: &str,
    max_elapsed_years: Option<usize>,
    today: NaiveDate,
) -> ExpirationDateVerification {
    let max_elapsed_years = max_elapsed_years.unwrap_or(DEFAULT_YEARS_IN_FUTURE);
    let normalized = MONTH_SPACE_YEAR.replace(text, "$1/$2");
    let date = parse_date(&normalized, today);
    let month = expiration_month(&date.month, today);
    let year = expiration_year(&date.year, max_elapsed_years, today);

    if month.verdict.is_valid {
        if year.is_current_year {
            let valid = month.is_valid_for_this_year;
            return ExpirationDateVerification::new(
                valid,
                valid,
                Some(date.month),
                Some(date.year),
            );
        }
        if year.verdict.is_valid {
            return ExpirationDateVerification::new(true, true, Some(date.month), Some(date.year));
        }
    }

    let potential = month.verdict.is_potentially_valid && year.verdict.is_potentially_valid;
    ExpirationDateVerification::new(false, potential, None, None)
}

fn parse_date(value: &str, today: NaiveDate) -> ParsedDate {
    let parts = if ISO_MONTH.is_match(value) {
        Some(value.rsplit('-').map(str::to_string).collect::<Vec<_>>())
    } else if value.contains('/') {
        Some(SLASH_SEPARATOR.split(value).map(str::to_string).collect())
    } else if value.chars().any(char::is_whitespace) {
        Some(SPACES.split(value).map(str::to_string).collect())
    } else {
        None
    };

    if let Some(parts) = parts {
        let month = parts.first().cloned().unwrap_or_default();
        let year = parts.get(1..).map(|rest| rest.join(",")).unwrap_or_default();
        return ParsedDate { month, year };
    }

    let month_digits = month_digit_count(value, today);
    let month = value.chars().take(month_digits).collect::<String>();
    let year = value
        .chars()
        .skip(month.chars().count())
        .take(4)
        .collect::<String>();
    ParsedDate { month, year }
}

/// How many leading digits of an unseparated date belong to the month.
fn month_digit_count(value: &str, today: NaiveDate) -> usize {
    let mut chars = value.chars();
    let first = chars.next().and_then(|ch| ch.to_digit(10));
    let second = chars.next().and_then(|ch| ch.to_digit(10));

    match first {
        Some(0) => return 2,
        Some(digit) if digit > 1 => return 1,
        Some(1) if second.is_some_and(|digit| digit > 2) => return 1,
        Some(1) => {
            let assumed_year = value.chars().skip(1).collect::<String>();
            let year = expiration_year(&assumed_year, DEFAULT_YEARS_IN_FUTURE, today);
            return if year.verdict.is_potentially_valid { 1 } else { 2 };
        }
        _ => {}
    }

    match value.chars().count() {
        5 => 1,
        len if len > 5 => 2,
        _ => 1,
    }
}

fn expiration_month(value: &str, today: NaiveDate) -> MonthCheck {
    let rejected = |potential| MonthCheck {
        verdict: Verification::new(false, potential),
        is_valid_for_this_year: false,
    };

    if value.chars().all(char::is_whitespace) || value == "0" {
        return rejected(true);
    }
    if !is_digits(value) {
        return rejected(false);
    }
    let Ok(month) = value.parse::<u32>() else {
        return rejected(false);
    };

    let valid = (1..=12).contains(&month);
    MonthCheck {
        verdict: Verification::new(valid, valid),
        is_valid_for_this_year: valid && month >= today.month(),
    }
}

fn expiration_year(value: &str, max_elapsed_years: usize, today: NaiveDate) -> YearCheck {
    let rejected = |potential| YearCheck {
        verdict: Verification::new(false, potential),
        is_current_year: false,
    };

    if value.chars().all(char::is_whitespace) {
        return rejected(true);
    }
    if !is_digits(value) {
        return rejected(false);
    }
    let len = value.len();
    if len < 2 {
        return rejected(true);
    }

    let current_year = i64::from(today.year());
    let current = current_year.to_string();
    if len == 3 {
        return rejected(value.get(..2) == current.get(..2));
    }
    if len > 4 {
        return rejected(false);
    }

    let Ok(numeric) = value.parse::<i64>() else {
        return rejected(false);
    };
    let max_elapsed_years = i64::try_from(max_elapsed_years).unwrap_or(i64::MAX / 2);

    let (valid, is_current_year) = if len == 2 {
        if current.get(..2) == Some(value) {
            return rejected(true);
        }
        let two_digit_year = current_year % 100;
        (
            numeric >= two_digit_year && numeric <= two_digit_year + max_elapsed_years,
            numeric == two_digit_year,
        )
    } else {
        (
            numeric >= current_year && numeric <= current_year + max_elapsed_years,
            numeric == current_year,
        )
    };

    YearCheck {
        verdict: Verification::new(valid, valid),
        is_current_year,
    }
}

pub(super) fn cvv(value: &str, sizes: &[usize]) -> Verification {
    let default_sizes = [DEFAULT_CVV_LENGTH];
    let sizes = if sizes.is_empty() {
        &default_sizes[..]
    } else {
        sizes
    };

    if !is_digits(value) {
        return Verification::new(false, false);
    }
    let len = value.chars().count();
    if sizes.contains(&len) {
        return Verification::new(true, true);
    }
    let min = sizes.iter().copied().min().unwrap_or(DEFAULT_CVV_LENGTH);
    let max = sizes.iter().copied().max().unwrap_or(DEFAULT_CVV_LENGTH);
    if len < min {
        return Verification::new(false, true);
    }
    if len > max {
        return Verification::new(false, false);
    }
    Verification::new(true, true)
}

pub(super) fn postal_code(value: &str, min_length: Option<usize>) -> Verification {
    let min_length = min_length
        .filter(|min| *min > 0)
        .unwrap_or(DEFAULT_MIN_POSTAL_CODE_LENGTH);

    if value.chars().count() < min_length {
        return Verification::new(false, true);
    }
    let head = value.trim().chars().take(min_length).collect::<String>();
    if head.is_empty() || !head.chars().all(|ch| ch.is_ascii_alphanumeric()) {
        return Verification::new(false, true);
    }
    Verification::new(true, true)
}

pub(super) fn cardholder_name(value: &str) -> Verification {
    let len = value.chars().count();
    if len == 0 {
        return Verification::new(false, true);
    }
    if len > MAX_CARDHOLDER_NAME_LENGTH {
        return Verification::new(false, false);
    }
    if CARD_NUMBER_LIKE.is_match(value) {
        return Verification::new(false, true);
    }
    Verification::new(true, true)
}
