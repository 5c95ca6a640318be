//! Text formatters, one per field kind.
//!
//! A formatter turns the raw text of a cell into its displayed text. It may
//! call `validate` (with an override text, or `None` for the raw input) when
//! it needs the verdict to decide the layout; the card number does this to
//! learn the brand's digit grouping.

use crate::validator::{BrandInfo, CardNumberVerification};

pub type Formatter<V> = fn(&str, &mut dyn FnMut(Option<&str>) -> V) -> String;

pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

pub fn just_numbers<V>(raw: &str, _validate: &mut dyn FnMut(Option<&str>) -> V) -> String {
    digits(raw)
}

pub fn unchanged<V>(raw: &str, _validate: &mut dyn FnMut(Option<&str>) -> V) -> String {
    raw.to_string()
}

pub fn card_number(
    raw: &str,
    validate: &mut dyn FnMut(Option<&str>) -> CardNumberVerification,
) -> String {
    let digits = digits(raw);
    let card = validate(Some(&digits))
        .card
        .unwrap_or_else(BrandInfo::unknown);
    group_digits(&digits, &card.gaps)
}

/// Splits `digits` at every gap offset in ascending order, stopping once
/// the digits run out.
pub fn group_digits(digits: &str, gaps: &[usize]) -> String {
    let len = digits.len();
    let mut gaps = gaps.iter().copied().filter(|gap| *gap > 0).collect::<Vec<_>>();
    gaps.sort_unstable();
    gaps.dedup();
    let mut groups = Vec::with_capacity(gaps.len() + 1);
    let mut start = 0;
    for gap in gaps {
        groups.push(digits.get(start..gap.min(len)).unwrap_or_default());
        start = gap;
        if start >= len {
            break;
        }
    }
    if start < len {
        groups.push(&digits[start..]);
    }
    groups.join(" ")
}

/// `MMYY` digits rendered as `MM/YY`, padding a month that could not be
/// completed (`2`..`9`, `13`..`19`) with a leading zero.
pub fn expiry<V>(raw: &str, _validate: &mut dyn FnMut(Option<&str>) -> V) -> String {
    let digits = digits(raw);
    let without_zeros = digits.trim_start_matches('0');
    let mut text = if without_zeros.len() < digits.len() {
        format!("0{without_zeros}")
    } else {
        digits
    };

    let mut chars = text.chars();
    let (first, second) = (chars.next(), chars.next());
    if first.is_some_and(|ch| ch > '1') || (first == Some('1') && second.is_some_and(|ch| ch > '2'))
    {
        text.insert(0, '0');
    }

    text.truncate(4);
    if text.len() > 2 {
        return format!("{}/{}", &text[..2], &text[2..]);
    }
    text
}
