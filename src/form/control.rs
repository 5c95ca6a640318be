use std::fmt;
use std::sync::Arc;

use crossterm::event::KeyEvent;
use log::debug;
use ratatui::style::Style;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::validator::{
    BrandInfo, CardNumberVerification, CardValidator, ExpirationDateVerification,
    ValidatorParams, Verdict, Verification,
};

use super::field::{Field, FieldInstance, FocusMove, ValidatorFn};
use super::format;
use super::hook::{NoopValidationHook, ValidationHook};
use super::options::{FormLabels, FormOptions};
use super::scroll::ScrollState;
use super::style::CardStyle;

const EXPIRY_MAX_LENGTH: usize = 5;
const CARD_HOLDER_MAX_LENGTH: usize = 255;
const POSTAL_CODE_MAX_LENGTH: usize = 6;
const CELL_GAP: u16 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Number,
    Expiry,
    Cvc,
    CardHolder,
    PostalCode,
}

impl FieldId {
    pub const ALL: [FieldId; 5] = [
        FieldId::Number,
        FieldId::Expiry,
        FieldId::Cvc,
        FieldId::CardHolder,
        FieldId::PostalCode,
    ];

    /// Width of the cell in characters, before the placeholder is considered.
    fn width_scale(self, card: &BrandInfo) -> usize {
        match self {
            FieldId::Number => card.formatted_max_length(),
            FieldId::Expiry => EXPIRY_MAX_LENGTH,
            FieldId::Cvc => card.code.size,
            FieldId::CardHolder => 20,
            FieldId::PostalCode => POSTAL_CODE_MAX_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExpiryValue {
    pub month: u32,
    pub year: u32,
}

/// Normalised card details; hidden fields are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CardValue {
    pub number: String,
    pub expired: ExpiryValue,
    pub cvc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_holder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// Handle over the whole card form.
pub trait CardInstance {
    fn is_valid(&self) -> bool;
    /// Shows or hides the error highlight. The form itself only ever clears it.
    fn set_validation_error(&mut self, shown: bool);
    /// `None` while the card number is empty.
    fn value(&self) -> Option<CardValue>;
}

/// Horizontal placement of one visible cell inside the scrollable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSlot {
    pub id: FieldId,
    pub offset: u16,
    pub width: u16,
}

pub struct CardForm {
    number: Field<CardNumberVerification>,
    expiry: Field<ExpirationDateVerification>,
    cvc: Field<Verification>,
    card_holder: Field<Verification>,
    postal_code: Field<Verification>,
    labels: FormLabels,
    show_card_holder: bool,
    show_postal_code: bool,
    style: CardStyle,
    hook: Box<dyn ValidationHook>,
    is_validation_error: bool,
    card: BrandInfo,
    focus: Option<FieldId>,
    scroll: ScrollState,
}

struct Fields {
    number: Field<CardNumberVerification>,
    expiry: Field<ExpirationDateVerification>,
    cvc: Field<Verification>,
    card_holder: Field<Verification>,
    postal_code: Field<Verification>,
}

impl Fields {
    fn bind(
        validator: &Arc<dyn CardValidator>,
        expiry_params: ValidatorParams,
        postal_code_params: ValidatorParams,
    ) -> Self {
        let mut expiry = Field::new(
            bind(validator, |validator, text, params| {
                validator.expiration_date(text, params)
            }),
            format::expiry,
        )
        .with_max_length(EXPIRY_MAX_LENGTH);
        expiry.set_validator_params(expiry_params);

        let mut postal_code = Field::new(
            bind(validator, |validator, text, params| {
                validator.postal_code(text, params)
            }),
            format::just_numbers,
        )
        .with_max_length(POSTAL_CODE_MAX_LENGTH);
        postal_code.set_validator_params(postal_code_params);

        Self {
            number: Field::new(
                bind(validator, |validator, text, params| {
                    validator.card_number(text, params)
                }),
                format::card_number,
            ),
            expiry,
            cvc: Field::new(
                bind(validator, |validator, text, params| validator.cvv(text, params)),
                format::just_numbers,
            ),
            card_holder: Field::new(
                bind(validator, |validator, text, params| {
                    validator.cardholder_name(text, params)
                }),
                format::unchanged,
            )
            .with_max_length(CARD_HOLDER_MAX_LENGTH),
            postal_code,
        }
    }
}

fn bind<V: 'static>(
    validator: &Arc<dyn CardValidator>,
    check: fn(&dyn CardValidator, &str, &ValidatorParams) -> V,
) -> ValidatorFn<V> {
    let validator = Arc::clone(validator);
    Arc::new(move |text: &str, params: &ValidatorParams| {
        check(validator.as_ref(), text, params)
    })
}

impl CardForm {
    pub fn new(validator: Arc<dyn CardValidator>, options: FormOptions) -> Self {
        let Fields {
            number,
            expiry,
            cvc,
            card_holder,
            postal_code,
        } = Fields::bind(
            &validator,
            options.max_elapsed_years.into(),
            options.postal_code_min_length.into(),
        );

        let mut form = Self {
            number,
            expiry,
            cvc,
            card_holder,
            postal_code,
            labels: options.labels,
            show_card_holder: options.show_card_holder,
            show_postal_code: options.show_postal_code,
            style: options.style,
            hook: Box::new(NoopValidationHook),
            is_validation_error: false,
            card: BrandInfo::unknown(),
            focus: None,
            scroll: ScrollState::new(),
        };
        form.apply_brand();
        form
    }

    /// Rebinds every field to `validator`. Entered text is dropped.
    pub fn set_validator(&mut self, validator: Arc<dyn CardValidator>) {
        let fields = Fields::bind(
            &validator,
            self.expiry.validator_params().clone(),
            self.postal_code.validator_params().clone(),
        );
        self.number = fields.number;
        self.expiry = fields.expiry;
        self.cvc = fields.cvc;
        self.card_holder = fields.card_holder;
        self.postal_code = fields.postal_code;
        self.card = BrandInfo::unknown();
        self.apply_brand();
    }

    pub fn set_validation_hook(&mut self, hook: impl ValidationHook + 'static) {
        self.hook = Box::new(hook);
    }

    pub fn number(&self) -> &Field<CardNumberVerification> {
        &self.number
    }

    pub fn expiry(&self) -> &Field<ExpirationDateVerification> {
        &self.expiry
    }

    pub fn cvc(&self) -> &Field<Verification> {
        &self.cvc
    }

    pub fn card_holder(&self) -> Option<&Field<Verification>> {
        self.show_card_holder.then_some(&self.card_holder)
    }

    pub fn postal_code(&self) -> Option<&Field<Verification>> {
        self.show_postal_code.then_some(&self.postal_code)
    }

    /// The detected brand, or the unknown sentinel.
    pub fn card(&self) -> &BrandInfo {
        &self.card
    }

    pub fn is_validation_error(&self) -> bool {
        self.is_validation_error
    }

    /// True once any visible field holds text.
    pub fn is_dirty(&self) -> bool {
        self.visible_fields()
            .into_iter()
            .any(|id| !self.text(id).is_empty())
    }

    pub fn focused(&self) -> Option<FieldId> {
        self.focus
    }

    pub fn scroll(&self) -> &ScrollState {
        &self.scroll
    }

    pub fn style(&self) -> &CardStyle {
        &self.style
    }

    pub fn labels(&self) -> &FormLabels {
        &self.labels
    }

    pub fn is_visible(&self, id: FieldId) -> bool {
        match id {
            FieldId::CardHolder => self.show_card_holder,
            FieldId::PostalCode => self.show_postal_code,
            _ => true,
        }
    }

    pub fn visible_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|id| self.is_visible(*id))
            .collect()
    }

    pub fn set_show_card_holder(&mut self, show: bool) {
        self.show_card_holder = show;
        if !show {
            self.card_holder.reset();
            self.unfocus(FieldId::CardHolder);
        }
    }

    pub fn set_show_postal_code(&mut self, show: bool) {
        self.show_postal_code = show;
        if !show {
            self.postal_code.reset();
            self.unfocus(FieldId::PostalCode);
        }
    }

    pub fn text(&self, id: FieldId) -> &str {
        match id {
            FieldId::Number => self.number.text(),
            FieldId::Expiry => self.expiry.text(),
            FieldId::Cvc => self.cvc.text(),
            FieldId::CardHolder => self.card_holder.text(),
            FieldId::PostalCode => self.postal_code.text(),
        }
    }

    pub fn placeholder(&self, id: FieldId) -> &str {
        match id {
            FieldId::Number => &*self.labels.number,
            FieldId::Expiry => &*self.labels.expiry,
            FieldId::Cvc => self.card.code.name.as_str(),
            FieldId::CardHolder => &*self.labels.card_holder,
            FieldId::PostalCode => &*self.labels.postal_code,
        }
    }

    pub fn field_is_valid(&self, id: FieldId) -> bool {
        match id {
            FieldId::Number => self.number.is_valid(),
            FieldId::Expiry => self.expiry.is_valid(),
            FieldId::Cvc => self.cvc.is_valid(),
            FieldId::CardHolder => self.card_holder.is_valid(),
            FieldId::PostalCode => self.postal_code.is_valid(),
        }
    }

    pub fn field_style(&self, id: FieldId) -> Style {
        self.style
            .field_style(self.field_is_valid(id), self.is_validation_error)
    }

    pub fn placeholder_style(&self, id: FieldId) -> Style {
        let is_valid = match id {
            FieldId::PostalCode => self.postal_code.is_empty() || self.postal_code.is_valid(),
            other => self.field_is_valid(other),
        };
        self.style
            .placeholder_style(is_valid, self.is_validation_error)
    }

    pub fn cursor_column(&self, id: FieldId) -> usize {
        match id {
            FieldId::Number => self.number.cursor_column(),
            FieldId::Expiry => self.expiry.cursor_column(),
            FieldId::Cvc => self.cvc.cursor_column(),
            FieldId::CardHolder => self.card_holder.cursor_column(),
            FieldId::PostalCode => self.postal_code.cursor_column(),
        }
    }

    /// Cell width including the border columns.
    pub fn cell_width(&self, id: FieldId) -> u16 {
        let inner = id
            .width_scale(&self.card)
            .max(self.placeholder(id).width())
            + 1;
        u16::try_from(inner + 2).unwrap_or(u16::MAX)
    }

    pub fn slots(&self) -> Vec<FieldSlot> {
        let mut offset = 0u16;
        let mut slots = Vec::with_capacity(FieldId::ALL.len());
        for id in self.visible_fields() {
            let width = self.cell_width(id);
            slots.push(FieldSlot { id, offset, width });
            offset = offset.saturating_add(width).saturating_add(CELL_GAP);
        }
        slots
    }

    pub fn content_width(&self) -> u16 {
        self.slots()
            .last()
            .map(|slot| slot.offset.saturating_add(slot.width))
            .unwrap_or(0)
    }

    /// Records the width available to the row, once per layout pass.
    pub fn measure(&mut self, viewport: u16) {
        self.scroll.set_viewport(viewport);
        self.scroll.set_content(self.content_width());
    }

    /// Replaces the text of a visible field as if it had been typed.
    pub fn set_text(&mut self, id: FieldId, raw: &str) {
        if !self.is_visible(id) {
            return;
        }
        match id {
            FieldId::Number => {
                let verdict = self.number.change_text(raw);
                self.number_changed(&verdict);
            }
            FieldId::Expiry => {
                self.expiry.change_text(raw);
                self.text_changed();
            }
            FieldId::Cvc => {
                self.cvc.change_text(raw);
                self.text_changed();
            }
            FieldId::CardHolder => {
                self.card_holder.change_text(raw);
                self.text_changed();
            }
            FieldId::PostalCode => {
                self.postal_code.change_text(raw);
                self.text_changed();
            }
        }
    }

    /// Routes a key press to the focused field. Returns `false` when no
    /// field consumed it.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        let Some(id) = self.focus else {
            return false;
        };
        let (handled, focus) = match id {
            FieldId::Number => {
                let response = self.number.handle_key(key);
                let mut focus = response.focus;
                if let Some(verdict) = response.changed {
                    self.number_changed(&verdict);
                    focus = self.number.set_cursor(self.number.cursor());
                }
                (response.handled, focus)
            }
            FieldId::Expiry => self.route_key(key, |form| &mut form.expiry),
            FieldId::Cvc => self.route_key(key, |form| &mut form.cvc),
            FieldId::CardHolder => self.route_key(key, |form| &mut form.card_holder),
            FieldId::PostalCode => self.route_key(key, |form| &mut form.postal_code),
        };
        if let Some(step) = focus {
            self.move_focus(id, step);
        }
        handled
    }

    /// Focuses the field at `column` of the row (viewport coordinates) and
    /// places the caret under the pointer.
    pub fn click(&mut self, column: u16) -> bool {
        let content_column = column.saturating_add(self.scroll.position());
        let Some(slot) = self
            .slots()
            .into_iter()
            .find(|slot| (slot.offset..slot.offset + slot.width).contains(&content_column))
        else {
            return false;
        };
        self.focus(slot.id);
        let caret = usize::from(content_column.saturating_sub(slot.offset + 1));
        let step = match slot.id {
            FieldId::Number => self.number.set_cursor(caret),
            FieldId::Expiry => self.expiry.set_cursor(caret),
            FieldId::Cvc => self.cvc.set_cursor(caret),
            FieldId::CardHolder => self.card_holder.set_cursor(caret),
            FieldId::PostalCode => self.postal_code.set_cursor(caret),
        };
        if let Some(step) = step {
            self.move_focus(slot.id, step);
        }
        true
    }

    pub fn focus(&mut self, id: FieldId) {
        if !self.is_visible(id) || self.focus == Some(id) {
            return;
        }
        debug!("focus moved to {id:?}");
        self.focus = Some(id);
        self.clear_validation_error();
        if let Some(slot) = self.slots().into_iter().find(|slot| slot.id == id) {
            self.scroll.scroll_into_view(slot.offset, slot.width);
        }
    }

    pub fn blur(&mut self) {
        self.focus = None;
    }

    pub fn focus_next_field(&mut self) {
        self.cycle_focus(1);
    }

    pub fn focus_prev_field(&mut self) {
        self.cycle_focus(-1);
    }

    /// Blurs every field, then scrolls half a viewport in `direction`.
    pub fn press_arrow(&mut self, direction: i32) {
        self.blur();
        self.scroll.scroll_by(direction.signum());
        debug!(
            "scrolled card row to column {}",
            self.scroll.position()
        );
    }

    pub fn next_of(&self, id: FieldId) -> Option<FieldId> {
        match id {
            FieldId::Number => Some(FieldId::Expiry),
            FieldId::Expiry => Some(FieldId::Cvc),
            FieldId::Cvc if self.show_card_holder => Some(FieldId::CardHolder),
            FieldId::Cvc | FieldId::CardHolder => {
                self.show_postal_code.then_some(FieldId::PostalCode)
            }
            FieldId::PostalCode => None,
        }
    }

    pub fn prev_of(&self, id: FieldId) -> Option<FieldId> {
        match id {
            FieldId::Number => None,
            FieldId::Expiry => Some(FieldId::Number),
            FieldId::Cvc => Some(FieldId::Expiry),
            FieldId::CardHolder => Some(FieldId::Cvc),
            FieldId::PostalCode if self.show_card_holder => Some(FieldId::CardHolder),
            FieldId::PostalCode => Some(FieldId::Cvc),
        }
    }

    fn move_focus(&mut self, from: FieldId, step: FocusMove) {
        let target = match step {
            FocusMove::Next => self.next_of(from),
            FocusMove::Prev => self.prev_of(from),
        };
        if let Some(target) = target {
            self.focus(target);
        }
    }

    fn cycle_focus(&mut self, delta: isize) {
        let visible = self.visible_fields();
        let len = visible.len() as isize;
        let next = match self
            .focus
            .and_then(|id| visible.iter().position(|candidate| *candidate == id))
        {
            Some(index) => (index as isize + delta).rem_euclid(len),
            None if delta < 0 => len - 1,
            None => 0,
        };
        if let Some(id) = visible.get(next as usize) {
            self.focus(*id);
        }
    }

    fn unfocus(&mut self, id: FieldId) {
        if self.focus == Some(id) {
            self.focus = None;
        }
    }

    fn route_key<V: Verdict>(
        &mut self,
        key: &KeyEvent,
        select: fn(&mut Self) -> &mut Field<V>,
    ) -> (bool, Option<FocusMove>) {
        let response = select(self).handle_key(key);
        if response.changed.is_some() {
            self.text_changed();
        }
        (response.handled, response.focus)
    }

    fn number_changed(&mut self, verdict: &CardNumberVerification) {
        let card = verdict.card.clone().unwrap_or_else(BrandInfo::unknown);
        if card.brand_type != self.card.brand_type {
            debug!(
                "card brand changed from {} to {}",
                self.card.brand_type, card.brand_type
            );
            self.card = card;
            self.apply_brand();
        }
        self.text_changed();
    }

    fn apply_brand(&mut self) {
        self.cvc.set_validator_params(self.card.code.size);
        self.cvc.set_max_length(Some(self.card.code.size));
        self.number
            .set_max_length(Some(self.card.formatted_max_length()));
    }

    fn text_changed(&mut self) {
        if self.is_validation_error {
            self.clear_validation_error();
        }
    }

    fn clear_validation_error(&mut self) {
        self.set_validation_error(false);
        self.hook.clear_validation();
    }
}

impl CardInstance for CardForm {
    fn is_valid(&self) -> bool {
        self.number.is_valid()
            && self.expiry.is_valid()
            && self.cvc.is_valid()
            && (!self.show_card_holder || self.card_holder.is_valid())
            && (!self.show_postal_code
                || self.postal_code.is_empty()
                || self.postal_code.is_valid())
    }

    fn set_validation_error(&mut self, shown: bool) {
        if self.is_validation_error != shown {
            debug!("validation error highlight {}", if shown { "on" } else { "off" });
        }
        self.is_validation_error = shown;
    }

    fn value(&self) -> Option<CardValue> {
        let number = self
            .number
            .text()
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>();
        if number.is_empty() {
            return None;
        }
        let verdict = self.expiry.validity();
        Some(CardValue {
            number,
            expired: ExpiryValue {
                month: leading_number(verdict.and_then(|v| v.month.as_deref())),
                year: leading_number(verdict.and_then(|v| v.year.as_deref())),
            },
            cvc: self.cvc.text().to_string(),
            card_holder: self
                .show_card_holder
                .then(|| self.card_holder.text().to_string()),
            postal_code: self
                .show_postal_code
                .then(|| self.postal_code.text().to_string()),
        })
    }
}

impl fmt::Debug for CardForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardForm")
            .field("number", &self.number)
            .field("expiry", &self.expiry)
            .field("cvc", &self.cvc)
            .field("card_holder", &self.card_holder)
            .field("postal_code", &self.postal_code)
            .field("show_card_holder", &self.show_card_holder)
            .field("show_postal_code", &self.show_postal_code)
            .field("is_validation_error", &self.is_validation_error)
            .field("card", &self.card.brand_type)
            .field("focus", &self.focus)
            .field("scroll", &self.scroll)
            .finish_non_exhaustive()
    }
}

/// Integer prefix of `text`, `0` when there is none.
fn leading_number(text: Option<&str>) -> u32 {
    text.map(str::trim_start)
        .map(|text| {
            text.chars()
                .take_while(char::is_ascii_digit)
                .collect::<String>()
        })
        .and_then(|digits| digits.parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;
    use crate::validator::DefaultValidator;

    fn form_with(options: FormOptions) -> CardForm {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        CardForm::new(Arc::new(DefaultValidator::new().with_today(today)), options)
    }

    fn form() -> CardForm {
        form_with(FormOptions::default())
    }

    fn press(form: &mut CardForm, code: KeyCode) {
        form.handle_key(&KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(form: &mut CardForm, text: &str) {
        for ch in text.chars() {
            press(form, KeyCode::Char(ch));
        }
    }

    #[test]
    fn composite_validity_example() {
        let mut form = form();
        form.set_text(FieldId::Number, "4111111111111111");
        form.set_text(FieldId::Expiry, "12/34");
        form.set_text(FieldId::Cvc, "123");
        assert!(form.is_valid());

        let value = form.value().expect("number entered");
        assert_eq!(value.number, "4111111111111111");
        assert_eq!(value.expired, ExpiryValue { month: 12, year: 34 });
        assert_eq!(value.cvc, "123");
        assert_eq!(value.card_holder, None);
    }

    #[test]
    fn value_is_none_without_number() {
        let mut form = form();
        form.set_text(FieldId::Expiry, "12/34");
        form.set_text(FieldId::Cvc, "123");
        assert_eq!(form.value(), None);
        assert!(!form.is_valid());
    }

    #[test]
    fn brand_drives_cvc_length() {
        let mut form = form();
        form.set_text(FieldId::Number, "4111");
        assert_eq!(form.card().nice_type, "Visa");
        assert_eq!(form.cvc().validator_params().as_slice(), &[3]);

        form.set_text(FieldId::Number, "3782");
        assert_eq!(form.card().brand_type, "american-express");
        assert_eq!(form.cvc().validator_params().as_slice(), &[4]);
        assert_eq!(form.cvc().max_length(), Some(4));
        assert_eq!(form.number().max_length(), Some(17));
        assert_eq!(form.placeholder(FieldId::Cvc), "CID");

        form.set_text(FieldId::Number, "");
        assert!(form.card().is_unknown());
        assert_eq!(form.number().max_length(), Some(19));
    }

    #[test]
    fn optional_fields_join_the_aggregate() {
        let mut form = form_with(FormOptions::default().with_card_holder(true).with_postal_code(true));
        form.set_text(FieldId::Number, "4111111111111111");
        form.set_text(FieldId::Expiry, "1234");
        form.set_text(FieldId::Cvc, "123");
        assert!(!form.is_valid(), "holder is required once shown");

        form.set_text(FieldId::CardHolder, "Jane Doe");
        assert!(form.is_valid(), "empty postal code is accepted");

        form.set_text(FieldId::PostalCode, "12");
        assert!(!form.is_valid());
        form.set_text(FieldId::PostalCode, "12345");
        assert!(form.is_valid());

        let value = form.value().unwrap();
        assert_eq!(value.card_holder.as_deref(), Some("Jane Doe"));
        assert_eq!(value.postal_code.as_deref(), Some("12345"));

        form.set_show_card_holder(false);
        assert!(form.card_holder().is_none());
        form.set_show_card_holder(true);
        assert_eq!(form.card_holder().map(Field::text), Some(""));
    }

    #[test]
    fn typing_advances_and_backspace_returns() {
        let mut form = form();
        form.focus(FieldId::Number);
        press(&mut form, KeyCode::Backspace);
        assert_eq!(form.focused(), Some(FieldId::Number), "nothing precedes the number");
        assert_eq!(form.text(FieldId::Number), "");

        type_text(&mut form, "4111111111111111");
        assert_eq!(form.focused(), Some(FieldId::Number), "visa allows 19 digits");

        form.focus(FieldId::Expiry);
        type_text(&mut form, "1234");
        assert_eq!(form.text(FieldId::Expiry), "12/34");
        assert_eq!(form.focused(), Some(FieldId::Cvc));

        type_text(&mut form, "123");
        assert_eq!(form.focused(), Some(FieldId::Cvc), "nothing follows the cvc");

        press(&mut form, KeyCode::Backspace);
        press(&mut form, KeyCode::Backspace);
        press(&mut form, KeyCode::Backspace);
        assert_eq!(form.focused(), Some(FieldId::Cvc));
        press(&mut form, KeyCode::Backspace);
        assert_eq!(form.focused(), Some(FieldId::Expiry));
    }

    #[test]
    fn amex_number_fills_and_advances() {
        let mut form = form();
        form.focus(FieldId::Number);
        type_text(&mut form, "378282246310005");
        assert_eq!(form.text(FieldId::Number), "3782 822463 10005");
        assert_eq!(form.focused(), Some(FieldId::Expiry));
    }

    #[test]
    fn focus_relations_skip_hidden_fields() {
        let form = form_with(FormOptions::default().with_postal_code(true));
        assert_eq!(form.next_of(FieldId::Cvc), Some(FieldId::PostalCode));
        assert_eq!(form.prev_of(FieldId::PostalCode), Some(FieldId::Cvc));
        assert_eq!(form.prev_of(FieldId::Number), None);

        let plain = self::form();
        assert_eq!(plain.next_of(FieldId::Cvc), None);
    }

    #[test]
    fn tab_cycles_visible_fields() {
        let mut form = form();
        form.focus_next_field();
        assert_eq!(form.focused(), Some(FieldId::Number));
        form.focus_prev_field();
        assert_eq!(form.focused(), Some(FieldId::Cvc));
        form.focus_next_field();
        assert_eq!(form.focused(), Some(FieldId::Number));
    }

    #[test]
    fn focus_and_edits_clear_the_error_flag() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let mut form = form();
        form.set_validation_hook(move || counter.set(counter.get() + 1));

        form.set_validation_error(true);
        form.set_text(FieldId::Cvc, "1");
        assert!(!form.is_validation_error());
        assert_eq!(calls.get(), 1);

        form.set_text(FieldId::Cvc, "12");
        assert_eq!(calls.get(), 1, "no error to clear");

        form.set_validation_error(true);
        form.focus(FieldId::Expiry);
        assert!(!form.is_validation_error());
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn arrows_blur_before_scrolling() {
        let mut form = form_with(FormOptions::default().with_card_holder(true).with_postal_code(true));
        form.measure(30);
        assert!(form.scroll().left_hidden());
        assert!(!form.scroll().right_hidden());

        form.focus(FieldId::Number);
        form.press_arrow(1);
        assert_eq!(form.focused(), None);
        assert_eq!(form.scroll().position(), 15);
        assert!(!form.scroll().left_hidden());
    }

    #[test]
    fn wide_viewport_hides_both_arrows() {
        let mut form = form();
        form.measure(200);
        assert!(form.scroll().left_hidden());
        assert!(form.scroll().right_hidden());
    }

    #[test]
    fn click_focuses_the_cell_under_the_pointer() {
        let mut form = form();
        form.measure(200);
        let expiry = form
            .slots()
            .into_iter()
            .find(|slot| slot.id == FieldId::Expiry)
            .unwrap();
        assert!(form.click(expiry.offset + 1));
        assert_eq!(form.focused(), Some(FieldId::Expiry));
        assert!(!form.click(500));
    }
}
