use std::fmt;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use unicode_width::UnicodeWidthStr;

use crate::validator::{ValidatorParams, Verdict};

use super::format::Formatter;

pub type ValidatorFn<V> = Arc<dyn Fn(&str, &ValidatorParams) -> V + Send + Sync>;

/// Sibling the owner should move focus to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMove {
    Prev,
    Next,
}

/// Outcome of routing one key press to a field.
#[derive(Debug, Clone)]
pub struct FieldResponse<V> {
    pub handled: bool,
    /// Verdict of the new text, present whenever the text changed.
    pub changed: Option<V>,
    pub focus: Option<FocusMove>,
}

impl<V> FieldResponse<V> {
    fn ignored() -> Self {
        Self {
            handled: false,
            changed: None,
            focus: None,
        }
    }

    fn handled() -> Self {
        Self {
            handled: true,
            ..Self::ignored()
        }
    }
}

/// Read/write handle over one field of the card form.
pub trait FieldInstance<V: Verdict> {
    /// `false` until the field has been validated once.
    fn is_valid(&self) -> bool;
    fn value(&self) -> &str;
    fn validity(&self) -> Option<&V>;
    fn validator_params(&self) -> &ValidatorParams;
    fn set_validator_params<P: Into<ValidatorParams>>(&mut self, params: P);
}

/// One text cell bound to a formatter and a validator.
pub struct Field<V> {
    validator: ValidatorFn<V>,
    format: Formatter<V>,
    text: String,
    cursor: usize,
    prev_text_len: usize,
    max_length: Option<usize>,
    params: ValidatorParams,
    validated_text: String,
    verdict: Option<V>,
}

impl<V: Verdict> Field<V> {
    pub fn new(validator: ValidatorFn<V>, format: Formatter<V>) -> Self {
        Self {
            validator,
            format,
            text: String::new(),
            cursor: 0,
            prev_text_len: 0,
            max_length: None,
            params: ValidatorParams::new(),
            validated_text: String::new(),
            verdict: None,
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Caret position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display columns in front of the caret.
    pub fn cursor_column(&self) -> usize {
        let before = self.text.chars().take(self.cursor).collect::<String>();
        before.width()
    }

    pub fn max_length(&self) -> Option<usize> {
        self.max_length
    }

    pub fn set_max_length(&mut self, max_length: Option<usize>) {
        self.max_length = max_length;
    }

    pub fn set_cursor(&mut self, cursor: usize) -> Option<FocusMove> {
        self.cursor = cursor.min(self.len());
        self.selection_change()
    }

    /// Replaces the whole text as if it had been typed, caret at the end.
    pub fn change_text(&mut self, raw: &str) -> V {
        let verdict = self.commit(raw);
        self.cursor = self.len();
        verdict
    }

    /// Drops text, caret and verdict; validator params are kept.
    pub fn reset(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.prev_text_len = 0;
        self.validated_text.clear();
        self.verdict = None;
    }

    pub fn handle_key(&mut self, key: &KeyEvent) -> FieldResponse<V> {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return FieldResponse::ignored();
        }

        match key.code {
            KeyCode::Char(ch) => {
                if self.max_length.is_some_and(|max| self.len() >= max) {
                    return FieldResponse::handled();
                }
                let mut raw = self.text.chars().take(self.cursor).collect::<String>();
                raw.push(ch);
                raw.extend(self.text.chars().skip(self.cursor));
                self.edit(raw, self.cursor + 1)
            }
            KeyCode::Backspace => {
                if self.text.is_empty() {
                    return FieldResponse {
                        focus: Some(FocusMove::Prev),
                        ..FieldResponse::handled()
                    };
                }
                if self.cursor == 0 {
                    return FieldResponse::handled();
                }
                let raw = self
                    .text
                    .chars()
                    .enumerate()
                    .filter(|(index, _)| *index + 1 != self.cursor)
                    .map(|(_, ch)| ch)
                    .collect::<String>();
                self.edit(raw, self.cursor - 1)
            }
            KeyCode::Delete => self.edit(String::new(), 0),
            KeyCode::Left => self.move_cursor(self.cursor.saturating_sub(1)),
            KeyCode::Right => self.move_cursor(self.cursor + 1),
            KeyCode::Home => self.move_cursor(0),
            KeyCode::End => self.move_cursor(self.len()),
            _ => FieldResponse::ignored(),
        }
    }

    fn edit(&mut self, raw: String, raw_cursor: usize) -> FieldResponse<V> {
        let at_end = raw_cursor >= raw.chars().count();
        let significant = raw
            .chars()
            .take(raw_cursor)
            .filter(|ch| ch.is_alphanumeric())
            .count();

        let verdict = self.commit(&raw);
        self.cursor = if at_end {
            self.len()
        } else if raw == self.text {
            raw_cursor
        } else {
            position_after(&self.text, significant)
        };

        FieldResponse {
            handled: true,
            changed: Some(verdict),
            focus: self.selection_change(),
        }
    }

    fn move_cursor(&mut self, cursor: usize) -> FieldResponse<V> {
        FieldResponse {
            focus: self.set_cursor(cursor),
            ..FieldResponse::handled()
        }
    }

    fn commit(&mut self, raw: &str) -> V {
        let validator = Arc::clone(&self.validator);
        let mut validated: Option<(String, V)> = None;
        let formatted = {
            let params = &self.params;
            let mut validate = |text: Option<&str>| {
                let text = text.unwrap_or(raw);
                let verdict = validator(text, params);
                validated = Some((text.to_string(), verdict.clone()));
                verdict
            };
            (self.format)(raw, &mut validate)
        };
        let (validated_text, verdict) =
            validated.unwrap_or_else(|| (raw.to_string(), validator(raw, &self.params)));

        self.prev_text_len = self.len();
        self.text = formatted;
        self.validated_text = validated_text;
        self.verdict = Some(verdict.clone());
        verdict
    }

    /// Auto-advance: the text just grew to `max_length` and the caret sits
    /// on the last position.
    fn selection_change(&self) -> Option<FocusMove> {
        let len = self.len();
        let max = self.max_length?;
        (self.prev_text_len < len && self.cursor == max && max == len).then_some(FocusMove::Next)
    }
}

impl<V: Verdict> FieldInstance<V> for Field<V> {
    fn is_valid(&self) -> bool {
        self.verdict.as_ref().is_some_and(Verdict::is_valid)
    }

    fn value(&self) -> &str {
        &self.text
    }

    fn validity(&self) -> Option<&V> {
        self.verdict.as_ref()
    }

    fn validator_params(&self) -> &ValidatorParams {
        &self.params
    }

    fn set_validator_params<P: Into<ValidatorParams>>(&mut self, params: P) {
        self.params = params.into();
        if self.verdict.is_some() {
            self.verdict = Some((self.validator)(&self.validated_text, &self.params));
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for Field<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("text", &self.text)
            .field("cursor", &self.cursor)
            .field("prev_text_len", &self.prev_text_len)
            .field("max_length", &self.max_length)
            .field("params", &self.params)
            .field("verdict", &self.verdict)
            .finish_non_exhaustive()
    }
}

fn position_after(text: &str, significant: usize) -> usize {
    if significant == 0 {
        return 0;
    }
    let mut seen = 0;
    for (index, ch) in text.chars().enumerate() {
        if ch.is_alphanumeric() {
            seen += 1;
            if seen == significant {
                return index + 1;
            }
        }
    }
    text.chars().count()
}
