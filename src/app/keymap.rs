use std::sync::LazyLock;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use super::input::KeyCommand;

macro_rules! keymap_source {
    () => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/keymap/default.keymap.json"
        ))
    };
}

#[derive(Deserialize)]
struct RawEntry {
    id: String,
    description: String,
    action: RawAction,
    combos: Vec<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum RawAction {
    Submit,
    Quit,
    ResetStatus,
    FieldStep { delta: i32 },
    Scroll { delta: i32 },
}

impl RawAction {
    fn into_command(self) -> KeyCommand {
        match self {
            RawAction::Submit => KeyCommand::Submit,
            RawAction::Quit => KeyCommand::Quit,
            RawAction::ResetStatus => KeyCommand::ResetStatus,
            RawAction::FieldStep { delta } if delta < 0 => KeyCommand::PrevField,
            RawAction::FieldStep { .. } => KeyCommand::NextField,
            RawAction::Scroll { delta } => KeyCommand::PressArrow(delta.signum()),
        }
    }
}

struct KeyBinding {
    command: KeyCommand,
    combos: Vec<KeyPattern>,
    snippet: String,
}

impl KeyBinding {
    fn from_raw(raw: RawEntry) -> Self {
        let combos = raw
            .combos
            .iter()
            .map(|combo| {
                KeyPattern::parse(combo).unwrap_or_else(|err| {
                    panic!("failed to parse combo '{combo}' for {}: {err}", raw.id)
                })
            })
            .collect::<Vec<_>>();
        assert!(
            !combos.is_empty(),
            "keymap entry {} must declare combos",
            raw.id
        );
        let combos_display = combos
            .iter()
            .map(|pattern| pattern.display.as_str())
            .collect::<Vec<_>>()
            .join("/");
        Self {
            command: raw.action.into_command(),
            snippet: format!("{combos_display} {}", raw.description),
            combos,
        }
    }

    fn matches(&self, key: &KeyEvent) -> Option<KeyCommand> {
        self.combos
            .iter()
            .any(|pattern| pattern.matches(key))
            .then_some(self.command)
    }
}

struct KeyPattern {
    matcher: CodeMatcher,
    required: KeyModifiers,
    allow_shift: bool,
    display: String,
}

impl KeyPattern {
    fn parse(spec: &str) -> Result<Self, String> {
        let display = spec.trim().to_string();
        let mut tokens = display
            .split('+')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect::<Vec<_>>();
        let Some(key_token) = tokens.pop() else {
            return Err("combo must contain key".into());
        };
        let matcher = CodeMatcher::from_token(key_token)?;
        let mut required = KeyModifiers::empty();
        for token in tokens {
            match token.to_lowercase().as_str() {
                "ctrl" | "control" => required |= KeyModifiers::CONTROL,
                "shift" => required |= KeyModifiers::SHIFT,
                "alt" => required |= KeyModifiers::ALT,
                other => return Err(format!("unsupported modifier '{other}'")),
            }
        }
        let allow_shift = matcher.allows_extra_shift() && !required.contains(KeyModifiers::SHIFT);
        Ok(Self {
            matcher,
            required,
            allow_shift,
            display,
        })
    }

    fn matches(&self, key: &KeyEvent) -> bool {
        if !self.matcher.matches(&key.code) || !key.modifiers.contains(self.required) {
            return false;
        }
        let mut extra = key.modifiers - self.required;
        if self.allow_shift {
            extra -= KeyModifiers::SHIFT;
        }
        extra.is_empty()
    }
}

enum CodeMatcher {
    Literal(KeyCode),
    Alpha(char),
}

impl CodeMatcher {
    fn from_token(token: &str) -> Result<Self, String> {
        let normalized = token.to_lowercase();
        let matcher = match normalized.as_str() {
            "tab" => CodeMatcher::Literal(KeyCode::Tab),
            "backtab" => CodeMatcher::Literal(KeyCode::BackTab),
            "enter" => CodeMatcher::Literal(KeyCode::Enter),
            "esc" | "escape" => CodeMatcher::Literal(KeyCode::Esc),
            "left" => CodeMatcher::Literal(KeyCode::Left),
            "right" => CodeMatcher::Literal(KeyCode::Right),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => CodeMatcher::Alpha(ch),
                    _ => return Err(format!("unsupported key '{token}'")),
                }
            }
        };
        Ok(matcher)
    }

    fn matches(&self, code: &KeyCode) -> bool {
        match (self, code) {
            (CodeMatcher::Literal(expected), actual) => actual == expected,
            (CodeMatcher::Alpha(expected), KeyCode::Char(actual)) => {
                actual.to_ascii_lowercase() == *expected
            }
            _ => false,
        }
    }

    fn allows_extra_shift(&self) -> bool {
        matches!(
            self,
            CodeMatcher::Alpha(_) | CodeMatcher::Literal(KeyCode::BackTab)
        )
    }
}

static KEYMAP: LazyLock<Vec<KeyBinding>> = LazyLock::new(|| {
    let raw_entries: Vec<RawEntry> =
        serde_json::from_str(keymap_source!()).expect("invalid keymap/default.keymap.json");
    raw_entries.into_iter().map(KeyBinding::from_raw).collect()
});

static HELP_TEXT: LazyLock<String> = LazyLock::new(|| {
    KEYMAP
        .iter()
        .map(|binding| binding.snippet.as_str())
        .collect::<Vec<_>>()
        .join(" • ")
});

pub(super) fn classify_key(key: &KeyEvent) -> Option<KeyCommand> {
    KEYMAP.iter().find_map(|binding| binding.matches(key))
}

pub(super) fn help_text() -> &'static str {
    HELP_TEXT.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patterns_reject_unknown_parts() {
        assert!(KeyPattern::parse("Hyper+S").is_err());
        assert!(KeyPattern::parse("PageDown").is_err());
        assert!(KeyPattern::parse("+").is_err());
    }

    #[test]
    fn ctrl_letter_tolerates_shift_only() {
        let pattern = KeyPattern::parse("Ctrl+S").unwrap();
        let shifted = KeyEvent::new(
            KeyCode::Char('S'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        let alt = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert!(pattern.matches(&shifted));
        assert!(!pattern.matches(&alt));
        assert!(!pattern.matches(&KeyEvent::new(KeyCode::Char('s'), KeyModifiers::NONE)));
    }

    #[test]
    fn help_lists_every_binding() {
        let help = help_text();
        assert!(help.starts_with("Enter/Ctrl+S Submit"));
        assert!(help.contains("Ctrl+Q/Ctrl+C Quit"));
        assert!(help.contains("Ctrl+Left Scroll left"));
        assert_eq!(help.matches(" • ").count(), KEYMAP.len() - 1);
    }
}
