use ratatui::style::{Color, Modifier, Style};

/// Caller-supplied look of the card row, with an `_error` variant for each
/// part that is patched on top while the error highlight is shown.
#[derive(Debug, Clone, PartialEq)]
pub struct CardStyle {
    pub container: Style,
    pub container_error: Style,
    pub field: Style,
    pub field_error: Style,
    pub arrow: Style,
    pub arrow_error: Style,
    pub icon: Style,
    pub placeholder: Option<Color>,
    pub placeholder_error: Option<Color>,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            container: Style::default(),
            container_error: Style::default().fg(Color::LightRed),
            field: Style::default(),
            field_error: Style::default(),
            arrow: Style::default().fg(Color::Gray),
            arrow_error: Style::default(),
            icon: Style::default().add_modifier(Modifier::BOLD),
            placeholder: Some(Color::DarkGray),
            placeholder_error: None,
        }
    }
}

impl CardStyle {
    pub fn container_style(&self, error_shown: bool) -> Style {
        if error_shown {
            self.container.patch(self.container_error)
        } else {
            self.container
        }
    }

    pub fn field_style(&self, is_valid: bool, error_shown: bool) -> Style {
        let style = self.field;
        if is_valid || !error_shown {
            return style;
        }
        style.patch(text_part(self.container_error)).patch(self.field_error)
    }

    pub fn placeholder_color(&self, is_valid: bool, error_shown: bool) -> Option<Color> {
        if is_valid || !error_shown {
            return self.placeholder;
        }
        self.placeholder_error
            .or(self.field_error.fg)
            .or(self.container_error.fg)
            .or(self.placeholder)
    }

    pub fn placeholder_style(&self, is_valid: bool, error_shown: bool) -> Style {
        let style = Style::default();
        match self.placeholder_color(is_valid, error_shown) {
            Some(color) => style.fg(color),
            None => style.add_modifier(Modifier::DIM),
        }
    }

    pub fn arrow_color(&self, error_shown: bool) -> Option<Color> {
        if error_shown {
            self.arrow_error.fg.or(self.arrow.fg)
        } else {
            self.arrow.fg
        }
    }

    pub fn arrow_style(&self, error_shown: bool) -> Style {
        let mut style = self.arrow;
        if error_shown {
            style = style.patch(self.arrow_error);
        }
        style.fg = self.arrow_color(error_shown);
        style
    }
}

fn text_part(style: Style) -> Style {
    Style {
        bg: None,
        ..style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_falls_back_through_error_colors() {
        let mut style = CardStyle {
            placeholder: Some(Color::Gray),
            placeholder_error: Some(Color::Magenta),
            field_error: Style::default().fg(Color::Yellow),
            container_error: Style::default().fg(Color::Red),
            ..CardStyle::default()
        };
        assert_eq!(style.placeholder_color(false, false), Some(Color::Gray));
        assert_eq!(style.placeholder_color(true, true), Some(Color::Gray));
        assert_eq!(style.placeholder_color(false, true), Some(Color::Magenta));

        style.placeholder_error = None;
        assert_eq!(style.placeholder_color(false, true), Some(Color::Yellow));
        style.field_error = Style::default();
        assert_eq!(style.placeholder_color(false, true), Some(Color::Red));
        style.container_error = Style::default();
        assert_eq!(style.placeholder_color(false, true), Some(Color::Gray));
        style.placeholder = None;
        assert_eq!(style.placeholder_color(false, true), None);
    }

    #[test]
    fn invalid_fields_pick_up_error_style_only_while_shown() {
        let style = CardStyle {
            field: Style::default().fg(Color::White),
            field_error: Style::default().add_modifier(Modifier::UNDERLINED),
            container_error: Style::default().fg(Color::Red).bg(Color::Black),
            ..CardStyle::default()
        };
        assert_eq!(style.field_style(false, false).fg, Some(Color::White));
        assert_eq!(style.field_style(true, true).fg, Some(Color::White));

        let invalid = style.field_style(false, true);
        assert_eq!(invalid.fg, Some(Color::Red));
        assert_eq!(invalid.bg, None);
        assert!(invalid.add_modifier.contains(Modifier::UNDERLINED));
    }

    #[test]
    fn arrow_color_prefers_error_variant() {
        let style = CardStyle {
            arrow: Style::default().fg(Color::Blue),
            arrow_error: Style::default().fg(Color::Red),
            ..CardStyle::default()
        };
        assert_eq!(style.arrow_color(false), Some(Color::Blue));
        assert_eq!(style.arrow_color(true), Some(Color::Red));

        let plain = CardStyle {
            arrow: Style::default().fg(Color::Blue),
            arrow_error: Style::default(),
            ..CardStyle::default()
        };
        assert_eq!(plain.arrow_color(true), Some(Color::Blue));
        assert_eq!(plain.arrow_style(true).fg, Some(Color::Blue));
    }
}
