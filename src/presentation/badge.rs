use std::{collections::HashMap, str::FromStr, sync::LazyLock};

use ratatui::style::Color;
use serde::Deserialize;

macro_rules! badges_source {
    () => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/brands/badges.json"))
    };
}

const FALLBACK_TYPE: &str = "unknown";

/// Terminal stand-in for a brand logo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub color: Color,
}

#[derive(Deserialize)]
struct RawBadge {
    label: String,
    color: String,
}

static BADGES: LazyLock<HashMap<String, Badge>> = LazyLock::new(|| {
    let raw: HashMap<String, RawBadge> =
        serde_json::from_str(badges_source!()).expect("invalid brands/badges.json");
    raw.into_iter()
        .map(|(brand, badge)| {
            let color = Color::from_str(&badge.color).unwrap_or(Color::Reset);
            (
                brand,
                Badge {
                    label: badge.label,
                    color,
                },
            )
        })
        .collect()
});

static PLAIN: LazyLock<Badge> = LazyLock::new(|| Badge {
    label: "CARD".to_string(),
    color: Color::Reset,
});

pub fn badge_for(brand_type: &str) -> &'static Badge {
    BADGES
        .get(brand_type)
        .or_else(|| BADGES.get(FALLBACK_TYPE))
        .unwrap_or_else(|| &*PLAIN)
}
