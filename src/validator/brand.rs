use std::sync::LazyLock;

use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

use super::error::CatalogError;

macro_rules! brands_source {
    () => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/brands/default.brands.json"
        ))
    };
}

pub(crate) const UNKNOWN_TYPE: &str = "unknown";
const UNION_PAY_TYPE: &str = "unionpay";

/// A BIN prefix or an inclusive BIN range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Pattern {
    Prefix(u64),
    Range(u64, u64),
}

impl Pattern {
    /// Partial match: a number shorter than the pattern matches when it is a
    /// prefix of it.
    fn matches(&self, digits: &str) -> bool {
        match *self {
            Pattern::Prefix(prefix) => {
                let prefix = prefix.to_string();
                let len = prefix.len().min(digits.len());
                prefix[..len] == digits[..len]
            }
            Pattern::Range(min, max) => {
                let min = min.to_string();
                let max = max.to_string();
                let len = min.len().min(digits.len());
                let (Ok(value), Ok(min), Ok(max)) = (
                    digits[..len].parse::<u64>(),
                    min[..len].parse::<u64>(),
                    max.get(..len).unwrap_or(&max).parse::<u64>(),
                ) else {
                    return false;
                };
                (min..=max).contains(&value)
            }
        }
    }

    fn strength(&self) -> usize {
        match *self {
            Pattern::Prefix(prefix) => prefix.to_string().len(),
            Pattern::Range(min, _) => min.to_string().len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityCode {
    pub name: String,
    pub size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandInfo {
    pub nice_type: String,
    #[serde(rename = "type")]
    pub brand_type: String,
    pub patterns: Vec<Pattern>,
    pub gaps: Vec<usize>,
    pub lengths: Vec<usize>,
    pub code: SecurityCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_strength: Option<usize>,
}

impl BrandInfo {
    /// Fallback used whenever detection does not settle on a single brand.
    pub fn unknown() -> Self {
        Self {
            nice_type: "Unknown".to_string(),
            brand_type: UNKNOWN_TYPE.to_string(),
            patterns: Vec::new(),
            gaps: vec![4, 8, 12],
            lengths: vec![16],
            code: SecurityCode {
                name: "CVC".to_string(),
                size: 3,
            },
            match_strength: None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.brand_type == UNKNOWN_TYPE
    }

    pub(crate) fn is_union_pay(&self) -> bool {
        self.brand_type == UNION_PAY_TYPE
    }

    pub fn max_length(&self) -> usize {
        self.lengths.iter().copied().max().unwrap_or(0)
    }

    /// Longest formatted number: every digit plus one separator per gap.
    pub fn formatted_max_length(&self) -> usize {
        self.max_length() + self.gaps.len()
    }

    fn matching_pattern(&self, digits: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|pattern| pattern.matches(digits))
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.brand_type.trim().is_empty() {
            return Err(CatalogError::invalid("<unnamed>", "brand type is empty"));
        }
        if self.lengths.is_empty() {
            return Err(CatalogError::invalid(
                &self.brand_type,
                "at least one length is required",
            ));
        }
        if self.gaps.first() == Some(&0) || self.gaps.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(CatalogError::invalid(
                &self.brand_type,
                "gaps must be positive and strictly ascending",
            ));
        }
        if self.code.size == 0 {
            return Err(CatalogError::invalid(
                &self.brand_type,
                "security code size must be positive",
            ));
        }
        Ok(())
    }
}

/// Ordered brand table; order decides which brand wins ties.
#[derive(Debug, Clone, PartialEq)]
pub struct BrandCatalog {
    brands: IndexMap<String, BrandInfo>,
}

static DEFAULT_CATALOG: LazyLock<BrandCatalog> = LazyLock::new(|| {
    BrandCatalog::from_json(brands_source!()).expect("invalid brands/default.brands.json")
});

pub fn default_catalog() -> &'static BrandCatalog {
    &DEFAULT_CATALOG
}

impl Default for BrandCatalog {
    fn default() -> Self {
        default_catalog().clone()
    }
}

impl BrandCatalog {
    pub fn from_brands(brands: impl IntoIterator<Item = BrandInfo>) -> Self {
        let brands = brands
            .into_iter()
            .map(|brand| (brand.brand_type.clone(), brand))
            .collect();
        Self { brands }
    }

    /// Parses a JSON array of brands. Malformed entries are skipped with a
    /// warning; a document without any usable entry is rejected.
    pub fn from_json(source: &str) -> Result<Self, CatalogError> {
        let raw: Vec<BrandInfo> = serde_json::from_str(source).map_err(CatalogError::parse)?;
        let mut brands = IndexMap::new();
        for brand in raw {
            if let Err(err) = brand.check() {
                warn!("skipping brand entry: {err}");
                continue;
            }
            brands.insert(brand.brand_type.clone(), brand);
        }
        if brands.is_empty() {
            return Err(CatalogError::invalid("<catalog>", "no usable brand entries"));
        }
        Ok(Self { brands })
    }

    pub fn len(&self) -> usize {
        self.brands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    pub fn brand_types(&self) -> impl Iterator<Item = &str> {
        self.brands.keys().map(String::as_str)
    }

    pub fn type_info(&self, brand_type: &str) -> Option<&BrandInfo> {
        self.brands.get(brand_type)
    }

    /// Every brand whose patterns match the digit prefix, or the single
    /// strongest one when all matches carry a strength.
    pub fn detect(&self, digits: &str) -> Vec<BrandInfo> {
        if digits.is_empty() {
            return self.brands.values().cloned().collect();
        }
        if !digits.chars().all(|ch| ch.is_ascii_digit()) {
            return Vec::new();
        }

        let mut results = Vec::new();
        for brand in self.brands.values() {
            let Some(pattern) = brand.matching_pattern(digits) else {
                continue;
            };
            let mut matched = brand.clone();
            let strength = pattern.strength();
            if digits.len() >= strength {
                matched.match_strength = Some(strength);
            }
            results.push(matched);
        }

        match best_match(&results) {
            Some(index) => vec![results.swap_remove(index)],
            None => results,
        }
    }

    /// Adds a brand at the end of the order, or replaces an existing one in place.
    pub fn add_card(&mut self, brand: BrandInfo) -> Result<(), CatalogError> {
        brand.check()?;
        self.brands.insert(brand.brand_type.clone(), brand);
        Ok(())
    }

    pub fn update_card(
        &mut self,
        brand_type: &str,
        update: impl FnOnce(&mut BrandInfo),
    ) -> Result<(), CatalogError> {
        let Some(current) = self.brands.get(brand_type) else {
            return Err(CatalogError::unknown_brand(brand_type));
        };
        let mut updated = current.clone();
        update(&mut updated);
        if updated.brand_type != brand_type {
            return Err(CatalogError::invalid(
                brand_type,
                "cannot overwrite the brand type",
            ));
        }
        updated.check()?;
        self.brands.insert(brand_type.to_string(), updated);
        Ok(())
    }

    pub fn remove_card(&mut self, brand_type: &str) -> Result<BrandInfo, CatalogError> {
        self.brands
            .shift_remove(brand_type)
            .ok_or_else(|| CatalogError::unknown_brand(brand_type))
    }

    pub fn change_order(&mut self, brand_type: &str, position: usize) -> Result<(), CatalogError> {
        let Some(from) = self.brands.get_index_of(brand_type) else {
            return Err(CatalogError::unknown_brand(brand_type));
        };
        let to = position.min(self.brands.len() - 1);
        self.brands.move_index(from, to);
        Ok(())
    }
}

fn best_match(results: &[BrandInfo]) -> Option<usize> {
    if results.is_empty() || results.iter().any(|brand| brand.match_strength.is_none()) {
        return None;
    }
    let mut best = 0;
    for (index, brand) in results.iter().enumerate().skip(1) {
        if brand.match_strength > results[best].match_strength {
            best = index;
        }
    }
    Some(best)
}
