#[derive(Debug, Clone)]
pub struct CatalogError {
    pub brand: String,
    pub message: String,
}

impl CatalogError {
    pub(crate) fn invalid(brand: &str, message: impl Into<String>) -> Self {
        Self {
            brand: brand.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn unknown_brand(brand: &str) -> Self {
        Self::invalid(brand, "brand is not part of the catalog")
    }

    pub(crate) fn parse(err: serde_json::Error) -> Self {
        Self::invalid("<catalog>", format!("failed to parse brand table: {err}"))
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.brand, self.message)
    }
}

impl std::error::Error for CatalogError {}
