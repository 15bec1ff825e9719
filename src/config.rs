//! Per-page and per-site settings for [`SchemaGenerator`](crate::SchemaGenerator).

use serde::{Deserialize, Serialize};
use url::Url;

/// Where the page lives and what the site is called. Deserializes from JSON
/// with every field optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// The page being described; absolute or site-relative.
    pub page_url: String,
    /// Site root that relative links are resolved against.
    pub site_url: String,
    pub site_name: String,
    /// BCP 47 tag used for `inLanguage`.
    pub language: String,
    /// Currency code used for every offer.
    pub currency: String,
    /// Postal address of the business, if it should be published.
    pub address: Option<PostalAddressConfig>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            page_url: String::new(),
            site_url: String::new(),
            site_name: String::new(),
            language: "ru-RU".to_string(),
            currency: "RUR".to_string(),
            address: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalAddressConfig {
    pub locality: Option<String>,
    pub street: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

impl GeneratorConfig {
    pub fn new(
        page_url: impl Into<String>,
        site_url: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            page_url: page_url.into(),
            site_url: site_url.into(),
            site_name: site_name.into(),
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_address(mut self, address: PostalAddressConfig) -> Self {
        self.address = Some(address);
        self
    }

    /// The page path relative to the site root, without the leading `/`:
    /// `https://shop.example/news/12` gives `news/12`.
    pub fn page_path(&self) -> String {
        match Url::parse(&self.page_url) {
            Ok(url) if url.has_host() => url.path().trim_start_matches('/').to_string(),
            _ => self.page_url.trim_start_matches('/').to_string(),
        }
    }
}
