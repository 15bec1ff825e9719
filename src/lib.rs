//! Extracts a schema.org JSON-LD description from a rendered shop page.
//!
//! ```no_run
//! use schemagen::{GeneratorConfig, SchemaGenerator, inject_json_ld};
//!
//! let html = std::fs::read_to_string("page.html")?;
//! let config = GeneratorConfig::new("/catalog/", "https://shop.example", "Shop");
//! let generator = SchemaGenerator::new(config);
//! let payload = generator.as_string(&html)?;
//! let page = inject_json_ld(&html, &payload);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod error;
pub mod generator;
pub mod html;
pub mod query;
pub mod rules;
pub mod value;

pub use config::{GeneratorConfig, PostalAddressConfig};
pub use error::{ExtractError, QueryError};
pub use generator::{SchemaGenerator, css_class_contains, extension_functions, extract, inject_json_ld};
pub use html::{HtmlDocument, HtmlNode};
pub use query::{Matches, Scope, TreeQuery};
pub use value::{Value, prune, prune_json};
