pub mod fixtures;

use schemagen::{GeneratorConfig, PostalAddressConfig, SchemaGenerator};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub const SITE: &str = "https://shop.example";

/// Routes library logs through the test harness; `RUST_LOG=schemagen=trace`
/// shows every query.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Generator for `page_url` on the fixture shop, with a published address.
pub fn generator(page_url: &str) -> SchemaGenerator {
    init_logging();
    let config = GeneratorConfig::new(page_url, SITE, "Книжная лавка").with_address(PostalAddressConfig {
        locality: Some("г. Москва".to_string()),
        street: Some("пер. Карманицкий, 3А".to_string()),
        postal_code: Some("119002".to_string()),
        country: Some("RU".to_string()),
    });
    SchemaGenerator::new(config)
}
