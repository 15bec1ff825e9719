use super::provider::LOGO;
use super::{Page, breadcrumbs, news, pagination, product, products, provider};
use crate::query::Scope;
use crate::value::Value;
use crate::value_map;

/// Sections whose pages describe the shop rather than a listing or a product.
const SERVICE_SECTIONS: [&str; 3] = ["delivery/", "contacts/", "news/"];

fn is_service_page(path: &str) -> bool {
    let path = path.to_lowercase();
    SERVICE_SECTIONS.iter().any(|section| path.starts_with(section))
}

/// The root `WebPage` with every other entity embedded.
pub fn web_page<'a>(page: &'a Page<'a>) -> Value<'a> {
    let mut result = value_map! {
        "@context" => "https://schema.org/",
        "@type" => "WebPage",
        "name" => page.text(Scope::Document, "//title/text()"),
        "image" => page.link(page.text(Scope::Document, LOGO)),
        "description" => page.text(Scope::Document, r#"//meta[@name = "description"]/@content"#),
        "keywords" => page.text(Scope::Document, r#"//meta[@name = "keywords"]/@content"#),
        "inLanguage" => page.config().language.as_str(),
        "breadcrumb" => breadcrumbs(page),
        "hasPart" => news(page),
        "offers" => products(page),
        "provider" => provider(page),
    };

    let path = page.config().page_path();
    if is_service_page(&path) {
        log::debug!("'{}' is a service page, no main entity", path);
        return result;
    }
    let listing = pagination(page).materialize();
    let has_pages = matches!(
        listing.get("itemListElement"),
        Some(Value::Seq(items)) if !items.is_empty()
    );
    let main_entity = if has_pages {
        listing
    } else {
        log::debug!("No pagination on '{}', describing it as a product", path);
        product(page)
    };
    if let Value::Map(entries) = &mut result {
        entries.insert("mainEntity".to_string(), main_entity);
    }
    result
}
