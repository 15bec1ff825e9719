use super::Page;
use crate::query::Scope;
use crate::value::Value;
use crate::value_map;
use schemagen_normalize::{email, opening_hours, phone};

const SCHEDULE: &str = r#"//*[sg:css-class-contains(@class, "header__schedule")]/text()"#;
pub(super) const LOGO: &str = r#"//*[sg:css-class-contains(@class, "header__logo")]//img/@src"#;
const EMAIL: &str = r#"(
    //*[sg:css-class-contains(@class, "side-contacts__name")][contains(text(), "@")]
    | //a[starts-with(@href, "mailto:")]
)[1]/text()"#;
const PHONE: &str = r#"//*[sg:css-class-contains(@class, "header__phone-item")]/text()"#;

/// The shop itself as a `LocalBusiness`.
pub fn provider<'a>(page: &'a Page<'a>) -> Value<'a> {
    let config = page.config();
    let address = config.address.as_ref().map(|address| value_map! {
        "@type" => "PostalAddress",
        "addressLocality" => address.locality.as_deref(),
        "streetAddress" => address.street.as_deref(),
        "postalCode" => address.postal_code.as_deref(),
        "addressCountry" => address.country.as_deref(),
    });
    value_map! {
        "@type" => "LocalBusiness",
        "name" => config.site_name.as_str(),
        "address" => address,
        "openingHours" => opening_hours(page.text(Scope::Document, SCHEDULE).as_deref()),
        "image" => page.link(page.text(Scope::Document, LOGO)),
        "email" => email(page.text(Scope::Document, EMAIL).as_deref()),
        "telephone" => phone(page.text(Scope::Document, PHONE).as_deref()),
    }
}
