use super::Page;
use crate::query::Scope;
use crate::value::Value;
use crate::value_map;
use schemagen_normalize::iso_date;

const ITEMS: &str = r#"
(//*[sg:css-class-contains(@class, "news__list")])[1]
    //*[sg:css-class-contains(@class, "news__item")]"#;
const HEADLINE: &str = r#".//*[sg:css-class-contains(@class, "news__name")]//a/text()"#;
const LINK: &str = r#".//*[sg:css-class-contains(@class, "news__name")]//a/@href"#;
const DATE: &str = r#"(
    .//*[sg:css-class-contains(@class, "news__time")]
    | .//*[sg:css-class-contains(@class, "news__desc")][2]
)/text()"#;

/// `CollectionPage` of the articles in the first news block.
pub fn news<'a>(page: &'a Page<'a>) -> Value<'a> {
    value_map! {
        "@type" => "CollectionPage",
        "name" => "Новости",
        "url" => page.url(Some("/news")),
        "itemListElement" => page.list(Scope::Document, ITEMS, move |item, _| value_map! {
            "@type" => "NewsArticle",
            "headline" => page.text(item, HEADLINE),
            "url" => page.url(page.text(item, LINK).as_deref()),
            "datePublished" => iso_date(page.text(item, DATE).as_deref()),
        }),
    }
}
