use super::Page;
use crate::query::Scope;
use crate::value::Value;
use crate::value_map;

const ITEMS: &str = r#"
(//*[@class = "breadcrumbs"])[1]
    //*[sg:css-class-contains(@class, "breadcrumbs__breadcrumb")]"#;

/// `BreadcrumbList` from the first breadcrumbs block.
pub fn breadcrumbs<'a>(page: &'a Page<'a>) -> Value<'a> {
    value_map! {
        "@type" => "BreadcrumbList",
        "itemListElement" => page.list(Scope::Document, ITEMS, move |item, position| value_map! {
            "@type" => "ListItem",
            "position" => position,
            "name" => page.text(item, ".//text()"),
            "item" => page.url(page.text(item, ".//@href").as_deref()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;
    use serde_json::json;

    #[test]
    fn crumbs_are_numbered_and_linked() {
        let html = r#"<div class="breadcrumbs">
            <span class="breadcrumbs__breadcrumb"><a href="/">Главная</a></span>
            <span class="Breadcrumbs__Breadcrumb link"><a href="catalog/">Каталог</a></span>
            <span class="breadcrumbs__breadcrumb">Фантастика</span>
        </div>
        <div class="breadcrumbs"><span class="breadcrumbs__breadcrumb">Second</span></div>"#;
        let config = config("/catalog/sf/");
        assert_eq!(
            run(html, &config, breadcrumbs),
            json!({
                "@type": "BreadcrumbList",
                "itemListElement": [
                    {"@type": "ListItem", "position": 1, "name": "Главная", "item": "https://shop.example/"},
                    {"@type": "ListItem", "position": 2, "name": "Каталог", "item": "https://shop.example/catalog/"},
                    {"@type": "ListItem", "position": 3, "name": "Фантастика", "item": "https://shop.example/"},
                ]
            })
        );
    }

    #[test]
    fn no_block_leaves_only_the_type() {
        let config = config("/");
        assert_eq!(run("<p>nothing</p>", &config, breadcrumbs), json!({"@type": "BreadcrumbList"}));
    }
}
