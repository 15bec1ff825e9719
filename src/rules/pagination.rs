use super::Page;
use crate::query::Scope;
use crate::value::Value;
use crate::value_map;

const PAGES: &str = r#"
(//*[sg:css-class-contains(@class, "navigation__pages")])[1]
    //a"#;

const SORTING: &str = r#"//*[sg:css-class-contains(@class, "sorting__item")]"#;

/// `ItemList` of the numbered page links followed by the sorting links.
pub fn pagination<'a>(page: &'a Page<'a>) -> Value<'a> {
    let pages = page.each(Scope::Document, PAGES, move |link, _| {
        let number = page.text(link, ".");
        value_map! {
            "@type" => "WebPage",
            "name" => number.as_ref().map(|n| format!("Страница {}", n)),
            "position" => number,
            "url" => page.url(page.text(link, ".//@href").as_deref()),
        }
    });
    let sorting = page.each(Scope::Document, SORTING, move |item, position| value_map! {
        "@type" => "ListItem",
        "position" => position,
        "item" => value_map! {
            "@type" => "CategoryCode",
            "name" => page.text(item, "."),
            "url" => page.url(page.text(item, ".//@href").as_deref()),
        },
    });
    value_map! {
        "@type" => "ItemList",
        "itemListElement" => Value::lazy(pages.chain(sorting)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::*;
    use serde_json::json;

    #[test]
    fn page_links_come_before_sorting_links() {
        let html = r#"
        <div class="sorting"><a class="sorting__item" href="?sort=price">По цене</a></div>
        <div class="navigation__pages"><a href="?page=1">1</a><a href="?page=2"> 2 </a></div>
        <div class="navigation__pages"><a href="?page=9">9</a></div>"#;
        let config = config("/catalog/");
        assert_eq!(
            run(html, &config, pagination),
            json!({
                "@type": "ItemList",
                "itemListElement": [
                    {"@type": "WebPage", "name": "Страница 1", "position": "1", "url": "https://shop.example/?page=1"},
                    {"@type": "WebPage", "name": "Страница 2", "position": "2", "url": "https://shop.example/?page=2"},
                    {"@type": "ListItem", "position": 1, "item": {
                        "@type": "CategoryCode", "name": "По цене", "url": "https://shop.example/?sort=price"
                    }},
                ]
            })
        );
    }

    #[test]
    fn no_links_leaves_an_empty_list() {
        let config = config("/");
        assert_eq!(run("<p></p>", &config, pagination), json!({"@type": "ItemList"}));
    }
}
