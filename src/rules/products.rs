use super::{Page, availability};
use crate::html::HtmlNode;
use crate::query::Scope;
use crate::value::Value;
use crate::value_map;
use schemagen_normalize::{price, year};

const LIST_ITEMS: &str = r#"//*[sg:css-class-contains(@class, "product-list__item")]"#;
const LIST_IMAGE: &str = r#".//*[sg:css-class-contains(@class, "product-list__image")]"#;
const LIST_INFO: &str = r#".//*[sg:css-class-contains(@class, "product-list__info")]"#;
const LIST_NAME: &str = r#".//*[sg:css-class-contains(@class, "product-list__name")]"#;
const LIST_DESC: &str = r#".//*[sg:css-class-contains(@class, "product-list__desc")]"#;
const LIST_PRICE: &str = r#".//datalist/option[@value = "product_price"]/text()"#;
const LIST_YEAR: &str = r#".//datalist/option[@value = "product_year"]/text()"#;
const LIST_AUTHOR: &str = r#".//datalist/option[@value = "product_author"]/text()"#;

const INFO_PRICE: &str = r#"//*[sg:css-class-contains(@class, "product-info__price")]/text()"#;
const INFO_NAME: &str = r#"//*[sg:css-class-contains(@class, "product-info__name")]/text()"#;
const INFO_IMAGE: &str = r#"//*[sg:css-class-contains(@class, "product-info__image")]//img/@src"#;
const DESCRIPTION: &str = r#"//meta[@name = "description"]/@content"#;

/// The value cell next to the product-info label containing `label`.
fn info_field(label: &str) -> String {
    format!(
        r#"(
//*[sg:css-class-contains(@class, "product-info__left")][contains(text(), "{}")]
    /following-sibling::*[sg:css-class-contains(@class, "product-info__text")]
)[1]/text()"#,
        label
    )
}

fn offer<'a>(page: &Page<'a>, price: String, url: &str) -> Value<'a> {
    let availability = availability(&price);
    value_map! {
        "@type" => "Offer",
        "priceCurrency" => page.config().currency.as_str(),
        "price" => price,
        "url" => url,
        "availability" => availability,
    }
}

/// `ItemList` of the price-list entries on a catalogue page.
pub fn products<'a>(page: &'a Page<'a>) -> Value<'a> {
    value_map! {
        "@type" => "ItemList",
        "itemListElement" => page.list(Scope::Document, LIST_ITEMS, move |item, _| product_list_item(page, item)),
    }
}

fn product_list_item<'a>(page: &Page<'a>, item: HtmlNode<'a>) -> Value<'a> {
    let image = page.node(item, LIST_IMAGE);
    let info = page.node(item, LIST_INFO);
    let price = price(page.text(item, LIST_PRICE).as_deref());
    let url = page.url(page.text_in(image, ".//@href").as_deref());
    value_map! {
        "@type" => "ListItem",
        "item" => value_map! {
            "@type" => "Book",
            "@id" => url.as_str(),
            "url" => url.as_str(),
            "description" => page.text_in(info, LIST_DESC),
            "image" => page.link(page.text_in(image, ".//img/@src")),
            "name" => page.text_in(info, LIST_NAME),
            "datePublished" => page.text(item, LIST_YEAR),
            "author" => value_map! {
                "@type" => "Person",
                "name" => page.text(item, LIST_AUTHOR),
            },
            "offers" => offer(page, price, &url),
        },
    }
}

/// The `Book` described by a product page.
pub fn product<'a>(page: &'a Page<'a>) -> Value<'a> {
    let price = price(page.text(Scope::Document, INFO_PRICE).as_deref());
    let url = page.url(Some(&page.config().page_url));
    value_map! {
        "@type" => "Book",
        "name" => page.text(Scope::Document, INFO_NAME),
        "description" => page.text(Scope::Document, DESCRIPTION),
        "url" => url.as_str(),
        "image" => page.link(page.text(Scope::Document, INFO_IMAGE)),
        "datePublished" => page
            .text(Scope::Document, &info_field("Год издания"))
            .map(|text| year(Some(&text))),
        "author" => value_map! {
            "@type" => "Person",
            "name" => page.text(Scope::Document, &info_field("Автор")),
        },
        "offers" => offer(page, price, &url),
    }
}
