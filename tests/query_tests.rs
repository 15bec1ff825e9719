mod common;

use common::TestResult;
use common::fixtures::catalogue_page;
use schemagen::query::transform;
use schemagen::{HtmlDocument, QueryError, Scope, TreeQuery, extension_functions};

#[test]
fn unmatched_paths_are_empty_not_errors() -> TestResult {
    let document = HtmlDocument::parse(&catalogue_page());
    let query = TreeQuery::new(document.root(), extension_functions());
    assert_eq!(query.query(Scope::Document, "//table//tr")?.count(), 0);
    assert_eq!(query.first(Scope::Document, "//*[@id = 'missing']")?, None);
    assert_eq!(query.first_text(Scope::Document, "//meta[@name = 'robots']/@content")?, None);
    Ok(())
}

#[test]
fn malformed_paths_fail_with_the_path() -> TestResult {
    let document = HtmlDocument::parse(&catalogue_page());
    let query = TreeQuery::new(document.root(), extension_functions());
    let err = query
        .query(Scope::Document, "//li[sg:css-class-contains(@class, 'product-list__item')")
        .err()
        .ok_or("expected a parse failure")?;
    assert!(matches!(err, QueryError::XPath { .. }));
    assert!(err.to_string().contains("product-list__item"));
    Ok(())
}

#[test]
fn class_predicate_selects_list_items() -> TestResult {
    let document = HtmlDocument::parse(&catalogue_page());
    let query = TreeQuery::new(document.root(), extension_functions());
    let names: Vec<Option<String>> = query
        .all_text(
            Scope::Document,
            r#"//*[sg:css-class-contains(@class, "product-list__name")]"#,
        )?
        .collect();
    assert_eq!(
        names,
        vec![Some("Мастер и Маргарита".to_string()), Some("Идиот".to_string())]
    );
    Ok(())
}

#[test]
fn positions_restart_for_every_query() -> TestResult {
    let document = HtmlDocument::parse(&catalogue_page());
    let query = TreeQuery::new(document.root(), extension_functions());
    let path = r#"//*[sg:css-class-contains(@class, "sorting__item")]"#;
    let first: Vec<usize> = query.query_with(Scope::Document, path, |_, i| i)?.collect();
    let again: Vec<usize> = query.query_with(Scope::Document, path, |_, i| i)?.collect();
    assert_eq!(first, vec![1, 2]);
    assert_eq!(first, again);
    Ok(())
}

#[test]
fn node_scoped_queries_stay_inside_the_node() -> TestResult {
    let document = HtmlDocument::parse(&catalogue_page());
    let query = TreeQuery::new(document.root(), extension_functions());
    let items: Vec<_> = query
        .query(Scope::Document, r#"//*[sg:css-class-contains(@class, "product-list__item")]"#)?
        .collect();
    let prices: Vec<Option<String>> = items
        .iter()
        .map(|item| query.first_with(*item, ".//option[@value = 'product_price']", transform::text))
        .collect::<Result<Vec<_>, _>>()?
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(
        prices,
        vec![Some("720 руб.".to_string()), Some("нет в наличии".to_string())]
    );
    Ok(())
}
