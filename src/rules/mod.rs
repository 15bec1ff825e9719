//! Page rules: one function per schema.org entity found on a shop page.
//!
//! Rules build [`Value`] literals optimistically and leave every missing datum
//! as null for the pruner to remove. Query failures inside lazily evaluated
//! list items cannot be returned from the item transform, so [`Page`] keeps
//! the first one and the driver reports it after pruning.

mod breadcrumbs;
mod news;
mod pagination;
mod products;
mod provider;
mod web_page;

pub use breadcrumbs::breadcrumbs;
pub use news::news;
pub use pagination::pagination;
pub use products::{product, products};
pub use provider::provider;
pub use web_page::web_page;

use crate::config::GeneratorConfig;
use crate::error::QueryError;
use crate::html::{HtmlDocument, HtmlNode};
use crate::query::{Matches, Scope, TreeQuery};
use crate::value::Value;
use schemagen_normalize::absolute_url;
use schemagen_xpath1::FunctionRegistry;
use std::cell::RefCell;

/// Lazily transformed matches of a query that may have failed.
pub type Each<'a, F> = std::iter::Flatten<std::option::IntoIter<Matches<HtmlNode<'a>, F>>>;

/// One page being extracted: its query engine, the settings and the first
/// query failure seen so far.
pub struct Page<'a> {
    query: TreeQuery<'a, HtmlNode<'a>>,
    config: &'a GeneratorConfig,
    failure: RefCell<Option<QueryError>>,
}

impl<'a> Page<'a> {
    pub fn new(
        document: &'a HtmlDocument,
        config: &'a GeneratorConfig,
        functions: FunctionRegistry,
    ) -> Self {
        Self {
            query: TreeQuery::new(document.root(), functions),
            config,
            failure: RefCell::new(None),
        }
    }

    pub fn config(&self) -> &'a GeneratorConfig {
        self.config
    }

    /// The first query failure, if any rule hit one.
    pub fn check(&self) -> Result<(), QueryError> {
        match self.failure.borrow_mut().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn record<T>(&self, result: Result<T, QueryError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                log::debug!("{}", e);
                let mut failure = self.failure.borrow_mut();
                if failure.is_none() {
                    *failure = Some(e);
                }
                None
            }
        }
    }

    pub fn node(&self, scope: impl Into<Scope<HtmlNode<'a>>>, path: &str) -> Option<HtmlNode<'a>> {
        self.record(self.query.first(scope, path)).flatten()
    }

    /// Trimmed text of the first match.
    pub fn text(&self, scope: impl Into<Scope<HtmlNode<'a>>>, path: &str) -> Option<String> {
        self.record(self.query.first_text(scope, path)).flatten()
    }

    /// Like [`text`](Self::text), but a missing scope means a missing value.
    pub fn text_in(&self, scope: Option<HtmlNode<'a>>, path: &str) -> Option<String> {
        scope.and_then(|node| self.text(node, path))
    }

    pub fn each<R, F>(&self, scope: impl Into<Scope<HtmlNode<'a>>>, path: &str, transform: F) -> Each<'a, F>
    where
        F: FnMut(HtmlNode<'a>, usize) -> R,
    {
        self.record(self.query.query_with(scope, path, transform))
            .into_iter()
            .flatten()
    }

    /// A lazy sequence of `transform(node, position)` over the matches.
    pub fn list<R, F>(&self, scope: impl Into<Scope<HtmlNode<'a>>>, path: &str, transform: F) -> Value<'a>
    where
        F: FnMut(HtmlNode<'a>, usize) -> R + 'a,
        R: Into<Value<'a>> + 'a,
    {
        Value::lazy(self.each(scope, path, transform))
    }

    /// Resolves a link against the site root; no link means the site root.
    pub fn url(&self, href: Option<&str>) -> String {
        absolute_url(href, &self.config.site_url)
    }

    /// Resolves a link that may be absent, such as an image source.
    pub fn link(&self, href: Option<String>) -> Option<String> {
        href.map(|href| self.url(Some(&href)))
    }
}

/// Offer availability for a normalised price.
fn availability(price: &str) -> &'static str {
    match price {
        "0" => "https://schema.org/OutOfStock",
        _ => "https://schema.org/InStock",
    }
}
