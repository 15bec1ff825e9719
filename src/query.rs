//! Query/transform combinators over any [`DataSourceNode`] tree.
//!
//! A query runs an XPath expression from a [`Scope`] and hands every matched
//! node, with its 1-based position, to a transform. Results are produced
//! lazily by [`Matches`] and can be consumed once; run the query again to
//! start over.

use crate::error::QueryError;
use itertools::Itertools;
use schemagen_xpath1::{
    DataSourceNode, EvaluationContext, FunctionRegistry, XPathValue, evaluate, parse_expression,
};
use std::marker::PhantomData;

/// Where a query starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<N> {
    /// The document root.
    Document,
    Node(N),
}

impl<N> From<N> for Scope<N> {
    fn from(node: N) -> Self {
        Scope::Node(node)
    }
}

/// The transforms used when the caller does not supply one.
pub mod transform {
    use schemagen_xpath1::DataSourceNode;

    pub fn node<N>(node: N, _position: usize) -> N {
        node
    }

    /// The node's trimmed string value; blank text counts as absent.
    pub fn text<'a, N: DataSourceNode<'a>>(node: N, _position: usize) -> Option<String> {
        let value = node.string_value();
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Lazily transformed query results, in document order.
#[derive(Debug)]
pub struct Matches<N, F> {
    nodes: std::vec::IntoIter<N>,
    position: usize,
    transform: F,
}

impl<N, R, F> Iterator for Matches<N, F>
where
    F: FnMut(N, usize) -> R,
{
    type Item = R;

    fn next(&mut self) -> Option<R> {
        let node = self.nodes.next()?;
        self.position += 1;
        Some((self.transform)(node, self.position))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<N, R, F> ExactSizeIterator for Matches<N, F> where F: FnMut(N, usize) -> R {}

/// Queries one document. Extension functions are fixed when the
/// `TreeQuery` is built and shared by every query it runs.
pub struct TreeQuery<'a, N> {
    root: N,
    functions: FunctionRegistry,
    _document: PhantomData<&'a ()>,
}

impl<'a, N> TreeQuery<'a, N>
where
    N: DataSourceNode<'a> + 'a,
{
    pub fn new(root: N, functions: FunctionRegistry) -> Self {
        Self {
            root,
            functions,
            _document: PhantomData,
        }
    }

    pub fn root(&self) -> N {
        self.root
    }

    /// Runs `path` from `scope`, yielding each matched node.
    pub fn query(
        &self,
        scope: impl Into<Scope<N>>,
        path: &str,
    ) -> Result<Matches<N, fn(N, usize) -> N>, QueryError> {
        self.query_with(scope, path, transform::node as fn(N, usize) -> N)
    }

    /// Runs `path` from `scope`, yielding `transform(node, position)` for each
    /// match. A malformed path, or one that does not select nodes, is an error;
    /// a path that matches nothing is not.
    pub fn query_with<R, F>(
        &self,
        scope: impl Into<Scope<N>>,
        path: &str,
        transform: F,
    ) -> Result<Matches<N, F>, QueryError>
    where
        F: FnMut(N, usize) -> R,
    {
        let fail = |source| QueryError::XPath {
            path: path.to_string(),
            source,
        };
        let expression = parse_expression(path).map_err(fail)?;
        let context = match scope.into() {
            Scope::Document => self.root,
            Scope::Node(node) => node,
        };
        let e_ctx = EvaluationContext::new(context, self.root, &self.functions);
        let nodes = match evaluate(&expression, &e_ctx).map_err(fail)? {
            XPathValue::NodeSet(nodes) => nodes,
            other => {
                return Err(QueryError::NotANodeSet {
                    path: path.to_string(),
                    found: other.type_name(),
                });
            }
        };
        if log::log_enabled!(log::Level::Trace) {
            log::trace!(
                "'{}' matched {} node(s)",
                path.split_whitespace().join(" "),
                nodes.len()
            );
        }
        Ok(Matches {
            nodes: nodes.into_iter(),
            position: 0,
            transform,
        })
    }

    /// The first match, or `None` when nothing matches.
    pub fn first(&self, scope: impl Into<Scope<N>>, path: &str) -> Result<Option<N>, QueryError> {
        Ok(self.query(scope, path)?.next())
    }

    pub fn first_with<R, F>(
        &self,
        scope: impl Into<Scope<N>>,
        path: &str,
        transform: F,
    ) -> Result<Option<R>, QueryError>
    where
        F: FnMut(N, usize) -> R,
    {
        Ok(self.query_with(scope, path, transform)?.next())
    }

    /// The trimmed text of every match, `None` for blank ones.
    pub fn all_text(
        &self,
        scope: impl Into<Scope<N>>,
        path: &str,
    ) -> Result<Matches<N, fn(N, usize) -> Option<String>>, QueryError> {
        self.query_with(scope, path, transform::text as fn(N, usize) -> Option<String>)
    }

    /// Like [`all_text`](Self::all_text), passing each text and its position
    /// through `shape`.
    pub fn all_text_with<R, F>(
        &self,
        scope: impl Into<Scope<N>>,
        path: &str,
        mut shape: F,
    ) -> Result<Matches<N, impl FnMut(N, usize) -> R>, QueryError>
    where
        F: FnMut(Option<String>, usize) -> R,
    {
        self.query_with(scope, path, move |node, position| {
            shape(transform::text(node, position), position)
        })
    }

    /// The trimmed text of the first match. Blank text and no match are both
    /// `None`.
    pub fn first_text(
        &self,
        scope: impl Into<Scope<N>>,
        path: &str,
    ) -> Result<Option<String>, QueryError> {
        Ok(self.all_text(scope, path)?.next().flatten())
    }

    /// Passes the first match's text through `shape`; `None` when nothing
    /// matched.
    pub fn first_text_with<R, F>(
        &self,
        scope: impl Into<Scope<N>>,
        path: &str,
        shape: F,
    ) -> Result<Option<R>, QueryError>
    where
        F: FnMut(Option<String>, usize) -> R,
    {
        Ok(self.all_text_with(scope, path, shape)?.next())
    }
}
