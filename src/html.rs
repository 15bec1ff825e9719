//! [`DataSourceNode`] over a parsed `scraper` HTML document.

use schemagen_xpath1::{DataSourceNode, NodeType, QName};
use scraper::{Html, Node};
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

type TreeNode<'a> = ego_tree::NodeRef<'a, Node>;

/// A parsed HTML page, queryable through [`HtmlNode`].
///
/// html5ever may allocate nodes out of source order (foster parenting,
/// implied elements), so document order is computed once from a pre-order
/// walk instead of being read from node ids.
pub struct HtmlDocument {
    html: Html,
    order: HashMap<ego_tree::NodeId, usize>,
}

impl HtmlDocument {
    /// Parses a complete page. Markup errors are recovered by the parser.
    pub fn parse(source: &str) -> Self {
        let html = Html::parse_document(source);
        let order = html
            .tree
            .root()
            .descendants()
            .enumerate()
            .map(|(position, node)| (node.id(), position))
            .collect();
        if !html.errors.is_empty() {
            log::trace!("HTML parser recovered from {} errors", html.errors.len());
        }
        Self { html, order }
    }

    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode {
            doc: self,
            node: self.html.tree.root(),
            attr: None,
        }
    }

    fn position(&self, node: &TreeNode<'_>) -> usize {
        self.order.get(&node.id()).copied().unwrap_or(usize::MAX)
    }
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("nodes", &self.order.len())
            .finish()
    }
}

/// A node of an [`HtmlDocument`]. Attributes are addressed by their owner
/// element and their index in its attribute list, and sort right after the
/// owner in document order.
#[derive(Clone, Copy)]
pub struct HtmlNode<'a> {
    doc: &'a HtmlDocument,
    node: TreeNode<'a>,
    attr: Option<usize>,
}

impl<'a> HtmlNode<'a> {
    fn attribute(&self) -> Option<(&'a str, &'a str)> {
        let index = self.attr?;
        match self.node.value() {
            Node::Element(element) => element.attrs().nth(index),
            _ => None,
        }
    }

    fn sort_key(&self) -> (usize, usize) {
        (self.doc.position(&self.node), self.attr.map_or(0, |i| i + 1))
    }

    fn wrap(&self, node: TreeNode<'a>) -> Self {
        HtmlNode {
            doc: self.doc,
            node,
            attr: None,
        }
    }
}

impl fmt::Debug for HtmlNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (position, attr) = self.sort_key();
        let name = self.name().map(|q| q.local_part).unwrap_or_default();
        write!(f, "HtmlNode({:?} {} #{}.{})", self.node_type(), name, position, attr)
    }
}

impl PartialEq for HtmlNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.node.id() == other.node.id() && self.attr == other.attr
    }
}

impl Eq for HtmlNode<'_> {}

impl PartialOrd for HtmlNode<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HtmlNode<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl Hash for HtmlNode<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.node.id().hash(state);
        self.attr.hash(state);
    }
}

/// Doctypes and processing instructions are invisible to queries.
fn is_queryable(node: &TreeNode<'_>) -> bool {
    !matches!(node.value(), Node::Doctype(_) | Node::ProcessingInstruction(_))
}

impl<'a> DataSourceNode<'a> for HtmlNode<'a> {
    fn node_type(&self) -> NodeType {
        if self.attr.is_some() {
            return NodeType::Attribute;
        }
        match self.node.value() {
            Node::Document | Node::Fragment => NodeType::Root,
            Node::Text(_) => NodeType::Text,
            Node::Comment(_) => NodeType::Comment,
            _ => NodeType::Element,
        }
    }

    fn name(&self) -> Option<QName<'a>> {
        if self.attr.is_some() {
            return self.attribute().map(|(local_part, _)| QName {
                prefix: None,
                local_part,
            });
        }
        match self.node.value() {
            Node::Element(element) => Some(QName {
                prefix: None,
                local_part: element.name(),
            }),
            _ => None,
        }
    }

    fn string_value(&self) -> String {
        if self.attr.is_some() {
            return self.attribute().map(|(_, value)| value.to_string()).unwrap_or_default();
        }
        match self.node.value() {
            Node::Text(text) => text.text.to_string(),
            Node::Comment(comment) => comment.comment.to_string(),
            _ => self
                .node
                .descendants()
                .filter_map(|n| match n.value() {
                    Node::Text(text) => Some(&*text.text),
                    _ => None,
                })
                .collect(),
        }
    }

    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        let count = match (self.attr, self.node.value()) {
            (None, Node::Element(element)) => element.attrs().count(),
            _ => 0,
        };
        let (doc, node) = (self.doc, self.node);
        Box::new((0..count).map(move |i| HtmlNode {
            doc,
            node,
            attr: Some(i),
        }))
    }

    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
        if self.attr.is_some() {
            return Box::new(std::iter::empty());
        }
        let this = *self;
        Box::new(
            self.node
                .children()
                .filter(is_queryable)
                .map(move |child| this.wrap(child)),
        )
    }

    fn parent(&self) -> Option<Self> {
        if self.attr.is_some() {
            return Some(self.wrap(self.node));
        }
        self.node.parent().map(|parent| self.wrap(parent))
    }
}
