//! The read-only tree abstraction the evaluator runs against.
use std::hash::Hash;

/// A qualified name, consisting of an optional prefix and a local part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QName<'a> {
    pub prefix: Option<&'a str>,
    pub local_part: &'a str,
}

/// The kind of a node, following the XPath 1.0 data model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Root,
    Element,
    Attribute,
    Text,
    Comment,
}

/// A handle to one position in an immutable markup document.
///
/// The evaluator only ever navigates through this trait, so any document
/// provider (an HTML parser, a test fixture) can be queried once it supplies
/// handles that are cheap to copy. `Ord` must follow document order: the
/// evaluator sorts node-sets with it.
///
/// `'a` is the lifetime of the underlying document.
pub trait DataSourceNode<'a>:
    std::fmt::Debug + Clone + Copy + PartialEq + Eq + Hash + PartialOrd + Ord
{
    fn node_type(&self) -> NodeType;

    /// Element or attribute name; `None` for root, text and comment nodes.
    fn name(&self) -> Option<QName<'a>>;

    /// The XPath string value: descendant text for elements and the root,
    /// the value for attributes, the content for text and comments.
    fn string_value(&self) -> String;

    /// Attribute nodes of an element; empty for everything else.
    fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// Child nodes in document order; empty for leaves and attributes.
    fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a>;

    /// The owner element for attributes, `None` for the root.
    fn parent(&self) -> Option<Self>;
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::cmp::Ordering;
    use std::hash::Hasher;

    #[derive(Debug)]
    struct MockNodeData {
        node_type: NodeType,
        name: Option<&'static str>,
        value: String,
        parent: Option<usize>,
        children: Vec<usize>,
        attributes: Vec<usize>,
    }

    /// An arena tree for engine tests. Nodes must be added in document order
    /// (parents before children, earlier siblings first) so that ids double
    /// as document positions.
    #[derive(Debug)]
    pub struct MockTree {
        nodes: Vec<MockNodeData>,
    }

    #[derive(Debug, Clone, Copy)]
    pub struct MockNode<'a> {
        pub id: usize,
        pub tree: &'a MockTree,
    }

    impl MockTree {
        pub fn new() -> Self {
            MockTree {
                nodes: vec![MockNodeData {
                    node_type: NodeType::Root,
                    name: None,
                    value: String::new(),
                    parent: None,
                    children: vec![],
                    attributes: vec![],
                }],
            }
        }

        fn push(&mut self, parent: usize, data: MockNodeData) -> usize {
            let id = self.nodes.len();
            self.nodes.push(data);
            match self.nodes[id].node_type {
                NodeType::Attribute => self.nodes[parent].attributes.push(id),
                _ => self.nodes[parent].children.push(id),
            }
            id
        }

        pub fn element(
            &mut self,
            parent: usize,
            name: &'static str,
            attributes: &[(&'static str, &str)],
        ) -> usize {
            let id = self.push(
                parent,
                MockNodeData {
                    node_type: NodeType::Element,
                    name: Some(name),
                    value: String::new(),
                    parent: Some(parent),
                    children: vec![],
                    attributes: vec![],
                },
            );
            for (attr_name, attr_value) in attributes {
                self.push(
                    id,
                    MockNodeData {
                        node_type: NodeType::Attribute,
                        name: Some(attr_name),
                        value: attr_value.to_string(),
                        parent: Some(id),
                        children: vec![],
                        attributes: vec![],
                    },
                );
            }
            id
        }

        pub fn text(&mut self, parent: usize, content: &str) -> usize {
            self.push(
                parent,
                MockNodeData {
                    node_type: NodeType::Text,
                    name: None,
                    value: content.to_string(),
                    parent: Some(parent),
                    children: vec![],
                    attributes: vec![],
                },
            )
        }

        pub fn node(&self, id: usize) -> MockNode<'_> {
            MockNode { id, tree: self }
        }

        pub fn root(&self) -> MockNode<'_> {
            self.node(0)
        }
    }

    impl PartialEq for MockNode<'_> {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }
    impl Eq for MockNode<'_> {}

    impl PartialOrd for MockNode<'_> {
        fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
            Some(self.cmp(other))
        }
    }
    impl Ord for MockNode<'_> {
        fn cmp(&self, other: &Self) -> Ordering {
            self.id.cmp(&other.id)
        }
    }

    impl Hash for MockNode<'_> {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl<'a> DataSourceNode<'a> for MockNode<'a> {
        fn node_type(&self) -> NodeType {
            self.tree.nodes[self.id].node_type
        }

        fn name(&self) -> Option<QName<'a>> {
            self.tree.nodes[self.id].name.map(|local_part| QName {
                prefix: None,
                local_part,
            })
        }

        fn string_value(&self) -> String {
            let data = &self.tree.nodes[self.id];
            match data.node_type {
                NodeType::Root | NodeType::Element => self
                    .children()
                    .filter(|c| c.node_type() != NodeType::Comment)
                    .map(|c| c.string_value())
                    .collect(),
                _ => data.value.clone(),
            }
        }

        fn attributes(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .attributes
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn children(&self) -> Box<dyn Iterator<Item = Self> + 'a> {
            let tree = self.tree;
            Box::new(
                tree.nodes[self.id]
                    .children
                    .iter()
                    .map(move |&id| MockNode { id, tree }),
            )
        }

        fn parent(&self) -> Option<Self> {
            self.tree.nodes[self.id].parent.map(|id| MockNode {
                id,
                tree: self.tree,
            })
        }
    }

    /// A small catalogue page:
    /// ```text
    /// <ul class="list main">            (1, @class 2)
    ///   <li class="item">One</li>       (3, @class 4, text 5)
    ///   <li class="item sale">          (6, @class 7)
    ///     <a href="/two">Two</a>        (8, @href 9, text 10)
    ///   </li>
    ///   <li>Three</li>                  (11, text 12)
    /// </ul>
    /// <p>  </p>                         (13, text 14)
    /// ```
    pub fn catalogue() -> MockTree {
        let mut tree = MockTree::new();
        let ul = tree.element(0, "ul", &[("class", "list main")]);
        let li1 = tree.element(ul, "li", &[("class", "item")]);
        tree.text(li1, "One");
        let li2 = tree.element(ul, "li", &[("class", "item sale")]);
        let a = tree.element(li2, "a", &[("href", "/two")]);
        tree.text(a, "Two");
        let li3 = tree.element(ul, "li", &[]);
        tree.text(li3, "Three");
        let p = tree.element(0, "p", &[]);
        tree.text(p, "  ");
        tree
    }

    #[test]
    fn catalogue_ids_follow_document_order() {
        let tree = catalogue();
        let ul = tree.node(1);
        let ids: Vec<usize> = ul.children().map(|n| n.id).collect();
        assert_eq!(ids, vec![3, 6, 11]);
        assert_eq!(tree.node(9).parent(), Some(tree.node(8)));
        assert_eq!(ul.string_value(), "OneTwoThree");
    }
}
