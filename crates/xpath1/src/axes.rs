//! Node collection along each XPath axis.
//!
//! Every collector appends in proximity order: document order for forward
//! axes, nearest-first for reverse axes. Predicates number positions in that
//! order.

use crate::ast::Axis;
use crate::datasource::{DataSourceNode, NodeType};

/// Collects the nodes reachable from `node` along `axis`.
pub fn collect<'a, N: DataSourceNode<'a>>(axis: Axis, node: N) -> Vec<N> {
    let mut results = Vec::new();
    match axis {
        Axis::Child => results.extend(node.children()),
        Axis::Attribute => results.extend(node.attributes()),
        Axis::SelfAxis => results.push(node),
        Axis::Descendant => collect_descendants(node, &mut results),
        Axis::DescendantOrSelf => {
            results.push(node);
            collect_descendants(node, &mut results);
        }
        Axis::Parent => results.extend(node.parent()),
        Axis::Ancestor => collect_ancestors(node, &mut results),
        Axis::AncestorOrSelf => {
            results.push(node);
            collect_ancestors(node, &mut results);
        }
        Axis::FollowingSibling => collect_following_siblings(node, &mut results),
        Axis::PrecedingSibling => collect_preceding_siblings(node, &mut results),
        Axis::Following => collect_following(node, &mut results),
        Axis::Preceding => collect_preceding(node, &mut results),
    }
    results
}

/// Pre-order walk, which is document order.
fn collect_descendants<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut stack: Vec<N> = node.children().collect();
    stack.reverse();
    while let Some(current) = stack.pop() {
        results.push(current);
        let mut children: Vec<N> = current.children().collect();
        children.reverse();
        stack.extend(children);
    }
}

fn collect_ancestors<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut current = node.parent();
    while let Some(p) = current {
        results.push(p);
        current = p.parent();
    }
}

fn collect_following_siblings<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    if let Some(parent) = node.parent() {
        results.extend(parent.children().skip_while(|s| *s != node).skip(1));
    }
}

fn collect_preceding_siblings<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    if let Some(parent) = node.parent() {
        let before: Vec<N> = parent.children().take_while(|s| *s != node).collect();
        // An attribute is never among its owner's children.
        if before.len() < parent.children().count() {
            results.extend(before.into_iter().rev());
        }
    }
}

fn collect_following<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut current = Some(node);
    if node.node_type() == NodeType::Attribute {
        current = node.parent();
        if let Some(owner) = current {
            collect_descendants(owner, results);
        }
    }
    while let Some(c) = current {
        let parent = c.parent();
        if let Some(p) = parent {
            for sibling in p.children().skip_while(|s| *s != c).skip(1) {
                results.push(sibling);
                collect_descendants(sibling, results);
            }
        }
        current = parent;
    }
}

fn collect_preceding<'a, N: DataSourceNode<'a>>(node: N, results: &mut Vec<N>) {
    let mut current = match node.node_type() {
        NodeType::Attribute => node.parent(),
        _ => Some(node),
    };
    while let Some(c) = current {
        let parent = c.parent();
        if let Some(p) = parent {
            for sibling in p.children().take_while(|s| *s != c) {
                results.push(sibling);
                collect_descendants(sibling, results);
            }
        }
        current = parent;
    }
    results.sort_by(|a, b| b.cmp(a));
}
