//! Binary operators, including the existential node-set comparisons.

use super::ast::BinaryOperator;
use super::engine::{XPathValue, string_to_number};
use crate::datasource::DataSourceNode;
use crate::error::XPathError;

pub fn evaluate<'a, N: DataSourceNode<'a> + 'a>(
    op: BinaryOperator,
    left: XPathValue<N>,
    right: XPathValue<N>,
) -> Result<XPathValue<N>, XPathError> {
    use BinaryOperator::*;
    let result = match op {
        Or => XPathValue::Boolean(left.to_bool() || right.to_bool()),
        And => XPathValue::Boolean(left.to_bool() && right.to_bool()),
        Equals | NotEquals | LessThan | LessThanOrEqual | GreaterThan | GreaterThanOrEqual => {
            XPathValue::Boolean(compare(op, &left, &right))
        }
        Plus => XPathValue::Number(left.to_number() + right.to_number()),
        Minus => XPathValue::Number(left.to_number() - right.to_number()),
        Multiply => XPathValue::Number(left.to_number() * right.to_number()),
        Divide => XPathValue::Number(left.to_number() / right.to_number()),
        Modulo => XPathValue::Number(left.to_number() % right.to_number()),
        Union => {
            let mut merged = left.into_nodes("the left side of '|'")?;
            merged.extend(right.into_nodes("the right side of '|'")?);
            merged.sort();
            merged.dedup();
            XPathValue::NodeSet(merged)
        }
    };
    Ok(result)
}

/// A comparison involving a node-set holds if it holds for any member.
fn compare<'a, N: DataSourceNode<'a>>(
    op: BinaryOperator,
    left: &XPathValue<N>,
    right: &XPathValue<N>,
) -> bool {
    match (left, right) {
        (XPathValue::NodeSet(nodes), XPathValue::Boolean(_))
        | (XPathValue::Boolean(_), XPathValue::NodeSet(nodes)) => {
            let as_bool = XPathValue::<N>::Boolean(!nodes.is_empty());
            match left {
                XPathValue::NodeSet(_) => compare(op, &as_bool, right),
                _ => compare(op, left, &as_bool),
            }
        }
        (XPathValue::NodeSet(l), XPathValue::NodeSet(r)) => {
            let rs: Vec<String> = r.iter().map(|n| n.string_value()).collect();
            l.iter().any(|n| {
                let ls = n.string_value();
                rs.iter().any(|s| compare_atoms(op, Atom::Str(&ls), Atom::Str(s)))
            })
        }
        (XPathValue::NodeSet(nodes), other) => nodes.iter().any(|n| {
            let s = n.string_value();
            compare_atoms(op, Atom::Str(&s), Atom::of(other))
        }),
        (other, XPathValue::NodeSet(nodes)) => nodes.iter().any(|n| {
            let s = n.string_value();
            compare_atoms(op, Atom::of(other), Atom::Str(&s))
        }),
        _ => compare_atoms(op, Atom::of(left), Atom::of(right)),
    }
}

#[derive(Clone, Copy)]
enum Atom<'s> {
    Str(&'s str),
    Num(f64),
    Bool(bool),
}

impl<'s> Atom<'s> {
    fn of<'a, N: DataSourceNode<'a>>(value: &'s XPathValue<N>) -> Self {
        match value {
            XPathValue::String(s) => Atom::Str(s),
            XPathValue::Number(n) => Atom::Num(*n),
            XPathValue::Boolean(b) => Atom::Bool(*b),
            XPathValue::NodeSet(_) => unreachable!("node-sets are expanded before comparison"),
        }
    }

    fn number(self) -> f64 {
        match self {
            Atom::Str(s) => string_to_number(s),
            Atom::Num(n) => n,
            Atom::Bool(b) => f64::from(u8::from(b)),
        }
    }

    fn boolean(self) -> bool {
        match self {
            Atom::Str(s) => !s.is_empty(),
            Atom::Num(n) => n != 0.0 && !n.is_nan(),
            Atom::Bool(b) => b,
        }
    }
}

fn compare_atoms(op: BinaryOperator, l: Atom<'_>, r: Atom<'_>) -> bool {
    use BinaryOperator::*;
    match op {
        Equals | NotEquals => {
            let equal = match (l, r) {
                (Atom::Bool(_), _) | (_, Atom::Bool(_)) => l.boolean() == r.boolean(),
                (Atom::Num(_), _) | (_, Atom::Num(_)) => l.number() == r.number(),
                (Atom::Str(a), Atom::Str(b)) => a == b,
            };
            equal == (op == Equals)
        }
        LessThan => l.number() < r.number(),
        LessThanOrEqual => l.number() <= r.number(),
        GreaterThan => l.number() > r.number(),
        GreaterThanOrEqual => l.number() >= r.number(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::mock::{MockNode, catalogue};

    fn boolean<'a>(v: Result<XPathValue<MockNode<'a>>, XPathError>) -> bool {
        v.unwrap().to_bool()
    }

    #[test]
    fn node_set_equality_is_existential() {
        let tree = catalogue();
        let classes = XPathValue::NodeSet(vec![tree.node(2), tree.node(4)]);
        let item = XPathValue::String("item".to_string());
        assert!(boolean(evaluate(BinaryOperator::Equals, classes.clone(), item.clone())));
        // "list main" differs from "item", so != also holds.
        assert!(boolean(evaluate(BinaryOperator::NotEquals, classes, item.clone())));

        let empty = XPathValue::NodeSet(vec![]);
        assert!(!boolean(evaluate(BinaryOperator::Equals, empty.clone(), item.clone())));
        assert!(!boolean(evaluate(BinaryOperator::NotEquals, empty, item)));
    }

    #[test]
    fn mixed_scalars_coerce_like_xpath() {
        let n = |x| XPathValue::<MockNode<'_>>::Number(x);
        let s = |x: &str| XPathValue::<MockNode<'_>>::String(x.to_string());
        assert!(boolean(evaluate(BinaryOperator::Equals, n(1.0), s("1"))));
        assert!(boolean(evaluate(BinaryOperator::LessThan, s("2"), n(10.0))));
        assert!(boolean(evaluate(BinaryOperator::Equals, XPathValue::Boolean(true), s("x"))));
        assert_eq!(evaluate(BinaryOperator::Modulo, n(10.0), n(3.0)).unwrap().to_number(), 1.0);
    }

    #[test]
    fn union_rejects_scalars() {
        let tree = catalogue();
        let nodes = XPathValue::NodeSet(vec![tree.node(3)]);
        let err = evaluate(BinaryOperator::Union, nodes, XPathValue::Number(1.0)).unwrap_err();
        assert!(matches!(err, XPathError::TypeError(_)));
    }

    #[test]
    fn union_merges_in_document_order() {
        let tree = catalogue();
        let left = XPathValue::NodeSet(vec![tree.node(6), tree.node(11)]);
        let right = XPathValue::NodeSet(vec![tree.node(3), tree.node(6)]);
        match evaluate(BinaryOperator::Union, left, right).unwrap() {
            XPathValue::NodeSet(nodes) => {
                assert_eq!(nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![3, 6, 11])
            }
            other => panic!("expected a node-set, got {:?}", other),
        }
    }
}
