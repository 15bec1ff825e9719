//! Evaluation of a parsed expression against a generic `DataSourceNode` tree.

use super::ast::{Axis, BinaryOperator, Expression, LocationPath, NodeTest, NodeTypeTest, Step};
use super::functions::{self, FunctionRegistry};
use super::{axes, operators};
use crate::datasource::{DataSourceNode, NodeType};
use crate::error::XPathError;
use std::fmt;
use std::marker::PhantomData;

/// The result of evaluating an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum XPathValue<N> {
    /// Always sorted in document order, without duplicates.
    NodeSet(Vec<N>),
    String(String),
    Number(f64),
    Boolean(bool),
}

impl<'a, N: DataSourceNode<'a>> XPathValue<N> {
    pub fn to_bool(&self) -> bool {
        match self {
            XPathValue::NodeSet(nodes) => !nodes.is_empty(),
            XPathValue::String(s) => !s.is_empty(),
            XPathValue::Number(n) => *n != 0.0 && !n.is_nan(),
            XPathValue::Boolean(b) => *b,
        }
    }

    pub fn to_number(&self) -> f64 {
        match self {
            XPathValue::Number(n) => *n,
            XPathValue::Boolean(b) => f64::from(u8::from(*b)),
            XPathValue::String(_) | XPathValue::NodeSet(_) => string_to_number(&self.to_string()),
        }
    }

    /// Returns the node-set, or a type error naming `what` needed it.
    pub fn into_nodes(self, what: &str) -> Result<Vec<N>, XPathError> {
        match self {
            XPathValue::NodeSet(nodes) => Ok(nodes),
            other => Err(XPathError::TypeError(format!(
                "{} requires a node-set, got {}",
                what,
                other.type_name()
            ))),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            XPathValue::NodeSet(_) => "node-set",
            XPathValue::String(_) => "string",
            XPathValue::Number(_) => "number",
            XPathValue::Boolean(_) => "boolean",
        }
    }
}

pub(crate) fn string_to_number(s: &str) -> f64 {
    s.trim().parse().unwrap_or(f64::NAN)
}

impl<'a, N: DataSourceNode<'a>> fmt::Display for XPathValue<N> {
    /// The XPath `string()` conversion.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            XPathValue::NodeSet(nodes) => match nodes.first() {
                Some(node) => f.write_str(&node.string_value()),
                None => Ok(()),
            },
            XPathValue::String(s) => f.write_str(s),
            XPathValue::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            XPathValue::Number(n) => write!(f, "{}", n),
            XPathValue::Boolean(b) => write!(f, "{}", b),
        }
    }
}

/// Everything an expression can see while it is evaluated.
pub struct EvaluationContext<'a, 'd, N: DataSourceNode<'a>> {
    pub context_node: N,
    pub root_node: N,
    pub functions: &'d FunctionRegistry,
    /// 1-based.
    pub context_position: usize,
    pub context_size: usize,
    _marker: PhantomData<&'a ()>,
}

impl<'a, 'd, N: DataSourceNode<'a>> EvaluationContext<'a, 'd, N> {
    pub fn new(context_node: N, root_node: N, functions: &'d FunctionRegistry) -> Self {
        Self {
            context_node,
            root_node,
            functions,
            context_position: 1,
            context_size: 1,
            _marker: PhantomData,
        }
    }

    fn at(&self, context_node: N, context_position: usize, context_size: usize) -> Self {
        Self {
            context_node,
            root_node: self.root_node,
            functions: self.functions,
            context_position,
            context_size,
            _marker: PhantomData,
        }
    }
}

pub fn evaluate<'a, N>(
    expr: &Expression,
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> Result<XPathValue<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    match expr {
        Expression::Literal(s) => Ok(XPathValue::String(s.clone())),
        Expression::Number(n) => Ok(XPathValue::Number(*n)),
        Expression::LocationPath(path) => {
            evaluate_location_path(path, e_ctx).map(XPathValue::NodeSet)
        }
        Expression::Filter { expr, predicates } => {
            let nodes = evaluate(expr, e_ctx)?.into_nodes("a filter predicate")?;
            apply_predicates(nodes, predicates, e_ctx).map(XPathValue::NodeSet)
        }
        Expression::FunctionCall { name, args } => {
            let evaluated = args
                .iter()
                .map(|arg| evaluate(arg, e_ctx))
                .collect::<Result<Vec<_>, _>>()?;
            functions::call_function(name, evaluated, e_ctx)
        }
        Expression::BinaryOp { left, op, right } => {
            let left_val = evaluate(left, e_ctx)?;
            // `and` / `or` never look at the right operand once decided.
            match op {
                BinaryOperator::Or if left_val.to_bool() => Ok(XPathValue::Boolean(true)),
                BinaryOperator::And if !left_val.to_bool() => Ok(XPathValue::Boolean(false)),
                _ => operators::evaluate(*op, left_val, evaluate(right, e_ctx)?),
            }
        }
        Expression::Negate(inner) => Ok(XPathValue::Number(-evaluate(inner, e_ctx)?.to_number())),
    }
}

fn evaluate_location_path<'a, N>(
    path: &LocationPath,
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut current = match &path.start_point {
        Some(start) => evaluate(start, e_ctx)?.into_nodes("a path step")?,
        None if path.is_absolute => vec![e_ctx.root_node],
        None => vec![e_ctx.context_node],
    };
    for step in &path.steps {
        current = evaluate_step(step, &current, e_ctx)?;
    }
    Ok(current)
}

/// Runs one step from every context node, then merges the per-node results
/// into a single document-ordered set.
fn evaluate_step<'a, N>(
    step: &Step,
    context_nodes: &[N],
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    let mut merged = Vec::new();
    for &node in context_nodes {
        let candidates: Vec<N> = axes::collect(step.axis, node)
            .into_iter()
            .filter(|candidate| matches_node_test(candidate, &step.node_test, step.axis))
            .collect();
        merged.extend(apply_predicates(candidates, &step.predicates, e_ctx)?);
    }
    merged.sort();
    merged.dedup();
    Ok(merged)
}

fn matches_node_test<'a, N: DataSourceNode<'a>>(node: &N, test: &NodeTest, axis: Axis) -> bool {
    let principal = match axis {
        Axis::Attribute => NodeType::Attribute,
        _ => NodeType::Element,
    };
    match test {
        NodeTest::Wildcard => node.node_type() == principal,
        NodeTest::Name(name) => {
            node.node_type() == principal
                && node.name().is_some_and(|q| q.local_part.eq_ignore_ascii_case(name))
        }
        NodeTest::NodeType(NodeTypeTest::Text) => node.node_type() == NodeType::Text,
        NodeTest::NodeType(NodeTypeTest::Comment) => node.node_type() == NodeType::Comment,
        NodeTest::NodeType(NodeTypeTest::Node) => true,
    }
}

/// Filters `nodes` (in proximity order) through each predicate in turn.
/// A numeric predicate keeps the node at that position.
fn apply_predicates<'a, N>(
    mut nodes: Vec<N>,
    predicates: &[Expression],
    e_ctx: &EvaluationContext<'a, '_, N>,
) -> Result<Vec<N>, XPathError>
where
    N: DataSourceNode<'a> + 'a,
{
    for predicate in predicates {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (i, node) in nodes.into_iter().enumerate() {
            let keep = match evaluate(predicate, &e_ctx.at(node, i + 1, size))? {
                XPathValue::Number(n) => n == (i + 1) as f64,
                other => other.to_bool(),
            };
            if keep {
                kept.push(node);
            }
        }
        nodes = kept;
    }
    Ok(nodes)
}
