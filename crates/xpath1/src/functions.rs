//! The XPath 1.0 core function library and the extension-function registry.

use super::engine::{EvaluationContext, XPathValue};
use crate::datasource::DataSourceNode;
use crate::error::XPathError;
use std::collections::HashMap;
use std::fmt;
use std::ops::RangeInclusive;

/// What an extension function hands back to the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtensionValue {
    String(String),
    Number(f64),
    Boolean(bool),
}

impl From<bool> for ExtensionValue {
    fn from(b: bool) -> Self {
        ExtensionValue::Boolean(b)
    }
}

impl From<String> for ExtensionValue {
    fn from(s: String) -> Self {
        ExtensionValue::String(s)
    }
}

impl From<f64> for ExtensionValue {
    fn from(n: f64) -> Self {
        ExtensionValue::Number(n)
    }
}

/// A host callback reachable from expressions as `prefix:name(...)`.
///
/// Arguments arrive as their XPath string values; an empty node-set arrives
/// as `None` so a missing attribute can be told apart from an empty one.
pub type ExtensionFunction = Box<dyn Fn(&[Option<String>]) -> Result<ExtensionValue, XPathError>>;

/// Namespace bindings plus the extension functions registered under them.
/// The core library is always available and needs no registration.
#[derive(Default)]
pub struct FunctionRegistry {
    namespaces: HashMap<String, String>,
    extensions: HashMap<(String, String), ExtensionFunction>,
}

impl fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("namespaces", &self.namespaces)
            .field("extensions", &self.extensions.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `prefix` to `uri` for function names in expressions.
    pub fn register_namespace(&mut self, prefix: impl Into<String>, uri: impl Into<String>) {
        self.namespaces.insert(prefix.into(), uri.into());
    }

    pub fn register_extension<F>(
        &mut self,
        uri: impl Into<String>,
        local_name: impl Into<String>,
        function: F,
    ) where
        F: Fn(&[Option<String>]) -> Result<ExtensionValue, XPathError> + 'static,
    {
        self.extensions
            .insert((uri.into(), local_name.into()), Box::new(function));
    }

    fn resolve(&self, prefix: &str, local_name: &str) -> Result<&ExtensionFunction, XPathError> {
        let name = format!("{}:{}", prefix, local_name);
        let uri = self
            .namespaces
            .get(prefix)
            .ok_or_else(|| XPathError::function(&name, "Undeclared namespace prefix"))?;
        self.extensions
            .get(&(uri.clone(), local_name.to_string()))
            .ok_or_else(|| XPathError::function(&name, "Unknown extension function"))
    }
}

/// Dispatches a call to an extension (prefixed name) or a core function.
pub fn call_function<'a, 'd, N: DataSourceNode<'a>>(
    name: &str,
    args: Vec<XPathValue<N>>,
    e_ctx: &EvaluationContext<'a, 'd, N>,
) -> Result<XPathValue<N>, XPathError> {
    if let Some((prefix, local_name)) = name.split_once(':') {
        let function = e_ctx.functions.resolve(prefix, local_name)?;
        let args: Vec<Option<String>> = args
            .iter()
            .map(|arg| match arg {
                XPathValue::NodeSet(nodes) if nodes.is_empty() => None,
                other => Some(other.to_string()),
            })
            .collect();
        log::trace!("calling extension {} with {:?}", name, args);
        return Ok(match function(&args)? {
            ExtensionValue::String(s) => XPathValue::String(s),
            ExtensionValue::Number(n) => XPathValue::Number(n),
            ExtensionValue::Boolean(b) => XPathValue::Boolean(b),
        });
    }

    let mut args = Args { name, values: args };
    let context_string = || e_ctx.context_node.string_value();
    let value = match name {
        // Node-set
        "position" => {
            args.arity(0..=0)?;
            XPathValue::Number(e_ctx.context_position as f64)
        }
        "last" => {
            args.arity(0..=0)?;
            XPathValue::Number(e_ctx.context_size as f64)
        }
        "count" => {
            args.arity(1..=1)?;
            XPathValue::Number(args.nodes()?.len() as f64)
        }
        "local-name" | "name" => {
            args.arity(0..=1)?;
            let node = match args.values.is_empty() {
                true => Some(e_ctx.context_node),
                false => args.nodes()?.first().copied(),
            };
            let qname = node.and_then(|n| n.name());
            XPathValue::String(match qname {
                Some(q) if name == "name" && q.prefix.is_some() => {
                    format!("{}:{}", q.prefix.unwrap_or_default(), q.local_part)
                }
                Some(q) => q.local_part.to_string(),
                None => String::new(),
            })
        }

        // String
        "string" => {
            args.arity(0..=1)?;
            XPathValue::String(args.string_or(context_string))
        }
        "concat" => {
            args.arity(2..=usize::MAX)?;
            XPathValue::String(args.values.iter().map(|v| v.to_string()).collect())
        }
        "starts-with" => {
            args.arity(2..=2)?;
            let (s, prefix) = args.two_strings();
            XPathValue::Boolean(s.starts_with(&prefix))
        }
        "contains" => {
            args.arity(2..=2)?;
            let (s, needle) = args.two_strings();
            XPathValue::Boolean(s.contains(&needle))
        }
        "substring-before" => {
            args.arity(2..=2)?;
            let (s, sep) = args.two_strings();
            XPathValue::String(s.find(&sep).map(|i| s[..i].to_string()).unwrap_or_default())
        }
        "substring-after" => {
            args.arity(2..=2)?;
            let (s, sep) = args.two_strings();
            XPathValue::String(
                s.find(&sep)
                    .map(|i| s[i + sep.len()..].to_string())
                    .unwrap_or_default(),
            )
        }
        "substring" => {
            args.arity(2..=3)?;
            let s = args.values[0].to_string();
            let start = (args.values[1].to_number() + 0.5).floor();
            let end = match args.values.get(2) {
                Some(len) => start + (len.to_number() + 0.5).floor(),
                None => f64::INFINITY,
            };
            XPathValue::String(
                s.chars()
                    .enumerate()
                    .filter(|(i, _)| {
                        let pos = (i + 1) as f64;
                        pos >= start && pos < end
                    })
                    .map(|(_, c)| c)
                    .collect(),
            )
        }
        "string-length" => {
            args.arity(0..=1)?;
            XPathValue::Number(args.string_or(context_string).chars().count() as f64)
        }
        "normalize-space" => {
            args.arity(0..=1)?;
            let s = args.string_or(context_string);
            XPathValue::String(s.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        "translate" => {
            args.arity(3..=3)?;
            let from: Vec<char> = args.values[1].to_string().chars().collect();
            let to: Vec<char> = args.values[2].to_string().chars().collect();
            XPathValue::String(
                args.values[0]
                    .to_string()
                    .chars()
                    .filter_map(|c| match from.iter().position(|&f| f == c) {
                        Some(i) => to.get(i).copied(),
                        None => Some(c),
                    })
                    .collect(),
            )
        }

        // Boolean
        "not" => {
            args.arity(1..=1)?;
            XPathValue::Boolean(!args.values[0].to_bool())
        }
        "boolean" => {
            args.arity(1..=1)?;
            XPathValue::Boolean(args.values[0].to_bool())
        }
        "true" | "false" => {
            args.arity(0..=0)?;
            XPathValue::Boolean(name == "true")
        }

        // Number
        "number" => {
            args.arity(0..=1)?;
            XPathValue::Number(match args.values.first() {
                Some(v) => v.to_number(),
                None => super::engine::string_to_number(&context_string()),
            })
        }
        "sum" => {
            args.arity(1..=1)?;
            XPathValue::Number(
                args.nodes()?
                    .iter()
                    .map(|n| super::engine::string_to_number(&n.string_value()))
                    .sum(),
            )
        }
        "floor" | "ceiling" | "round" => {
            args.arity(1..=1)?;
            let n = args.values[0].to_number();
            XPathValue::Number(match name {
                "floor" => n.floor(),
                "ceiling" => n.ceil(),
                _ if n.is_nan() || n.is_infinite() => n,
                // Halves round towards positive infinity.
                _ => (n + 0.5).floor(),
            })
        }
        _ => return Err(XPathError::function(name, "Unknown XPath function")),
    };
    Ok(value)
}

struct Args<'n, N> {
    name: &'n str,
    values: Vec<XPathValue<N>>,
}

impl<'a, N: DataSourceNode<'a>> Args<'_, N> {
    fn arity(&self, expected: RangeInclusive<usize>) -> Result<(), XPathError> {
        if expected.contains(&self.values.len()) {
            return Ok(());
        }
        let message = match (expected.start(), expected.end()) {
            (lo, hi) if lo == hi => format!("Expected {} argument(s)", lo),
            (lo, &usize::MAX) => format!("Expected at least {} arguments", lo),
            (lo, hi) => format!("Expected {} to {} arguments", lo, hi),
        };
        Err(XPathError::function(self.name, message))
    }

    fn nodes(&mut self) -> Result<Vec<N>, XPathError> {
        let first = std::mem::replace(&mut self.values[0], XPathValue::NodeSet(vec![]));
        first.into_nodes(&format!("{}()", self.name))
    }

    fn string_or(&self, default: impl FnOnce() -> String) -> String {
        match self.values.first() {
            Some(v) => v.to_string(),
            None => default(),
        }
    }

    fn two_strings(&self) -> (String, String) {
        (self.values[0].to_string(), self.values[1].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::mock::{MockNode, catalogue};
    use crate::engine::evaluate;
    use crate::parser::parse_expression;

    fn eval_str<'a>(funcs: &FunctionRegistry, node: MockNode<'a>, root: MockNode<'a>, xpath: &str) -> Result<String, XPathError> {
        let ctx = EvaluationContext::new(node, root, funcs);
        evaluate(&parse_expression(xpath)?, &ctx).map(|v| v.to_string())
    }

    fn class_registry() -> FunctionRegistry {
        let mut funcs = FunctionRegistry::new();
        funcs.register_namespace("t", "urn:test");
        funcs.register_extension("urn:test", "has-class", |args| {
            let list = args.first().cloned().flatten().unwrap_or_default();
            let class = args.get(1).cloned().flatten().unwrap_or_default();
            Ok(list.split_whitespace().any(|c| c == class).into())
        });
        funcs
    }

    #[test]
    fn core_string_functions() {
        let tree = catalogue();
        let funcs = FunctionRegistry::new();
        let root = tree.root();
        let eval = |x: &str| eval_str(&funcs, root, root, x).unwrap();
        assert_eq!(eval("concat('a', 1, 'b')"), "a1b");
        assert_eq!(eval("substring('12345', 1.5, 2.6)"), "234");
        assert_eq!(eval("substring-after('mailto:x@y', 'mailto:')"), "x@y");
        assert_eq!(eval("normalize-space('  a \n b ')"), "a b");
        assert_eq!(eval("translate('BAR', 'ABC', 'abc')"), "baR");
        assert_eq!(eval("string-length(//li[1])"), "3");
        assert_eq!(eval("contains(//a, 'Tw')"), "true");
    }

    #[test]
    fn core_number_and_node_functions() {
        let tree = catalogue();
        let funcs = FunctionRegistry::new();
        let root = tree.root();
        let eval = |x: &str| eval_str(&funcs, root, root, x).unwrap();
        assert_eq!(eval("count(//li)"), "3");
        assert_eq!(eval("round(-2.5)"), "-2");
        assert_eq!(eval("floor(2.7) + ceiling(0.2)"), "3");
        assert_eq!(eval("name(//a)"), "a");
        assert_eq!(eval("boolean(//table)"), "false");
    }

    #[test]
    fn wrong_arity_is_reported() {
        let tree = catalogue();
        let funcs = FunctionRegistry::new();
        let err = eval_str(&funcs, tree.root(), tree.root(), "contains('a')").unwrap_err();
        assert!(matches!(err, XPathError::FunctionError { function, .. } if function == "contains"));
    }

    #[test]
    fn extension_receives_none_for_missing_attribute() {
        let tree = catalogue();
        let funcs = class_registry();
        let root = tree.root();
        let ctx = EvaluationContext::new(root, root, &funcs);
        let expr = parse_expression("//li[t:has-class(@class, 'item')]").unwrap();
        let nodes = evaluate(&expr, &ctx).unwrap().into_nodes("test").unwrap();
        assert_eq!(nodes.iter().map(|n| n.id).collect::<Vec<_>>(), vec![3, 6]);
    }

    #[test]
    fn unregistered_prefix_or_name_fails() {
        let tree = catalogue();
        let funcs = class_registry();
        let root = tree.root();
        let err = eval_str(&funcs, root, root, "x:has-class('a', 'a')").unwrap_err();
        assert!(err.to_string().contains("Undeclared namespace prefix"));
        let err = eval_str(&funcs, root, root, "t:missing()").unwrap_err();
        assert!(err.to_string().contains("Unknown extension function"));
        let err = eval_str(&FunctionRegistry::new(), root, root, "frobnicate()").unwrap_err();
        assert!(err.to_string().contains("Unknown XPath function"));
    }
}
