//! A `nom`-based parser for the XPath 1.0 expression language.

use super::ast::*;
use crate::error::XPathError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit0, digit1, multispace0, satisfy},
    combinator::{map, map_opt, map_res, not, opt, peek, recognize},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

type PResult<'a, O> = IResult<&'a str, O>;

pub fn parse_expression(input: &str) -> Result<Expression, XPathError> {
    match expression(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(XPathError::XPathParse(
            input.to_string(),
            format!("Parser did not consume all input. Remainder: '{}'", rem),
        )),
        Err(e) => Err(XPathError::XPathParse(input.to_string(), e.to_string())),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// A word operator such as `and`, which must not run into a following name.
fn keyword<'a>(
    word: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = nom::error::Error<&'a str>> {
    terminated(tag(word), not(satisfy(is_name_char)))
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> PResult<'a, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = nom::error::Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = nom::error::Error<&'a str>> + Clone,
{
    move |input: &'a str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;

        for (op, right) in remainder {
            left = Expression::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

// --- Expression Parsers (lowest precedence first) ---

fn expression(input: &str) -> PResult<'_, Expression> {
    or_expr(input)
}

fn or_op(input: &str) -> PResult<'_, BinaryOperator> {
    map(keyword("or"), |_| BinaryOperator::Or).parse(input)
}

fn and_op(input: &str) -> PResult<'_, BinaryOperator> {
    map(keyword("and"), |_| BinaryOperator::And).parse(input)
}

fn equality_op(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        map(tag("="), |_| BinaryOperator::Equals),
        map(tag("!="), |_| BinaryOperator::NotEquals),
    ))
    .parse(input)
}

fn relational_op(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        map(tag("<="), |_| BinaryOperator::LessThanOrEqual),
        map(tag(">="), |_| BinaryOperator::GreaterThanOrEqual),
        map(tag("<"), |_| BinaryOperator::LessThan),
        map(tag(">"), |_| BinaryOperator::GreaterThan),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        map(char('+'), |_| BinaryOperator::Plus),
        map(char('-'), |_| BinaryOperator::Minus),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> PResult<'_, BinaryOperator> {
    alt((
        map(char('*'), |_| BinaryOperator::Multiply),
        map(keyword("div"), |_| BinaryOperator::Divide),
        map(keyword("mod"), |_| BinaryOperator::Modulo),
    ))
    .parse(input)
}

fn union_op(input: &str) -> PResult<'_, BinaryOperator> {
    map(char('|'), |_| BinaryOperator::Union).parse(input)
}

fn or_expr(input: &str) -> PResult<'_, Expression> {
    build_binary_expr_parser(and_expr, or_op)(input)
}

fn and_expr(input: &str) -> PResult<'_, Expression> {
    build_binary_expr_parser(equality_expr, and_op)(input)
}

fn equality_expr(input: &str) -> PResult<'_, Expression> {
    build_binary_expr_parser(relational_expr, equality_op)(input)
}

fn relational_expr(input: &str) -> PResult<'_, Expression> {
    build_binary_expr_parser(additive_expr, relational_op)(input)
}

fn additive_expr(input: &str) -> PResult<'_, Expression> {
    build_binary_expr_parser(multiplicative_expr, additive_op)(input)
}

fn multiplicative_expr(input: &str) -> PResult<'_, Expression> {
    build_binary_expr_parser(unary_expr, multiplicative_op)(input)
}

fn unary_expr(input: &str) -> PResult<'_, Expression> {
    alt((
        map(preceded(ws(char('-')), unary_expr), |e| {
            Expression::Negate(Box::new(e))
        }),
        union_expr,
    ))
    .parse(input)
}

fn union_expr(input: &str) -> PResult<'_, Expression> {
    build_binary_expr_parser(spaced_path_expr, union_op)(input)
}

fn spaced_path_expr(input: &str) -> PResult<'_, Expression> {
    ws(path_expr).parse(input)
}

/// A path is either a plain location path or a filter expression
/// (`primary[pred]...`) optionally continued by `/step` or `//step`.
fn path_expr(input: &str) -> PResult<'_, Expression> {
    // Primary expressions go first: `position()` would otherwise be read as
    // a step named `position`.
    if let Ok((i, filter)) = filter_expr(input) {
        let (i, rest) = relative_steps(i)?;
        if rest.is_empty() {
            return Ok((i, filter));
        }
        let path = LocationPath {
            start_point: Some(Box::new(filter)),
            is_absolute: false,
            steps: rest,
        };
        return Ok((i, Expression::LocationPath(path)));
    }
    map(location_path, Expression::LocationPath).parse(input)
}

fn filter_expr(input: &str) -> PResult<'_, Expression> {
    let (i, primary) = primary_expr(input)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    if predicates.is_empty() {
        return Ok((i, primary));
    }
    Ok((
        i,
        Expression::Filter {
            expr: Box::new(primary),
            predicates,
        },
    ))
}

fn primary_expr(input: &str) -> PResult<'_, Expression> {
    alt((
        map(number_literal, Expression::Number),
        map(string_literal, Expression::Literal),
        function_call,
        delimited(ws(char('(')), expression, ws(char(')'))),
    ))
    .parse(input)
}

// --- Literal Parsers ---

/// `12`, `12.`, `12.5` or `.5`. No sign, no exponent.
fn number_literal(input: &str) -> PResult<'_, f64> {
    map_res(
        alt((
            recognize(pair(digit1, opt(pair(char('.'), digit0)))),
            recognize(pair(char('.'), digit1)),
        )),
        str::parse::<f64>,
    )
    .parse(input)
}

fn string_literal(input: &str) -> PResult<'_, String> {
    map(
        alt((
            delimited(char('\''), take_while(|c| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c| c != '"'), char('"')),
        )),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

// --- Name and NodeTest Parsers ---

fn nc_name(input: &str) -> PResult<'_, &str> {
    recognize(pair(take_while1(is_name_start), take_while(is_name_char))).parse(input)
}

fn q_name(input: &str) -> PResult<'_, String> {
    map(
        recognize(pair(nc_name, opt(pair(char(':'), nc_name)))),
        |s: &str| s.to_string(),
    )
    .parse(input)
}

fn node_type_test(input: &str) -> PResult<'_, NodeTest> {
    map(
        terminated(
            alt((tag("text"), tag("node"), tag("comment"))),
            pair(ws(char('(')), char(')')),
        ),
        |node_type: &str| match node_type {
            "text" => NodeTest::NodeType(NodeTypeTest::Text),
            "comment" => NodeTest::NodeType(NodeTypeTest::Comment),
            _ => NodeTest::NodeType(NodeTypeTest::Node),
        },
    )
    .parse(input)
}

fn node_test(input: &str) -> PResult<'_, NodeTest> {
    alt((
        map(char('*'), |_| NodeTest::Wildcard),
        node_type_test,
        map(q_name, NodeTest::Name),
    ))
    .parse(input)
}

// --- Path Parsers ---

fn axis(input: &str) -> PResult<'_, Axis> {
    map_opt(
        terminated(
            take_while1(|c: char| c.is_ascii_lowercase() || c == '-'),
            ws(tag("::")),
        ),
        |name: &str| {
            Some(match name {
                "child" => Axis::Child,
                "descendant" => Axis::Descendant,
                "descendant-or-self" => Axis::DescendantOrSelf,
                "attribute" => Axis::Attribute,
                "parent" => Axis::Parent,
                "ancestor" => Axis::Ancestor,
                "ancestor-or-self" => Axis::AncestorOrSelf,
                "self" => Axis::SelfAxis,
                "following-sibling" => Axis::FollowingSibling,
                "preceding-sibling" => Axis::PrecedingSibling,
                "following" => Axis::Following,
                "preceding" => Axis::Preceding,
                _ => return None,
            })
        },
    )
    .parse(input)
}

fn predicate(input: &str) -> PResult<'_, Expression> {
    delimited(ws(char('[')), expression, ws(char(']'))).parse(input)
}

fn step(input: &str) -> PResult<'_, Step> {
    let any_node = || NodeTest::NodeType(NodeTypeTest::Node);
    let (i, (axis, node_test)) = alt((
        map(tag(".."), |_| (Axis::Parent, any_node())),
        map(tag("."), |_| (Axis::SelfAxis, any_node())),
        map(preceded(ws(char('@')), node_test), |nt| (Axis::Attribute, nt)),
        map(pair(opt(axis), node_test), |(ax, nt)| {
            (ax.unwrap_or(Axis::Child), nt)
        }),
    ))
    .parse(input)?;
    let (i, predicates) = many0(predicate).parse(i)?;
    Ok((
        i,
        Step {
            axis,
            node_test,
            predicates,
        },
    ))
}

/// Zero or more `/step` or `//step` continuations.
fn relative_steps(input: &str) -> PResult<'_, Vec<Step>> {
    let (i, remainder) =
        many0(pair(ws(alt((tag("//"), tag("/")))), step)).parse(input)?;
    let mut steps = Vec::with_capacity(remainder.len());
    for (sep, next_step) in remainder {
        if sep == "//" {
            steps.push(Step::descendant_or_self());
        }
        steps.push(next_step);
    }
    Ok((i, steps))
}

fn location_path(input: &str) -> PResult<'_, LocationPath> {
    let (i, (is_absolute, mut steps)) = if let Ok((rem, _)) = tag::<_, _, nom::error::Error<&str>>("//").parse(input) {
        let (rem, first) = preceded(multispace0, step).parse(rem)?;
        (rem, (true, vec![Step::descendant_or_self(), first]))
    } else if let Ok((rem, _)) = char::<_, nom::error::Error<&str>>('/').parse(input) {
        match preceded(multispace0, step).parse(rem) {
            Ok((rem, first)) => (rem, (true, vec![first])),
            // A bare `/` selects the root.
            Err(_) => (rem, (true, vec![])),
        }
    } else {
        let (rem, first) = step(input)?;
        (rem, (false, vec![first]))
    };

    if steps.is_empty() {
        return Ok((
            i,
            LocationPath {
                start_point: None,
                is_absolute,
                steps,
            },
        ));
    }
    let (i, rest) = relative_steps(i)?;
    steps.extend(rest);
    Ok((
        i,
        LocationPath {
            start_point: None,
            is_absolute,
            steps,
        },
    ))
}

// --- Function Call Parser ---

fn function_call(input: &str) -> PResult<'_, Expression> {
    // A name followed by '(' is a call, except for node-type tests like text().
    let (i, name) = q_name(input)?;
    let (i, _) = peek(preceded(multispace0, char('('))).parse(i)?;
    if matches!(name.as_str(), "text" | "node" | "comment") {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Verify,
        )));
    }

    let (i, args) = delimited(
        ws(char('(')),
        separated_list0(ws(char(',')), expression),
        preceded(multispace0, char(')')),
    )
    .parse(i)?;

    Ok((i, Expression::FunctionCall { name, args }))
}
