use std::borrow::Cow;

use thiserror::Error;
use winnow::{
	ascii::{multispace0, multispace1, Caseless},
	combinator::{alt, delimited, eof, preceded, repeat, separated},
	error::{ContextError, StrContext},
	prelude::*,
	token::{any, literal, take_while},
};

use crate::services::filter::expression::ast::{
	Comparison, ComparisonOperator, Expression, LogicalOperator, Selector,
};

/// --- Error definitions ---
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpressionParseError {
	#[error("Invalid filter syntax at offset {offset}: {message}")]
	Syntax { offset: usize, message: String },
}

/// --- Helper aliases ---
type Input<'a> = &'a str;
type ParserResult<T> = winnow::Result<T>;

/// Characters that can never appear in a selector or an unquoted argument
const RESERVED: &[char] = &['"', '\'', '(', ')', ';', ',', '=', '<', '>', '!', '~'];

fn is_unreserved(c: char) -> bool {
	!c.is_whitespace() && !RESERVED.contains(&c)
}

/// --- Parser functions ---
/// Parses a selector such as "age" or "address.postalCode"
fn parse_selector<'a>(input: &mut Input<'a>) -> ParserResult<Selector<'a>> {
	take_while(1.., is_unreserved)
		.map(Selector::new)
		.context(StrContext::Label("selector"))
		.parse_next(input)
}

/// Parses a comparison operator in either its FIQL (=gt=) or its symbolic (>) form.
/// Handles optional whitespace around the operator
fn parse_comparison_operator<'a>(input: &mut Input<'a>) -> ParserResult<ComparisonOperator> {
	delimited(
		multispace0,
		alt((
			literal("==").value(ComparisonOperator::Eq),
			literal("!=").value(ComparisonOperator::Ne),
			literal("=gt=").value(ComparisonOperator::Gt),
			literal("=ge=").value(ComparisonOperator::Gte),
			literal("=lt=").value(ComparisonOperator::Lt),
			literal("=le=").value(ComparisonOperator::Lte),
			literal("=in=").value(ComparisonOperator::In),
			literal("=out=").value(ComparisonOperator::Out),
			// Two-character forms must be tried before their one-character prefixes
			literal(">=").value(ComparisonOperator::Gte),
			literal("<=").value(ComparisonOperator::Lte),
			literal(">").value(ComparisonOperator::Gt),
			literal("<").value(ComparisonOperator::Lt),
		)),
		multispace0,
	)
	.context(StrContext::Label("comparison operator"))
	.parse_next(input)
}

/// Parses a quoted argument, unescaping backslash sequences.
/// Arguments without escapes are borrowed from the input.
fn parse_quoted<'a>(input: &mut Input<'a>, quote: char) -> ParserResult<Cow<'a, str>> {
	literal(quote).parse_next(input)?;
	let plain: &'a str = take_while(0.., |c: char| c != quote && c != '\\').parse_next(input)?;
	if input.starts_with(quote) {
		any.parse_next(input)?;
		return Ok(Cow::Borrowed(plain));
	}

	let mut unescaped = plain.to_string();
	loop {
		match any.parse_next(input)? {
			'\\' => unescaped.push(any.parse_next(input)?),
			c if c == quote => return Ok(Cow::Owned(unescaped)),
			c => unescaped.push(c),
		}
	}
}

fn parse_double_quoted<'a>(input: &mut Input<'a>) -> ParserResult<Cow<'a, str>> {
	parse_quoted(input, '"')
}

fn parse_single_quoted<'a>(input: &mut Input<'a>) -> ParserResult<Cow<'a, str>> {
	parse_quoted(input, '\'')
}

fn parse_unquoted<'a>(input: &mut Input<'a>) -> ParserResult<Cow<'a, str>> {
	take_while(1.., is_unreserved)
		.map(Cow::Borrowed)
		.parse_next(input)
}

/// Parses a single argument: quoted with either quote style, or a bare word
fn parse_argument<'a>(input: &mut Input<'a>) -> ParserResult<Cow<'a, str>> {
	alt((parse_double_quoted, parse_single_quoted, parse_unquoted))
		.context(StrContext::Label("argument"))
		.parse_next(input)
}

/// Parses either a parenthesized argument list "(a, b)" or a single argument
fn parse_arguments<'a>(input: &mut Input<'a>) -> ParserResult<Vec<Cow<'a, str>>> {
	alt((
		delimited(
			(literal("("), multispace0),
			separated(1.., parse_argument, (multispace0, literal(","), multispace0)),
			(multispace0, literal(")")),
		),
		parse_argument.map(|argument| vec![argument]),
	))
	.parse_next(input)
}

/// Parses a comparison (e.g. "age=ge=18") into an `Expression::Comparison`
fn parse_comparison<'a>(input: &mut Input<'a>) -> ParserResult<Expression<'a>> {
	let selector = parse_selector.parse_next(input)?;
	let operator = parse_comparison_operator.parse_next(input)?;
	let arguments = parse_arguments.parse_next(input)?;

	if !operator.is_multi_value() && arguments.len() != 1 {
		let mut context = ContextError::new();
		context.push(StrContext::Label("single argument"));
		return Err(context);
	}

	Ok(Expression::Comparison(Comparison {
		selector,
		operator,
		arguments,
	}))
}

/// Parses the highest precedence components: comparisons and parenthesized groups
fn parse_term<'a>(input: &mut Input<'a>) -> ParserResult<Expression<'a>> {
	alt((
		delimited(
			(literal("("), multispace0),
			parse_or_expression,
			(multispace0, literal(")")),
		),
		parse_comparison,
	))
	.parse_next(input)
}

/// Parses ";" or the "and" keyword, which needs whitespace on both sides
fn parse_and_operator<'a>(input: &mut Input<'a>) -> ParserResult<LogicalOperator> {
	alt((
		delimited(multispace0, literal(";"), multispace0).void(),
		delimited(multispace1, literal(Caseless("and")), multispace1).void(),
	))
	.value(LogicalOperator::And)
	.parse_next(input)
}

/// Parses "," or the "or" keyword, which needs whitespace on both sides
fn parse_or_operator<'a>(input: &mut Input<'a>) -> ParserResult<LogicalOperator> {
	alt((
		delimited(multispace0, literal(","), multispace0).void(),
		delimited(multispace1, literal(Caseless("or")), multispace1).void(),
	))
	.value(LogicalOperator::Or)
	.parse_next(input)
}

fn combine<'a>(
	operator: LogicalOperator,
	first: Expression<'a>,
	rest: Vec<Expression<'a>>,
) -> Expression<'a> {
	let mut children = Vec::with_capacity(rest.len() + 1);
	children.push(first);
	children.extend(rest);
	Expression::logical(operator, children)
}

/// Parses the AND operator and its operands
fn parse_and_expression<'a>(input: &mut Input<'a>) -> ParserResult<Expression<'a>> {
	let first = parse_term.parse_next(input)?;
	let rest: Vec<Expression<'a>> =
		repeat(0.., preceded(parse_and_operator, parse_term)).parse_next(input)?;
	Ok(combine(LogicalOperator::And, first, rest))
}

/// Parses the OR operator and its operands
fn parse_or_expression<'a>(input: &mut Input<'a>) -> ParserResult<Expression<'a>> {
	let first = parse_and_expression.parse_next(input)?;
	let rest: Vec<Expression<'a>> =
		repeat(0.., preceded(parse_or_operator, parse_and_expression)).parse_next(input)?;
	Ok(combine(LogicalOperator::Or, first, rest))
}

/// Public method, which parses an RSQL filter into an `Expression` AST
pub fn parse(expression_str: &str) -> Result<Expression<'_>, ExpressionParseError> {
	// The whole input must be consumed, surrounding whitespace aside
	let mut full_expression_parser =
		delimited(multispace0, parse_or_expression, (multispace0, eof));

	full_expression_parser.parse(expression_str).map_err(|err| {
		let message = err.inner().to_string();
		ExpressionParseError::Syntax {
			offset: err.offset(),
			message: if message.is_empty() {
				"unexpected input".to_string()
			} else {
				message
			},
		}
	})
}
