//! This module defines the abstract syntax tree (AST) for RSQL filter expressions

use std::{borrow::Cow, fmt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
	Eq,
	Ne,
	Gt,
	Gte,
	Lt,
	Lte,
	In,
	Out,
}

impl ComparisonOperator {
	/// Canonical RSQL spelling of the operator
	pub fn symbol(&self) -> &'static str {
		match self {
			ComparisonOperator::Eq => "==",
			ComparisonOperator::Ne => "!=",
			ComparisonOperator::Gt => "=gt=",
			ComparisonOperator::Gte => "=ge=",
			ComparisonOperator::Lt => "=lt=",
			ComparisonOperator::Lte => "=le=",
			ComparisonOperator::In => "=in=",
			ComparisonOperator::Out => "=out=",
		}
	}

	/// Whether the operator accepts a parenthesized list of arguments
	pub fn is_multi_value(&self) -> bool {
		matches!(self, ComparisonOperator::In | ComparisonOperator::Out)
	}
}

impl fmt::Display for ComparisonOperator {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.symbol())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
	And,
	Or,
}

/// The left side of a comparison, e.g. "firstname" or "address.postalCode"
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector<'a> {
	raw: &'a str,
	segments: Vec<&'a str>,
}

impl<'a> Selector<'a> {
	pub fn new(raw: &'a str) -> Self {
		Self {
			raw,
			segments: raw.split('.').collect(),
		}
	}

	pub fn as_str(&self) -> &'a str {
		self.raw
	}

	/// Path segments in order. Never empty: a selector without dots has one segment.
	pub fn segments(&self) -> &[&'a str] {
		&self.segments
	}
}

impl fmt::Display for Selector<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.raw)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison<'a> {
	pub selector: Selector<'a>,
	pub operator: ComparisonOperator,
	// Quoted arguments with escapes are unescaped into owned strings
	pub arguments: Vec<Cow<'a, str>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression<'a> {
	Comparison(Comparison<'a>),
	Logical {
		operator: LogicalOperator,
		children: Vec<Expression<'a>>,
	},
}

impl<'a> Expression<'a> {
	/// Combines operands under a logical operator, collapsing a single operand
	/// into itself.
	pub(crate) fn logical(operator: LogicalOperator, mut children: Vec<Expression<'a>>) -> Self {
		if children.len() == 1 {
			if let Some(only) = children.pop() {
				return only;
			}
		}
		Expression::Logical { operator, children }
	}
}
