//! Parsing of RSQL filter expressions into an AST

mod ast;
mod parsing;

pub use ast::{Comparison, ComparisonOperator, Expression, LogicalOperator, Selector};
pub use parsing::{parse, ExpressionParseError};
