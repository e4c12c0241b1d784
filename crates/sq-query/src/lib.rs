//! Boolean search-query parsing and canonical serialization.
//!
//! This crate parses a small query language into an AST and can render the
//! AST back to canonical text:
//!
//! - **Terms**: `boots` - bare words
//! - **Phrases**: `"red shoes"` - quoted, with `\"` and `\\` escapes
//! - **Fields**: `color:red` - restrict a value to a named attribute
//! - **AND**: `a AND b`, or just `a b` - adjacency is the same conjunction
//! - **OR**: `a OR b` - AND binds tighter, both are right-associative
//! - **Grouping**: `(a OR b) c` - precedence control
//!
//! Parsing either yields a whole tree or fails with a positioned error;
//! there is no partial result. The canonical form is fully parenthesized
//! with explicit operators and re-parses to the same tree.
//!
//! # Example
//!
//! ```
//! use sq_query::{parse, stringify};
//!
//! let query = parse("category:\"winter boots\" color:black OR color:brown").unwrap();
//! let expr = query.expression.unwrap();
//! assert_eq!(
//!     stringify(&expr),
//!     "((category:\"winter boots\" AND color:black) OR color:brown)"
//! );
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod parser;

pub use ast::{QueryExpr, SearchQuery, stringify};
pub use error::{LexError, QueryError, QueryErrorKind, SyntaxError};
pub use lexer::{Spanned, Token, tokenize};
pub use parser::parse;
