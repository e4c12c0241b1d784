//! Query abstract syntax tree.
//!
//! Represents parsed query expressions and their canonical text form.

use std::fmt;

/// A parsed query expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryExpr {
    /// A single search term (bare word or quoted phrase).
    Term(String),

    /// A field qualifier restricting a value to a named attribute.
    Field {
        /// Field name, lower-cased.
        key: String,
        /// Field value: a single word or quoted phrase, never an expression.
        value: String,
    },

    /// Conjunction: both sub-expressions must match.
    And(Box<Self>, Box<Self>),

    /// Disjunction: at least one sub-expression must match.
    Or(Box<Self>, Box<Self>),
}

impl QueryExpr {
    /// Creates a term expression.
    pub fn term(value: impl Into<String>) -> Self {
        Self::Term(value.into())
    }

    /// Creates a field expression. The key is lower-cased here so every
    /// constructed tree satisfies the case-folding invariant.
    pub fn field(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Field {
            key: key.into().to_lowercase(),
            value: value.into(),
        }
    }

    /// Creates a conjunction.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Creates a disjunction.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// Formats the expression as a tree structure with the given indentation level.
    fn fmt_tree(&self, f: &mut fmt::Formatter<'_>, indent: usize) -> fmt::Result {
        let prefix = "  ".repeat(indent);
        match self {
            Self::Term(value) => writeln!(f, "{prefix}Term({value:?})"),
            Self::Field { key, value } => writeln!(f, "{prefix}Field({key:?}: {value:?})"),
            Self::And(left, right) => {
                writeln!(f, "{prefix}And")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
            Self::Or(left, right) => {
                writeln!(f, "{prefix}Or")?;
                left.fmt_tree(f, indent + 1)?;
                right.fmt_tree(f, indent + 1)
            }
        }
    }

    /// Formats the expression as canonical query text.
    ///
    /// Conjunctions and disjunctions are always fully parenthesized with
    /// explicit operators, whether or not the source used parentheses or an
    /// implicit AND: `a b OR c` renders as `((a AND b) OR c)`. The output
    /// re-parses to a structurally identical tree.
    ///
    /// Values containing a space are quoted, but embedded quote characters
    /// are not re-escaped, so a value holding a literal `"` does not
    /// round-trip byte-for-byte.
    pub fn to_query_string(&self) -> String {
        match self {
            Self::Term(value) => quote_value(value),
            Self::Field { key, value } => format!("{key}:{}", quote_value(value)),
            Self::And(left, right) => {
                format!("({} AND {})", left.to_query_string(), right.to_query_string())
            }
            Self::Or(left, right) => {
                format!("({} OR {})", left.to_query_string(), right.to_query_string())
            }
        }
    }
}

impl fmt::Display for QueryExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_tree(f, 0)
    }
}

/// Quotes a term or field value when it would not survive as a bare word.
fn quote_value(value: &str) -> String {
    if value.is_empty() || value.contains(' ') {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

/// Renders an expression as canonical query text.
///
/// Free-function form of [`QueryExpr::to_query_string`].
pub fn stringify(expr: &QueryExpr) -> String {
    expr.to_query_string()
}

/// The result of parsing a query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// The root expression, or `None` when the input had no terms at all.
    pub expression: Option<QueryExpr>,
}
