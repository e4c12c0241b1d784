//! Query parser.
//!
//! Parses a token stream into a query AST using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! query      → or_expr | ε
//! or_expr    → and_expr ("OR" and_expr)*
//! and_expr   → primary (("AND")? primary)*
//! primary    → WORD | PHRASE | field | "(" or_expr ")"
//! field      → WORD ":" (WORD | PHRASE)
//! ```
//!
//! AND binds tighter than OR, and juxtaposition (the optional AND between
//! adjacent primaries) is the same operator as the explicit keyword: `a b`
//! and `a AND b` build identical trees. Both operators are right-associative,
//! so `a AND b AND c` groups as `And(a, And(b, c))`. Operator chains are
//! collected iteratively and folded from the right; recursion happens only
//! through parenthesized groups, and its depth is bounded.

use std::mem;

use crate::{
    ast::{QueryExpr, SearchQuery},
    error::{QueryError, SyntaxError},
    lexer::{Spanned, Token, tokenize},
};

/// Maximum nesting depth for parenthesized groups.
const MAX_DEPTH: usize = 128;

/// Recursive descent parser for query expressions.
struct Parser {
    /// Token stream to parse.
    tokens: Vec<Spanned>,
    /// Current position in the token stream.
    position: usize,
    /// Current group nesting depth.
    depth: usize,
}

impl Parser {
    /// Creates a new parser from a token stream.
    fn new(tokens: Vec<Spanned>) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parses the token stream into an expression, or None for no tokens.
    fn parse(mut self) -> Result<Option<QueryExpr>, SyntaxError> {
        if self.tokens.is_empty() {
            return Ok(None);
        }

        let expr = self.parse_or_expr()?;

        if let Some(spanned) = self.peek() {
            return Err(SyntaxError::new(
                format!("unexpected {}", spanned.token.describe()),
                Some(spanned.pos),
            ));
        }

        Ok(Some(expr))
    }

    /// Parses: or_expr → and_expr ("OR" and_expr)*
    fn parse_or_expr(&mut self) -> Result<QueryExpr, SyntaxError> {
        let first = self.parse_and_expr()?;

        let mut rest = Vec::new();
        while self.check(&Token::Or) {
            self.advance(); // consume OR
            rest.push(self.parse_and_expr()?);
        }

        Ok(fold_right(first, rest, QueryExpr::or))
    }

    /// Parses: and_expr → primary (("AND")? primary)*
    ///
    /// The operator between two primaries is optional; adjacency alone is a
    /// conjunction of the same strength.
    fn parse_and_expr(&mut self) -> Result<QueryExpr, SyntaxError> {
        let first = self.parse_primary()?;

        let mut rest = Vec::new();
        loop {
            if self.check(&Token::And) {
                self.advance(); // consume AND
                rest.push(self.parse_primary()?);
            } else if self.can_start_primary() {
                rest.push(self.parse_primary()?);
            } else {
                break;
            }
        }

        Ok(fold_right(first, rest, QueryExpr::and))
    }

    /// Checks if the current token can start a primary expression.
    fn can_start_primary(&self) -> bool {
        matches!(
            self.peek().map(|spanned| &spanned.token),
            Some(Token::Word(_) | Token::Phrase(_) | Token::LParen)
        )
    }

    /// Parses: primary → WORD | PHRASE | field | "(" or_expr ")"
    fn parse_primary(&mut self) -> Result<QueryExpr, SyntaxError> {
        let Some(spanned) = self.peek().cloned() else {
            return Err(SyntaxError::new("unexpected end of query", None));
        };

        match spanned.token {
            Token::Word(text) => {
                self.advance();
                if self.check(&Token::Colon) {
                    self.advance(); // consume :
                    self.parse_field_value(&text)
                } else {
                    Ok(QueryExpr::term(text))
                }
            }

            Token::Phrase(text) => {
                self.advance();
                Ok(QueryExpr::term(text))
            }

            Token::LParen => self.parse_group(spanned.pos),

            Token::RParen => Err(SyntaxError::new(
                "unexpected closing parenthesis",
                Some(spanned.pos),
            )),

            Token::And | Token::Or => Err(SyntaxError::new(
                format!(
                    "unexpected {} (needs an expression before it)",
                    spanned.token.describe()
                ),
                Some(spanned.pos),
            )),

            Token::Colon => Err(SyntaxError::new(
                "unexpected ':' (missing field name before it)",
                Some(spanned.pos),
            )),
        }
    }

    /// Parses the value after `key:`. Only a single word or quoted phrase is
    /// accepted; a group is not a valid field value.
    fn parse_field_value(&mut self, key: &str) -> Result<QueryExpr, SyntaxError> {
        match self.peek().cloned() {
            Some(Spanned {
                token: Token::Word(value) | Token::Phrase(value),
                ..
            }) => {
                self.advance();
                Ok(QueryExpr::field(key, value))
            }
            Some(spanned) => Err(SyntaxError::new(
                format!(
                    "expected a word or quoted phrase after '{key}:', found {}",
                    spanned.token.describe()
                ),
                Some(spanned.pos),
            )),
            None => Err(SyntaxError::new(
                format!("expected a word or quoted phrase after '{key}:'"),
                None,
            )),
        }
    }

    /// Parses a parenthesized group, consuming the surrounding parentheses.
    fn parse_group(&mut self, open_pos: usize) -> Result<QueryExpr, SyntaxError> {
        if self.depth >= MAX_DEPTH {
            return Err(SyntaxError::new(
                format!("groups nested deeper than {MAX_DEPTH} levels"),
                Some(open_pos),
            ));
        }

        self.depth += 1;
        self.advance(); // consume (
        let inner = self.parse_or_expr()?;
        self.depth -= 1;

        if !self.check(&Token::RParen) {
            return Err(SyntaxError::new(
                "expected closing parenthesis",
                self.peek().map(|spanned| spanned.pos),
            ));
        }
        self.advance(); // consume )

        Ok(inner)
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.position)
    }

    /// Checks if the current token matches the given token kind.
    fn check(&self, token: &Token) -> bool {
        self.peek()
            .map(|spanned| mem::discriminant(&spanned.token) == mem::discriminant(token))
            .unwrap_or(false)
    }

    /// Advances to the next token.
    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }
}

/// Combines a non-empty operand chain right-associatively:
/// `[a, b, c]` becomes `combine(a, combine(b, c))`.
fn fold_right(
    first: QueryExpr,
    rest: Vec<QueryExpr>,
    combine: fn(QueryExpr, QueryExpr) -> QueryExpr,
) -> QueryExpr {
    match rest.into_iter().rev().reduce(|right, left| combine(left, right)) {
        Some(tail) => combine(first, tail),
        None => first,
    }
}

/// Parses a query string into a [`SearchQuery`].
///
/// The expression is `None` only when the input contained no terms at all.
/// Malformed input fails with a [`QueryError`] carrying the offending
/// position; there is no partial result or recovery.
pub fn parse(input: &str) -> Result<SearchQuery, QueryError> {
    let tokens = tokenize(input)?;
    let expression = Parser::new(tokens)
        .parse()
        .map_err(|err| QueryError::syntax(err, input))?;
    Ok(SearchQuery { expression })
}
