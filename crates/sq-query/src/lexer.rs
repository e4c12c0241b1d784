//! Query lexer (tokenizer).
//!
//! Converts a query string into a stream of tokens for the parser.

use std::{iter::Peekable, str::Chars};

use crate::error::LexError;

/// A token in the query language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A bare word (search term or field name).
    Word(String),

    /// A quoted phrase (quotes stripped, escapes decoded).
    Phrase(String),

    /// The AND keyword.
    And,

    /// The OR keyword.
    Or,

    /// Field separator (:).
    Colon,

    /// Left parenthesis.
    LParen,

    /// Right parenthesis.
    RParen,
}

impl Token {
    /// Describes the token for error messages.
    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Word(text) => format!("word '{text}'"),
            Self::Phrase(text) => format!("phrase \"{text}\""),
            Self::And => "'AND'".to_string(),
            Self::Or => "'OR'".to_string(),
            Self::Colon => "':'".to_string(),
            Self::LParen => "'('".to_string(),
            Self::RParen => "')'".to_string(),
        }
    }
}

/// A token together with the byte offset where it started in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    /// The token itself.
    pub token: Token,
    /// Starting byte position in the original input.
    pub pos: usize,
}

/// Tokenizes a query string.
struct Lexer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current byte position in input.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    /// Creates an error at a specific position.
    fn error_at(&self, message: impl Into<String>, position: usize) -> LexError {
        LexError::new(message, position, self.input)
    }

    /// Tokenizes the entire input, returning all tokens or an error.
    fn tokenize(mut self) -> Result<Vec<Spanned>, LexError> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }

        Ok(tokens)
    }

    /// Returns the next token, or None if at end of input.
    fn next_token(&mut self) -> Result<Option<Spanned>, LexError> {
        self.skip_whitespace();

        let pos = self.position;
        let Some(&ch) = self.chars.peek() else {
            return Ok(None);
        };

        let token = match ch {
            '"' => self.read_phrase(pos)?,
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            ':' => {
                self.advance();
                Token::Colon
            }
            _ => self.read_word_or_keyword(),
        };

        Ok(Some(Spanned { token, pos }))
    }

    /// Reads a quoted phrase, decoding `\"` and `\\` escapes.
    ///
    /// Any other backslash sequence passes through unchanged, backslash
    /// included.
    fn read_phrase(&mut self, start_pos: usize) -> Result<Token, LexError> {
        self.advance(); // consume opening quote

        let mut content = String::new();

        loop {
            match self.chars.peek() {
                Some(&'"') => {
                    self.advance(); // consume closing quote
                    return Ok(Token::Phrase(content));
                }
                Some(&'\\') => {
                    self.advance(); // consume backslash
                    match self.chars.peek().copied() {
                        Some(escaped @ ('"' | '\\')) => {
                            content.push(escaped);
                            self.advance();
                        }
                        Some(other) => {
                            content.push('\\');
                            content.push(other);
                            self.advance();
                        }
                        None => return Err(self.error_at("unterminated quote", start_pos)),
                    }
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => {
                    return Err(self.error_at("unterminated quote", start_pos));
                }
            }
        }
    }

    /// Checks whether the input at the current position is an AND/OR keyword
    /// followed by whitespace, a parenthesis, or end of input.
    fn keyword_lookahead(&self) -> Option<(Token, &'static str)> {
        let rest = &self.input[self.position..];
        for (keyword, token) in [("AND", Token::And), ("OR", Token::Or)] {
            let Some(after) = rest.strip_prefix(keyword) else {
                continue;
            };
            match after.chars().next() {
                None | Some('(') | Some(')') => return Some((token, keyword)),
                Some(ch) if ch.is_whitespace() => return Some((token, keyword)),
                Some(_) => {}
            }
        }
        None
    }

    /// Reads a word or an AND/OR keyword.
    ///
    /// Keywords are recognized twice: first by lookahead (keyword followed
    /// by whitespace, parenthesis, or end of input), then again by
    /// reclassifying a maximal word whose text is exactly AND/OR. The second
    /// check means `AND:value` still lexes as an operator followed by a
    /// colon, so it cannot parse as a field.
    fn read_word_or_keyword(&mut self) -> Token {
        if let Some((token, keyword)) = self.keyword_lookahead() {
            for _ in 0..keyword.len() {
                self.advance();
            }
            return token;
        }

        let mut word = String::new();

        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '"' | '(' | ')' | ':') {
                break;
            }
            word.push(ch);
            self.advance();
        }

        match word.as_str() {
            "AND" => Token::And,
            "OR" => Token::Or,
            _ => Token::Word(word),
        }
    }

    /// Skips whitespace characters.
    fn skip_whitespace(&mut self) {
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if let Some(ch) = self.chars.next() {
            self.position += ch.len_utf8();
        }
    }
}

/// Convenience function to tokenize a query string.
pub fn tokenize(input: &str) -> Result<Vec<Spanned>, LexError> {
    Lexer::new(input).tokenize()
}
