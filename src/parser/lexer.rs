//! Tokenizer for user-supplied query and update literals
//!
//! The lexer never panics. Characters outside the literal language become
//! `Unknown` tokens and malformed strings become `Invalid` tokens; rejecting
//! them is the parser's job.

use std::ops::Range;

/// Token types of the literal language
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// Identifier or keyword (`name`, `$gt`, `true`, `ObjectId`, `new`)
    Ident(String),
    /// String literal with escapes resolved
    String(String),
    /// Number literal, kept as source text
    Number(String),
    /// Regular expression literal: /pattern/flags
    Regex { pattern: String, flags: String },
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Comma,
    Colon,
    Minus,
    Plus,
    /// End of input
    Eof,
    /// Malformed token (unterminated string, bad escape)
    Invalid(String),
    /// Character outside the literal language
    Unknown(char),
}

/// Token with position information
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, span: Range<usize>) -> Self {
        Self { kind, span }
    }
}

/// Character-by-character scanner over a literal
pub struct LiteralLexer {
    input: Vec<char>,
    pos: usize,
}

impl LiteralLexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
        }
    }

    /// Tokenize the entire input; the last token is always `Eof`
    pub fn tokenize(input: &str) -> Vec<Token> {
        let mut lexer = Self::new(input);
        let mut tokens = Vec::new();

        loop {
            let token = lexer.next_token();
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        tokens
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;

        if self.is_at_end() {
            return Token::new(TokenKind::Eof, start..start);
        }

        let ch = self.current_char();

        let single = match ch {
            '{' => Some(TokenKind::LBrace),
            '}' => Some(TokenKind::RBrace),
            '[' => Some(TokenKind::LBracket),
            ']' => Some(TokenKind::RBracket),
            '(' => Some(TokenKind::LParen),
            ')' => Some(TokenKind::RParen),
            ',' => Some(TokenKind::Comma),
            ':' => Some(TokenKind::Colon),
            '-' => Some(TokenKind::Minus),
            '+' => Some(TokenKind::Plus),
            _ => None,
        };

        if let Some(kind) = single {
            self.advance();
            return Token::new(kind, start..self.pos);
        }

        match ch {
            '\'' | '"' => self.scan_string(ch, start),
            '/' => self.scan_regex(start),
            '0'..='9' => self.scan_number(start),
            '.' if self.peek_char().is_ascii_digit() => self.scan_number(start),
            c if c.is_alphabetic() || c == '_' || c == '$' => self.scan_identifier(start),
            _ => {
                self.advance();
                Token::new(TokenKind::Unknown(ch), start..self.pos)
            }
        }
    }

    /// Scan a quoted string literal
    fn scan_string(&mut self, quote: char, start: usize) -> Token {
        self.advance(); // opening quote

        let mut value = String::new();

        loop {
            if self.is_at_end() {
                return Token::new(
                    TokenKind::Invalid("Unterminated string literal".to_string()),
                    start..self.pos,
                );
            }

            let ch = self.current_char();
            self.advance();

            if ch == quote {
                break;
            }

            if ch != '\\' {
                value.push(ch);
                continue;
            }

            if self.is_at_end() {
                return Token::new(
                    TokenKind::Invalid("Unterminated string literal".to_string()),
                    start..self.pos,
                );
            }

            let escaped = self.current_char();
            self.advance();

            match escaped {
                'n' => value.push('\n'),
                't' => value.push('\t'),
                'r' => value.push('\r'),
                'b' => value.push('\u{0008}'),
                'f' => value.push('\u{000C}'),
                '0' => value.push('\0'),
                'u' => match self.scan_unicode_escape() {
                    Some(c) => value.push(c),
                    None => {
                        return Token::new(
                            TokenKind::Invalid("Invalid unicode escape".to_string()),
                            start..self.pos,
                        );
                    }
                },
                // \\ \' \" \/ and any other escaped char stand for themselves
                other => value.push(other),
            }
        }

        Token::new(TokenKind::String(value), start..self.pos)
    }

    /// Scan the four hex digits after `\u`
    fn scan_unicode_escape(&mut self) -> Option<char> {
        let mut code = 0u32;
        for _ in 0..4 {
            let digit = self.current_char().to_digit(16)?;
            code = code * 16 + digit;
            self.advance();
        }
        char::from_u32(code)
    }

    /// Scan a regular expression literal: /pattern/flags
    fn scan_regex(&mut self, start: usize) -> Token {
        self.advance(); // opening slash

        let mut pattern = String::new();
        let mut in_class = false;

        loop {
            if self.is_at_end() || self.current_char() == '\n' {
                return Token::new(
                    TokenKind::Invalid("Unterminated regular expression".to_string()),
                    start..self.pos,
                );
            }

            let ch = self.current_char();
            self.advance();

            match ch {
                '\\' => {
                    pattern.push(ch);
                    if !self.is_at_end() {
                        pattern.push(self.current_char());
                        self.advance();
                    }
                }
                '[' => {
                    in_class = true;
                    pattern.push(ch);
                }
                ']' => {
                    in_class = false;
                    pattern.push(ch);
                }
                '/' if !in_class => break,
                _ => pattern.push(ch),
            }
        }

        let mut flags = String::new();
        while !self.is_at_end() && self.current_char().is_ascii_alphabetic() {
            flags.push(self.current_char());
            self.advance();
        }

        Token::new(TokenKind::Regex { pattern, flags }, start..self.pos)
    }

    /// Scan a number: integer, decimal, or exponent form
    fn scan_number(&mut self, start: usize) -> Token {
        let mut value = String::new();

        self.take_digits(&mut value);

        if self.current_char() == '.' && self.peek_char().is_ascii_digit() {
            value.push('.');
            self.advance();
            self.take_digits(&mut value);
        }

        if matches!(self.current_char(), 'e' | 'E') {
            let sign = self.peek_char();
            let digit_follows = sign.is_ascii_digit()
                || (matches!(sign, '+' | '-') && self.char_at(self.pos + 2).is_ascii_digit());

            if digit_follows {
                value.push('e');
                self.advance();
                if matches!(self.current_char(), '+' | '-') {
                    value.push(self.current_char());
                    self.advance();
                }
                self.take_digits(&mut value);
            }
        }

        Token::new(TokenKind::Number(value), start..self.pos)
    }

    fn take_digits(&mut self, into: &mut String) {
        while !self.is_at_end() && self.current_char().is_ascii_digit() {
            into.push(self.current_char());
            self.advance();
        }
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self, start: usize) -> Token {
        let mut value = String::new();

        while !self.is_at_end() {
            let ch = self.current_char();
            if ch.is_alphanumeric() || ch == '_' || ch == '$' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::new(TokenKind::Ident(value), start..self.pos)
    }

    fn skip_whitespace(&mut self) {
        while !self.is_at_end() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    fn current_char(&self) -> char {
        self.char_at(self.pos)
    }

    fn peek_char(&self) -> char {
        self.char_at(self.pos + 1)
    }

    fn char_at(&self, index: usize) -> char {
        self.input.get(index).copied().unwrap_or('\0')
    }

    fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }
}
