use crate::error::{SimError, Span};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenType {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,
    Dot,
    Question,
    Semicolon,

    // Arithmetic and their compound forms
    Minus,
    MinusMinus,
    MinusEqual,
    Plus,
    PlusPlus,
    PlusEqual,
    Slash,
    SlashEqual,
    Star,
    StarEqual,
    Percent,
    PercentEqual,

    // Comparison and logic
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    AndAnd,
    OrOr,

    // Literals
    Identifier,
    String,
    Char,
    Integer,
    Double,

    // Keywords
    Let,
    If,
    Else,
    While,
    Do,
    For,
    Break,
    Continue,
    Return,
    True,
    False,
    Null,
    New,

    // Special
    Eof,
}

/// For string and char tokens the lexeme holds the unescaped content;
/// for numbers it holds the digits without suffix or separators.
#[derive(Debug, Clone)]
pub struct Token {
    pub token_type: TokenType,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    pub fn new(token_type: TokenType, lexeme: String, span: Span) -> Self {
        Self {
            token_type,
            lexeme,
            span,
        }
    }
}

pub struct Lexer {
    source: String,
    chars: Vec<(usize, char)>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    keywords: HashMap<&'static str, TokenType>,
}

impl Lexer {
    pub fn new(source: String) -> Self {
        let mut keywords = HashMap::new();
        keywords.insert("let", TokenType::Let);
        keywords.insert("if", TokenType::If);
        keywords.insert("else", TokenType::Else);
        keywords.insert("while", TokenType::While);
        keywords.insert("do", TokenType::Do);
        keywords.insert("for", TokenType::For);
        keywords.insert("break", TokenType::Break);
        keywords.insert("continue", TokenType::Continue);
        keywords.insert("return", TokenType::Return);
        keywords.insert("true", TokenType::True);
        keywords.insert("false", TokenType::False);
        keywords.insert("null", TokenType::Null);
        keywords.insert("new", TokenType::New);

        let chars = source.char_indices().collect();
        Self {
            source,
            chars,
            tokens: Vec::new(),
            start: 0,
            current: 0,
            keywords,
        }
    }

    pub fn scan_tokens(&mut self) -> Result<Vec<Token>, SimError> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token()?;
        }

        self.tokens.push(Token::new(
            TokenType::Eof,
            "".to_string(),
            Span::single(self.source.len()),
        ));

        Ok(std::mem::take(&mut self.tokens))
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.chars.len()
    }

    /// Byte offset of the char at index `index`.
    fn offset(&self, index: usize) -> usize {
        self.chars
            .get(index)
            .map(|(offset, _)| *offset)
            .unwrap_or(self.source.len())
    }

    fn scan_token(&mut self) -> Result<(), SimError> {
        let c = self.advance();

        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            '[' => self.add_token(TokenType::LeftBracket),
            ']' => self.add_token(TokenType::RightBracket),
            ',' => self.add_token(TokenType::Comma),
            ':' => self.add_token(TokenType::Colon),
            '.' => self.add_token(TokenType::Dot),
            '?' => self.add_token(TokenType::Question),
            ';' => self.add_token(TokenType::Semicolon),
            '-' => {
                let token_type = if self.match_char('-') {
                    TokenType::MinusMinus
                } else if self.match_char('=') {
                    TokenType::MinusEqual
                } else {
                    TokenType::Minus
                };
                self.add_token(token_type);
            }
            '+' => {
                let token_type = if self.match_char('+') {
                    TokenType::PlusPlus
                } else if self.match_char('=') {
                    TokenType::PlusEqual
                } else {
                    TokenType::Plus
                };
                self.add_token(token_type);
            }
            '*' => {
                let token_type = if self.match_char('=') {
                    TokenType::StarEqual
                } else {
                    TokenType::Star
                };
                self.add_token(token_type);
            }
            '%' => {
                let token_type = if self.match_char('=') {
                    TokenType::PercentEqual
                } else {
                    TokenType::Percent
                };
                self.add_token(token_type);
            }
            '!' => {
                let token_type = if self.match_char('=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.add_token(token_type);
            }
            '=' => {
                let token_type = if self.match_char('=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.add_token(token_type);
            }
            '<' => {
                let token_type = if self.match_char('=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.add_token(token_type);
            }
            '>' => {
                let token_type = if self.match_char('=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.add_token(token_type);
            }
            '&' if self.match_char('&') => self.add_token(TokenType::AndAnd),
            '|' if self.match_char('|') => self.add_token(TokenType::OrOr),
            '/' => {
                if self.match_char('/') {
                    // Comment goes until end of line
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else if self.match_char('*') {
                    self.block_comment();
                } else if self.match_char('=') {
                    self.add_token(TokenType::SlashEqual);
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' | '\n' => {
                // Ignore whitespace
            }
            '"' => self.string()?,
            '\'' => self.char_literal()?,
            c if c.is_ascii_digit() => self.number()?,
            c if c.is_alphabetic() || c == '_' || c == '$' => self.identifier(),
            _ => {
                return Err(SimError::lex_error(
                    self.current_span(),
                    format!("Unexpected character: '{}'", c),
                ));
            }
        }

        Ok(())
    }

    fn advance(&mut self) -> char {
        match self.chars.get(self.current) {
            Some(&(_, c)) => {
                self.current += 1;
                c
            }
            None => '\0',
        }
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    fn peek(&self) -> char {
        self.chars.get(self.current).map(|&(_, c)| c).unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        self.peek_at(1)
    }

    fn peek_at(&self, ahead: usize) -> char {
        self.chars.get(self.current + ahead).map(|&(_, c)| c).unwrap_or('\0')
    }

    fn current_span(&self) -> Span {
        Span::new(self.offset(self.start), self.offset(self.current))
    }

    fn block_comment(&mut self) {
        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    /// Reads one possibly escaped character inside a quoted literal.
    fn quoted_char(&mut self) -> Result<char, SimError> {
        let c = self.advance();
        if c != '\\' {
            return Ok(c);
        }

        let escape = self.advance();
        let value = match escape {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            'b' => '\u{8}',
            'f' => '\u{c}',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'u' => {
                let mut code = String::new();
                while code.len() < 4 && self.peek().is_ascii_hexdigit() {
                    code.push(self.advance());
                }
                u32::from_str_radix(&code, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| {
                        SimError::lex_error(
                            self.current_span(),
                            format!("Illegal unicode escape: \\u{}", code),
                        )
                    })?
            }
            other => {
                return Err(SimError::lex_error(
                    self.current_span(),
                    format!("Illegal escape character: \\{}", other),
                ));
            }
        };
        Ok(value)
    }

    fn string(&mut self) -> Result<(), SimError> {
        let mut content = String::new();
        while self.peek() != '"' && self.peek() != '\n' && !self.is_at_end() {
            content.push(self.quoted_char()?);
        }

        if self.peek() != '"' {
            return Err(SimError::lex_error(
                self.current_span(),
                "Unterminated string".to_string(),
            ));
        }

        // Consume the closing "
        self.advance();
        self.add_token_with_content(TokenType::String, content);
        Ok(())
    }

    fn char_literal(&mut self) -> Result<(), SimError> {
        if self.peek() == '\'' || self.peek() == '\n' || self.is_at_end() {
            return Err(SimError::lex_error(
                self.current_span(),
                "Empty character literal".to_string(),
            ));
        }

        let value = self.quoted_char()?;
        if !self.match_char('\'') {
            return Err(SimError::lex_error(
                self.current_span(),
                "Unclosed character literal".to_string(),
            ));
        }

        self.add_token_with_content(TokenType::Char, value.to_string());
        Ok(())
    }

    fn number(&mut self) -> Result<(), SimError> {
        self.digits();

        let mut is_double = false;

        // Look for fractional part
        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            is_double = true;
            self.advance();
            self.digits();
        }

        // Exponent: e or E, optional sign, at least one digit
        if matches!(self.peek(), 'e' | 'E') {
            let signed = matches!(self.peek_next(), '+' | '-');
            let first_digit = if signed { self.peek_at(2) } else { self.peek_next() };
            if first_digit.is_ascii_digit() {
                is_double = true;
                self.advance();
                if signed {
                    self.advance();
                }
                self.digits();
            }
        }

        let digits: String = self.chars[self.start..self.current]
            .iter()
            .map(|&(_, c)| c)
            .filter(|&c| c != '_')
            .collect();

        match self.peek() {
            'L' | 'l' => {
                self.advance();
            }
            'd' | 'D' | 'f' | 'F' => {
                self.advance();
                is_double = true;
            }
            _ => {}
        }

        if is_double {
            if digits.parse::<f64>().is_err() {
                return Err(SimError::lex_error(
                    self.current_span(),
                    format!("Invalid double: {}", digits),
                ));
            }
            self.add_token_with_content(TokenType::Double, digits);
        } else {
            if digits.parse::<i64>().is_err() {
                return Err(SimError::lex_error(
                    self.current_span(),
                    format!("Integer number too large: {}", digits),
                ));
            }
            self.add_token_with_content(TokenType::Integer, digits);
        }

        Ok(())
    }

    fn digits(&mut self) {
        while self.peek().is_ascii_digit() || (self.peek() == '_' && self.peek_next().is_ascii_digit()) {
            self.advance();
        }
    }

    fn identifier(&mut self) {
        while self.peek().is_alphanumeric() || self.peek() == '_' || self.peek() == '$' {
            self.advance();
        }

        let text: String = self.chars[self.start..self.current]
            .iter()
            .map(|&(_, c)| c)
            .collect();
        let token_type = self
            .keywords
            .get(text.as_str())
            .cloned()
            .unwrap_or(TokenType::Identifier);

        self.add_token_with_content(token_type, text);
    }

    fn add_token(&mut self, token_type: TokenType) {
        let text = self.source[self.offset(self.start)..self.offset(self.current)].to_string();
        self.add_token_with_content(token_type, text);
    }

    fn add_token_with_content(&mut self, token_type: TokenType, lexeme: String) {
        let span = self.current_span();
        self.tokens.push(Token::new(token_type, lexeme, span));
    }
}
