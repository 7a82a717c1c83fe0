#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) enum TokenKind<'a> {
    Word(&'a str),
    Number(&'a str),
    LeftParen,
    RightParen,
    Comma,
    Other(&'a str),
    End,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub position: usize,
}

impl Token<'_> {
    pub fn text(&self) -> &str {
        match self.kind {
            TokenKind::Word(text) | TokenKind::Number(text) | TokenKind::Other(text) => text,
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::Comma => ",",
            TokenKind::End => "",
        }
    }
}

/// Splits WKT text into tokens. Whitespace separates tokens and is otherwise ignored.
pub(super) struct Lexer<'a> {
    text: &'a str,
    position: usize,
    peeked: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            position: 0,
            peeked: None,
        }
    }

    pub fn peek(&mut self) -> Token<'a> {
        match self.peeked {
            Some(token) => token,
            None => {
                let token = self.scan();
                self.peeked = Some(token);
                token
            }
        }
    }

    pub fn next(&mut self) -> Token<'a> {
        match self.peeked.take() {
            Some(token) => token,
            None => self.scan(),
        }
    }

    fn scan(&mut self) -> Token<'a> {
        let rest = &self.text[self.position..];
        let trimmed = rest.trim_start();
        let start = self.position + (rest.len() - trimmed.len());

        let Some(first) = trimmed.chars().next() else {
            self.position = self.text.len();
            return Token {
                kind: TokenKind::End,
                position: self.text.len(),
            };
        };

        let len = match first {
            '(' | ')' | ',' => 1,
            c if c.is_ascii_alphabetic() || c == '_' => trimmed
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(trimmed.len()),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => number_len(trimmed),
            c => c.len_utf8(),
        };

        let text = &trimmed[..len];
        let kind = match first {
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            ',' => TokenKind::Comma,
            c if c.is_ascii_alphabetic() || c == '_' => TokenKind::Word(text),
            c if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => TokenKind::Number(text),
            _ => TokenKind::Other(text),
        };

        self.position = start + len;
        Token {
            kind,
            position: start,
        }
    }
}

// Sign is allowed at the start and right after the exponent marker.
fn number_len(text: &str) -> usize {
    let bytes = text.as_bytes();
    let mut len = 1;
    while len < bytes.len() {
        let accepted = match bytes[len] {
            b'0'..=b'9' | b'.' | b'e' | b'E' => true,
            b'+' | b'-' => matches!(bytes[len - 1], b'e' | b'E'),
            _ => false,
        };
        if !accepted {
            break;
        }
        len += 1;
    }

    len
}
