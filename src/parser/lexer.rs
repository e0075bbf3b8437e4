//! Tokenizer for the table-literal subset of Lua

use crate::error::ParseError;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Name(String),
    /// Reserved word other than `true`, `false`, `nil` and `local`
    Keyword(String),
    String(String),
    Integer(i64),
    Number(f64),
    True,
    False,
    Nil,
    Local,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Assign,
    Comma,
    Semicolon,
    Minus,
    /// Any other operator or punctuation; only reported in errors
    Symbol(char),
    Eof,
}

impl Token {
    pub fn describe(&self) -> String {
        match self {
            Token::Name(n) => format!("name '{}'", n),
            Token::Keyword(k) => format!("keyword '{}'", k),
            Token::String(_) => "string".to_string(),
            Token::Integer(_) | Token::Number(_) => "number".to_string(),
            Token::True => "'true'".to_string(),
            Token::False => "'false'".to_string(),
            Token::Nil => "'nil'".to_string(),
            Token::Local => "'local'".to_string(),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::LBracket => "'['".to_string(),
            Token::RBracket => "']'".to_string(),
            Token::Assign => "'='".to_string(),
            Token::Comma => "','".to_string(),
            Token::Semicolon => "';'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Symbol(c) => format!("'{}'", c),
            Token::Eof => "end of input".to_string(),
        }
    }
}

/// Token with the position of its first character (1-based)
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

const KEYWORDS: &[&str] = &[
    "and", "break", "do", "else", "elseif", "end", "for", "function", "goto", "if", "in",
    "not", "or", "repeat", "return", "then", "until", "while",
];

pub struct Lexer<'a> {
    src: &'a [u8],
    pos: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let src = source.as_bytes();
        // UTF-8 byte order mark written by some editors
        let pos = if src.starts_with(&[0xEF, 0xBB, 0xBF]) { 3 } else { 0 };
        Self {
            src,
            pos,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input, ending with `Token::Eof`
    pub fn tokenize(mut self) -> Result<Vec<Spanned>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            let spanned = self.next_token()?;
            let done = spanned.token == Token::Eof;
            tokens.push(spanned);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ParseError {
        ParseError::new(self.line, self.column, message)
    }

    fn next_token(&mut self) -> Result<Spanned, ParseError> {
        self.skip_trivia()?;

        let (line, column) = (self.line, self.column);
        let token = match self.peek() {
            None => Token::Eof,
            Some(c) => match c {
                b'{' => self.single(Token::LBrace),
                b'}' => self.single(Token::RBrace),
                b']' => self.single(Token::RBracket),
                b'=' => self.single(Token::Assign),
                b',' => self.single(Token::Comma),
                b';' => self.single(Token::Semicolon),
                b'-' => self.single(Token::Minus),
                b'[' => match self.long_bracket_level() {
                    Some(level) => Token::String(self.read_long_bracket(level)?),
                    None => {
                        if self.peek_at(1) == Some(b'=') {
                            return Err(self.error("invalid long string delimiter"));
                        }
                        self.single(Token::LBracket)
                    }
                },
                b'"' | b'\'' => Token::String(self.read_string()?),
                b'0'..=b'9' => self.read_number()?,
                b'.' if self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) => {
                    self.read_number()?
                }
                c if c == b'_' || c.is_ascii_alphabetic() => self.read_name(),
                c if c.is_ascii() => {
                    self.bump();
                    Token::Symbol(c as char)
                }
                _ => return Err(self.error("unexpected non-ASCII character")),
            },
        };

        Ok(Spanned {
            token,
            line,
            column,
        })
    }

    fn single(&mut self, token: Token) -> Token {
        self.bump();
        token
    }

    fn skip_trivia(&mut self) -> Result<(), ParseError> {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                self.bump();
            } else if c == b'-' && self.peek_at(1) == Some(b'-') {
                self.bump();
                self.bump();
                match self.long_bracket_level() {
                    Some(level) => {
                        self.read_long_bracket(level)?;
                    }
                    None => {
                        while let Some(c) = self.peek() {
                            if c == b'\n' {
                                break;
                            }
                            self.bump();
                        }
                    }
                }
            } else {
                break;
            }
        }
        Ok(())
    }

    /// Level of a long bracket opening at the cursor (`[[` is 0, `[==[` is 2)
    fn long_bracket_level(&self) -> Option<usize> {
        if self.peek() != Some(b'[') {
            return None;
        }
        let mut level = 0;
        while self.peek_at(1 + level) == Some(b'=') {
            level += 1;
        }
        (self.peek_at(1 + level) == Some(b'[')).then_some(level)
    }

    fn read_long_bracket(&mut self, level: usize) -> Result<String, ParseError> {
        let (line, column) = (self.line, self.column);
        for _ in 0..level + 2 {
            self.bump();
        }
        // A newline right after the opening bracket is not part of the string
        if self.peek() == Some(b'\r') {
            self.bump();
        }
        if self.peek() == Some(b'\n') {
            self.bump();
        }

        let mut bytes = Vec::new();
        loop {
            match self.peek() {
                None => {
                    return Err(ParseError::new(line, column, "unfinished long string"));
                }
                Some(b']') if self.closes_long_bracket(level) => {
                    for _ in 0..level + 2 {
                        self.bump();
                    }
                    return Ok(String::from_utf8_lossy(&bytes).into_owned());
                }
                Some(_) => {
                    if let Some(c) = self.bump() {
                        bytes.push(c);
                    }
                }
            }
        }
    }

    fn closes_long_bracket(&self, level: usize) -> bool {
        (1..=level).all(|i| self.peek_at(i) == Some(b'='))
            && self.peek_at(level + 1) == Some(b']')
    }

    fn read_string(&mut self) -> Result<String, ParseError> {
        let (line, column) = (self.line, self.column);
        let quote = self.bump();
        let mut bytes = Vec::new();

        loop {
            let c = match self.peek() {
                None | Some(b'\n') => {
                    return Err(ParseError::new(line, column, "unfinished string"));
                }
                Some(c) => c,
            };
            self.bump();

            if Some(c) == quote {
                return Ok(String::from_utf8_lossy(&bytes).into_owned());
            }
            if c != b'\\' {
                bytes.push(c);
                continue;
            }

            let escaped = self
                .bump()
                .ok_or_else(|| ParseError::new(line, column, "unfinished string"))?;
            match escaped {
                b'n' => bytes.push(b'\n'),
                b't' => bytes.push(b'\t'),
                b'r' => bytes.push(b'\r'),
                b'a' => bytes.push(0x07),
                b'b' => bytes.push(0x08),
                b'f' => bytes.push(0x0C),
                b'v' => bytes.push(0x0B),
                b'\\' => bytes.push(b'\\'),
                b'"' => bytes.push(b'"'),
                b'\'' => bytes.push(b'\''),
                // escaped line break: \n, \r, \r\n or \n\r all count once
                b'\n' | b'\r' => {
                    let pair = if escaped == b'\n' { b'\r' } else { b'\n' };
                    if self.peek() == Some(pair) {
                        self.bump();
                    }
                    bytes.push(b'\n');
                }
                b'z' => {
                    while self.peek().is_some_and(|c| c.is_ascii_whitespace()) {
                        self.bump();
                    }
                }
                b'x' => {
                    let mut value = 0u8;
                    for _ in 0..2 {
                        let digit = self
                            .peek()
                            .and_then(|d| (d as char).to_digit(16))
                            .ok_or_else(|| self.error("hexadecimal digit expected"))?;
                        self.bump();
                        value = value * 16 + digit as u8;
                    }
                    bytes.push(value);
                }
                b'u' => {
                    let ch = self.read_utf8_escape()?;
                    let mut buf = [0u8; 4];
                    bytes.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
                }
                d if d.is_ascii_digit() => {
                    let mut value = u32::from(d - b'0');
                    for _ in 0..2 {
                        match self.peek() {
                            Some(d) if d.is_ascii_digit() => {
                                self.bump();
                                value = value * 10 + u32::from(d - b'0');
                            }
                            _ => break,
                        }
                    }
                    let byte =
                        u8::try_from(value).map_err(|_| self.error("decimal escape too large"))?;
                    bytes.push(byte);
                }
                other => {
                    return Err(self.error(format!(
                        "invalid escape sequence '\\{}'",
                        other as char
                    )));
                }
            }
        }
    }

    fn read_utf8_escape(&mut self) -> Result<char, ParseError> {
        if self.bump() != Some(b'{') {
            return Err(self.error("missing '{' in \\u{xxxx}"));
        }
        let mut value: u32 = 0;
        let mut digits = 0;
        while let Some(d) = self.peek().and_then(|d| (d as char).to_digit(16)) {
            self.bump();
            value = value
                .checked_mul(16)
                .and_then(|v| v.checked_add(d))
                .ok_or_else(|| self.error("UTF-8 value too large"))?;
            digits += 1;
        }
        if digits == 0 || self.bump() != Some(b'}') {
            return Err(self.error("malformed \\u{xxxx} escape"));
        }
        char::from_u32(value).ok_or_else(|| self.error("invalid unicode code point"))
    }

    fn read_number(&mut self) -> Result<Token, ParseError> {
        let start = self.pos;

        if self.peek() == Some(b'0') && matches!(self.peek_at(1), Some(b'x' | b'X')) {
            self.bump();
            self.bump();
            let digits_start = self.pos;
            while self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            if self.peek().is_some_and(|c| c == b'.' || c == b'p' || c == b'P') {
                return Err(self.error("hexadecimal floats are not supported"));
            }
            let digits = std::str::from_utf8(&self.src[digits_start..self.pos]).unwrap_or("");
            if digits.is_empty() {
                return Err(self.error("malformed number"));
            }
            // Lua wraps hexadecimal integers around on overflow
            let value = digits.bytes().fold(0u64, |acc, d| {
                acc.wrapping_mul(16)
                    .wrapping_add(u64::from((d as char).to_digit(16).unwrap_or(0)))
            });
            self.expect_number_end()?;
            return Ok(Token::Integer(value as i64));
        }

        let mut is_float = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.bump();
            } else if c == b'.' && !is_float {
                is_float = true;
                self.bump();
            } else if c == b'e' || c == b'E' {
                is_float = true;
                self.bump();
                if matches!(self.peek(), Some(b'+' | b'-')) {
                    self.bump();
                }
            } else {
                break;
            }
        }
        self.expect_number_end()?;

        let text = std::str::from_utf8(&self.src[start..self.pos]).unwrap_or("");
        if !is_float {
            if let Ok(i) = text.parse::<i64>() {
                return Ok(Token::Integer(i));
            }
        }
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| self.error(format!("malformed number near '{}'", text)))
    }

    fn expect_number_end(&self) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == b'_' || c.is_ascii_alphanumeric() || c == b'.' => {
                Err(self.error("malformed number"))
            }
            _ => Ok(()),
        }
    }

    fn read_name(&mut self) -> Token {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c == b'_' || c.is_ascii_alphanumeric())
        {
            self.bump();
        }
        let name = String::from_utf8_lossy(&self.src[start..self.pos]).into_owned();
        match name.as_str() {
            "true" => Token::True,
            "false" => Token::False,
            "nil" => Token::Nil,
            "local" => Token::Local,
            n if KEYWORDS.contains(&n) => Token::Keyword(name),
            _ => Token::Name(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<Token> {
        Lexer::new(src)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|s| s.token)
            .collect()
    }

    #[test]
    fn test_bracketed_string_key() {
        assert_eq!(
            tokens(r#"["side"] = 2,"#),
            vec![
                Token::LBracket,
                Token::String("side".into()),
                Token::RBracket,
                Token::Assign,
                Token::Integer(2),
                Token::Comma,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            tokens("42 3.5 .5 1e3 0x1F 9223372036854775808"),
            vec![
                Token::Integer(42),
                Token::Number(3.5),
                Token::Number(0.5),
                Token::Number(1000.0),
                Token::Integer(31),
                Token::Number(9223372036854775808.0),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            tokens(r#""a\"b\n\65\x42\u{e9}" 'it\'s'"#),
            vec![
                Token::String("a\"b\nAB\u{e9}".into()),
                Token::String("it's".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_escaped_line_breaks() {
        assert_eq!(
            tokens("\"a\\\r\nb\" \"c\\\n\rd\" \"e\\\nf\" \"g\\\rh\""),
            vec![
                Token::String("a\nb".into()),
                Token::String("c\nd".into()),
                Token::String("e\nf".into()),
                Token::String("g\nh".into()),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_long_strings_and_comments() {
        let src = "-- line comment\n--[==[ block\n comment ]==] [=[\nraw ]] text]=]";
        assert_eq!(
            tokens(src),
            vec![Token::String("raw ]] text".into()), Token::Eof]
        );
    }

    #[test]
    fn test_positions() {
        let spanned = Lexer::new("a =\n  {").tokenize().unwrap();
        assert_eq!((spanned[2].line, spanned[2].column), (2, 3));
    }

    #[test]
    fn test_unfinished_string() {
        let err = Lexer::new("x = \"abc\ny\"").tokenize().unwrap_err();
        assert_eq!(err.line, 1);
        assert!(err.message.contains("unfinished string"));
    }

    #[test]
    fn test_keywords_are_flagged() {
        assert_eq!(
            tokens("function return local"),
            vec![
                Token::Keyword("function".into()),
                Token::Keyword("return".into()),
                Token::Local,
                Token::Eof,
            ]
        );
    }
}
