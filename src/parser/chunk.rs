//! Parser for data chunks: global assignments of table literals
//!
//! Only the constructs a serializer emits are accepted. Anything that
//! would need evaluation (calls, operators, control flow) is rejected,
//! so loading an export never runs code from it.

use super::lexer::{Lexer, Spanned, Token};
use super::value::{LuaKey, LuaTable, LuaValue};
use crate::error::ParseError;

/// Nesting limit for table constructors
const MAX_DEPTH: usize = 200;

/// Parse a chunk and return its global variables as a table
pub fn parse_chunk(source: &str) -> Result<LuaTable, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    ChunkParser { tokens, pos: 0 }.parse()
}

/// Parse a single expression, e.g. `{ ["a"] = 1 }`
pub fn parse_value(source: &str) -> Result<Option<LuaValue>, ParseError> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = ChunkParser { tokens, pos: 0 };
    let value = parser.expression(0)?;
    parser.expect(Token::Eof)?;
    Ok(value)
}

struct ChunkParser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl ChunkParser {
    fn parse(mut self) -> Result<LuaTable, ParseError> {
        let mut globals = LuaTable::new();
        loop {
            match self.peek() {
                Token::Eof => return Ok(globals),
                Token::Semicolon => {
                    self.advance();
                }
                _ => self.assignment(&mut globals)?,
            }
        }
    }

    fn peek(&self) -> &Token {
        &self.current().token
    }

    fn current(&self) -> &Spanned {
        // The token list always ends with Eof and the cursor never passes it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token {
        let token = self.current().token.clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn error_here(&self, message: impl Into<String>) -> ParseError {
        let spanned = self.current();
        ParseError::new(spanned.line, spanned.column, message)
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        self.error_here(format!(
            "{} expected near {}",
            expected,
            self.peek().describe()
        ))
    }

    fn expect(&mut self, token: Token) -> Result<(), ParseError> {
        if *self.peek() == token {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&token.describe()))
        }
    }

    /// `[local] name {'.' name | '[' expr ']'} = expr`
    fn assignment(&mut self, globals: &mut LuaTable) -> Result<(), ParseError> {
        if *self.peek() == Token::Local {
            self.advance();
        }

        let name = match self.peek() {
            Token::Name(name) => name.clone(),
            Token::Keyword(k) => {
                return Err(self.error_here(format!("unsupported statement '{}'", k)));
            }
            _ => return Err(self.unexpected("variable name")),
        };
        self.advance();

        let mut path = Vec::new();
        loop {
            match self.peek() {
                Token::Symbol('.') => {
                    self.advance();
                    match self.advance() {
                        Token::Name(field) => path.push(LuaKey::String(field)),
                        _ => return Err(self.unexpected("field name")),
                    }
                }
                Token::LBracket => {
                    self.advance();
                    let key = self.key_expression(0)?;
                    self.expect(Token::RBracket)?;
                    path.push(key);
                }
                _ => break,
            }
        }

        if *self.peek() != Token::Assign {
            return Err(match self.peek() {
                Token::Symbol('(') | Token::String(_) | Token::LBrace => {
                    self.error_here("function calls are not supported")
                }
                _ => self.unexpected("'='"),
            });
        }
        self.advance();

        let value = self.expression(0)?;
        let root = LuaKey::String(name);

        let Some((last, parents)) = path.split_last() else {
            globals.set(root, value);
            return Ok(());
        };

        let mut target = globals
            .get_key_mut(&root)
            .ok_or_else(|| self.error_here(format!("attempt to index a nil value ({})", root)))?;
        for key in parents {
            target = match target {
                LuaValue::Table(t) => t.get_key_mut(key).ok_or_else(|| {
                    self.error_here(format!("attempt to index a nil value (field '{}')", key))
                })?,
                other => {
                    return Err(self.error_here(format!(
                        "attempt to index a {} value",
                        other.type_name()
                    )))
                }
            };
        }
        match target {
            LuaValue::Table(t) => {
                t.set(last.clone(), value);
                Ok(())
            }
            other => Err(self.error_here(format!(
                "attempt to index a {} value",
                other.type_name()
            ))),
        }
    }

    /// Literal expression; `None` stands for nil
    fn expression(&mut self, depth: usize) -> Result<Option<LuaValue>, ParseError> {
        let start = self.pos;
        let value = match self.advance() {
            Token::Nil => None,
            Token::True => Some(LuaValue::Boolean(true)),
            Token::False => Some(LuaValue::Boolean(false)),
            Token::Integer(i) => Some(LuaValue::Integer(i)),
            Token::Number(n) => Some(LuaValue::Number(n)),
            Token::String(s) => Some(LuaValue::String(s)),
            Token::Minus => {
                let operand = self.pos;
                match self.advance() {
                    Token::Integer(i) => Some(LuaValue::Integer(i.wrapping_neg())),
                    Token::Number(n) => Some(LuaValue::Number(-n)),
                    _ => {
                        self.pos = operand;
                        return Err(self.unexpected("number after '-'"));
                    }
                }
            }
            Token::LBrace => Some(LuaValue::Table(self.table(depth + 1)?)),
            Token::Name(name) => {
                self.pos = start;
                return Err(self.error_here(format!(
                    "variable references are not supported ('{}')",
                    name
                )));
            }
            _ => {
                self.pos = start;
                return Err(self.unexpected("value"));
            }
        };

        if let Token::Symbol(c) = self.peek() {
            if matches!(*c, '+' | '*' | '/' | '%' | '^' | '.' | '(' | '<' | '>' | '~') {
                return Err(self.error_here("expressions other than literals are not supported"));
            }
        }
        Ok(value)
    }

    fn key_expression(&mut self, depth: usize) -> Result<LuaKey, ParseError> {
        let value = self.expression(depth)?;
        match value {
            None => Err(self.error_here("table index is nil")),
            Some(LuaValue::Integer(i)) => Ok(LuaKey::Integer(i)),
            Some(LuaValue::Number(n)) if n.is_nan() => Err(self.error_here("table index is NaN")),
            Some(LuaValue::Number(n)) if n.fract() == 0.0 && n.abs() < 9.0e18 => {
                Ok(LuaKey::Integer(n as i64))
            }
            Some(LuaValue::Number(n)) => Ok(LuaKey::String(n.to_string())),
            Some(LuaValue::String(s)) => Ok(LuaKey::String(s)),
            Some(LuaValue::Boolean(b)) => Ok(LuaKey::String(b.to_string())),
            Some(LuaValue::Table(_)) => Err(self.error_here("table keys are not supported")),
        }
    }

    /// Body of a table constructor, after the opening brace
    fn table(&mut self, depth: usize) -> Result<LuaTable, ParseError> {
        if depth > MAX_DEPTH {
            return Err(self.error_here("table nesting too deep"));
        }

        let mut table = LuaTable::new();
        let mut position = 0i64;

        loop {
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    return Ok(table);
                }
                Token::LBracket => {
                    self.advance();
                    let key = self.key_expression(depth)?;
                    self.expect(Token::RBracket)?;
                    self.expect(Token::Assign)?;
                    let value = self.expression(depth)?;
                    table.set(key, value);
                }
                Token::Name(name)
                    if self.tokens.get(self.pos + 1).map(|s| &s.token) == Some(&Token::Assign) =>
                {
                    let key = LuaKey::String(name.clone());
                    self.advance();
                    self.advance();
                    let value = self.expression(depth)?;
                    table.set(key, value);
                }
                _ => {
                    position += 1;
                    let value = self.expression(depth)?;
                    table.set(LuaKey::Integer(position), value);
                }
            }

            match self.peek() {
                Token::Comma | Token::Semicolon => {
                    self.advance();
                }
                Token::RBrace => {}
                _ => return Err(self.unexpected("'}'")),
            }
        }
    }
}
