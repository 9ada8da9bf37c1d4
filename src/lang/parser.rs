//! Wall-E parser - produces a Program

use crate::lang::ast::{BinOp, Builtin, Expr, Program, Stmt, UnaryOp};
use crate::lang::lexer::{Keyword, Lexer, Token, TokenKind};

/// Magnitude of `i32::MIN`, too large for a bare literal
const I32_MIN_MAGNITUDE: &str = "2147483648";

/// Recursive-descent parser. Syntax errors are collected, not returned:
/// a failing line is skipped and parsing resumes on the next one.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    errors: Vec<String>,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            errors: Vec::new(),
        }
    }

    fn current(&self) -> &Token {
        static EOF: Token = Token {
            kind: TokenKind::Eof,
            lexeme: String::new(),
            line: 0,
            column: 0,
        };
        self.tokens.get(self.pos).unwrap_or(&EOF)
    }

    fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    fn peek_next(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| &t.kind)
    }

    fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn at_line_end(&self) -> bool {
        matches!(self.peek(), TokenKind::Newline | TokenKind::Eof)
    }

    /// Format an error at the current token
    fn error(&self, msg: &str) -> String {
        let token = self.current();
        format!("Line {}, col {}: {}", token.line, token.column, msg)
    }

    /// Error for an unexpected current token. Illegal tokens report the
    /// lexer's own diagnostic instead.
    fn unexpected(&self, expected: &str) -> String {
        match self.peek() {
            TokenKind::Illegal(msg) => self.error(msg),
            found => self.error(&format!("Expected {}, found {}", expected, found)),
        }
    }

    fn expect(&mut self, expected: TokenKind, what: &str) -> Result<Token, String> {
        if std::mem::discriminant(self.peek()) == std::mem::discriminant(&expected) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    fn record(&mut self, err: String) {
        log::trace!("parse error: {}", err);
        if !self.errors.contains(&err) {
            self.errors.push(err);
        }
    }

    /// Skip the offending token and the rest of its line. Lexical errors on
    /// the skipped part are still reported.
    fn synchronize(&mut self) {
        if !self.at_line_end() {
            self.advance();
        }
        while !self.at_line_end() {
            let token = self.advance();
            if let TokenKind::Illegal(msg) = &token.kind {
                let err = format!("Line {}, col {}: {}", token.line, token.column, msg);
                self.record(err);
            }
        }
    }

    /// Errors collected while parsing, in source order
    pub fn into_errors(self) -> Vec<String> {
        self.errors
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Program {
        let mut statements = Vec::new();

        loop {
            while matches!(self.peek(), TokenKind::Newline) {
                self.advance();
            }
            if matches!(self.peek(), TokenKind::Eof) {
                break;
            }

            let result = self.parse_statement().and_then(|stmt| {
                self.end_of_statement()?;
                Ok(stmt)
            });
            match result {
                Ok(stmt) => statements.push(stmt),
                Err(e) => {
                    self.record(e);
                    self.synchronize();
                }
            }
        }

        log::trace!(
            "parsed {} statement(s), {} error(s)",
            statements.len(),
            self.errors.len()
        );
        Program { statements }
    }

    fn end_of_statement(&mut self) -> Result<(), String> {
        match self.peek() {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of line after statement")),
        }
    }

    fn parse_statement(&mut self) -> Result<Stmt, String> {
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Spawn) => {
                let mut args = self.parse_arguments("Spawn", 2)?.into_iter();
                match (args.next(), args.next()) {
                    (Some(x), Some(y)) => Ok(Stmt::Spawn { x, y }),
                    _ => Err(self.error("Spawn expects 2 arguments")),
                }
            }
            TokenKind::Keyword(Keyword::Color) => {
                let mut args = self.parse_arguments("Color", 1)?;
                args.pop()
                    .map(Stmt::Color)
                    .ok_or_else(|| self.error("Color expects 1 argument"))
            }
            TokenKind::Keyword(Keyword::Size) => {
                let mut args = self.parse_arguments("Size", 1)?;
                args.pop()
                    .map(Stmt::Size)
                    .ok_or_else(|| self.error("Size expects 1 argument"))
            }
            TokenKind::Keyword(Keyword::DrawLine) => {
                let mut args = self.parse_arguments("DrawLine", 3)?.into_iter();
                match (args.next(), args.next(), args.next()) {
                    (Some(dx), Some(dy), Some(dist)) => Ok(Stmt::DrawLine { dx, dy, dist }),
                    _ => Err(self.error("DrawLine expects 3 arguments")),
                }
            }
            TokenKind::Keyword(Keyword::DrawCircle) => {
                let mut args = self.parse_arguments("DrawCircle", 3)?.into_iter();
                match (args.next(), args.next(), args.next()) {
                    (Some(dx), Some(dy), Some(radius)) => Ok(Stmt::DrawCircle { dx, dy, radius }),
                    _ => Err(self.error("DrawCircle expects 3 arguments")),
                }
            }
            TokenKind::Keyword(Keyword::DrawRectangle) => {
                let mut args = self.parse_arguments("DrawRectangle", 5)?.into_iter();
                match (args.next(), args.next(), args.next(), args.next(), args.next()) {
                    (Some(dx), Some(dy), Some(dist), Some(width), Some(height)) => {
                        Ok(Stmt::DrawRectangle {
                            dx,
                            dy,
                            dist,
                            width,
                            height,
                        })
                    }
                    _ => Err(self.error("DrawRectangle expects 5 arguments")),
                }
            }
            TokenKind::Keyword(Keyword::Fill) => {
                self.parse_arguments("Fill", 0)?;
                Ok(Stmt::Fill)
            }
            TokenKind::Keyword(Keyword::GoTo) => self.parse_goto(),
            TokenKind::Identifier(name) => self.parse_identifier_statement(name),
            TokenKind::Illegal(msg) => Err(self.error(&msg)),
            other => Err(self.error(&format!(
                "Unexpected {} at the start of a statement",
                other
            ))),
        }
    }

    /// `name <- expr` or a bare label
    fn parse_identifier_statement(&mut self, name: String) -> Result<Stmt, String> {
        match self.peek_next() {
            Some(TokenKind::Arrow) => {
                self.advance();
                self.advance();
                let value = self.parse_expression()?;
                Ok(Stmt::Assignment(name, value))
            }
            Some(TokenKind::Newline) | Some(TokenKind::Eof) | None => {
                self.advance();
                Ok(Stmt::Label(name))
            }
            Some(_) => {
                self.advance();
                Err(self.unexpected(&format!(
                    "'<-' after '{}' (or nothing, for a label)",
                    name
                )))
            }
        }
    }

    fn parse_goto(&mut self) -> Result<Stmt, String> {
        self.advance(); // GoTo
        self.expect(TokenKind::LeftBracket, "'[' after GoTo")?;
        let label = match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                name
            }
            _ => return Err(self.unexpected("a label name inside GoTo [...]")),
        };
        self.expect(TokenKind::RightBracket, "']' after the label name")?;

        let condition = if matches!(self.peek(), TokenKind::LeftParen) {
            self.advance();
            let cond = self.parse_expression()?;
            self.expect(TokenKind::RightParen, "')' after the GoTo condition")?;
            Some(cond)
        } else {
            None
        };

        Ok(Stmt::GoTo { label, condition })
    }

    /// Parse `(arg, arg, ...)` after a command or function keyword, requiring
    /// exactly `count` arguments.
    fn parse_arguments(&mut self, name: &str, count: usize) -> Result<Vec<Expr>, String> {
        self.advance(); // keyword
        self.expect(TokenKind::LeftParen, &format!("'(' after {}", name))?;

        let mut args = Vec::with_capacity(count);
        if !matches!(self.peek(), TokenKind::RightParen) {
            args.push(self.parse_expression()?);
            while matches!(self.peek(), TokenKind::Comma) {
                self.advance();
                args.push(self.parse_expression()?);
            }
        }

        if args.len() != count {
            return Err(self.error(&format!(
                "{} expects {} argument(s), got {}",
                name,
                count,
                args.len()
            )));
        }
        self.expect(TokenKind::RightParen, &format!("')' to close {}", name))?;
        Ok(args)
    }

    // Expression parsing. The `&&` level wraps the `||` level, so `||`
    // binds tighter than `&&`.

    pub fn parse_expression(&mut self) -> Result<Expr, String> {
        self.parse_and()
    }

    fn parse_and(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_or()?;

        while matches!(self.peek(), TokenKind::AndAnd) {
            self.advance();
            let right = self.parse_or()?;
            left = Expr::BinaryOp(Box::new(left), BinOp::And, Box::new(right));
        }

        Ok(left)
    }

    fn parse_or(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_comparison()?;

        while matches!(self.peek(), TokenKind::OrOr) {
            self.advance();
            let right = self.parse_comparison()?;
            left = Expr::BinaryOp(Box::new(left), BinOp::Or, Box::new(right));
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_additive()?;

        loop {
            let op = match self.peek() {
                TokenKind::EqualEqual => BinOp::Eq,
                TokenKind::Less => BinOp::Lt,
                TokenKind::LessEqual => BinOp::Le,
                TokenKind::Greater => BinOp::Gt,
                TokenKind::GreaterEqual => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_power()?;

        loop {
            let op = match self.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.advance();
            let right = self.parse_power()?;
            left = Expr::BinaryOp(Box::new(left), op, Box::new(right));
        }

        Ok(left)
    }

    /// `**` chains left to right; each operand is a unary expression
    fn parse_power(&mut self) -> Result<Expr, String> {
        let mut left = self.parse_unary()?;

        while matches!(self.peek(), TokenKind::Power) {
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinaryOp(Box::new(left), BinOp::Pow, Box::new(right));
        }

        Ok(left)
    }

    /// Unary minus applies to a single primary
    fn parse_unary(&mut self) -> Result<Expr, String> {
        if matches!(self.peek(), TokenKind::Minus) {
            self.advance();
            // -2147483648 is only representable with its sign attached
            if matches!(self.peek(), TokenKind::Illegal(_)) && self.current().lexeme == I32_MIN_MAGNITUDE {
                self.advance();
                return Ok(Expr::Number(i32::MIN));
            }
            let operand = self.parse_primary()?;
            Ok(Expr::UnaryOp(UnaryOp::Neg, Box::new(operand)))
        } else {
            self.parse_primary()
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, String> {
        match self.peek().clone() {
            TokenKind::Integer(n) => {
                self.advance();
                Ok(Expr::Number(n))
            }
            TokenKind::String(s) => {
                self.advance();
                Ok(Expr::Text(s))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Expr::Variable(name))
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            TokenKind::Keyword(kw) => match builtin_for(kw) {
                Some(builtin) => {
                    let args = self.parse_arguments(builtin.name(), builtin.arity())?;
                    Ok(Expr::FunctionCall(builtin, args))
                }
                None => Err(self.error(&format!(
                    "Command '{}' cannot be used inside an expression",
                    kw.as_str()
                ))),
            },
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RightParen, "')' after parenthesized expression")?;
                Ok(inner)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }
}

fn builtin_for(kw: Keyword) -> Option<Builtin> {
    match kw {
        Keyword::GetActualX => Some(Builtin::GetActualX),
        Keyword::GetActualY => Some(Builtin::GetActualY),
        Keyword::GetCanvasSize => Some(Builtin::GetCanvasSize),
        Keyword::GetColorCount => Some(Builtin::GetColorCount),
        Keyword::IsBrushColor => Some(Builtin::IsBrushColor),
        Keyword::IsBrushSize => Some(Builtin::IsBrushSize),
        Keyword::IsCanvasColor => Some(Builtin::IsCanvasColor),
        _ => None,
    }
}

/// Lex and parse source text. Returns the program and every lexical and
/// syntax diagnostic; the program should not be run when any are present.
pub fn parse_source(source: &str) -> (Program, Vec<String>) {
    let tokens = Lexer::new(source).tokenize();
    let mut parser = Parser::new(tokens);
    let program = parser.parse_program();
    (program, parser.into_errors())
}
