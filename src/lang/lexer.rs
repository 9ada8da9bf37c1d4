//! Wall-E lexer/tokenizer

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

/// Token kinds
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    // Literals
    Integer(i32),
    String(String),

    // Identifiers and keywords
    Identifier(String),
    Keyword(Keyword),

    // Arithmetic
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Power, // **

    // Comparison
    EqualEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,

    // Logical
    AndAnd,
    OrOr,

    /// Assignment arrow `<-`
    Arrow,

    // Punctuation
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Colon,

    // Special
    Newline,
    Eof,

    /// Anything the lexer could not make sense of, with a diagnostic
    Illegal(String),
}

/// Wall-E keywords. Matched case-insensitively.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keyword {
    // Commands
    Spawn,
    Color,
    Size,
    DrawLine,
    DrawCircle,
    DrawRectangle,
    Fill,
    GoTo,

    // Built-in functions
    GetActualX,
    GetActualY,
    GetCanvasSize,
    GetColorCount,
    IsBrushColor,
    IsBrushSize,
    IsCanvasColor,

    // Boolean literals
    True,
    False,
}

impl Keyword {
    /// Canonical spelling, as written in the language documentation
    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Spawn => "Spawn",
            Keyword::Color => "Color",
            Keyword::Size => "Size",
            Keyword::DrawLine => "DrawLine",
            Keyword::DrawCircle => "DrawCircle",
            Keyword::DrawRectangle => "DrawRectangle",
            Keyword::Fill => "Fill",
            Keyword::GoTo => "GoTo",
            Keyword::GetActualX => "GetActualX",
            Keyword::GetActualY => "GetActualY",
            Keyword::GetCanvasSize => "GetCanvasSize",
            Keyword::GetColorCount => "GetColorCount",
            Keyword::IsBrushColor => "IsBrushColor",
            Keyword::IsBrushSize => "IsBrushSize",
            Keyword::IsCanvasColor => "IsCanvasColor",
            Keyword::True => "true",
            Keyword::False => "false",
        }
    }

    fn lookup(name: &str) -> Option<Keyword> {
        match name.to_lowercase().as_str() {
            "spawn" => Some(Keyword::Spawn),
            "color" => Some(Keyword::Color),
            "size" => Some(Keyword::Size),
            "drawline" => Some(Keyword::DrawLine),
            "drawcircle" => Some(Keyword::DrawCircle),
            "drawrectangle" => Some(Keyword::DrawRectangle),
            "fill" => Some(Keyword::Fill),
            "goto" => Some(Keyword::GoTo),
            "getactualx" => Some(Keyword::GetActualX),
            "getactualy" => Some(Keyword::GetActualY),
            "getcanvassize" => Some(Keyword::GetCanvasSize),
            "getcolorcount" => Some(Keyword::GetColorCount),
            "isbrushcolor" => Some(Keyword::IsBrushColor),
            "isbrushsize" => Some(Keyword::IsBrushSize),
            "iscanvascolor" => Some(Keyword::IsCanvasColor),
            "true" => Some(Keyword::True),
            "false" => Some(Keyword::False),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Integer(n) => write!(f, "number {}", n),
            TokenKind::String(s) => write!(f, "string \"{}\"", s),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::Keyword(kw) => write!(f, "keyword '{}'", kw.as_str()),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::Power => write!(f, "'**'"),
            TokenKind::EqualEqual => write!(f, "'=='"),
            TokenKind::Less => write!(f, "'<'"),
            TokenKind::LessEqual => write!(f, "'<='"),
            TokenKind::Greater => write!(f, "'>'"),
            TokenKind::GreaterEqual => write!(f, "'>='"),
            TokenKind::AndAnd => write!(f, "'&&'"),
            TokenKind::OrOr => write!(f, "'||'"),
            TokenKind::Arrow => write!(f, "'<-'"),
            TokenKind::LeftParen => write!(f, "'('"),
            TokenKind::RightParen => write!(f, "')'"),
            TokenKind::LeftBracket => write!(f, "'['"),
            TokenKind::RightBracket => write!(f, "']'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Newline => write!(f, "end of line"),
            TokenKind::Eof => write!(f, "end of input"),
            TokenKind::Illegal(msg) => write!(f, "illegal input ({})", msg),
        }
    }
}

/// A token with position info
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Raw source text of the token
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }

    pub fn is_illegal(&self) -> bool {
        matches!(self.kind, TokenKind::Illegal(_))
    }
}

/// The lexer
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
    current_char: Option<char>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut chars = input.chars().peekable();
        let current_char = chars.next();
        Self {
            input: chars,
            line: 1,
            column: 1,
            current_char,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let prev = self.current_char;
        if let Some(c) = prev {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.current_char = self.input.next();
        prev
    }

    fn peek(&self) -> Option<char> {
        self.current_char
    }

    fn peek_next(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self) -> (TokenKind, String) {
        let mut digits = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match digits.parse::<i32>() {
            Ok(n) => TokenKind::Integer(n),
            Err(_) => TokenKind::Illegal(format!("Integer literal {} does not fit in 32 bits", digits)),
        };
        (kind, digits)
    }

    fn read_string(&mut self) -> (TokenKind, String) {
        self.advance(); // Skip opening quote
        let mut s = String::new();

        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    let lexeme = format!("\"{}\"", s);
                    return (TokenKind::String(s), lexeme);
                }
                Some('\n') | Some('\r') | None => {
                    let lexeme = format!("\"{}", s);
                    return (TokenKind::Illegal("Unterminated string".to_string()), lexeme);
                }
                Some(c) => {
                    s.push(c);
                    self.advance();
                }
            }
        }
    }

    fn read_identifier(&mut self) -> (TokenKind, String) {
        let mut name = String::new();

        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }

        match Keyword::lookup(&name) {
            Some(kw) => (TokenKind::Keyword(kw), name),
            None => (TokenKind::Identifier(name.clone()), name),
        }
    }

    /// Consume the current char and a second one when it matches `next`.
    fn one_or_two(&mut self, next: char, single: TokenKind, double: TokenKind) -> TokenKind {
        self.advance();
        if self.peek() == Some(next) {
            self.advance();
            double
        } else {
            single
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let line = self.line;
        let column = self.column;

        let (kind, lexeme) = match self.peek() {
            None => (TokenKind::Eof, String::new()),

            Some('\r') => {
                self.advance();
                if self.peek() == Some('\n') {
                    self.advance();
                } else {
                    self.line += 1;
                    self.column = 1;
                }
                (TokenKind::Newline, "\\n".to_string())
            }
            Some('\n') => {
                self.advance();
                (TokenKind::Newline, "\\n".to_string())
            }

            Some('"') => self.read_string(),

            Some(c) if c.is_ascii_digit() => self.read_number(),

            Some(c) if c.is_alphabetic() => self.read_identifier(),

            Some(c) => {
                let kind = match c {
                    '+' => {
                        self.advance();
                        TokenKind::Plus
                    }
                    '-' => {
                        self.advance();
                        TokenKind::Minus
                    }
                    '*' => self.one_or_two('*', TokenKind::Star, TokenKind::Power),
                    '/' => {
                        self.advance();
                        TokenKind::Slash
                    }
                    '%' => {
                        self.advance();
                        TokenKind::Percent
                    }
                    '<' => {
                        self.advance();
                        match self.peek() {
                            Some('-') => {
                                self.advance();
                                TokenKind::Arrow
                            }
                            Some('=') => {
                                self.advance();
                                TokenKind::LessEqual
                            }
                            _ => TokenKind::Less,
                        }
                    }
                    '>' => self.one_or_two('=', TokenKind::Greater, TokenKind::GreaterEqual),
                    '=' => self.one_or_two(
                        '=',
                        TokenKind::Illegal("Single '=' is not an operator, use '==' or '<-'".to_string()),
                        TokenKind::EqualEqual,
                    ),
                    '&' => self.one_or_two(
                        '&',
                        TokenKind::Illegal("Single '&' is not an operator, use '&&'".to_string()),
                        TokenKind::AndAnd,
                    ),
                    '|' => self.one_or_two(
                        '|',
                        TokenKind::Illegal("Single '|' is not an operator, use '||'".to_string()),
                        TokenKind::OrOr,
                    ),
                    '(' => {
                        self.advance();
                        TokenKind::LeftParen
                    }
                    ')' => {
                        self.advance();
                        TokenKind::RightParen
                    }
                    '[' => {
                        self.advance();
                        TokenKind::LeftBracket
                    }
                    ']' => {
                        self.advance();
                        TokenKind::RightBracket
                    }
                    ',' => {
                        self.advance();
                        TokenKind::Comma
                    }
                    ':' => {
                        self.advance();
                        TokenKind::Colon
                    }
                    other => {
                        self.advance();
                        TokenKind::Illegal(format!("Unexpected character '{}'", other))
                    }
                };
                let lexeme = match &kind {
                    TokenKind::Power => "**".to_string(),
                    TokenKind::Arrow => "<-".to_string(),
                    TokenKind::LessEqual => "<=".to_string(),
                    TokenKind::GreaterEqual => ">=".to_string(),
                    TokenKind::EqualEqual => "==".to_string(),
                    TokenKind::AndAnd => "&&".to_string(),
                    TokenKind::OrOr => "||".to_string(),
                    _ => c.to_string(),
                };
                (kind, lexeme)
            }
        };

        Token::new(kind, lexeme, line, column)
    }

    /// Tokenize entire input. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if let TokenKind::Illegal(msg) = &token.kind {
                log::debug!("lexer: line {}, col {}: {}", token.line, token.column, msg);
            }
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }
}
