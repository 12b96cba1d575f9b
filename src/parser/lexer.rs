//! Lexer for Command Lines
//!
//! Splits a raw command line into shell-like tokens so that a `$(...)`
//! body can be turned into an argument vector. It handles:
//! - Plain, single-quoted and double-quoted arguments
//! - Control operators (`&&`, `||`, `|`, `;`, `(`, `)`)
//! - Backslash escapes of operator characters
//! - Line continuations (` \` or `` ` `` followed by a newline)
//!
//! The lexer never fails: punctuation it does not understand is reported as
//! an `Invalid` token and left for the caller to reject.

/// Token kinds produced by the command lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Arg,
    SingleQuotedArg,
    DoubleQuotedArg,
    SubProcessStart, // (
    SubProcessEnd,   // )
    And,             // &&
    Or,              // ||
    Pipe,            // |
    StatementEnd,    // ;
    Invalid,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arg => "ARG",
            Self::SingleQuotedArg => "SINGLE_QUOTED_ARG",
            Self::DoubleQuotedArg => "DOUBLE_QUOTED_ARG",
            Self::SubProcessStart => "SUBPROCESS_START",
            Self::SubProcessEnd => "SUBPROCESS_END",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Pipe => "PIPE",
            Self::StatementEnd => "STATEMENT_END",
            Self::Invalid => "INVALID",
        }
    }

    /// Whether the token can appear in an argument vector.
    pub fn is_argument(&self) -> bool {
        matches!(self, Self::Arg | Self::SingleQuotedArg | Self::DoubleQuotedArg)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// Characters a backslash may escape outside of quotes
fn is_escapable(c: char) -> bool {
    matches!(c, '(' | ')' | '&' | '|' | ';' | '\\')
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Command line lexer
pub struct Lexer {
    input: Vec<char>,
    pos: usize,
    tokens: Vec<Token>,
    token: String,
    quote: Quote,
    /// Quote opened at a token boundary; closing it ends the token
    quote_owns_token: bool,
    /// Inside `$(` within a double-quoted region, so `"` does not close it
    in_command_expr: bool,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            pos: 0,
            tokens: Vec::new(),
            token: String::new(),
            quote: Quote::None,
            quote_owns_token: false,
            in_command_expr: false,
        }
    }

    /// Tokenize the entire input
    pub fn tokenize(mut self) -> Vec<Token> {
        while let Some(c) = self.current() {
            match self.quote {
                Quote::Single => self.read_single_quoted(c),
                Quote::Double => self.read_double_quoted(c),
                Quote::None => self.read_unquoted(c),
            }
        }

        match self.quote {
            Quote::Single if self.quote_owns_token => {
                self.flush_as(TokenKind::SingleQuotedArg);
            }
            Quote::Double if self.quote_owns_token => {
                self.flush_as(TokenKind::DoubleQuotedArg);
            }
            _ => {
                if !self.token.trim().is_empty() {
                    self.flush_as(TokenKind::Arg);
                }
            }
        }

        self.tokens
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.pos + offset).copied()
    }

    /// True when the character at `offset` is a space or the end of input.
    fn boundary_at(&self, offset: usize) -> bool {
        matches!(self.peek(offset), None | Some(' '))
    }

    fn flush_as(&mut self, kind: TokenKind) {
        let text = std::mem::take(&mut self.token);
        self.tokens.push(Token::new(kind, text));
    }

    fn flush_arg(&mut self) {
        if !self.token.is_empty() {
            self.flush_as(TokenKind::Arg);
        }
    }

    fn emit(&mut self, kind: TokenKind, text: &str, width: usize) {
        self.flush_arg();
        self.tokens.push(Token::new(kind, text));
        self.pos += width;
    }

    fn open_quote(&mut self, quote: Quote) {
        self.quote_owns_token = self.token.is_empty();
        self.quote = quote;
        self.pos += 1;
    }

    fn close_quote(&mut self, kind: TokenKind) {
        if self.quote_owns_token {
            self.flush_as(kind);
        }
        self.quote = Quote::None;
        self.quote_owns_token = false;
        self.pos += 1;
    }

    fn read_single_quoted(&mut self, c: char) {
        if c == '\'' {
            self.close_quote(TokenKind::SingleQuotedArg);
        } else {
            self.token.push(c);
            self.pos += 1;
        }
    }

    fn read_double_quoted(&mut self, c: char) {
        match c {
            '$' if self.peek(1) == Some('(') => {
                self.in_command_expr = true;
                self.token.push_str("$(");
                self.pos += 2;
            }
            ')' if self.in_command_expr => {
                self.in_command_expr = false;
                self.token.push(c);
                self.pos += 1;
            }
            '"' if !self.in_command_expr => {
                self.close_quote(TokenKind::DoubleQuotedArg);
            }
            _ => {
                self.token.push(c);
                self.pos += 1;
            }
        }
    }

    fn read_unquoted(&mut self, c: char) {
        match c {
            ' ' => {
                self.flush_arg();
                self.pos += 1;
                self.skip_line_continuation();
            }
            c if is_blank(c) => {
                self.flush_arg();
                self.pos += 1;
            }
            '\'' => self.open_quote(Quote::Single),
            '"' => self.open_quote(Quote::Double),
            '\\' => match self.peek(1) {
                Some(next) if is_escapable(next) => {
                    self.token.push(next);
                    self.pos += 2;
                }
                _ => {
                    self.token.push(c);
                    self.pos += 1;
                }
            },
            '(' => self.emit(TokenKind::SubProcessStart, "(", 1),
            ')' => self.emit(TokenKind::SubProcessEnd, ")", 1),
            ';' => self.emit(TokenKind::StatementEnd, ";", 1),
            '&' => {
                if self.peek(1) == Some('&') {
                    if self.boundary_at(2) {
                        self.emit(TokenKind::And, "&&", 2);
                    } else {
                        self.emit(TokenKind::Invalid, "&&", 2);
                    }
                } else {
                    self.emit(TokenKind::Invalid, "&", 1);
                }
            }
            '|' => {
                if self.peek(1) == Some('|') {
                    if self.boundary_at(2) {
                        self.emit(TokenKind::Or, "||", 2);
                    } else {
                        self.emit(TokenKind::Invalid, "||", 2);
                    }
                } else if self.boundary_at(1) {
                    self.emit(TokenKind::Pipe, "|", 1);
                } else {
                    self.emit(TokenKind::Invalid, "|", 1);
                }
            }
            _ => {
                self.token.push(c);
                self.pos += 1;
            }
        }
    }

    /// Skip ` \<LF>`, `` `<LF> `` and their CRLF forms after a space.
    fn skip_line_continuation(&mut self) {
        if !matches!(self.current(), Some('\\') | Some('`')) {
            return;
        }
        match (self.peek(1), self.peek(2)) {
            (Some('\n'), _) => self.pos += 2,
            (Some('\r'), Some('\n')) => self.pos += 3,
            _ => {}
        }
    }
}

/// Tokenize a command line.
pub fn tokenize(command_line: &str) -> Vec<Token> {
    Lexer::new(command_line).tokenize()
}
