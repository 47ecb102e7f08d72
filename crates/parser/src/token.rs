//! Tokens and token sources.
//!
//! The parser pulls tokens from anything implementing [`TokenSource`]: the
//! logos-backed [`Lexer`](crate::lexer::Lexer) for real input, or a
//! [`TokenVec`] holding a prepared sequence.

use crate::ast::{Location, Span};

/// Token kind.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[rustfmt::skip]
pub enum Tok {
    // Literals
    Ident, IntLit, FloatLit, ImagLit, RuneLit, StringLit, RawStringLit,

    // Keywords
    KwBreak, KwCase, KwChan, KwConst, KwContinue, KwDefault, KwDefer, KwElse,
    KwFallthrough, KwFor, KwFunc, KwGo, KwGoto, KwIf, KwImport, KwInterface,
    KwMap, KwPackage, KwRange, KwReturn, KwSelect, KwStruct, KwSwitch, KwType, KwVar,

    // Operators
    Ellipsis, ShlAssign, ShrAssign, AndNotAssign,
    AddAssign, SubAssign, MulAssign, DivAssign, ModAssign, AndAssign, OrAssign, XorAssign,
    Shl, Shr, AndNot, LAnd, LOr, EqEq, NotEq, Le, Ge, Inc, Dec, Define, Arrow,
    Assign, Plus, Minus, Star, Slash, Percent, Amp, Pipe, Caret, Tilde, Bang, Lt, Gt,

    // Delimiters
    LParen, RParen, LBrack, RBrack, LBrace, RBrace, Comma, Semi, Colon, Dot,

    Eof,
    /// A character sequence that is not a token.
    Error,
}

impl Tok {
    /// Human-readable name used in "expected ..." messages.
    pub const fn describe(self) -> &'static str {
        match self {
            Tok::Ident => "identifier",
            Tok::IntLit => "integer literal",
            Tok::FloatLit => "floating point literal",
            Tok::ImagLit => "imaginary literal",
            Tok::RuneLit => "rune literal",
            Tok::StringLit | Tok::RawStringLit => "string literal",
            Tok::KwBreak => "break",
            Tok::KwCase => "case",
            Tok::KwChan => "chan",
            Tok::KwConst => "const",
            Tok::KwContinue => "continue",
            Tok::KwDefault => "default",
            Tok::KwDefer => "defer",
            Tok::KwElse => "else",
            Tok::KwFallthrough => "fallthrough",
            Tok::KwFor => "for",
            Tok::KwFunc => "func",
            Tok::KwGo => "go",
            Tok::KwGoto => "goto",
            Tok::KwIf => "if",
            Tok::KwImport => "import",
            Tok::KwInterface => "interface",
            Tok::KwMap => "map",
            Tok::KwPackage => "package",
            Tok::KwRange => "range",
            Tok::KwReturn => "return",
            Tok::KwSelect => "select",
            Tok::KwStruct => "struct",
            Tok::KwSwitch => "switch",
            Tok::KwType => "type",
            Tok::KwVar => "var",
            Tok::Ellipsis => "...",
            Tok::ShlAssign => "<<=",
            Tok::ShrAssign => ">>=",
            Tok::AndNotAssign => "&^=",
            Tok::AddAssign => "+=",
            Tok::SubAssign => "-=",
            Tok::MulAssign => "*=",
            Tok::DivAssign => "/=",
            Tok::ModAssign => "%=",
            Tok::AndAssign => "&=",
            Tok::OrAssign => "|=",
            Tok::XorAssign => "^=",
            Tok::Shl => "<<",
            Tok::Shr => ">>",
            Tok::AndNot => "&^",
            Tok::LAnd => "&&",
            Tok::LOr => "||",
            Tok::EqEq => "==",
            Tok::NotEq => "!=",
            Tok::Le => "<=",
            Tok::Ge => ">=",
            Tok::Inc => "++",
            Tok::Dec => "--",
            Tok::Define => ":=",
            Tok::Arrow => "<-",
            Tok::Assign => "=",
            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Percent => "%",
            Tok::Amp => "&",
            Tok::Pipe => "|",
            Tok::Caret => "^",
            Tok::Tilde => "~",
            Tok::Bang => "!",
            Tok::Lt => "<",
            Tok::Gt => ">",
            Tok::LParen => "(",
            Tok::RParen => ")",
            Tok::LBrack => "[",
            Tok::RBrack => "]",
            Tok::LBrace => "{",
            Tok::RBrace => "}",
            Tok::Comma => ",",
            Tok::Semi => ";",
            Tok::Colon => ":",
            Tok::Dot => ".",
            Tok::Eof => "EOF",
            Tok::Error => "invalid token",
        }
    }

    /// Tokens after which a newline or EOF inserts a semicolon.
    pub const fn ends_statement(self) -> bool {
        matches!(
            self,
            Tok::Ident
                | Tok::IntLit
                | Tok::FloatLit
                | Tok::ImagLit
                | Tok::RuneLit
                | Tok::StringLit
                | Tok::RawStringLit
                | Tok::KwBreak
                | Tok::KwContinue
                | Tok::KwFallthrough
                | Tok::KwReturn
                | Tok::Inc
                | Tok::Dec
                | Tok::RParen
                | Tok::RBrack
                | Tok::RBrace
        )
    }
}

/// A token with its source text and span.
///
/// Inserted semicolons carry the text `"\n"` (or `""` at end of input) and a
/// zero-width span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub tok: Tok,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub const fn new(tok: Tok, text: &'src str, span: Span) -> Self {
        Self { tok, text, span }
    }

    /// Text shown for this token in a "got ..." message.
    pub fn got(&self) -> &'src str {
        match self.tok {
            Tok::Semi => ";",
            Tok::Eof => "EOF",
            _ => self.text,
        }
    }
}

/// A `//` or `/* */` comment as written in the source.
///
/// Block comments spanning several lines keep one entry per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub span: Span,
    pub lines: Vec<Box<str>>,
}

/// A stream of tokens ending in an endless run of [`Tok::Eof`].
pub trait TokenSource<'src> {
    fn next_token(&mut self) -> Token<'src>;

    /// Comments scanned since the previous call, in source order.
    fn take_comments(&mut self) -> Vec<Comment> {
        Vec::new()
    }
}

/// A prepared token sequence.
#[derive(Debug, Clone)]
pub struct TokenVec<'src> {
    toks: std::vec::IntoIter<Token<'src>>,
    eof: Location,
}

impl<'src> TokenVec<'src> {
    pub fn new(toks: Vec<Token<'src>>) -> Self {
        let eof = toks.last().map_or(Location::new(1, 1), |t| t.span.end);
        Self {
            toks: toks.into_iter(),
            eof,
        }
    }
}

impl<'src> TokenSource<'src> for TokenVec<'src> {
    fn next_token(&mut self) -> Token<'src> {
        self.toks
            .next()
            .unwrap_or(Token::new(Tok::Eof, "", Span::point(self.eof)))
    }
}
