//! Go lexer: logos DFA plus a wrapper that tracks line:column positions,
//! inserts semicolons and sets comments aside.
//!
//! Literal bodies are only checked for shape here. Values (and therefore
//! range errors such as `'\U00110000'` or `08`) are decoded by the parser, so
//! such literals surface as malformed-literal errors rather than bad tokens.

use logos::{Lexer as LogosLexer, Logos};
use memchr::{memchr, memchr_iter};

use crate::ast::{Location, Span};
use crate::token::{Comment, Tok, Token, TokenSource};

// =============================================================================
// Callbacks
// =============================================================================

fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> bool {
    let rem = lex.remainder().as_bytes();
    let mut from = 0;
    while let Some(star) = memchr(b'*', &rem[from..]) {
        let at = from + star;
        if rem.get(at + 1) == Some(&b'/') {
            lex.bump(at + 2);
            return true;
        }
        from = at + 1;
    }
    lex.bump(rem.len());
    false
}

/// Maximal munch over anything that could belong to a numeric literal.
///
/// The first byte (a digit, or `.` followed by a digit) has been matched.
fn lex_number(lex: &mut LogosLexer<'_, RawTok>) {
    let src = lex.source().as_bytes();
    let start = lex.span().start;
    let hex = src[start] == b'0' && matches!(src.get(start + 1), Some(b'x' | b'X'));
    let mut seen_dot = src[start] == b'.';
    let mut i = lex.span().end;
    while let Some(&b) = src.get(i) {
        if b.is_ascii_alphanumeric() || b == b'_' {
            let exp = if hex {
                matches!(b, b'p' | b'P')
            } else {
                matches!(b, b'e' | b'E')
            };
            i += 1;
            if exp && matches!(src.get(i), Some(b'+' | b'-')) {
                i += 1;
            }
        } else if b == b'.' && !seen_dot && src.get(i + 1) != Some(&b'.') {
            seen_dot = true;
            i += 1;
        } else {
            break;
        }
    }
    lex.bump(i - lex.span().end);
}

/// Length of the escape sequence at the start of `s` (which begins with `\`),
/// or `None` when it is not well formed inside a literal quoted by `quote`.
fn escape_len(s: &[u8], quote: u8) -> Option<usize> {
    let digits = match *s.get(1)? {
        b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => return Some(2),
        c if c == quote => return Some(2),
        b'0'..=b'7' => {
            let oct = s.get(1..4)?;
            return oct.iter().all(|b| matches!(b, b'0'..=b'7')).then_some(4);
        }
        b'x' => 2,
        b'u' => 4,
        b'U' => 8,
        _ => return None,
    };
    let hex = s.get(2..2 + digits)?;
    hex.iter().all(u8::is_ascii_hexdigit).then_some(2 + digits)
}

fn check_rune(lex: &mut LogosLexer<'_, RawTok>) -> bool {
    let slice = lex.slice();
    let body = &slice[1..slice.len() - 1];
    if body.starts_with('\\') {
        escape_len(body.as_bytes(), b'\'') == Some(body.len())
    } else {
        body.chars().count() == 1
    }
}

fn check_string(lex: &mut LogosLexer<'_, RawTok>) -> bool {
    let slice = lex.slice().as_bytes();
    let body = &slice[1..slice.len() - 1];
    let mut i = 0;
    while i < body.len() {
        if body[i] == b'\\' {
            match escape_len(&body[i..], b'"') {
                Some(n) => i += n,
                None => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

// =============================================================================
// Raw tokens
// =============================================================================

#[repr(u8)]
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    // Trivia
    #[token("\n")] Newline,
    #[regex(r"//[^\n]*", allow_greedy = true)] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Keywords (before Ident)
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,

    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,
    #[regex(r"[0-9]|\.[0-9]", lex_number)] Number,
    #[regex(r"`[^`]*`")] RawString,
    #[regex(r#""([^"\\\n]|\\.)*""#, check_string)] String,
    #[regex(r"'([^'\\\n]|\\.)+'", check_rune)] Rune,

    // Operators (longest first)
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    #[regex(r".", priority = 0)] Error,
}

impl RawTok {
    /// Maps non-trivia raw tokens onto public kinds. Numbers are classified
    /// separately from their text.
    const fn to_tok(self) -> Tok {
        macro_rules! same {
            ($($v:ident),* $(,)?) => {
                match self {
                    $(Self::$v => Tok::$v,)*
                    Self::RawString => Tok::RawStringLit,
                    Self::String => Tok::StringLit,
                    Self::Rune => Tok::RuneLit,
                    Self::Number => Tok::IntLit,
                    Self::Bom | Self::Newline | Self::LineComment | Self::BlockComment | Self::Error => {
                        Tok::Error
                    }
                }
            };
        }

        same! {
            Ident,
            KwBreak, KwCase, KwChan, KwConst, KwContinue, KwDefault, KwDefer, KwElse,
            KwFallthrough, KwFor, KwFunc, KwGo, KwGoto, KwIf, KwImport, KwInterface,
            KwMap, KwPackage, KwRange, KwReturn, KwSelect, KwStruct, KwSwitch, KwType, KwVar,
            Ellipsis, ShlAssign, ShrAssign, AndNotAssign, AddAssign, SubAssign, MulAssign,
            DivAssign, ModAssign, AndAssign, OrAssign, XorAssign, Shl, Shr, AndNot, LAnd, LOr,
            EqEq, NotEq, Le, Ge, Inc, Dec, Define, Arrow, Assign, Plus, Minus, Star, Slash,
            Percent, Amp, Pipe, Caret, Tilde, Bang, Lt, Gt,
            LParen, RParen, LBrack, RBrack, LBrace, RBrace, Comma, Semi, Colon, Dot,
        }
    }
}

/// Integer, float or imaginary, judged from the literal's text.
fn classify_number(text: &str) -> Tok {
    let b = text.as_bytes();
    if b.last() == Some(&b'i') {
        return Tok::ImagLit;
    }
    let hex = b.len() > 1 && b[0] == b'0' && matches!(b[1], b'x' | b'X');
    let float = if hex {
        b.iter().any(|&c| matches!(c, b'.' | b'p' | b'P'))
    } else {
        b.iter().any(|&c| matches!(c, b'.' | b'e' | b'E'))
    };
    if float { Tok::FloatLit } else { Tok::IntLit }
}

// =============================================================================
// Line index
// =============================================================================

/// Byte offsets of line starts, for offset to line:column conversion.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(src: &str) -> Self {
        let mut starts = Vec::with_capacity(src.len() / 32 + 1);
        starts.push(0);
        starts.extend(memchr_iter(b'\n', src.as_bytes()).map(|nl| nl + 1));
        Self { starts }
    }

    pub fn location(&self, offset: usize) -> Location {
        let line = self.starts.partition_point(|&s| s <= offset);
        let column = offset - self.starts[line - 1] + 1;
        Location::new(line as u32, column as u32)
    }

    pub fn span(&self, range: std::ops::Range<usize>) -> Span {
        Span::new(self.location(range.start), self.location(range.end))
    }
}

// =============================================================================
// Lexer wrapper
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    lines: LineIndex,
    comments: Vec<Comment>,
    pending: Option<Token<'src>>,
    last_ends_stmt: bool,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            lines: LineIndex::new(input),
            comments: Vec::new(),
            pending: None,
            last_ends_stmt: false,
            eof_done: false,
        }
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    #[inline]
    fn token(&self, tok: Tok, range: std::ops::Range<usize>) -> Token<'src> {
        let text = &self.logos.source()[range.clone()];
        Token::new(tok, text, self.lines.span(range))
    }

    #[inline]
    fn inserted_semi(&self, at: usize, text: &'static str) -> Token<'src> {
        Token::new(Tok::Semi, text, Span::point(self.lines.location(at)))
    }

    fn record_comment(&mut self, range: std::ops::Range<usize>) {
        let text = &self.logos.source()[range.clone()];
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).into())
            .collect();
        self.comments.push(Comment {
            span: self.lines.span(range),
            lines,
        });
    }

    fn error(&mut self, range: std::ops::Range<usize>) -> Token<'src> {
        self.last_ends_stmt = false;
        let tok = self.token(Tok::Error, range);
        tracing::trace!(at = %tok.span.start, text = tok.text, "invalid token");
        tok
    }
}

impl<'src> TokenSource<'src> for Lexer<'src> {
    fn next_token(&mut self) -> Token<'src> {
        loop {
            if let Some(tok) = self.pending.take() {
                return tok;
            }
            if self.eof_done {
                let end = self.logos.source().len();
                return Token::new(Tok::Eof, "", Span::point(self.lines.location(end)));
            }

            let raw = self.logos.next();
            let range = self.logos.span();
            match raw {
                None => {
                    self.eof_done = true;
                    if std::mem::take(&mut self.last_ends_stmt) {
                        return self.inserted_semi(range.end, "");
                    }
                }
                Some(Err(())) | Some(Ok(RawTok::Error)) => return self.error(range),
                Some(Ok(RawTok::Bom)) => {
                    if range.start != 0 {
                        return self.error(range);
                    }
                }
                Some(Ok(RawTok::Newline)) => {
                    if std::mem::take(&mut self.last_ends_stmt) {
                        return self.inserted_semi(range.start, "\n");
                    }
                }
                Some(Ok(RawTok::LineComment)) => self.record_comment(range),
                Some(Ok(RawTok::BlockComment)) => {
                    let nl = memchr(b'\n', self.logos.slice().as_bytes());
                    self.record_comment(range.clone());
                    if let Some(off) = nl
                        && std::mem::take(&mut self.last_ends_stmt)
                    {
                        return self.inserted_semi(range.start + off, "\n");
                    }
                }
                Some(Ok(RawTok::Number)) => {
                    self.last_ends_stmt = true;
                    return self.token(classify_number(self.logos.slice()), range);
                }
                Some(Ok(raw)) => {
                    let tok = raw.to_tok();
                    self.last_ends_stmt = tok.ends_statement();
                    return self.token(tok, range);
                }
            }
        }
    }

    fn take_comments(&mut self) -> Vec<Comment> {
        std::mem::take(&mut self.comments)
    }
}

/// Yields every token up to, not including, the end of input.
impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        let tok = self.next_token();
        (tok.tok != Tok::Eof).then_some(tok)
    }
}
