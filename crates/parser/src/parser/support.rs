use super::*;
use crate::ast::{Ident, LitId, Literal, Span};
use crate::error::{MalformedLiteral, ParseError, SyntaxError};
use crate::literal;

/// Address of a local in the caller's frame. The distance between two
/// positions is the stack used between them, whichever way the stack grows.
#[inline(always)]
pub(super) fn stack_position() -> usize {
    let marker = 0u8;
    std::hint::black_box(&marker) as *const u8 as usize
}

impl<'src, S: TokenSource<'src>> Parser<'src, '_, S> {
    // -------------------------------------------------------------------------
    // Cursor
    // -------------------------------------------------------------------------

    /// Consumes the current token and returns it.
    pub(super) fn advance(&mut self) -> Token<'src> {
        let tok = self.tok;
        self.prev_end = tok.span.end;
        self.tok = self.src.next_token();
        self.comments.append(&mut self.src.take_comments());
        tok
    }

    #[inline]
    pub(super) fn at(&self, tok: Tok) -> bool {
        self.tok.tok == tok
    }

    pub(super) fn eat(&mut self, tok: Tok) -> Option<Span> {
        self.at(tok).then(|| self.advance().span)
    }

    pub(super) fn expect(&mut self, tok: Tok) -> PResult<Span> {
        if self.at(tok) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(tok.describe()))
        }
    }

    /// `;` unless the input ends here.
    pub(super) fn expect_semi_or_eof(&mut self) -> PResult<()> {
        if !self.at(Tok::Eof) {
            self.expect(Tok::Semi)?;
        }
        Ok(())
    }

    /// Span from `start` to the end of the last consumed token.
    #[inline]
    pub(super) fn span_from(&self, start: Location) -> Span {
        Span::new(start, self.prev_end)
    }

    pub(super) fn ident(&mut self) -> PResult<Ident> {
        if !self.at(Tok::Ident) {
            return Err(self.unexpected("identifier"));
        }
        let tok = self.advance();
        Ok(Ident {
            sym: self.ast.intern(tok.text),
            span: tok.span,
        })
    }

    pub(super) fn ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut names = vec![self.ident()?];
        while self.eat(Tok::Comma).is_some() {
            names.push(self.ident()?);
        }
        Ok(names)
    }

    // -------------------------------------------------------------------------
    // Production bookkeeping
    // -------------------------------------------------------------------------

    /// Runs `f` as production `name`, enforcing the nesting limit and the
    /// stack budget.
    pub(super) fn traced<T>(
        &mut self,
        name: &'static str,
        f: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        let used = self.stack_base.abs_diff(stack_position());
        if self.trace.len() >= self.max_depth || used > self.stack_budget {
            return Err(ParseError::TooDeep {
                limit: self.trace.len(),
                span: self.tok.span,
            });
        }
        self.trace.push(name);
        let out = f(self);
        self.trace.pop();
        out
    }

    /// Runs `f` inside brackets, where composite literals are unrestricted and
    /// type switch guards are not allowed.
    pub(super) fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = (self.no_composite, self.guard_ok);
        self.no_composite = false;
        self.guard_ok = false;
        let out = f(self);
        (self.no_composite, self.guard_ok) = saved;
        out
    }

    /// Runs `f` as an `if`/`for` header.
    pub(super) fn header<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let saved = self.no_composite;
        self.no_composite = true;
        let out = f(self);
        self.no_composite = saved;
        out
    }

    // -------------------------------------------------------------------------
    // Errors
    // -------------------------------------------------------------------------

    /// Error for the current token when `wanted` was expected.
    pub(super) fn unexpected(&self, wanted: &str) -> ParseError {
        if self.tok.tok == Tok::Error {
            return ParseError::BadRune {
                text: self.tok.text.to_owned(),
                span: self.tok.span,
            };
        }
        SyntaxError {
            wanted: wanted.to_owned(),
            got: self.tok.got().to_owned(),
            span: self.tok.span,
            trace: self.trace.clone(),
        }
        .into()
    }

    /// Error for an already-parsed construct at `span`.
    pub(super) fn error_at(&self, span: Span, wanted: &str, got: &str) -> ParseError {
        SyntaxError {
            wanted: wanted.to_owned(),
            got: got.to_owned(),
            span,
            trace: self.trace.clone(),
        }
        .into()
    }

    // -------------------------------------------------------------------------
    // Literals and comments
    // -------------------------------------------------------------------------

    /// Decodes and consumes the current literal token.
    pub(super) fn literal_value(&mut self) -> PResult<(Literal, Span)> {
        let tok = self.tok;
        let (kind, value) = match tok.tok {
            Tok::IntLit => ("integer literal", literal::int_value(tok.text).map(Literal::Integer)),
            Tok::FloatLit => ("floating point literal", literal::float_value(tok.text).map(Literal::Float)),
            Tok::ImagLit => ("imaginary literal", literal::imag_value(tok.text).map(Literal::Imaginary)),
            Tok::RuneLit => ("rune literal", literal::rune_value(tok.text).map(Literal::Rune)),
            Tok::StringLit | Tok::RawStringLit => (
                "string literal",
                literal::string_value(tok.text).map(|b| Literal::String(b.into_boxed_slice())),
            ),
            _ => return Err(self.unexpected("literal")),
        };
        let Some(value) = value else {
            return Err(MalformedLiteral {
                kind,
                text: tok.text.to_owned(),
                span: tok.span,
            }
            .into());
        };
        self.advance();
        Ok((value, tok.span))
    }

    pub(super) fn literal(&mut self) -> PResult<LitId> {
        let (value, span) = self.literal_value()?;
        Ok(self.ast.lits.alloc(value, span))
    }

    /// Doc comment lines for a declaration starting at `start`: the
    /// contiguous run of comments ending on the line before it, each on lines
    /// of their own. Comments seen so far are dropped afterwards.
    pub(super) fn doc_lines(&mut self, start: Location) -> Vec<Box<str>> {
        let mut want = start.line.saturating_sub(1);
        let mut group = Vec::new();
        for c in self.comments.iter().rev() {
            if c.span.start >= start {
                continue;
            }
            if want == 0 || c.span.end.line != want || c.span.start.line <= self.prev_end.line {
                break;
            }
            group.push(c);
            want = c.span.start.line - 1;
        }
        let lines = group
            .iter()
            .rev()
            .flat_map(|c| c.lines.iter().cloned())
            .collect();
        self.comments.clear();
        lines
    }

    /// [`Self::doc_lines`], stored in the arena.
    pub(super) fn doc_for(&mut self, start: Location) -> ListRef<Box<str>> {
        let lines = self.doc_lines(start);
        self.ast.list_doc_lines(lines)
    }
}
