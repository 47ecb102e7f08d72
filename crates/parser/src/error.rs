use thiserror::Error;

use crate::ast::{Location, Span};

/// Result type threaded through every parser production.
pub type PResult<T> = Result<T, ParseError>;

/// An unexpected token.
///
/// `trace` names the productions that were active, innermost last.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: expected {wanted}, got {got}", .span.start)]
pub struct SyntaxError {
    pub wanted: String,
    pub got: String,
    pub span: Span,
    pub trace: Vec<&'static str>,
}

impl SyntaxError {
    /// The production trace rendered one name per line.
    pub fn trace_lines(&self) -> String {
        self.trace.join("\n")
    }
}

/// A literal the lexer accepted whose value cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: malformed {kind}: [{text}]", .span.start)]
pub struct MalformedLiteral {
    /// Literal kind such as `"integer literal"` or `"rune literal"`.
    pub kind: &'static str,
    pub text: String,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error("{}: unexpected rune in input [{}]", .span.start, escaped(.text))]
    BadRune { text: String, span: Span },

    #[error(transparent)]
    Malformed(#[from] MalformedLiteral),

    /// A construct that is recognized but not supported.
    #[error("{}: unimplemented: {construct}", .span.start)]
    Unsupported { construct: &'static str, span: Span },

    #[error("{}: nesting exceeds {limit} levels", .span.start)]
    TooDeep { limit: usize, span: Span },
}

fn escaped(text: &str) -> String {
    text.escape_default().to_string()
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::Syntax(e) => e.span,
            ParseError::Malformed(e) => e.span,
            ParseError::BadRune { span, .. }
            | ParseError::Unsupported { span, .. }
            | ParseError::TooDeep { span, .. } => *span,
        }
    }
}

/// An identifier bound twice in the same scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{second}: {name} redeclared, originally declared at {first}")]
pub struct Redeclaration {
    pub name: String,
    pub first: Location,
    pub second: Location,
    /// Files holding the two declarations, as indices into the files given
    /// to [`resolve`](crate::symtab::resolve).
    pub first_file: usize,
    pub second_file: usize,
}

/// Any error produced by this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Redeclared(#[from] Redeclaration),
}

impl From<SyntaxError> for Error {
    fn from(e: SyntaxError) -> Self {
        Error::Parse(e.into())
    }
}

impl From<MalformedLiteral> for Error {
    fn from(e: MalformedLiteral) -> Self {
        Error::Parse(e.into())
    }
}

/// Accumulated errors, rendered one per line in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{}", render_lines(.0))]
pub struct Errors(pub Vec<Error>);

fn render_lines(errs: &[Error]) -> String {
    errs.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl Errors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, e: impl Into<Error>) {
        self.0.push(e.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Error> {
        self.0.iter()
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), Errors> {
        if self.0.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Extend<Error> for Errors {
    fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Errors {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(line: u32, column: u32) -> Span {
        Span::point(Location::new(line, column))
    }

    #[test]
    fn syntax_error_message() {
        let e = SyntaxError {
            wanted: "operand".into(),
            got: "]".into(),
            span: at(1, 5),
            trace: vec!["Expression", "Operand"],
        };
        assert_eq!(e.to_string(), "1:5: expected operand, got ]");
        assert_eq!(e.trace_lines(), "Expression\nOperand");
    }

    #[test]
    fn bad_rune_is_escaped() {
        let e = ParseError::BadRune {
            text: "\"\\'".into(),
            span: at(1, 1),
        };
        assert_eq!(e.to_string(), r#"1:1: unexpected rune in input [\"\\\']"#);
    }

    #[test]
    fn errors_join_lines() {
        let mut errs = Errors::new();
        assert!(errs.clone().into_result().is_ok());
        errs.push(Redeclaration {
            name: "x".into(),
            first: Location::new(1, 5),
            second: Location::new(2, 5),
            first_file: 0,
            second_file: 0,
        });
        errs.push(MalformedLiteral {
            kind: "integer literal",
            text: "08".into(),
            span: at(3, 1),
        });
        let msg = errs.into_result().unwrap_err().to_string();
        assert_eq!(
            msg,
            "2:5: x redeclared, originally declared at 1:5\n3:1: malformed integer literal: [08]"
        );
    }
}
