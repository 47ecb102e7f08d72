//! Recursive-descent parser.
//!
//! One method per production, split by area: [`expr`] (operands, primary
//! expressions, precedence climbing), [`types`] (types, signatures,
//! parameter lists), [`stmt`] (statements and blocks) and [`decl`]
//! (declarations and files). Cursor and error helpers live in [`support`].
//!
//! Parsing stops at the first error. Every error records the names of the
//! productions that were active, innermost last.

mod decl;
mod expr;
mod stmt;
mod support;
mod types;

use crate::ast::{AstArena, DeclId, Expr, ExprId, File, ListRef, Location, Stmt, StmtId};
use crate::error::PResult;
use crate::lexer::Lexer;
use crate::token::{Comment, Tok, Token, TokenSource};

/// Default limit on the number of simultaneously active productions.
pub const DEFAULT_MAX_DEPTH: usize = 1000;

/// Default stack, in bytes, a parse may use below its entry point.
pub const DEFAULT_STACK_BUDGET: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Inputs nesting deeper than this fail with `ParseError::TooDeep`.
    pub max_depth: usize,
    /// Stack the parse may use before failing with `ParseError::TooDeep`,
    /// whatever `max_depth` allows. Unoptimized builds use several
    /// kilobytes per production and reach this first.
    pub stack_budget: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            stack_budget: DEFAULT_STACK_BUDGET,
        }
    }
}

/// What to parse the whole input as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// A single expression, optionally followed by `;`.
    Expression,
    /// Top-level declarations without a package clause.
    Declarations,
    /// A complete source file.
    File,
    /// A statement list as found inside a block.
    Statements,
    /// `x.(type)` or `v := x.(type)`.
    TypeSwitchGuard,
}

/// Result of a successful parse, shaped by the [`Entry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Root {
    Expr(ExprId),
    Decls(ListRef<DeclId>),
    File(File),
    Stmts(ListRef<StmtId>),
    Stmt(StmtId),
}

/// Lexes and parses `src` into `ast`.
pub fn parse(src: &str, entry: Entry, ast: &mut AstArena, config: &ParserConfig) -> PResult<Root> {
    parse_tokens(Lexer::new(src), entry, ast, config)
}

/// Parses a prepared token stream into `ast`.
pub fn parse_tokens<'src, S: TokenSource<'src>>(
    tokens: S,
    entry: Entry,
    ast: &mut AstArena,
    config: &ParserConfig,
) -> PResult<Root> {
    Parser::new(tokens, ast, config).parse_entry(entry)
}

/// Parses a complete source file.
pub fn parse_file(src: &str, ast: &mut AstArena, config: &ParserConfig) -> PResult<File> {
    Parser::new(Lexer::new(src), ast, config).file()
}

pub fn parse_expr(src: &str, ast: &mut AstArena, config: &ParserConfig) -> PResult<ExprId> {
    Parser::new(Lexer::new(src), ast, config).whole_expr()
}

pub fn parse_decls(src: &str, ast: &mut AstArena, config: &ParserConfig) -> PResult<ListRef<DeclId>> {
    Parser::new(Lexer::new(src), ast, config).declarations()
}

pub fn parse_stmts(src: &str, ast: &mut AstArena, config: &ParserConfig) -> PResult<ListRef<StmtId>> {
    Parser::new(Lexer::new(src), ast, config).whole_stmts()
}

pub struct Parser<'src, 'ast, S> {
    src: S,
    tok: Token<'src>,
    prev_end: Location,
    ast: &'ast mut AstArena,
    comments: Vec<Comment>,
    trace: Vec<&'static str>,
    max_depth: usize,
    stack_budget: usize,
    /// Stack position when parsing started.
    stack_base: usize,
    /// Set inside `if`/`for` headers, where `T {` opens the body, not a literal.
    no_composite: bool,
    /// Set while `x.(type)` is acceptable at the current position.
    guard_ok: bool,
}

impl<'src, 'ast, S: TokenSource<'src>> Parser<'src, 'ast, S> {
    pub fn new(mut src: S, ast: &'ast mut AstArena, config: &ParserConfig) -> Self {
        let tok = src.next_token();
        let comments = src.take_comments();
        Self {
            src,
            tok,
            prev_end: Location::default(),
            ast,
            comments,
            trace: Vec::with_capacity(64),
            max_depth: config.max_depth,
            stack_budget: config.stack_budget,
            stack_base: support::stack_position(),
            no_composite: false,
            guard_ok: false,
        }
    }

    pub fn parse_entry(&mut self, entry: Entry) -> PResult<Root> {
        tracing::trace!(?entry, "parse");
        self.stack_base = support::stack_position();
        let root = match entry {
            Entry::Expression => self.whole_expr().map(Root::Expr),
            Entry::Declarations => self.declarations().map(Root::Decls),
            Entry::File => self.file().map(Root::File),
            Entry::Statements => self.whole_stmts().map(Root::Stmts),
            Entry::TypeSwitchGuard => self.type_switch_guard().map(Root::Stmt),
        };
        if let Err(e) = &root {
            tracing::debug!(error = %e, "parse failed");
        }
        root
    }

    fn whole_expr(&mut self) -> PResult<ExprId> {
        let e = self.expr()?;
        self.eat(Tok::Semi);
        self.expect(Tok::Eof)?;
        Ok(e)
    }

    fn whole_stmts(&mut self) -> PResult<ListRef<StmtId>> {
        let stmts = self.stmt_list()?;
        self.expect(Tok::Eof)?;
        Ok(stmts)
    }

    fn type_switch_guard(&mut self) -> PResult<StmtId> {
        self.traced("TypeSwitchGuard", |p| {
            p.guard_ok = true;
            let (stmt, span) = p.simple_stmt(stmt::SimpleMode::PLAIN)?;
            p.guard_ok = false;
            let guarded = match stmt {
                Stmt::Expr(e) => p.is_guard(e),
                Stmt::ShortVarDecl { names, values, .. } => {
                    let values = p.ast.exprs_list(values);
                    names.len() == 1 && values.len() == 1 && p.is_guard(values[0])
                }
                _ => false,
            };
            if !guarded {
                return Err(p.error_at(span, "type switch guard", "statement"));
            }
            let id = p.ast.stmts.alloc(stmt, span);
            p.eat(Tok::Semi);
            p.expect(Tok::Eof)?;
            Ok(id)
        })
    }

    fn is_guard(&self, e: ExprId) -> bool {
        matches!(self.ast.exprs[e], Expr::TypeAssert { typ: None, .. })
    }
}
