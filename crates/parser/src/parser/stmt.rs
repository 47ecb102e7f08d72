use super::*;
use crate::ast::{AssignOp, Block, ForKind, Ident, IncDecOp, Span};
use crate::error::ParseError;

/// Which extra forms a simple statement may take at its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct SimpleMode {
    /// `label:` followed by a statement.
    pub label_ok: bool,
    /// `range x`, `k, v := range x` and `k, v = range x`.
    pub range_ok: bool,
}

impl SimpleMode {
    pub const PLAIN: Self = Self {
        label_ok: false,
        range_ok: false,
    };
    const STATEMENT: Self = Self {
        label_ok: true,
        range_ok: false,
    };
    const FOR_HEADER: Self = Self {
        label_ok: false,
        range_ok: true,
    };
}

fn assign_op(tok: Tok) -> Option<AssignOp> {
    Some(match tok {
        Tok::Assign => AssignOp::Assign,
        Tok::AddAssign => AssignOp::AddAssign,
        Tok::SubAssign => AssignOp::SubAssign,
        Tok::MulAssign => AssignOp::MulAssign,
        Tok::DivAssign => AssignOp::DivAssign,
        Tok::ModAssign => AssignOp::ModAssign,
        Tok::AndAssign => AssignOp::AndAssign,
        Tok::OrAssign => AssignOp::OrAssign,
        Tok::XorAssign => AssignOp::XorAssign,
        Tok::ShlAssign => AssignOp::ShlAssign,
        Tok::ShrAssign => AssignOp::ShrAssign,
        Tok::AndNotAssign => AssignOp::AndNotAssign,
        _ => return None,
    })
}

impl<'src, S: TokenSource<'src>> Parser<'src, '_, S> {
    /// Statements up to a closing `}` or the end of input.
    pub(super) fn stmt_list(&mut self) -> PResult<ListRef<StmtId>> {
        let mut stmts = Vec::new();
        while !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
            if self.eat(Tok::Semi).is_some() {
                continue;
            }
            stmts.push(self.stmt()?);
            if !self.at(Tok::RBrace) && !self.at(Tok::Eof) {
                self.expect(Tok::Semi)?;
            }
        }
        Ok(self.ast.list_stmts(stmts))
    }

    pub(super) fn block(&mut self) -> PResult<Block> {
        self.traced("Block", |p| {
            p.nested(|p| {
                let l_brace = p.expect(Tok::LBrace)?;
                let stmts = p.stmt_list()?;
                let r_brace = p.expect(Tok::RBrace)?;
                Ok(Block {
                    stmts,
                    span: l_brace.to(r_brace),
                })
            })
        })
    }

    pub(super) fn stmt(&mut self) -> PResult<StmtId> {
        self.traced("Statement", |p| {
            let start = p.tok.span.start;
            let stmt = match p.tok.tok {
                Tok::KwConst | Tok::KwVar | Tok::KwType => {
                    let mut decls = Vec::new();
                    p.decl_group(&mut decls)?;
                    Stmt::Decl(p.ast.list_decls(decls))
                }
                Tok::LBrace => Stmt::Block(p.block()?),
                Tok::KwIf => return p.if_stmt(),
                Tok::KwFor => p.for_stmt()?,
                Tok::KwGo => {
                    p.advance();
                    Stmt::Go {
                        call: p.call_expr("go")?,
                    }
                }
                Tok::KwDefer => {
                    p.advance();
                    Stmt::Defer {
                        call: p.call_expr("defer")?,
                    }
                }
                Tok::KwReturn => {
                    p.advance();
                    let results = if p.at(Tok::Semi) || p.at(Tok::RBrace) {
                        ListRef::EMPTY
                    } else {
                        let results = p.expr_list()?;
                        p.ast.list_exprs(results)
                    };
                    Stmt::Return { results }
                }
                Tok::KwBreak => {
                    p.advance();
                    Stmt::Break {
                        label: p.opt_label()?,
                    }
                }
                Tok::KwContinue => {
                    p.advance();
                    Stmt::Continue {
                        label: p.opt_label()?,
                    }
                }
                Tok::KwGoto => {
                    p.advance();
                    Stmt::Goto { label: p.ident()? }
                }
                Tok::KwFallthrough => {
                    p.advance();
                    Stmt::Fallthrough
                }
                Tok::Semi | Tok::RBrace | Tok::Eof => {
                    return Ok(p.ast.stmts.alloc(Stmt::Empty, Span::point(p.prev_end)));
                }
                Tok::KwSwitch => {
                    return Err(ParseError::Unsupported {
                        construct: "switch statement",
                        span: p.tok.span,
                    });
                }
                Tok::KwSelect => {
                    return Err(ParseError::Unsupported {
                        construct: "select statement",
                        span: p.tok.span,
                    });
                }
                _ => {
                    let (stmt, span) = p.simple_stmt(SimpleMode::STATEMENT)?;
                    return Ok(p.ast.stmts.alloc(stmt, span));
                }
            };
            let span = p.span_from(start);
            Ok(p.ast.stmts.alloc(stmt, span))
        })
    }

    fn opt_label(&mut self) -> PResult<Option<Ident>> {
        if self.at(Tok::Ident) {
            return self.ident().map(Some);
        }
        Ok(None)
    }

    /// Operand of `go` and `defer`, which must be a call.
    fn call_expr(&mut self, keyword: &str) -> PResult<ExprId> {
        let call = self.expr()?;
        if !matches!(self.ast.exprs[call], Expr::Call { .. }) {
            let span = self.ast.exprs.span(call);
            return Err(self.error_at(span, &format!("function call after {keyword}"), "expression"));
        }
        Ok(call)
    }

    /// A simple statement, returned unallocated with its span so callers can
    /// inspect its shape first.
    pub(super) fn simple_stmt(&mut self, mode: SimpleMode) -> PResult<(Stmt, Span)> {
        self.traced("SimpleStmt", |p| {
            let start = p.tok.span.start;
            if mode.range_ok && p.eat(Tok::KwRange).is_some() {
                let expr = p.expr()?;
                let stmt = Stmt::Range {
                    lhs: ListRef::EMPTY,
                    define: false,
                    expr,
                };
                return Ok((stmt, p.span_from(start)));
            }

            let lhs = p.expr_list()?;

            if mode.label_ok
                && p.at(Tok::Colon)
                && let [only] = lhs.as_slice()
                && let Expr::Ident(label) = p.ast.exprs[*only]
            {
                p.advance();
                let stmt = p.stmt()?;
                return Ok((Stmt::Labeled { label, stmt }, p.span_from(start)));
            }

            let stmt = match p.tok.tok {
                Tok::Arrow => {
                    let chan = p.single(&lhs)?;
                    p.advance();
                    let value = p.expr()?;
                    Stmt::Send { chan, value }
                }
                Tok::Inc | Tok::Dec => {
                    let expr = p.single(&lhs)?;
                    let op = match p.advance().tok {
                        Tok::Inc => IncDecOp::Inc,
                        _ => IncDecOp::Dec,
                    };
                    Stmt::IncDec { expr, op }
                }
                Tok::Define => {
                    let names = lhs
                        .iter()
                        .map(|&e| match p.ast.exprs[e] {
                            Expr::Ident(id) => Ok(id),
                            _ => Err(p.error_at(p.ast.exprs.span(e), "identifier", "expression")),
                        })
                        .collect::<PResult<Vec<_>>>()?;
                    let op_pos = p.advance().span;
                    if mode.range_ok && p.eat(Tok::KwRange).is_some() {
                        let expr = p.expr()?;
                        Stmt::Range {
                            lhs: p.ast.list_exprs(lhs),
                            define: true,
                            expr,
                        }
                    } else {
                        let values = p.expr_list()?;
                        Stmt::ShortVarDecl {
                            names: p.ast.list_idents(names),
                            op_pos,
                            values: p.ast.list_exprs(values),
                        }
                    }
                }
                tok => match assign_op(tok) {
                    Some(op) => {
                        let op_pos = p.advance().span;
                        if op == AssignOp::Assign && mode.range_ok && p.eat(Tok::KwRange).is_some() {
                            let expr = p.expr()?;
                            Stmt::Range {
                                lhs: p.ast.list_exprs(lhs),
                                define: false,
                                expr,
                            }
                        } else {
                            let rhs = p.expr_list()?;
                            Stmt::Assign {
                                lhs: p.ast.list_exprs(lhs),
                                op,
                                op_pos,
                                rhs: p.ast.list_exprs(rhs),
                            }
                        }
                    }
                    None => {
                        let expr = p.single(&lhs)?;
                        Stmt::Expr(expr)
                    }
                },
            };
            Ok((stmt, p.span_from(start)))
        })
    }

    /// The only expression of a list; several are an error at the current
    /// token, which should have been an assignment.
    fn single(&self, list: &[ExprId]) -> PResult<ExprId> {
        match list {
            [only] => Ok(*only),
            _ => Err(self.unexpected(":= or = or comma")),
        }
    }

    fn condition(&self, stmt: Stmt, span: Span) -> PResult<ExprId> {
        match stmt {
            Stmt::Expr(e) => Ok(e),
            _ => Err(self.error_at(span, "condition", "statement")),
        }
    }

    fn if_stmt(&mut self) -> PResult<StmtId> {
        self.traced("IfStmt", |p| {
            let start = p.expect(Tok::KwIf)?.start;
            let (init, cond) = p.header(|p| {
                let (first, span) = p.simple_stmt(SimpleMode::PLAIN)?;
                if p.eat(Tok::Semi).is_none() {
                    return Ok((None, p.condition(first, span)?));
                }
                let init = p.ast.stmts.alloc(first, span);
                let (cond, span) = p.simple_stmt(SimpleMode::PLAIN)?;
                Ok((Some(init), p.condition(cond, span)?))
            })?;
            let then = p.block()?;
            let els = if p.eat(Tok::KwElse).is_some() {
                match p.tok.tok {
                    Tok::KwIf => Some(p.if_stmt()?),
                    Tok::LBrace => {
                        let block = p.block()?;
                        Some(p.ast.stmts.alloc(Stmt::Block(block), block.span))
                    }
                    _ => return Err(p.unexpected("if statement or block")),
                }
            } else {
                None
            };
            let stmt = Stmt::If {
                init,
                cond,
                then,
                els,
            };
            let span = p.span_from(start);
            Ok(p.ast.stmts.alloc(stmt, span))
        })
    }

    fn for_stmt(&mut self) -> PResult<Stmt> {
        self.traced("ForStmt", |p| {
            p.expect(Tok::KwFor)?;
            let kind = p.header(|p| p.for_header())?;
            let body = p.block()?;
            Ok(Stmt::For { kind, body })
        })
    }

    fn for_header(&mut self) -> PResult<ForKind> {
        if self.at(Tok::LBrace) {
            return Ok(ForKind::Infinite);
        }
        let init = if self.at(Tok::Semi) {
            None
        } else {
            let (stmt, span) = self.simple_stmt(SimpleMode::FOR_HEADER)?;
            if matches!(stmt, Stmt::Range { .. }) {
                return Ok(ForKind::Range(self.ast.stmts.alloc(stmt, span)));
            }
            if self.at(Tok::LBrace) {
                return self.condition(stmt, span).map(ForKind::Cond);
            }
            Some(self.ast.stmts.alloc(stmt, span))
        };
        self.expect(Tok::Semi)?;
        let cond = if self.at(Tok::Semi) {
            None
        } else {
            Some(self.expr()?)
        };
        self.expect(Tok::Semi)?;
        let post = if self.at(Tok::LBrace) {
            None
        } else {
            let (stmt, span) = self.simple_stmt(SimpleMode::PLAIN)?;
            if matches!(stmt, Stmt::ShortVarDecl { .. }) {
                return Err(self.error_at(span, "simple statement", "short variable declaration"));
            }
            Some(self.ast.stmts.alloc(stmt, span))
        };
        Ok(ForKind::Clause { init, cond, post })
    }
}
