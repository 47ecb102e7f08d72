use super::*;
use crate::ast::{BinaryOp, Element, Span, Type, TypeId, UnaryOp};
use crate::error::ParseError;

fn binary_op(tok: Tok) -> Option<BinaryOp> {
    Some(match tok {
        Tok::LOr => BinaryOp::LOr,
        Tok::LAnd => BinaryOp::LAnd,
        Tok::EqEq => BinaryOp::Eq,
        Tok::NotEq => BinaryOp::Ne,
        Tok::Lt => BinaryOp::Lt,
        Tok::Le => BinaryOp::Le,
        Tok::Gt => BinaryOp::Gt,
        Tok::Ge => BinaryOp::Ge,
        Tok::Plus => BinaryOp::Add,
        Tok::Minus => BinaryOp::Sub,
        Tok::Pipe => BinaryOp::Or,
        Tok::Caret => BinaryOp::Xor,
        Tok::Star => BinaryOp::Mul,
        Tok::Slash => BinaryOp::Div,
        Tok::Percent => BinaryOp::Mod,
        Tok::Shl => BinaryOp::Shl,
        Tok::Shr => BinaryOp::Shr,
        Tok::Amp => BinaryOp::And,
        Tok::AndNot => BinaryOp::AndNot,
        _ => return None,
    })
}

fn unary_op(tok: Tok) -> Option<UnaryOp> {
    Some(match tok {
        Tok::Plus => UnaryOp::Add,
        Tok::Minus => UnaryOp::Sub,
        Tok::Bang => UnaryOp::Not,
        Tok::Caret => UnaryOp::Xor,
        Tok::Star => UnaryOp::Deref,
        Tok::Amp => UnaryOp::Addr,
        Tok::Arrow => UnaryOp::Recv,
        _ => return None,
    })
}

impl<'src, S: TokenSource<'src>> Parser<'src, '_, S> {
    pub(super) fn expr(&mut self) -> PResult<ExprId> {
        self.traced("Expression", |p| p.binary_expr(1))
    }

    pub(super) fn expr_list(&mut self) -> PResult<Vec<ExprId>> {
        let mut list = vec![self.expr()?];
        while self.eat(Tok::Comma).is_some() {
            list.push(self.expr()?);
        }
        Ok(list)
    }

    /// Precedence climbing: operators binding at least as tightly as
    /// `min_prec` fold left; the right operand only takes tighter ones.
    fn binary_expr(&mut self, min_prec: u8) -> PResult<ExprId> {
        let mut left = self.unary_expr()?;
        while let Some(op) = binary_op(self.tok.tok)
            && op.precedence() >= min_prec
        {
            let op_pos = self.advance().span;
            let right = self.binary_expr(op.precedence() + 1)?;
            let span = self.ast.exprs.span(left).to(self.ast.exprs.span(right));
            left = self.ast.exprs.alloc(
                Expr::Binary {
                    op,
                    op_pos,
                    left,
                    right,
                },
                span,
            );
        }
        Ok(left)
    }

    fn unary_expr(&mut self) -> PResult<ExprId> {
        self.traced("UnaryExpr", |p| {
            let Some(op) = unary_op(p.tok.tok) else {
                return p.primary_expr();
            };
            let op_pos = p.advance().span;
            if op == UnaryOp::Recv && p.at(Tok::KwChan) {
                // `<-chan T` used as an operand, as in a conversion.
                let typ = p.chan_type_after_arrow(op_pos)?;
                let x = p.ast.exprs.alloc(Expr::TypeExpr(typ), p.ast.types.span(typ));
                return p.primary_suffixes(x);
            }
            let operand = p.unary_expr()?;
            let span = op_pos.to(p.ast.exprs.span(operand));
            Ok(p.ast.exprs.alloc(
                Expr::Unary {
                    op,
                    op_pos,
                    operand,
                },
                span,
            ))
        })
    }

    fn primary_expr(&mut self) -> PResult<ExprId> {
        self.traced("PrimaryExpr", |p| {
            let x = p.operand()?;
            p.primary_suffixes(x)
        })
    }

    fn primary_suffixes(&mut self, mut x: ExprId) -> PResult<ExprId> {
        loop {
            x = match self.tok.tok {
                Tok::Dot => self.selector_or_assertion(x)?,
                Tok::LBrack => self.index_or_slice(x)?,
                Tok::LParen => self.call(x)?,
                Tok::LBrace if self.composite_allowed(x) => {
                    let typ = self.expr_to_type(x)?;
                    let start = self.ast.types.span(typ).start;
                    self.composite_lit(Some(typ), start)?
                }
                _ => return Ok(x),
            };
        }
    }

    fn operand(&mut self) -> PResult<ExprId> {
        self.traced("Operand", |p| match p.tok.tok {
            Tok::Ident => {
                let id = p.ident()?;
                Ok(p.ast.exprs.alloc(Expr::Ident(id), id.span))
            }
            Tok::IntLit
            | Tok::FloatLit
            | Tok::ImagLit
            | Tok::RuneLit
            | Tok::StringLit
            | Tok::RawStringLit => {
                let lit = p.literal()?;
                Ok(p.ast.exprs.alloc(Expr::Literal(lit), p.ast.lits.span(lit)))
            }
            Tok::LParen => {
                p.advance();
                let x = p.nested(|p| p.expr())?;
                p.expect(Tok::RParen)?;
                Ok(x)
            }
            Tok::KwFunc => {
                let func_pos = p.advance().span;
                let sig = p.signature()?;
                if p.at(Tok::LBrace) {
                    return Err(ParseError::Unsupported {
                        construct: "function literal",
                        span: func_pos.to(p.tok.span),
                    });
                }
                let span = func_pos.to(sig.span);
                let typ = p.ast.types.alloc(Type::Func { sig }, span);
                Ok(p.ast.exprs.alloc(Expr::TypeExpr(typ), span))
            }
            Tok::LBrack | Tok::KwStruct | Tok::KwMap | Tok::KwChan | Tok::KwInterface => {
                let typ = p.type_()?;
                Ok(p.ast.exprs.alloc(Expr::TypeExpr(typ), p.ast.types.span(typ)))
            }
            _ => Err(p.unexpected("operand")),
        })
    }

    /// `.sel`, `.(T)` or, where permitted, `.(type)`.
    fn selector_or_assertion(&mut self, x: ExprId) -> PResult<ExprId> {
        self.expect(Tok::Dot)?;
        let start = self.ast.exprs.span(x);
        if self.at(Tok::Ident) {
            let sel = self.ident()?;
            return Ok(self
                .ast
                .exprs
                .alloc(Expr::Selector { expr: x, sel }, start.to(sel.span)));
        }
        if !self.at(Tok::LParen) {
            return Err(self.unexpected("identifier or ("));
        }
        self.advance();
        let typ = if self.at(Tok::KwType) {
            if !self.guard_ok {
                return Err(self.unexpected("type"));
            }
            self.advance();
            // A guard is allowed once, as the whole guard expression.
            self.guard_ok = false;
            None
        } else {
            Some(self.nested(|p| p.type_())?)
        };
        let r_paren = self.expect(Tok::RParen)?;
        Ok(self.ast.exprs.alloc(
            Expr::TypeAssert {
                expr: x,
                typ,
                r_paren,
            },
            start.to(r_paren),
        ))
    }

    /// `[i]`, `[lo:hi]` or `[lo:hi:max]`; `max` requires `hi`.
    fn index_or_slice(&mut self, x: ExprId) -> PResult<ExprId> {
        self.traced("IndexOrSlice", |p| {
            p.nested(|p| {
                let start = p.ast.exprs.span(x);
                let l_brack = p.expect(Tok::LBrack)?;
                let mut low = None;
                if !p.at(Tok::Colon) {
                    let index = p.expr()?;
                    if !p.at(Tok::Colon) {
                        let r_brack = p.expect(Tok::RBrack)?;
                        return Ok(p.ast.exprs.alloc(
                            Expr::Index {
                                expr: x,
                                l_brack,
                                index,
                                r_brack,
                            },
                            start.to(r_brack),
                        ));
                    }
                    low = Some(index);
                }
                p.expect(Tok::Colon)?;
                let mut high = None;
                let mut max = None;
                if !p.at(Tok::RBrack) {
                    high = Some(p.expr()?);
                    if p.eat(Tok::Colon).is_some() {
                        max = Some(p.expr()?);
                    }
                }
                let r_brack = p.expect(Tok::RBrack)?;
                Ok(p.ast.exprs.alloc(
                    Expr::Slice {
                        expr: x,
                        l_brack,
                        low,
                        high,
                        max,
                        r_brack,
                    },
                    start.to(r_brack),
                ))
            })
        })
    }

    fn call(&mut self, func: ExprId) -> PResult<ExprId> {
        self.traced("Call", |p| {
            p.nested(|p| {
                let start = p.ast.exprs.span(func);
                let l_paren = p.expect(Tok::LParen)?;
                let mut args = Vec::new();
                let mut ellipsis = None;
                while !p.at(Tok::RParen) {
                    args.push(p.expr()?);
                    if let Some(dots) = p.eat(Tok::Ellipsis) {
                        ellipsis = Some(dots);
                        p.eat(Tok::Comma);
                        break;
                    }
                    if p.eat(Tok::Comma).is_none() {
                        break;
                    }
                }
                let r_paren = p.expect(Tok::RParen)?;
                let args = p.ast.list_exprs(args);
                Ok(p.ast.exprs.alloc(
                    Expr::Call {
                        func,
                        l_paren,
                        args,
                        ellipsis,
                        r_paren,
                    },
                    start.to(r_paren),
                ))
            })
        })
    }

    /// Whether `{` after `x` opens a composite literal. Inside `if`/`for`
    /// headers a plain type name followed by `{` is the start of the body.
    fn composite_allowed(&self, x: ExprId) -> bool {
        match self.ast.exprs[x] {
            Expr::Ident(_) => !self.no_composite,
            Expr::Selector { expr, .. } => {
                !self.no_composite && matches!(self.ast.exprs[expr], Expr::Ident(_))
            }
            Expr::TypeExpr(t) => matches!(
                self.ast.types[t],
                Type::Array { .. } | Type::Slice { .. } | Type::Map { .. } | Type::Struct { .. }
            ),
            _ => false,
        }
    }

    /// Reinterprets an operand parsed as an expression as the type it names.
    fn expr_to_type(&mut self, x: ExprId) -> PResult<TypeId> {
        let span = self.ast.exprs.span(x);
        let typ = match self.ast.exprs[x] {
            Expr::TypeExpr(t) => return Ok(t),
            Expr::Ident(name) => Type::Name { pkg: None, name },
            Expr::Selector { expr, sel } => match self.ast.exprs[expr] {
                Expr::Ident(pkg) => Type::Name {
                    pkg: Some(pkg),
                    name: sel,
                },
                _ => return Err(self.error_at(span, "type", "expression")),
            },
            _ => return Err(self.error_at(span, "type", "expression")),
        };
        Ok(self.ast.types.alloc(typ, span))
    }

    /// `{ [key :] value, ... }`, with the literal type already parsed.
    fn composite_lit(&mut self, typ: Option<TypeId>, start: Location) -> PResult<ExprId> {
        self.traced("CompositeLit", |p| {
            p.nested(|p| {
                let l_brace = p.expect(Tok::LBrace)?;
                let mut elems = Vec::new();
                while !p.at(Tok::RBrace) {
                    let first = p.element()?;
                    let elem = if p.eat(Tok::Colon).is_some() {
                        Element {
                            key: Some(first),
                            value: p.element()?,
                        }
                    } else {
                        Element {
                            key: None,
                            value: first,
                        }
                    };
                    elems.push(elem);
                    if p.eat(Tok::Comma).is_none() {
                        break;
                    }
                }
                let r_brace = p.expect(Tok::RBrace)?;
                let elems = p.ast.list_elements(elems);
                Ok(p.ast.exprs.alloc(
                    Expr::Composite {
                        typ,
                        elems,
                        l_brace,
                        r_brace,
                    },
                    Span::new(start, r_brace.end),
                ))
            })
        })
    }

    fn element(&mut self) -> PResult<ExprId> {
        if self.at(Tok::LBrace) {
            let start = self.tok.span.start;
            return self.composite_lit(None, start);
        }
        self.expr()
    }
}
