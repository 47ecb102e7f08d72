use super::*;
use crate::ast::{
    ArrayLen, ChanDir, FieldDecl, FieldId, FuncResult, Ident, InterfaceElem, ParamDecl, ParamId,
    ParamList, Signature, Span, Type, TypeId,
};

/// Tokens that can begin a type.
pub(super) fn type_first(tok: Tok) -> bool {
    matches!(
        tok,
        Tok::Ident
            | Tok::LParen
            | Tok::LBrack
            | Tok::Star
            | Tok::Arrow
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwFunc
            | Tok::KwStruct
            | Tok::KwInterface
    )
}

impl<'src, S: TokenSource<'src>> Parser<'src, '_, S> {
    pub(super) fn type_(&mut self) -> PResult<TypeId> {
        self.traced("Type", |p| {
            let start = p.tok.span.start;
            let typ = match p.tok.tok {
                Tok::Ident => return p.type_name(),
                Tok::LParen => {
                    p.advance();
                    let t = p.nested(|p| p.type_())?;
                    p.expect(Tok::RParen)?;
                    return Ok(t);
                }
                Tok::Arrow => {
                    let arrow = p.advance().span;
                    return p.chan_type_after_arrow(arrow);
                }
                Tok::LBrack => {
                    p.advance();
                    if p.eat(Tok::RBrack).is_some() {
                        Type::Slice { elem: p.type_()? }
                    } else {
                        let len = match p.eat(Tok::Ellipsis) {
                            Some(dots) => ArrayLen::Ellipsis(dots),
                            None => ArrayLen::Expr(p.nested(|p| p.expr())?),
                        };
                        p.expect(Tok::RBrack)?;
                        Type::Array {
                            len,
                            elem: p.type_()?,
                        }
                    }
                }
                Tok::Star => {
                    p.advance();
                    Type::Pointer { elem: p.type_()? }
                }
                Tok::KwMap => {
                    p.advance();
                    p.expect(Tok::LBrack)?;
                    let key = p.nested(|p| p.type_())?;
                    p.expect(Tok::RBrack)?;
                    Type::Map {
                        key,
                        value: p.type_()?,
                    }
                }
                Tok::KwChan => {
                    p.advance();
                    let dir = match p.eat(Tok::Arrow) {
                        Some(_) => ChanDir::SEND,
                        None => ChanDir::BOTH,
                    };
                    Type::Chan {
                        dir,
                        elem: p.type_()?,
                    }
                }
                Tok::KwFunc => {
                    p.advance();
                    Type::Func {
                        sig: p.signature()?,
                    }
                }
                Tok::KwStruct => p.struct_type()?,
                Tok::KwInterface => p.interface_type()?,
                _ => return Err(p.unexpected("type")),
            };
            let span = p.span_from(start);
            Ok(p.ast.types.alloc(typ, span))
        })
    }

    /// `T` or `pkg.T`.
    fn type_name(&mut self) -> PResult<TypeId> {
        let first = self.ident()?;
        self.qualified_type(first)
    }

    fn qualified_type(&mut self, first: Ident) -> PResult<TypeId> {
        let typ = if self.eat(Tok::Dot).is_some() {
            Type::Name {
                pkg: Some(first),
                name: self.ident()?,
            }
        } else {
            Type::Name {
                pkg: None,
                name: first,
            }
        };
        let span = self.span_from(first.span.start);
        Ok(self.ast.types.alloc(typ, span))
    }

    /// `chan T` after a leading `<-`.
    pub(super) fn chan_type_after_arrow(&mut self, arrow: Span) -> PResult<TypeId> {
        self.expect(Tok::KwChan)?;
        let elem = self.type_()?;
        let span = self.span_from(arrow.start);
        Ok(self.ast.types.alloc(
            Type::Chan {
                dir: ChanDir::RECV,
                elem,
            },
            span,
        ))
    }

    // -------------------------------------------------------------------------
    // Signatures
    // -------------------------------------------------------------------------

    pub(super) fn signature(&mut self) -> PResult<Signature> {
        self.traced("Signature", |p| {
            let params = p.param_list()?;
            let result = if p.at(Tok::LParen) {
                Some(FuncResult::Params(p.param_list()?))
            } else if type_first(p.tok.tok) {
                Some(FuncResult::Type(p.type_()?))
            } else {
                None
            };
            Ok(Signature {
                params,
                result,
                span: p.span_from(params.span.start),
            })
        })
    }

    /// `( ... )` holding either only types or only named groups.
    pub(super) fn param_list(&mut self) -> PResult<ParamList> {
        self.traced("Parameters", |p| {
            p.nested(|p| {
                let l_paren = p.expect(Tok::LParen)?;
                let mut params = Vec::new();
                if !p.at(Tok::RParen) {
                    p.params(&mut params)?;
                }
                let r_paren = p.expect(Tok::RParen)?;
                Ok(ParamList {
                    params: p.ast.list_params(params),
                    span: l_paren.to(r_paren),
                })
            })
        })
    }

    /// Leading identifiers stay undecided until a token shows whether they
    /// name parameters (a type follows) or types (`,`, `)` or `.` follows).
    fn params(&mut self, out: &mut Vec<ParamId>) -> PResult<()> {
        let mut pending: Vec<Ident> = Vec::new();
        while self.at(Tok::Ident) {
            let name = self.ident()?;
            match self.tok.tok {
                Tok::Comma => {
                    pending.push(name);
                    self.advance();
                    if self.at(Tok::RParen) {
                        break;
                    }
                }
                Tok::RParen => {
                    pending.push(name);
                    break;
                }
                Tok::Dot => {
                    self.unnamed_params(&pending, out);
                    let typ = self.qualified_type(name)?;
                    self.push_param(out, Vec::new(), None, typ, name.span.start);
                    if self.eat(Tok::Comma).is_none() || self.at(Tok::RParen) {
                        return Ok(());
                    }
                    return self.type_params(out);
                }
                _ => {
                    pending.push(name);
                    return self.named_params(pending, out);
                }
            }
        }
        self.unnamed_params(&pending, out);
        if self.at(Tok::RParen) {
            return Ok(());
        }
        self.type_params(out)
    }

    /// Identifiers that turned out to be type names.
    fn unnamed_params(&mut self, types: &[Ident], out: &mut Vec<ParamId>) {
        for &name in types {
            let typ = self
                .ast
                .types
                .alloc(Type::Name { pkg: None, name }, name.span);
            let param = ParamDecl {
                names: ListRef::EMPTY,
                ellipsis: None,
                typ,
            };
            out.push(self.ast.params.alloc(param, name.span));
        }
    }

    fn push_param(
        &mut self,
        out: &mut Vec<ParamId>,
        names: Vec<Ident>,
        ellipsis: Option<Span>,
        typ: TypeId,
        start: Location,
    ) {
        let names = self.ast.list_idents(names);
        let span = self.span_from(start);
        let param = ParamDecl {
            names,
            ellipsis,
            typ,
        };
        out.push(self.ast.params.alloc(param, span));
    }

    /// `T, ...T` with no names. A variadic entry ends the list.
    fn type_params(&mut self, out: &mut Vec<ParamId>) -> PResult<()> {
        loop {
            let start = self.tok.span.start;
            let ellipsis = self.eat(Tok::Ellipsis);
            let typ = self.type_()?;
            self.push_param(out, Vec::new(), ellipsis, typ, start);
            if ellipsis.is_some() {
                self.eat(Tok::Comma);
                return Ok(());
            }
            if self.eat(Tok::Comma).is_none() || self.at(Tok::RParen) {
                return Ok(());
            }
        }
    }

    /// `a, b T, c ...U` where every group is named.
    fn named_params(&mut self, first: Vec<Ident>, out: &mut Vec<ParamId>) -> PResult<()> {
        let mut names = first;
        loop {
            let start = names.first().map_or(self.tok.span.start, |n| n.span.start);
            let ellipsis = self.eat(Tok::Ellipsis);
            let typ = self.type_()?;
            self.push_param(out, names, ellipsis, typ, start);
            if ellipsis.is_some() {
                self.eat(Tok::Comma);
                return Ok(());
            }
            if self.eat(Tok::Comma).is_none() || self.at(Tok::RParen) {
                return Ok(());
            }
            names = self.ident_list()?;
        }
    }

    // -------------------------------------------------------------------------
    // Structs and interfaces
    // -------------------------------------------------------------------------

    fn struct_type(&mut self) -> PResult<Type> {
        self.traced("StructType", |p| {
            p.expect(Tok::KwStruct)?;
            p.expect(Tok::LBrace)?;
            let fields = p.nested(|p| {
                let mut fields = Vec::new();
                while !p.at(Tok::RBrace) {
                    fields.push(p.field_decl()?);
                    if p.eat(Tok::Semi).is_none() {
                        break;
                    }
                }
                Ok(fields)
            })?;
            p.expect(Tok::RBrace)?;
            Ok(Type::Struct {
                fields: p.ast.list_fields(fields),
            })
        })
    }

    /// A named field group or an embedded type. After a leading identifier,
    /// `.` makes it a package qualifier and a tag, `;` or `}` makes it the
    /// embedded type itself.
    fn field_decl(&mut self) -> PResult<FieldId> {
        self.traced("FieldDecl", |p| {
            let start = p.tok.span.start;
            let (names, typ) = match p.tok.tok {
                Tok::Star => {
                    p.advance();
                    let elem = p.type_name()?;
                    let span = p.span_from(start);
                    (ListRef::EMPTY, p.ast.types.alloc(Type::Pointer { elem }, span))
                }
                Tok::Ident => {
                    let first = p.ident()?;
                    match p.tok.tok {
                        Tok::Dot
                        | Tok::StringLit
                        | Tok::RawStringLit
                        | Tok::Semi
                        | Tok::RBrace => (ListRef::EMPTY, p.qualified_type(first)?),
                        _ => {
                            let mut names = vec![first];
                            while p.eat(Tok::Comma).is_some() {
                                names.push(p.ident()?);
                            }
                            let typ = p.type_()?;
                            (p.ast.list_idents(names), typ)
                        }
                    }
                }
                _ => return Err(p.unexpected("field name or embedded type")),
            };
            let tag = match p.tok.tok {
                Tok::StringLit | Tok::RawStringLit => Some(p.literal()?),
                _ => None,
            };
            let span = p.span_from(start);
            Ok(p.ast.fields.alloc(FieldDecl { names, typ, tag }, span))
        })
    }

    fn interface_type(&mut self) -> PResult<Type> {
        self.traced("InterfaceType", |p| {
            p.expect(Tok::KwInterface)?;
            p.expect(Tok::LBrace)?;
            let elems = p.nested(|p| {
                let mut elems = Vec::new();
                while !p.at(Tok::RBrace) {
                    elems.push(p.interface_elem()?);
                    if p.eat(Tok::Semi).is_none() {
                        break;
                    }
                }
                Ok(elems)
            })?;
            p.expect(Tok::RBrace)?;
            Ok(Type::Interface {
                elems: p.ast.list_interface_elems(elems),
            })
        })
    }

    fn interface_elem(&mut self) -> PResult<InterfaceElem> {
        let name = self.ident()?;
        if self.at(Tok::LParen) {
            let sig = self.signature()?;
            return Ok(InterfaceElem::Method { name, sig });
        }
        Ok(InterfaceElem::Embedded(self.qualified_type(name)?))
    }
}
