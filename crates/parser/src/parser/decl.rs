use super::*;
use crate::ast::{
    ConstSpec, Decl, FunctionDecl, ImportDecl, ImportName, ImportSpec, Literal, MethodDecl,
    ParamList, Span, TypeSpec, VarSpec,
};

impl<'src, S: TokenSource<'src>> Parser<'src, '_, S> {
    /// `package name ; { import ... ; } { decl ; }`
    pub(super) fn file(&mut self) -> PResult<File> {
        self.traced("File", |p| {
            let start = p.tok.span.start;
            let package_pos = p.expect(Tok::KwPackage)?;
            let name = p.ident()?;
            p.expect_semi_or_eof()?;

            let mut imports = Vec::new();
            while p.at(Tok::KwImport) {
                imports.push(p.import_decl()?);
                p.expect_semi_or_eof()?;
            }
            let imports = p.ast.list_decls(imports);

            let mut decls = Vec::new();
            while !p.at(Tok::Eof) {
                p.top_level_decl(&mut decls)?;
                p.expect_semi_or_eof()?;
            }
            let decls = p.ast.list_decls(decls);

            Ok(File {
                package_pos,
                name,
                imports,
                decls,
                span: p.span_from(start),
            })
        })
    }

    /// Top-level declarations, imports included, up to the end of input.
    pub(super) fn declarations(&mut self) -> PResult<ListRef<DeclId>> {
        let mut decls = Vec::new();
        while !self.at(Tok::Eof) {
            if self.at(Tok::KwImport) {
                decls.push(self.import_decl()?);
            } else {
                self.top_level_decl(&mut decls)?;
            }
            self.expect_semi_or_eof()?;
        }
        Ok(self.ast.list_decls(decls))
    }

    fn top_level_decl(&mut self, out: &mut Vec<DeclId>) -> PResult<()> {
        match self.tok.tok {
            Tok::KwFunc => {
                out.push(self.func_decl()?);
                Ok(())
            }
            Tok::KwConst | Tok::KwVar | Tok::KwType => self.decl_group(out),
            _ => Err(self.unexpected("declaration")),
        }
    }

    /// `const`, `var` or `type`, alone or as a parenthesized group. Each
    /// spec becomes its own declaration; a lone spec's span starts at the
    /// keyword.
    pub(super) fn decl_group(&mut self, out: &mut Vec<DeclId>) -> PResult<()> {
        let kw = self.tok.tok;
        let name = match kw {
            Tok::KwConst => "ConstDecl",
            Tok::KwVar => "VarDecl",
            _ => "TypeDecl",
        };
        self.traced(name, |p| {
            let kw_start = p.tok.span.start;
            // Attached only to a lone spec; group members find their own.
            let lines = p.doc_lines(kw_start);
            p.advance();
            if p.eat(Tok::LParen).is_none() {
                let doc = p.ast.list_doc_lines(lines);
                out.push(p.spec(kw, doc, kw_start, 0)?);
                return Ok(());
            }
            p.nested(|p| {
                let mut iota = 0;
                while !p.at(Tok::RParen) {
                    let start = p.tok.span.start;
                    let doc = p.doc_for(start);
                    out.push(p.spec(kw, doc, start, iota)?);
                    iota += 1;
                    if p.eat(Tok::Semi).is_none() {
                        break;
                    }
                }
                Ok(())
            })?;
            p.expect(Tok::RParen)?;
            Ok(())
        })
    }

    fn spec(
        &mut self,
        kw: Tok,
        doc: ListRef<Box<str>>,
        start: Location,
        iota: u32,
    ) -> PResult<DeclId> {
        let decl = match kw {
            Tok::KwConst => Decl::Const(self.const_spec(doc, iota)?),
            Tok::KwVar => Decl::Var(self.var_spec(doc)?),
            _ => Decl::Type(self.type_spec(doc)?),
        };
        let span = self.span_from(start);
        tracing::trace!(%start, "declaration");
        Ok(self.ast.decls.alloc(decl, span))
    }

    /// Type and values may be omitted together after the first spec of a
    /// group, which then repeats the previous spec.
    fn const_spec(&mut self, doc: ListRef<Box<str>>, iota: u32) -> PResult<ConstSpec> {
        let names = self.ident_list()?;
        let typ = if matches!(self.tok.tok, Tok::Assign | Tok::Semi | Tok::RParen | Tok::Eof) {
            None
        } else {
            Some(self.type_()?)
        };
        let values = if self.eat(Tok::Assign).is_some() {
            self.expr_list()?
        } else if typ.is_some() || iota == 0 {
            return Err(self.unexpected("="));
        } else {
            Vec::new()
        };
        Ok(ConstSpec {
            doc,
            names: self.ast.list_idents(names),
            typ,
            values: self.ast.list_exprs(values),
            iota,
        })
    }

    fn var_spec(&mut self, doc: ListRef<Box<str>>) -> PResult<VarSpec> {
        let names = self.ident_list()?;
        let typ = if self.at(Tok::Assign) {
            None
        } else {
            Some(self.type_()?)
        };
        let values = if self.eat(Tok::Assign).is_some() {
            self.expr_list()?
        } else {
            Vec::new()
        };
        Ok(VarSpec {
            doc,
            names: self.ast.list_idents(names),
            typ,
            values: self.ast.list_exprs(values),
        })
    }

    fn type_spec(&mut self, doc: ListRef<Box<str>>) -> PResult<TypeSpec> {
        let name = self.ident()?;
        let assign_pos = self.eat(Tok::Assign);
        let typ = self.type_()?;
        Ok(TypeSpec {
            doc,
            name,
            assign_pos,
            typ,
        })
    }

    /// Functions and methods; a body is optional.
    fn func_decl(&mut self) -> PResult<DeclId> {
        self.traced("FunctionDecl", |p| {
            let start = p.tok.span.start;
            let doc = p.doc_for(start);
            let func_pos = p.expect(Tok::KwFunc)?;
            let recv = if p.at(Tok::LParen) {
                Some(p.receiver()?)
            } else {
                None
            };
            let name = p.ident()?;
            let sig = p.signature()?;
            let body = if p.at(Tok::LBrace) {
                Some(p.block()?)
            } else {
                None
            };
            let decl = match recv {
                Some(recv) => Decl::Method(MethodDecl {
                    doc,
                    func_pos,
                    recv,
                    name,
                    sig,
                    body,
                }),
                None => Decl::Func(FunctionDecl {
                    doc,
                    func_pos,
                    name,
                    sig,
                    body,
                }),
            };
            let span = p.span_from(start);
            Ok(p.ast.decls.alloc(decl, span))
        })
    }

    /// A parameter list holding exactly one, at most singly named, parameter.
    fn receiver(&mut self) -> PResult<ParamList> {
        let recv = self.param_list()?;
        let ok = match self.ast.params_list(recv.params) {
            [only] => {
                let param = &self.ast.params[*only];
                param.names.len() <= 1 && param.ellipsis.is_none()
            }
            _ => false,
        };
        if !ok {
            return Err(self.error_at(recv.span, "single receiver", "receiver list"));
        }
        Ok(recv)
    }

    fn import_decl(&mut self) -> PResult<DeclId> {
        self.traced("ImportDecl", |p| {
            let start = p.tok.span.start;
            let doc = p.doc_for(start);
            let import_pos = p.expect(Tok::KwImport)?;
            let mut specs = Vec::new();
            if p.eat(Tok::LParen).is_some() {
                while !p.at(Tok::RParen) {
                    specs.push(p.import_spec()?);
                    if p.eat(Tok::Semi).is_none() {
                        break;
                    }
                }
                p.expect(Tok::RParen)?;
            } else {
                specs.push(p.import_spec()?);
            }
            let decl = Decl::Import(ImportDecl {
                doc,
                import_pos,
                specs: p.ast.list_import_specs(specs),
            });
            let span = p.span_from(start);
            Ok(p.ast.decls.alloc(decl, span))
        })
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let name = match self.tok.tok {
            Tok::Dot => Some(ImportName::Dot(self.advance().span)),
            Tok::Ident => Some(ImportName::Name(self.ident()?)),
            _ => None,
        };
        if !matches!(self.tok.tok, Tok::StringLit | Tok::RawStringLit) {
            return Err(self.unexpected("import path"));
        }
        let (value, path_span): (Literal, Span) = self.literal_value()?;
        let Literal::String(bytes) = value else {
            return Err(self.error_at(path_span, "import path", "literal"));
        };
        let path = self.ast.intern(&String::from_utf8_lossy(&bytes));
        Ok(ImportSpec {
            name,
            path,
            path_span,
        })
    }
}
