//! Indented debug rendering of the AST.
//!
//! One node per line, children two spaces deeper than their parent:
//!
//! ```text
//! Binary +
//!   Ident a
//!   Binary *
//!     Ident b
//!     Ident c
//! ```
//!
//! The format is for people and snapshot tests; nothing parses it back.

use std::fmt::{self, Write};

use crate::ast::*;
use crate::literal::format_rational;

/// Nodes that can be printed as the root of a tree.
pub trait Print {
    fn print_at<W: Write>(&self, p: &mut TreePrinter<'_, W>, level: usize) -> fmt::Result;
}

/// Writes `node` and its descendants to `out`.
pub fn print<N: Print + ?Sized, W: Write>(ast: &AstArena, node: &N, out: &mut W) -> fmt::Result {
    let mut p = TreePrinter { ast, out };
    node.print_at(&mut p, 0)
}

/// [`print`] into a fresh string.
pub fn to_tree_string<N: Print + ?Sized>(ast: &AstArena, node: &N) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = print(ast, node, &mut out);
    out
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(v) => write!(f, "{v}"),
            Literal::Float(v) => f.write_str(&format_rational(v)),
            Literal::Imaginary(v) => write!(f, "{}i", format_rational(v)),
            Literal::Rune(c) => write!(f, "{c:?} ({:#x})", *c as u32),
            Literal::String(bytes) => write!(f, "{:?}", String::from_utf8_lossy(bytes)),
        }
    }
}

pub struct TreePrinter<'a, W> {
    ast: &'a AstArena,
    out: &'a mut W,
}

impl<W: Write> TreePrinter<'_, W> {
    fn line(&mut self, level: usize, args: fmt::Arguments<'_>) -> fmt::Result {
        for _ in 0..level {
            self.out.write_str("  ")?;
        }
        self.out.write_fmt(args)?;
        self.out.write_char('\n')
    }

    fn names(&self, list: ListRef<Ident>) -> String {
        self.ast
            .idents_list(list)
            .iter()
            .map(|&id| self.ast.ident_str(id))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn doc(&mut self, level: usize, doc: ListRef<Box<str>>) -> fmt::Result {
        let ast = self.ast;
        for line in ast.doc_lines_list(doc) {
            self.line(level, format_args!("{line}"))?;
        }
        Ok(())
    }

    fn file(&mut self, level: usize, file: &File) -> fmt::Result {
        let ast = self.ast;
        self.line(level, format_args!("File {}", ast.ident_str(file.name)))?;
        for &decl in ast.decls_list(file.imports) {
            self.decl(level + 1, decl)?;
        }
        for &decl in ast.decls_list(file.decls) {
            self.decl(level + 1, decl)?;
        }
        Ok(())
    }

    fn decl(&mut self, level: usize, id: DeclId) -> fmt::Result {
        let ast = self.ast;
        match ast.decls[id] {
            Decl::Import(d) => {
                self.doc(level, d.doc)?;
                self.line(level, format_args!("ImportDecl"))?;
                for spec in ast.import_specs_list(d.specs) {
                    let path = ast.name(spec.path);
                    match spec.name {
                        Some(ImportName::Dot(_)) => self.line(level + 1, format_args!("Import . {path:?}"))?,
                        Some(ImportName::Name(n)) => {
                            self.line(level + 1, format_args!("Import {} {path:?}", ast.ident_str(n)))?
                        }
                        None => self.line(level + 1, format_args!("Import {path:?}"))?,
                    }
                }
                Ok(())
            }
            Decl::Const(c) => {
                self.doc(level, c.doc)?;
                self.line(level, format_args!("ConstSpec {} (iota {})", self.names(c.names), c.iota))?;
                self.opt_type(level + 1, c.typ)?;
                self.exprs(level + 1, c.values)
            }
            Decl::Var(v) => {
                self.doc(level, v.doc)?;
                self.line(level, format_args!("VarSpec {}", self.names(v.names)))?;
                self.opt_type(level + 1, v.typ)?;
                self.exprs(level + 1, v.values)
            }
            Decl::Type(t) => {
                self.doc(level, t.doc)?;
                let alias = if t.assign_pos.is_some() { " =" } else { "" };
                self.line(level, format_args!("TypeSpec {}{alias}", ast.ident_str(t.name)))?;
                self.typ(level + 1, t.typ)
            }
            Decl::Func(f) => {
                self.doc(level, f.doc)?;
                self.line(level, format_args!("FunctionDecl {}", ast.ident_str(f.name)))?;
                self.signature(level + 1, &f.sig)?;
                match f.body {
                    Some(body) => self.block(level + 1, &body),
                    None => Ok(()),
                }
            }
            Decl::Method(m) => {
                self.doc(level, m.doc)?;
                self.line(level, format_args!("MethodDecl {}", ast.ident_str(m.name)))?;
                self.line(level + 1, format_args!("Receiver"))?;
                self.params(level + 2, &m.recv)?;
                self.signature(level + 1, &m.sig)?;
                match m.body {
                    Some(body) => self.block(level + 1, &body),
                    None => Ok(()),
                }
            }
        }
    }

    fn typ(&mut self, level: usize, id: TypeId) -> fmt::Result {
        let ast = self.ast;
        match ast.types[id] {
            Type::Name { pkg: Some(pkg), name } => self.line(
                level,
                format_args!("TypeName {}.{}", ast.ident_str(pkg), ast.ident_str(name)),
            ),
            Type::Name { pkg: None, name } => self.line(level, format_args!("TypeName {}", ast.ident_str(name))),
            Type::Array { len, elem } => {
                self.line(level, format_args!("ArrayType"))?;
                match len {
                    ArrayLen::Expr(e) => self.expr(level + 1, e)?,
                    ArrayLen::Ellipsis(_) => self.line(level + 1, format_args!("..."))?,
                }
                self.typ(level + 1, elem)
            }
            Type::Slice { elem } => {
                self.line(level, format_args!("SliceType"))?;
                self.typ(level + 1, elem)
            }
            Type::Pointer { elem } => {
                self.line(level, format_args!("PointerType"))?;
                self.typ(level + 1, elem)
            }
            Type::Map { key, value } => {
                self.line(level, format_args!("MapType"))?;
                self.typ(level + 1, key)?;
                self.typ(level + 1, value)
            }
            Type::Chan { dir, elem } => {
                let kw = match (dir.send, dir.recv) {
                    (true, false) => "chan<-",
                    (false, true) => "<-chan",
                    _ => "chan",
                };
                self.line(level, format_args!("ChanType {kw}"))?;
                self.typ(level + 1, elem)
            }
            Type::Func { sig } => {
                self.line(level, format_args!("FuncType"))?;
                self.signature(level + 1, &sig)
            }
            Type::Struct { fields } => {
                self.line(level, format_args!("StructType"))?;
                for &field in ast.fields_list(fields) {
                    let f = ast.fields[field];
                    if f.is_embedded() {
                        self.line(level + 1, format_args!("Field (embedded)"))?;
                    } else {
                        self.line(level + 1, format_args!("Field {}", self.names(f.names)))?;
                    }
                    self.typ(level + 2, f.typ)?;
                    if let Some(tag) = f.tag {
                        self.line(level + 2, format_args!("Tag {}", ast.lits[tag]))?;
                    }
                }
                Ok(())
            }
            Type::Interface { elems } => {
                self.line(level, format_args!("InterfaceType"))?;
                for elem in ast.interface_elems_list(elems) {
                    match *elem {
                        InterfaceElem::Method { name, sig } => {
                            self.line(level + 1, format_args!("Method {}", ast.ident_str(name)))?;
                            self.signature(level + 2, &sig)?;
                        }
                        InterfaceElem::Embedded(t) => {
                            self.line(level + 1, format_args!("Embedded"))?;
                            self.typ(level + 2, t)?;
                        }
                    }
                }
                Ok(())
            }
        }
    }

    fn opt_type(&mut self, level: usize, typ: Option<TypeId>) -> fmt::Result {
        match typ {
            Some(t) => self.typ(level, t),
            None => Ok(()),
        }
    }

    fn signature(&mut self, level: usize, sig: &Signature) -> fmt::Result {
        self.line(level, format_args!("Parameters"))?;
        self.params(level + 1, &sig.params)?;
        match sig.result {
            Some(FuncResult::Type(t)) => {
                self.line(level, format_args!("Result"))?;
                self.typ(level + 1, t)
            }
            Some(FuncResult::Params(list)) => {
                self.line(level, format_args!("Results"))?;
                self.params(level + 1, &list)
            }
            None => Ok(()),
        }
    }

    fn params(&mut self, level: usize, list: &ParamList) -> fmt::Result {
        let ast = self.ast;
        for &param in ast.params_list(list.params) {
            let p = ast.params[param];
            let dots = if p.ellipsis.is_some() { " ..." } else { "" };
            if p.names.is_empty() {
                self.line(level, format_args!("Param{dots}"))?;
            } else {
                self.line(level, format_args!("Param {}{dots}", self.names(p.names)))?;
            }
            self.typ(level + 1, p.typ)?;
        }
        Ok(())
    }

    fn exprs(&mut self, level: usize, list: ListRef<ExprId>) -> fmt::Result {
        let ast = self.ast;
        for &e in ast.exprs_list(list) {
            self.expr(level, e)?;
        }
        Ok(())
    }

    fn opt_expr(&mut self, level: usize, label: &str, e: Option<ExprId>) -> fmt::Result {
        match e {
            Some(e) => {
                self.line(level, format_args!("{label}:"))?;
                self.expr(level + 1, e)
            }
            None => self.line(level, format_args!("{label}: nil")),
        }
    }

    fn expr(&mut self, level: usize, id: ExprId) -> fmt::Result {
        let ast = self.ast;
        match ast.exprs[id] {
            Expr::Ident(name) => self.line(level, format_args!("Ident {}", ast.ident_str(name))),
            Expr::Literal(lit) => {
                let kind = match ast.lits[lit] {
                    Literal::Integer(_) => "Integer",
                    Literal::Float(_) => "Float",
                    Literal::Imaginary(_) => "Imaginary",
                    Literal::Rune(_) => "Rune",
                    Literal::String(_) => "String",
                };
                self.line(level, format_args!("{kind} {}", ast.lits[lit]))
            }
            Expr::Composite { typ, elems, .. } => {
                self.line(level, format_args!("CompositeLit"))?;
                self.opt_type(level + 1, typ)?;
                for el in ast.elements_list(elems) {
                    self.line(level + 1, format_args!("Element"))?;
                    if let Some(key) = el.key {
                        self.opt_expr(level + 2, "Key", Some(key))?;
                        self.opt_expr(level + 2, "Value", Some(el.value))?;
                    } else {
                        self.expr(level + 2, el.value)?;
                    }
                }
                Ok(())
            }
            Expr::Index { expr, index, .. } => {
                self.line(level, format_args!("Index"))?;
                self.expr(level + 1, expr)?;
                self.expr(level + 1, index)
            }
            Expr::Slice {
                expr, low, high, max, ..
            } => {
                self.line(level, format_args!("Slice"))?;
                self.expr(level + 1, expr)?;
                self.opt_expr(level + 1, "Low", low)?;
                self.opt_expr(level + 1, "High", high)?;
                self.opt_expr(level + 1, "Max", max)
            }
            Expr::TypeAssert { expr, typ, .. } => {
                self.line(level, format_args!("TypeAssert"))?;
                self.expr(level + 1, expr)?;
                match typ {
                    Some(t) => self.typ(level + 1, t),
                    None => self.line(level + 1, format_args!("type")),
                }
            }
            Expr::Selector { expr, sel } => {
                self.line(level, format_args!("Selector .{}", ast.ident_str(sel)))?;
                self.expr(level + 1, expr)
            }
            Expr::Call {
                func, args, ellipsis, ..
            } => {
                let dots = if ellipsis.is_some() { " ..." } else { "" };
                self.line(level, format_args!("Call{dots}"))?;
                self.expr(level + 1, func)?;
                self.exprs(level + 1, args)
            }
            Expr::Binary { op, left, right, .. } => {
                self.line(level, format_args!("Binary {}", op.as_str()))?;
                self.expr(level + 1, left)?;
                self.expr(level + 1, right)
            }
            Expr::Unary { op, operand, .. } => {
                self.line(level, format_args!("Unary {}", op.as_str()))?;
                self.expr(level + 1, operand)
            }
            Expr::TypeExpr(t) => self.typ(level, t),
        }
    }

    fn block(&mut self, level: usize, block: &Block) -> fmt::Result {
        let ast = self.ast;
        self.line(level, format_args!("Block"))?;
        for &s in ast.stmts_list(block.stmts) {
            self.stmt(level + 1, s)?;
        }
        Ok(())
    }

    fn opt_stmt(&mut self, level: usize, label: &str, s: Option<StmtId>) -> fmt::Result {
        match s {
            Some(s) => {
                self.line(level, format_args!("{label}:"))?;
                self.stmt(level + 1, s)
            }
            None => self.line(level, format_args!("{label}: nil")),
        }
    }

    fn stmt(&mut self, level: usize, id: StmtId) -> fmt::Result {
        let ast = self.ast;
        match ast.stmts[id] {
            Stmt::Empty => self.line(level, format_args!("Empty")),
            Stmt::Decl(decls) => {
                self.line(level, format_args!("DeclStmt"))?;
                for &d in ast.decls_list(decls) {
                    self.decl(level + 1, d)?;
                }
                Ok(())
            }
            Stmt::Expr(e) => {
                self.line(level, format_args!("ExprStmt"))?;
                self.expr(level + 1, e)
            }
            Stmt::Assign { lhs, op, rhs, .. } => {
                self.line(level, format_args!("Assign {}", op.as_str()))?;
                self.exprs(level + 1, lhs)?;
                self.exprs(level + 1, rhs)
            }
            Stmt::ShortVarDecl { names, values, .. } => {
                self.line(level, format_args!("ShortVarDecl {}", self.names(names)))?;
                self.exprs(level + 1, values)
            }
            Stmt::Range { lhs, define, expr } => {
                let op = match (lhs.is_empty(), define) {
                    (true, _) => "",
                    (false, true) => " :=",
                    (false, false) => " =",
                };
                self.line(level, format_args!("Range{op}"))?;
                self.exprs(level + 1, lhs)?;
                self.expr(level + 1, expr)
            }
            Stmt::Send { chan, value } => {
                self.line(level, format_args!("Send"))?;
                self.expr(level + 1, chan)?;
                self.expr(level + 1, value)
            }
            Stmt::IncDec { expr, op } => {
                let op = match op {
                    IncDecOp::Inc => "++",
                    IncDecOp::Dec => "--",
                };
                self.line(level, format_args!("IncDec {op}"))?;
                self.expr(level + 1, expr)
            }
            Stmt::Labeled { label, stmt } => {
                self.line(level, format_args!("Labeled {}", ast.ident_str(label)))?;
                self.stmt(level + 1, stmt)
            }
            Stmt::Block(block) => self.block(level, &block),
            Stmt::If {
                init,
                cond,
                then,
                els,
            } => {
                self.line(level, format_args!("If"))?;
                self.opt_stmt(level + 1, "Init", init)?;
                self.opt_expr(level + 1, "Cond", Some(cond))?;
                self.block(level + 1, &then)?;
                self.opt_stmt(level + 1, "Else", els)
            }
            Stmt::For { kind, body } => {
                match kind {
                    ForKind::Infinite => self.line(level, format_args!("For"))?,
                    ForKind::Cond(cond) => {
                        self.line(level, format_args!("For"))?;
                        self.opt_expr(level + 1, "Cond", Some(cond))?;
                    }
                    ForKind::Clause { init, cond, post } => {
                        self.line(level, format_args!("For"))?;
                        self.opt_stmt(level + 1, "Init", init)?;
                        self.opt_expr(level + 1, "Cond", cond)?;
                        self.opt_stmt(level + 1, "Post", post)?;
                    }
                    ForKind::Range(range) => {
                        self.line(level, format_args!("For"))?;
                        self.stmt(level + 1, range)?;
                    }
                }
                self.block(level + 1, &body)
            }
            Stmt::Go { call } => {
                self.line(level, format_args!("Go"))?;
                self.expr(level + 1, call)
            }
            Stmt::Defer { call } => {
                self.line(level, format_args!("Defer"))?;
                self.expr(level + 1, call)
            }
            Stmt::Return { results } => {
                self.line(level, format_args!("Return"))?;
                self.exprs(level + 1, results)
            }
            Stmt::Break { label } => self.jump(level, "Break", label),
            Stmt::Continue { label } => self.jump(level, "Continue", label),
            Stmt::Goto { label } => self.jump(level, "Goto", Some(label)),
            Stmt::Fallthrough => self.line(level, format_args!("Fallthrough")),
        }
    }

    fn jump(&mut self, level: usize, kind: &str, label: Option<Ident>) -> fmt::Result {
        let ast = self.ast;
        match label {
            Some(l) => self.line(level, format_args!("{kind} {}", ast.ident_str(l))),
            None => self.line(level, format_args!("{kind}")),
        }
    }
}

macro_rules! impl_print {
    ($($t:ty => $method:ident),* $(,)?) => {
        $(
            impl Print for $t {
                fn print_at<W: Write>(&self, p: &mut TreePrinter<'_, W>, level: usize) -> fmt::Result {
                    p.$method(level, self)
                }
            }
        )*
    };
}

impl_print! {
    File => file,
    Block => block,
    Signature => signature,
}

macro_rules! impl_print_for_ids {
    ($($t:ty => $method:ident),* $(,)?) => {
        $(
            impl Print for $t {
                fn print_at<W: Write>(&self, p: &mut TreePrinter<'_, W>, level: usize) -> fmt::Result {
                    p.$method(level, *self)
                }
            }
        )*
    };
}

impl_print_for_ids! {
    DeclId => decl,
    StmtId => stmt,
    ExprId => expr,
    TypeId => typ,
}

impl<T: Print> Print for [T] {
    fn print_at<W: Write>(&self, p: &mut TreePrinter<'_, W>, level: usize) -> fmt::Result {
        for node in self {
            node.print_at(p, level)?;
        }
        Ok(())
    }
}
