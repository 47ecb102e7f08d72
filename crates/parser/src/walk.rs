//! Generic traversal over the arena AST.
//!
//! `Walk` is implemented for every node type (mostly through
//! `#[derive(WalkAst)]`); a `Visitor` overrides the `visit_*` hooks it cares
//! about and calls `walk` to keep descending.

use crate::ast::*;

pub trait Walk<'ast> {
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V);
}

pub trait Visitor<'ast> {
    #[inline(always)]
    fn visit_file(&mut self, a: &'ast AstArena, f: &'ast File) {
        f.walk(a, self);
    }

    #[inline(always)]
    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        a.decls[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        a.stmts[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        a.exprs[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        a.types[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        a.fields[id].walk(a, self);
    }

    #[inline(always)]
    fn visit_param(&mut self, a: &'ast AstArena, id: ParamId) {
        a.params[id].walk(a, self);
    }

    /// Literals are leaves.
    #[inline(always)]
    fn visit_lit(&mut self, _a: &'ast AstArena, _id: LitId) {}
}

macro_rules! impl_walk_for_ids {
    ($($id:ty => $visit:ident),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $id {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
                    v.$visit(a, *self);
                }
            }
        )*
    };
}

impl_walk_for_ids! {
    DeclId => visit_decl,
    StmtId => visit_stmt,
    ExprId => visit_expr,
    TypeId => visit_type,
    FieldId => visit_field,
    ParamId => visit_param,
    LitId => visit_lit,
}

pub trait ListSlice<T> {
    fn slice(&self, r: ListRef<T>) -> &[T];
}

impl<'ast, T> Walk<'ast> for ListRef<T>
where
    AstArena: ListSlice<T>,
    T: Walk<'ast>,
{
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        for item in a.slice(*self) {
            item.walk(a, v);
        }
    }
}

macro_rules! impl_list_slice {
    ($($t:ty => $getter:ident),* $(,)?) => {
        $(
            impl ListSlice<$t> for AstArena {
                #[inline(always)]
                fn slice(&self, r: ListRef<$t>) -> &[$t] {
                    self.$getter(r)
                }
            }
        )*
    };
}

impl_list_slice! {
    Ident => idents_list,
    ExprId => exprs_list,
    StmtId => stmts_list,
    DeclId => decls_list,
    FieldId => fields_list,
    ParamId => params_list,
    Element => elements_list,
    InterfaceElem => interface_elems_list,
    ImportSpec => import_specs_list,
}

impl<'ast, T: Walk<'ast>> Walk<'ast> for Option<T> {
    #[inline(always)]
    fn walk<V: Visitor<'ast> + ?Sized>(&self, a: &'ast AstArena, v: &mut V) {
        if let Some(x) = self {
            x.walk(a, v);
        }
    }
}

macro_rules! impl_walk_noop {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<'ast> Walk<'ast> for $ty {
                #[inline(always)]
                fn walk<V: Visitor<'ast> + ?Sized>(&self, _: &'ast AstArena, _: &mut V) {}
            }
        )*
    };
}

impl_walk_noop! {
    Span,
    Symbol,
    bool,
    ChanDir,
    UnaryOp,
    BinaryOp,
    AssignOp,
    IncDecOp,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{Entry, ParserConfig, Root, parse};

    #[derive(Default)]
    struct Counter {
        exprs: usize,
        types: usize,
        stmts: usize,
        decls: usize,
        lits: usize,
    }

    impl<'ast> Visitor<'ast> for Counter {
        fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
            self.exprs += 1;
            a.exprs[id].walk(a, self);
        }

        fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
            self.types += 1;
            a.types[id].walk(a, self);
        }

        fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
            self.stmts += 1;
            a.stmts[id].walk(a, self);
        }

        fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
            self.decls += 1;
            a.decls[id].walk(a, self);
        }

        fn visit_lit(&mut self, _: &'ast AstArena, _: LitId) {
            self.lits += 1;
        }
    }

    #[test]
    fn counts_reachable_nodes() {
        let mut ast = AstArena::new();
        let src = "package p\nimport \"fmt\"\nvar x []int = nil\nfunc f(a int) int { return a + 1 }\n";
        let Root::File(file) = parse(src, Entry::File, &mut ast, &ParserConfig::default()).unwrap() else {
            panic!("expected a file");
        };
        let mut c = Counter::default();
        c.visit_file(&ast, &file);
        assert_eq!(c.decls, 3);
        // []int, int (elem), int (param), int (result)
        assert_eq!(c.types, 4);
        // nil, a + 1, a, and the literal operand
        assert_eq!(c.exprs, 4);
        assert_eq!(c.lits, 1);
        assert_eq!(c.stmts, 1);
    }
}
