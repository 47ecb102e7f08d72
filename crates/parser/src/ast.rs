//! # Go syntax tree
//!
//! Arena-allocated abstract syntax tree for the subset of Go this front end
//! understands: package clauses, imports, constant/variable/type/function/method
//! declarations, the statement forms accepted inside function bodies, and the
//! full expression and type grammar short of function literals.
//!
//! ## Architecture
//!
//! - **Nodes**: every node kind lives in a typed arena (`SpannedArena<T>`) and is
//!   referenced by a typed `Id<T>`.
//! - **Lists**: children lists are `ListRef<T>` slices into the shared
//!   [`ExtraData`] buffers, so nodes stay `Copy` and allocation-free.
//! - **Spans**: every arena node carries a [`Span`] of line:column
//!   [`Location`]s, kept in a side vector parallel to the node data.
//! - **Symbols**: identifiers are interned once per arena.
//!
//! Several files (a whole package) may share one arena; ids from different files
//! never collide.
//!
//! Walk/Visitor infrastructure lives in [`crate::walk`]; `#[derive(WalkAst)]`
//! generates the `Walk` impls for the node types below.

use ast_derive::WalkAst;
use core::fmt;
use core::marker::PhantomData;
use core::ops::{Index, IndexMut};
use num_bigint::BigInt;
use num_rational::BigRational;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::hash::{BuildHasher, BuildHasherDefault, Hasher, RandomState};

// =============================================================================
// Locations and spans
// =============================================================================

/// A 1-based line and column (in bytes) within a source file.
///
/// The zero value marks predeclared entities that have no source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    #[inline]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Half-open source range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Location,
    pub end: Location,
}

impl Span {
    #[inline]
    pub const fn new(start: Location, end: Location) -> Self {
        Self { start, end }
    }

    /// Zero-width span at `loc`.
    #[inline]
    pub const fn point(loc: Location) -> Self {
        Self {
            start: loc,
            end: loc,
        }
    }

    /// Span from the start of `self` to the end of `other`.
    #[inline]
    pub const fn to(self, other: Span) -> Self {
        Self {
            start: self.start,
            end: other.end,
        }
    }

    /// True when `other` lies within `self`.
    #[inline]
    pub fn contains(&self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

// =============================================================================
// Ids and list references
// =============================================================================

/// Type-safe identifier for arena-allocated nodes.
#[derive(Debug)]
#[repr(transparent)]
pub struct Id<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for Id<T> {}

impl<T> Clone for Id<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for Id<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for Id<T> {}

impl<T> core::hash::Hash for Id<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        core::hash::Hash::hash(&self.raw, state);
    }
}

impl<T> PartialOrd for Id<T> {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Id<T> {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Id<T> {
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn to_usize(&self) -> usize {
        self.raw as usize
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }
}

/// Typed reference into one of the [`ExtraData`] buffers.
#[derive(Debug, PartialEq, Eq)]
pub struct ListRef<T> {
    start: u32,
    len: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Copy for ListRef<T> {}

impl<T> Clone for ListRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Default for ListRef<T> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<T> ListRef<T> {
    pub const EMPTY: Self = Self {
        start: 0,
        len: 0,
        _marker: PhantomData,
    };

    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        Self {
            start,
            len,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub const fn start(&self) -> u32 {
        self.start
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub const fn end(&self) -> u32 {
        self.start + self.len
    }
}

// =============================================================================
// Symbol interning
// =============================================================================

/// Interned identifier text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

impl Symbol {
    #[inline]
    pub const fn from_raw(v: u32) -> Self {
        Self(v)
    }

    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

/// Identifier occurrence: interned name plus its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, WalkAst)]
pub struct Ident {
    pub sym: Symbol,
    pub span: Span,
}

/// Identity hasher for the pre-hashed `u64` bucket keys.
#[derive(Default)]
struct U64IdentityHasher(u64);

impl Hasher for U64IdentityHasher {
    fn write(&mut self, _b: &[u8]) {
        unreachable!("U64IdentityHasher only supports write_u64")
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.0
    }
}

type U64IdentityBuild = BuildHasherDefault<U64IdentityHasher>;

/// String interner backing every [`Symbol`] of an arena.
#[derive(Debug, Default)]
pub struct Interner {
    strings: Vec<Box<str>>,
    buckets: HashMap<u64, SmallVec<[Symbol; 1]>, U64IdentityBuild>,
    state: RandomState,
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        let h = self.state.hash_one(s);
        let entry = self.buckets.entry(h).or_default();
        for &sym in entry.iter() {
            if self.strings[sym.0 as usize].as_ref() == s {
                return sym;
            }
        }
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(s.into());
        entry.push(sym);
        sym
    }

    /// Looks a string up without interning it.
    pub fn get(&self, s: &str) -> Option<Symbol> {
        let h = self.state.hash_one(s);
        self.buckets
            .get(&h)?
            .iter()
            .copied()
            .find(|sym| self.strings[sym.0 as usize].as_ref() == s)
    }

    /// Returns the text of `sym`, or `""` for a symbol from another interner.
    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.strings.get(sym.0 as usize).map_or("", |s| s.as_ref())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// =============================================================================
// Arena allocation
// =============================================================================

/// Nodes of one kind stored alongside their spans.
#[derive(Debug)]
pub struct SpannedArena<T> {
    data: Vec<T>,
    spans: Vec<Span>,
}

impl<T> Default for SpannedArena<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            spans: Vec::new(),
        }
    }
}

impl<T> SpannedArena<T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self, node: T, span: Span) -> Id<T> {
        let id = Id::from_raw(self.data.len() as u32);
        self.data.push(node);
        self.spans.push(span);
        id
    }

    #[inline]
    pub fn get(&self, id: Id<T>) -> &T {
        &self.data[id.to_usize()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: Id<T>) -> &mut T {
        &mut self.data[id.to_usize()]
    }

    #[inline]
    pub fn span(&self, id: Id<T>) -> Span {
        self.spans[id.to_usize()]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates over every id allocated so far.
    pub fn ids(&self) -> impl Iterator<Item = Id<T>> + use<T> {
        (0..self.data.len() as u32).map(Id::from_raw)
    }
}

impl<T> Index<Id<T>> for SpannedArena<T> {
    type Output = T;
    fn index(&self, id: Id<T>) -> &T {
        self.get(id)
    }
}

impl<T> IndexMut<Id<T>> for SpannedArena<T> {
    fn index_mut(&mut self, id: Id<T>) -> &mut T {
        self.get_mut(id)
    }
}

pub type DeclId = Id<Decl>;
pub type StmtId = Id<Stmt>;
pub type ExprId = Id<Expr>;
pub type TypeId = Id<Type>;
pub type FieldId = Id<FieldDecl>;
pub type ParamId = Id<ParamDecl>;
pub type LitId = Id<Literal>;

// =============================================================================
// Centralized list storage
// =============================================================================

/// Buffers that every `ListRef<T>` points into.
#[derive(Debug, Default)]
pub struct ExtraData {
    pub idents: Vec<Ident>,
    pub exprs: Vec<ExprId>,
    pub stmts: Vec<StmtId>,
    pub decls: Vec<DeclId>,
    pub fields: Vec<FieldId>,
    pub params: Vec<ParamId>,
    pub elements: Vec<Element>,
    pub interface_elems: Vec<InterfaceElem>,
    pub import_specs: Vec<ImportSpec>,
    pub doc_lines: Vec<Box<str>>,
}

/// Owner of all nodes, lists and symbols produced by the parser.
#[derive(Debug, Default)]
pub struct AstArena {
    pub decls: SpannedArena<Decl>,
    pub stmts: SpannedArena<Stmt>,
    pub exprs: SpannedArena<Expr>,
    pub types: SpannedArena<Type>,
    pub fields: SpannedArena<FieldDecl>,
    pub params: SpannedArena<ParamDecl>,
    pub lits: SpannedArena<Literal>,
    pub symbols: Interner,
    pub extras: ExtraData,
}

macro_rules! list_accessors {
    ($($t:ty => $buf:ident, $build:ident, $get:ident;)*) => {
        impl AstArena {
            $(
                pub fn $build(&mut self, items: impl IntoIterator<Item = $t>) -> ListRef<$t> {
                    Self::push_list(&mut self.extras.$buf, items)
                }

                #[inline]
                pub fn $get(&self, r: ListRef<$t>) -> &[$t] {
                    Self::slice(&self.extras.$buf, r)
                }
            )*
        }
    };
}

list_accessors! {
    Ident => idents, list_idents, idents_list;
    ExprId => exprs, list_exprs, exprs_list;
    StmtId => stmts, list_stmts, stmts_list;
    DeclId => decls, list_decls, decls_list;
    FieldId => fields, list_fields, fields_list;
    ParamId => params, list_params, params_list;
    Element => elements, list_elements, elements_list;
    InterfaceElem => interface_elems, list_interface_elems, interface_elems_list;
    ImportSpec => import_specs, list_import_specs, import_specs_list;
    Box<str> => doc_lines, list_doc_lines, doc_lines_list;
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn push_list<T>(buf: &mut Vec<T>, items: impl IntoIterator<Item = T>) -> ListRef<T> {
        let start = buf.len();
        buf.extend(items);
        let len = buf.len() - start;
        debug_assert!(start <= u32::MAX as usize);
        debug_assert!(len <= u32::MAX as usize);
        ListRef::new(start as u32, len as u32)
    }

    #[inline]
    fn slice<T>(buf: &[T], r: ListRef<T>) -> &[T] {
        &buf[r.start() as usize..r.end() as usize]
    }

    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        self.symbols.intern(s)
    }

    /// Text of an interned symbol.
    #[inline]
    pub fn name(&self, sym: Symbol) -> &str {
        self.symbols.resolve(sym)
    }

    /// Text of an identifier occurrence.
    #[inline]
    pub fn ident_str(&self, id: Ident) -> &str {
        self.symbols.resolve(id.sym)
    }
}

// =============================================================================
// Source file
// =============================================================================

/// A parsed source file.
///
/// ```text
/// SourceFile = PackageClause ";" { ImportDecl ";" } { TopLevelDecl ";" }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct File {
    pub package_pos: Span,
    pub name: Ident,
    /// `Decl::Import` declarations in source order.
    pub imports: ListRef<DeclId>,
    /// Remaining top-level declarations in source order.
    pub decls: ListRef<DeclId>,
    pub span: Span,
}

// =============================================================================
// Declarations
// =============================================================================

/// Declaration node.
///
/// Grouped forms such as `const ( ... )` produce one node per spec, each with
/// its own span and doc comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Decl {
    Import(ImportDecl),
    Const(ConstSpec),
    Var(VarSpec),
    Type(TypeSpec),
    Func(FunctionDecl),
    Method(MethodDecl),
}

impl Decl {
    /// Identifiers bound by this declaration, in source order.
    pub fn names(&self, ast: &AstArena) -> SmallVec<[Ident; 1]> {
        match self {
            Decl::Import(_) => SmallVec::new(),
            Decl::Const(c) => ast.idents_list(c.names).iter().copied().collect(),
            Decl::Var(v) => ast.idents_list(v.names).iter().copied().collect(),
            Decl::Type(t) => smallvec::smallvec![t.name],
            Decl::Func(f) => smallvec::smallvec![f.name],
            Decl::Method(m) => smallvec::smallvec![m.name],
        }
    }
}

/// `import "path"` or `import ( ... )`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ImportDecl {
    #[walk(skip)]
    pub doc: ListRef<Box<str>>,
    pub import_pos: Span,
    pub specs: ListRef<ImportSpec>,
}

/// `ImportSpec = [ "." | PackageName ] ImportPath`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ImportSpec {
    pub name: Option<ImportName>,
    /// Decoded import path.
    pub path: Symbol,
    pub path_span: Span,
}

impl ImportSpec {
    pub fn span(&self) -> Span {
        match self.name {
            Some(ImportName::Dot(dot)) => dot.to(self.path_span),
            Some(ImportName::Name(id)) => id.span.to(self.path_span),
            None => self.path_span,
        }
    }

    /// Name the import binds in its file: the explicit name, or the last
    /// element of the path. `None` for dot imports.
    pub fn binding_name<'a>(&self, symbols: &'a Interner) -> Option<&'a str> {
        match self.name {
            Some(ImportName::Dot(_)) => None,
            Some(ImportName::Name(id)) => Some(symbols.resolve(id.sym)),
            None => {
                let path = symbols.resolve(self.path);
                Some(path.rsplit('/').next().unwrap_or(path))
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ImportName {
    /// `import . "pkg"`
    Dot(Span),
    /// `import name "pkg"`, including the blank name `_`.
    Name(Ident),
}

/// `ConstSpec = IdentifierList [ [ Type ] "=" ExpressionList ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ConstSpec {
    #[walk(skip)]
    pub doc: ListRef<Box<str>>,
    pub names: ListRef<Ident>,
    pub typ: Option<TypeId>,
    /// Empty when the spec repeats the previous spec of its group.
    pub values: ListRef<ExprId>,
    /// Position within the enclosing group, the value of `iota`.
    #[walk(skip)]
    pub iota: u32,
}

/// `VarSpec = IdentifierList ( Type [ "=" ExpressionList ] | "=" ExpressionList )`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct VarSpec {
    #[walk(skip)]
    pub doc: ListRef<Box<str>>,
    pub names: ListRef<Ident>,
    pub typ: Option<TypeId>,
    pub values: ListRef<ExprId>,
}

/// `TypeSpec = identifier [ "=" ] Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct TypeSpec {
    #[walk(skip)]
    pub doc: ListRef<Box<str>>,
    pub name: Ident,
    /// Position of `=` for an alias declaration.
    pub assign_pos: Option<Span>,
    pub typ: TypeId,
}

/// `FunctionDecl = "func" FunctionName Signature [ FunctionBody ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FunctionDecl {
    #[walk(skip)]
    pub doc: ListRef<Box<str>>,
    pub func_pos: Span,
    pub name: Ident,
    pub sig: Signature,
    /// `None` for a declaration without body.
    pub body: Option<Block>,
}

/// `MethodDecl = "func" Receiver MethodName Signature [ FunctionBody ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct MethodDecl {
    #[walk(skip)]
    pub doc: ListRef<Box<str>>,
    pub func_pos: Span,
    /// Receiver parameter list, holding exactly one declaration.
    pub recv: ParamList,
    pub name: Ident,
    pub sig: Signature,
    pub body: Option<Block>,
}

// =============================================================================
// Signatures, parameters and fields
// =============================================================================

/// `Signature = Parameters [ Result ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Signature {
    pub params: ParamList,
    pub result: Option<FuncResult>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum FuncResult {
    /// Parenthesized, possibly named, result list.
    Params(ParamList),
    /// Single unparenthesized result type.
    Type(TypeId),
}

/// `Parameters = "(" [ ParameterList [ "," ] ] ")"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ParamList {
    pub params: ListRef<ParamId>,
    pub span: Span,
}

/// `ParameterDecl = [ IdentifierList ] [ "..." ] Type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct ParamDecl {
    /// Empty for an unnamed parameter.
    pub names: ListRef<Ident>,
    /// Position of `...` for the final variadic parameter.
    pub ellipsis: Option<Span>,
    pub typ: TypeId,
}

/// `FieldDecl = (IdentifierList Type | EmbeddedField) [ Tag ]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct FieldDecl {
    /// Empty for an embedded field.
    pub names: ListRef<Ident>,
    pub typ: TypeId,
    /// Decoded tag, always a [`Literal::String`].
    pub tag: Option<LitId>,
}

impl FieldDecl {
    #[inline]
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum InterfaceElem {
    Method { name: Ident, sig: Signature },
    Embedded(TypeId),
}

// =============================================================================
// Types
// =============================================================================

/// Type node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Type {
    /// `T` or `pkg.T`
    Name { pkg: Option<Ident>, name: Ident },

    /// `[N]T` or `[...]T`
    Array { len: ArrayLen, elem: TypeId },

    /// `[]T`
    Slice { elem: TypeId },

    /// `*T`
    Pointer { elem: TypeId },

    /// `map[K]V`
    Map { key: TypeId, value: TypeId },

    /// `chan T`, `chan<- T` or `<-chan T`
    Chan { dir: ChanDir, elem: TypeId },

    /// `func(...) ...`
    Func { sig: Signature },

    Struct { fields: ListRef<FieldId> },

    Interface { elems: ListRef<InterfaceElem> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ArrayLen {
    Expr(ExprId),
    /// `[...]T`, length taken from a composite literal.
    Ellipsis(Span),
}

/// Channel direction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChanDir {
    pub send: bool,
    pub recv: bool,
}

impl ChanDir {
    pub const BOTH: Self = Self {
        send: true,
        recv: true,
    };
    pub const SEND: Self = Self {
        send: true,
        recv: false,
    };
    pub const RECV: Self = Self {
        send: false,
        recv: true,
    };
}

// =============================================================================
// Expressions
// =============================================================================

/// Expression node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Expr {
    Ident(Ident),

    /// Integer, float, imaginary, rune or string literal.
    Literal(LitId),

    /// `T{...}`; the type is absent for elided inner literals.
    Composite {
        typ: Option<TypeId>,
        elems: ListRef<Element>,
        l_brace: Span,
        r_brace: Span,
    },

    /// `x[i]`
    Index {
        expr: ExprId,
        l_brack: Span,
        index: ExprId,
        r_brack: Span,
    },

    /// `x[lo:hi]` or `x[lo:hi:max]`
    Slice {
        expr: ExprId,
        l_brack: Span,
        low: Option<ExprId>,
        high: Option<ExprId>,
        max: Option<ExprId>,
        r_brack: Span,
    },

    /// `x.(T)`; `typ` is `None` for the type switch guard `x.(type)`.
    TypeAssert {
        expr: ExprId,
        typ: Option<TypeId>,
        r_paren: Span,
    },

    /// `x.sel`
    Selector { expr: ExprId, sel: Ident },

    /// `f(args)` or `f(args...)`
    Call {
        func: ExprId,
        l_paren: Span,
        args: ListRef<ExprId>,
        ellipsis: Option<Span>,
        r_paren: Span,
    },

    Binary {
        op: BinaryOp,
        op_pos: Span,
        left: ExprId,
        right: ExprId,
    },

    Unary {
        op: UnaryOp,
        op_pos: Span,
        operand: ExprId,
    },

    /// Type in operand position, e.g. `[]byte` in `[]byte(s)`.
    TypeExpr(TypeId),
}

/// Composite literal element: `[ Key ":" ] Element`.
///
/// Nested `{...}` values are elided composite literals without a type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Element {
    pub key: Option<ExprId>,
    pub value: ExprId,
}

/// Decoded literal value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    Integer(BigInt),
    Float(BigRational),
    /// Imaginary part of an imaginary literal.
    Imaginary(BigRational),
    Rune(char),
    /// Interpreted bytes; not necessarily valid UTF-8.
    String(Box<[u8]>),
}

// =============================================================================
// Statements
// =============================================================================

/// `Block = "{" StatementList "}"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub struct Block {
    pub stmts: ListRef<StmtId>,
    pub span: Span,
}

/// Statement node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum Stmt {
    Empty,

    /// `const`, `var` or `type` declaration inside a function body.
    Decl(ListRef<DeclId>),

    Expr(ExprId),

    /// `x = y` or `x op= y`
    Assign {
        lhs: ListRef<ExprId>,
        op: AssignOp,
        op_pos: Span,
        rhs: ListRef<ExprId>,
    },

    /// `x, y := a, b`
    ShortVarDecl {
        names: ListRef<Ident>,
        op_pos: Span,
        values: ListRef<ExprId>,
    },

    /// Range header of a for loop: `k, v := range x`, `k = range x` or `range x`.
    Range {
        lhs: ListRef<ExprId>,
        define: bool,
        expr: ExprId,
    },

    /// `ch <- v`
    Send { chan: ExprId, value: ExprId },

    /// `x++` or `x--`
    IncDec { expr: ExprId, op: IncDecOp },

    Labeled { label: Ident, stmt: StmtId },

    Block(Block),

    If {
        init: Option<StmtId>,
        cond: ExprId,
        then: Block,
        /// Either another `If` or a `Block`.
        els: Option<StmtId>,
    },

    For { kind: ForKind, body: Block },

    Go { call: ExprId },

    Defer { call: ExprId },

    Return { results: ListRef<ExprId> },

    Break { label: Option<Ident> },

    Continue { label: Option<Ident> },

    Goto { label: Ident },

    Fallthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, WalkAst)]
pub enum ForKind {
    /// `for { ... }`
    Infinite,
    /// `for cond { ... }`
    Cond(ExprId),
    /// `for init; cond; post { ... }`
    Clause {
        init: Option<StmtId>,
        cond: Option<ExprId>,
        post: Option<StmtId>,
    },
    /// `for k, v := range x { ... }`; the statement is a [`Stmt::Range`].
    Range(StmtId),
}

// =============================================================================
// Operators
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Add,   // +
    Sub,   // -
    Not,   // !
    Xor,   // ^
    Deref, // *
    Addr,  // &
    Recv,  // <-
}

impl UnaryOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Add => "+",
            UnaryOp::Sub => "-",
            UnaryOp::Not => "!",
            UnaryOp::Xor => "^",
            UnaryOp::Deref => "*",
            UnaryOp::Addr => "&",
            UnaryOp::Recv => "<-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
    And,    // &
    Or,     // |
    Xor,    // ^
    Shl,    // <<
    Shr,    // >>
    AndNot, // &^
    LAnd,   // &&
    LOr,    // ||
    Eq,     // ==
    Ne,     // !=
    Lt,     // <
    Le,     // <=
    Gt,     // >
    Ge,     // >=
}

impl BinaryOp {
    /// Binding strength, 1 (`||`) through 5 (multiplicative).
    pub const fn precedence(self) -> u8 {
        match self {
            BinaryOp::LOr => 1,
            BinaryOp::LAnd => 2,
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 3,
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Or | BinaryOp::Xor => 4,
            BinaryOp::Mul
            | BinaryOp::Div
            | BinaryOp::Mod
            | BinaryOp::Shl
            | BinaryOp::Shr
            | BinaryOp::And
            | BinaryOp::AndNot => 5,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Xor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::AndNot => "&^",
            BinaryOp::LAnd => "&&",
            BinaryOp::LOr => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    Assign,       // =
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
}

impl AssignOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::AddAssign => "+=",
            AssignOp::SubAssign => "-=",
            AssignOp::MulAssign => "*=",
            AssignOp::DivAssign => "/=",
            AssignOp::ModAssign => "%=",
            AssignOp::AndAssign => "&=",
            AssignOp::OrAssign => "|=",
            AssignOp::XorAssign => "^=",
            AssignOp::ShlAssign => "<<=",
            AssignOp::ShrAssign => ">>=",
            AssignOp::AndNotAssign => "&^=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncDecOp {
    Inc, // ++
    Dec, // --
}

// =============================================================================
// Node capabilities
// =============================================================================

/// Anything with a source span.
pub trait Node {
    fn span(&self, ast: &AstArena) -> Span;

    #[inline]
    fn start(&self, ast: &AstArena) -> Location {
        self.span(ast).start
    }

    #[inline]
    fn end(&self, ast: &AstArena) -> Location {
        self.span(ast).end
    }
}

/// Expression nodes.
pub trait Expression: Node {
    /// Location used when reporting errors about the expression.
    fn loc(&self, ast: &AstArena) -> Location {
        self.start(ast)
    }
}

/// Type nodes, including parameter lists used as function results.
pub trait TypeNode: Node {}

/// Declarations, which may carry leading doc comment lines.
pub trait Declaration: Node {
    fn comments<'a>(&self, ast: &'a AstArena) -> &'a [Box<str>];
}

macro_rules! impl_node_for_ids {
    ($($id:ty => $arena:ident),* $(,)?) => {
        $(
            impl Node for $id {
                #[inline]
                fn span(&self, ast: &AstArena) -> Span {
                    ast.$arena.span(*self)
                }
            }
        )*
    };
}

impl_node_for_ids! {
    DeclId => decls,
    StmtId => stmts,
    ExprId => exprs,
    TypeId => types,
    FieldId => fields,
    ParamId => params,
    LitId => lits,
}

macro_rules! impl_node_for_spanned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Node for $ty {
                #[inline]
                fn span(&self, _: &AstArena) -> Span {
                    self.span
                }
            }
        )*
    };
}

impl_node_for_spanned!(Ident, Block, ParamList, Signature, File);

impl Expression for ExprId {
    fn loc(&self, ast: &AstArena) -> Location {
        match ast.exprs[*self] {
            Expr::Binary { op_pos, .. } | Expr::Unary { op_pos, .. } => op_pos.start,
            Expr::Index { l_brack, .. } | Expr::Slice { l_brack, .. } => l_brack.start,
            Expr::Call { l_paren, .. } => l_paren.start,
            _ => self.start(ast),
        }
    }
}

impl TypeNode for TypeId {}
impl TypeNode for ParamList {}
impl TypeNode for Signature {}

impl Declaration for DeclId {
    fn comments<'a>(&self, ast: &'a AstArena) -> &'a [Box<str>] {
        let doc = match ast.decls[*self] {
            Decl::Import(d) => d.doc,
            Decl::Const(d) => d.doc,
            Decl::Var(d) => d.doc,
            Decl::Type(d) => d.doc,
            Decl::Func(d) => d.doc,
            Decl::Method(d) => d.doc,
        };
        ast.doc_lines_list(doc)
    }
}
