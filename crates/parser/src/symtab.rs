//! Package symbol tables.
//!
//! [`resolve`] binds the top-level declarations of one package's files:
//!
//! ```text
//! universe  (predeclared names, shared, never mutated)
//!    └── package scope  (consts, vars, types, funcs)
//!           └── file scope, one per file  (imports)
//! ```
//!
//! Methods bind their name in the package scope like functions do, and are
//! also indexed by receiver base type for [`PackageScope::find_method`].
//!
//! Names are bound at most once per scope. A second binding is reported as a
//! [`Redeclaration`] against the first and otherwise ignored; the blank
//! identifier is never bound.

use std::collections::HashMap;
use std::sync::LazyLock;

use smallvec::SmallVec;

use crate::ast::{AstArena, Decl, DeclId, File, Id, Literal, Location, Symbol, Type, TypeId};
use crate::error::{Errors, Redeclaration};

pub type ScopeId = Id<Scope>;
pub type ConstViewId = Id<ConstView>;
pub type VarViewId = Id<VarView>;

const BLANK: &str = "_";

// =============================================================================
// Universe
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredeclaredKind {
    Type,
    Const,
    /// The untyped `nil`.
    Nil,
    Func,
}

/// A name from the universe scope. It has no source position or comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Predeclared {
    pub name: &'static str,
    pub kind: PredeclaredKind,
    /// `byte` and `rune` name `uint8` and `int32`.
    pub alias_of: Option<&'static str>,
}

#[rustfmt::skip]
const UNIVERSE_TYPES: &[&str] = &[
    "bool", "byte", "complex64", "complex128", "error", "float32", "float64",
    "int", "int8", "int16", "int32", "int64", "rune", "string",
    "uint", "uint8", "uint16", "uint32", "uint64", "uintptr",
];

const UNIVERSE_CONSTS: &[&str] = &["true", "false", "iota"];

#[rustfmt::skip]
const UNIVERSE_FUNCS: &[&str] = &[
    "append", "cap", "close", "complex", "copy", "delete", "imag", "len",
    "make", "new", "panic", "print", "println", "real", "recover",
];

static UNIVERSE: LazyLock<HashMap<&'static str, Predeclared>> = LazyLock::new(|| {
    let mut names = HashMap::new();
    let mut add = |name: &'static str, kind: PredeclaredKind, alias_of: Option<&'static str>| {
        names.insert(
            name,
            Predeclared {
                name,
                kind,
                alias_of,
            },
        );
    };
    for &name in UNIVERSE_TYPES {
        let alias_of = match name {
            "byte" => Some("uint8"),
            "rune" => Some("int32"),
            _ => None,
        };
        add(name, PredeclaredKind::Type, alias_of);
    }
    for &name in UNIVERSE_CONSTS {
        add(name, PredeclaredKind::Const, None);
    }
    add("nil", PredeclaredKind::Nil, None);
    for &name in UNIVERSE_FUNCS {
        add(name, PredeclaredKind::Func, None);
    }
    names
});

/// Looks `name` up in the universe scope.
pub fn universe(name: &str) -> Option<&'static Predeclared> {
    UNIVERSE.get(name)
}

// =============================================================================
// Bindings and views
// =============================================================================

/// An imported package. Its scope is empty; member lookups fall through to
/// the universe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackageRef {
    pub path: Symbol,
    pub scope: ScopeId,
}

/// What a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Predeclared(&'static Predeclared),
    Const(ConstViewId),
    Var(VarViewId),
    Type(DeclId),
    Func(DeclId),
    Method(DeclId),
    Package(PackageRef),
}

/// Progress of constant evaluation for one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckState {
    #[default]
    Unchecked,
    Checking,
    CheckedOk,
    CheckedError,
}

/// Outcome of [`ConstView::begin_check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStart {
    /// The view moved to `Checking`; the caller must finish it.
    Started,
    /// The view is already being checked: its value depends on itself.
    Cycle,
    /// Already finished with the given state.
    Done(CheckState),
}

/// One identifier of a `const` spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstView {
    pub decl: DeclId,
    /// Position of the identifier within its spec.
    pub index: u32,
    /// Declared type, or the type found by a later checking pass.
    pub typ: Option<TypeId>,
    value: Option<Literal>,
    state: CheckState,
}

impl ConstView {
    fn new(decl: DeclId, index: u32, typ: Option<TypeId>) -> Self {
        Self {
            decl,
            index,
            typ,
            value: None,
            state: CheckState::Unchecked,
        }
    }

    pub fn state(&self) -> CheckState {
        self.state
    }

    /// The folded value, once checked successfully.
    pub fn value(&self) -> Option<&Literal> {
        self.value.as_ref()
    }

    pub fn begin_check(&mut self) -> CheckStart {
        match self.state {
            CheckState::Unchecked => {
                self.state = CheckState::Checking;
                CheckStart::Started
            }
            CheckState::Checking => CheckStart::Cycle,
            done => CheckStart::Done(done),
        }
    }

    /// Records the folded value of a view being checked. Returns `false`,
    /// changing nothing, unless [`Self::begin_check`] started a check.
    pub fn finish_ok(&mut self, value: Literal, typ: Option<TypeId>) -> bool {
        if self.state != CheckState::Checking {
            return false;
        }
        self.value = Some(value);
        if typ.is_some() {
            self.typ = typ;
        }
        self.state = CheckState::CheckedOk;
        true
    }

    /// Marks a view being checked as failed; `false` if none was started.
    pub fn finish_error(&mut self) -> bool {
        if self.state != CheckState::Checking {
            return false;
        }
        self.state = CheckState::CheckedError;
        true
    }
}

/// One identifier of a `var` spec.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VarView {
    pub decl: DeclId,
    pub index: u32,
    pub typ: Option<TypeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Const(ConstViewId),
    Var(VarViewId),
}

// =============================================================================
// Scopes
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    binding: Binding,
    /// Where the name was bound.
    at: Location,
    file: usize,
}

#[derive(Debug, Default)]
pub struct Scope {
    /// `None` chains to the universe.
    parent: Option<ScopeId>,
    names: HashMap<Box<str>, Entry>,
}

impl Scope {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names bound directly in this scope, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(|k| k.as_ref())
    }
}

/// Scopes of one package: the package scope, a scope per file and the empty
/// scopes of imported packages.
#[derive(Debug)]
pub struct PackageScope {
    scopes: Vec<Scope>,
    files: Vec<ScopeId>,
    decl_files: HashMap<DeclId, usize>,
    consts: Vec<ConstView>,
    vars: Vec<VarView>,
    views: HashMap<DeclId, SmallVec<[View; 2]>>,
    /// Receiver base type name -> method name -> first declaration.
    methods: HashMap<Box<str>, HashMap<Box<str>, DeclId>>,
    /// File whose declarations are being bound.
    file: usize,
}

impl Default for PackageScope {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageScope {
    pub const PACKAGE: ScopeId = ScopeId::from_raw(0);

    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
            files: Vec::new(),
            decl_files: HashMap::new(),
            consts: Vec::new(),
            vars: Vec::new(),
            views: HashMap::new(),
            methods: HashMap::new(),
            file: 0,
        }
    }

    fn new_scope(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId::from_raw(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent,
            names: HashMap::new(),
        });
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.to_usize()]
    }

    /// Looks `name` up starting at the package scope.
    pub fn find(&self, name: &str) -> Option<Binding> {
        self.find_in(Self::PACKAGE, name)
    }

    /// Looks `name` up in `scope` and its ancestors, ending at the universe.
    pub fn find_in(&self, scope: ScopeId, name: &str) -> Option<Binding> {
        let mut at = Some(scope);
        while let Some(id) = at {
            let scope = self.scope(id);
            if let Some(entry) = scope.names.get(name) {
                return Some(entry.binding);
            }
            at = scope.parent;
        }
        universe(name).map(Binding::Predeclared)
    }

    /// Where `name` was bound in `scope` itself, if it was.
    pub fn declared_at(&self, scope: ScopeId, name: &str) -> Option<Location> {
        self.scope(scope).names.get(name).map(|e| e.at)
    }

    /// Looks up method `name` of the type named `recv`. Only receivers of
    /// the form `T` or `*T` are indexed.
    pub fn find_method(&self, recv: &str, name: &str) -> Option<DeclId> {
        self.methods.get(recv)?.get(name).copied()
    }

    /// Number of files resolved.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Scope of the `i`th file passed to [`resolve`].
    pub fn file_scope(&self, i: usize) -> Option<ScopeId> {
        self.files.get(i).copied()
    }

    /// Scope of the file declaring `decl`, a top-level declaration.
    pub fn file_scope_of(&self, decl: DeclId) -> Option<ScopeId> {
        self.decl_files.get(&decl).and_then(|&i| self.file_scope(i))
    }

    pub fn const_view(&self, id: ConstViewId) -> &ConstView {
        &self.consts[id.to_usize()]
    }

    pub fn const_view_mut(&mut self, id: ConstViewId) -> &mut ConstView {
        &mut self.consts[id.to_usize()]
    }

    pub fn var_view(&self, id: VarViewId) -> &VarView {
        &self.vars[id.to_usize()]
    }

    /// Views of a `const` or `var` spec, one per identifier in order.
    pub fn views_of(&self, decl: DeclId) -> &[View] {
        self.views.get(&decl).map_or(&[], |v| v.as_slice())
    }

    /// Binds `name` in `scope` unless it is blank or already bound there.
    fn bind(&mut self, scope: ScopeId, name: &str, at: Location, binding: Binding, errs: &mut Errors) {
        if name == BLANK {
            return;
        }
        let names = &mut self.scopes[scope.to_usize()].names;
        if let Some(first) = names.get(name) {
            tracing::debug!(name, %at, first = %first.at, "redeclared");
            errs.push(Redeclaration {
                name: name.to_owned(),
                first: first.at,
                second: at,
                first_file: first.file,
                second_file: self.file,
            });
            return;
        }
        tracing::trace!(name, %at, "bind");
        names.insert(
            name.into(),
            Entry {
                binding,
                at,
                file: self.file,
            },
        );
    }

    fn declare(&mut self, ast: &AstArena, decl: DeclId, errs: &mut Errors) {
        match ast.decls[decl] {
            Decl::Import(_) => {}
            Decl::Const(spec) => {
                for (index, name) in ast.idents_list(spec.names).iter().enumerate() {
                    let id = ConstViewId::from_raw(self.consts.len() as u32);
                    self.consts.push(ConstView::new(decl, index as u32, spec.typ));
                    self.views.entry(decl).or_default().push(View::Const(id));
                    self.bind(Self::PACKAGE, ast.ident_str(*name), name.span.start, Binding::Const(id), errs);
                }
            }
            Decl::Var(spec) => {
                for (index, name) in ast.idents_list(spec.names).iter().enumerate() {
                    let id = VarViewId::from_raw(self.vars.len() as u32);
                    self.vars.push(VarView {
                        decl,
                        index: index as u32,
                        typ: spec.typ,
                    });
                    self.views.entry(decl).or_default().push(View::Var(id));
                    self.bind(Self::PACKAGE, ast.ident_str(*name), name.span.start, Binding::Var(id), errs);
                }
            }
            Decl::Type(spec) => {
                let name = spec.name;
                self.bind(Self::PACKAGE, ast.ident_str(name), name.span.start, Binding::Type(decl), errs);
            }
            Decl::Func(func) => {
                let name = func.name;
                self.bind(Self::PACKAGE, ast.ident_str(name), name.span.start, Binding::Func(decl), errs);
            }
            Decl::Method(method) => {
                let name = method.name;
                let method_name = ast.ident_str(name);
                self.bind(Self::PACKAGE, method_name, name.span.start, Binding::Method(decl), errs);
                let recv = ast
                    .params_list(method.recv.params)
                    .first()
                    .and_then(|&p| receiver_base(ast, ast.params[p].typ));
                if let Some(recv) = recv
                    && method_name != BLANK
                {
                    self.methods
                        .entry(recv.into())
                        .or_default()
                        .entry(method_name.into())
                        .or_insert(decl);
                }
            }
        }
    }

    fn import(&mut self, ast: &AstArena, file: ScopeId, decl: DeclId, errs: &mut Errors) {
        let Decl::Import(import) = ast.decls[decl] else {
            return;
        };
        for spec in ast.import_specs_list(import.specs) {
            let Some(name) = spec.binding_name(&ast.symbols) else {
                continue;
            };
            if name == BLANK {
                continue;
            }
            let scope = self.new_scope(None);
            let package = Binding::Package(PackageRef {
                path: spec.path,
                scope,
            });
            self.bind(file, name, spec.span().start, package, errs);
        }
    }
}

/// `T` for receivers of type `T` or `*T`.
fn receiver_base(ast: &AstArena, typ: TypeId) -> Option<&str> {
    match ast.types[typ] {
        Type::Name { pkg: None, name } => Some(ast.ident_str(name)),
        Type::Pointer { elem } => match ast.types[elem] {
            Type::Name { pkg: None, name } => Some(ast.ident_str(name)),
            _ => None,
        },
        _ => None,
    }
}

/// Builds the scopes of a package from its parsed files.
///
/// The scope is complete even when errors are returned: every conflicting
/// binding keeps its first declaration.
#[tracing::instrument(skip_all, fields(files = files.len()))]
pub fn resolve(ast: &AstArena, files: &[File]) -> (PackageScope, Result<(), Errors>) {
    let mut pkg = PackageScope::new();
    let mut errs = Errors::new();
    for (i, file) in files.iter().enumerate() {
        let scope = pkg.new_scope(Some(PackageScope::PACKAGE));
        pkg.files.push(scope);
        pkg.file = i;
        for &decl in ast.decls_list(file.imports) {
            pkg.decl_files.insert(decl, i);
            pkg.import(ast, scope, decl, &mut errs);
        }
        for &decl in ast.decls_list(file.decls) {
            pkg.decl_files.insert(decl, i);
            pkg.declare(ast, decl, &mut errs);
        }
    }
    tracing::debug!(
        bindings = pkg.scope(PackageScope::PACKAGE).len(),
        errors = errs.len(),
        "resolved package"
    );
    (pkg, errs.into_result())
}

/// Binds declarations parsed without a file, such as the result of
/// [`Entry::Declarations`](crate::parser::Entry::Declarations). Imports among
/// them go to a single file scope.
pub fn resolve_decls(ast: &AstArena, decls: &[DeclId]) -> (PackageScope, Result<(), Errors>) {
    let mut pkg = PackageScope::new();
    let mut errs = Errors::new();
    let scope = pkg.new_scope(Some(PackageScope::PACKAGE));
    pkg.files.push(scope);
    for &decl in decls {
        pkg.decl_files.insert(decl, 0);
        match ast.decls[decl] {
            Decl::Import(_) => pkg.import(ast, scope, decl, &mut errs),
            _ => pkg.declare(ast, decl, &mut errs),
        }
    }
    (pkg, errs.into_result())
}
