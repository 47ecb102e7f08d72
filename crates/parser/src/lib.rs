//! Go front end: tokens, arena AST, parser and package symbol tables.
//!
//! - [`lexer`] scans source with Logos and performs semicolon insertion.
//! - [`parser`] is a hand-written recursive-descent parser producing nodes
//!   in an [`ast::AstArena`].
//! - [`symtab`] binds the top-level declarations of a package and reports
//!   redeclarations.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod literal;
pub mod parser;
pub mod print;
pub mod symtab;
pub mod token;
pub mod walk;

// Re-exports for convenience
pub use ast::AstArena;
pub use error::{Error, Errors, ParseError};
pub use lexer::Lexer;
pub use parser::{Entry, ParserConfig, Root, parse, parse_decls, parse_expr, parse_file, parse_stmts};
pub use symtab::{PackageScope, resolve};
