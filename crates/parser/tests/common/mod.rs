//! Helpers shared by the integration tests.
#![allow(dead_code)]

use gofront_syntax::ast::*;
use gofront_syntax::error::ParseError;
use gofront_syntax::parser::{ParserConfig, parse_decls, parse_expr, parse_file, parse_stmts};

pub fn cfg() -> ParserConfig {
    ParserConfig::default()
}

pub fn expr(src: &str) -> (AstArena, ExprId) {
    let mut ast = AstArena::new();
    let e = parse_expr(src, &mut ast, &cfg()).unwrap_or_else(|e| panic!("{src}: {e}"));
    (ast, e)
}

/// An expression rendered as an s-expression, e.g. `(+ a (* b c))`.
pub fn sexpr(src: &str) -> String {
    let (ast, e) = expr(src);
    render(&ast, e)
}

pub fn expr_err(src: &str) -> ParseError {
    let mut ast = AstArena::new();
    match parse_expr(src, &mut ast, &cfg()) {
        Ok(e) => panic!("{src}: parsed as {}", render(&ast, e)),
        Err(e) => e,
    }
}

pub fn decls(src: &str) -> (AstArena, Vec<DeclId>) {
    let mut ast = AstArena::new();
    let list = parse_decls(src, &mut ast, &cfg()).unwrap_or_else(|e| panic!("{src}: {e}"));
    let ids = ast.decls_list(list).to_vec();
    (ast, ids)
}

pub fn decls_err(src: &str) -> ParseError {
    let mut ast = AstArena::new();
    parse_decls(src, &mut ast, &cfg()).expect_err(src)
}

pub fn stmts(src: &str) -> (AstArena, Vec<StmtId>) {
    let mut ast = AstArena::new();
    let list = parse_stmts(src, &mut ast, &cfg()).unwrap_or_else(|e| panic!("{src}: {e}"));
    let ids = ast.stmts_list(list).to_vec();
    (ast, ids)
}

pub fn stmts_err(src: &str) -> ParseError {
    let mut ast = AstArena::new();
    parse_stmts(src, &mut ast, &cfg()).expect_err(src)
}

pub fn file(src: &str) -> (AstArena, File) {
    let mut ast = AstArena::new();
    let f = parse_file(src, &mut ast, &cfg()).unwrap_or_else(|e| panic!("{e}"));
    (ast, f)
}

pub fn render(ast: &AstArena, id: ExprId) -> String {
    let list = |l: ListRef<ExprId>| {
        ast.exprs_list(l)
            .iter()
            .map(|&e| format!(" {}", render(ast, e)))
            .collect::<String>()
    };
    let opt = |e: Option<ExprId>| e.map_or_else(|| "_".to_owned(), |e| render(ast, e));
    match ast.exprs[id] {
        Expr::Ident(name) => ast.ident_str(name).to_owned(),
        Expr::Literal(lit) => ast.lits[lit].to_string(),
        Expr::Composite { typ, elems, .. } => {
            let mut out = String::from("(composite");
            if let Some(t) = typ {
                out.push(' ');
                out.push_str(&type_str(ast, t));
            }
            for el in ast.elements_list(elems) {
                match el.key {
                    Some(k) => out.push_str(&format!(" (: {} {})", render(ast, k), render(ast, el.value))),
                    None => out.push_str(&format!(" {}", render(ast, el.value))),
                }
            }
            out + ")"
        }
        Expr::Index { expr, index, .. } => format!("(index {} {})", render(ast, expr), render(ast, index)),
        Expr::Slice {
            expr, low, high, max, ..
        } => format!("(slice {} {} {} {})", render(ast, expr), opt(low), opt(high), opt(max)),
        Expr::TypeAssert { expr, typ, .. } => {
            let t = typ.map_or_else(|| "type".to_owned(), |t| type_str(ast, t));
            format!("(assert {} {t})", render(ast, expr))
        }
        Expr::Selector { expr, sel } => format!("(. {} {})", render(ast, expr), ast.ident_str(sel)),
        Expr::Call {
            func, args, ellipsis, ..
        } => {
            let dots = if ellipsis.is_some() { " ..." } else { "" };
            format!("(call {}{}{dots})", render(ast, func), list(args))
        }
        Expr::Binary { op, left, right, .. } => {
            format!("({} {} {})", op.as_str(), render(ast, left), render(ast, right))
        }
        Expr::Unary { op, operand, .. } => format!("({} {})", op.as_str(), render(ast, operand)),
        Expr::TypeExpr(t) => type_str(ast, t),
    }
}

pub fn type_str(ast: &AstArena, id: TypeId) -> String {
    match ast.types[id] {
        Type::Name { pkg: Some(pkg), name } => format!("{}.{}", ast.ident_str(pkg), ast.ident_str(name)),
        Type::Name { pkg: None, name } => ast.ident_str(name).to_owned(),
        Type::Array { len, elem } => match len {
            ArrayLen::Expr(e) => format!("[{}]{}", render(ast, e), type_str(ast, elem)),
            ArrayLen::Ellipsis(_) => format!("[...]{}", type_str(ast, elem)),
        },
        Type::Slice { elem } => format!("[]{}", type_str(ast, elem)),
        Type::Pointer { elem } => format!("*{}", type_str(ast, elem)),
        Type::Map { key, value } => format!("map[{}]{}", type_str(ast, key), type_str(ast, value)),
        Type::Chan { dir, elem } => {
            let kw = match (dir.send, dir.recv) {
                (true, false) => "chan<- ",
                (false, true) => "<-chan ",
                _ => "chan ",
            };
            format!("{kw}{}", type_str(ast, elem))
        }
        Type::Func { .. } => "func".to_owned(),
        Type::Struct { .. } => "struct".to_owned(),
        Type::Interface { .. } => "interface".to_owned(),
    }
}

pub fn names(ast: &AstArena, list: ListRef<Ident>) -> Vec<&str> {
    ast.idents_list(list).iter().map(|&i| ast.ident_str(i)).collect()
}
