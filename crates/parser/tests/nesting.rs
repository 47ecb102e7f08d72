use std::thread;

use gofront_syntax::ast::AstArena;
use gofront_syntax::error::ParseError;
use gofront_syntax::parser::{DEFAULT_MAX_DEPTH, ParserConfig, parse_stmts};

/// Parses `src` as a statement list with the default configuration on a
/// thread with a 2 MiB stack, the default for spawned threads.
fn parse_on_small_stack(src: String) -> Result<(), ParseError> {
    thread::Builder::new()
        .name("small-stack".into())
        .stack_size(2 << 20)
        .spawn(move || {
            let mut ast = AstArena::new();
            parse_stmts(&src, &mut ast, &ParserConfig::default()).map(|_| ())
        })
        .expect("spawn parser thread")
        .join()
        .expect("parser thread panicked")
}

fn deep_inputs() -> Vec<(&'static str, String)> {
    vec![
        ("blocks", format!("{}{}", "{".repeat(2000), "}".repeat(2000))),
        ("slice types", format!("var x {}int", "[]".repeat(2000))),
        ("if statements", format!("{}{}", "if a {".repeat(600), "}".repeat(600))),
        ("struct fields", format!("var x {}int{}", "struct { a ".repeat(600), " }".repeat(600))),
        ("composite elements", format!("x = T{{{}{}}}", "{".repeat(2000), "}".repeat(2000))),
        ("labels", "L: ".repeat(3000)),
        ("parentheses", format!("x = {}a{}", "(".repeat(5000), ")".repeat(5000))),
        ("unary operators", format!("x = {}a", "!".repeat(5000))),
    ]
}

#[test]
fn deep_nesting_fails_cleanly_with_the_default_config() {
    for (what, src) in deep_inputs() {
        match parse_on_small_stack(src) {
            Err(ParseError::TooDeep { limit, .. }) => {
                assert!(limit <= DEFAULT_MAX_DEPTH, "{what}: limit {limit}");
            }
            other => panic!("{what}: expected TooDeep, got {other:?}"),
        }
    }
}

#[test]
fn ordinary_nesting_fits_the_default_budget() {
    let blocks = format!("{}x++{}", "{".repeat(32), "}".repeat(32));
    assert_eq!(parse_on_small_stack(blocks), Ok(()));

    let parens = format!("x = {}a{}", "(".repeat(32), ")".repeat(32));
    assert_eq!(parse_on_small_stack(parens), Ok(()));

    let ifs = format!("{}f(){}", "if a { ".repeat(16), " }".repeat(16));
    assert_eq!(parse_on_small_stack(ifs), Ok(()));
}

#[test]
fn stack_budget_is_configurable() {
    let src = format!("{}{}", "{".repeat(200), "}".repeat(200));
    let mut ast = AstArena::new();
    let tight = ParserConfig {
        stack_budget: 0,
        ..ParserConfig::default()
    };
    let err = parse_stmts(&src, &mut ast, &tight).unwrap_err();
    assert!(matches!(err, ParseError::TooDeep { .. }), "{err:?}");
}
