mod common;

use common::{names, render, stmts, stmts_err};
use gofront_syntax::ast::{AssignOp, AstArena, ForKind, IncDecOp, Stmt, StmtId};
use gofront_syntax::error::ParseError;

fn kind(ast: &AstArena, id: StmtId) -> &'static str {
    match ast.stmts[id] {
        Stmt::Empty => "empty",
        Stmt::Decl(_) => "decl",
        Stmt::Expr(_) => "expr",
        Stmt::Assign { .. } => "assign",
        Stmt::ShortVarDecl { .. } => "define",
        Stmt::Range { .. } => "range",
        Stmt::Send { .. } => "send",
        Stmt::IncDec { .. } => "incdec",
        Stmt::Labeled { .. } => "labeled",
        Stmt::Block(_) => "block",
        Stmt::If { .. } => "if",
        Stmt::For { .. } => "for",
        Stmt::Go { .. } => "go",
        Stmt::Defer { .. } => "defer",
        Stmt::Return { .. } => "return",
        Stmt::Break { .. } => "break",
        Stmt::Continue { .. } => "continue",
        Stmt::Goto { .. } => "goto",
        Stmt::Fallthrough => "fallthrough",
    }
}

fn kinds(src: &str) -> Vec<&'static str> {
    let (ast, list) = stmts(src);
    list.iter().map(|&s| kind(&ast, s)).collect()
}

#[test]
fn simple_statement_forms() {
    assert_eq!(
        kinds("x := 1; y = 2; x++; ch <- v; f(x); a, b = b, a; n += 1"),
        ["define", "assign", "incdec", "send", "expr", "assign", "assign"]
    );

    let (ast, list) = stmts("a, b = b, a\nn <<= 2\nx--");
    let Stmt::Assign { lhs, op, rhs, .. } = ast.stmts[list[0]] else {
        panic!("not an assignment");
    };
    assert_eq!(op, AssignOp::Assign);
    assert_eq!(lhs.len(), 2);
    assert_eq!(rhs.len(), 2);
    assert!(matches!(ast.stmts[list[1]], Stmt::Assign { op: AssignOp::ShlAssign, .. }));
    assert!(matches!(ast.stmts[list[2]], Stmt::IncDec { op: IncDecOp::Dec, .. }));
}

#[test]
fn short_var_decl_needs_identifiers() {
    let (ast, list) = stmts("a, b := f()");
    let Stmt::ShortVarDecl { names: n, values, .. } = ast.stmts[list[0]] else {
        panic!("not a short variable declaration");
    };
    assert_eq!(names(&ast, n), ["a", "b"]);
    assert_eq!(values.len(), 1);

    assert_eq!(
        stmts_err("a.b := 1").to_string(),
        "1:1: expected identifier, got expression"
    );
}

#[test]
fn expression_lists_need_an_assignment() {
    assert_eq!(
        stmts_err("a, b").to_string(),
        "1:5: expected := or = or comma, got ;"
    );
}

#[test]
fn labels() {
    let (ast, list) = stmts("L: for {}\nbreak L\ncontinue\ngoto L");
    assert_eq!(
        list.iter().map(|&s| kind(&ast, s)).collect::<Vec<_>>(),
        ["labeled", "break", "continue", "goto"]
    );
    let Stmt::Labeled { label, stmt } = ast.stmts[list[0]] else {
        unreachable!()
    };
    assert_eq!(ast.ident_str(label), "L");
    assert_eq!(kind(&ast, stmt), "for");
    assert!(matches!(ast.stmts[list[2]], Stmt::Continue { label: None }));

    let (ast, list) = stmts("{ L: }");
    let Stmt::Block(block) = ast.stmts[list[0]] else {
        panic!("not a block");
    };
    let inner = ast.stmts_list(block.stmts)[0];
    let Stmt::Labeled { stmt, .. } = ast.stmts[inner] else {
        panic!("not labeled");
    };
    assert_eq!(kind(&ast, stmt), "empty");
}

#[test]
fn label_at_end_of_input() {
    for src in ["L:\n", "L:", "x++\nL:"] {
        let (ast, list) = stmts(src);
        let last = *list.last().expect("no statements");
        let Stmt::Labeled { label, stmt } = ast.stmts[last] else {
            panic!("{src:?}: not labeled");
        };
        assert_eq!(ast.ident_str(label), "L");
        assert_eq!(kind(&ast, stmt), "empty", "{src:?}");
    }
}

#[test]
fn if_else_chains() {
    let (ast, list) = stmts("if x := f(); x > 0 {\n\treturn x\n} else if y {\n} else {\n\tz()\n}");
    let Stmt::If { init, cond, els, .. } = ast.stmts[list[0]] else {
        panic!("not an if");
    };
    assert_eq!(init.map(|s| kind(&ast, s)), Some("define"));
    assert_eq!(render(&ast, cond), "(> x 0)");
    let Some(els) = els else {
        panic!("missing else");
    };
    let Stmt::If { els: Some(last), .. } = ast.stmts[els] else {
        panic!("else is not an if");
    };
    assert_eq!(kind(&ast, last), "block");
}

#[test]
fn braces_after_header_open_the_body() {
    let (ast, list) = stmts("if x == T {\n}");
    let Stmt::If { cond, then, .. } = ast.stmts[list[0]] else {
        panic!("not an if");
    };
    assert_eq!(render(&ast, cond), "(== x T)");
    assert!(then.stmts.is_empty());

    // Parenthesized or explicitly typed literals are still allowed.
    let (ast, list) = stmts("if x == (T{}) {\n}\nfor _, v := range []int{1, 2} {\n}");
    let Stmt::If { cond, .. } = ast.stmts[list[0]] else {
        panic!("not an if");
    };
    assert_eq!(render(&ast, cond), "(== x (composite T))");
    let Stmt::For { kind: ForKind::Range(range), .. } = ast.stmts[list[1]] else {
        panic!("not a range loop");
    };
    let Stmt::Range { expr, define, .. } = ast.stmts[range] else {
        panic!("not a range clause");
    };
    assert!(define);
    assert_eq!(render(&ast, expr), "(composite []int 1 2)");

    // Inside the body composite literals work again.
    assert_eq!(kinds("for x {\n\ty := T{}\n}"), ["for"]);
}

#[test]
fn for_forms() {
    let (ast, list) = stmts(
        "for {}\nfor x < 10 {}\nfor i := 0; i < 10; i++ {}\nfor ;; {}\nfor k, v := range m {}\nfor range ch {}\nfor k = range m {}",
    );
    let forms: Vec<_> = list
        .iter()
        .map(|&s| match ast.stmts[s] {
            Stmt::For { kind, .. } => kind,
            _ => panic!("not a for"),
        })
        .collect();
    assert!(matches!(forms[0], ForKind::Infinite));
    assert!(matches!(forms[1], ForKind::Cond(_)));
    assert!(matches!(
        forms[2],
        ForKind::Clause {
            init: Some(_),
            cond: Some(_),
            post: Some(_)
        }
    ));
    assert!(matches!(
        forms[3],
        ForKind::Clause {
            init: None,
            cond: None,
            post: None
        }
    ));
    for (form, (lhs, define)) in forms[4..].iter().zip([(2, true), (0, false), (1, false)]) {
        let ForKind::Range(range) = *form else {
            panic!("not a range loop");
        };
        let Stmt::Range { lhs: l, define: d, .. } = ast.stmts[range] else {
            panic!("not a range clause");
        };
        assert_eq!((l.len(), d), (lhs, define));
    }
}

#[test]
fn range_only_in_for_headers() {
    assert_eq!(
        stmts_err("x := range m").to_string(),
        "1:6: expected operand, got range"
    );
}

#[test]
fn for_post_cannot_declare() {
    assert_eq!(
        stmts_err("for i := 0; i < 3; j := 1 {}").to_string(),
        "1:20: expected simple statement, got short variable declaration"
    );
}

#[test]
fn go_and_defer_take_calls() {
    assert_eq!(kinds("go f(x)\ndefer mu.Unlock()"), ["go", "defer"]);
    assert_eq!(
        stmts_err("go x").to_string(),
        "1:4: expected function call after go, got expression"
    );
}

#[test]
fn jumps_and_returns() {
    let (ast, list) = stmts("return\nreturn a, b\nfallthrough");
    assert!(matches!(ast.stmts[list[0]], Stmt::Return { results } if results.is_empty()));
    assert!(matches!(ast.stmts[list[1]], Stmt::Return { results } if results.len() == 2));
    assert_eq!(kind(&ast, list[2]), "fallthrough");
}

#[test]
fn declarations_in_blocks() {
    let (ast, list) = stmts("var x int\nconst (\n\ta = 1\n\tb = 2\n)\ntype T struct{}");
    assert_eq!(list.iter().map(|&s| kind(&ast, s)).collect::<Vec<_>>(), ["decl", "decl", "decl"]);
    let Stmt::Decl(group) = ast.stmts[list[1]] else {
        unreachable!()
    };
    assert_eq!(group.len(), 2);
}

#[test]
fn switch_and_select_are_unsupported() {
    let err = stmts_err("switch x {\n}");
    assert!(matches!(err, ParseError::Unsupported { construct: "switch statement", .. }));
    assert_eq!(err.to_string(), "1:1: unimplemented: switch statement");
    assert_eq!(
        stmts_err("x := 1\nselect {\n}").to_string(),
        "2:1: unimplemented: select statement"
    );
}

#[test]
fn statements_need_separators() {
    assert_eq!(stmts_err("x := 1 y := 2").to_string(), "1:8: expected ;, got y");
    assert_eq!(kinds(";;x++;;"), ["incdec"]);
}
