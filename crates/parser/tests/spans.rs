//! Every node lies within its parent.

use gofront_syntax::ast::*;
use gofront_syntax::parser::{ParserConfig, parse_file};
use gofront_syntax::walk::{Visitor, Walk};

const SRC: &str = r#"package geometry

import (
	"fmt"
	m "math"
)

// Point is a location in the plane.
type Point struct {
	X, Y float64 `json:"x"`
	*Label
}

type Shape interface {
	Area() float64
	fmt.Stringer
}

const (
	Origin = iota
	Unit
)

var table = map[string][]int{"a": {1, 2}, "b": nil}

func (p *Point) Dist(q Point, scale ...float64) (d float64, ok bool) {
	dx, dy := p.X-q.X, p.Y-q.Y
	d = m.Sqrt(dx*dx + dy*dy)
	for _, s := range scale {
		d *= s
	}
	if d > 0 && !ok {
		return d, true
	} else if v, found := table["a"]; found {
		_ = v[1:len(v):cap(v)]
	}
outer:
	for i := 0; i < 10; i++ {
		if i%2 == 0 {
			continue outer
		}
		go fmt.Println(i, <-make(chan int))
		defer func(x, y int) {}(1, 2)
	}
	return
}
"#;

#[derive(Default)]
struct Nesting {
    stack: Vec<Span>,
    nodes: usize,
}

impl Nesting {
    fn enter(&mut self, kind: &str, span: Span) {
        assert!(span.start <= span.end, "{kind} at {span:?} ends before it starts");
        if let Some(parent) = self.stack.last() {
            assert!(
                parent.contains(span),
                "{kind} at {span:?} escapes its parent at {parent:?}"
            );
        }
        self.stack.push(span);
        self.nodes += 1;
    }
}

impl<'ast> Visitor<'ast> for Nesting {
    fn visit_file(&mut self, a: &'ast AstArena, f: &'ast File) {
        self.enter("file", f.span);
        f.walk(a, self);
        self.stack.pop();
    }

    fn visit_decl(&mut self, a: &'ast AstArena, id: DeclId) {
        self.enter("declaration", a.decls.span(id));
        a.decls[id].walk(a, self);
        self.stack.pop();
    }

    fn visit_stmt(&mut self, a: &'ast AstArena, id: StmtId) {
        self.enter("statement", a.stmts.span(id));
        a.stmts[id].walk(a, self);
        self.stack.pop();
    }

    fn visit_expr(&mut self, a: &'ast AstArena, id: ExprId) {
        self.enter("expression", a.exprs.span(id));
        a.exprs[id].walk(a, self);
        self.stack.pop();
    }

    fn visit_type(&mut self, a: &'ast AstArena, id: TypeId) {
        self.enter("type", a.types.span(id));
        a.types[id].walk(a, self);
        self.stack.pop();
    }

    fn visit_field(&mut self, a: &'ast AstArena, id: FieldId) {
        self.enter("field", a.fields.span(id));
        a.fields[id].walk(a, self);
        self.stack.pop();
    }

    fn visit_param(&mut self, a: &'ast AstArena, id: ParamId) {
        self.enter("parameter", a.params.span(id));
        a.params[id].walk(a, self);
        self.stack.pop();
    }
}

#[test]
fn children_nest_inside_parents() {
    // Function literals are rejected, so drop the one deferred call that uses
    // them before parsing.
    let src = SRC.replace("\t\tdefer func(x, y int) {}(1, 2)\n", "\t\tdefer close(nil)\n");
    let mut ast = AstArena::new();
    let file = parse_file(&src, &mut ast, &ParserConfig::default()).unwrap_or_else(|e| panic!("{e}"));

    let mut v = Nesting::default();
    v.visit_file(&ast, &file);
    assert!(v.stack.is_empty());
    assert!(v.nodes > 100, "only {} nodes visited", v.nodes);
    assert_eq!(file.span.start, Location::new(1, 1));
}

#[test]
fn declaration_spans() {
    let src = SRC.replace("\t\tdefer func(x, y int) {}(1, 2)\n", "");
    let mut ast = AstArena::new();
    let file = parse_file(&src, &mut ast, &ParserConfig::default()).unwrap_or_else(|e| panic!("{e}"));
    let decls = ast.decls_list(file.decls);

    // A lone spec starts at its keyword, grouped specs at their names.
    assert_eq!(decls[0].start(&ast), Location::new(9, 1));
    assert_eq!(decls[2].start(&ast), Location::new(20, 2));
    assert_eq!(decls[2].end(&ast), Location::new(20, 15));
    assert_eq!(decls[3].start(&ast), Location::new(21, 2));
    assert_eq!(decls[3].end(&ast), Location::new(21, 6));

    let method = decls[5];
    assert!(matches!(ast.decls[method], Decl::Method(_)));
    assert_eq!(method.start(&ast), Location::new(26, 1));
    assert_eq!(method.end(&ast), Location::new(45, 2));
}
