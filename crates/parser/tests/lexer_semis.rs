use gofront_syntax::ast::Location;
use gofront_syntax::lexer::Lexer;
use gofront_syntax::token::Tok;

/// Positions of the semicolons the lexer inserted.
fn inserted_semis(input: &str) -> Vec<Location> {
    Lexer::new(input)
        .filter(|t| t.tok == Tok::Semi && t.span.start == t.span.end)
        .map(|t| t.span.start)
        .collect()
}

fn tok_name(t: Tok) -> &'static str {
    match t {
        Tok::Ident => "IDENT",
        Tok::IntLit => "INT",
        Tok::FloatLit => "FLOAT",
        Tok::ImagLit => "IMAG",
        Tok::RuneLit => "CHAR",
        Tok::StringLit | Tok::RawStringLit => "STRING",
        other => other.describe(),
    }
}

fn check_semi_case(input: &str, want: &str) {
    let got = Lexer::new(input)
        .map(|t| tok_name(t.tok))
        .collect::<Vec<_>>()
        .join(" ");
    assert_eq!(got, want, "input=<<{input}>>");
}

struct SemiCase {
    input: &'static str,
    want: &'static str,
}

#[rustfmt::skip]
const SEMICOLON_TESTS: &[SemiCase] = &[
    SemiCase { input: "", want: "" },
    SemiCase { input: "\u{FEFF};", want: ";" },
    SemiCase { input: ";", want: ";" },

    SemiCase { input: "foo\n", want: "IDENT ;" },
    SemiCase { input: "123\n", want: "INT ;" },
    SemiCase { input: "1.2\n", want: "FLOAT ;" },
    SemiCase { input: "'x'\n", want: "CHAR ;" },
    SemiCase { input: "\"x\"\n", want: "STRING ;" },
    SemiCase { input: "`x`\n", want: "STRING ;" },

    SemiCase { input: "+\n", want: "+" },
    SemiCase { input: "-\n", want: "-" },
    SemiCase { input: "*\n", want: "*" },
    SemiCase { input: "/\n", want: "/" },
    SemiCase { input: "%\n", want: "%" },

    SemiCase { input: "&\n", want: "&" },
    SemiCase { input: "|\n", want: "|" },
    SemiCase { input: "^\n", want: "^" },
    SemiCase { input: "<<\n", want: "<<" },
    SemiCase { input: ">>\n", want: ">>" },
    SemiCase { input: "&^\n", want: "&^" },

    SemiCase { input: "+=\n", want: "+=" },
    SemiCase { input: "-=\n", want: "-=" },
    SemiCase { input: "*=\n", want: "*=" },
    SemiCase { input: "/=\n", want: "/=" },
    SemiCase { input: "%=\n", want: "%=" },

    SemiCase { input: "&=\n", want: "&=" },
    SemiCase { input: "|=\n", want: "|=" },
    SemiCase { input: "^=\n", want: "^=" },
    SemiCase { input: "<<=\n", want: "<<=" },
    SemiCase { input: ">>=\n", want: ">>=" },
    SemiCase { input: "&^=\n", want: "&^=" },

    SemiCase { input: "&&\n", want: "&&" },
    SemiCase { input: "||\n", want: "||" },
    SemiCase { input: "<-\n", want: "<-" },
    SemiCase { input: "++\n", want: "++ ;" },
    SemiCase { input: "--\n", want: "-- ;" },

    SemiCase { input: "==\n", want: "==" },
    SemiCase { input: "<\n", want: "<" },
    SemiCase { input: ">\n", want: ">" },
    SemiCase { input: "=\n", want: "=" },
    SemiCase { input: "!\n", want: "!" },

    SemiCase { input: "!=\n", want: "!=" },
    SemiCase { input: "<=\n", want: "<=" },
    SemiCase { input: ">=\n", want: ">=" },
    SemiCase { input: ":=\n", want: ":=" },
    SemiCase { input: "...\n", want: "..." },

    SemiCase { input: "(\n", want: "(" },
    SemiCase { input: "[\n", want: "[" },
    SemiCase { input: "{\n", want: "{" },
    SemiCase { input: ",\n", want: "," },
    SemiCase { input: ".\n", want: "." },

    SemiCase { input: ")\n", want: ") ;" },
    SemiCase { input: "]\n", want: "] ;" },
    SemiCase { input: "}\n", want: "} ;" },
    SemiCase { input: ";\n", want: ";" },
    SemiCase { input: ":\n", want: ":" },

    SemiCase { input: "break\n", want: "break ;" },
    SemiCase { input: "case\n", want: "case" },
    SemiCase { input: "chan\n", want: "chan" },
    SemiCase { input: "const\n", want: "const" },
    SemiCase { input: "continue\n", want: "continue ;" },

    SemiCase { input: "default\n", want: "default" },
    SemiCase { input: "defer\n", want: "defer" },
    SemiCase { input: "else\n", want: "else" },
    SemiCase { input: "fallthrough\n", want: "fallthrough ;" },
    SemiCase { input: "for\n", want: "for" },

    SemiCase { input: "func\n", want: "func" },
    SemiCase { input: "go\n", want: "go" },
    SemiCase { input: "goto\n", want: "goto" },
    SemiCase { input: "if\n", want: "if" },
    SemiCase { input: "import\n", want: "import" },

    SemiCase { input: "interface\n", want: "interface" },
    SemiCase { input: "map\n", want: "map" },
    SemiCase { input: "package\n", want: "package" },
    SemiCase { input: "range\n", want: "range" },
    SemiCase { input: "return\n", want: "return ;" },

    SemiCase { input: "select\n", want: "select" },
    SemiCase { input: "struct\n", want: "struct" },
    SemiCase { input: "switch\n", want: "switch" },
    SemiCase { input: "type\n", want: "type" },
    SemiCase { input: "var\n", want: "var" },

    SemiCase { input: "foo//comment\n", want: "IDENT ;" },
    SemiCase { input: "foo//comment", want: "IDENT ;" },
    SemiCase { input: "foo/*comment*/\n", want: "IDENT ;" },
    SemiCase { input: "foo/*\n*/", want: "IDENT ;" },
    SemiCase { input: "foo/*comment*/    \n", want: "IDENT ;" },
    SemiCase { input: "foo/*\n*/    ", want: "IDENT ;" },

    SemiCase { input: "foo    // comment\n", want: "IDENT ;" },
    SemiCase { input: "foo    // comment", want: "IDENT ;" },
    SemiCase { input: "foo    /*comment*/\n", want: "IDENT ;" },
    SemiCase { input: "foo    /*\n*/", want: "IDENT ;" },

    SemiCase {
        input: "package main\n\nfunc main() {\n\tif {\n\t\treturn /* */ }\n}\n",
        want: "package IDENT ; func IDENT ( ) { if { return } ; } ;",
    },
    SemiCase { input: "package main", want: "package IDENT ;" },
];

#[test]
fn semicolon_table() {
    for t in SEMICOLON_TESTS {
        check_semi_case(t.input, t.want);

        // Trailing newlines only ever produce what EOF would.
        let mut trimmed = t.input;
        while let Some(rest) = trimmed.strip_suffix('\n') {
            trimmed = rest;
            check_semi_case(trimmed, t.want);
        }
    }
}

#[test]
fn block_comment_with_newline_acts_like_newline() {
    assert_eq!(inserted_semis("x/*\n*/y").len(), inserted_semis("x\ny").len());
    assert_eq!(inserted_semis("x/* */y"), vec![Location::new(1, 8)]);
}

#[test]
fn block_comment_newline_does_not_insert_after_keyword() {
    assert_eq!(inserted_semis("if/*\n*/x"), vec![Location::new(2, 4)]);
}

#[test]
fn inserted_semis_sit_at_the_newline() {
    assert_eq!(
        inserted_semis("break\nx"),
        vec![Location::new(1, 6), Location::new(2, 2)]
    );
    assert_eq!(
        inserted_semis("x++\ny--\n"),
        vec![Location::new(1, 4), Location::new(2, 4)]
    );
    assert_eq!(
        inserted_semis("1i\nx"),
        vec![Location::new(1, 3), Location::new(2, 2)]
    );
}

#[test]
fn line_comment_at_eof() {
    assert_eq!(inserted_semis("x//c"), vec![Location::new(1, 5)]);
}

#[test]
fn inserted_semi_text() {
    let toks: Vec<_> = Lexer::new("x\ny").collect();
    assert_eq!(toks[1].text, "\n");
    assert_eq!(toks[3].text, "");
}
