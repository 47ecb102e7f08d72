use gofront_syntax::ast::Location;
use gofront_syntax::lexer::Lexer;
use gofront_syntax::token::{Tok, TokenSource};

fn toks(src: &str) -> Vec<(Tok, &str)> {
    Lexer::new(src).map(|t| (t.tok, t.text)).collect()
}

fn kinds(src: &str) -> Vec<Tok> {
    Lexer::new(src).map(|t| t.tok).collect()
}

#[test]
fn unicode_identifiers() {
    assert_eq!(
        toks("αβγ x٣ 日本語"),
        [
            (Tok::Ident, "αβγ"),
            (Tok::Ident, "x٣"),
            (Tok::Ident, "日本語"),
            (Tok::Semi, ""),
        ]
    );
    // Columns count bytes.
    let starts: Vec<Location> = Lexer::new("αβγ x").map(|t| t.span.start).collect();
    assert_eq!(starts[1], Location::new(1, 8));
}

#[test]
fn stray_characters_become_error_tokens() {
    assert_eq!(
        toks("a € b"),
        [
            (Tok::Ident, "a"),
            (Tok::Error, "€"),
            (Tok::Ident, "b"),
            (Tok::Semi, ""),
        ]
    );
    // A decimal digit outside ASCII cannot start an identifier.
    assert_eq!(kinds("٣x")[..2], [Tok::Error, Tok::Ident]);
}

#[test]
fn carriage_returns_are_whitespace() {
    let all: Vec<_> = Lexer::new("a\r\nb").collect();
    let kinds: Vec<_> = all.iter().map(|t| (t.tok, t.text)).collect();
    assert_eq!(kinds, [(Tok::Ident, "a"), (Tok::Semi, "\n"), (Tok::Ident, "b"), (Tok::Semi, "")]);
    assert_eq!(all[1].span.start, Location::new(1, 3));
    assert_eq!(all[2].span.start, Location::new(2, 1));

    let mut lx = Lexer::new("x // c\r\ny");
    while lx.next_token().tok != Tok::Eof {}
    let comments = lx.take_comments();
    assert_eq!(comments.len(), 1);
    assert_eq!(&*comments[0].lines[0], "// c");
}

#[test]
fn operators_take_the_longest_match() {
    assert_eq!(
        kinds("a<<=b&^c...d<-e:=f"),
        [
            Tok::Ident,
            Tok::ShlAssign,
            Tok::Ident,
            Tok::AndNot,
            Tok::Ident,
            Tok::Ellipsis,
            Tok::Ident,
            Tok::Arrow,
            Tok::Ident,
            Tok::Define,
            Tok::Ident,
            Tok::Semi,
        ]
    );
}

#[test]
fn numbers_munch_maximally() {
    assert_eq!(toks("1e+5")[0], (Tok::FloatLit, "1e+5"));
    assert_eq!(
        toks("0x1e+5")[..3],
        [(Tok::IntLit, "0x1e"), (Tok::Plus, "+"), (Tok::IntLit, "5")]
    );
    assert_eq!(toks("1.5.6")[..2], [(Tok::FloatLit, "1.5"), (Tok::FloatLit, ".6")]);
    // Bad digits stay inside the literal; the parser rejects its value.
    assert_eq!(toks("0b1012")[0], (Tok::IntLit, "0b1012"));
    assert_eq!(toks("1_000.5e-3i")[0], (Tok::ImagLit, "1_000.5e-3i"));
    assert_eq!(toks("08.5")[0], (Tok::FloatLit, "08.5"));
}

#[test]
fn unterminated_literals_and_comments() {
    assert_eq!(kinds("\"abc")[0], Tok::Error);
    assert_eq!(kinds("\"a\nb\"")[0], Tok::Error);
    assert_eq!(kinds("`abc")[0], Tok::Error);
    assert_eq!(kinds("/* abc"), [Tok::Error]);
}

#[test]
fn token_text_is_borrowed_from_the_source() {
    assert_eq!(
        toks("x := `raw`"),
        [
            (Tok::Ident, "x"),
            (Tok::Define, ":="),
            (Tok::RawStringLit, "`raw`"),
            (Tok::Semi, ""),
        ]
    );
    let end: Vec<_> = Lexer::new("\t a \t").map(|t| t.span).collect();
    assert_eq!(end[1].start, Location::new(1, 6));
}
