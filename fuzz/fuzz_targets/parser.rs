#![no_main]

use gofront_syntax::ast::AstArena;
use gofront_syntax::parser::{Entry, ParserConfig, Root, parse};
use gofront_syntax::symtab::resolve;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let src = String::from_utf8_lossy(data);
    let cfg = ParserConfig::default();

    for entry in [Entry::File, Entry::Declarations, Entry::Statements, Entry::Expression] {
        let mut ast = AstArena::new();
        // Errors are fine; panics and stack overflows are not.
        if let Ok(Root::File(file)) = parse(&src, entry, &mut ast, &cfg) {
            let (_, _) = resolve(&ast, &[file]);
        }
    }
});
