use std::path::{Path, PathBuf};

use gofront::{Options, Package, Report, Source, check_package, load};

fn check(src: &str) -> Report {
    let pkg = Package {
        dir: PathBuf::from("snippet"),
        files: vec![Source {
            path: PathBuf::from("snippet/main.go"),
            text: src.to_owned(),
        }],
    };
    check_package(&pkg, &Options::default())
}

fn assert_checks(src: &str) {
    let report = check(src);
    let msgs: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
    assert!(msgs.is_empty(), "expected a clean package, got:\n{}", msgs.join("\n"));
}

fn assert_fails(src: &str, message: &str) {
    let report = check(src);
    let msgs: Vec<String> = report.diagnostics.iter().map(|d| d.error.to_string()).collect();
    assert_eq!(msgs, [message]);
}

#[test]
fn parses_imports_and_decls() {
    assert_checks(
        r#"
package main

import (
    "fmt"
    . "math"
    _ "net/http"
)

const (
    A = 1
    B int = 2
)

var (
    x = 1
    y, z int
)

type (
    T = int
    V interface {
        M(x int) int
        fmt.Stringer
    }
)

func main() {
    fmt.Println(Sqrt(4))
}
"#,
    );
}

#[test]
fn parses_statements() {
    assert_checks(
        r#"
package p

func f(x int) int {
    if x < 0 { return -x }
    for i := 0; i < 10; i++ {
        if i == 5 { break }
        continue
    }
    for range []int{1,2,3} {
    }
    var ch chan int
    go g(ch)
    defer close(ch)
    ch <- x
    x, y := <-ch, 2
    x += y
    {
        x--
    }
loop:
    for {
        break loop
    }
    return x
}

func g(chan int) {}
"#,
    );
}

#[test]
fn parses_expressions() {
    assert_checks(
        r#"
package p

func f(a, b, c int, ch chan<- int) {
    _ = a + b*c - (a<<2)
    _ = a == b || a < c && b <= c
    _ = &a
    _ = <-ch
    _ = []int{1,2,3}[0]
    _ = []int{1,2,3}[1:]
    _ = []int{1,2,3}[:2]
    _ = []int{1,2,3}[0:2:3]
    _ = map[string]int{"a":1, "b":2}["a"]
    _ = f(a, b, c)
    _ = f(a, b, c...)
    _ = struct{ x, y int }{1, 2}
    _ = [...]string{0: "zero", 2: "two"}
    _ = interface{}(a).(fmt.Stringer)
}
"#,
    );
}

#[test]
fn unsupported_constructs_fail_loudly() {
    assert_fails(
        "package p\n\nfunc f(x int) {\n\tswitch x {\n\tcase 0:\n\t}\n}\n",
        "4:2: unimplemented: switch statement",
    );
    assert_fails(
        "package p\n\nfunc f() {\n\tselect {}\n}\n",
        "4:2: unimplemented: select statement",
    );
    assert_fails(
        "package p\n\nvar f = func() {}\n",
        "3:9: unimplemented: function literal",
    );
}

#[test]
fn redeclarations_are_reported_with_the_path() {
    let report = check("package p\n\nfunc f() {}\nvar f int\n");
    assert!(!report.is_clean());
    assert_eq!(
        report.diagnostics[0].to_string(),
        format!(
            "{}:4:5: f redeclared, originally declared at 3:6",
            Path::new("snippet/main.go").display()
        )
    );
}

struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir = std::env::temp_dir().join(format!("gofront-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(dir.join("sub")).expect("create temp dir");
        TempDir(dir)
    }

    fn write(&self, name: &str, text: &str) -> PathBuf {
        let path = self.0.join(name);
        std::fs::write(&path, text).expect("write temp file");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

#[test]
fn load_groups_files_by_directory() {
    let tmp = TempDir::new("load");
    tmp.write("b.go", "package p\n\nfunc B() {}\n");
    let a = tmp.write("a.go", "package p\n\nfunc A() {}\n");
    tmp.write("notes.txt", "not go");
    tmp.write("sub/c.go", "package sub\n");

    let packages = load(&[tmp.0.clone(), a]).expect("load");
    assert_eq!(packages.len(), 1);
    let names: Vec<_> = packages[0]
        .files
        .iter()
        .map(|f| f.path.file_name().and_then(|n| n.to_str()).unwrap_or_default().to_owned())
        .collect();
    assert_eq!(names, ["a.go", "b.go"]);

    let report = gofront::check_all(&packages, &Options::default());
    assert!(report.is_clean());
    assert_eq!((report.files, report.packages), (2, 1));
}

#[test]
fn load_rejects_missing_paths() {
    let tmp = TempDir::new("missing");
    let err = load(&[tmp.0.join("nope.go")]).unwrap_err();
    assert!(format!("{err:#}").contains("nope.go"), "{err:#}");
    assert!(load(&[tmp.0.join("sub")]).is_err());
}
