//! Command-line front end over `gofront_syntax`.
//!
//! Files and directories named on the command line are gathered into
//! packages (one per directory and package clause), parsed into one arena per
//! directory and resolved. Every error is reported with the path of the file
//! it was found in.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use gofront_syntax::ast::{AstArena, File};
use gofront_syntax::error::Error;
use gofront_syntax::parser::{ParserConfig, parse_file};
use gofront_syntax::{print, symtab};
use walkdir::WalkDir;

/// A source file read from disk.
#[derive(Debug, Clone)]
pub struct Source {
    pub path: PathBuf,
    pub text: String,
}

/// The `.go` files of one directory, sorted by name.
#[derive(Debug, Clone)]
pub struct Package {
    pub dir: PathBuf,
    pub files: Vec<Source>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Options {
    pub parser: ParserConfig,
    /// Keep a printed tree of every parsed file.
    pub dump: bool,
}

/// An error and the file it belongs to.
#[derive(Debug)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub error: Error,
    /// File of the original declaration when a redeclaration crosses files.
    pub original: Option<PathBuf>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.error, &self.original) {
            (Error::Redeclared(r), Some(original)) => write!(
                f,
                "{}:{}: {} redeclared, originally declared at {}:{}",
                self.path.display(),
                r.second,
                r.name,
                original.display(),
                r.first
            ),
            _ => write!(f, "{}:{}", self.path.display(), self.error),
        }
    }
}

/// Outcome of checking one or more packages.
#[derive(Debug, Default)]
pub struct Report {
    pub files: usize,
    pub packages: usize,
    pub diagnostics: Vec<Diagnostic>,
    /// Printed trees, in file order, when [`Options::dump`] is set.
    pub trees: Vec<(PathBuf, String)>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    fn merge(&mut self, other: Report) {
        self.files += other.files;
        self.packages += other.packages;
        self.diagnostics.extend(other.diagnostics);
        self.trees.extend(other.trees);
    }
}

// =============================================================================
// Loading
// =============================================================================

fn is_go_file(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "go")
}

/// Reads the named files and the `.go` files directly inside the named
/// directories, grouped by directory.
pub fn load(paths: &[PathBuf]) -> Result<Vec<Package>> {
    let mut dirs: BTreeMap<PathBuf, Vec<PathBuf>> = BTreeMap::new();
    for path in paths {
        let meta = std::fs::metadata(path).with_context(|| format!("cannot access {}", path.display()))?;
        if meta.is_dir() {
            let files = dirs.entry(path.clone()).or_default();
            for entry in WalkDir::new(path).min_depth(1).max_depth(1) {
                let entry = entry.with_context(|| format!("listing {}", path.display()))?;
                if entry.file_type().is_file() && is_go_file(entry.path()) {
                    files.push(entry.into_path());
                }
            }
        } else {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            dirs.entry(dir).or_default().push(path.clone());
        }
    }

    let mut packages = Vec::with_capacity(dirs.len());
    for (dir, mut files) in dirs {
        files.sort();
        files.dedup();
        if files.is_empty() {
            tracing::debug!(dir = %dir.display(), "no Go files");
            continue;
        }
        let files = files
            .into_iter()
            .map(|path| {
                let text = std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
                Ok(Source { path, text })
            })
            .collect::<Result<Vec<_>>>()?;
        packages.push(Package { dir, files });
    }
    if packages.is_empty() {
        bail!("no Go files found");
    }
    Ok(packages)
}

// =============================================================================
// Checking
// =============================================================================

/// Parses every file of `pkg` and resolves each package clause found in it.
///
/// A file that fails to parse contributes its error and is left out of
/// resolution; the rest of the package is still resolved.
#[tracing::instrument(skip_all, fields(dir = %pkg.dir.display(), files = pkg.files.len()))]
pub fn check_package(pkg: &Package, opts: &Options) -> Report {
    let mut report = Report {
        files: pkg.files.len(),
        ..Report::default()
    };
    let mut ast = AstArena::new();
    // Package name -> (index into pkg.files, parsed file).
    let mut clauses: BTreeMap<String, Vec<(usize, File)>> = BTreeMap::new();

    for (i, src) in pkg.files.iter().enumerate() {
        match parse_file(&src.text, &mut ast, &opts.parser) {
            Ok(file) => {
                tracing::trace!(path = %src.path.display(), "parsed");
                if opts.dump {
                    report
                        .trees
                        .push((src.path.clone(), print::to_tree_string(&ast, &file)));
                }
                let name = ast.ident_str(file.name).to_owned();
                clauses.entry(name).or_default().push((i, file));
            }
            Err(e) => {
                tracing::debug!(path = %src.path.display(), error = %e, "parse failed");
                report.diagnostics.push(Diagnostic {
                    path: src.path.clone(),
                    error: e.into(),
                    original: None,
                });
            }
        }
    }

    for (name, parsed) in clauses {
        let files: Vec<File> = parsed.iter().map(|&(_, f)| f).collect();
        let (scope, res) = symtab::resolve(&ast, &files);
        tracing::debug!(
            package = %name,
            bindings = scope.scope(symtab::PackageScope::PACKAGE).len(),
            "resolved"
        );
        report.packages += 1;
        let Err(errs) = res else {
            continue;
        };
        for error in errs {
            let (at, original) = match &error {
                Error::Redeclared(r) if r.first_file != r.second_file => {
                    (r.second_file, Some(pkg.files[parsed[r.first_file].0].path.clone()))
                }
                Error::Redeclared(r) => (r.second_file, None),
                Error::Parse(_) => (0, None),
            };
            report.diagnostics.push(Diagnostic {
                path: pkg.files[parsed[at].0].path.clone(),
                error,
                original,
            });
        }
    }
    report
}

/// Checks every package in order.
pub fn check_all(packages: &[Package], opts: &Options) -> Report {
    let mut report = Report::default();
    for pkg in packages {
        report.merge(check_package(pkg, opts));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(files: &[(&str, &str)]) -> Package {
        Package {
            dir: PathBuf::from("pkg"),
            files: files
                .iter()
                .map(|&(name, text)| Source {
                    path: Path::new("pkg").join(name),
                    text: text.to_owned(),
                })
                .collect(),
        }
    }

    fn messages(report: &Report) -> Vec<String> {
        report.diagnostics.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn clean_package() {
        let pkg = package(&[
            ("a.go", "package p\n\nfunc A() {}\n"),
            ("b.go", "package p\n\nfunc B() { A() }\n"),
        ]);
        let report = check_package(&pkg, &Options::default());
        assert!(report.is_clean(), "{:?}", messages(&report));
        assert_eq!((report.files, report.packages), (2, 1));
        assert!(report.trees.is_empty());
    }

    #[test]
    fn redeclaration_across_files_names_both() {
        let pkg = package(&[
            ("a.go", "package p\n\nvar X = 1\n"),
            ("b.go", "package p\n\nconst X = 2\ntype X int\n"),
        ]);
        let report = check_package(&pkg, &Options::default());
        assert_eq!(
            messages(&report),
            [
                format!(
                    "{}:3:7: X redeclared, originally declared at {}:3:5",
                    Path::new("pkg/b.go").display(),
                    Path::new("pkg/a.go").display()
                ),
                format!(
                    "{}:4:6: X redeclared, originally declared at {}:3:5",
                    Path::new("pkg/b.go").display(),
                    Path::new("pkg/a.go").display()
                ),
            ]
        );
    }

    #[test]
    fn parse_errors_do_not_stop_the_package() {
        let pkg = package(&[
            ("a.go", "package p\n\nfunc A() { switch {} }\n"),
            ("b.go", "package p\n\nvar B = 1\nvar B = 2\n"),
        ]);
        let report = check_package(&pkg, &Options::default());
        assert_eq!(
            messages(&report),
            [
                format!("{}:3:12: unimplemented: switch statement", Path::new("pkg/a.go").display()),
                format!(
                    "{}:4:5: B redeclared, originally declared at 3:5",
                    Path::new("pkg/b.go").display()
                ),
            ]
        );
    }

    #[test]
    fn package_clauses_resolve_separately() {
        let pkg = package(&[
            ("a.go", "package p\n\nfunc T() {}\n"),
            ("a_test.go", "package p_test\n\nfunc T() {}\n"),
        ]);
        let report = check_package(&pkg, &Options::default());
        assert!(report.is_clean(), "{:?}", messages(&report));
        assert_eq!(report.packages, 2);
    }

    #[test]
    fn dump_keeps_a_tree_per_file() {
        let pkg = package(&[("a.go", "package p\n\nconst A = 1\n")]);
        let opts = Options {
            dump: true,
            ..Options::default()
        };
        let report = check_package(&pkg, &opts);
        assert_eq!(report.trees.len(), 1);
        assert!(report.trees[0].1.contains("ConstSpec A (iota 0)"), "{}", report.trees[0].1);
    }
}
