use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use gofront::{Options, Report, check_all, load};
use tracing_subscriber::EnvFilter;

fn usage() -> ! {
    eprintln!("usage:\n  gofront [--max-depth <n>] [--dump] <file.go | dir>...");
    std::process::exit(2);
}

fn parse_args(mut args: impl Iterator<Item = String>) -> (Options, Vec<PathBuf>) {
    let mut opts = Options::default();
    let mut paths = Vec::new();
    while let Some(a) = args.next() {
        match a.as_str() {
            "--max-depth" => {
                let n = args.next().unwrap_or_else(|| usage());
                opts.parser.max_depth = n.parse().unwrap_or_else(|_| usage());
            }
            "--dump" => opts.dump = true,
            "--help" | "-h" => usage(),
            s if s.starts_with('-') => usage(),
            _ => paths.push(PathBuf::from(a)),
        }
    }
    if paths.is_empty() {
        usage();
    }
    (opts, paths)
}

fn emit(report: &Report) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for (path, tree) in &report.trees {
        writeln!(out, "# {}", path.display())?;
        out.write_all(tree.as_bytes())?;
    }
    out.flush()?;
    for d in &report.diagnostics {
        eprintln!("{d}");
    }
    Ok(())
}

fn run(opts: &Options, paths: &[PathBuf]) -> Result<bool> {
    let packages = load(paths)?;
    let report = check_all(&packages, opts);
    emit(&report)?;
    tracing::info!(
        files = report.files,
        packages = report.packages,
        errors = report.diagnostics.len(),
        "checked"
    );
    Ok(report.is_clean())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let (opts, paths) = parse_args(std::env::args().skip(1));
    match run(&opts, &paths) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
