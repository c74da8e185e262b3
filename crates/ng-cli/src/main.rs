//! `ng`: check, convert, and create node-graph documents.
//!
//! ```text
//! ng check <file>...          lint documents, exit 1 on warnings
//! ng convert <in> <out>       convert between .json / .ng / .ngb
//! ng new <file> [nodes]       write a document with N unconnected nodes
//! ```
//!
//! Set `RUST_LOG=debug` for load details.

use ng_core::{
    Document, DocumentError, LintSeverity, NodeGraph, NodeMetrics, Position, lint_document,
};
use std::env;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "usage:
  ng check <file>...
  ng convert <in> <out>
  ng new <file> [nodes]";

/// Horizontal gap between nodes created by `ng new`.
const NEW_NODE_SPACING: f32 = 300.0;

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let result = match (command.as_str(), rest) {
        ("check", paths) if !paths.is_empty() => check(paths),
        ("convert", [input, output]) => convert(Path::new(input), Path::new(output)).map(|()| true),
        ("new", [path]) => create(Path::new(path), 1).map(|()| true),
        ("new", [path, count]) => match count.parse::<usize>() {
            Ok(n) => create(Path::new(path), n).map(|()| true),
            Err(_) => {
                eprintln!("node count must be a number, got `{count}`");
                return ExitCode::from(2);
            }
        },
        _ => {
            eprintln!("{USAGE}");
            return ExitCode::from(2);
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Lint every file. Returns `Ok(false)` if any file has warnings or fails to read.
fn check(paths: &[String]) -> Result<bool, DocumentError> {
    let metrics = NodeMetrics::default();
    let mut clean = true;

    for path in paths {
        let doc = match Document::read(Path::new(path)) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("{path}: {e}");
                clean = false;
                continue;
            }
        };
        let diagnostics = lint_document(&doc, &metrics);
        for d in &diagnostics {
            println!("{path}: {d}");
        }
        if diagnostics
            .iter()
            .any(|d| d.severity == LintSeverity::Warning)
        {
            clean = false;
        } else {
            println!(
                "✓ {path} ({} node(s), {} connection(s))",
                doc.nodes.len(),
                doc.connections.len()
            );
        }
    }
    Ok(clean)
}

fn convert(input: &Path, output: &Path) -> Result<(), DocumentError> {
    let doc = Document::read(input)?;
    doc.write(output)?;
    log::info!("converted {} -> {}", input.display(), output.display());
    Ok(())
}

fn create(path: &Path, nodes: usize) -> Result<(), DocumentError> {
    let mut graph = NodeGraph::new();
    for i in 0..nodes {
        graph.add_node(Position::new(i as f32 * NEW_NODE_SPACING, 0.0));
    }
    graph.to_document().write(path)?;
    println!("wrote {} with {nodes} node(s)", path.display());
    Ok(())
}
