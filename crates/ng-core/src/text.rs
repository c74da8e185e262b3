//! `.ng` text format: a human-readable rendition of a [`Document`].
//!
//! ```text
//! # comment
//! node @a1 "Source" {
//!   at: 0 0
//!   size: 200 50
//!   in: @a1_in
//!   out: @a1_out
//! }
//! wire @a1_out -> @b2_in
//! ```
//!
//! Built on `winnow` 0.7. The parser does not check referential integrity;
//! that happens when the document is loaded into a `NodeGraph`.

use crate::document::{Document, NodeRecord};
use crate::id::{NodeId, PortId};
use crate::model::Connection;
use std::fmt::Write;
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::token::{take_till, take_while};

// ─── Emitter ─────────────────────────────────────────────────────────────

/// Emit a `Document` as `.ng` text. Round-trips through [`parse_document`].
#[must_use]
pub fn emit_document(doc: &Document) -> String {
    let mut out = String::with_capacity(64 + doc.nodes.len() * 160);

    for rec in &doc.nodes {
        emit_node(&mut out, rec);
        out.push('\n');
    }

    for c in &doc.connections {
        let _ = writeln!(out, "wire @{} -> @{}", c.output.as_str(), c.input.as_str());
    }

    out
}

fn emit_node(out: &mut String, rec: &NodeRecord) {
    let _ = writeln!(
        out,
        "node @{} \"{}\" {{",
        rec.id.as_str(),
        escape(&rec.title)
    );
    let _ = writeln!(out, "  at: {} {}", rec.x, rec.y);
    let _ = writeln!(out, "  size: {} {}", rec.width, rec.height);
    if !rec.input_port_id.as_str().is_empty() {
        let _ = writeln!(out, "  in: @{}", rec.input_port_id.as_str());
    }
    out.push_str("  out:");
    for port in &rec.output_port_ids {
        let _ = write!(out, " @{}", port.as_str());
    }
    out.push_str("\n}\n");
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

// ─── Parser ──────────────────────────────────────────────────────────────

/// Parse `.ng` text into a `Document`.
pub fn parse_document(input: &str) -> Result<Document, String> {
    let mut doc = Document::default();
    let mut rest = input;

    skip_ws_and_comments(&mut rest);

    while !rest.is_empty() {
        if starts_with_keyword(rest, "node") {
            let rec = parse_node
                .parse_next(&mut rest)
                .map_err(|e| format!("Node parse error: {e}"))?;
            doc.nodes.push(rec);
        } else if starts_with_keyword(rest, "wire") {
            let wire = parse_wire
                .parse_next(&mut rest)
                .map_err(|e| format!("Wire parse error: {e}"))?;
            doc.connections.push(wire);
        } else {
            // Skip unknown line
            let _ = take_till::<_, _, ContextError>(0.., '\n').parse_next(&mut rest);
            if rest.starts_with('\n') {
                rest = &rest[1..];
            }
        }

        skip_ws_and_comments(&mut rest);
    }

    Ok(doc)
}

fn starts_with_keyword(s: &str, kw: &str) -> bool {
    s.strip_prefix(kw)
        .is_some_and(|tail| tail.starts_with(char::is_whitespace))
}

fn parse_node(input: &mut &str) -> ModalResult<NodeRecord> {
    literal(input, "node")?;
    skip_space(input);
    let id = parse_node_id.parse_next(input)?;
    skip_space(input);

    let title = if input.starts_with('"') {
        parse_quoted_string(input)?
    } else {
        String::new()
    };
    skip_space(input);
    literal(input, "{")?;

    let mut rec = NodeRecord {
        id,
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
        title,
        input_port_id: PortId::intern(""),
        output_port_ids: Vec::new(),
    };

    skip_ws_and_comments(input);

    while !input.starts_with('}') {
        if input.is_empty() {
            return Err(backtrack());
        }
        let prop = parse_identifier.parse_next(input)?;
        skip_space(input);
        literal(input, ":")?;
        skip_space(input);

        match prop {
            "at" => {
                rec.x = parse_number.parse_next(input)?;
                skip_space(input);
                rec.y = parse_number.parse_next(input)?;
            }
            "size" => {
                rec.width = parse_number.parse_next(input)?;
                skip_space(input);
                rec.height = parse_number.parse_next(input)?;
            }
            "in" => {
                rec.input_port_id = parse_port_id.parse_next(input)?;
            }
            "out" => {
                while input.starts_with('@') {
                    rec.output_port_ids.push(parse_port_id.parse_next(input)?);
                    skip_space(input);
                }
            }
            _ => {
                let _ = take_till::<_, _, ContextError>(
                    0..,
                    |c: char| c == '\n' || c == ';' || c == '}',
                )
                .parse_next(input);
            }
        }

        skip_opt_separator(input);
        skip_ws_and_comments(input);
    }

    literal(input, "}")?;
    Ok(rec)
}

fn parse_wire(input: &mut &str) -> ModalResult<Connection> {
    literal(input, "wire")?;
    skip_space(input);
    let output = parse_port_id.parse_next(input)?;
    skip_space(input);
    literal(input, "->")?;
    skip_space(input);
    let input_port = parse_port_id.parse_next(input)?;
    Ok(Connection::new(input_port, output))
}

// ─── Low-level parsers ──────────────────────────────────────────────────

fn backtrack() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// Match an exact token (concrete error type avoids inference issues).
fn literal<'a>(input: &mut &'a str, mut token: &'static str) -> ModalResult<&'a str> {
    token.parse_next(input)
}

fn skip_ws_and_comments(input: &mut &str) {
    loop {
        let before = *input;
        *input = input.trim_start();
        if input.starts_with('#') {
            if let Some(pos) = input.find('\n') {
                *input = &input[pos + 1..];
            } else {
                *input = "";
            }
            continue;
        }
        if *input == before {
            break;
        }
    }
}

/// Consume optional whitespace (concrete error type avoids inference issues).
fn skip_space(input: &mut &str) {
    use winnow::ascii::space0;
    let _: Result<&str, ErrMode<ContextError>> = space0.parse_next(input);
}

fn skip_opt_separator(input: &mut &str) {
    if input.starts_with(';') || input.starts_with('\n') {
        *input = &input[1..];
    }
}

fn parse_identifier<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    take_while(1.., |c: char| {
        c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
    })
    .parse_next(input)
}

/// Node id, `@`-prefixed as emitted or bare in hand-written files.
fn parse_node_id(input: &mut &str) -> ModalResult<NodeId> {
    if input.starts_with('@') {
        literal(input, "@")?;
    }
    parse_identifier.map(NodeId::intern).parse_next(input)
}

fn parse_port_id(input: &mut &str) -> ModalResult<PortId> {
    literal(input, "@")?;
    parse_identifier.map(PortId::intern).parse_next(input)
}

fn parse_number(input: &mut &str) -> ModalResult<f32> {
    let start = *input;
    if input.starts_with('-') {
        *input = &input[1..];
    }
    take_while::<_, _, ErrMode<ContextError>>(1.., |c: char| c.is_ascii_digit())
        .parse_next(input)?;
    if input.starts_with('.') {
        *input = &input[1..];
        let _ =
            take_while::<_, _, ContextError>(0.., |c: char| c.is_ascii_digit()).parse_next(input);
    }
    let matched = &start[..start.len() - input.len()];
    matched.parse::<f32>().map_err(|_| backtrack())
}

/// Quoted string with `\"` and `\\` escapes.
fn parse_quoted_string(input: &mut &str) -> ModalResult<String> {
    let body = input.strip_prefix('"').ok_or_else(backtrack)?;
    let mut out = String::new();
    let mut chars = body.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                *input = &body[i + 1..];
                return Ok(out);
            }
            '\\' => match chars.next() {
                Some((_, escaped)) => out.push(escaped),
                None => break,
            },
            _ => out.push(c),
        }
    }
    Err(backtrack())
}
