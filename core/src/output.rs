//! Rendering for stdout.

use std::collections::BTreeMap;

use log::warn;
use serde::de::IgnoredAny;

use crate::http::HttpResponse;

/// Status line, headers sorted by name, a blank line, then the body.
///
/// Header names are canonicalized (`content-type` becomes `Content-Type`)
/// so the order does not depend on how the server spelled them; repeated
/// headers are joined with `, `.
pub fn render_response(response: &HttpResponse, indent: bool) -> Vec<u8> {
    let mut grouped: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for (name, value) in &response.headers {
        grouped.entry(canonical_name(name)).or_default().push(value);
    }

    let mut out = format!("{}\n", response.status_line());
    for (name, values) in &grouped {
        out.push_str(&format!("{name}: {}\n", values.join(", ")));
    }
    out.push('\n');

    let mut out = out.into_bytes();
    let pretty = if indent && response.is_json() {
        let pretty = indent_json(&response.body);
        if pretty.is_none() {
            warn!("response is labelled JSON but does not parse; printing it raw");
        }
        pretty
    } else {
        None
    };
    out.extend_from_slice(pretty.as_deref().unwrap_or(&response.body));
    out.push(b'\n');
    out
}

/// The echoed request followed by a blank line.
pub fn render_request(dump: &[u8]) -> Vec<u8> {
    let mut out = dump.to_vec();
    if !out.ends_with(b"\n") {
        out.push(b'\n');
    }
    out.push(b'\n');
    out
}

const INDENT: &[u8] = b"    ";

/// Re-indent a JSON document with four spaces.
///
/// Only whitespace outside strings changes: numbers, escapes, key order and
/// duplicate keys come out exactly as the server sent them. The document is
/// checked with serde_json first, so the scanner below only ever sees valid
/// JSON.
pub fn indent_json(body: &[u8]) -> Option<Vec<u8>> {
    serde_json::from_slice::<IgnoredAny>(body).ok()?;

    let mut out = Vec::with_capacity(body.len() * 2);
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    // Set after `{` or `[`; the newline is held back so empty containers
    // stay on one line.
    let mut opened = false;

    for &b in body {
        if in_string {
            out.push(b);
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        if b.is_ascii_whitespace() {
            continue;
        }
        if opened && b != b'}' && b != b']' {
            newline(&mut out, depth);
        }
        match b {
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if !opened {
                    newline(&mut out, depth);
                }
                out.push(b);
            }
            b'{' | b'[' => {
                out.push(b);
                depth += 1;
            }
            b',' => {
                out.push(b);
                newline(&mut out, depth);
            }
            b':' => out.extend_from_slice(b": "),
            b'"' => {
                in_string = true;
                out.push(b);
            }
            _ => out.push(b),
        }
        opened = matches!(b, b'{' | b'[');
    }
    Some(out)
}

fn newline(out: &mut Vec<u8>, depth: usize) {
    out.push(b'\n');
    for _ in 0..depth {
        out.extend_from_slice(INDENT);
    }
}

/// `x-request-id` -> `X-Request-Id`
pub fn canonical_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let c = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            c
        })
        .collect()
}
