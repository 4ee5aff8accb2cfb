//! Content-tree to HTML boundary.
//!
//! The page tree fetched from the remote is an opaque JSON blob to the build
//! pipeline; this module is the one place that looks inside it, and it only
//! understands the handful of block shapes needed to produce article HTML.
//! A full block serializer is a collaborator concern, not part of the
//! pipeline.

use std::fmt::Write;

use serde_json::Value;

/// Serialize a fetched page tree to content-only HTML.
///
/// Unknown block types contribute their children and nothing else; a blob
/// with no recognizable blocks (including an empty or failed fetch) produces
/// an empty string rather than an error.
#[must_use]
pub fn tree_to_html(tree: &Value) -> String {
    let mut html = String::new();
    render_block(&mut html, tree, true);
    html
}

fn render_block(html: &mut String, block: &Value, is_root: bool) {
    let block_type = block.get("type").and_then(Value::as_str).unwrap_or("");
    let text = block_text(block);

    match block_type {
        // The root page's title is rendered by the theme, not here
        _ if is_root => {}
        "header" => {
            let _ = writeln!(html, "<h1>{}</h1>", escape(&text));
        }
        "sub_header" => {
            let _ = writeln!(html, "<h2>{}</h2>", escape(&text));
        }
        "sub_sub_header" => {
            let _ = writeln!(html, "<h3>{}</h3>", escape(&text));
        }
        "code" => {
            let _ = writeln!(html, "<pre><code>{}</code></pre>", escape(&text));
        }
        "quote" => {
            let _ = writeln!(html, "<blockquote>{}</blockquote>", escape(&text));
        }
        "divider" => html.push_str("<hr>\n"),
        "text" => {
            if !text.is_empty() {
                let _ = writeln!(html, "<p>{}</p>", escape(&text));
            }
        }
        _ => {}
    }

    if let Some(children) = block.get("children").and_then(Value::as_array) {
        for child in children {
            render_block(html, child, false);
        }
    }
}

/// Flatten a block's `title` semantic-string array into plain text.
fn block_text(block: &Value) -> String {
    let Some(spans) = block.get("title").and_then(Value::as_array) else {
        return String::new();
    };
    spans
        .iter()
        .filter_map(|span| span.get(0).and_then(Value::as_str))
        .collect()
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
