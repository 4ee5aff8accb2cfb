//! Page content tree assembly.
//!
//! Turns the flat block records of a `loadPageChunk` response into the
//! nested `{type, title, children}` tree the rest of the system carries as
//! an opaque blob.

use serde_json::{Value, json};
use tracing::warn;

use nota_site::RemoteError;

/// Assemble the content tree rooted at `page_id` from a chunk response.
///
/// Child ids that are missing from the record map (chunk truncation,
/// permission gaps) are skipped with a warning; the tree is built from what
/// is present.
pub(crate) fn assemble(page_id: &str, chunk: &Value) -> Result<Value, RemoteError> {
    let blocks = chunk
        .pointer("/recordMap/block")
        .and_then(Value::as_object)
        .ok_or_else(|| RemoteError::Shape("chunk has no block records".to_owned()))?;

    let root = blocks
        .get(page_id)
        .and_then(|record| record.get("value"))
        .ok_or_else(|| RemoteError::Shape(format!("page {page_id} missing from chunk")))?;

    Ok(build_node(page_id, root, blocks))
}

fn build_node(id: &str, value: &Value, blocks: &serde_json::Map<String, Value>) -> Value {
    let block_type = value.get("type").and_then(Value::as_str).unwrap_or("");
    let title = value
        .pointer("/properties/title")
        .cloned()
        .unwrap_or_else(|| json!([]));

    let mut children = Vec::new();
    if let Some(content) = value.get("content").and_then(Value::as_array) {
        for child_id in content.iter().filter_map(Value::as_str) {
            match blocks.get(child_id).and_then(|record| record.get("value")) {
                Some(child) => children.push(build_node(child_id, child, blocks)),
                None => warn!("block {child_id} missing from chunk, skipped"),
            }
        }
    }

    json!({
        "id": id,
        "type": block_type,
        "title": title,
        "children": children,
    })
}
