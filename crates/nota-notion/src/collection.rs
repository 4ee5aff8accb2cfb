//! Collection-table to site-metadata mapping.
//!
//! A Notion collection view is the site's table of contents: one row per
//! post, with the publish flag, output path, template name and tags kept as
//! row properties. The mapping is schema-driven — properties are looked up
//! by their column name, not their opaque property id.

use serde_json::Value;
use tracing::warn;

use nota_site::{PageMetadata, RemoteError, SiteMetadata};

/// Extract the collection page id from a Notion URL.
///
/// Accepts full URLs (`https://www.notion.so/user/My-Table-<32 hex>?v=...`),
/// bare 32-hex ids, and already-dashed UUIDs.
pub(crate) fn collection_page_id(url: &str) -> Result<String, RemoteError> {
    let path = url.split(['?', '#']).next().unwrap_or(url);

    // The id is the trailing run of hex digits (dashes allowed); page titles
    // can contribute stray hex characters, so keep only the last 32 digits.
    let tail: Vec<char> = path
        .chars()
        .rev()
        .take_while(|c| c.is_ascii_hexdigit() || *c == '-')
        .filter(|c| *c != '-')
        .take(32)
        .collect();
    if tail.len() != 32 {
        return Err(RemoteError::Shape(format!(
            "no collection page id found in url {url:?}"
        )));
    }

    let hex: String = tail.into_iter().rev().collect();
    Ok(dashify(&hex))
}

/// Insert UUID dashes into a 32-hex-digit id (8-4-4-4-12).
fn dashify(hex: &str) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        &hex[0..8],
        &hex[8..12],
        &hex[12..16],
        &hex[16..20],
        &hex[20..32]
    )
}

/// Locate the collection id and default view id inside a `loadPageChunk`
/// response for the collection page.
pub(crate) fn collection_pointer(
    page_id: &str,
    chunk: &Value,
) -> Result<(String, String), RemoteError> {
    let block = chunk
        .pointer(&format!("/recordMap/block/{page_id}/value"))
        .ok_or_else(|| RemoteError::Shape(format!("block {page_id} missing from chunk")))?;

    let collection_id = block
        .get("collection_id")
        .and_then(Value::as_str)
        .ok_or_else(|| RemoteError::Shape(format!("block {page_id} has no collection_id")))?;

    let view_id = block
        .pointer("/view_ids/0")
        .and_then(Value::as_str)
        .ok_or_else(|| RemoteError::Shape(format!("block {page_id} has no views")))?;

    Ok((collection_id.to_owned(), view_id.to_owned()))
}

/// Map a `queryCollection` response to [`SiteMetadata`].
///
/// Rows that cannot be mapped (no title, missing record) are skipped with a
/// warning rather than failing the whole collection.
pub(crate) fn parse_site(
    url: &str,
    collection_id: &str,
    result: &Value,
) -> Result<SiteMetadata, RemoteError> {
    let collection = result
        .pointer(&format!("/recordMap/collection/{collection_id}/value"))
        .ok_or_else(|| RemoteError::Shape("collection record missing".to_owned()))?;

    let schema = Schema::from_collection(collection);

    let row_ids = result
        .pointer("/result/reducerResults/collection_group_results/blockIds")
        .and_then(Value::as_array)
        .ok_or_else(|| RemoteError::Shape("collection results missing".to_owned()))?;

    let mut pages = Vec::with_capacity(row_ids.len());
    for row_id in row_ids.iter().filter_map(Value::as_str) {
        let Some(row) = result.pointer(&format!("/recordMap/block/{row_id}/value")) else {
            warn!("row {row_id} missing from record map, skipped");
            continue;
        };
        match page_from_row(row_id, row, &schema) {
            Some(page) => pages.push(page),
            None => warn!("row {row_id} has no title, skipped"),
        }
    }

    Ok(SiteMetadata {
        url: url.to_owned(),
        title: semantic_text(collection.get("name")),
        description: semantic_text(collection.get("description")),
        pages,
    })
}

fn page_from_row(id: &str, row: &Value, schema: &Schema) -> Option<PageMetadata> {
    let properties = row.get("properties")?;

    let title = schema
        .title_id
        .as_deref()
        .map(|prop| semantic_text(properties.get(prop)))
        .filter(|t| !t.is_empty())?;

    let prop_text = |name: &Option<String>| {
        name.as_deref()
            .map(|prop| semantic_text(properties.get(prop)))
            .unwrap_or_default()
    };

    let publish = prop_text(&schema.publish_id) == "Yes";
    let slug = prop_text(&schema.url_id);
    let template = prop_text(&schema.template_id);
    let tags_text = prop_text(&schema.tags_id);

    Some(PageMetadata {
        id: id.to_owned(),
        title,
        tags: tags_text
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned)
            .collect(),
        publish,
        last_edited_ms: row.get("last_edited_time").and_then(Value::as_i64).unwrap_or(0),
        output_path: if slug.is_empty() {
            format!("{id}.html")
        } else {
            slug
        },
        template: if template.is_empty() {
            "post".to_owned()
        } else {
            template
        },
    })
}

/// Property ids of the columns the site cares about, found by column name.
#[derive(Debug, Default)]
struct Schema {
    title_id: Option<String>,
    publish_id: Option<String>,
    url_id: Option<String>,
    template_id: Option<String>,
    tags_id: Option<String>,
}

impl Schema {
    fn from_collection(collection: &Value) -> Self {
        let mut schema = Self::default();
        let Some(props) = collection.get("schema").and_then(Value::as_object) else {
            return schema;
        };

        for (prop_id, prop) in props {
            let name = prop
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_ascii_lowercase();
            let prop_type = prop.get("type").and_then(Value::as_str).unwrap_or_default();

            let slot = match (name.as_str(), prop_type) {
                (_, "title") => &mut schema.title_id,
                ("publish", _) => &mut schema.publish_id,
                ("url", _) => &mut schema.url_id,
                ("template", _) => &mut schema.template_id,
                ("tags", _) => &mut schema.tags_id,
                _ => continue,
            };
            *slot = Some(prop_id.clone());
        }
        schema
    }
}

/// Flatten a Notion semantic-string value (`[["text", ...], ...]`) to plain
/// text.
fn semantic_text(value: Option<&Value>) -> String {
    let Some(spans) = value.and_then(Value::as_array) else {
        return String::new();
    };
    spans
        .iter()
        .filter_map(|span| span.get(0).and_then(Value::as_str))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const PAGE_ID: &str = "0123456789abcdef0123456789abcdef";
    const DASHED: &str = "01234567-89ab-cdef-0123-456789abcdef";

    #[test]
    fn extracts_page_id_from_full_url() {
        let url = format!("https://www.notion.so/user/My-Table-{PAGE_ID}?v=deadbeef");
        assert_eq!(collection_page_id(&url).unwrap(), DASHED);
    }

    #[test]
    fn accepts_bare_and_dashed_ids() {
        assert_eq!(collection_page_id(PAGE_ID).unwrap(), DASHED);
        assert_eq!(collection_page_id(DASHED).unwrap(), DASHED);
    }

    #[test]
    fn rejects_url_without_id() {
        assert!(matches!(
            collection_page_id("https://www.notion.so/about"),
            Err(RemoteError::Shape(_))
        ));
    }

    #[test]
    fn finds_collection_pointer_in_chunk() {
        let chunk = json!({
            "recordMap": { "block": { DASHED: { "value": {
                "collection_id": "coll-1",
                "view_ids": ["view-1", "view-2"],
            }}}}
        });
        let (collection_id, view_id) = collection_pointer(DASHED, &chunk).unwrap();
        assert_eq!(collection_id, "coll-1");
        assert_eq!(view_id, "view-1");
    }

    #[test]
    fn missing_block_is_a_shape_error() {
        let chunk = json!({"recordMap": {"block": {}}});
        assert!(matches!(
            collection_pointer(DASHED, &chunk),
            Err(RemoteError::Shape(_))
        ));
    }

    fn query_result() -> Value {
        json!({
            "result": { "reducerResults": { "collection_group_results": {
                "blockIds": ["row-1", "row-2", "row-3"]
            }}},
            "recordMap": {
                "collection": { "coll-1": { "value": {
                    "name": [["My Blog"]],
                    "description": [["Posts about things"]],
                    "schema": {
                        "title": { "name": "Name", "type": "title" },
                        "chk1": { "name": "Publish", "type": "checkbox" },
                        "txt1": { "name": "URL", "type": "text" },
                        "txt2": { "name": "Template", "type": "text" },
                        "sel1": { "name": "Tags", "type": "multi_select" },
                    },
                }}},
                "block": {
                    "row-1": { "value": {
                        "last_edited_time": 1000i64,
                        "properties": {
                            "title": [["Hello "], ["World"]],
                            "chk1": [["Yes"]],
                            "txt1": [["hello-world.html"]],
                            "txt2": [["post"]],
                            "sel1": [["rust,notes"]],
                        },
                    }},
                    "row-2": { "value": {
                        "last_edited_time": 2000i64,
                        "properties": {
                            "title": [["Draft"]],
                            "chk1": [["No"]],
                        },
                    }},
                    // row-3 has no title and is skipped
                    "row-3": { "value": { "properties": {} } },
                },
            },
        })
    }

    #[test]
    fn maps_rows_to_page_metadata() {
        let site = parse_site("https://example", "coll-1", &query_result()).unwrap();

        assert_eq!(site.title, "My Blog");
        assert_eq!(site.description, "Posts about things");
        assert_eq!(site.pages.len(), 2);

        let first = &site.pages[0];
        assert_eq!(first.id, "row-1");
        assert_eq!(first.title, "Hello World");
        assert!(first.publish);
        assert_eq!(first.last_edited_ms, 1000);
        assert_eq!(first.output_path, "hello-world.html");
        assert_eq!(first.template, "post");
        assert_eq!(first.tags, vec!["rust".to_owned(), "notes".to_owned()]);

        let second = &site.pages[1];
        assert!(!second.publish);
        assert_eq!(second.output_path, "row-2.html");
        assert_eq!(second.template, "post");
        assert!(second.tags.is_empty());
    }

    #[test]
    fn missing_collection_record_is_a_shape_error() {
        let result = json!({"recordMap": {"collection": {}}});
        assert!(matches!(
            parse_site("u", "coll-1", &result),
            Err(RemoteError::Shape(_))
        ));
    }
}
