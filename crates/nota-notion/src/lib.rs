//! Notion API client for Nota.
//!
//! Implements the [`RemoteSource`] seam over Notion's unofficial v3 API:
//! `loadPageChunk` for page content and `queryCollection` for the site's
//! collection table. The block records of a page are assembled into a small
//! content tree (`{type, title, children}`) that the build pipeline treats as
//! an opaque blob.

mod collection;
mod tree;

use std::time::Duration;

use serde_json::{Value, json};
use tracing::debug;
use ureq::Agent;

use nota_site::{RemoteError, RemoteSource, SiteMetadata};

/// Notion v3 API base URL.
const API_BASE: &str = "https://www.notion.so/api/v3";

/// HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Blocks requested per `loadPageChunk` call.
const CHUNK_LIMIT: u32 = 100;

/// Notion v3 API client.
pub struct NotionClient {
    agent: Agent,
    base_url: String,
}

impl Default for NotionClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NotionClient {
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(API_BASE)
    }

    /// Client against a non-default endpoint (tests, proxies).
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn post(&self, endpoint: &str, body: &Value) -> Result<Value, RemoteError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("POST {url}");

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send_json(body)
            .map_err(|e| RemoteError::Transport(Box::new(e)))?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(RemoteError::Status {
                status,
                body: error_body,
            });
        }

        body_reader
            .read_json()
            .map_err(|e| RemoteError::Transport(Box::new(e)))
    }

    fn load_page_chunk(&self, page_id: &str) -> Result<Value, RemoteError> {
        self.post(
            "loadPageChunk",
            &json!({
                "pageId": page_id,
                "limit": CHUNK_LIMIT,
                "cursor": { "stack": [] },
                "chunkNumber": 0,
                "verticalColumns": false,
            }),
        )
    }

    fn query_collection(&self, collection_id: &str, view_id: &str) -> Result<Value, RemoteError> {
        self.post(
            "queryCollection",
            &json!({
                "collection": { "id": collection_id },
                "collectionView": { "id": view_id },
                "loader": {
                    "type": "reducer",
                    "reducers": {
                        "collection_group_results": { "type": "results", "limit": 999 }
                    },
                },
            }),
        )
    }
}

impl RemoteSource for NotionClient {
    fn collection(&self, url: &str) -> Result<SiteMetadata, RemoteError> {
        let page_id = collection::collection_page_id(url)?;
        let chunk = self.load_page_chunk(&page_id)?;
        let (collection_id, view_id) = collection::collection_pointer(&page_id, &chunk)?;
        let result = self.query_collection(&collection_id, &view_id)?;
        collection::parse_site(url, &collection_id, &result)
    }

    fn page_tree(&self, id: &str) -> Result<Value, RemoteError> {
        let chunk = self.load_page_chunk(id)?;
        tree::assemble(id, &chunk)
    }
}
