//! Library agents API client

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::config::Config;

/// Sort order accepted by the list endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LibrarySort {
    CreatedAt,
    #[default]
    UpdatedAt,
    Name,
}

/// One agent record from the library list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryAgent {
    pub id: String,
    pub graph_id: String,
    pub graph_version: u32,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub creator_name: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub updated_at: Option<String>,
}

/// Pagination metadata accompanying a page of agents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_items: u64,
}

/// Payload of a successful list response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryAgentResponse {
    #[serde(default)]
    pub agents: Vec<LibraryAgent>,
    pub pagination: Option<Pagination>,
}

/// One fetched page, tagged with the HTTP status it came back with.
///
/// `data` is present only when the response was parseable; non-2xx
/// responses and unparseable bodies carry `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub status: u16,
    pub data: Option<LibraryAgentResponse>,
}

/// Query parameters for the list endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    pub sort_by: LibrarySort,
}

impl ListQuery {
    /// Same query pointed at a different page number
    pub fn for_page(&self, page: u32) -> Self {
        Self {
            page,
            ..self.clone()
        }
    }
}

/// Library agents API client
#[derive(Debug, Clone)]
pub struct LibraryClient {
    base_url: String,
    client: reqwest::Client,
}

impl LibraryClient {
    /// Create a new client with default timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new client with an explicit per-request timeout
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// Create a client from loaded configuration
    pub fn from_config(config: &Config) -> Self {
        Self::with_timeout(config.api_url(), config.request_timeout())
    }

    /// Check if the library API is reachable
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/library/agents", self.base_url);

        match self
            .client
            .get(&url)
            .query(&[("page", 1u32), ("page_size", 1u32)])
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    /// Fetch one page of library agents.
    ///
    /// Transport failures are errors; HTTP-level failures come back as a
    /// status-tagged page with no payload, so callers can keep the page
    /// history consistent without special-casing.
    pub async fn list_agents(&self, query: &ListQuery) -> Result<FetchedPage> {
        let url = format!("{}/api/library/agents", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .context("Failed to connect to library API")?;

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            warn!(status, page = query.page, "list request failed");
            return Ok(FetchedPage { status, data: None });
        }

        let data = match resp.json::<LibraryAgentResponse>().await {
            Ok(body) => Some(body),
            Err(err) => {
                warn!(error = %err, page = query.page, "unparseable list response");
                None
            }
        };

        Ok(FetchedPage { status, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_wire_values() {
        assert_eq!(
            serde_json::to_string(&LibrarySort::CreatedAt).unwrap(),
            "\"createdAt\""
        );
        assert_eq!(
            serde_json::to_string(&LibrarySort::UpdatedAt).unwrap(),
            "\"updatedAt\""
        );
        assert_eq!(serde_json::to_string(&LibrarySort::Name).unwrap(), "\"name\"");
    }

    #[test]
    fn test_empty_search_term_is_absent() {
        let query = ListQuery {
            page: 1,
            page_size: 8,
            search_term: None,
            sort_by: LibrarySort::UpdatedAt,
        };

        let value = serde_json::to_value(&query).unwrap();
        assert!(value.get("search_term").is_none());
        assert_eq!(value["page_size"], 8);
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let body = r#"{
            "agents": [
                {"id": "a1", "graph_id": "g1", "graph_version": 3, "name": "Scraper"}
            ],
            "pagination": {"current_page": 1, "page_size": 8, "total_items": 1}
        }"#;

        let resp: LibraryAgentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.agents.len(), 1);
        assert_eq!(resp.agents[0].name, "Scraper");
        assert!(!resp.agents[0].is_favorite);
        assert!(resp.agents[0].creator_name.is_none());
    }

    #[test]
    fn test_response_without_agents_field() {
        let resp: LibraryAgentResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.agents.is_empty());
        assert!(resp.pagination.is_none());
    }
}
