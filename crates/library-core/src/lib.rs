//! library-core: Shared library for browsing the agent library API
//!
//! Provides:
//! - Configuration loading (library.toml)
//! - Typed HTTP client for the library agents list endpoint
//! - Paginated list accessor with accumulated pages and derived views

pub mod client;
pub mod config;
pub mod query;

pub use client::{
    FetchedPage, LibraryAgent, LibraryAgentResponse, LibraryClient, LibrarySort, ListQuery,
    Pagination,
};
pub use config::Config;
pub use query::{
    flatten_agents, next_page_param, total_agent_count, valid_page, AgentListView, FilterState,
    LibraryAgentList, DEFAULT_PAGE_SIZE,
};
