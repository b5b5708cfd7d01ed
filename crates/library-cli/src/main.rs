use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use library_core::{Config, FilterState, LibraryAgentList, LibraryClient, LibrarySort};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    CreatedAt,
    UpdatedAt,
    Name,
}

impl From<SortArg> for LibrarySort {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::CreatedAt => LibrarySort::CreatedAt,
            SortArg::UpdatedAt => LibrarySort::UpdatedAt,
            SortArg::Name => LibrarySort::Name,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "agents")]
#[command(about = "Browse your agent library", version)]
struct Cli {
    /// Base URL of the library API (overrides library.toml)
    #[arg(long, env = "LIBRARY_API_URL", global = true)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List library agents (default command)
    List {
        /// Filter agents by search term
        #[arg(long, short)]
        search: Option<String>,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::UpdatedAt)]
        sort: SortArg,

        /// Agents per page
        #[arg(long)]
        page_size: Option<u32>,

        /// Number of pages to fetch
        #[arg(long, default_value_t = 1, conflicts_with = "all")]
        pages: u32,

        /// Fetch every page
        #[arg(long)]
        all: bool,

        /// Print the derived view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether the library API is reachable
    Status,
}

/// Hard stop for --all so a bad pagination block can't loop forever
const MAX_PAGES: usize = 1000;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::try_load().unwrap_or_else(Config::default_minimal);
    let base_url = cli.api_url.clone().unwrap_or_else(|| config.api_url());
    tracing::debug!(%base_url, "using library API");
    let client = LibraryClient::with_timeout(base_url, config.request_timeout());

    match cli.command {
        Some(Commands::Status) => status(&client).await,
        Some(Commands::List {
            search,
            sort,
            page_size,
            pages,
            all,
            json,
        }) => {
            let filter = FilterState {
                search_term: search.unwrap_or_default(),
                sort: sort.into(),
            };
            let page_size = page_size.unwrap_or(config.list.page_size);
            let max_pages = if all { MAX_PAGES } else { pages as usize };
            list(client, filter, page_size, max_pages, json).await
        }
        None => {
            list(
                client,
                FilterState::default(),
                config.list.page_size,
                1,
                false,
            )
            .await
        }
    }
}

async fn status(client: &LibraryClient) -> Result<()> {
    if client.health_check().await? {
        println!("library API is reachable");
        Ok(())
    } else {
        anyhow::bail!("library API is not reachable")
    }
}

async fn list(
    client: LibraryClient,
    filter: FilterState,
    page_size: u32,
    max_pages: usize,
    json: bool,
) -> Result<()> {
    let mut list = LibraryAgentList::new(client, filter).with_page_size(page_size);
    list.fetch_all(max_pages).await?;

    let view = list.view();

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.all_agents.is_empty() {
        println!("No agents found.");
        return Ok(());
    }

    for agent in &view.all_agents {
        let favorite = if agent.is_favorite { "*" } else { " " };
        let creator = agent.creator_name.as_deref().unwrap_or("-");
        println!(
            "{favorite} {:<36} v{:<4} {:<24} {}",
            agent.name, agent.graph_version, creator, agent.id
        );
    }

    println!();
    println!(
        "{} of {} agents{}",
        view.all_agents.len(),
        view.agent_count,
        if view.has_next_page {
            " (more available, use --all or --pages)"
        } else {
            ""
        }
    );

    Ok(())
}
