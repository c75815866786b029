//! Command-line interface for vitrine.
//!
//! Provides commands for searching the catalog, browsing it
//! interactively, inspecting facets and single items, and printing
//! catalog statistics.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::catalog::{self, ContentItem, ContentType, FunnelStage, LoadOutcome};
use crate::config;
use crate::query::{run_query, QueryState, SortMode};

pub mod browse;
pub mod render;

/// vitrine - Faceted discovery over static content catalogs
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Search the catalog and print result cards
    Search {
        /// Free-text search term
        term: Vec<String>,

        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,

        /// Sort order
        #[arg(long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,

        /// Page to display (1-based)
        #[arg(long, default_value = "1")]
        page: usize,

        /// Results per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Browse the catalog interactively
    Browse {
        #[command(flatten)]
        source: SourceArgs,

        /// Results per page
        #[arg(long)]
        page_size: Option<usize>,
    },

    /// Show facet counts for the given filters
    Facets {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Show one catalog item in detail
    Show {
        /// Item id (prefix match)
        id: String,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print catalog statistics
    Stats {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Print the built-in sample catalog as JSON
    Sample,

    /// Show resolved configuration
    Config,
}

/// Where to load the catalog from
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Catalog source: an http(s) URL or a file path
    #[arg(long, env = "VITRINE_CATALOG")]
    pub catalog: Option<String>,
}

impl SourceArgs {
    /// Flag (or env) first, then the config file, then the default
    fn resolve(&self) -> Result<String> {
        match &self.catalog {
            Some(source) => Ok(source.clone()),
            None => config::catalog_source(),
        }
    }
}

/// Filter flags shared by `search` and `facets`
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Filter by content type (repeatable; OR within the dimension)
    #[arg(long = "type", value_enum)]
    pub types: Vec<TypeArg>,

    /// Filter by funnel stage (repeatable; OR within the dimension)
    #[arg(long = "stage", value_enum)]
    pub stages: Vec<StageArg>,

    /// Require an industry label (repeatable; AND within the dimension)
    #[arg(long = "industry")]
    pub industries: Vec<String>,

    /// Require a persona label (repeatable; AND)
    #[arg(long = "persona")]
    pub personas: Vec<String>,

    /// Require a topic label (repeatable; AND)
    #[arg(long = "topic")]
    pub topics: Vec<String>,

    /// Require a tag (repeatable; AND)
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    /// Filter by release year (repeatable; OR within the dimension)
    #[arg(long = "year")]
    pub years: Vec<String>,
}

impl FilterArgs {
    /// Copy the flag selections into a query state
    fn apply_to(&self, state: &mut QueryState) {
        state.types = self.types.iter().copied().map(ContentType::from).collect();
        state.stages = self.stages.iter().copied().map(FunnelStage::from).collect();
        state.industries = self.industries.iter().cloned().collect();
        state.personas = self.personas.iter().cloned().collect();
        state.topics = self.topics.iter().cloned().collect();
        state.tags = self.tags.iter().cloned().collect();
        state.years = self.years.iter().cloned().collect();
    }
}

/// Content type for CLI flags (maps to ContentType)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Whitepaper,
    Video,
    Slide,
    Infographic,
}

impl From<TypeArg> for ContentType {
    fn from(t: TypeArg) -> Self {
        match t {
            TypeArg::Whitepaper => ContentType::Whitepaper,
            TypeArg::Video => ContentType::Video,
            TypeArg::Slide => ContentType::Slide,
            TypeArg::Infographic => ContentType::Infographic,
        }
    }
}

/// Funnel stage for CLI flags (maps to FunnelStage)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StageArg {
    Awareness,
    Consideration,
    Decision,
    Retention,
}

impl From<StageArg> for FunnelStage {
    fn from(s: StageArg) -> Self {
        match s {
            StageArg::Awareness => FunnelStage::Awareness,
            StageArg::Consideration => FunnelStage::Consideration,
            StageArg::Decision => FunnelStage::Decision,
            StageArg::Retention => FunnelStage::Retention,
        }
    }
}

/// Sort order for CLI flags (maps to SortMode)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortArg {
    Relevance,
    Newest,
    Oldest,
    Shortest,
    Longest,
}

impl From<SortArg> for SortMode {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::Relevance => SortMode::Relevance,
            SortArg::Newest => SortMode::Newest,
            SortArg::Oldest => SortMode::Oldest,
            SortArg::Shortest => SortMode::Shortest,
            SortArg::Longest => SortMode::Longest,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Search {
                term,
                source,
                filters,
                sort,
                page,
                page_size,
            } => search_catalog(term.join(" "), source, filters, sort, page, page_size).await,
            Commands::Browse { source, page_size } => {
                let source = source.resolve()?;
                let page_size = resolve_page_size(page_size)?;
                browse::execute_browse(&source, page_size).await
            }
            Commands::Facets { source, filters } => show_facets(source, filters).await,
            Commands::Show { id, source } => show_item(&id, source).await,
            Commands::Stats { source } => show_stats(source).await,
            Commands::Sample => print_sample(),
            Commands::Config => show_config().await,
        }
    }
}

/// Load the catalog, echoing any fallback warning to stderr
async fn load_catalog(source: &SourceArgs) -> Result<LoadOutcome> {
    let source = source.resolve()?;
    let outcome = catalog::load(&source).await;

    if let Some(warning) = &outcome.warning {
        eprintln!("⚠️  {}", warning);
    }

    Ok(outcome)
}

/// Flag first, then the config file, floored at 1
fn resolve_page_size(flag: Option<usize>) -> Result<usize> {
    match flag {
        Some(size) => Ok(size.max(1)),
        None => config::page_size(),
    }
}

/// Run a one-shot query and print the result cards
async fn search_catalog(
    term: String,
    source: SourceArgs,
    filters: FilterArgs,
    sort: SortArg,
    page: usize,
    page_size: Option<usize>,
) -> Result<()> {
    let outcome = load_catalog(&source).await?;

    let mut state = QueryState {
        term,
        sort: sort.into(),
        page: page.max(1),
        page_size: resolve_page_size(page_size)?,
        ..QueryState::default()
    };
    filters.apply_to(&mut state);

    let out = run_query(&outcome.items, &state);

    if let Some(chips) = render::format_chips(&state) {
        println!("{}", chips);
        println!();
    }

    if out.items.is_empty() {
        println!("No results match the current filters.");
    } else {
        for item in &out.items {
            println!("{}", render::format_card(item));
            println!();
        }
    }

    println!("{}", render::format_pager(&out));

    Ok(())
}

/// Print facet tallies for the filtered set
async fn show_facets(source: SourceArgs, filters: FilterArgs) -> Result<()> {
    let outcome = load_catalog(&source).await?;

    let mut state = QueryState::default();
    filters.apply_to(&mut state);

    let out = run_query(&outcome.items, &state);

    if let Some(chips) = render::format_chips(&state) {
        println!("{}", chips);
        println!();
    }
    println!("{} of {} items match", out.total, outcome.items.len());
    println!();
    println!("{}", render::format_tallies(&out.facets));

    Ok(())
}

/// Show one item in detail, matched by id prefix
async fn show_item(id: &str, source: SourceArgs) -> Result<()> {
    let outcome = load_catalog(&source).await?;

    let item = find_item(&outcome.items, id)
        .ok_or_else(|| anyhow::anyhow!("Item not found: {}", id))?;

    println!("{}", render::format_detail(item));

    Ok(())
}

/// Find an item by id prefix match
fn find_item<'a>(items: &'a [ContentItem], id: &str) -> Option<&'a ContentItem> {
    items.iter().find(|i| i.id.starts_with(id))
}

/// Print catalog statistics
async fn show_stats(source: SourceArgs) -> Result<()> {
    let outcome = load_catalog(&source).await?;
    let out = run_query(&outcome.items, &QueryState::default());

    println!("Source: {}", outcome.origin);
    println!("Items:  {}", out.total);

    for (name, tally) in [
        ("By type", &out.facets.types),
        ("By stage", &out.facets.stages),
        ("By year", &out.facets.years),
    ] {
        if tally.is_empty() {
            continue;
        }
        println!();
        println!("{}", render::format_section(name, tally));
    }

    Ok(())
}

/// Print the built-in sample catalog as pretty JSON
fn print_sample() -> Result<()> {
    let json = serde_json::to_string_pretty(&catalog::sample_json())
        .context("Failed to render sample catalog")?;
    println!("{}", json);

    Ok(())
}

/// Show the resolved configuration
async fn show_config() -> Result<()> {
    let cfg = config::config()?;

    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("  Vitrine Configuration");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!(
        "Config file:    {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!("Catalog source: {}", cfg.catalog_source);
    println!("Page size:      {}", cfg.page_size);

    Ok(())
}
