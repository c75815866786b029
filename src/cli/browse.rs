//! Interactive browse session.
//!
//! A stdin loop over the same reducer the one-shot commands use: each
//! input line parses into a command, commands dispatch `QueryAction`s
//! against the session's `QueryState`, and the pipeline re-runs and
//! re-renders after every change. The catalog is loaded once up front.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use crate::catalog::{self, ContentType, FunnelStage};
use crate::query::{run_query, QueryAction, QueryState, SortMode};

use super::render;

const HELP: &str = "\
Commands:
  <text>             search for <text> (same as /term <text>)
  /term [text]       set or clear the search term
  /type <value>      toggle a type filter (whitepaper, video, slide, infographic)
  /stage <value>     toggle a funnel stage (awareness, consideration, decision, retention)
  /industry <label>  toggle an industry filter
  /persona <label>   toggle a persona filter
  /topic <label>     toggle a topic filter
  /tag <label>       toggle a tag filter
  /year <year>       toggle a release-year filter
  /sort <mode>       relevance, newest, oldest, shortest, longest
  /page <n>          jump to a page
  /next, /prev       page forward or back
  /size <n>          set the page size
  /facets            show facet counts for the current filters
  /clear             clear every filter
  /help              show this help
  /quit              leave the session";

/// One parsed line of interactive input
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseCommand {
    /// Dispatch a reducer action
    Dispatch(QueryAction),

    /// Move one page forward (relative to the rendered page)
    NextPage,

    /// Move one page back
    PrevPage,

    /// Print facet tallies instead of cards
    ShowFacets,

    /// Print the command list
    Help,

    /// End the session
    Quit,
}

/// Run the interactive session against the given catalog source
pub async fn execute_browse(source: &str, page_size: usize) -> Result<()> {
    let outcome = catalog::load(source).await;

    if let Some(warning) = &outcome.warning {
        eprintln!("⚠️  {}", warning);
    }
    eprintln!(
        "Loaded {} items ({}). Type /help for commands, /quit to leave.",
        outcome.items.len(),
        outcome.origin
    );

    let mut state = QueryState {
        page_size: page_size.max(1),
        ..QueryState::default()
    };

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        let out = run_query(&outcome.items, &state);

        println!();
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

        print!("vitrine> ");
        io::stdout().flush().context("Failed to flush stdout")?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            // EOF ends the session like /quit
            println!();
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_command(trimmed) {
            Ok(BrowseCommand::Quit) => break,
            Ok(BrowseCommand::Help) => println!("{}", HELP),
            Ok(BrowseCommand::ShowFacets) => {
                println!("{}", render::format_tallies(&out.facets));
            }
            Ok(BrowseCommand::NextPage) => {
                state = state.apply(QueryAction::SetPage(out.page + 1));
            }
            Ok(BrowseCommand::PrevPage) => {
                state = state.apply(QueryAction::SetPage(out.page.saturating_sub(1)));
            }
            Ok(BrowseCommand::Dispatch(action)) => {
                state = state.apply(action);
            }
            Err(e) => eprintln!("⚠️  {}", e),
        }
    }

    Ok(())
}

/// Parse one non-empty line of input into a command.
///
/// Lines without a leading slash set the search term. Toggle commands
/// take the rest of the line verbatim, so labels may contain spaces.
pub fn parse_command(line: &str) -> Result<BrowseCommand> {
    if !line.starts_with('/') {
        return Ok(BrowseCommand::Dispatch(QueryAction::SetTerm(
            line.to_string(),
        )));
    }

    let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match cmd {
        "/term" => Ok(BrowseCommand::Dispatch(QueryAction::SetTerm(
            rest.to_string(),
        ))),
        "/type" => {
            let kind: ContentType = require(rest, "/type <whitepaper|video|slide|infographic>")?
                .parse()?;
            Ok(BrowseCommand::Dispatch(QueryAction::ToggleType(kind)))
        }
        "/stage" => {
            let stage: FunnelStage =
                require(rest, "/stage <awareness|consideration|decision|retention>")?.parse()?;
            Ok(BrowseCommand::Dispatch(QueryAction::ToggleStage(stage)))
        }
        "/industry" => Ok(BrowseCommand::Dispatch(QueryAction::ToggleIndustry(
            require(rest, "/industry <label>")?.to_string(),
        ))),
        "/persona" => Ok(BrowseCommand::Dispatch(QueryAction::TogglePersona(
            require(rest, "/persona <label>")?.to_string(),
        ))),
        "/topic" => Ok(BrowseCommand::Dispatch(QueryAction::ToggleTopic(
            require(rest, "/topic <label>")?.to_string(),
        ))),
        "/tag" => Ok(BrowseCommand::Dispatch(QueryAction::ToggleTag(
            require(rest, "/tag <label>")?.to_string(),
        ))),
        "/year" => Ok(BrowseCommand::Dispatch(QueryAction::ToggleYear(
            require(rest, "/year <year>")?.to_string(),
        ))),
        "/sort" => {
            let sort: SortMode =
                require(rest, "/sort <relevance|newest|oldest|shortest|longest>")?.parse()?;
            Ok(BrowseCommand::Dispatch(QueryAction::SetSort(sort)))
        }
        "/page" => {
            let page: usize = require(rest, "/page <n>")?
                .parse()
                .with_context(|| format!("Invalid page number: {}", rest))?;
            Ok(BrowseCommand::Dispatch(QueryAction::SetPage(page)))
        }
        "/size" => {
            let size: usize = require(rest, "/size <n>")?
                .parse()
                .with_context(|| format!("Invalid page size: {}", rest))?;
            Ok(BrowseCommand::Dispatch(QueryAction::SetPageSize(size)))
        }
        "/next" => Ok(BrowseCommand::NextPage),
        "/prev" => Ok(BrowseCommand::PrevPage),
        "/clear" => Ok(BrowseCommand::Dispatch(QueryAction::ClearFilters)),
        "/facets" => Ok(BrowseCommand::ShowFacets),
        "/help" => Ok(BrowseCommand::Help),
        "/quit" | "/exit" | "/q" => Ok(BrowseCommand::Quit),
        other => anyhow::bail!("Unknown command: {}. Type /help for commands", other),
    }
}

/// Reject a missing argument with a usage hint
fn require<'a>(rest: &'a str, usage: &str) -> Result<&'a str> {
    if rest.is_empty() {
        anyhow::bail!("Usage: {}", usage);
    }
    Ok(rest)
}
