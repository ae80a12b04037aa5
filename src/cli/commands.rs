use std::collections::HashSet;
use std::ops::ControlFlow;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};

use crate::filters::parser::parse_query;
use crate::filters::spec::{DayZone, FilterSpec, parse_day};
use crate::models::CommitRecord;
use crate::parsers::to_export_line;
use crate::provider::{DEFAULT_PAGE_SIZE, LazyFilteredProvider, ProviderConfig};
use crate::sources::{GitSource, JsonlSource, PagedSource};
use crate::utils::get_repo_dir;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const AUTHOR_COLUMN_WIDTH: usize = 32;

#[derive(Parser)]
#[command(name = "commit-browser")]
#[command(version = "0.1.0")]
#[command(about = "Browse and filter git commit history page by page", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Do not print the scan summary to stderr
    #[arg(long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args)]
pub struct SourceArgs {
    /// Git repository to browse (defaults to $COMMIT_BROWSER_REPO, then the current directory)
    #[arg(long, global = true)]
    pub repo: Option<PathBuf>,

    /// Read commits from a JSON-lines export instead of a repository
    #[arg(long, global = true)]
    pub jsonl: Option<PathBuf>,

    /// Number of commits requested from the source per page
    #[arg(long, global = true, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
}

#[derive(Args)]
pub struct FilterArgs {
    /// Filter query, e.g. 'author:jane topic:"fix crash" since:2024-01-01'
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Author name or email contains this text (case-insensitive)
    #[arg(long, global = true)]
    pub author: Option<String>,

    /// Commit subject contains this text (case-insensitive)
    #[arg(long, global = true)]
    pub topic: Option<String>,

    /// Authored on or after this day (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date_arg)]
    pub since: Option<NaiveDate>,

    /// Authored no later than the start of this day (YYYY-MM-DD)
    #[arg(long, global = true, value_parser = parse_date_arg)]
    pub until: Option<NaiveDate>,

    /// Start days at midnight UTC instead of local midnight
    #[arg(long, global = true)]
    pub utc: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List a page of matching commits
    List {
        /// Number of matching commits to skip
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Maximum number of commits to print
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Print commits in the JSON-lines export format
        #[arg(long)]
        json: bool,
    },
    /// Count matching commits
    Count,
    /// Show statistics about matching commits
    Stats,
    /// Show full details of one commit
    Show {
        /// Commit id or unique prefix
        id: String,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let source = open_source(&cli.source)?;
    let provider = LazyFilteredProvider::with_config(
        source,
        ProviderConfig { page_size: cli.source.page_size },
    )?;

    match command {
        Commands::List { offset, limit, json } => {
            provider.set_filter(build_filter(&cli.filter)?);
            list_commits(&provider, *offset, *limit, *json)?;
        }
        Commands::Count => {
            provider.set_filter(build_filter(&cli.filter)?);
            show_count(&provider)?;
        }
        Commands::Stats => {
            provider.set_filter(build_filter(&cli.filter)?);
            show_stats(&provider)?;
        }
        Commands::Show { id } => show_commit(&provider, id)?,
    }

    if !cli.quiet {
        if let Some(scan) = provider.last_scan() {
            eprintln!(
                "Scanned {} source records in {} pages, {} matched",
                scan.source_records, scan.pages, scan.matched
            );
        }
    }

    Ok(())
}

fn open_source(args: &SourceArgs) -> Result<Box<dyn PagedSource>> {
    match (&args.jsonl, &args.repo) {
        (Some(_), Some(_)) => bail!("--repo and --jsonl cannot be used together"),
        (Some(path), None) => Ok(Box::new(JsonlSource::open(path)?)),
        (None, repo) => {
            let repo_dir = get_repo_dir(repo.as_deref())?;
            Ok(Box::new(GitSource::open(&repo_dir)?))
        }
    }
}

/// Combine `--filter` with the individual flags; flags win
pub fn build_filter(args: &FilterArgs) -> Result<FilterSpec> {
    let base = match &args.filter {
        Some(query) => parse_query(query).with_context(|| format!("Invalid filter: {}", query))?,
        None => FilterSpec::new(),
    };

    let mut spec = base;
    if let Some(author) = &args.author {
        spec = spec.with_primary_text(Some(author.as_str()));
    }
    if let Some(topic) = &args.topic {
        spec = spec.with_secondary_text(Some(topic.as_str()));
    }
    if args.since.is_some() {
        spec = spec.with_start_date(args.since);
    }
    if args.until.is_some() {
        spec = spec.with_end_date(args.until);
    }
    if args.utc {
        spec = spec.with_day_zone(DayZone::utc());
    }

    Ok(spec)
}

fn parse_date_arg(value: &str) -> std::result::Result<NaiveDate, String> {
    parse_day(value).ok_or_else(|| format!("invalid date '{}' (expected YYYY-MM-DD)", value))
}

fn list_commits<S: PagedSource>(
    provider: &LazyFilteredProvider<S>,
    offset: usize,
    limit: usize,
    json: bool,
) -> Result<()> {
    let records = provider.fetch_page(offset, limit)?;

    if json {
        for record in &records {
            println!("{}", to_export_line(record)?);
        }
        return Ok(());
    }

    for record in &records {
        println!("{}", format_row(record));
    }
    if records.is_empty() {
        println!("No matching commits");
    }

    Ok(())
}

fn format_row(record: &CommitRecord) -> String {
    let author: String = record.primary_text.chars().take(AUTHOR_COLUMN_WIDTH).collect();
    format!(
        "{}  {}  {:<width$}  {:>6}  {}",
        record.short_id(),
        record.author_time.format("%Y-%m-%d %H:%M"),
        author,
        record.magnitude,
        record.secondary_text,
        width = AUTHOR_COLUMN_WIDTH
    )
}

fn show_count<S: PagedSource>(provider: &LazyFilteredProvider<S>) -> Result<()> {
    let matching = provider.count()?;
    let total = provider.source_total()?;

    println!("Matching commits: {}", matching);
    println!("Total commits: {}", total);

    Ok(())
}

fn show_stats<S: PagedSource>(provider: &LazyFilteredProvider<S>) -> Result<()> {
    let mut authors = HashSet::new();
    let mut lines_changed: u64 = 0;
    let mut oldest: Option<DateTime<Utc>> = None;
    let mut newest: Option<DateTime<Utc>> = None;

    let scan = provider.for_each_match(|record| {
        lines_changed += record.magnitude;
        oldest = Some(oldest.map_or(record.author_time, |t| t.min(record.author_time)));
        newest = Some(newest.map_or(record.author_time, |t| t.max(record.author_time)));
        authors.insert(record.primary_text);
        ControlFlow::Continue(())
    })?;

    println!("Commit History Statistics");
    println!("=========================");
    println!("Matching commits: {}", scan.matched);
    println!("Total commits: {}", provider.source_total()?);
    println!("Distinct authors: {}", authors.len());
    println!("Lines changed: {}", lines_changed);

    if let Some(oldest) = oldest {
        println!("Oldest commit: {}", oldest.format(TIMESTAMP_FORMAT));
    }
    if let Some(newest) = newest {
        println!("Newest commit: {}", newest.format(TIMESTAMP_FORMAT));
    }

    Ok(())
}

fn show_commit<S: PagedSource>(provider: &LazyFilteredProvider<S>, prefix: &str) -> Result<()> {
    let prefix = prefix.to_lowercase();
    if prefix.is_empty() {
        bail!("Commit id cannot be empty");
    }

    let mut found: Vec<CommitRecord> = Vec::new();
    provider.for_each_match(|record| {
        if record.id.to_lowercase().starts_with(&prefix) {
            found.push(record);
            if found.len() > 1 {
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    })?;

    let record = match found.len() {
        0 => bail!("No commit matches '{}'", prefix),
        1 => &found[0],
        _ => bail!("Commit id '{}' is ambiguous", prefix),
    };

    println!("commit {}", record.id);
    println!("Author:           {}", record.primary_text);
    println!("Author Timestamp: {}", record.author_time.format(TIMESTAMP_FORMAT));
    println!("Commit Timestamp: {}", record.commit_time.format(TIMESTAMP_FORMAT));
    println!("Size:             {} lines", record.magnitude);
    println!();
    for line in record.normalized_message().lines() {
        println!("    {}", line);
    }

    Ok(())
}
