use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use filters::filters::{ClanKeyRegistry, ClanRole};
use query::{FilterSession, PageRequest, RunPage, SessionConfig};
use run_store::{RunHistory, RunQuery, RunRecord, RunScope, SortDirection, SortField};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Run History - filter and page through past runs
#[derive(Parser)]
#[command(name = "run-history")]
#[command(about = "Filter and page through stored run history", long_about = None)]
struct Cli {
    /// Directory containing factions.json and runs.json
    #[arg(short, long, default_value = "data/sample")]
    data_dir: PathBuf,

    /// Optional JSON file with session settings (domains, page size)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch one page of a user's runs
    Query(QueryArgs),

    /// List the clans available to the clan filters
    Clans,

    /// Show every filter's options and current selection
    Options {
        /// Print the filter state as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(clap::Args)]
struct QueryArgs {
    /// User whose runs to list
    #[arg(long)]
    user: String,

    /// Alternate id the same user's runs may be stored under
    #[arg(long)]
    alt_user: Option<String>,

    /// Environment the runs were played in
    #[arg(long, default_value = "0")]
    env: u32,

    /// 1-indexed page number
    #[arg(long, default_value = "1")]
    page: usize,

    /// Runs per page (defaults to the config's page size)
    #[arg(long)]
    page_size: Option<usize>,

    #[arg(long, value_enum, default_value = "started-at")]
    sort: SortArg,

    #[arg(long, value_enum, default_value = "desc")]
    direction: DirectionArg,

    /// Page natively without applying any filter
    #[arg(long)]
    no_filters: bool,

    /// Any, Victory or Defeat
    #[arg(long)]
    outcome: Option<String>,

    /// Any, Standard, Challenge, Daily, Matchmaker, Custom or Shared
    #[arg(long)]
    run_kind: Option<String>,

    #[arg(long)]
    min_difficulty: Option<i64>,

    #[arg(long)]
    max_difficulty: Option<i64>,

    #[arg(long)]
    min_ring: Option<i64>,

    #[arg(long)]
    max_ring: Option<i64>,

    /// Side the first clan must have played on; the second clan takes the other
    #[arg(long, value_enum)]
    clan_role: Option<ClanRoleArg>,

    /// First clan, by display name
    #[arg(long)]
    clan: Option<String>,

    /// Second clan, by display name
    #[arg(long)]
    second_clan: Option<String>,

    /// Print the page as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    StartedAt,
    Score,
    Difficulty,
    Stages,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::StartedAt => SortField::StartedAt,
            SortArg::Score => SortField::Score,
            SortArg::Difficulty => SortField::DifficultyLevel,
            SortArg::Stages => SortField::StagesCleared,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum DirectionArg {
    Asc,
    Desc,
}

impl From<DirectionArg> for SortDirection {
    fn from(arg: DirectionArg) -> Self {
        match arg {
            DirectionArg::Asc => SortDirection::Ascending,
            DirectionArg::Desc => SortDirection::Descending,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ClanRoleArg {
    Primary,
    Either,
    Secondary,
}

impl From<ClanRoleArg> for ClanRole {
    fn from(arg: ClanRoleArg) -> Self {
        match arg {
            ClanRoleArg::Primary => ClanRole::AsPrimary,
            ClanRoleArg::Either => ClanRole::Either,
            ClanRoleArg::Secondary => ClanRole::AsSecondary,
        }
    }
}

fn main() -> Result<()> {
    // Initialize tracing. Stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };

    let start = Instant::now();
    let history = RunHistory::load_from_dir(&cli.data_dir)
        .with_context(|| format!("Failed to load run history from {}", cli.data_dir.display()))?;
    eprintln!(
        "{} Loaded {} runs in {:?}",
        "✓".green(),
        history.store.len(),
        start.elapsed()
    );

    let session = FilterSession::with_config(&history.factions, &config)
        .context("Failed to set up filters")?;

    match cli.command {
        Commands::Query(args) => handle_query(&history, session, &config, args)?,
        Commands::Clans => handle_clans(session.registry()),
        Commands::Options { json } => handle_options(&session, json)?,
    }

    Ok(())
}

fn load_config(path: &Path) -> Result<SessionConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid config {}", path.display()))
}

/// Handle the 'query' command
fn handle_query(
    history: &RunHistory,
    mut session: FilterSession,
    config: &SessionConfig,
    args: QueryArgs,
) -> Result<()> {
    apply_filter_args(&mut session, &args)?;
    tracing::debug!("Active filters: {:?}", session.filter_set().filter_names());

    let mut scope = RunScope::new(&args.user, args.env);
    if let Some(alt) = &args.alt_user {
        scope = scope.with_alt_user(alt);
    }
    let query = RunQuery::new(scope).sorted_by(args.sort.into(), args.direction.into());
    let request = PageRequest::new(args.page, args.page_size.unwrap_or(config.page_size))?;

    let page = session
        .run_query(&history.store, &query, request)
        .context("Query failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        print_page(&page, request.offset(), session.registry());
    }
    Ok(())
}

fn apply_filter_args(session: &mut FilterSession, args: &QueryArgs) -> Result<()> {
    session.set_active(!args.no_filters);

    if let Some(label) = &args.outcome {
        session
            .set_outcome_label(label)
            .with_context(|| format!("Bad --outcome '{label}'"))?;
    }
    if let Some(label) = &args.run_kind {
        session
            .set_run_kind_label(label)
            .with_context(|| format!("Bad --run-kind '{label}'"))?;
    }
    if let Some(value) = args.min_difficulty {
        session.set_difficulty_min(value);
    }
    if let Some(value) = args.max_difficulty {
        session.set_difficulty_max(value);
    }
    if let Some(value) = args.min_ring {
        session.set_ring_min(value);
    }
    if let Some(value) = args.max_ring {
        session.set_ring_max(value);
    }
    if let Some(role) = args.clan_role {
        session.set_clan_role(role.into());
    }
    if let Some(label) = &args.clan {
        session
            .set_primary_clan_label(label)
            .with_context(|| format!("Bad --clan '{label}'"))?;
    }
    if let Some(label) = &args.second_clan {
        session
            .set_secondary_clan_label(label)
            .with_context(|| format!("Bad --second-clan '{label}'"))?;
    }
    Ok(())
}

/// Handle the 'clans' command
fn handle_clans(registry: &ClanKeyRegistry) {
    println!("{}", "Clans:".bold().blue());
    for (index, name) in registry.options().iter().enumerate() {
        println!("  {} {}", format!("{index:>2}.").green(), name);
    }
}

/// Handle the 'options' command
fn handle_options(session: &FilterSession, json: bool) -> Result<()> {
    let state = session.state();
    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    println!("{}", "Filter options:".bold().blue());
    println!("{}Outcome: {}", "• ".green(), state.outcome.options.join(" / "));
    println!("{}Run kind: {}", "• ".green(), state.run_kind.options.join(" / "));
    println!(
        "{}Difficulty: {}..={}",
        "• ".green(),
        state.difficulty.domain.0,
        state.difficulty.domain.1
    );
    println!("{}Ring: {}..={}", "• ".green(), state.ring.domain.0, state.ring.domain.1);
    println!("{}Clan role: {}", "• ".green(), state.clan_role.options.join(" / "));
    println!("{}Clans: {}", "• ".green(), state.primary_clan.options.join(", "));
    println!(
        "{}Second clan picker: {} (first clan is {})",
        "• ".cyan(),
        state.secondary_clan_label,
        state.clan_role.selected_label()
    );
    Ok(())
}

fn clan_name(registry: &ClanKeyRegistry, faction_id: Option<&str>) -> String {
    match faction_id {
        None | Some("") => "-".to_string(),
        Some(id) => registry
            .lookup(id)
            .and_then(|key| registry.name(key))
            .unwrap_or(id)
            .to_string(),
    }
}

fn print_run(position: usize, run: &RunRecord, registry: &ClanKeyRegistry) {
    let outcome = if run.won {
        "Victory".green()
    } else {
        "Defeat".red()
    };
    println!(
        "{}. {} {} [{}] difficulty {} ring {} - {} / {}",
        position.to_string().green(),
        run.id.bold(),
        outcome,
        run.category().label(),
        run.difficulty_level,
        run.ring_reached(),
        clan_name(registry, run.primary_faction_id.as_deref()),
        clan_name(registry, run.secondary_faction_id.as_deref()),
    );
}

/// Helper function to format and print one page of runs
fn print_page(page: &RunPage, offset: usize, registry: &ClanKeyRegistry) {
    println!(
        "{}",
        format!(
            "Runs (page {} of {}, {} matching):",
            page.page, page.page_count, page.total
        )
        .bold()
        .blue()
    );
    if page.records.is_empty() {
        println!("  {}", "No runs match".yellow());
        return;
    }

    for (i, run) in page.records.iter().enumerate() {
        print_run(offset + i + 1, run, registry);
    }
}
