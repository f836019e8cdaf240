use clap::{Parser, Subcommand};
use conflux_cli::commands::{self, FilterArgs};
use conflux_cli::{CliContext, logging, readline};
use std::io::Write;

/// Startup arguments (the REPL parses its own lines with [`Cli`]).
#[derive(Parser)]
#[command(version, about = "Explore a conflict-event dataset")]
struct Args {
    /// Dataset to load at startup; overrides `data_path` from the config
    #[arg(short, long)]
    data: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();
    let _log_guard = logging::init();
    let ctx = CliContext::new();

    let startup = match args.data {
        Some(path) => Some(path),
        None => ctx.config.read().await.data_path.clone(),
    };
    if let Some(path) = startup
        && let Err(err) = commands::load(&path, &ctx).await
    {
        tracing::warn!(path = %path, error = %err.trim_end(), "Startup dataset not loaded");
    }

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "conflux")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a CSV or JSON dataset, replacing the current one
    Load {
        #[arg(short, long)]
        path: String,
    },
    /// List matching events
    Filter {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Country rollups, most casualties first
    Countries {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(short, long, default_value_t = 25)]
        limit: usize,
    },
    Years {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Year x month casualty grid
    Months {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Month-of-year totals across all years
    Seasons {
        #[command(flatten)]
        filter: FilterArgs,
    },
    Types {
        #[command(flatten)]
        filter: FilterArgs,
    },
    Regions {
        #[command(flatten)]
        filter: FilterArgs,
    },
    Factions {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(short, long, default_value_t = 25)]
        limit: usize,
    },
    /// Faction dyad graph
    Graph {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(short, long, default_value_t = 1)]
        min_events: usize,
        #[arg(long)]
        json: bool,
    },
    /// Deadliest events
    Top {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(short)]
        n: Option<usize>,
    },
    Overview {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Drill down into a country, faction or event
    Select {
        #[command(subcommand)]
        target: SelectTarget,
    },
    Back,
    /// Set the time slider; no argument clears it
    Year { year: Option<i32> },
    /// Toggle a region in the active region set
    Region { name: String },
    /// Set the violence-type filter; no argument clears it
    ViolenceType { name: Option<String> },
    View,
    Cache,
    ClearCache,
    Config,
    Exit,
}

#[derive(Subcommand)]
enum SelectTarget {
    Country { name: String },
    Faction { name: String },
    Event { index: u32 },
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting\n")?;
    args.insert(0, "conflux".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Load { path }) => commands::load(path, ctx).await?,
        Some(Commands::Filter { filter, limit }) => commands::filter(filter, *limit, ctx).await?,
        Some(Commands::Countries { filter, limit }) => {
            commands::countries(filter, *limit, ctx).await?
        }
        Some(Commands::Years { filter }) => commands::years(filter, ctx).await?,
        Some(Commands::Months { filter }) => commands::months(filter, ctx).await?,
        Some(Commands::Seasons { filter }) => commands::seasons(filter, ctx).await?,
        Some(Commands::Types { filter }) => commands::violence_types(filter, ctx).await?,
        Some(Commands::Regions { filter }) => commands::regions(filter, ctx).await?,
        Some(Commands::Factions { filter, limit }) => {
            commands::factions(filter, *limit, ctx).await?
        }
        Some(Commands::Graph {
            filter,
            min_events,
            json,
        }) => commands::graph(filter, *min_events, *json, ctx).await?,
        Some(Commands::Top { filter, n }) => commands::top(filter, *n, ctx).await?,
        Some(Commands::Overview { filter }) => commands::overview(filter, ctx).await?,
        Some(Commands::Select { target }) => match target {
            SelectTarget::Country { name } => commands::select_country(name, ctx).await?,
            SelectTarget::Faction { name } => commands::select_faction(name, ctx).await?,
            SelectTarget::Event { index } => commands::select_event(*index, ctx).await?,
        },
        Some(Commands::Back) => commands::back(ctx).await?,
        Some(Commands::Year { year }) => commands::set_year(*year, ctx).await?,
        Some(Commands::Region { name }) => commands::toggle_region(name, ctx).await?,
        Some(Commands::ViolenceType { name }) => {
            commands::set_violence_type(name.clone(), ctx).await?
        }
        Some(Commands::View) => commands::show_view(ctx).await?,
        Some(Commands::Cache) => commands::cache_stats(ctx).await?,
        Some(Commands::ClearCache) => commands::clear_cache(ctx).await?,
        Some(Commands::Config) => commands::show_config(ctx).await?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
