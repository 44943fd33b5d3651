//! Census scenarios for the `trackable` capability.
//!
//! Installs a [`census::CensusTracker`] as the process-wide default, runs a
//! scenario that constructs and drops tracked objects, and dumps the
//! resulting per-type census as JSON.

use std::sync::Arc;

use facet::Facet;
use figue as args;
use trackable::TrackerRef;

mod census;
mod scenarios;

type AnyResult<T> = Result<T, String>;

#[derive(Facet, Debug)]
struct Cli {
    #[facet(flatten)]
    builtins: args::FigueBuiltins,
    /// How many allocation waves the scenario runs.
    #[facet(args::named, default)]
    waves: Option<u64>,
    #[facet(args::subcommand)]
    command: CommandKind,
}

#[derive(Facet, Debug)]
#[repr(u8)]
enum CommandKind {
    /// Construct-and-drop waves; every allocation ends up retired.
    Churn,
    /// Park objects in a leaked collection; the census shows them live.
    Leak,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> AnyResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = parse_cli()?;
    let waves = cli.waves.unwrap_or(3);

    let census = Arc::new(census::CensusTracker::default());
    trackable::set_global_tracker(TrackerRef::Tracker(census.clone()));

    match cli.command {
        CommandKind::Churn => scenarios::churn::run(waves),
        CommandKind::Leak => scenarios::leak::run(waves),
    }

    let snapshot = census.snapshot();
    let json =
        facet_json::to_vec(&snapshot).map_err(|e| format!("failed to serialize census: {e}"))?;
    let json =
        String::from_utf8(json).map_err(|e| format!("census dump was not valid utf-8: {e}"))?;
    println!("{json}");

    Ok(())
}

fn parse_cli() -> AnyResult<Cli> {
    let figue_config = args::builder::<Cli>()
        .map_err(|e| format!("failed to build CLI schema: {e}"))?
        .cli(|cli| cli.strict())
        .help(|h| {
            h.program_name("trackable-examples")
                .description("Run trackable census scenarios as subcommands")
                .version(option_env!("CARGO_PKG_VERSION").unwrap_or("dev"))
        })
        .build();

    args::Driver::new(figue_config)
        .run()
        .into_result()
        .map(|v| v.value)
        .map_err(|e| e.to_string())
}
