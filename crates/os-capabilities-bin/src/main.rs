use clap::Parser;
use miette::IntoDiagnostic;
use os_capabilities::{CapabilityOverrides, CapabilityResolver, HostQueries, Windows10Release};
use tracing_subscriber::{filter::LevelFilter, util::SubscriberInitExt, EnvFilter};

mod commands;

/// Reports the release and capabilities of the Windows host
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Pretend to run on the given Windows 10 release instead of detecting it
    #[clap(long, global = true, env = os_capabilities::RELEASE_OVERRIDE_ENV_VAR)]
    override_release: Option<Windows10Release>,

    /// Log more details about the queries that are issued
    #[clap(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Print every fact about the host
    Facts(commands::facts::Opt),

    /// Check a single condition, exits with a non-zero code if it does not hold
    Check(commands::check::Opt),
}

/// Entry point of the `oscap` cli.
fn main() -> miette::Result<()> {
    // Parse the command line arguments
    let cli = Cli::parse();

    // Setup default logging level
    let default_filter = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(default_filter.into())
        .from_env()
        .into_diagnostic()?;

    // Setup the tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .finish()
        .try_init()
        .into_diagnostic()?;

    let overridden;
    let resolver: &CapabilityResolver<HostQueries> = match cli.override_release {
        Some(release) => {
            overridden = CapabilityResolver::with_overrides(
                HostQueries,
                &CapabilityOverrides::with_release(release),
            )
            .into_diagnostic()?;
            &overridden
        }
        None => os_capabilities::current().into_diagnostic()?,
    };

    // Dispatch the selected command
    match cli.command {
        Commands::Facts(opt) => commands::facts::facts(resolver, opt),
        Commands::Check(opt) => {
            if !commands::check::check(resolver, opt)? {
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
