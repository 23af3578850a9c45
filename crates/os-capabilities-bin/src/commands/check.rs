use miette::IntoDiagnostic;
use os_capabilities::{CapabilityResolver, NativeQueries, Windows10Release};

/// Which condition to check.
#[derive(Debug, clap::Subcommand)]
pub enum Condition {
    /// Whether the OS is at least the given Windows 10 release (name like `October2018` or rank
    /// like `1809`)
    AtLeast { release: Windows10Release },

    /// Whether the OS is at least the given family (`Win7`, `Win8`, `Win81`, `Win10`, ...)
    Since { family: String },
}

#[derive(Debug, clap::Parser)]
pub struct Opt {
    #[command(subcommand)]
    condition: Condition,
}

/// Prints whether the condition holds and returns it.
pub fn check<Q: NativeQueries>(resolver: &CapabilityResolver<Q>, opt: Opt) -> miette::Result<bool> {
    let holds = match opt.condition {
        Condition::AtLeast { release } => resolver.is_at_least(release),
        Condition::Since { family } => resolver.is_since_named(&family),
    }
    .into_diagnostic()?;
    println!("{holds}");
    Ok(holds)
}
