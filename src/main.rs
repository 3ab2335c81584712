use anyhow::{Context, Result};
use arranque::audit::BootupTimeAudit;
use arranque::cli::{Cli, OutputFormat};
use arranque::taxonomy::Taxonomy;
use arranque::text_output::format_text_report;
use arranque::trace::TraceArtifacts;
use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_taxonomy(args: &Cli) -> Result<Taxonomy> {
    match &args.taxonomy {
        Some(path) => Taxonomy::from_toml(path),
        None => Taxonomy::default_taxonomy(),
    }
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    if args.pass.is_empty() {
        anyhow::bail!("Invalid value for --pass: pass name must not be empty");
    }

    let taxonomy = load_taxonomy(&args)?;
    let artifacts = TraceArtifacts::from_file(&args.trace)?;

    let audit = BootupTimeAudit::with_defaults(taxonomy);
    let result = audit
        .audit_pass(&artifacts, &args.pass)
        .with_context(|| format!("Boot-up audit failed for {}", args.trace.display()))?;

    match args.format {
        OutputFormat::Text => print!("{}", format_text_report(&result, audit.meta())),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
    }

    if args.check && !result.score {
        std::process::exit(1);
    }

    Ok(())
}
