//! costline - Sum cost and usage report spend over a time window

use clap::Parser;
use costline::cli::{Cli, log_directive, parse_window_bound, resolve_window};
use costline_core::{error::Result, timezone::TimezoneConfig};
use costline_loader::ReportLoader;
use costline_terminal::{format_load_summary, get_formatter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging on stderr. RUST_LOG wins over --verbose.
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter =
        tracing_subscriber::EnvFilter::try_new(log_directive(cli.verbose, rust_log.as_deref()))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let tz_config = TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.utc)?;
    info!("Using timezone: {}", tz_config.display_name());

    let since = cli
        .since
        .as_deref()
        .map(|s| parse_window_bound(s, &tz_config))
        .transpose()?;
    let until = cli
        .until
        .as_deref()
        .map(|s| parse_window_bound(s, &tz_config))
        .transpose()?;

    let show_progress = !cli.json && is_terminal::is_terminal(std::io::stderr());
    let loaded = ReportLoader::new()
        .with_hasher(cli.hash)
        .with_policy(cli.error_policy())
        .with_progress(show_progress)
        .load_path(&cli.report)
        .await?;

    if !loaded.summary.diagnostics.is_empty() {
        let colored = is_terminal::is_terminal(std::io::stderr());
        eprintln!("{}", format_load_summary(&loaded.summary, colored));
    }

    let window = resolve_window(since, until, &loaded.report)?;
    info!("Querying window {}", window);

    let aggregation = loaded
        .report
        .group_by(&cli.group_fields(), &window, cli.field_policy())?;

    let formatter = get_formatter(cli.json);
    println!("{}", formatter.format_costs(&aggregation)?);

    Ok(())
}
