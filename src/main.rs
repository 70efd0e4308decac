use clap::Parser;
use miette::{IntoDiagnostic, Result};
use payswitch::application::tracker::PaymentTracker;
use payswitch::config::{Config, DEFAULT_CONFIG_PATH};
use payswitch::domain::ports::ActuatorBox;
use payswitch::infrastructure::gpio::{LoggingActuator, SysfsActuator};
use payswitch::infrastructure::square::SquareTransactionSource;
use payswitch::interfaces::json::report_writer::JsonReportWriter;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Where to write the transition report. Overrides `reportPath`.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Log line writes instead of driving GPIO.
    #[arg(long)]
    dry_run: bool,

    /// Run a single poll and exit.
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            error!("Error reading {}: {}", cli.config.display(), e);
            return Err(e).into_diagnostic();
        }
    };
    info!(?config, "Configuration loaded");

    let actuator: ActuatorBox = match (&config.gpio, cli.dry_run) {
        (Some(gpio), false) => Box::new(SysfsActuator::open(gpio).await.into_diagnostic()?),
        _ => {
            info!("No GPIO in use, line writes are logged only");
            Box::new(LoggingActuator::new())
        }
    };
    let source = SquareTransactionSource::new(
        config.api_url.clone(),
        config.api_token.clone(),
        config.request_timeout(),
    )
    .into_diagnostic()?;
    let report_path = cli.report.unwrap_or_else(|| config.report_path());

    let mut tracker = PaymentTracker::new(
        Box::new(source),
        actuator,
        Box::new(JsonReportWriter::new(report_path)),
        config.poll_interval(),
    );

    if cli.once {
        let outcome = tracker.tick().await;
        info!(?outcome, "Single poll finished");
        return Ok(());
    }

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };
    tracker.run(shutdown).await;

    Ok(())
}
