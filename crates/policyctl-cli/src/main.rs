//! policyctl - manage attributes and the Key Access Server registry.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use policyctl_cli::{
    commands, output, AssumeYes, Cli, CliError, Confirmer, Console, FileConfig, Handler, Settings,
    TerminalConfirmer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.global.verbose {
        "policyctl=debug"
    } else {
        "policyctl=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&err);
            let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let file = FileConfig::discover(cli.global.config.as_deref())?;
    let settings = Settings::resolve(&cli.global, file);
    tracing::debug!(endpoint = %settings.client.endpoint, "Resolved settings");
    if settings.client.token.is_some() && !settings.client.uses_tls() {
        output::warning("Sending the bearer token over an unencrypted connection");
    }

    let handler = Handler::connect(&settings.client)?;
    let confirmer: Box<dyn Confirmer> = if settings.force {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalConfirmer)
    };

    let stdout = std::io::stdout();
    let mut console = Console::new(stdout.lock(), settings.output, confirmer);
    commands::execute(cli.command, handler, &mut console).await?;
    Ok(())
}
