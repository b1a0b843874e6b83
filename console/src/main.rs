use std::process::ExitCode;

use matfeap_channel::{Channel, Endpoint};
use matfeap_console::run_script;
use tokio::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries script output only.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matfeap_console=info,matfeap_channel=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let endpoint = match Endpoint::from_env() {
        Ok(endpoint) => endpoint,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Opening channel to {}", endpoint);
    let mut channel = match Channel::open(&endpoint).await {
        Ok(channel) => channel,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    match run_script(&mut channel, stdin, &mut stdout).await {
        Ok(executed) => {
            info!("Executed {} directives", executed);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            if let Err(e) = channel.close().await {
                error!("{}", e);
            }
            ExitCode::FAILURE
        }
    }
}
