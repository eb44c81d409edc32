use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lares_core::constants::{ENV_FORM_CLEAR, ENV_REST_URL, ENV_TIMEOUT_SECS};
use lares_core::{Gateway, GatewayConfig};

mod console;

use console::{parse_command, Command, Flow, Session, HELP};

/// Main entry point for the Lares admin console
///
/// Opens an interactive session against the ledger REST gateway. The session starts on the
/// `Sample` entity and loads its records, then reads one command per line until `quit` or
/// end of input.
///
/// # Environment Variables
/// - `LEDGER_REST_URL`: gateway base URL (default: "http://localhost:3000/api")
/// - `LEDGER_TIMEOUT_SECS`: per-request timeout in seconds (default: 30)
/// - `LEDGER_FORM_CLEAR`: "optimistic" (default) or "on-success"
///
/// # Returns
/// * `Ok(())` - When the session ends normally
/// * `Err(anyhow::Error)` - If configuration is invalid or stdin/stdout fail
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive("lares=info".parse()?))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = GatewayConfig::from_env_values(
        std::env::var(ENV_REST_URL).ok(),
        std::env::var(ENV_TIMEOUT_SECS).ok(),
        std::env::var(ENV_FORM_CLEAR).ok(),
    )?;
    tracing::info!("++ Lares admin console on {}", config.base_url());

    let gateway = Gateway::new(&config)?;
    let mut session = Session::new(config.clear_policy(), |kind| gateway.service(kind));

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout.write_all(format!("{HELP}\n\n").as_bytes()).await?;
    let (_, output) = session.execute(Command::List).await;
    stdout.write_all(output.as_bytes()).await?;

    loop {
        stdout
            .write_all(format!("{}> ", session.current()).as_bytes())
            .await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                stdout.write_all(format!("{err}\n").as_bytes()).await?;
                continue;
            }
        };

        let (flow, output) = session.execute(command).await;
        stdout.write_all(output.as_bytes()).await?;
        if flow == Flow::Quit {
            break;
        }
    }

    Ok(())
}
