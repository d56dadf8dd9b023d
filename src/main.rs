use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use drsr::DrsClient;
use drsr::config::{Command, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing; logs go to stderr so stdout stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = match &config.token {
        Some(token) => DrsClient::with_token(token.clone())?,
        None => DrsClient::new()?,
    };

    match config.command {
        Command::Info { uri } => {
            let object = client.info(&uri)?;
            println!("{}", serde_json::to_string_pretty(&object)?);
        }
        Command::Ls { uri } => {
            for name in client.ls(&uri)? {
                println!("{name}");
            }
        }
        Command::Cat { uri } => {
            let mut reader = client.open(&uri)?;
            let mut stdout = std::io::stdout().lock();
            std::io::copy(&mut reader, &mut stdout)?;
            stdout.flush()?;
        }
        Command::Dump { uri, output } => {
            let path = match output {
                Some(path) => path,
                // Default to the server-side object name, like the DRS
                // info document suggests
                None => {
                    let object = client.info(&uri)?;
                    PathBuf::from(object.name.unwrap_or(object.id))
                }
            };
            client.dump(&uri, &path)?;
            tracing::info!(uri = %uri, path = %path.display(), "download complete");
        }
    }

    Ok(())
}
