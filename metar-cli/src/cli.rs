use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::Password;
use metar_core::{Config, Delimiter, WeatherService};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "metar", version, about = "Current METAR observations from CheckWX")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the CheckWX API key and service settings.
    Configure {
        /// Override the API base URL.
        #[arg(long)]
        base_url: Option<String>,

        /// Reuse the last result for repeated identical queries.
        #[arg(long)]
        use_cache: Option<bool>,
    },

    /// Show current weather for one or more stations.
    Show {
        /// Comma-separated ICAO identifiers, e.g. "KMHR,KMCC,KAUN,KPVF".
        stations: String,

        /// Print only the raw METAR lines.
        #[arg(long, conflicts_with = "json")]
        raw: bool,

        /// Separator for `--raw` output.
        #[arg(long, value_enum, default_value_t = DelimiterArg::Comma)]
        delimiter: DelimiterArg,

        /// Print decoded station records as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the location of the configuration file.
    ConfigPath,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DelimiterArg {
    Comma,
    Newlines,
}

impl From<DelimiterArg> for Delimiter {
    fn from(arg: DelimiterArg) -> Self {
        match arg {
            DelimiterArg::Comma => Delimiter::Comma,
            DelimiterArg::Newlines => Delimiter::TripleNewline,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { base_url, use_cache } => configure(base_url, use_cache),
            Command::Show { stations, raw, delimiter, json } => {
                show(&stations, raw.then_some(delimiter.into()), json).await
            }
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

fn configure(base_url: Option<String>, use_cache: Option<bool>) -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("CheckWX API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    cfg.set_api_key(api_key.trim().to_string());

    if let Some(url) = base_url {
        cfg.base_url = url;
    }
    if let Some(flag) = use_cache {
        cfg.use_cache = flag;
    }

    cfg.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(stations: &str, raw: Option<Delimiter>, json: bool) -> anyhow::Result<()> {
    let cfg = Config::load()?;
    let service = Arc::new(WeatherService::new(cfg.service_config()?));

    let outcome = if json {
        match service.fetch_records(stations).await {
            Ok(records) => Ok(serde_json::to_string_pretty(&records)?),
            Err(err) => Err(err),
        }
    } else if let Some(delimiter) = raw {
        service.request_raw(stations, delimiter).await
    } else {
        let (tx, rx) = tokio::sync::oneshot::channel();
        let handle = service.spawn_request(stations, move |result| {
            let _ = tx.send(result);
        });
        handle.join().await;
        rx.await.context("weather request ended without a result")?
    };

    match outcome {
        Ok(text) => {
            print!("{text}");
            if !text.ends_with('\n') {
                println!();
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!(kind = %err.kind(), error = %err, "weather request failed");
            anyhow::bail!("{}", err.user_message())
        }
    }
}
