//! FX CLI
//!
//! Command-line interface for the FX gateway API.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use fx_client::FxClient;
use fx_types::CurrencyCode;

#[derive(Parser)]
#[command(name = "fx")]
#[command(author, version, about = "FX gateway CLI client", long_about = None)]
struct Cli {
    /// Base URL of the FX gateway
    #[arg(long, env = "FX_API_URL", default_value = "http://localhost:3000")]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check API health
    Health,
    /// Latest rates for a base currency
    Rates {
        /// Base currency (e.g. USD)
        base: String,
    },
    /// Convert an amount
    Convert {
        #[arg(long)]
        amount: Decimal,
        #[arg(long)]
        from: String,
        /// Target currency; every convertible currency when omitted
        #[arg(long)]
        to: Option<String>,
    },
    /// Historical rates over a date window
    History {
        /// Base currency (e.g. USD)
        base: String,
        /// First day, yyyy-mm-dd
        #[arg(long)]
        from: NaiveDate,
        /// Last day, yyyy-mm-dd
        #[arg(long)]
        to: NaiveDate,
        #[arg(long, default_value = "90")]
        page_size: u32,
        #[arg(long, default_value = "1")]
        page: u32,
        /// Follow next-page links and print every page merged
        #[arg(long, conflicts_with = "page")]
        all: bool,
    },
}

fn parse_currency(s: &str) -> Result<CurrencyCode> {
    s.parse()
        .map_err(|_| anyhow::anyhow!("Invalid currency: {}. Expected a three-letter code", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let client = FxClient::new(&cli.api_url);

    match cli.command {
        Commands::Health => {
            let healthy = client.health().await?;
            if healthy {
                println!("✓ API is healthy");
            } else {
                println!("✗ API is not healthy");
                std::process::exit(1);
            }
        }

        Commands::Rates { base } => {
            let base = parse_currency(&base)?;
            let snapshot = client.exchange_rates(&base).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }

        Commands::Convert { amount, from, to } => {
            let from = parse_currency(&from)?;
            let to = to.as_deref().map(parse_currency).transpose()?;
            let result = client.convert(amount, &from, to.as_ref()).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }

        Commands::History {
            base,
            from,
            to,
            page_size,
            page,
            all,
        } => {
            let base = parse_currency(&base)?;
            let response = if all {
                client
                    .historical_rates_all(&base, from, to, page_size)
                    .await?
            } else {
                client
                    .historical_rates(&base, from, to, page_size, page)
                    .await?
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_history_all() {
        let cli = Cli::try_parse_from([
            "fx", "history", "usd", "--from", "2024-01-01", "--to", "2024-06-30", "--all",
        ])
        .unwrap();

        match cli.command {
            Commands::History { base, all, page_size, .. } => {
                assert_eq!(parse_currency(&base).unwrap().as_str(), "USD");
                assert!(all);
                assert_eq!(page_size, 90);
            }
            _ => panic!("expected history command"),
        }
    }

    #[test]
    fn test_parse_convert_decimal_amount() {
        let cli =
            Cli::try_parse_from(["fx", "convert", "--amount", "12.50", "--from", "EUR"]).unwrap();

        match cli.command {
            Commands::Convert { amount, to, .. } => {
                assert_eq!(amount, Decimal::new(1250, 2));
                assert!(to.is_none());
            }
            _ => panic!("expected convert command"),
        }
    }
}
