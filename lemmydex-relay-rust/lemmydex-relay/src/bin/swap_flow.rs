//! Drive one quote → approve → swap pipeline against a running relay.
//!
//! ```text
//! PRIVATE_KEY=0x... RELAY_URL=http://localhost:4000 \
//!     swap_flow <sell> <buy> <amount> [--execute]
//! ```
//!
//! Tokens are catalog symbols or addresses. Without `--execute` the flow
//! stops after the quote.

use lemmydex_relay::infrastructure::logger::{LogConfig, Logger};
use lemmydex_swap_core::{
    LocalSignerWallet, RelayClient, SwapBackend, SwapConfig, SwapError, SwapOrchestrator, Token, TokenCatalog,
};
use std::env;
use std::process;
use std::sync::Arc;

const DEFAULT_RELAY_URL: &str = "http://localhost:4000";

struct Args {
    sell: String,
    buy: String,
    amount: String,
    execute: bool,
}

fn parse_args() -> Option<Args> {
    let mut positional = Vec::new();
    let mut execute = false;
    for arg in env::args().skip(1) {
        if arg == "--execute" {
            execute = true;
        } else {
            positional.push(arg);
        }
    }
    let [sell, buy, amount]: [String; 3] = positional.try_into().ok()?;
    Some(Args {
        sell,
        buy,
        amount,
        execute,
    })
}

fn resolve(catalog: &TokenCatalog, key: &str) -> Result<Token, SwapError> {
    catalog
        .find(key)
        .or_else(|| catalog.tokens().iter().find(|t| t.symbol.eq_ignore_ascii_case(key)))
        .cloned()
        .ok_or_else(|| SwapError::invalid_parameters(format!("unknown token: {}", key)))
}

async fn run(args: Args) -> Result<(), SwapError> {
    dotenv::dotenv().ok();
    let config = Arc::new(SwapConfig::from_env()?);
    let relay_url = env::var("RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
    let private_key = env::var("PRIVATE_KEY").map_err(|_| SwapError::config("PRIVATE_KEY is not set"))?;

    let backend = RelayClient::new(relay_url.as_str());
    let catalog = TokenCatalog::new(backend.tokens().await?);
    let sell = resolve(&catalog, &args.sell)?;
    let buy = resolve(&catalog, &args.buy)?;

    let wallet = LocalSignerWallet::new(&private_key, &config)?;
    let mut flow = SwapOrchestrator::new(backend, wallet, Arc::clone(&config));
    let mut states = flow.subscribe();
    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let name = *states.borrow();
            tracing::info!(state = name, "swap flow");
        }
    });

    flow.authenticate().await?;
    if let Some(balances) = flow.balances() {
        for (symbol, entry) in balances {
            match entry.as_balance() {
                Some(balance) => println!("{:>10}  {}", symbol, balance.formatted),
                None => println!("{:>10}  unavailable", symbol),
            }
        }
    }

    flow.request_quote(&sell, &buy, &args.amount).await?;
    if let Some(quoted) = flow.state().quoted() {
        println!(
            "Quote: {} {} -> {} {}",
            quoted.amount, quoted.sell.symbol, quoted.formatted_amount_out, quoted.buy.symbol
        );
    }
    if !args.execute {
        println!("Dry run; pass --execute to approve and swap.");
        return Ok(());
    }

    flow.approve().await?;
    if let Some(hash) = flow.last_tx_hash() {
        println!("Approval: {}", hash);
    }
    flow.swap().await?;
    if let Some(hash) = flow.last_tx_hash() {
        println!("Swap: {}", hash);
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let _guard = Logger::init(LogConfig {
        level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        ..LogConfig::default()
    });

    let Some(args) = parse_args() else {
        eprintln!("usage: swap_flow <sell> <buy> <amount> [--execute]");
        process::exit(2);
    };

    if let Err(e) = run(args).await {
        eprintln!("❌ {}", e);
        process::exit(1);
    }
}
