use lemmydex_swap_core::{SwapConfig, NAME, VERSION};

fn main() {
    let config = match SwapConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    println!("{} {} configuration:\n", NAME, VERSION);
    println!("  Chain: {} ({})", config.chain_name, config.chain_id);
    println!("  RPC URL: {}", config.rpc_url);
    println!("  Trade API URL: {}", config.trade_api_url);
    println!("  Trade API key: {}", if config.trade_api_key.is_some() { "(set)" } else { "(not set)" });
    println!("  Wrapped native: {:?}", config.wrapped_native);
    println!("  Default spender: {:?}", config.default_spender);
    println!("  Native symbol: {}", config.native_symbol);
    println!("  Balance tokens: {}", config.default_balance_tokens.join(", "));
    println!("  Token list: {}", config.token_list_url.as_deref().unwrap_or("(built-in)"));
}
