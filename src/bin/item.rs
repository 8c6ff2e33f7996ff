//! Item construction CLI.
//!
//! Builds a single item from command-line arguments and prints it as JSON.
//!
//! # Usage
//! ```text
//! item <command> <args...> [OPTIONS]
//! ```
//!
//! # Commands
//! - `address <addr>`: wrap an address unchanged
//! - `identity --pubkey <hex>`: identity from a public key
//! - `identity --address <addr>`: identity from an address's lock args
//! - `record <tx_hash> <index> --address <addr>`: record owned by an address
//! - `record <tx_hash> <index> --script <code_hash> <hash_type> <args>`:
//!   record owned by a script (`hash_type` is `data`, `type`, `data1` or `data2`)
//!
//! # Options
//! - `-n, --network <mainnet|testnet>`: only accept addresses of this network
//! - `--pretty`: pretty-print the JSON output
//! - `--no-timestamp`: omit timestamps from log lines
//! - `-q, --quiet`: only log warnings and errors
//!
//! The network may also be set through the `CKB_NETWORK` environment
//! variable; the flag takes precedence.

use ckb_item::types::hex::{self, HexError};
use ckb_item::utils::log::{Level, SHOW_TIMESTAMP, set_min_level};
use ckb_item::{
    AddressError, AddressParser, H256, Item, ItemError, Network, OutPoint, Script,
    ScriptHashType, error, info, warn,
};
use std::env;
use std::process;
use std::sync::atomic::Ordering;
use thiserror::Error;

const NETWORK_ENV: &str = "CKB_NETWORK";

/// Options shared by every command.
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    network: Option<Network>,
    pretty: bool,
    quiet: bool,
    no_timestamp: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Network(AddressError),
    #[error(transparent)]
    Item(#[from] ItemError),
}

impl From<HexError> for CliError {
    fn from(e: HexError) -> Self {
        CliError::Item(e.into())
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let (positional, options) =
        split_options(&args[2..], env::var(NETWORK_ENV).ok()).unwrap_or_else(|e| {
            error!("{}", e);
            process::exit(1);
        });
    if options.no_timestamp {
        SHOW_TIMESTAMP.store(false, Ordering::Relaxed);
    }
    if options.quiet {
        set_min_level(Level::Warn);
    }

    let parser = match options.network {
        Some(network) => {
            info!("Accepting {} addresses only", network);
            AddressParser::for_network(network)
        }
        None => AddressParser::new(),
    };

    let item = build(&args[1], &parser, &positional).unwrap_or_else(|e| {
        match e {
            CliError::UnknownCommand(_) => {
                error!("{}\n", e);
                print_usage(&args[0]);
            }
            CliError::Usage(_) => error!("{}", e),
            _ => error!("Failed to build item: {}", e),
        }
        process::exit(1);
    });

    match render(&item, options.pretty) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!("Failed to serialize item: {}", e);
            process::exit(1);
        }
    }
}

/// Separates global options from command arguments.
///
/// `env_network` is the value of `CKB_NETWORK`, used when no flag is given.
fn split_options(
    args: &[String],
    env_network: Option<String>,
) -> Result<(Vec<String>, Options), CliError> {
    let mut positional = Vec::new();
    let mut options = Options::default();
    let mut network_flag: Option<String> = None;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            k @ ("--network" | "-n") => {
                i += 1;
                let Some(name) = args.get(i) else {
                    return Err(CliError::Usage(format!("{k} requires an argument")));
                };
                network_flag = Some(name.clone());
            }
            "--pretty" => options.pretty = true,
            "--no-timestamp" => options.no_timestamp = true,
            "--quiet" | "-q" => options.quiet = true,
            _ => positional.push(args[i].clone()),
        }
        i += 1;
    }

    if let Some(name) = network_flag.or(env_network) {
        options.network = Some(name.parse().map_err(CliError::Network)?);
    }

    Ok((positional, options))
}

fn build(command: &str, parser: &AddressParser, args: &[String]) -> Result<Item, CliError> {
    match command {
        "address" => build_address(args),
        "identity" => build_identity(parser, args),
        "record" => build_record(parser, args),
        other => Err(CliError::UnknownCommand(other.to_string())),
    }
}

fn build_address(args: &[String]) -> Result<Item, CliError> {
    let [addr] = args else {
        return Err(usage("address takes exactly one argument"));
    };
    if addr.is_empty() {
        warn!("Building an address item from an empty string");
    }
    Ok(Item::address(addr.as_str()))
}

fn build_identity(parser: &AddressParser, args: &[String]) -> Result<Item, CliError> {
    let item = match args {
        [flag, pub_key] if flag == "--pubkey" => Item::identity_by_ckb(pub_key)?,
        [flag, address] if flag == "--address" => Item::identity_by_address_with(parser, address)?,
        _ => return Err(usage("identity takes --pubkey <hex> or --address <addr>")),
    };
    Ok(item)
}

fn build_record(parser: &AddressParser, args: &[String]) -> Result<Item, CliError> {
    let [tx_hash, index, rest @ ..] = args else {
        return Err(usage("record takes <tx_hash> <index> followed by an owner"));
    };
    let tx_hash: H256 = tx_hash.parse()?;
    let index: u32 = index
        .parse()
        .map_err(|_| usage(&format!("invalid output index: '{}'", index)))?;
    let point = OutPoint::new(tx_hash, index);

    match rest {
        [flag, address] if flag == "--address" => {
            // A pinned network rejects foreign addresses; otherwise the text is stored as given.
            if let Err(e) = parser.parse(address) {
                if parser.network().is_some() {
                    return Err(ItemError::AddressParse(e).into());
                }
                warn!("Address does not parse ({}), storing it as given", e);
            }
            Ok(Item::record_by_address(&point, address))
        }
        [flag, code_hash, hash_type, script_args] if flag == "--script" => {
            let code_hash: H256 = code_hash.parse()?;
            let hash_type: ScriptHashType =
                hash_type.parse().map_err(|e| usage(&format!("{}", e)))?;
            let script = Script::new(code_hash, hash_type, hex::decode(script_args)?);
            Ok(Item::record_by_script(&point, &script)?)
        }
        _ => Err(usage(
            "record owner must be --address <addr> or --script <code_hash> <hash_type> <args>",
        )),
    }
}

fn render(item: &Item, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(item)
    } else {
        serde_json::to_string(item)
    }
}

fn usage(message: &str) -> CliError {
    CliError::Usage(message.to_string())
}

fn print_usage(program: &str) {
    eprintln!(
        "Usage: {} <command> <args...> [OPTIONS]\n\n\
         Commands:\n\
         \x20 address <addr>\n\
         \x20 identity --pubkey <hex>\n\
         \x20 identity --address <addr>\n\
         \x20 record <tx_hash> <index> --address <addr>\n\
         \x20 record <tx_hash> <index> --script <code_hash> <hash_type> <args>\n\n\
         Options:\n\
         \x20 -n, --network <mainnet|testnet>  Only accept addresses of this network\n\
         \x20 --pretty                         Pretty-print the JSON output\n\
         \x20 --no-timestamp                   Omit timestamps from log lines\n\
         \x20 -q, --quiet                      Only log warnings and errors\n\n\
         Environment:\n\
         \x20 {}  Default network when --network is not given",
        program, NETWORK_ENV
    );
}
