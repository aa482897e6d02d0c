//! CLI command definitions and handlers.

mod account;
mod address;

pub use account::{NewCommand, RecoverCommand};
pub use address::{AddressCommand, DecodeCommand};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tronbridge::{Account, AddressScheme, ChainParams};

/// tronbridge - TRON account generator and address tool.
#[derive(Parser)]
#[command(name = "tronbridge")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log derivation steps to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Generate a new account with a fresh mnemonic.
    New(NewCommand),

    /// Recover an account from a mnemonic phrase.
    #[command(alias = "import")]
    Recover(RecoverCommand),

    /// Compute the address of a private or public key.
    Address(AddressCommand),

    /// Validate an address and show its raw parts.
    Decode(DecodeCommand),
}

/// Chain parameters for the chosen address scheme.
fn chain_params(legacy_address: bool) -> ChainParams {
    ChainParams::TRON.with_address_scheme(address_scheme(legacy_address))
}

fn address_scheme(legacy_address: bool) -> AddressScheme {
    if legacy_address {
        AddressScheme::CompressedHex
    } else {
        AddressScheme::Keccak
    }
}

#[rustfmt::skip]
fn print_account(account: &Account) {
    let mnemonic = account.mnemonic();

    println!();
    println!("      {}     {}", "Mnemonic".cyan().bold(), account.phrase());
    if mnemonic.has_passphrase() {
        println!("      {}   {}", "Passphrase".cyan().bold(), "(set)".dimmed());
    }
    println!("      {}      {}", "Entropy".cyan().bold(), format!("{} bits, {} words", mnemonic.bit_size(), mnemonic.word_count()).dimmed());
    println!();
    println!("      {}         {}", "Path".cyan().bold(), account.path());
    println!("      {}  {}", "Fingerprint".cyan().bold(), format!("{:08x}", account.parent_fingerprint()).dimmed());
    println!("      {}      {}", "Address".cyan().bold(), account.address().as_str().green());
    println!("      {}          {}", "Hex".cyan().bold(), account.address().to_hex().dimmed());
    println!("      {}  {}", "Private Key".cyan().bold(), account.private_key_hex().as_str());
    println!("      {}   {}", "Public Key".cyan().bold(), account.public_key_hex().dimmed());
    if account.params().address_scheme() == AddressScheme::CompressedHex {
        println!("      {}         {}", "Note".yellow().bold(), "legacy address scheme, not the on-chain owner of this key".yellow());
    }
    println!();
}
