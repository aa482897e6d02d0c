//! Address encoding and decoding commands.

use clap::{ArgGroup, Args};
use colored::Colorize;
use tronbridge::{Address, Curve, KeyPair, Secp256k1, TRON_VERSION_BYTE};

use super::address_scheme;

/// Compute the address of a key.
#[derive(Args)]
#[command(group(ArgGroup::new("key").required(true).args(["private_key", "public_key"])))]
pub struct AddressCommand {
    /// Private key in hex format (with or without 0x prefix).
    #[arg(short = 'k', long)]
    private_key: Option<String>,

    /// Public key in hex format, compressed or uncompressed.
    #[arg(short = 'P', long)]
    public_key: Option<String>,

    /// Use the legacy compressed-hex address scheme.
    #[arg(long)]
    legacy_address: bool,
}

impl AddressCommand {
    /// Execute the address command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let scheme = address_scheme(self.legacy_address);

        let public_key = match (self.private_key, self.public_key) {
            (Some(private_key), _) => *KeyPair::from_private_key_hex(&private_key)?.public_key(),
            (None, Some(public_key)) => {
                let digits = public_key.trim().trim_start_matches("0x");
                Secp256k1
                    .parse_public_key(&hex::decode(digits)?)
                    .map_err(|_| tronbridge::Error::InvalidPublicKey)?
            }
            (None, None) => return Err("either --private-key or --public-key is required".into()),
        };

        let address = Address::from_public_key(&public_key, TRON_VERSION_BYTE, scheme)?;
        print_address(&address, &public_key);
        Ok(())
    }
}

/// Validate an address.
#[derive(Args)]
pub struct DecodeCommand {
    /// Base58Check address, e.g. T...
    address: String,
}

impl DecodeCommand {
    /// Execute the decode command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let address: Address = self.address.trim().parse()?;
        print_decoded(&address);
        Ok(())
    }
}

#[rustfmt::skip]
fn print_address(address: &Address, public_key: &[u8; 65]) {
    println!();
    println!("      {}      {}", "Address".cyan().bold(), address.as_str().green());
    println!("      {}          {}", "Hex".cyan().bold(), address.to_hex().dimmed());
    println!("      {}   {}", "Public Key".cyan().bold(), hex::encode(public_key).dimmed());
    println!();
}

#[rustfmt::skip]
fn print_decoded(address: &Address) {
    println!();
    println!("      {}      {}", "Address".cyan().bold(), address.as_str().green());
    println!("      {}      {}", "Version".cyan().bold(), format!("0x{:02x}", address.version()));
    println!("      {}      {}", "Payload".cyan().bold(), hex::encode(address.payload()).dimmed());
    println!("      {}          {}", "Hex".cyan().bold(), address.to_hex().dimmed());
    println!("      {}        {}", "Valid".cyan().bold(), "yes".green());
    println!();
}
