//! Account creation and recovery commands.

use clap::Args;
use tronbridge::mnemonic::{expand_phrase, generate_entropy};
use tronbridge::{Account, Mnemonic};

use super::{chain_params, print_account};

/// Generate a new account.
#[derive(Args)]
pub struct NewCommand {
    /// Entropy size in bits (128, 160, 192, 224, or 256).
    #[arg(short, long, default_value = "128")]
    bits: usize,

    /// Derivation path [default: m/44'/195'/0'/0/0].
    #[arg(long)]
    path: Option<String>,

    /// BIP39 passphrase (optional extra security).
    #[arg(short, long)]
    passphrase: Option<String>,

    /// Use the legacy compressed-hex address scheme.
    #[arg(long)]
    legacy_address: bool,
}

impl NewCommand {
    /// Execute the new command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let params = chain_params(self.legacy_address);
        tracing::debug!(bits = self.bits, scheme = ?params.address_scheme(), "generating account");
        let mnemonic = self.mnemonic()?;
        let account = Account::from_mnemonic(&params, mnemonic, self.path.as_deref())?;
        print_account(&account);
        Ok(())
    }

    /// Fresh mnemonic with the passphrase mixed into its only seed derivation.
    fn mnemonic(&self) -> tronbridge::Result<Mnemonic> {
        let entropy = generate_entropy(self.bits)?;
        Mnemonic::from_entropy(&entropy, self.passphrase.as_deref())
    }
}

/// Recover an account from a mnemonic phrase.
#[derive(Args)]
pub struct RecoverCommand {
    /// BIP39 mnemonic phrase (4-letter abbreviations accepted).
    #[arg(short, long)]
    mnemonic: String,

    /// BIP39 passphrase (if used when creating).
    #[arg(short, long)]
    passphrase: Option<String>,

    /// Derivation path [default: m/44'/195'/0'/0/0].
    #[arg(long)]
    path: Option<String>,

    /// Use the legacy compressed-hex address scheme.
    #[arg(long)]
    legacy_address: bool,
}

impl RecoverCommand {
    /// Execute the recover command.
    pub fn execute(self) -> Result<(), Box<dyn std::error::Error>> {
        let params = chain_params(self.legacy_address);
        let phrase = expand_phrase(&self.mnemonic)?;
        tracing::debug!(words = phrase.split(' ').count(), "expanded mnemonic");
        let account = Account::recover(
            &params,
            &phrase,
            self.passphrase.as_deref(),
            self.path.as_deref(),
        )?;
        print_account(&account);
        Ok(())
    }
}
