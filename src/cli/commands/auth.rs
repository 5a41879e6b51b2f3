//! `credvault auth` — manage the cached encryption key.
//!
//! Subcommands:
//! - `credvault auth keyring`          — save the key to the OS keyring
//! - `credvault auth keyring --delete` — remove it again
//!
//! When the keyring feature is not compiled in, these commands return
//! a helpful error message.

use crate::cli::Cli;
use crate::errors::Result;

/// Execute `credvault auth keyring` — save or delete the key in the OS keyring.
pub fn execute_keyring(cli: &Cli, delete: bool) -> Result<()> {
    #[cfg(feature = "keyring-store")]
    {
        use crate::cli::{output, resolve_server_secret, Context};
        use crate::crypto::EnvelopeCodec;
        use crate::vault::CredentialStore;

        let ctx = Context::load(cli)?;
        let store_id = ctx.store_path.to_string_lossy().to_string();

        if delete {
            crate::keyring::delete_secret(&store_id)?;
            output::success("Encryption key removed from OS keyring.");
            return Ok(());
        }

        // Skip the keyring lookup: the user is explicitly supplying the key.
        let secret = resolve_server_secret(None)?;

        // Check the key against the user's existing credentials first.
        let store = CredentialStore::open(&ctx.store_path)?;
        let codec = EnvelopeCodec::with_params(secret.as_str(), ctx.settings.kdf_params());
        store.list(&ctx.user, &codec)?;

        crate::keyring::store_secret(&store_id, &secret)?;
        output::success("Encryption key saved to OS keyring.");
        Ok(())
    }

    #[cfg(not(feature = "keyring-store"))]
    {
        let _ = (cli, delete);
        Err(crate::errors::CredVaultError::KeyringError(
            "keyring support not compiled — rebuild with `cargo build --features keyring-store`"
                .into(),
        ))
    }
}
