//! `credvault init` — create an empty credential store.

use std::fs;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::config::settings::SECRET_ENV_VAR;
use crate::errors::{CredVaultError, Result};
use crate::vault::CredentialStore;

/// Execute the `init` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;

    // 1. Create the store directory if it doesn't exist.
    if !ctx.store_dir.exists() {
        fs::create_dir_all(&ctx.store_dir)?;
        output::info(&format!(
            "Created store directory: {}",
            ctx.store_dir.display()
        ));
    }

    // 2. Refuse to clobber an existing store.
    if ctx.store_path.exists() {
        output::tip("Use `credvault add` to add credentials to the existing store.");
        return Err(CredVaultError::StoreAlreadyExists(ctx.store_path));
    }

    // 3. Write the empty store.
    CredentialStore::create(&ctx.store_path)?;
    ctx.audit("init", None, Some("store created"));

    output::success(&format!(
        "Credential store created at {}",
        ctx.store_path.display()
    ));
    output::tip(&format!(
        "Set {SECRET_ENV_VAR} to the encryption key; it is never stored with the credentials."
    ));

    Ok(())
}
