//! `credvault delete` — remove a credential.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{CredVaultError, Result};
use crate::vault::CredentialStore;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, id: u64, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut store = CredentialStore::open(&ctx.store_path)?;

    // Metadata only; the password stays encrypted.
    let site = store.record(&ctx.user, id)?.site_name.clone();

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete credential #{id} ({site})?"))
            .default(false)
            .interact()
            .map_err(|e| CredVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    store.delete(&ctx.user, id)?;
    store.save()?;

    ctx.audit("delete", Some(id), Some(&site));
    output::success(&format!("Deleted credential #{id} ({site})"));

    Ok(())
}
