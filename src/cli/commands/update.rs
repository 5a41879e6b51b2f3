//! `credvault update` — change fields of an existing credential.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::crypto::password;
use crate::errors::Result;
use crate::vault::{CredentialStore, CredentialUpdate};

/// Execute the `update` command.
///
/// `generate` replaces the password with a freshly generated one.
pub fn execute(cli: &Cli, id: u64, mut update: CredentialUpdate, generate: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut store = CredentialStore::open(&ctx.store_path)?;

    if generate {
        update.password = Some(password::generate(
            ctx.settings.password_length,
            ctx.settings.charset(),
        )?);
    } else if update.password.is_some() {
        output::warning("Password provided on command line — it may appear in shell history.");
    }
    let password_changed = update.password.is_some();

    let codec = ctx.codec()?;
    let view = store.update(&ctx.user, id, update, &codec)?;
    store.save()?;

    let detail = if password_changed {
        "password changed"
    } else {
        "fields changed"
    };
    ctx.audit("update", Some(id), Some(detail));

    output::success(&format!("Credential #{id} updated ({detail})"));
    if generate {
        output::info(&format!("Generated password: {}", view.password));
    }

    Ok(())
}
