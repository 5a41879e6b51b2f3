//! `credvault get` — decrypt and show one credential.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{CredVaultError, Result};
use crate::vault::CredentialStore;

/// Execute the `get` command.
///
/// With `copy`, the password goes to the system clipboard and is never
/// written to stdout.
pub fn execute(cli: &Cli, id: u64, password_only: bool, copy: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let store = CredentialStore::open(&ctx.store_path)?;

    let codec = ctx.codec()?;
    let view = store.get(&ctx.user, id, &codec)?;

    if copy {
        copy_to_clipboard(&view.password)?;
        ctx.audit("copy", Some(id), None);
        output::success(&format!(
            "Password for #{id} ({}) copied to clipboard",
            view.site_name
        ));
        return Ok(());
    }

    ctx.audit("get", Some(id), None);

    if password_only {
        println!("{}", view.password);
    } else {
        output::print_credential(&view);
    }

    Ok(())
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| CredVaultError::CommandFailed(format!("clipboard unavailable: {e}")))?;
    clipboard
        .set_text(text)
        .map_err(|e| CredVaultError::CommandFailed(format!("failed to copy password: {e}")))
}

