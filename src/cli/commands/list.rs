//! `credvault list` — display all of the user's credentials.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;
use crate::vault::CredentialStore;

/// Execute the `list` command.
pub fn execute(cli: &Cli, show: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let store = CredentialStore::open(&ctx.store_path)?;

    let codec = ctx.codec()?;
    let credentials = store.list(&ctx.user, &codec)?;
    ctx.audit("list", None, Some(&format!("{} credential(s)", credentials.len())));

    output::print_credentials_table(&credentials, show);

    Ok(())
}
