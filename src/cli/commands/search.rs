//! `credvault search` — find credentials by site name or username.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;
use crate::vault::CredentialStore;

/// Execute the `search` command.
pub fn execute(cli: &Cli, term: &str, show: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let store = CredentialStore::open(&ctx.store_path)?;

    let codec = ctx.codec()?;
    let hits = store.search(&ctx.user, term, &codec)?;
    ctx.audit("search", None, Some(&format!("{} match(es)", hits.len())));

    output::info(&format!("{} match(es) for '{term}'", hits.len()));
    output::print_credentials_table(&hits, show);

    Ok(())
}
