//! `credvault add` — encrypt and store a new credential.

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{read_password_input, Cli, Context};
use crate::crypto::password;
use crate::errors::Result;
use crate::vault::{CredentialStore, NewCredential};

/// Arguments of the `add` command.
pub struct AddArgs<'a> {
    pub site: &'a str,
    pub username: &'a str,
    pub url: Option<&'a str>,
    pub notes: Option<&'a str>,
    pub category: Option<&'a str>,
    pub password: Option<&'a str>,
    pub generate: bool,
}

/// Execute the `add` command.
pub fn execute(cli: &Cli, args: AddArgs<'_>) -> Result<()> {
    let ctx = Context::load(cli)?;

    // Open first so a missing store fails before any prompt.
    let mut store = CredentialStore::open(&ctx.store_path)?;

    // Determine the password from one of three sources.
    let secret_value = if args.generate {
        Zeroizing::new(password::generate(
            ctx.settings.password_length,
            ctx.settings.charset(),
        )?)
    } else if let Some(pw) = args.password {
        output::warning("Password provided on command line — it may appear in shell history.");
        Zeroizing::new(pw.to_string())
    } else {
        read_password_input(&format!("Password for {}", args.site))?
    };

    let codec = ctx.codec()?;
    let view = store.add(
        &ctx.user,
        NewCredential {
            site_name: args.site.to_string(),
            site_url: args.url.map(str::to_string),
            username: args.username.to_string(),
            password: secret_value.to_string(),
            notes: args.notes.map(str::to_string),
            category: args.category.map(str::to_string),
        },
        &codec,
    )?;
    store.save()?;

    ctx.audit("add", Some(view.id), Some(&view.site_name));

    output::success(&format!(
        "Credential #{} added for {} ({} total)",
        view.id,
        view.site_name,
        store.count_for(&ctx.user)
    ));
    if args.generate {
        output::info(&format!("Generated password: {}", view.password));
    }
    output::info(&format!(
        "Password strength: {}",
        output::strength_label(view.strength())
    ));

    Ok(())
}
