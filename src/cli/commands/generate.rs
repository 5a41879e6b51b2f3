//! `credvault generate` — print a random password.

use crate::cli::{Cli, Context};
use crate::crypto::password;
use crate::errors::Result;

/// Execute the `generate` command.
pub fn execute(cli: &Cli, length: Option<usize>, charset: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;

    let length = length.unwrap_or(ctx.settings.password_length);
    let charset = charset.unwrap_or(ctx.settings.charset());

    println!("{}", password::generate(length, charset)?);
    Ok(())
}
