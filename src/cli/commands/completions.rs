//! `credvault completions` — generate shell completion scripts.
//!
//! Usage:
//!   credvault completions bash > ~/.local/share/bash-completion/completions/credvault
//!   credvault completions zsh > ~/.zfunc/_credvault

use std::io::{self, Write};

use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::errors::{CredVaultError, Result};

/// Execute the `completions` command.
pub fn execute(shell: &str) -> Result<()> {
    let shell = parse_shell(shell)?;
    write_completions(shell, &mut io::stdout())
}

/// Render the completion script for `shell` into `out`.
pub fn write_completions<W: Write>(shell: Shell, out: &mut W) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, out);
    out.flush()?;
    Ok(())
}

/// Accepts the shell names clap_complete knows, plus `ps` for PowerShell.
fn parse_shell(name: &str) -> Result<Shell> {
    let normalized = name.trim().to_lowercase();
    if normalized == "ps" {
        return Ok(Shell::PowerShell);
    }
    normalized.parse::<Shell>().map_err(|_| {
        CredVaultError::CommandFailed(format!(
            "unknown shell '{name}' — supported: bash, zsh, fish, powershell, elvish"
        ))
    })
}
