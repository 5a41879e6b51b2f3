//! `credvault strength` — rate a password.

use crate::cli::output;
use crate::cli::read_password_input;
use crate::crypto::PasswordStrength;
use crate::errors::Result;

/// Execute the `strength` command.
pub fn execute(password: Option<&str>) -> Result<()> {
    let strength = match password {
        Some(pw) => PasswordStrength::of(pw),
        None => PasswordStrength::of(&read_password_input("Password to rate")?),
    };

    println!("{}", output::strength_label(strength));
    Ok(())
}
