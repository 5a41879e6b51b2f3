//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::crypto::PasswordStrength;
use crate::vault::CredentialView;

/// Placeholder shown instead of a hidden password.
const MASK: &str = "••••••••";

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Color a strength label.
pub fn strength_label(strength: PasswordStrength) -> String {
    let label = strength.to_string();
    match strength {
        PasswordStrength::Weak => style(label).red().to_string(),
        PasswordStrength::Medium => style(label).yellow().to_string(),
        PasswordStrength::Strong => style(label).green().to_string(),
    }
}

/// Print a table of credentials (Id, Site, Username, Category, Strength, Updated).
pub fn print_credentials_table(credentials: &[CredentialView], show_passwords: bool) {
    if credentials.is_empty() {
        info("No credentials found.");
        tip("Run `credvault add <SITE> <USERNAME>` to add one.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "Id", "Site", "Username", "Password", "Category", "Strength", "Updated",
    ]);

    for c in credentials {
        table.add_row(vec![
            c.id.to_string(),
            c.site_name.clone(),
            c.username.clone(),
            if show_passwords {
                c.password.clone()
            } else {
                MASK.to_string()
            },
            c.category.clone().unwrap_or_default(),
            c.strength().to_string(),
            c.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ]);
    }

    println!("{table}");

    let strong = credentials
        .iter()
        .filter(|c| c.strength() == PasswordStrength::Strong)
        .count();
    info(&format!(
        "{} credential(s), {strong} with a strong password",
        credentials.len()
    ));
}

/// Print every field of one credential, password included.
pub fn print_credential(c: &CredentialView) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec!["Id".to_string(), c.id.to_string()]);
    table.add_row(vec!["Site".to_string(), c.site_name.clone()]);
    if let Some(ref url) = c.site_url {
        table.add_row(vec!["URL".to_string(), url.clone()]);
    }
    table.add_row(vec!["Username".to_string(), c.username.clone()]);
    table.add_row(vec!["Password".to_string(), c.password.clone()]);
    table.add_row(vec!["Strength".to_string(), strength_label(c.strength())]);
    if let Some(ref category) = c.category {
        table.add_row(vec!["Category".to_string(), category.clone()]);
    }
    if let Some(ref notes) = c.notes {
        table.add_row(vec!["Notes".to_string(), notes.clone()]);
    }
    table.add_row(vec![
        "Created".to_string(),
        c.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);
    table.add_row(vec![
        "Updated".to_string(),
        c.updated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
    ]);

    println!("{table}");
}
