//! `credvault audit` — display the audit log.
//!
//! Usage:
//!   credvault audit               # show last 50 entries
//!   credvault audit --last 20     # show last 20
//!   credvault audit --since 7d    # entries from last 7 days

use chrono::{DateTime, Duration, Utc};

use crate::cli::Cli;
use crate::errors::{CredVaultError, Result};

/// Execute the `audit` command.
#[cfg(feature = "audit-log")]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    use crate::audit::AuditLog;
    use crate::cli::{output, Context};

    let ctx = Context::load(cli)?;

    let audit = AuditLog::open(&ctx.store_dir)
        .ok_or_else(|| CredVaultError::AuditError("failed to open audit database".into()))?;

    let since_dt = since.map(parse_duration).transpose()?;
    let entries = audit.query(&ctx.user, last, since_dt)?;

    if entries.is_empty() {
        output::info("No audit entries found.");
        return Ok(());
    }

    print_audit_table(&entries);

    Ok(())
}

/// Without the `audit-log` feature there is nothing to show.
#[cfg(not(feature = "audit-log"))]
pub fn execute(cli: &Cli, last: usize, since: Option<&str>) -> Result<()> {
    let _ = (cli, last, since);
    Err(CredVaultError::AuditError(
        "audit log not compiled — rebuild with `--features audit-log`".into(),
    ))
}

/// Turn a `--since` value such as `7d`, `24h`, `30m` or `2w` into the
/// cutoff timestamp.
#[cfg_attr(not(feature = "audit-log"), allow(dead_code))]
fn parse_duration(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();
    let invalid = || {
        CredVaultError::CommandFailed(format!(
            "invalid duration '{input}' (expected a number followed by m, h, d or w)"
        ))
    };

    let unit = input.chars().last().ok_or_else(invalid)?;
    let amount: i64 = input[..input.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| invalid())?;
    if amount < 0 {
        return Err(invalid());
    }

    let span = match unit {
        'm' => Duration::try_minutes(amount),
        'h' => Duration::try_hours(amount),
        'd' => Duration::try_days(amount),
        'w' => Duration::try_weeks(amount),
        _ => None,
    }
    .ok_or_else(invalid)?;

    Utc::now().checked_sub_signed(span).ok_or_else(invalid)
}

/// Print audit entries in a formatted table.
#[cfg(feature = "audit-log")]
fn print_audit_table(entries: &[crate::audit::AuditEntry]) {
    use comfy_table::{ContentArrangement, Table};
    use console::style;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Time", "Operation", "Credential", "Details"]);

    for entry in entries {
        table.add_row(vec![
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            colorize_operation(&entry.operation),
            entry
                .credential_id
                .map_or_else(|| "-".to_string(), |id| format!("#{id}")),
            entry.details.as_deref().unwrap_or("-").to_string(),
        ]);
    }

    println!(
        "{}",
        style(format!("{} audit entries:", entries.len())).bold()
    );
    println!("{table}");
}

/// Colorize operation names for display.
#[cfg(feature = "audit-log")]
fn colorize_operation(op: &str) -> String {
    use console::style;

    match op {
        "init" | "add" => style(op).green().to_string(),
        "update" => style(op).blue().to_string(),
        "delete" => style(op).red().to_string(),
        "get" | "copy" | "list" | "search" => style(op).cyan().to_string(),
        _ => op.to_string(),
    }
}
