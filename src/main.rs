use clap::Parser;
use credvault::cli::commands::add::AddArgs;
use credvault::cli::{AuthAction, Cli, Commands};
use credvault::vault::CredentialUpdate;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => credvault::cli::commands::init::execute(&cli),
        Commands::Add {
            ref site,
            ref username,
            ref url,
            ref notes,
            ref category,
            ref password,
            generate,
        } => credvault::cli::commands::add::execute(
            &cli,
            AddArgs {
                site,
                username,
                url: url.as_deref(),
                notes: notes.as_deref(),
                category: category.as_deref(),
                password: password.as_deref(),
                generate,
            },
        ),
        Commands::Get {
            id,
            password_only,
            copy,
        } => credvault::cli::commands::get::execute(&cli, id, password_only, copy),
        Commands::List { show } => credvault::cli::commands::list::execute(&cli, show),
        Commands::Search { ref term, show } => {
            credvault::cli::commands::search::execute(&cli, term, show)
        }
        Commands::Update {
            id,
            ref site,
            ref username,
            ref url,
            ref notes,
            ref category,
            ref password,
            generate,
        } => credvault::cli::commands::update::execute(
            &cli,
            id,
            CredentialUpdate {
                site_name: site.clone(),
                site_url: url.clone(),
                username: username.clone(),
                password: password.clone(),
                notes: notes.clone(),
                category: category.clone(),
            },
            generate,
        ),
        Commands::Delete { id, force } => credvault::cli::commands::delete::execute(&cli, id, force),
        Commands::Generate {
            length,
            ref charset,
        } => credvault::cli::commands::generate::execute(&cli, length, charset.as_deref()),
        Commands::Strength { ref password } => {
            credvault::cli::commands::strength::execute(password.as_deref())
        }
        Commands::Completions { ref shell } => {
            credvault::cli::commands::completions::execute(shell)
        }
        Commands::Audit { last, ref since } => {
            credvault::cli::commands::audit_cmd::execute(&cli, last, since.as_deref())
        }
        Commands::Auth { ref action } => match action {
            AuthAction::Keyring { delete } => {
                credvault::cli::commands::auth::execute_keyring(&cli, *delete)
            }
        },
    };

    if let Err(e) = result {
        credvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `CREDVAULT_LOG` (default: warn).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CREDVAULT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
