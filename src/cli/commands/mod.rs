//! One module per subcommand.

pub mod add;
pub mod audit_cmd;
pub mod auth;
pub mod completions;
pub mod delete;
pub mod generate;
pub mod get;
pub mod init;
pub mod list;
pub mod search;
pub mod strength;
pub mod update;
