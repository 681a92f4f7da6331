//! Command-line surface of the console
//!
//! Each subcommand stands in for one screen of the admin console. Every
//! command except `login` needs a restored session.

pub mod accounts;
pub mod forms;
pub mod livestock;
pub mod output;
pub mod session;
pub mod users;

use clap::{Parser, Subcommand};

use crate::AppContext;
use crate::config::AppConfig;
use crate::infrastructure::logging;

/// RMS console - administration of farm accounts, users and livestock
#[derive(Parser)]
#[command(name = "rms-console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Authenticate and store the session
    Login(session::LoginArgs),

    /// Clear the stored session
    Logout,

    /// Show the logged-in identity
    Whoami,

    /// Show the role-gated field descriptor of a form
    Fields(forms::FieldsArgs),

    /// Manage users
    #[command(subcommand)]
    Users(users::UsersCommand),

    /// Manage accounts
    #[command(subcommand)]
    Accounts(accounts::AccountsCommand),

    /// Manage livestock
    #[command(subcommand)]
    Livestock(livestock::LivestockCommand),

    /// List breeds
    Breeds,

    /// List livestock types
    LivestockTypes,
}

/// Load configuration, initialise logging and run one command
pub async fn run(command: Command) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let context = AppContext::from_config(config)?;
    dispatch(command, &context).await
}

pub async fn dispatch(command: Command, context: &AppContext) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => session::login(context, args).await,
        Command::Logout => session::logout(context),
        Command::Whoami => session::whoami(context),
        Command::Fields(args) => forms::fields(context, args),
        Command::Users(command) => users::run(context, command).await,
        Command::Accounts(command) => accounts::run(context, command).await,
        Command::Livestock(command) => livestock::run(context, command).await,
        Command::Breeds => livestock::breeds(context).await,
        Command::LivestockTypes => livestock::livestock_types(context).await,
    }
}
