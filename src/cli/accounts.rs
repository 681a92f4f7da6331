//! `accounts` command tree

use anyhow::Context;
use clap::Subcommand;

use crate::AppContext;
use crate::domain::api::AdminApi;
use crate::domain::form::{EditTarget, EntityForm, EntityKind};

use super::forms::{FormArgs, fill_and_submit};
use super::output::print_json;

#[derive(Subcommand)]
pub enum AccountsCommand {
    /// List accounts
    List,

    /// Create an account together with its master user (administrators only)
    Create(FormArgs),

    /// Edit an existing account
    Update {
        id: i64,
        #[command(flatten)]
        form: FormArgs,
    },
}

pub async fn run(context: &AppContext, command: AccountsCommand) -> anyhow::Result<()> {
    let identity = context.require_identity()?;
    let api = context.gateway.as_ref();

    match command {
        AccountsCommand::List => print_json(&api.get_accounts().await?),
        AccountsCommand::Create(args) => {
            let form = EntityForm::open_create(EntityKind::Account, identity.role)?;
            fill_and_submit(context, form, &args.set).await
        }
        AccountsCommand::Update { id, form } => {
            let account = api
                .get_accounts()
                .await?
                .into_iter()
                .find(|account| account.id == id)
                .with_context(|| format!("Account {} not found", id))?;

            let edit = EntityForm::open_edit(EditTarget::Account(&account), identity.role)?;
            fill_and_submit(context, edit, &form.set).await
        }
    }
}
