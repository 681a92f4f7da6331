//! `livestock`, `breeds` and `livestock-types` commands

use anyhow::Context;
use clap::Subcommand;

use crate::AppContext;
use crate::domain::api::AdminApi;
use crate::domain::form::{EditTarget, EntityForm, EntityKind};
use crate::domain::livestock::filter_livestock;

use super::forms::{FormArgs, fill_and_submit};
use super::output::print_json;

#[derive(Subcommand)]
pub enum LivestockCommand {
    /// List livestock
    List {
        /// Case-insensitive match on name or tag id
        #[arg(long)]
        search: Option<String>,
    },

    /// Register an animal
    Create(FormArgs),

    /// Edit an existing animal
    Update {
        id: i64,
        #[command(flatten)]
        form: FormArgs,
    },
}

pub async fn run(context: &AppContext, command: LivestockCommand) -> anyhow::Result<()> {
    let identity = context.require_identity()?;
    let api = context.gateway.as_ref();

    match command {
        LivestockCommand::List { search } => {
            let herd = api.get_livestock().await?;
            print_json(&filter_livestock(&herd, search.as_deref()))
        }
        LivestockCommand::Create(args) => {
            let form = EntityForm::open_create(EntityKind::Livestock, identity.role)?;
            fill_and_submit(context, form, &args.set).await
        }
        LivestockCommand::Update { id, form } => {
            let livestock = api
                .get_livestock()
                .await?
                .into_iter()
                .find(|item| item.id == id)
                .with_context(|| format!("Livestock {} not found", id))?;

            let edit = EntityForm::open_edit(EditTarget::Livestock(&livestock), identity.role)?;
            fill_and_submit(context, edit, &form.set).await
        }
    }
}

pub async fn breeds(context: &AppContext) -> anyhow::Result<()> {
    context.require_identity()?;
    print_json(&context.gateway.get_breeds().await?)
}

pub async fn livestock_types(context: &AppContext) -> anyhow::Result<()> {
    context.require_identity()?;
    print_json(&context.gateway.get_livestock_types().await?)
}
