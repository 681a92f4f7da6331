//! `users` command tree

use anyhow::{Context, anyhow};
use clap::{Args, Subcommand};
use serde_json::json;

use crate::AppContext;
use crate::domain::api::AdminApi;
use crate::domain::form::{EditTarget, EntityForm, EntityKind};
use crate::domain::identity::Role;
use crate::domain::user::{
    PermanentDeletion, StatusFilter, User, UserFilter, validate_permanent_deletion,
};

use super::forms::{FormArgs, fill_and_submit};
use super::output::print_json;

#[derive(Subcommand)]
pub enum UsersCommand {
    /// List users, optionally filtered
    List(ListArgs),

    /// Create a user
    Create(FormArgs),

    /// Edit an existing user
    Update {
        id: i64,
        #[command(flatten)]
        form: FormArgs,
    },

    /// Deactivate a user (soft delete)
    Deactivate { id: i64 },

    /// Reactivate a deactivated user
    Reactivate { id: i64 },

    /// Ask the server whether a user can be permanently deleted
    DeletionCheck { id: i64 },

    /// Permanently delete a user
    Delete {
        id: i64,

        /// Confirm the permanent deletion
        #[arg(long)]
        confirm: bool,

        /// Reason recorded with the deletion
        #[arg(long, default_value = "")]
        reason: String,
    },
}

#[derive(Args)]
pub struct ListArgs {
    /// Case-insensitive match on username, email or name
    #[arg(long)]
    pub search: Option<String>,

    /// all, active or inactive
    #[arg(long, default_value = "all")]
    pub status: StatusFilter,

    #[arg(long = "type")]
    pub user_type: Option<Role>,
}

pub async fn run(context: &AppContext, command: UsersCommand) -> anyhow::Result<()> {
    let identity = context.require_identity()?;
    let api = context.gateway.as_ref();

    match command {
        UsersCommand::List(args) => {
            let users = api.get_users().await?;
            let filter = UserFilter {
                search: args.search,
                status: args.status,
                user_type: args.user_type,
            };
            print_json(&filter.apply(&users))
        }
        UsersCommand::Create(args) => {
            let form = EntityForm::open_create(EntityKind::User, identity.role)?;
            fill_and_submit(context, form, &args.set).await
        }
        UsersCommand::Update { id, form } => {
            let user = find_user(api, id).await?;
            let edit = EntityForm::open_edit(EditTarget::User(&user), identity.role)?;
            fill_and_submit(context, edit, &form.set).await
        }
        UsersCommand::Deactivate { id } => {
            api.delete_user(id).await?;
            print_json(&json!({ "id": id, "isActive": false }))
        }
        UsersCommand::Reactivate { id } => {
            api.reactivate_user(id).await?;
            print_json(&json!({ "id": id, "isActive": true }))
        }
        UsersCommand::DeletionCheck { id } => print_json(&api.deletion_check(id).await?),
        UsersCommand::Delete {
            id,
            confirm,
            reason,
        } => {
            validate_permanent_deletion(confirm, &reason)?;

            let check = api.deletion_check(id).await?;
            if !check.can_delete {
                print_json(&check)?;
                return Err(anyhow!(
                    check
                        .validation_error
                        .unwrap_or_else(|| format!("User {} cannot be deleted", id))
                ));
            }

            let request = PermanentDeletion {
                confirmed: true,
                reason: reason.trim().to_string(),
            };
            api.permanently_delete_user(id, &request).await?;
            print_json(&json!({ "id": id, "deleted": true }))
        }
    }
}

async fn find_user(api: &dyn AdminApi, id: i64) -> anyhow::Result<User> {
    api.get_users()
        .await?
        .into_iter()
        .find(|user| user.id == id)
        .with_context(|| format!("User {} not found", id))
}
