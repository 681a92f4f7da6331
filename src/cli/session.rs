//! login / logout / whoami

use clap::Args;

use crate::AppContext;
use crate::domain::identity::Identity;

use super::output::print_json;

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long, short)]
    pub username: String,

    #[arg(long, short)]
    pub password: String,
}

pub async fn login(context: &AppContext, args: LoginArgs) -> anyhow::Result<()> {
    let identity = context
        .session
        .login(context.gateway.as_ref(), &args.username, &args.password)
        .await?;

    print_json(&identity)
}

pub fn logout(context: &AppContext) -> anyhow::Result<()> {
    context.session.logout();
    print_json(&serde_json::json!({ "loggedOut": true }))
}

pub fn whoami(context: &AppContext) -> anyhow::Result<()> {
    let identity = context.require_identity()?;
    print_json(&whoami_view(&identity)?)
}

fn whoami_view(identity: &Identity) -> anyhow::Result<serde_json::Value> {
    let mut view = serde_json::to_value(identity)?;
    view["displayName"] = serde_json::Value::String(identity.display_name());
    Ok(view)
}
