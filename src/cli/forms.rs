//! Shared form plumbing: `--set field=value` input and the `fields` command

use std::str::FromStr;

use anyhow::Context;
use clap::Args;

use crate::AppContext;
use crate::domain::form::{
    EntityForm, EntityKind, FormError, FormMode, SubmitError, can_open, field_rules,
};

use super::output::print_json;

#[derive(Args)]
pub struct FieldsArgs {
    /// user, account or livestock
    pub entity: EntityKind,

    #[arg(long, default_value = "create")]
    pub mode: FormMode,
}

/// One `field=value` pair from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub field: String,
    pub value: String,
}

impl FromStr for Assignment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, value) = s
            .split_once('=')
            .ok_or_else(|| format!("Expected FIELD=VALUE, got '{}'", s))?;

        let field = field.trim();
        if field.is_empty() {
            return Err(format!("Missing field name in '{}'", s));
        }

        Ok(Self {
            field: field.to_string(),
            value: value.to_string(),
        })
    }
}

#[derive(Args)]
pub struct FormArgs {
    /// Field assignment, repeatable
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<Assignment>,
}

pub fn fields(context: &AppContext, args: FieldsArgs) -> anyhow::Result<()> {
    let identity = context.require_identity()?;

    if !can_open(args.entity, args.mode, identity.role) {
        return Err(FormError::NotPermitted {
            entity: args.entity,
            mode: args.mode,
            role: identity.role,
        }
        .into());
    }

    print_json(&field_rules(args.entity, args.mode, identity.role))
}

/// Apply the assignments to an open form and submit it
///
/// Validation failures print the ErrorMap and fail the command.
pub async fn fill_and_submit(
    context: &AppContext,
    mut form: EntityForm,
    assignments: &[Assignment],
) -> anyhow::Result<()> {
    for assignment in assignments {
        form.set_raw(&assignment.field, &assignment.value)
            .with_context(|| format!("Cannot set '{}'", assignment.field))?;
    }

    match form.submit(context.gateway.as_ref()).await {
        Ok(saved) => print_json(&saved),
        Err(SubmitError::Invalid(errors)) => {
            print_json(&errors)?;
            anyhow::bail!("Validation failed: {}", errors)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assignment_parse() {
        assert_eq!(
            "masterUser.email=o@farm.com".parse::<Assignment>(),
            Ok(Assignment {
                field: "masterUser.email".to_string(),
                value: "o@farm.com".to_string(),
            })
        );
        assert_eq!(
            "description=a=b".parse::<Assignment>().unwrap().value,
            "a=b"
        );
        assert!("username".parse::<Assignment>().is_err());
        assert!("=bob".parse::<Assignment>().is_err());
    }
}
