//! Roles and role assignment.

use std::io::Write;

use nalej_proto::OrganizationId;
use nalej_proto::roles::{self, AssignRoleRequest, RoleList};

use crate::cli::RolesCommands;
use crate::client::Platform;
use crate::error::CliError;
use crate::output::{Message, TableDisplay, or_dash, print_table, table};
use crate::settings::Settings;
use crate::validate::require;

impl TableDisplay for RoleList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["NAME", "ID", "DESCRIPTION", "PRIMITIVES"]);
        for r in self.roles.iter().filter(|r| !r.internal) {
            t.add_row(vec![
                r.name.clone(),
                r.role_id.clone(),
                or_dash(&r.description),
                r.primitives.join(","),
            ]);
        }
        print_table(writer, &t)
    }
}

/// Handler for the roles command.
pub struct RolesCommand<'a> {
    settings: &'a Settings,
}

impl<'a> RolesCommand<'a> {
    /// Creates a new roles command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes a roles subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &RolesCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            RolesCommands::List => {
                let roles = platform
                    .call(&roles::LIST, &OrganizationId::new(organization_id))
                    .await?;
                format.write(out, &roles)
            }
            RolesCommands::Assign { email, role_id } => {
                let request = AssignRoleRequest {
                    organization_id,
                    email: require("email", email)?.to_string(),
                    role_id: require("role ID", role_id)?.to_string(),
                };
                platform.call(&roles::ASSIGN, &request).await?;
                format.write(
                    out,
                    &Message::success(format!(
                        "Role {} assigned to {}",
                        request.role_id, request.email
                    )),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::FakePlatform;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn list_hides_internal_roles() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut platform = FakePlatform::new().respond(json!({"roles": [
            {"organizationId": "org-1", "roleId": "r1", "name": "Owner", "primitives": ["ORG", "APPS"]},
            {"organizationId": "org-1", "roleId": "r0", "name": "NalejInternal", "internal": true}
        ]}));
        let mut out = Vec::new();
        RolesCommand::new(&settings)
            .execute(&mut platform, &mut out, &RolesCommands::List)
            .await
            .unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Owner"));
        assert!(out.contains("ORG,APPS"));
        assert!(!out.contains("NalejInternal"));
    }

    #[tokio::test]
    async fn assign_validates_then_calls() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");

        let mut platform = FakePlatform::new();
        let err = RolesCommand::new(&settings)
            .execute(
                &mut platform,
                &mut Vec::new(),
                &RolesCommands::Assign {
                    email: String::new(),
                    role_id: "r1".into(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Usage(_)));
        assert!(platform.calls().is_empty());

        let mut platform = FakePlatform::new().respond(json!({}));
        let mut out = Vec::new();
        RolesCommand::new(&settings)
            .execute(
                &mut platform,
                &mut out,
                &RolesCommands::Assign {
                    email: "a@b.c".into(),
                    role_id: "r1".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({"organizationId": "org-1", "email": "a@b.c", "roleId": "r1"})
        );
        assert_eq!(String::from_utf8(out).unwrap(), "✓ Role r1 assigned to a@b.c\n");
    }
}
