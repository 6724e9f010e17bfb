//! User accounts.

use std::io::Write;

use nalej_proto::OrganizationId;
use nalej_proto::users::{
    self, AddUserRequest, ResetPasswordRequest, UpdateUserRequest, User, UserId, UserList,
};

use crate::cli::UsersCommands;
use crate::client::Platform;
use crate::error::CliError;
use crate::output::{Message, TableDisplay, or_dash, print_table, table, timestamp};
use crate::settings::Settings;
use crate::validate::{require, resolve_argument};

fn users_table<W: Write>(writer: &mut W, users: &[User]) -> Result<(), CliError> {
    let mut t = table(&["NAME", "EMAIL", "ROLE", "MEMBER SINCE"]);
    for u in users {
        let name = if u.last_name.is_empty() {
            u.name.clone()
        } else {
            format!("{} {}", u.name, u.last_name)
        };
        t.add_row(vec![
            name,
            u.email.clone(),
            or_dash(&u.role_name),
            timestamp(u.member_since),
        ]);
    }
    print_table(writer, &t)
}

impl TableDisplay for User {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        users_table(writer, std::slice::from_ref(self))?;
        if self.title.is_empty() && self.phone.is_empty() && self.location.is_empty() {
            return Ok(());
        }
        let mut t = table(&["TITLE", "PHONE", "LOCATION"]);
        t.add_row(vec![
            or_dash(&self.title),
            or_dash(&self.phone),
            or_dash(&self.location),
        ]);
        print_table(writer, &t)
    }
}

impl TableDisplay for UserList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        users_table(writer, &self.users)
    }
}

/// Handler for the users command.
pub struct UsersCommand<'a> {
    settings: &'a Settings,
}

impl<'a> UsersCommand<'a> {
    /// Creates a new users command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes a users subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails. `users info`
    /// without an email yields [`CliError::MissingArgument`].
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &UsersCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            UsersCommands::Add {
                email,
                password,
                name,
                role_id,
            } => {
                let request = AddUserRequest {
                    organization_id,
                    email: require("email", email)?.to_string(),
                    password: require("password", password)?.to_string(),
                    name: require("name", name)?.to_string(),
                    role_id: require("role ID", role_id)?.to_string(),
                };
                let user = platform.call(&users::ADD, &request).await?;
                format.write(out, &user)
            }
            UsersCommands::Info { email, email_flag } => {
                let email = resolve_argument("email", email.as_deref(), email_flag.as_deref())?;
                let user = platform
                    .call(
                        &users::INFO,
                        &UserId {
                            organization_id,
                            email,
                        },
                    )
                    .await?;
                format.write(out, &user)
            }
            UsersCommands::List => {
                let list = platform
                    .call(&users::LIST, &OrganizationId::new(organization_id))
                    .await?;
                format.write(out, &list)
            }
            UsersCommands::Delete { email } => {
                let email = require("email", email)?.to_string();
                platform
                    .call(
                        &users::DELETE,
                        &UserId {
                            organization_id,
                            email: email.clone(),
                        },
                    )
                    .await?;
                format.write(out, &Message::success(format!("User {email} deleted")))
            }
            UsersCommands::ResetPassword {
                email,
                password,
                new_password,
            } => {
                let request = ResetPasswordRequest {
                    organization_id,
                    email: require("email", email)?.to_string(),
                    password: require("password", password)?.to_string(),
                    new_password: require("new password", new_password)?.to_string(),
                };
                platform.call(&users::RESET_PASSWORD, &request).await?;
                format.write(out, &Message::success("Password updated"))
            }
            UsersCommands::Update {
                email,
                name,
                last_name,
                title,
                phone,
                location,
            } => {
                let request = UpdateUserRequest {
                    organization_id,
                    email: require("email", email)?.to_string(),
                    name: name.clone(),
                    last_name: last_name.clone(),
                    title: title.clone(),
                    phone: phone.clone(),
                    location: location.clone(),
                };
                if request.is_empty() {
                    return Err(CliError::usage("nothing to update, give at least one field"));
                }
                platform.call(&users::UPDATE, &request).await?;
                format.write(out, &Message::success(format!("User {} updated", request.email)))
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

    fn user_json(email: &str) -> serde_json::Value {
        json!({
            "organizationId": "org-1",
            "email": email,
            "name": "Ada",
            "lastName": "Lovelace",
            "roleName": "Owner",
            "memberSince": 1_600_000_000
        })
    }

    async fn run(
        platform: &mut FakePlatform,
        command: UsersCommands,
    ) -> (Result<(), CliError>, String) {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut out = Vec::new();
        let result = UsersCommand::new(&settings)
            .execute(platform, &mut out, &command)
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn add_sends_every_field() {
        let mut platform = FakePlatform::new().respond(user_json("ada@acme.io"));
        let (result, out) = run(
            &mut platform,
            UsersCommands::Add {
                email: "ada@acme.io".into(),
                password: "pw".into(),
                name: "Ada".into(),
                role_id: "r1".into(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({
                "organizationId": "org-1",
                "email": "ada@acme.io",
                "password": "pw",
                "name": "Ada",
                "roleId": "r1"
            })
        );
        assert!(out.contains("Ada Lovelace"));
        assert!(out.contains("2020-09-13"));
    }

    #[tokio::test]
    async fn add_requires_role() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            UsersCommands::Add {
                email: "a@b.c".into(),
                password: "pw".into(),
                name: "A".into(),
                role_id: String::new(),
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(m)) if m.contains("role ID")));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn info_accepts_email_flag() {
        let mut platform = FakePlatform::new().respond(user_json("ada@acme.io"));
        let (result, _) = run(
            &mut platform,
            UsersCommands::Info {
                email: None,
                email_flag: Some("ada@acme.io".into()),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(platform.methods(), vec!["Users.Info"]);
        assert_eq!(platform.single_params()["email"], "ada@acme.io");
    }

    #[tokio::test]
    async fn info_without_email_asks_for_help() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            UsersCommands::Info {
                email: None,
                email_flag: None,
            },
        )
        .await;
        let err = result.unwrap_err();
        assert!(err.wants_help());
        assert_eq!(err.to_string(), "email not found");
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn list_renders_all_users() {
        let mut platform = FakePlatform::new().respond(json!({
            "users": [user_json("a@acme.io"), user_json("b@acme.io")]
        }));
        let (result, out) = run(&mut platform, UsersCommands::List).await;
        result.unwrap();
        assert!(out.contains("a@acme.io"));
        assert!(out.contains("b@acme.io"));
    }

    #[tokio::test]
    async fn update_without_fields_is_rejected() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            UsersCommands::Update {
                email: "a@b.c".into(),
                name: None,
                last_name: None,
                title: None,
                phone: None,
                location: None,
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn update_sends_only_given_fields() {
        let mut platform = FakePlatform::new().respond(json!({}));
        let (result, out) = run(
            &mut platform,
            UsersCommands::Update {
                email: "a@b.c".into(),
                name: None,
                last_name: None,
                title: Some("CTO".into()),
                phone: None,
                location: None,
            },
        )
        .await;
        result.unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({"organizationId": "org-1", "email": "a@b.c", "title": "CTO"})
        );
        assert_eq!(out, "✓ User a@b.c updated\n");
    }

    #[tokio::test]
    async fn reset_password_requires_new_password() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            UsersCommands::ResetPassword {
                email: "a@b.c".into(),
                password: "old".into(),
                new_password: " ".into(),
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());
    }
}
