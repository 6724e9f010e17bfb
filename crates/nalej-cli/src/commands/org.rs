//! Organization profile and application statistics.

use std::io::Write;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use nalej_proto::OrganizationId;
use nalej_proto::organizations::{
    self, ApplicationStats, ApplicationStatsList, OrganizationInfo, UpdateOrganizationRequest,
};
use tracing::debug;

use super::Poll;
use crate::cli::{OrgCommands, OrgUpdateArgs};
use crate::client::Platform;
use crate::error::CliError;
use crate::output::{Message, TableDisplay, or_dash, print_table, table};
use crate::settings::Settings;
use crate::watch::{WATCH_INTERVAL, Watched, watch};

impl TableDisplay for OrganizationInfo {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["NAME", "ID", "EMAIL"]);
        t.add_row(vec![
            self.name.clone(),
            self.organization_id.clone(),
            or_dash(&self.email),
        ]);
        print_table(writer, &t)?;

        let mut t = table(&["ADDRESS", "CITY", "STATE", "COUNTRY", "ZIP"]);
        t.add_row(vec![
            or_dash(&self.full_address),
            or_dash(&self.city),
            or_dash(&self.state),
            or_dash(&self.country),
            or_dash(&self.zip_code),
        ]);
        print_table(writer, &t)
    }
}

fn stats_table<W: Write>(writer: &mut W, stats: &[ApplicationStats]) -> Result<(), CliError> {
    let mut t = table(&["NAME", "ID", "STATUS", "SERVICES"]);
    for s in stats {
        t.add_row(vec![
            s.name.clone(),
            s.app_instance_id.clone(),
            s.status.clone(),
            format!("{}/{}", s.running_services, s.total_services),
        ]);
    }
    print_table(writer, &t)
}

impl TableDisplay for ApplicationStatsList {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        stats_table(writer, &self.stats)
    }
}

impl Watched for ApplicationStats {
    type Key = String;

    fn key(&self) -> String {
        self.app_instance_id.clone()
    }

    fn changed(&self, previous: &Self) -> bool {
        self != previous
    }
}

/// Build the update request; `None` when no field was given.
fn update_request(
    organization_id: String,
    args: &OrgUpdateArgs,
) -> Result<Option<UpdateOrganizationRequest>, CliError> {
    let photo_base64 = match &args.photo_path {
        Some(path) => {
            let bytes = std::fs::read(path).map_err(|e| CliError::file(path, &e))?;
            Some(STANDARD.encode(bytes))
        }
        None => None,
    };
    let request = UpdateOrganizationRequest {
        organization_id,
        name: args.name.clone(),
        full_address: args.full_address.clone(),
        city: args.city.clone(),
        state: args.state.clone(),
        country: args.country.clone(),
        zip_code: args.zip_code.clone(),
        photo_base64,
    };
    let empty = request.name.is_none()
        && request.full_address.is_none()
        && request.city.is_none()
        && request.state.is_none()
        && request.country.is_none()
        && request.zip_code.is_none()
        && request.photo_base64.is_none();
    Ok((!empty).then_some(request))
}

/// Handler for the org command.
pub struct OrgCommand<'a> {
    settings: &'a Settings,
}

impl<'a> OrgCommand<'a> {
    /// Creates a new org command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes an org subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &OrgCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            OrgCommands::Info => {
                let info = platform
                    .call(&organizations::INFO, &OrganizationId::new(organization_id))
                    .await?;
                format.write(out, &info)
            }
            OrgCommands::Update(args) => {
                let request = update_request(organization_id, args)?
                    .ok_or_else(|| CliError::usage("nothing to update, give at least one field"))?;
                platform.call(&organizations::UPDATE, &request).await?;
                format.write(out, &Message::success("Organization updated"))
            }
            OrgCommands::Stats { watch: false } => {
                let stats = platform
                    .call(&organizations::APP_STATS, &OrganizationId::new(organization_id))
                    .await?;
                format.write(out, &stats)
            }
            OrgCommands::Stats { watch: true } => {
                debug!(%organization_id, "watching application stats");
                let mut source = Poll::new(
                    platform,
                    &organizations::APP_STATS,
                    OrganizationId::new(organization_id),
                    |list: ApplicationStatsList| list.stats,
                );
                watch(&mut source, WATCH_INTERVAL, out, |w, stats| {
                    format.write(w, &ApplicationStatsList { stats })
                })
                .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Format;
    use crate::client::FakePlatform;
    use serde_json::json;
    use tempfile::{NamedTempFile, TempDir};

    async fn run(
        settings: &Settings,
        platform: &mut FakePlatform,
        command: OrgCommands,
    ) -> (Result<(), CliError>, String) {
        let mut out = Vec::new();
        let result = OrgCommand::new(settings).execute(platform, &mut out, &command).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn info_renders_profile() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut platform = FakePlatform::new().respond(json!({
            "organizationId": "org-1",
            "name": "Acme",
            "city": "Madrid"
        }));
        let (result, out) = run(&settings, &mut platform, OrgCommands::Info).await;
        result.unwrap();
        assert_eq!(platform.single_params(), &json!({"organizationId": "org-1"}));
        assert!(out.contains("Acme"));
        assert!(out.contains("Madrid"));
    }

    #[tokio::test]
    async fn missing_organization_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "");
        let mut platform = FakePlatform::new();
        let (result, _) = run(&settings, &mut platform, OrgCommands::Info).await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn update_sends_only_given_fields_and_encodes_photo() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut photo = NamedTempFile::new().unwrap();
        photo.write_all(b"png").unwrap();
        let mut platform = FakePlatform::new().respond(json!({}));
        let args = OrgUpdateArgs {
            city: Some("Paris".into()),
            photo_path: Some(photo.path().to_path_buf()),
            ..OrgUpdateArgs::default()
        };
        let (result, out) = run(&settings, &mut platform, OrgCommands::Update(args)).await;
        result.unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({"organizationId": "org-1", "city": "Paris", "photoBase64": "cG5n"})
        );
        assert_eq!(out, "✓ Organization updated\n");
    }

    #[tokio::test]
    async fn empty_update_is_rejected() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &settings,
            &mut platform,
            OrgCommands::Update(OrgUpdateArgs::default()),
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn unreadable_photo_fails_before_calling() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut platform = FakePlatform::new();
        let args = OrgUpdateArgs {
            photo_path: Some(dir.path().join("missing.png")),
            ..OrgUpdateArgs::default()
        };
        let (result, _) = run(&settings, &mut platform, OrgCommands::Update(args)).await;
        assert!(matches!(result, Err(CliError::Io(_))));
        assert!(platform.calls().is_empty());
    }

    fn stat(id: &str, running: i64) -> serde_json::Value {
        json!({
            "appInstanceId": id,
            "name": format!("app-{id}"),
            "status": "RUNNING",
            "totalServices": 3,
            "runningServices": running
        })
    }

    #[tokio::test]
    async fn stats_render_service_counts() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut platform = FakePlatform::new().respond(json!({"stats": [stat("i1", 2)]}));
        let (result, out) = run(&settings, &mut platform, OrgCommands::Stats { watch: false }).await;
        result.unwrap();
        assert!(out.contains("app-i1"));
        assert!(out.contains("2/3"));
    }

    #[tokio::test(start_paused = true)]
    async fn stats_watch_prints_only_changes() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1").with_format(Format::Json);
        let mut platform = FakePlatform::new()
            .respond(json!({"stats": [stat("i1", 2), stat("i2", 3)]}))
            .respond(json!({"stats": [stat("i1", 2), stat("i2", 3)]}))
            .respond(json!({"stats": [stat("i1", 3), stat("i2", 3)]}));
        let (result, out) = run(&settings, &mut platform, OrgCommands::Stats { watch: true }).await;

        assert!(matches!(result, Err(CliError::Connection(_))));
        assert_eq!(platform.methods().len(), 4);
        let (initial, update) = out.split_once("\n\n").unwrap();
        assert!(initial.contains("i2"));
        assert!(update.contains("i1"));
        assert!(!update.contains("i2"));
    }
}
