//! Resource usage summaries.

use std::io::Write;

use nalej_proto::monitoring::{
    self, ClusterSummary, ClusterSummaryRequest, PlatformSummary, SummaryRequest, UsageSummary,
};

use crate::cli::MonitoringCommands;
use crate::client::Platform;
use crate::error::CliError;
use crate::output::{TableDisplay, print_table, table};
use crate::settings::Settings;
use crate::validate::{require, window_minutes};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

fn percent(usage: &UsageSummary) -> String {
    usage
        .used_percent()
        .map_or_else(|| "-".to_string(), |p| format!("{p:.1}%"))
}

fn usage_rows(
    cpu: &UsageSummary,
    memory: &UsageSummary,
    storage: &UsageSummary,
) -> comfy_table::Table {
    let mut t = table(&["RESOURCE", "TOTAL", "AVAILABLE", "USED"]);
    t.add_row(vec![
        "CPU (millicores)".to_string(),
        cpu.total.to_string(),
        cpu.available.to_string(),
        percent(cpu),
    ]);
    for (name, usage) in [("MEMORY (GiB)", memory), ("STORAGE (GiB)", storage)] {
        t.add_row(vec![
            name.to_string(),
            format!("{:.2}", usage.total as f64 / GIB),
            format!("{:.2}", usage.available as f64 / GIB),
            percent(usage),
        ]);
    }
    t
}

impl TableDisplay for PlatformSummary {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["ORGANIZATION", "CLUSTERS"]);
        t.add_row(vec![self.organization_id.clone(), self.total_clusters.to_string()]);
        print_table(writer, &t)?;
        print_table(
            writer,
            &usage_rows(&self.cpu_millicores, &self.memory_bytes, &self.storage_bytes),
        )
    }
}

impl TableDisplay for ClusterSummary {
    fn write_table<W: Write>(&self, writer: &mut W, _label_length: i64) -> Result<(), CliError> {
        let mut t = table(&["CLUSTER"]);
        t.add_row(vec![self.cluster_id.clone()]);
        print_table(writer, &t)?;
        print_table(
            writer,
            &usage_rows(&self.cpu_millicores, &self.memory_bytes, &self.storage_bytes),
        )
    }
}

/// Handler for the monitoring command.
pub struct MonitoringCommand<'a> {
    settings: &'a Settings,
}

impl<'a> MonitoringCommand<'a> {
    /// Creates a new monitoring command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes a monitoring subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &MonitoringCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            MonitoringCommands::Summary { range_minutes } => {
                let request = SummaryRequest {
                    organization_id,
                    range_minutes: window_minutes(*range_minutes)?,
                };
                let summary = platform.call(&monitoring::SUMMARY, &request).await?;
                format.write(out, &summary)
            }
            MonitoringCommands::Cluster {
                cluster_id,
                range_minutes,
            } => {
                let request = ClusterSummaryRequest {
                    organization_id,
                    cluster_id: require("cluster ID", cluster_id)?.to_string(),
                    range_minutes: window_minutes(*range_minutes)?,
                };
                let summary = platform.call(&monitoring::CLUSTER_SUMMARY, &request).await?;
                format.write(out, &summary)
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

    async fn run(
        platform: &mut FakePlatform,
        command: MonitoringCommands,
    ) -> (Result<(), CliError>, String) {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut out = Vec::new();
        let result = MonitoringCommand::new(&settings)
            .execute(platform, &mut out, &command)
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn summary_renders_usage() {
        let mut platform = FakePlatform::new().respond(json!({
            "organizationId": "org-1",
            "totalClusters": 2,
            "cpuMillicores": {"total": 8000, "available": 2000},
            "memoryBytes": {"total": 17_179_869_184_i64, "available": 8_589_934_592_i64},
            "storageBytes": {"total": 0, "available": 0}
        }));
        let (result, out) = run(&mut platform, MonitoringCommands::Summary { range_minutes: 0 }).await;
        result.unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({"organizationId": "org-1", "rangeMinutes": 0})
        );
        assert!(out.contains("75.0%"));
        assert!(out.contains("16.00"));
        assert!(out.contains("50.0%"));
    }

    #[tokio::test]
    async fn negative_range_is_rejected() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            MonitoringCommands::Cluster {
                cluster_id: "c1".into(),
                range_minutes: -5,
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn cluster_summary_names_cluster() {
        let mut platform = FakePlatform::new().respond(json!({
            "organizationId": "org-1",
            "clusterId": "c1",
            "cpuMillicores": {"total": 1000, "available": 1000},
            "memoryBytes": {"total": 0, "available": 0},
            "storageBytes": {"total": 0, "available": 0}
        }));
        let (result, out) = run(
            &mut platform,
            MonitoringCommands::Cluster {
                cluster_id: "c1".into(),
                range_minutes: 60,
            },
        )
        .await;
        result.unwrap();
        assert_eq!(platform.methods(), vec!["Monitoring.ClusterSummary"]);
        assert!(out.contains("c1"));
        assert!(out.contains("0.0%"));
    }
}
