//! Application clusters.
//!
//! `cluster list --watch` polls every [`WATCH_INTERVAL`] and reprints a
//! cluster when its name, labels, status, state or node counts change.

use std::io::Write;

use nalej_proto::clusters::{
    self, Cluster, ClusterId, ClusterList, InstallRequest, UpdateClusterLabelsRequest,
    UpdateClusterRequest,
};
use nalej_proto::monitoring::{self, ClusterSummaryRequest};
use nalej_proto::{OrganizationId, Rpc, Success};
use tracing::{debug, info};

use super::{Poll, label_change, label_message};
use crate::cli::{ClusterCommands, ClusterInstallArgs};
use crate::client::{LONG_CALL_TIMEOUT, Platform};
use crate::error::CliError;
use crate::labels;
use crate::output::{Message, TableDisplay, or_dash, print_table, table, timestamp};
use crate::settings::Settings;
use crate::validate::{read_file, require, window_minutes};
use crate::watch::{WATCH_INTERVAL, Watched, watch};

fn clusters_table<W: Write>(
    writer: &mut W,
    clusters: &[Cluster],
    label_length: i64,
) -> Result<(), CliError> {
    let mut t = table(&["NAME", "ID", "NODES", "LABELS", "STATUS", "STATE"]);
    for c in clusters {
        t.add_row(vec![
            c.name.clone(),
            c.cluster_id.clone(),
            format!("{}/{}", c.running_nodes, c.total_nodes),
            labels::display(&c.labels, label_length),
            c.status.clone(),
            c.state.clone(),
        ]);
    }
    print_table(writer, &t)
}

impl TableDisplay for Cluster {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        clusters_table(writer, std::slice::from_ref(self), label_length)?;
        let mut t = table(&["HOSTNAME", "MILLICORES FACTOR", "LAST ALIVE"]);
        t.add_row(vec![
            or_dash(&self.hostname),
            self.millicores_conversion_factor.to_string(),
            timestamp(self.last_alive_timestamp),
        ]);
        print_table(writer, &t)
    }
}

impl TableDisplay for ClusterList {
    fn write_table<W: Write>(&self, writer: &mut W, label_length: i64) -> Result<(), CliError> {
        clusters_table(writer, &self.clusters, label_length)
    }
}

impl Watched for Cluster {
    type Key = String;

    fn key(&self) -> String {
        self.cluster_id.clone()
    }

    fn changed(&self, previous: &Self) -> bool {
        self.name != previous.name
            || self.labels != previous.labels
            || self.status != previous.status
            || self.state != previous.state
            || self.total_nodes != previous.total_nodes
            || self.running_nodes != previous.running_nodes
    }
}

fn install_request(
    organization_id: String,
    args: &ClusterInstallArgs,
) -> Result<InstallRequest, CliError> {
    let hostname = require("hostname", &args.hostname)?.to_string();
    let static_ip = args
        .static_ip_address
        .as_deref()
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string);
    let kube_config_raw = read_file(&args.kubeconfig)?;
    Ok(InstallRequest {
        organization_id,
        kube_config_raw,
        hostname,
        target_platform: args.target_platform,
        use_static_ip_addresses: static_ip.is_some(),
        static_ip_address_ingress: static_ip,
    })
}

/// Handler for the cluster command.
pub struct ClusterCommand<'a> {
    settings: &'a Settings,
}

impl<'a> ClusterCommand<'a> {
    /// Creates a new cluster command handler.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Executes a cluster subcommand.
    ///
    /// # Errors
    ///
    /// Returns an error if validation or the call fails. With `--watch`
    /// it returns only when a poll fails.
    pub async fn execute<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        command: &ClusterCommands,
    ) -> Result<(), CliError> {
        let organization_id = self.settings.organization_id()?;
        let format = &self.settings.output;

        match command {
            ClusterCommands::Install(args) => {
                let request = install_request(organization_id, args)?;
                info!(
                    hostname = %request.hostname,
                    platform = %request.target_platform,
                    "installing cluster"
                );
                let response = platform
                    .call_with_timeout(&clusters::INSTALL, &request, LONG_CALL_TIMEOUT)
                    .await?;
                format.write(out, &response)
            }
            ClusterCommands::List { watch: false } => {
                let list = platform
                    .call(&clusters::LIST, &OrganizationId::new(organization_id))
                    .await?;
                format.write(out, &list)
            }
            ClusterCommands::List { watch: true } => {
                debug!(%organization_id, "watching clusters");
                let mut source = Poll::new(
                    platform,
                    &clusters::LIST,
                    OrganizationId::new(organization_id),
                    |list: ClusterList| list.clusters,
                );
                watch(&mut source, WATCH_INTERVAL, out, |w, clusters| {
                    format.write(w, &ClusterList { clusters })
                })
                .await
            }
            ClusterCommands::Info { cluster_id } => {
                let request = cluster_ref(organization_id, cluster_id)?;
                let cluster = platform.call(&clusters::INFO, &request).await?;
                format.write(out, &cluster)
            }
            ClusterCommands::Update {
                cluster_id,
                name,
                millicores_conversion_factor,
            } => {
                let cluster_id = require("cluster ID", cluster_id)?.to_string();
                if name.is_none() && millicores_conversion_factor.is_none() {
                    return Err(CliError::usage(
                        "nothing to update, give --name or --millicores-conversion-factor",
                    ));
                }
                if millicores_conversion_factor.is_some_and(|f| f <= 0.0) {
                    return Err(CliError::usage(
                        "--millicores-conversion-factor must be positive",
                    ));
                }
                let request = UpdateClusterRequest {
                    organization_id,
                    cluster_id,
                    name: name.clone(),
                    millicores_conversion_factor: *millicores_conversion_factor,
                };
                platform.call(&clusters::UPDATE, &request).await?;
                format.write(
                    out,
                    &Message::success(format!("Cluster {} updated", request.cluster_id)),
                )
            }
            ClusterCommands::Label { cluster_id, change } => {
                let cluster_id = require("cluster ID", cluster_id)?.to_string();
                let (add, labels) = label_change(change)?;
                let request = UpdateClusterLabelsRequest {
                    organization_id,
                    cluster_id,
                    add,
                    labels,
                };
                platform.call(&clusters::UPDATE_LABELS, &request).await?;
                format.write(
                    out,
                    &Message::success(label_message(
                        add,
                        &format!("cluster {}", request.cluster_id),
                    )),
                )
            }
            ClusterCommands::Cordon { cluster_id } => {
                let request = cluster_ref(organization_id, cluster_id)?;
                self.transition(platform, out, &clusters::CORDON, request, "cordoned").await
            }
            ClusterCommands::Uncordon { cluster_id } => {
                let request = cluster_ref(organization_id, cluster_id)?;
                self.transition(platform, out, &clusters::UNCORDON, request, "uncordoned").await
            }
            ClusterCommands::Drain { cluster_id } => {
                let request = cluster_ref(organization_id, cluster_id)?;
                self.transition(platform, out, &clusters::DRAIN, request, "drained").await
            }
            ClusterCommands::Monitor {
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

    async fn transition<P: Platform, W: Write>(
        &self,
        platform: &mut P,
        out: &mut W,
        rpc: &Rpc<ClusterId, Success>,
        request: ClusterId,
        verb: &str,
    ) -> Result<(), CliError> {
        platform.call(rpc, &request).await?;
        self.settings.output.write(
            out,
            &Message::success(format!("Cluster {} {verb}", request.cluster_id)),
        )
    }
}

fn cluster_ref(organization_id: String, cluster_id: &str) -> Result<ClusterId, CliError> {
    Ok(ClusterId {
        organization_id,
        cluster_id: require("cluster ID", cluster_id)?.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Format, LabelChange};
    use crate::client::{DEFAULT_CALL_TIMEOUT, FakePlatform};
    use nalej_proto::TargetPlatform;
    use serde_json::json;
    use tempfile::{NamedTempFile, TempDir};

    fn cluster(id: &str, status: &str, running: i64) -> serde_json::Value {
        json!({
            "organizationId": "org-1",
            "clusterId": id,
            "name": format!("cluster-{id}"),
            "labels": {"env": "prod"},
            "status": status,
            "state": "INSTALLED",
            "totalNodes": 3,
            "runningNodes": running
        })
    }

    async fn run_with(
        settings: &Settings,
        platform: &mut FakePlatform,
        command: ClusterCommands,
    ) -> (Result<(), CliError>, String) {
        let mut out = Vec::new();
        let result = ClusterCommand::new(settings)
            .execute(platform, &mut out, &command)
            .await;
        (result, String::from_utf8(out).unwrap())
    }

    async fn run(
        platform: &mut FakePlatform,
        command: ClusterCommands,
    ) -> (Result<(), CliError>, String) {
        let dir = TempDir::new().unwrap();
        run_with(&Settings::for_tests(dir.path(), "org-1"), platform, command).await
    }

    #[tokio::test]
    async fn list_renders_columns() {
        let mut platform = FakePlatform::new().respond(json!({"clusters": [cluster("c1", "ONLINE", 2)]}));
        let (result, out) = run(&mut platform, ClusterCommands::List { watch: false }).await;
        result.unwrap();
        let header = out.lines().next().unwrap();
        for column in ["NAME", "ID", "NODES", "LABELS", "STATUS"] {
            assert!(header.contains(column), "missing {column}");
        }
        assert!(out.contains("cluster-c1"));
        assert!(out.contains("2/3"));
        assert!(out.contains("env:prod"));
    }

    #[tokio::test(start_paused = true)]
    async fn list_watch_reports_changes_and_new_clusters() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        let mut platform = FakePlatform::new()
            .respond(json!({"clusters": [cluster("c1", "ONLINE", 3)]}))
            .respond(json!({"clusters": [cluster("c1", "ONLINE", 3)]}))
            .respond(json!({"clusters": [cluster("c1", "OFFLINE", 3), cluster("c2", "ONLINE", 1)]}))
            .respond(json!({"clusters": [cluster("c2", "ONLINE", 1)]}));
        let (result, out) = run_with(&settings, &mut platform, ClusterCommands::List { watch: true }).await;

        assert!(matches!(result, Err(CliError::Connection(_))));
        assert_eq!(platform.methods(), vec!["Clusters.List"; 5]);
        let batches: Vec<&str> = out.split("\n\n").collect();
        assert_eq!(batches.len(), 2, "{out}");
        assert!(batches[1].contains("OFFLINE"));
        assert!(batches[1].contains("cluster-c2"));
    }

    #[test]
    fn last_alive_alone_is_not_a_change() {
        let before: Cluster = serde_json::from_value(cluster("c1", "ONLINE", 3)).unwrap();
        let mut after = before.clone();
        after.last_alive_timestamp = 42;
        assert!(!after.changed(&before));
        after.labels.insert("tier".into(), "gold".into());
        assert!(after.changed(&before));
    }

    #[tokio::test]
    async fn install_reads_kubeconfig_and_uses_long_timeout() {
        let mut kubeconfig = NamedTempFile::new().unwrap();
        write!(kubeconfig, "apiVersion: v1").unwrap();
        let mut platform = FakePlatform::new().respond(json!({
            "organizationId": "org-1",
            "requestId": "req-1",
            "clusterId": "c9",
            "state": "QUEUED"
        }));
        let args = ClusterInstallArgs {
            kubeconfig: kubeconfig.path().to_path_buf(),
            hostname: "ingress.acme.io".into(),
            target_platform: TargetPlatform::BareMetal,
            static_ip_address: Some("10.0.0.9".into()),
        };
        let (result, out) = run(&mut platform, ClusterCommands::Install(args)).await;
        result.unwrap();

        let call = &platform.calls()[0];
        assert_eq!(call.method, "Clusters.Install");
        assert_eq!(call.timeout, LONG_CALL_TIMEOUT);
        assert_eq!(call.params["kubeConfigRaw"], "apiVersion: v1");
        assert_eq!(call.params["targetPlatform"], "BARE_METAL");
        assert_eq!(call.params["useStaticIpAddresses"], true);
        assert_eq!(call.params["staticIpAddressIngress"], "10.0.0.9");
        assert!(out.contains("req-1"));
        assert!(out.contains("QUEUED"));
    }

    #[tokio::test]
    async fn install_with_missing_kubeconfig_does_not_call() {
        let dir = TempDir::new().unwrap();
        let mut platform = FakePlatform::new();
        let args = ClusterInstallArgs {
            kubeconfig: dir.path().join("nope"),
            hostname: "h".into(),
            target_platform: TargetPlatform::Azure,
            static_ip_address: None,
        };
        let (result, _) = run(&mut platform, ClusterCommands::Install(args)).await;
        assert!(matches!(result, Err(CliError::Io(_))));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn label_with_both_flags_never_calls() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            ClusterCommands::Label {
                cluster_id: "c1".into(),
                change: LabelChange {
                    labels: "a:b".into(),
                    add: true,
                    remove: true,
                },
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(m)) if m.contains("mutually exclusive")));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn label_removal_sends_one_request() {
        let mut platform = FakePlatform::new().respond(json!({}));
        let (result, out) = run(
            &mut platform,
            ClusterCommands::Label {
                cluster_id: "c1".into(),
                change: LabelChange {
                    labels: "a:b;c:d".into(),
                    add: false,
                    remove: true,
                },
            },
        )
        .await;
        result.unwrap();
        assert_eq!(
            platform.single_params(),
            &json!({
                "organizationId": "org-1",
                "clusterId": "c1",
                "add": false,
                "labels": {"a": "b", "c": "d"}
            })
        );
        assert_eq!(out, "✓ Labels removed from cluster c1\n");
    }

    #[tokio::test]
    async fn cordon_uncordon_drain_use_their_methods() {
        let mut platform = FakePlatform::new()
            .respond(json!({}))
            .respond(json!({}))
            .respond(json!({}));
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1");
        for command in [
            ClusterCommands::Cordon { cluster_id: "c1".into() },
            ClusterCommands::Uncordon { cluster_id: "c1".into() },
            ClusterCommands::Drain { cluster_id: "c1".into() },
        ] {
            run_with(&settings, &mut platform, command).await.0.unwrap();
        }
        assert_eq!(
            platform.methods(),
            vec!["Clusters.Cordon", "Clusters.Uncordon", "Clusters.Drain"]
        );
        assert!(platform.calls().iter().all(|c| c.timeout == DEFAULT_CALL_TIMEOUT));
    }

    #[tokio::test]
    async fn empty_cluster_id_is_rejected() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(&mut platform, ClusterCommands::Drain { cluster_id: "  ".into() }).await;
        assert!(matches!(result, Err(CliError::Usage(m)) if m == "cluster ID cannot be empty"));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn update_needs_a_field() {
        let mut platform = FakePlatform::new();
        let (result, _) = run(
            &mut platform,
            ClusterCommands::Update {
                cluster_id: "c1".into(),
                name: None,
                millicores_conversion_factor: None,
            },
        )
        .await;
        assert!(matches!(result, Err(CliError::Usage(_))));
        assert!(platform.calls().is_empty());
    }

    #[tokio::test]
    async fn monitor_asks_for_cluster_summary() {
        let dir = TempDir::new().unwrap();
        let settings = Settings::for_tests(dir.path(), "org-1").with_format(Format::Json);
        let mut platform = FakePlatform::new().respond(json!({
            "organizationId": "org-1",
            "clusterId": "c1",
            "cpuMillicores": {"total": 4000, "available": 1000},
            "memoryBytes": {"total": 0, "available": 0},
            "storageBytes": {"total": 0, "available": 0}
        }));
        let (result, out) = run_with(
            &settings,
            &mut platform,
            ClusterCommands::Monitor {
                cluster_id: "c1".into(),
                range_minutes: 30,
            },
        )
        .await;
        result.unwrap();
        assert_eq!(platform.methods(), vec!["Monitoring.ClusterSummary"]);
        assert_eq!(platform.single_params()["rangeMinutes"], 30);
        assert!(out.contains("\"cpuMillicores\""));
    }
}
