//! Command-line argument parsing with clap.

use std::ffi::OsStr;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use nalej_proto::TargetPlatform;
use nalej_proto::agent::AgentType;

/// Nalej public API client.
#[derive(Parser, Debug, Clone)]
#[command(name = "public-api-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Connection, output and state flags shared by every command.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags accepted by every command. Unset values fall back to stored options.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Public API address.
    #[arg(long, global = true, env = "NALEJ_ADDRESS")]
    pub nalej_address: Option<String>,

    /// Public API port.
    #[arg(long, global = true, env = "NALEJ_PORT")]
    pub port: Option<u16>,

    /// Login service address.
    #[arg(long, global = true, env = "NALEJ_LOGIN_ADDRESS")]
    pub login_address: Option<String>,

    /// Login service port.
    #[arg(long, global = true, env = "NALEJ_LOGIN_PORT")]
    pub login_port: Option<u16>,

    /// Use TLS to connect (true or false).
    #[arg(long, global = true, value_name = "BOOL")]
    pub use_tls: Option<bool>,

    /// PEM bundle of the CA that signed the server certificates.
    #[arg(long, global = true, env = "NALEJ_CA_CERT")]
    pub ca_cert: Option<PathBuf>,

    /// Skip server certificate verification; `--insecure=false` overrides
    /// a stored `insecure` option.
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub insecure: Option<bool>,

    /// Output format.
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<Format>,

    /// Truncate label columns to this many characters; 0 disables it.
    #[arg(long, global = true)]
    pub label_length: Option<i64>,

    /// Organization identifier.
    #[arg(long, global = true, env = "NALEJ_ORGANIZATION_ID")]
    pub organization_id: Option<String>,

    /// Directory holding credentials and options (default ~/.nalej).
    #[arg(long, global = true, env = "NALEJ_CRED_PATH")]
    pub cred_path: Option<PathBuf>,

    /// Verbose logging and error details.
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
    /// Same as JSON.
    Raw,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Log in and store the credentials.
    Login(LoginArgs),

    /// Remove the stored credentials.
    Logout,

    /// Manage stored default values.
    #[command(alias = "opt")]
    Options {
        /// Options subcommand to execute.
        #[command(subcommand)]
        command: OptionsCommands,
    },

    /// Organization profile and statistics.
    #[command(alias = "organization")]
    Org {
        /// Organization subcommand to execute.
        #[command(subcommand)]
        command: OrgCommands,
    },

    /// User management.
    #[command(alias = "user")]
    Users {
        /// Users subcommand to execute.
        #[command(subcommand)]
        command: UsersCommands,
    },

    /// Role management.
    #[command(alias = "role")]
    Roles {
        /// Roles subcommand to execute.
        #[command(subcommand)]
        command: RolesCommands,
    },

    /// Cluster management.
    #[command(alias = "clusters")]
    Cluster {
        /// Cluster subcommand to execute.
        #[command(subcommand)]
        command: ClusterCommands,
    },

    /// Node management.
    #[command(alias = "nodes")]
    Node {
        /// Node subcommand to execute.
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Edge controller management.
    #[command(name = "ec", alias = "edgecontroller")]
    EdgeController {
        /// Edge controller subcommand to execute.
        #[command(subcommand)]
        command: EdgeControllerCommands,
    },

    /// Agent management.
    #[command(alias = "agents")]
    Agent {
        /// Agent subcommand to execute.
        #[command(subcommand)]
        command: AgentCommands,
    },

    /// Device and device group management.
    #[command(alias = "device")]
    Devices {
        /// Devices subcommand to execute.
        #[command(subcommand)]
        command: DevicesCommands,
    },

    /// Application descriptors and instances.
    #[command(name = "app", alias = "application")]
    App {
        /// Application subcommand to execute.
        #[command(subcommand)]
        command: AppCommands,
    },

    /// Connections between application instances.
    #[command(alias = "appnetwork")]
    Appnet {
        /// Application network subcommand to execute.
        #[command(subcommand)]
        command: AppnetCommands,
    },

    /// Edge inventory.
    #[command(alias = "inv")]
    Inventory {
        /// Inventory subcommand to execute.
        #[command(subcommand)]
        command: InventoryCommands,
    },

    /// Resource usage summaries.
    #[command(alias = "mon")]
    Monitoring {
        /// Monitoring subcommand to execute.
        #[command(subcommand)]
        command: MonitoringCommands,
    },

    /// Unified log search.
    #[command(alias = "logs")]
    Log {
        /// Log subcommand to execute.
        #[command(subcommand)]
        command: LogCommands,
    },

    /// Cluster provisioning.
    Provision {
        /// Provision subcommand to execute.
        #[command(subcommand)]
        command: ProvisionCommands,
    },
}

/// Arguments for the login command.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email.
    #[arg(long)]
    pub email: String,

    /// Account password.
    #[arg(long)]
    pub password: String,
}

/// Options subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum OptionsCommands {
    /// Store a default value.
    Set {
        /// Option key, e.g. organizationID.
        key: String,
        /// Value to store.
        value: String,
    },

    /// Show a stored value.
    Get {
        /// Option key.
        key: String,
    },

    /// Remove a stored value.
    Delete {
        /// Option key.
        key: String,
    },

    /// Show every stored value.
    List,

    /// Store the platform domain and derive the API and login addresses.
    Platform {
        /// Platform domain, without api. or login. prefix.
        address: String,
    },
}

/// Organization subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum OrgCommands {
    /// Show the organization profile.
    Info,

    /// Update the organization profile.
    Update(OrgUpdateArgs),

    /// Show application statistics.
    Stats {
        /// Keep polling and print changes.
        #[arg(short, long)]
        watch: bool,
    },
}

/// Arguments for updating the organization profile.
#[derive(Args, Debug, Clone, Default)]
pub struct OrgUpdateArgs {
    /// New name.
    #[arg(long)]
    pub name: Option<String>,
    /// New street address.
    #[arg(long)]
    pub full_address: Option<String>,
    /// New city.
    #[arg(long)]
    pub city: Option<String>,
    /// New state.
    #[arg(long)]
    pub state: Option<String>,
    /// New country.
    #[arg(long)]
    pub country: Option<String>,
    /// New postal code.
    #[arg(long)]
    pub zip_code: Option<String>,
    /// Image file to use as logo.
    #[arg(long)]
    pub photo_path: Option<PathBuf>,
}

/// Users subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum UsersCommands {
    /// Create a user.
    Add {
        /// User email.
        #[arg(long)]
        email: String,
        /// Initial password.
        #[arg(long)]
        password: String,
        /// Display name.
        #[arg(long)]
        name: String,
        /// Role to assign.
        #[arg(long)]
        role_id: String,
    },

    /// Show a user.
    Info {
        /// User email.
        email: Option<String>,
        /// User email, as a flag.
        #[arg(long = "email", id = "email_flag", value_name = "EMAIL")]
        email_flag: Option<String>,
    },

    /// List users.
    List,

    /// Delete a user.
    Delete {
        /// User email.
        email: String,
    },

    /// Change a user password.
    ResetPassword {
        /// User email.
        email: String,
        /// Current password.
        #[arg(long)]
        password: String,
        /// New password.
        #[arg(long)]
        new_password: String,
    },

    /// Update user details.
    Update {
        /// User email.
        email: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New last name.
        #[arg(long)]
        last_name: Option<String>,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        /// New phone.
        #[arg(long)]
        phone: Option<String>,
        /// New location.
        #[arg(long)]
        location: Option<String>,
    },
}

/// Roles subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum RolesCommands {
    /// List roles.
    List,

    /// Assign a role to a user.
    Assign {
        /// User email.
        email: String,
        /// Role identifier.
        role_id: String,
    },
}

/// `--labels` with its `--add`/`--remove` pair.
#[derive(Args, Debug, Clone, Default)]
pub struct LabelChange {
    /// Labels as key:value pairs separated by ';'.
    #[arg(long)]
    pub labels: String,
    /// Add the labels.
    #[arg(long)]
    pub add: bool,
    /// Remove the labels.
    #[arg(long)]
    pub remove: bool,
}

/// Cluster subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ClusterCommands {
    /// Install the platform agent on an existing cluster.
    Install(ClusterInstallArgs),

    /// List clusters.
    List {
        /// Keep polling and print changes.
        #[arg(short, long)]
        watch: bool,
    },

    /// Show a cluster.
    Info {
        /// Cluster identifier.
        cluster_id: String,
    },

    /// Update cluster settings.
    Update {
        /// Cluster identifier.
        cluster_id: String,
        /// New name.
        #[arg(long)]
        name: Option<String>,
        /// New millicores conversion factor.
        #[arg(long)]
        millicores_conversion_factor: Option<f64>,
    },

    /// Add or remove cluster labels.
    Label {
        /// Cluster identifier.
        cluster_id: String,
        /// Label change.
        #[command(flatten)]
        change: LabelChange,
    },

    /// Stop scheduling new applications on a cluster.
    Cordon {
        /// Cluster identifier.
        cluster_id: String,
    },

    /// Resume scheduling on a cluster.
    Uncordon {
        /// Cluster identifier.
        cluster_id: String,
    },

    /// Move the applications of a cordoned cluster elsewhere.
    Drain {
        /// Cluster identifier.
        cluster_id: String,
    },

    /// Show resource usage of a cluster.
    Monitor {
        /// Cluster identifier.
        cluster_id: String,
        /// Averaging window in minutes; 0 returns the latest sample.
        #[arg(long, default_value_t = 0)]
        range_minutes: i32,
    },
}

/// Arguments for installing a cluster.
#[derive(Args, Debug, Clone)]
pub struct ClusterInstallArgs {
    /// Kubeconfig file of the target cluster.
    #[arg(long)]
    pub kubeconfig: PathBuf,
    /// Ingress hostname.
    #[arg(long)]
    pub hostname: String,
    /// Infrastructure provider.
    #[arg(long)]
    pub target_platform: TargetPlatform,
    /// Static IP address of the ingress.
    #[arg(long)]
    pub static_ip_address: Option<String>,
}

/// Node subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum NodeCommands {
    /// List the nodes of a cluster.
    List {
        /// Cluster identifier.
        cluster_id: String,
    },

    /// Add or remove node labels.
    Label {
        /// Cluster identifier.
        cluster_id: String,
        /// Node identifier.
        node_id: String,
        /// Label change.
        #[command(flatten)]
        change: LabelChange,
    },
}

/// SSH access to a host.
#[derive(Args, Debug, Clone, Default)]
pub struct SshArgs {
    /// Host to install on.
    #[arg(long)]
    pub target_host: String,
    /// SSH user.
    #[arg(long)]
    pub username: String,
    /// SSH password.
    #[arg(long)]
    pub password: Option<String>,
    /// SSH private key file.
    #[arg(long)]
    pub public_key_path: Option<PathBuf>,
    /// The user needs sudo.
    #[arg(long)]
    pub sudoer: bool,
}

/// Edge controller subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum EdgeControllerCommands {
    /// Create a token to join an edge controller.
    CreateJoinToken {
        /// Also write the token to this file.
        #[arg(long)]
        output_path: Option<PathBuf>,
    },

    /// Unlink an edge controller.
    Unlink {
        /// Edge controller identifier.
        edge_controller_id: String,
        /// Unlink even if it is not reachable.
        #[arg(long)]
        force: bool,
    },

    /// Install an edge controller on a host.
    Install {
        /// Edge controller identifier.
        edge_controller_id: String,
        /// Target host access.
        #[command(flatten)]
        ssh: SshArgs,
    },

    /// Set the geolocation of an edge controller.
    Location {
        /// Edge controller identifier.
        edge_controller_id: String,
        /// Geolocation.
        geolocation: String,
    },

    /// Add or remove edge controller labels.
    Label {
        /// Edge controller identifier.
        edge_controller_id: String,
        /// Label change.
        #[command(flatten)]
        change: LabelChange,
    },
}

/// Agent binary flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AgentTypeArg {
    /// 64-bit Linux.
    LinuxAmd64,
    /// 64-bit ARM Linux.
    LinuxArm64,
    /// 32-bit ARM Linux.
    LinuxArm,
    /// 64-bit Windows.
    WindowsAmd64,
    /// 64-bit macOS.
    DarwinAmd64,
}

impl From<AgentTypeArg> for AgentType {
    fn from(arg: AgentTypeArg) -> Self {
        match arg {
            AgentTypeArg::LinuxAmd64 => Self::LinuxAmd64,
            AgentTypeArg::LinuxArm64 => Self::LinuxArm64,
            AgentTypeArg::LinuxArm => Self::LinuxArm,
            AgentTypeArg::WindowsAmd64 => Self::WindowsAmd64,
            AgentTypeArg::DarwinAmd64 => Self::DarwinAmd64,
        }
    }
}

/// Agent subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AgentCommands {
    /// Create a token for agents to join an edge controller.
    CreateJoinToken {
        /// Edge controller identifier.
        edge_controller_id: String,
    },

    /// Install an agent through an edge controller.
    Install {
        /// Edge controller identifier.
        edge_controller_id: String,
        /// Target host access.
        #[command(flatten)]
        ssh: SshArgs,
        /// Agent flavour.
        #[arg(long, value_enum)]
        agent_type: AgentTypeArg,
    },

    /// Uninstall an agent.
    Uninstall {
        /// Asset identifier.
        asset_id: String,
        /// Remove the asset even if the agent is not reachable.
        #[arg(long)]
        force: bool,
    },

    /// Start or stop agent monitoring.
    Monitoring {
        /// Edge controller identifier.
        edge_controller_id: String,
        /// Asset identifier.
        asset_id: String,
        /// Start monitoring.
        #[arg(long)]
        activate: bool,
        /// Stop monitoring.
        #[arg(long)]
        deactivate: bool,
    },

    /// Add or remove asset labels.
    Label {
        /// Edge controller identifier.
        edge_controller_id: String,
        /// Asset identifier.
        asset_id: String,
        /// Label change.
        #[command(flatten)]
        change: LabelChange,
    },
}

/// Devices subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DevicesCommands {
    /// Device group management.
    Group {
        /// Device group subcommand to execute.
        #[command(subcommand)]
        command: DeviceGroupCommands,
    },

    /// List the devices of a group.
    List {
        /// Device group identifier.
        device_group_id: String,
    },

    /// Add or remove device labels.
    Label {
        /// Device group identifier.
        device_group_id: String,
        /// Device identifier.
        device_id: String,
        /// Label change.
        #[command(flatten)]
        change: LabelChange,
    },

    /// Enable or disable a device.
    Update {
        /// Device group identifier.
        device_group_id: String,
        /// Device identifier.
        device_id: String,
        /// Enable the device.
        #[arg(long)]
        enabled: bool,
        /// Disable the device.
        #[arg(long)]
        disabled: bool,
    },

    /// Remove a device.
    Remove {
        /// Device group identifier.
        device_group_id: String,
        /// Device identifier.
        device_id: String,
    },
}

/// Device group subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DeviceGroupCommands {
    /// Create a device group.
    Add {
        /// Group name.
        name: String,
        /// Create the group enabled.
        #[arg(long)]
        enabled: bool,
        /// Create the group disabled.
        #[arg(long)]
        disabled: bool,
        /// New devices of the group are enabled.
        #[arg(long)]
        default_connectivity: bool,
        /// New devices of the group are disabled.
        #[arg(long)]
        no_default_connectivity: bool,
    },

    /// List device groups.
    List,

    /// Remove a device group.
    Remove {
        /// Device group identifier.
        device_group_id: String,
    },
}

/// Application subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AppCommands {
    /// Application descriptors.
    #[command(name = "desc", alias = "descriptor")]
    Descriptor {
        /// Descriptor subcommand to execute.
        #[command(subcommand)]
        command: DescriptorCommands,
    },

    /// Application instances.
    #[command(name = "inst", alias = "instance")]
    Instance {
        /// Instance subcommand to execute.
        #[command(subcommand)]
        command: InstanceCommands,
    },
}

/// Descriptor subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DescriptorCommands {
    /// Register a descriptor from a JSON file.
    Add {
        /// Descriptor file.
        path: PathBuf,
    },

    /// List descriptors.
    List,

    /// Show a descriptor.
    Info {
        /// Descriptor identifier.
        descriptor_id: String,
    },

    /// Delete a descriptor.
    Delete {
        /// Descriptor identifier.
        descriptor_id: String,
    },

    /// Show the parameters a descriptor accepts.
    Params {
        /// Descriptor identifier.
        descriptor_id: String,
    },

    /// Add or remove descriptor labels.
    Label {
        /// Descriptor identifier.
        descriptor_id: Option<String>,
        /// Descriptor identifier, as a flag.
        #[arg(long = "descriptor-id", id = "descriptor_id_flag", value_name = "DESCRIPTOR_ID")]
        descriptor_id_flag: Option<String>,
        /// Label change.
        #[command(flatten)]
        change: LabelChange,
    },
}

/// Instance subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum InstanceCommands {
    /// Deploy a descriptor.
    Deploy {
        /// Descriptor identifier.
        descriptor_id: String,
        /// Instance name.
        name: String,
        /// Parameter values as name=value pairs separated by ','.
        #[arg(long)]
        params: Option<String>,
    },

    /// Undeploy an instance.
    Undeploy {
        /// Instance identifier.
        instance_id: String,
    },

    /// List instances.
    List,

    /// Show an instance.
    Info {
        /// Instance identifier.
        instance_id: String,
    },
}

/// Application network subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AppnetCommands {
    /// Connect an outbound interface to an inbound interface.
    Add {
        /// Source instance identifier.
        source_instance_id: String,
        /// Outbound interface of the source.
        outbound: String,
        /// Target instance identifier.
        target_instance_id: String,
        /// Inbound interface of the target.
        inbound: String,
    },

    /// Remove a connection.
    Remove {
        /// Source instance identifier.
        source_instance_id: String,
        /// Outbound interface of the source.
        outbound: String,
        /// Target instance identifier.
        target_instance_id: String,
        /// Inbound interface of the target.
        inbound: String,
        /// Remove even if the outbound is required.
        #[arg(long)]
        force: bool,
    },

    /// List connections.
    List,

    /// List inbound interfaces available for connection.
    Inbound {
        /// Instance identifier.
        instance_id: String,
    },

    /// List outbound interfaces available for connection.
    Outbound {
        /// Instance identifier.
        instance_id: String,
    },
}

/// Inventory subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum InventoryCommands {
    /// List edge controllers, assets and devices.
    List,

    /// Show an asset.
    Info {
        /// Asset identifier.
        asset_id: String,
    },

    /// Set the location of an asset.
    Location {
        /// Asset identifier.
        asset_id: String,
        /// Location.
        location: String,
    },

    /// Add or remove asset labels.
    Label {
        /// Asset identifier.
        asset_id: String,
        /// Label change.
        #[command(flatten)]
        change: LabelChange,
    },
}

/// Monitoring subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum MonitoringCommands {
    /// Usage summary of the organization.
    Summary {
        /// Averaging window in minutes; 0 returns the latest sample.
        #[arg(long, default_value_t = 0)]
        range_minutes: i32,
    },

    /// Usage summary of one cluster.
    Cluster {
        /// Cluster identifier.
        cluster_id: String,
        /// Averaging window in minutes; 0 returns the latest sample.
        #[arg(long, default_value_t = 0)]
        range_minutes: i32,
    },
}

/// Filters of a log search.
#[derive(Args, Debug, Clone, Default)]
pub struct LogFilter {
    /// Application instance identifier.
    #[arg(long)]
    pub instance_id: Option<String>,
    /// Service group instance identifier.
    #[arg(long)]
    pub sg_instance_id: Option<String>,
    /// Service identifier.
    #[arg(long)]
    pub service_id: Option<String>,
    /// Only entries containing this text.
    #[arg(long)]
    pub message: Option<String>,
    /// Start of the range, e.g. "2020-01-31 12:00:00".
    #[arg(long)]
    pub from: Option<String>,
    /// End of the range.
    #[arg(long)]
    pub to: Option<String>,
    /// Newest entries first.
    #[arg(long)]
    pub desc: bool,
}

/// Log subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum LogCommands {
    /// Search log entries.
    Search {
        /// Search filters.
        #[command(flatten)]
        filter: LogFilter,
        /// Keep polling and print new entries.
        #[arg(short, long)]
        follow: bool,
    },

    /// Log downloads.
    Download {
        /// Download subcommand to execute.
        #[command(subcommand)]
        command: DownloadCommands,
    },
}

/// Log download subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum DownloadCommands {
    /// Ask the platform to prepare a download.
    Request {
        /// Search filters.
        #[command(flatten)]
        filter: LogFilter,
    },

    /// List download requests.
    List {
        /// Keep polling and print changes.
        #[arg(short, long)]
        watch: bool,
    },

    /// Show the state of a download request.
    Check {
        /// Request identifier.
        request_id: String,
    },
}

/// Provision subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ProvisionCommands {
    /// Provision a new cluster.
    Cluster {
        /// Name of the new cluster.
        #[arg(long)]
        cluster_name: String,
        /// Number of nodes.
        #[arg(long)]
        num_nodes: i64,
        /// Machine type of the nodes.
        #[arg(long)]
        node_type: String,
        /// Zone to create the cluster in.
        #[arg(long)]
        zone: String,
        /// Infrastructure provider.
        #[arg(long)]
        target_platform: TargetPlatform,
        /// Kubernetes version.
        #[arg(long)]
        kubernetes_version: Option<String>,
    },

    /// Change the number of nodes of a cluster.
    Scale {
        /// Cluster identifier.
        cluster_id: String,
        /// New number of nodes.
        #[arg(long)]
        num_nodes: i64,
        /// Infrastructure provider.
        #[arg(long)]
        target_platform: TargetPlatform,
    },

    /// Destroy a provisioned cluster.
    Decommission {
        /// Cluster identifier.
        cluster_id: String,
        /// Infrastructure provider.
        #[arg(long)]
        target_platform: TargetPlatform,
    },
}

/// The deepest subcommand named by `args`, for printing its help.
///
/// Arguments that are not subcommand names are skipped.
pub fn help_for<I, S>(args: I) -> clap::Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Cli::command();
    command.build();
    for arg in args {
        if let Some(sub) = command.find_subcommand(arg.as_ref()).cloned() {
            command = sub;
        }
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_help_does_not_panic() {
        Cli::command().debug_assert();
    }

    #[test]
    fn insecure_flag_takes_optional_value() {
        let cli = Cli::parse_from(["public-api-cli", "cluster", "info", "--insecure", "c1"]);
        assert_eq!(cli.global.insecure, Some(true));
        assert!(matches!(
            cli.command,
            Commands::Cluster {
                command: ClusterCommands::Info { ref cluster_id }
            } if cluster_id == "c1"
        ));
        let cli = Cli::parse_from(["public-api-cli", "--insecure=false", "cluster", "list"]);
        assert_eq!(cli.global.insecure, Some(false));
    }

    #[test]
    fn global_flags_default_to_unset() {
        let cli = Cli::parse_from(["public-api-cli", "cluster", "list"]);
        assert!(cli.global.nalej_address.is_none());
        assert!(cli.global.output.is_none());
        assert!(cli.global.insecure.is_none());
        assert!(matches!(
            cli.command,
            Commands::Cluster {
                command: ClusterCommands::List { watch: false }
            }
        ));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "public-api-cli",
            "cluster",
            "list",
            "--output",
            "json",
            "--use-tls",
            "false",
            "--organization-id",
            "org-1",
            "-w",
        ]);
        assert_eq!(cli.global.output, Some(Format::Json));
        assert_eq!(cli.global.use_tls, Some(false));
        assert_eq!(cli.global.organization_id.as_deref(), Some("org-1"));
        assert!(matches!(
            cli.command,
            Commands::Cluster {
                command: ClusterCommands::List { watch: true }
            }
        ));
    }

    #[test]
    fn parse_label_change() {
        let cli = Cli::parse_from([
            "public-api-cli",
            "cluster",
            "label",
            "c1",
            "--labels",
            "env:prod;tier:web",
            "--add",
        ]);
        match cli.command {
            Commands::Cluster {
                command: ClusterCommands::Label { cluster_id, change },
            } => {
                assert_eq!(cluster_id, "c1");
                assert_eq!(change.labels, "env:prod;tier:web");
                assert!(change.add);
                assert!(!change.remove);
            }
            _ => panic!("expected cluster label command"),
        }
    }

    #[test]
    fn parse_target_platform() {
        let cli = Cli::parse_from([
            "public-api-cli",
            "provision",
            "decommission",
            "c1",
            "--target-platform",
            "azure",
        ]);
        match cli.command {
            Commands::Provision {
                command: ProvisionCommands::Decommission { target_platform, .. },
            } => assert_eq!(target_platform, TargetPlatform::Azure),
            _ => panic!("expected provision decommission command"),
        }
        assert!(
            Cli::try_parse_from([
                "public-api-cli",
                "provision",
                "decommission",
                "c1",
                "--target-platform",
                "gcp",
            ])
            .is_err()
        );
    }

    #[test]
    fn parse_descriptor_label_by_flag() {
        let cli = Cli::parse_from([
            "public-api-cli",
            "app",
            "desc",
            "label",
            "--descriptor-id",
            "d1",
            "--labels",
            "a:b",
            "--remove",
        ]);
        match cli.command {
            Commands::App {
                command:
                    AppCommands::Descriptor {
                        command:
                            DescriptorCommands::Label {
                                descriptor_id,
                                descriptor_id_flag,
                                change,
                            },
                    },
            } => {
                assert!(descriptor_id.is_none());
                assert_eq!(descriptor_id_flag.as_deref(), Some("d1"));
                assert!(change.remove);
            }
            _ => panic!("expected app desc label command"),
        }
    }

    #[test]
    fn parse_ec_alias_and_agent_type() {
        let cli = Cli::parse_from([
            "public-api-cli",
            "agent",
            "install",
            "ec-1",
            "--target-host",
            "10.0.0.2",
            "--username",
            "root",
            "--password",
            "pw",
            "--agent-type",
            "linux-arm64",
        ]);
        match cli.command {
            Commands::Agent {
                command:
                    AgentCommands::Install {
                        edge_controller_id,
                        ssh,
                        agent_type,
                    },
            } => {
                assert_eq!(edge_controller_id, "ec-1");
                assert_eq!(ssh.username, "root");
                assert_eq!(AgentType::from(agent_type), AgentType::LinuxArm64);
            }
            _ => panic!("expected agent install command"),
        }

        let cli = Cli::parse_from(["public-api-cli", "edgecontroller", "unlink", "ec-1"]);
        assert!(matches!(
            cli.command,
            Commands::EdgeController {
                command: EdgeControllerCommands::Unlink { force: false, .. }
            }
        ));
    }

    #[test]
    fn parse_log_search_follow() {
        let cli = Cli::parse_from([
            "public-api-cli",
            "log",
            "search",
            "--instance-id",
            "i1",
            "--from",
            "2021-01-01",
            "--follow",
        ]);
        match cli.command {
            Commands::Log {
                command: LogCommands::Search { filter, follow },
            } => {
                assert!(follow);
                assert_eq!(filter.instance_id.as_deref(), Some("i1"));
                assert_eq!(filter.from.as_deref(), Some("2021-01-01"));
            }
            _ => panic!("expected log search command"),
        }
    }

    #[test]
    fn help_for_finds_nested_subcommand() {
        let help = help_for(["users", "info", "--email"]);
        assert_eq!(help.get_name(), "info");
        let help = help_for(["app", "--output", "json", "desc", "label"]);
        assert_eq!(help.get_name(), "label");
        assert_eq!(help_for(Vec::<String>::new()).get_name(), "public-api-cli");
    }
}
