//! Nalej public API CLI binary entrypoint.

use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

use nalej_cli::cli::{Cli, Commands, help_for};
use nalej_cli::client::Platform;
use nalej_cli::commands::{
    AgentCommand, AppCommand, AppnetCommand, ClusterCommand, DevicesCommand,
    EdgeControllerCommand, InventoryCommand, LogCommand, LoginCommand, MonitoringCommand,
    NodeCommand, OptionsCommand, OrgCommand, ProvisionCommand, RolesCommand, UsersCommand,
};
use nalej_cli::{CliError, Session, Settings};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug = cli.global.debug;

    // RUST_LOG wins over --debug
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run_until_interrupted(cli)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            if debug {
                if let Some(details) = e.details() {
                    eprintln!("{details}");
                }
            }
            if e.wants_help() {
                let mut help = help_for(std::env::args_os().skip(1));
                eprintln!("{}", help.render_help());
            }
            ExitCode::FAILURE
        }
    }
}

/// Run the command; Ctrl-C ends watch loops cleanly.
async fn run_until_interrupted(cli: Cli) -> Result<(), CliError> {
    tokio::select! {
        result = run(cli) => result,
        signal = tokio::signal::ctrl_c() => {
            signal?;
            debug!("interrupted");
            Ok(())
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    // Local commands must keep working to repair bad stored options.
    let settings = match cli.command {
        Commands::Options { .. } | Commands::Logout => Settings::local(&cli.global)?,
        _ => Settings::resolve(&cli.global)?,
    };
    let mut stdout = io::stdout().lock();

    // Sessions connect lazily, so commands that never call stay offline.
    let mut session = match cli.command {
        Commands::Login(_) => Session::anonymous(settings.login.clone()),
        _ => Session::new(settings.api.clone(), settings.credentials()),
    };
    let result = dispatch(&settings, &mut session, &mut stdout, &cli.command).await;
    if let Err(e) = session.close().await {
        warn!(error = %e, "closing the connection failed");
    }
    stdout.flush()?;
    result
}

async fn dispatch<P: Platform, W: Write>(
    settings: &Settings,
    platform: &mut P,
    out: &mut W,
    command: &Commands,
) -> Result<(), CliError> {
    match command {
        Commands::Login(args) => LoginCommand::new(settings).login(platform, out, args).await,
        Commands::Logout => LoginCommand::new(settings).logout(out),
        Commands::Options { command } => OptionsCommand::new(settings).execute(out, command),
        Commands::Org { command } => {
            OrgCommand::new(settings).execute(platform, out, command).await
        }
        Commands::Users { command } => {
            UsersCommand::new(settings).execute(platform, out, command).await
        }
        Commands::Roles { command } => {
            RolesCommand::new(settings).execute(platform, out, command).await
        }
        Commands::Cluster { command } => {
            ClusterCommand::new(settings).execute(platform, out, command).await
        }
        Commands::Node { command } => {
            NodeCommand::new(settings).execute(platform, out, command).await
        }
        Commands::EdgeController { command } => {
            EdgeControllerCommand::new(settings)
                .execute(platform, out, command)
                .await
        }
        Commands::Agent { command } => {
            AgentCommand::new(settings).execute(platform, out, command).await
        }
        Commands::Devices { command } => {
            DevicesCommand::new(settings).execute(platform, out, command).await
        }
        Commands::App { command } => {
            AppCommand::new(settings).execute(platform, out, command).await
        }
        Commands::Appnet { command } => {
            AppnetCommand::new(settings).execute(platform, out, command).await
        }
        Commands::Inventory { command } => {
            InventoryCommand::new(settings)
                .execute(platform, out, command)
                .await
        }
        Commands::Monitoring { command } => {
            MonitoringCommand::new(settings)
                .execute(platform, out, command)
                .await
        }
        Commands::Log { command } => {
            LogCommand::new(settings).execute(platform, out, command).await
        }
        Commands::Provision { command } => {
            ProvisionCommand::new(settings)
                .execute(platform, out, command)
                .await
        }
    }
}
