//! Binary entry point for the Gantry CLI.

use std::io::{self, Write};
use std::process;

use clap::Parser;
use thiserror::Error;

use gantry::{Fleet, FleetError, GantryConfig, GceClient, GceError, GpuKind, SshConfigFile};

mod cli;

use cli::{Cli, Command, GpuArg};

#[derive(Debug, Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error("client error: {0}")]
    Client(String),
    #[error("command failed: {0}")]
    Fleet(#[from] FleetError<GceError>),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let exit_code = match dispatch(cli).await {
        Ok(()) => 0,
        Err(err) => {
            report_error(&err);
            1
        }
    };

    process::exit(exit_code);
}

async fn dispatch(cli: Cli) -> Result<(), CliError> {
    let config =
        GantryConfig::load_without_cli_args().map_err(|err| CliError::Config(err.to_string()))?;
    let scope = config.scope(cli.project_id.as_deref(), cli.zone.as_deref());
    let client = GceClient::new(&config).map_err(|err| CliError::Client(err.to_string()))?;
    let fleet = Fleet::new(client);
    let mut stdout = io::stdout();

    match cli.command {
        Command::Ls => fleet.list(&scope, &mut stdout).await?,
        Command::Start(args) => fleet.start(&scope, &args.instance, &mut stdout).await?,
        Command::Stop(args) => fleet.stop(&scope, &args.instance, &mut stdout).await?,
        Command::Ssh(args) => {
            let ssh = SshConfigFile::from_configured(&config.ssh_config_path);
            fleet
                .sync_ssh(&scope, &args.instance, &ssh, &mut stdout)
                .await?;
        }
        Command::Gpu(args) => {
            fleet
                .set_accelerator(&scope, &args.instance, gpu_kind(args.gpu), &mut stdout)
                .await?;
        }
    }
    Ok(())
}

const fn gpu_kind(arg: GpuArg) -> GpuKind {
    match arg {
        GpuArg::V100 => GpuKind::V100,
        GpuArg::T4 => GpuKind::T4,
        GpuArg::None => GpuKind::None,
    }
}

fn report_error(err: &CliError) {
    write_error(io::stderr(), err);
}

fn write_error(mut target: impl Write, err: &CliError) {
    writeln!(target, "{err}").ok();
}
