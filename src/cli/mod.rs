//! Command-line interface definitions for the `gantry` binary.
//!
//! This module centralises the clap parser structures so both the main binary
//! and the build script can reuse them when generating the manual page. It
//! must stay free of dependencies on the library crate for that reason.

use clap::{Parser, Subcommand, ValueEnum};

/// Top-level CLI for the `gantry` binary.
#[derive(Debug, Parser)]
#[command(
    name = "gantry",
    about = "Operate a small Compute Engine VM fleet: list, start, stop, GPUs, SSH config",
    arg_required_else_help = true
)]
pub(crate) struct Cli {
    /// Override the configured project for this invocation.
    #[arg(long, global = true, value_name = "PROJECT")]
    pub(crate) project_id: Option<String>,
    /// Override the configured zone for this invocation.
    #[arg(long, global = true, value_name = "ZONE")]
    pub(crate) zone: Option<String>,
    /// Subcommand to run.
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Subcommands accepted by `gantry`.
#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List instances in the configured project and zone.
    #[command(name = "ls", about = "List instances in the configured project and zone")]
    Ls,
    /// Start an instance and wait for the operation to finish.
    #[command(name = "start", about = "Start an instance and wait for completion")]
    Start(InstanceArg),
    /// Stop an instance and wait for the operation to finish.
    #[command(name = "stop", about = "Stop an instance and wait for completion")]
    Stop(InstanceArg),
    /// Rewrite the local SSH config to point at an instance's external IP.
    #[command(name = "ssh", about = "Update the local SSH config for an instance")]
    Ssh(InstanceArg),
    /// Attach or detach a GPU accelerator and wait for the operation.
    #[command(name = "gpu", about = "Reconfigure an instance's GPU accelerator")]
    Gpu(GpuCommand),
}

/// Arguments for subcommands that target a single instance.
#[derive(Debug, Parser)]
pub(crate) struct InstanceArg {
    /// Name of the target instance.
    pub(crate) instance: String,
}

/// Arguments for the `gantry gpu` subcommand.
#[derive(Debug, Parser)]
pub(crate) struct GpuCommand {
    /// Name of the target instance.
    pub(crate) instance: String,
    /// Accelerator to attach, or `none` to detach.
    #[arg(value_enum)]
    pub(crate) gpu: GpuArg,
}

/// GPU selection tokens accepted on the command line.
///
/// The service expects the instance to be stopped before the accelerator can
/// change; reconfiguring a running instance fails with a provider error that
/// is surfaced as-is.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub(crate) enum GpuArg {
    /// NVIDIA Tesla V100.
    V100,
    /// NVIDIA Tesla T4.
    T4,
    /// Detach any attached accelerator.
    None,
}
