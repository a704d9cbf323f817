//! `jbx run` — pull an image and run a command confined to its rootfs.

use std::path::PathBuf;

use clap::Args;
use jailbox_common::config::{PullPolicy, RunConfig};
use jailbox_common::error::JailboxError;
use jailbox_common::types::ImageReference;
use jailbox_core::jail;
use jailbox_core::launch::{self, ExitOutcome, LaunchSpec};
use jailbox_image::pull::{self, PullOptions};
use jailbox_image::registry::RegistryClient;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Image reference to pull (name[:tag], tag defaults to latest).
    pub image: String,

    /// Command to execute inside the jail (host path, copied in).
    pub command: PathBuf,

    /// Arguments passed to the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Directory used as the jail root (persists after the run).
    #[arg(long, default_value = jailbox_common::constants::DEFAULT_JAIL_DIR)]
    pub jail_root: PathBuf,

    /// Abort before launch if any layer failed to fetch.
    #[arg(long)]
    pub strict: bool,

    /// Ceiling on simultaneous layer downloads.
    #[arg(long, default_value_t = jailbox_common::constants::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Skip PID namespace isolation.
    #[arg(long)]
    pub no_pid_namespace: bool,
}

impl RunArgs {
    fn config(&self) -> RunConfig {
        RunConfig {
            jail_root: self.jail_root.clone(),
            concurrency: self.concurrency,
            policy: if self.strict {
                PullPolicy::Strict
            } else {
                PullPolicy::Lenient
            },
            new_pid_namespace: !self.no_pid_namespace,
            ..RunConfig::default()
        }
    }
}

/// Executes the `run` command, returning the process exit code.
///
/// # Errors
///
/// Returns an error if authentication, manifest resolution, a strict-mode
/// partial pull, or the jail install fails. Launch-level failures and
/// signal terminations are reported and mapped to the sentinel code.
pub fn execute(args: RunArgs) -> anyhow::Result<i32> {
    let config = args.config();
    let image = ImageReference::parse(&args.image)?;

    let client = RegistryClient::new()?;
    let token = client.authenticate(&image)?;
    let digests = client.resolve_layers(&image, &token, &config.platform)?;

    let summary = pull::pull_layers(
        &client,
        &image,
        &token,
        &digests,
        &config.jail_root,
        &PullOptions {
            concurrency: config.concurrency,
        },
    )?;
    tracing::info!(
        image = %image,
        succeeded = summary.succeeded,
        total = summary.total,
        "image pull complete"
    );
    if summary.succeeded < summary.total && config.policy == PullPolicy::Strict {
        return Err(anyhow::anyhow!(
            "{} of {} layers failed to fetch (strict mode)",
            summary.total - summary.succeeded,
            summary.total
        ));
    }

    let _ = jail::install_into_jail(&args.command, &config.jail_root)?;

    let spec = LaunchSpec {
        rootfs: config.jail_root.clone(),
        command: args.command.clone(),
        args: args.args.clone(),
        new_pid_namespace: config.new_pid_namespace,
    };
    match launch::launch(&spec) {
        Ok(ExitOutcome::Exited(code)) => Ok(code),
        Ok(outcome @ ExitOutcome::Signaled) => {
            tracing::error!("child process terminated abnormally (signal/fault)");
            Ok(outcome.exit_code())
        }
        Err(error @ JailboxError::Launch { .. }) => {
            tracing::error!(%error, "failed to launch confined command");
            Ok(ExitOutcome::Signaled.exit_code())
        }
        Err(other) => Err(other.into()),
    }
}
