mod cli;
mod error;
mod k8s;
mod model;

use anyhow::{Context, Result};
use clap::Parser;
use cli::CliOptions;
use k8s::ClusterNamespace;
use model::VirtualMachineRequest;
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let mut options = CliOptions::parse();
    init_tracing(options.debug_level())?;

    options
        .init(&ClusterNamespace::default())
        .context("failed to resolve namespaces")?;

    let request = VirtualMachineRequest::from_options(&options);
    info!(
        template_namespace = %request.template_namespace,
        template_name = %request.template_name,
        vm_namespace = %request.vm_namespace,
        disks = ?options.all_disk_names(),
        owned_disks = request.owned_disks().count(),
        "resolved virtual machine request"
    );

    if let Some(output) = options.output {
        debug!(output = %output, "rendering request");
        println!("{}", output.render(&request)?);
    }

    Ok(())
}

fn init_tracing(level: Level) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level.as_str().to_ascii_lowercase()))
        .or_else(|_| EnvFilter::try_new("info"))
        .context("failed to initialize tracing filter")?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr)
        .try_init();

    Ok(())
}
