//! Subcommand handlers. Each returns the process exit code.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::commands::{ReconcileArgs, RunArgs, VersionCheckArgs};
use super::output::{OutputFormat, OutputFormatter};
use crate::bootstrap::Bootstrapper;
use crate::config::BridgeConfig;
use crate::engine::DryRunEngine;
use crate::project::ProjectSnapshot;
use crate::properties::{NoopDecryptor, PropertyDecryptor, PropertyMap, StaticDecryptor};
use crate::reconcile::{DiscoveryStatus, PropertyReconciler};
use crate::version;

pub fn handle_reconcile(args: &ReconcileArgs) -> i32 {
    match run_reconcile(args) {
        Ok(()) => 0,
        Err(e) => {
            error!("Reconciliation failed: {:#}", e);
            1
        }
    }
}

fn run_reconcile(args: &ReconcileArgs) -> Result<()> {
    let snapshot = ProjectSnapshot::from_file(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    let overrides = overrides_from(&args.defines);
    let decryptor = load_decryptor(args.decrypted.as_deref())?;

    let reconciliation =
        PropertyReconciler::collect_properties(&snapshot, &overrides, decryptor.as_ref())?;
    report_discovery(&reconciliation.discovery);

    let formatter = OutputFormatter::new(OutputFormat::from(args.format));
    let output = formatter.format(&reconciliation.properties)?;
    write_output(&output, args.output.as_ref())
}

pub fn handle_run(args: &RunArgs, verbose: bool) -> i32 {
    match run_bootstrap(args, verbose) {
        Ok(()) => 0,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

fn run_bootstrap(args: &RunArgs, verbose: bool) -> Result<()> {
    let config = BridgeConfig::default();
    config.validate().context("Invalid configuration")?;
    debug!("{}", config);

    let snapshot = ProjectSnapshot::from_file(&args.snapshot)
        .with_context(|| format!("Failed to load snapshot {}", args.snapshot.display()))?;
    let overrides = overrides_from(&args.defines);
    let decryptor = load_decryptor(args.decrypted.as_deref())?;

    let gate = match &args.min_version {
        Some(min) => version::VersionGate::new(min.clone()),
        None => config.version_gate(),
    };
    let server_version = args.server_version.clone().or(config.server_version);

    let mut engine = DryRunEngine::new(server_version);
    let mut bootstrapper =
        Bootstrapper::new(&mut engine, &snapshot, &overrides, decryptor.as_ref()).with_gate(gate);
    if verbose {
        bootstrapper = bootstrapper.with_verbose(true);
    }
    let reconciliation = bootstrapper.execute()?;
    report_discovery(&reconciliation.discovery);

    let executed = engine.executed().map_or(0, PropertyMap::len);
    info!(properties = executed, "Analysis handed to engine");
    Ok(())
}

pub fn handle_version_check(args: &VersionCheckArgs) -> i32 {
    let config = BridgeConfig::default();
    let min = args
        .min_version
        .clone()
        .unwrap_or(config.min_server_version);
    let supported = !version::is_below(Some(&args.server_version), &min);

    let formatter = OutputFormatter::new(OutputFormat::Properties);
    match formatter.format_version_check(&args.server_version, &min, supported) {
        Ok(output) => print!("{}", output),
        Err(e) => {
            error!("{:#}", e);
            return 1;
        }
    }

    if supported {
        0
    } else {
        1
    }
}

fn overrides_from(defines: &[(String, String)]) -> PropertyMap {
    defines.iter().cloned().collect()
}

fn load_decryptor(path: Option<&Path>) -> Result<Box<dyn PropertyDecryptor>> {
    let Some(path) = path else {
        return Ok(Box::new(NoopDecryptor));
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read decrypted values from {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let secrets: PropertyMap = if is_json {
        serde_json::from_str(&content).context("Failed to parse decrypted values as JSON")?
    } else {
        serde_yaml::from_str(&content).context("Failed to parse decrypted values as YAML")?
    };
    debug!(count = secrets.len(), "Loaded decrypted values");
    Ok(Box::new(StaticDecryptor::new(secrets)))
}

fn report_discovery(status: &DiscoveryStatus) {
    match status {
        DiscoveryStatus::Disabled => debug!("Source discovery disabled"),
        DiscoveryStatus::SkippedOverride { property } => {
            debug!(property = *property, "Source discovery skipped")
        }
        DiscoveryStatus::Collected {
            discovered,
            warnings,
        } => {
            info!(discovered = *discovered, "Source discovery finished");
            for warning in warnings {
                warn!("{}", warning);
            }
        }
    }
}

fn write_output(output: &str, path: Option<&PathBuf>) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("Output written to {}", path.display());
        }
        None => print!("{}", output),
    }
    Ok(())
}
