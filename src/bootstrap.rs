//! One analysis run: gate on the server version, reconcile properties,
//! hand them to the engine.

use crate::engine::AnalysisEngine;
use crate::error::{BridgeError, BridgeResult};
use crate::project::ProjectSnapshot;
use crate::properties::{self, PropertyDecryptor, PropertyMap};
use crate::reconcile::{PropertyReconciler, Reconciliation};
use crate::util::logging;
use crate::version::VersionGate;
use std::env;
use sysinfo::System;
use tracing::info;

const SONARCLOUD_HOST_URL: &str = "https://sonarcloud.io";

/// State of a single run. Build one per invocation and drop it afterwards.
pub struct Bootstrapper<'a, E: AnalysisEngine> {
    engine: &'a mut E,
    snapshot: &'a ProjectSnapshot,
    user_overrides: &'a PropertyMap,
    decryptor: &'a dyn PropertyDecryptor,
    gate: VersionGate,
    verbose: bool,
    server_version: Option<String>,
}

impl<'a, E: AnalysisEngine> Bootstrapper<'a, E> {
    pub fn new(
        engine: &'a mut E,
        snapshot: &'a ProjectSnapshot,
        user_overrides: &'a PropertyMap,
        decryptor: &'a dyn PropertyDecryptor,
    ) -> Self {
        Self {
            engine,
            snapshot,
            user_overrides,
            decryptor,
            gate: VersionGate::default(),
            verbose: logging::is_debug_enabled(),
            server_version: None,
        }
    }

    pub fn with_gate(mut self, gate: VersionGate) -> Self {
        self.gate = gate;
        self
    }

    /// Forces `sonar.verbose` on or off instead of following the log level
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Runs the whole sequence. Any fatal failure comes back as one
    /// `BridgeError::Execution` carrying the cause's message.
    pub fn execute(&mut self) -> BridgeResult<Reconciliation> {
        self.run().map_err(BridgeError::execution)
    }

    fn run(&mut self) -> BridgeResult<Reconciliation> {
        log_environment_information();
        self.engine.start()?;
        self.server_version = self.engine.server_version();

        if self.is_sonarcloud_used() {
            info!("Communicating with SonarCloud");
        } else {
            if let Some(version) = &self.server_version {
                info!("Communicating with SonarQube Server {}", version);
            }
            self.gate.check(self.server_version.as_deref())?;
        }

        if self.verbose {
            self.engine.set_global_property(properties::VERBOSE, "true");
        }

        let reconciliation =
            PropertyReconciler::collect_properties(self.snapshot, self.user_overrides, self.decryptor)?;
        self.engine.execute(reconciliation.properties.clone())?;
        Ok(reconciliation)
    }

    /// Server version seen during the last run
    pub fn server_version(&self) -> Option<&str> {
        self.server_version.as_deref()
    }

    fn is_sonarcloud_used(&self) -> bool {
        self.user_overrides
            .get(properties::HOST_URL)
            .map(String::as_str)
            .into_iter()
            .chain(self.snapshot.host_urls())
            .any(|url| url.starts_with(SONARCLOUD_HOST_URL))
    }
}

fn log_environment_information() {
    info!(
        "{} {} ({})",
        crate::NAME,
        crate::VERSION,
        env::consts::ARCH
    );
    info!(
        "{} {} ({})",
        System::name().unwrap_or_else(|| env::consts::OS.to_string()),
        System::os_version().unwrap_or_default(),
        env::consts::ARCH
    );
    if let Ok(maven_opts) = env::var("MAVEN_OPTS") {
        info!("MAVEN_OPTS={}", maven_opts);
    }
}
