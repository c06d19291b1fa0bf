//! Boundary to the analysis engine
//!
//! The engine owns the network handshake with the analysis server and the
//! actual analysis. The bridge only starts it, asks which server it talks
//! to, and hands over the effective property set.

use crate::error::{BridgeError, BridgeResult};
use crate::properties::PropertyMap;
use tracing::info;

pub trait AnalysisEngine {
    fn start(&mut self) -> BridgeResult<()>;

    /// Version reported by the server, if the handshake produced one
    fn server_version(&self) -> Option<String>;

    fn set_global_property(&mut self, key: &str, value: &str);

    fn execute(&mut self, properties: PropertyMap) -> BridgeResult<()>;
}

/// Engine that performs no analysis: it records what it was given
#[derive(Debug, Default, Clone)]
pub struct DryRunEngine {
    server_version: Option<String>,
    started: bool,
    global_properties: PropertyMap,
    executed: Option<PropertyMap>,
}

impl DryRunEngine {
    pub fn new(server_version: Option<String>) -> Self {
        Self {
            server_version,
            ..Default::default()
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn global_properties(&self) -> &PropertyMap {
        &self.global_properties
    }

    /// Properties handed to `execute`, global properties included
    pub fn executed(&self) -> Option<&PropertyMap> {
        self.executed.as_ref()
    }
}

impl AnalysisEngine for DryRunEngine {
    fn start(&mut self) -> BridgeResult<()> {
        self.started = true;
        Ok(())
    }

    fn server_version(&self) -> Option<String> {
        self.server_version.clone()
    }

    fn set_global_property(&mut self, key: &str, value: &str) {
        self.global_properties
            .insert(key.to_string(), value.to_string());
    }

    fn execute(&mut self, properties: PropertyMap) -> BridgeResult<()> {
        if !self.started {
            return Err(BridgeError::Engine("engine was not started".to_string()));
        }
        let mut all = self.global_properties.clone();
        all.extend(properties);
        info!(properties = all.len(), "Dry run: analysis not executed");
        self.executed = Some(all);
        Ok(())
    }
}
