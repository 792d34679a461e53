//! # Probe Runner
//!
//! Complete probe: configuration validation, snapshot loading, evaluation and
//! report generation.
use crate::api::config::ProbeConfig;
use crate::api::errors::ProbeError;
use crate::execution::ProbeEngine;
use crate::results::{PluginReport, ReportGenerator};
use crate::strategies::CheckRegistry;
use crate::types::inventory::InventorySnapshot;
use crate::{log_debug, log_error};
use std::path::Path;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

/// Read and validate an inventory snapshot document
pub fn load_snapshot(path: &Path) -> Result<InventorySnapshot, ProbeError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ProbeError::upstream_data_unavailable(format!(
            "cannot read inventory snapshot '{}': {}",
            path.display(),
            e
        ))
    })?;

    let snapshot = InventorySnapshot::from_json(&content).map_err(|e| {
        ProbeError::upstream_data_unavailable(format!(
            "malformed inventory snapshot '{}': {}",
            path.display(),
            e
        ))
    })?;

    snapshot
        .validate()
        .map_err(ProbeError::upstream_data_unavailable)?;

    log_debug!("Inventory snapshot loaded",
        "path" => path.display(),
        "collected_at" => snapshot.collected_at,
        "hosts" => snapshot.hosts.len(),
        "vms" => snapshot.virtual_machines.len()
    );

    Ok(snapshot)
}

/// Registry-backed probe runner
#[derive(Debug, Clone)]
pub struct Probe {
    registry: Arc<CheckRegistry>,
}

impl Probe {
    pub fn new(registry: CheckRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &CheckRegistry {
        &self.registry
    }

    /// Run `check` against an already loaded snapshot
    ///
    /// The snapshot is held to the same identity rules as one read from disk.
    pub fn evaluate(
        &self,
        check: &str,
        config: &ProbeConfig,
        snapshot: &InventorySnapshot,
    ) -> Result<PluginReport, ProbeError> {
        let engine = ProbeEngine::from_config(&self.registry, check, config)?;
        snapshot
            .validate()
            .map_err(ProbeError::upstream_data_unavailable)?;
        let outcome = engine.execute(snapshot)?;
        Ok(ReportGenerator::from_outcome(&outcome, snapshot.collected_at))
    }

    /// Run `check` against the snapshot file at `inventory`
    ///
    /// Configuration is validated before the file is opened.
    pub fn run_file(
        &self,
        check: &str,
        config: &ProbeConfig,
        inventory: &Path,
    ) -> Result<PluginReport, ProbeError> {
        let engine = ProbeEngine::from_config(&self.registry, check, config)?;
        let snapshot = load_snapshot(inventory)?;
        let outcome = engine.execute(&snapshot)?;
        Ok(ReportGenerator::from_outcome(&outcome, snapshot.collected_at))
    }

    /// Like [`Probe::run_file`], with any failure rendered as an UNKNOWN report
    pub fn run_to_report(&self, check: &str, config: &ProbeConfig, inventory: &Path) -> PluginReport {
        match self.run_file(check, config, inventory) {
            Ok(report) => report,
            Err(e) => {
                log_error!("Probe failed",
                    "check" => check,
                    "error" => &e,
                    "user_correctable" => e.is_user_correctable()
                );
                ReportGenerator::from_failure(check, &e.user_message())
            }
        }
    }

    /// [`Probe::run_to_report`] on a worker thread, bounded by
    /// `config.timeout_secs`
    ///
    /// A run that misses the deadline is reported UNKNOWN; the worker is
    /// left to finish on its own and its report is discarded.
    pub fn run_with_timeout(
        &self,
        check: &str,
        config: &ProbeConfig,
        inventory: &Path,
    ) -> PluginReport {
        let seconds = config.timeout_secs;
        let (sender, receiver) = mpsc::channel();

        let probe = self.clone();
        let worker_check = check.to_string();
        let worker_config = config.clone();
        let worker_inventory = inventory.to_path_buf();
        thread::spawn(move || {
            let report = probe.run_to_report(&worker_check, &worker_config, &worker_inventory);
            // The receiver is gone once the deadline passed
            let _ = sender.send(report);
        });

        match receiver.recv_timeout(Duration::from_secs(seconds)) {
            Ok(report) => report,
            Err(_) => {
                let e = ProbeError::Timeout { seconds };
                log_error!("Probe timed out", "check" => check, "seconds" => seconds);
                ReportGenerator::from_failure(check, &e.user_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::errors::ConfigurationError;
    use crate::evaluation::CheckEvaluation;
    use crate::filter::ScopedInventory;
    use crate::results::{EvaluationError, EvaluationResult, Observed, Severity};
    use crate::strategies::InventoryCheck;
    use crate::types::inventory::{AsInventoryObject, ObjectRef};
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    struct VmCount;

    impl InventoryCheck for VmCount {
        fn check_name(&self) -> &str {
            "vm-count"
        }

        fn description(&self) -> &str {
            "one OK result per VM"
        }

        fn scope(&self, scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
            scoped.virtual_machines.iter().map(|vm| vm.object_ref()).collect()
        }

        fn evaluate(
            &self,
            scoped: &ScopedInventory<'_>,
        ) -> Result<CheckEvaluation, EvaluationError> {
            Ok(scoped
                .virtual_machines
                .iter()
                .map(|vm| EvaluationResult::ok(vm.object_ref(), Observed::Count(1), "present"))
                .collect())
        }
    }

    /// Outlasts any one-second budget
    struct Stalled;

    impl InventoryCheck for Stalled {
        fn check_name(&self) -> &str {
            "stalled"
        }

        fn description(&self) -> &str {
            "blocks before evaluating"
        }

        fn scope(&self, _scoped: &ScopedInventory<'_>) -> Vec<ObjectRef> {
            Vec::new()
        }

        fn evaluate(
            &self,
            _scoped: &ScopedInventory<'_>,
        ) -> Result<CheckEvaluation, EvaluationError> {
            thread::sleep(Duration::from_secs(3));
            Ok(CheckEvaluation::new())
        }
    }

    fn stalled(_config: &ProbeConfig) -> Result<Box<dyn InventoryCheck>, ConfigurationError> {
        Ok(Box::new(Stalled))
    }

    fn vm_count(_config: &ProbeConfig) -> Result<Box<dyn InventoryCheck>, ConfigurationError> {
        Ok(Box::new(VmCount))
    }

    fn probe() -> Probe {
        let mut registry = CheckRegistry::new();
        registry
            .register("vm-count", "one OK result per VM", vm_count)
            .unwrap();
        registry
            .register("stalled", "blocks before evaluating", stalled)
            .unwrap();
        Probe::new(registry)
    }

    fn inventory_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const INVENTORY: &str = r#"{
        "collected_at": "2026-03-01T12:00:00Z",
        "virtual_machines": [
            {"id": "vm-1", "name": "web01", "power_state": "poweredOn", "hardware_version": "vmx-19"},
            {"id": "vm-2", "name": "web02", "power_state": "poweredOn", "hardware_version": "vmx-19"}
        ]
    }"#;

    #[test]
    fn test_run_file_produces_report() {
        let file = inventory_file(INVENTORY);
        let report = probe()
            .run_file("vm-count", &ProbeConfig::default(), file.path())
            .unwrap();

        assert_eq!(report.state, Severity::Ok);
        assert_eq!(report.evaluated_objects, 2);
        assert_eq!(
            report.collected_at.unwrap().to_rfc3339(),
            "2026-03-01T12:00:00+00:00"
        );
    }

    #[test]
    fn test_unreadable_snapshot_is_upstream_failure() {
        assert_matches!(
            load_snapshot(Path::new("/nonexistent/inventory.json")),
            Err(ProbeError::UpstreamDataUnavailable { .. })
        );

        let file = inventory_file("{ not json");
        assert_matches!(
            load_snapshot(file.path()),
            Err(ProbeError::UpstreamDataUnavailable { .. })
        );
    }

    #[test]
    fn test_duplicate_ids_rejected_on_load() {
        let file = inventory_file(
            r#"{
                "collected_at": "2026-03-01T12:00:00Z",
                "datastores": [{"id": "ds-1", "name": "a"}, {"id": "ds-1", "name": "b"}]
            }"#,
        );
        let err = load_snapshot(file.path()).unwrap_err();
        assert!(err.to_string().contains("ds-1"));
    }

    #[test]
    fn test_configuration_checked_before_snapshot_read() {
        let config = ProbeConfig::default().with_timeout(Some(0));
        // The inventory path does not exist; the configuration error wins
        assert_matches!(
            probe().run_file("vm-count", &config, Path::new("/nonexistent/inventory.json")),
            Err(ProbeError::Configuration(_))
        );
    }

    #[test]
    fn test_failures_become_unknown_reports() {
        let report = probe().run_to_report(
            "vm-count",
            &ProbeConfig::default(),
            Path::new("/nonexistent/inventory.json"),
        );
        assert_eq!(report.state, Severity::Unknown);
        assert_eq!(report.exit_code(), 3);
        assert!(report.summary.contains("Inventory snapshot unavailable"));
    }

    #[test]
    fn test_evaluate_rejects_duplicate_ids() {
        let mut snapshot = InventorySnapshot::from_json(INVENTORY).unwrap();
        let duplicate = snapshot.virtual_machines[0].clone();
        snapshot.virtual_machines.push(duplicate);

        let err = probe()
            .evaluate("vm-count", &ProbeConfig::default(), &snapshot)
            .unwrap_err();
        assert_matches!(err, ProbeError::UpstreamDataUnavailable { .. });
        assert!(err.to_string().contains("vm-1"));
    }

    #[test]
    fn test_evaluate_accepts_loaded_snapshot() {
        let snapshot = InventorySnapshot::from_json(INVENTORY).unwrap();
        let report = probe()
            .evaluate("vm-count", &ProbeConfig::default(), &snapshot)
            .unwrap();
        assert_eq!(report.evaluated_objects, 2);
    }

    #[test]
    fn test_deadline_exceeded_reports_unknown() {
        let file = inventory_file(INVENTORY);
        let config = ProbeConfig::default().with_timeout(Some(1));

        let report = probe().run_with_timeout("stalled", &config, file.path());
        assert_eq!(report.state, Severity::Unknown);
        assert_eq!(report.exit_code(), 3);
        assert!(report.summary.contains("did not finish within 1 seconds"));
    }

    #[test]
    fn test_run_within_deadline_returns_report() {
        let file = inventory_file(INVENTORY);
        let report = probe().run_with_timeout("vm-count", &ProbeConfig::default(), file.path());
        assert_eq!(report.state, Severity::Ok);
        assert_eq!(report.evaluated_objects, 2);
    }
}
