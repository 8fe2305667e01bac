use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{Algorithm, Result, RunOutcome, RunStatus};

/// File name used when the caller does not pick one.
pub const DEFAULT_EXPORT_FILE: &str = "sortify-data.json";

/// Metrics block of an export. `time` is the elapsed run time in
/// milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportMetrics {
    pub comparisons: u64,
    pub swaps: u64,
    pub time: u64,
}

/// Data projection of the store and the most recent run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub algorithm: Option<Algorithm>,
    pub status: Option<RunStatus>,
    pub array_size: usize,
    pub original_array: Vec<u32>,
    pub sorted_array: Vec<u32>,
    pub metrics: ExportMetrics,
}

impl ExportSnapshot {
    pub fn new(original: &[u32], current: &[u32], last_run: Option<&RunOutcome>) -> Self {
        let metrics = last_run
            .map(|run| ExportMetrics {
                comparisons: run.metrics.comparisons,
                swaps: run.metrics.swaps,
                time: run.elapsed_ms,
            })
            .unwrap_or_default();
        Self {
            algorithm: last_run.map(|run| run.algorithm),
            status: last_run.map(|run| run.status.clone()),
            array_size: current.len(),
            original_array: original.to_vec(),
            sorted_array: current.to_vec(),
            metrics,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        tracing::info!(path = %path.display(), "exported run snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunMetrics;

    fn outcome() -> RunOutcome {
        RunOutcome {
            algorithm: Algorithm::Heap,
            status: RunStatus::Completed,
            metrics: RunMetrics {
                comparisons: 12,
                swaps: 5,
                writes: 0,
                checkpoints: 80,
            },
            elapsed_ms: 340,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let run = outcome();
        let snapshot = ExportSnapshot::new(&[3, 1, 2], &[1, 2, 3], Some(&run));
        let json: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();

        assert_eq!(json["algorithm"], "heap");
        assert_eq!(json["arraySize"], 3);
        assert_eq!(json["originalArray"], serde_json::json!([3, 1, 2]));
        assert_eq!(json["sortedArray"], serde_json::json!([1, 2, 3]));
        assert_eq!(json["metrics"]["comparisons"], 12);
        assert_eq!(json["metrics"]["swaps"], 5);
        assert_eq!(json["metrics"]["time"], 340);
    }

    #[test]
    fn snapshot_without_run_has_zero_metrics() {
        let snapshot = ExportSnapshot::new(&[2, 1], &[2, 1], None);
        assert_eq!(snapshot.algorithm, None);
        assert_eq!(snapshot.metrics, ExportMetrics::default());
    }

    #[test]
    fn writes_json_file() {
        let path = std::env::temp_dir().join(format!("sortify-export-{}.json", std::process::id()));
        let snapshot = ExportSnapshot::new(&[1], &[1], Some(&outcome()));

        snapshot.write_json(&path).unwrap();
        let read: ExportSnapshot =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(read, snapshot);
    }
}
