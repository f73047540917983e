//! Read-only views of the simulation and their JSON wire format.
//!
//! A snapshot is a deep copy; renderers may keep it across ticks. The wire
//! format wraps it with a `version` field and stores matrices as arrays of
//! rows.

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::head::HeadGeometry;

pub const SNAPSHOT_VERSION: &str = "1";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub tick: u64,
    pub tokens: Vec<TokenView>,
    pub layers: Vec<LayerView>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TokenView {
    pub index: usize,
    pub label: String,
    pub activation: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HeadView {
    pub geometry: HeadGeometry,
    pub activation: f64,
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PulseView {
    pub x: f64,
    pub y: f64,
    pub progress: f64,
    pub intensity: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerView {
    pub index: usize,
    pub processed: bool,
    pub elapsed: u32,
    pub heads: Vec<HeadView>,
    pub pulses: Vec<PulseView>,
}

impl Snapshot {
    pub fn processed_layers(&self) -> usize {
        self.layers.iter().filter(|l| l.processed).count()
    }

    pub fn live_pulses(&self) -> usize {
        self.layers.iter().map(|l| l.pulses.len()).sum()
    }

    pub fn mean_token_activation(&self) -> f64 {
        if self.tokens.is_empty() {
            return 0.0;
        }
        self.tokens.iter().map(|t| t.activation).sum::<f64>() / self.tokens.len() as f64
    }
}

#[derive(Serialize, Deserialize)]
struct WireSnapshot {
    version: String,
    #[serde(flatten)]
    snapshot: Snapshot,
}

impl WireSnapshot {
    fn new(snapshot: &Snapshot) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            snapshot: snapshot.clone(),
        }
    }
}

/// Serialize a snapshot to pretty JSON.
pub fn export_json(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&WireSnapshot::new(snapshot))
}

/// Same wire format as [`export_json`] on a single line, for streaming.
pub fn export_json_line(snapshot: &Snapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string(&WireSnapshot::new(snapshot))
}

/// Parse a snapshot written by [`export_json`]. Other versions are rejected.
pub fn import_json(json: &str) -> Result<Snapshot, serde_json::Error> {
    let wire: WireSnapshot = serde_json::from_str(json)?;
    if wire.version != SNAPSHOT_VERSION {
        return Err(serde_json::Error::custom(format!(
            "unsupported snapshot version {:?}, expected {SNAPSHOT_VERSION:?}",
            wire.version
        )));
    }
    Ok(wire.snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Snapshot {
        Snapshot {
            tick: 12,
            tokens: vec![
                TokenView {
                    index: 0,
                    label: "a".into(),
                    activation: 0.25,
                },
                TokenView {
                    index: 1,
                    label: "b".into(),
                    activation: 0.75,
                },
            ],
            layers: vec![LayerView {
                index: 0,
                processed: true,
                elapsed: 12,
                heads: vec![HeadView {
                    geometry: HeadGeometry {
                        x: 200.0,
                        y: 250.0,
                        size: 150.0,
                    },
                    activation: 0.5,
                    matrix: vec![vec![0.5, 0.5], vec![0.1, 0.9]],
                }],
                pulses: vec![PulseView {
                    x: 275.0,
                    y: 330.0,
                    progress: 0.1,
                    intensity: 0.2,
                }],
            }],
        }
    }

    #[test]
    fn test_export_carries_version_and_rows() {
        let json = export_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["version"], "1");
        assert_eq!(value["tick"], 12);
        assert_eq!(value["layers"][0]["heads"][0]["matrix"][1][1], 0.9);
    }

    #[test]
    fn test_line_export_is_versioned_and_single_line() {
        let line = export_json_line(&sample()).unwrap();
        assert!(!line.contains('\n'));
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["version"], "1");
        assert_eq!(import_json(&line).unwrap(), sample());
    }

    #[test]
    fn test_import_restores_snapshot() {
        let snap = sample();
        let back = import_json(&export_json(&snap).unwrap()).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_import_rejects_unknown_version() {
        let json = export_json(&sample()).unwrap().replacen("\"1\"", "\"99\"", 1);
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported snapshot version"), "{err}");
    }

    #[test]
    fn test_summary_helpers() {
        let snap = sample();
        assert_eq!(snap.processed_layers(), 1);
        assert_eq!(snap.live_pulses(), 1);
        assert!((snap.mean_token_activation() - 0.5).abs() < 1e-12);
    }
}
