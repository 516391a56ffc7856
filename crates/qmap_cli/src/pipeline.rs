//! Input loading for the `qmap` CLI: reads the JSON documents the `map` and
//! `synthesize` subcommands take on the command line (circuit, device,
//! tableau, config overrides) and hands them to `qmap_route`/`qmap_clifford`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use qmap_core::config::{CliffordConfig, MapperConfig};
use qmap_core::types::{CircuitGenome, HardwareProfile, Tableau};
use qmap_route::MappingResult;

/// Loads a [`CircuitGenome`] from a JSON file.
pub fn load_circuit(path: &Path) -> Result<CircuitGenome> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read circuit file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse circuit JSON: {}", path.display()))
}

/// Loads a [`HardwareProfile`] from a JSON file.
pub fn load_device(path: &Path) -> Result<HardwareProfile> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read device file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse device JSON: {}", path.display()))
}

/// Loads a target [`Tableau`] from a JSON file.
pub fn load_tableau(path: &Path) -> Result<Tableau> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read tableau file: {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse tableau JSON: {}", path.display()))
}

/// Loads a [`MapperConfig`] override file, falling back to `MapperConfig::default()`
/// when `path` is `None`.
pub fn load_mapper_config(path: Option<&Path>) -> Result<MapperConfig> {
    match path {
        None => Ok(MapperConfig::default()),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            MapperConfig::from_json(&raw)
                .with_context(|| format!("failed to parse mapper config: {}", path.display()))
        }
    }
}

/// Loads a [`CliffordConfig`] override file, falling back to `CliffordConfig::default()`
/// when `path` is `None`.
pub fn load_clifford_config(path: Option<&Path>) -> Result<CliffordConfig> {
    match path {
        None => Ok(CliffordConfig::default()),
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file: {}", path.display()))?;
            CliffordConfig::from_json(&raw)
                .with_context(|| format!("failed to parse clifford config: {}", path.display()))
        }
    }
}

/// Writes a mapping result to `path` as pretty JSON.
pub fn write_mapping_result(path: &Path, result: &MappingResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    fs::write(path, json)
        .with_context(|| format!("failed to write result file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_falls_back_to_default() {
        let config = load_mapper_config(None).unwrap();
        assert_eq!(config.timeout_ms, MapperConfig::default().timeout_ms);
    }

    #[test]
    fn test_load_circuit_round_trips() {
        let mut circuit = CircuitGenome::new(2);
        circuit.add_gate(qmap_core::types::Gate::H(0)).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();

        let path = std::env::temp_dir().join("qmap_cli_test_circuit.json");
        fs::write(&path, json).unwrap();

        let loaded = load_circuit(&path).unwrap();
        assert_eq!(loaded.gate_count(), 1);

        let _ = fs::remove_file(&path);
    }
}
