//! Artifact inspection command

use crate::output::{format_timestamp, OutputFormat};
use anyhow::{Context, Result};
use predictor_lib::loader::{self, LoaderConfig};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Row for the model metadata table
#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "Version")]
    version: String,
    #[tabled(rename = "Created")]
    created_at: String,
    #[tabled(rename = "Samples")]
    samples: usize,
    #[tabled(rename = "Features")]
    features: usize,
    #[tabled(rename = "K")]
    k: usize,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Checksum")]
    checksum: String,
}

/// JSON payload for model metadata
#[derive(Serialize)]
struct ModelInfo {
    version: String,
    created_at: i64,
    samples: usize,
    features: usize,
    k: usize,
    size_bytes: usize,
    checksum: String,
}

/// Show metadata about the model artifact
pub fn run(model_path: &Path, wrap_depth: usize, format: OutputFormat) -> Result<()> {
    let loaded = loader::load(model_path, &LoaderConfig { wrap_depth })
        .with_context(|| format!("failed to load model from {}", model_path.display()))?;

    match format {
        OutputFormat::Json => {
            let info = ModelInfo {
                version: loaded.version,
                created_at: loaded.created_at,
                samples: loaded.model.n_samples(),
                features: loaded.model.n_features(),
                k: loaded.model.k,
                size_bytes: loaded.size_bytes,
                checksum: loaded.checksum,
            };
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        OutputFormat::Table => {
            let row = ModelRow {
                version: loaded.version.clone(),
                created_at: format_timestamp(loaded.created_at),
                samples: loaded.model.n_samples(),
                features: loaded.model.n_features(),
                k: loaded.model.k,
                size: format!("{}B", loaded.size_bytes),
                checksum: truncate_checksum(&loaded.checksum),
            };
            let table = tabled::Table::new([row])
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }

    Ok(())
}

fn truncate_checksum(checksum: &str) -> String {
    if checksum.len() > 12 {
        format!("{}…", &checksum[..12])
    } else {
        checksum.to_string()
    }
}
