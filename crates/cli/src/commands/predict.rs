//! Prediction commands

use crate::output::{print_error, OutputFormat};
use anyhow::{Context, Result};
use predictor_lib::{
    loader::{self, LoaderConfig},
    FixedQuery, Prediction, PredictionInvoker, Predictor, PromptSource, QueryRecord, QuerySource,
};
use serde::Serialize;
use std::path::Path;
use tabled::Tabled;

/// Row for the prediction table
#[derive(Tabled)]
struct PredictionRow {
    #[tabled(rename = "Year")]
    year: i64,
    #[tabled(rename = "Month")]
    month: i64,
    #[tabled(rename = "Day")]
    day: i64,
    #[tabled(rename = "Store")]
    store_id: i64,
    #[tabled(rename = "Item")]
    item_id: i64,
    #[tabled(rename = "Prediction")]
    prediction: String,
    #[tabled(rename = "Model")]
    model_version: String,
}

/// JSON payload for one answered query
#[derive(Serialize)]
struct PredictionOutput {
    query: QueryRecord,
    prediction: f32,
    model_version: String,
    generated_at: i64,
}

fn load_invoker(model_path: &Path, wrap_depth: usize) -> Result<PredictionInvoker> {
    let loaded = loader::load(model_path, &LoaderConfig { wrap_depth })
        .with_context(|| format!("failed to load model from {}", model_path.display()))?;
    Ok(PredictionInvoker::new(loaded))
}

fn print_prediction(record: &QueryRecord, prediction: &Prediction, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let payload = PredictionOutput {
                query: *record,
                prediction: prediction.value,
                model_version: prediction.model_version.clone(),
                generated_at: prediction.generated_at,
            };
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        OutputFormat::Table => {
            let row = PredictionRow {
                year: record.year,
                month: record.month,
                day: record.day,
                store_id: record.store_id,
                item_id: record.item_id,
                prediction: format!("{:.2}", prediction.value),
                model_version: prediction.model_version.clone(),
            };
            let table = tabled::Table::new([row])
                .with(tabled::settings::Style::rounded())
                .to_string();
            println!("{}", table);
        }
    }
    Ok(())
}

/// Run every query a source yields against one loaded model
fn run_source(
    invoker: &PredictionInvoker,
    source: &mut dyn QuerySource,
    format: OutputFormat,
) -> Result<()> {
    while let Some(record) = source.next_query()? {
        let prediction = invoker.predict(&record)?;
        print_prediction(&record, &prediction, format)?;
    }
    Ok(())
}

/// Predict for one explicit record
pub fn run_one(
    model_path: &Path,
    wrap_depth: usize,
    fields: [i64; 5],
    format: OutputFormat,
) -> Result<()> {
    let invoker = load_invoker(model_path, wrap_depth)?;
    let prediction = invoker.predict_raw(&fields)?;
    let record = QueryRecord::from_slice(&fields)?;
    print_prediction(&record, &prediction, format)
}

/// Predict for the fixed default query
pub fn run_default(model_path: &Path, wrap_depth: usize, format: OutputFormat) -> Result<()> {
    let invoker = load_invoker(model_path, wrap_depth)?;
    let mut source = FixedQuery::default();
    run_source(&invoker, &mut source, format)
}

/// Prompt for queries on stdin until the input ends
pub fn run_interactive(model_path: &Path, wrap_depth: usize, format: OutputFormat) -> Result<()> {
    let invoker = load_invoker(model_path, wrap_depth)?;
    let stdin = std::io::stdin();
    let mut source = PromptSource::new(stdin.lock(), std::io::stdout());

    while let Some(record) = source.next_query()? {
        // A bad record ends one query, not the session
        match invoker.predict(&record) {
            Ok(prediction) => print_prediction(&record, &prediction, format)?,
            Err(e) => print_error(&e.to_string()),
        }
    }
    Ok(())
}
