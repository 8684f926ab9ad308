use clap::Args;
use pipeline_score::error::{ApiError, AppError};
use pipeline_score::scoring::{PredictionService, RandomSource, Scorer, SeededRandom, ThreadRandom};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct PredictArgs {
    /// Inline JSON record, e.g. '{"value": 42}'
    #[arg(long, conflicts_with = "file")]
    pub(crate) payload: Option<String>,
    /// Read the JSON record from a file
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Seed the random source for reproducible fallback scores
    #[arg(long)]
    pub(crate) seed: Option<u64>,
}

pub(crate) fn run_predict(args: PredictArgs) -> Result<(), AppError> {
    let PredictArgs {
        payload,
        file,
        seed,
    } = args;

    let raw = match (payload, file) {
        (Some(inline), _) => inline,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => "{}".to_string(),
    };
    let input: Value = serde_json::from_str(&raw)?;

    let service = PredictionService::new(Arc::new(Scorer::new(random_source(seed))));
    let rendered = match service.predict(input) {
        Ok(output) => serde_json::to_string_pretty(&output)?,
        Err(err) => {
            let err = ApiError::from(err);
            println!("{}", serde_json::to_string_pretty(&err.body())?);
            return Err(err.into());
        }
    };

    println!("{rendered}");
    Ok(())
}

fn random_source(seed: Option<u64>) -> Arc<dyn RandomSource> {
    match seed {
        Some(seed) => Arc::new(SeededRandom::new(seed)),
        None => Arc::new(ThreadRandom),
    }
}
