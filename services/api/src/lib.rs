mod cli;
mod infra;
mod predict;
mod routes;
mod server;

use pipeline_score::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
