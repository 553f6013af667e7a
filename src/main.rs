//! Candor batch entrypoint.

use std::sync::Arc;

use mimalloc::MiMalloc;

use candor::batch::BatchRunner;
use candor::config::Config;
use candor::scoring::ScorerSet;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    tracing::info!(
        input = %config.input_path.display(),
        output = %config.output_path.display(),
        reference_field = %config.reference_field,
        fact_field = config.fact_field.as_deref().unwrap_or("<disabled>"),
        filter_enabled = config.filter_enabled,
        "Candor starting"
    );

    let scorers = Arc::new(ScorerSet::from_config(&config)?);
    if scorers.is_stub() {
        tracing::warn!("One or more scorers run in STUB mode; scores are not meaningful");
    }

    let runner = BatchRunner::new(Arc::clone(&scorers), config.eval_settings())
        .with_workers(config.workers);
    let summary = runner
        .run_file(&config.input_path, &config.output_path)
        .await?;
    drop(runner);

    tracing::info!(
        best_marked = summary.best_marked,
        reused = summary.candidates_reused,
        "Evaluation complete: {}",
        summary
    );

    match Arc::try_unwrap(scorers) {
        Ok(scorers) => scorers.shutdown(),
        Err(_) => tracing::warn!("Scorer set still shared at shutdown"),
    }

    Ok(())
}
