use availability::contracts::check_availability::{CheckOutcome, StateWrite};
use availability_job::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry("check_availability")?;
    let result = start().await;
    if let Err(error) = &result {
        tracing::error!("Availability check failed: {error:?}");
    }
    shared_kernel::tracing::shutdown_global_tracer_provider();
    result
}

async fn start() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let interactor = settings.interactor().await?;
    let outcome = interactor.check(&settings.check_request()).await?;
    match outcome {
        CheckOutcome::NothingAvailable => tracing::info!("No matching sessions"),
        CheckOutcome::Unchanged { fingerprint } => {
            tracing::info!(%fingerprint, "Availability unchanged")
        }
        CheckOutcome::Notified {
            fingerprint,
            state: StateWrite::Advanced,
        } => tracing::info!(%fingerprint, "Subscriber notified"),
        CheckOutcome::Notified {
            fingerprint,
            state: StateWrite::Conflicted,
        } => tracing::warn!(%fingerprint, "Subscriber notified, stored fingerprint left as is"),
    }
    Ok(())
}
