use availability::render::render;
use availability_job::Settings;
use shared_kernel::date_time::kolkata_date::KolkataDate;

/// Prints what would be sent without touching the stored fingerprint or sending email.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shared_kernel::tracing::config_telemetry("dry_run")?;
    let result = start().await;
    shared_kernel::tracing::shutdown_global_tracer_provider();
    result
}

async fn start() -> anyhow::Result<()> {
    let settings = Settings::load()?;
    let criteria = settings.criteria();
    let locations = settings
        .collector()
        .matching_locations(&criteria, &settings.lookahead(KolkataDate::today()))
        .await?;
    if locations.is_empty() {
        println!("Everything booked");
    } else {
        println!("{}", render(&locations, criteria.dose));
    }
    Ok(())
}
