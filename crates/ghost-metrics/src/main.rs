mod bootstrap;
mod report;

use anyhow::{anyhow, Result};
use chrono::Local;
use metrics_core::error::MetricsError;
use metrics_core::settings::{Command, Settings};
use metrics_core::time_utils::parse_start_date;
use metrics_runtime::session::DashboardSession;
use metrics_runtime::store::{ClientStore, JsonFileStore};
use metrics_runtime::upload::ingest_upload;

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::load_with_last_used();

    bootstrap::ensure_directories()?;
    bootstrap::setup_logging(&settings.log_level)?;

    tracing::info!("ghost-metrics v{} starting", env!("CARGO_PKG_VERSION"));

    let store_dir = settings.store_dir();
    tracing::debug!("client store: {}", store_dir.display());
    let mut store = JsonFileStore::new(store_dir);

    match &settings.command {
        Command::Upload { file, client } => {
            let record = ingest_upload(&mut store, file, client).await?;
            println!("{}", report::render_upload(&record));
        }

        Command::List => {
            println!("{}", report::render_client_list(&store.list_records()?));
        }

        Command::Show { client } => {
            let mut session = DashboardSession::open(&store, required_client(client)?)?;
            session.set_all_periods(settings.period());

            let today = Local::now().date_naive();
            let record = session.record();
            println!("{}", report::render_summary(&record.name, &session.summary()));
            println!();
            println!("{}", report::render_demographics(&record.data.demographics));
            println!();
            println!(
                "{}",
                report::render_top_posts(&session.top_posts(today), record.start_date.is_some())
            );
        }

        Command::Chart { client, metric } => {
            let mut session = DashboardSession::open(&store, required_client(client)?)?;
            session.set_period(*metric, settings.period());
            println!("{}", report::render_chart(&session.chart(*metric)));
        }

        Command::SetStartDate { client, date } => {
            let start = date.as_deref().map(parse_start_date).transpose()?;
            let mut session = DashboardSession::open(&store, client)?;
            session.set_start_date(&mut store, start)?;
            match start {
                Some(d) => println!("Start date for {} set to {}", session.client_name(), d),
                None => println!("Start date for {} cleared", session.client_name()),
            }
        }

        Command::Delete { client } => {
            if !store.delete_client(client)? {
                return Err(MetricsError::ClientNotFound(client.clone()).into());
            }
            println!("Deleted {}", client);
        }
    }

    Ok(())
}

/// Client from the command line or the last-used params.
fn required_client(client: &Option<String>) -> Result<&str> {
    client
        .as_deref()
        .ok_or_else(|| anyhow!("no client given and none remembered; pass a client name"))
}
