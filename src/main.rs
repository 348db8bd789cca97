mod analysis;
mod config;
mod entity_store;
mod error;
mod ingest;
mod site_data;

use std::path::PathBuf;

use anyhow::Result;
use log::info;
use tokio::io::AsyncBufReadExt;

use crate::analysis::{FrameAnalyzer, SimulatedAnalyzer};
use crate::config::load_config;
use crate::entity_store::SledStore;
use crate::ingest::{IngestOptions, LiveChannel, SessionFeed};
use crate::site_data::SiteData;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;

    info!("Starting {}", config.instance_name);

    let store = match &config.storage.data_dir {
        Some(dir) => SledStore::open_from(dir)?,
        None => SledStore::open_default()?,
    };
    let data = SiteData::new(store)?;

    info!(
        "Collections loaded: {} cameras, {} events, {} faces, {} training models, {} alerts",
        data.cameras().len(),
        data.events().len(),
        data.faces().len(),
        data.training_models().len(),
        data.theft_alerts().len()
    );

    let feed = SessionFeed::with_backlog(data.events());
    let options = IngestOptions {
        endpoint: config.ingest.endpoint.clone(),
        persist_live_events: config.ingest.persist_live_events,
    };
    let mut channel = LiveChannel::connect(options, feed.clone(), data.clone());

    let analyzer = SimulatedAnalyzer::new(data.clone());
    if let Some(camera) = data.cameras().first() {
        info!(
            "{}: {}",
            camera.name,
            analyzer.analyze(&camera.thumbnail).await?
        );
    }

    info!("Service ready. Press enter to quit.");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();
    let _ = lines.next_line().await;

    channel.close();
    info!("{} stopped ({} events in session)", config.instance_name, feed.len());

    Ok(())
}
