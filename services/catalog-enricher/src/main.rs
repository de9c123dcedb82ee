mod config;
mod fetch;

use an_api_types::ArchetypeRecord;
use an_card_client::CardDatabase;
use an_catalog::enrich::{EnrichSummary, apply_dates, compute_archetype_dates};
use an_catalog::parse_catalog;
use an_storage::{KeyValueStore, RocksDbStore};
use an_ygoprodeck::YgoProDeckClient;
use anyhow::Context;
use config::EnricherConfig;
use fetch::CardSource;
use std::fs;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = EnricherConfig::from_env();
    info!(
        input = %config.data_path.display(),
        output = %config.output_path.display(),
        "catalog-enricher starting"
    );

    let store: Option<Box<dyn KeyValueStore>> = match &config.cache_dir {
        Some(dir) => {
            let db = RocksDbStore::open_default(dir)
                .with_context(|| format!("failed to open response cache at {dir}"))?;
            Some(Box::new(db))
        }
        None => None,
    };
    let client = YgoProDeckClient::default();
    info!(endpoint = client.endpoint(), "using card database");
    let source = CardSource::new(client, store, config.cache_ttl_ms);

    let summary = run(&config, &source, &today()).await?;
    info!(
        enriched = summary.enriched,
        preset = summary.preset,
        unmatched = summary.unmatched,
        "catalog-enricher finished"
    );
    Ok(())
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

async fn run<D: CardDatabase>(
    config: &EnricherConfig,
    source: &CardSource<D>,
    today: &str,
) -> anyhow::Result<EnrichSummary> {
    let raw = fs::read_to_string(&config.data_path)
        .with_context(|| format!("failed to read catalog: {}", config.data_path.display()))?;
    let (records, summary) = enrich_catalog(&raw, source, today).await?;

    let json = serde_json::to_string_pretty(&records)?;
    fs::write(&config.output_path, json + "\n")
        .with_context(|| format!("failed to write catalog: {}", config.output_path.display()))?;
    Ok(summary)
}

async fn enrich_catalog<D: CardDatabase>(
    raw: &str,
    source: &CardSource<D>,
    today: &str,
) -> anyhow::Result<(Vec<ArchetypeRecord>, EnrichSummary)> {
    let mut records = parse_catalog(raw)?;
    info!(archetypes = records.len(), "catalog loaded");

    let sets = source.card_sets().await?;
    let cards = source.all_cards().await?;
    info!(sets = sets.len(), cards = cards.len(), "card database loaded");

    let dates = compute_archetype_dates(records.iter().map(|r| r.name.as_str()), &cards, &sets, today);
    let summary = apply_dates(&mut records, &dates);
    Ok((records, summary))
}
