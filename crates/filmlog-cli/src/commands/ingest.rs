use super::{build_feed_reader, build_provider, connect_store, load_config};
use crate::output::Output;
use color_eyre::Result;
use comfy_table::{Cell, Color, Table};
use filmlog_config::PathManager;
use filmlog_core::{EntryStatus, IngestError, IngestOrchestrator, IngestReport};
use filmlog_sources::FeedSource;
use serde_json::json;

pub async fn run_ingest(
    paths: &PathManager,
    feed: Option<String>,
    skip_enrichment: bool,
    in_memory: bool,
    output: &Output,
) -> Result<()> {
    tracing::debug!("Ingest command started");

    let config = load_config(paths, !skip_enrichment)?;
    let source = FeedSource::parse(feed.as_deref().unwrap_or(&config.feed.location));

    let store = connect_store(&config, in_memory).await?;
    let provider = build_provider(&config)?;
    let orchestrator = IngestOrchestrator::new(build_feed_reader()?, store, provider)
        .with_enrichment(!skip_enrichment);

    output.info(format!("Ingesting {}", source));

    let report = match orchestrator.run(&source).await {
        Ok(report) => report,
        Err(IngestError::FeedRead(e)) => {
            output.error(format!("Could not read feed: {}", e));
            return Err(color_eyre::eyre::eyre!("Ingestion aborted: {}", e));
        }
        Err(e) => return Err(e.into()),
    };

    print_report(&report, output);
    Ok(())
}

fn status_cell(status: EntryStatus) -> Cell {
    let color = match status {
        EntryStatus::Inserted => Color::Green,
        EntryStatus::SkippedDuplicate => Color::DarkGrey,
        EntryStatus::SkippedExtractFailure => Color::Yellow,
        EntryStatus::SkippedCheckFailure | EntryStatus::SkippedPersistFailure => Color::Red,
    };
    Cell::new(status.as_str()).fg(color)
}

fn print_report(report: &IngestReport, output: &Output) {
    if !output.is_human() {
        output.json(&json!({
            "inserted": report.inserted(),
            "skipped": report.skipped(),
            "enriched": report.enriched(),
            "total_events": report.events.len(),
            "duration_ms": report.duration.as_millis() as u64,
            "outcomes": report.outcomes,
        }));
        return;
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_header(vec!["GUID", "Title", "Status", "Enriched", "Error"]);
    for outcome in &report.outcomes {
        table.add_row(vec![
            Cell::new(&outcome.guid),
            Cell::new(outcome.title.as_deref().unwrap_or("-")),
            status_cell(outcome.status),
            Cell::new(if outcome.enriched { "✓" } else { "" }),
            Cell::new(outcome.error.as_deref().unwrap_or("")),
        ]);
    }
    output.table(&table);

    output.success(format!(
        "Ingested {} new of {} entries ({} enriched) in {:.2}s, {} events stored",
        report.inserted(),
        report.outcomes.len(),
        report.enriched(),
        report.duration.as_secs_f64(),
        report.events.len()
    ));

    let failures = report.count(EntryStatus::SkippedCheckFailure) + report.count(EntryStatus::SkippedPersistFailure);
    if failures > 0 {
        output.warn(format!("{} entries hit store errors and will be retried on the next run", failures));
    }
}
