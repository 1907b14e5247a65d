// Interval Grid
// Main entry point: loads a snapshot and prints its intervals against the configured grid

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use interval_grid::services::config;
use interval_grid::services::export::load_snapshot;
use interval_grid::services::geometry::ViewportBounds;
use interval_grid::IntervalEditor;

const DEFAULT_WIDTH_PX: f64 = 1200.0;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let snapshot_path = args
        .next()
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: interval-grid <snapshot.json> [config.toml]"))?;
    let config_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(config::default_config_path);

    log::info!("Using config {}", config_path.display());
    let settings = config::load_settings_or_default(&config_path);

    let mut editor = IntervalEditor::new(settings).context("failed to start editor")?;
    let snapshot = load_snapshot(&snapshot_path)?;
    editor
        .load_snapshot(snapshot)
        .context("snapshot does not fit the calendar")?;

    let calendar = *editor.calendar();
    println!(
        "{} interval(s), {} grid, timezone {}",
        editor.intervals().len(),
        editor.settings().grid,
        calendar.timezone()
    );

    for interval in editor.store().list() {
        let (start, end) = interval.span(&calendar);
        println!(
            "  {}  {} -> {}  ({} {}){}",
            interval.id,
            calendar.format(start),
            calendar.format(end),
            interval.grid_amount,
            interval.grid_unit,
            interval
                .metadata
                .label
                .as_deref()
                .map(|label| format!("  {}", label))
                .unwrap_or_default()
        );
    }

    let min = editor.intervals().iter().map(|i| i.start_time).min();
    let max = editor
        .intervals()
        .iter()
        .map(|i| i.end_time(&calendar))
        .max();
    if let (Some(min), Some(max)) = (min, max) {
        let geometry = editor.geometry(ViewportBounds::new(min, max, DEFAULT_WIDTH_PX))?;
        let lines = geometry.grid_lines();
        println!(
            "Viewport {} -> {}: {} grid line(s), {} major, {:.0}px wide",
            calendar.format(min),
            calendar.format(max),
            lines.len(),
            lines.iter().filter(|line| line.major).count(),
            geometry.content_width_px()
        );
    }

    Ok(())
}
