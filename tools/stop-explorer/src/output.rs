//! Printing projections to stdout. Status lines and logs go to stderr.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use geojson::FeatureCollection;
use stop_explorer_core::render::{MarkerLayer, TableView};
use stop_explorer_core::{NearestStop, StatusMessage};

pub fn print_table(table: &TableView) {
    println!("{}", table.render_text());
}

pub fn print_geojson(layer: &MarkerLayer) -> Result<()> {
    let collection: FeatureCollection = layer.to_feature_collection();
    let json = serde_json::to_string_pretty(&collection).context("Failed to serialize GeoJSON")?;
    println!("{json}");
    Ok(())
}

pub fn print_nearest(nearest: &[NearestStop]) {
    for stop in nearest {
        println!("{:>8.0} m  {:<14} {}", stop.distance_m, stop.id, stop.name);
    }
}

pub fn print_status(status: Option<StatusMessage>) {
    if let Some(status) = status {
        eprintln!("{status}");
    }
}

/// Ask a yes/no question on stderr; anything but "y"/"yes" is a no.
pub fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;

    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;

    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
