//! Weekly chart ranking.
//!
//! Streams, sales and hype are each converted to population z-scores, then
//! combined with the configured weights. Rows are ordered by composite score,
//! highest first; equal scores keep their input order.

use sim_core::{ChartRow, ChartWeights, PlatformChartRow, SongId};

/// One candidate row before ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartInput<I> {
    pub id: I,
    pub title: String,
    pub streams: u64,
    pub hype: f64,
}

/// Population z-scores of `values`.
///
/// A zero standard deviation is treated as 1, so a uniform set scores 0
/// everywhere. An empty input yields an empty output.
pub fn z_scores(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let sd = var.sqrt();
    let sd = if sd == 0.0 || !sd.is_finite() { 1.0 } else { sd };
    values.iter().map(|v| (v - mean) / sd).collect()
}

/// Rank rows by weighted composite score. Positions are 1..=N.
pub fn rank<I>(
    rows: Vec<ChartInput<I>>,
    weights: &ChartWeights,
    sales_per_stream: f64,
) -> Vec<ChartRow<I>> {
    let streams: Vec<f64> = rows.iter().map(|r| r.streams as f64).collect();
    let sales: Vec<f64> = streams.iter().map(|s| s * sales_per_stream).collect();
    let hype: Vec<f64> = rows.iter().map(|r| r.hype).collect();
    let zs = z_scores(&streams);
    let zl = z_scores(&sales);
    let zh = z_scores(&hype);

    let mut scored: Vec<ChartRow<I>> = rows
        .into_iter()
        .enumerate()
        .map(|(i, r)| ChartRow {
            position: 0,
            points: weights.streams * zs[i] + weights.sales * zl[i] + weights.hype * zh[i],
            sales: sales[i],
            id: r.id,
            title: r.title,
            streams: r.streams,
            hype: r.hype,
        })
        .collect();
    // Stable: ties keep input order.
    scored.sort_by(|a, b| b.points.total_cmp(&a.points));
    for (i, row) in scored.iter_mut().enumerate() {
        row.position = i as u32 + 1;
    }
    scored
}

/// Rank songs on a single platform metric, highest first, ties in input order.
pub fn rank_by_metric(rows: Vec<(SongId, String, u64)>) -> Vec<PlatformChartRow> {
    let mut rows = rows;
    rows.sort_by(|a, b| b.2.cmp(&a.2));
    rows.into_iter()
        .enumerate()
        .map(|(i, (id, title, metric))| PlatformChartRow {
            position: i as u32 + 1,
            id,
            title,
            metric,
        })
        .collect()
}
