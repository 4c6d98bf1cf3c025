//! Turns the aggregated series into the ordered list of report images

use crate::chart::{ReportChart, StateGrid};
use crate::renderer::ChartRenderer;
use crate::trend::{Metric, TrendPanel};
use darah_common::{ChartArtifact, Result};
use darah_data::ReportSeries;
use tracing::{info, instrument, warn};

/// Charts in send order: national totals, national averages, state total
/// grids, state average grids, retention. Series without data are skipped.
pub fn report_charts(series: &ReportSeries) -> Vec<ReportChart> {
    let mut charts = Vec::new();

    for (metric, points) in [
        (Metric::AnnualTotal, &series.annual_totals),
        (Metric::DailyAverage, &series.daily_averages),
    ] {
        if points.is_empty() {
            warn!(chart = metric.file_name(), "No national data, skipping chart");
            continue;
        }
        charts.push(ReportChart::national(metric, TrendPanel::national(metric, points.clone())));
    }

    for (metric, states) in [
        (Metric::AnnualTotal, &series.state_totals),
        (Metric::DailyAverage, &series.state_averages),
    ] {
        charts.extend(
            StateGrid::paginate(metric, states)
                .into_iter()
                .map(ReportChart::StateGrid),
        );
    }

    if series.retention.is_empty() {
        warn!("No retention data, skipping retention chart");
    } else {
        charts.push(ReportChart::Retention(series.retention.clone()));
    }

    charts
}

/// Render every chart of the report in order; the first failure aborts
#[instrument(skip_all)]
pub fn render_report(renderer: &ChartRenderer, series: &ReportSeries) -> Result<Vec<ChartArtifact>> {
    let charts = report_charts(series);
    let artifacts = charts
        .iter()
        .map(|chart| renderer.render(chart))
        .collect::<Result<Vec<_>>>()?;

    info!(count = artifacts.len(), target = ?renderer.target(), "Rendered report charts");
    Ok(artifacts)
}
