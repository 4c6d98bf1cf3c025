//! Yearly scatter with a least-squares trend line

use crate::axis::FixedTicks;
use crate::regression::LinearFit;
use crate::style::ChartStyle;
use crate::ticks::{leading_digit_tick, rounded_max, series_tick, tick_values};
use darah_common::{format_thousands, DarahError, Result, YearValue};
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Which yearly quantity a chart shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    AnnualTotal,
    DailyAverage,
}

impl Metric {
    /// Title of the national chart
    pub fn title(self) -> &'static str {
        match self {
            Self::AnnualTotal => "Total Annual Blood Donations",
            Self::DailyAverage => "Average Daily Blood Donations by Year",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Self::AnnualTotal => "Total Annual Blood Donations.png",
            Self::DailyAverage => "Average Daily Blood Donations.png",
        }
    }

    pub fn y_desc(self) -> &'static str {
        match self {
            Self::AnnualTotal => "Total No. of Donations",
            Self::DailyAverage => "No. of Average Daily Donations",
        }
    }

    /// Grid suptitle prefix, completed by `State[s] (A, B)`
    pub fn grid_title_prefix(self) -> &'static str {
        match self {
            Self::AnnualTotal => "Total Annual Blood Donations by",
            Self::DailyAverage => "Average Daily Blood Donations for",
        }
    }

    /// Grid file name prefix, completed by `(A, B).png`
    pub fn grid_file_prefix(self) -> &'static str {
        match self {
            Self::AnnualTotal => "State Donation Breakdown",
            Self::DailyAverage => "State Daily Donation Breakdown",
        }
    }

    pub fn state_title(self, state: &str) -> String {
        match self {
            Self::AnnualTotal => format!("Total blood donations in {} per year", state),
            Self::DailyAverage => format!("Average daily blood donations in {} per year", state),
        }
    }

    pub fn state_y_desc(self) -> &'static str {
        match self {
            Self::AnnualTotal => "Total No. of Donations",
            Self::DailyAverage => "Average Daily Blood Donations",
        }
    }
}

/// One scatter-plus-trend plot, either a whole image or one grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPanel {
    pub title: String,
    pub y_desc: String,
    pub points: Vec<YearValue>,
    /// Y-axis ticks, ascending from 0
    pub ticks: Vec<u64>,
    pub title_size: u32,
}

impl TrendPanel {
    /// National chart: tick spacing from the magnitude of the largest value
    pub fn national(metric: Metric, points: Vec<YearValue>) -> Self {
        let max = rounded_max(points.iter().map(|p| p.value));
        Self {
            title: metric.title().to_string(),
            y_desc: metric.y_desc().to_string(),
            ticks: tick_values(max, series_tick(max)),
            points,
            title_size: ChartStyle::TITLE_SIZE,
        }
    }

    /// State grid cell: tick spacing from the leading digit of this state's maximum
    pub fn state(metric: Metric, state: &str, points: Vec<YearValue>) -> Self {
        let max = rounded_max(points.iter().map(|p| p.value));
        Self {
            title: metric.state_title(state),
            y_desc: metric.state_y_desc().to_string(),
            ticks: tick_values(max, leading_digit_tick(max)),
            points,
            title_size: ChartStyle::SUBTITLE_SIZE,
        }
    }

    pub fn top(&self) -> u64 {
        self.ticks.last().copied().unwrap_or(1)
    }

    pub fn fit(&self) -> Option<LinearFit> {
        let xy: Vec<(f64, f64)> = self
            .points
            .iter()
            .map(|p| (f64::from(p.year), p.value))
            .collect();
        LinearFit::fit(&xy)
    }
}

/// Draw a panel into `area`
pub fn draw_trend<DB>(area: &DrawingArea<DB, Shift>, panel: &TrendPanel, style: &ChartStyle) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let years: Vec<i32> = panel.points.iter().map(|p| p.year).collect();
    let (first, last) = match (years.first(), years.last()) {
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(DarahError::graph(format!("No data points for '{}'", panel.title))),
    };
    let y_keys: Vec<f64> = panel.ticks.iter().map(|t| *t as f64).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, style.font(panel.title_size))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            FixedTicks::new(RangedCoordi32::from(first - 1..last + 1), years),
            FixedTicks::new(RangedCoordf64::from(0f64..panel.top() as f64), y_keys),
        )?;

    let x_fmt = |year: &i32| year.to_string();
    let y_fmt = |value: &f64| format_thousands(value.round() as i64);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Year")
        .y_desc(panel.y_desc.as_str())
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style(style.font(ChartStyle::LABEL_SIZE))
        .axis_desc_style(style.font(ChartStyle::AXIS_DESC_SIZE));
    if !style.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    chart.draw_series(
        panel
            .points
            .iter()
            .map(|p| Circle::new((p.year, p.value), 4, style.point.filled())),
    )?;

    if let Some(fit) = panel.fit() {
        chart.draw_series(LineSeries::new(
            [first, last].into_iter().map(|year| (year, fit.at(f64::from(year)))),
            style.regression.stroke_width(2),
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(values: &[(i32, f64)]) -> Vec<YearValue> {
        values.iter().map(|(y, v)| YearValue::new(*y, *v)).collect()
    }

    #[test]
    fn test_national_panel_ticks() {
        let panel = TrendPanel::national(
            Metric::AnnualTotal,
            points(&[(2021, 480_000.0), (2022, 551_234.0)]),
        );
        assert_eq!(panel.title, "Total Annual Blood Donations");
        assert_eq!(panel.ticks[1], 50_000);
        assert_eq!(panel.top(), 600_000);
    }

    #[test]
    fn test_state_panel_ticks_use_rounded_max() {
        let panel = TrendPanel::state(
            Metric::DailyAverage,
            "Johor",
            points(&[(2021, 140.2), (2022, 186.6)]),
        );
        // max rounds to 187 -> tick 10
        assert_eq!(panel.ticks[1], 10);
        assert_eq!(panel.top(), 190);
        assert_eq!(panel.title, "Average daily blood donations in Johor per year");
        assert_eq!(panel.title_size, ChartStyle::SUBTITLE_SIZE);
    }

    #[test]
    fn test_panel_fit_follows_points() {
        let panel = TrendPanel::national(
            Metric::AnnualTotal,
            points(&[(2020, 100.0), (2021, 200.0), (2022, 300.0)]),
        );
        let fit = panel.fit().unwrap();
        assert!((fit.at(2023.0) - 400.0).abs() < 1e-6);
    }

    #[test]
    fn test_empty_panel_is_graph_error() {
        let panel = TrendPanel::national(Metric::AnnualTotal, Vec::new());
        let mut buffer = vec![0u8; 200 * 200 * 3];
        let root = BitMapBackend::with_buffer(&mut buffer, (200, 200)).into_drawing_area();
        let err = draw_trend(&root, &panel, &ChartStyle::default()).unwrap_err();
        assert!(matches!(err, DarahError::Graph { .. }));
    }
}
