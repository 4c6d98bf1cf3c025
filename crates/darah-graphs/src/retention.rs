//! Stacked area chart of donor retention

use crate::axis::FixedTicks;
use crate::style::ChartStyle;
use darah_common::{DarahError, Result};
use darah_data::RetentionPoint;
use plotters::coord::types::{RangedCoordf64, RangedCoordi32};
use plotters::coord::Shift;
use plotters::prelude::*;

pub const RETENTION_TITLE: &str = "Percentage of donors retained per year";
pub const RETENTION_FILE_NAME: &str = "Donation Retention Percentage.png";

/// Percent ticks, every 10 %
pub fn percent_ticks() -> Vec<f64> {
    (0..=10).map(|i| f64::from(i * 10)).collect()
}

/// Retention share at the bottom, single donors stacked on top up to 100 %
pub fn draw_retention<DB>(
    area: &DrawingArea<DB, Shift>,
    points: &[RetentionPoint],
    style: &ChartStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: std::error::Error + Send + Sync + 'static,
{
    let years: Vec<i32> = points.iter().map(|p| p.year).collect();
    let (first, last) = match (years.first(), years.last()) {
        (Some(first), Some(last)) if first == last => (*first - 1, *last + 1),
        (Some(first), Some(last)) => (*first, *last),
        _ => return Err(DarahError::graph("No retention data to plot")),
    };

    let mut chart = ChartBuilder::on(area)
        .caption(RETENTION_TITLE, style.font(ChartStyle::TITLE_SIZE))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(
            FixedTicks::new(RangedCoordi32::from(first..last), years),
            FixedTicks::new(RangedCoordf64::from(0f64..100f64), percent_ticks()),
        )?;

    let x_fmt = |year: &i32| year.to_string();
    let y_fmt = |value: &f64| format!("{:.0}%", value);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc("Year")
        .y_desc("Percentage of donors")
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style(style.font(ChartStyle::LABEL_SIZE))
        .axis_desc_style(style.font(ChartStyle::AXIS_DESC_SIZE));
    if !style.show_grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    let single = style.single_donor;
    let retained = style.retention;

    // The single-donor band fills to 100 % and the retention band is drawn over it
    chart
        .draw_series(
            AreaSeries::new(points.iter().map(|p| (p.year, 100.0)), 0.0, single.filled())
                .border_style(single),
        )?
        .label("Single Donors Percentage")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], single.filled()));

    chart
        .draw_series(
            AreaSeries::new(
                points.iter().map(|p| (p.year, p.retention * 100.0)),
                0.0,
                retained.filled(),
            )
            .border_style(retained),
        )?
        .label("Donor Retention Percentage")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], retained.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font(style.font(ChartStyle::LABEL_SIZE))
        .draw()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_ticks() {
        let ticks = percent_ticks();
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[0], 0.0);
        assert_eq!(ticks[10], 100.0);
    }

    #[test]
    fn test_empty_retention_is_graph_error() {
        let mut buffer = vec![0u8; 100 * 100 * 3];
        let root = BitMapBackend::with_buffer(&mut buffer, (100, 100)).into_drawing_area();
        let err = draw_retention(&root, &[], &ChartStyle::default()).unwrap_err();
        assert!(err.to_string().contains("No retention data"));
    }
}
