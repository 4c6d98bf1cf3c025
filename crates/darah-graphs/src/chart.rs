//! The charts that make up a report

use crate::layout::{chunk_states, grid_title};
use crate::retention::{draw_retention, RETENTION_FILE_NAME, RETENTION_TITLE};
use crate::style::ChartStyle;
use crate::trend::{draw_trend, Metric, TrendPanel};
use darah_common::{join_names, Result};
use darah_data::{RetentionPoint, StateSeries};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Up to four state panels laid out 2x2 under one suptitle
#[derive(Debug, Clone, PartialEq)]
pub struct StateGrid {
    pub title: String,
    pub file_name: String,
    pub panels: Vec<TrendPanel>,
}

impl StateGrid {
    /// One grid per chunk of states, each panel with its own tick spacing
    pub fn paginate(metric: Metric, states: &[StateSeries]) -> Vec<Self> {
        chunk_states(states)
            .into_iter()
            .map(|chunk| {
                let names: Vec<&str> = chunk.iter().map(|s| s.state.as_str()).collect();
                Self {
                    title: grid_title(metric.grid_title_prefix(), &names),
                    file_name: format!("{} ({}).png", metric.grid_file_prefix(), join_names(&names)),
                    panels: chunk
                        .iter()
                        .map(|s| TrendPanel::state(metric, &s.state, s.points.clone()))
                        .collect(),
                }
            })
            .collect()
    }
}

/// A single output image
#[derive(Debug, Clone, PartialEq)]
pub enum ReportChart {
    /// National scatter with trend line
    Trend { file_name: String, panel: TrendPanel },
    /// Page of per-state panels
    StateGrid(StateGrid),
    /// Stacked retention areas
    Retention(Vec<RetentionPoint>),
}

impl ReportChart {
    pub fn national(metric: Metric, panel: TrendPanel) -> Self {
        Self::Trend {
            file_name: metric.file_name().to_string(),
            panel,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::Trend { file_name, .. } => file_name,
            Self::StateGrid(grid) => &grid.file_name,
            Self::Retention(_) => RETENTION_FILE_NAME,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::Trend { panel, .. } => &panel.title,
            Self::StateGrid(grid) => &grid.title,
            Self::Retention(_) => RETENTION_TITLE,
        }
    }

    /// Pixel size of the image; grids are square
    pub fn size(&self, style: &ChartStyle) -> (u32, u32) {
        match self {
            Self::StateGrid(_) => (style.grid_size, style.grid_size),
            _ => (style.width, style.height),
        }
    }

    /// Fill the background and draw the whole chart onto `root`
    pub fn draw<DB>(&self, root: &DrawingArea<DB, Shift>, style: &ChartStyle) -> Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: std::error::Error + Send + Sync + 'static,
    {
        root.fill(&style.background)?;

        match self {
            Self::Trend { panel, .. } => draw_trend(root, panel, style),
            Self::Retention(points) => draw_retention(root, points, style),
            Self::StateGrid(grid) => {
                let body = root.titled(&grid.title, style.font(ChartStyle::TITLE_SIZE))?;
                let cells = body.split_evenly((2, 2));
                for (panel, cell) in grid.panels.iter().zip(cells.iter()) {
                    draw_trend(cell, panel, style)?;
                }
                Ok(())
            }
        }
    }
}
