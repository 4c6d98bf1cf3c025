//! Rasterises charts to PNG files or in-memory buffers

use crate::chart::ReportChart;
use crate::style::ChartStyle;
use darah_common::{ChartArtifact, ChartImage, DarahError, Result};
use darah_config::{Config, OutputMode};
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageEncoder};
use plotters::prelude::*;
use std::path::PathBuf;
use tracing::{debug, instrument};

/// Where rendered images go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// PNG files in this directory
    Directory(PathBuf),
    /// Encoded PNG bytes kept in memory
    Memory,
}

impl OutputTarget {
    pub fn from_config(config: &Config) -> Self {
        match config.report.output_mode {
            OutputMode::Directory => Self::Directory(config.plot_dir()),
            OutputMode::Memory => Self::Memory,
        }
    }
}

/// Renders [`ReportChart`]s with a fixed style and output target
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    style: ChartStyle,
    target: OutputTarget,
}

impl ChartRenderer {
    pub fn new(style: ChartStyle, target: OutputTarget) -> Self {
        Self { style, target }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(ChartStyle::from(&config.graph), OutputTarget::from_config(config))
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn target(&self) -> &OutputTarget {
        &self.target
    }

    /// Render one chart
    #[instrument(skip(self, chart), fields(file = %chart.file_name()))]
    pub fn render(&self, chart: &ReportChart) -> Result<ChartArtifact> {
        let image = match &self.target {
            OutputTarget::Directory(dir) => {
                std::fs::create_dir_all(dir)?;
                let path = dir.join(chart.file_name());
                self.render_to_file(chart, &path)?;
                ChartImage::File(path)
            }
            OutputTarget::Memory => ChartImage::Png(self.render_to_bytes(chart)?),
        };
        debug!("Rendered chart");
        Ok(ChartArtifact::new(chart.file_name(), image))
    }

    /// Render a chart to a PNG file
    pub fn render_to_file(&self, chart: &ReportChart, path: &std::path::Path) -> Result<()> {
        let size = chart.size(&self.style);
        let root = BitMapBackend::new(path, size).into_drawing_area();
        chart.draw(&root, &self.style)?;
        root.present()?;
        Ok(())
    }

    /// Render a chart to encoded PNG bytes
    pub fn render_to_bytes(&self, chart: &ReportChart) -> Result<Vec<u8>> {
        let (width, height) = chart.size(&self.style);
        let mut raw = vec![0u8; width as usize * height as usize * 3];
        {
            let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
            chart.draw(&root, &self.style)?;
            root.present()?;
        }
        encode_png(&raw, width, height)
    }
}

/// Encode a packed RGB buffer as PNG
pub fn encode_png(rgb: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png)
        .write_image(rgb, width, height, ColorType::Rgb8)
        .map_err(|e| DarahError::graph_with_source("PNG encoding failed", e))?;
    Ok(png)
}
