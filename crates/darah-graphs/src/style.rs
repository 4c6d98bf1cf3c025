//! Colors, fonts and sizes shared by every chart

use darah_config::GraphConfig;
use plotters::style::RGBColor;

/// Resolved chart styling
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub width: u32,
    pub height: u32,
    pub grid_size: u32,
    pub background: RGBColor,
    pub point: RGBColor,
    pub regression: RGBColor,
    pub retention: RGBColor,
    pub single_donor: RGBColor,
    pub font_family: String,
    pub show_grid: bool,
}

impl ChartStyle {
    pub const TITLE_SIZE: u32 = 22;
    pub const SUBTITLE_SIZE: u32 = 16;
    pub const LABEL_SIZE: u32 = 12;
    pub const AXIS_DESC_SIZE: u32 = 14;

    pub fn font(&self, size: u32) -> (&str, u32) {
        (self.font_family.as_str(), size)
    }
}

impl From<&GraphConfig> for ChartStyle {
    fn from(config: &GraphConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            grid_size: config.grid_size,
            background: parse_color(&config.background_color),
            point: parse_color(&config.point_color),
            regression: parse_color(&config.regression_color),
            retention: parse_color(&config.retention_color),
            single_donor: parse_color(&config.single_donor_color),
            font_family: config.font_family.clone(),
            show_grid: config.show_grid,
        }
    }
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&GraphConfig::default())
    }
}

/// Parse a `#RRGGBB` string, falling back to black
pub fn parse_color(color_str: &str) -> RGBColor {
    if let Some(hex) = color_str.strip_prefix('#') {
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return RGBColor(r, g, b);
            }
        }
    }
    RGBColor(0, 0, 0)
}
