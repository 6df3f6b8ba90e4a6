//! Image generation module
//!
//! Renders raw toy data as scatter plots and fitted classifiers as decision
//! maps. Two backends are available: a native one drawing pixels with the
//! `image` crate, and one driving an external `gnuplot` binary.

mod gnuplot;
mod map;
mod native;

pub use gnuplot::{write_pm3d_data, write_scatter_data, GnuplotRenderer};
pub use map::DecisionMap;
pub use native::{render_decision_map, render_scatter, NativeRenderer};

use crate::data::LabeledSamples;
use crate::error::{Result, ToyError};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Common color definitions
pub mod colors {
    use image::Rgb;

    pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
    /// Decision map, first class
    pub const TEAL_LIGHT: Rgb<u8> = Rgb([0x46, 0xe0, 0xd1]);
    /// Decision map, last class
    pub const TEAL_DARK: Rgb<u8> = Rgb([0x05, 0x92, 0x97]);

    /// gnuplot's default line colors, used for scatter series
    pub const SERIES: [Rgb<u8>; 8] = [
        Rgb([0x94, 0x00, 0xd3]),
        Rgb([0x00, 0x9e, 0x73]),
        Rgb([0x56, 0xb4, 0xe9]),
        Rgb([0xe6, 0x9f, 0x00]),
        Rgb([0xf0, 0xe4, 0x42]),
        Rgb([0x00, 0x72, 0xb2]),
        Rgb([0xe5, 0x1e, 0x10]),
        Rgb([0x00, 0x00, 0x00]),
    ];
}

/// Image configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
    /// Blank border around the plot area, in pixels
    pub margin: u32,
    /// Radius of scatter markers, in pixels
    pub point_radius: u32,
    pub background: [u8; 3],
    /// Decision map colors for the first and last class
    pub map_colors: [[u8; 3]; 2],
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            margin: 40,
            point_radius: 4,
            background: colors::WHITE.0,
            map_colors: [colors::TEAL_LIGHT.0, colors::TEAL_DARK.0],
        }
    }
}

impl ImageConfig {
    /// Reject sizes that leave no plot area inside the margins
    pub fn validate(&self) -> Result<()> {
        if self.width <= 2 * self.margin || self.height <= 2 * self.margin {
            return Err(ToyError::InvalidParameter(format!(
                "image {}x{} with margin {} leaves no room for the plot",
                self.width, self.height, self.margin
            )));
        }
        Ok(())
    }

    /// Color of class `class` out of `n_classes` on a decision map
    pub fn map_color(&self, class: usize, n_classes: usize) -> Rgb<u8> {
        let [low, high] = self.map_colors;
        if n_classes <= 1 {
            return Rgb(low);
        }
        interpolate_color(Rgb(low), Rgb(high), class as f64 / (n_classes - 1) as f64)
    }

    /// Marker color for scatter series `class`
    pub fn series_color(&self, class: usize) -> Rgb<u8> {
        colors::SERIES[class % colors::SERIES.len()]
    }
}

/// Interpolate between two colors
pub fn interpolate_color(c1: Rgb<u8>, c2: Rgb<u8>, t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    Rgb([
        ((1.0 - t) * c1.0[0] as f64 + t * c2.0[0] as f64).round() as u8,
        ((1.0 - t) * c1.0[1] as f64 + t * c2.0[1] as f64).round() as u8,
        ((1.0 - t) * c1.0[2] as f64 + t * c2.0[2] as f64).round() as u8,
    ])
}

/// Set a pixel if it lies inside the image
pub fn put_pixel_checked(img: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < img.width() as u64 && (y as u64) < img.height() as u64 {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Draw a one pixel wide rectangle outline
pub fn draw_rect_outline(img: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: Rgb<u8>) {
    for x in x0..=x1 {
        put_pixel_checked(img, x, y0, color);
        put_pixel_checked(img, x, y1, color);
    }
    for y in y0..=y1 {
        put_pixel_checked(img, x0, y, color);
        put_pixel_checked(img, x1, y, color);
    }
}

/// Draw a circle, either as a ring or filled
pub fn draw_circle(img: &mut RgbImage, cx: i64, cy: i64, radius: u32, filled: bool, color: Rgb<u8>) {
    let r = radius as i64;
    let rf = radius as f64;
    for dy in -r - 1..=r + 1 {
        for dx in -r - 1..=r + 1 {
            let dist = ((dx * dx + dy * dy) as f64).sqrt();
            let hit = if filled {
                dist <= rf + 0.5
            } else {
                (dist - rf).abs() <= 0.6
            };
            if hit {
                put_pixel_checked(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Output backend for the two kinds of figures
pub trait Renderer {
    /// Scatter plot of the labeled samples, one series per class
    fn scatter(&self, samples: &LabeledSamples, title: &str, path: &Path) -> Result<()>;

    /// Filled decision map, optionally overlaid with the training samples
    fn decision_map(
        &self,
        map: &DecisionMap,
        overlay: Option<&LabeledSamples>,
        title: &str,
        path: &Path,
    ) -> Result<()>;
}

/// Available image backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    Native,
    Gnuplot,
}

impl RendererKind {
    pub fn build(&self, config: &ImageConfig) -> Box<dyn Renderer> {
        match self {
            RendererKind::Native => Box::new(NativeRenderer::new(config.clone())),
            RendererKind::Gnuplot => Box::new(GnuplotRenderer::new(config.clone())),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Native => f.write_str("native"),
            RendererKind::Gnuplot => f.write_str("gnuplot"),
        }
    }
}

impl FromStr for RendererKind {
    type Err = ToyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "native" | "image" => Ok(RendererKind::Native),
            "gnuplot" => Ok(RendererKind::Gnuplot),
            other => Err(ToyError::UnknownRenderer(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_color() {
        let mid = interpolate_color(Rgb([0, 0, 0]), Rgb([255, 255, 255]), 0.5);
        assert_eq!(mid, Rgb([128, 128, 128]));
    }

    #[test]
    fn test_map_color_endpoints() {
        let config = ImageConfig::default();
        assert_eq!(config.map_color(0, 2), colors::TEAL_LIGHT);
        assert_eq!(config.map_color(1, 2), colors::TEAL_DARK);
        assert_eq!(config.map_color(0, 1), colors::TEAL_LIGHT);
    }

    #[test]
    fn test_draw_helpers_clip() {
        let mut img = RgbImage::from_pixel(10, 10, colors::WHITE);
        draw_circle(&mut img, 0, 0, 3, true, colors::BLACK);
        draw_rect_outline(&mut img, -5, -5, 20, 20, colors::BLACK);

        assert_eq!(*img.get_pixel(0, 0), colors::BLACK);
        assert_eq!(*img.get_pixel(9, 9), colors::WHITE);
    }

    #[test]
    fn test_margin_must_leave_plot_area() {
        assert!(ImageConfig::default().validate().is_ok());

        let squeezed = ImageConfig {
            width: 80,
            margin: 40,
            ..Default::default()
        };
        assert!(matches!(squeezed.validate(), Err(ToyError::InvalidParameter(_))));
    }

    #[test]
    fn test_parse_renderer() {
        assert_eq!("GNUPLOT".parse::<RendererKind>().unwrap(), RendererKind::Gnuplot);
        assert!("svg".parse::<RendererKind>().is_err());
    }
}
