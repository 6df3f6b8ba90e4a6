//! Pixel renderer built on the `image` crate

use super::{colors, draw_circle, draw_rect_outline, DecisionMap, ImageConfig, Renderer};
use crate::data::{Bounds, LabeledSamples};
use crate::error::Result;
use image::{Rgb, RgbImage};
use std::path::Path;
use tracing::debug;

/// Maps data coordinates onto the plot area of an image
struct Frame {
    bounds: Bounds,
    left: i64,
    top: i64,
    width: i64,
    height: i64,
}

impl Frame {
    fn new(bounds: Bounds, config: &ImageConfig) -> Self {
        let margin = config.margin as i64;
        Self {
            bounds,
            left: margin,
            top: margin,
            width: (config.width as i64 - 2 * margin).max(1),
            height: (config.height as i64 - 2 * margin).max(1),
        }
    }

    fn span(lo: f64, hi: f64) -> f64 {
        if hi - lo > f64::EPSILON {
            hi - lo
        } else {
            1.0
        }
    }

    fn to_pixel(&self, x: f64, y: f64) -> (i64, i64) {
        let fx = (x - self.bounds.x_min) / Self::span(self.bounds.x_min, self.bounds.x_max);
        let fy = (y - self.bounds.y_min) / Self::span(self.bounds.y_min, self.bounds.y_max);
        let px = self.left + (fx * (self.width - 1) as f64).round() as i64;
        let py = self.top + self.height - 1 - (fy * (self.height - 1) as f64).round() as i64;
        (px, py)
    }

    /// Fractions of the plot area (0..=1, y growing upward) for a pixel
    fn to_fraction(&self, px: i64, py: i64) -> (f64, f64) {
        let fx = (px - self.left) as f64 / (self.width - 1).max(1) as f64;
        let fy = (self.top + self.height - 1 - py) as f64 / (self.height - 1).max(1) as f64;
        (fx, fy)
    }

    fn outline(&self, img: &mut RgbImage) {
        draw_rect_outline(
            img,
            self.left - 1,
            self.top - 1,
            self.left + self.width,
            self.top + self.height,
            colors::BLACK,
        );
    }
}

/// Bounds grown by a fraction of their extent on every side
fn padded(bounds: Bounds, fraction: f64) -> Bounds {
    let dx = bounds.width().max(1e-9) * fraction;
    let dy = bounds.height().max(1e-9) * fraction;
    Bounds {
        x_min: bounds.x_min - dx,
        x_max: bounds.x_max + dx,
        y_min: bounds.y_min - dy,
        y_max: bounds.y_max + dy,
    }
}

fn draw_samples(
    img: &mut RgbImage,
    frame: &Frame,
    samples: &LabeledSamples,
    config: &ImageConfig,
    filled: bool,
) {
    for (row, &label) in samples.features.rows().into_iter().zip(samples.labels.iter()) {
        let (px, py) = frame.to_pixel(row[0], row[1]);
        draw_circle(img, px, py, config.point_radius, filled, config.series_color(label));
    }
}

/// Scatter plot: one open-circle series per class inside a framed area
pub fn render_scatter(samples: &LabeledSamples, config: &ImageConfig) -> Result<RgbImage> {
    config.validate()?;
    let mut img = RgbImage::from_pixel(config.width, config.height, Rgb(config.background));
    let frame = Frame::new(padded(samples.bounds()?, 0.05), config);

    draw_samples(&mut img, &frame, samples, config, false);
    frame.outline(&mut img);
    Ok(img)
}

/// Decision map: every pixel of the plot area takes the class of the nearest grid point
pub fn render_decision_map(
    map: &DecisionMap,
    overlay: Option<&LabeledSamples>,
    config: &ImageConfig,
) -> Result<RgbImage> {
    config.validate()?;
    let mut img = RgbImage::from_pixel(config.width, config.height, Rgb(config.background));

    let grid = map.grid();
    let (xs, ys) = (grid.xs(), grid.ys());
    let bounds = Bounds {
        x_min: xs[0],
        x_max: xs[xs.len() - 1],
        y_min: ys[0],
        y_max: ys[ys.len() - 1],
    };
    let frame = Frame::new(bounds, config);

    let last_i = (xs.len() - 1) as f64;
    let last_j = (ys.len() - 1) as f64;

    for py in frame.top..frame.top + frame.height {
        for px in frame.left..frame.left + frame.width {
            let (fx, fy) = frame.to_fraction(px, py);
            let i = (fx * last_i).round().clamp(0.0, last_i) as usize;
            let j = (fy * last_j).round().clamp(0.0, last_j) as usize;

            let color = config.map_color(map.class_at(i, j), map.n_classes());
            img.put_pixel(px as u32, py as u32, color);
        }
    }

    if let Some(samples) = overlay {
        draw_samples(&mut img, &frame, samples, config, true);
    }

    frame.outline(&mut img);
    Ok(img)
}

/// Writes PNG files directly
#[derive(Debug, Clone, Default)]
pub struct NativeRenderer {
    config: ImageConfig,
}

impl NativeRenderer {
    pub fn new(config: ImageConfig) -> Self {
        Self { config }
    }
}

impl Renderer for NativeRenderer {
    fn scatter(&self, samples: &LabeledSamples, title: &str, path: &Path) -> Result<()> {
        let img = render_scatter(samples, &self.config)?;
        img.save(path)?;
        debug!(title, path = %path.display(), "scatter written");
        Ok(())
    }

    fn decision_map(
        &self,
        map: &DecisionMap,
        overlay: Option<&LabeledSamples>,
        title: &str,
        path: &Path,
    ) -> Result<()> {
        let img = render_decision_map(map, overlay, &self.config)?;
        img.save(path)?;
        debug!(title, path = %path.display(), "decision map written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Grid, Points};

    fn samples() -> LabeledSamples {
        LabeledSamples::from_classes(&[
            Points::new(vec![-1.0, -0.5], vec![-1.0, 0.0]),
            Points::new(vec![1.0, 0.5], vec![1.0, 0.0]),
        ])
        .unwrap()
    }

    fn small_config() -> ImageConfig {
        ImageConfig {
            width: 120,
            height: 100,
            margin: 10,
            ..Default::default()
        }
    }

    #[test]
    fn test_scatter_dimensions_and_markers() {
        let config = small_config();
        let img = render_scatter(&samples(), &config).unwrap();

        assert_eq!(img.dimensions(), (120, 100));
        let purple = config.series_color(0);
        let green = config.series_color(1);
        assert!(img.pixels().any(|p| *p == purple));
        assert!(img.pixels().any(|p| *p == green));
    }

    #[test]
    fn test_decision_map_halves() {
        let config = small_config();
        let bounds = samples().bounds().unwrap();
        let grid = Grid::covering(&bounds, 10).unwrap();

        // Left half class 0, right half class 1
        let predictions: Vec<usize> = (0..grid.len())
            .map(|idx| usize::from(grid.point(idx).0 > 0.0))
            .collect();
        let map = DecisionMap::new(grid, predictions, 2).unwrap();
        let img = render_decision_map(&map, None, &config).unwrap();

        assert_eq!(*img.get_pixel(15, 50), colors::TEAL_LIGHT);
        assert_eq!(*img.get_pixel(105, 50), colors::TEAL_DARK);
        // Margin keeps the background
        assert_eq!(*img.get_pixel(2, 2), colors::WHITE);
    }

    #[test]
    fn test_oversized_margin_is_rejected() {
        let config = ImageConfig {
            width: 60,
            height: 60,
            margin: 30,
            ..Default::default()
        };
        let bounds = samples().bounds().unwrap();
        let map = DecisionMap::new(Grid::covering(&bounds, 2).unwrap(), vec![0; 4], 2).unwrap();

        assert!(matches!(
            render_scatter(&samples(), &config),
            Err(crate::error::ToyError::InvalidParameter(_))
        ));
        assert!(matches!(
            render_decision_map(&map, None, &config),
            Err(crate::error::ToyError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_renderer_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toydata0.png");

        NativeRenderer::new(small_config())
            .scatter(&samples(), "toydata0.png", &path)
            .unwrap();

        let loaded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(loaded.dimensions(), (120, 100));
    }
}
