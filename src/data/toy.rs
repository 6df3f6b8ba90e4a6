//! Synthetic 2-D toy shapes
//!
//! Every generator samples a parameter uniformly, maps it onto a curve or an
//! area, and finally jitters each coordinate with Gaussian noise.

use crate::error::{Result, ToyError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Coordinates of the points belonging to one class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Points {
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

impl Points {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Self {
        Self { xs, ys }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.xs.push(x);
        self.ys.push(y);
    }

    /// Iterate over `(x, y)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }
}

/// Seeded generator for the toy shapes
#[derive(Debug, Clone)]
pub struct ToyGenerator {
    rng: ChaCha8Rng,
    noise: Normal<f64>,
}

impl ToyGenerator {
    /// Create a generator with the given seed and jitter standard deviation
    pub fn new(seed: u64, noise: f64) -> Result<Self> {
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            noise: centered_normal("noise", noise)?,
        })
    }

    /// Ring of points with radius in `[r0, r1)` and angle in `[t0·π, t1·π)`
    pub fn donut(&mut self, n: usize, radius: (f64, f64), theta: (f64, f64)) -> Result<Points> {
        let thetas = self.uniform(n, theta.0 * PI, theta.1 * PI)?;
        let radii = self.uniform(n, radius.0, radius.1)?;

        let (xs, ys) = thetas
            .iter()
            .zip(radii.iter())
            .map(|(&t, &r)| (r * t.cos(), r * t.sin()))
            .unzip();

        Ok(self.jitter(Points::new(xs, ys)))
    }

    /// Archimedean spiral arm, rotated by `rotation·π`
    pub fn galaxy(&mut self, n: usize, theta: (f64, f64), rotation: f64) -> Result<Points> {
        let thetas = self.uniform(n, theta.0 * PI, theta.1 * PI)?;
        let phase = rotation * PI;

        let (xs, ys) = thetas
            .iter()
            .map(|&t| (t * (t + phase).cos(), t * (t + phase).sin()))
            .unzip();

        Ok(self.jitter(Points::new(xs, ys)))
    }

    /// Gaussian blob around `center`
    pub fn duo(&mut self, n: usize, center: (f64, f64), spread: f64) -> Result<Points> {
        let blob = centered_normal("spread", spread)?;

        let mut points = Points::default();
        for _ in 0..n {
            let dx = blob.sample(&mut self.rng);
            let dy = blob.sample(&mut self.rng);
            points.push(center.0 + dx, center.1 + dy);
        }

        Ok(self.jitter(points))
    }

    /// Sine band `amplitude·sin(x) + offset` with x in `[a·π, b·π)`
    pub fn wave(
        &mut self,
        n: usize,
        x_range: (f64, f64),
        amplitude: f64,
        offset: f64,
    ) -> Result<Points> {
        let xs = self.uniform(n, x_range.0 * PI, x_range.1 * PI)?;
        let ys = xs.iter().map(|&x| amplitude * x.sin() + offset).collect();

        Ok(self.jitter(Points::new(xs, ys)))
    }

    fn uniform(&mut self, n: usize, low: f64, high: f64) -> Result<Vec<f64>> {
        if !(low < high) || !low.is_finite() || !high.is_finite() {
            return Err(ToyError::InvalidParameter(format!(
                "empty sampling range [{}, {})",
                low, high
            )));
        }
        Ok((0..n).map(|_| self.rng.gen_range(low..high)).collect())
    }

    fn jitter(&mut self, mut points: Points) -> Points {
        for v in points.xs.iter_mut().chain(points.ys.iter_mut()) {
            *v += self.noise.sample(&mut self.rng);
        }
        points
    }
}

/// Zero-mean normal distribution; `std_dev` must be finite and non-negative
fn centered_normal(what: &str, std_dev: f64) -> Result<Normal<f64>> {
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(ToyError::InvalidParameter(format!(
            "{} must be finite and non-negative, got {}",
            what, std_dev
        )));
    }
    Normal::new(0.0, std_dev)
        .map_err(|e| ToyError::InvalidParameter(format!("{} {}: {}", what, std_dev, e)))
}

/// Named toy dataset made of two classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    Galaxy,
    Donut,
    Duo,
    Wave,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Galaxy,
        DatasetKind::Donut,
        DatasetKind::Duo,
        DatasetKind::Wave,
    ];

    /// Generate both classes with `n` points each
    pub fn generate(&self, gen: &mut ToyGenerator, n: usize) -> Result<Vec<Points>> {
        let classes = match self {
            DatasetKind::Galaxy => vec![
                gen.galaxy(n, (0.0, 2.0), 0.0)?,
                gen.galaxy(n, (0.0, 2.0), 1.0)?,
            ],
            DatasetKind::Donut => vec![
                gen.donut(n, (0.0, 1.8), (0.0, 2.0))?,
                gen.donut(n, (1.8, 3.0), (0.0, 2.0))?,
            ],
            DatasetKind::Duo => vec![
                gen.duo(n, (-1.5, 0.0), 0.6)?,
                gen.duo(n, (1.5, 0.0), 0.6)?,
            ],
            DatasetKind::Wave => vec![
                gen.wave(n, (-1.0, 1.0), 1.5, 1.0)?,
                gen.wave(n, (-1.0, 1.0), 1.5, -1.0)?,
            ],
        };
        Ok(classes)
    }

    pub fn name(&self) -> &'static str {
        match self {
            DatasetKind::Galaxy => "galaxy",
            DatasetKind::Donut => "donut",
            DatasetKind::Duo => "duo",
            DatasetKind::Wave => "wave",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DatasetKind {
    type Err = ToyError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "galaxy" | "spiral" => Ok(DatasetKind::Galaxy),
            "donut" | "ring" => Ok(DatasetKind::Donut),
            "duo" | "blobs" => Ok(DatasetKind::Duo),
            "wave" | "sine" => Ok(DatasetKind::Wave),
            other => Err(ToyError::UnknownDataset(other.to_string())),
        }
    }
}
