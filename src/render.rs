//! Scatter-plot sink: draws clustered points into a PNG.

use crate::error::{KohonenError, Result};
use image::{ImageBuffer, Rgb, RgbImage};
use std::path::Path;

/// Colors assigned to cluster indices, cycling when there are more clusters.
pub const PALETTE: [[u8; 3]; 8] = [
    [31, 119, 180],  // blue
    [44, 160, 44],   // green
    [214, 39, 40],   // red
    [255, 127, 14],  // orange
    [148, 103, 189], // purple
    [140, 86, 75],   // brown
    [227, 119, 194], // pink
    [23, 190, 207],  // cyan
];

/// Renders `(point, cluster)` pairs using the first two components of each point.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    width: u32,
    height: u32,
    margin: u32,
    marker: u32,
    points: Vec<(f64, f64, usize)>,
}

impl ScatterPlot {
    /// Creates an empty plot of the given pixel size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            margin: 16,
            marker: 3,
            points: Vec::new(),
        }
    }

    /// Sets the half-width of the square marker drawn for every point.
    pub fn with_marker(mut self, marker: u32) -> Self {
        self.marker = marker;
        self
    }

    /// Adds one point colored by its cluster.
    pub fn add(&mut self, point: &[f64], cluster: usize) -> Result<()> {
        if point.len() < 2 {
            return Err(KohonenError::DimensionMismatch {
                expected: 2,
                actual: point.len(),
            });
        }
        self.points.push((point[0], point[1], cluster));
        Ok(())
    }

    /// Adds many points with their clusters.
    pub fn extend(&mut self, points: &[Vec<f64>], clusters: &[usize]) -> Result<()> {
        if points.len() != clusters.len() {
            return Err(KohonenError::DimensionMismatch {
                expected: points.len(),
                actual: clusters.len(),
            });
        }
        for (point, &cluster) in points.iter().zip(clusters) {
            self.add(point, cluster)?;
        }
        Ok(())
    }

    /// Number of points added.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if no points were added.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Draws the plot on a white background, scaled to fit the points.
    pub fn render(&self) -> Result<RgbImage> {
        if self.width <= 2 * self.margin || self.height <= 2 * self.margin {
            return Err(KohonenError::InvalidConfig(format!(
                "Plot of {}x{} leaves no room inside a {} pixel margin",
                self.width, self.height, self.margin
            )));
        }

        let mut img: RgbImage = ImageBuffer::from_pixel(self.width, self.height, Rgb([255, 255, 255]));
        if self.points.is_empty() {
            return Ok(img);
        }

        let (min_x, max_x, min_y, max_y) = self.points.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(lx, hx, ly, hy), &(x, y, _)| (lx.min(x), hx.max(x), ly.min(y), hy.max(y)),
        );
        let span_x = (max_x - min_x).max(f64::EPSILON);
        let span_y = (max_y - min_y).max(f64::EPSILON);

        let inner_w = (self.width - 2 * self.margin - 1) as f64;
        let inner_h = (self.height - 2 * self.margin - 1) as f64;

        for &(x, y, cluster) in &self.points {
            let px = self.margin as f64 + (x - min_x) / span_x * inner_w;
            // Image rows grow downward.
            let py = self.margin as f64 + (max_y - y) / span_y * inner_h;
            let color = Rgb(PALETTE[cluster % PALETTE.len()]);
            self.draw_marker(&mut img, px.round() as i64, py.round() as i64, color);
        }

        Ok(img)
    }

    /// Renders and writes the plot as PNG.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.render()?.save(path)?;
        Ok(())
    }

    fn draw_marker(&self, img: &mut RgbImage, cx: i64, cy: i64, color: Rgb<u8>) {
        let r = self.marker as i64;
        for y in (cy - r)..=(cy + r) {
            for x in (cx - r)..=(cx + r) {
                if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
                    img.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }
}
