//! Reference (satellite or site plan) image drawn under the layout.

use crate::constants::REFERENCE_IMAGE_SCALE_FACTOR;
use crate::geometry::{Bounds, Point, Size};
use anyhow::{Context, Result, bail};
use image::{DynamicImage, GenericImageView};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Equatorial circumference used by Web Mercator tiles, in meters
const EARTH_CIRCUMFERENCE_M: f64 = 40_075_016.686;

/// Pixel size and ground resolution of the reference image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceImage {
    pub width: u32,
    pub height: u32,
    pub meters_per_pixel: f64,
    /// 0-1 confidence in `meters_per_pixel`
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl ReferenceImage {
    pub fn new(width: u32, height: u32, meters_per_pixel: f64, confidence: f64) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("reference image has no pixels ({}x{})", width, height);
        }
        if !meters_per_pixel.is_finite() || meters_per_pixel <= 0.0 {
            bail!("invalid meters per pixel: {}", meters_per_pixel);
        }
        Ok(Self {
            width,
            height,
            meters_per_pixel,
            confidence: if confidence.is_finite() { confidence.clamp(0.0, 1.0) } else { 0.0 },
            source: None,
        })
    }

    /// Describe an already decoded image.
    pub fn from_image(img: &DynamicImage, meters_per_pixel: f64, confidence: f64) -> Result<Self> {
        let (width, height) = img.dimensions();
        Self::new(width, height, meters_per_pixel, confidence)
    }

    /// Decode an image file and describe it.
    pub fn open(path: impl AsRef<Path>, meters_per_pixel: f64, confidence: f64) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path)
            .with_context(|| format!("Failed to open reference image {}", path.display()))?;
        let mut reference = Self::from_image(&img, meters_per_pixel, confidence)?;
        reference.source = Some(path.to_path_buf());
        Ok(reference)
    }

    /// Web Mercator tile of `width`x`height` at `zoom` centered on `latitude`.
    pub fn from_web_mercator(width: u32, height: u32, zoom: u8, latitude: f64) -> Result<Self> {
        Self::new(
            width,
            height,
            web_mercator_meters_per_pixel(zoom, latitude),
            web_mercator_confidence(zoom, latitude),
        )
    }

    pub fn size(&self) -> Size {
        Size::new(self.width as f64, self.height as f64)
    }

    /// Canvas-space bounds; the image is anchored at the canvas origin.
    pub fn bounds(&self) -> Bounds {
        Bounds::new(Point::ORIGIN, Point::new(self.width as f64, self.height as f64))
    }

    pub fn pixels_per_meter(&self) -> f64 {
        1.0 / self.meters_per_pixel
    }

    /// View scale to apply when the image is first loaded.
    pub fn initial_view_scale(&self) -> f64 {
        self.pixels_per_meter() * REFERENCE_IMAGE_SCALE_FACTOR
    }
}

/// Ground resolution of a Web Mercator tile pixel.
pub fn web_mercator_meters_per_pixel(zoom: u8, latitude: f64) -> f64 {
    EARTH_CIRCUMFERENCE_M * latitude.to_radians().cos() / 2f64.powi(zoom as i32 + 8)
}

/// Heuristic confidence: lower at extreme zoom levels and near the poles.
pub fn web_mercator_confidence(zoom: u8, latitude: f64) -> f64 {
    let mut confidence = 0.95;
    if !(10..=20).contains(&zoom) {
        confidence *= 0.8;
    }
    let lat = latitude.abs();
    if lat > 70.0 {
        confidence *= 0.6;
    } else if lat > 60.0 {
        confidence *= 0.8;
    }
    confidence
}
