//! Thumbnail sizing and horizontal packing
//!
//! All previews share one vertical scale: the tallest page fills the
//! preview area and every other page is scaled by the same factor. Pages
//! are packed left to right with uniform spacing and centered vertically.

use crate::model::BuildData;
use serde::{Deserialize, Serialize};

/// An offset inside the preview area
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Origin point (0, 0)
    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Width and height of a preview, natural or scaled
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Tallest natural preview height, or `0.0` without pages
pub fn max_preview_height(data: &BuildData) -> f64 {
    data.pages
        .iter()
        .map(|page| data.dimensions_of(page).height)
        .fold(0.0, f64::max)
}

/// Scaled size of every page, in collection order
pub fn compute_dimensions(data: &BuildData, area_height: f64) -> Vec<Dimensions> {
    let max_height = max_preview_height(data);

    data.pages
        .iter()
        .map(|page| scale_to_area(data.dimensions_of(page), max_height, area_height))
        .collect()
}

fn scale_to_area(native: Dimensions, max_height: f64, area_height: f64) -> Dimensions {
    if max_height <= 0.0 || native.height <= 0.0 {
        return Dimensions::default();
    }

    let height = (native.height / max_height) * area_height;
    let width = native.width * (height / native.height);
    Dimensions::new(width, height)
}

/// Layout position of the page at `index`
///
/// `index` may equal `dimensions.len()`, giving the slot a page appended at
/// the end would occupy.
pub fn compute_position(
    dimensions: &[Dimensions],
    index: usize,
    area_height: f64,
    spacing: f64,
) -> Position {
    let x = dimensions
        .iter()
        .take(index)
        .map(|d| d.width + spacing)
        .sum();
    let height = dimensions.get(index).map_or(0.0, |d| d.height);

    Position::new(x, (area_height - height) / 2.0)
}

/// Sizes, positions and midpoints of every page, computed in one pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    pub dimensions: Vec<Dimensions>,
    pub positions: Vec<Position>,
    /// Distance from the left edge of the first page to the right edge of the last
    pub content_width: f64,
}

impl Layout {
    pub fn compute(data: &BuildData, area_height: f64, spacing: f64) -> Self {
        Self::from_dimensions(compute_dimensions(data, area_height), area_height, spacing)
    }

    pub fn from_dimensions(dimensions: Vec<Dimensions>, area_height: f64, spacing: f64) -> Self {
        let mut positions = Vec::with_capacity(dimensions.len());
        let mut x = 0.0;

        for d in &dimensions {
            positions.push(Position::new(x, (area_height - d.height) / 2.0));
            x += d.width + spacing;
        }

        let content_width = if dimensions.is_empty() {
            0.0
        } else {
            x - spacing
        };

        Self {
            dimensions,
            positions,
            content_width,
        }
    }

    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Horizontal center of the page at `index`
    pub fn midpoint(&self, index: usize) -> f64 {
        self.positions[index].x + self.dimensions[index].width / 2.0
    }

    pub fn midpoints(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.midpoint(i)).collect()
    }
}
