//! Per-page edits forwarded to the build service
//!
//! The engine never interprets modifications beyond folding repeated
//! rotations into one entry; thumbnails keep their natural orientation.

use crate::error::{AssemblerError, Result};
use serde::{Deserialize, Serialize};

/// Rotation angle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationAngle {
    /// No rotation (0 degrees)
    #[default]
    None,
    /// 90 degrees clockwise
    Clockwise90,
    /// 180 degrees
    Rotate180,
    /// 270 degrees clockwise (90 degrees counter-clockwise)
    Clockwise270,
}

impl RotationAngle {
    /// Create from degrees; any multiple of 90, negative values turn counter-clockwise
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(RotationAngle::None),
            90 => Ok(RotationAngle::Clockwise90),
            180 => Ok(RotationAngle::Rotate180),
            270 => Ok(RotationAngle::Clockwise270),
            _ => Err(AssemblerError::InvalidRotation(degrees)),
        }
    }

    /// Convert to degrees
    pub fn to_degrees(self) -> i32 {
        match self {
            RotationAngle::None => 0,
            RotationAngle::Clockwise90 => 90,
            RotationAngle::Rotate180 => 180,
            RotationAngle::Clockwise270 => 270,
        }
    }

    fn quarter_turns(self) -> u8 {
        match self {
            RotationAngle::None => 0,
            RotationAngle::Clockwise90 => 1,
            RotationAngle::Rotate180 => 2,
            RotationAngle::Clockwise270 => 3,
        }
    }

    fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => RotationAngle::None,
            1 => RotationAngle::Clockwise90,
            2 => RotationAngle::Rotate180,
            _ => RotationAngle::Clockwise270,
        }
    }

    /// Combine two rotations
    pub fn combine(self, other: RotationAngle) -> RotationAngle {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }
}

/// An edit applied to a page when the final PDF is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Modification {
    /// Clockwise rotation in degrees
    Rotate { degrees: i32 },
}

/// Net rotation described by a modification list
pub fn rotation_of(modifications: &[Modification]) -> RotationAngle {
    modifications
        .iter()
        .fold(RotationAngle::None, |acc, m| match *m {
            Modification::Rotate { degrees } => {
                acc.combine(RotationAngle::from_degrees(degrees).unwrap_or_default())
            }
        })
}

/// Modification list with `angle` folded into its rotation
///
/// Any existing rotation entries collapse into a single one placed where the
/// first of them was; a net rotation of zero drops the entry entirely.
pub fn with_rotation(modifications: &[Modification], angle: RotationAngle) -> Vec<Modification> {
    let total = rotation_of(modifications).combine(angle);
    let mut next = Vec::with_capacity(modifications.len() + 1);
    let mut placed = false;

    for m in modifications {
        match m {
            Modification::Rotate { .. } => {
                if !placed && total != RotationAngle::None {
                    next.push(Modification::Rotate {
                        degrees: total.to_degrees(),
                    });
                }
                placed = true;
            }
        }
    }

    if !placed && total != RotationAngle::None {
        next.push(Modification::Rotate {
            degrees: total.to_degrees(),
        });
    }

    next
}
