// region.rs - Fold membership tests
//
// A region answers "does this fold carry this vertex?" for a vertex's
// original, undeformed position. The paper lies in the XZ plane, so only
// x and z are ever inspected.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Which side of the origin a test looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Negative,
    Positive,
}

impl Side {
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Negative => -1.0,
            Side::Positive => 1.0,
        }
    }
}

/// Horizontal paper axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Z,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Region {
    /// Every vertex
    #[default]
    All,

    /// Corner flap: both |x| and |z| past `beyond` on the given sides
    Corner { x: Side, z: Side, beyond: f32 },

    /// Petal strip: past `beyond` along one axis, within `half_width`
    /// of the centre line on the other
    Strip {
        along: Axis,
        side: Side,
        beyond: f32,
        half_width: f32,
    },
}

impl Region {
    #[inline]
    pub fn contains(&self, p: Vec3) -> bool {
        match *self {
            Region::All => true,
            Region::Corner { x, z, beyond } => {
                x.sign() * p.x > beyond && z.sign() * p.z > beyond
            }
            Region::Strip { along, side, beyond, half_width } => {
                let (outward, across) = match along {
                    Axis::X => (p.x, p.z),
                    Axis::Z => (p.z, p.x),
                };
                side.sign() * outward > beyond && across.abs() < half_width
            }
        }
    }

    /// Thresholds are finite and widths positive
    pub fn is_well_formed(&self) -> bool {
        match *self {
            Region::All => true,
            Region::Corner { beyond, .. } => beyond.is_finite(),
            Region::Strip { beyond, half_width, .. } => {
                beyond.is_finite() && half_width.is_finite() && half_width > 0.0
            }
        }
    }
}
