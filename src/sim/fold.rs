// fold.rs - Fold descriptors and the sequence they form

use glam::{Quat, Vec3};

use crate::config::FoldSpec;
use crate::error::{ConfigError, Result};
use crate::world::{Region, hinge};

/// Shortest axis accepted before normalization
const MIN_AXIS_LENGTH: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    /// Unit hinge axis
    pub axis: Vec3,
    pub pivot: Vec3,
    /// Current rotation, radians
    pub angle: f32,
    pub target: f32,
    /// Radians per second
    pub speed: f32,
    pub region: Region,
    pub active: bool,
}

impl Fold {
    pub fn from_spec(index: usize, spec: &FoldSpec) -> Result<Self> {
        let len = spec.axis.length();
        if !spec.axis.is_finite() || !len.is_finite() || len < MIN_AXIS_LENGTH {
            return Err(ConfigError::InvalidFoldAxis { index, axis: spec.axis.to_array() });
        }
        if !spec.pivot.is_finite() {
            return Err(ConfigError::non_finite(&format!("fold[{index}].pivot")));
        }
        if !spec.target_angle.is_finite() {
            return Err(ConfigError::non_finite(&format!("fold[{index}].target_angle")));
        }
        if !spec.speed.is_finite() || spec.speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed { index, speed: spec.speed });
        }
        if !spec.region.is_well_formed() {
            return Err(ConfigError::invalid(
                &format!("fold[{index}].region"),
                "thresholds must be finite, widths positive",
            ));
        }

        Ok(Self {
            axis: spec.axis / len,
            pivot: spec.pivot,
            angle: 0.0,
            target: spec.target_angle,
            speed: spec.speed,
            region: spec.region,
            active: false,
        })
    }

    /// Rotating this frame: either still moving or holding a non-zero angle
    #[inline]
    pub fn in_effect(&self) -> bool {
        self.active || self.angle != 0.0
    }

    #[inline]
    pub fn is_settled(&self, epsilon: f32) -> bool {
        (self.angle - self.target).abs() <= epsilon
    }

    /// Move towards the target by at most `speed * dt`, never past it
    pub fn advance(&mut self, dt: f32) {
        let remaining = self.target - self.angle;
        if remaining == 0.0 || dt <= 0.0 {
            return;
        }

        let step = self.speed * dt;
        self.angle = if step >= remaining.abs() {
            self.target
        } else {
            let next = self.angle + step.copysign(remaining);
            if remaining > 0.0 { next.min(self.target) } else { next.max(self.target) }
        };
    }

    /// Snap exactly onto the target
    #[inline]
    pub fn settle(&mut self) {
        self.angle = self.target;
    }

    pub fn reset(&mut self) {
        self.angle = 0.0;
        self.active = false;
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        hinge(self.axis, self.angle)
    }
}

/// Ordered folds; order is activation order
#[derive(Debug, Clone, PartialEq)]
pub struct FoldSequence {
    folds: Vec<Fold>,
}

impl FoldSequence {
    pub fn new(specs: &[FoldSpec]) -> Result<Self> {
        if specs.is_empty() {
            return Err(ConfigError::EmptySequence);
        }
        let folds = specs
            .iter()
            .enumerate()
            .map(|(i, s)| Fold::from_spec(i, s))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { folds })
    }

    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&Fold> {
        self.folds.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Fold> {
        self.folds.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, Fold> {
        self.folds.iter_mut()
    }

    pub(crate) fn activate(&mut self, i: usize) -> bool {
        match self.folds.get_mut(i) {
            Some(fold) => {
                fold.active = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.folds.iter_mut().for_each(Fold::reset);
    }
}

/// Which vertices each fold carries, decided once from the original
/// positions. Index lists are parallel to the fold sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldGroups {
    members: Vec<Vec<u32>>,
}

impl FoldGroups {
    pub fn build(original: &[Vec3], folds: &FoldSequence) -> Self {
        let members = folds
            .iter()
            .map(|fold| {
                original
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| fold.region.contains(**p))
                    .map(|(i, _)| i as u32)
                    .collect()
            })
            .collect();
        Self { members }
    }

    pub fn members(&self, fold: usize) -> &[u32] {
        self.members.get(fold).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u32]> {
        self.members.iter().map(Vec::as_slice)
    }
}
