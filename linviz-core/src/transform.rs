/// Transformation model: original, transformed and current geometry plus the
/// determinant classification
use std::fmt;

use nalgebra::Matrix3;
use tracing::{info, warn};

use crate::animation::AnimationDriver;
use crate::error::InvalidMatrixError;
use crate::geometry::GeometrySet;
use crate::math::{is_identity, lerp};

/// Below this magnitude the determinant counts as zero
pub const SINGULAR_EPSILON: f64 = 1e-10;
/// Distance from 1 within which the determinant counts as volume preserving
pub const ORTHOGONAL_EPSILON: f64 = 1e-6;

/// Determinant of the identity, the pose every run starts from
pub const ORIGINAL_DETERMINANT: f64 = 1.0;

/// Category of a transform judged by its determinant alone.
///
/// `Orthogonal` only means `det == 1` here. A shear such as
/// `[[1, 0.5, 0], [0, 1, 0], [0, 0, 1]]` lands in it even though it does not
/// preserve angles; the label is known to be wrong for such matrices and is
/// kept as is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Singular,
    OrientationReversing,
    Orthogonal,
    General,
}

impl Classification {
    pub fn label(&self) -> &'static str {
        match self {
            Classification::Singular => "SINGULAR (Non-invertible)",
            Classification::OrientationReversing => "ORIENTATION REVERSING",
            Classification::Orthogonal => "ORTHOGONAL (Preserves volume)",
            Classification::General => "GENERAL LINEAR",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(determinant: f64) -> Classification {
    if determinant.abs() < SINGULAR_EPSILON {
        Classification::Singular
    } else if determinant < 0.0 {
        Classification::OrientationReversing
    } else if (determinant - 1.0).abs() < ORTHOGONAL_EPSILON {
        Classification::Orthogonal
    } else {
        Classification::General
    }
}

/// Reject matrices holding NaN or infinite entries
pub fn validate_matrix(matrix: &Matrix3<f64>) -> Result<(), InvalidMatrixError> {
    for row in 0..3 {
        for col in 0..3 {
            let value = matrix[(row, col)];
            if !value.is_finite() {
                return Err(InvalidMatrixError { row, col, value });
            }
        }
    }
    Ok(())
}

/// Owns the three geometry poses and the animation that blends between them.
///
/// `original` is fixed at construction. `transformed` always equals the
/// active matrix applied to `original`, and `current` is refreshed by
/// [`TransformationModel::advance`].
#[derive(Debug, Clone)]
pub struct TransformationModel {
    original: GeometrySet,
    transformed: GeometrySet,
    current: GeometrySet,
    active_matrix: Matrix3<f64>,
    transformed_determinant: f64,
    animation: AnimationDriver,
}

impl TransformationModel {
    pub fn new(original: GeometrySet, animation: AnimationDriver) -> Self {
        Self {
            transformed: original.clone(),
            current: original.clone(),
            original,
            active_matrix: Matrix3::identity(),
            transformed_determinant: ORIGINAL_DETERMINANT,
            animation,
        }
    }

    /// Make `matrix` the active transform and restart the animation.
    ///
    /// On error nothing changes.
    pub fn apply_matrix(&mut self, matrix: Matrix3<f64>) -> Result<(), InvalidMatrixError> {
        if let Err(err) = validate_matrix(&matrix) {
            warn!("rejected matrix: {err}");
            return Err(err);
        }

        self.transformed = self.original.transformed(&matrix);
        self.transformed_determinant = matrix.determinant();
        self.active_matrix = matrix;
        self.animation.restart();
        self.current = self.geometry_at(self.animation.eased());

        info!(
            determinant = self.transformed_determinant,
            classification = %classify(self.transformed_determinant),
            "applied matrix"
        );
        Ok(())
    }

    pub fn reset_to_identity(&mut self) {
        // the identity is always finite
        let _ = self.apply_matrix(Matrix3::identity());
    }

    /// Step the animation and refresh `current` from its eased progress
    pub fn advance(&mut self) {
        self.animation.advance();
        self.current = self.geometry_at(self.animation.eased());
    }

    /// `(1 - t) * original + t * transformed` for every shape
    pub fn geometry_at(&self, eased_progress: f64) -> GeometrySet {
        self.original.lerp(&self.transformed, eased_progress)
    }

    pub fn determinant_at(&self, eased_progress: f64, running: bool) -> f64 {
        if running {
            lerp(ORIGINAL_DETERMINANT, self.transformed_determinant, eased_progress)
        } else if !is_identity(&self.active_matrix) {
            self.transformed_determinant
        } else {
            ORIGINAL_DETERMINANT
        }
    }

    pub fn current(&self) -> &GeometrySet {
        &self.current
    }

    pub fn current_determinant(&self) -> f64 {
        self.determinant_at(self.animation.eased(), self.animation.is_running())
    }

    pub fn classification(&self) -> Classification {
        classify(self.current_determinant())
    }

    pub fn original(&self) -> &GeometrySet {
        &self.original
    }

    pub fn transformed(&self) -> &GeometrySet {
        &self.transformed
    }

    pub fn active_matrix(&self) -> &Matrix3<f64> {
        &self.active_matrix
    }

    pub fn original_determinant(&self) -> f64 {
        ORIGINAL_DETERMINANT
    }

    pub fn transformed_determinant(&self) -> f64 {
        self.transformed_determinant
    }

    pub fn animation(&self) -> &AnimationDriver {
        &self.animation
    }

    /// True while animating or when a non-identity matrix is active
    pub fn is_displaced(&self) -> bool {
        self.animation.is_running() || !is_identity(&self.active_matrix)
    }
}
