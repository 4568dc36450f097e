/// Per-tick facade: drains the mailbox and advances the transformation model
use std::sync::Arc;

use nalgebra::Matrix3;
use tracing::warn;

use crate::animation::AnimationDriver;
use crate::config::VisualizerConfig;
use crate::error::{GeometryError, InvalidMatrixError};
use crate::geometry::GeometrySet;
use crate::mailbox::{MatrixMailbox, MatrixPublisher};
use crate::transform::{Classification, TransformationModel};

/// Everything the simulation tick owns apart from the camera
pub struct Visualizer {
    model: TransformationModel,
    mailbox: Arc<MatrixMailbox>,
}

impl Visualizer {
    pub fn new(config: &VisualizerConfig) -> Result<Self, GeometryError> {
        let original = GeometrySet::reference(config.grid.extent, config.grid.spacing)?;
        Ok(Self::with_geometry(original, AnimationDriver::new(config.animation.speed)))
    }

    pub fn with_geometry(original: GeometrySet, animation: AnimationDriver) -> Self {
        Self {
            model: TransformationModel::new(original, animation),
            mailbox: Arc::new(MatrixMailbox::new()),
        }
    }

    /// Write handle for input surfaces, safe to move to another thread
    pub fn publisher(&self) -> MatrixPublisher {
        MatrixPublisher::new(Arc::clone(&self.mailbox))
    }

    /// Run one simulation step.
    ///
    /// A matrix waiting in the mailbox is applied first, then the animation
    /// advances and the current geometry is refreshed. A rejected matrix is
    /// logged and the previous state kept.
    pub fn tick(&mut self) {
        if let Some(matrix) = self.mailbox.try_take() {
            if let Err(e) = self.model.apply_matrix(matrix) {
                warn!("ignoring published matrix: {e}");
            }
        }
        self.model.advance();
    }

    pub fn apply_matrix(&mut self, matrix: Matrix3<f64>) -> Result<(), InvalidMatrixError> {
        self.model.apply_matrix(matrix)
    }

    pub fn reset_to_identity(&mut self) {
        self.model.reset_to_identity();
    }

    pub fn current_geometry(&self) -> &GeometrySet {
        self.model.current()
    }

    pub fn current_determinant(&self) -> f64 {
        self.model.current_determinant()
    }

    pub fn classification(&self) -> Classification {
        self.model.classification()
    }

    /// Raw, uneased animation progress in [0, 1]
    pub fn progress(&self) -> f64 {
        self.model.animation().progress()
    }

    pub fn model(&self) -> &TransformationModel {
        &self.model
    }
}
