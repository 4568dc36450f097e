/// Ready-made transforms offered by the matrix input surfaces
use nalgebra::Matrix3;

use crate::math::matrix_from_rows;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Identity,
    Scale2x,
    ScaleXY,
    RotateZ90,
    RotateY90,
    RotateX90,
    ShearX,
    ShearY,
    ReflectX,
}

impl Preset {
    pub const ALL: [Preset; 9] = [
        Preset::Identity,
        Preset::Scale2x,
        Preset::ScaleXY,
        Preset::RotateZ90,
        Preset::RotateY90,
        Preset::RotateX90,
        Preset::ShearX,
        Preset::ShearY,
        Preset::ReflectX,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Identity => "Identity",
            Preset::Scale2x => "Scale 2x",
            Preset::ScaleXY => "Scale XY",
            Preset::RotateZ90 => "Rotate Z 90°",
            Preset::RotateY90 => "Rotate Y 90°",
            Preset::RotateX90 => "Rotate X 90°",
            Preset::ShearX => "Shear X",
            Preset::ShearY => "Shear Y",
            Preset::ReflectX => "Reflect X",
        }
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        #[rustfmt::skip]
        let rows = match self {
            Preset::Identity => [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            Preset::Scale2x => [2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 2.0],
            Preset::ScaleXY => [2.0, 0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 1.0],
            Preset::RotateZ90 => [0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0],
            Preset::RotateY90 => [0.0, 0.0, 1.0, 0.0, 1.0, 0.0, -1.0, 0.0, 0.0],
            Preset::RotateX90 => [1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0],
            Preset::ShearX => [1.0, 0.5, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
            Preset::ShearY => [1.0, 0.0, 0.0, 0.5, 1.0, 0.0, 0.0, 0.0, 1.0],
            Preset::ReflectX => [-1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        };
        matrix_from_rows(&rows)
    }

    /// The preset after this one, wrapping around
    pub fn next(&self) -> Preset {
        let index = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{classify, Classification};

    #[test]
    fn test_preset_classifications() {
        let expected = [
            (Preset::Identity, Classification::Orthogonal),
            (Preset::Scale2x, Classification::General),
            (Preset::ScaleXY, Classification::General),
            (Preset::RotateZ90, Classification::Orthogonal),
            (Preset::RotateY90, Classification::Orthogonal),
            (Preset::RotateX90, Classification::Orthogonal),
            (Preset::ShearX, Classification::Orthogonal),
            (Preset::ShearY, Classification::Orthogonal),
            (Preset::ReflectX, Classification::OrientationReversing),
        ];
        for (preset, classification) in expected {
            assert_eq!(classify(preset.matrix().determinant()), classification, "{}", preset.name());
        }
    }

    #[test]
    fn test_next_wraps() {
        assert_eq!(Preset::Identity.next(), Preset::Scale2x);
        assert_eq!(Preset::ReflectX.next(), Preset::Identity);
    }
}
