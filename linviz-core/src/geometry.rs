/// Reference geometry for the visualizer: unit cube, basis triad and grid
use nalgebra::{Matrix3, Vector3};

use crate::error::GeometryError;
use crate::math::lerp_vector;

/// Quad faces of the cube as indices into [`Cube::vertices`]
pub const CUBE_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 3, 7, 4],
    [1, 2, 6, 5],
];

/// Edges of the cube as indices into [`Cube::vertices`]
pub const CUBE_EDGES: [[usize; 2]; 12] = [
    // bottom
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    // top
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    // verticals
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Length of each basis axis in the reference pose
pub const BASIS_LENGTH: f64 = 2.0;

/// Eight cube corners. The topology lives in [`CUBE_FACES`] and [`CUBE_EDGES`].
#[derive(Debug, Clone, PartialEq)]
pub struct Cube {
    pub vertices: [Vector3<f64>; 8],
}

impl Cube {
    /// The unit cube with corners at {0,1}³, first octant
    pub fn unit() -> Self {
        Self {
            vertices: [
                Vector3::new(0.0, 0.0, 0.0),
                Vector3::new(1.0, 0.0, 0.0),
                Vector3::new(1.0, 1.0, 0.0),
                Vector3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 0.0, 1.0),
                Vector3::new(1.0, 0.0, 1.0),
                Vector3::new(1.0, 1.0, 1.0),
                Vector3::new(0.0, 1.0, 1.0),
            ],
        }
    }

    pub fn transformed(&self, matrix: &Matrix3<f64>) -> Self {
        Self {
            vertices: self.vertices.map(|v| matrix * v),
        }
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mut vertices = self.vertices;
        for (v, target) in vertices.iter_mut().zip(other.vertices.iter()) {
            *v = lerp_vector(v, target, t);
        }
        Self { vertices }
    }

    /// Corner positions of one face, in winding order
    pub fn face(&self, index: usize) -> [Vector3<f64>; 4] {
        CUBE_FACES[index].map(|i| self.vertices[i])
    }

    /// Face normal from the first two face edges, not normalized.
    ///
    /// Zero when the face has collapsed to a line or point.
    pub fn face_normal(&self, index: usize) -> Vector3<f64> {
        let [v0, v1, _, v3] = self.face(index);
        (v1 - v0).cross(&(v3 - v0))
    }

    pub fn centroid(&self) -> Vector3<f64> {
        self.vertices.iter().sum::<Vector3<f64>>() / 8.0
    }
}

impl Default for Cube {
    fn default() -> Self {
        Self::unit()
    }
}

/// Scaled x, y and z axis vectors, always in that order
#[derive(Debug, Clone, PartialEq)]
pub struct BasisTriad {
    pub axes: [Vector3<f64>; 3],
}

impl BasisTriad {
    pub fn standard() -> Self {
        Self {
            axes: [
                Vector3::x() * BASIS_LENGTH,
                Vector3::y() * BASIS_LENGTH,
                Vector3::z() * BASIS_LENGTH,
            ],
        }
    }

    pub fn transformed(&self, matrix: &Matrix3<f64>) -> Self {
        Self {
            axes: self.axes.map(|v| matrix * v),
        }
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let mut axes = self.axes;
        for (v, target) in axes.iter_mut().zip(other.axes.iter()) {
            *v = lerp_vector(v, target, t);
        }
        Self { axes }
    }
}

impl Default for BasisTriad {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vector3<f64>,
    pub end: Vector3<f64>,
}

impl LineSegment {
    pub fn new(start: Vector3<f64>, end: Vector3<f64>) -> Self {
        Self { start, end }
    }
}

/// Grid line segments over the XY, XZ and YZ planes through the origin
#[derive(Debug, Clone, PartialEq)]
pub struct GridLines {
    pub segments: Vec<LineSegment>,
}

impl GridLines {
    /// Generate the grid reaching out to `extent` with lines every `spacing` units.
    ///
    /// Segments come out plane by plane (XY, XZ, YZ), then by increasing
    /// offset, with the two in-plane directions emitted per offset.
    pub fn generate(extent: u32, spacing: u32) -> Result<Self, GeometryError> {
        if spacing == 0 {
            return Err(GeometryError::ZeroSpacing);
        }

        let e = extent as i64;
        let offsets: Vec<f64> = (-e..=e).step_by(spacing as usize).map(|i| i as f64).collect();
        let r = extent as f64;
        let mut segments = Vec::with_capacity(offsets.len() * 6);

        // XY plane
        for &i in &offsets {
            segments.push(LineSegment::new(Vector3::new(i, -r, 0.0), Vector3::new(i, r, 0.0)));
            segments.push(LineSegment::new(Vector3::new(-r, i, 0.0), Vector3::new(r, i, 0.0)));
        }

        // XZ plane
        for &i in &offsets {
            segments.push(LineSegment::new(Vector3::new(i, 0.0, -r), Vector3::new(i, 0.0, r)));
            segments.push(LineSegment::new(Vector3::new(-r, 0.0, i), Vector3::new(r, 0.0, i)));
        }

        // YZ plane
        for &i in &offsets {
            segments.push(LineSegment::new(Vector3::new(0.0, i, -r), Vector3::new(0.0, i, r)));
            segments.push(LineSegment::new(Vector3::new(0.0, -r, i), Vector3::new(0.0, r, i)));
        }

        Ok(Self { segments })
    }

    pub fn transformed(&self, matrix: &Matrix3<f64>) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .map(|s| LineSegment::new(matrix * s.start, matrix * s.end))
                .collect(),
        }
    }

    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            segments: self
                .segments
                .iter()
                .zip(other.segments.iter())
                .map(|(a, b)| {
                    LineSegment::new(lerp_vector(&a.start, &b.start, t), lerp_vector(&a.end, &b.end, t))
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Every shape the visualizer tracks, moved together by one matrix
#[derive(Debug, Clone, PartialEq)]
pub struct GeometrySet {
    pub cube: Cube,
    pub triad: BasisTriad,
    pub grid: GridLines,
}

impl GeometrySet {
    /// Reference pose: unit cube, length-2 triad and a fresh grid
    pub fn reference(extent: u32, spacing: u32) -> Result<Self, GeometryError> {
        Ok(Self {
            cube: Cube::unit(),
            triad: BasisTriad::standard(),
            grid: GridLines::generate(extent, spacing)?,
        })
    }

    pub fn transformed(&self, matrix: &Matrix3<f64>) -> Self {
        Self {
            cube: self.cube.transformed(matrix),
            triad: self.triad.transformed(matrix),
            grid: self.grid.transformed(matrix),
        }
    }

    /// Blend every shape toward `other` by the same `t`
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            cube: self.cube.lerp(&other.cube, t),
            triad: self.triad.lerp(&other.triad, t),
            grid: self.grid.lerp(&other.grid, t),
        }
    }
}
