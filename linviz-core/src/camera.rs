/// Orbit camera and screen projection
use nalgebra::{Matrix4, Point3, Vector3};

pub const MIN_DISTANCE: f64 = 3.0;
pub const MAX_DISTANCE: f64 = 20.0;
pub const POLAR_LIMIT_DEG: f64 = 89.0;
/// Degrees of rotation per unit of cursor travel
pub const DRAG_SENSITIVITY: f64 = 0.5;
/// Distance change per scroll notch
pub const ZOOM_STEP: f64 = 0.5;

pub const DEFAULT_DISTANCE: f64 = 8.0;
pub const DEFAULT_POLAR_DEG: f64 = 25.0;
pub const DEFAULT_AZIMUTH_DEG: f64 = 45.0;

/// Camera that circles the origin at a given distance and pair of angles.
///
/// Drag input turns the angles, scroll input changes the distance. The view
/// always targets the origin with +Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    distance: f64,
    polar_deg: f64,
    azimuth_deg: f64,
    dragging: bool,
    last_cursor: (f64, f64),
}

impl OrbitCamera {
    /// Out-of-range values are clamped into the allowed distance and polar ranges
    pub fn new(distance: f64, polar_deg: f64, azimuth_deg: f64) -> Self {
        Self {
            distance: distance.clamp(MIN_DISTANCE, MAX_DISTANCE),
            polar_deg: polar_deg.clamp(-POLAR_LIMIT_DEG, POLAR_LIMIT_DEG),
            azimuth_deg,
            dragging: false,
            last_cursor: (0.0, 0.0),
        }
    }

    pub fn on_drag_start(&mut self, cursor: (f64, f64)) {
        self.dragging = true;
        self.last_cursor = cursor;
    }

    pub fn on_drag_move(&mut self, cursor: (f64, f64)) {
        if !self.dragging {
            return;
        }

        let dx = cursor.0 - self.last_cursor.0;
        let dy = cursor.1 - self.last_cursor.1;

        self.azimuth_deg += dx * DRAG_SENSITIVITY;
        self.polar_deg = (self.polar_deg + dy * DRAG_SENSITIVITY).clamp(-POLAR_LIMIT_DEG, POLAR_LIMIT_DEG);
        self.last_cursor = cursor;
    }

    pub fn on_drag_end(&mut self) {
        self.dragging = false;
    }

    /// `direction` is +1 to zoom in, -1 to zoom out
    pub fn on_scroll(&mut self, direction: f64) {
        self.distance = (self.distance - ZOOM_STEP * direction).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Convert the spherical pose to a Cartesian eye position
    pub fn eye_position(&self) -> Point3<f64> {
        let polar = self.polar_deg.to_radians();
        let azimuth = self.azimuth_deg.to_radians();

        let horizontal_radius = self.distance * polar.cos();
        let height = self.distance * polar.sin();

        Point3::new(
            horizontal_radius * azimuth.sin(),
            height,
            horizontal_radius * azimuth.cos(),
        )
    }

    /// Look-at matrix from the eye position toward the origin
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.eye_position(), &Point3::origin(), &Vector3::y())
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn polar_deg(&self) -> f64 {
        self.polar_deg
    }

    pub fn azimuth_deg(&self) -> f64 {
        self.azimuth_deg
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(DEFAULT_DISTANCE, DEFAULT_POLAR_DEG, DEFAULT_AZIMUTH_DEG)
    }
}

/// A projected point in screen space; `depth` is the distance along the view axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Perspective projection from world space onto a `width` × `height` screen
pub struct ScreenProjector {
    view: Matrix4<f64>,
    projection: Matrix4<f64>,
    width: f64,
    height: f64,
    near: f64,
}

impl ScreenProjector {
    pub const FOV: f64 = std::f64::consts::PI / 4.0; // 45 degrees
    pub const NEAR: f64 = 0.1;
    pub const FAR: f64 = 50.0;

    /// `pixel_aspect` is the width of one screen unit over its height
    pub fn new(camera: &OrbitCamera, width: u32, height: u32, pixel_aspect: f64) -> Self {
        let width = width.max(1) as f64;
        let height = height.max(1) as f64;
        let aspect = width * pixel_aspect / height;

        Self {
            view: camera.view_matrix(),
            projection: Matrix4::new_perspective(aspect, Self::FOV, Self::NEAR, Self::FAR),
            width,
            height,
            near: Self::NEAR,
        }
    }

    /// Project a point already in view space. None if it lies behind the near plane.
    fn project_view(&self, p: &Point3<f64>) -> Option<ScreenPoint> {
        if p.z > -self.near {
            return None;
        }

        let ndc = self.projection.transform_point(p);
        Some(ScreenPoint {
            x: (ndc.x + 1.0) * 0.5 * self.width,
            y: (1.0 - ndc.y) * 0.5 * self.height,
            depth: -p.z,
        })
    }

    pub fn project(&self, point: &Vector3<f64>) -> Option<ScreenPoint> {
        let p = self.view.transform_point(&Point3::from(*point));
        self.project_view(&p)
    }

    /// Project a segment, trimming whatever part lies behind the near plane
    pub fn project_segment(
        &self,
        start: &Vector3<f64>,
        end: &Vector3<f64>,
    ) -> Option<(ScreenPoint, ScreenPoint)> {
        let mut a = self.view.transform_point(&Point3::from(*start));
        let mut b = self.view.transform_point(&Point3::from(*end));
        let limit = -self.near - 1e-9;

        let a_behind = a.z > limit;
        let b_behind = b.z > limit;
        if a_behind && b_behind {
            return None;
        }
        if a_behind || b_behind {
            let t = (limit - a.z) / (b.z - a.z);
            let cut = a + (b - a) * t;
            if a_behind {
                a = cut;
            } else {
                b = cut;
            }
        }

        Some((self.project_view(&a)?, self.project_view(&b)?))
    }
}
