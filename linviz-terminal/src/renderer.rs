/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use linviz_core::geometry::{CUBE_EDGES, CUBE_FACES};
use linviz_core::{Cube, GeometrySet, OrbitCamera, ScreenPoint, ScreenProjector};
use nalgebra::Vector3;
use std::io::Write;

/// Character luminosity ramp for face shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &['.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 0.5;

/// Pushes faces behind the edges that bound them
const FACE_DEPTH_BIAS: f64 = 0.05;

const AXIS_COLORS: [Color; 3] = [Color::Red, Color::Green, Color::Blue];
const AXIS_LABELS: [char; 3] = ['X', 'Y', 'Z'];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

/// ASCII renderer that turns the visualizer's geometry into terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.cells.fill(BLANK);
    }

    /// Rasterize the grid, the basis triad and the cube.
    ///
    /// `ghost` is drawn as a faint wireframe, typically the untransformed cube.
    pub fn render_scene(&mut self, geometry: &GeometrySet, ghost: Option<&Cube>, camera: &OrbitCamera) {
        let projector = ScreenProjector::new(camera, self.width as u32, self.height as u32, CELL_ASPECT);
        let eye = camera.eye_position().coords;

        for segment in &geometry.grid.segments {
            self.draw_segment(&projector, &segment.start, &segment.end, '.', Color::DarkBlue, 0.0);
        }

        if let Some(ghost) = ghost {
            for [a, b] in CUBE_EDGES {
                self.draw_segment(&projector, &ghost.vertices[a], &ghost.vertices[b], ':', Color::DarkGrey, 0.0);
            }
        }

        for face in 0..CUBE_FACES.len() {
            self.fill_face(&projector, &geometry.cube, face, &eye);
        }
        for [a, b] in CUBE_EDGES {
            let (start, end) = (&geometry.cube.vertices[a], &geometry.cube.vertices[b]);
            self.draw_segment(&projector, start, end, '#', Color::Yellow, 0.0);
        }

        let origin = Vector3::zeros();
        for (axis, tip) in geometry.triad.axes.iter().enumerate() {
            self.draw_segment(&projector, &origin, tip, '*', AXIS_COLORS[axis], 0.0);
            if let Some(p) = projector.project(tip) {
                self.plot(p.x as i64, p.y as i64, p.depth - 1e-3, AXIS_LABELS[axis], AXIS_COLORS[axis]);
            }
        }
        if let Some(p) = projector.project(&origin) {
            self.plot(p.x as i64, p.y as i64, p.depth - 1e-3, '+', Color::White);
        }
    }

    /// Write text on top of the scene, ignoring depth. Clipped at the edges.
    pub fn put_text(&mut self, x: usize, y: usize, text: &str, color: Color) {
        if y >= self.height {
            return;
        }
        for (i, glyph) in text.chars().enumerate() {
            let col = x + i;
            if col >= self.width {
                break;
            }
            let idx = y * self.width + col;
            self.cells[idx] = Cell { glyph, color };
            self.depth_buffer[idx] = f64::NEG_INFINITY;
        }
    }

    /// The glyph at a cell, mostly for tests
    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].glyph)
    }

    fn draw_segment(
        &mut self,
        projector: &ScreenProjector,
        start: &Vector3<f64>,
        end: &Vector3<f64>,
        glyph: char,
        color: Color,
        bias: f64,
    ) {
        if let Some((a, b)) = projector.project_segment(start, end) {
            if let Some((a, b)) = clip_to_rect(a, b, self.width as f64, self.height as f64) {
                self.rasterize_line(a, b, glyph, color, bias);
            }
        }
    }

    fn fill_face(&mut self, projector: &ScreenProjector, cube: &Cube, face: usize, eye: &Vector3<f64>) {
        let normal = cube.face_normal(face);
        if normal.norm() < 1e-9 {
            return; // collapsed face
        }

        let corners = cube.face(face);
        let center = corners.iter().sum::<Vector3<f64>>() / 4.0;
        let to_eye = eye - center;
        if to_eye.norm() < 1e-9 {
            return;
        }
        let brightness = normal.normalize().dot(&to_eye.normalize()).abs();

        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f64) as usize;
        let glyph = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        let mut projected = [ScreenPoint { x: 0.0, y: 0.0, depth: 0.0 }; 4];
        for (slot, corner) in projected.iter_mut().zip(corners.iter()) {
            match projector.project(corner) {
                Some(p) => *slot = p,
                None => return, // face crosses the near plane
            }
        }

        let [p0, p1, p2, p3] = projected;
        self.rasterize_triangle([p0, p1, p2], glyph, Color::DarkYellow, FACE_DEPTH_BIAS);
        self.rasterize_triangle([p0, p2, p3], glyph, Color::DarkYellow, FACE_DEPTH_BIAS);
    }

    fn rasterize_line(&mut self, a: ScreenPoint, b: ScreenPoint, glyph: char, color: Color, bias: f64) {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = a.x + dx * t;
            let y = a.y + dy * t;
            let depth = a.depth + (b.depth - a.depth) * t + bias;
            self.plot(x.floor() as i64, y.floor() as i64, depth, glyph, color);
        }
    }

    fn rasterize_triangle(&mut self, coords: [ScreenPoint; 3], glyph: char, color: Color, bias: f64) {
        let [v0, v1, v2] = coords;

        // Bounding box
        let min_x = v0.x.min(v1.x).min(v2.x).floor() as i64;
        let max_x = v0.x.max(v1.x).max(v2.x).ceil() as i64;
        let min_y = v0.y.min(v1.y).min(v2.y).floor() as i64;
        let max_y = v0.y.max(v1.y).max(v2.y).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                if let Some((w0, w1, w2)) = barycentric((v0.x, v0.y), (v1.x, v1.y), (v2.x, v2.y), p) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.depth + w1 * v1.depth + w2 * v2.depth + bias;
                        self.plot(x, y, depth, glyph, color);
                    }
                }
            }
        }
    }

    fn plot(&mut self, x: i64, y: i64, depth: f64, glyph: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = Cell { glyph, color };
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Clip a screen-space segment to `[0, width) × [0, height)` (Liang–Barsky)
fn clip_to_rect(a: ScreenPoint, b: ScreenPoint, width: f64, height: f64) -> Option<(ScreenPoint, ScreenPoint)> {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);

    let max_x = width - 1e-6;
    let max_y = height - 1e-6;
    let checks = [(-dx, a.x), (dx, max_x - a.x), (-dy, a.y), (dy, max_y - a.y)];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    let at = |t: f64| ScreenPoint {
        x: a.x + dx * t,
        y: a.y + dy * t,
        depth: a.depth + (b.depth - a.depth) * t,
    };
    Some((at(t0), at(t1)))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: (f64, f64), v1: (f64, f64), v2: (f64, f64), p: (f64, f64)) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(x: f64, y: f64) -> ScreenPoint {
        ScreenPoint { x, y, depth: 1.0 }
    }

    #[test]
    fn test_clip_keeps_inside_segment() {
        let (a, b) = clip_to_rect(point(1.0, 1.0), point(5.0, 3.0), 10.0, 10.0).unwrap();
        assert_eq!((a.x, a.y), (1.0, 1.0));
        assert_eq!((b.x, b.y), (5.0, 3.0));
    }

    #[test]
    fn test_clip_trims_far_endpoint() {
        let (a, b) = clip_to_rect(point(5.0, 5.0), point(1e6, 5.0), 10.0, 10.0).unwrap();
        assert_eq!(a.x, 5.0);
        assert!(b.x < 10.0 && b.x > 9.9);
    }

    #[test]
    fn test_clip_rejects_outside_segment() {
        assert!(clip_to_rect(point(-5.0, -5.0), point(-1.0, 20.0), 10.0, 10.0).is_none());
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }

    #[test]
    fn test_depth_test_keeps_nearest() {
        let mut renderer = AsciiRenderer::new(4, 2);
        renderer.plot(1, 1, 5.0, 'a', Color::White);
        renderer.plot(1, 1, 9.0, 'b', Color::White);
        assert_eq!(renderer.glyph_at(1, 1), Some('a'));
        renderer.plot(1, 1, 2.0, 'c', Color::White);
        assert_eq!(renderer.glyph_at(1, 1), Some('c'));
    }

    #[test]
    fn test_put_text_clips() {
        let mut renderer = AsciiRenderer::new(5, 1);
        renderer.put_text(2, 0, "hello", Color::White);
        assert_eq!(renderer.glyph_at(2, 0), Some('h'));
        assert_eq!(renderer.glyph_at(4, 0), Some('l'));
        renderer.put_text(0, 3, "ignored", Color::White);
    }

    #[test]
    fn test_scene_marks_origin() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let geometry = GeometrySet::reference(2, 1).unwrap();
        renderer.render_scene(&geometry, None, &OrbitCamera::default());

        // the origin lands on the screen center, give or take rounding
        let near_center = [(39, 19), (39, 20), (40, 19), (40, 20)];
        assert!(near_center
            .iter()
            .any(|&(x, y)| renderer.glyph_at(x, y) == Some('+')));
    }

    #[test]
    fn test_singular_scene_renders() {
        let mut renderer = AsciiRenderer::new(60, 30);
        let flatten = nalgebra::Matrix3::from_diagonal(&Vector3::new(0.0, 1.0, 1.0));
        let geometry = GeometrySet::reference(2, 1).unwrap().transformed(&flatten);
        renderer.render_scene(&geometry, Some(&Cube::unit()), &OrbitCamera::default());

        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        assert!(!out.is_empty());
    }
}
