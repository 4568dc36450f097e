/// Terminal front end: renders the transformation and feeds it input
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
    style::Color,
    terminal::{self},
};
use linviz_core::{
    ConfigError, GeometryError, LinvizError, OrbitCamera, Visualizer, VisualizerConfig,
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub mod cli;
pub mod prompt;
pub mod renderer;
pub mod script;

pub use prompt::{MatrixPrompt, PromptMessage};
pub use renderer::AsciiRenderer;
pub use script::{Script, ScriptError, ScriptFeeder};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] LinvizError),

    #[error(transparent)]
    Script(#[from] ScriptError),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Core(err.into())
    }
}

impl From<GeometryError> for AppError {
    fn from(err: GeometryError) -> Self {
        Self::Core(err.into())
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        Self::Core(err.into())
    }
}

/// Runs `restore` on drop, so every way out of [`TerminalApp::run`] gives the
/// terminal back.
struct TerminalGuard<F: FnMut()> {
    restore: F,
}

impl<F: FnMut()> TerminalGuard<F> {
    fn new(restore: F) -> Self {
        Self { restore }
    }
}

impl<F: FnMut()> Drop for TerminalGuard<F> {
    fn drop(&mut self) {
        (self.restore)();
    }
}

/// Leave the alternate screen and raw mode. Safe to call more than once.
pub fn restore_terminal() {
    if let Err(e) = execute!(stdout(), DisableMouseCapture, terminal::LeaveAlternateScreen, cursor::Show) {
        warn!("failed to leave alternate screen: {e}");
    }
    if let Err(e) = terminal::disable_raw_mode() {
        warn!("failed to disable raw mode: {e}");
    }
}

/// Main application struct for the terminal visualizer
pub struct TerminalApp {
    visualizer: Visualizer,
    camera: OrbitCamera,
    renderer: AsciiRenderer,
    prompt: MatrixPrompt,
    script: Option<ScriptFeeder>,
    running: bool,
    frame_interval: Duration,
    last_frame: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: &VisualizerConfig) -> Result<Self, AppError> {
        let (width, height) = terminal::size()?;
        Self::with_size(config, width as usize, height as usize)
    }

    /// Build without touching the terminal
    pub fn with_size(config: &VisualizerConfig, width: usize, height: usize) -> Result<Self, AppError> {
        let visualizer = Visualizer::new(config)?;
        let prompt = MatrixPrompt::new(visualizer.publisher());

        Ok(Self {
            visualizer,
            camera: config.camera.build(),
            renderer: AsciiRenderer::new(width, height),
            prompt,
            script: None,
            running: true,
            frame_interval: Duration::from_secs(1) / config.animation.tick_rate_hz.max(1),
            last_frame: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        })
    }

    /// Replay `script` from a background thread while the app runs
    pub fn attach_script(&mut self, script: Script, interval: Duration) -> Result<(), AppError> {
        let feeder = ScriptFeeder::spawn(script, self.visualizer.publisher(), interval)?;
        self.script = Some(feeder);
        Ok(())
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard::new(restore_terminal);
        execute!(stdout(), terminal::EnterAlternateScreen, EnableMouseCapture, cursor::Hide)?;

        let result = self.main_loop();
        drop(guard);

        if let Some(feeder) = self.script.take() {
            feeder.stop();
        }

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        info!(frame_interval = ?self.frame_interval, "entering main loop");

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::ZERO)? {
                let event = event::read()?;
                self.handle_event(event);
            }

            // Update
            self.visualizer.tick();

            // Render
            self.render()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_interval {
                std::thread::sleep(self.frame_interval - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_frame).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_frame).as_secs_f32();
                self.frame_count = 0;
                self.last_frame = now;
            }
        }

        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(width, height) => {
                debug!(width, height, "terminal resized");
                self.renderer.resize(width as usize, height as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.running = false;
            return;
        }
        if self.prompt.is_open() {
            self.prompt.handle_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('g') => {
                self.prompt.open();
            }
            KeyCode::Char('r') => {
                self.visualizer.reset_to_identity();
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let cursor = (mouse.column as f64, mouse.row as f64);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.camera.on_drag_start(cursor),
            MouseEventKind::Drag(MouseButton::Left) => self.camera.on_drag_move(cursor),
            MouseEventKind::Up(MouseButton::Left) => self.camera.on_drag_end(),
            MouseEventKind::ScrollUp => self.camera.on_scroll(1.0),
            MouseEventKind::ScrollDown => self.camera.on_scroll(-1.0),
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        self.compose_frame();

        let mut stdout = stdout();
        self.renderer.draw(&mut stdout)?;
        stdout.flush()?;
        Ok(())
    }

    /// Rasterize the scene and overlays into the renderer's buffers
    fn compose_frame(&mut self) {
        self.renderer.clear();

        let model = self.visualizer.model();
        let ghost = model.is_displaced().then(|| &model.original().cube);
        self.renderer.render_scene(self.visualizer.current_geometry(), ghost, &self.camera);

        for (row, (text, color)) in self.info_lines().into_iter().enumerate() {
            self.renderer.put_text(1, row + 1, &text, color);
        }
        self.draw_prompt();
    }

    /// Text for the information panel, top to bottom
    pub fn info_lines(&self) -> Vec<(String, Color)> {
        let determinant = self.visualizer.current_determinant();
        let classification = self.visualizer.classification();

        vec![
            ("LINEAR TRANSFORMATION VISUALIZER".to_string(), Color::White),
            (format!("Determinant: {determinant:.1}"), Color::Yellow),
            (format!("Volume Scale: {:.1}x", determinant.abs()), Color::Green),
            (format!("Transformation: {classification}"), classification_color(classification)),
            (format!("Animation: {:.1}%", self.visualizer.progress() * 100.0), Color::Cyan),
            (format!("FPS: {:.1}", self.fps), Color::DarkGrey),
            (
                "G=Matrix R=Reset Drag=Orbit Wheel=Zoom Q=Quit".to_string(),
                Color::Grey,
            ),
        ]
    }

    fn draw_prompt(&mut self) {
        let height = self.renderer.height();
        if height < 2 {
            return;
        }

        if self.prompt.is_open() {
            let line = format!(
                "Matrix> {}_   (Enter=apply Tab=preset Esc=cancel)",
                self.prompt.buffer()
            );
            self.renderer.put_text(0, height - 2, &line, Color::White);
        }

        if let Some(message) = self.prompt.message() {
            let (text, color) = match message {
                PromptMessage::Info(text) => (text, Color::Green),
                PromptMessage::Warning(text) => (text, Color::Yellow),
                PromptMessage::Error(text) => (text, Color::Red),
            };
            self.renderer.put_text(0, height - 1, text, color);
        }
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn visualizer(&self) -> &Visualizer {
        &self.visualizer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

fn classification_color(classification: linviz_core::Classification) -> Color {
    use linviz_core::Classification::*;
    match classification {
        Singular => Color::Red,
        OrientationReversing => Color::DarkYellow,
        Orthogonal => Color::Green,
        General => Color::Cyan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linviz_core::{Classification, Preset};

    fn new_app() -> TerminalApp {
        let mut config = VisualizerConfig::default();
        config.grid.extent = 3;
        TerminalApp::with_size(&config, 100, 40).unwrap()
    }

    fn press(app: &mut TerminalApp, code: KeyCode) {
        app.handle_event(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)));
    }

    fn mouse(app: &mut TerminalApp, kind: MouseEventKind, column: u16, row: u16) {
        app.handle_event(Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }));
    }

    #[test]
    fn test_guard_restores_on_early_return() {
        let restored = std::cell::Cell::new(0);
        let setup = |fail: bool| -> io::Result<()> {
            let _guard = TerminalGuard::new(|| restored.set(restored.get() + 1));
            if fail {
                return Err(io::Error::other("alternate screen unavailable"));
            }
            Ok(())
        };

        assert!(setup(true).is_err());
        assert_eq!(restored.get(), 1);
        assert!(setup(false).is_ok());
        assert_eq!(restored.get(), 2);
    }

    #[test]
    fn test_app_error_wraps_core_errors() {
        let err = AppError::from(ConfigError::Validation("grid.extent".into()));
        assert!(matches!(err, AppError::Core(LinvizError::Config(_))));
        assert_eq!(err.to_string(), "config validation error: grid.extent");

        let err = AppError::from(GeometryError::ZeroSpacing);
        assert!(matches!(err, AppError::Core(LinvizError::Geometry(_))));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.is_running());

        let mut app = new_app();
        app.handle_event(Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!app.is_running());
    }

    #[test]
    fn test_prompt_submission_reaches_model() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('g'));
        // Tab twice selects the Scale 2x preset
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        // while the prompt is open 'q' is text, not quit
        press(&mut app, KeyCode::Char('q'));
        assert!(app.is_running());
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Enter);

        app.visualizer.tick();
        assert_eq!(app.visualizer().model().active_matrix(), &Preset::Scale2x.matrix());
    }

    #[test]
    fn test_reset_key() {
        let mut app = new_app();
        app.visualizer.apply_matrix(Preset::ReflectX.matrix()).unwrap();
        press(&mut app, KeyCode::Char('r'));
        for _ in 0..70 {
            app.visualizer.tick();
        }
        assert_eq!(app.visualizer().classification(), Classification::Orthogonal);
        assert!(!app.visualizer().model().is_displaced());
    }

    #[test]
    fn test_mouse_drives_camera() {
        let mut app = new_app();
        let start = app.camera().azimuth_deg();

        mouse(&mut app, MouseEventKind::Down(MouseButton::Left), 10, 10);
        mouse(&mut app, MouseEventKind::Drag(MouseButton::Left), 30, 10);
        mouse(&mut app, MouseEventKind::Up(MouseButton::Left), 30, 10);
        assert_eq!(app.camera().azimuth_deg(), start + 10.0);
        assert!(!app.camera().is_dragging());

        mouse(&mut app, MouseEventKind::ScrollUp, 0, 0);
        assert_eq!(app.camera().distance(), 7.5);
        mouse(&mut app, MouseEventKind::ScrollDown, 0, 0);
        mouse(&mut app, MouseEventKind::ScrollDown, 0, 0);
        assert_eq!(app.camera().distance(), 8.5);
    }

    #[test]
    fn test_info_panel_reports_classification() {
        let mut app = new_app();
        app.visualizer.apply_matrix(Preset::ReflectX.matrix()).unwrap();
        for _ in 0..70 {
            app.visualizer.tick();
        }

        let lines = app.info_lines();
        assert_eq!(lines[1].0, "Determinant: -1.0");
        assert_eq!(lines[2].0, "Volume Scale: 1.0x");
        assert_eq!(lines[3].0, "Transformation: ORIENTATION REVERSING");
        assert_eq!(lines[4].0, "Animation: 100.0%");
    }

    #[test]
    fn test_compose_frame_draws_overlay() {
        let mut app = new_app();
        press(&mut app, KeyCode::Char('g'));
        app.compose_frame();
        assert_eq!(app.renderer.glyph_at(1, 1), Some('L'));
        assert_eq!(app.renderer.glyph_at(0, 38), Some('M'));
    }

    #[test]
    fn test_resize_event() {
        let mut app = new_app();
        app.handle_event(Event::Resize(50, 20));
        assert_eq!(app.renderer.width(), 50);
        assert_eq!(app.renderer.height(), 20);
    }
}
