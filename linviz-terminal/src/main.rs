/// Linviz Terminal - Linear Transformation Visualizer
///
/// Animates a unit cube, basis triad and grid under a user-entered matrix.
/// Controls:
///   - G: Enter a matrix (Tab cycles presets, Enter applies)
///   - R: Reset to the identity
///   - Mouse drag: Orbit the camera
///   - Mouse wheel: Zoom in/out
///   - Q/ESC: Quit

use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Duration;

use linviz_core::{config, VisualizerConfig};
use linviz_terminal::cli::{self, Args};
use linviz_terminal::{restore_terminal, AppError, Script, TerminalApp};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_DIRECTIVE: &str = "linviz=info";
const QUIET_LOG_DIRECTIVE: &str = "linviz=warn";

fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Give the terminal back before the panic message is printed
        restore_terminal();
        default_hook(info);
    }));
}

/// Logs go to `--log-file` when given; stderr shares the screen, so it only gets warnings by default.
fn init_logging(args: &Args) -> std::io::Result<()> {
    let fallback = if args.log_file.is_some() {
        DEFAULT_LOG_DIRECTIVE
    } else {
        QUIET_LOG_DIRECTIVE
    };
    let filter = match &args.log_level {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match &args.log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            builder.with_writer(Mutex::new(file)).with_ansi(false).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

fn run(args: Args) -> Result<(), AppError> {
    let config = match &args.config {
        Some(path) => config::load_from_path(path)?,
        None => VisualizerConfig::default(),
    };
    let script = args.script.as_deref().map(Script::load).transpose()?;

    println!("Linviz - Linear Transformation Visualizer");
    println!("The unit cube starts at the origin (0,0,0) and extends to (1,1,1)");
    println!("G: enter a matrix | R: reset | drag: orbit | wheel: zoom | Q: quit");
    std::thread::sleep(Duration::from_secs(1));

    let mut app = TerminalApp::new(&config)?;
    if let Some(script) = script {
        app.attach_script(script, Duration::from_millis(args.script_interval_ms))?;
    }
    app.run()?;

    info!("exited cleanly");
    println!("Thank you for using Linviz!");
    Ok(())
}

fn main() -> ExitCode {
    let args = cli::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("linviz: failed to open log file: {e}");
        return ExitCode::FAILURE;
    }
    install_panic_hook();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            eprintln!("linviz: {e}");
            ExitCode::FAILURE
        }
    }
}
