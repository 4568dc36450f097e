/// Example: drive the visualizer core without a terminal
///
/// Usage: cargo run -p linviz-core --example headless -- "1 0.5 0; 0 1 0; 0 0 1"
///
/// A helper thread plays the part of the input surface and publishes the
/// matrix; the main thread ticks until the animation settles and prints the
/// determinant along the way.

use std::env;
use std::thread;

use linviz_core::{parse_matrix, Preset, Visualizer, VisualizerConfig};

fn main() {
    let matrix = match env::args().nth(1) {
        Some(text) => match parse_matrix(&text) {
            Ok(matrix) => matrix,
            Err(e) => {
                eprintln!("Invalid matrix: {e}");
                std::process::exit(1);
            }
        },
        None => {
            eprintln!("No matrix provided, using the Shear X preset...");
            Preset::ShearX.matrix()
        }
    };

    let mut visualizer = match Visualizer::new(&VisualizerConfig::default()) {
        Ok(visualizer) => visualizer,
        Err(e) => {
            eprintln!("Failed to build geometry: {e}");
            std::process::exit(1);
        }
    };

    let publisher = visualizer.publisher();
    let input = thread::spawn(move || publisher.publish(matrix));
    if input.join().is_err() {
        eprintln!("Input thread panicked");
        std::process::exit(1);
    }

    let mut tick = 0;
    loop {
        visualizer.tick();
        tick += 1;
        if tick % 10 == 0 || !visualizer.model().animation().is_running() {
            println!(
                "tick {tick:3}  progress {:5.1}%  det {:8.4}  {}",
                visualizer.progress() * 100.0,
                visualizer.current_determinant(),
                visualizer.classification()
            );
        }
        if !visualizer.model().animation().is_running() {
            break;
        }
    }

    let cube = &visualizer.current_geometry().cube;
    println!("\nTransformed cube vertices:");
    for (i, v) in cube.vertices.iter().enumerate() {
        println!("  v{i}: ({:7.3}, {:7.3}, {:7.3})", v.x, v.y, v.z);
    }
}
