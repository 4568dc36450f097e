use clap::Parser;
use std::path::PathBuf;

/// Linviz: watch a 3×3 matrix transform space, in your terminal.
#[derive(Parser, Debug)]
#[command(name = "linviz", version, about)]
pub struct Args {
    /// Config file path.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter directive (e.g. debug, linviz_core=trace). Overrides RUST_LOG.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Replay matrices from a script file, one matrix per line.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Delay between script matrices, in milliseconds.
    #[arg(long, default_value_t = 3000)]
    pub script_interval_ms: u64,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["linviz"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.script.is_none());
        assert_eq!(args.script_interval_ms, 3000);
    }

    #[test]
    fn all_flags() {
        let args = Args::try_parse_from([
            "linviz",
            "--config",
            "viz.toml",
            "--log-level",
            "debug",
            "--log-file",
            "linviz.log",
            "--script",
            "tour.txt",
            "--script-interval-ms",
            "500",
        ])
        .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("viz.toml")));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert_eq!(args.log_file, Some(PathBuf::from("linviz.log")));
        assert_eq!(args.script, Some(PathBuf::from("tour.txt")));
        assert_eq!(args.script_interval_ms, 500);
    }

    #[test]
    fn rejects_unknown_flag() {
        assert!(Args::try_parse_from(["linviz", "--bogus"]).is_err());
    }
}
