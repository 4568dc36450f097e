use std::path::PathBuf;

/// A matrix with a NaN or infinite entry was offered to the model.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("matrix entry ({row}, {col}) is not finite: {value}")]
pub struct InvalidMatrixError {
    pub row: usize,
    pub col: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("no matrix entries given")]
    Empty,

    #[error("unexpected input at offset {offset}")]
    Syntax { offset: usize },

    #[error("expected 9 matrix entries, found {found}")]
    WrongCount { found: usize },

    #[error("entry {index} is not a finite number")]
    NonFinite { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    #[error("grid spacing must be at least 1")]
    ZeroSpacing,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    #[error("config parse error: {0}")]
    Parse(String),

    #[error("config validation error: {0}")]
    Validation(String),
}

#[derive(Debug, thiserror::Error)]
pub enum LinvizError {
    #[error(transparent)]
    InvalidMatrix(#[from] InvalidMatrixError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_matrix_display() {
        let err = InvalidMatrixError {
            row: 1,
            col: 2,
            value: f64::NAN,
        };
        assert_eq!(err.to_string(), "matrix entry (1, 2) is not finite: NaN");
    }

    #[test]
    fn parse_error_display() {
        assert_eq!(
            ParseError::WrongCount { found: 4 }.to_string(),
            "expected 9 matrix entries, found 4"
        );
    }

    #[test]
    fn linviz_error_wraps_config() {
        let err: LinvizError = ConfigError::Validation("grid.extent".into()).into();
        assert_eq!(err.to_string(), "config validation error: grid.extent");
    }
}
