/// Text format for entering a 3×3 matrix
///
/// Nine numbers in row-major order. Entries may be separated by whitespace,
/// commas or semicolons and wrapped in brackets or parentheses, so all of
/// these read the same:
///
/// ```text
/// 1 0 0 0 1 0 0 0 1
/// 1 0 0; 0 1 0; 0 0 1
/// [[1, 0, 0], [0, 1, 0], [0, 0, 1]]
/// ```
use nalgebra::Matrix3;
use nom::{
    bytes::complete::take_while,
    combinator::all_consuming,
    multi::many1,
    number::complete::double,
    sequence::{preceded, terminated},
    IResult,
};

use crate::error::ParseError;
use crate::math::matrix_from_rows;

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ';' | '[' | ']' | '(' | ')')
}

fn separators(input: &str) -> IResult<&str, &str> {
    take_while(is_separator)(input)
}

fn entry(input: &str) -> IResult<&str, f64> {
    preceded(separators, double)(input)
}

fn entries(input: &str) -> IResult<&str, Vec<f64>> {
    all_consuming(terminated(many1(entry), separators))(input)
}

/// Parse nine finite numbers into a matrix
pub fn parse_matrix(input: &str) -> Result<Matrix3<f64>, ParseError> {
    if input.chars().all(is_separator) {
        return Err(ParseError::Empty);
    }

    let values = match entries(input) {
        Ok((_, values)) => values,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            return Err(ParseError::Syntax {
                offset: input.len() - e.input.len(),
            });
        }
        Err(nom::Err::Incomplete(_)) => {
            return Err(ParseError::Syntax { offset: input.len() });
        }
    };

    let values: [f64; 9] = values
        .as_slice()
        .try_into()
        .map_err(|_| ParseError::WrongCount { found: values.len() })?;

    if let Some(index) = values.iter().position(|v| !v.is_finite()) {
        return Err(ParseError::NonFinite { index });
    }

    Ok(matrix_from_rows(&values))
}

/// Render a matrix row by row in the format [`parse_matrix`] reads
pub fn format_matrix(matrix: &Matrix3<f64>) -> String {
    (0..3)
        .map(|row| {
            (0..3)
                .map(|col| format!("{:.3}", matrix[(row, col)]))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_list() {
        let m = parse_matrix("1 0 0 0 1 0 0 0 1").unwrap();
        assert_eq!(m, Matrix3::identity());
    }

    #[test]
    fn test_parse_nested_brackets() {
        let m = parse_matrix("[[1, 0.5, 0], [0, 1, 0], [0, 0, 1]]").unwrap();
        assert_eq!(m[(0, 1)], 0.5);
        assert_eq!(m[(1, 0)], 0.0);
    }

    #[test]
    fn test_parse_rows_with_semicolons() {
        let m = parse_matrix("  -1 0 0; 0 1 0; 0 0 1.5e0  ").unwrap();
        assert_eq!(m[(0, 0)], -1.0);
        assert_eq!(m[(2, 2)], 1.5);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(parse_matrix(""), Err(ParseError::Empty));
        assert_eq!(parse_matrix(" [ ] "), Err(ParseError::Empty));
    }

    #[test]
    fn test_wrong_count() {
        assert_eq!(parse_matrix("1 2 3"), Err(ParseError::WrongCount { found: 3 }));
        assert_eq!(
            parse_matrix("1 2 3 4 5 6 7 8 9 10"),
            Err(ParseError::WrongCount { found: 10 })
        );
    }

    #[test]
    fn test_syntax_error_offset() {
        assert_eq!(parse_matrix("1 2 x 4"), Err(ParseError::Syntax { offset: 4 }));
    }

    #[test]
    fn test_format_round_trips() {
        let m = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let text = format_matrix(&m);
        assert_eq!(text, "0.000 -1.000 0.000; 1.000 0.000 0.000; 0.000 0.000 1.000");
        assert_eq!(parse_matrix(&text).unwrap(), m);
    }
}
