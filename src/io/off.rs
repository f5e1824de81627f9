//! Point clouds from OFF files.
//!
//! Two header forms are understood:
//!
//! ```text
//! OFF                  nOFF
//! nv nf ne             dim
//! x y z                nv nf ne
//! ...                  x1 ... x_dim
//!                      ...
//! ```
//!
//! `#` starts a comment that runs to the end of the line, and blank lines are skipped.
//! Header values may share a line (`OFF 7 0 0`, `nOFF 4 10 0 0`). Each vertex occupies one
//! line with exactly `dim` coordinates. The face section is not read; the point with
//! index `i` is the `i`-th vertex line.
//!
//! # Examples
//!
//! ```rust
//! use vietoris::io::off::read_off_points;
//!
//! let text = "OFF\n# two points\n2 0 0\n0 0 0\n1.5 2 -1\n";
//! let points: Vec<Vec<f64>> = read_off_points(text.as_bytes()).unwrap();
//! assert_eq!(points, vec![vec![0.0, 0.0, 0.0], vec![1.5, 2.0, -1.0]]);
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Errors that can occur while reading an OFF file.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum OffReaderError {
    /// The underlying reader failed.
    #[error("I/O error while reading OFF data: {message}")]
    Io {
        /// Description of the I/O failure.
        message: String,
    },
    /// The input holds no header at all.
    #[error("OFF data is empty (no header found)")]
    MissingHeader,
    /// The first keyword is neither `OFF` nor `nOFF`.
    #[error("Line {line}: expected an `OFF` or `nOFF` header, found {found:?}")]
    InvalidHeader {
        /// 1-based line number.
        line: usize,
        /// The offending keyword.
        found: String,
    },
    /// A dimension or element count is not a non-negative integer.
    #[error("Line {line}: invalid count {token:?}")]
    InvalidCount {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A coordinate does not parse as a number.
    #[error("Line {line}: invalid coordinate {token:?}")]
    InvalidCoordinate {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        token: String,
    },
    /// A vertex line does not hold exactly `expected` coordinates.
    #[error("Line {line}: expected {expected} coordinates, found {found}")]
    InconsistentDimension {
        /// 1-based line number.
        line: usize,
        /// Ambient dimension announced by the header.
        expected: usize,
        /// Number of coordinates on the line.
        found: usize,
    },
    /// The data ended inside the header.
    #[error("OFF header ends after {found} of {expected} values")]
    TruncatedHeader {
        /// Number of dimension and count values the header needs.
        expected: usize,
        /// Number of values found.
        found: usize,
    },
    /// The data ended before every announced vertex was read.
    #[error("Unexpected end of OFF data: expected {expected} vertices, found {found}")]
    UnexpectedEof {
        /// Number of vertices announced by the header.
        expected: usize,
        /// Number of vertices read.
        found: usize,
    },
}

impl From<std::io::Error> for OffReaderError {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}

/// Reads the vertex coordinates of OFF data.
///
/// # Errors
///
/// Returns an [`OffReaderError`] describing the first malformed element.
pub fn read_off_points<T, R>(reader: R) -> Result<Vec<Vec<T>>, OffReaderError>
where
    T: FromStr,
    R: BufRead,
{
    let mut lines = ContentLines::new(reader);

    let header = read_header(&mut lines)?;
    let mut points = Vec::with_capacity(header.num_vertices);
    while points.len() < header.num_vertices {
        let Some((line, content)) = lines.next_line()? else {
            return Err(OffReaderError::UnexpectedEof {
                expected: header.num_vertices,
                found: points.len(),
            });
        };
        points.push(parse_point(line, &content, header.dimension)?);
    }

    if header.num_faces > 0 {
        tracing::debug!(num_faces = header.num_faces, "skipped OFF face section");
    }
    tracing::debug!(
        num_vertices = points.len(),
        dimension = header.dimension,
        "read OFF point cloud"
    );
    Ok(points)
}

/// Opens `path` and reads its vertex coordinates.
///
/// # Errors
///
/// Returns [`OffReaderError::Io`] if the file cannot be opened, and any other
/// [`OffReaderError`] from [`read_off_points`].
pub fn read_off_points_from_path<T, P>(path: P) -> Result<Vec<Vec<T>>, OffReaderError>
where
    T: FromStr,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    read_off_points(BufReader::new(file))
}

// =============================================================================
// HEADER
// =============================================================================

#[derive(Debug)]
struct OffHeader {
    dimension: usize,
    num_vertices: usize,
    num_faces: usize,
}

fn read_header<R: BufRead>(lines: &mut ContentLines<R>) -> Result<OffHeader, OffReaderError> {
    let Some((line, content)) = lines.next_line()? else {
        return Err(OffReaderError::MissingHeader);
    };
    let mut tokens: Vec<(usize, String)> = content
        .split_whitespace()
        .map(|token| (line, token.to_string()))
        .collect();
    let (_, keyword) = tokens.remove(0);

    let needed = match keyword.as_str() {
        "OFF" => 3,
        "nOFF" => 4,
        _ => {
            return Err(OffReaderError::InvalidHeader {
                line,
                found: keyword,
            });
        }
    };
    while tokens.len() < needed {
        let Some((line, content)) = lines.next_line()? else {
            return Err(OffReaderError::TruncatedHeader {
                expected: needed,
                found: tokens.len(),
            });
        };
        tokens.extend(
            content
                .split_whitespace()
                .map(|token| (line, token.to_string())),
        );
    }

    let counts = tokens
        .iter()
        .take(needed)
        .map(|(line, token)| {
            token
                .parse::<usize>()
                .map_err(|_| OffReaderError::InvalidCount {
                    line: *line,
                    token: token.clone(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let (dimension, counts) = if needed == 4 {
        (counts[0], &counts[1..])
    } else {
        (3, &counts[..])
    };
    Ok(OffHeader {
        dimension,
        num_vertices: counts[0],
        num_faces: counts[1],
    })
}

fn parse_point<T: FromStr>(
    line: usize,
    content: &str,
    dimension: usize,
) -> Result<Vec<T>, OffReaderError> {
    let point = content
        .split_whitespace()
        .map(|token| {
            token
                .parse::<T>()
                .map_err(|_| OffReaderError::InvalidCoordinate {
                    line,
                    token: token.to_string(),
                })
        })
        .collect::<Result<Vec<T>, _>>()?;
    if point.len() != dimension {
        return Err(OffReaderError::InconsistentDimension {
            line,
            expected: dimension,
            found: point.len(),
        });
    }
    Ok(point)
}

// =============================================================================
// LINE SCANNING
// =============================================================================

/// Yields `(line_number, content)` for every line that is not blank once comments are
/// stripped.
struct ContentLines<R> {
    reader: R,
    line: usize,
    buffer: String,
}

impl<R: BufRead> ContentLines<R> {
    const fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buffer: String::new(),
        }
    }

    fn next_line(&mut self) -> Result<Option<(usize, String)>, OffReaderError> {
        loop {
            self.buffer.clear();
            if self.reader.read_line(&mut self.buffer)? == 0 {
                return Ok(None);
            }
            self.line += 1;
            let content = self
                .buffer
                .split_once('#')
                .map_or(self.buffer.as_str(), |(before, _)| before)
                .trim();
            if !content.is_empty() {
                return Ok(Some((self.line, content.to_string())));
            }
        }
    }
}
