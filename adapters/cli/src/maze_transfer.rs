//! Single-line share codes for generated mazes.

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use maze_walker_core::MazeGrid;

const SHARE_DOMAIN: &str = "maze";
const SHARE_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded maze payload.
pub(crate) const SHARE_HEADER: &str = "maze:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Encodes the maze as `maze:v1:<columns>x<rows>:<payload>`.
///
/// The payload is the JSON array of ASCII rows in unpadded base64.
pub(crate) fn encode(grid: &MazeGrid) -> Result<String, MazeTransferError> {
    let json = serde_json::to_vec(grid).map_err(MazeTransferError::InvalidPayload)?;
    let encoded = STANDARD_NO_PAD.encode(json);
    let dimensions = grid.dimensions();
    Ok(format!(
        "{SHARE_HEADER}:{}x{}:{encoded}",
        dimensions.columns(),
        dimensions.rows()
    ))
}

/// Decodes a maze from its share code, validating every grid invariant.
pub(crate) fn decode(value: &str) -> Result<MazeGrid, MazeTransferError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(MazeTransferError::EmptyPayload);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(MazeTransferError::MissingPrefix)?;
    let version = parts.next().ok_or(MazeTransferError::MissingVersion)?;
    let dimensions = parts.next().ok_or(MazeTransferError::MissingDimensions)?;
    let payload = parts.next().ok_or(MazeTransferError::MissingPayload)?;

    if domain != SHARE_DOMAIN {
        return Err(MazeTransferError::InvalidPrefix(domain.to_owned()));
    }
    if version != SHARE_VERSION {
        return Err(MazeTransferError::UnsupportedVersion(version.to_owned()));
    }

    let (columns, rows) = parse_dimensions(dimensions)?;
    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(MazeTransferError::InvalidEncoding)?;
    let grid: MazeGrid =
        serde_json::from_slice(&bytes).map_err(MazeTransferError::InvalidPayload)?;

    let actual = grid.dimensions();
    if (actual.columns(), actual.rows()) != (columns, rows) {
        return Err(MazeTransferError::DimensionMismatch {
            declared: (columns, rows),
            actual: (actual.columns(), actual.rows()),
        });
    }

    Ok(grid)
}

/// Errors that can occur while decoding share codes.
#[derive(Debug)]
pub(crate) enum MazeTransferError {
    /// The provided string was empty or contained only whitespace.
    EmptyPayload,
    /// The prefix segment was missing from the share code.
    MissingPrefix,
    /// The share code did not contain a version segment.
    MissingVersion,
    /// The share code did not include grid dimensions.
    MissingDimensions,
    /// The share code did not include the payload segment.
    MissingPayload,
    /// The share code used an unexpected prefix segment.
    InvalidPrefix(String),
    /// The share code used an unsupported version identifier.
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the share code.
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    InvalidEncoding(base64::DecodeError),
    /// The payload was not a valid maze.
    InvalidPayload(serde_json::Error),
    /// The decoded maze does not match the declared dimensions.
    DimensionMismatch {
        /// Columns and rows named in the header.
        declared: (u32, u32),
        /// Columns and rows of the decoded grid.
        actual: (u32, u32),
    },
}

impl fmt::Display for MazeTransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayload => write!(f, "share code was empty"),
            Self::MissingPrefix => write!(f, "share code is missing the prefix"),
            Self::MissingVersion => write!(f, "share code is missing the version"),
            Self::MissingDimensions => write!(f, "share code is missing the grid dimensions"),
            Self::MissingPayload => write!(f, "share code is missing the payload"),
            Self::InvalidPrefix(prefix) => {
                write!(f, "share code prefix '{prefix}' is not supported")
            }
            Self::UnsupportedVersion(version) => {
                write!(f, "share code version '{version}' is not supported")
            }
            Self::InvalidDimensions(dimensions) => {
                write!(f, "could not parse grid dimensions '{dimensions}'")
            }
            Self::InvalidEncoding(error) => {
                write!(f, "could not decode maze payload: {error}")
            }
            Self::InvalidPayload(error) => {
                write!(f, "could not parse maze payload: {error}")
            }
            Self::DimensionMismatch { declared, actual } => write!(
                f,
                "share code declares a {}x{} maze but contains {}x{}",
                declared.0, declared.1, actual.0, actual.1
            ),
        }
    }
}

impl Error for MazeTransferError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), MazeTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| MazeTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| MazeTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| MazeTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(MazeTransferError::InvalidDimensions(dimensions.to_owned()));
    }

    Ok((columns, rows))
}
