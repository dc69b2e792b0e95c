use thiserror::Error;

/// Error generated when building or loading a [FieldLayout](crate::FieldLayout)
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FieldLayoutError {
    #[error("Too many tags for field (actual: {actual}, capacity: {capacity})")]
    TooManyTags {
        actual: usize,
        capacity: usize,
    },
    #[error("Unsupported field capacity (actual: {actual}, maximum: {maximum})")]
    InvalidCapacity {
        actual: usize,
        maximum: usize,
    },
    #[error("Tag id {id} does not fit in a field with capacity {capacity}")]
    TagIdOutOfRange {
        id: u32,
        capacity: usize,
    },
    #[error("Tag id {0} was configured more than once")]
    DuplicateTagId(u32),
    #[error("Field dimensions must be finite and positive (length: {length}, width: {width})")]
    InvalidFieldDimensions {
        length: f64,
        width: f64,
    },
    #[error("Tag {id} has a degenerate rotation quaternion")]
    InvalidQuaternion {
        id: u32,
    },
    #[error("No field description named {0:?}")]
    NotFound(String),
    #[error("Malformed field description")]
    Parse(#[from] serde_json::Error),
    #[error("Unable to read field description")]
    Io(#[source] std::io::Error),
    #[error("Unsupported origin {0:?} (expected \"BlueWall\" or \"RedWall\")")]
    InvalidOrigin(String),
}

impl FieldLayoutError {
    /// Did the layout itself violate a field constraint (as opposed to failing to load)?
    pub const fn is_configuration(&self) -> bool {
        matches!(self,
            Self::TooManyTags { .. }
            | Self::InvalidCapacity { .. }
            | Self::TagIdOutOfRange { .. }
            | Self::DuplicateTagId(_)
            | Self::InvalidFieldDimensions { .. }
            | Self::InvalidQuaternion { .. }
        )
    }
}
