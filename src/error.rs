use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::binary::{DeserializationError, SerializationError};
use crate::types::Tag;

/// Everything that can go wrong while instancing a font.
///
/// All of these are fatal to the current invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum InstancerError {
    #[error("Missing required table {table}")]
    MissingRequired { table: Tag },

    #[error("Cannot limit {tag}: axis not present in fvar")]
    AxisUnknown { tag: Tag },

    #[error("Specified multiple limits for axis {tag}")]
    DuplicateLimit { tag: Tag },

    #[error("Invalid location format: {spec:?}")]
    BadLimitSyntax { spec: String },

    #[error("Axis range limits are not supported yet: {tag}={minimum}:{maximum}")]
    RangeUnsupported {
        tag: Tag,
        minimum: f32,
        maximum: f32,
    },

    #[error("Font is corrupt: {msg}")]
    Corrupt { msg: String },

    #[error("IO error for file {path}: {source}")]
    IO {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{0}")]
    Parse(#[from] DeserializationError),

    #[error("{0}")]
    Write(#[from] SerializationError),
}
