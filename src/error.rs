//! Error types for Environaut operations.
//!
//! This module defines [`EnvironautError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Configuration errors abort a run before any check executes
//! - Cache errors are fatal for the load or save that raised them
//! - Export write failures are reported as status lines, not errors;
//!   only configuration mistakes in a formatter raise
//! - Data-model violations (empty setting name, bad criteria) fail at the
//!   call site
//! - Use `anyhow::Error` (via `EnvironautError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for Environaut operations.
#[derive(Debug, Error)]
pub enum EnvironautError {
    /// A config location does not exist or cannot be read.
    #[error("Config location is not readable: {path}")]
    UnreadableLocation { path: PathBuf },

    /// A config file has an extension no reader is registered for.
    #[error("Unsupported config file extension for {path}; supported extensions are: {supported}")]
    UnsupportedExtension { path: PathBuf, supported: String },

    /// A config directory contains none of the default config filenames.
    #[error("No config file found in {path}; tried: {attempted}")]
    NoConfigFileFound { path: PathBuf, attempted: String },

    /// Failed to parse a config file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Config parsed but its structure or values are invalid.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Config names an implementor that has not been registered.
    #[error("Unknown {kind} '{name}'; available: {available}")]
    UnknownImplementor {
        kind: String,
        name: String,
        available: String,
    },

    /// A cache location is not accessible in the required mode.
    #[error("Cache location is not {mode}: {path}")]
    InvalidLocation { path: PathBuf, mode: &'static str },

    /// A persisted cache exists but cannot be decoded.
    #[error("Cache at {path} is corrupt: {message}")]
    CorruptCache { path: PathBuf, message: String },

    /// A setting value could not be serialized for the cache.
    #[error("Failed to encode cached settings: {message}")]
    EncodingError { message: String },

    /// The cache file could not be written.
    #[error("Failed to write cache to {path}: {source}")]
    CacheWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A formatter that needs a template was configured without one.
    #[error("No template configured for the {formatter} formatter; set the 'template' parameter")]
    NoTemplate { formatter: String },

    /// A generated variable name is not a valid identifier.
    #[error("Invalid identifier '{name}'; names must match ^[A-Za-z_][A-Za-z0-9_]*$")]
    InvalidIdentifier { name: String },

    /// A template format argument was not a string.
    #[error("Format must be a string, got: {found}")]
    InvalidFormatType { found: String },

    /// A positional directive refers to a missing argument.
    #[error("Format directive refers to argument {position}, but only {available} given")]
    MissingArgument { position: usize, available: usize },

    /// A format directive asks for an unreasonable width or precision.
    #[error("Width or precision exceeds {max} in format: {format}")]
    FieldTooLarge { max: usize, format: String },

    /// A format directive uses an unknown conversion character.
    #[error("Unknown conversion '{conversion}' in format: {format}")]
    UnknownConversion { conversion: char, format: String },

    /// A setting was constructed without a name.
    #[error("Setting name must not be empty")]
    EmptySettingName,

    /// Group criteria were neither null, a string, nor a list of strings.
    #[error("Invalid group criteria: {found}; expected null, a string or a list of strings")]
    InvalidCriteria { found: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Environaut operations.
pub type Result<T> = std::result::Result<T, EnvironautError>;
