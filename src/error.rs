//! # Error Types
//!
//! Error taxonomy for the rewriting engine.
//!
//! Two very different kinds of failure live here:
//! - **Transform failures** raised by a single metadata stage while rewriting one
//!   item. These never leave the engine; the pipeline converts them into an
//!   omitted item plus an optional diagnostic.
//! - **Setup failures** raised while building hops, chains, or loading
//!   configuration. These are returned to the caller before any traffic flows.
//!
//! An intentional removal is not an error at all: stages express it with
//! [`StageOutcome::Drop`](crate::protocol::stage::StageOutcome::Drop).
//!
//! ## Example Usage
//! ```rust
//! use entity_rewriter::core::metadata::{MetaValue, MetadataItem, TypeTag};
//! use entity_rewriter::error::{Result, RewriteError};
//!
//! fn expect_varint(item: &MetadataItem) -> Result<i32> {
//!     match item.value {
//!         MetaValue::VarInt(v) => Ok(v),
//!         _ => Err(RewriteError::UnexpectedType {
//!             field_id: item.field_id,
//!             expected: TypeTag::VarInt,
//!             found: item.type_tag,
//!         }),
//!     }
//! }
//!
//! let item = MetadataItem::new(3, MetaValue::Boolean(true));
//! assert!(expect_varint(&item).is_err());
//! ```

use crate::core::entity::ProtocolVersion;
use crate::core::metadata::{FieldId, TypeTag};
use crate::protocol::hop::HopId;
use std::io;
use thiserror::Error;

/// Static diagnostic messages, borrowed rather than allocated on failure paths.
pub mod constants {
    /// Emitted through the diagnostic sink when an item is omitted after a failure
    pub const MSG_METADATA_FAILURE: &str = "Unable to handle metadata";
    /// Logged alongside the failing item when full-batch logging is enabled
    pub const MSG_FULL_BATCH: &str = "Full metadata list";
    /// Panic payloads that are neither `&str` nor `String`
    pub const MSG_OPAQUE_PANIC: &str = "stage panicked with a non-string payload";
}

/// Errors produced by the rewriting engine and its setup APIs
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Transform error: {0}")]
    Transform(String),

    #[error("Unexpected value type for field {field_id}: expected {expected:?}, found {found:?}")]
    UnexpectedType {
        field_id: FieldId,
        expected: TypeTag,
        found: TypeTag,
    },

    #[error("Stage '{stage}' replaced field {field_id} with a value that contradicts its tag {tag:?} (value is {found:?})")]
    InvalidReplacement {
        stage: String,
        field_id: FieldId,
        tag: TypeTag,
        found: TypeTag,
    },

    #[error("Stage '{stage}' panicked: {message}")]
    StagePanicked { stage: String, message: String },

    #[error("Broken protocol chain: expected a hop starting at {expected}, found {found}")]
    BrokenChain {
        expected: ProtocolVersion,
        found: ProtocolVersion,
    },

    #[error("Protocol chain has no hops")]
    EmptyChain,

    #[error("Protocol chain crosses hop {hop} more than once")]
    DuplicateHop { hop: HopId },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl RewriteError {
    /// Shorthand for stage authors reporting a free-form transform failure
    pub fn transform(msg: impl Into<String>) -> Self {
        RewriteError::Transform(msg.into())
    }

    /// Whether this error originated inside a metadata stage
    pub fn is_transform_failure(&self) -> bool {
        matches!(
            self,
            RewriteError::Transform(_)
                | RewriteError::UnexpectedType { .. }
                | RewriteError::InvalidReplacement { .. }
                | RewriteError::StagePanicked { .. }
        )
    }
}

/// Type alias for Results using RewriteError
pub type Result<T> = std::result::Result<T, RewriteError>;
