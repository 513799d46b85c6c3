//! Error handling for Layerkit
//!
//! Library-level error types. Renderers deliberately have almost no error
//! surface (malformed layer data is recovered with defaults, a missing
//! drawing surface is a no-op), so these types cover the places where an
//! error is genuinely reportable: decoding layer records and mutating the
//! ordered store.

use thiserror::Error;

/// Errors produced while decoding or validating layer records.
#[derive(Error, Debug, Clone)]
pub enum LayerDataError {
    /// The record could not be parsed at all
    #[error("Malformed layer record: {reason}")]
    Malformed {
        /// Why the record was rejected.
        reason: String,
    },

    /// A duplicate layer id within one collection
    #[error("Duplicate layer id: {id}")]
    DuplicateId {
        /// The offending id.
        id: String,
    },

    /// Group membership bookkeeping disagrees
    #[error("Group {group} and member {member} disagree on membership")]
    GroupMismatch {
        /// The group layer's id.
        group: String,
        /// The member layer's id.
        member: String,
    },
}

/// Errors produced by ordered-store mutations.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// Referenced layer does not exist
    #[error("No layer with id {id}")]
    UnknownLayer {
        /// The missing id.
        id: String,
    },

    /// Referenced group does not exist or is not a group
    #[error("No group with id {id}")]
    UnknownGroup {
        /// The missing id.
        id: String,
    },
}
