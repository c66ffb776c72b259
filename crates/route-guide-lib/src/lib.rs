//! Route Guide Library - Core of the route guide service
//!
//! This library implements the domain logic behind the four route guide
//! calls: a unary point lookup, a server-streaming rectangle query, a
//! client-streaming route recording and a bidirectional note exchange. The
//! transport is left to the caller: requests arrive as already-decoded values
//! together with a [`CallContext`], and streams are plain tokio channels.
//!
//! # Architecture
//!
//! - **[`distance`]**: Haversine distance between E7 fixed-point coordinates
//! - **[`FeatureStore`]**: Immutable feature list with point lookup and range queries
//! - **[`RouteRecorder`]**: Per-call state machine aggregating a stream of points
//! - **[`NoteRegistry`]**: Concurrent map from location to the notes left there
//! - **[`RouteGuideService`]**: Orchestrates the above for each call shape
//!
//! # Concurrency
//!
//! Every call runs as its own task. The store is shared read-only behind an
//! `Arc`; the note registry is the only mutable shared state and serializes
//! access per key. Streaming calls suspend only on channel operations, which
//! are raced against the call's cancellation and deadline.

mod context;
#[cfg(feature = "serde")]
pub mod dataset;
pub mod distance;
mod notes;
mod recorder;
mod service;
mod store;
pub mod stream;
mod types;

// Public API exports
pub use context::{CANCELLATION_CHECK_INTERVAL, CallContext};
pub use distance::distance;
pub use notes::NoteRegistry;
pub use recorder::{RecorderState, RouteRecorder};
pub use service::{CallShape, Method, RouteGuide, RouteGuideService, ServiceConfig};
pub use store::{
    FeatureStore, PLACEHOLDER_LOCATION, PLACEHOLDER_NAME, StoreInfo, placeholder_feature,
};
pub use stream::{Inbound, Outbound};
pub use types::{
    COORD_FACTOR, Feature, MAX_LATITUDE_E7, MAX_LONGITUDE_E7, Point, Rectangle, RouteNote,
    RouteSummary,
};

/// Status code an outer transport reports for a failed call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Code {
    Cancelled,
    DeadlineExceeded,
    FailedPrecondition,
    Unavailable,
    Unimplemented,
    Internal,
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Code::Cancelled => "CANCELLED",
            Code::DeadlineExceeded => "DEADLINE_EXCEEDED",
            Code::FailedPrecondition => "FAILED_PRECONDITION",
            Code::Unavailable => "UNAVAILABLE",
            Code::Unimplemented => "UNIMPLEMENTED",
            Code::Internal => "INTERNAL",
        };
        f.write_str(name)
    }
}

/// Error types for the route guide core
#[derive(Debug, thiserror::Error)]
pub enum GuideError {
    #[error("Invalid state: {0}")]
    InvalidState(&'static str),

    #[error("Call cancelled")]
    Cancelled,

    #[error("Deadline exceeded")]
    DeadlineExceeded,

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Method not implemented: {0}")]
    Unimplemented(Method),

    #[error("Failed to load dataset: {0}")]
    DatasetLoad(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GuideError {
    /// Status code to report for this error
    pub fn code(&self) -> Code {
        match self {
            GuideError::InvalidState(_) => Code::FailedPrecondition,
            GuideError::Cancelled => Code::Cancelled,
            GuideError::DeadlineExceeded => Code::DeadlineExceeded,
            GuideError::Transport(_) => Code::Unavailable,
            GuideError::Unimplemented(_) => Code::Unimplemented,
            GuideError::DatasetLoad(_) | GuideError::Io(_) => Code::Internal,
            #[cfg(feature = "serde")]
            GuideError::Json(_) => Code::Internal,
        }
    }

    /// Whether the call ended because the caller gave up on it
    #[inline]
    pub fn is_cancellation(&self) -> bool {
        matches!(self, GuideError::Cancelled | GuideError::DeadlineExceeded)
    }
}

pub type Result<T> = std::result::Result<T, GuideError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(Vec<Feature>) -> Result<FeatureStore> = FeatureStore::load;
        let _: fn() -> NoteRegistry = NoteRegistry::new;
        let _: fn(&Point, &Point) -> i32 = distance;
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            GuideError::InvalidState("closed").code(),
            Code::FailedPrecondition
        );
        assert_eq!(GuideError::Cancelled.code(), Code::Cancelled);
        assert_eq!(GuideError::DeadlineExceeded.code(), Code::DeadlineExceeded);
        assert_eq!(
            GuideError::Transport("reset".into()).code(),
            Code::Unavailable
        );
        assert_eq!(
            GuideError::Unimplemented(Method::RouteChat).code(),
            Code::Unimplemented
        );
        assert_eq!(
            GuideError::DatasetLoad("bad".into()).code(),
            Code::Internal
        );
    }

    #[test]
    fn test_cancellation_classification() {
        assert!(GuideError::Cancelled.is_cancellation());
        assert!(GuideError::DeadlineExceeded.is_cancellation());
        assert!(!GuideError::Transport("x".into()).is_cancellation());
    }

    #[test]
    fn test_error_display() {
        let err = GuideError::Unimplemented(Method::RecordRoute);
        assert_eq!(
            err.to_string(),
            "Method not implemented: /routeguide.RouteGuide/RecordRoute"
        );
        assert_eq!(Code::DeadlineExceeded.to_string(), "DEADLINE_EXCEEDED");
    }
}
