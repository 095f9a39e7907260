//! Error classification and recovery.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Streamed content could not be reconciled into a valid response.
    Content,
    Stream,
    Provider,
    Configuration,
    Serialization,
    Io,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Discard the stream and its accumulator and issue a new request.
    RestartStream,
    CheckConfiguration,
    /// The provider adapter emitted inconsistent deltas.
    ReportProviderBug,
    ContactSupport,
}
