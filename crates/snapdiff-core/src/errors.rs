use snapdiff_core_types::RequestId;
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the transport, the fetchers or the diff engine
/// is classified into exactly one kind. Each kind maps to a stable error
/// code used by the CLI and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input
    InvalidInput,
    /// The namespace root was diffed as a file
    InvalidPath,

    // Namespace
    /// Path absent at the requested snapshot
    NotFound,
    /// Root entry type differs between the two snapshots
    TypeMismatch,
    /// A directory was reached twice during one diff
    CycleDetected,

    // Remote
    Unauthorised,
    Transport,
    /// Response body did not match the expected shape
    Decode,
    Timeout,
    Cancelled,

    // Output
    NotImplemented,
    Io,
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::CycleDetected => "ERR_CYCLE_DETECTED",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::Transport => "ERR_TRANSPORT",
            ExErrorKind::Decode => "ERR_DECODE",
            ExErrorKind::Timeout => "ERR_TIMEOUT",
            ExErrorKind::Cancelled => "ERR_CANCELLED",
            ExErrorKind::NotImplemented => "ERR_NOT_IMPLEMENTED",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus optional context about the
/// operation, namespace path, snapshot and HTTP exchange that failed.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    snapshot_id: Option<String>,
    status: Option<u16>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            snapshot_id: None,
            status: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add namespace path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add snapshot id context
    pub fn with_snapshot_id(mut self, id: impl Into<String>) -> Self {
        self.snapshot_id = Some(id.into());
        self
    }

    /// Add HTTP status context
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the namespace path context, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the snapshot id context, if any
    pub fn snapshot_id(&self) -> Option<&str> {
        self.snapshot_id.as_deref()
    }

    /// Get the HTTP status, if any
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// True if this is a `NotFound` error
    pub fn is_not_found(&self) -> bool {
        self.kind == ExErrorKind::NotFound
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(sid) = &self.snapshot_id {
            write!(f, " (snapshot: {})", sid)?;
        }
        if let Some(status) = self.status {
            write!(f, " (status: {})", status)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Structural failures raised by the diff engine itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiffError {
    /// The compared root is a file in one snapshot and a directory in the other
    #[error("root {path} is a {source_type} in the source snapshot but a {dest_type} in the destination")]
    RootTypeMismatch {
        path: String,
        source_type: String,
        dest_type: String,
    },

    /// The namespace root cannot be diffed as a file
    #[error("the namespace root cannot be diffed as a file: {path:?}")]
    RootAsFile { path: String },

    /// A directory was visited twice within one diff
    #[error("directory visited twice: {path}")]
    DirectoryRevisited { path: String },

    /// The server returned a pagination cursor that does not advance
    #[error("pagination cursor {cursor} did not advance for {path}")]
    CursorStalled { path: String, cursor: u64 },

    /// The diff was cancelled by the caller
    #[error("operation cancelled")]
    Cancelled,
}

impl From<DiffError> for ExError {
    fn from(err: DiffError) -> Self {
        let message = err.to_string();
        match err {
            DiffError::RootTypeMismatch { path, .. } => ExError::new(ExErrorKind::TypeMismatch)
                .with_op("snapshot_diff")
                .with_path(path)
                .with_message(message),

            DiffError::RootAsFile { path } => ExError::new(ExErrorKind::InvalidPath)
                .with_op("diff_file")
                .with_path(path)
                .with_message(message),

            DiffError::DirectoryRevisited { path } => ExError::new(ExErrorKind::CycleDetected)
                .with_path(path)
                .with_message(message),

            DiffError::CursorStalled { path, .. } => ExError::new(ExErrorKind::Decode)
                .with_path(path)
                .with_message(message),

            DiffError::Cancelled => ExError::new(ExErrorKind::Cancelled).with_message(message),
        }
    }
}

impl From<serde_json::Error> for ExError {
    fn from(err: serde_json::Error) -> Self {
        ExError::new(ExErrorKind::Decode).with_message(err.to_string())
    }
}

impl From<std::io::Error> for ExError {
    fn from(err: std::io::Error) -> Self {
        ExError::new(ExErrorKind::Io).with_message(err.to_string())
    }
}
