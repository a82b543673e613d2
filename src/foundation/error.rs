/// Convenience result type used across quadwarp.
pub type WarpResult<T> = Result<T, WarpError>;

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum WarpError {
    /// The destination corners admit no projective transform, or the quad self-intersects
    /// for scan tracing.
    ///
    /// `warp()` recovers from this locally; it is only observable through the lower-level
    /// [`Matrix`](crate::Matrix) and [`ScanBounds`](crate::ScanBounds) constructors.
    #[error("degenerate quad: {0}")]
    DegenerateQuad(String),

    /// An operation was invoked on a context after `dispose()`.
    #[error("context disposed")]
    Disposed,

    /// Invalid caller-provided data (buffer geometry, options).
    #[error("validation error: {0}")]
    Validation(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WarpError {
    /// Build a [`WarpError::DegenerateQuad`] value.
    pub fn degenerate(msg: impl Into<String>) -> Self {
        Self::DegenerateQuad(msg.into())
    }

    /// Build a [`WarpError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// `true` for [`WarpError::DegenerateQuad`].
    pub fn is_degenerate(&self) -> bool {
        matches!(self, Self::DegenerateQuad(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
