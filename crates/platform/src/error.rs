//! Error types for Bosun
//!
//! Every fallible operation in the workspace reports one of a small set of
//! error kinds. `NotUsed` dispatch outcomes are deliberately *not* errors;
//! they are ordinary return values of the routing layer.

use std::collections::TryReserveError;
use std::fmt;

/// Unified error type for all Bosun operations
#[derive(Debug)]
pub enum BosunError {
    /// Allocation failed. The operation left its target unchanged, so the
    /// caller may recover, typically by tearing the session down.
    OutOfMemory,

    /// A caller-supplied argument was malformed (bad callback-struct size,
    /// message-type range wrapping the 8-bit code space, ...).
    InvalidArgument(String),

    /// An element was requested from an empty sequence.
    Empty,
}

impl fmt::Display for BosunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BosunError::OutOfMemory => write!(f, "Out of memory"),
            BosunError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            BosunError::Empty => write!(f, "Sequence is empty"),
        }
    }
}

impl std::error::Error for BosunError {}

impl From<TryReserveError> for BosunError {
    fn from(_err: TryReserveError) -> Self {
        BosunError::OutOfMemory
    }
}

/// Result type for Bosun operations
pub type BosunResult<T> = Result<T, BosunError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BosunError::InvalidArgument("size field is zero".to_string());
        assert_eq!(err.to_string(), "Invalid argument: size field is zero");

        assert_eq!(BosunError::OutOfMemory.to_string(), "Out of memory");
        assert_eq!(BosunError::Empty.to_string(), "Sequence is empty");
    }

    #[test]
    fn test_reserve_error_conversion() {
        let mut v: Vec<u8> = Vec::new();
        let reserve_err = v.try_reserve(usize::MAX).unwrap_err();
        let err: BosunError = reserve_err.into();
        assert!(matches!(err, BosunError::OutOfMemory));
    }

    #[test]
    fn test_result_type() {
        fn example() -> BosunResult<i32> {
            Ok(42)
        }

        assert_eq!(example().unwrap(), 42);
    }
}
