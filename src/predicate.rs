//! Transient-failure classification
//!
//! The executor itself never decides what is retryable; the caller supplies
//! a predicate that owns that classification for its domain. An identity
//! client, for example, would classify timeouts and throttling responses as
//! transient and authentication or consent failures as permanent.

/// A predicate that classifies a failure as retry-eligible or not
///
/// # Example
///
/// ```rust
/// use stamina::TransientPredicate;
/// use std::io::{Error, ErrorKind};
///
/// struct IoTransience;
///
/// impl TransientPredicate<Error> for IoTransience {
///     fn is_transient(&self, cause: &Error) -> bool {
///         matches!(
///             cause.kind(),
///             ErrorKind::TimedOut | ErrorKind::ConnectionReset | ErrorKind::Interrupted
///         )
///     }
/// }
/// ```
pub trait TransientPredicate<E: ?Sized>: Send + Sync {
    /// Determine whether the given failure is transient
    fn is_transient(&self, cause: &E) -> bool;
}

/// A predicate that treats every failure as transient
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTransient;

impl<E: ?Sized> TransientPredicate<E> for AlwaysTransient {
    fn is_transient(&self, _cause: &E) -> bool {
        true
    }
}

/// A predicate that treats no failure as transient
#[derive(Debug, Clone, Copy)]
pub struct NeverTransient;

impl<E: ?Sized> TransientPredicate<E> for NeverTransient {
    fn is_transient(&self, _cause: &E) -> bool {
        false
    }
}

/// A predicate backed by a closure
pub struct ClosurePredicate<F> {
    predicate: F,
}

impl<F> ClosurePredicate<F> {
    /// Create a new closure-based predicate
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<E, F> TransientPredicate<E> for ClosurePredicate<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn is_transient(&self, cause: &E) -> bool {
        (self.predicate)(cause)
    }
}
