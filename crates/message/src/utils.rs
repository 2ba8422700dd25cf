//! Utility macros shared by the value objects of this crate.

/// Returns early with an error if a condition is not met.
///
/// Every `with_*` method validates its argument before cloning the receiver, so
/// a rejected update never produces a half-built value.
///
/// # Example
///
/// ```ignore
/// ensure!(!path.contains('?'), InvalidArgument::PathContainsQuery { path: path.to_string() });
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
