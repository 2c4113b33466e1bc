//! Round-robin sender identity rotation
//!
//! Rotation is a pure function over the configured sender pool: no state
//! beyond "last identity used", which the campaign cursor persists alongside
//! recipient progress.

/// Return the sender identity to use after `last`
///
/// If `last` is `None` or no longer present in the pool (the pool changed
/// between runs), rotation restarts at the first identity. The pool is
/// guaranteed non-empty by [`crate::Config::validate`].
///
/// # Panics
///
/// Panics if `pool` is empty; callers go through config validation first.
#[must_use]
pub fn next_sender<'a>(pool: &'a [String], last: Option<&str>) -> &'a str {
    let next_index = last
        .and_then(|last| pool.iter().position(|s| s == last))
        .map_or(0, |i| (i + 1) % pool.len());
    &pool[next_index]
}
