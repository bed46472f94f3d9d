//! Idempotent filesystem primitives used when installing rendered files.
pub mod fs;
pub mod permissions;

/// Result of applying a change to the destination tree.
///
/// # Examples
///
/// ```
/// use dotplate::resources::ResourceChange;
///
/// let applied = ResourceChange::Applied;
/// let noop = ResourceChange::AlreadyCorrect;
///
/// assert_eq!(applied, ResourceChange::Applied);
/// assert_ne!(applied, noop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceChange {
    /// The file was created or updated.
    Applied,
    /// The file was already correct (no change needed).
    AlreadyCorrect,
}
