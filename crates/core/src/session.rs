//! Conversation session resolver.
//!
//! The stable thread identifier is the sole mechanism by which the
//! conversation store threads multi-turn context. A caller-supplied id is
//! reused unchanged so clients can continue a conversation; an absent id
//! gets a fresh mint. The resolved id is always echoed back to the caller.

use crate::message::ThreadId;

/// Resolve a definite thread identifier from an optional supplied one.
///
/// Total: a present, non-empty id is returned unchanged (idempotent reuse);
/// anything else mints a new best-effort-unique id. No locking — minting
/// mixes a time source with a random source, so concurrent calls need no
/// serialization point.
pub fn resolve(supplied: Option<&str>) -> ThreadId {
    match supplied {
        Some(id) if !id.is_empty() => ThreadId::from(id),
        _ => ThreadId::mint(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplied_id_is_returned_unchanged() {
        let id = resolve(Some("abc123"));
        assert_eq!(id.as_str(), "abc123");
    }

    #[test]
    fn resolution_is_idempotent() {
        let first = resolve(Some("thread-42"));
        let second = resolve(Some(first.as_str()));
        assert_eq!(first, second);
    }

    #[test]
    fn absent_id_mints_a_fresh_one() {
        let id = resolve(None);
        assert!(!id.as_str().is_empty());
    }

    #[test]
    fn empty_supplied_id_is_treated_as_absent() {
        let id = resolve(Some(""));
        assert!(!id.as_str().is_empty());
    }

    #[test]
    fn two_fresh_resolutions_differ() {
        let a = resolve(None);
        let b = resolve(None);
        assert_ne!(a, b);
    }
}
