//! Small newtypes shared across the walker, registry and reduction
//! subsystem.

use std::num::NonZeroU32;
use serde::{Deserialize, Serialize};

/// A stable identity assigned to a value the first time the export walker
/// observes it. Used as the memo key instead of the value's address, which
/// sidesteps the identity hazard described in spec.md Sec.5/Sec.9: an
/// address can be reused once its owner is dropped, a `ValueId` never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueId(NonZeroU32);

impl ValueId {
    pub fn new(value: u32) -> Option<Self> {
        NonZeroU32::new(value).map(Self)
    }

    pub fn value(&self) -> u32 {
        self.0.get()
    }
}

/// Hands out increasing [`ValueId`]s for the duration of one save.
#[derive(Debug, Default)]
pub struct ValueIdAllocator {
    next: u32,
}

impl ValueIdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn alloc(&mut self) -> ValueId {
        let id = ValueId::new(self.next).expect("counter starts at 1 and only increments");
        self.next += 1;
        id
    }
}

/// A registered type tag, e.g. `"list"`, `"ndarray"`, `"reduction"`.
/// Newtype over a static string so registry lookups can't be confused with
/// arbitrary user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tag(pub &'static str);

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub type CompactString = Box<str>;

pub fn compact_string(s: &str) -> CompactString {
    s.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_id_creation() {
        assert!(ValueId::new(0).is_none());
        let id = ValueId::new(42).unwrap();
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_value_id_allocator_increments() {
        let mut alloc = ValueIdAllocator::new();
        let a = alloc.alloc();
        let b = alloc.alloc();
        assert_ne!(a, b);
        assert_eq!(a.value() + 1, b.value());
    }

    #[test]
    fn test_tag_display() {
        let tag = Tag("list");
        assert_eq!(tag.to_string(), "list");
    }

    #[test]
    fn test_compact_string() {
        let s = compact_string("hello world");
        assert_eq!(&*s, "hello world");
    }

    #[test]
    fn test_id_equality_and_hash() {
        let id1 = ValueId::new(42).unwrap();
        let id2 = ValueId::new(42).unwrap();
        let id3 = ValueId::new(43).unwrap();

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);

        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(id1);
        assert!(set.contains(&id2));
        assert!(!set.contains(&id3));
    }
}
