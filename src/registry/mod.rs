//! The type registry (spec.md Sec.4.2/Sec.9): the tag <-> kind mapping
//! written as the `"type"` attribute on every node. The original
//! implementation resolves this through a dynamic, subclass-aware
//! type-to-exporter table (`h5it.base.types`); spec.md Sec.9's
//! "Extensibility" note asks for the Rust replacement — a closed `Value`
//! enum plus an exact-kind-only lookup, no subtype polymorphism.
//!
//! `"reduction"` is reserved: it identifies a [`crate::value::Value::Reduction`]
//! node and has no corresponding `Value` "kind" of its own (the instance's
//! true class lives in the record's constructor, not in the registry).

use std::sync::OnceLock;

use crate::types::Tag;

const REDUCTION_TAG: &str = "reduction";

/// One row of the tag table: the on-disk tag, and the [`crate::value::Value::kind_name`]
/// it corresponds to.
#[derive(Debug, Clone, Copy)]
struct TypeRow {
    tag: Tag,
    kind: &'static str,
}

const ROWS: &[TypeRow] = &[
    TypeRow { tag: Tag("NoneType"), kind: "Absent" },
    TypeRow { tag: Tag("bool"), kind: "Bool" },
    TypeRow { tag: Tag("Number"), kind: "Number" },
    TypeRow { tag: Tag("str"), kind: "Text" },
    TypeRow { tag: Tag("bytes"), kind: "Bytes" },
    TypeRow { tag: Tag("py2_bytes"), kind: "LegacyBytes" },
    TypeRow { tag: Tag("list"), kind: "List" },
    TypeRow { tag: Tag("tuple"), kind: "Tuple" },
    TypeRow { tag: Tag("dict"), kind: "DictStr" },
    // Not in spec.md's closed tag enumeration (Sec.9 only lists a single
    // "dict"); spec.md's Data Model table distinguishes two mapping
    // kinds with different wire representations (direct key-named
    // children vs. hash-named (key,value) pairs), so one tag cannot
    // serve both. `dict` keeps the literal spec tag for the directly
    // key-named variant used by instance state; `dict_hashed` is the
    // documented extension for the arbitrary-key variant (see
    // DESIGN.md's Open Question decision 9).
    TypeRow { tag: Tag("dict_hashed"), kind: "Dict" },
    TypeRow { tag: Tag("set"), kind: "Set" },
    TypeRow { tag: Tag("ndarray"), kind: "Array" },
    TypeRow { tag: Tag("pathlib.PosixPath"), kind: "Path" },
    TypeRow { tag: Tag("pathlib.WindowsPath"), kind: "Path" },
    TypeRow { tag: Tag("global"), kind: "Global" },
];

/// The process-wide tag table. Exact-kind lookup only: a value's concrete
/// `Value` variant picks exactly one row, never a supertype match.
#[derive(Debug)]
pub struct TypeRegistry {
    rows: &'static [TypeRow],
}

static REGISTRY: OnceLock<TypeRegistry> = OnceLock::new();

impl TypeRegistry {
    pub fn global() -> &'static TypeRegistry {
        REGISTRY.get_or_init(|| TypeRegistry { rows: ROWS })
    }

    pub fn kind_for_tag(&self, tag: &str) -> Option<&'static str> {
        if tag == REDUCTION_TAG {
            return None;
        }
        self.rows.iter().find(|r| r.tag.0 == tag).map(|r| r.kind)
    }

    pub fn tag_for_kind(&self, kind: &str) -> Option<Tag> {
        self.rows.iter().find(|r| r.kind == kind).map(|r| r.tag)
    }

    pub fn is_reduction_tag(&self, tag: &str) -> bool {
        tag == REDUCTION_TAG
    }

    pub fn reduction_tag(&self) -> Tag {
        Tag(REDUCTION_TAG)
    }

    /// Paths are special-cased: the same `Value::Path` kind maps to one
    /// of two tags depending on [`crate::value::PathFlavor`], so callers
    /// writing a path must not use `tag_for_kind("Path")` — it would
    /// return whichever row comes first.
    pub fn tag_for_path_flavor(&self, flavor: crate::value::PathFlavor) -> Tag {
        match flavor {
            crate::value::PathFlavor::Posix => Tag("pathlib.PosixPath"),
            crate::value::PathFlavor::Windows => Tag("pathlib.WindowsPath"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_for_tag_roundtrips_tag_for_kind() {
        let registry = TypeRegistry::global();
        let tag = registry.tag_for_kind("List").unwrap();
        assert_eq!(registry.kind_for_tag(tag.0), Some("List"));
    }

    #[test]
    fn test_reduction_tag_has_no_kind() {
        let registry = TypeRegistry::global();
        assert!(registry.is_reduction_tag("reduction"));
        assert_eq!(registry.kind_for_tag("reduction"), None);
    }

    #[test]
    fn test_unknown_tag_has_no_kind() {
        let registry = TypeRegistry::global();
        assert_eq!(registry.kind_for_tag("not-a-real-tag"), None);
    }

    #[test]
    fn test_path_flavor_resolves_distinct_tags() {
        let registry = TypeRegistry::global();
        assert_eq!(
            registry.tag_for_path_flavor(crate::value::PathFlavor::Posix).0,
            "pathlib.PosixPath"
        );
        assert_eq!(
            registry.tag_for_path_flavor(crate::value::PathFlavor::Windows).0,
            "pathlib.WindowsPath"
        );
    }
}
