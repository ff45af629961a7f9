//! Naming helpers for the container-traversal kinds (spec.md Sec.4.2/4.3).
//! Lists and tuples name children by a zero-padded index; dicts and sets
//! whose keys aren't all plain text name children by a hash of the key,
//! since HDF5 child names must be valid, distinct strings.
//!
//! The actual recursive export/import of these kinds lives in
//! [`crate::walker`] — it owns the identity memo that child recursion
//! needs, this module only computes names.

use sha2::{Digest, Sha256};

use crate::error::DeserializationError;
use crate::value::Value;

/// `0007` for index 7 of a 10000-element list, wide enough that sorting
/// the child names lexicographically matches sorting them numerically.
pub fn index_name(index: usize, total: usize) -> String {
    let width = total.to_string().len().max(1);
    format!("{index:0width$}", width = width)
}

pub fn parse_index_name(name: &str) -> Option<usize> {
    name.parse().ok()
}

/// Confirms `names` are exactly `0..names.len()` once parsed, in any
/// order; returns them sorted. Mirrors the original's
/// `h5_import`/`load_list` sanity check (spec.md Sec.4.3 edge case).
pub fn check_contiguous(
    node_path: &str,
    names: &[String],
) -> Result<Vec<usize>, DeserializationError> {
    let mut indices: Vec<usize> = Vec::with_capacity(names.len());
    for name in names {
        match parse_index_name(name) {
            Some(i) => indices.push(i),
            None => {
                return Err(DeserializationError::NonContiguousList {
                    node_path: node_path.to_string(),
                    expected_len: names.len(),
                    found: Vec::new(),
                });
            }
        }
    }
    indices.sort_unstable();
    let expected: Vec<usize> = (0..names.len()).collect();
    if indices != expected {
        return Err(DeserializationError::NonContiguousList {
            node_path: node_path.to_string(),
            expected_len: names.len(),
            found: indices,
        });
    }
    Ok(indices)
}

/// A stable, canonical byte encoding of a `Value` used as a dict/set
/// hash-naming input. Not a public serialization format — only required
/// to be deterministic for equal keys.
fn canonical_bytes(value: &Value, out: &mut Vec<u8>) {
    match value {
        Value::Absent => out.push(0),
        Value::Bool(b) => {
            out.push(1);
            out.push(*b as u8);
        }
        Value::Number(n) => {
            out.push(2);
            match n {
                crate::value::Number::Int(i) => out.extend_from_slice(&i.to_le_bytes()),
                crate::value::Number::Float(f) => out.extend_from_slice(&f.to_le_bytes()),
                crate::value::Number::Complex(c) => {
                    out.extend_from_slice(&c.re.to_le_bytes());
                    out.extend_from_slice(&c.im.to_le_bytes());
                }
            }
        }
        Value::Text(s) => {
            out.push(3);
            out.extend_from_slice(s.as_bytes());
        }
        Value::Bytes(b) | Value::LegacyBytes(b) => {
            out.push(4);
            out.extend_from_slice(b);
        }
        Value::Tuple(items) => {
            out.push(5);
            for item in items.iter() {
                canonical_bytes(item, out);
            }
        }
        Value::Path(_, text) => {
            out.push(6);
            out.extend_from_slice(text.as_bytes());
        }
        Value::Global { module, name } => {
            out.push(7);
            out.extend_from_slice(module.as_bytes());
            out.extend_from_slice(name.as_bytes());
        }
        other => unreachable!("unhashable kind '{}' must be rejected by is_hashable_key before reaching canonical_bytes", other.kind_name()),
    }
}

/// Lists, dicts, sets, arrays, reductions and live instances are
/// unhashable as dict/set keys, matching the source's reliance on
/// Python's own `TypeError` for mutable keys. Tuples are hashable (as in
/// Python) as long as their own elements are, which `canonical_bytes`
/// achieves by recursing.
pub fn is_hashable_key(value: &Value) -> bool {
    match value {
        Value::Absent
        | Value::Bool(_)
        | Value::Number(_)
        | Value::Text(_)
        | Value::Bytes(_)
        | Value::LegacyBytes(_)
        | Value::Path(..)
        | Value::Global { .. } => true,
        Value::Tuple(items) => items.iter().all(is_hashable_key),
        Value::List(_)
        | Value::DictStr(_)
        | Value::Dict(_)
        | Value::Set(_)
        | Value::Array(_)
        | Value::Reduction(_)
        | Value::Instance(_) => false,
    }
}

/// The child name for a dict/set entry whose key isn't a plain string:
/// the hex SHA-256 digest of a canonical encoding of the key. Callers
/// must check [`is_hashable_key`] first.
pub fn hash_key_name(key: &Value) -> String {
    let mut bytes = Vec::new();
    canonical_bytes(key, &mut bytes);
    let digest = Sha256::digest(&bytes);
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Number;

    #[test]
    fn test_index_name_zero_pads_to_total_width() {
        assert_eq!(index_name(7, 10000), "0007");
        assert_eq!(index_name(0, 1), "0");
    }

    #[test]
    fn test_check_contiguous_accepts_any_order() {
        let names = vec!["2".to_string(), "0".to_string(), "1".to_string()];
        let indices = check_contiguous("/list", &names).unwrap();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_check_contiguous_rejects_gap() {
        let names = vec!["0".to_string(), "2".to_string()];
        let err = check_contiguous("/list", &names).unwrap_err();
        assert!(matches!(err, DeserializationError::NonContiguousList { .. }));
    }

    #[test]
    fn test_hash_key_name_is_deterministic() {
        let a = hash_key_name(&Value::Number(Number::Int(7)));
        let b = hash_key_name(&Value::Number(Number::Int(7)));
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_hash_key_name_differs_for_different_keys() {
        let a = hash_key_name(&Value::Number(Number::Int(7)));
        let b = hash_key_name(&Value::Number(Number::Int(8)));
        assert_ne!(a, b);
    }
}
