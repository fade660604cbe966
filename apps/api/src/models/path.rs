//! Dotted/indexed path resolver over profile JSON (`a.b[2].c`).
//!
//! The overlay editor reads a field's current value through the same path a
//! `FieldZone` carries and writes edits back through it.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("Malformed path '{path}': {reason}")]
    Malformed { path: String, reason: String },

    #[error("Path '{path}' expects {expected} at segment {segment}")]
    TypeMismatch {
        path: String,
        segment: usize,
        expected: &'static str,
    },

    #[error("Index {index} out of range (len {len}) in path '{path}'")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },
}

/// Splits a path into key and index segments.
///
/// Accepts `name`, `a.b`, `a[0]`, `a[0].b[12].c` and `[3]` at the root.
pub fn parse_path(path: &str) -> Result<Vec<PathSegment>, PathError> {
    let malformed = |reason: &str| PathError::Malformed {
        path: path.to_string(),
        reason: reason.to_string(),
    };

    if path.trim().is_empty() {
        return Err(malformed("path is empty"));
    }

    let mut segments = Vec::new();
    let mut key = String::new();
    let mut chars = path.chars().peekable();
    // True right after a `]`, where only `.`, `[` or the end may follow.
    let mut after_index = false;

    while let Some(c) = chars.next() {
        match c {
            '.' => {
                if key.is_empty() && !after_index {
                    return Err(malformed("empty key segment"));
                }
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                }
                after_index = false;
                if chars.peek().is_none() {
                    return Err(malformed("trailing '.'"));
                }
            }
            '[' => {
                if !key.is_empty() {
                    segments.push(PathSegment::Key(std::mem::take(&mut key)));
                }
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(']') => break,
                        Some(d) if d.is_ascii_digit() => digits.push(d),
                        Some(_) => return Err(malformed("index must be a non-negative integer")),
                        None => return Err(malformed("unclosed '['")),
                    }
                }
                let index = digits
                    .parse::<usize>()
                    .map_err(|_| malformed("index must be a non-negative integer"))?;
                segments.push(PathSegment::Index(index));
                after_index = true;
            }
            ']' => return Err(malformed("unexpected ']'")),
            other => {
                if after_index {
                    return Err(malformed("expected '.' or '[' after index"));
                }
                key.push(other);
            }
        }
    }
    if !key.is_empty() {
        segments.push(PathSegment::Key(key));
    }
    Ok(segments)
}

/// Reads the value at `path`. Missing segments and malformed paths read as `None`.
pub fn get<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    let segments = parse_path(path).ok()?;
    segments
        .iter()
        .try_fold(root, |current, segment| match segment {
            PathSegment::Key(k) => current.as_object()?.get(k),
            PathSegment::Index(i) => current.as_array()?.get(*i),
        })
}

/// Writes `value` at `path`, creating missing object keys along the way.
///
/// Arrays accept an existing index or `len` (append); anything further is an error.
/// A `null` intermediate is replaced by the container the next segment needs.
pub fn set(root: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    let segments = parse_path(path)?;
    let last = segments.len() - 1;
    let mut current = root;

    for (i, segment) in segments.iter().enumerate() {
        let is_last = i == last;
        let next_container = || match segments.get(i + 1) {
            Some(PathSegment::Index(_)) => Value::Array(Vec::new()),
            _ => Value::Object(Map::new()),
        };

        match segment {
            PathSegment::Key(key) => {
                if current.is_null() {
                    *current = Value::Object(Map::new());
                }
                let map = current.as_object_mut().ok_or_else(|| PathError::TypeMismatch {
                    path: path.to_string(),
                    segment: i,
                    expected: "an object",
                })?;
                if is_last {
                    map.insert(key.clone(), value);
                    return Ok(());
                }
                current = map.entry(key.clone()).or_insert_with(next_container);
            }
            PathSegment::Index(index) => {
                if current.is_null() {
                    *current = Value::Array(Vec::new());
                }
                let list = current.as_array_mut().ok_or_else(|| PathError::TypeMismatch {
                    path: path.to_string(),
                    segment: i,
                    expected: "an array",
                })?;
                let len = list.len();
                if *index > len {
                    return Err(PathError::IndexOutOfRange {
                        path: path.to_string(),
                        index: *index,
                        len,
                    });
                }
                if *index == len {
                    list.push(if is_last { Value::Null } else { next_container() });
                }
                if is_last {
                    list[*index] = value;
                    return Ok(());
                }
                current = &mut list[*index];
            }
        }
    }
    Ok(())
}
