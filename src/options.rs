//! Free-form option mappings, their merging and JSON persistence.

use std::{fs, path::Path};
use pyo3::{prelude::*, types::{PyDict, PyList}};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use crate::Error;

/// Placeholder written in place of ignored values by [`Options::save`].
pub const REDACTED: &str = "Removed";

/// An ordered string-keyed mapping of JSON-representable values.
///
/// This is the escape hatch next to the typed option structs: keyword
/// arguments for Matplotlib calls, `rcParams` overrides (see
/// [`Style`](crate::Style)) and run metadata all travel as `Options`.
///
/// # Example
///
/// ```
/// use pubplot::Options;
/// let defaults = Options::new().with("dpi", 600).with("fmt", "png");
/// let user = Options::new().with("dpi", 150);
/// let merged = user.merged_with(&defaults);
/// assert_eq!(merged.get("dpi"), Some(&150.into()));
/// assert_eq!(merged.get("fmt"), Some(&"png".into()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Options {
    entries: Map<String, Value>,
}

impl Options {
    /// Return an empty mapping.
    pub fn new() -> Self {
        Options { entries: Map::new() }
    }

    /// Set `key` to `value`, consuming and returning `self`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>,
                value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Set `key` to `value`, returning the previous value if any.
    pub fn insert(&mut self, key: impl Into<String>,
                  value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Return a new mapping holding every entry of `self` plus every
    /// entry of `defaults` whose key `self` does not define.  On
    /// conflicting keys the value of `self` wins.  Neither input is
    /// modified.
    #[must_use]
    pub fn merged_with(&self, defaults: &Options) -> Options {
        let mut merged = self.entries.clone();
        for (key, value) in &defaults.entries {
            if !merged.contains_key(key) {
                merged.insert(key.clone(), value.clone());
            }
        }
        Options { entries: merged }
    }

    /// Write the mapping to `path` as human-readable JSON, creating
    /// missing parent directories.  The values of the keys listed in
    /// `ignore` are replaced by [`REDACTED`] in the file; `self` is
    /// left untouched and keys absent from the mapping are not added.
    pub fn save(&self, path: impl AsRef<Path>, ignore: &[&str])
                -> Result<(), Error> {
        let path = path.as_ref();
        let mut entries = self.entries.clone();
        for key in ignore {
            if let Some(value) = entries.get_mut(*key) {
                *value = Value::from(REDACTED);
            }
        }
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }
        let mut json = serde_json::to_string_pretty(&entries)?;
        json.push('\n');
        fs::write(path, json)?;
        tracing::debug!(path = %path.display(), keys = entries.len(),
                        redacted = ignore.len(), "saved options");
        Ok(())
    }

    /// Read a mapping previously written by [`Options::save`] (or any
    /// JSON file whose top level is an object).
    pub fn load(path: impl AsRef<Path>) -> Result<Options, Error> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let options: Options = serde_json::from_str(&json)?;
        tracing::debug!(path = %path.display(), keys = options.len(),
                        "loaded options");
        Ok(options)
    }

    /// Convert the mapping to a Python dict, e.g. to pass as keyword
    /// arguments to a Matplotlib call.
    pub fn to_py_dict<'py>(&self, py: Python<'py>) -> &'py PyDict {
        let dict = PyDict::new(py);
        for (key, value) in &self.entries {
            dict.set_item(key, value_to_py(py, value)).unwrap();
        }
        dict
    }
}

impl From<Map<String, Value>> for Options {
    fn from(entries: Map<String, Value>) -> Self {
        Options { entries }
    }
}

impl FromIterator<(String, Value)> for Options {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Options { entries: iter.into_iter().collect() }
    }
}

fn value_to_py(py: Python<'_>, value: &Value) -> PyObject {
    match value {
        Value::Null => py.None(),
        Value::Bool(b) => b.into_py(py),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into_py(py)
            } else if let Some(u) = n.as_u64() {
                u.into_py(py)
            } else {
                // `as_f64` is total on the remaining representations.
                n.as_f64().unwrap_or(f64::NAN).into_py(py)
            }
        }
        Value::String(s) => s.into_py(py),
        Value::Array(items) => {
            let items: Vec<PyObject> =
                items.iter().map(|v| value_to_py(py, v)).collect();
            PyList::new(py, items).into_py(py)
        }
        Value::Object(map) => {
            let dict = PyDict::new(py);
            for (key, value) in map {
                dict.set_item(key, value_to_py(py, value)).unwrap();
            }
            dict.into_py(py)
        }
    }
}
