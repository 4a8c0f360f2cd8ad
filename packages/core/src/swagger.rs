//! Swagger spec cleanup.
//!
//! Generated swagger specs can contain definitions whose `$ref` points back
//! at the definition itself (`"Foo": {"$ref": "#/definitions/Foo"}`), which
//! some consumers reject as circular. [`strip_self_refs`] removes those
//! `$ref` fields and leaves every other definition untouched.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use thiserror::Error;

pub const REF_KEY: &str = "$ref";
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

#[derive(Error, Debug)]
pub enum SwaggerError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid swagger JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no definitions")]
    MissingDefinitions,

    #[error("definitions must be a JSON object")]
    InvalidDefinitions,
}

/// Remove self-referencing `$ref` fields from `doc["definitions"]`.
///
/// Returns the `$ref` values removed, in definition key order. Entries that
/// are not objects, or whose `$ref` is not a string, are left alone.
pub fn strip_self_refs(doc: &mut Value) -> Result<Vec<String>, SwaggerError> {
    let definitions = doc
        .get_mut("definitions")
        .ok_or(SwaggerError::MissingDefinitions)?
        .as_object_mut()
        .ok_or(SwaggerError::InvalidDefinitions)?;

    let mut removed = Vec::new();
    for (key, definition) in definitions.iter_mut() {
        let Some(fields) = definition.as_object_mut() else {
            continue;
        };

        let is_self_ref = fields
            .get(REF_KEY)
            .and_then(Value::as_str)
            .map(|target| target.strip_prefix(DEFINITIONS_PREFIX).unwrap_or(target) == key.as_str())
            .unwrap_or(false);

        if is_self_ref {
            if let Some(Value::String(target)) = fields.remove(REF_KEY) {
                removed.push(target);
            }
        }
    }

    Ok(removed)
}

/// Serialize with single-space indentation.
pub fn to_indented_json(doc: &Value) -> Result<Vec<u8>, SwaggerError> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b" "));
    doc.serialize(&mut serializer)?;
    Ok(out)
}

/// Read `input`, strip self references, write the result to `output`.
pub fn clean_file(input: &Path, output: &Path) -> Result<Vec<String>, SwaggerError> {
    let bytes = fs::read(input).map_err(|source| SwaggerError::Read {
        path: input.to_path_buf(),
        source,
    })?;

    let mut doc: Value = serde_json::from_slice(&bytes)?;
    let removed = strip_self_refs(&mut doc)?;

    fs::write(output, to_indented_json(&doc)?).map_err(|source| SwaggerError::Write {
        path: output.to_path_buf(),
        source,
    })?;

    Ok(removed)
}
