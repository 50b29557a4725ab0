//! Input/Output format handling

use std::path::Path;

use base64::Engine;
use clap::ValueEnum;
use fractus_shamir::share::parse_index;
use fractus_shamir::Share;
use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::CliError;

/// Key of the object holding the threshold and share count.
pub const KEYS_FIELD: &str = "keys";

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Yaml,
}

#[derive(ValueEnum, Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Decimal,
    Hex,
    Base64,
}

impl InputFormat {
    /// Picks a format from the file extension, if it has a known one.
    pub fn detect_from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    pub fn detect_from_content(content: &str) -> Self {
        if content.trim_start().starts_with('{') {
            Self::Json
        } else {
            Self::Yaml
        }
    }
}

impl OutputFormat {
    /// Renders a secret in this format.
    ///
    /// Hex keeps the sign in front of the digits; base64 encodes the
    /// big-endian two's-complement bytes.
    pub fn render(&self, secret: &BigInt) -> String {
        match self {
            Self::Decimal => secret.to_string(),
            Self::Hex => format!("{:x}", secret),
            Self::Base64 => {
                base64::engine::general_purpose::STANDARD.encode(secret.to_signed_bytes_be())
            }
        }
    }
}

/// The `keys` object of a share document.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Keys {
    /// Number of shares the secret was split into (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub n: Option<usize>,

    /// Threshold: shares needed to recover the secret
    pub k: usize,
}

/// Body of a single share entry.
#[derive(Deserialize, Clone, Debug)]
struct ShareEntry {
    base: ScalarField,
    value: ScalarField,
}

/// A base or value written either as a string or as a bare integer.
///
/// YAML reads unquoted digit runs as numbers, so `value: 111` must be
/// accepted the same as `value: '111'`.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
enum ScalarField {
    Number(serde_json::Number),
    Text(String),
}

impl ScalarField {
    /// Text form of the field. Floats are refused: a YAML integer too wide
    /// for 64 bits arrives as an `f64` and has already lost digits.
    fn into_text(self) -> Result<String, String> {
        match self {
            Self::Number(n) if n.is_f64() => Err(format!(
                "number {} is not an exact integer; quote the digits as a string",
                n
            )),
            Self::Number(n) => Ok(n.to_string()),
            Self::Text(s) => Ok(s),
        }
    }
}

/// A parsed share document: the declared keys and one raw record per entry.
#[derive(Clone, Debug)]
pub struct ShareDocument {
    pub keys: Keys,
    pub records: Vec<Share>,
    /// Entries with neither a valid index nor a well-formed body
    pub skipped: Vec<String>,
}

impl ShareDocument {
    pub fn parse(content: &str, format: InputFormat) -> Result<Self, CliError> {
        let object = match format {
            InputFormat::Json => parse_json(content)?,
            InputFormat::Yaml => parse_yaml(content)?,
        };
        Self::from_object(object)
    }

    fn from_object(mut object: Map<String, Value>) -> Result<Self, CliError> {
        let keys = object.remove(KEYS_FIELD).ok_or(CliError::MissingKeys)?;
        let keys: Keys = serde_json::from_value(keys)
            .map_err(|e| CliError::InvalidFormat(format!("'{}' object: {}", KEYS_FIELD, e)))?;

        let mut records = Vec::with_capacity(object.len());
        let mut skipped = Vec::new();

        for (key, body) in object {
            let entry = serde_json::from_value::<ShareEntry>(body)
                .map_err(|e| e.to_string())
                .and_then(|entry| Ok((entry.base.into_text()?, entry.value.into_text()?)));

            match entry {
                Ok((base, value)) => records.push(Share::new(key, base, value)),
                // The core skips bad indices itself; only a valid index makes
                // a malformed body fatal.
                Err(reason) if parse_index(&key).is_ok() => {
                    return Err(CliError::MalformedEntry { key, reason });
                }
                Err(_) => {
                    log::warn!("Could not parse key '{}' as an integer, skipping", key);
                    skipped.push(key);
                }
            }
        }

        Ok(Self {
            keys,
            records,
            skipped,
        })
    }
}

fn parse_json(content: &str) -> Result<Map<String, Value>, CliError> {
    match serde_json::from_str::<Value>(content) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(_) => Err(CliError::InvalidFormat(
            "share document must be an object".to_string(),
        )),
        Err(e) => Err(CliError::InvalidFormat(format!("JSON: {}", e))),
    }
}

fn parse_yaml(content: &str) -> Result<Map<String, Value>, CliError> {
    let document: serde_yaml::Value = serde_yaml::from_str(content)
        .map_err(|e| CliError::InvalidFormat(format!("YAML: {}", e)))?;

    let serde_yaml::Value::Mapping(mapping) = document else {
        return Err(CliError::InvalidFormat(
            "share document must be a mapping".to_string(),
        ));
    };

    let mut object = Map::new();
    for (key, value) in mapping {
        // YAML allows bare integer keys, which JSON spells as strings
        let key = match key {
            serde_yaml::Value::String(s) => s,
            serde_yaml::Value::Number(n) => n.to_string(),
            // Any other key is not an index; keep its text so it gets skipped
            other => serde_yaml::to_string(&other)
                .map(|text| text.trim_end().to_string())
                .unwrap_or_else(|_| format!("{:?}", other)),
        };
        let value = serde_json::to_value(value)
            .map_err(|e| CliError::InvalidFormat(format!("entry '{}': {}", key, e)))?;
        object.insert(key, value);
    }

    Ok(object)
}
