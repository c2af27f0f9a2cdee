use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

use crate::{error::ValibotError, utils::quote};

lazy_static! {
    static ref SUFFIX: Regex = Regex::new(r"^[A-Za-z0-9_$]*$").unwrap();
}

pub const DEFAULT_SCHEMA_SUFFIX: &str = "Schema";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateOptions {
    /// Appended to every message name to form its exported constant.
    pub schema_suffix: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        GenerateOptions { schema_suffix: DEFAULT_SCHEMA_SUFFIX.to_string() }
    }
}

impl GenerateOptions {
    pub fn with_schema_suffix(suffix: &str) -> Result<Self, ValibotError> {
        if !SUFFIX.is_match(suffix) {
            return Err(ValibotError::InvalidParameter(format!(
                "schema_suffix {} is not a valid identifier suffix",
                quote(suffix)
            )));
        }
        Ok(GenerateOptions { schema_suffix: suffix.to_string() })
    }

    /// Parse a protoc plugin parameter string: `key=value` pairs separated by
    /// commas. Unknown keys are rejected.
    pub fn from_parameter(parameter: &str) -> Result<Self, ValibotError> {
        let mut options = GenerateOptions::default();

        for part in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            match key.trim() {
                "schema_suffix" => options = Self::with_schema_suffix(value.trim())?,
                other => {
                    return Err(ValibotError::InvalidParameter(format!(
                        "unknown option {}",
                        quote(other)
                    )))
                }
            }
        }

        Ok(options)
    }
}
