//! Environment variable backend

use std::env::VarError;

use crate::error::GetError;

/// Read an environment variable. An unset variable is `""`, not an error.
pub fn resolve(var_name: &str) -> Result<String, GetError> {
    match std::env::var(var_name) {
        Ok(value) => Ok(value),
        Err(VarError::NotPresent) => {
            tracing::debug!(var = var_name, "Environment variable not set");
            Ok(String::new())
        }
        Err(VarError::NotUnicode(_)) => Err(GetError::Env {
            var: var_name.to_string(),
            reason: "is not valid unicode".to_string(),
        }),
    }
}
