//! Secret references for values such as the application client ID.
//!
//! | Form                  | Resolved from                              |
//! |-----------------------|--------------------------------------------|
//! | `pass::path/in/store` | first line of `pass show path/in/store`    |
//! | `env::VAR_NAME`       | the `VAR_NAME` environment variable        |
//! | anything else         | the literal value                          |
//!
//! Resolved values are trimmed, and a reference that resolves to nothing
//! is an error rather than an empty credential.

use std::fmt;
use std::process::Command;

/// Where a configured value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretRef<'a> {
    Pass(&'a str),
    Env(&'a str),
    Literal(&'a str),
}

impl<'a> SecretRef<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if let Some(path) = raw.strip_prefix("pass::") {
            Self::Pass(path)
        } else if let Some(var) = raw.strip_prefix("env::") {
            Self::Env(var)
        } else {
            Self::Literal(raw)
        }
    }

    /// Looks the value up and rejects it if it is blank.
    pub fn resolve(&self) -> Result<String, String> {
        let value = match *self {
            Self::Pass(path) => pass_show(path)?,
            Self::Env(var) => std::env::var(var)
                .map_err(|_| format!("environment variable `{}` is not set", var))?,
            Self::Literal(value) => value.to_string(),
        };

        let value = value.trim();
        if value.is_empty() {
            return Err(format!("{} resolves to an empty value", self));
        }
        Ok(value.to_string())
    }
}

impl fmt::Display for SecretRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass(path) => write!(f, "pass entry `{}`", path),
            Self::Env(var) => write!(f, "environment variable `{}`", var),
            Self::Literal(_) => f.write_str("literal value"),
        }
    }
}

/// Resolves a raw configured value.
pub fn resolve(raw: &str) -> Result<String, String> {
    SecretRef::parse(raw).resolve()
}

fn pass_show(path: &str) -> Result<String, String> {
    let output = Command::new("pass")
        .args(["show", path])
        .output()
        .map_err(|e| format!("cannot run `pass show {}`: {}", path, e))?;

    if !output.status.success() {
        return Err(format!(
            "`pass show {}` exited with {}: {}",
            path,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_recognises_prefixes() {
        assert_eq!(SecretRef::parse("pass::azure/app"), SecretRef::Pass("azure/app"));
        assert_eq!(SecretRef::parse("env::APP_ID"), SecretRef::Env("APP_ID"));
        assert_eq!(
            SecretRef::parse("11111111-2222-3333-4444-555555555555"),
            SecretRef::Literal("11111111-2222-3333-4444-555555555555")
        );
    }

    #[test]
    fn literal_is_trimmed() {
        assert_eq!(resolve("  client-id \n").unwrap(), "client-id");
    }

    #[test]
    fn env_reference_resolves() {
        unsafe {
            std::env::set_var("_MEETINGS_SECRET_APP_ID", "from-env");
        }
        assert_eq!(resolve("env::_MEETINGS_SECRET_APP_ID").unwrap(), "from-env");
        unsafe {
            std::env::remove_var("_MEETINGS_SECRET_APP_ID");
        }
    }

    #[test]
    fn blank_env_value_is_rejected() {
        unsafe {
            std::env::set_var("_MEETINGS_SECRET_BLANK", "   ");
        }
        let err = resolve("env::_MEETINGS_SECRET_BLANK").unwrap_err();
        assert_eq!(
            err,
            "environment variable `_MEETINGS_SECRET_BLANK` resolves to an empty value"
        );
        unsafe {
            std::env::remove_var("_MEETINGS_SECRET_BLANK");
        }
    }

    #[test]
    fn blank_literal_is_rejected() {
        assert!(resolve("").unwrap_err().contains("empty"));
    }

    #[test]
    fn unset_env_var_is_reported() {
        let err = resolve("env::_MEETINGS_SECRET_NEVER_SET_4242").unwrap_err();
        assert!(err.contains("not set"));
    }

    #[test]
    fn missing_pass_entry_is_an_error() {
        assert!(resolve("pass::meetings/definitely/not/stored/4242").is_err());
    }
}
