//! Configuration to override what the resolver detects.
//!
//! This is mostly useful to test how an application behaves on a different Windows 10 release
//! than the one it runs on.

use std::str::FromStr;

use crate::{CapabilityError, Windows10Release};

/// The environment variable consulted by [`Override::DefaultEnvVar`] for the release.
pub const RELEASE_OVERRIDE_ENV_VAR: &str = "OSCAP_OVERRIDE_RELEASE";

/// Describes where an overridden value comes from.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum Override {
    /// Read the value from the default environment variable of the setting.
    #[default]
    DefaultEnvVar,

    /// Read the value from the given environment variable.
    EnvVar(String),

    /// Use the given value.
    String(String),
}

/// Overrides for the facts detected by [`crate::CapabilityResolver`].
///
/// A `None` field means the fact is detected from the operating system.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CapabilityOverrides {
    /// Overrides the resolved [`Windows10Release`].
    pub release: Option<Override>,
}

/// An error that occurs when an override cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum ParseOverrideError {
    /// The value of an override is not valid.
    #[error("invalid value for the {name} override")]
    InvalidValue {
        /// The name of the setting.
        name: &'static str,
        /// The reason the value was rejected.
        #[source]
        source: CapabilityError,
    },

    /// The environment variable contains data that is not valid unicode.
    #[error("environment variable '{0}' is not valid unicode")]
    NotUnicode(String),
}

impl CapabilityOverrides {
    /// Overrides that read every value from its default environment variable.
    pub fn from_env() -> Self {
        Self {
            release: Some(Override::DefaultEnvVar),
        }
    }

    /// Overrides that force the resolved release to the given value.
    pub fn with_release(release: Windows10Release) -> Self {
        Self {
            release: Some(Override::String(release.as_str().to_string())),
        }
    }

    /// Returns the release to use instead of the detected one, if any.
    pub fn release(&self) -> Result<Option<Windows10Release>, ParseOverrideError> {
        let Some(release) = &self.release else {
            return Ok(None);
        };
        let Some(value) = release.value(RELEASE_OVERRIDE_ENV_VAR)? else {
            return Ok(None);
        };
        tracing::debug!("overriding the Windows 10 release with '{value}'");
        Windows10Release::from_str(&value)
            .map(Some)
            .map_err(|source| ParseOverrideError::InvalidValue {
                name: "release",
                source,
            })
    }
}

impl Override {
    /// Returns the value of the override. Returns `None` if the environment variable that is
    /// consulted is not set or empty.
    fn value(&self, default_env_var: &str) -> Result<Option<String>, ParseOverrideError> {
        let env_var = match self {
            Override::String(value) => return Ok(Some(value.clone())),
            Override::DefaultEnvVar => default_env_var,
            Override::EnvVar(name) => name.as_str(),
        };
        match std::env::var(env_var) {
            Ok(value) if value.trim().is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(ParseOverrideError::NotUnicode(env_var.to_string()))
            }
        }
    }
}
