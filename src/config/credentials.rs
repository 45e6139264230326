// src/config/credentials.rs
use std::fmt;

pub const ENV_APP_ID: &str = "ONESIGNAL_APP_ID";
pub const ENV_API_KEY: &str = "ONESIGNAL_API_KEY";

/// Push-service credentials as found in the environment. Either may be
/// missing; presence is enforced right before dispatch.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PushCredentialsConfig {
    pub app_id: Option<String>,
    pub api_key: Option<String>,
}

impl PushCredentialsConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        Self {
            app_id: read(ENV_APP_ID),
            api_key: read(ENV_API_KEY),
        }
    }
}

// Never print the key itself.
impl fmt::Debug for PushCredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PushCredentialsConfig")
            .field("app_id", &self.app_id)
            .field("api_key_len", &self.api_key.as_ref().map(String::len))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values_are_missing() {
        let c = PushCredentialsConfig::from_lookup(|k| match k {
            ENV_APP_ID => Some("  ".into()),
            ENV_API_KEY => Some(" secret ".into()),
            _ => None,
        });
        assert_eq!(c.app_id, None);
        assert_eq!(c.api_key.as_deref(), Some("secret"));
    }

    #[test]
    fn debug_hides_key() {
        let c = PushCredentialsConfig {
            app_id: Some("app".into()),
            api_key: Some("super-secret".into()),
        };
        let s = format!("{c:?}");
        assert!(!s.contains("super-secret"), "{s}");
        assert!(s.contains("api_key_len: Some(12)"), "{s}");
    }
}
