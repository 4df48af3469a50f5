use std::env;

use anyhow::{Result, bail};

pub const PRIMARY_TOKEN_VAR: &str = "GH_TOKEN";
pub const FALLBACK_TOKEN_VAR: &str = "GITHUB_TOKEN";

pub trait CredentialSources {
    fn env_var(&self, name: &str) -> Option<String>;
}

#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    pub value: String,
    pub source: &'static str,
}

// Keep the token out of debug output and logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("value", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}

pub fn resolve_credential<S: CredentialSources>(sources: &S) -> Result<Credential> {
    for name in [PRIMARY_TOKEN_VAR, FALLBACK_TOKEN_VAR] {
        let token = sources.env_var(name).and_then(non_blank);
        if let Some(value) = token {
            return Ok(Credential {
                value,
                source: name,
            });
        }
    }

    bail!(
        "GitHub token not found. Please set the {} environment variable.",
        PRIMARY_TOKEN_VAR
    )
}

pub struct SystemEnv;

impl SystemEnv {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialSources for SystemEnv {
    fn env_var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}

// Blank values count as unset; anything else is sent exactly as given.
fn non_blank(raw: String) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    Some(raw)
}
