//! Credentials for the embedding/chat service and the vector database.

use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// The credentials cinematch needs, named by the variable that carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Credential {
    OpenAiApiKey,
    SupabaseServiceRoleKey,
}

impl Credential {
    pub const ALL: [Self; 2] = [Self::OpenAiApiKey, Self::SupabaseServiceRoleKey];

    #[must_use]
    pub const fn env_var(self) -> &'static str {
        match self {
            Self::OpenAiApiKey => "OPENAI_API_KEY",
            Self::SupabaseServiceRoleKey => "SUPABASE_SERVICE_ROLE_KEY",
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

/// A credential value. Never printed.
#[derive(Clone)]
pub struct Secret(String);

impl Secret {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

pub type SecretFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<Option<Secret>>> + Send + 'a>>;

/// Where credentials are looked up. `Ok(None)` means the credential is not configured.
pub trait VaultProvider: Send + Sync {
    fn fetch(&self, credential: Credential) -> SecretFuture<'_>;
}

/// Reads each credential from its environment variable. Blank values count as unset.
pub struct EnvVaultProvider;

impl VaultProvider for EnvVaultProvider {
    fn fetch(&self, credential: Credential) -> SecretFuture<'_> {
        let value = std::env::var(credential.env_var())
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(Secret::new);
        Box::pin(std::future::ready(Ok(value)))
    }
}

#[cfg(test)]
#[derive(Default)]
pub(crate) struct FixedVault {
    values: std::collections::HashMap<Credential, String>,
}

#[cfg(test)]
impl FixedVault {
    pub(crate) fn with(mut self, credential: Credential, value: &str) -> Self {
        self.values.insert(credential, value.to_owned());
        self
    }
}

#[cfg(test)]
impl VaultProvider for FixedVault {
    fn fetch(&self, credential: Credential) -> SecretFuture<'_> {
        let value = self.values.get(&credential).cloned().map(Secret::new);
        Box::pin(std::future::ready(Ok(value)))
    }
}
