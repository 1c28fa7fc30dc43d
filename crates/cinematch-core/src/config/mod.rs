mod env;
mod types;

#[cfg(test)]
mod tests;

pub use types::*;

use std::path::Path;

use anyhow::{Context, bail, ensure};

use crate::vault::{Credential, Secret, VaultProvider};

impl Config {
    /// Load configuration from a TOML file with env var overrides.
    ///
    /// Falls back to defaults when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str::<Self>(&content).context("failed to parse config file")?
        } else {
            tracing::debug!("config file {} not found, using defaults", path.display());
            Self::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Reject values the external services would refuse or silently misuse.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first invalid setting.
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(!self.llm.model.trim().is_empty(), "llm.model must not be empty");
        ensure!(
            !self.llm.embedding_model.trim().is_empty(),
            "llm.embedding_model must not be empty"
        );
        ensure!(
            (0.0..=2.0).contains(&self.llm.temperature),
            "llm.temperature must be within [0, 2], got {}",
            self.llm.temperature
        );
        ensure!(
            (-2.0..=2.0).contains(&self.llm.frequency_penalty),
            "llm.frequency_penalty must be within [-2, 2], got {}",
            self.llm.frequency_penalty
        );
        ensure!(
            self.retrieval.match_count > 0,
            "retrieval.match_count must be at least 1"
        );
        ensure!(
            (-1.0..=1.0).contains(&self.retrieval.match_threshold),
            "retrieval.match_threshold must be within [-1, 1], got {}",
            self.retrieval.match_threshold
        );
        ensure!(
            !self.retrieval.function.trim().is_empty(),
            "retrieval.function must not be empty"
        );
        if !self.gateway.path.starts_with('/') {
            bail!(
                "gateway.path must start with '/', got {:?}",
                self.gateway.path
            );
        }
        ensure!(
            self.gateway.path != "/health",
            "gateway.path must not shadow /health"
        );
        Ok(())
    }

    /// Look up every [`Credential`] in the vault. Credentials the vault does
    /// not know stay unset; `main` decides whether that is fatal.
    ///
    /// # Errors
    ///
    /// Returns an error if the vault backend fails.
    pub async fn resolve_secrets(&mut self, vault: &dyn VaultProvider) -> anyhow::Result<()> {
        for credential in Credential::ALL {
            if let Some(secret) = vault.fetch(credential).await? {
                tracing::debug!(%credential, "credential resolved");
                self.secrets.set(credential, secret);
            }
        }
        Ok(())
    }
}

impl ResolvedSecrets {
    #[must_use]
    pub fn get(&self, credential: Credential) -> Option<&Secret> {
        match credential {
            Credential::OpenAiApiKey => self.openai_api_key.as_ref(),
            Credential::SupabaseServiceRoleKey => self.supabase_service_key.as_ref(),
        }
    }

    pub fn set(&mut self, credential: Credential, secret: Secret) {
        match credential {
            Credential::OpenAiApiKey => self.openai_api_key = Some(secret),
            Credential::SupabaseServiceRoleKey => self.supabase_service_key = Some(secret),
        }
    }

    /// # Errors
    ///
    /// Returns an error naming the variable when the credential is missing.
    pub fn require(&self, credential: Credential) -> anyhow::Result<&Secret> {
        self.get(credential)
            .with_context(|| format!("{credential} is not set"))
    }
}
