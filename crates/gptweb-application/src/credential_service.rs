//! API key entry: validate with the remote service, then persist.

use std::sync::Arc;

use gptweb_core::GptWebError;
use gptweb_core::config::Settings;
use gptweb_core::error::Result;
use gptweb_core::remote::CredentialValidator;
use gptweb_infrastructure::SettingsStorage;

pub struct CredentialService {
    validator: Arc<dyn CredentialValidator>,
    storage: Arc<SettingsStorage>,
}

impl CredentialService {
    pub fn new(validator: Arc<dyn CredentialValidator>, storage: Arc<SettingsStorage>) -> Self {
        Self { validator, storage }
    }

    /// Validates `api_key` and stores it.
    ///
    /// # Errors
    ///
    /// `InvalidCredential` when the key is blank or rejected; nothing is
    /// written in that case.
    pub async fn set_api_key(&self, api_key: &str) -> Result<Settings> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GptWebError::invalid_credential("The API Key can not be empty"));
        }

        self.validator.validate(api_key).await?;

        let settings = self
            .storage
            .update(|settings| settings.api_key = api_key.to_string())?;
        tracing::info!(
            "[CredentialService] API key saved to {}",
            self.storage.path().display()
        );
        Ok(settings)
    }
}
