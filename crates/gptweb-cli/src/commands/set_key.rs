use std::sync::Arc;

use anyhow::Result;
use gptweb_application::CredentialService;
use gptweb_infrastructure::SettingsStorage;
use gptweb_interaction::OpenAIApiAgent;

pub async fn run(storage: SettingsStorage, key: &str) -> Result<()> {
    let validator = Arc::new(OpenAIApiAgent::new(key));
    let service = CredentialService::new(validator, Arc::new(storage));

    service.set_api_key(key).await?;
    eprintln!("API key saved.");
    Ok(())
}
