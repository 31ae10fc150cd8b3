//! Universal login prompt settings, texts and partials (`prompts`).

use crate::context::RequestContext;
use crate::error::{ManagementError, ManagementResult};
use crate::management::Management;
use crate::managers::CustomText;
use crate::options::RequestOptions;
use crate::resource::optional::optional_accessors;
use crate::transport::{Method, Transport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Login experience settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    /// `new` or `classic`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub universal_login_experience: Option<String>,

    /// Ask for the identifier before the password.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier_first: Option<bool>,

    /// Use WebAuthn with device biometrics as the first factor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webauthn_platform_first_factor: Option<bool>,
}

optional_accessors!(Prompt {
    universal_login_experience: str,
    identifier_first: bool,
    webauthn_platform_first_factor: bool,
});

/// Template partials of a prompt, keyed by screen and then by insertion
/// point (`form-content-start`, `form-footer-end`, ...).
pub type PromptPartials = Map<String, Value>;

/// Manages prompt settings.
pub struct PromptManager<'m, T> {
    management: &'m Management<T>,
}

impl<'m, T: Transport> PromptManager<'m, T> {
    pub fn new(management: &'m Management<T>) -> Self {
        Self { management }
    }

    pub async fn read(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<Prompt> {
        let url = self.management.uri(&["prompts"])?;
        self.management.fetch(ctx, url, options).await
    }

    /// Update the settings present in `prompt`. The stored settings are read
    /// back into it.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        prompt: &mut Prompt,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.management.uri(&["prompts"])?;
        let payload = serde_json::to_value(&*prompt).map_err(ManagementError::encoding)?;
        self.management
            .request(ctx, Method::Patch, url, Some(&payload), Some(prompt), options)
            .await
    }

    /// Custom texts of `prompt` in `language`.
    pub async fn custom_text(
        &self,
        ctx: &RequestContext,
        prompt: &str,
        language: &str,
        options: &RequestOptions,
    ) -> ManagementResult<CustomText> {
        let url = self
            .management
            .uri(&["prompts", prompt, "custom-text", language])?;
        self.management.fetch(ctx, url, options).await
    }

    /// Replace the custom texts of `prompt` in `language`. An empty map
    /// removes every customization.
    pub async fn set_custom_text(
        &self,
        ctx: &RequestContext,
        prompt: &str,
        language: &str,
        texts: &CustomText,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self
            .management
            .uri(&["prompts", prompt, "custom-text", language])?;
        self.management
            .send(ctx, Method::Put, url, Some(texts), options)
            .await
    }

    pub async fn partials(
        &self,
        ctx: &RequestContext,
        prompt: &str,
        options: &RequestOptions,
    ) -> ManagementResult<PromptPartials> {
        let url = self.management.uri(&["prompts", prompt, "partials"])?;
        self.management.fetch(ctx, url, options).await
    }

    /// Replace the partials of `prompt`.
    pub async fn set_partials(
        &self,
        ctx: &RequestContext,
        prompt: &str,
        partials: &PromptPartials,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.management.uri(&["prompts", prompt, "partials"])?;
        self.management
            .send(ctx, Method::Put, url, Some(partials), options)
            .await
    }
}
