//! MFA factors and their provider settings (`guardian/factors`, `guardian/policies`).
//!
//! Every factor can be switched on or off with `enable`. Factors backed by an
//! external provider (SMS, push, DUO, WebAuthn) also expose their settings.
//! Settings are replaced with PUT unless noted otherwise.

use crate::context::RequestContext;
use crate::error::ManagementResult;
use crate::management::Management;
use crate::options::RequestOptions;
use crate::resource::optional::optional_accessors;
use crate::transport::{Method, Transport};
use log::info;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

/// One MFA factor and whether it is enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiFactor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    /// Set when the factor's trial has ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_expired: Option<bool>,
}

optional_accessors!(MultiFactor {
    name: str,
    enabled: bool,
    trial_expired: bool,
});

/// MFA policies: `all-applications` or `confidence-score`. An empty list
/// removes every policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiFactorPolicies(pub Vec<String>);

impl MultiFactorPolicies {
    pub fn new<I, S>(policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(policies.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// Selected provider of the phone or push factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiFactorProvider {
    /// `auth0`, `twilio`, `phone-message-hook`, `sns`, `direct`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

optional_accessors!(MultiFactorProvider { provider: str });

/// Delivery channels of the phone factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhoneMessageTypes {
    /// `sms` and/or `voice`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_types: Option<Vec<String>>,
}

optional_accessors!(PhoneMessageTypes { message_types: [String] });

/// Messages sent by the SMS factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiFactorSmsTemplate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_message: Option<String>,
}

optional_accessors!(MultiFactorSmsTemplate {
    enrollment_message: str,
    verification_message: str,
});

/// Twilio credentials for the SMS factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiFactorProviderTwilio {
    /// Sender phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messaging_service_sid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,
}

optional_accessors!(MultiFactorProviderTwilio {
    from: str,
    messaging_service_sid: str,
    auth_token: str,
    sid: str,
});

/// Amazon SNS settings for the push factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MultiFactorProviderAmazonSns {
    #[serde(rename = "aws_access_key_id", default, skip_serializing_if = "Option::is_none")]
    pub access_key_id: Option<String>,

    #[serde(rename = "aws_secret_access_key", default, skip_serializing_if = "Option::is_none")]
    pub secret_access_key: Option<String>,

    #[serde(rename = "aws_region", default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    #[serde(rename = "sns_apns_platform_application_arn", default, skip_serializing_if = "Option::is_none")]
    pub apns_platform_application_arn: Option<String>,

    #[serde(rename = "sns_gcm_platform_application_arn", default, skip_serializing_if = "Option::is_none")]
    pub gcm_platform_application_arn: Option<String>,
}

optional_accessors!(MultiFactorProviderAmazonSns {
    access_key_id: str,
    secret_access_key: str,
    region: str,
    apns_platform_application_arn: str,
    gcm_platform_application_arn: str,
});

/// DUO Security integration settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuoSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ikey: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skey: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

optional_accessors!(DuoSettings {
    ikey: str,
    skey: str,
    host: str,
});

/// WebAuthn factor settings. Roaming authenticators use `user_verification`,
/// platform authenticators the relying party fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebAuthnSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub override_relying_party: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relying_party_identifier: Option<String>,

    /// `discouraged`, `preferred` or `required`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_verification: Option<String>,
}

optional_accessors!(WebAuthnSettings {
    override_relying_party: bool,
    relying_party_identifier: str,
    user_verification: str,
});

#[derive(Serialize)]
struct Enabled {
    enabled: bool,
}

/// Manages MFA factors and policies.
pub struct MultiFactorManager<'m, T> {
    management: &'m Management<T>,
}

impl<'m, T: Transport> MultiFactorManager<'m, T> {
    pub fn new(management: &'m Management<T>) -> Self {
        Self { management }
    }

    /// All factors and their status.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<Vec<MultiFactor>> {
        let url = self.management.uri(&["guardian", "factors"])?;
        self.management.fetch(ctx, url, options).await
    }

    pub async fn policy(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<MultiFactorPolicies> {
        let url = self.management.uri(&["guardian", "policies"])?;
        self.management.fetch(ctx, url, options).await
    }

    /// Replace the MFA policies. Previous policies are not merged in.
    pub async fn update_policy(
        &self,
        ctx: &RequestContext,
        policies: &MultiFactorPolicies,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.management.uri(&["guardian", "policies"])?;
        self.management
            .send(ctx, Method::Put, url, Some(policies), options)
            .await
    }

    pub fn phone(&self) -> PhoneManager<'m, T> {
        PhoneManager {
            management: self.management,
        }
    }

    pub fn sms(&self) -> SmsManager<'m, T> {
        SmsManager {
            factor: self.factor("sms"),
        }
    }

    pub fn push(&self) -> PushManager<'m, T> {
        PushManager {
            factor: self.factor("push-notification"),
        }
    }

    pub fn email(&self) -> FactorManager<'m, T> {
        self.factor("email")
    }

    pub fn otp(&self) -> FactorManager<'m, T> {
        self.factor("otp")
    }

    pub fn recovery_code(&self) -> FactorManager<'m, T> {
        self.factor("recovery-code")
    }

    pub fn duo(&self) -> DuoManager<'m, T> {
        DuoManager {
            factor: self.factor("duo"),
        }
    }

    pub fn webauthn_roaming(&self) -> WebAuthnManager<'m, T> {
        WebAuthnManager {
            factor: self.factor("webauthn-roaming"),
        }
    }

    pub fn webauthn_platform(&self) -> WebAuthnManager<'m, T> {
        WebAuthnManager {
            factor: self.factor("webauthn-platform"),
        }
    }

    fn factor(&self, name: &'static str) -> FactorManager<'m, T> {
        FactorManager {
            management: self.management,
            name,
        }
    }
}

/// A single factor under `guardian/factors/{name}`.
pub struct FactorManager<'m, T> {
    management: &'m Management<T>,
    name: &'static str,
}

impl<'m, T: Transport> FactorManager<'m, T> {
    /// Factor name as used in the URI.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Enable or disable the factor.
    pub async fn enable(
        &self,
        ctx: &RequestContext,
        enabled: bool,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.uri(&[])?;
        self.management
            .send(ctx, Method::Put, url, Some(&Enabled { enabled }), options)
            .await?;
        info!(
            "MFA factor {} {}",
            self.name,
            if enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }

    fn uri(&self, extra: &[&str]) -> ManagementResult<Url> {
        let mut segments = vec!["guardian", "factors", self.name];
        segments.extend_from_slice(extra);
        self.management.uri(&segments)
    }

    async fn get<R>(
        &self,
        ctx: &RequestContext,
        extra: &[&str],
        options: &RequestOptions,
    ) -> ManagementResult<R>
    where
        R: DeserializeOwned,
    {
        let url = self.uri(extra)?;
        self.management.fetch(ctx, url, options).await
    }

    async fn set<B: Serialize>(
        &self,
        ctx: &RequestContext,
        method: Method,
        extra: &[&str],
        body: &B,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.uri(extra)?;
        self.management
            .send(ctx, method, url, Some(body), options)
            .await
    }
}

/// The phone factor. Its on/off switch is shared with the SMS factor.
pub struct PhoneManager<'m, T> {
    management: &'m Management<T>,
}

impl<'m, T: Transport> PhoneManager<'m, T> {
    fn phone(&self) -> FactorManager<'m, T> {
        FactorManager {
            management: self.management,
            name: "phone",
        }
    }

    pub async fn enable(
        &self,
        ctx: &RequestContext,
        enabled: bool,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        FactorManager {
            management: self.management,
            name: "sms",
        }
        .enable(ctx, enabled, options)
        .await
    }

    pub async fn provider(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<MultiFactorProvider> {
        self.phone().get(ctx, &["selected-provider"], options).await
    }

    pub async fn update_provider(
        &self,
        ctx: &RequestContext,
        provider: &MultiFactorProvider,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.phone()
            .set(ctx, Method::Put, &["selected-provider"], provider, options)
            .await
    }

    pub async fn message_types(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<PhoneMessageTypes> {
        self.phone().get(ctx, &["message-types"], options).await
    }

    pub async fn update_message_types(
        &self,
        ctx: &RequestContext,
        message_types: &PhoneMessageTypes,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.phone()
            .set(ctx, Method::Put, &["message-types"], message_types, options)
            .await
    }
}

/// The SMS factor.
pub struct SmsManager<'m, T> {
    factor: FactorManager<'m, T>,
}

impl<'m, T: Transport> SmsManager<'m, T> {
    pub async fn enable(
        &self,
        ctx: &RequestContext,
        enabled: bool,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor.enable(ctx, enabled, options).await
    }

    pub async fn template(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<MultiFactorSmsTemplate> {
        self.factor.get(ctx, &["templates"], options).await
    }

    pub async fn update_template(
        &self,
        ctx: &RequestContext,
        template: &MultiFactorSmsTemplate,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor
            .set(ctx, Method::Put, &["templates"], template, options)
            .await
    }

    pub async fn twilio(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<MultiFactorProviderTwilio> {
        self.factor.get(ctx, &["providers", "twilio"], options).await
    }

    pub async fn update_twilio(
        &self,
        ctx: &RequestContext,
        twilio: &MultiFactorProviderTwilio,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor
            .set(ctx, Method::Put, &["providers", "twilio"], twilio, options)
            .await
    }
}

/// The push notification factor.
pub struct PushManager<'m, T> {
    factor: FactorManager<'m, T>,
}

impl<'m, T: Transport> PushManager<'m, T> {
    pub async fn enable(
        &self,
        ctx: &RequestContext,
        enabled: bool,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor.enable(ctx, enabled, options).await
    }

    pub async fn amazon_sns(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<MultiFactorProviderAmazonSns> {
        self.factor.get(ctx, &["providers", "sns"], options).await
    }

    pub async fn update_amazon_sns(
        &self,
        ctx: &RequestContext,
        sns: &MultiFactorProviderAmazonSns,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor
            .set(ctx, Method::Put, &["providers", "sns"], sns, options)
            .await
    }

    pub async fn provider(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<MultiFactorProvider> {
        self.factor.get(ctx, &["selected-provider"], options).await
    }

    pub async fn update_provider(
        &self,
        ctx: &RequestContext,
        provider: &MultiFactorProvider,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor
            .set(ctx, Method::Put, &["selected-provider"], provider, options)
            .await
    }
}

/// The DUO Security factor.
pub struct DuoManager<'m, T> {
    factor: FactorManager<'m, T>,
}

impl<'m, T: Transport> DuoManager<'m, T> {
    pub async fn enable(
        &self,
        ctx: &RequestContext,
        enabled: bool,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor.enable(ctx, enabled, options).await
    }

    pub async fn settings(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<DuoSettings> {
        self.factor.get(ctx, &["settings"], options).await
    }

    pub async fn update_settings(
        &self,
        ctx: &RequestContext,
        settings: &DuoSettings,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor
            .set(ctx, Method::Put, &["settings"], settings, options)
            .await
    }
}

/// A WebAuthn factor (roaming or platform).
pub struct WebAuthnManager<'m, T> {
    factor: FactorManager<'m, T>,
}

impl<'m, T: Transport> WebAuthnManager<'m, T> {
    pub async fn enable(
        &self,
        ctx: &RequestContext,
        enabled: bool,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor.enable(ctx, enabled, options).await
    }

    pub async fn settings(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<WebAuthnSettings> {
        self.factor.get(ctx, &["settings"], options).await
    }

    /// Partially update the settings (PATCH).
    pub async fn update_settings(
        &self,
        ctx: &RequestContext,
        settings: &WebAuthnSettings,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.factor
            .set(ctx, Method::Patch, &["settings"], settings, options)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::InMemoryTransport;
    use serde_json::json;

    fn management(transport: &InMemoryTransport) -> Management<InMemoryTransport> {
        Management::builder(transport.clone())
            .with_domain("tenant.example.com")
            .build()
            .unwrap()
    }

    #[test]
    fn test_policies_are_a_bare_array() {
        let policies = MultiFactorPolicies::new(["all-applications"]);
        assert_eq!(serde_json::to_value(&policies).unwrap(), json!(["all-applications"]));

        let empty: MultiFactorPolicies = serde_json::from_value(json!([])).unwrap();
        assert!(empty.as_slice().is_empty());
    }

    #[test]
    fn test_sns_field_names() {
        let sns = MultiFactorProviderAmazonSns {
            access_key_id: Some("key".to_string()),
            region: Some("us-west-1".to_string()),
            ..MultiFactorProviderAmazonSns::default()
        };
        assert_eq!(
            serde_json::to_value(&sns).unwrap(),
            json!({"aws_access_key_id": "key", "aws_region": "us-west-1"})
        );
    }

    #[tokio::test]
    async fn test_factor_uris() {
        let transport = InMemoryTransport::new();
        let management = management(&transport);
        let mfa = MultiFactorManager::new(&management);
        let ctx = RequestContext::default();
        let options = RequestOptions::new();

        mfa.phone().enable(&ctx, true, &options).await.unwrap();
        mfa.push().enable(&ctx, false, &options).await.unwrap();
        mfa.recovery_code().enable(&ctx, true, &options).await.unwrap();
        mfa.webauthn_platform()
            .update_settings(&ctx, &WebAuthnSettings::default(), &options)
            .await
            .unwrap_err();

        let requests = transport.requests().await;
        let paths: Vec<(&Method, &str)> = requests
            .iter()
            .map(|request| (&request.method, request.path.as_str()))
            .collect();
        assert_eq!(
            paths,
            vec![
                (&Method::Put, "guardian/factors/sms"),
                (&Method::Put, "guardian/factors/push-notification"),
                (&Method::Put, "guardian/factors/recovery-code"),
                (&Method::Patch, "guardian/factors/webauthn-platform/settings"),
            ]
        );
        assert_eq!(requests[1].body, Some(json!({"enabled": false})));
    }

    #[tokio::test]
    async fn test_sms_template_round_trip() {
        let transport = InMemoryTransport::new();
        let management = management(&transport);
        let sms = MultiFactorManager::new(&management).sms();
        let ctx = RequestContext::default();

        let template = MultiFactorSmsTemplate {
            enrollment_message: Some("Your code is {{code}}".to_string()),
            verification_message: Some(String::new()),
        };
        sms.update_template(&ctx, &template, &RequestOptions::new())
            .await
            .unwrap();

        let read = sms.template(&ctx, &RequestOptions::new()).await.unwrap();
        assert_eq!(read, template);
        assert_eq!(read.verification_message(), "");
    }
}
