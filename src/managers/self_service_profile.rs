//! Self-service SSO profiles and access tickets.
//!
//! A profile configures what a customer sees while setting up their own SSO
//! connection. Tickets start that flow for a given set of clients and
//! organizations.

use crate::context::RequestContext;
use crate::error::{ManagementError, ManagementResult};
use crate::management::Management;
use crate::managers::CustomText;
use crate::options::RequestOptions;
use crate::resource::optional::optional_accessors;
use crate::resource::{ManagedResource, Page, ResourceManager, WritableResource};
use crate::transport::{Method, Transport};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A self-service SSO profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfServiceProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// IdP strategies offered during the flow (`oidc`, `samlp`, `waad`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_strategies: Option<Vec<String>>,

    /// Attributes mapped during the flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_attributes: Option<Vec<SelfServiceProfileUserAttribute>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branding: Option<Branding>,
}

optional_accessors!(SelfServiceProfile {
    id: str,
    name: str,
    description: str,
    allowed_strategies: [String],
    user_attributes: [SelfServiceProfileUserAttribute],
});

/// An attribute shown to the user during the flow.
///
/// The API expects every key on writes, so absent values are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfServiceProfileUserAttribute {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub is_optional: Option<bool>,
}

optional_accessors!(SelfServiceProfileUserAttribute {
    name: str,
    description: str,
    is_optional: bool,
});

/// Branding applied to the self-service pages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Branding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<BrandingColors>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandingColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_background: Option<String>,
}

/// Writable subset of a [`SelfServiceProfile`].
///
/// `id`, `created_at` and `updated_at` are owned by the server and never sent.
#[derive(Debug, Serialize)]
pub struct SelfServiceProfileWrite<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_strategies: Option<&'a [String]>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_attributes: Option<&'a [SelfServiceProfileUserAttribute]>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub branding: Option<&'a Branding>,
}

impl ManagedResource for SelfServiceProfile {
    const COLLECTION: &'static [&'static str] = &["self-service-profiles"];
    const LIST_KEY: &'static str = "self_service_profiles";
    const NAME: &'static str = "self-service profile";
}

impl WritableResource for SelfServiceProfile {
    type Write<'a> = SelfServiceProfileWrite<'a>;

    fn write_view(&self) -> SelfServiceProfileWrite<'_> {
        SelfServiceProfileWrite {
            name: self.name.as_deref(),
            description: self.description.as_deref(),
            allowed_strategies: self.allowed_strategies.as_deref(),
            user_attributes: self.user_attributes.as_deref(),
            branding: self.branding.as_ref(),
        }
    }
}

/// Request for an SSO access ticket. `ticket` is filled in by
/// [`SelfServiceProfileManager::create_ticket`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SelfServiceProfileTicket {
    /// Existing connection to edit during the flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_id: Option<String>,

    /// Configuration of a new connection to create during the flow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_config: Option<TicketConnectionConfig>,

    /// Client ids the connection will be enabled for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_clients: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_organizations: Option<Vec<TicketEnabledOrganization>>,

    /// Ticket lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_sec: Option<u32>,

    /// The generated ticket URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticket: Option<String>,
}

optional_accessors!(SelfServiceProfileTicket {
    connection_id: str,
    enabled_clients: [String],
    enabled_organizations: [TicketEnabledOrganization],
    ttl_sec: u32,
    ticket: str,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketConnectionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_domain_connection: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_as_button: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<TicketConnectionOptions>,
}

optional_accessors!(TicketConnectionConfig {
    name: str,
    display_name: str,
    is_domain_connection: bool,
    show_as_button: bool,
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketConnectionOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain_aliases: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketEnabledOrganization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assign_membership_on_login: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_as_button: Option<bool>,
}

/// Manages self-service profiles (`self-service-profiles`).
pub struct SelfServiceProfileManager<'m, T> {
    management: &'m Management<T>,
    profiles: ResourceManager<'m, T, SelfServiceProfile>,
}

impl<'m, T: Transport> SelfServiceProfileManager<'m, T> {
    pub fn new(management: &'m Management<T>) -> Self {
        Self {
            management,
            profiles: ResourceManager::new(management),
        }
    }

    /// Create a profile. Server-assigned fields are filled into `profile`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        profile: &mut SelfServiceProfile,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.profiles.create(ctx, profile, options).await
    }

    /// List profiles, 50 per page with totals unless overridden.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<Page<SelfServiceProfile>> {
        self.profiles.list(ctx, options).await
    }

    pub async fn read(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: &RequestOptions,
    ) -> ManagementResult<SelfServiceProfile> {
        self.profiles.read(ctx, id, options).await
    }

    /// Update the fields present in `profile`; the result is read back into it.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        profile: &mut SelfServiceProfile,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.profiles.update(ctx, id, profile, options).await
    }

    pub async fn delete(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.profiles.delete(ctx, id, options).await
    }

    /// Text customizations for one page of the flow in one language.
    pub async fn custom_text(
        &self,
        ctx: &RequestContext,
        id: &str,
        language: &str,
        page: &str,
        options: &RequestOptions,
    ) -> ManagementResult<CustomText> {
        let url = self.profiles.uri(&[id, "custom-text", language, page])?;
        self.management.fetch(ctx, url, options).await
    }

    /// Replace the text customizations for one page in one language.
    pub async fn set_custom_text(
        &self,
        ctx: &RequestContext,
        id: &str,
        language: &str,
        page: &str,
        texts: &CustomText,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.profiles.uri(&[id, "custom-text", language, page])?;
        self.management
            .send(ctx, Method::Put, url, Some(texts), options)
            .await
    }

    /// Create an SSO access ticket. The generated `ticket` is written into
    /// `ticket` alongside the fields it was requested with.
    pub async fn create_ticket(
        &self,
        ctx: &RequestContext,
        id: &str,
        ticket: &mut SelfServiceProfileTicket,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.profiles.uri(&[id, "sso-ticket"])?;
        let payload = serde_json::to_value(&*ticket).map_err(ManagementError::encoding)?;
        self.management
            .request(ctx, Method::Post, url, Some(&payload), Some(ticket), options)
            .await?;
        info!("Created SSO ticket for self-service profile {id}");
        Ok(())
    }

    /// Revoke a previously issued ticket.
    pub async fn revoke_ticket(
        &self,
        ctx: &RequestContext,
        id: &str,
        ticket_id: &str,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.profiles.uri(&[id, "sso-ticket", ticket_id, "revoke"])?;
        self.management
            .send(ctx, Method::Post, url, None::<&()>, options)
            .await?;
        info!("Revoked SSO ticket {ticket_id} of self-service profile {id}");
        Ok(())
    }
}
