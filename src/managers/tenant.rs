//! Tenant settings (`tenants/settings`).

use crate::context::RequestContext;
use crate::error::{ManagementError, ManagementResult};
use crate::management::Management;
use crate::options::RequestOptions;
use crate::resource::optional::optional_accessors;
use crate::transport::{Method, Transport};
use serde::{Deserialize, Serialize};

/// Tenant-wide settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    /// Name shown on login pages and emails.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_audience: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_directory: Option<String>,

    /// Login session lifetime in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_lifetime: Option<f64>,

    /// Inactivity timeout in hours.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idle_session_lifetime: Option<f64>,

    /// Supported locales; the first one is the default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_locales: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sandbox_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flags: Option<TenantFlags>,
}

optional_accessors!(Tenant {
    friendly_name: str,
    picture_url: str,
    support_email: str,
    support_url: str,
    default_audience: str,
    default_directory: str,
    session_lifetime: f64,
    idle_session_lifetime: f64,
    enabled_locales: [String],
    sandbox_version: str,
});

/// Tenant feature flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TenantFlags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_client_connections: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_apis_section: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_pipeline2: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable_clickjack_protection_headers: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revoke_refresh_token_grant: Option<bool>,
}

/// Manages tenant settings.
pub struct TenantManager<'m, T> {
    management: &'m Management<T>,
}

impl<'m, T: Transport> TenantManager<'m, T> {
    pub fn new(management: &'m Management<T>) -> Self {
        Self { management }
    }

    pub async fn read(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<Tenant> {
        let url = self.management.uri(&["tenants", "settings"])?;
        self.management.fetch(ctx, url, options).await
    }

    /// Update the settings present in `tenant`; the stored settings are read
    /// back into it.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        tenant: &mut Tenant,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.management.uri(&["tenants", "settings"])?;
        let payload = serde_json::to_value(&*tenant).map_err(ManagementError::encoding)?;
        self.management
            .request(ctx, Method::Patch, url, Some(&payload), Some(tenant), options)
            .await
    }
}
