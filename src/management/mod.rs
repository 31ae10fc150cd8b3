//! The management API client.
//!
//! [`Management`] owns the transport and the resolved API root. Resource
//! managers borrow it and are created on demand, so there is no per-manager
//! state to keep in sync:
//!
//! ```rust
//! use idm_management::{ManagementBuilder, RequestContext};
//! use idm_management::transport::InMemoryTransport;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let management = ManagementBuilder::new(InMemoryTransport::new())
//!     .with_domain("tenant.example.com")
//!     .build()?;
//!
//! let ctx = RequestContext::with_generated_id();
//! let _profiles = management.self_service_profile().list(&ctx, &Default::default()).await?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod request;

pub use builder::{ManagementBuilder, ManagementConfig};

use crate::error::{ManagementError, ManagementResult};
use crate::managers::{GuardianManager, PromptManager, SelfServiceProfileManager, TenantManager};
use crate::transport::Transport;
use url::Url;

/// Client for the management API.
///
/// `Management<T>` is `Send + Sync` whenever the transport is, and can be
/// shared between tasks behind an `Arc`. Calls don't share mutable state.
#[derive(Debug, Clone)]
pub struct Management<T> {
    transport: T,
    config: ManagementConfig,
    api_root: Url,
}

impl<T: Transport> Management<T> {
    /// Start building a client around `transport`.
    pub fn builder(transport: T) -> ManagementBuilder<T> {
        ManagementBuilder::new(transport)
    }

    pub(crate) fn from_parts(transport: T, config: ManagementConfig, api_root: Url) -> Self {
        Self {
            transport,
            config,
            api_root,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn config(&self) -> &ManagementConfig {
        &self.config
    }

    /// API root every request URI is built under, e.g. `https://tenant/api/v2/`.
    pub fn api_root(&self) -> &Url {
        &self.api_root
    }

    /// Build the URI for `segments` below the API root.
    ///
    /// Each segment is percent-escaped on its own, so identifiers containing
    /// `/`, `?` or `#` can't change the shape of the path. Empty, `.` and `..`
    /// segments are rejected since URL normalization would drop them.
    pub fn uri(&self, segments: &[&str]) -> ManagementResult<Url> {
        let mut url = self.api_root.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ManagementError::invalid_request("API root cannot be a base URL"))?;
            path.pop_if_empty();
            for segment in segments {
                if segment.is_empty() {
                    return Err(ManagementError::invalid_request(format!(
                        "Empty path segment in /{}",
                        segments.join("/")
                    )));
                }
                if matches!(*segment, "." | "..") {
                    return Err(ManagementError::invalid_request(format!(
                        "Dot segment '{segment}' in /{}",
                        segments.join("/")
                    )));
                }
                path.push(segment);
            }
        }
        Ok(url)
    }

    /// Self-service SSO profiles.
    pub fn self_service_profile(&self) -> SelfServiceProfileManager<'_, T> {
        SelfServiceProfileManager::new(self)
    }

    /// Multi-factor authentication factors, policies and enrollments.
    pub fn guardian(&self) -> GuardianManager<'_, T> {
        GuardianManager::new(self)
    }

    /// Universal login prompt settings and texts.
    pub fn prompt(&self) -> PromptManager<'_, T> {
        PromptManager::new(self)
    }

    /// Tenant settings.
    pub fn tenant(&self) -> TenantManager<'_, T> {
        TenantManager::new(self)
    }
}
