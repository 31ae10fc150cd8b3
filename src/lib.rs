//! Typed async client for an identity-management REST API.
//!
//! Exposes tenant settings, multi-factor authentication, login prompts and
//! self-service SSO profiles as typed entities with CRUD-style managers.
//! Optional fields keep presence semantics on the wire, request URIs are built
//! from escaped path segments, and API failures come back as structured
//! errors distinct from transport failures.
//!
//! # Core Components
//!
//! - [`Management`] - the client; hands out resource managers
//! - [`transport::Transport`] - the single seam to the network (HTTP or in-memory)
//! - [`RequestOptions`] - pagination, field selection and extra parameters
//! - [`ManagementError`] - API, transport and serialization failures
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use idm_management::{ManagementBuilder, RequestContext, RequestOptions};
//! use idm_management::managers::SelfServiceProfile;
//! use idm_management::transport::{HttpTransport, HttpTransportConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new(HttpTransportConfig::new("api-token"))?;
//! let management = ManagementBuilder::new(transport)
//!     .with_domain("tenant.example.com")
//!     .build()?;
//!
//! let ctx = RequestContext::with_generated_id();
//! let mut profile = SelfServiceProfile {
//!     name: Some("Partners".to_string()),
//!     allowed_strategies: Some(vec!["oidc".to_string()]),
//!     ..Default::default()
//! };
//! management
//!     .self_service_profile()
//!     .create(&ctx, &mut profile, &RequestOptions::new())
//!     .await?;
//! println!("created {}", profile.id());
//! # Ok(())
//! # }
//! ```

pub mod context;
pub mod error;
pub mod management;
pub mod managers;
pub mod options;
pub mod resource;
pub mod transport;

// Re-export commonly used types for convenience
pub use context::RequestContext;
pub use error::{
    ApiError, BuildError, BuildResult, ManagementError, ManagementResult, SerializationStage,
    TransportError,
};
pub use management::{Management, ManagementBuilder, ManagementConfig};
pub use options::{RequestOption, RequestOptions, SortOrder};
pub use resource::{ListMeta, ManagedResource, Page, ResourceManager, WritableResource};
