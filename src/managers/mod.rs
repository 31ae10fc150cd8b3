//! Resource managers, one per resource family.
//!
//! Managers are thin façades over [`Management`](crate::Management): each
//! method builds a URI below a fixed namespace and performs exactly one call.
//! Entity types live next to the manager that serves them.

pub mod guardian;
pub mod prompt;
pub mod self_service_profile;
pub mod tenant;

pub use guardian::{
    CreateEnrollmentTicket, Enrollment, EnrollmentManager, EnrollmentTicket, GuardianManager,
    MultiFactor, MultiFactorManager, MultiFactorPolicies, MultiFactorProvider,
    MultiFactorProviderAmazonSns, MultiFactorProviderTwilio, MultiFactorSmsTemplate,
    PhoneMessageTypes,
};
pub use prompt::{Prompt, PromptManager, PromptPartials};
pub use self_service_profile::{
    Branding, BrandingColors, SelfServiceProfile, SelfServiceProfileManager,
    SelfServiceProfileTicket, SelfServiceProfileUserAttribute, SelfServiceProfileWrite,
    TicketConnectionConfig, TicketConnectionOptions, TicketEnabledOrganization,
};
pub use tenant::{Tenant, TenantFlags, TenantManager};

/// Text customizations, keyed by screen and then by text id.
pub type CustomText = serde_json::Map<String, serde_json::Value>;
