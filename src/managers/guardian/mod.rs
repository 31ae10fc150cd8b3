//! Multi-factor authentication: factors, policies, providers and enrollments.

pub mod enrollment;
pub mod multi_factor;

pub use enrollment::{CreateEnrollmentTicket, Enrollment, EnrollmentManager, EnrollmentTicket};
pub use multi_factor::{
    DuoManager, DuoSettings, FactorManager, MultiFactor, MultiFactorManager, MultiFactorPolicies,
    MultiFactorProvider, MultiFactorProviderAmazonSns, MultiFactorProviderTwilio,
    MultiFactorSmsTemplate, PhoneManager, PhoneMessageTypes, PushManager, SmsManager,
    WebAuthnManager, WebAuthnSettings,
};

use crate::management::Management;
use crate::transport::Transport;

/// Entry point for the `guardian/*` endpoints.
pub struct GuardianManager<'m, T> {
    management: &'m Management<T>,
}

impl<'m, T: Transport> GuardianManager<'m, T> {
    pub fn new(management: &'m Management<T>) -> Self {
        Self { management }
    }

    pub fn multi_factor(&self) -> MultiFactorManager<'m, T> {
        MultiFactorManager::new(self.management)
    }

    pub fn enrollment(&self) -> EnrollmentManager<'m, T> {
        EnrollmentManager::new(self.management)
    }
}
