//! MFA enrollments and enrollment tickets (`guardian/enrollments`).

use crate::context::RequestContext;
use crate::error::ManagementResult;
use crate::management::Management;
use crate::options::RequestOptions;
use crate::resource::optional::optional_accessors;
use crate::resource::{ManagedResource, ResourceManager};
use crate::transport::{Method, Transport};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};

/// A device or channel a user has enrolled for MFA.
///
/// Enrollments can be read and deleted, never created or updated directly:
///
/// ```compile_fail
/// # use idm_management::managers::Enrollment;
/// # use idm_management::transport::InMemoryTransport;
/// # use idm_management::{Management, RequestContext, RequestOptions, ResourceManager};
/// # async fn run(management: Management<InMemoryTransport>) {
/// let enrollments = ResourceManager::<_, Enrollment>::new(&management);
/// let mut enrollment = Enrollment::default();
/// let _ = enrollments
///     .create(&RequestContext::default(), &mut enrollment, &RequestOptions::new())
///     .await;
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// `pending` or `confirmed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Device name, for push enrollments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Device identifier, for push enrollments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrolled_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_auth: Option<DateTime<Utc>>,
}

optional_accessors!(Enrollment {
    id: str,
    status: str,
    name: str,
    identifier: str,
    phone_number: str,
});

/// Enrollments are created by the user through a ticket, so the collection
/// is read and delete only. It has no list endpoint either; users' enrollment
/// lists are bare arrays and `LIST_KEY` only names the wrapper for symmetry.
impl ManagedResource for Enrollment {
    const COLLECTION: &'static [&'static str] = &["guardian", "enrollments"];
    const LIST_KEY: &'static str = "enrollments";
    const NAME: &'static str = "enrollment";
}

/// Request for an enrollment ticket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateEnrollmentTicket {
    /// User the ticket is issued for.
    pub user_id: String,

    /// Alternate email address the ticket is sent to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Whether the API emails the ticket. Always sent.
    #[serde(default)]
    pub send_mail: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_locale: Option<String>,

    /// Factor to enroll, e.g. `push-notification` or `phone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_multiple_enrollments: Option<bool>,
}

/// A created enrollment ticket. Both fields are required in the response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentTicket {
    pub ticket_id: String,

    pub ticket_url: String,
}

/// Manages enrollments.
pub struct EnrollmentManager<'m, T> {
    management: &'m Management<T>,
    enrollments: ResourceManager<'m, T, Enrollment>,
}

impl<'m, T: Transport> EnrollmentManager<'m, T> {
    pub fn new(management: &'m Management<T>) -> Self {
        Self {
            management,
            enrollments: ResourceManager::new(management),
        }
    }

    /// Create a ticket the user can follow to enroll. The request is left as
    /// is and the ticket is returned as a new value.
    pub async fn create_ticket(
        &self,
        ctx: &RequestContext,
        request: &CreateEnrollmentTicket,
        options: &RequestOptions,
    ) -> ManagementResult<EnrollmentTicket> {
        let url = self.enrollments.uri(&["ticket"])?;
        let ticket: EnrollmentTicket = self
            .management
            .call(ctx, Method::Post, url, Some(request), options)
            .await?;
        info!(
            "Created enrollment ticket {} for user {}",
            ticket.ticket_id, request.user_id
        );
        Ok(ticket)
    }

    /// Read an enrollment. Unknown ids are an API error with status 404.
    pub async fn get(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: &RequestOptions,
    ) -> ManagementResult<Enrollment> {
        self.enrollments.read(ctx, id, options).await
    }

    pub async fn delete(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        self.enrollments.delete(ctx, id, options).await
    }
}
