//! Shared helpers for integration tests.

#![allow(dead_code)]

use idm_management::managers::SelfServiceProfile;
use idm_management::transport::InMemoryTransport;
use idm_management::{Management, RequestContext};

pub const DOMAIN: &str = "tenant.example.com";

/// Initialise logging once per test binary. `RUST_LOG=debug` shows requests.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// In-memory transport with every list key registered.
pub async fn transport() -> InMemoryTransport {
    init_logging();
    let transport = InMemoryTransport::new();
    transport.register::<SelfServiceProfile>().await;
    transport
}

pub fn management(transport: &InMemoryTransport) -> Management<InMemoryTransport> {
    Management::builder(transport.clone())
        .with_domain(DOMAIN)
        .build()
        .expect("in-memory client should build")
}

pub fn ctx(name: &str) -> RequestContext {
    RequestContext::new(format!("test-{name}"))
}

pub fn profile(name: &str, strategies: &[&str]) -> SelfServiceProfile {
    SelfServiceProfile {
        name: Some(name.to_string()),
        allowed_strategies: Some(strategies.iter().map(|s| s.to_string()).collect()),
        ..SelfServiceProfile::default()
    }
}
