//! Property tests for presence semantics of optional fields.
//!
//! A field is on the wire exactly when it is set, zero values included, and
//! decoding what was encoded gives back the same value.

use idm_management::managers::{
    Prompt, SelfServiceProfile, SelfServiceProfileTicket, Tenant, TicketEnabledOrganization,
};
use idm_management::{ListMeta, Page};
use proptest::prelude::*;
use serde_json::Value;

prop_compose! {
    fn prompt_strategy()
        (experience in proptest::option::of(prop::sample::select(vec!["new", "classic", ""])),
         identifier_first in proptest::option::of(any::<bool>()),
         webauthn in proptest::option::of(any::<bool>()))
        -> Prompt {
        Prompt {
            universal_login_experience: experience.map(str::to_string),
            identifier_first,
            webauthn_platform_first_factor: webauthn,
        }
    }
}

prop_compose! {
    fn organization_strategy()
        (organization_id in proptest::option::of("org_[a-z0-9]{0,8}"),
         assign in proptest::option::of(any::<bool>()),
         show in proptest::option::of(any::<bool>()))
        -> TicketEnabledOrganization {
        TicketEnabledOrganization {
            organization_id,
            assign_membership_on_login: assign,
            show_as_button: show,
        }
    }
}

prop_compose! {
    fn ticket_strategy()
        (connection_id in proptest::option::of("[a-z_0-9]{0,12}"),
         enabled_clients in proptest::option::of(prop::collection::vec("[a-zA-Z0-9]{1,16}", 0..4)),
         enabled_organizations in proptest::option::of(prop::collection::vec(organization_strategy(), 0..3)),
         ttl_sec in proptest::option::of(any::<u32>()),
         ticket in proptest::option::of(".*"))
        -> SelfServiceProfileTicket {
        SelfServiceProfileTicket {
            connection_id,
            connection_config: None,
            enabled_clients,
            enabled_organizations,
            ttl_sec,
            ticket,
        }
    }
}

fn has_key(value: &Value, key: &str) -> bool {
    value.as_object().is_some_and(|fields| fields.contains_key(key))
}

proptest! {
    #[test]
    fn prompt_keys_present_iff_set(prompt in prompt_strategy()) {
        let value = serde_json::to_value(&prompt).unwrap();
        prop_assert_eq!(has_key(&value, "universal_login_experience"), prompt.universal_login_experience.is_some());
        prop_assert_eq!(has_key(&value, "identifier_first"), prompt.identifier_first.is_some());
        prop_assert_eq!(has_key(&value, "webauthn_platform_first_factor"), prompt.webauthn_platform_first_factor.is_some());

        let decoded: Prompt = serde_json::from_value(value).unwrap();
        prop_assert_eq!(&decoded, &prompt);
        prop_assert_eq!(decoded.identifier_first(), prompt.identifier_first.unwrap_or(false));
    }

    #[test]
    fn ticket_keys_present_iff_set(ticket in ticket_strategy()) {
        let value = serde_json::to_value(&ticket).unwrap();
        prop_assert_eq!(has_key(&value, "connection_id"), ticket.connection_id.is_some());
        prop_assert_eq!(has_key(&value, "enabled_clients"), ticket.enabled_clients.is_some());
        prop_assert_eq!(has_key(&value, "ttl_sec"), ticket.ttl_sec.is_some());
        prop_assert_eq!(has_key(&value, "ticket"), ticket.ticket.is_some());
        prop_assert!(!has_key(&value, "connection_config"));

        let decoded: SelfServiceProfileTicket = serde_json::from_value(value.clone()).unwrap();
        prop_assert_eq!(&decoded, &ticket);
        prop_assert_eq!(serde_json::to_value(&decoded).unwrap(), value);
    }

    #[test]
    fn tenant_numeric_zero_is_kept(lifetime in proptest::option::of(0.0f64..720.0)) {
        let tenant = Tenant { session_lifetime: lifetime, ..Tenant::default() };
        let value = serde_json::to_value(&tenant).unwrap();
        prop_assert_eq!(has_key(&value, "session_lifetime"), lifetime.is_some());
        prop_assert_eq!(tenant.session_lifetime(), lifetime.unwrap_or_default());
    }

    #[test]
    fn page_meta_has_next(start in 0u64..500, length in 0u64..100, total in 0u64..1000) {
        let meta = ListMeta { start, limit: 50, length, total, next: None };
        prop_assert_eq!(meta.has_next(), start + length < total);

        let page = Page::<SelfServiceProfile> { meta, items: Vec::new() };
        prop_assert_eq!(page.has_next(), start + length < total);
    }
}

#[test]
fn test_explicit_zero_values_are_distinct_from_absent() {
    let set = Prompt {
        universal_login_experience: Some(String::new()),
        identifier_first: Some(false),
        webauthn_platform_first_factor: None,
    };
    let value = serde_json::to_value(&set).unwrap();
    assert_eq!(value, serde_json::json!({"universal_login_experience": "", "identifier_first": false}));

    // Accessors can't tell the two apart; the fields can.
    let unset = Prompt::default();
    assert_eq!(set.identifier_first(), unset.identifier_first());
    assert_ne!(set, unset);
}
