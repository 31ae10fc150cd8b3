//! Optional fields.
//!
//! Entity fields the API may omit are plain `Option<T>` annotated with
//! `#[serde(default, skip_serializing_if = "Option::is_none")]`:
//!
//! * `None` - the key is left out of the payload, the server keeps its value
//! * `Some(v)` - the key is always sent, even for `false`, `0`, `""` or `[]`
//!
//! [`optional_accessors!`] generates read accessors that return the wrapped
//! value or the type's zero value, for callers that don't care about presence.
//!
//! ```rust,ignore
//! optional_accessors!(Prompt {
//!     universal_login_experience: str,
//!     identifier_first: bool,
//!     factors: [String],
//! });
//! ```
//!
//! Accessor kinds: `str` for `Option<String>` (returns `&str`), `[T]` for
//! `Option<Vec<T>>` (returns `&[T]`), and any `Copy + Default` type for
//! scalars.

macro_rules! optional_accessors {
    ($ty:ty { $($field:ident : $kind:tt),* $(,)? }) => {
        impl $ty {
            $( $crate::resource::optional::optional_accessors!(@accessor $field $kind); )*
        }
    };
    (@accessor $field:ident str) => {
        #[doc = concat!("Value of `", stringify!($field), "`, or `\"\"` when absent.")]
        pub fn $field(&self) -> &str {
            self.$field.as_deref().unwrap_or_default()
        }
    };
    (@accessor $field:ident [$item:ty]) => {
        #[doc = concat!("Value of `", stringify!($field), "`, or an empty slice when absent.")]
        pub fn $field(&self) -> &[$item] {
            self.$field.as_deref().unwrap_or_default()
        }
    };
    (@accessor $field:ident $scalar:ty) => {
        #[doc = concat!("Value of `", stringify!($field), "`, or the zero value when absent.")]
        pub fn $field(&self) -> $scalar {
            self.$field.unwrap_or_default()
        }
    };
}

pub(crate) use optional_accessors;

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Default, Serialize, Deserialize)]
    struct Factor {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        enabled: Option<bool>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        retries: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        channels: Option<Vec<String>>,
    }

    optional_accessors!(Factor {
        name: str,
        enabled: bool,
        retries: u32,
        channels: [String],
    });

    #[test]
    fn test_absent_fields_read_as_zero_values() {
        let factor = Factor::default();
        assert_eq!(factor.name(), "");
        assert!(!factor.enabled());
        assert_eq!(factor.retries(), 0);
        assert!(factor.channels().is_empty());
        assert_eq!(serde_json::to_value(&factor).unwrap(), json!({}));
    }

    #[test]
    fn test_present_zero_values_are_serialized() {
        let factor = Factor {
            name: Some(String::new()),
            enabled: Some(false),
            retries: Some(0),
            channels: Some(Vec::new()),
        };
        assert_eq!(
            serde_json::to_value(&factor).unwrap(),
            json!({"name": "", "enabled": false, "retries": 0, "channels": []})
        );
    }

    #[test]
    fn test_present_values_are_returned() {
        let factor: Factor =
            serde_json::from_value(json!({"name": "sms", "enabled": true, "channels": ["voice"]}))
                .unwrap();
        assert_eq!(factor.name(), "sms");
        assert!(factor.enabled());
        assert_eq!(factor.channels(), ["voice".to_string()]);
        assert!(factor.retries.is_none());
    }
}
