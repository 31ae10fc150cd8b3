//! Resource registry and the generic manager built on it.
//!
//! Every remote collection that supports the uniform list / read / delete
//! contract is described once by a [`ManagedResource`] implementation: the
//! URI namespace and the key list responses wrap items in. Collections that
//! also accept create and update implement [`WritableResource`], which names
//! the payload sent on writes. [`ResourceManager`] drives all of them.
//!
//! # Key Components
//!
//! * [`ManagedResource`] - per-resource registry entry
//! * [`WritableResource`] - write payload for creatable resources
//! * [`ResourceManager`] - generic CRUD over any registered resource
//! * [`Page`] / [`ListMeta`] - list results with pagination metadata
//! * [`optional`] - zero-value accessors for optional fields

pub mod list;
pub mod manager;
pub mod optional;

pub use list::{ListMeta, Page};
pub use manager::ResourceManager;

use serde::Serialize;
use serde::de::DeserializeOwned;

/// A remote resource type handled by [`ResourceManager`].
///
/// The full entity shape is used for reads.
pub trait ManagedResource: Serialize + DeserializeOwned + Default + Send + Sync {
    /// Path segments of the collection, relative to the API root.
    const COLLECTION: &'static [&'static str];

    /// Key the items are wrapped in when a list is requested with totals.
    const LIST_KEY: &'static str;

    /// Human-readable name used in log lines.
    const NAME: &'static str;
}

/// A resource that can be created and updated through [`ResourceManager`].
///
/// Writes go through [`WritableResource::write_view`], which lets a resource
/// leave server-owned fields (identifiers, timestamps) off the wire.
pub trait WritableResource: ManagedResource {
    /// Payload serialized for create and update.
    type Write<'a>: Serialize + Send + Sync
    where
        Self: 'a;

    /// Borrow the writable subset of this resource.
    fn write_view(&self) -> Self::Write<'_>;
}
