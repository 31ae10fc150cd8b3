//! Generic manager for registered resources.

use crate::context::RequestContext;
use crate::error::{ManagementError, ManagementResult};
use crate::management::Management;
use crate::options::RequestOptions;
use crate::resource::{ManagedResource, Page, WritableResource};
use crate::transport::{Method, Transport};
use log::debug;
use std::marker::PhantomData;
use url::Url;

/// List / read / create / update / delete for one [`ManagedResource`].
///
/// Each method performs exactly one call. `create` and `update` exist only
/// for a [`WritableResource`]; they send the resource's write view and read the response back into the caller's value,
/// so server-assigned fields (`id`, timestamps) are filled in place.
pub struct ResourceManager<'m, T, R> {
    management: &'m Management<T>,
    _resource: PhantomData<fn() -> R>,
}

impl<'m, T: Transport, R: ManagedResource> ResourceManager<'m, T, R> {
    pub fn new(management: &'m Management<T>) -> Self {
        Self {
            management,
            _resource: PhantomData,
        }
    }

    /// URI of the collection, or of `extra` segments below it.
    pub fn uri(&self, extra: &[&str]) -> ManagementResult<Url> {
        let segments: Vec<&str> = R::COLLECTION.iter().chain(extra).copied().collect();
        self.management.uri(&segments)
    }

    /// List resources. `options` are applied over the list defaults.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &RequestOptions,
    ) -> ManagementResult<Page<R>> {
        let options = RequestOptions::list_defaults().merge(options);
        let page: Page<R> = self.management.fetch(ctx, self.uri(&[])?, &options).await?;
        debug!("Listed {} {} resource(s)", page.len(), R::NAME);
        Ok(page)
    }

    /// Read a resource by id. A missing id is an API error with status 404.
    pub async fn read(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: &RequestOptions,
    ) -> ManagementResult<R> {
        self.management.fetch(ctx, self.uri(&[id])?, options).await
    }

    /// Delete a resource by id.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        id: &str,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.uri(&[id])?;
        self.management
            .send(ctx, Method::Delete, url, None::<&()>, options)
            .await
    }
}

impl<T: Transport, R: WritableResource> ResourceManager<'_, T, R> {
    /// Create a resource, filling server-assigned fields into `resource`.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        resource: &mut R,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.uri(&[])?;
        let payload = serde_json::to_value(resource.write_view())
            .map_err(ManagementError::encoding)?;
        self.management
            .request(ctx, Method::Post, url, Some(&payload), Some(resource), options)
            .await?;
        debug!("Created {} [request_id={}]", R::NAME, ctx.request_id);
        Ok(())
    }

    /// Partially update a resource. Fields absent from `resource` are left
    /// unchanged server-side; the response is read back into `resource`.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: &str,
        resource: &mut R,
        options: &RequestOptions,
    ) -> ManagementResult<()> {
        let url = self.uri(&[id])?;
        let payload = serde_json::to_value(resource.write_view())
            .map_err(ManagementError::encoding)?;
        self.management
            .request(ctx, Method::Patch, url, Some(&payload), Some(resource), options)
            .await
    }
}
