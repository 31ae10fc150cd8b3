//! Request executor.
//!
//! Every manager method ends up in [`Management::request`] or
//! [`Management::call`], each of which performs exactly one exchange with the
//! transport:
//!
//! 1. encode the body (if any) as JSON
//! 2. append query parameters (GET only) and headers
//! 3. send, racing the context's cancellation token and deadline
//! 4. decode a 2xx body into the target or a new value, or a non-2xx body
//!    into [`ApiError`]
//!
//! Nothing is retried.

use crate::context::RequestContext;
use crate::error::{ApiError, ManagementError, ManagementResult, TransportError};
use crate::management::Management;
use crate::options::RequestOptions;
use crate::transport::{HttpRequest, HttpResponse, Method, Transport};
use log::{debug, trace, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::{Future, pending};
use tokio::time::Instant;
use url::Url;

impl<T: Transport> Management<T> {
    /// Perform one API call.
    ///
    /// `body` is serialized as the request payload. On a 2xx response with a
    /// non-empty body, `target` is updated from it: top-level keys present in
    /// the response overwrite the target's, keys the response leaves out keep
    /// their current value. A 2xx response without a body leaves `target`
    /// untouched.
    pub async fn request<B, R>(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: Url,
        body: Option<&B>,
        target: Option<&mut R>,
        options: &RequestOptions,
    ) -> ManagementResult<()>
    where
        B: Serialize + ?Sized,
        R: Serialize + DeserializeOwned,
    {
        let response = self.exchange(ctx, method, url, body, options).await?;

        match target {
            Some(target) if !response.is_empty() => merge_into(target, &response.body),
            _ => Ok(()),
        }
    }

    /// GET `url` and decode the response body as a whole.
    ///
    /// The body must decode into `R` on its own; an empty or incomplete body
    /// is a serialization error, never a default value.
    pub async fn fetch<R>(
        &self,
        ctx: &RequestContext,
        url: Url,
        options: &RequestOptions,
    ) -> ManagementResult<R>
    where
        R: DeserializeOwned,
    {
        self.call(ctx, Method::Get, url, None::<&()>, options).await
    }

    /// Perform one API call and decode the response body as a new value.
    ///
    /// Like [`Management::fetch`], the body has to carry everything `R`
    /// requires.
    pub async fn call<B, R>(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: Url,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> ManagementResult<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.exchange(ctx, method, url, body, options).await?;
        serde_json::from_slice(&response.body).map_err(ManagementError::decoding)
    }

    /// Send `body` and discard whatever the API answers on success.
    pub async fn send<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: Url,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> ManagementResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.request(ctx, method, url, body, None::<&mut Value>, options)
            .await
    }

    async fn exchange<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        url: Url,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> ManagementResult<HttpResponse>
    where
        B: Serialize + ?Sized,
    {
        let request = self.build_request(ctx, method, url, body, options)?;
        self.execute(ctx, request).await
    }

    fn build_request<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        mut url: Url,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> ManagementResult<HttpRequest>
    where
        B: Serialize + ?Sized,
    {
        if method == Method::Get {
            let pairs = options.query_pairs();
            if !pairs.is_empty() {
                url.query_pairs_mut().extend_pairs(pairs);
            }
        }

        let mut request = HttpRequest::new(method, url)
            .with_header("Accept", "application/json")
            .with_header("X-Request-Id", ctx.request_id.as_str());

        if let Some(body) = body {
            let encoded = serde_json::to_vec(body).map_err(ManagementError::encoding)?;
            trace!(
                "Request body [{}]: {}",
                ctx.request_id,
                String::from_utf8_lossy(&encoded)
            );
            request = request
                .with_header("Content-Type", "application/json")
                .with_body(encoded);
        }

        for (name, value) in self.config.default_headers.iter().cloned() {
            request = request.with_header(name, value);
        }
        for (name, value) in options.headers() {
            request = request.with_header(name, value);
        }
        Ok(request)
    }

    async fn execute(
        &self,
        ctx: &RequestContext,
        request: HttpRequest,
    ) -> ManagementResult<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();
        debug!("{} {} [request_id={}]", method, url, ctx.request_id);

        let deadline = ctx.deadline().or_else(|| {
            self.config
                .request_timeout
                .map(|timeout| Instant::now() + timeout)
        });
        let response = race(ctx, deadline, self.transport.send(request))
            .await
            .inspect_err(|e| {
                debug!("{} {} failed [request_id={}]: {}", method, url, ctx.request_id, e)
            })?;

        if !response.is_success() {
            let error = ApiError::from_response(response.status, &response.body);
            warn!(
                "{} {} returned {} [request_id={}]: {}",
                method, url, response.status, ctx.request_id, error.message
            );
            return Err(error.into());
        }

        debug!(
            "{} {} returned {} [request_id={}]",
            method, url, response.status, ctx.request_id
        );
        trace!(
            "Response body [{}]: {}",
            ctx.request_id,
            String::from_utf8_lossy(&response.body)
        );
        Ok(response)
    }
}

/// Drive `exchange` until it completes, the context is cancelled, or the
/// deadline passes. Cancellation is checked first, so an already-cancelled
/// context never reaches the transport.
async fn race<F>(
    ctx: &RequestContext,
    deadline: Option<Instant>,
    exchange: F,
) -> Result<HttpResponse, TransportError>
where
    F: Future<Output = Result<HttpResponse, TransportError>>,
{
    let cancelled = async {
        match ctx.cancellation() {
            Some(token) => token.cancelled().await,
            None => pending::<()>().await,
        }
    };
    let expired = async {
        match deadline {
            Some(deadline) => tokio::time::sleep_until(deadline).await,
            None => pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancelled => Err(TransportError::Cancelled),
        _ = expired => Err(TransportError::Timeout),
        result = exchange => result,
    }
}

/// Decode `body` into `target`, keeping target keys the body doesn't mention.
fn merge_into<R>(target: &mut R, body: &[u8]) -> ManagementResult<()>
where
    R: Serialize + DeserializeOwned,
{
    let incoming: Value = serde_json::from_slice(body).map_err(ManagementError::decoding)?;
    let merged = match (serde_json::to_value(&*target), incoming) {
        (Ok(Value::Object(mut current)), Value::Object(incoming)) => {
            current.extend(incoming);
            Value::Object(current)
        }
        (_, incoming) => incoming,
    };
    *target = serde_json::from_value(merged).map_err(ManagementError::decoding)?;
    Ok(())
}
