//! Cursor-based pagination with Stream API
//!
//! A [`Paginator`] turns a paginated operation into a lazy stream of page
//! bodies. The cursor returned in the response header of one page is sent in
//! the request header of the next; a page without a cursor ends the stream.
//!
//! # Example
//!
//! ```rust,ignore
//! use futures_util::StreamExt;
//!
//! let paginator = client.paginator(&LIST_NETWORKS, PathParams::from([("project", "p1")]));
//! let mut pages = std::pin::pin!(paginator.pages());
//! while let Some(page) = pages.next().await {
//!     let page = page?;
//!     // ...
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures_core::Stream;
use futures_util::TryStreamExt;
use pin_project_lite::pin_project;
use serde_json::Value;

use crate::client::{InvocationResult, NimbusClient};
use crate::descriptor::OperationDescriptor;
use crate::error::NimbusError;
use crate::path::PathParams;

pin_project! {
    /// Stream of page bodies driven by a page-fetching function.
    ///
    /// The fetcher receives the cursor of the page to load (`None` for the
    /// first page). Nothing is fetched until the stream is polled, and at most
    /// one fetch is in flight.
    pub struct CursorPages<F, Fut>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<InvocationResult, NimbusError>>,
    {
        next_cursor: Option<String>,
        done: bool,
        fetcher: F,
        #[pin]
        current_fetch: Option<Fut>,
    }
}

impl<F, Fut> CursorPages<F, Fut>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<InvocationResult, NimbusError>>,
{
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            next_cursor: None,
            done: false,
            fetcher,
            current_fetch: None,
        }
    }
}

impl<F, Fut> Stream for CursorPages<F, Fut>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<InvocationResult, NimbusError>>,
{
    type Item = Result<Value, NimbusError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if *this.done {
                return Poll::Ready(None);
            }

            if let Some(fut) = this.current_fetch.as_mut().as_pin_mut() {
                match fut.poll(cx) {
                    Poll::Ready(Ok(page)) => {
                        this.current_fetch.set(None);

                        *this.next_cursor = page.next_cursor;
                        if this.next_cursor.is_none() {
                            *this.done = true;
                        }

                        return Poll::Ready(Some(Ok(page.body)));
                    }
                    Poll::Ready(Err(e)) => {
                        this.current_fetch.set(None);
                        *this.done = true;
                        return Poll::Ready(Some(Err(e)));
                    }
                    Poll::Pending => return Poll::Pending,
                }
            }

            let fut = (this.fetcher)(this.next_cursor.take());
            this.current_fetch.set(Some(fut));
        }
    }
}

/// A paginated operation bound to its path parameters.
#[derive(Debug, Clone)]
pub struct Paginator {
    client: NimbusClient,
    descriptor: OperationDescriptor,
    params: PathParams,
}

impl Paginator {
    pub(crate) fn new(
        client: NimbusClient,
        descriptor: OperationDescriptor,
        params: PathParams,
    ) -> Self {
        Self {
            client,
            descriptor,
            params,
        }
    }

    /// A fresh walk from the first page.
    ///
    /// Each call starts over; the returned stream issues one request per
    /// page consumed and ends after the first error.
    #[must_use]
    pub fn pages(&self) -> impl Stream<Item = Result<Value, NimbusError>> + Send + '_ {
        CursorPages::new(move |cursor: Option<String>| async move {
            self.client
                .invoke(&self.descriptor, &self.params, None, cursor.as_deref())
                .await
        })
    }

    /// Drain every page into a vector.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered; pages fetched before it are
    /// discarded.
    pub async fn try_collect_pages(&self) -> Result<Vec<Value>, NimbusError> {
        self.pages().try_collect().await
    }
}
