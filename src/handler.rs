//! Handler trait and type erasure.
//!
//! The route table must hold handlers of different concrete types in one
//! structure, so each registered `async fn` is boxed behind
//! `Arc<dyn ErasedHandler>` at mount time. At request time the cost is one
//! `Arc` clone and one virtual call — noise next to the admission chain
//! itself, let alone the socket.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future resolving to a [`Response`].
pub(crate) type BoxFuture = Pin<Box<dyn Future<Output = Response> + Send + 'static>>;

/// Dispatch interface the route table stores. Public only because it leaks
/// through `Handler::into_boxed_handler`; not useful outside the crate.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture;
}

/// A mounted handler, shared across every in-flight request that hits it.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Satisfied by every valid route handler:
/// `async fn name(req: Request) -> impl IntoResponse`.
///
/// Sealed — the blanket impl below is the only implementation, so the
/// mounting API cannot be satisfied by accident from outside.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

// `Fn(Request) -> Fut` covers named async fns, closures returning async
// blocks (how the discovery endpoint is mounted), and fn-implementing
// structs alike.
impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Holds the concrete `F` on one side of the vtable.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
