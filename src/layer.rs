use std::task::{Context, Poll};

use http::Request;
use tower_cookies::{CookieManager, Cookies};
use tower_layer::Layer;
use tower_service::Service;

use crate::transaction::Transaction;

/// Inserts a [`Transaction`] backed by the request's cookie jar into request extensions.
///
/// Handlers take it out (for example with axum's `Extension<Transaction>`) and pass it to a
/// [`SessionManager`](crate::SessionManager). `Set-Cookie` headers written through it are added
/// to the response by the wrapped [`CookieManager`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionLayer;

impl TransactionLayer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for TransactionLayer {
    type Service = CookieManager<TransactionService<S>>;

    fn layer(&self, inner: S) -> Self::Service {
        CookieManager::new(TransactionService { inner })
    }
}

#[derive(Debug, Clone)]
pub struct TransactionService<S> {
    inner: S,
}

impl<ReqBody, S> Service<Request<ReqBody>> for TransactionService<S>
where
    S: Service<Request<ReqBody>>,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<ReqBody>) -> Self::Future {
        let transaction = match req.extensions().get::<Cookies>().cloned() {
            Some(cookies) => Transaction::from_cookies(cookies, req.headers()),
            None => {
                tracing::error!("request has no cookie jar, sessions will not be persisted");
                Transaction::empty()
            }
        };
        req.extensions_mut().insert(transaction);

        self.inner.call(req)
    }
}
