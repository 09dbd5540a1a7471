//! Request logging middleware.

use crate::{middleware::Middleware, next::Next};
use switchyard_core::{BoxError, Outcome, Request};

/// A middleware that logs the request and how its chain ended.
///
/// Register it first so it observes every downstream layer. Logs at
/// `debug` level when the `tracing` feature is enabled and does nothing
/// otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger;

impl<Req, Res, V> Middleware<Req, Res, V> for Logger
where
    Req: Request,
    Res: Send + 'static,
    V: Send + 'static,
{
    async fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        #[cfg(feature = "tracing")]
        let (method, path, started) = (
            req.method().to_owned(),
            req.path().to_owned(),
            std::time::Instant::now(),
        );

        let result = next.run(req, res).await;

        #[cfg(feature = "tracing")]
        {
            let elapsed = started.elapsed();
            match &result {
                Ok(Outcome::Value(_)) => {
                    tracing::debug!(%method, %path, ?elapsed, "request handled");
                }
                Ok(Outcome::NoMatch) => {
                    tracing::debug!(%method, %path, ?elapsed, "request not matched");
                }
                Err(error) => {
                    tracing::debug!(%method, %path, ?elapsed, %error, "request failed");
                }
            }
        }

        result
    }
}
