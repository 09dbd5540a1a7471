//! Hook-to-middleware adapter.

use crate::{middleware::Middleware, next::Next};
use switchyard_core::{BoxError, Hook, HookResult, Outcome, Request};

/// Runs a [`Hook`] as a layer.
///
/// [`HookResult::Next`] continues with the rest of the chain;
/// [`HookResult::Stop`] ends it with `V::default()`, so a stopping hook
/// counts as having handled the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct HookLayer<H> {
    hook: H,
}

impl<H> HookLayer<H> {
    /// Wrap `hook`.
    pub const fn new(hook: H) -> Self {
        Self { hook }
    }

    /// The wrapped hook.
    pub fn hook(&self) -> &H {
        &self.hook
    }
}

impl<Req, Res, V, H> Middleware<Req, Res, V> for HookLayer<H>
where
    Req: Request,
    Res: Send + 'static,
    V: Default + Send + 'static,
    H: Hook<Req, Res>,
{
    async fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        match self.hook.on_request(req, res).await? {
            HookResult::Next => next.run(req, res).await,
            HookResult::Stop => Ok(Outcome::Value(V::default())),
        }
    }
}
