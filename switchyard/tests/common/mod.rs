#![allow(dead_code)]

use switchyard::{BoxError, BoxFuture, FromFn, Middleware, Next, Outcome, Request, Router, from_fn};

pub use switchyard::testing::{
    CountingMiddleware, Fail, Journal, Reply, TestRequest, TestResponse,
};

// ============================================================================
// Test Middleware
// ============================================================================

pub type Chain<'a, V> = BoxFuture<'a, Result<Outcome<V>, BoxError>>;

/// Pin a closure to the test host types so its signature is inferred.
pub fn mw<V, F>(f: F) -> FromFn<F>
where
    V: Send + 'static,
    F: for<'a> Fn(
            &'a mut TestRequest,
            &'a mut TestResponse,
            Next<'a, TestRequest, TestResponse, V>,
        ) -> Chain<'a, V>
        + Send
        + Sync
        + 'static,
{
    from_fn(f)
}

/// Adds its value to whatever the rest of the chain produced.
pub struct Add(pub i32);

impl<Req: Request, Res: Send + 'static> Middleware<Req, Res, i32> for Add {
    async fn handle<'a>(
        &'a self,
        req: &'a mut Req,
        res: &'a mut Res,
        next: Next<'a, Req, Res, i32>,
    ) -> Result<Outcome<i32>, BoxError> {
        Ok(next.run(req, res).await?.map(|v| v + self.0))
    }
}

/// Writes its label to the journal, then panics.
pub struct Explode {
    pub journal: Journal,
    pub label: &'static str,
}

impl<Req: Request, Res: Send + 'static, V: Send + 'static> Middleware<Req, Res, V> for Explode {
    async fn handle<'a>(
        &'a self,
        _req: &'a mut Req,
        _res: &'a mut Res,
        _next: Next<'a, Req, Res, V>,
    ) -> Result<Outcome<V>, BoxError> {
        self.journal.push(self.label);
        panic!("{} exploded", self.label)
    }
}

// ============================================================================
// Requests
// ============================================================================

pub async fn run<V: Send + 'static>(
    router: &Router<TestRequest, TestResponse, V>,
    method: &str,
    path: &str,
) -> (Result<Outcome<V>, BoxError>, TestRequest, TestResponse) {
    let mut req = TestRequest::new(method, path);
    let mut res = TestResponse::new();
    let result = router.run(&mut req, &mut res).await;
    (result, req, res)
}
