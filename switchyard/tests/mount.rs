mod common;

use common::{Fail, Journal, Reply, TestRequest, TestResponse, mw, run};
use switchyard::{HandlerOptions, Method, Outcome, Router};

type App = Router<TestRequest, TestResponse, String>;

fn reply(text: &'static str) -> Reply<String> {
    Reply(text.to_owned())
}

fn api() -> App {
    Router::builder()
        .get("/users", reply("api users"))
        .get("/users/:id", reply("api user"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_mounted_router_sees_remainder() {
    let app: App = Router::builder().mount("/api", api()).build().unwrap();

    let (result, _, _) = run(&app, "GET", "/api/users").await;
    assert_eq!(result.unwrap(), Outcome::Value("api users".to_owned()));

    let (result, _, _) = run(&app, "GET", "/api/users/42").await;
    assert_eq!(result.unwrap(), Outcome::Value("api user".to_owned()));

    let (result, _, _) = run(&app, "GET", "/users").await;
    assert_eq!(result.unwrap(), Outcome::NoMatch);
}

#[tokio::test]
async fn test_mount_root_of_sub_router() {
    let sub: App = Router::builder().get("/", reply("index")).build().unwrap();
    let app: App = Router::builder().mount("/docs", sub).build().unwrap();

    for path in ["/docs", "/docs/"] {
        let (result, _, _) = run(&app, "GET", path).await;
        assert_eq!(result.unwrap(), Outcome::Value("index".to_owned()), "{path}");
    }
}

#[tokio::test]
async fn test_declining_sub_router_advances_parent() {
    let journal = Journal::new();
    let app: App = Router::builder()
        .using(journal.record("before"))
        .mount("/api", api())
        .using(journal.record("after"))
        .using(reply("parent fallback"))
        .build()
        .unwrap();

    let (result, _, _) = run(&app, "GET", "/api/unknown").await;

    assert_eq!(result.unwrap(), Outcome::Value("parent fallback".to_owned()));
    assert_eq!(journal.entries(), vec!["before", "after"]);
}

#[tokio::test]
async fn test_declining_last_sub_router_is_no_match() {
    let app: App = Router::builder().mount("/api", api()).build().unwrap();

    let (result, _, _) = run(&app, "DELETE", "/api/users").await;
    assert_eq!(result.unwrap(), Outcome::NoMatch);
}

#[tokio::test]
async fn test_sub_router_errors_propagate() {
    let sub: App = Router::builder().using(Fail::new("sub failed")).build().unwrap();
    let journal = Journal::new();
    let app: App = Router::builder()
        .mount("/", sub)
        .using(journal.record("never"))
        .build()
        .unwrap();

    let (result, _, _) = run(&app, "GET", "/anything").await;

    assert_eq!(result.unwrap_err().to_string(), "sub failed");
    assert!(journal.is_empty());
}

#[tokio::test]
async fn test_sub_router_fallbacks_are_not_consulted() {
    let sub: App = Router::builder().get("/x", reply("x")).build().unwrap();
    let app: App = Router::builder()
        .mount("/sub", sub)
        .using(reply("parent"))
        .build()
        .unwrap();
    let handler = app.handler(HandlerOptions::new());

    let mut req = TestRequest::get("/sub/missing");
    let mut res = TestResponse::new();
    handler.handle(&mut req, &mut res).await;

    assert!(!res.is_sent());
}

#[tokio::test]
async fn test_nested_mounts_strip_each_base() {
    let leaf: App = Router::builder()
        .attach_params(true)
        .get(
            "/:file",
            mw(|req, _res, _next| {
                let seen = format!(
                    "{} {} {}",
                    req.path,
                    req.param("tenant").unwrap_or("-"),
                    req.param("file").unwrap_or("-")
                );
                Box::pin(async move { Ok(Outcome::Value(seen)) })
            }),
        )
        .build()
        .unwrap();
    let middle: App = Router::builder()
        .attach_params(true)
        .mount("/files", leaf)
        .build()
        .unwrap();
    let app: App = Router::builder()
        .attach_params(true)
        .mount("/tenants/:tenant", middle)
        .build()
        .unwrap();

    let (result, req, _) = run(&app, "GET", "/tenants/acme/files/report.pdf").await;

    assert_eq!(
        result.unwrap(),
        Outcome::Value("/tenants/acme/files/report.pdf acme report.pdf".to_owned())
    );
    assert_eq!(req.param("tenant"), Some("acme"));
}

#[tokio::test]
async fn test_same_router_mounted_twice() {
    let shared = api();
    let app: App = Router::builder()
        .mount("/v1", shared.clone())
        .mount("/v2", shared)
        .build()
        .unwrap();

    for path in ["/v1/users", "/v2/users"] {
        let (result, _, _) = run(&app, "GET", path).await;
        assert_eq!(result.unwrap(), Outcome::Value("api users".to_owned()), "{path}");
    }
}

fn reports() -> App {
    Router::builder()
        .get("/", reply("report index"))
        .get("/:year", reply("yearly report"))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_method_route_delegates_wildcard_to_sub_router() {
    let journal = Journal::new();
    let app: App = Router::builder()
        .get("/reports/*", reports())
        .using(journal.record("after"))
        .build()
        .unwrap();

    let (result, _, _) = run(&app, "GET", "/reports/2024").await;
    assert_eq!(result.unwrap(), Outcome::Value("yearly report".to_owned()));

    let (result, _, _) = run(&app, "GET", "/reports/").await;
    assert_eq!(result.unwrap(), Outcome::Value("report index".to_owned()));
    assert!(journal.is_empty());

    // POST never reaches the GET-restricted sub-router.
    let (result, _, _) = run(&app, "POST", "/reports/2024").await;
    assert_eq!(result.unwrap(), Outcome::NoMatch);
    assert_eq!(journal.entries(), vec!["after"]);
}

#[tokio::test]
async fn test_declining_method_scoped_sub_router_advances_parent() {
    let app: App = Router::builder()
        .get("/reports/*", reports())
        .get("/reports/*", reply("parent fallback"))
        .build()
        .unwrap();

    let (result, _, _) = run(&app, "GET", "/reports/2024/q1").await;
    assert_eq!(result.unwrap(), Outcome::Value("parent fallback".to_owned()));
}

#[tokio::test]
async fn test_pattern_without_wildcard_hands_root_to_sub_router() {
    let app: App = Router::builder().all("/summary", reports()).build().unwrap();

    for method in ["GET", "HEAD"] {
        let (result, _, _) = run(&app, method, "/summary").await;
        assert_eq!(result.unwrap(), Outcome::Value("report index".to_owned()), "{method}");
    }
    let (result, _, _) = run(&app, "GET", "/summary/2024").await;
    assert_eq!(result.unwrap(), Outcome::NoMatch);
}

#[tokio::test]
async fn test_pattern_less_sub_routers_see_whole_path() {
    let app: App = Router::builder()
        .on(Method::Post, api())
        .using(reports())
        .build()
        .unwrap();

    // `api` only has GET routes, so POST falls through to `reports`.
    let (result, _, _) = run(&app, "POST", "/users").await;
    assert_eq!(result.unwrap(), Outcome::NoMatch);

    let (result, _, _) = run(&app, "GET", "/2024").await;
    assert_eq!(result.unwrap(), Outcome::Value("yearly report".to_owned()));

    let (result, _, _) = run(&app, "GET", "/users").await;
    assert_eq!(result.unwrap(), Outcome::Value("yearly report".to_owned()));
}

#[tokio::test]
async fn test_using_at_accepts_a_router() {
    let app: App = Router::builder().using_at("/api", api()).build().unwrap();

    let (result, _, _) = run(&app, "GET", "/api/users/7").await;
    assert_eq!(result.unwrap(), Outcome::Value("api user".to_owned()));
}
