mod common;

use common::{Journal, Reply, TestRequest, TestResponse, mw, run};
use switchyard::{BuildError, Method, Outcome, Router};

fn echo_params() -> impl switchyard::Middleware<TestRequest, TestResponse, String> {
    mw(|req, _res, _next| {
        let mut pairs: Vec<String> = req
            .params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        pairs.sort();
        Box::pin(async move { Ok(Outcome::Value(pairs.join("&"))) })
    })
}

#[tokio::test]
async fn test_params_are_attached() {
    let router = Router::<TestRequest, TestResponse, String>::builder()
        .attach_params(true)
        .get("/users/:userId/posts/:postId", echo_params())
        .build()
        .unwrap();

    let (result, req, _) = run(&router, "GET", "/users/12/posts/23").await;

    assert_eq!(result.unwrap(), Outcome::Value("postId=23&userId=12".to_owned()));
    assert_eq!(req.param("userId"), Some("12"));
    assert_eq!(req.param("postId"), Some("23"));
}

#[tokio::test]
async fn test_params_are_not_attached_by_default() {
    let router = Router::<TestRequest, TestResponse, String>::builder()
        .get("/users/:userId", echo_params())
        .build()
        .unwrap();

    let (result, req, _) = run(&router, "GET", "/users/12").await;

    assert_eq!(result.unwrap(), Outcome::Value(String::new()));
    assert!(req.params.is_empty());
}

#[tokio::test]
async fn test_later_matches_overwrite_colliding_params() {
    let router = Router::<TestRequest, TestResponse, String>::builder()
        .attach_params(true)
        .all("/:id/:kind", Journal::new().record("first"))
        .get("/:id/:other", echo_params())
        .build()
        .unwrap();

    let mut req = TestRequest::get("/7/photo");
    req.params.insert("id", "0");
    req.params.insert("existing", "kept");
    let mut res = TestResponse::new();
    let outcome = router.run(&mut req, &mut res).await.unwrap();

    assert_eq!(
        outcome,
        Outcome::Value("existing=kept&id=7&kind=photo&other=photo".to_owned())
    );
}

#[tokio::test]
async fn test_method_filtering() {
    let journal = Journal::new();
    let router = Router::<TestRequest, TestResponse>::builder()
        .get("/item", journal.record("get"))
        .post("/item", journal.record("post"))
        .put("/item", journal.record("put"))
        .patch("/item", journal.record("patch"))
        .delete("/item", journal.record("delete"))
        .options("/item", journal.record("options"))
        .trace("/item", journal.record("trace"))
        .all("/item", journal.record("all"))
        .on(Method::Delete, journal.record("any-path-delete"))
        .build()
        .unwrap();

    assert!(run(&router, "DELETE", "/item").await.0.unwrap().is_no_match());
    assert_eq!(journal.entries(), vec!["delete", "all", "any-path-delete"]);

    journal.clear();
    assert!(run(&router, "PURGE", "/item").await.0.unwrap().is_no_match());
    assert_eq!(journal.entries(), vec!["all"]);

    journal.clear();
    assert!(run(&router, "post", "/item").await.0.unwrap().is_no_match());
    assert_eq!(journal.entries(), vec!["all"]);
}

#[tokio::test]
async fn test_get_routes_answer_head() {
    let journal = Journal::new();
    let router = Router::<TestRequest, TestResponse>::builder()
        .get("/", journal.record("get"))
        .head("/", journal.record("head"))
        .build()
        .unwrap();

    assert!(run(&router, "HEAD", "/").await.0.unwrap().is_no_match());
    assert_eq!(journal.entries(), vec!["get", "head"]);

    journal.clear();
    assert!(run(&router, "GET", "/").await.0.unwrap().is_no_match());
    assert_eq!(journal.entries(), vec!["get"]);
}

#[tokio::test]
async fn test_patterns_match_whole_path() {
    let router = Router::<TestRequest, TestResponse, u8>::builder()
        .get("/about", Reply(1))
        .build()
        .unwrap();

    for path in ["/about/", "/About", "/about/team", "/aboutus"] {
        let (result, _, _) = run(&router, "GET", path).await;
        assert_eq!(result.unwrap(), Outcome::NoMatch, "{path} should not match");
    }
    let (result, _, _) = run(&router, "GET", "/about").await;
    assert_eq!(result.unwrap(), Outcome::Value(1));
}

#[tokio::test]
async fn test_optional_and_wildcard_segments() {
    let router = Router::<TestRequest, TestResponse, String>::builder()
        .attach_params(true)
        .get("/books/:genre?", echo_params())
        .get("/files/*path", echo_params())
        .get("/assets/*", echo_params())
        .build()
        .unwrap();

    let cases = [
        ("/books", ""),
        ("/books/horror", "genre=horror"),
        ("/files/a/b/c.txt", "path=a/b/c.txt"),
        ("/assets/", "wild="),
        ("/assets/site.css", "wild=site.css"),
    ];
    for (path, expected) in cases {
        let (result, _, _) = run(&router, "GET", path).await;
        assert_eq!(
            result.unwrap(),
            Outcome::Value(expected.to_owned()),
            "unexpected params for {path}"
        );
    }
}

#[tokio::test]
async fn test_using_at_respects_segment_boundary() {
    let journal = Journal::new();
    let router = Router::<TestRequest, TestResponse>::builder()
        .using_at("/admin", journal.record("admin"))
        .using_at("/", journal.record("root"))
        .build()
        .unwrap();

    for path in ["/admin", "/admin/", "/admin/users"] {
        journal.clear();
        assert!(run(&router, "GET", path).await.0.unwrap().is_no_match());
        assert_eq!(journal.entries(), vec!["admin", "root"], "{path}");
    }
    for path in ["/administrator", "/public/admin"] {
        journal.clear();
        assert!(run(&router, "GET", path).await.0.unwrap().is_no_match());
        assert_eq!(journal.entries(), vec!["root"], "{path}");
    }
}

#[tokio::test]
async fn test_using_at_does_not_rewrite_path() {
    let router = Router::<TestRequest, TestResponse, String>::builder()
        .using_at(
            "/v1",
            mw(|req, _res, _next| {
                let path = req.path.clone();
                Box::pin(async move { Ok(Outcome::Value(path)) })
            }),
        )
        .build()
        .unwrap();

    let (result, _, _) = run(&router, "GET", "/v1/users").await;
    assert_eq!(result.unwrap(), Outcome::Value("/v1/users".to_owned()));
}

#[test]
fn test_invalid_registrations_fail_build() {
    let err = Router::<TestRequest, TestResponse>::builder()
        .get("/ok", Reply(()))
        .get("/users/:id/:id", Reply(()))
        .build()
        .unwrap_err();
    assert!(matches!(err, BuildError::InvalidPattern { .. }));
    assert!(err.to_string().contains("/users/:id/:id"));

    let err = Router::<TestRequest, TestResponse>::builder()
        .using_at("relative", Reply(()))
        .build()
        .unwrap_err();
    assert!(matches!(err, BuildError::InvalidBase { .. }));
}
