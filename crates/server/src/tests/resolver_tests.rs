use super::*;
use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Redirect},
    routing::{get, post},
    Form, Router,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Debug, Clone)]
struct LandingPost {
    query: HashMap<String, String>,
    form: HashMap<String, String>,
    cookie: Option<String>,
}

#[derive(Clone, Default)]
struct UpstreamState {
    posts: Arc<Mutex<Vec<LandingPost>>>,
}

fn landing_page(action: &str) -> Html<String> {
    Html(format!(
        r#"<html><body>
        <form id="landing" method="post" action="{action}">
            <input type="hidden" name="_wp_http" value="c2VjcmV0&#038;more">
            <input type="hidden" name="token" value="t-1">
            <input type="submit" value="Continue">
        </form>
        </body></html>"#
    ))
}

async fn session_page() -> impl IntoResponse {
    (
        [(header::SET_COOKIE, "sid=abc; Path=/")],
        landing_page("/go?a=1&#038;b=2"),
    )
}

async fn session_post(
    State(state): State<UpstreamState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Redirect {
    let cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let has_session = cookie.as_deref().is_some_and(|c| c.contains("sid=abc"));
    state.posts.lock().await.push(LandingPost {
        query,
        form,
        cookie,
    });
    if has_session {
        Redirect::to("/final/with-cookie")
    } else {
        Redirect::to("/final/no-cookie")
    }
}

async fn layered_page() -> Html<String> {
    landing_page("/go-layered")
}

async fn dead_end_page() -> Html<String> {
    landing_page("/go-dead-end")
}

async fn second_layer() -> Html<&'static str> {
    Html(
        r#"<a class="nav" href="/home">Home</a>
        <a class="btn btn-download" href="https://mega.nz/file/abc">Download</a>"#,
    )
}

async fn empty_layer() -> Html<&'static str> {
    Html("<p>Please wait...</p>")
}

async fn plain_page() -> Html<&'static str> {
    Html("<html><body><p>No form here</p></body></html>")
}

async fn slow_page() -> &'static str {
    tokio::time::sleep(Duration::from_secs(3)).await;
    "late"
}

async fn broken_page() -> axum::http::StatusCode {
    axum::http::StatusCode::INTERNAL_SERVER_ERROR
}

async fn spawn_upstream() -> anyhow::Result<(String, UpstreamState)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = UpstreamState::default();
    let app = Router::new()
        .route("/p", get(session_page))
        .route("/go", post(session_post))
        .route("/final/with-cookie", get(|| async { "done" }))
        .route("/final/no-cookie", get(|| async { "done" }))
        .route("/layered", get(layered_page))
        .route("/go-layered", post(|| async { Redirect::to("/hop/pahe.li") }))
        .route("/hop/pahe.li", get(second_layer))
        .route("/dead-end", get(dead_end_page))
        .route(
            "/go-dead-end",
            post(|| async { Redirect::to("/hop/intercelestial.com") }),
        )
        .route("/hop/intercelestial.com", get(empty_layer))
        .route("/plain", get(plain_page))
        .route("/slow", get(slow_page))
        .route("/broken", get(broken_page))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), state))
}

fn resolver_with_timeout(secs: u64) -> HttpLinkResolver {
    HttpLinkResolver::new(&Settings {
        upstream_timeout_secs: secs,
        ..Settings::default()
    })
    .expect("resolver")
}

fn page(base: &str, path: &str) -> Url {
    Url::parse(&format!("{base}{path}")).expect("url")
}

#[tokio::test]
async fn landing_form_is_posted_with_session_cookie_and_decoded_fields() {
    let (base, state) = spawn_upstream().await.expect("spawn upstream");

    let link = resolver_with_timeout(5)
        .resolve(&page(&base, "/p"))
        .await
        .expect("resolve");
    assert_eq!(link, format!("{base}/final/with-cookie"));

    let posts = state.posts.lock().await;
    assert_eq!(posts.len(), 1);
    let post = &posts[0];
    assert!(post
        .cookie
        .as_deref()
        .is_some_and(|cookie| cookie.contains("sid=abc")));
    assert_eq!(post.query.get("a").map(String::as_str), Some("1"));
    assert_eq!(post.query.get("b").map(String::as_str), Some("2"));
    assert_eq!(
        post.form.get("_wp_http").map(String::as_str),
        Some("c2VjcmV0&more")
    );
    assert_eq!(post.form.get("token").map(String::as_str), Some("t-1"));
    assert!(!post.form.contains_key(""));
}

#[tokio::test]
async fn second_layer_anchor_is_picked_on_intermediate_redirect() {
    let (base, _state) = spawn_upstream().await.expect("spawn upstream");

    let link = resolver_with_timeout(5)
        .resolve(&page(&base, "/layered"))
        .await
        .expect("resolve");
    assert_eq!(link, "https://mega.nz/file/abc");
}

#[tokio::test]
async fn intermediate_url_is_returned_when_no_anchor_found() {
    let (base, _state) = spawn_upstream().await.expect("spawn upstream");

    let link = resolver_with_timeout(5)
        .resolve(&page(&base, "/dead-end"))
        .await
        .expect("resolve");
    assert_eq!(link, format!("{base}/hop/intercelestial.com"));
}

#[tokio::test]
async fn page_without_landing_form_is_not_found() {
    let (base, _state) = spawn_upstream().await.expect("spawn upstream");

    let err = resolver_with_timeout(5)
        .resolve(&page(&base, "/plain"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, ResolveError::NotFound));
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn slow_upstream_maps_to_request_timeout() {
    let (base, _state) = spawn_upstream().await.expect("spawn upstream");

    let err = resolver_with_timeout(1)
        .resolve(&page(&base, "/slow"))
        .await
        .expect_err("should time out");
    assert!(matches!(err, ResolveError::Timeout), "{err:?}");
    assert_eq!(err.status(), StatusCode::REQUEST_TIMEOUT);
}

#[tokio::test]
async fn upstream_error_status_maps_to_bad_gateway() {
    let (base, _state) = spawn_upstream().await.expect("spawn upstream");

    let err = resolver_with_timeout(5)
        .resolve(&page(&base, "/broken"))
        .await
        .expect_err("should fail");
    assert!(matches!(err, ResolveError::Upstream(_)), "{err:?}");
    assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn zero_timeout_setting_does_not_fail_every_request() {
    let (base, _state) = spawn_upstream().await.expect("spawn upstream");

    let link = resolver_with_timeout(0)
        .resolve(&page(&base, "/p"))
        .await
        .expect("resolve without timeout");
    assert_eq!(link, format!("{base}/final/with-cookie"));
}
