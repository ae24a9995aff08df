//! End-to-end HTTP tests: the real router over the nullable store.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use heritage_governance::{FeedbackInbox, IdentityResolver, ModerationQueue, RetryPolicy};
use heritage_nullables::{NullRandom, NullStore, RecordingNotifier};
use heritage_rpc::{router, AppState, RpcConfig};
use heritage_store::{FeedbackStore, MonumentStore};
use heritage_types::{Coordinates, MonumentStatus, NewMonument};
use serde_json::{json, Value};
use tower::ServiceExt;

const ADMIN_KEY: &str = "moderator-secret";

struct Harness {
    store: Arc<NullStore>,
    notifier: Arc<RecordingNotifier>,
    app: Router,
}

fn harness_with(config: RpcConfig) -> Harness {
    harness_notifying(config, RecordingNotifier::new())
}

fn harness_notifying(config: RpcConfig, notifier: RecordingNotifier) -> Harness {
    let store = Arc::new(NullStore::new());
    let notifier = Arc::new(notifier);
    let state = AppState::new(store.clone(), config)
        .with_identity(IdentityResolver::new(Arc::new(NullRandom::default())))
        .with_queue(ModerationQueue::new(notifier.clone(), RetryPolicy::default()))
        .with_inbox(FeedbackInbox::new(notifier.clone(), RetryPolicy::default()));
    Harness {
        store,
        notifier,
        app: router(Arc::new(state)),
    }
}

fn harness() -> Harness {
    harness_with(RpcConfig {
        admin_key: Some(ADMIN_KEY.into()),
        ..RpcConfig::default()
    })
}

fn seed_monument(store: &NullStore, city: &str, status: MonumentStatus) -> u64 {
    store
        .create_monument(&NewMonument {
            title: "Водонапорная башня".into(),
            description: "1911".into(),
            city: city.into(),
            coordinates: Coordinates::new(55.85, 38.44).unwrap(),
            status,
            images: vec![],
        })
        .unwrap()
        .id
        .get()
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Option<String>, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let cookie = resp
        .headers()
        .get(header::SET_COOKIE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, cookie, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

fn json_req(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    let mut req = json_req(method, uri, body);
    req.headers_mut()
        .insert("x-admin-key", ADMIN_KEY.parse().unwrap());
    req
}

fn admin(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-admin-key", ADMIN_KEY)
        .body(Body::empty())
        .unwrap()
}

fn vote(monument: u64, vote_type: &str, cookie: Option<&str>) -> Request<Body> {
    let mut req = json_req(
        "POST",
        "/api/vote",
        json!({ "monumentId": monument, "voteType": vote_type }),
    );
    if let Some(c) = cookie {
        req.headers_mut().insert(header::COOKIE, c.parse().unwrap());
    }
    req
}

/// `session_id=<token>` from a `Set-Cookie` value.
fn cookie_pair(set_cookie: &str) -> String {
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn health_is_ok() {
    let h = harness();
    let (status, _, body) = send(&h.app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn first_vote_sets_cookie_and_repeat_is_already_voted() {
    let h = harness();
    let id = seed_monument(&h.store, "Ногинск", MonumentStatus::NotEvaluated);

    let (status, set_cookie, body) = send(&h.app, vote(id, "restore", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "votes_restore": 1, "votes_keep": 0 }));
    let set_cookie = set_cookie.expect("voter cookie minted");
    assert!(set_cookie.starts_with("session_id="));
    assert!(set_cookie.contains("Max-Age=31536000"));
    let cookie = cookie_pair(&set_cookie);

    let (status, again, body) = send(&h.app, vote(id, "restore", Some(&cookie))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(again, None);
    assert_eq!(
        body,
        json!({ "status": "already_voted", "votes_restore": 1, "votes_keep": 0 })
    );

    let (_, _, body) = send(&h.app, vote(id, "keep", Some(&cookie))).await;
    assert_eq!(body, json!({ "status": "success", "votes_restore": 0, "votes_keep": 1 }));

    let mut req = get(&format!("/api/monuments/{id}/vote-status"));
    req.headers_mut().insert(header::COOKIE, cookie.parse().unwrap());
    let (_, _, body) = send(&h.app, req).await;
    assert_eq!(body, json!({ "hasVoted": true, "voteType": "keep" }));
}

#[tokio::test]
async fn vote_status_without_cookie_is_not_voted() {
    let h = harness();
    let id = seed_monument(&h.store, "Ногинск", MonumentStatus::NotEvaluated);
    let (status, set_cookie, body) = send(&h.app, get(&format!("/api/monuments/{id}/vote-status"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(set_cookie, None);
    assert_eq!(body, json!({ "hasVoted": false }));
}

#[tokio::test]
async fn invalid_vote_type_is_bad_request() {
    let h = harness();
    let id = seed_monument(&h.store, "Ногинск", MonumentStatus::NotEvaluated);
    let (status, _, body) = send(&h.app, vote(id, "destroy", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(h.store.get_monument(heritage_types::MonumentId::new(id)).unwrap().total_votes(), 0);
}

#[tokio::test]
async fn vote_on_unknown_monument_is_not_found() {
    let h = harness();
    let (status, _, body) = send(&h.app, vote(77, "keep", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn exhausted_retries_are_conflict() {
    let h = harness();
    let id = seed_monument(&h.store, "Ногинск", MonumentStatus::NotEvaluated);
    h.store.inject_conflicts(10);
    let (status, _, _) = send(&h.app, vote(id, "keep", None)).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn monuments_default_to_configured_city() {
    let h = harness();
    seed_monument(&h.store, "Ногинск", MonumentStatus::RequiresRestoration);
    seed_monument(&h.store, "Электросталь", MonumentStatus::Restored);

    let (_, _, body) = send(&h.app, get("/api/monuments")).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["city"], "Ногинск");
    assert_eq!(list[0]["color_class"], "red");

    let (_, _, body) = send(&h.app, get("/api/monuments?city=%D0%AD%D0%BB%D0%B5%D0%BA%D1%82%D1%80%D0%BE%D1%81%D1%82%D0%B0%D0%BB%D1%8C")).await;
    assert_eq!(body[0]["color_class"], "green");

    let (_, _, body) = send(&h.app, get("/api/stats")).await;
    assert_eq!(
        body,
        json!({ "cities_count": 2, "monuments_count": 2, "pending_proposals": 0 })
    );
}

#[tokio::test]
async fn empty_city_parameter_matches_nothing() {
    let h = harness();
    seed_monument(&h.store, "Ногинск", MonumentStatus::Restored);

    let (status, _, body) = send(&h.app, get("/api/monuments?city=")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn vote_accepts_monument_id_as_string() {
    let h = harness();
    let id = seed_monument(&h.store, "Ногинск", MonumentStatus::NotEvaluated);

    let req = json_req(
        "POST",
        "/api/vote",
        json!({ "monumentId": id.to_string(), "voteType": "restore" }),
    );
    let (status, _, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "votes_restore": 1, "votes_keep": 0 }));

    let req = json_req(
        "POST",
        "/api/vote",
        json!({ "monumentId": "first", "voteType": "restore" }),
    );
    let (status, _, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn admin_routes_require_key() {
    let h = harness();
    let id = seed_monument(&h.store, "Ногинск", MonumentStatus::NotEvaluated);

    let (status, _, body) = send(
        &h.app,
        Request::delete(format!("/api/monuments/{id}")).body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["status"], "error");

    let (status, _, _) = send(&h.app, admin("DELETE", &format!("/api/monuments/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&h.app, get(&format!("/api/monuments/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_routes_closed_without_configured_key() {
    let h = harness_with(RpcConfig::default());
    let (status, _, _) = send(
        &h.app,
        admin_json(
            "POST",
            "/api/monuments",
            json!({ "title": "x", "city": "Ногинск", "latitude": 55.0, "longitude": 38.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

/// Proposal → listed → approved as restored → shown green in the city list.
#[tokio::test]
async fn proposal_approval_flow() {
    let h = harness();

    let (status, _, body) = send(
        &h.app,
        json_req(
            "POST",
            "/api/propose-monument",
            json!({ "title": "Памятник Ленину", "latitude": 55.83, "longitude": 38.45 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let proposal_id = body["id"].as_u64().unwrap();
    assert_eq!(h.notifier.submitted().len(), 1);

    let (_, _, body) = send(&h.app, get("/api/proposed-monuments")).await;
    assert_eq!(body[0]["title"], "Памятник Ленину");
    let (_, _, body) = send(&h.app, get("/api/proposed-monuments/count")).await;
    assert_eq!(body, json!({ "count": 1 }));

    let (status, _, body) = send(
        &h.app,
        admin_json(
            "POST",
            "/api/approve-monument",
            json!({
                "proposal_id": proposal_id,
                "title": "Памятник Ленину",
                "description": "",
                "city": "Ногинск",
                "latitude": 55.83,
                "longitude": 38.45,
                "status": "restored"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");

    let (_, _, body) = send(&h.app, get("/api/proposed-monuments")).await;
    assert_eq!(body, json!([]));
    let (status, _, _) = send(&h.app, get(&format!("/api/proposed-monuments/{proposal_id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, _, body) = send(&h.app, get("/api/monuments?city=%D0%9D%D0%BE%D0%B3%D0%B8%D0%BD%D1%81%D0%BA")).await;
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Памятник Ленину");
    assert_eq!(list[0]["color_class"], "green");
}

#[tokio::test]
async fn reject_is_idempotent_over_http() {
    let h = harness();
    let (_, _, body) = send(
        &h.app,
        json_req(
            "POST",
            "/api/propose-monument",
            json!({ "title": "Часовня", "latitude": 55.8, "longitude": 38.4 }),
        ),
    )
    .await;
    let id = body["id"].as_u64().unwrap();

    for _ in 0..2 {
        let (status, _, body) = send(&h.app, admin("POST", &format!("/api/reject-monument/{id}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "success" }));
    }
    let (status, _, _) = send(&h.app, admin("DELETE", &format!("/api/proposed-monuments/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn edit_of_missing_proposal_is_not_found() {
    let h = harness();
    let (status, _, _) = send(
        &h.app,
        admin_json(
            "PUT",
            "/api/proposed-monuments/5",
            json!({ "title": "Часовня", "latitude": 55.8, "longitude": 38.4 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn private_proposals_need_admin_key() {
    let h = harness_with(RpcConfig {
        admin_key: Some(ADMIN_KEY.into()),
        public_proposals: false,
        ..RpcConfig::default()
    });
    let (status, _, _) = send(&h.app, get("/api/proposed-monuments")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _, _) = send(&h.app, admin("GET", "/api/proposed-monuments/count")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn proposal_with_bad_coordinates_is_rejected() {
    let h = harness();
    let (status, _, _) = send(
        &h.app,
        json_req(
            "POST",
            "/api/propose-monument",
            json!({ "title": "Часовня", "latitude": 123.0, "longitude": 38.4 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.notifier.submitted().is_empty());
}

#[tokio::test]
async fn news_publish_list_and_delete() {
    let h = harness();
    for (title, section) in [("Первая", "latest"), ("Вторая", "restored"), ("Третья", "latest")] {
        let (status, _, _) = send(
            &h.app,
            admin_json(
                "POST",
                "/api/news",
                json!({ "title": title, "content": "Текст", "section": section, "image": "a.jpg" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, _, body) = send(&h.app, get("/api/news?section=latest")).await;
    let news = body["news"].as_array().unwrap();
    assert_eq!(news.len(), 2);
    assert_eq!(news[0]["title"], "Третья");
    assert_eq!(news[0]["image_url"], "/static/images/a.jpg");
    assert!(body.get("cursor").is_none());

    let (_, _, body) = send(&h.app, get("/api/news?count=2")).await;
    let cursor = body["cursor"].as_str().unwrap().to_string();
    let (_, _, body) = send(&h.app, get(&format!("/api/news?count=2&cursor={cursor}"))).await;
    assert_eq!(body["news"][0]["title"], "Первая");

    let (status, _, _) = send(&h.app, get("/api/news?section=gossip")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let id = body["news"][0]["id"].as_u64().unwrap();
    let (status, _, _) = send(&h.app, admin("DELETE", &format!("/api/news/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = send(&h.app, get(&format!("/api/news/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = send(&h.app, admin("DELETE", &format!("/api/news/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let h = harness();
    let req = Request::post("/api/vote")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, _, body) = send(&h.app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

fn feedback_body(message: &str) -> Value {
    json!({
        "name": "Ольга",
        "email": "olga@example.org",
        "message_type": "error",
        "message": message,
    })
}

#[tokio::test]
async fn feedback_is_stored_and_announced() {
    let h = harness();
    let (status, _, body) = send(
        &h.app,
        json_req("POST", "/api/feedback", feedback_body("Неверный адрес у собора")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "id": 1 }));

    let stored = h.store.list_feedback(10).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].message, "Неверный адрес у собора");
    assert_eq!(h.notifier.feedback(), vec![stored[0].id]);

    let (status, _, _) = send(&h.app, get("/api/feedback")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _, body) = send(&h.app, admin("GET", "/api/feedback?count=5")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["email"], "olga@example.org");
    assert_eq!(body[0]["message_type"], "error");
}

#[tokio::test]
async fn blank_feedback_is_rejected() {
    let h = harness();
    let mut body = feedback_body("текст");
    body["name"] = json!("  ");
    let (status, _, resp) = send(&h.app, json_req("POST", "/api/feedback", body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["status"], "error");

    let (status, _, _) = send(
        &h.app,
        json_req("POST", "/api/feedback", json!({ "message": "без имени" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(h.store.list_feedback(10).unwrap().is_empty());
    assert!(h.notifier.feedback().is_empty());
}

#[tokio::test]
async fn feedback_survives_undeliverable_notification() {
    let h = harness_notifying(
        RpcConfig {
            admin_key: Some(ADMIN_KEY.into()),
            ..RpcConfig::default()
        },
        RecordingNotifier::failing(),
    );
    let (status, _, body) = send(
        &h.app,
        json_req("POST", "/api/feedback", feedback_body("Бот не отвечает")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(h.store.list_feedback(10).unwrap().len(), 1);
}
