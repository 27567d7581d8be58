//! End-to-end pipeline tests: Router + middleware + handlers over the in-memory store.
//!
//! The store is wrapped so each test can assert which store calls happened
//! (or, more to the point, that none did).

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use mesto_api::app::build_router;
use mesto_api::config::Config;
use mesto_api::error::INTERNAL_MESSAGE;
use mesto_api::repos::{
    Card, CardRepo, MemoryStore, NewCard, NewUser, RepoError, RepoResult, User, UserPatch,
    UserRepo,
};
use mesto_api::services::auth::{PasswordHasher, SessionTokenService};
use mesto_api::services::object_id::ObjectId;
use mesto_api::state::AppState;

const SECRET: &str = "integration-test-secret";

// -- store wrappers ---------------------------------------------------------

#[derive(Clone, Default)]
struct CountingStore {
    inner: MemoryStore,
    calls: Arc<AtomicUsize>,
    deletes: Arc<AtomicUsize>,
}

impl CountingStore {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserRepo for CountingStore {
    async fn list(&self) -> RepoResult<Vec<User>> {
        self.hit();
        UserRepo::list(&self.inner).await
    }

    async fn get(&self, id: ObjectId) -> RepoResult<Option<User>> {
        self.hit();
        UserRepo::get(&self.inner, id).await
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<User>> {
        self.hit();
        self.inner.find_by_email(email).await
    }

    async fn create(&self, user: NewUser) -> RepoResult<User> {
        self.hit();
        UserRepo::create(&self.inner, user).await
    }

    async fn update(&self, id: ObjectId, patch: UserPatch) -> RepoResult<Option<User>> {
        self.hit();
        self.inner.update(id, patch).await
    }
}

#[async_trait]
impl CardRepo for CountingStore {
    async fn list(&self) -> RepoResult<Vec<Card>> {
        self.hit();
        CardRepo::list(&self.inner).await
    }

    async fn get(&self, id: ObjectId) -> RepoResult<Option<Card>> {
        self.hit();
        CardRepo::get(&self.inner, id).await
    }

    async fn create(&self, card: NewCard) -> RepoResult<Card> {
        self.hit();
        CardRepo::create(&self.inner, card).await
    }

    async fn delete(&self, id: ObjectId) -> RepoResult<Option<Card>> {
        self.hit();
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.inner.delete(id).await
    }

    async fn like(&self, id: ObjectId, user: ObjectId) -> RepoResult<Option<Card>> {
        self.hit();
        self.inner.like(id, user).await
    }

    async fn unlike(&self, id: ObjectId, user: ObjectId) -> RepoResult<Option<Card>> {
        self.hit();
        self.inner.unlike(id, user).await
    }
}

/// Every call fails with a store-level error that carries internal detail.
struct BrokenStore;

fn broken<T>() -> RepoResult<T> {
    Err(RepoError::Corrupt("likes column holds \"users_pkey\"".into()))
}

#[async_trait]
impl UserRepo for BrokenStore {
    async fn list(&self) -> RepoResult<Vec<User>> {
        Err(RepoError::Db(sqlx::Error::PoolTimedOut))
    }
    async fn get(&self, _id: ObjectId) -> RepoResult<Option<User>> {
        broken()
    }
    async fn find_by_email(&self, _email: &str) -> RepoResult<Option<User>> {
        broken()
    }
    async fn create(&self, _user: NewUser) -> RepoResult<User> {
        broken()
    }
    async fn update(&self, _id: ObjectId, _patch: UserPatch) -> RepoResult<Option<User>> {
        broken()
    }
}

#[async_trait]
impl CardRepo for BrokenStore {
    async fn list(&self) -> RepoResult<Vec<Card>> {
        broken()
    }
    async fn get(&self, _id: ObjectId) -> RepoResult<Option<Card>> {
        broken()
    }
    async fn create(&self, _card: NewCard) -> RepoResult<Card> {
        broken()
    }
    async fn delete(&self, _id: ObjectId) -> RepoResult<Option<Card>> {
        broken()
    }
    async fn like(&self, _id: ObjectId, _user: ObjectId) -> RepoResult<Option<Card>> {
        broken()
    }
    async fn unlike(&self, _id: ObjectId, _user: ObjectId) -> RepoResult<Option<Card>> {
        broken()
    }
}

/// Never answers `list` within any sane deadline.
struct SlowStore;

#[async_trait]
impl CardRepo for SlowStore {
    async fn list(&self) -> RepoResult<Vec<Card>> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(Vec::new())
    }
    async fn get(&self, _id: ObjectId) -> RepoResult<Option<Card>> {
        Ok(None)
    }
    async fn create(&self, _card: NewCard) -> RepoResult<Card> {
        broken()
    }
    async fn delete(&self, _id: ObjectId) -> RepoResult<Option<Card>> {
        Ok(None)
    }
    async fn like(&self, _id: ObjectId, _user: ObjectId) -> RepoResult<Option<Card>> {
        Ok(None)
    }
    async fn unlike(&self, _id: ObjectId, _user: ObjectId) -> RepoResult<Option<Card>> {
        Ok(None)
    }
}

// -- harness ----------------------------------------------------------------

struct TestApp {
    router: Router,
    store: CountingStore,
    sessions: Arc<SessionTokenService>,
}

fn sessions() -> Arc<SessionTokenService> {
    Arc::new(SessionTokenService::new(SECRET, 3600).unwrap())
}

fn dev_config() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

fn app_with(users: Arc<dyn UserRepo>, cards: Arc<dyn CardRepo>, config: &Config) -> Router {
    let state = AppState::new(users, cards, sessions(), PasswordHasher::new(4), false);
    build_router(state, config)
}

fn test_app() -> TestApp {
    test_app_with_cost(4)
}

fn test_app_with_cost(bcrypt_cost: u32) -> TestApp {
    let store = CountingStore::default();
    let sessions = sessions();
    let state = AppState::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        sessions.clone(),
        PasswordHasher::new(bcrypt_cost),
        false,
    );
    TestApp {
        router: build_router(state, &dev_config()),
        store,
        sessions,
    }
}

impl TestApp {
    /// Seeds a user straight into the store (no counted call) and returns its session cookie.
    async fn seed_user(&self, email: &str) -> (User, String) {
        let user = UserRepo::create(
            &self.store.inner,
            NewUser {
                name: "Tester".into(),
                about: "Writes tests".into(),
                avatar: "https://example.com/a.png".into(),
                email: email.into(),
                password_hash: "unused".into(),
            },
        )
        .await
        .unwrap();
        let token = self.sessions.issue(user.id).unwrap();
        (user, format!("jwt={token}"))
    }

    async fn seed_card(&self, owner: ObjectId) -> Card {
        CardRepo::create(
            &self.store.inner,
            NewCard {
                name: "Байкал".into(),
                link: "https://example.com/baikal.jpg".into(),
                owner,
            },
        )
        .await
        .unwrap()
    }

    async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.unwrap()
    }
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    request("GET", uri, cookie, None)
}

fn request(method: &str, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn body_json(resp: Response<Body>) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn set_cookie(resp: &Response<Body>) -> String {
    resp.headers()
        .get(header::SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .to_string()
}

// -- authentication stage ---------------------------------------------------

#[tokio::test]
async fn protected_route_without_cookie_is_401_and_never_touches_the_store() {
    let app = test_app();

    let resp = app.send(get("/users/me", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        body_json(resp).await,
        json!({ "message": "authentication required" })
    );
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn forged_and_expired_tokens_get_the_same_401() {
    let app = test_app();
    let (user, _) = app.seed_user("forged@example.com").await;

    let other = SessionTokenService::new("some-other-secret", 3600).unwrap();
    let forged = format!("jwt={}", other.issue(user.id).unwrap());

    for cookie in [forged.as_str(), "jwt=not.a.token", "jwt="] {
        let resp = app.send(get("/cards", Some(cookie))).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{cookie}");
        assert_eq!(
            body_json(resp).await,
            json!({ "message": "authentication required" })
        );
    }
    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn signin_sets_an_http_only_cookie_that_authenticates_later_requests() {
    let app = test_app();

    let resp = app
        .send(request(
            "POST",
            "/signup",
            None,
            Some(json!({ "email": "Cousteau@Example.com", "password": "s3cret" })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = body_json(resp).await;
    assert_eq!(created["email"], "cousteau@example.com");
    assert_eq!(created["name"], "Жак-Ив Кусто");
    assert!(created.get("password").is_none());
    assert!(created.get("password_hash").is_none());

    let resp = app
        .send(request(
            "POST",
            "/signin",
            None,
            Some(json!({ "email": "cousteau@example.com", "password": "s3cret" })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = set_cookie(&resp);
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Path=/"));

    let pair = cookie.split(';').next().unwrap().to_string();
    let resp = app.send(get("/users/me", Some(&pair))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["_id"], created["_id"]);

    // Same client, cookie gone.
    let resp = app.send(get("/users/me", None)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_email_and_wrong_password_are_indistinguishable() {
    let app = test_app();
    let resp = app
        .send(request(
            "POST",
            "/signup",
            None,
            Some(json!({ "email": "diver@example.com", "password": "right" })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let wrong_password = app
        .send(request(
            "POST",
            "/signin",
            None,
            Some(json!({ "email": "diver@example.com", "password": "wrong" })),
        ))
        .await;
    let unknown_email = app
        .send(request(
            "POST",
            "/signin",
            None,
            Some(json!({ "email": "nobody@example.com", "password": "right" })),
        ))
        .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);
    assert!(wrong_password.headers().get(header::SET_COOKIE).is_none());
    assert_eq!(body_json(wrong_password).await, body_json(unknown_email).await);
}

#[tokio::test]
async fn unknown_email_costs_as_much_as_a_wrong_password() {
    let app = test_app_with_cost(8);
    let resp = app
        .send(request(
            "POST",
            "/signup",
            None,
            Some(json!({ "email": "timed@example.com", "password": "right" })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let signin = |email: &'static str| {
        request(
            "POST",
            "/signin",
            None,
            Some(json!({ "email": email, "password": "wrong" })),
        )
    };
    // First unknown-email signin also builds the dummy hash.
    app.send(signin("ghost@example.com")).await;

    let mut wrong_password = Duration::MAX;
    let mut unknown_email = Duration::MAX;
    for _ in 0..3 {
        let started = Instant::now();
        let resp = app.send(signin("timed@example.com")).await;
        wrong_password = wrong_password.min(started.elapsed());
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let started = Instant::now();
        let resp = app.send(signin("ghost@example.com")).await;
        unknown_email = unknown_email.min(started.elapsed());
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    assert!(
        unknown_email * 4 >= wrong_password,
        "unknown email {unknown_email:?} vs wrong password {wrong_password:?}"
    );
}

#[tokio::test]
async fn passwords_past_72_bytes_are_rejected_not_truncated() {
    let app = test_app();
    let prefix = "a".repeat(72);

    let resp = app
        .send(request(
            "POST",
            "/signup",
            None,
            Some(json!({ "email": "long@example.com", "password": format!("{prefix}X") })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await,
        json!({ "message": "password must be at most 72 bytes" })
    );
    assert_eq!(app.store.inner.user_count().await, 0);

    let resp = app
        .send(request(
            "POST",
            "/signup",
            None,
            Some(json!({ "email": "long@example.com", "password": prefix.clone() })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Same 72-byte prefix, different tail: must not sign in.
    let resp = app
        .send(request(
            "POST",
            "/signin",
            None,
            Some(json!({
                "email": "long@example.com",
                "password": format!("{prefix}totally-different"),
            })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(resp.headers().get(header::SET_COOKIE).is_none());

    let resp = app
        .send(request(
            "POST",
            "/signin",
            None,
            Some(json!({ "email": "long@example.com", "password": prefix })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn signout_expires_the_cookie() {
    let app = test_app();
    let (_, cookie) = app.seed_user("leaving@example.com").await;

    let resp = app.send(request("POST", "/signout", Some(&cookie), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cleared = set_cookie(&resp);
    assert!(cleared.starts_with("jwt="));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn concurrent_requests_keep_their_own_identity() {
    let app = test_app();
    let (alice, alice_cookie) = app.seed_user("alice@example.com").await;
    let (bob, bob_cookie) = app.seed_user("bob@example.com").await;

    let (a, b) = tokio::join!(
        app.send(get("/users/me", Some(&alice_cookie))),
        app.send(get("/users/me", Some(&bob_cookie))),
    );

    assert_eq!(body_json(a).await["_id"], alice.id.to_hex());
    assert_eq!(body_json(b).await["_id"], bob.id.to_hex());
}

// -- validation stage -------------------------------------------------------

#[tokio::test]
async fn malformed_path_id_is_400_before_authentication() {
    let app = test_app();

    // No cookie at all: validation still answers first.
    let resp = app.send(request("PUT", "/cards/not-an-id/likes", None, None)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await, json!({ "message": "invalid id" }));

    let (_, cookie) = app.seed_user("ids@example.com").await;
    let resp = app.send(get("/users/12345", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.store.calls(), 0);
}

#[tokio::test]
async fn invalid_payloads_are_rejected_without_store_writes() {
    let app = test_app();

    let resp = app
        .send(request(
            "POST",
            "/signup",
            None,
            Some(json!({ "email": "not-an-email", "password": "x" })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(resp).await,
        json!({ "message": "email must be a valid email address" })
    );

    let malformed = Request::builder()
        .method("POST")
        .uri("/signin")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();
    let resp = app.send(malformed).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(
        body_json(resp).await["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid request body")
    );

    let (_, cookie) = app.seed_user("links@example.com").await;
    let resp = app
        .send(request(
            "POST",
            "/cards",
            Some(&cookie),
            Some(json!({ "name": "Архыз", "link": "ftp://example.com/a.jpg" })),
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.store.calls(), 0);
    assert_eq!(app.store.inner.card_count().await, 0);
}

#[tokio::test]
async fn duplicate_email_is_409_and_creates_nothing() {
    let app = test_app();
    let payload = json!({ "email": "twin@example.com", "password": "pw" });

    let first = app
        .send(request("POST", "/signup", None, Some(payload.clone())))
        .await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .send(request("POST", "/signup", None, Some(payload)))
        .await;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(
        body_json(second).await,
        json!({ "message": "user with this email already exists" })
    );
    assert_eq!(app.store.inner.user_count().await, 1);
}

// -- ownership --------------------------------------------------------------

#[tokio::test]
async fn deleting_someone_elses_card_is_403_and_nothing_is_deleted() {
    let app = test_app();
    let (owner, _) = app.seed_user("owner@example.com").await;
    let (_, intruder_cookie) = app.seed_user("intruder@example.com").await;
    let card = app.seed_card(owner.id).await;

    let uri = format!("/cards/{}", card.id);
    let resp = app.send(request("DELETE", &uri, Some(&intruder_cookie), None)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(resp).await,
        json!({ "message": "you can only delete your own cards" })
    );

    assert_eq!(app.store.deletes(), 0);
    assert_eq!(app.store.inner.card_count().await, 1);
}

#[tokio::test]
async fn owner_deletes_once_then_gets_404() {
    let app = test_app();
    let (owner, cookie) = app.seed_user("keeper@example.com").await;
    let card = app.seed_card(owner.id).await;
    let uri = format!("/cards/{}", card.id);

    let resp = app.send(request("DELETE", &uri, Some(&cookie), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["_id"], card.id.to_hex());

    let resp = app.send(request("DELETE", &uri, Some(&cookie), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await, json!({ "message": "card not found" }));
}

#[tokio::test]
async fn likes_behave_as_a_set() {
    let app = test_app();
    let (owner, cookie) = app.seed_user("fan@example.com").await;
    let card = app.seed_card(owner.id).await;
    let uri = format!("/cards/{}/likes", card.id);

    app.send(request("PUT", &uri, Some(&cookie), None)).await;
    let resp = app.send(request("PUT", &uri, Some(&cookie), None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["likes"], json!([owner.id.to_hex()]));

    let resp = app.send(request("DELETE", &uri, Some(&cookie), None)).await;
    assert_eq!(body_json(resp).await["likes"], json!([]));

    let missing = format!("/cards/{}/likes", ObjectId::generate().unwrap());
    let resp = app.send(request("PUT", &missing, Some(&cookie), None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// -- error translation ------------------------------------------------------

#[tokio::test]
async fn store_failures_become_a_generic_500() {
    let store = Arc::new(BrokenStore);
    let router = app_with(store.clone(), store, &dev_config());
    let cookie = format!("jwt={}", sessions().issue(ObjectId::generate().unwrap()).unwrap());

    for uri in ["/users", "/cards", "/users/me"] {
        let resp = router.clone().oneshot(get(uri, Some(&cookie))).await.unwrap();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");

        let body = body_json(resp).await;
        assert_eq!(body, json!({ "message": INTERNAL_MESSAGE }));
        assert!(!body.to_string().contains("users_pkey"));
    }
}

#[tokio::test]
async fn a_hung_store_call_fails_only_that_request() {
    let config = Config::from_lookup(|key| match key {
        "REQUEST_TIMEOUT_SECONDS" => Some("1".into()),
        _ => None,
    })
    .unwrap();
    let router = app_with(Arc::new(MemoryStore::new()), Arc::new(SlowStore), &config);
    let cookie = format!("jwt={}", sessions().issue(ObjectId::generate().unwrap()).unwrap());

    let resp = router.clone().oneshot(get("/cards", Some(&cookie))).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_json(resp).await, json!({ "message": INTERNAL_MESSAGE }));

    let resp = router.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_routes_and_methods_are_json_404() {
    let app = test_app();

    let resp = app.send(get("/no/such/thing", None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(resp).await,
        json!({ "message": "requested resource not found" })
    );

    let resp = app.send(request("PATCH", "/cards", None, None)).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_request_id_and_security_headers() {
    let app = test_app();
    let resp = app.send(get("/health", None)).await;

    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(resp.headers()["x-content-type-options"], "nosniff");
    assert_eq!(resp.headers()["x-frame-options"], "DENY");
    assert!(resp.headers().contains_key("permissions-policy"));
}
