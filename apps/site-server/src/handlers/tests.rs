use std::sync::Arc;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use uuid::Uuid;

use narrative_core::domain::{Picture, Post, Sponsor, User};
use narrative_core::ports::{BaseRepository, Clock, PostRepository};
use narrative_infra::{Argon2PasswordService, FixedClock, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::config::SiteConfig;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::{AppState, Stores};

const USERNAME: &str = "test user";
const PASSWORD: &str = "test password";

struct Fixture {
    state: web::Data<AppState>,
    stores: Stores,
    clock: Arc<FixedClock>,
    user: User,
}

fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

async fn fixture() -> Fixture {
    let stores = Stores::in_memory();
    let clock = Arc::new(FixedClock::new(start_time()));
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "narrative".to_string(),
    }));

    let state = AppState::new(
        stores.clone(),
        tokens,
        Arc::new(Argon2PasswordService::new()),
        clock.clone(),
        SiteConfig::default(),
    );
    let user = state
        .accounts
        .register(USERNAME, PASSWORD, clock.now())
        .await
        .unwrap();

    Fixture {
        state: web::Data::new(state),
        stores,
        clock,
        user,
    }
}

impl Fixture {
    fn session(&self) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(self.user.id, &self.user.username)
            .unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }

    /// Store a post whose publication date is `offset` away from the clock.
    async fn seed_post(&self, title: &str, offset: TimeDelta) -> Post {
        let now = self.clock.now();
        let mut post = Post::new(self.user.id, title.into(), "Body text".into(), now);
        post.published_date = now + offset;
        self.stores.posts.insert(post).await.unwrap()
    }

    async fn stored(&self, id: Uuid) -> Option<Post> {
        self.stores.posts.find_by_id(id).await.unwrap()
    }
}

macro_rules! init_app {
    ($fixture:expr) => {
        test::init_service(
            App::new()
                .app_data($fixture.state.clone())
                .configure(configure_routes),
        )
        .await
    };
}

async fn body_text(resp: ServiceResponse) -> String {
    String::from_utf8(test::read_body(resp).await.to_vec()).unwrap()
}

fn location(resp: &ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[actix_web::test]
async fn test_published_post_is_public() {
    let fx = fixture().await;
    let post = fx.seed_post("Hello world", -TimeDelta::hours(1)).await;
    let app = init_app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/blog/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Hello world"));

    let req = test::TestRequest::get()
        .uri(&format!("/blog/post/{}/", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Hello world"));
    assert!(!html.contains("/edit/"));
}

#[actix_web::test]
async fn test_scheduled_post_hidden_from_anonymous_visitors() {
    let fx = fixture().await;
    let post = fx.seed_post("Coming soon", TimeDelta::days(1)).await;
    let app = init_app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/blog/").to_request()).await;
    assert!(!body_text(resp).await.contains("Coming soon"));

    let req = test::TestRequest::get()
        .uri(&format!("/blog/post/{}/", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!body_text(resp).await.contains("Coming soon"));
}

#[actix_web::test]
async fn test_scheduled_post_visible_to_members_but_not_listed() {
    let fx = fixture().await;
    let post = fx.seed_post("Coming soon", TimeDelta::days(1)).await;
    let app = init_app!(fx);

    let req = test::TestRequest::get()
        .uri(&format!("/blog/post/{}/", post.id))
        .cookie(fx.session())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Coming soon"));
    assert!(html.contains(&format!("/blog/post/{}/edit/", post.id)));

    let req = test::TestRequest::get()
        .uri("/blog/")
        .cookie(fx.session())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(!body_text(resp).await.contains("Coming soon"));
}

#[actix_web::test]
async fn test_scheduled_post_appears_once_its_time_comes() {
    let fx = fixture().await;
    fx.seed_post("Coming soon", TimeDelta::hours(2)).await;
    let app = init_app!(fx);

    fx.clock.advance(TimeDelta::hours(3));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/blog/").to_request()).await;
    assert!(body_text(resp).await.contains("Coming soon"));
}

#[actix_web::test]
async fn test_post_list_is_ordered_oldest_first() {
    let fx = fixture().await;
    fx.seed_post("Second", -TimeDelta::hours(1)).await;
    fx.seed_post("First", -TimeDelta::days(1)).await;
    let app = init_app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/blog/").to_request()).await;
    let html = body_text(resp).await;
    let first = html.find("First").unwrap();
    let second = html.find("Second").unwrap();
    assert!(first < second);
}

#[actix_web::test]
async fn test_anonymous_visitor_cannot_create_posts() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let req = test::TestRequest::get().uri("/blog/post/new/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri("/blog/post/new/")
        .set_form([("title", "Sneaky"), ("text", "Should not exist")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let far_future = fx.clock.now() + TimeDelta::days(365);
    assert!(fx.stores.posts.list_published(far_future).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_member_creates_post_published_now() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let req = test::TestRequest::get()
        .uri("/blog/post/new/")
        .cookie(fx.session())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/blog/post/new/")
        .cookie(fx.session())
        .set_form([("title", "Fresh post"), ("text", "Line one\nLine two")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);

    let target = location(&resp).to_string();
    let id = target
        .trim_start_matches("/blog/post/")
        .trim_end_matches('/')
        .parse::<Uuid>()
        .unwrap();
    let post = fx.stored(id).await.unwrap();
    assert_eq!(post.title, "Fresh post");
    assert_eq!(post.author_id, fx.user.id);
    assert_eq!(post.published_date, fx.clock.now());

    let resp = test::call_service(&app, test::TestRequest::get().uri(&target).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Line one<br>Line two"));
}

#[actix_web::test]
async fn test_invalid_post_form_is_redisplayed_with_errors() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let req = test::TestRequest::post()
        .uri("/blog/post/new/")
        .cookie(fx.session())
        .set_form([("title", "   "), ("text", "Kept text")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let html = body_text(resp).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains("Kept text"));

    let far_future = fx.clock.now() + TimeDelta::days(365);
    assert!(fx.stores.posts.list_published(far_future).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_edit_form_is_prefilled_for_members() {
    let fx = fixture().await;
    let post = fx.seed_post("Original title", -TimeDelta::hours(1)).await;
    let app = init_app!(fx);

    let req = test::TestRequest::get()
        .uri(&format!("/blog/post/{}/edit/", post.id))
        .cookie(fx.session())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Original title"));
}

#[actix_web::test]
async fn test_editing_republishes_scheduled_post() {
    let fx = fixture().await;
    let post = fx.seed_post("Draft", TimeDelta::days(7)).await;
    let editor = fx
        .state
        .accounts
        .register("other editor", "another password", fx.clock.now())
        .await
        .unwrap();
    let app = init_app!(fx);

    fx.clock.advance(TimeDelta::minutes(5));
    let token = fx
        .state
        .tokens
        .generate_token(editor.id, &editor.username)
        .unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/blog/post/{}/edit/", post.id))
        .cookie(Cookie::new(SESSION_COOKIE, token))
        .set_form([("title", "Released"), ("text", "Now public")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/blog/post/{}/", post.id));

    let updated = fx.stored(post.id).await.unwrap();
    assert_eq!(updated.title, "Released");
    assert_eq!(updated.author_id, editor.id);
    assert_eq!(updated.published_date, fx.clock.now());
    assert_eq!(updated.created_date, post.created_date);

    let req = test::TestRequest::get()
        .uri(&format!("/blog/post/{}/", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_anonymous_edit_is_not_found_and_changes_nothing() {
    let fx = fixture().await;
    let post = fx.seed_post("Untouched", -TimeDelta::hours(1)).await;
    let app = init_app!(fx);

    let req = test::TestRequest::get()
        .uri(&format!("/blog/post/{}/edit/", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/blog/post/{}/edit/", post.id))
        .set_form([("title", "Defaced"), ("text", "x")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    assert_eq!(fx.stored(post.id).await.unwrap(), post);
}

#[actix_web::test]
async fn test_unknown_and_malformed_post_ids_are_not_found() {
    let fx = fixture().await;
    let app = init_app!(fx);

    for uri in [
        format!("/blog/post/{}/", Uuid::new_v4()),
        "/blog/post/not-a-uuid/".to_string(),
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        assert!(body_text(resp).await.contains("404 Not Found"));
    }

    let req = test::TestRequest::post()
        .uri(&format!("/blog/post/{}/edit/", Uuid::new_v4()))
        .cookie(fx.session())
        .set_form([("title", "Ghost"), ("text", "x")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_galleries_list_every_record() {
    let fx = fixture().await;
    let now = fx.clock.now();
    fx.stores
        .pictures
        .insert(Picture::new("Harbour at dawn".into(), "pictures/harbour.jpg".into(), now))
        .await
        .unwrap();
    fx.stores
        .sponsors
        .insert(Sponsor::new("Local bakery".into(), "sponsors/bakery.png".into(), now))
        .await
        .unwrap();
    let app = init_app!(fx);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/pictures/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Harbour at dawn"));
    assert!(html.contains("/media/pictures/harbour.jpg"));

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/sponsors/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_text(resp).await;
    assert!(html.contains("Local bakery"));
    assert!(!html.contains("Harbour at dawn"));
}

#[actix_web::test]
async fn test_empty_gallery_renders() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/sponsors/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Nothing here yet."));
}

#[actix_web::test]
async fn test_login_sets_session_and_follows_next() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([
            ("username", USERNAME),
            ("password", PASSWORD),
            ("next", "/blog/post/new/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/post/new/");

    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap()
        .into_owned();
    assert_eq!(session.http_only(), Some(true));

    let req = test::TestRequest::get()
        .uri("/blog/post/new/")
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("Log out test user"));
}

#[actix_web::test]
async fn test_login_with_bad_password_is_rejected() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([("username", USERNAME), ("password", "wrong password")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.response().cookies().next().is_none());
    assert!(body_text(resp).await.contains("Please enter a correct username and password."));
}

#[actix_web::test]
async fn test_logout_clears_session_cookie() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let req = test::TestRequest::post()
        .uri("/accounts/logout/")
        .cookie(fx.session())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/");

    let cleared = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert!(cleared.value().is_empty());
}

#[actix_web::test]
async fn test_forged_session_is_treated_as_anonymous() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let req = test::TestRequest::get()
        .uri("/blog/post/new/")
        .cookie(Cookie::new(SESSION_COOKIE, "not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_bearer_token_authenticates() {
    let fx = fixture().await;
    let app = init_app!(fx);
    let token = fx.session().value().to_string();

    let req = test::TestRequest::get()
        .uri("/blog/post/new/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_home_and_health() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}

#[actix_web::test]
async fn test_empty_blog_renders_placeholder() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/blog/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_text(resp).await.contains("No posts yet."));
}

#[actix_web::test]
async fn test_invalid_edit_is_redisplayed_and_changes_nothing() {
    let fx = fixture().await;
    let post = fx.seed_post("Keep me", TimeDelta::days(2)).await;
    let app = init_app!(fx);

    fx.clock.advance(TimeDelta::minutes(5));
    let req = test::TestRequest::post()
        .uri(&format!("/blog/post/{}/edit/", post.id))
        .cookie(fx.session())
        .set_form([("title", ""), ("text", "")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get(header::LOCATION).is_none());

    let html = body_text(resp).await;
    assert!(html.contains("This field is required."));
    assert!(html.contains(&format!("/blog/post/{}/edit/", post.id)));

    assert_eq!(fx.stored(post.id).await.unwrap(), post);
}

#[actix_web::test]
async fn test_session_for_deleted_account_is_anonymous() {
    let fx = fixture().await;
    let app = init_app!(fx);
    let token = fx
        .state
        .tokens
        .generate_token(Uuid::new_v4(), "ghost")
        .unwrap();

    let req = test::TestRequest::post()
        .uri("/blog/post/new/")
        .cookie(Cookie::new(SESSION_COOKIE, token))
        .set_form([("title", "Orphan"), ("text", "No author")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let far_future = fx.clock.now() + TimeDelta::days(365);
    assert!(fx.stores.posts.list_published(far_future).await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_login_ignores_backslash_redirect() {
    let fx = fixture().await;
    let app = init_app!(fx);

    let req = test::TestRequest::post()
        .uri("/accounts/login/")
        .set_form([
            ("username", USERNAME),
            ("password", PASSWORD),
            ("next", "/\\evil.example/"),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/blog/");
}
