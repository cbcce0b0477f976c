//! Login, registration and profile screens, against a mocked server

use std::sync::Arc;

use taskpad::error::Severity;
use taskpad::mock::MockServer;
use taskpad::pages::{App, Context, LoginPage, ProfilePage, RegisterPage};
use taskpad::router::{Resolution, Route};
use taskpad::storage::{MemoryStorage, Storage};
use taskpad::{Credentials, Notifications, Session, User};
use taskpad::traits::UserSource;

struct Fixture {
    server: MockServer,
    storage: Arc<MemoryStorage>,
    ctx: Context<MockServer>,
}

fn fixture() -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();

    let server = MockServer::new();
    server.add_user("Jane Doe", "jane@example.com", "secret1");
    let storage = Arc::new(MemoryStorage::new());
    let session = Arc::new(Session::load(storage.clone()));
    let ctx = Context::new(Arc::new(server.clone()), session, Notifications::new());
    Fixture { server, storage, ctx }
}

/// The last notification, as `(message, severity)`
fn last_notice(ctx: &Context<MockServer>) -> (String, Severity) {
    let notification = ctx.notifications.drain().pop().unwrap();
    (notification.notice.message, notification.notice.severity)
}


#[tokio::test]
async fn login_checks_fields_one_at_a_time() {
    let f = fixture();
    let mut page = LoginPage::new(f.ctx.clone());

    assert_eq!(page.submit().await, None);
    assert_eq!(last_notice(&f.ctx), ("Email is required".to_string(), Severity::Error));

    page.email = "jane@example".to_string();
    assert_eq!(page.submit().await, None);
    assert_eq!(last_notice(&f.ctx).0, "Please enter a valid email address");

    page.email = "jane@example.com".to_string();
    assert_eq!(page.submit().await, None);
    assert_eq!(last_notice(&f.ctx).0, "Password is required");

    assert_eq!(f.server.request_count(), 0);
}

#[tokio::test]
async fn login_stores_the_session() {
    let f = fixture();
    let mut page = LoginPage::new(f.ctx.clone());
    let mut changes = f.ctx.session.subscribe();

    page.email = "jane@example.com".to_string();
    page.password = "wrong".to_string();
    assert_eq!(page.submit().await, None);
    assert_eq!(last_notice(&f.ctx), ("Wrong password".to_string(), Severity::Error));
    assert!(f.ctx.session.is_authenticated() == false);

    page.password = "secret1".to_string();
    assert_eq!(page.submit().await, Some(Route::Tasks));
    assert_eq!(last_notice(&f.ctx).1, Severity::Success);
    assert!(page.is_loading() == false);

    changes.changed().await.unwrap();
    assert_eq!(changes.borrow().as_ref().map(|u| u.email.clone()), Some("jane@example.com".to_string()));

    // The user survives a restart
    let raw = f.storage.get("user").unwrap().unwrap();
    let stored: User = serde_json::from_str(&raw).unwrap();
    assert_eq!(stored.full_name, "Jane Doe");
    let resumed = Session::load(f.storage.clone());
    assert_eq!(resumed.current_user(), Some(stored));
}

#[tokio::test]
async fn corrupted_session_starts_logged_out() {
    let _ = env_logger::builder().is_test(true).try_init();
    let storage = Arc::new(MemoryStorage::new());
    storage.set("user", "{not json").unwrap();

    let session = Session::load(storage);
    assert!(session.is_authenticated() == false);
    assert!(session.user_id().is_err());
}

#[tokio::test]
async fn registration() {
    let f = fixture();
    let mut page = RegisterPage::new(f.ctx.clone());

    page.full_name = "John Roe".to_string();
    page.email = "john@example.com".to_string();
    page.password = "12345".to_string();
    page.confirm_password = "12345".to_string();
    assert_eq!(page.submit().await, None);
    assert!(last_notice(&f.ctx).0.contains("at least 6"));

    page.password = "123456".to_string();
    assert_eq!(page.submit().await, None);
    assert_eq!(last_notice(&f.ctx).0, "Passwords do not match");
    assert_eq!(f.server.request_count(), 0);

    page.confirm_password = "123456".to_string();
    assert_eq!(page.submit().await, Some(Route::Login));
    assert_eq!(last_notice(&f.ctx).1, Severity::Success);
    // Registering does not log in
    assert!(f.ctx.session.is_authenticated() == false);

    let credentials = Credentials { email: "john@example.com".into(), password: "123456".into() };
    assert_eq!(f.server.login(&credentials).await.unwrap().full_name, "John Roe");

    // The email is now taken
    assert_eq!(page.submit().await, None);
    assert_eq!(last_notice(&f.ctx).0, "This email address is already in use");
}

#[tokio::test]
async fn profile_update() {
    let f = fixture();
    let mut login = LoginPage::new(f.ctx.clone());
    login.email = "jane@example.com".to_string();
    login.password = "secret1".to_string();
    login.submit().await.unwrap();

    let mut page = ProfilePage::new(f.ctx.clone());
    assert_eq!(page.load(), None);
    assert_eq!(page.initials(), "JD");
    assert_eq!(page.full_name, "Jane Doe");

    page.full_name = "Jane Smith".to_string();
    assert!(page.submit().await);
    assert_eq!(f.ctx.session.current_user().unwrap().full_name, "Jane Smith");
    assert_eq!(page.initials(), "JS");

    // Password change
    page.toggle_password_fields();
    page.new_password = "abc".to_string();
    assert_eq!(page.submit().await, false);
    assert_eq!(last_notice(&f.ctx).0, "Password fields cannot be empty");

    page.current_password = "secret1".to_string();
    assert_eq!(page.submit().await, false);
    assert!(last_notice(&f.ctx).0.contains("at least 6"));

    page.current_password = "not it".to_string();
    page.new_password = "brand new".to_string();
    assert_eq!(page.submit().await, false);
    assert_eq!(last_notice(&f.ctx).0, "Wrong password");
    assert!(page.shows_password_fields());

    page.current_password = "secret1".to_string();
    assert!(page.submit().await);
    assert!(page.shows_password_fields() == false);
    assert!(page.current_password.is_empty() && page.new_password.is_empty());

    let credentials = Credentials { email: "jane@example.com".into(), password: "brand new".into() };
    assert!(f.server.login(&credentials).await.is_ok());

    assert_eq!(page.logout(), Route::Login);
    assert!(f.storage.get("user").unwrap().is_none());
}

#[tokio::test]
async fn profile_requires_a_session() {
    let f = fixture();
    let mut page = ProfilePage::new(f.ctx.clone());
    assert_eq!(page.load(), Some(Route::Login));
    assert_eq!(page.submit().await, false);
}

#[tokio::test]
async fn routes_follow_the_session() {
    let f = fixture();
    let mut app = App::new(f.ctx.session.clone());
    assert_eq!(app.navigate("/tasks"), Resolution::Redirect(Route::Login));
    assert_eq!(app.navigate("/register"), Resolution::Render(Route::Register));

    let mut login = LoginPage::new(f.ctx.clone());
    login.email = "jane@example.com".to_string();
    login.password = "secret1".to_string();
    login.submit().await.unwrap();

    assert_eq!(app.sync_with_session(), Some(Resolution::Redirect(Route::Tasks)));
    assert_eq!(app.navigate("/nowhere"), Resolution::Redirect(Route::Tasks));
    assert_eq!(app.navigate("/login"), Resolution::Redirect(Route::Tasks));
}
