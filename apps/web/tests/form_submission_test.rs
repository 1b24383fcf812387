//! # フォーム送信の統合テスト
//!
//! ルーター全体（検証 → 通知メール送信 → リダイレクト）をモック送信実装で検証する。
//!
//! - 成功時は管理者宛て → 送信者宛ての順に 2 通送る
//! - 管理者宛てが失敗した場合は確認メールを送らず `msg_sent=2`
//! - 検証エラーは 422 でフォームを再表示し、何も送らない

mod helpers;

use axum::http::StatusCode;
use helpers::{
    ADMIN_EMAIL,
    body_text,
    location,
    post_form,
    post_form_with_headers,
    test_app,
};
use kerawi_domain::notification::{Mailbox, NotificationError};
use kerawi_infra::mock::MockNotificationSender;
use pretty_assertions::assert_eq;

const CONTACT_BODY: &str = "name=Ann&email=ann%40x.io&phone=0812345678901&message=Hi";

const BOOKING_BODY: &str = "name=Budi&email=budi%40example.com&phone=%2B628123456789&checkin=2026-11-01\
                            &checkout=2026-11-03&adults=2&children=1&room=3&special_request=";

// ===== 問い合わせ =====

#[tokio::test]
async fn test_問い合わせが送信できると成功フラグでリダイレクトする() {
    let sender = MockNotificationSender::new();
    let app = test_app(sender.clone());

    let response = post_form(app, "/contact", CONTACT_BODY).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contact?msg_sent=1");

    let attempts = sender.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].to, Mailbox::address(ADMIN_EMAIL));
    assert_eq!(attempts[0].subject, "Contact Form Submission");
    assert!(attempts[0].text_body.contains("ann@x.io"));
    assert_eq!(
        attempts[1].to,
        Mailbox::new("ann@x.io", Some("Ann".to_string()))
    );
    assert_eq!(attempts[1].subject, "We Received Your Message!");
}

#[tokio::test]
async fn test_管理者宛てが失敗すると確認メールを送らず失敗フラグでリダイレクトする() {
    let sender = MockNotificationSender::new()
        .failing_at(0, NotificationError::Unavailable("connection refused".to_string()));
    let app = test_app(sender.clone());

    let response = post_form(app, "/contact", CONTACT_BODY).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/contact?msg_sent=2");
    assert_eq!(sender.attempts().len(), 1);
}

#[tokio::test]
async fn test_確認メールだけ失敗しても成功フラグでリダイレクトする() {
    let sender = MockNotificationSender::new()
        .failing_at(1, NotificationError::Rejected("HTTP 400".to_string()));
    let app = test_app(sender.clone());

    let response = post_form(app, "/contact", CONTACT_BODY).await;

    assert_eq!(location(&response), "/contact?msg_sent=1");
    assert_eq!(sender.attempts().len(), 2);
}

#[tokio::test]
async fn test_問い合わせの検証エラーは422でフォームを再表示する() {
    let sender = MockNotificationSender::new();
    let app = test_app(sender.clone());

    let response = post_form(app, "/contact", "name=Ann&email=not-an-email&phone=&message=Hi").await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains("invalid email"));
    assert!(html.contains("required"));
    assert!(html.contains(r#"value="Ann""#));
    assert!(sender.attempts().is_empty());
}

#[tokio::test]
async fn test_再表示する入力値はエスケープされる() {
    let app = test_app(MockNotificationSender::new());

    let response = post_form(app, "/contact", "name=%3Cscript%3E&email=&phone=&message=").await;

    let html = body_text(response).await;
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;"));
}

// ===== 予約 =====

#[tokio::test]
async fn test_予約が送信できると成功フラグでリダイレクトする() {
    let sender = MockNotificationSender::new();
    let app = test_app(sender.clone());

    let response = post_form(app, "/booking", BOOKING_BODY).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/booking?msg_sent=1");

    let attempts = sender.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].subject, "New Booking Request");
    assert!(attempts[0].text_body.contains("Room 3"));
    assert!(attempts[0].text_body.contains("2026-11-01"));
    assert_eq!(attempts[1].subject, "We Received Your Booking!");
}

#[tokio::test]
async fn test_予約の電話番号は数字のみ許可する() {
    let sender = MockNotificationSender::new();
    let app = test_app(sender.clone());
    let body = BOOKING_BODY.replace("phone=%2B628123456789", "phone=0812-3456-789");

    let response = post_form(app, "/booking", &body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("invalid phone"));
    assert!(sender.attempts().is_empty());
}

#[tokio::test]
async fn test_予約の選択肢外の値は検証エラーになる() {
    let app = test_app(MockNotificationSender::new());
    let body = BOOKING_BODY.replace("room=3", "room=9");

    let response = post_form(app, "/booking", &body).await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("invalid choice"));
}

// ===== ニュースレター =====

#[tokio::test]
async fn test_購読が送信できると元のページに成功フラグでリダイレクトする() {
    let sender = MockNotificationSender::new();
    let app = test_app(sender.clone());

    let response = post_form_with_headers(
        app,
        "/newsletter",
        "newsletter_email=reader%40example.com",
        &[("referer", "http://localhost:5000/room")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/room?newsletter_success=1");

    let attempts = sender.attempts();
    assert_eq!(attempts.len(), 2);
    assert_eq!(attempts[0].subject, "New Newsletter Subscription");
    assert!(attempts[0].text_body.contains("reader@example.com"));
    assert_eq!(attempts[1].to, Mailbox::address("reader@example.com"));
}

#[tokio::test]
async fn test_購読メールアドレスが不正なら送信せず失敗フラグでリダイレクトする() {
    let sender = MockNotificationSender::new();
    let app = test_app(sender.clone());

    let response = post_form(app, "/newsletter", "newsletter_email=nope").await;

    assert_eq!(location(&response), "/?newsletter_success=2");
    assert!(sender.attempts().is_empty());
}

#[tokio::test]
async fn test_購読項目がなければ何もせず元のページに戻す() {
    let sender = MockNotificationSender::new();
    let app = test_app(sender.clone());

    let response = post_form_with_headers(
        app,
        "/newsletter",
        "",
        &[("referer", "http://localhost:5000/menu")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/menu");
    assert!(sender.attempts().is_empty());
}

#[tokio::test]
async fn test_購読の管理者宛てが失敗すると失敗フラグでリダイレクトする() {
    let sender = MockNotificationSender::new()
        .failing_at(0, NotificationError::Unavailable("timeout".to_string()));
    let app = test_app(sender.clone());

    let response = post_form(app, "/newsletter", "newsletter_email=reader%40example.com").await;

    assert_eq!(location(&response), "/?newsletter_success=2");
    assert_eq!(sender.attempts().len(), 1);
}

#[tokio::test]
async fn test_購読後のリダイレクト先は別ホストにならない() {
    let app = test_app(MockNotificationSender::new());

    let response = post_form_with_headers(
        app,
        "/newsletter",
        "newsletter_email=reader%40example.com",
        &[("referer", "http://localhost:5000//evil.example/phish")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        location(&response),
        "/evil.example/phish?newsletter_success=1"
    );
}
