//! 統合テスト用ヘルパー
//!
//! モック送信実装を組み込んだルーターと、リクエスト送信の補助関数を提供する。

#![allow(dead_code)]

use std::{path::PathBuf, sync::Arc};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use kerawi_domain::notification::Mailbox;
use kerawi_infra::{EmailGateway, mock::MockNotificationSender};
use kerawi_web::{
    app_builder::build_app,
    config::HotelIdentity,
    handler::SiteState,
    usecase::{NotificationService, TemplateRenderer},
    view::PageRenderer,
};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = "admin@kerawi.example";
pub const SENDER_EMAIL: &str = "info@kerawi.example";

pub fn identity() -> HotelIdentity {
    HotelIdentity {
        hotel_name: "Kerawi Hotel".to_string(),
        admin:      Mailbox::address(ADMIN_EMAIL),
        sender:     Mailbox::new(SENDER_EMAIL, Some("Kerawi Hotel".to_string())),
    }
}

/// モック送信実装を組み込んだルーターを構築する
pub fn test_app(sender: MockNotificationSender) -> Router {
    let notification = NotificationService::new(
        EmailGateway::new(Arc::new(sender)),
        TemplateRenderer::new(identity()).unwrap(),
    );
    let state = Arc::new(SiteState {
        pages: PageRenderer::new("Kerawi Hotel").unwrap(),
        notification,
    });
    let static_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../static");
    build_app(state, &static_dir)
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    post_form_with_headers(app, uri, body, &[]).await
}

pub async fn post_form_with_headers(
    app: Router,
    uri: &str,
    body: &str,
    headers: &[(&str, &str)],
) -> Response<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    app.oneshot(builder.body(Body::from(body.to_string())).unwrap())
        .await
        .unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
