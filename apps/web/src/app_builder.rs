//! # アプリケーション構築
//!
//! 設定から送信実装を選択し、ルーターを組み立てる。
//! `main.rs` と統合テストの両方から使用する。

use std::{path::Path, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use kerawi_domain::notification::NotificationError;
use kerawi_infra::notification::{
    BrevoNotificationSender,
    NoopNotificationSender,
    NotificationSender,
    RelayNotificationSender,
    SmtpNotificationSender,
};
use kerawi_shared::observability::{MakeRequestUuidV7, make_request_span};
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::{
    config::TransportConfig,
    handler::{
        SiteState,
        about,
        gallery,
        health_check,
        index,
        menu,
        room,
        service,
        show_booking,
        show_contact,
        submit_booking,
        submit_contact,
        subscribe_newsletter,
    },
};

/// 設定に応じた送信実装を構築する
///
/// 起動時に 1 度だけ呼び出す。
pub fn build_sender(
    transport: &TransportConfig,
) -> Result<Arc<dyn NotificationSender>, NotificationError> {
    let sender: Arc<dyn NotificationSender> = match transport {
        TransportConfig::Brevo { api_url, api_key } => {
            Arc::new(BrevoNotificationSender::new(api_url, api_key.clone()))
        }
        TransportConfig::Relay {
            host,
            port,
            tls,
            credentials,
        } => Arc::new(RelayNotificationSender::new(
            host,
            *port,
            *tls,
            Some(credentials.clone()),
        )?),
        TransportConfig::Smtp {
            host,
            port,
            credentials,
        } => Arc::new(SmtpNotificationSender::new(
            host.clone(),
            *port,
            credentials.clone(),
        )),
        TransportConfig::Noop => Arc::new(NoopNotificationSender),
    };
    Ok(sender)
}

/// ルーターを構築する
pub fn build_app(state: Arc<SiteState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/", get(index))
        .route("/menu", get(menu))
        .route("/about", get(about))
        .route("/gallery", get(gallery))
        .route("/service", get(service))
        .route("/room", get(room))
        .route("/contact", get(show_contact).post(submit_contact))
        .route("/booking", get(show_booking).post(submit_booking))
        .route("/newsletter", post(subscribe_newsletter))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
        // Request ID レイヤー（下に書いたものが外側）
        // 1. SetRequestIdLayer（最外）: UUID v7 を生成（クライアント提供値があればそれを使用）
        // 2. TraceLayer: リクエストスパンに request_id を含める
        // 3. PropagateRequestIdLayer: レスポンスヘッダーに X-Request-Id をコピー
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}
