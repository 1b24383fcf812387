//! # Kerawi Web サーバー
//!
//! ホテル紹介ページと、問い合わせ・予約・ニュースレター購読フォームを提供する。
//!
//! ## 役割
//!
//! - **ページ表示**: トップ、メニュー、概要、ギャラリー、サービス、客室
//! - **フォーム送信**: 検証 → 管理者宛てメール → 送信者宛て確認メール
//! - **静的ファイル配信**: `STATIC_DIR` を `/static` で配信
//!
//! 送信内容は保存しない。送信失敗時も再送しない。
//!
//! ## 環境変数
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `WEB_HOST` | No | バインドアドレス（デフォルト: `0.0.0.0`） |
//! | `WEB_PORT` | No | ポート番号（デフォルト: `5000`） |
//! | `SECRET_KEY` | **Yes** | 署名用シークレット |
//! | `ADMIN_EMAIL` | **Yes** | 管理者宛てメールの宛先 |
//! | `SENDER_EMAIL` | **Yes** | 送信元アドレス |
//! | `NOTIFICATION_BACKEND` | No | `brevo` / `relay` / `smtp` / `noop`（デフォルト: `noop`） |
//!
//! 送信方式ごとの変数は [`kerawi_web::config`] を参照。
//!
//! ## 起動方法
//!
//! ```bash
//! # 開発環境（メールは送信せずログ出力のみ）
//! cargo run -p kerawi-web
//!
//! # 本番環境
//! NOTIFICATION_BACKEND=brevo BREVO_API_KEY=... cargo run -p kerawi-web --release
//! ```

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context as _;
use kerawi_infra::EmailGateway;
use kerawi_shared::observability::TracingConfig;
use kerawi_web::{
    app_builder::{build_app, build_sender},
    config::WebConfig,
    handler::SiteState,
    usecase::{NotificationService, TemplateRenderer},
    view::PageRenderer,
};
use tokio::net::TcpListener;

/// Web サーバーのエントリーポイント
///
/// 以下の順序で初期化を行う:
///
/// 1. 環境変数の読み込み（.env ファイル）
/// 2. トレーシングの初期化
/// 3. アプリケーション設定の読み込み
/// 4. 送信実装・テンプレートの初期化
/// 5. HTTP サーバーの起動
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env ファイルを読み込む（存在する場合）
    dotenvy::dotenv().ok();

    // トレーシング初期化
    let tracing_config = TracingConfig::from_env("web");
    kerawi_shared::observability::init_tracing(tracing_config);
    let _tracing_guard = tracing::info_span!("app", service = "web").entered();

    // 設定読み込み
    let config = WebConfig::from_env().context("設定の読み込みに失敗しました")?;

    tracing::info!(
        "Web サーバーを起動します: {}:{} (通知: {})",
        config.host,
        config.port,
        config.transport.name()
    );

    // 依存コンポーネントを初期化
    let sender = build_sender(&config.transport).context("送信実装の初期化に失敗しました")?;
    let template_renderer = TemplateRenderer::new(config.identity.clone())
        .context("通知テンプレートの読み込みに失敗しました")?;
    let notification = NotificationService::new(EmailGateway::new(sender), template_renderer);
    let pages = PageRenderer::new(config.identity.hotel_name.clone())
        .context("ページテンプレートの読み込みに失敗しました")?;

    let state = Arc::new(SiteState {
        pages,
        notification,
    });
    let app = build_app(state, &config.static_dir);

    // サーバー起動
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("アドレスのパースに失敗しました")?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Web サーバーが起動しました: {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
