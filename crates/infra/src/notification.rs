//! # 通知送信
//!
//! メール通知の送信を担当するインフラストラクチャモジュール。
//!
//! ## 設計方針
//!
//! - **trait による抽象化**: `NotificationSender` trait でメール送信を抽象化
//! - **4 つの実装**: Brevo API、SMTP リレー、直接 SMTP、Noop（開発・テスト用）
//! - **環境変数切替**: `NOTIFICATION_BACKEND` で起動時に選択
//! - **1 回だけ送信**: リトライは行わず、結果を [`DeliveryOutcome`] として返す

mod brevo;
mod message;
mod noop;
mod relay;
mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
pub use brevo::{BrevoNotificationSender, DEFAULT_BREVO_API_URL};
use kerawi_domain::notification::{DeliveryOutcome, EmailMessage, NotificationError};
use kerawi_shared::{event_log::event, log_business_event};
pub use noop::NoopNotificationSender;
pub use relay::{RelayNotificationSender, RelayTls};
pub use smtp::{SmtpCredentials, SmtpNotificationSender};

/// メール送信トレイト
///
/// 通知基盤の中核。メール送信の具体的な方法を抽象化する。
/// Brevo / リレー / 直接 SMTP / Noop の実装を環境変数で切り替える。
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// メールを送信する
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError>;

    /// ログ出力用の送信方式名
    fn name(&self) -> &'static str;
}

/// 送信ゲートウェイ
///
/// 起動時に選択した [`NotificationSender`] を保持し、
/// 送信結果を [`DeliveryOutcome`] に変換してログに記録する。
#[derive(Clone)]
pub struct EmailGateway {
    sender: Arc<dyn NotificationSender>,
}

impl EmailGateway {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self { sender }
    }

    pub fn transport_name(&self) -> &'static str {
        self.sender.name()
    }

    /// メールを 1 回だけ送信する
    ///
    /// 送信エラーは呼び出し元に伝播せず、[`DeliveryOutcome::Failed`] として返す。
    pub async fn deliver(&self, email: &EmailMessage) -> DeliveryOutcome {
        let result = self.sender.send_email(email).await;

        match &result {
            Ok(()) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_SENT,
                    event.result = event::result::SUCCESS,
                    notification.transport = self.sender.name(),
                    notification.subject = %email.subject,
                    "メールを送信"
                );
            }
            Err(e) => {
                log_business_event!(
                    event.category = event::category::NOTIFICATION,
                    event.action = event::action::NOTIFICATION_FAILED,
                    event.result = event::result::FAILURE,
                    notification.transport = self.sender.name(),
                    notification.subject = %email.subject,
                    notification.transient = e.is_transient(),
                    error = %e,
                    "メール送信に失敗"
                );
            }
        }

        result.into()
    }
}
