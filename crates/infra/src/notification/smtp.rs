//! 直接 SMTP 通知送信実装
//!
//! 送信ごとに SMTP サーバーへ新しく接続し、STARTTLS → 認証 → 送信 → 切断を行う。
//! lettre の同期 `SmtpConnection` を `spawn_blocking` 上で使用する。

use std::time::Duration;

use async_trait::async_trait;
use kerawi_domain::notification::{EmailMessage, NotificationError};
use lettre::{
    address::Envelope,
    transport::smtp::{
        authentication::{Credentials, Mechanism},
        client::{SmtpConnection, TlsParameters},
        extension::ClientId,
    },
};

use super::{NotificationSender, message::build_message, relay::classify_smtp_error};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// SMTP 認証情報
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpCredentials {
    pub username: String,
    pub password: String,
}

impl SmtpCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl From<SmtpCredentials> for Credentials {
    fn from(value: SmtpCredentials) -> Self {
        Credentials::new(value.username, value.password)
    }
}

/// 直接 SMTP 通知送信
pub struct SmtpNotificationSender {
    host:        String,
    port:        u16,
    credentials: SmtpCredentials,
}

impl SmtpNotificationSender {
    /// 新しい直接 SMTP 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: SMTP サーバーのホスト名（例: "smtp.gmail.com"）
    /// - `port`: ポート番号（通常 587）
    /// - `credentials`: SMTP 認証情報
    pub fn new(host: impl Into<String>, port: u16, credentials: SmtpCredentials) -> Self {
        Self {
            host: host.into(),
            port,
            credentials,
        }
    }
}

/// 1 通分の SMTP セッションを実行する（ブロッキング）
fn send_blocking(
    host: &str,
    port: u16,
    credentials: &Credentials,
    envelope: &Envelope,
    body: &[u8],
) -> Result<(), NotificationError> {
    let hello = ClientId::default();

    let mut connection =
        SmtpConnection::connect((host, port), Some(CONNECT_TIMEOUT), &hello, None, None)
            .map_err(|e| classify_smtp_error(&e))?;

    if !connection.can_starttls() {
        connection.abort();
        return Err(NotificationError::Unavailable(format!(
            "{host}:{port} が STARTTLS に対応していない"
        )));
    }

    let tls = TlsParameters::new(host.to_string())
        .map_err(|e| NotificationError::BuildFailed(format!("TLS 設定失敗: {e}")))?;
    connection
        .starttls(&tls, &hello)
        .map_err(|e| classify_smtp_error(&e))?;

    connection
        .auth(&[Mechanism::Plain, Mechanism::Login], credentials)
        .map_err(|e| classify_smtp_error(&e))?;

    connection
        .send(envelope, body)
        .map_err(|e| classify_smtp_error(&e))?;

    // 送信は完了しているため、QUIT の失敗は結果に影響させない
    if let Err(e) = connection.quit() {
        tracing::debug!(error = %e, "SMTP QUIT に失敗");
    }

    Ok(())
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(email)?;
        let envelope = message.envelope().clone();
        let body = message.formatted();

        let host = self.host.clone();
        let port = self.port;
        let credentials = Credentials::from(self.credentials.clone());

        tokio::task::spawn_blocking(move || {
            send_blocking(&host, port, &credentials, &envelope, &body)
        })
        .await
        .map_err(|e| NotificationError::Unavailable(format!("SMTP 送信タスクが異常終了: {e}")))?
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
