//! SMTP リレー通知送信実装
//!
//! lettre の `AsyncSmtpTransport` を使用して、認証付き SMTP リレー（Brevo SMTP 等）経由で送信する。
//! トランスポートは起動時に 1 回だけ構築し、接続プールを共有する。

use async_trait::async_trait;
use kerawi_domain::notification::{EmailMessage, NotificationError};
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use super::{NotificationSender, message::build_message, smtp::SmtpCredentials};

/// リレー接続の TLS モード
///
/// 設定値（`implicit` / `starttls` / `none`）から `str::parse` で変換する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RelayTls {
    /// 接続直後から TLS（SMTPS、通常 465 番）
    Implicit,
    /// 平文接続後に STARTTLS で昇格（通常 587 番）
    StartTls,
    /// TLS なし（Mailpit 等のローカル SMTP 向け）
    None,
}

/// SMTP リレー通知送信
///
/// `lettre::AsyncSmtpTransport<Tokio1Executor>` をラップする。
pub struct RelayNotificationSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl RelayNotificationSender {
    /// 新しいリレー送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `host`: リレーサーバーのホスト名（例: "smtp-relay.brevo.com"）
    /// - `port`: ポート番号
    /// - `tls`: TLS モード
    /// - `credentials`: SMTP 認証情報（`None` の場合は認証しない）
    ///
    /// # Errors
    ///
    /// TLS パラメータの構築に失敗した場合は [`NotificationError::BuildFailed`]。
    pub fn new(
        host: &str,
        port: u16,
        tls: RelayTls,
        credentials: Option<SmtpCredentials>,
    ) -> Result<Self, NotificationError> {
        let builder = match tls {
            RelayTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host)
                .map_err(|e| NotificationError::BuildFailed(format!("TLS 設定失敗: {e}")))?,
            RelayTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
                .map_err(|e| NotificationError::BuildFailed(format!("TLS 設定失敗: {e}")))?,
            RelayTls::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };

        let builder = builder.port(port);
        let builder = match credentials {
            Some(credentials) => builder.credentials(credentials.into()),
            None => builder,
        };

        Ok(Self {
            transport: builder.build(),
        })
    }
}

/// lettre の SMTP エラーを送信エラーに分類する
///
/// 5xx 応答は拒否、それ以外（接続失敗、タイムアウト、4xx 応答）は一時的な障害として扱う。
pub(super) fn classify_smtp_error(e: &lettre::transport::smtp::Error) -> NotificationError {
    if e.is_permanent() {
        NotificationError::Rejected(format!("SMTP 送信失敗: {e}"))
    } else {
        NotificationError::Unavailable(format!("SMTP 送信失敗: {e}"))
    }
}

#[async_trait]
impl NotificationSender for RelayNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let message = build_message(email)?;

        self.transport
            .send(message)
            .await
            .map_err(|e| classify_smtp_error(&e))?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}

#[cfg(test)]
mod tests {
    use kerawi_domain::notification::Mailbox;

    use super::*;

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RelayNotificationSender>();
    }

    #[test]
    fn tlsモードをパースする() {
        assert_eq!("implicit".parse(), Ok(RelayTls::Implicit));
        assert_eq!("starttls".parse(), Ok(RelayTls::StartTls));
        assert_eq!("none".parse(), Ok(RelayTls::None));
        assert!("ssl".parse::<RelayTls>().is_err());
        assert!("StartTls".parse::<RelayTls>().is_err());
    }

    #[test]
    fn 全てのtlsモードでトランスポートを構築できる() {
        for tls in [RelayTls::Implicit, RelayTls::StartTls, RelayTls::None] {
            let result = RelayNotificationSender::new(
                "smtp-relay.brevo.com",
                587,
                tls,
                Some(SmtpCredentials::new("user", "pass")),
            );
            assert!(result.is_ok(), "{tls:?}");
        }
    }

    #[tokio::test]
    async fn 接続できない場合はunavailableになる() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let sender = RelayNotificationSender::new("127.0.0.1", port, RelayTls::None, None).unwrap();
        let email = EmailMessage {
            from:      Mailbox::address("info@kerawi.example"),
            to:        Mailbox::address("admin@kerawi.example"),
            subject:   "Contact Form Submission".to_string(),
            html_body: "<p>x</p>".to_string(),
            text_body: "x".to_string(),
        };

        let result = sender.send_email(&email).await;

        assert!(matches!(result, Err(NotificationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn 宛先が不正なら接続せずにinvalid_addressを返す() {
        let sender =
            RelayNotificationSender::new("127.0.0.1", 2525, RelayTls::None, None).unwrap();
        let email = EmailMessage {
            from:      Mailbox::address("info@kerawi.example"),
            to:        Mailbox::address("broken"),
            subject:   "s".to_string(),
            html_body: String::new(),
            text_body: String::new(),
        };

        let result = sender.send_email(&email).await;

        assert!(matches!(result, Err(NotificationError::InvalidAddress(_))));
    }
}
