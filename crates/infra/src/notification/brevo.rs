//! Brevo 通知送信実装
//!
//! Brevo のトランザクションメール API（`POST /v3/smtp/email`）を使用してメールを送信する。
//! 本番環境の既定の送信方式。

use async_trait::async_trait;
use kerawi_domain::notification::{EmailMessage, Mailbox, NotificationError};
use reqwest::StatusCode;
use serde::Serialize;

use super::NotificationSender;

/// Brevo API の既定のベース URL
pub const DEFAULT_BREVO_API_URL: &str = "https://api.brevo.com";

/// Brevo 通知送信
///
/// `reqwest::Client` をラップする。API キーは `api-key` ヘッダーで送る。
pub struct BrevoNotificationSender {
    client:   reqwest::Client,
    endpoint: String,
    api_key:  String,
}

impl BrevoNotificationSender {
    /// 新しい Brevo 送信インスタンスを作成
    ///
    /// # 引数
    ///
    /// - `base_url`: API のベース URL（例: "https://api.brevo.com"）
    /// - `api_key`: Brevo の API キー
    pub fn new(base_url: &str, api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: format!("{}/v3/smtp/email", base_url.trim_end_matches('/')),
            api_key,
        }
    }
}

/// `POST /v3/smtp/email` のリクエストボディ
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendEmailRequest<'a> {
    sender:       Contact<'a>,
    to:           Vec<Contact<'a>>,
    subject:      &'a str,
    html_content: &'a str,
    text_content: &'a str,
}

#[derive(Debug, Serialize)]
struct Contact<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name:  Option<&'a str>,
}

impl<'a> From<&'a Mailbox> for Contact<'a> {
    fn from(mailbox: &'a Mailbox) -> Self {
        Self {
            email: &mailbox.email,
            name:  mailbox.name.as_deref(),
        }
    }
}

impl<'a> From<&'a EmailMessage> for SendEmailRequest<'a> {
    fn from(email: &'a EmailMessage) -> Self {
        Self {
            sender:       Contact::from(&email.from),
            to:           vec![Contact::from(&email.to)],
            subject:      &email.subject,
            html_content: &email.html_body,
            text_content: &email.text_body,
        }
    }
}

/// HTTP ステータスを送信エラーに分類する
///
/// 429 と 5xx は一時的な障害、それ以外の非 2xx は拒否として扱う。
fn classify_status(status: StatusCode, body: &str) -> NotificationError {
    let detail = format!("HTTP {}: {body}", status.as_u16());
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        NotificationError::Unavailable(detail)
    } else {
        NotificationError::Rejected(detail)
    }
}

#[async_trait]
impl NotificationSender for BrevoNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .header("accept", "application/json")
            .json(&SendEmailRequest::from(email))
            .send()
            .await
            .map_err(|e| NotificationError::Unavailable(format!("Brevo API 接続失敗: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }

    fn name(&self) -> &'static str {
        "brevo"
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn sample_email() -> EmailMessage {
        EmailMessage {
            from:      Mailbox::new("info@kerawi.example", Some("Kerawi Hotel".to_string())),
            to:        Mailbox::new("ann@x.com", Some("Ann".to_string())),
            subject:   "We Received Your Message!".to_string(),
            html_body: "<p>Hi Ann,</p>".to_string(),
            text_body: "Hi Ann,".to_string(),
        }
    }

    #[test]
    fn トレイトはsendとsyncを実装している() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<BrevoNotificationSender>();
    }

    #[test]
    fn リクエストボディがbrevoの形式でシリアライズされる() {
        let email = EmailMessage {
            to: Mailbox::address("admin@kerawi.example"),
            ..sample_email()
        };

        let value = serde_json::to_value(SendEmailRequest::from(&email)).unwrap();

        assert_eq!(
            value,
            json!({
                "sender": { "email": "info@kerawi.example", "name": "Kerawi Hotel" },
                "to": [{ "email": "admin@kerawi.example" }],
                "subject": "We Received Your Message!",
                "htmlContent": "<p>Hi Ann,</p>",
                "textContent": "Hi Ann,"
            })
        );
    }

    #[test]
    fn ステータスコードでエラーを分類する() {
        assert!(matches!(
            classify_status(StatusCode::BAD_REQUEST, ""),
            NotificationError::Rejected(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, ""),
            NotificationError::Rejected(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, ""),
            NotificationError::Unavailable(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, ""),
            NotificationError::Unavailable(_)
        ));
    }

    #[tokio::test]
    async fn 送信に成功するとokを返す() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v3/smtp/email")
            .match_header("api-key", "test-api-key")
            .match_body(Matcher::PartialJson(json!({
                "to": [{ "email": "ann@x.com", "name": "Ann" }],
                "subject": "We Received Your Message!"
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"messageId":"<202610140000.1@smtp-relay.mailin.fr>"}"#)
            .create_async()
            .await;

        let sender = BrevoNotificationSender::new(&server.url(), "test-api-key".to_string());
        let result = sender.send_email(&sample_email()).await;

        mock.assert_async().await;
        assert_eq!(result, Ok(()));
    }

    #[tokio::test]
    async fn クライアントエラーはrejectedになる() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v3/smtp/email")
            .with_status(400)
            .with_body(r#"{"code":"invalid_parameter","message":"email is not valid"}"#)
            .create_async()
            .await;

        let sender = BrevoNotificationSender::new(&server.url(), "test-api-key".to_string());
        let result = sender.send_email(&sample_email()).await;

        match result {
            Err(NotificationError::Rejected(detail)) => {
                assert!(detail.starts_with("HTTP 400"));
                assert!(detail.contains("invalid_parameter"));
            }
            other => panic!("Rejected を期待したが {other:?}"),
        }
    }

    #[tokio::test]
    async fn サーバーエラーはunavailableになる() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/v3/smtp/email")
            .with_status(503)
            .create_async()
            .await;

        let sender = BrevoNotificationSender::new(&server.url(), "test-api-key".to_string());
        let result = sender.send_email(&sample_email()).await;

        assert!(matches!(result, Err(NotificationError::Unavailable(_))));
    }

    #[tokio::test]
    async fn 接続できない場合はunavailableになる() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let sender = BrevoNotificationSender::new(
            &format!("http://127.0.0.1:{port}"),
            "test-api-key".to_string(),
        );
        let result = sender.send_email(&sample_email()).await;

        assert!(matches!(result, Err(NotificationError::Unavailable(_))));
    }

    #[test]
    fn ベースurl末尾のスラッシュは無視される() {
        let sender = BrevoNotificationSender::new("https://api.brevo.com/", "k".to_string());
        assert_eq!(sender.endpoint, "https://api.brevo.com/v3/smtp/email");
    }
}
