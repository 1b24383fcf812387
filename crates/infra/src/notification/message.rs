//! lettre メッセージの組み立て
//!
//! SMTP 系の送信実装（リレー / 直接 SMTP）で共有する。

use kerawi_domain::notification::{EmailMessage, Mailbox, NotificationError};
use lettre::message::{Message, MultiPart, SinglePart, header::ContentType};

/// [`EmailMessage`] から text/plain + text/html の multipart/alternative メッセージを組み立てる
pub(super) fn build_message(email: &EmailMessage) -> Result<Message, NotificationError> {
    Message::builder()
        .from(to_lettre_mailbox(&email.from)?)
        .to(to_lettre_mailbox(&email.to)?)
        .subject(&email.subject)
        .multipart(
            MultiPart::alternative()
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_PLAIN)
                        .body(email.text_body.clone()),
                )
                .singlepart(
                    SinglePart::builder()
                        .header(ContentType::TEXT_HTML)
                        .body(email.html_body.clone()),
                ),
        )
        .map_err(|e| NotificationError::BuildFailed(e.to_string()))
}

fn to_lettre_mailbox(mailbox: &Mailbox) -> Result<lettre::message::Mailbox, NotificationError> {
    let address = mailbox
        .email
        .parse::<lettre::Address>()
        .map_err(|e| NotificationError::InvalidAddress(format!("{}: {e}", mailbox.email)))?;

    Ok(lettre::message::Mailbox::new(mailbox.name.clone(), address))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email_to(to: &str) -> EmailMessage {
        EmailMessage {
            from:      Mailbox::new("info@kerawi.example", Some("Kerawi Hotel".to_string())),
            to:        Mailbox::new(to, Some("Ann".to_string())),
            subject:   "We Received Your Message!".to_string(),
            html_body: "<p>Hi Ann,</p>".to_string(),
            text_body: "Hi Ann,".to_string(),
        }
    }

    #[test]
    fn multipartメッセージを組み立てる() {
        let message = build_message(&email_to("ann@x.com")).unwrap();
        let formatted = String::from_utf8(message.formatted()).unwrap();

        assert!(formatted.contains("Subject: We Received Your Message!"));
        assert!(formatted.contains("multipart/alternative"));
        assert!(formatted.contains("text/plain"));
        assert!(formatted.contains("text/html"));
        assert!(formatted.contains("<p>Hi Ann,</p>"));
    }

    #[test]
    fn エンベロープに送信元と宛先が設定される() {
        let message = build_message(&email_to("ann@x.com")).unwrap();
        let envelope = message.envelope();

        assert_eq!(
            envelope.from().map(ToString::to_string),
            Some("info@kerawi.example".to_string())
        );
        assert_eq!(envelope.to().len(), 1);
        assert_eq!(envelope.to()[0].to_string(), "ann@x.com");
    }

    #[test]
    fn 宛先アドレスが不正ならinvalid_addressを返す() {
        let result = build_message(&email_to("not-an-address"));

        assert!(matches!(result, Err(NotificationError::InvalidAddress(_))));
    }
}
