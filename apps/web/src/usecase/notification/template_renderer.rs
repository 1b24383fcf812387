//! # テンプレートレンダラー
//!
//! tera テンプレートエンジンで通知メールを HTML/plaintext 両形式で生成する。
//!
//! ## 設計方針
//!
//! - **`include_str!` によるコンパイル時埋め込み**: テンプレートはバイナリに埋め込まれる
//! - **エスケープ**: `.html` テンプレートは自動エスケープ、`.txt` はそのまま出力する
//! - **1 送信 = 2 通**: 管理者宛て（全項目）と送信者宛て確認メールを同時に生成する

use kerawi_domain::{
    notification::{EmailMessage, Mailbox, NotificationError, SubmissionNotification},
    submission::Submission,
};
use tera::{Context, Tera};

use crate::config::HotelIdentity;

const CONTACT_ADMIN_SUBJECT: &str = "Contact Form Submission";
const BOOKING_ADMIN_SUBJECT: &str = "New Booking Request";
const NEWSLETTER_ADMIN_SUBJECT: &str = "New Newsletter Subscription";

const CONTACT_CONFIRMATION_SUBJECT: &str = "We Received Your Message!";
const BOOKING_CONFIRMATION_SUBJECT: &str = "We Received Your Booking!";
const NEWSLETTER_CONFIRMATION_SUBJECT: &str = "Thank You for Subscribing!";

/// テンプレートレンダラー
///
/// tera テンプレートエンジンをラップし、検証済みの [`Submission`] から
/// [`SubmissionNotification`] を生成する。
pub struct TemplateRenderer {
    engine:   Tera,
    identity: HotelIdentity,
}

impl TemplateRenderer {
    /// 新しいレンダラーインスタンスを作成
    ///
    /// `include_str!` で埋め込んだテンプレートを tera に登録する。
    pub fn new(identity: HotelIdentity) -> Result<Self, NotificationError> {
        let mut engine = Tera::default();

        engine
            .add_raw_templates(vec![
                (
                    "contact_admin.html",
                    include_str!("../../../templates/notifications/contact_admin.html"),
                ),
                (
                    "contact_admin.txt",
                    include_str!("../../../templates/notifications/contact_admin.txt"),
                ),
                (
                    "contact_confirmation.html",
                    include_str!("../../../templates/notifications/contact_confirmation.html"),
                ),
                (
                    "contact_confirmation.txt",
                    include_str!("../../../templates/notifications/contact_confirmation.txt"),
                ),
                (
                    "booking_admin.html",
                    include_str!("../../../templates/notifications/booking_admin.html"),
                ),
                (
                    "booking_admin.txt",
                    include_str!("../../../templates/notifications/booking_admin.txt"),
                ),
                (
                    "booking_confirmation.html",
                    include_str!("../../../templates/notifications/booking_confirmation.html"),
                ),
                (
                    "booking_confirmation.txt",
                    include_str!("../../../templates/notifications/booking_confirmation.txt"),
                ),
                (
                    "newsletter_admin.html",
                    include_str!("../../../templates/notifications/newsletter_admin.html"),
                ),
                (
                    "newsletter_admin.txt",
                    include_str!("../../../templates/notifications/newsletter_admin.txt"),
                ),
                (
                    "newsletter_confirmation.html",
                    include_str!("../../../templates/notifications/newsletter_confirmation.html"),
                ),
                (
                    "newsletter_confirmation.txt",
                    include_str!("../../../templates/notifications/newsletter_confirmation.txt"),
                ),
            ])
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(Self { engine, identity })
    }

    /// フォーム送信から管理者宛て・確認メールの組を生成する
    pub fn render(&self, submission: &Submission) -> Result<SubmissionNotification, NotificationError> {
        let (template_prefix, admin_subject, confirmation_subject, context) =
            self.build_template_params(submission);

        let admin = self.render_message(
            &format!("{template_prefix}_admin"),
            admin_subject,
            self.identity.admin.clone(),
            &context,
        )?;

        let recipient = Mailbox::new(
            submission.submitter_email().as_str(),
            submission.submitter_name().map(str::to_string),
        );
        let confirmation = self.render_message(
            &format!("{template_prefix}_confirmation"),
            confirmation_subject,
            recipient,
            &context,
        )?;

        Ok(SubmissionNotification {
            admin,
            confirmation,
        })
    }

    fn render_message(
        &self,
        template_name: &str,
        subject: &str,
        to: Mailbox,
        context: &Context,
    ) -> Result<EmailMessage, NotificationError> {
        let html_body = self
            .engine
            .render(&format!("{template_name}.html"), context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        let text_body = self
            .engine
            .render(&format!("{template_name}.txt"), context)
            .map_err(|e| NotificationError::TemplateFailed(e.to_string()))?;

        Ok(EmailMessage {
            from: self.identity.sender.clone(),
            to,
            subject: subject.to_string(),
            html_body,
            text_body,
        })
    }

    /// テンプレート名の接頭辞、件名、コンテキストを構築する
    fn build_template_params(
        &self,
        submission: &Submission,
    ) -> (&'static str, &'static str, &'static str, Context) {
        let mut context = Context::new();
        context.insert("hotel_name", &self.identity.hotel_name);

        match submission {
            Submission::Contact(contact) => {
                context.insert("name", contact.name.as_str());
                context.insert("email", contact.email.as_str());
                context.insert("phone", contact.phone.as_str());
                context.insert("message", contact.message.as_str());
                (
                    "contact",
                    CONTACT_ADMIN_SUBJECT,
                    CONTACT_CONFIRMATION_SUBJECT,
                    context,
                )
            }
            Submission::Booking(booking) => {
                context.insert("name", booking.name.as_str());
                context.insert("email", booking.email.as_str());
                context.insert("phone", booking.phone.as_str());
                context.insert("checkin", booking.checkin.as_str());
                context.insert("checkout", booking.checkout.as_str());
                context.insert("adults", &booking.adults.to_string());
                context.insert("children", &booking.children.to_string());
                context.insert("room", &booking.room.label());
                context.insert("special_request", booking.special_request.as_str());
                (
                    "booking",
                    BOOKING_ADMIN_SUBJECT,
                    BOOKING_CONFIRMATION_SUBJECT,
                    context,
                )
            }
            Submission::Newsletter(newsletter) => {
                context.insert("email", newsletter.email.as_str());
                (
                    "newsletter",
                    NEWSLETTER_ADMIN_SUBJECT,
                    NEWSLETTER_CONFIRMATION_SUBJECT,
                    context,
                )
            }
        }
    }
}
