//! # ユースケース層
//!
//! 検証済みのフォーム送信を受け取り、通知メールの組み立てと送信を行う。

pub mod notification;

pub use notification::{NotificationService, SubmissionError, TemplateRenderer};
