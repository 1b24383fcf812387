//! # 通知
//!
//! フォーム送信に伴うメール通知のドメインモデルを定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`EmailMessage`] | 通知メール | 送信ごとに新しく組み立てる。組み立て後は変更しない |
//! | [`SubmissionNotification`] | 通知メールの組 | 管理者宛て + 送信者宛て確認メール |
//! | [`DeliveryOutcome`] | 送信結果 | 利用者へのリダイレクト先を決める。永続化・再送しない |
//!
//! ## 設計方針
//!
//! - **1 回だけ送信**: リトライ・キューイングは行わない
//! - **エラーの分類**: 一時的な障害（ネットワーク等）と恒久的な失敗（宛先不正等）を型で区別する

use thiserror::Error;

/// 通知送信エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// 送信元・宛先アドレスが不正
    #[error("メールアドレスが不正: {0}")]
    InvalidAddress(String),

    /// メッセージの組み立てに失敗
    #[error("メッセージ構築に失敗: {0}")]
    BuildFailed(String),

    /// 送信先サービスがメッセージを拒否した（API 4xx、SMTP 恒久エラー）
    #[error("送信が拒否された: {0}")]
    Rejected(String),

    /// 送信先サービスに到達できない・一時的に利用不可（接続失敗、API 5xx、SMTP 一時エラー）
    #[error("送信先が利用できない: {0}")]
    Unavailable(String),

    /// テンプレートレンダリングに失敗
    #[error("テンプレートレンダリングに失敗: {0}")]
    TemplateFailed(String),
}

impl NotificationError {
    /// 再試行すれば成功しうる一時的な障害かどうか
    ///
    /// 自動リトライは行わない。ログで区別するために使用する。
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

/// メールボックス（アドレス + 表示名）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub email: String,
    pub name:  Option<String>,
}

impl Mailbox {
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            email: email.into(),
            name,
        }
    }

    /// 表示名なしのメールボックス
    pub fn address(email: impl Into<String>) -> Self {
        Self::new(email, None)
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.email),
            None => f.write_str(&self.email),
        }
    }
}

/// メールメッセージ
///
/// テンプレートレンダリングの出力。NotificationSender に渡される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    /// 送信元
    pub from:      Mailbox,
    /// 送信先
    pub to:        Mailbox,
    /// 件名
    pub subject:   String,
    /// HTML 本文
    pub html_body: String,
    /// プレーンテキスト本文
    pub text_body: String,
}

/// 1 件のフォーム送信から生成される通知メールの組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionNotification {
    /// 管理者宛て（送信内容の全項目を含む）
    pub admin:        EmailMessage,
    /// 送信者宛て確認メール（管理者宛ての送信に成功した場合のみ送る）
    pub confirmation: EmailMessage,
}

/// 送信結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// 送信に成功
    Delivered,
    /// 送信に失敗（理由は運用者向け。利用者には表示しない）
    Failed { reason: String, transient: bool },
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }
}

impl From<Result<(), NotificationError>> for DeliveryOutcome {
    fn from(result: Result<(), NotificationError>) -> Self {
        match result {
            Ok(()) => Self::Delivered,
            Err(e) => Self::Failed {
                transient: e.is_transient(),
                reason:    e.to_string(),
            },
        }
    }
}
