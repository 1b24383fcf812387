//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは薄く保ち、検証はドメイン層、送信はユースケース層に委譲
//! - フォーム送信の結果は `msg_sent` / `newsletter_success` クエリ（1: 成功、2: 失敗）で伝える

pub mod booking;
pub mod contact;
pub mod health;
pub mod newsletter;
pub mod pages;

use std::collections::BTreeMap;

pub use booking::{show_booking, submit_booking};
pub use contact::{show_contact, submit_contact};
pub use health::health_check;
use kerawi_domain::{
    notification::DeliveryOutcome,
    submission::{FormKind, Submission, ValidationErrors},
};
use kerawi_shared::{
    event_log::{self, event},
    log_business_event,
};
pub use newsletter::subscribe_newsletter;
pub use pages::{about, gallery, index, menu, room, service};
use serde::Deserialize;
use tera::Context;

use crate::{usecase::NotificationService, view::PageRenderer};

/// ハンドラの共有状態
pub struct SiteState {
    pub pages:        PageRenderer,
    pub notification: NotificationService,
}

/// 送信結果フラグ
///
/// リダイレクト先のクエリパラメータとして利用者に結果を伝える。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFlag {
    /// `1`
    Success,
    /// `2`
    Failure,
}

impl StatusFlag {
    /// クエリパラメータの値
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "1",
            Self::Failure => "2",
        }
    }

    /// クエリパラメータの値からパースする（`1` / `2` 以外は無視）
    pub fn parse(value: Option<&str>) -> Option<Self> {
        match value? {
            "1" => Some(Self::Success),
            "2" => Some(Self::Failure),
            _ => None,
        }
    }

    /// テンプレートに渡すバナー種別
    fn banner(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

impl From<&DeliveryOutcome> for StatusFlag {
    fn from(outcome: &DeliveryOutcome) -> Self {
        if outcome.is_delivered() {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

/// ページ表示時のクエリパラメータ
#[derive(Debug, Default, Deserialize)]
pub struct StatusQuery {
    pub msg_sent:           Option<String>,
    pub newsletter_success: Option<String>,
}

impl StatusQuery {
    /// 共通レイアウト用のコンテキストを作る
    ///
    /// ニュースレターの結果バナーは全ページ、フォームの結果バナーは `msg_banner` に入れる。
    pub(crate) fn page_context(&self) -> Context {
        let mut context = Context::new();
        if let Some(flag) = StatusFlag::parse(self.newsletter_success.as_deref()) {
            context.insert("newsletter_banner", flag.banner());
        }
        if let Some(flag) = StatusFlag::parse(self.msg_sent.as_deref()) {
            context.insert("msg_banner", flag.banner());
        }
        context
    }
}

/// 検証エラーをテンプレート用の「項目名 → エラー文字列」に変換する
pub(crate) fn error_messages(errors: &ValidationErrors) -> BTreeMap<&'static str, String> {
    errors
        .iter()
        .map(|(field, error)| (field, error.to_string()))
        .collect()
}

/// 検証エラーをビジネスイベントとして記録する
pub(crate) fn log_rejected(kind: FormKind, errors: &ValidationErrors) {
    let form_kind: &'static str = kind.into();
    log_business_event!(
        event.category = event::category::SUBMISSION,
        event.action = event::action::SUBMISSION_REJECTED,
        event.result = event::result::FAILURE,
        event.form_kind = form_kind,
        submission.invalid_fields = ?errors.fields(),
        "フォーム送信を検証エラーで却下"
    );
}

/// 検証済みのフォーム送信を通知し、利用者に返すフラグを決める
pub(crate) async fn dispatch_submission(
    service: &NotificationService,
    submission: Submission,
) -> StatusFlag {
    let form_kind: &'static str = submission.kind().into();
    log_business_event!(
        event.category = event::category::SUBMISSION,
        event.action = event::action::SUBMISSION_VALIDATED,
        event.result = event::result::SUCCESS,
        event.form_kind = form_kind,
        "フォーム送信を受理"
    );

    match service.dispatch(&submission).await {
        Ok(outcome) => StatusFlag::from(&outcome),
        Err(e) => {
            tracing::error!(
                error.category = event_log::error::category::INTERNAL,
                error.kind = event_log::error::kind::TEMPLATE,
                event.form_kind = form_kind,
                "通知メールを組み立てられない: {}",
                e
            );
            StatusFlag::Failure
        }
    }
}
