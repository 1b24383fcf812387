//! # 通知サービス
//!
//! テンプレートレンダリング → 管理者宛て送信 → 確認メール送信を統合するサービス。
//!
//! ## 設計方針
//!
//! - **短絡**: 管理者宛ての送信に失敗した場合、確認メールは送らない
//! - **結果は管理者宛てで決まる**: 確認メールの失敗はログのみで、利用者への結果は変えない
//! - **依存性注入**: 送信方式は [`EmailGateway`] 経由で差し替える

use kerawi_domain::{
    notification::{DeliveryOutcome, NotificationError},
    submission::Submission,
};
use kerawi_infra::EmailGateway;
use kerawi_shared::event_log;
use thiserror::Error;

use super::TemplateRenderer;

/// フォーム送信処理のエラー
///
/// 送信失敗は [`DeliveryOutcome::Failed`] で表し、このエラーには含めない。
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// 通知メールの組み立てに失敗（プログラムの不具合）
    #[error("通知メールの組み立てに失敗: {0}")]
    Composition(#[source] NotificationError),
}

/// 通知サービス
pub struct NotificationService {
    gateway:           EmailGateway,
    template_renderer: TemplateRenderer,
}

impl NotificationService {
    pub fn new(gateway: EmailGateway, template_renderer: TemplateRenderer) -> Self {
        Self {
            gateway,
            template_renderer,
        }
    }

    /// 検証済みのフォーム送信について通知メールを送る
    ///
    /// 戻り値は管理者宛て送信の結果。確認メールは管理者宛てが成功した場合のみ 1 回送る。
    pub async fn dispatch(&self, submission: &Submission) -> Result<DeliveryOutcome, SubmissionError> {
        let form_kind: &'static str = submission.kind().into();

        let notification = self
            .template_renderer
            .render(submission)
            .map_err(SubmissionError::Composition)?;

        let outcome = self.gateway.deliver(&notification.admin).await;
        if let DeliveryOutcome::Failed { reason, transient } = &outcome {
            tracing::error!(
                error.category = event_log::error::category::EXTERNAL_SERVICE,
                error.kind = event_log::error::kind::EMAIL_DELIVERY,
                notification.transport = self.gateway.transport_name(),
                notification.transient = *transient,
                event.form_kind = form_kind,
                "管理者宛てメールの送信に失敗: {}",
                reason
            );
            return Ok(outcome);
        }

        let confirmation = self.gateway.deliver(&notification.confirmation).await;
        if let DeliveryOutcome::Failed { reason, transient } = &confirmation {
            tracing::warn!(
                error.category = event_log::error::category::EXTERNAL_SERVICE,
                error.kind = event_log::error::kind::EMAIL_DELIVERY,
                notification.transport = self.gateway.transport_name(),
                notification.transient = *transient,
                event.form_kind = form_kind,
                "確認メールの送信に失敗: {}",
                reason
            );
        }

        Ok(outcome)
    }
}
