//! # 問い合わせハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /contact` - 問い合わせフォームを表示（`msg_sent=1|2` で結果バナー）
//! - `POST /contact` - 問い合わせを検証し、通知メールを送信

use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use kerawi_domain::submission::{ContactForm, FormKind, ValidationErrors};

use super::{SiteState, StatusQuery, dispatch_submission, error_messages, log_rejected};
use crate::error::WebError;

fn render_form(
    state: &SiteState,
    query: &StatusQuery,
    form: &ContactForm,
    errors: Option<&ValidationErrors>,
) -> Result<Html<String>, WebError> {
    let mut context = query.page_context();
    context.insert("form", form);
    context.insert(
        "errors",
        &errors.map(error_messages).unwrap_or_default(),
    );
    state.pages.render("contact.html", context)
}

/// GET /contact
pub async fn show_contact(
    State(state): State<Arc<SiteState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, WebError> {
    render_form(&state, &query, &ContactForm::default(), None)
}

/// POST /contact
///
/// ## レスポンス
///
/// - `303 See Other`: `/contact?msg_sent=1`（送信成功）または `?msg_sent=2`（送信失敗）
/// - `422 Unprocessable Entity`: 検証エラー。入力値とエラーを含むフォームを再表示
#[tracing::instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<Arc<SiteState>>,
    Form(form): Form<ContactForm>,
) -> Result<Response, WebError> {
    match form.validate() {
        Ok(submission) => {
            let flag = dispatch_submission(&state.notification, submission.into()).await;
            Ok(Redirect::to(&format!("/contact?msg_sent={}", flag.as_str())).into_response())
        }
        Err(errors) => {
            log_rejected(FormKind::Contact, &errors);
            let html = render_form(&state, &StatusQuery::default(), &form, Some(&errors))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
    }
}
