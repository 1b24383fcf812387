//! # 予約ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /booking` - 予約フォームを表示（`msg_sent=1|2` で結果バナー）
//! - `POST /booking` - 予約リクエストを検証し、通知メールを送信

use std::sync::Arc;

use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use kerawi_domain::submission::{BookingForm, FormKind, ValidationErrors};

use super::{SiteState, StatusQuery, dispatch_submission, error_messages, log_rejected};
use crate::error::WebError;

fn render_form(
    state: &SiteState,
    query: &StatusQuery,
    form: &BookingForm,
    errors: Option<&ValidationErrors>,
) -> Result<Html<String>, WebError> {
    let mut context = query.page_context();
    context.insert("form", form);
    context.insert(
        "errors",
        &errors.map(error_messages).unwrap_or_default(),
    );
    state.pages.render("booking.html", context)
}

/// GET /booking
///
/// 選択肢は先頭の値を初期選択にする。
pub async fn show_booking(
    State(state): State<Arc<SiteState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, WebError> {
    let form = BookingForm {
        adults: "1".to_string(),
        children: "0".to_string(),
        room: "1".to_string(),
        ..BookingForm::default()
    };
    render_form(&state, &query, &form, None)
}

/// POST /booking
///
/// ## レスポンス
///
/// - `303 See Other`: `/booking?msg_sent=1`（送信成功）または `?msg_sent=2`（送信失敗）
/// - `422 Unprocessable Entity`: 検証エラー。入力値とエラーを含むフォームを再表示
#[tracing::instrument(skip_all)]
pub async fn submit_booking(
    State(state): State<Arc<SiteState>>,
    Form(form): Form<BookingForm>,
) -> Result<Response, WebError> {
    match form.validate() {
        Ok(submission) => {
            let flag = dispatch_submission(&state.notification, submission.into()).await;
            Ok(Redirect::to(&format!("/booking?msg_sent={}", flag.as_str())).into_response())
        }
        Err(errors) => {
            log_rejected(FormKind::Booking, &errors);
            let html = render_form(&state, &StatusQuery::default(), &form, Some(&errors))?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, html).into_response())
        }
    }
}
