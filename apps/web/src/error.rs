//! # Web エラー定義
//!
//! ページ表示で発生するエラーと、HTTP レスポンスへの変換を定義する。
//!
//! フォーム送信の失敗（検証エラー・送信失敗）はこのエラーに含めない。
//! 検証エラーはフォームの再表示、送信失敗は失敗フラグ付きのリダイレクトで表す。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use kerawi_shared::event_log;
use thiserror::Error;

/// Web サーバーで発生するエラー
#[derive(Debug, Error)]
pub enum WebError {
    /// ページテンプレートのレンダリングに失敗
    #[error("ページのレンダリングに失敗: {0}")]
    Render(#[from] tera::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match &self {
            WebError::Render(e) => {
                tracing::error!(
                    error.category = event_log::error::category::INTERNAL,
                    error.kind = event_log::error::kind::TEMPLATE,
                    "ページのレンダリングに失敗: {:?}",
                    e
                );
            }
        }

        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renderエラーは500になる() {
        let error = WebError::Render(tera::Error::msg("missing template"));

        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
