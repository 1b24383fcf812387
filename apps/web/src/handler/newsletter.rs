//! # ニュースレター購読ハンドラ
//!
//! ## エンドポイント
//!
//! - `POST /newsletter` - 購読メールアドレスを検証し、通知メールを送信
//!
//! 全ページ共通のフッターから送信されるため、結果は元のページ（`Referer`）に
//! `newsletter_success=1|2` を付けてリダイレクトして伝える。

use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header},
    response::Redirect,
};
use kerawi_domain::submission::{FormKind, NewsletterForm};
use url::Url;

use super::{SiteState, StatusFlag, dispatch_submission, log_rejected};

const FLAG_PARAM: &str = "newsletter_success";

/// `Referer` の解決に使う仮のオリジン（リダイレクト先にはパスとクエリのみ使う）
const PLACEHOLDER_ORIGIN: &str = "http://localhost/";

/// POST /newsletter
///
/// ## レスポンス
///
/// - `303 See Other`: 元のページ（`Referer`、なければ `/`）へ
///   - 項目なし: フラグを付けない（送信しない）
///   - 検証エラー: `newsletter_success=2`（送信しない）
///   - 送信成功 / 失敗: `newsletter_success=1` / `2`
#[tracing::instrument(skip_all)]
pub async fn subscribe_newsletter(
    State(state): State<Arc<SiteState>>,
    headers: HeaderMap,
    Form(form): Form<NewsletterForm>,
) -> Redirect {
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());

    let flag = match form.validate() {
        None => None,
        Some(Err(errors)) => {
            log_rejected(FormKind::Newsletter, &errors);
            Some(StatusFlag::Failure)
        }
        Some(Ok(submission)) => {
            Some(dispatch_submission(&state.notification, submission.into()).await)
        }
    };

    Redirect::to(&redirect_target(referer, flag))
}

/// リダイレクト先を決める
///
/// `Referer` のパスとクエリだけを使い、ホストは捨てる（外部サイトへはリダイレクトしない）。
/// フラグを付ける場合は既存の `newsletter_success` を置き換える。
fn redirect_target(referer: Option<&str>, flag: Option<StatusFlag>) -> String {
    let Ok(base) = Url::parse(PLACEHOLDER_ORIGIN) else {
        return "/".to_string();
    };
    let mut url = referer
        .and_then(|referer| base.join(referer).ok())
        .unwrap_or(base);

    if let Some(flag) = flag {
        let retained: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != FLAG_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        url.query_pairs_mut()
            .clear()
            .extend_pairs(retained)
            .append_pair(FLAG_PARAM, flag.as_str());
    }

    // 先頭が `//` だとプロトコル相対 URL として別ホストに解釈されるため 1 つにまとめる
    let path = format!("/{}", url.path().trim_start_matches(['/', '\\']));
    match url.query() {
        Some(query) if !query.is_empty() => format!("{path}?{query}"),
        _ => path,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(None, Some(StatusFlag::Success), "/?newsletter_success=1")]
    #[case(None, None, "/")]
    #[case(Some("http://localhost:5000/room"), Some(StatusFlag::Failure), "/room?newsletter_success=2")]
    #[case(Some("http://localhost:5000/room"), None, "/room")]
    #[case(Some("/about?lang=en"), Some(StatusFlag::Success), "/about?lang=en&newsletter_success=1")]
    #[case(Some("/about?lang=en"), None, "/about?lang=en")]
    #[case(
        Some("/menu?newsletter_success=2"),
        Some(StatusFlag::Success),
        "/menu?newsletter_success=1"
    )]
    #[case(Some("https://evil.example/phish"), Some(StatusFlag::Success), "/phish?newsletter_success=1")]
    #[case(Some("//evil.example/phish"), None, "/phish")]
    #[case(
        Some("http://localhost:5000//evil.example/phish"),
        Some(StatusFlag::Success),
        "/evil.example/phish?newsletter_success=1"
    )]
    #[case(
        Some("/.//evil.example/phish"),
        Some(StatusFlag::Success),
        "/evil.example/phish?newsletter_success=1"
    )]
    #[case(
        Some("http://localhost:5000/\\evil.example"),
        Some(StatusFlag::Success),
        "/evil.example?newsletter_success=1"
    )]
    #[case(Some("http://localhost:5000///evil.example"), None, "/evil.example")]
    fn リダイレクト先を決める(
        #[case] referer: Option<&str>,
        #[case] flag: Option<StatusFlag>,
        #[case] expected: &str,
    ) {
        assert_eq!(redirect_target(referer, flag), expected);
    }
}
