//! # 静的ページハンドラ
//!
//! ホテル紹介ページ（トップ、メニュー、概要、ギャラリー、サービス、客室）を表示する。
//! ロジックは持たず、共通レイアウトのニュースレター結果バナーのみ反映する。

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Html,
};

use super::{SiteState, StatusQuery};
use crate::error::WebError;

fn render(state: &SiteState, template_name: &str, query: &StatusQuery) -> Result<Html<String>, WebError> {
    state.pages.render(template_name, query.page_context())
}

/// GET /
pub async fn index(
    State(state): State<Arc<SiteState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, WebError> {
    render(&state, "index.html", &query)
}

/// GET /menu
pub async fn menu(
    State(state): State<Arc<SiteState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, WebError> {
    render(&state, "menu.html", &query)
}

/// GET /about
pub async fn about(
    State(state): State<Arc<SiteState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, WebError> {
    render(&state, "about.html", &query)
}

/// GET /gallery
pub async fn gallery(
    State(state): State<Arc<SiteState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, WebError> {
    render(&state, "gallery.html", &query)
}

/// GET /service
pub async fn service(
    State(state): State<Arc<SiteState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, WebError> {
    render(&state, "service.html", &query)
}

/// GET /room
pub async fn room(
    State(state): State<Arc<SiteState>>,
    Query(query): Query<StatusQuery>,
) -> Result<Html<String>, WebError> {
    render(&state, "room.html", &query)
}
