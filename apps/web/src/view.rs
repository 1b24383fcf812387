//! # ページレンダラー
//!
//! サイトの各ページを tera テンプレートから HTML に変換する。
//! テンプレートは `include_str!` でバイナリに埋め込み、共通レイアウト `base.html` を継承する。

use axum::response::Html;
use tera::{Context, Tera};

use crate::error::WebError;

/// ページレンダラー
pub struct PageRenderer {
    engine:     Tera,
    hotel_name: String,
}

impl PageRenderer {
    pub fn new(hotel_name: impl Into<String>) -> Result<Self, tera::Error> {
        let mut engine = Tera::default();

        engine.add_raw_templates(vec![
            ("base.html", include_str!("../templates/pages/base.html")),
            ("index.html", include_str!("../templates/pages/index.html")),
            ("menu.html", include_str!("../templates/pages/menu.html")),
            ("about.html", include_str!("../templates/pages/about.html")),
            ("gallery.html", include_str!("../templates/pages/gallery.html")),
            ("service.html", include_str!("../templates/pages/service.html")),
            ("room.html", include_str!("../templates/pages/room.html")),
            ("contact.html", include_str!("../templates/pages/contact.html")),
            ("booking.html", include_str!("../templates/pages/booking.html")),
        ])?;

        Ok(Self {
            engine,
            hotel_name: hotel_name.into(),
        })
    }

    /// ページをレンダリングする
    ///
    /// `hotel_name` は全ページ共通でコンテキストに追加する。
    pub fn render(&self, template_name: &str, mut context: Context) -> Result<Html<String>, WebError> {
        context.insert("hotel_name", &self.hotel_name);
        let html = self.engine.render(template_name, &context)?;
        Ok(Html(html))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("index.html")]
    #[case("menu.html")]
    #[case("about.html")]
    #[case("gallery.html")]
    #[case("service.html")]
    #[case("room.html")]
    fn 静的ページがレンダリングできる(#[case] template_name: &str) {
        let renderer = PageRenderer::new("Kerawi Hotel").unwrap();

        let Html(html) = renderer.render(template_name, Context::new()).unwrap();

        assert!(html.contains("Kerawi Hotel"));
        assert!(html.contains(r#"action="/newsletter""#));
        assert!(html.contains(r#"name="newsletter_email""#));
    }

    #[test]
    fn 存在しないテンプレートはエラーになる() {
        let renderer = PageRenderer::new("Kerawi Hotel").unwrap();

        let result = renderer.render("missing.html", Context::new());

        assert!(matches!(result, Err(WebError::Render(_))));
    }
}
