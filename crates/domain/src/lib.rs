//! # Kerawi ドメイン層
//!
//! ホテルサイトのフォーム送信と通知メールに関するドメインモデルを定義する。
//!
//! ## 設計方針
//!
//! - **I/O を持たない**: 検証とモデル定義のみ。メール送信やテンプレートは外側の層が担う
//! - **生成時検証**: 値オブジェクトは検証済みの値しか保持しない
//! - **1 リクエスト限りのデータ**: 送信内容は永続化されない
//!
//! ## モジュール構成
//!
//! - [`value_objects`] - フォーム項目の値オブジェクト（メールアドレス、電話番号、選択肢）
//! - [`submission`] - 3 種類のフォーム送信とその検証
//! - [`notification`] - 通知メールのモデルと送信結果

pub mod notification;
pub mod submission;
pub mod value_objects;
