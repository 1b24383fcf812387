//! # Kerawi Web ライブラリ
//!
//! ホテルサイトの HTTP ハンドラ、設定、通知ユースケースを公開する。
//! 統合テスト用にルーター構築関数へのアクセスを提供する。

pub mod app_builder;
pub mod config;
pub mod error;
pub mod handler;
pub mod usecase;
pub mod view;
