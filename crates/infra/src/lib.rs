//! # Kerawi インフラ層
//!
//! 外部システム（メール送信サービス）との通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **メール送信**: Brevo API / SMTP リレー / 直接 SMTP の 3 方式の送信実装
//! - **送信結果の集約**: 送信エラーを [`DeliveryOutcome`](kerawi_domain::notification::DeliveryOutcome) に変換し、ログに記録する
//!
//! ## 依存関係
//!
//! ```text
//! web → infra → domain
//!   ↘     ↓
//!     shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`notification`] - `NotificationSender` trait と送信実装
//! - `mock` - テスト用モック（`test-utils` feature）

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod notification;

pub use notification::{EmailGateway, NotificationSender};
