//! # テスト用モック送信実装
//!
//! ユースケース・ハンドラテストで使用するインメモリのモック。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! kerawi-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use kerawi_domain::notification::{EmailMessage, NotificationError};

use crate::notification::NotificationSender;

// ===== MockNotificationSender =====

/// 送信を試みたメッセージを記録するモック
///
/// `failing_at` で指定した試行（0 始まり）だけエラーを返す。
/// 失敗した試行も `attempts` に記録される。
#[derive(Clone, Default)]
pub struct MockNotificationSender {
    attempts: Arc<Mutex<Vec<EmailMessage>>>,
    failures: Arc<Mutex<HashMap<usize, NotificationError>>>,
}

impl MockNotificationSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// `index` 番目（0 始まり）の送信試行で `error` を返すよう設定する
    pub fn failing_at(self, index: usize, error: NotificationError) -> Self {
        self.failures.lock().unwrap().insert(index, error);
        self
    }

    /// 送信を試みたメッセージ（成功・失敗を問わない）
    pub fn attempts(&self) -> Vec<EmailMessage> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationSender for MockNotificationSender {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), NotificationError> {
        let index = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(email.clone());
            attempts.len() - 1
        };

        match self.failures.lock().unwrap().get(&index) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
