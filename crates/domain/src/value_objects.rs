//! # フォーム項目の値オブジェクト
//!
//! フォームから受け取った文字列を検証し、不正な値の存在を型レベルで排除する。
//!
//! ## 設計方針
//!
//! - **Newtype パターン**: プリミティブ型をラップし、型安全性を確保
//! - **バリデーション**: 生成時に検証し、失敗時は [`FieldError`] を返す
//! - **前後の空白は除去**: 検証も保持も trim 後の値で行う
//!
//! ## 含まれる型
//!
//! | 型 | ラップ対象 | 用途 |
//! |---|-----------|------|
//! | [`RequiredText`] | `String` | 必須テキスト（氏名、メッセージ、日付） |
//! | [`EmailAddress`] | `String` | メールアドレス |
//! | [`PhoneNumber`] | `String` | 電話番号（10〜15 文字） |
//! | [`SpecialRequest`] | `String` | 予約時の要望（200 文字以内、任意） |
//! | [`Adults`] / [`Children`] / [`Room`] | enum | 予約フォームの選択肢 |

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::submission::FieldError;

/// 電話番号の最小文字数
pub const PHONE_MIN_LEN: usize = 10;
/// 電話番号の最大文字数
pub const PHONE_MAX_LEN: usize = 15;
/// 要望欄の最大文字数
pub const SPECIAL_REQUEST_MAX_LEN: usize = 200;
/// メールアドレスの最大文字数
const EMAIL_MAX_LEN: usize = 254;

/// `local@domain.tld` 形式。空白と 2 つ目の `@` を許さず、ドメインのラベルは空にできない
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s.]+(\.[^@\s.]+)+$").expect("メールアドレスの正規表現が不正です")
});

/// 先頭の `+` は任意、以降は数字のみ
static STRICT_PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?\d+$").expect("電話番号の正規表現が不正です"));

// =========================================================================
// RequiredText（必須テキスト）
// =========================================================================

/// 必須テキスト（値オブジェクト）
///
/// trim 後に空でないことを保証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RequiredText(String);

impl RequiredText {
    /// # エラー
    ///
    /// trim 後に空の場合は [`FieldError::Required`] を返す。
    pub fn new(value: &str) -> Result<Self, FieldError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FieldError::Required);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequiredText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// EmailAddress（メールアドレス）
// =========================================================================

/// メールアドレス（値オブジェクト）
///
/// # バリデーション
///
/// - trim 後に空でない（空なら [`FieldError::Required`]）
/// - `local@domain.tld` 形式で、最大 254 文字（違反は [`FieldError::InvalidEmail`]）
///
/// # 使用例
///
/// ```rust
/// use kerawi_domain::{submission::FieldError, value_objects::EmailAddress};
///
/// assert!(EmailAddress::new("ann@x.com").is_ok());
/// assert_eq!(EmailAddress::new("ann@x").unwrap_err(), FieldError::InvalidEmail);
/// assert_eq!(EmailAddress::new("  ").unwrap_err(), FieldError::Required);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EmailAddress(String);

impl EmailAddress {
    pub fn new(value: &str) -> Result<Self, FieldError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FieldError::Required);
        }

        if trimmed.len() > EMAIL_MAX_LEN || !EMAIL_PATTERN.is_match(trimmed) {
            return Err(FieldError::InvalidEmail);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// PhoneNumber（電話番号）
// =========================================================================

/// 電話番号（値オブジェクト）
///
/// 問い合わせフォームは文字数のみ、予約フォームは文字種も検証する。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// 文字数（10〜15）のみを検証する
    ///
    /// 空判定だけ前後の空白を除いて行い、文字数は入力値そのもので数える。
    ///
    /// # エラー
    ///
    /// - 空: [`FieldError::Required`]
    /// - 文字数が範囲外: [`FieldError::InvalidPhone`]
    pub fn new(value: &str) -> Result<Self, FieldError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(FieldError::Required);
        }

        let len = value.chars().count();
        if !(PHONE_MIN_LEN..=PHONE_MAX_LEN).contains(&len) {
            return Err(FieldError::InvalidPhone);
        }

        Ok(Self(trimmed.to_string()))
    }

    /// 文字数に加えて `^\+?\d+$` 形式を入力値そのもので検証する
    ///
    /// ```rust
    /// use kerawi_domain::value_objects::PhoneNumber;
    ///
    /// assert!(PhoneNumber::parse_strict("+14155550123").is_ok());
    /// assert!(PhoneNumber::parse_strict("12-345-6789").is_err());
    /// ```
    pub fn parse_strict(value: &str) -> Result<Self, FieldError> {
        let phone = Self::new(value)?;
        if !STRICT_PHONE_PATTERN.is_match(value) {
            return Err(FieldError::InvalidPhone);
        }
        Ok(phone)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// SpecialRequest（要望）
// =========================================================================

/// 予約時の要望（値オブジェクト）
///
/// 任意項目。空文字列を許容し、最大 200 文字（Unicode スカラー値で数える）。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SpecialRequest(String);

impl SpecialRequest {
    /// # エラー
    ///
    /// 入力値が 200 文字を超える場合は [`FieldError::TooLong`] を返す。
    /// 前後の空白も文字数に含め、保持する値からは取り除く。
    pub fn new(value: &str) -> Result<Self, FieldError> {
        if value.chars().count() > SPECIAL_REQUEST_MAX_LEN {
            return Err(FieldError::TooLong);
        }
        Ok(Self(value.trim().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for SpecialRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =========================================================================
// 予約フォームの選択肢
// =========================================================================

/// 選択肢をパースする共通処理
///
/// 空なら `required`、選択肢外なら `invalid choice` を返す。
fn parse_required_choice<T: std::str::FromStr>(value: &str) -> Result<T, FieldError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FieldError::Required);
    }
    trimmed.parse().map_err(|_| FieldError::InvalidChoice)
}

/// 大人の人数
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
pub enum Adults {
    #[strum(to_string = "1")]
    One,
    #[strum(to_string = "2")]
    Two,
    #[strum(to_string = "3")]
    Three,
}

impl Adults {
    /// 必須の選択肢としてパースする
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        parse_required_choice(value)
    }
}

/// 子供の人数
///
/// 必須指定のない選択肢。空も選択肢外として扱う。
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
pub enum Children {
    #[strum(to_string = "0")]
    Zero,
    #[strum(to_string = "1")]
    One,
    #[strum(to_string = "2")]
    Two,
}

impl Children {
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        value.trim().parse().map_err(|_| FieldError::InvalidChoice)
    }
}

/// 客室
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum::Display,
    strum::EnumString,
)]
pub enum Room {
    #[strum(to_string = "1")]
    Room1,
    #[strum(to_string = "2")]
    Room2,
    #[strum(to_string = "3")]
    Room3,
}

impl Room {
    pub fn parse(value: &str) -> Result<Self, FieldError> {
        parse_required_choice(value)
    }

    /// 画面・メールに表示するラベル（例: `Room 1`）
    pub fn label(&self) -> String {
        format!("Room {self}")
    }
}
