//! # フォーム送信
//!
//! 問い合わせ・予約・ニュースレター購読の 3 種類のフォーム送信と、その検証を定義する。
//!
//! ## ドメイン用語
//!
//! | 型 | ドメイン用語 | 説明 |
//! |---|------------|------|
//! | [`ContactForm`] / [`BookingForm`] / [`NewsletterForm`] | 未検証の送信内容 | HTTP フォームから受け取った文字列そのまま |
//! | [`Submission`] | 検証済みの送信内容 | 通知メールの生成に使用。1 リクエスト限り |
//! | [`ValidationErrors`] | 項目別エラー | 項目名 → 失敗理由。1 つでもあれば送信は行わない |
//!
//! ## 設計方針
//!
//! - **副作用なし**: 検証は同期処理で、メール送信やストレージに触れない
//! - **全項目を検証**: 最初のエラーで止めず、全項目のエラーを収集してフォームに表示する
//! - **項目ごとに 1 件**: 同じ項目で複数ルールに違反しても最初の 1 件のみ（必須チェックが優先）

use serde::{Deserialize, Serialize};
use strum::IntoStaticStr;
use thiserror::Error;

use crate::value_objects::{
    Adults,
    Children,
    EmailAddress,
    PhoneNumber,
    RequiredText,
    Room,
    SpecialRequest,
};

/// 項目単位の検証エラー
///
/// `Display` の文字列はフォーム上にそのまま表示される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    /// 必須項目が未入力
    #[error("required")]
    Required,

    /// メールアドレスの形式が不正
    #[error("invalid email")]
    InvalidEmail,

    /// 電話番号の文字数・形式が不正
    #[error("invalid phone")]
    InvalidPhone,

    /// 文字数の上限超過
    #[error("too long")]
    TooLong,

    /// 選択肢にない値
    #[error("invalid choice")]
    InvalidChoice,
}

/// 検証エラーの集合
///
/// フォームの項目順を保持する。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<(&'static str, FieldError)>,
}

impl ValidationErrors {
    /// 検証結果を記録し、成功時の値を返す
    fn check<T>(&mut self, field: &'static str, result: Result<T, FieldError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.errors.push((field, e));
                None
            }
        }
    }

    /// 指定項目のエラーを返す
    pub fn get(&self, field: &str) -> Option<FieldError> {
        self.errors
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, e)| *e)
    }

    /// エラーのある項目名を項目順に返す
    pub fn fields(&self) -> Vec<&'static str> {
        self.errors.iter().map(|(name, _)| *name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FieldError)> + '_ {
        self.errors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, (field, error)) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{field}: {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// フォーム種別
///
/// ログの `event.form_kind` フィールドに出力される。
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum FormKind {
    Contact,
    Booking,
    Newsletter,
}

// =========================================================================
// 問い合わせ
// =========================================================================

/// 問い合わせフォーム（未検証）
///
/// 未送信の項目は空文字列として扱う。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name:    String,
    pub email:   String,
    pub phone:   String,
    pub message: String,
}

/// 検証済みの問い合わせ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name:    RequiredText,
    pub email:   EmailAddress,
    pub phone:   PhoneNumber,
    pub message: RequiredText,
}

impl ContactForm {
    /// 全項目を検証する
    ///
    /// # エラー
    ///
    /// 1 項目でも不正な場合は、不正な全項目を含む [`ValidationErrors`] を返す。
    pub fn validate(&self) -> Result<ContactSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = errors.check("name", RequiredText::new(&self.name));
        let email = errors.check("email", EmailAddress::new(&self.email));
        let phone = errors.check("phone", PhoneNumber::new(&self.phone));
        let message = errors.check("message", RequiredText::new(&self.message));

        match (name, email, phone, message) {
            (Some(name), Some(email), Some(phone), Some(message)) => Ok(ContactSubmission {
                name,
                email,
                phone,
                message,
            }),
            _ => Err(errors),
        }
    }
}

// =========================================================================
// 予約
// =========================================================================

/// 予約フォーム（未検証）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub name:            String,
    pub email:           String,
    pub phone:           String,
    pub checkin:         String,
    pub checkout:        String,
    pub adults:          String,
    pub children:        String,
    pub room:            String,
    pub special_request: String,
}

/// 検証済みの予約リクエスト
///
/// チェックイン・チェックアウト日は入力された文字列のまま保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingSubmission {
    pub name:            RequiredText,
    pub email:           EmailAddress,
    pub phone:           PhoneNumber,
    pub checkin:         RequiredText,
    pub checkout:        RequiredText,
    pub adults:          Adults,
    pub children:        Children,
    pub room:            Room,
    pub special_request: SpecialRequest,
}

impl BookingForm {
    /// 全項目を検証する
    ///
    /// 電話番号は `^\+?\d+$` 形式も検証する。
    pub fn validate(&self) -> Result<BookingSubmission, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let name = errors.check("name", RequiredText::new(&self.name));
        let email = errors.check("email", EmailAddress::new(&self.email));
        let phone = errors.check("phone", PhoneNumber::parse_strict(&self.phone));
        let checkin = errors.check("checkin", RequiredText::new(&self.checkin));
        let checkout = errors.check("checkout", RequiredText::new(&self.checkout));
        let adults = errors.check("adults", Adults::parse(&self.adults));
        let children = errors.check("children", Children::parse(&self.children));
        let room = errors.check("room", Room::parse(&self.room));
        let special_request = errors.check(
            "special_request",
            SpecialRequest::new(&self.special_request),
        );

        match (
            name,
            email,
            phone,
            checkin,
            checkout,
            adults,
            children,
            room,
            special_request,
        ) {
            (
                Some(name),
                Some(email),
                Some(phone),
                Some(checkin),
                Some(checkout),
                Some(adults),
                Some(children),
                Some(room),
                Some(special_request),
            ) => Ok(BookingSubmission {
                name,
                email,
                phone,
                checkin,
                checkout,
                adults,
                children,
                room,
                special_request,
            }),
            _ => Err(errors),
        }
    }
}

// =========================================================================
// ニュースレター
// =========================================================================

/// ニュースレター購読フォーム（未検証）
///
/// 項目自体が送信されなかった場合（`None`）と、空で送信された場合を区別する。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsletterForm {
    #[serde(default)]
    pub newsletter_email: Option<String>,
}

/// 検証済みのニュースレター購読
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsletterSubmission {
    pub email: EmailAddress,
}

impl NewsletterForm {
    /// 購読メールアドレスを検証する
    ///
    /// 項目が送信されていない場合は `None` を返す（呼び出し側は何もせず元のページに戻す）。
    pub fn validate(&self) -> Option<Result<NewsletterSubmission, ValidationErrors>> {
        let raw = self.newsletter_email.as_deref()?;

        let mut errors = ValidationErrors::default();
        let email = errors.check("newsletter_email", EmailAddress::new(raw));

        Some(match email {
            Some(email) => Ok(NewsletterSubmission { email }),
            None => Err(errors),
        })
    }
}

// =========================================================================
// Submission
// =========================================================================

/// 検証済みのフォーム送信
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Contact(ContactSubmission),
    Booking(BookingSubmission),
    Newsletter(NewsletterSubmission),
}

impl Submission {
    /// フォーム種別を返す
    pub fn kind(&self) -> FormKind {
        match self {
            Self::Contact(_) => FormKind::Contact,
            Self::Booking(_) => FormKind::Booking,
            Self::Newsletter(_) => FormKind::Newsletter,
        }
    }

    /// 送信者のメールアドレス（確認メールの宛先）を返す
    pub fn submitter_email(&self) -> &EmailAddress {
        match self {
            Self::Contact(c) => &c.email,
            Self::Booking(b) => &b.email,
            Self::Newsletter(n) => &n.email,
        }
    }

    /// 送信者の氏名を返す（ニュースレターは氏名を持たない）
    pub fn submitter_name(&self) -> Option<&str> {
        match self {
            Self::Contact(c) => Some(c.name.as_str()),
            Self::Booking(b) => Some(b.name.as_str()),
            Self::Newsletter(_) => None,
        }
    }
}

impl From<ContactSubmission> for Submission {
    fn from(value: ContactSubmission) -> Self {
        Self::Contact(value)
    }
}

impl From<BookingSubmission> for Submission {
    fn from(value: BookingSubmission) -> Self {
        Self::Booking(value)
    }
}

impl From<NewsletterSubmission> for Submission {
    fn from(value: NewsletterSubmission) -> Self {
        Self::Newsletter(value)
    }
}
