//! # Web サーバー設定
//!
//! 環境変数から Web サーバーの設定を読み込む。
//!
//! 起動時に 1 度だけ読み込み、以後は不変の値として各コンポーネントに明示的に渡す。

use std::{env, fmt, path::PathBuf};

use kerawi_domain::{notification::Mailbox, value_objects::EmailAddress};
use kerawi_infra::notification::{DEFAULT_BREVO_API_URL, RelayTls, SmtpCredentials};
use thiserror::Error;

const DEFAULT_HOTEL_NAME: &str = "Kerawi Hotel";
const DEFAULT_RELAY_PORT: u16 = 465;
const DEFAULT_SMTP_PORT: u16 = 587;

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// 必須の環境変数が未設定
    #[error("{0} が設定されていません")]
    Missing(&'static str),

    /// 環境変数の値が不正
    #[error("{var} の値が不正です: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Web サーバーの設定
#[derive(Clone)]
pub struct WebConfig {
    /// バインドアドレス
    pub host:       String,
    /// ポート番号
    pub port:       u16,
    /// 署名用シークレット
    pub secret_key: String,
    /// `/static` で配信するディレクトリ
    pub static_dir: PathBuf,
    /// 送信元・宛先などホテルの識別情報
    pub identity:   HotelIdentity,
    /// 送信方式と認証情報
    pub transport:  TransportConfig,
}

/// 通知メールに使うホテルの識別情報
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotelIdentity {
    /// ホテル名（確認メール本文と送信者表示名の既定値）
    pub hotel_name: String,
    /// 管理者宛てメールの宛先
    pub admin:      Mailbox,
    /// 送信元
    pub sender:     Mailbox,
}

/// 送信方式ごとの設定
///
/// `NOTIFICATION_BACKEND` で選択する。選択されていない方式の認証情報は保持しない。
#[derive(Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Brevo トランザクションメール API
    Brevo { api_url: String, api_key: String },
    /// 認証付き SMTP リレー
    Relay {
        host:        String,
        port:        u16,
        tls:         RelayTls,
        credentials: SmtpCredentials,
    },
    /// 直接 SMTP（STARTTLS + 認証）
    Smtp {
        host:        String,
        port:        u16,
        credentials: SmtpCredentials,
    },
    /// 送信しない（ログ出力のみ）
    Noop,
}

impl TransportConfig {
    /// ログ出力用の方式名
    pub fn name(&self) -> &'static str {
        match self {
            Self::Brevo { .. } => "brevo",
            Self::Relay { .. } => "relay",
            Self::Smtp { .. } => "smtp",
            Self::Noop => "noop",
        }
    }
}

impl fmt::Debug for TransportConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Brevo { api_url, .. } => f
                .debug_struct("Brevo")
                .field("api_url", api_url)
                .field("api_key", &"[REDACTED]")
                .finish(),
            Self::Relay {
                host,
                port,
                tls,
                credentials,
            } => f
                .debug_struct("Relay")
                .field("host", host)
                .field("port", port)
                .field("tls", tls)
                .field("credentials", credentials)
                .finish(),
            Self::Smtp {
                host,
                port,
                credentials,
            } => f
                .debug_struct("Smtp")
                .field("host", host)
                .field("port", port)
                .field("credentials", credentials)
                .finish(),
            Self::Noop => f.write_str("Noop"),
        }
    }
}

impl fmt::Debug for WebConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secret_key", &"[REDACTED]")
            .field("static_dir", &self.static_dir)
            .field("identity", &self.identity)
            .field("transport", &self.transport)
            .finish()
    }
}

/// 環境変数の参照
///
/// 前後の空白を除去し、空文字列は未設定として扱う。
/// 秘密情報（[`Lookup::secret`]）は空判定のみ行い、値は加工しない。
struct Lookup<F>(F);

impl<F> Lookup<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn optional(&self, var: &str) -> Option<String> {
        (self.0)(var)
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }

    fn required(&self, var: &'static str) -> Result<String, ConfigError> {
        self.optional(var).ok_or(ConfigError::Missing(var))
    }

    fn secret(&self, var: &'static str) -> Result<String, ConfigError> {
        (self.0)(var)
            .filter(|value| !value.trim().is_empty())
            .ok_or(ConfigError::Missing(var))
    }

    fn port(&self, var: &'static str, default: u16) -> Result<u16, ConfigError> {
        match self.optional(var) {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                var,
                reason: format!("有効なポート番号ではありません: {value}"),
            }),
            None => Ok(default),
        }
    }

    fn email(&self, var: &'static str) -> Result<String, ConfigError> {
        let value = self.required(var)?;
        EmailAddress::new(&value)
            .map(|email| email.as_str().to_string())
            .map_err(|e| ConfigError::Invalid {
                var,
                reason: e.to_string(),
            })
    }

    fn credentials(&self) -> Result<SmtpCredentials, ConfigError> {
        Ok(SmtpCredentials::new(
            self.required("SMTP_USERNAME")?,
            self.secret("SMTP_PASSWORD")?,
        ))
    }
}

impl WebConfig {
    /// 環境変数から設定を読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// 任意のキー参照関数から設定を読み込む
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let env = Lookup(lookup);

        let hotel_name = env
            .optional("HOTEL_NAME")
            .unwrap_or_else(|| DEFAULT_HOTEL_NAME.to_string());
        let sender_name = env
            .optional("SENDER_NAME")
            .unwrap_or_else(|| hotel_name.clone());

        let identity = HotelIdentity {
            admin: Mailbox::address(env.email("ADMIN_EMAIL")?),
            sender: Mailbox::new(env.email("SENDER_EMAIL")?, Some(sender_name)),
            hotel_name,
        };

        Ok(Self {
            host: env
                .optional("WEB_HOST")
                .unwrap_or_else(|| "0.0.0.0".to_string()),
            port: env.port("WEB_PORT", 5000)?,
            secret_key: env.secret("SECRET_KEY")?,
            static_dir: env
                .optional("STATIC_DIR")
                .map_or_else(|| PathBuf::from("static"), PathBuf::from),
            identity,
            transport: TransportConfig::from_lookup(&env)?,
        })
    }
}

impl TransportConfig {
    fn from_lookup<F>(env: &Lookup<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = env
            .optional("NOTIFICATION_BACKEND")
            .unwrap_or_else(|| "noop".to_string());

        match backend.as_str() {
            "brevo" => Ok(Self::Brevo {
                api_url: env
                    .optional("BREVO_API_URL")
                    .unwrap_or_else(|| DEFAULT_BREVO_API_URL.to_string()),
                api_key: env.secret("BREVO_API_KEY")?,
            }),
            "relay" => {
                let tls = match env.optional("SMTP_TLS") {
                    Some(value) => value.parse::<RelayTls>().map_err(|_| ConfigError::Invalid {
                        var:    "SMTP_TLS",
                        reason: format!("implicit / starttls / none のいずれか: {value}"),
                    })?,
                    None => RelayTls::Implicit,
                };
                Ok(Self::Relay {
                    host: env.required("SMTP_HOST")?,
                    port: env.port("SMTP_PORT", DEFAULT_RELAY_PORT)?,
                    tls,
                    credentials: env.credentials()?,
                })
            }
            "smtp" => Ok(Self::Smtp {
                host:        env.required("SMTP_HOST")?,
                port:        env.port("SMTP_PORT", DEFAULT_SMTP_PORT)?,
                credentials: env.credentials()?,
            }),
            "noop" => Ok(Self::Noop),
            other => Err(ConfigError::Invalid {
                var:    "NOTIFICATION_BACKEND",
                reason: format!("brevo / relay / smtp / noop のいずれか: {other}"),
            }),
        }
    }
}
