//! # Flowable 接続設定
//!
//! 環境変数から Flowable REST API への接続設定を読み込む。
//!
//! | 変数名 | 必須 | 説明 |
//! |--------|------|------|
//! | `FLOWABLE_URL` | **Yes** | Flowable のベース URL（例: `http://localhost:8080`） |
//! | `FLOWABLE_APP_ROOT` | No | アプリケーションルート（デフォルト: `flowable-task`） |
//! | `FLOWABLE_ACCOUNT` | **Yes** | REST API のアカウント |
//! | `FLOWABLE_PASSWORD` | **Yes** | REST API のパスワード |
//! | `FLOWABLE_TIMEOUT_SECS` | No | リクエストタイムアウト秒数（未設定時はタイムアウトなし） |

use std::{env, fmt, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use thiserror::Error;

/// アプリケーションルートのデフォルト値
pub const DEFAULT_APP_ROOT: &str = "flowable-task";

/// 設定読み込みエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
   /// 必須の環境変数が未設定
   #[error("{0} が設定されていません")]
   Missing(&'static str),

   /// 環境変数の値が不正
   #[error("{name} の値が不正です: {value:?}")]
   Invalid { name: &'static str, value: String },
}

/// Flowable 接続設定
///
/// サービスの生成時に明示的に渡す。プロセス全体で共有するグローバル設定は持たない。
#[derive(Clone, PartialEq, Eq)]
pub struct FlowableConfig {
   /// ベース URL（末尾の `/` は除去済み）
   pub base_url:        String,
   /// アプリケーションルート（前後の `/` は除去済み）
   pub app_root:        String,
   /// REST API のアカウント
   pub account:         String,
   /// REST API のパスワード
   pub password:        String,
   /// リクエストタイムアウト
   pub request_timeout: Option<Duration>,
}

impl FlowableConfig {
   /// 新しい設定を作成する
   ///
   /// アプリケーションルートは [`DEFAULT_APP_ROOT`] になる。
   pub fn new(
      base_url: &str,
      account: impl Into<String>,
      password: impl Into<String>,
   ) -> Self {
      Self {
         base_url:        base_url.trim_end_matches('/').to_string(),
         app_root:        DEFAULT_APP_ROOT.to_string(),
         account:         account.into(),
         password:        password.into(),
         request_timeout: None,
      }
   }

   /// アプリケーションルートを差し替える
   pub fn with_app_root(mut self, app_root: &str) -> Self {
      self.app_root = app_root.trim_matches('/').to_string();
      self
   }

   /// リクエストタイムアウトを設定する
   pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
      self.request_timeout = Some(timeout);
      self
   }

   /// 環境変数から設定を読み込む
   pub fn from_env() -> Result<Self, ConfigError> {
      Self::from_lookup(|key| env::var(key).ok())
   }

   /// キーから値を引く関数を使って設定を読み込む
   ///
   /// テストではプロセスの環境変数を書き換えずにこちらを使う。
   pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
   where
      F: Fn(&str) -> Option<String>,
   {
      let required = |name: &'static str| {
         lookup(name)
            .filter(|v| !v.is_empty())
            .ok_or(ConfigError::Missing(name))
      };

      let mut config = Self::new(
         &required("FLOWABLE_URL")?,
         required("FLOWABLE_ACCOUNT")?,
         required("FLOWABLE_PASSWORD")?,
      );

      if let Some(app_root) = lookup("FLOWABLE_APP_ROOT") {
         config = config.with_app_root(&app_root);
      }

      if let Some(secs) = lookup("FLOWABLE_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
         let parsed = secs.parse::<u64>().map_err(|_| ConfigError::Invalid {
            name:  "FLOWABLE_TIMEOUT_SECS",
            value: secs.clone(),
         })?;
         config = config.with_request_timeout(Duration::from_secs(parsed));
      }

      Ok(config)
   }

   /// `Authorization` ヘッダーの値（`Basic base64(account:password)`）
   pub fn basic_auth_header(&self) -> String {
      let credentials = format!("{}:{}", self.account, self.password);
      format!("Basic {}", STANDARD.encode(credentials))
   }

   /// アプリケーションルートからの相対パスを完全な URL にする
   pub fn endpoint(&self, path: &str) -> String {
      let path = path.trim_start_matches('/');
      if self.app_root.is_empty() {
         format!("{}/{}", self.base_url, path)
      } else {
         format!("{}/{}/{}", self.base_url, self.app_root, path)
      }
   }
}

impl fmt::Debug for FlowableConfig {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("FlowableConfig")
         .field("base_url", &self.base_url)
         .field("app_root", &self.app_root)
         .field("account", &self.account)
         .field("password", &"***")
         .field("request_timeout", &self.request_timeout)
         .finish()
   }
}
