//! # Flowable クライアントのエラー型
//!
//! ## 分類
//!
//! - 通信失敗: [`FlowableError::Network`]（リトライしない）
//! - レスポンス形状の不一致: [`FlowableError::Decode`] / [`FlowableError::MissingField`]
//! - Flowable 側の検証エラー: [`FlowableError::Validation`] などにレスポンスボディをそのまま載せる
//! - 送信前の入力検証: [`FlowableError::InvalidInput`]

use flowlink_domain::DomainError;
use thiserror::Error;

/// Flowable クライアントエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlowableError {
   /// リクエスト送信前に検出した入力不正
   #[error("入力値が不正です: {0}")]
   InvalidInput(String),

   /// ネットワークエラー
   #[error("ネットワークエラー: {0}")]
   Network(String),

   /// レスポンスのデコード失敗
   #[error("レスポンスのデコードに失敗しました: {0}")]
   Decode(String),

   /// レスポンスに必須フィールドが無い
   #[error("レスポンスに必須フィールド `{0}` がありません")]
   MissingField(&'static str),

   /// バリデーションエラー（400）
   #[error("バリデーションエラー: {0}")]
   Validation(String),

   /// 認証失敗（401）
   #[error("認証に失敗しました")]
   Unauthorized,

   /// 権限不足（403）
   #[error("権限がありません: {0}")]
   Forbidden(String),

   /// リソースが見つからない（404）
   #[error("{0}が見つかりません")]
   NotFound(String),

   /// 競合（409）
   #[error("競合が発生しました: {0}")]
   Conflict(String),

   /// 予期しないエラー
   #[error("予期しないエラー: {0}")]
   Unexpected(String),
}

impl From<reqwest::Error> for FlowableError {
   fn from(err: reqwest::Error) -> Self {
      if err.is_decode() {
         FlowableError::Decode(err.to_string())
      } else {
         FlowableError::Network(err.to_string())
      }
   }
}

impl From<DomainError> for FlowableError {
   fn from(err: DomainError) -> Self {
      match err {
         DomainError::Validation(msg) => FlowableError::InvalidInput(msg),
      }
   }
}
