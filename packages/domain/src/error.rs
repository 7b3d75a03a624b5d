//! # ドメイン層エラー定義

use thiserror::Error;

/// ドメイン層で発生するエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// 入力値の検証に失敗した
    ///
    /// リクエストを送る前に検出できる不正（必須項目が空など）。
    #[error("バリデーションエラー: {0}")]
    Validation(String),
}
