//! # FlowLink インフラ層
//!
//! Flowable REST API との通信を担当する。
//!
//! ## 責務
//!
//! - **接続設定**: ベース URL・認証情報の読み込み（[`config`]）
//! - **API クライアント**: リソース種別ごとのクライアントトレイトと reqwest 実装（[`flowable`]）
//! - **エラー変換**: HTTP ステータス・デコード失敗を [`FlowableError`] に変換（[`error`]）
//!
//! リトライ・バックオフ・接続プールの調整は行わない。
//! 1 つの論理操作は 1 回の HTTP 往復に対応する。
//!
//! ## 依存関係
//!
//! ```text
//! service → infra → domain
//!              ↘      ↓
//!                shared
//! ```
//!
//! ## 使用例
//!
//! ```rust,ignore
//! use flowlink_infra::{FlowableClientImpl, FlowableConfig, FlowableIdentityClient};
//!
//! let config = FlowableConfig::from_env()?;
//! let client = FlowableClientImpl::new(config)?;
//! let users = client.list_users().await?;
//! ```

pub mod config;
pub mod error;
pub mod flowable;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

pub use config::{ConfigError, FlowableConfig};
pub use error::FlowableError;
pub use flowable::{
    DIRECTORY_PAGE_SIZE,
    FlowableClient,
    FlowableClientImpl,
    FlowableContentClient,
    FlowableFormClient,
    FlowableIdentityClient,
    FlowableProcessClient,
    FlowableTaskClient,
};
