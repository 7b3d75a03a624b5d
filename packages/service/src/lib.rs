//! # FlowLink サービス層
//!
//! Flowable クライアントの上に、利用者向けのワークフロー操作を提供する。
//!
//! ## 責務
//!
//! - **状態フィルタの変換**: open / completed などを Flowable の `finished` パラメータに変換
//! - **ユーザー補完**: タスクの担当者・プロセスの開始ユーザーをユーザーディレクトリで解決（[`enrichment`]）
//! - **ディレクトリキャッシュ**: 有効期限付きのユーザーディレクトリ保持（[`directory`]、既定では無効）
//!
//! 補完はベストエフォートで、ディレクトリ取得に失敗しても本来のレコードは返す。

pub mod directory;
pub mod enrichment;
pub mod service;

pub use directory::DirectoryCache;
pub use enrichment::{UserDirectory, attach_assignees, attach_starters};
pub use service::{WorkflowService, WorkflowServiceImpl};
