//! # FlowLink ドメイン層
//!
//! Flowable REST API とやり取りするレコード型・リクエスト型を定義する。
//!
//! ## 設計方針
//!
//! - **受動的なレコード**: ここにある型は振る舞いをほとんど持たない
//!   （判定系のヘルパーのみ）
//! - **Flowable のワイヤ形式に準拠**: JSON は camelCase、null を許容するフィールドは
//!   `Option` で表現する
//! - **解決済み参照は非正規データ**: [`Task::assignee_user`] /
//!   [`Process::started_by`] は補完処理が埋めるまで常に `None`
//!
//! ## 依存関係の方向
//!
//! ```text
//! cli → service → infra → domain
//! ```
//!
//! ## モジュール構成
//!
//! - [`task`] - タスク（履歴タスクインスタンス）
//! - [`process`] - プロセスインスタンス
//! - [`user`] - Flowable ユーザー
//! - [`attachment`] - タスク添付ファイル（コンテンツアイテム）
//! - [`form`] - 送信用フォーム型
//! - [`query`] - 一覧取得クエリと状態フィルタ
//! - [`clock`] - 時刻プロバイダ
//! - [`error`] - ドメインエラー

pub mod attachment;
pub mod clock;
pub mod error;
pub mod form;
pub mod process;
pub mod query;
pub mod task;
pub mod user;

mod serde_helpers;

pub use attachment::Attachment;
pub use error::DomainError;
pub use form::{
    AttachmentUpload,
    FormVariable,
    NewUserForm,
    StartProcessForm,
    SubmitTaskForm,
    TaskActionForm,
    TaskFormQuery,
};
pub use process::Process;
pub use query::{ProcessListQuery, ProcessState, TaskListQuery, TaskState};
pub use task::Task;
pub use user::UserInfo;
