//! # Flowable REST API クライアント
//!
//! Flowable の REST API をリソース種別ごとのトレイトとして公開する。
//!
//! ## エンドポイント（アプリケーションルートからの相対パス）
//!
//! - `POST form-api/form/form-instance-model` - タスクフォーム取得
//! - `POST process-api/form/form-data/` - タスクフォーム送信
//! - `POST process-api/runtime/process-instances/` - プロセス開始
//! - `GET process-api/history/historic-process-instances/` - 履歴プロセス一覧
//! - `GET process-api/history/historic-process-instances/{id}` - 履歴プロセス取得
//! - `GET process-api/history/historic-task-instances/` - 履歴タスク一覧
//! - `POST process-api/runtime/tasks/{id}` - タスクアクション実行
//! - `GET|POST process-api/identity/users/` - ユーザー一覧・作成
//! - `GET|POST content-api/content-service/content-items/` - 添付ファイル一覧・作成

mod client_impl;
mod content_client;
mod form_client;
mod identity_client;
mod process_client;
mod response;
mod task_client;

pub use client_impl::{FlowableClient, FlowableClientImpl};
pub use content_client::FlowableContentClient;
pub use form_client::FlowableFormClient;
pub use identity_client::{DIRECTORY_PAGE_SIZE, FlowableIdentityClient};
pub use process_client::FlowableProcessClient;
pub use task_client::FlowableTaskClient;

/// アプリケーションルートからの相対パス
mod paths {
    pub(super) const FORM_INSTANCE_MODEL: &str = "form-api/form/form-instance-model";
    pub(super) const FORM_DATA: &str = "process-api/form/form-data/";
    pub(super) const PROCESS_INSTANCES: &str = "process-api/runtime/process-instances/";
    pub(super) const HISTORIC_PROCESS_INSTANCES: &str =
        "process-api/history/historic-process-instances/";
    pub(super) const HISTORIC_TASK_INSTANCES: &str = "process-api/history/historic-task-instances/";
    pub(super) const RUNTIME_TASKS: &str = "process-api/runtime/tasks/";
    pub(super) const IDENTITY_USERS: &str = "process-api/identity/users/";
    pub(super) const CONTENT_ITEMS: &str = "content-api/content-service/content-items/";

    /// コレクションのパスに ID を連結する（ID はパーセントエンコードする）
    pub(super) fn item(collection: &str, id: &str) -> String {
        format!("{}{}", collection, urlencoding::encode(id))
    }
}
