//! # 添付ファイル
//!
//! タスクに紐づくコンテンツアイテム（Flowable content API）。

use serde::{Deserialize, Serialize};

use crate::serde_helpers::null_as_default;

/// 添付ファイル（コンテンツアイテム）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub process_instance_id: Option<String>,
    #[serde(default)]
    pub content_store_id: Option<String>,
    #[serde(default)]
    pub content_store_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_available: bool,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub last_modified: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_by: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}
