//! # ユーザー
//!
//! Flowable の identity API が返すユーザー情報。
//! 一度取得したら変更しない値オブジェクトとして扱う。

use serde::{Deserialize, Serialize};

use crate::serde_helpers::null_as_default;

/// Flowable ユーザー情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id:         String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_name:  String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email:      String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url:        String,
}

impl UserInfo {
    /// ID のみを持つユーザー情報を作成する
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id:         id.into(),
            first_name: String::new(),
            last_name:  String::new(),
            email:      String::new(),
            url:        String::new(),
        }
    }
}
