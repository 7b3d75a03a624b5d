//! 添付ファイル（content API）関連の Flowable クライアント

use async_trait::async_trait;
use flowlink_domain::{Attachment, AttachmentUpload};
use flowlink_shared::Paginated;
use reqwest::{
    Method,
    multipart::{Form, Part},
};

use super::{
    client_impl::FlowableClientImpl,
    paths,
    response::{handle_response, warn_if_inconsistent},
};
use crate::error::FlowableError;

/// 添付ファイル関連の Flowable クライアントトレイト
#[async_trait]
pub trait FlowableContentClient: Send + Sync {
    /// タスクにファイルを添付する
    ///
    /// Flowable の `POST content-api/content-service/content-items/` に
    /// multipart で送信する。テキストパート `taskId` / `name` / `mimeType` と、
    /// フィールド名を名前に持つファイルパートで構成する。
    async fn create_content_item(&self, upload: AttachmentUpload) -> Result<Attachment, FlowableError>;

    /// タスクの添付ファイル一覧を取得する
    ///
    /// Flowable の `GET content-api/content-service/content-items/?taskId=` を呼び出す。
    async fn list_content_items(&self, task_id: &str) -> Result<Paginated<Attachment>, FlowableError>;
}

/// アップロード内容から multipart フォームを組み立てる
fn upload_form(upload: AttachmentUpload) -> Result<Form, FlowableError> {
    upload.validate()?;

    let file = Part::bytes(upload.content.to_vec())
        .file_name(upload.file_name)
        .mime_str(&upload.mime_type)
        .map_err(|_| {
            FlowableError::InvalidInput(format!("MIME タイプが不正です: {}", upload.mime_type))
        })?;

    Ok(Form::new()
        .text("taskId", upload.task_id)
        .text("name", upload.field_name.clone())
        .text("mimeType", upload.mime_type)
        .part(upload.field_name, file))
}

#[async_trait]
impl FlowableContentClient for FlowableClientImpl {
    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(task_id = %upload.task_id, field = %upload.field_name, bytes = upload.content.len())
    )]
    async fn create_content_item(&self, upload: AttachmentUpload) -> Result<Attachment, FlowableError> {
        let form = upload_form(upload)?;

        let response = self
            .request(Method::POST, paths::CONTENT_ITEMS)
            .multipart(form)
            .send()
            .await?;
        handle_response(response, None).await
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%task_id))]
    async fn list_content_items(&self, task_id: &str) -> Result<Paginated<Attachment>, FlowableError> {
        let response = self
            .request(Method::GET, paths::CONTENT_ITEMS)
            .query(&[("taskId", task_id)])
            .send()
            .await?;
        let page = handle_response(response, None).await?;
        warn_if_inconsistent(&page, "content-items");
        Ok(page)
    }
}
