//! ユーザー（identity）関連の Flowable クライアント

use async_trait::async_trait;
use flowlink_domain::{NewUserForm, UserInfo};
use flowlink_shared::Paginated;
use reqwest::Method;

use super::{client_impl::FlowableClientImpl, paths, response::handle_response};
use crate::error::FlowableError;

/// ユーザー一覧を 1 回の往復で取得する際のページサイズ
pub const DIRECTORY_PAGE_SIZE: i64 = 1000;

/// ユーザー関連の Flowable クライアントトレイト
#[async_trait]
pub trait FlowableIdentityClient: Send + Sync {
    /// ユーザーを作成する
    ///
    /// Flowable の `POST process-api/identity/users/` を呼び出す。
    /// 同じ ID のユーザーが既に存在する場合は `Conflict` を返す。
    async fn create_user(&self, form: &NewUserForm) -> Result<UserInfo, FlowableError>;

    /// ユーザーディレクトリ全体を取得する
    ///
    /// Flowable の `GET process-api/identity/users/` を `size =`
    /// [`DIRECTORY_PAGE_SIZE`] で 1 回だけ呼び出す。
    /// 総件数が返却件数を超える場合は警告を出し、返却分のみを使う。
    async fn list_users(&self) -> Result<Vec<UserInfo>, FlowableError>;
}

#[async_trait]
impl FlowableIdentityClient for FlowableClientImpl {
    #[tracing::instrument(skip_all, level = "debug", fields(user_id = %form.id))]
    async fn create_user(&self, form: &NewUserForm) -> Result<UserInfo, FlowableError> {
        let response = self
            .request(Method::POST, paths::IDENTITY_USERS)
            .json(form)
            .send()
            .await?;
        handle_response(response, None).await
    }

    #[tracing::instrument(skip_all, level = "debug")]
    async fn list_users(&self) -> Result<Vec<UserInfo>, FlowableError> {
        let response = self
            .request(Method::GET, paths::IDENTITY_USERS)
            .query(&[("start", 0), ("size", DIRECTORY_PAGE_SIZE)])
            .send()
            .await?;
        let page: Paginated<UserInfo> = handle_response(response, None).await?;

        if page.total > page.data.len() as i64 {
            tracing::warn!(
                total = page.total,
                returned = page.data.len(),
                "ユーザー総数が 1 回の取得件数を超えています。超過分は補完されません"
            );
        }

        Ok(page.data)
    }
}
