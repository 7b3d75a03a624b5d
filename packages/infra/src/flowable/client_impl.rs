//! FlowableClient スーパートレイトとクライアント実装の構造体

use reqwest::{Method, RequestBuilder, header};

use super::{
   content_client::FlowableContentClient,
   form_client::FlowableFormClient,
   identity_client::FlowableIdentityClient,
   process_client::FlowableProcessClient,
   task_client::FlowableTaskClient,
};
use crate::{config::FlowableConfig, error::FlowableError};

/// Flowable クライアントトレイト（スーパートレイト）
///
/// Form / Process / Task / Identity / Content の各サブトレイトを束ねる。
/// テスト時にはサブトレイトを実装したスタブに差し替えられる。
pub trait FlowableClient:
   FlowableFormClient
   + FlowableProcessClient
   + FlowableTaskClient
   + FlowableIdentityClient
   + FlowableContentClient
{
}

/// ブランケット impl: 5 つのサブトレイトをすべて実装する型は
/// 自動的に `FlowableClient` を実装する。
impl<T> FlowableClient for T where
   T: FlowableFormClient
      + FlowableProcessClient
      + FlowableTaskClient
      + FlowableIdentityClient
      + FlowableContentClient
{
}

/// Flowable クライアント実装
///
/// `reqwest::Client` は内部で Arc を持つため、clone しても接続は共有される。
/// 呼び出しをまたいだ状態は持たない。
#[derive(Clone)]
pub struct FlowableClientImpl {
   pub(super) config: FlowableConfig,
   pub(super) client: reqwest::Client,
   auth_header:       String,
}

impl FlowableClientImpl {
   /// 新しい FlowableClient を作成する
   ///
   /// 設定にタイムアウトがあれば HTTP クライアントに適用する。
   pub fn new(config: FlowableConfig) -> Result<Self, FlowableError> {
      let mut builder = reqwest::Client::builder();
      if let Some(timeout) = config.request_timeout {
         builder = builder.timeout(timeout);
      }
      let client = builder.build()?;

      Ok(Self::with_http_client(config, client))
   }

   /// 構築済みの `reqwest::Client` を使って作成する
   pub fn with_http_client(config: FlowableConfig, client: reqwest::Client) -> Self {
      let auth_header = config.basic_auth_header();
      Self {
         config,
         client,
         auth_header,
      }
   }

   pub fn config(&self) -> &FlowableConfig {
      &self.config
   }

   /// 認証ヘッダーと `Accept` を付与したリクエストビルダーを作る
   pub(super) fn request(&self, method: Method, path: &str) -> RequestBuilder {
      self.client
         .request(method, self.config.endpoint(path))
         .header(header::ACCEPT, "application/json")
         .header(header::AUTHORIZATION, self.auth_header.as_str())
   }
}
