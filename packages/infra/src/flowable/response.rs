//! Flowable レスポンスの共通ハンドリング

use flowlink_shared::Paginated;
use serde::de::DeserializeOwned;

use crate::error::FlowableError;

/// Flowable レスポンスの共通ハンドリング
///
/// 成功時はレスポンスボディを `T` にデシリアライズし、
/// エラー時はステータスコードに応じた `FlowableError` を返す。
///
/// # 引数
///
/// - `response`: Flowable からの HTTP レスポンス
/// - `not_found_error`: 404 レスポンス時に返すエラー。`None` の場合は
///   `Unexpected` にフォールスルー
pub(super) async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
    not_found_error: Option<FlowableError>,
) -> Result<T, FlowableError> {
    let status = response.status();

    if status.is_success() {
        let body = response.bytes().await?;
        return serde_json::from_slice(&body).map_err(|e| FlowableError::Decode(e.to_string()));
    }

    Err(error_from_response(response, not_found_error).await)
}

/// ボディを使わない操作のレスポンスハンドリング
///
/// 成功時のボディは読み捨てる。エラー時の変換は [`handle_response`] と同じ。
pub(super) async fn handle_empty_response(
    response: reqwest::Response,
    not_found_error: Option<FlowableError>,
) -> Result<(), FlowableError> {
    if response.status().is_success() {
        return Ok(());
    }

    Err(error_from_response(response, not_found_error).await)
}

async fn error_from_response(
    response: reqwest::Response,
    not_found_error: Option<FlowableError>,
) -> FlowableError {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND
        && let Some(err) = not_found_error
    {
        return err;
    }

    let body = response.text().await.unwrap_or_default();

    match status {
        reqwest::StatusCode::BAD_REQUEST => FlowableError::Validation(body),
        reqwest::StatusCode::UNAUTHORIZED => FlowableError::Unauthorized,
        reqwest::StatusCode::FORBIDDEN => FlowableError::Forbidden(body),
        reqwest::StatusCode::CONFLICT => FlowableError::Conflict(body),
        _ => FlowableError::Unexpected(format!("予期しないステータス {}: {}", status, body)),
    }
}

/// ページのオフセット・件数・総件数が矛盾していれば警告を出す
///
/// Flowable 側の不整合で呼び出し元を失敗させないよう、エラーにはしない。
pub(super) fn warn_if_inconsistent<T>(page: &Paginated<T>, resource: &str) {
    if !page.is_consistent() {
        tracing::warn!(
            resource,
            start = page.start,
            len = page.data.len(),
            total = page.total,
            "ページネーション情報が矛盾しています"
        );
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    /// テスト用のレスポンスデータ型
    #[derive(Debug, Deserialize, PartialEq)]
    struct TestData {
        value: String,
    }

    /// テスト用の HTTP レスポンスを構築する
    fn make_response(status: u16, body: &str) -> reqwest::Response {
        let http_resp = http::Response::builder()
            .status(status)
            .header("content-type", "application/json")
            .body(body.to_string())
            .unwrap();
        reqwest::Response::from(http_resp)
    }

    #[tokio::test]
    async fn test_成功レスポンスをデシリアライズする() {
        let response = make_response(200, r#"{"value": "hello"}"#);

        let result: Result<TestData, _> = handle_response(response, None).await;

        assert_eq!(
            result.unwrap(),
            TestData {
                value: "hello".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_201もデシリアライズする() {
        let response = make_response(201, r#"{"value": "created"}"#);

        let result: Result<TestData, _> = handle_response(response, None).await;

        assert_eq!(result.unwrap().value, "created");
    }

    #[tokio::test]
    async fn test_404でnot_found_errorありのとき指定エラーを返す() {
        let response = make_response(404, "");

        let result: Result<TestData, _> = handle_response(
            response,
            Some(FlowableError::NotFound("プロセスインスタンス".to_string())),
        )
        .await;

        assert!(matches!(result, Err(FlowableError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_404でnot_found_errorなしのときunexpectedを返す() {
        let response = make_response(404, "not found");

        let result: Result<TestData, _> = handle_response(response, None).await;

        match result {
            Err(FlowableError::Unexpected(msg)) => {
                assert!(
                    msg.contains("404"),
                    "メッセージにステータスコードが含まれること: {msg}"
                );
            }
            other => panic!("Unexpected を期待したが {other:?} を受け取った"),
        }
    }

    #[tokio::test]
    async fn test_400でvalidation_errorを返す() {
        let response = make_response(400, r#"{"message":"Bad request","exception":"form is invalid"}"#);

        let result: Result<TestData, _> = handle_response(response, None).await;

        assert!(matches!(
            result,
            Err(FlowableError::Validation(body)) if body.contains("form is invalid")
        ));
    }

    #[tokio::test]
    async fn test_401でunauthorizedを返す() {
        let response = make_response(401, "");

        let result: Result<TestData, _> = handle_response(response, None).await;

        assert!(matches!(result, Err(FlowableError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_403でforbiddenを返す() {
        let response = make_response(403, "access denied");

        let result: Result<TestData, _> = handle_response(response, None).await;

        assert!(matches!(
            result,
            Err(FlowableError::Forbidden(body)) if body == "access denied"
        ));
    }

    #[tokio::test]
    async fn test_409でconflictを返す() {
        let response = make_response(409, "user already exists");

        let result: Result<TestData, _> = handle_response(response, None).await;

        assert!(matches!(
            result,
            Err(FlowableError::Conflict(body)) if body == "user already exists"
        ));
    }

    #[tokio::test]
    async fn test_500でunexpectedを返す() {
        let response = make_response(500, "server error");

        let result: Result<TestData, _> = handle_response(response, None).await;

        match result {
            Err(FlowableError::Unexpected(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("server error"));
            }
            other => panic!("Unexpected を期待したが {other:?} を受け取った"),
        }
    }

    #[tokio::test]
    async fn test_成功だが不正なjsonでdecodeエラーを返す() {
        let response = make_response(200, "not json");

        let result: Result<TestData, _> = handle_response(response, None).await;

        assert!(matches!(result, Err(FlowableError::Decode(_))));
    }

    #[tokio::test]
    async fn test_成功だが形が違うjsonでdecodeエラーを返す() {
        let response = make_response(200, r#"{"other": 1}"#);

        let result: Result<TestData, _> = handle_response(response, None).await;

        assert!(matches!(result, Err(FlowableError::Decode(_))));
    }

    #[tokio::test]
    async fn test_empty_responseは成功時のボディを無視する() {
        let response = make_response(200, "not json at all");

        let result = handle_empty_response(response, None).await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_empty_responseでもエラーステータスを変換する() {
        let response = make_response(400, "missing property");

        let result = handle_empty_response(response, None).await;

        assert!(matches!(
            result,
            Err(FlowableError::Validation(body)) if body == "missing property"
        ));
    }

    #[tokio::test]
    async fn test_オフセットが極端に大きいページでも警告だけで返す() {
        let response = make_response(
            200,
            r#"{"data":[1],"total":1,"start":9223372036854775807,"size":1}"#,
        );

        let page: Paginated<u32> = handle_response(response, None).await.unwrap();
        warn_if_inconsistent(&page, "historic-task-instances");

        assert_eq!(page.start, i64::MAX);
        assert!(!page.is_consistent());
    }
}
