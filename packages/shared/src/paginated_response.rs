//! # ページネーション付きレスポンス
//!
//! Flowable REST API のオフセットベースのページネーション形式。

use serde::{Deserialize, Serialize};

/// ページネーション付きレスポンス
///
/// Flowable の一覧系エンドポイントはすべてこの形式で返す。
///
/// ## JSON 形式
///
/// ```json
/// {
///   "data": [...],
///   "total": 42,
///   "start": 0,
///   "sort": "startTime",
///   "order": "asc",
///   "size": 10
/// }
/// ```
///
/// `size` はリクエストしたページサイズではなく、このページに含まれる件数を表す。
/// `sort` / `order` はエンドポイントによっては返らない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
   pub data:  Vec<T>,
   #[serde(default)]
   pub total: i64,
   #[serde(default)]
   pub start: i64,
   #[serde(default)]
   pub sort:  Option<String>,
   #[serde(default)]
   pub order: Option<String>,
   #[serde(default)]
   pub size:  i64,
}

impl<T> Paginated<T> {
   /// 単一ページで全件を表すレスポンスを作成する
   ///
   /// ```
   /// use flowlink_shared::Paginated;
   ///
   /// let page = Paginated::single_page(vec!["a", "b"]);
   /// assert_eq!(page.total, 2);
   /// assert!(page.is_consistent());
   /// ```
   pub fn single_page(data: Vec<T>) -> Self {
      let len = data.len() as i64;
      Self {
         data,
         total: len,
         start: 0,
         sort: None,
         order: None,
         size: len,
      }
   }

   /// オフセット・件数・総件数の整合性を検査する
   ///
   /// `start + data.len() <= total` を満たすとき `true`。
   /// 加算があふれる値は不整合として扱う。
   pub fn is_consistent(&self) -> bool {
      let Ok(len) = i64::try_from(self.data.len()) else {
         return false;
      };
      self.start >= 0
         && self
            .start
            .checked_add(len)
            .is_some_and(|end| end <= self.total)
   }
}
