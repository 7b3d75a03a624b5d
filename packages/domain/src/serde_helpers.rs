//! Flowable レスポンスのデシリアライズ補助

use serde::{Deserialize, Deserializer};

/// `null` を型のデフォルト値として扱う
///
/// Flowable は未設定のフィールドを省略せず `null` で返すことがあるため、
/// `#[serde(default)]` だけでは足りない。
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
