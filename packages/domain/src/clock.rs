//! # Clock（時刻プロバイダ）
//!
//! ユーザーディレクトリキャッシュの有効期限判定で使う時刻の抽象化。
//! テストでは [`ManualClock`] で時刻を進めて期限切れを再現する。

use std::sync::Mutex;

use chrono::{DateTime, TimeDelta, Utc};

/// 現在時刻を提供するトレイト
pub trait Clock: Send + Sync {
   fn now(&self) -> DateTime<Utc>;
}

/// 実際のシステム時刻を返す実装
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
   fn now(&self) -> DateTime<Utc> {
      Utc::now()
   }
}

/// 手動で進めるテスト用実装
#[derive(Debug)]
pub struct ManualClock {
   now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
   pub fn new(now: DateTime<Utc>) -> Self {
      Self {
         now: Mutex::new(now),
      }
   }

   /// 時刻を `delta` だけ進める
   pub fn advance(&self, delta: TimeDelta) {
      let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
      *now += delta;
   }
}

impl Clock for ManualClock {
   fn now(&self) -> DateTime<Utc> {
      *self.now.lock().unwrap_or_else(|e| e.into_inner())
   }
}
