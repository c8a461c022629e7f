//! `Never` (発散) 型。
//!
//! `all_settled` のように失敗し得ない計算の `E` として使う。

use serde::{Deserialize, Serialize};
use std::fmt;

/// 値を生成しないための Zero-Sized Type。
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Never {}

impl Never {
    /// `match` 展開での発散伝播を担保するためのヘルパ。
    pub fn absurd<T>(self) -> T {
        match self {}
    }
}

impl fmt::Display for Never {
    fn fmt(&self, _: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl std::error::Error for Never {}
