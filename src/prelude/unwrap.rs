//! `unwrap` / `expect` 系の誤用フォルト。
//!
//! 取り出しに失敗した側のペイロードを `cause` として保持し、
//! 文字列へ平坦化せずに診断ツールへ渡せるようにする。

use std::{error::Error as StdError, fmt};

/// 誤用フォルトを発生させた操作。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnwrapKind {
    /// `Err` に対する `unwrap`。
    Unwrap,
    /// `Ok` に対する `unwrap_err`。
    UnwrapErr,
    /// `Err` に対する `expect`。
    Expect,
    /// `Ok` に対する `expect_err`。
    ExpectErr,
}

impl UnwrapKind {
    /// 監査ログで使う `snake_case` ラベル。
    pub fn as_str(&self) -> &'static str {
        match self {
            UnwrapKind::Unwrap => "unwrap",
            UnwrapKind::UnwrapErr => "unwrap_err",
            UnwrapKind::Expect => "expect",
            UnwrapKind::ExpectErr => "expect_err",
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            UnwrapKind::Unwrap => "called `Result::unwrap()` on an `Err` value",
            UnwrapKind::UnwrapErr => "called `Result::unwrap_err()` on an `Ok` value",
            UnwrapKind::Expect | UnwrapKind::ExpectErr => "expectation failed",
        }
    }
}

/// 取り出し失敗を表すエラー。`cause` は取り出せなかった側の値。
#[derive(Clone, PartialEq, Eq)]
pub struct UnwrapError<C> {
    kind: UnwrapKind,
    message: String,
    cause: C,
}

impl<C> UnwrapError<C> {
    pub(crate) fn new(kind: UnwrapKind, cause: C) -> Self {
        Self {
            kind,
            message: kind.default_message().to_string(),
            cause,
        }
    }

    pub(crate) fn with_message(kind: UnwrapKind, message: impl Into<String>, cause: C) -> Self {
        Self {
            kind,
            message: message.into(),
            cause,
        }
    }

    pub fn kind(&self) -> UnwrapKind {
        self.kind
    }

    /// 利用者が渡した（または既定の）診断メッセージ。
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 元のペイロードへの参照。
    pub fn cause(&self) -> &C {
        &self.cause
    }

    /// 元のペイロードを取り出す。
    pub fn into_cause(self) -> C {
        self.cause
    }
}

impl<C: fmt::Debug> fmt::Debug for UnwrapError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnwrapError")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("cause", &self.cause)
            .finish()
    }
}

impl<C: fmt::Debug> fmt::Display for UnwrapError<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.message, self.cause)
    }
}

impl<C> StdError for UnwrapError<C>
where
    C: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(&self.cause)
    }
}

#[cold]
#[inline(never)]
#[track_caller]
pub(crate) fn panic_unwrap<C: fmt::Debug>(error: UnwrapError<C>) -> ! {
    crate::audit::record_unwrap_failure(error.kind(), &error.to_string());
    panic!("{error}")
}
