//! `Result` を生成するファクトリ群。
//!
//! `from_try*` は panic を、`from_try_result` はさらに返された `Err` を捕捉し、
//! どちらも `Err` のデータとして返す。以降、失敗は値としてのみ流れる。

use super::result::Result;
use crate::{
    audit::{self, FaultClass},
    config,
};
use std::{
    any::Any,
    error::Error as StdError,
    fmt,
    panic::{self, AssertUnwindSafe},
};
use thiserror::Error;

pub use super::json::is_result;

const NON_STRING_PAYLOAD: &str = "non-string panic payload";

/// 捕捉した panic。元のペイロードは `downcast_ref` で取り出せる。
#[derive(Error)]
#[error("panicked: {message}")]
pub struct Panic {
    message: String,
    payload: Box<dyn Any + Send>,
}

impl Panic {
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(text) = payload.downcast_ref::<&'static str>() {
            (*text).to_string()
        } else if let Some(text) = payload.downcast_ref::<String>() {
            text.clone()
        } else {
            NON_STRING_PAYLOAD.to_string()
        };
        Self { message, payload }
    }

    /// panic メッセージ。文字列以外のペイロードでは固定文言になる。
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn downcast_ref<P: Any>(&self) -> Option<&P> {
        self.payload.downcast_ref::<P>()
    }

    /// 元のペイロードを取り出す（`resume_unwind` で再送出する場合など）。
    pub fn into_payload(self) -> Box<dyn Any + Send> {
        self.payload
    }
}

impl fmt::Debug for Panic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Panic")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// `from_try_result` / `from_future` が捕捉した失敗。
pub enum Fault<E> {
    /// 呼び出し先が返した（Future が reject した）エラー。
    Raised(E),
    /// 呼び出し先の panic。
    Panicked(Panic),
}

impl<E> Fault<E> {
    pub fn is_panic(&self) -> bool {
        matches!(self, Fault::Panicked(_))
    }

    pub fn raised(&self) -> Option<&E> {
        match self {
            Fault::Raised(err) => Some(err),
            Fault::Panicked(_) => None,
        }
    }

    pub fn into_raised(self) -> Option<E> {
        match self {
            Fault::Raised(err) => Some(err),
            Fault::Panicked(_) => None,
        }
    }

    pub fn panic(&self) -> Option<&Panic> {
        match self {
            Fault::Raised(_) => None,
            Fault::Panicked(panic) => Some(panic),
        }
    }

    /// 返されたエラーを写像する。panic はそのまま保持する。
    pub fn map<F, O>(self, f: F) -> Fault<O>
    where
        F: FnOnce(E) -> O,
    {
        match self {
            Fault::Raised(err) => Fault::Raised(f(err)),
            Fault::Panicked(panic) => Fault::Panicked(panic),
        }
    }

    pub(crate) fn class(&self) -> FaultClass {
        match self {
            Fault::Raised(_) => FaultClass::Raised,
            Fault::Panicked(_) => FaultClass::Panic,
        }
    }
}

impl<E: fmt::Debug> fmt::Debug for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Raised(err) => f.debug_tuple("Raised").field(err).finish(),
            Fault::Panicked(panic) => f.debug_tuple("Panicked").field(panic).finish(),
        }
    }
}

impl<E: fmt::Display> fmt::Display for Fault<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Raised(err) => write!(f, "{err}"),
            Fault::Panicked(panic) => write!(f, "{panic}"),
        }
    }
}

impl<E> StdError for Fault<E>
where
    E: StdError + 'static,
{
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Fault::Raised(err) => Some(err),
            Fault::Panicked(panic) => Some(panic),
        }
    }
}

/// panic 同士はメッセージで比較する。
impl<E: PartialEq> PartialEq for Fault<E> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Fault::Raised(left), Fault::Raised(right)) => left == right,
            (Fault::Panicked(left), Fault::Panicked(right)) => left.message == right.message,
            _ => false,
        }
    }
}

/// `from_nullable` が合成する既定エラー。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MissingValueError {
    message: String,
}

impl MissingValueError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Default for MissingValueError {
    fn default() -> Self {
        Self::new(config::read(|config| config.missing_value_message.clone()))
    }
}

/// `validate` が合成する既定エラー。拒否された値をそのまま保持する。
#[derive(Clone, PartialEq, Eq)]
pub struct ValidationError<T> {
    message: String,
    value: T,
}

impl<T> ValidationError<T> {
    pub fn new(message: impl Into<String>, value: T) -> Self {
        Self {
            message: message.into(),
            value,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for ValidationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationError")
            .field("message", &self.message)
            .field("value", &self.value)
            .finish()
    }
}

impl<T: fmt::Debug> fmt::Display for ValidationError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}", self.message, self.value)
    }
}

impl<T: fmt::Debug> StdError for ValidationError<T> {}

#[inline]
pub fn ok<T, E>(value: T) -> Result<T, E> {
    Result::Ok(value)
}

#[inline]
pub fn err<T, E>(error: E) -> Result<T, E> {
    Result::Err(error)
}

fn catch<T>(origin: &str, f: impl FnOnce() -> T) -> Result<T, Panic> {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Result::Ok(value),
        Err(payload) => {
            let panic = Panic::from_payload(payload);
            audit::record_absorbed(origin, FaultClass::Panic, panic.message());
            Result::Err(panic)
        }
    }
}

/// `f` を実行し、panic を `Err(Panic)` として捕捉する。
///
/// 捕捉は `catch_unwind` で行うため、プロセス全体の panic フックは
/// 変更しない。既定フックは吸収した panic も stderr へ出力する。
/// 出力を抑えたい呼び出し側は、フックを一時的に差し替えて戻す。
///
/// ```
/// use reml_result::from_try;
///
/// let previous = std::panic::take_hook();
/// std::panic::set_hook(Box::new(|_| {}));
/// let outcome = from_try(|| -> u8 { panic!("quiet") });
/// std::panic::set_hook(previous);
///
/// assert_eq!(outcome.unwrap_err().message(), "quiet");
/// ```
///
/// フックはスレッド共有なので、差し替え中に他スレッドで起きた panic も
/// 出力されなくなる。
pub fn from_try<T, F>(f: F) -> Result<T, Panic>
where
    F: FnOnce() -> T,
{
    catch("from_try", f)
}

/// `from_try` の捕捉結果を `map_err` で任意のエラーへ写像する。
pub fn from_try_with<T, E, F, M>(f: F, map_err: M) -> Result<T, E>
where
    F: FnOnce() -> T,
    M: FnOnce(Panic) -> E,
{
    catch("from_try", f).map_err(map_err)
}

/// 標準の `Result` を返すクロージャを実行し、返された `Err` と panic を
/// どちらも `Fault` として捕捉する。
pub fn from_try_result<T, E, F>(f: F) -> Result<T, Fault<E>>
where
    F: FnOnce() -> std::result::Result<T, E>,
{
    match catch("from_try_result", f) {
        Result::Ok(Ok(value)) => Result::Ok(value),
        Result::Ok(Err(error)) => {
            audit::record_raised::<E>("from_try_result");
            Result::Err(Fault::Raised(error))
        }
        Result::Err(panic) => Result::Err(Fault::Panicked(panic)),
    }
}

/// `None` を既定の `MissingValueError` に変換する。
pub fn from_nullable<T>(value: Option<T>) -> Result<T, MissingValueError> {
    match value {
        Some(value) => Result::Ok(value),
        None => Result::Err(MissingValueError::default()),
    }
}

pub fn from_nullable_with<T, E, F>(value: Option<T>, err_fn: F) -> Result<T, E>
where
    F: FnOnce() -> E,
{
    match value {
        Some(value) => Result::Ok(value),
        None => Result::Err(err_fn()),
    }
}

/// 述語を満たせば `Ok(value)`、満たさなければ値を埋め込んだ `ValidationError`。
pub fn validate<T, P>(value: T, predicate: P) -> Result<T, ValidationError<T>>
where
    P: FnOnce(&T) -> bool,
{
    validate_with(value, predicate, |value| {
        ValidationError::new(config::read(|config| config.validation_message.clone()), value)
    })
}

pub fn validate_with<T, E, P, F>(value: T, predicate: P, err_fn: F) -> Result<T, E>
where
    P: FnOnce(&T) -> bool,
    F: FnOnce(T) -> E,
{
    if predicate(&value) {
        Result::Ok(value)
    } else {
        Result::Err(err_fn(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct RangeError(&'static str);

    #[test]
    fn from_try_keeps_typed_payload() {
        let result: Result<i32, Panic> = from_try(|| std::panic::panic_any(RangeError("x")));
        let panic = result.unwrap_err();
        assert_eq!(panic.downcast_ref::<RangeError>(), Some(&RangeError("x")));
        assert_eq!(panic.message(), NON_STRING_PAYLOAD);
    }

    #[test]
    fn from_try_result_separates_raised_and_panicked() {
        let raised = from_try_result(|| Err::<i32, _>("bad input"));
        assert_eq!(raised, Result::Err(Fault::Raised("bad input")));

        let panicked = from_try_result(|| -> std::result::Result<i32, &str> {
            panic!("exploded")
        });
        let fault = panicked.unwrap_err();
        assert!(fault.is_panic());
        assert_eq!(fault.panic().map(Panic::message), Some("exploded"));
    }

    #[test]
    fn nullable_with_custom_error() {
        assert_eq!(from_nullable_with(None::<i32>, || "absent"), Result::Err("absent"));
        assert_eq!(from_nullable_with(Some(1), || "absent"), Result::Ok(1));
    }

    #[test]
    fn validate_embeds_rejected_value() {
        let rejected = validate(2, |x| *x > 5).unwrap_err();
        assert_eq!(*rejected.value(), 2);
        assert_eq!(rejected.to_string(), "validation failed: 2");
    }
}
