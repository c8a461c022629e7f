//! Core.Result プレリュード（Result/AsyncResult/ファクトリ/コレクタ）。

pub mod collectors;
pub mod factory;
pub mod json;
pub mod never;
pub mod result;
pub mod try_support;
pub mod unwrap;
#[cfg(feature = "core_async")]
pub mod r#async;

pub use collectors::{all, all_settled, any, errors, partition, values, Settled};
pub use factory::{
    err, from_nullable, from_nullable_with, from_try, from_try_result, from_try_with, is_result,
    ok, validate, validate_with, Fault, MissingValueError, Panic, ValidationError,
};
pub use json::DecodeError;
pub use never::Never;
#[cfg(feature = "core_async")]
pub use r#async::{from_future, from_future_with, AsyncResult};
pub use result::Result;
pub use try_support::{ControlFlow, Try};
pub use unwrap::{UnwrapError, UnwrapKind};
