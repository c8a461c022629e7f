//! Reml Core.Result クレート。
//! `Result` 本体と `AsyncResult`、ファクトリ群、fan-in 用コレクタを
//! `prelude` から公開する。設定 (`config`) と監査 (`audit`) は付随機能。

pub mod audit;
pub mod config;
pub mod prelude;

pub use config::{ConfigError, ResultConfig};
pub use prelude::{
    all, all_settled, any, err, errors, from_nullable, from_nullable_with, from_try,
    from_try_result, from_try_with, is_result, ok, partition, validate, validate_with, values,
    ControlFlow, DecodeError, Fault, MissingValueError, Never, Panic, Result, Settled, Try,
    UnwrapError, UnwrapKind, ValidationError,
};
#[cfg(feature = "core_async")]
pub use prelude::{from_future, from_future_with, AsyncResult};
