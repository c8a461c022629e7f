//! `Try` トレイト。
//!
//! `core::ops::Try` は stable で実装できないため、fan-in コレクタが
//! 短絡判定に使う独自契約として保持する。

use super::{never::Never, result::Result};

/// 成功値の取り出しと短絡 (Residual) を表すコントラクト。
pub trait Try {
    /// 正常時に得られる値。
    type Output;
    /// エラー時に保持する Residual。
    type Residual;

    /// 成功値から `Try` を構築する。
    fn from_output(output: Self::Output) -> Self;

    /// `Self` から Residual へ遷移する。
    fn branch(self) -> ControlFlow<Self::Residual, Self::Output>;
}

/// `std::ops::ControlFlow` に似た分岐結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlFlow<B, C> {
    /// 短絡（Break）ケース。
    Break(B),
    /// 継続（Continue）ケース。
    Continue(C),
}

impl<B, C> ControlFlow<B, C> {
    /// `Break` であれば値を返す。
    pub fn break_value(self) -> Option<B> {
        match self {
            ControlFlow::Break(value) => Some(value),
            ControlFlow::Continue(_) => None,
        }
    }
}

impl<T, E> Try for Result<T, E> {
    type Output = T;
    type Residual = Result<Never, E>;

    #[inline]
    fn from_output(output: Self::Output) -> Self {
        Self::Ok(output)
    }

    #[inline]
    fn branch(self) -> ControlFlow<Self::Residual, Self::Output> {
        match self {
            Self::Ok(value) => ControlFlow::Continue(value),
            Self::Err(err) => ControlFlow::Break(Result::Err(err)),
        }
    }
}

impl<E> Result<Never, E> {
    /// Residual から任意の成功型を持つ `Result` へ戻す。
    #[inline]
    pub fn from_residual<T>(self) -> Result<T, E> {
        match self {
            Result::Ok(never) => never.absurd(),
            Result::Err(err) => Result::Err(err),
        }
    }
}
