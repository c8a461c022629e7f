//! 複数の `Result` を 1 つへ畳み込む fan-in コレクタ。
//!
//! 入力は任意の `IntoIterator`。`all` は最初の `Err` で、`any` は最初の `Ok` で
//! 入力の消費を止める（以降の要素は評価されない）。

use super::{
    never::Never,
    result::Result,
    try_support::{ControlFlow, Try},
};
use serde::{Deserialize, Serialize};

/// `all_settled` の要素。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Settled<T, E> {
    Ok { value: T },
    Err { reason: E },
}

impl<T, E> Settled<T, E> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Settled::Ok { .. })
    }

    /// `Result` へ戻す。
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Settled::Ok { value } => Result::Ok(value),
            Settled::Err { reason } => Result::Err(reason),
        }
    }
}

impl<T, E> From<Result<T, E>> for Settled<T, E> {
    fn from(result: Result<T, E>) -> Self {
        match result {
            Result::Ok(value) => Settled::Ok { value },
            Result::Err(reason) => Settled::Err { reason },
        }
    }
}

/// すべて `Ok` なら値を入力順に集める。最初の `Err` のみを返す。
pub fn all<T, E, I>(results: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    results.into_iter().collect()
}

/// 各要素を `Settled` に変換する。失敗しない。
pub fn all_settled<T, E, I>(results: I) -> Result<Vec<Settled<T, E>>, Never>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    Result::Ok(results.into_iter().map(Settled::from).collect())
}

/// 最初の `Ok` を返す。1 つもなければ全エラーを入力順に返す。
pub fn any<T, E, I>(results: I) -> Result<T, Vec<E>>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    let mut errors = Vec::new();
    for result in results {
        match result {
            Result::Ok(value) => return Result::Ok(value),
            Result::Err(err) => errors.push(err),
        }
    }
    Result::Err(errors)
}

/// 成功値とエラーをそれぞれ入力順に分ける。
pub fn partition<T, E, I>(results: I) -> (Vec<T>, Vec<E>)
where
    I: IntoIterator<Item = Result<T, E>>,
{
    let mut oks = Vec::new();
    let mut errs = Vec::new();
    for result in results {
        match result {
            Result::Ok(value) => oks.push(value),
            Result::Err(err) => errs.push(err),
        }
    }
    (oks, errs)
}

pub fn values<T, E, I>(results: I) -> Vec<T>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    results.into_iter().filter_map(Result::ok).collect()
}

pub fn errors<T, E, I>(results: I) -> Vec<E>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    results.into_iter().filter_map(Result::err).collect()
}

/// `Try::branch` で短絡しながら任意のコレクションへ集める。
impl<T, E, C> FromIterator<Result<T, E>> for Result<C, E>
where
    C: FromIterator<T>,
{
    fn from_iter<I: IntoIterator<Item = Result<T, E>>>(iter: I) -> Self {
        let mut residual = None;
        let collected: C = iter
            .into_iter()
            .map_while(|result| match result.branch() {
                ControlFlow::Continue(value) => Some(value),
                flow => {
                    residual = flow.break_value();
                    None
                }
            })
            .collect();
        match residual {
            Some(stop) => stop.from_residual(),
            None => Try::from_output(collected),
        }
    }
}
