//! Core.Async 向けの `AsyncResult`。
//!
//! 内部は `Send` な boxed future。各コンビネータは直前の段階が確定してから
//! 次の段階を開始し、暗黙の並列実行は行わない。キャンセル手段は持たない。

use super::{
    factory::{Fault, Panic},
    never::Never,
    result::Result,
    collectors::{self, Settled},
};
use crate::audit::{self, FaultClass};
use futures::future::{BoxFuture, FutureExt};
use std::{
    fmt,
    future::Future,
    panic::AssertUnwindSafe,
    pin::Pin,
    task::{Context, Poll},
};

/// いずれ 1 つの `Result<T, E>` に確定する遅延計算。
#[must_use = "AsyncResult は await するまで実行されません"]
pub struct AsyncResult<T, E> {
    future: BoxFuture<'static, Result<T, E>>,
}

impl<T, E> fmt::Debug for AsyncResult<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncResult").finish_non_exhaustive()
    }
}

impl<T, E> Future for AsyncResult<T, E> {
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl<T, E> AsyncResult<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// `Result` を返す Future から生成する。
    pub fn new<F>(future: F) -> Self
    where
        F: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            future: future.boxed(),
        }
    }

    /// 既に確定した `Result` を包む。
    pub fn ready(result: Result<T, E>) -> Self {
        Self::new(futures::future::ready(result))
    }

    pub fn ok(value: T) -> Self {
        Self::ready(Result::Ok(value))
    }

    pub fn err(error: E) -> Self {
        Self::ready(Result::Err(error))
    }

    pub async fn is_ok(self) -> bool {
        self.await.is_ok()
    }

    pub async fn is_err(self) -> bool {
        self.await.is_err()
    }

    pub async fn unwrap_or(self, default: T) -> T {
        self.await.unwrap_or(default)
    }

    pub async fn unwrap_or_else<F>(self, default: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        self.await.unwrap_or_else(default)
    }

    /// 確定後、片方のハンドラだけを呼ぶ。
    pub async fn r#match<R, O, F>(self, ok: O, err: F) -> R
    where
        O: FnOnce(T) -> R,
        F: FnOnce(E) -> R,
    {
        self.await.r#match(ok, err)
    }

    /// 標準の `Result` で完了する Future へ変換する。
    pub async fn into_std(self) -> std::result::Result<T, E> {
        self.await.into_std()
    }

    pub fn map<U, F>(self, f: F) -> AsyncResult<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        AsyncResult::new(async move { self.await.map(f) })
    }

    /// 正常値を非同期関数で写像する。`Err` では `f` を呼ばない。
    pub fn map_async<U, F, Fut>(self, f: F) -> AsyncResult<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        AsyncResult::new(async move {
            match self.await {
                Result::Ok(value) => Result::Ok(f(value).await),
                Result::Err(err) => Result::Err(err),
            }
        })
    }

    pub fn map_err<O, F>(self, f: F) -> AsyncResult<T, O>
    where
        O: Send + 'static,
        F: FnOnce(E) -> O + Send + 'static,
    {
        AsyncResult::new(async move { self.await.map_err(f) })
    }

    pub fn map_err_async<O, F, Fut>(self, f: F) -> AsyncResult<T, O>
    where
        O: Send + 'static,
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = O> + Send + 'static,
    {
        AsyncResult::new(async move {
            match self.await {
                Result::Ok(value) => Result::Ok(value),
                Result::Err(err) => Result::Err(f(err).await),
            }
        })
    }

    pub fn and_then<U, F>(self, f: F) -> AsyncResult<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Result<U, E> + Send + 'static,
    {
        AsyncResult::new(async move { self.await.and_then(f) })
    }

    /// 正常値を次の非同期計算へ連鎖させる。`f` は `AsyncResult` も返せる。
    pub fn and_then_async<U, F, Fut>(self, f: F) -> AsyncResult<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
    {
        AsyncResult::new(async move {
            match self.await {
                Result::Ok(value) => f(value).await,
                Result::Err(err) => Result::Err(err),
            }
        })
    }

    pub fn or_else<O, F>(self, f: F) -> AsyncResult<T, O>
    where
        O: Send + 'static,
        F: FnOnce(E) -> Result<T, O> + Send + 'static,
    {
        AsyncResult::new(async move { self.await.or_else(f) })
    }

    pub fn or_else_async<O, F, Fut>(self, f: F) -> AsyncResult<T, O>
    where
        O: Send + 'static,
        F: FnOnce(E) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, O>> + Send + 'static,
    {
        AsyncResult::new(async move {
            match self.await {
                Result::Ok(value) => Result::Ok(value),
                Result::Err(err) => f(err).await,
            }
        })
    }

    /// 自身が `Ok` で確定した場合に限り `other` を待つ。
    pub fn and<U>(self, other: AsyncResult<U, E>) -> AsyncResult<U, E>
    where
        U: Send + 'static,
    {
        AsyncResult::new(async move {
            match self.await {
                Result::Ok(_) => other.await,
                Result::Err(err) => Result::Err(err),
            }
        })
    }

    /// 自身が `Err` で確定した場合に限り `other` を待つ。
    pub fn or<O>(self, other: AsyncResult<T, O>) -> AsyncResult<T, O>
    where
        O: Send + 'static,
    {
        AsyncResult::new(async move {
            match self.await {
                Result::Ok(value) => Result::Ok(value),
                Result::Err(_) => other.await,
            }
        })
    }

    /// 自身が `Ok` の場合のみ `other` を待ち、両方の値を組にする。
    pub fn zip<U>(self, other: AsyncResult<U, E>) -> AsyncResult<(T, U), E>
    where
        U: Send + 'static,
    {
        AsyncResult::new(async move {
            match self.await {
                Result::Ok(left) => other.await.map(|right| (left, right)),
                Result::Err(err) => Result::Err(err),
            }
        })
    }

    pub fn filter<P, F>(self, pred: P, err_fn: F) -> AsyncResult<T, E>
    where
        P: FnOnce(&T) -> bool + Send + 'static,
        F: FnOnce(T) -> E + Send + 'static,
    {
        AsyncResult::new(async move { self.await.filter(pred, err_fn) })
    }

    pub fn inspect<F>(self, f: F) -> AsyncResult<T, E>
    where
        F: FnOnce(&T) + Send + 'static,
    {
        AsyncResult::new(async move { self.await.inspect(f) })
    }

    pub fn inspect_err<F>(self, f: F) -> AsyncResult<T, E>
    where
        F: FnOnce(&E) + Send + 'static,
    {
        AsyncResult::new(async move { self.await.inspect_err(f) })
    }

    /// 順番に 1 つずつ待ち、確定した `Result` を入力順に返す。
    pub async fn settle_all<I>(results: I) -> Vec<Result<T, E>>
    where
        I: IntoIterator<Item = AsyncResult<T, E>>,
    {
        let mut settled = Vec::new();
        for pending in results {
            settled.push(pending.await);
        }
        settled
    }

    /// `all` の非同期版。最初の `Err` で以降の待機を打ち切る。
    pub fn all_async<I>(results: I) -> AsyncResult<Vec<T>, E>
    where
        I: IntoIterator<Item = AsyncResult<T, E>>,
        I::IntoIter: Send + 'static,
    {
        let pending = results.into_iter();
        AsyncResult::new(async move {
            let mut values = Vec::new();
            for next in pending {
                match next.await {
                    Result::Ok(value) => values.push(value),
                    Result::Err(err) => return Result::Err(err),
                }
            }
            Result::Ok(values)
        })
    }

    /// `any` の非同期版。最初の `Ok` で以降の待機を打ち切る。
    pub fn any_async<I>(results: I) -> AsyncResult<T, Vec<E>>
    where
        I: IntoIterator<Item = AsyncResult<T, E>>,
        I::IntoIter: Send + 'static,
    {
        let pending = results.into_iter();
        AsyncResult::new(async move {
            let mut errors = Vec::new();
            for next in pending {
                match next.await {
                    Result::Ok(value) => return Result::Ok(value),
                    Result::Err(err) => errors.push(err),
                }
            }
            Result::Err(errors)
        })
    }

    /// すべて確定させてから `all_settled` を適用する。
    pub fn all_settled_async<I>(results: I) -> AsyncResult<Vec<Settled<T, E>>, Never>
    where
        I: IntoIterator<Item = AsyncResult<T, E>>,
        I::IntoIter: Send + 'static,
    {
        let pending = results.into_iter();
        AsyncResult::new(async move { collectors::all_settled(Self::settle_all(pending).await) })
    }
}

impl<T, E> AsyncResult<Result<T, E>, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    pub fn flatten(self) -> AsyncResult<T, E> {
        AsyncResult::new(async move { self.await.flatten() })
    }
}

impl<T, E> Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// 確定済みの `AsyncResult` へ持ち上げる。
    pub fn into_async(self) -> AsyncResult<T, E> {
        AsyncResult::ready(self)
    }

    pub fn map_async<U, F, Fut>(self, f: F) -> AsyncResult<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = U> + Send + 'static,
    {
        self.into_async().map_async(f)
    }

    pub fn and_then_async<U, F, Fut>(self, f: F) -> AsyncResult<U, E>
    where
        U: Send + 'static,
        F: FnOnce(T) -> Fut + Send + 'static,
        Fut: Future<Output = Result<U, E>> + Send + 'static,
    {
        self.into_async().and_then_async(f)
    }
}

impl<T, E> From<Result<T, E>> for AsyncResult<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    fn from(result: Result<T, E>) -> Self {
        AsyncResult::ready(result)
    }
}

/// 標準の `Result` を返す Future を `AsyncResult` に変換する。
///
/// reject（`Err`）も panic も `Err(Fault)` として確定させ、戻り値の
/// `AsyncResult` 自体が panic を伝播することはない。
///
/// `from_try` と同じく panic フックには触れないので、吸収した panic も
/// 既定フックが stderr へ出力する。抑止する場合は `from_try` の例と同様に
/// `std::panic::set_hook` を await の前後で差し替える。
pub fn from_future<T, E, F>(future: F) -> AsyncResult<T, Fault<E>>
where
    T: Send + 'static,
    E: Send + 'static,
    F: Future<Output = std::result::Result<T, E>> + Send + 'static,
{
    AsyncResult::new(async move {
        match AssertUnwindSafe(future).catch_unwind().await {
            Ok(Ok(value)) => Result::Ok(value),
            Ok(Err(error)) => {
                audit::record_raised::<E>("from_future");
                Result::Err(Fault::Raised(error))
            }
            Err(payload) => {
                let panic = Panic::from_payload(payload);
                audit::record_absorbed("from_future", FaultClass::Panic, panic.message());
                Result::Err(Fault::Panicked(panic))
            }
        }
    })
}

/// `from_future` の失敗を `map_err` で写像する。
pub fn from_future_with<T, E, O, F, M>(future: F, map_err: M) -> AsyncResult<T, O>
where
    T: Send + 'static,
    E: Send + 'static,
    O: Send + 'static,
    F: Future<Output = std::result::Result<T, E>> + Send + 'static,
    M: FnOnce(Fault<E>) -> O + Send + 'static,
{
    from_future(future).map_err(map_err)
}
