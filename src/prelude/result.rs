//! `Result` 型の正式実装。
//!
//! すべての操作は `self` を消費して新しい値を返す。パニックし得るのは
//! `unwrap` / `expect` 系を不一致のケースで呼んだ場合のみ。

use super::unwrap::{panic_unwrap, UnwrapError, UnwrapKind};
use std::fmt::{self, Display};

type StdResult<T, E> = std::result::Result<T, E>;

/// Reml コアプレリュードで利用する Result 型。
#[must_use = "Result の戻り値を無視すると失敗を見逃します"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Result<T, E> {
    /// 正常系。
    Ok(T),
    /// 異常系。
    Err(E),
}

impl<T, E> Result<T, E> {
    /// `Ok` であるかどうかを返す。
    #[inline]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// `Err` であるかどうかを返す。
    #[inline]
    pub const fn is_err(&self) -> bool {
        matches!(self, Self::Err(_))
    }

    /// `Ok` かつ述語を満たすか。`Err` では述語を呼ばない。
    #[inline]
    pub fn is_ok_and(&self, pred: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Self::Ok(value) => pred(value),
            Self::Err(_) => false,
        }
    }

    /// `Err` かつ述語を満たすか。`Ok` では述語を呼ばない。
    #[inline]
    pub fn is_err_and(&self, pred: impl FnOnce(&E) -> bool) -> bool {
        match self {
            Self::Ok(_) => false,
            Self::Err(err) => pred(err),
        }
    }

    #[inline]
    pub const fn as_ref(&self) -> Result<&T, &E> {
        match self {
            Self::Ok(value) => Result::Ok(value),
            Self::Err(err) => Result::Err(err),
        }
    }

    /// 成功値を取得する。`Err` の場合は `UnwrapError` を伴って panic する。
    #[inline]
    #[track_caller]
    pub fn unwrap(self) -> T
    where
        E: fmt::Debug,
    {
        match self {
            Self::Ok(value) => value,
            Self::Err(err) => panic_unwrap(UnwrapError::new(UnwrapKind::Unwrap, err)),
        }
    }

    /// エラー値を取得する。`Ok` の場合は panic する。
    #[inline]
    #[track_caller]
    pub fn unwrap_err(self) -> E
    where
        T: fmt::Debug,
    {
        match self {
            Self::Ok(value) => panic_unwrap(UnwrapError::new(UnwrapKind::UnwrapErr, value)),
            Self::Err(err) => err,
        }
    }

    /// 成功値を取得し、エラー時は `message` を添えて panic する。
    #[inline]
    #[track_caller]
    pub fn expect(self, message: &str) -> T
    where
        E: fmt::Debug,
    {
        match self {
            Self::Ok(value) => value,
            Self::Err(err) => {
                panic_unwrap(UnwrapError::with_message(UnwrapKind::Expect, message, err))
            }
        }
    }

    #[inline]
    #[track_caller]
    pub fn expect_err(self, message: &str) -> E
    where
        T: fmt::Debug,
    {
        match self {
            Self::Ok(value) => {
                panic_unwrap(UnwrapError::with_message(UnwrapKind::ExpectErr, message, value))
            }
            Self::Err(err) => err,
        }
    }

    /// panic しない `unwrap`。失敗時は元のエラーを `cause` に持つ。
    #[inline]
    pub fn try_unwrap(self) -> StdResult<T, UnwrapError<E>> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(err) => Err(UnwrapError::new(UnwrapKind::Unwrap, err)),
        }
    }

    #[inline]
    pub fn try_unwrap_err(self) -> StdResult<E, UnwrapError<T>> {
        match self {
            Self::Ok(value) => Err(UnwrapError::new(UnwrapKind::UnwrapErr, value)),
            Self::Err(err) => Ok(err),
        }
    }

    #[inline]
    pub fn try_expect(self, message: &str) -> StdResult<T, UnwrapError<E>> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(err) => Err(UnwrapError::with_message(UnwrapKind::Expect, message, err)),
        }
    }

    #[inline]
    pub fn try_expect_err(self, message: &str) -> StdResult<E, UnwrapError<T>> {
        match self {
            Self::Ok(value) => Err(UnwrapError::with_message(
                UnwrapKind::ExpectErr,
                message,
                value,
            )),
            Self::Err(err) => Ok(err),
        }
    }

    /// エラー時に既定値を返す（既定値は事前評価）。
    #[inline]
    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Ok(value) => value,
            Self::Err(_) => default,
        }
    }

    /// エラー時にエラー値から代替値を計算する。
    #[inline]
    pub fn unwrap_or_else<F>(self, default: F) -> T
    where
        F: FnOnce(E) -> T,
    {
        match self {
            Self::Ok(value) => value,
            Self::Err(err) => default(err),
        }
    }

    #[inline]
    pub fn unwrap_or_default(self) -> T
    where
        T: Default,
    {
        match self {
            Self::Ok(value) => value,
            Self::Err(_) => T::default(),
        }
    }

    /// 正常値に写像を適用する。
    #[inline]
    #[must_use = "map の結果を利用しないと変換が失われます"]
    pub fn map<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Ok(value) => Result::Ok(f(value)),
            Self::Err(err) => Result::Err(err),
        }
    }

    /// エラー値に写像を適用する。
    #[inline]
    #[must_use = "map_err の結果を利用しないと変換が失われます"]
    pub fn map_err<F, O>(self, f: F) -> Result<T, O>
    where
        F: FnOnce(E) -> O,
    {
        match self {
            Self::Ok(value) => Result::Ok(value),
            Self::Err(err) => Result::Err(f(err)),
        }
    }

    #[inline]
    pub fn map_or<U, F>(self, default: U, f: F) -> U
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Ok(value) => f(value),
            Self::Err(_) => default,
        }
    }

    #[inline]
    pub fn map_or_else<U, D, F>(self, default: D, f: F) -> U
    where
        D: FnOnce(E) -> U,
        F: FnOnce(T) -> U,
    {
        match self {
            Self::Ok(value) => f(value),
            Self::Err(err) => default(err),
        }
    }

    /// `Ok` の値が述語を満たさなければ `err_fn` でエラーへ落とす。
    #[inline]
    #[must_use = "filter の結果を利用しないと検証が無効になります"]
    pub fn filter<P, F>(self, pred: P, err_fn: F) -> Result<T, E>
    where
        P: FnOnce(&T) -> bool,
        F: FnOnce(T) -> E,
    {
        match self {
            Self::Ok(value) => {
                if pred(&value) {
                    Result::Ok(value)
                } else {
                    Result::Err(err_fn(value))
                }
            }
            Self::Err(err) => Result::Err(err),
        }
    }

    /// 正常値を `Result` で連鎖させる。
    #[inline]
    #[must_use = "and_then の結果を利用しないと副作用が起きません"]
    pub fn and_then<U, F>(self, f: F) -> Result<U, E>
    where
        F: FnOnce(T) -> Result<U, E>,
    {
        match self {
            Self::Ok(value) => f(value),
            Self::Err(err) => Result::Err(err),
        }
    }

    /// エラー時に代替計算を行う。
    #[inline]
    #[must_use = "or_else の結果を利用しないと回復処理が無効になります"]
    pub fn or_else<F, O>(self, f: F) -> Result<T, O>
    where
        F: FnOnce(E) -> Result<T, O>,
    {
        match self {
            Self::Ok(value) => Result::Ok(value),
            Self::Err(err) => f(err),
        }
    }

    /// `Ok` なら `other` をそのまま返す。
    #[inline]
    pub fn and<U>(self, other: Result<U, E>) -> Result<U, E> {
        match self {
            Self::Ok(_) => other,
            Self::Err(err) => Result::Err(err),
        }
    }

    /// `Err` なら `other` をそのまま返す。
    #[inline]
    pub fn or<O>(self, other: Result<T, O>) -> Result<T, O> {
        match self {
            Self::Ok(value) => Result::Ok(value),
            Self::Err(_) => other,
        }
    }

    /// 両方 `Ok` ならタプルへまとめる。双方失敗時は `self` のエラーを優先する。
    #[inline]
    pub fn zip<U>(self, other: Result<U, E>) -> Result<(T, U), E> {
        match (self, other) {
            (Self::Ok(left), Result::Ok(right)) => Result::Ok((left, right)),
            (Self::Err(err), _) => Result::Err(err),
            (Self::Ok(_), Result::Err(err)) => Result::Err(err),
        }
    }

    /// `Ok` の時だけ副作用を実行し、自身を返す。
    #[inline]
    pub fn inspect<F>(self, f: F) -> Self
    where
        F: FnOnce(&T),
    {
        if let Self::Ok(value) = &self {
            f(value);
        }
        self
    }

    #[inline]
    pub fn inspect_err<F>(self, f: F) -> Self
    where
        F: FnOnce(&E),
    {
        if let Self::Err(err) = &self {
            f(err);
        }
        self
    }

    /// ケースに応じて片方のハンドラだけを呼び、その戻り値を返す。
    #[inline]
    pub fn r#match<R, O, F>(self, ok: O, err: F) -> R
    where
        O: FnOnce(T) -> R,
        F: FnOnce(E) -> R,
    {
        match self {
            Self::Ok(value) => ok(value),
            Self::Err(error) => err(error),
        }
    }

    /// `Ok` かつ値が等しいか。比較は `PartialEq` による。
    #[inline]
    pub fn contains<U>(&self, value: &U) -> bool
    where
        T: PartialEq<U>,
    {
        match self {
            Self::Ok(inner) => inner == value,
            Self::Err(_) => false,
        }
    }

    #[inline]
    pub fn contains_err<F>(&self, error: &F) -> bool
    where
        E: PartialEq<F>,
    {
        match self {
            Self::Ok(_) => false,
            Self::Err(inner) => inner == error,
        }
    }

    #[inline]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    #[inline]
    pub fn err(self) -> Option<E> {
        match self {
            Self::Ok(_) => None,
            Self::Err(err) => Some(err),
        }
    }

    /// `Result` から `Option` へ変換する（エラー情報を破棄）。
    #[inline]
    #[must_use = "to_option の結果を利用しないと値が失われます"]
    pub fn to_option(self) -> Option<T> {
        self.ok()
    }

    /// `Option` から `Result` へ昇格させる。
    #[inline]
    #[must_use = "from_option の結果を利用しないと失敗理由が捨てられます"]
    pub fn from_option(opt: Option<T>, err: E) -> Self {
        match opt {
            Some(value) => Result::Ok(value),
            None => Result::Err(err),
        }
    }

    /// 標準ライブラリの `Result` へ変換する（`?` 演算子との接続用）。
    #[inline]
    pub fn into_std(self) -> StdResult<T, E> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Err(err) => Err(err),
        }
    }

    /// `Ok` なら 1 要素、`Err` なら空のイテレータ。
    #[inline]
    pub fn iter(&self) -> std::option::IntoIter<&T> {
        self.as_ref().ok().into_iter()
    }

    /// `Ok` なら値で完了し、`Err` ならエラーで完了する Future。
    #[cfg(feature = "core_async")]
    #[inline]
    pub fn to_future(self) -> futures::future::Ready<StdResult<T, E>> {
        futures::future::ready(self.into_std())
    }
}

impl<T, E> Result<Result<T, E>, E> {
    /// 入れ子を 1 段だけ平坦化する。
    #[inline]
    pub fn flatten(self) -> Result<T, E> {
        match self {
            Self::Ok(inner) => inner,
            Self::Err(err) => Result::Err(err),
        }
    }
}

impl<T, E> From<StdResult<T, E>> for Result<T, E> {
    #[inline]
    fn from(value: StdResult<T, E>) -> Self {
        match value {
            Ok(value) => Result::Ok(value),
            Err(err) => Result::Err(err),
        }
    }
}

impl<T, E> From<Result<T, E>> for StdResult<T, E> {
    #[inline]
    fn from(value: Result<T, E>) -> Self {
        value.into_std()
    }
}

impl<T: Display, E: Display> Display for Result<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok(value) => write!(f, "Ok({value})"),
            Self::Err(err) => write!(f, "Err({err})"),
        }
    }
}

impl<T, E> IntoIterator for Result<T, E> {
    type Item = T;
    type IntoIter = std::option::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.ok().into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn map_is_identity_on_ok_and_skipped_on_err() {
        let ok: Result<i32, &str> = Result::Ok(3);
        assert_eq!(ok.map(|x| x), Result::Ok(3));

        let called = Cell::new(false);
        let err: Result<i32, &str> = Result::Err("e");
        let mapped = err.map(|x| {
            called.set(true);
            x + 1
        });
        assert_eq!(mapped, Result::Err("e"));
        assert!(!called.get());
    }

    #[test]
    fn predicates_only_run_on_matching_case() {
        let ok: Result<i32, i32> = Result::Ok(10);
        assert!(ok.is_ok_and(|v| *v > 5));
        assert!(!ok.is_err_and(|_| panic!("predicate must not run")));
        let err: Result<i32, i32> = Result::Err(1);
        assert!(err.is_err_and(|e| *e == 1));
        assert!(!err.is_ok_and(|_| panic!("predicate must not run")));
    }

    #[test]
    fn filter_turns_rejected_value_into_error() {
        let ok: Result<i32, String> = Result::Ok(4);
        assert_eq!(
            ok.filter(|v| *v > 5, |v| format!("{v} too small")),
            Result::Err("4 too small".to_string())
        );
        let ok: Result<i32, String> = Result::Ok(9);
        assert_eq!(ok.filter(|v| *v > 5, |_| unreachable!()), Result::Ok(9));
        let err: Result<i32, String> = Result::Err("kept".into());
        assert_eq!(
            err.filter(|_| true, |_| unreachable!()),
            Result::Err("kept".to_string())
        );
    }

    #[test]
    fn and_or_select_operands() {
        let ok: Result<i32, &str> = Result::Ok(1);
        let err: Result<i32, &str> = Result::Err("e");
        assert_eq!(ok.and(Result::<&str, &str>::Err("other")), Result::Err("other"));
        assert_eq!(err.and(Result::<&str, &str>::Ok("x")), Result::Err("e"));
        assert_eq!(ok.or(Result::<i32, &str>::Ok(2)), Result::Ok(1));
        assert_eq!(err.or(Result::<i32, &str>::Ok(2)), Result::Ok(2));
    }

    #[test]
    fn zip_prefers_left_error() {
        let a: Result<i32, &str> = Result::Ok(1);
        assert_eq!(a.zip(Result::Ok("a")), Result::Ok((1, "a")));
        assert_eq!(a.zip(Result::<&str, &str>::Err("e")), Result::Err("e"));
        let left: Result<i32, &str> = Result::Err("e1");
        assert_eq!(left.zip(Result::<i32, &str>::Err("e2")), Result::Err("e1"));
    }

    #[test]
    fn flatten_collapses_one_level() {
        let nested: Result<Result<i32, &str>, &str> = Result::Ok(Result::Err("inner"));
        assert_eq!(nested.flatten(), Result::Err("inner"));
        let twice: Result<Result<Result<i32, &str>, &str>, &str> =
            Result::Ok(Result::Ok(Result::Ok(1)));
        assert_eq!(twice.flatten(), Result::Ok(Result::Ok(1)));
    }

    #[test]
    fn inspect_returns_original_instance() {
        let seen = Cell::new(0);
        let ok: Result<i32, &str> = Result::Ok(7);
        let out = ok.inspect(|v| seen.set(*v)).inspect_err(|_| seen.set(-1));
        assert_eq!(out, Result::Ok(7));
        assert_eq!(seen.get(), 7);
    }

    #[test]
    fn match_dispatches_exactly_one_handler() {
        let err: Result<i32, &str> = Result::Err("bad");
        let label = err.r#match(|v| format!("ok {v}"), |e| format!("err {e}"));
        assert_eq!(label, "err bad");
    }

    #[test]
    fn display_uses_payload_text() {
        let ok: Result<i32, &str> = Result::Ok(5);
        let err: Result<i32, &str> = Result::Err("nope");
        assert_eq!(ok.to_string(), "Ok(5)");
        assert_eq!(err.to_string(), "Err(nope)");
    }

    #[test]
    fn try_unwrap_keeps_cause() {
        let err: Result<i32, &str> = Result::Err("boom");
        let fault = err.try_expect("needed a value").unwrap_err();
        assert_eq!(*fault.cause(), "boom");
        assert_eq!(fault.message(), "needed a value");
        assert_eq!(fault.kind(), UnwrapKind::Expect);
    }

    #[test]
    #[should_panic(expected = "called `Result::unwrap()` on an `Err` value")]
    fn unwrap_on_err_panics() {
        let err: Result<i32, &str> = Result::Err("boom");
        let _ = err.unwrap();
    }

    #[test]
    #[should_panic(expected = "must be err")]
    fn expect_err_on_ok_panics_with_message() {
        let ok: Result<i32, &str> = Result::Ok(1);
        let _ = ok.expect_err("must be err");
    }
}
