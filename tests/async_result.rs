#![cfg(feature = "core_async")]

use futures::executor::block_on;
use reml_result::{
    audit::{drain_for_tests, take_result_audit_metadata},
    from_future, from_future_with, AsyncResult, Fault, Result, Settled,
};
use std::sync::{Arc, Mutex};

#[test]
fn from_future_never_rejects() {
    let settled = block_on(from_future(async { Err::<i32, _>("boom") }));
    assert_eq!(settled, Result::Err(Fault::Raised("boom")));

    let mapped = block_on(from_future_with(async { Err::<i32, _>("boom") }, |fault| {
        fault.into_raised().unwrap_or("panicked")
    }));
    assert_eq!(mapped, Result::Err("boom"));

    let fulfilled = block_on(from_future(async { Ok::<_, ()>(7) }));
    assert_eq!(fulfilled, Result::Ok(7));
}

#[test]
fn rejected_future_is_audited_by_error_type() {
    drain_for_tests();
    let settled = block_on(from_future(async { "x".parse::<i32>() }));
    assert!(settled.is_err());
    let events = take_result_audit_metadata();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].origin(), Some("from_future"));
    assert_eq!(events[0].fault(), Some("raised"));
    let error_type = events[0].error_type().expect("error type is recorded");
    assert!(error_type.ends_with("ParseIntError"), "{error_type}");
}

#[test]
fn and_waits_for_self_before_other() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let first_log = Arc::clone(&log);
    let second_log = Arc::clone(&log);
    let first = AsyncResult::<i32, &str>::new(async move {
        first_log.lock().unwrap().push("first");
        Result::Ok(1)
    });
    let second = AsyncResult::<&str, &str>::new(async move {
        second_log.lock().unwrap().push("second");
        Result::Ok("two")
    });
    assert_eq!(block_on(first.and(second)), Result::Ok("two"));
    assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
}

#[test]
fn or_skips_other_when_self_is_ok() {
    let polled = Arc::new(Mutex::new(false));
    let flag = Arc::clone(&polled);
    let fallback = AsyncResult::<i32, ()>::new(async move {
        *flag.lock().unwrap() = true;
        Result::Ok(0)
    });
    let settled = block_on(AsyncResult::<i32, &str>::ok(5).or(fallback));
    assert_eq!(settled, Result::Ok(5));
    assert!(!*polled.lock().unwrap());
}

#[test]
fn zip_and_flatten() {
    let zipped = AsyncResult::<i32, &str>::ok(1).zip(AsyncResult::ok("a"));
    assert_eq!(block_on(zipped), Result::Ok((1, "a")));

    let nested = AsyncResult::<Result<i32, &str>, &str>::ok(Result::Err("inner"));
    assert_eq!(block_on(nested.flatten()), Result::Err("inner"));
}

#[test]
fn terminal_helpers_settle() {
    assert!(block_on(AsyncResult::<i32, &str>::ok(1).is_ok()));
    assert_eq!(block_on(AsyncResult::<i32, &str>::err("e").unwrap_or(3)), 3);
    let label = block_on(
        AsyncResult::<i32, &str>::err("bad").r#match(|v| v.to_string(), |e| e.to_uppercase()),
    );
    assert_eq!(label, "BAD");
    assert_eq!(
        block_on(Result::<i32, &str>::Ok(2).into_async().into_std()),
        Ok(2)
    );
}

#[test]
fn sync_result_lifts_into_async_chain() {
    let lifted = Result::<i32, &str>::Ok(2).and_then_async(|v| async move {
        if v > 1 {
            Result::Ok(v * 100)
        } else {
            Result::Err("too small")
        }
    });
    assert_eq!(block_on(lifted), Result::Ok(200));
}

#[test]
fn async_fan_in_follows_sync_rules() {
    let all = AsyncResult::all_async(vec![
        AsyncResult::<i32, &str>::ok(1),
        AsyncResult::err("e"),
        AsyncResult::ok(3),
    ]);
    assert_eq!(block_on(all), Result::Err("e"));

    let any = AsyncResult::any_async(vec![
        AsyncResult::<i32, &str>::err("a"),
        AsyncResult::ok(2),
    ]);
    assert_eq!(block_on(any), Result::Ok(2));

    let settled = block_on(AsyncResult::all_settled_async(vec![
        AsyncResult::<i32, &str>::ok(1),
        AsyncResult::err("e"),
    ]));
    assert_eq!(
        settled,
        Result::Ok(vec![Settled::Ok { value: 1 }, Settled::Err { reason: "e" }])
    );
}

#[test]
fn to_future_bridges_to_std_result() {
    assert_eq!(block_on(Result::<i32, &str>::Err("e").to_future()), Err("e"));
}
