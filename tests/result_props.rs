use proptest::prelude::*;
use reml_result::{all, err, errors, ok, partition, values, Result};

fn result_strategy() -> impl Strategy<Value = Result<i64, String>> {
    prop_oneof![
        any::<i64>().prop_map(Result::Ok),
        "[a-z]{0,8}".prop_map(Result::Err),
    ]
}

fn results_strategy() -> impl Strategy<Value = Vec<Result<i64, String>>> {
    prop::collection::vec(result_strategy(), 0..32)
}

proptest! {
    #[test]
    fn constructors_round_trip_their_payload(value in any::<i64>(), message in ".*") {
        let success: Result<i64, String> = ok(value);
        prop_assert!(success.is_ok());
        prop_assert_eq!(success.unwrap(), value);

        let failure: Result<i64, String> = err(message.clone());
        prop_assert!(failure.is_err());
        prop_assert_eq!(failure.unwrap_err(), message);
    }
}

proptest! {
    #[test]
    fn identity_laws_hold(result in result_strategy()) {
        prop_assert_eq!(result.clone().map(|v| v), result.clone());
        prop_assert_eq!(result.clone().and_then(ok), result.clone());
        prop_assert_eq!(result.clone().map_err(|e| e), result);
    }
}

proptest! {
    #[test]
    fn callbacks_only_see_their_own_case(result in result_strategy()) {
        let mut ok_calls = 0;
        let mut err_calls = 0;
        let was_ok = result.is_ok();
        let _ = result
            .clone()
            .map(|v| {
                ok_calls += 1;
                v
            })
            .map_err(|e| {
                err_calls += 1;
                e
            });
        prop_assert_eq!(ok_calls, usize::from(was_ok));
        prop_assert_eq!(err_calls, usize::from(!was_ok));
    }
}

proptest! {
    #[test]
    fn partition_conserves_order_and_length(results in results_strategy()) {
        let (oks, errs) = partition(results.clone());
        prop_assert_eq!(oks.len() + errs.len(), results.len());
        prop_assert_eq!(&oks, &values(results.clone()));
        prop_assert_eq!(&errs, &errors(results.clone()));

        let expected_oks: Vec<i64> = results.iter().filter_map(|r| r.clone().ok()).collect();
        prop_assert_eq!(oks, expected_oks);
    }
}

proptest! {
    #[test]
    fn all_yields_first_error_or_every_value(results in results_strategy()) {
        let first_error = results.iter().find_map(|r| r.clone().err());
        match first_error {
            Some(error) => prop_assert_eq!(all(results), Result::Err(error)),
            None => prop_assert_eq!(all(results.clone()), Result::Ok(values(results))),
        }
    }
}

proptest! {
    #[test]
    fn any_yields_first_value_or_every_error(results in results_strategy()) {
        let first_value = results.iter().find_map(|r| r.clone().ok());
        match first_value {
            Some(value) => prop_assert_eq!(reml_result::any(results), Result::Ok(value)),
            None => prop_assert_eq!(reml_result::any(results.clone()), Result::Err(errors(results))),
        }
    }
}

proptest! {
    #[test]
    fn json_round_trip_preserves_result(result in result_strategy()) {
        let encoded = result.to_json().expect("result encodes");
        prop_assert!(reml_result::is_result(&encoded));
        let decoded = Result::<i64, String>::from_json(encoded).expect("result decodes");
        prop_assert_eq!(decoded, result);
    }
}
