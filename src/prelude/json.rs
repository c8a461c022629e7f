//! `Result` の JSON 表現。
//!
//! 形式は `{"type":"ok","value":..}` / `{"type":"err","error":..}` の 2 種のみ。
//! 読み込み時は `type` で分岐し、それ以外の値・余分なキー・ペイロードキーの
//! 欠落を拒否する（ペイロードが `Option` でも `value` / `error` は必須）。

use super::result::Result;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

const TYPE_KEY: &str = "type";
const VALUE_KEY: &str = "value";
const ERROR_KEY: &str = "error";
const OK_TAG: &str = "ok";
const ERR_TAG: &str = "err";

/// JSON からの復元失敗。
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("result JSON must be an object")]
    NotAnObject,
    #[error("result JSON is missing the `type` discriminant")]
    MissingType,
    #[error("unknown result type `{0}` (expected `ok` or `err`)")]
    UnknownType(String),
    #[error("`{0}` result must carry exactly its payload key")]
    UnexpectedShape(String),
    #[error("result payload is invalid: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ReprRef<'a, T, E> {
    Ok { value: &'a T },
    Err { error: &'a E },
}

#[derive(Deserialize)]
#[serde(
    tag = "type",
    rename_all = "lowercase",
    deny_unknown_fields,
    bound(deserialize = "T: Deserialize<'de>, E: Deserialize<'de>")
)]
enum Repr<T, E> {
    Ok {
        #[serde(deserialize_with = "required_payload")]
        value: T,
    },
    Err {
        #[serde(deserialize_with = "required_payload")]
        error: E,
    },
}

// `deserialize_with` を付けたフィールドは欠落時に `None` で補完されない。
fn required_payload<'de, D, P>(deserializer: D) -> std::result::Result<P, D::Error>
where
    D: Deserializer<'de>,
    P: Deserialize<'de>,
{
    P::deserialize(deserializer)
}

impl<T: Serialize, E: Serialize> Serialize for Result<T, E> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let repr: ReprRef<'_, T, E> = match self {
            Result::Ok(value) => ReprRef::Ok { value },
            Result::Err(error) => ReprRef::Err { error },
        };
        repr.serialize(serializer)
    }
}

impl<'de, T, E> Deserialize<'de> for Result<T, E>
where
    T: Deserialize<'de>,
    E: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match Repr::<T, E>::deserialize(deserializer)? {
            Repr::Ok { value } => Result::Ok(value),
            Repr::Err { error } => Result::Err(error),
        })
    }
}

impl<T: Serialize, E: Serialize> Result<T, E> {
    /// JSON 値へ変換する。
    pub fn to_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self).into()
    }
}

impl<T, E> Result<T, E>
where
    T: for<'de> Deserialize<'de>,
    E: for<'de> Deserialize<'de>,
{
    /// `to_json` の出力から `Result` を復元する。
    pub fn from_json(value: Value) -> Result<Self, DecodeError> {
        let tag = match value.as_object() {
            None => return Result::Err(DecodeError::NotAnObject),
            Some(object) => match object.get(TYPE_KEY) {
                None => return Result::Err(DecodeError::MissingType),
                Some(Value::String(tag)) => tag.clone(),
                Some(other) => other.to_string(),
            },
        };
        if tag != OK_TAG && tag != ERR_TAG {
            return Result::Err(DecodeError::UnknownType(tag));
        }
        if !is_result(&value) {
            return Result::Err(DecodeError::UnexpectedShape(tag));
        }
        Result::from(serde_json::from_value(value)).map_err(DecodeError::from)
    }
}

/// JSON 値が `Result` の直列化形式に一致するかを構造的に判定する。
pub fn is_result(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    if object.len() != 2 {
        return false;
    }
    match object.get(TYPE_KEY).and_then(Value::as_str) {
        Some(OK_TAG) => object.contains_key(VALUE_KEY),
        Some(ERR_TAG) => object.contains_key(ERROR_KEY),
        _ => false,
    }
}
