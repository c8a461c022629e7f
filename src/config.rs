//! Core.Result の実行時設定。
//!
//! 設定はスレッドローカルに保持し、`with_config` でスコープ単位に差し替える。

use serde::Deserialize;
use serde_json::{Map, Value};
use std::{cell::RefCell, collections::HashMap};
use thiserror::Error;

const DEFAULT_AUDIT_CAPACITY: usize = 256;
const DEFAULT_MISSING_VALUE_MESSAGE: &str = "value is missing";
const DEFAULT_VALIDATION_MESSAGE: &str = "validation failed";

/// 拡張設定のネームスペースごとの値。
pub type ResultConfigExtensionValue = Map<String, Value>;

/// `extensions` 全体を表すマップ。
pub type ResultConfigExtensions = HashMap<String, ResultConfigExtensionValue>;

/// 設定読み込みの失敗。
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("result config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("audit_capacity must be greater than zero when audit is enabled")]
    ZeroAuditCapacity,
}

/// ファクトリと監査が参照する設定。
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResultConfig {
    /// 吸収したフォルトや誤用フォルトを監査キューへ記録するか。
    pub audit: bool,
    /// スレッドあたりの監査キュー上限。超過分は古い順に捨てる。
    pub audit_capacity: usize,
    /// `from_nullable` が合成する `MissingValueError` のメッセージ。
    pub missing_value_message: String,
    /// `validate` が合成する `ValidationError` のメッセージ接頭辞。
    pub validation_message: String,
    pub extensions: ResultConfigExtensions,
}

impl Default for ResultConfig {
    fn default() -> Self {
        Self {
            audit: true,
            audit_capacity: DEFAULT_AUDIT_CAPACITY,
            missing_value_message: DEFAULT_MISSING_VALUE_MESSAGE.to_string(),
            validation_message: DEFAULT_VALIDATION_MESSAGE.to_string(),
            extensions: ResultConfigExtensions::new(),
        }
    }
}

impl ResultConfig {
    /// JSON 文字列から設定を読み込む。省略したキーは既定値になる。
    pub fn from_json_str(source: &str) -> std::result::Result<Self, ConfigError> {
        let config: ResultConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.audit && self.audit_capacity == 0 {
            return Err(ConfigError::ZeroAuditCapacity);
        }
        Ok(())
    }

    /// 指定した名前空間の拡張設定をイミュータブルに更新する。
    pub fn with_extension<F>(&self, key: &str, update: F) -> Self
    where
        F: FnOnce(ResultConfigExtensionValue) -> ResultConfigExtensionValue,
    {
        let mut extensions = self.extensions.clone();
        let current = extensions.remove(key).unwrap_or_default();
        extensions.insert(key.to_string(), update(current));
        Self {
            extensions,
            ..self.clone()
        }
    }

    pub fn extension(&self, key: &str) -> Option<&ResultConfigExtensionValue> {
        self.extensions.get(key)
    }
}

thread_local! {
    static ACTIVE_CONFIG: RefCell<ResultConfig> = RefCell::new(ResultConfig::default());
}

/// 現在のスレッドで有効な設定の複製を返す。
pub fn current() -> ResultConfig {
    ACTIVE_CONFIG.with(|slot| slot.borrow().clone())
}

/// 設定の一部だけを読む。複製を避けたい呼び出し元向け。
pub(crate) fn read<R>(f: impl FnOnce(&ResultConfig) -> R) -> R {
    ACTIVE_CONFIG.with(|slot| f(&slot.borrow()))
}

/// 設定を差し替え、以前の設定を返す。
pub fn install(config: ResultConfig) -> ResultConfig {
    ACTIVE_CONFIG.with(|slot| std::mem::replace(&mut *slot.borrow_mut(), config))
}

struct RestoreGuard(Option<ResultConfig>);

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        if let Some(previous) = self.0.take() {
            install(previous);
        }
    }
}

/// `config` を有効にして `f` を実行する。`f` が panic しても元に戻す。
pub fn with_config<R>(config: ResultConfig, f: impl FnOnce() -> R) -> R {
    let _guard = RestoreGuard(Some(install(config)));
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = ResultConfig::from_json_str(r#"{ "missing_value_message": "absent" }"#)
            .expect("config should parse");
        assert_eq!(config.missing_value_message, "absent");
        assert_eq!(config.audit_capacity, DEFAULT_AUDIT_CAPACITY);
        assert!(config.audit);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let err = ResultConfig::from_json_str(r#"{ "audit_capacity": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroAuditCapacity));
    }

    #[test]
    fn with_config_restores_previous() {
        let custom = ResultConfig {
            validation_message: "rejected".into(),
            ..ResultConfig::default()
        };
        let inside = with_config(custom, || current().validation_message);
        assert_eq!(inside, "rejected");
        assert_eq!(current().validation_message, DEFAULT_VALIDATION_MESSAGE);
    }

    #[test]
    fn with_extension_updates_namespace() {
        let config = ResultConfig::default().with_extension("lint", |mut map| {
            map.insert("strict".into(), Value::Bool(true));
            map
        });
        assert_eq!(
            config.extension("lint").and_then(|map| map.get("strict")),
            Some(&Value::Bool(true))
        );
    }
}
