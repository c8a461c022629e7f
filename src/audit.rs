//! Core.Result の監査メタデータ。
//!
//! `from_try` / `from_future` が吸収したフォルトと、`unwrap` 系の誤用フォルトを
//! スレッドローカルなキューへ JSON メタデータとして積む。

use crate::{config, prelude::UnwrapKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value};
use std::{cell::RefCell, collections::VecDeque};
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

pub const EVENT_KIND_KEY: &str = "event.kind";
pub const EVENT_FAULT_ABSORBED: &str = "result.fault_absorbed";
pub const EVENT_UNWRAP_FAILED: &str = "result.unwrap_failed";
const ORIGIN_KEY: &str = "result.origin";
const FAULT_KEY: &str = "result.fault";
const MESSAGE_KEY: &str = "result.message";
const ERROR_TYPE_KEY: &str = "result.error_type";

thread_local! {
    static RESULT_AUDIT_EVENTS: RefCell<VecDeque<ResultAuditEvent>> =
        RefCell::new(VecDeque::new());
}

/// フォルトの分類。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultClass {
    /// panic を捕捉した。
    Panic,
    /// 呼び出し先が `Err` を返した（Future の reject を含む）。
    Raised,
    /// 取り出し時のケース不一致。
    Mismatch,
}

impl FaultClass {
    fn as_str(&self) -> &'static str {
        match self {
            FaultClass::Panic => "panic",
            FaultClass::Raised => "raised",
            FaultClass::Mismatch => "mismatch",
        }
    }
}

/// 監査イベント 1 件。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultAuditEvent {
    pub timestamp: String,
    pub metadata: JsonMap<String, Value>,
}

impl ResultAuditEvent {
    pub fn event_kind(&self) -> Option<&str> {
        self.metadata.get(EVENT_KIND_KEY).and_then(Value::as_str)
    }

    pub fn origin(&self) -> Option<&str> {
        self.metadata.get(ORIGIN_KEY).and_then(Value::as_str)
    }

    pub fn fault(&self) -> Option<&str> {
        self.metadata.get(FAULT_KEY).and_then(Value::as_str)
    }

    pub fn message(&self) -> Option<&str> {
        self.metadata.get(MESSAGE_KEY).and_then(Value::as_str)
    }

    /// `Err` を吸収したときの エラー型名。値そのものは記録しない。
    pub fn error_type(&self) -> Option<&str> {
        self.metadata.get(ERROR_TYPE_KEY).and_then(Value::as_str)
    }
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".into())
}

fn push_event(kind: &str, origin: &str, fault: FaultClass, detail: (&str, &str)) {
    let (enabled, capacity) = config::read(|config| (config.audit, config.audit_capacity));
    if !enabled || capacity == 0 {
        return;
    }
    let mut metadata = JsonMap::new();
    metadata.insert(EVENT_KIND_KEY.into(), Value::String(kind.to_string()));
    metadata.insert(ORIGIN_KEY.into(), Value::String(origin.to_string()));
    metadata.insert(FAULT_KEY.into(), Value::String(fault.as_str().into()));
    let (detail_key, detail) = detail;
    metadata.insert(detail_key.into(), Value::String(detail.to_string()));
    let event = ResultAuditEvent {
        timestamp: now_rfc3339(),
        metadata,
    };
    RESULT_AUDIT_EVENTS.with(|slot| {
        let mut queue = slot.borrow_mut();
        while queue.len() >= capacity {
            queue.pop_front();
        }
        queue.push_back(event);
    });
}

/// ファクトリがフォルトを `Err` へ変換したことを記録する。
pub(crate) fn record_absorbed(origin: &str, fault: FaultClass, message: &str) {
    push_event(EVENT_FAULT_ABSORBED, origin, fault, (MESSAGE_KEY, message));
}

/// 呼び出し先が返した `Err` を吸収したことを型名だけで記録する。
pub(crate) fn record_raised<E>(origin: &str) {
    push_event(
        EVENT_FAULT_ABSORBED,
        origin,
        FaultClass::Raised,
        (ERROR_TYPE_KEY, std::any::type_name::<E>()),
    );
}

pub(crate) fn record_unwrap_failure(kind: UnwrapKind, message: &str) {
    push_event(
        EVENT_UNWRAP_FAILED,
        kind.as_str(),
        FaultClass::Mismatch,
        (MESSAGE_KEY, message),
    );
}

/// 蓄積済みの監査イベントを取り出し、キューを空にする。
pub fn take_result_audit_metadata() -> Vec<ResultAuditEvent> {
    RESULT_AUDIT_EVENTS.with(|slot| slot.borrow_mut().drain(..).collect())
}

#[doc(hidden)]
pub fn drain_for_tests() {
    RESULT_AUDIT_EVENTS.with(|slot| slot.borrow_mut().clear());
}
