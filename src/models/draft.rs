//! 草稿、暂存题目与公共设置的数据结构
//!
//! 所有字段都以开放的 `字段名 → JSON 值` 形式保存，具体字段集合由题型 schema 决定。

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 字段值
pub type FieldValue = Value;

/// 本地ID
///
/// 仅在一次暂存会话内唯一、单调递增，与服务端ID无关。分配后不可修改，删除后也不会复用。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LocalId(pub u64);

impl fmt::Display for LocalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 服务端返回的题目ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RemoteId(pub String);

impl RemoteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for RemoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 可按字段名读取的记录（草稿或提交格式的题目）
pub trait FieldSource {
    fn field(&self, name: &str) -> Option<&FieldValue>;
}

/// 表单中的草稿
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Draft {
    fields: BTreeMap<String, FieldValue>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// 读取字符串字段，非字符串或缺失时返回 `None`
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Draft {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl FieldSource for Draft {
    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }
}

impl From<BTreeMap<String, FieldValue>> for Draft {
    fn from(fields: BTreeMap<String, FieldValue>) -> Self {
        Self { fields }
    }
}

/// 提交格式的题目
///
/// 由题型 schema 从草稿转换而来，直接序列化为创建接口的请求体。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WireRecord(pub Map<String, Value>);

impl WireRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.0.clone())
    }
}

impl FieldSource for WireRecord {
    fn field(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }
}

/// 已暂存的题目
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StagedRecord {
    pub id: LocalId,
    pub record: WireRecord,
}

impl StagedRecord {
    pub fn new(id: LocalId, record: WireRecord) -> Self {
        Self { id, record }
    }
}

/// 公共设置
///
/// 从最近一次暂存或载入编辑的题目中提取的分类字段，用于预填下一份草稿。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SharedSettings(pub BTreeMap<String, FieldValue>);

impl SharedSettings {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.0.iter()
    }
}

/// 草稿所处的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftState {
    /// 没有未保存的输入（可能带有预填的公共设置）
    Empty,
    /// 正在录入一道新题
    DirtyNew,
    /// 正在编辑某道已暂存的题目
    Editing(LocalId),
}
