//! 暂存列表管理
//!
//! 持有已暂存题目的有序列表，负责本地ID分配和提交前的展开。

use tracing::debug;

use crate::models::{LocalId, StagedRecord, WireRecord};

/// 待提交的表单草稿（已转换为提交格式）
#[derive(Debug, Clone, PartialEq)]
pub struct PendingDraft {
    pub record: WireRecord,
    /// 草稿正在编辑的暂存题目
    pub editing: Option<LocalId>,
}

/// 暂存列表管理器
#[derive(Debug, Default)]
pub struct StagedListManager {
    records: Vec<StagedRecord>,
    /// 本次会话中出现过的最大本地ID
    high_water: u64,
}

impl StagedListManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[StagedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: LocalId) -> Option<&StagedRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// 追加到列表末尾
    pub fn add(&mut self, record: StagedRecord) {
        debug!("暂存题目 #{}", record.id);
        self.observe(record.id);
        self.records.push(record);
    }

    /// 原位替换
    ///
    /// 保持原来的位置；找不到对应ID时追加到末尾。
    pub fn update_in_place(&mut self, id: LocalId, record: StagedRecord) {
        self.observe(record.id);
        match self.records.iter_mut().find(|r| r.id == id) {
            Some(slot) => {
                debug!("原位更新暂存题目 #{}", id);
                *slot = record;
            }
            None => {
                debug!("暂存题目 #{} 已不存在，追加到末尾", id);
                self.records.push(record);
            }
        }
    }

    /// 移除题目，不存在时什么也不做
    pub fn remove(&mut self, id: LocalId) -> Option<StagedRecord> {
        let index = self.records.iter().position(|r| r.id == id)?;
        debug!("移除暂存题目 #{}", id);
        Some(self.records.remove(index))
    }

    /// 清空列表
    ///
    /// ID 水位线保留，清空后分配的ID仍大于之前出现过的所有ID。
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// 下一个可用的本地ID
    pub fn next_local_id(&self) -> LocalId {
        let current_max = self.records.iter().map(|r| r.id.0).max().unwrap_or(0);
        LocalId(current_max.max(self.high_water) + 1)
    }

    /// 分配一个本地ID
    pub fn allocate_id(&mut self) -> LocalId {
        let id = self.next_local_id();
        self.observe(id);
        id
    }

    /// 展开为提交列表
    ///
    /// 草稿正在编辑某道暂存题目时替换该位置，否则追加到末尾。
    pub fn flatten_for_submission(&self, pending: Option<PendingDraft>) -> Vec<WireRecord> {
        let mut flattened: Vec<WireRecord> =
            self.records.iter().map(|r| r.record.clone()).collect();

        let Some(pending) = pending else {
            return flattened;
        };

        let position = pending
            .editing
            .and_then(|id| self.records.iter().position(|r| r.id == id));

        match position {
            Some(index) => flattened[index] = pending.record,
            None => flattened.push(pending.record),
        }

        flattened
    }

    fn observe(&mut self, id: LocalId) {
        self.high_water = self.high_water.max(id.0);
    }
}
