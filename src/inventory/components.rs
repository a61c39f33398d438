use bevy::prelude::*;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use super::slot::Slot;
use super::snapshot::InventorySnapshot;

/// 背包监听者写入、每帧转成 `SlotChanged` 事件的缓冲
#[derive(Resource, Clone, Default)]
pub struct SlotChangeQueue(pub Arc<Mutex<VecDeque<(usize, Slot)>>>);

impl SlotChangeQueue {
    pub fn push(&self, index: usize, slot: &Slot) {
        if let Ok(mut queue) = self.0.lock() {
            queue.push_back((index, slot.clone()));
        }
    }

    pub fn drain(&self) -> Vec<(usize, Slot)> {
        self.0
            .lock()
            .map(|mut queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}

/// 内存中的一份存档（save / load 命令）
#[derive(Resource, Default)]
pub struct SavedInventory(pub Option<InventorySnapshot>);
