use bevy::prelude::*;

use super::grid::SortKey;
use super::slot::Slot;

#[derive(Event)]
pub struct GiveItemEvent {
    pub id:    String,
    pub count: u32,
}

#[derive(Event)]
pub struct MoveItemEvent {
    pub from:  usize,
    pub to:    usize,
    pub merge: bool,
}

/// index 为 None 时作用于当前选中格
#[derive(Event)]
pub struct DropItemEvent {
    pub index:  Option<usize>,
    pub amount: Option<u32>,  // None = 整格
}

#[derive(Event)]
pub struct UseItemEvent {
    pub index: Option<usize>,
}

#[derive(Event)]
pub struct SelectSlotEvent(pub Option<usize>);   // None = 取消选中

#[derive(Event)]
pub struct SortInventoryEvent {
    pub key:       SortKey,
    pub ascending: bool,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotEvent {
    Save,
    Load,
    Dump,
}

#[derive(Event)]
pub struct ListInventoryEvent;   // 让 CLI 请求打印背包

/// 背包某格被改写
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct SlotChanged {
    pub index: usize,
    pub slot:  Slot,
}
