//! 网格背包：固定尺寸的物品格子，支持堆叠、移动、丢弃、使用、排序与恢复。
//!
//! 核心在 [`inventory::InventoryGrid`]，其余模块把它接进 Bevy 应用。

pub mod core;
pub mod data;
pub mod interface;
pub mod inventory;
