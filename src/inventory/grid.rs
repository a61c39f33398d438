//! 背包核心：固定尺寸的格子数组 + 堆叠 / 移动 / 丢弃 / 使用 / 排序 / 恢复
//!
//! 每写一格都会同步通知所有监听者 `(index, &Slot)`，多格操作中途的状态对监听者可见。

use bevy::log::debug;
use bevy::prelude::Resource;
use std::cmp::Ordering;
use std::sync::Arc;

use super::catalog::ItemCatalog;
use super::handler::UseHandler;
use super::slot::Slot;
use super::snapshot::InventorySnapshot;
use crate::data::schema::ItemEntry;

type SlotListener = Box<dyn FnMut(usize, &Slot) + Send + Sync>;

/// `subscribe` 返回的句柄，用于退订
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// 预设排序键
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Name,
    Type,
    Count,
}

#[derive(Resource)]
pub struct InventoryGrid {
    catalog: Arc<dyn ItemCatalog>,
    slots: Vec<Slot>,
    rows: usize,
    cols: usize,
    listeners: Vec<(ListenerId, SlotListener)>,
    next_listener: u64,
}

impl InventoryGrid {
    pub fn new(catalog: Arc<dyn ItemCatalog>, rows: usize, cols: usize) -> Self {
        Self {
            catalog,
            slots: vec![Slot::default(); rows * cols],
            rows,
            cols,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    /// 用存档重建：新建同尺寸空背包后 `restore`
    pub fn from_snapshot(catalog: Arc<dyn ItemCatalog>, snapshot: &InventorySnapshot) -> Self {
        let mut grid = Self::new(catalog, snapshot.rows, snapshot.cols);
        grid.restore(&snapshot.slots);
        grid
    }

    pub fn snapshot(&self) -> InventorySnapshot {
        InventorySnapshot {
            rows: self.rows,
            cols: self.cols,
            slots: self.slots.clone(),
        }
    }

    /* ---------------------------- 只读 ---------------------------- */

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> &Slot {
        &self.slots[index]
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn catalog(&self) -> &dyn ItemCatalog {
        &*self.catalog
    }

    /// 行优先
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    pub fn position_of(&self, index: usize) -> Option<(usize, usize)> {
        (index < self.slots.len()).then(|| (index / self.cols, index % self.cols))
    }

    /* ---------------------------- 监听 ---------------------------- */

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(usize, &Slot) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /* ---------------------------- 操作 ---------------------------- */

    /// 放入 `count` 个物品：先补满已有同类堆，再占空格。
    ///
    /// 全部放下才返回 `true`；空间不足时已放下的部分不会回滚。
    pub fn add(&mut self, item_id: &str, count: u32) -> bool {
        if item_id.is_empty() || count == 0 {
            return false;
        }
        let Some(item) = self.catalog.resolve(item_id) else {
            debug!("add: unknown item {item_id}");
            return false;
        };
        let stackable = item.stackable;
        let limit = item.stack_limit();
        let mut remaining = count;

        if stackable {
            for i in 0..self.slots.len() {
                if remaining == 0 {
                    break;
                }
                let slot = &self.slots[i];
                if !slot.holds(item_id) {
                    continue;
                }
                let free = limit.saturating_sub(slot.count);
                if free == 0 {
                    continue;
                }
                let moving = free.min(remaining);
                let merged = Slot::new(item_id, slot.count + moving);
                remaining -= moving;
                self.set_slot(i, merged);
            }
        }

        for i in 0..self.slots.len() {
            if remaining == 0 {
                break;
            }
            if !self.slots[i].is_empty() {
                continue;
            }
            let moving = limit.min(remaining);
            remaining -= moving;
            self.set_slot(i, Slot::new(item_id, moving));
        }

        if remaining > 0 {
            debug!("add: {remaining} x {item_id} did not fit");
        }
        remaining == 0
    }

    /// 拖动 `from` 到 `to`：同类可堆叠且目标有空位时合并，否则整格交换
    pub fn move_slot(&mut self, from: usize, to: usize, merge: bool) -> bool {
        if from == to {
            return false;
        }
        let mut from_slot = self.slots[from].clone();
        let mut to_slot = self.slots[to].clone();
        if from_slot.is_empty() {
            return false;
        }

        if merge && self.can_stack(&from_slot, &to_slot) {
            let limit = self.stack_limit_of(&to_slot);
            let free = limit.saturating_sub(to_slot.count);
            if free > 0 {
                let moving = free.min(from_slot.count);
                to_slot.count += moving;
                from_slot.count -= moving;
                self.set_slot(to, to_slot);
                let from_slot = if from_slot.count > 0 { from_slot } else { Slot::default() };
                self.set_slot(from, from_slot);
                return true;
            }
        }

        self.set_slot(to, from_slot);
        self.set_slot(from, to_slot);
        true
    }

    /// 丢弃 `amount` 个（`None` = 整格）
    pub fn drop_items(&mut self, index: usize, amount: Option<u32>) -> bool {
        let slot = &self.slots[index];
        if slot.is_empty() {
            return false;
        }
        match amount {
            Some(amount) if amount < slot.count => {
                let mut slot = slot.clone();
                slot.count -= amount;
                self.set_slot(index, slot);
            }
            _ => self.set_slot(index, Slot::default()),
        }
        true
    }

    /// 交给 `handler` 判定；成功时可堆叠物品减一，不可堆叠物品整格清空
    pub fn use_item(&mut self, index: usize, handler: &dyn UseHandler) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let slot = self.slots[index].clone();
        let Some(item) = slot.item_id().and_then(|id| catalog.resolve(id)) else {
            return false;
        };

        let used = handler.handle_use(item);
        if used {
            if item.stackable {
                let count = slot.count - 1;
                let next = if count > 0 { Slot { count, ..slot } } else { Slot::default() };
                self.set_slot(index, next);
            } else {
                self.set_slot(index, Slot::default());
            }
        }
        used
    }

    /// 按物品描述排序；查不到描述的格子（含空格）始终排在末尾
    pub fn sort_by_item<K, F>(&mut self, key: F, ascending: bool)
    where
        K: Ord,
        F: Fn(&ItemEntry) -> K,
    {
        self.sort_with(ascending, |_, a, _, b| key(a).cmp(&key(b)));
    }

    /// 按格子本身排序；末尾规则同上
    pub fn sort_by_slot<K, F>(&mut self, key: F, ascending: bool)
    where
        K: Ord,
        F: Fn(&Slot) -> K,
    {
        self.sort_with(ascending, |a, _, b, _| key(a).cmp(&key(b)));
    }

    pub fn sort(&mut self, key: SortKey, ascending: bool) {
        match key {
            SortKey::Name => self.sort_by_item(|e| e.name.clone(), ascending),
            SortKey::Type => self.sort_by_item(|e| e.item_type, ascending),
            SortKey::Count => self.sort_by_slot(|s| s.count, ascending),
        }
    }

    /// 原样覆盖 `0..saved.len()`，不校验物品是否还存在
    pub fn restore(&mut self, saved: &[Slot]) {
        if saved.len() > self.slots.len() {
            debug!("restore: {} saved slots, grid holds {}", saved.len(), self.slots.len());
        }
        for (i, slot) in saved.iter().take(self.slots.len()).enumerate() {
            self.set_slot(i, slot.clone());
        }
    }

    /* ---------------------------- 内部 ---------------------------- */

    fn set_slot(&mut self, index: usize, slot: Slot) {
        self.slots[index] = slot;
        let slot = &self.slots[index];
        for (_, listener) in self.listeners.iter_mut() {
            listener(index, slot);
        }
    }

    fn can_stack(&self, a: &Slot, b: &Slot) -> bool {
        match (a.item_id(), b.item_id()) {
            (Some(x), Some(y)) if x == y => self.catalog.is_stackable(x),
            _ => false,
        }
    }

    fn stack_limit_of(&self, slot: &Slot) -> u32 {
        slot.item_id().map_or(1, |id| self.catalog.stack_limit(id))
    }

    fn sort_with<F>(&mut self, ascending: bool, compare: F)
    where
        F: Fn(&Slot, &ItemEntry, &Slot, &ItemEntry) -> Ordering,
    {
        let catalog = Arc::clone(&self.catalog);
        let mut sorted = self.slots.clone();
        sorted.sort_by(|a, b| {
            let item_a = a.item_id().and_then(|id| catalog.resolve(id));
            let item_b = b.item_id().and_then(|id| catalog.resolve(id));
            match (item_a, item_b) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(x), Some(y)) => {
                    let ord = compare(a, x, b, y);
                    if ascending { ord } else { ord.reverse() }
                }
            }
        });
        for (i, slot) in sorted.into_iter().enumerate() {
            self.set_slot(i, slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::database::ItemDatabase;
    use crate::data::schema::ItemType;
    use crate::inventory::handler::DefaultUseHandler;
    use std::sync::Mutex;

    fn entry(id: &str, name: &str, item_type: ItemType, stackable: bool, max_stack: u32) -> ItemEntry {
        let mut e = ItemEntry::new(id, name, item_type);
        e.stackable = stackable;
        e.max_stack = max_stack;
        e
    }

    fn catalog() -> Arc<dyn ItemCatalog> {
        Arc::new(ItemDatabase::new(vec![
            entry("potion", "Potion", ItemType::Potion, true, 5),
            entry("herb", "Herb", ItemType::Material, true, 10),
            entry("sword", "Sword", ItemType::Weapon, false, 1),
            entry("letter", "Letter", ItemType::Quest, false, 1),
        ]))
    }

    fn grid(rows: usize, cols: usize) -> InventoryGrid {
        InventoryGrid::new(catalog(), rows, cols)
    }

    fn total(grid: &InventoryGrid, id: &str) -> u32 {
        grid.slots().iter().filter(|s| s.holds(id)).map(|s| s.count).sum()
    }

    fn record(grid: &mut InventoryGrid) -> Arc<Mutex<Vec<(usize, Slot)>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        grid.subscribe(move |i, s| sink.lock().unwrap().push((i, s.clone())));
        log
    }

    fn assert_capacity_invariant(grid: &InventoryGrid) {
        for slot in grid.slots() {
            if let Some(item) = slot.item_id().and_then(|id| grid.catalog().resolve(id)) {
                assert!(slot.count >= 1 && slot.count <= item.stack_limit(), "{slot:?}");
            }
        }
    }

    #[test]
    fn new_grid_is_row_major_and_empty() {
        let g = grid(2, 3);
        assert_eq!(g.len(), 6);
        assert!(g.slots().iter().all(Slot::is_empty));
        assert_eq!(g.index_of(1, 2), Some(5));
        assert_eq!(g.index_of(2, 0), None);
        assert_eq!(g.position_of(4), Some((1, 1)));
        assert_eq!(g.position_of(6), None);
    }

    #[test]
    fn add_fills_up_to_capacity() {
        let mut g = grid(1, 3);
        assert!(g.add("potion", 15));
        assert_eq!(total(&g, "potion"), 15);
        assert!(g.slots().iter().all(|s| s.count == 5));
    }

    #[test]
    fn add_saturates_when_grid_is_too_small() {
        let mut g = grid(1, 3);
        assert!(!g.add("potion", 17));
        assert_eq!(total(&g, "potion"), 15);
        assert_capacity_invariant(&g);
    }

    #[test]
    fn add_merges_into_lowest_index_first() {
        let mut g = grid(1, 4);
        g.restore(&[Slot::default(), Slot::new("potion", 4), Slot::new("potion", 3)]);
        assert!(g.add("potion", 3));
        assert_eq!(g.slot(0), &Slot::default());
        assert_eq!(g.slot(1).count, 5);
        assert_eq!(g.slot(2).count, 5);
        assert!(g.add("potion", 1));
        assert_eq!(g.slot(0), &Slot::new("potion", 1));
    }

    #[test]
    fn add_non_stackable_takes_one_slot_each() {
        let mut g = grid(1, 3);
        assert!(g.add("sword", 2));
        assert_eq!(g.slot(0), &Slot::new("sword", 1));
        assert_eq!(g.slot(1), &Slot::new("sword", 1));
        assert!(g.slot(2).is_empty());
    }

    #[test]
    fn add_rejects_bad_input_without_effect() {
        let mut g = grid(1, 2);
        let log = record(&mut g);
        assert!(!g.add("", 1));
        assert!(!g.add("potion", 0));
        assert!(!g.add("ghost", 1));
        assert!(g.slots().iter().all(Slot::is_empty));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn add_notifies_every_written_slot() {
        let mut g = grid(1, 3);
        let log = record(&mut g);
        g.add("potion", 7);
        let log = log.lock().unwrap();
        assert_eq!(*log, vec![(0, Slot::new("potion", 5)), (1, Slot::new("potion", 2))]);
    }

    #[test]
    fn move_merges_and_drains_source() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("potion", 3), Slot::new("potion", 2)]);
        assert!(g.move_slot(0, 1, true));
        assert!(g.slot(0).is_empty());
        assert_eq!(g.slot(1), &Slot::new("potion", 5));
    }

    #[test]
    fn move_partial_merge_keeps_remainder_and_succeeds() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("potion", 4), Slot::new("potion", 3)]);
        assert!(g.move_slot(0, 1, true));
        assert_eq!(g.slot(0), &Slot::new("potion", 2));
        assert_eq!(g.slot(1), &Slot::new("potion", 5));
    }

    #[test]
    fn move_swaps_different_items() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("potion", 1), Slot::new("herb", 1)]);
        assert!(g.move_slot(0, 1, true));
        assert_eq!(g.slot(0), &Slot::new("herb", 1));
        assert_eq!(g.slot(1), &Slot::new("potion", 1));
    }

    #[test]
    fn move_swaps_when_target_full_or_merge_disabled() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("potion", 2), Slot::new("potion", 5)]);
        assert!(g.move_slot(0, 1, true));
        assert_eq!(g.slot(0), &Slot::new("potion", 5));
        assert_eq!(g.slot(1), &Slot::new("potion", 2));

        g.restore(&[Slot::new("potion", 2), Slot::new("potion", 1)]);
        assert!(g.move_slot(0, 1, false));
        assert_eq!(g.slot(0), &Slot::new("potion", 1));
        assert_eq!(g.slot(1), &Slot::new("potion", 2));
    }

    #[test]
    fn move_into_empty_slot_relocates() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("sword", 1)]);
        assert!(g.move_slot(0, 1, true));
        assert!(g.slot(0).is_empty());
        assert_eq!(g.slot(1), &Slot::new("sword", 1));
    }

    #[test]
    fn move_never_merges_non_stackables() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("sword", 1), Slot::new("sword", 1)]);
        assert!(g.move_slot(0, 1, true));
        assert_eq!(g.slot(0), &Slot::new("sword", 1));
        assert_eq!(g.slot(1), &Slot::new("sword", 1));
    }

    #[test]
    fn move_rejects_same_index_and_empty_source() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("herb", 1)]);
        let log = record(&mut g);
        assert!(!g.move_slot(0, 0, true));
        assert!(!g.move_slot(1, 0, true));
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(g.slot(0), &Slot::new("herb", 1));
    }

    #[test]
    fn drop_partial_and_overflow() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("herb", 5), Slot::new("herb", 3)]);
        assert!(g.drop_items(0, Some(2)));
        assert_eq!(g.slot(0), &Slot::new("herb", 3));
        assert!(g.drop_items(1, Some(10)));
        assert!(g.slot(1).is_empty());
        assert!(g.drop_items(0, None));
        assert!(g.slot(0).is_empty());
        assert!(!g.drop_items(0, None));
    }

    #[test]
    fn use_consumes_one_stackable_unit() {
        let mut g = grid(1, 1);
        g.restore(&[Slot::new("potion", 2)]);
        assert!(g.use_item(0, &DefaultUseHandler));
        assert_eq!(g.slot(0), &Slot::new("potion", 1));
        assert!(g.use_item(0, &DefaultUseHandler));
        assert_eq!(g.slot(0), &Slot::default());
        assert!(!g.use_item(0, &DefaultUseHandler));
    }

    #[test]
    fn use_clears_non_stackable_regardless_of_count() {
        let mut g = grid(1, 1);
        g.restore(&[Slot::new("letter", 3)]);
        assert!(g.use_item(0, &DefaultUseHandler));
        assert!(g.slot(0).is_empty());
    }

    #[test]
    fn use_failure_leaves_slot_untouched() {
        let mut g = grid(1, 2);
        g.restore(&[Slot::new("sword", 1), Slot::new("ghost", 1)]);
        let log = record(&mut g);
        assert!(!g.use_item(0, &DefaultUseHandler));
        assert!(!g.use_item(1, &|_: &ItemEntry| true));
        assert_eq!(g.slot(0), &Slot::new("sword", 1));
        assert_eq!(g.slot(1), &Slot::new("ghost", 1));
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn sort_puts_empty_and_unknown_slots_last() {
        for ascending in [true, false] {
            let mut g = grid(1, 6);
            g.restore(&[
                Slot::default(),
                Slot::new("sword", 1),
                Slot::new("ghost", 4),
                Slot::new("herb", 2),
                Slot::default(),
                Slot::new("potion", 3),
            ]);
            g.sort(SortKey::Name, ascending);
            assert!(g.slots()[..3].iter().all(|s| !s.is_empty() && !s.holds("ghost")));
            assert!(g.slots()[3..].iter().all(|s| s.is_empty() || s.holds("ghost")));
        }
    }

    #[test]
    fn sort_by_name_and_direction() {
        let mut g = grid(1, 4);
        g.restore(&[Slot::new("sword", 1), Slot::default(), Slot::new("herb", 2), Slot::new("potion", 3)]);
        g.sort(SortKey::Name, true);
        let ids: Vec<_> = g.slots().iter().map(|s| s.item_id()).collect();
        assert_eq!(ids, vec![Some("herb"), Some("potion"), Some("sword"), None]);

        g.sort(SortKey::Name, false);
        let ids: Vec<_> = g.slots().iter().map(|s| s.item_id()).collect();
        assert_eq!(ids, vec![Some("sword"), Some("potion"), Some("herb"), None]);
    }

    #[test]
    fn sort_by_type_and_count() {
        let mut g = grid(1, 4);
        g.restore(&[Slot::new("herb", 9), Slot::new("potion", 1), Slot::new("sword", 1), Slot::new("letter", 1)]);
        g.sort(SortKey::Type, true);
        let ids: Vec<_> = g.slots().iter().map(|s| s.item_id()).collect();
        assert_eq!(ids, vec![Some("sword"), Some("potion"), Some("letter"), Some("herb")]);

        g.sort(SortKey::Count, false);
        assert_eq!(g.slot(0), &Slot::new("herb", 9));
    }

    #[test]
    fn sort_notifies_every_index() {
        let mut g = grid(2, 2);
        g.add("herb", 1);
        let log = record(&mut g);
        g.sort_by_slot(|s| s.count, true);
        let indices: Vec<_> = log.lock().unwrap().iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn restore_copies_verbatim_and_clamps() {
        let mut g = grid(1, 2);
        g.add("herb", 1);
        let log = record(&mut g);
        g.restore(&[Slot::new("ghost", 7), Slot::new("herb", 2), Slot::new("potion", 1)]);
        assert_eq!(g.slot(0), &Slot::new("ghost", 7));
        assert_eq!(g.slot(1), &Slot::new("herb", 2));
        assert_eq!(log.lock().unwrap().len(), 2);

        g.restore(&[Slot::default()]);
        assert!(g.slot(0).is_empty());
        assert_eq!(g.slot(1), &Slot::new("herb", 2));
    }

    #[test]
    fn snapshot_rebuilds_an_equal_grid() {
        let mut g = grid(2, 3);
        g.add("potion", 7);
        g.add("sword", 1);
        let snap = g.snapshot();
        let rebuilt = InventoryGrid::from_snapshot(catalog(), &snap);
        assert_eq!(rebuilt.rows(), 2);
        assert_eq!(rebuilt.cols(), 3);
        assert_eq!(rebuilt.slots(), g.slots());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let mut g = grid(1, 2);
        let log = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&log);
        let id = g.subscribe(move |_, _| *sink.lock().unwrap() += 1);
        g.add("herb", 1);
        assert!(g.unsubscribe(id));
        assert!(!g.unsubscribe(id));
        g.add("herb", 1);
        assert_eq!(*log.lock().unwrap(), 1);
    }

    #[test]
    fn capacity_invariant_survives_mixed_operations() {
        let mut g = grid(2, 3);
        g.add("potion", 8);
        g.add("herb", 14);
        g.add("sword", 2);
        g.move_slot(0, 1, true);
        g.move_slot(2, 3, true);
        g.drop_items(4, Some(1));
        g.use_item(1, &DefaultUseHandler);
        g.sort(SortKey::Count, false);
        g.add("potion", 30);
        assert_capacity_invariant(&g);
    }
}
