use super::{components::*, events::*};
use super::catalog::ItemCatalog;
use super::grid::{InventoryGrid, SortKey};
use super::handler::DefaultUseHandler;
use super::selection::Selection;
use crate::core::{config::InventoryConfig, events::LogEvent};
use crate::data::LoadedCatalog;
use bevy::prelude::*;

/// 进入游戏时按配置建背包，并把每次改格写进缓冲
pub fn spawn_inventory(
    mut commands: Commands,
    config: Res<InventoryConfig>,
    catalog: Res<LoadedCatalog>,
    queue: Res<SlotChangeQueue>,
) {
    let mut grid = InventoryGrid::new(catalog.0.clone(), config.rows, config.cols);
    let queue = (*queue).clone();
    grid.subscribe(move |index, slot| queue.push(index, slot));
    commands.insert_resource(grid);
}

/// 校验索引，越界时提示
fn checked_index(grid: &InventoryGrid, index: usize, log: &mut EventWriter<LogEvent>) -> Option<usize> {
    if index < grid.len() {
        Some(index)
    } else {
        log.write(LogEvent(format!("背包索引超出范围: {index} (共 {} 格)", grid.len())));
        None
    }
}

/// 事件里没给索引就用当前选中格
fn target_index(
    index: Option<usize>,
    selection: &Selection,
    grid: &InventoryGrid,
    log: &mut EventWriter<LogEvent>,
) -> Option<usize> {
    match index.or(selection.selected()) {
        Some(i) => checked_index(grid, i, log),
        None => {
            log.write(LogEvent("未选中任何格子".into()));
            None
        }
    }
}

fn item_name(grid: &InventoryGrid, id: &str) -> String {
    grid.catalog()
        .resolve(id)
        .map_or_else(|| id.to_string(), |e| e.name.clone())
}

/// 处理"give"——往背包里放物品
pub fn give_item(
    mut ev_give: EventReader<GiveItemEvent>,
    mut grid: ResMut<InventoryGrid>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_give.read() {
        let Some(name) = grid.catalog().resolve(&ev.id).map(|e| e.name.clone()) else {
            warn!("不存在物品 ID {}", ev.id);
            log.write(LogEvent(format!("不存在物品 ID {}", ev.id)));
            continue;
        };

        if grid.add(&ev.id, ev.count) {
            info!("获得 {} ×{}", name, ev.count);
            log.write(LogEvent(format!("获得 {} ×{}", name, ev.count)));
        } else {
            warn!("背包已满，{} 未能全部放入", name);
            log.write(LogEvent(format!("背包已满，{name} 未能全部放入")));
        }
    }
}

pub fn move_item(
    mut ev_move: EventReader<MoveItemEvent>,
    mut grid: ResMut<InventoryGrid>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_move.read() {
        let (Some(from), Some(to)) = (
            checked_index(&grid, ev.from, &mut log),
            checked_index(&grid, ev.to, &mut log),
        ) else {
            continue;
        };
        if !grid.move_slot(from, to, ev.merge) {
            log.write(LogEvent(format!("无法从 [{from}] 移动到 [{to}]")));
        }
    }
}

pub fn drop_item(
    mut ev_drop: EventReader<DropItemEvent>,
    mut grid: ResMut<InventoryGrid>,
    mut selection: ResMut<Selection>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_drop.read() {
        let Some(index) = target_index(ev.index, &selection, &grid, &mut log) else {
            continue;
        };
        let dropped = grid.slot(index).clone();
        if grid.drop_items(index, ev.amount) {
            let amount = ev.amount.map_or(dropped.count, |a| a.min(dropped.count));
            let name = item_name(&grid, dropped.item_id().unwrap_or_default());
            log.write(LogEvent(format!("丢弃 {name} ×{amount}")));
        } else {
            log.write(LogEvent("该背包格为空".into()));
        }
        // 通过选中格丢弃后取消选中
        if ev.index.is_none() {
            selection.clear();
        }
    }
}

/// 使用物品
pub fn use_item(
    mut ev_use: EventReader<UseItemEvent>,
    mut grid: ResMut<InventoryGrid>,
    selection: Res<Selection>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_use.read() {
        let Some(index) = target_index(ev.index, &selection, &grid, &mut log) else {
            continue;
        };
        let Some(id) = grid.slot(index).item_id().map(str::to_string) else {
            log.write(LogEvent("该背包格为空".into()));
            continue;
        };
        let name = item_name(&grid, &id);
        if grid.use_item(index, &DefaultUseHandler) {
            log.write(LogEvent(format!("使用了 {name}")));
        } else {
            log.write(LogEvent(format!("{name} 无法使用")));
        }
    }
}

pub fn select_slot(
    mut ev_select: EventReader<SelectSlotEvent>,
    grid: Res<InventoryGrid>,
    mut selection: ResMut<Selection>,
    mut log: EventWriter<LogEvent>,
) {
    for SelectSlotEvent(index) in ev_select.read() {
        match index {
            Some(i) => {
                if let Some(i) = checked_index(&grid, *i, &mut log) {
                    selection.select(i);
                    log.write(LogEvent(format!("选中 [{i}]")));
                }
            }
            None => selection.clear(),
        }
    }
}

pub fn sort_inventory(
    mut ev_sort: EventReader<SortInventoryEvent>,
    mut grid: ResMut<InventoryGrid>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_sort.read() {
        grid.sort(ev.key, ev.ascending);
        let key = match ev.key {
            SortKey::Name => "名称",
            SortKey::Type => "类型",
            SortKey::Count => "数量",
        };
        let order = if ev.ascending { "升序" } else { "降序" };
        log.write(LogEvent(format!("已按{key}{order}整理")));
    }
}

pub fn handle_snapshot(
    mut ev_snapshot: EventReader<SnapshotEvent>,
    mut grid: ResMut<InventoryGrid>,
    mut saved: ResMut<SavedInventory>,
    mut log: EventWriter<LogEvent>,
) {
    for ev in ev_snapshot.read() {
        match ev {
            SnapshotEvent::Save => {
                saved.0 = Some(grid.snapshot());
                log.write(LogEvent("背包已保存".into()));
            }
            SnapshotEvent::Load => match &saved.0 {
                Some(snap) if snap.rows == grid.rows() && snap.cols == grid.cols() => {
                    grid.restore(&snap.slots);
                    log.write(LogEvent("背包已读取".into()));
                }
                Some(snap) => {
                    warn!(
                        "存档尺寸 {}x{} 与背包 {}x{} 不符",
                        snap.rows,
                        snap.cols,
                        grid.rows(),
                        grid.cols()
                    );
                    log.write(LogEvent("存档尺寸不符，未读取".into()));
                }
                None => {
                    log.write(LogEvent("没有存档".into()));
                }
            },
            SnapshotEvent::Dump => match serde_json::to_string_pretty(&grid.snapshot()) {
                Ok(json) => {
                    log.write(LogEvent(json));
                }
                Err(err) => warn!("无法序列化背包: {err}"),
            },
        }
    }
}

/// 打印背包内容
pub fn print_inventory(
    mut ev_list: EventReader<ListInventoryEvent>,
    grid: Res<InventoryGrid>,
    selection: Res<Selection>,
    mut log: EventWriter<LogEvent>,
) {
    if ev_list.is_empty() {
        return;
    }
    ev_list.clear();

    let mut empty = true;
    for (idx, slot) in grid.slots().iter().enumerate() {
        let Some(id) = slot.item_id() else {
            continue;
        };
        empty = false;
        let (row, col) = grid.position_of(idx).unwrap_or_default();
        let mark = if selection.selected() == Some(idx) { "*" } else { " " };
        log.write(LogEvent(format!(
            "{mark}[{idx}] ({row},{col}) {} ×{} (id={id})",
            item_name(&grid, id),
            slot.count
        )));
    }

    if empty {
        log.write(LogEvent("  (empty)".into()));
    }
}

/// 把监听者缓冲的改格记录转成事件
pub fn forward_slot_changes(queue: Res<SlotChangeQueue>, mut writer: EventWriter<SlotChanged>) {
    for (index, slot) in queue.drain() {
        writer.write(SlotChanged { index, slot });
    }
}

pub fn log_slot_changes(mut reader: EventReader<SlotChanged>) {
    for ev in reader.read() {
        debug!("slot [{}] -> {:?} ×{}", ev.index, ev.slot.item_id(), ev.slot.count);
    }
}
