pub mod catalog;
pub mod components;
pub mod events;
pub mod grid;
pub mod handler;
pub mod selection;
pub mod slot;
pub mod snapshot;
mod systems;

use bevy::prelude::*;
use crate::core::states::AppState;
use components::*;
use events::*;
use selection::Selection;
use systems::*;

pub use catalog::ItemCatalog;
pub use grid::{InventoryGrid, ListenerId, SortKey};
pub use handler::{DefaultUseHandler, UseHandler};
pub use slot::Slot;
pub use snapshot::InventorySnapshot;

pub struct InventoryPlugin;
impl Plugin for InventoryPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<SlotChangeQueue>()
            .init_resource::<SavedInventory>()
            .init_resource::<Selection>()
            .add_event::<GiveItemEvent>()
            .add_event::<MoveItemEvent>()
            .add_event::<DropItemEvent>()
            .add_event::<UseItemEvent>()
            .add_event::<SelectSlotEvent>()
            .add_event::<SortInventoryEvent>()
            .add_event::<SnapshotEvent>()
            .add_event::<ListInventoryEvent>()
            .add_event::<SlotChanged>()
            .add_systems(OnEnter(AppState::InGame), spawn_inventory)
            // 顺序执行：先改背包，再统一转发改格事件
            .add_systems(
                Update,
                (
                    give_item,
                    move_item,
                    drop_item,
                    use_item,
                    select_slot,
                    sort_inventory,
                    handle_snapshot,
                    print_inventory,
                    forward_slot_changes,
                    log_slot_changes,
                )
                    .chain()
                    .run_if(in_state(AppState::InGame)),
            );
    }
}
