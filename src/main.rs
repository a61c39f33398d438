use bevy::prelude::*;

use bevy_inventory::core::{events::forward_log_event, states::AppState, CorePlugin};
use bevy_inventory::data::DataPlugin;
use bevy_inventory::interface::debug_cli::DebugCliPlugin;
use bevy_inventory::inventory::InventoryPlugin;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                visible: false,
                ..default()
            }),   // 不显示窗口，实现“无 UI”
            ..default()
        }))
        .add_plugins(CorePlugin)
        .add_plugins(DataPlugin)
        .add_plugins(InventoryPlugin)
        .add_plugins(DebugCliPlugin)
        .add_systems(Update, forward_log_event)
        .add_systems(Startup, |mut next: ResMut<NextState<AppState>>| {
            next.set(AppState::Loading);
        })
        .run();
}
