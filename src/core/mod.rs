use bevy::prelude::*;

pub mod config;
pub mod events;
pub mod states;

use config::{CONFIG_PATH, InventoryConfig};

/// 核心插件：注册全局资源 / 事件 / 状态
pub struct CorePlugin;

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        use states::AppState;

        let config = InventoryConfig::load(CONFIG_PATH).unwrap_or_else(|err| {
            warn!("{err}，使用默认背包配置");
            InventoryConfig::default()
        });
        info!("Inventory grid {}x{}", config.rows, config.cols);

        app
            .init_state::<AppState>()
            .add_event::<events::LogEvent>()
            .insert_resource(config);
    }
}
