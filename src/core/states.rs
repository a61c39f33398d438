use bevy::prelude::*;

/// 应用阶段：物品表加载完才进入游戏
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Startup,
    Loading,
    InGame,
}
