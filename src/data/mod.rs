pub mod database;
pub mod loader;
pub mod schema;

use bevy::prelude::*;
use std::sync::Arc;

use crate::core::{config::InventoryConfig, states::AppState};
use database::ItemDatabase;
use schema::ItemList;

// --------------------------- 资源 ---------------------------
#[derive(Resource, Default)]
pub struct ItemAssets {
    handle: Option<Handle<ItemList>>,
}

/// 加载完成后的物品注册表，背包与 CLI 共享
#[derive(Resource, Clone)]
pub struct LoadedCatalog(pub Arc<ItemDatabase>);

// --------------------------- 插件 ---------------------------
pub struct DataPlugin;
impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app
            // 注册资产类型 & Loader
            .init_asset::<ItemList>()
            .register_asset_loader(loader::RonItemLoader)
            .init_resource::<ItemAssets>()
            // Loading 流程
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(
                Update,
                check_loaded.run_if(in_state(AppState::Loading)),
            );
    }
}

// --------------------------- 系统 ---------------------------
fn start_loading(
    mut item_assets: ResMut<ItemAssets>,
    asset_server: Res<AssetServer>,
    config: Res<InventoryConfig>,
) {
    let handle: Handle<ItemList> = asset_server.load(config.item_list.clone());
    item_assets.handle = Some(handle);
}

fn check_loaded(
    mut commands: Commands,
    mut next: ResMut<NextState<AppState>>,
    item_assets: Res<ItemAssets>,
    lists: Res<Assets<ItemList>>,
) {
    if let Some(list) = item_assets.handle.as_ref().and_then(|h| lists.get(h)) {
        let db = ItemDatabase::new(list.items.clone());
        info!("Items loaded: {}", db.len());
        commands.insert_resource(LoadedCatalog(Arc::new(db)));
        next.set(AppState::InGame);
    }
}
