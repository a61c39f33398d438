use bevy::log::info;

use crate::data::schema::{ItemEntry, ItemType};

/// 决定一次"使用"是否成功；消耗多少由背包决定
pub trait UseHandler {
    fn handle_use(&self, item: &ItemEntry) -> bool;
}

impl<F> UseHandler for F
where
    F: Fn(&ItemEntry) -> bool,
{
    fn handle_use(&self, item: &ItemEntry) -> bool {
        self(item)
    }
}

/// 默认规则：武器不消耗，其余都算用掉
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUseHandler;

impl UseHandler for DefaultUseHandler {
    fn handle_use(&self, item: &ItemEntry) -> bool {
        match item.item_type {
            ItemType::Weapon => {
                info!("{} 是武器，无法直接使用", item.name);
                false
            }
            ItemType::Potion => {
                info!("使用 {}，恢复生命值", item.name);
                true
            }
            ItemType::Quest | ItemType::Material => {
                info!("使用 {}", item.name);
                true
            }
        }
    }
}
