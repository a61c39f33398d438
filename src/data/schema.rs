use bevy::asset::Asset;
use bevy::reflect::TypePath;
use serde_derive::{Deserialize, Serialize};

/// 物品大类，排序时按声明顺序比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Weapon,
    Potion,
    Quest,
    #[default]
    Material,
}

/// 静态物品表条目（只读描述）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id:   String,
    pub name: String,
    #[serde(default)] pub item_type: ItemType,
    #[serde(default = "default_stackable")] pub stackable: bool,
    #[serde(default = "default_max_stack")] pub max_stack: u32,
    // 以下仅用于展示
    #[serde(default)] pub description: String,
    #[serde(default)] pub icon: Option<String>,
}

fn default_stackable() -> bool {
    true
}

fn default_max_stack() -> u32 {
    99
}

impl ItemEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type,
            stackable: default_stackable(),
            max_stack: default_max_stack(),
            description: String::new(),
            icon: None,
        }
    }

    /// 单格上限：可堆叠取 max_stack（至少 1），否则固定 1
    pub fn stack_limit(&self) -> u32 {
        if self.stackable { self.max_stack.max(1) } else { 1 }
    }
}

#[derive(Asset, TypePath, Deserialize, Debug)]
pub struct ItemList {
    pub items: Vec<ItemEntry>,
}
