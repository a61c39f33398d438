use serde_derive::{Deserialize, Serialize};

/// 背包中的一格：物品 id + 数量
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub count: u32,
}

impl Slot {
    pub fn new(item_id: impl Into<String>, count: u32) -> Self {
        Self {
            item_id: Some(item_id.into()),
            count,
        }
    }

    /// id 缺失 / 为空串 / 数量为 0 都算空格
    pub fn is_empty(&self) -> bool {
        self.count == 0 || self.item_id.as_deref().is_none_or(str::is_empty)
    }

    /// 非空格的物品 id
    pub fn item_id(&self) -> Option<&str> {
        if self.is_empty() { None } else { self.item_id.as_deref() }
    }

    pub fn holds(&self, item_id: &str) -> bool {
        self.item_id() == Some(item_id)
    }
}
