use std::collections::HashMap;

use super::schema::ItemEntry;
use crate::inventory::catalog::ItemCatalog;

/// 全部物品的注册表：构造时一次性建好 id 索引
#[derive(Debug, Default)]
pub struct ItemDatabase {
    items: Vec<ItemEntry>,
    by_id: HashMap<String, usize>,
}

impl ItemDatabase {
    pub fn new(items: Vec<ItemEntry>) -> Self {
        let mut by_id = HashMap::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            if item.id.is_empty() {
                continue;
            }
            // 重复 id 保留第一条
            by_id.entry(item.id.clone()).or_insert(idx);
        }
        Self { items, by_id }
    }

    pub fn items(&self) -> &[ItemEntry] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// 按 id / 名称（忽略大小写）查找
    pub fn find(&self, token: &str) -> Option<&ItemEntry> {
        self.resolve(token).or_else(|| {
            self.items.iter().find(|e| {
                e.id.eq_ignore_ascii_case(token) || e.name.eq_ignore_ascii_case(token)
            })
        })
    }
}

impl ItemCatalog for ItemDatabase {
    fn resolve(&self, id: &str) -> Option<&ItemEntry> {
        self.by_id.get(id).map(|&idx| &self.items[idx])
    }
}
