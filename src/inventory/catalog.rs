use crate::data::schema::ItemEntry;

/// 物品 id → 静态描述。实现必须是纯查询：同一 id 多次调用结果相同
pub trait ItemCatalog: Send + Sync {
    fn resolve(&self, id: &str) -> Option<&ItemEntry>;

    /// 查不到的物品按不可堆叠处理
    fn stack_limit(&self, id: &str) -> u32 {
        self.resolve(id).map_or(1, ItemEntry::stack_limit)
    }

    fn is_stackable(&self, id: &str) -> bool {
        self.resolve(id).is_some_and(|e| e.stackable)
    }
}
