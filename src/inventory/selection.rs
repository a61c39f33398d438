use bevy::prelude::Resource;

/// 当前选中的格子（纯 UI 便利，不参与背包规则）
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<usize>,
}

impl Selection {
    pub fn select(&mut self, index: usize) {
        self.selected = Some(index);
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_and_clear() {
        let mut sel = Selection::default();
        assert!(!sel.has_selection());
        sel.select(3);
        assert_eq!(sel.selected(), Some(3));
        sel.select(1);
        assert_eq!(sel.selected(), Some(1));
        sel.clear();
        assert_eq!(sel.selected(), None);
    }
}
