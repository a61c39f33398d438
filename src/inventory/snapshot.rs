use serde_derive::{Deserialize, Serialize};

use super::slot::Slot;

/// 存档形状：尺寸 + 行优先的全部格子
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    pub rows: usize,
    pub cols: usize,
    pub slots: Vec<Slot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_shape_has_rows_cols_slots() {
        let snap = InventorySnapshot {
            rows: 1,
            cols: 2,
            slots: vec![Slot::new("herb", 3), Slot::default()],
        };
        let value = serde_json::to_value(&snap).unwrap();
        assert_eq!(value["rows"], 1);
        assert_eq!(value["cols"], 2);
        assert_eq!(value["slots"][0]["item_id"], "herb");
        assert_eq!(value["slots"][0]["count"], 3);
        assert!(value["slots"][1]["item_id"].is_null());
    }

    #[test]
    fn missing_slot_fields_read_as_empty() {
        let snap: InventorySnapshot =
            serde_json::from_str(r#"{"rows":1,"cols":2,"slots":[{},{"item_id":"herb","count":2}]}"#).unwrap();
        assert!(snap.slots[0].is_empty());
        assert_eq!(snap.slots[1], Slot::new("herb", 2));
    }
}
