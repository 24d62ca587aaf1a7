use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::Date;

/// A customer row as stored by the backend. All fields are free-text; a
/// valid quotation requires a non-empty name, phone and address, which the
/// composer checks before writing anything.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub alternate_phone: Option<String>,
    pub address: String,
}

/// A quote row. Exactly one customer per quote; the date carries no time
/// component and is only ever formatted for display.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Quote {
    pub id: String,
    pub customer_id: String,
    pub quote_date: Date,
}

/// A quote item row. The room name is free text matched by string equality,
/// not a foreign key. Only items with `is_selected` set take part in the
/// rendered document.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct QuoteItem {
    pub room_name: String,
    pub item_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default = "default_selected")]
    pub is_selected: bool,
}

fn default_selected() -> bool {
    true
}

impl QuoteItem {
    /// The quantity as rendered: any unset or non-positive value coerces to 1.
    pub fn effective_quantity(&self) -> i64 {
        match self.quantity {
            Some(quantity) if quantity > 0 => quantity,
            _ => 1,
        }
    }
}

/// The read-only aggregate handed to the composer: the customer, the quote
/// and the selected items grouped by room. The grouping is insertion-ordered,
/// preserving the order rooms and items were encountered in the source list
/// (which the upstream query sorts by room name then item name); the bundle
/// never re-sorts.
#[derive(Debug, Clone)]
pub struct QuotationBundle {
    pub customer: Customer,
    pub quote: Quote,
    pub items_by_room: IndexMap<String, Vec<QuoteItem>>,
}

impl QuotationBundle {
    /// Groups an already-sorted item list by room. Rows without the selected
    /// flag are skipped, mirroring the upstream `is_selected = true` filter.
    pub fn from_rows(customer: Customer, quote: Quote, items: Vec<QuoteItem>) -> Self {
        let mut items_by_room: IndexMap<String, Vec<QuoteItem>> = IndexMap::new();
        for item in items {
            if !item.is_selected {
                continue;
            }
            items_by_room
                .entry(item.room_name.clone())
                .or_default()
                .push(item);
        }

        QuotationBundle {
            customer,
            quote,
            items_by_room,
        }
    }

    pub fn selected_item_count(&self) -> usize {
        self.items_by_room.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn item(room: &str, name: &str) -> QuoteItem {
        QuoteItem {
            room_name: room.to_string(),
            item_name: name.to_string(),
            description: None,
            quantity: None,
            is_selected: true,
        }
    }

    fn customer() -> Customer {
        Customer {
            name: "A. Sharma".to_string(),
            phone: "9999999999".to_string(),
            alternate_phone: None,
            address: "12 MG Road".to_string(),
        }
    }

    fn quote() -> Quote {
        Quote {
            id: "q-1".to_string(),
            customer_id: "c-1".to_string(),
            quote_date: date!(2025 - 03 - 05),
        }
    }

    #[test]
    fn grouping_preserves_encounter_order() {
        let items = vec![
            item("Bedroom", "Bed"),
            item("Bedroom", "Wardrobe"),
            item("Kitchen", "Cabinet"),
            item("Living Room", "Sofa"),
        ];
        let bundle = QuotationBundle::from_rows(customer(), quote(), items);

        let rooms: Vec<&str> = bundle.items_by_room.keys().map(String::as_str).collect();
        assert_eq!(rooms, ["Bedroom", "Kitchen", "Living Room"]);
        assert_eq!(bundle.selected_item_count(), 4);
        assert_eq!(bundle.items_by_room["Bedroom"][1].item_name, "Wardrobe");
    }

    #[test]
    fn unselected_items_are_excluded() {
        let mut skipped = item("Kitchen", "Chimney");
        skipped.is_selected = false;
        let bundle =
            QuotationBundle::from_rows(customer(), quote(), vec![skipped, item("Kitchen", "Hob")]);

        assert_eq!(bundle.selected_item_count(), 1);
        assert_eq!(bundle.items_by_room["Kitchen"][0].item_name, "Hob");
    }

    #[test]
    fn quantity_coercion() {
        let mut quote_item = item("Kitchen", "Cabinet");
        assert_eq!(quote_item.effective_quantity(), 1);
        quote_item.quantity = Some(0);
        assert_eq!(quote_item.effective_quantity(), 1);
        quote_item.quantity = Some(-3);
        assert_eq!(quote_item.effective_quantity(), 1);
        quote_item.quantity = Some(5);
        assert_eq!(quote_item.effective_quantity(), 5);
    }

    #[test]
    fn rows_deserialize_from_backend_json() {
        let raw = r#"{
            "id": "b6f6",
            "quote_id": "q-1",
            "room_name": "Kitchen",
            "item_name": "Modular Cabinet",
            "description": "Soft-close hinges\nMatte finish",
            "quantity": 2,
            "is_selected": true
        }"#;
        let row: QuoteItem = serde_json::from_str(raw).unwrap();
        assert_eq!(row.item_name, "Modular Cabinet");
        assert_eq!(row.effective_quantity(), 2);

        let raw_quote = r#"{ "id": "q-1", "customer_id": "c-1", "quote_date": "2025-03-05" }"#;
        let quote: Quote = serde_json::from_str(raw_quote).unwrap();
        assert_eq!(quote.quote_date, date!(2025 - 03 - 05));
    }
}
