//! JSON payload builders in the market API's shapes.

use serde_json::{json, Value};

/// One order record.
pub fn order(order_id: u64, type_id: u32, is_buy: bool, price: f64) -> Value {
    json!({
        "order_id": order_id,
        "type_id": type_id,
        "location_id": 60_003_760u64,
        "system_id": 30_000_142u64,
        "is_buy_order": is_buy,
        "price": price,
        "volume_remain": 10,
        "volume_total": 10,
        "min_volume": 1,
        "range": "region",
        "duration": 90,
        "issued": "2024-05-01T12:00:00Z"
    })
}

/// One adjusted/average price record.
pub fn price(type_id: u32, adjusted: f64, average: f64) -> Value {
    json!({ "type_id": type_id, "adjusted_price": adjusted, "average_price": average })
}

/// Industry cost indices of one system.
pub fn cost_indices(system_id: u64, entries: &[(&str, f64)]) -> Value {
    let indices: Vec<Value> = entries
        .iter()
        .map(|(activity, index)| json!({ "activity": activity, "cost_index": index }))
        .collect();
    json!({ "solar_system_id": system_id, "cost_indices": indices })
}

/// One public contract.
pub fn contract(contract_id: u64, price: f64) -> Value {
    json!({
        "contract_id": contract_id,
        "type": "item_exchange",
        "issuer_id": 90_000_001u64,
        "price": price,
        "date_issued": "2024-05-01T12:00:00Z",
        "date_expired": "2024-05-15T12:00:00Z"
    })
}

/// One day of history.
pub fn history_day(date: &str, average: f64) -> Value {
    json!({
        "date": date,
        "average": average,
        "highest": average * 1.1,
        "lowest": average * 0.9,
        "order_count": 12,
        "volume": 3400
    })
}

/// A station record.
pub fn station(name: &str) -> Value {
    json!({ "name": name, "system_id": 30_000_142u64 })
}

/// Serialize a list of values as a response body.
pub fn body(values: &[Value]) -> String {
    Value::Array(values.to_vec()).to_string()
}
