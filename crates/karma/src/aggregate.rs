use std::collections::HashMap;

use model::{AggregateSeries, MessageRow, MessageTable, UNKNOWN_NAME};

/// Display name per sender, first occurrence in table order winning. The
/// table is newest-first, so a renamed user shows up under their current
/// name.
pub(crate) fn name_map(table: &MessageTable) -> HashMap<&str, &str> {
    let mut names = HashMap::new();
    for row in table.rows() {
        names.entry(row.sender_id.as_str()).or_insert(row.name.as_str());
    }
    names
}

/// Likes received per sender, indexed by display name.
pub fn total_likes(table: &MessageTable) -> AggregateSeries {
    grouped(table, |row| row.total_likes)
}

/// Messages sent per sender, indexed by display name.
pub fn total_messages(table: &MessageTable) -> AggregateSeries {
    grouped(table, |_| 1)
}

fn grouped(table: &MessageTable, metric: impl Fn(&MessageRow) -> u64) -> AggregateSeries {
    let names = name_map(table);
    let mut order: Vec<&str> = Vec::new();
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for row in table.rows() {
        let entry = totals.entry(row.sender_id.as_str()).or_insert_with(|| {
            order.push(row.sender_id.as_str());
            0
        });
        *entry += metric(row);
    }

    let mut series = AggregateSeries::default();
    for sender in order {
        let name = names.get(sender).copied().unwrap_or(UNKNOWN_NAME);
        series.push(name.to_string(), totals[sender]);
    }
    series
}
