use std::collections::HashMap;

use model::{LikePair, MessageTable, UNKNOWN_NAME};

use crate::aggregate::name_map;

/// Counts, for every (sender, liker) pair, how many of the sender's
/// messages the liker favorited. Sorted by count descending, ties in
/// first-seen order. Identifiers that never sent a message map to the
/// "unknown" sentinel instead of being dropped.
pub fn like_pairs(table: &MessageTable) -> Vec<LikePair> {
    let names = name_map(table);
    let mut order: Vec<(&str, &str)> = Vec::new();
    let mut counts: HashMap<(&str, &str), u64> = HashMap::new();
    for row in table.rows() {
        if row.favorited_by.is_empty() {
            continue;
        }
        for liker in &row.favorited_by {
            let key = (row.sender_id.as_str(), liker.as_str());
            let entry = counts.entry(key).or_insert_with(|| {
                order.push(key);
                0
            });
            *entry += 1;
        }
    }

    let mut pairs: Vec<LikePair> = order
        .into_iter()
        .map(|key| LikePair {
            sender: names.get(key.0).copied().unwrap_or(UNKNOWN_NAME).to_string(),
            liker: names.get(key.1).copied().unwrap_or(UNKNOWN_NAME).to_string(),
            count: counts[&key],
        })
        .collect();
    pairs.sort_by(|a, b| b.count.cmp(&a.count));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::Message;

    fn message(id: &str, sender: &str, created_at: i64, likers: &[&str]) -> Message {
        Message {
            id: id.to_string(),
            name: format!("user-{sender}"),
            sender_id: sender.to_string(),
            user_id: sender.to_string(),
            text: Some("hello".to_string()),
            created_at,
            favorited_by: likers.iter().map(|usr| usr.to_string()).collect(),
        }
    }

    #[test]
    fn no_likes_means_no_pairs() {
        let table = MessageTable::build(
            vec![message("1", "A", 200, &[]), message("2", "B", 100, &[])],
            false,
        )
        .unwrap();

        assert!(like_pairs(&table).is_empty());
    }

    #[test]
    fn counts_distinct_messages_per_pair() {
        let table = MessageTable::build(
            vec![
                message("1", "A", 300, &["B"]),
                message("2", "A", 200, &["B", "C"]),
                message("3", "B", 100, &["A"]),
            ],
            false,
        )
        .unwrap();

        let pairs = like_pairs(&table);
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].sender, "user-A");
        assert_eq!(pairs[0].liker, "user-B");
        assert_eq!(pairs[0].count, 2);
        assert!(pairs.iter().all(|pair| pair.count >= pairs[2].count));
    }

    #[test]
    fn liker_without_messages_maps_to_unknown() {
        let table =
            MessageTable::build(vec![message("1", "A", 100, &["lurker"])], false).unwrap();

        let pairs = like_pairs(&table);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].sender, "user-A");
        assert_eq!(pairs[0].liker, UNKNOWN_NAME);
    }

    #[test]
    fn self_pairs_vanish_under_suppression() {
        let table =
            MessageTable::build(vec![message("1", "A", 100, &["A", "B"])], true).unwrap();

        let pairs = like_pairs(&table);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].liker, "user-B");
    }
}
