//! Record identifiers: `<prefix>_<epoch-ms>`, plus a random base36 suffix
//! for notifications, which can be created several per millisecond.

use chrono::{DateTime, Utc};
use uuid::Uuid;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// `<prefix>_<epoch-ms>`, bumped one millisecond at a time until `taken`
/// no longer matches.
pub fn stamped_id(prefix: &str, now: DateTime<Utc>, taken: impl Fn(&str) -> bool) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let id = format!("{prefix}_{millis}");
        if !taken(&id) {
            return id;
        }
        millis += 1;
    }
}

/// `notif_<epoch-ms>_<9 base36 chars>`.
pub fn notification_id(now: DateTime<Utc>) -> String {
    format!("notif_{}_{}", now.timestamp_millis(), random_base36(SUFFIX_LEN))
}

fn random_base36(len: usize) -> String {
    let mut bits = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        out.push(BASE36[(bits % 36) as usize] as char);
        bits /= 36;
    }
    out
}
