//! Helpers for generating unique test data.

use uuid::Uuid;

/// A unique string in the format `{prefix}-{uuid}`.
///
/// ```
/// use liap_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("room");
/// assert_ne!(a, unique_str("room"));
/// assert!(a.starts_with("room-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Four distinct seat names sharing `prefix`.
pub fn unique_seat_names(prefix: &str) -> [String; 4] {
    let tag = Uuid::new_v4().simple().to_string();
    let short = &tag[..8];
    ["n", "e", "s", "w"].map(|seat| format!("{prefix}-{seat}-{short}"))
}
