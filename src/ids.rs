use chrono::Utc;

/// Generate a unique string id: `{prefix}_{millis}_{9 random alphanumerics}`.
///
/// Collision-safe enough for a single-operator console; ids only need to be
/// unique within one store.
pub fn fresh_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = std::iter::repeat_with(fastrand::alphanumeric)
        .take(9)
        .collect();
    format!("{}_{}_{}", prefix, millis, suffix.to_lowercase())
}
