//! Built-in level maps
//!
//! Map text: one row per line, space-separated entity codes
//! (`0` empty, `1` wall, `3` goal, `4` coin).

/// Walls only, no coins or goal. Good for learning how sliding works.
pub const PRACTICE: &str = "
    1 1 1 1 1 1 1 1 1 1
    1 0 0 0 0 1 0 0 1 1
    1 0 0 0 0 1 0 0 0 1
    1 1 0 0 0 0 0 0 1 1
    1 1 1 0 0 0 0 0 0 1
    1 1 0 0 0 0 0 0 0 1
    1 0 0 0 1 0 0 0 0 1
    1 0 0 0 0 0 0 1 0 1
    1 0 1 0 0 0 0 0 0 1
    1 1 1 1 1 1 1 1 1 1
";

/// Coins along the way down, goal at the bottom.
pub const DESCENT: &str = "
    1 1 1 1 1 1 1 1 1 1
    1 0 0 4 0 1 0 0 1 1
    1 0 0 0 0 1 0 4 0 1
    1 1 0 0 0 0 0 0 1 1
    1 1 1 4 0 0 1 0 0 1
    1 1 0 0 0 0 0 0 0 1
    1 0 0 0 1 0 4 0 0 1
    1 4 0 0 0 0 0 1 0 1
    1 0 1 0 0 0 0 0 0 1
    1 1 1 1 1 1 3 1 1 1
";

/// Look up a built-in level by name
pub fn by_name(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "practice" => Some(PRACTICE),
        "descent" => Some(DESCENT),
        _ => None,
    }
}
