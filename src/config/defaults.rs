//! Default values for configuration fields

use std::collections::HashMap;

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_port() -> u16 {
    8000
}

pub fn default_regions() -> Vec<String> {
    ["local", "us_east", "us_west", "ca", "uk"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn default_refresh_interval() -> String {
    "2h".to_string()
}

pub fn default_window_count() -> usize {
    3
}

pub fn default_window_minutes() -> u32 {
    720
}

pub fn default_group_size() -> usize {
    100
}

/// Per-region display-number offsets applied when building the combined
/// directory, keeping each region in a recognizable numbering block.
pub fn default_number_offsets() -> HashMap<String, u32> {
    HashMap::from([
        ("ca".to_string(), 6000),
        ("uk".to_string(), 7000),
        ("fr".to_string(), 8000),
    ])
}
