use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Hot,
    Warm,
    Cold,
}

/// Buckets a temperature by tens after truncating it toward zero.
///
/// Only the 20s are `Warm` and only the 30s and 40s are `Hot`. Everything else,
/// negatives and 50 and above included, is `Cold`.
pub fn categorize(temperature: f64) -> Category {
    // `as` truncates toward zero and saturates, NaN becomes 0.
    match temperature as i32 / 10 {
        3 | 4 => Category::Hot,
        2 => Category::Warm,
        _ => Category::Cold,
    }
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Warm => "Warm",
            Self::Cold => "Cold",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
