//! Mana system for casting spells

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mana colors, plus the colorless bucket
///
/// Serialized with their one-letter symbols; the long names are accepted on
/// input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W", alias = "White")]
    White,
    #[serde(rename = "U", alias = "Blue")]
    Blue,
    #[serde(rename = "B", alias = "Black")]
    Black,
    #[serde(rename = "R", alias = "Red")]
    Red,
    #[serde(rename = "G", alias = "Green")]
    Green,
    #[serde(rename = "C", alias = "Colorless")]
    Colorless,
}

impl Color {
    /// Colored buckets in the order payment walks them
    pub const COLORED: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub const ALL: [Color; 6] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
        Color::Colorless,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
            Color::Colorless => 'C',
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

fn is_zero(n: &u8) -> bool {
    *n == 0
}

/// A mana cost: an amount per color
///
/// The colorless component can be paid with mana of any color. Deserializes
/// from a map such as `{"C": 1, "G": 1}` or `{"Colorless": 1, "Green": 1}`;
/// missing colors are zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaCost {
    #[serde(rename = "W", alias = "White", default, skip_serializing_if = "is_zero")]
    pub white: u8,
    #[serde(rename = "U", alias = "Blue", default, skip_serializing_if = "is_zero")]
    pub blue: u8,
    #[serde(rename = "B", alias = "Black", default, skip_serializing_if = "is_zero")]
    pub black: u8,
    #[serde(rename = "R", alias = "Red", default, skip_serializing_if = "is_zero")]
    pub red: u8,
    #[serde(rename = "G", alias = "Green", default, skip_serializing_if = "is_zero")]
    pub green: u8,
    #[serde(rename = "C", alias = "Colorless", default, skip_serializing_if = "is_zero")]
    pub colorless: u8,
}

impl ManaCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a compact cost string like "1G" or "2UU"
    ///
    /// Digits form the colorless amount, letters add one of their color.
    pub fn from_string(s: &str) -> Self {
        let mut cost = ManaCost::new();
        let mut digits = String::new();

        for c in s.chars() {
            match c {
                'W' => cost.white += 1,
                'U' => cost.blue += 1,
                'B' => cost.black += 1,
                'R' => cost.red += 1,
                'G' => cost.green += 1,
                'C' => cost.colorless += 1,
                '0'..='9' => digits.push(c),
                _ => {}
            }
        }

        if !digits.is_empty() {
            cost.colorless = cost.colorless.saturating_add(digits.parse().unwrap_or(0));
        }

        cost
    }

    /// Builder-style setter, handy for tests and fixtures
    pub fn with(mut self, color: Color, amount: u8) -> Self {
        *self.amount_mut(color) = amount;
        self
    }

    pub fn amount(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Colorless => self.colorless,
        }
    }

    fn amount_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
            Color::Colorless => &mut self.colorless,
        }
    }

    /// Total converted mana cost
    pub fn cmc(&self) -> u32 {
        Color::ALL.iter().map(|&c| self.amount(c) as u32).sum()
    }

    pub fn is_free(&self) -> bool {
        self.cmc() == 0
    }
}

impl fmt::Display for ManaCost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_free() {
            return write!(f, "0");
        }
        if self.colorless > 0 {
            write!(f, "{}", self.colorless)?;
        }
        for color in Color::COLORED {
            for _ in 0..self.amount(color) {
                write!(f, "{}", color)?;
            }
        }
        Ok(())
    }
}

/// Mana pool for a player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManaPool {
    #[serde(rename = "W")]
    pub white: u8,
    #[serde(rename = "U")]
    pub blue: u8,
    #[serde(rename = "B")]
    pub black: u8,
    #[serde(rename = "R")]
    pub red: u8,
    #[serde(rename = "G")]
    pub green: u8,
    #[serde(rename = "C")]
    pub colorless: u8,
}

impl ManaPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn amount(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Blue => self.blue,
            Color::Black => self.black,
            Color::Red => self.red,
            Color::Green => self.green,
            Color::Colorless => self.colorless,
        }
    }

    fn bucket_mut(&mut self, color: Color) -> &mut u8 {
        match color {
            Color::White => &mut self.white,
            Color::Blue => &mut self.blue,
            Color::Black => &mut self.black,
            Color::Red => &mut self.red,
            Color::Green => &mut self.green,
            Color::Colorless => &mut self.colorless,
        }
    }

    pub fn add_mana(&mut self, color: Color, amount: u8) {
        let bucket = self.bucket_mut(color);
        *bucket = bucket.saturating_add(amount);
    }

    pub fn clear(&mut self) {
        *self = ManaPool::new();
    }

    /// Total mana in pool
    pub fn total(&self) -> u32 {
        Color::ALL.iter().map(|&c| self.amount(c) as u32).sum()
    }

    /// Would `pay_mana_cost` succeed?
    pub fn can_pay(&self, cost: &ManaCost) -> bool {
        self.after_payment(cost).is_some()
    }

    /// Pay a cost, all or nothing
    ///
    /// The colorless requirement is paid first, from the colorless bucket and
    /// then from colored buckets in WUBRG order. Colored requirements are
    /// checked afterwards against what is left, so colorless payment can eat
    /// mana a colored requirement needed. On failure the pool is untouched.
    pub fn pay_mana_cost(&mut self, cost: &ManaCost) -> bool {
        match self.after_payment(cost) {
            Some(remaining) => {
                *self = remaining;
                true
            }
            None => false,
        }
    }

    fn after_payment(&self, cost: &ManaCost) -> Option<ManaPool> {
        if cost.colorless as u32 > self.total() {
            return None;
        }

        let mut pool = *self;
        let mut needed = cost.colorless;
        for color in std::iter::once(Color::Colorless).chain(Color::COLORED) {
            if needed == 0 {
                break;
            }
            let bucket = pool.bucket_mut(color);
            let spent = needed.min(*bucket);
            *bucket -= spent;
            needed -= spent;
        }

        for color in Color::COLORED {
            let required = cost.amount(color);
            let bucket = pool.bucket_mut(color);
            if *bucket < required {
                return None;
            }
            *bucket -= required;
        }

        Some(pool)
    }
}

impl fmt::Display for ManaPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Color::ALL
            .iter()
            .filter(|&&c| self.amount(c) > 0)
            .map(|&c| format!("{}{}", self.amount(c), c))
            .collect();
        if parts.is_empty() {
            write!(f, "empty")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mana_cost_parsing() {
        let cost = ManaCost::from_string("2RR");
        assert_eq!(cost.colorless, 2);
        assert_eq!(cost.red, 2);
        assert_eq!(cost.cmc(), 4);
        assert_eq!(cost.to_string(), "2RR");
        assert_eq!(ManaCost::new().to_string(), "0");
    }

    #[test]
    fn test_mana_cost_from_json_accepts_both_key_styles() {
        let short: ManaCost = serde_json::from_str(r#"{"C": 1, "G": 1}"#).unwrap();
        let long: ManaCost = serde_json::from_str(r#"{"Colorless": 1, "Green": 1}"#).unwrap();
        assert_eq!(short, long);
        assert_eq!(short, ManaCost::from_string("1G"));

        let empty: ManaCost = serde_json::from_str("{}").unwrap();
        assert!(empty.is_free());
    }

    #[test]
    fn test_pay_exact_cost() {
        let mut pool = ManaPool::new();
        pool.add_mana(Color::Colorless, 1);
        pool.add_mana(Color::Green, 1);

        assert!(pool.pay_mana_cost(&ManaCost::from_string("1G")));
        assert_eq!(pool.total(), 0);
    }

    #[test]
    fn test_colorless_paid_from_colored_in_wubrg_order() {
        let mut pool = ManaPool::new();
        pool.add_mana(Color::Green, 1);
        pool.add_mana(Color::Blue, 1);
        pool.add_mana(Color::Red, 2);

        // Colorless 2 takes blue (U before R), then one red; green stays for G
        assert!(pool.pay_mana_cost(&ManaCost::from_string("2G")));
        assert_eq!(pool.blue, 0);
        assert_eq!(pool.red, 1);
        assert_eq!(pool.green, 0);
    }

    #[test]
    fn test_insufficient_total_leaves_pool_untouched() {
        let mut pool = ManaPool::new();
        pool.add_mana(Color::Red, 1);

        let before = pool;
        assert!(!pool.pay_mana_cost(&ManaCost::from_string("2R")));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_wrong_color_leaves_pool_untouched() {
        let mut pool = ManaPool::new();
        pool.add_mana(Color::Blue, 2);

        let before = pool;
        assert!(!pool.pay_mana_cost(&ManaCost::from_string("RR")));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_colorless_payment_can_starve_colored_requirement() {
        // White comes first in payment order, so the colorless part eats the
        // white mana even though red could have paid it.
        let mut pool = ManaPool::new();
        pool.add_mana(Color::White, 1);
        pool.add_mana(Color::Red, 1);

        let before = pool;
        assert!(!pool.can_pay(&ManaCost::from_string("1W")));
        assert!(!pool.pay_mana_cost(&ManaCost::from_string("1W")));
        assert_eq!(pool, before);
    }

    #[test]
    fn test_mana_pool_total_and_clear() {
        let mut pool = ManaPool::new();
        assert_eq!(pool.total(), 0);
        assert_eq!(pool.to_string(), "empty");

        pool.add_mana(Color::Red, 2);
        pool.add_mana(Color::Colorless, 1);
        assert_eq!(pool.total(), 3);
        assert_eq!(pool.to_string(), "2R 1C");

        pool.clear();
        assert_eq!(pool.total(), 0);
    }
}
