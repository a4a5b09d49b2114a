//! Schedule categories and their display colors

use serde::{Deserialize, Serialize};

use crate::schedule::DEFAULT_CATEGORY;

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A named, colored schedule category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub color: Rgb,
}

impl Category {
    fn new(id: &str, name: &str, color: Rgb) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color,
        }
    }
}

/// Lookup used by the chart for fills and labels
pub trait CategoryResolver {
    fn color_of(&self, id: &str) -> Rgb;
    fn name_of(&self, id: &str) -> String;
}

const OTHER_COLOR: Rgb = Rgb::new(0xc8, 0xd6, 0xe5);

/// Ordered category list with the built-in defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            categories: vec![
                Category::new("work", "Work", Rgb::new(0x8e, 0x8e, 0x8e)),
                Category::new("study", "Study", Rgb::new(0x8e, 0x8e, 0x8e)),
                Category::new("meal", "Meal", Rgb::new(0xfa, 0xab, 0x23)),
                Category::new("exercise", "Exercise", Rgb::new(0xc8, 0xd7, 0xc4)),
                Category::new("rest", "Rest", Rgb::new(0xb7, 0xb6, 0xd6)),
                Category::new("sleep", "Sleep", Rgb::new(0x77, 0x74, 0xb6)),
                Category::new("transport", "Transport", Rgb::new(0x54, 0xa0, 0xff)),
                Category::new(DEFAULT_CATEGORY, "Other", OTHER_COLOR),
            ],
        }
    }
}

impl CategoryTable {
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn get(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }
}

impl CategoryResolver for CategoryTable {
    fn color_of(&self, id: &str) -> Rgb {
        self.get(id)
            .or_else(|| self.get(DEFAULT_CATEGORY))
            .map(|c| c.color)
            .unwrap_or(OTHER_COLOR)
    }

    fn name_of(&self, id: &str) -> String {
        if id.is_empty() {
            return "Other".to_string();
        }
        self.get(id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_resolve() {
        let table = CategoryTable::default();
        assert_eq!(table.categories().len(), 8);
        assert_eq!(table.color_of("meal"), Rgb::new(0xfa, 0xab, 0x23));
        assert_eq!(table.name_of("sleep"), "Sleep");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let table = CategoryTable::default();
        assert_eq!(table.color_of("gardening"), table.color_of("other"));
        assert_eq!(table.name_of("gardening"), "gardening");
        assert_eq!(table.name_of(""), "Other");
    }
}
