//! The palette of draggable source labels.

use smol_str::SmolStr;

/// The stock palette words.
pub const DEFAULT_WORDS: [&str; 10] = [
    "Happy",
    "Sunny",
    "Creative",
    "Energetic",
    "Peaceful",
    "Vibrant",
    "Gentle",
    "Dynamic",
    "Serene",
    "Playful",
];

/// One draggable palette entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteItem {
    pub index: usize,
    pub text: SmolStr,
}

/// The static list of palette items. Built once at mount and never changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    items: Vec<PaletteItem>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS)
    }
}

impl Palette {
    /// Build a palette from words, trimming each. Empty words are skipped.
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let items = words
            .into_iter()
            .filter_map(|w| {
                let w = w.as_ref().trim();
                (!w.is_empty()).then(|| SmolStr::new(w))
            })
            .enumerate()
            .map(|(index, text)| PaletteItem { index, text })
            .collect();
        Self { items }
    }

    pub fn items(&self) -> &[PaletteItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PaletteItem> {
        self.items.get(index)
    }

    /// Find the item with the given label.
    pub fn find(&self, text: &str) -> Option<&PaletteItem> {
        self.items.iter().find(|item| item.text == text)
    }
}
