//! Editor configuration.
//!
//! Every field has a default, so an empty object (or no config at all) gives
//! the stock editor: ten palette words, the standard selectors and class
//! names, unpadded chips and 100 undo steps.

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::error::ConfigError;
use crate::palette::DEFAULT_WORDS;

/// Top-level editor configuration, as passed from JavaScript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Palette word list, in display order.
    pub words: Vec<SmolStr>,
    pub selectors: Selectors,
    pub classes: ClassNames,
    pub feedback: FeedbackConfig,
    /// Surround dropped chips with spaces.
    pub pad_chips: bool,
    /// Maximum number of undo steps kept.
    pub history_depth: usize,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.into_iter().map(SmolStr::new_static).collect(),
            selectors: Selectors::default(),
            classes: ClassNames::default(),
            feedback: FeedbackConfig::default(),
            pad_chips: false,
            history_depth: 100,
        }
    }
}

impl EditorConfig {
    /// Check the configuration for values the editor can't work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(index) = self.words.iter().position(|w| w.trim().is_empty()) {
            return Err(ConfigError::EmptyWord { index });
        }
        let names = [
            ("selectors.palette", &self.selectors.palette),
            ("selectors.editorContainer", &self.selectors.editor_container),
            ("selectors.editor", &self.selectors.editor),
            ("selectors.trash", &self.selectors.trash),
            ("classes.paletteItem", &self.classes.palette_item),
            ("classes.chip", &self.classes.chip),
            ("classes.dragging", &self.classes.dragging),
            ("classes.trashHover", &self.classes.trash_hover),
            ("feedback.cloneId", &self.feedback.clone_id),
        ];
        for (name, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyName(name));
            }
        }
        if self.history_depth == 0 {
            return Err(ConfigError::ZeroHistory);
        }
        Ok(())
    }
}

/// CSS selectors for the elements the editor mounts into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Selectors {
    /// Container the palette items are appended to.
    pub palette: SmolStr,
    /// Wrapper around the editable surface.
    pub editor_container: SmolStr,
    /// The editable surface itself.
    pub editor: SmolStr,
    pub trash: SmolStr,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            palette: SmolStr::new_static(".labels-container"),
            editor_container: SmolStr::new_static(".editor-container"),
            editor: SmolStr::new_static("#editor"),
            trash: SmolStr::new_static(".trash-zone"),
        }
    }
}

/// Class names applied by the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClassNames {
    pub palette_item: SmolStr,
    pub chip: SmolStr,
    /// Marker on the element currently being dragged.
    pub dragging: SmolStr,
    /// Marker on the trash while a chip hovers over it.
    pub trash_hover: SmolStr,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            palette_item: SmolStr::new_static("label"),
            chip: SmolStr::new_static("editor-label"),
            dragging: SmolStr::new_static("dragging"),
            trash_hover: SmolStr::new_static("trash-hover"),
        }
    }
}

/// Floating clone shown under the finger during touch drags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedbackConfig {
    pub clone_id: SmolStr,
    /// Clone is placed at `pointer - anchor`.
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub opacity: f64,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            clone_id: SmolStr::new_static("dragging-clone"),
            anchor_x: 50.0,
            anchor_y: 25.0,
            opacity: 0.8,
        }
    }
}
