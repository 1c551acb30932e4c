//! Split options and their serializable settings form.
//!
//! [`SplitOptions`] is the full set of options accepted by [`split`](crate::split).
//! It carries live values (the resize callback, the completion that triggers
//! an automatic revert) and therefore cannot be serialized. [`SplitConfig`] is
//! the plain-data subset a host can load from a settings file.
//!
//! # Example
//!
//! ```
//! use glyphsplit::{SplitConfig, SplitOptions};
//!
//! let options = SplitOptions::new()
//!     .char_class("glyph")
//!     .auto_split(true)
//!     .prop_index(true);
//! assert_eq!(options.classes.char, "glyph");
//!
//! let config = SplitConfig::from_toml_str(r#"
//! word_class = "w"
//! will_change = true
//! debounce_ms = 80
//! "#).unwrap();
//! let options = config.into_options();
//! assert_eq!(options.classes.word, "w");
//! assert!(options.will_change);
//! ```

use std::sync::Arc;
use std::time::Duration;

use glyphsplit_core::Completion;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::split::SplitResult;

/// Quiet period before a width change triggers a resplit.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

/// Offsets at or above this magnitude are treated as measurement artifacts.
pub const DEFAULT_KERNING_THRESHOLD: f32 = 20.0;

/// Callback invoked with the new result after every resize-driven resplit.
pub type ResizeCallback = Arc<dyn Fn(&SplitResult) + Send + Sync>;

/// Class names for the generated wrappers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassNames {
    /// Class of each character wrapper.
    pub char: String,
    /// Class of each word wrapper.
    pub word: String,
    /// Class of each line wrapper.
    pub line: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            char: "split-char".to_string(),
            word: "split-word".to_string(),
            line: "split-line".to_string(),
        }
    }
}

/// Options for a split.
#[derive(Clone)]
pub struct SplitOptions {
    /// Class names for generated wrappers.
    pub classes: ClassNames,
    /// Re-split when the container's parent changes width.
    pub auto_split: bool,
    /// Called after each resize-driven resplit. Never called for the initial split.
    pub on_resize: Option<ResizeCallback>,
    /// Revert automatically once this completion resolves.
    pub revert_on_complete: Option<Completion>,
    /// Expose each wrapper's index as a `--char-index`/`--word-index`/`--line-index` property.
    pub prop_index: bool,
    /// Add `will-change: transform, opacity` to character wrappers.
    pub will_change: bool,
    /// Resize debounce window.
    pub debounce: Duration,
    /// Kerning correction threshold in device-independent units.
    pub kerning_threshold: f32,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            classes: ClassNames::default(),
            auto_split: false,
            on_resize: None,
            revert_on_complete: None,
            prop_index: false,
            will_change: false,
            debounce: DEFAULT_DEBOUNCE,
            kerning_threshold: DEFAULT_KERNING_THRESHOLD,
        }
    }
}

impl std::fmt::Debug for SplitOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SplitOptions")
            .field("classes", &self.classes)
            .field("auto_split", &self.auto_split)
            .field("on_resize", &self.on_resize.is_some())
            .field("revert_on_complete", &self.revert_on_complete)
            .field("prop_index", &self.prop_index)
            .field("will_change", &self.will_change)
            .field("debounce", &self.debounce)
            .field("kerning_threshold", &self.kerning_threshold)
            .finish()
    }
}

impl SplitOptions {
    /// Default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the character wrapper class.
    pub fn char_class(mut self, class: impl Into<String>) -> Self {
        self.classes.char = class.into();
        self
    }

    /// Set the word wrapper class.
    pub fn word_class(mut self, class: impl Into<String>) -> Self {
        self.classes.word = class.into();
        self
    }

    /// Set the line wrapper class.
    pub fn line_class(mut self, class: impl Into<String>) -> Self {
        self.classes.line = class.into();
        self
    }

    /// Enable or disable resize-driven resplitting.
    pub fn auto_split(mut self, enabled: bool) -> Self {
        self.auto_split = enabled;
        self
    }

    /// Set the resize callback.
    pub fn on_resize<F>(mut self, callback: F) -> Self
    where
        F: Fn(&SplitResult) + Send + Sync + 'static,
    {
        self.on_resize = Some(Arc::new(callback));
        self
    }

    /// Revert once `completion` resolves.
    pub fn revert_on_complete(mut self, completion: Completion) -> Self {
        self.revert_on_complete = Some(completion);
        self
    }

    /// Enable or disable index custom properties.
    pub fn prop_index(mut self, enabled: bool) -> Self {
        self.prop_index = enabled;
        self
    }

    /// Enable or disable the `will-change` hint.
    pub fn will_change(mut self, enabled: bool) -> Self {
        self.will_change = enabled;
        self
    }

    /// Set the resize debounce window.
    pub fn debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    /// Set the kerning correction threshold.
    pub fn kerning_threshold(mut self, threshold: f32) -> Self {
        self.kerning_threshold = threshold;
        self
    }
}

/// Split options as stored in a settings file.
///
/// Every key is optional and falls back to the [`SplitOptions`] default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub char_class: String,
    pub word_class: String,
    pub line_class: String,
    pub auto_split: bool,
    pub prop_index: bool,
    pub will_change: bool,
    pub debounce_ms: u64,
    pub kerning_threshold: f32,
    /// Accepted so a misplaced key does not fail the whole file. A settings
    /// value can never be a completion signal, so it is ignored with a warning.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revert_on_complete: Option<toml::Value>,
}

impl Default for SplitConfig {
    fn default() -> Self {
        let classes = ClassNames::default();
        Self {
            char_class: classes.char,
            word_class: classes.word,
            line_class: classes.line,
            auto_split: false,
            prop_index: false,
            will_change: false,
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            kerning_threshold: DEFAULT_KERNING_THRESHOLD,
            revert_on_complete: None,
        }
    }
}

impl SplitConfig {
    /// Parse settings from TOML.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize settings to TOML.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string(self)
    }

    /// Convert into split options.
    pub fn into_options(self) -> SplitOptions {
        if let Some(value) = &self.revert_on_complete {
            tracing::warn!(
                target: "glyphsplit::split",
                value = %value,
                "revert_on_complete expects a completion signal; ignoring configured value"
            );
        }
        SplitOptions {
            classes: ClassNames {
                char: self.char_class,
                word: self.word_class,
                line: self.line_class,
            },
            auto_split: self.auto_split,
            on_resize: None,
            revert_on_complete: None,
            prop_index: self.prop_index,
            will_change: self.will_change,
            debounce: Duration::from_millis(self.debounce_ms),
            kerning_threshold: self.kerning_threshold,
        }
    }
}

impl From<SplitConfig> for SplitOptions {
    fn from(config: SplitConfig) -> Self {
        config.into_options()
    }
}
