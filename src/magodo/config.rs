use crate::clock::Clock;
use crate::error::Result;
use crate::grammar::ParseMode;
use crate::spells::{builtin, Spell, Spellbook};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";

/// Spellbook configuration, stored as `config.json` in the config directory.
///
/// Spells are referred to by name and resolved against the built-in
/// registry. Every field defaults to the magic spellbook's value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MagodoConfig {
    #[serde(default)]
    pub mode: ParseMode,

    #[serde(default = "default_validate_spells")]
    pub validate_spells: Vec<String>,

    #[serde(default = "default_line_pre_spells")]
    pub line_pre_spells: Vec<String>,

    #[serde(default = "default_transform_spells")]
    pub transform_spells: Vec<String>,

    #[serde(default = "default_line_post_spells")]
    pub line_post_spells: Vec<String>,
}

fn names<F>(spells: &[Spell<F>]) -> Vec<String> {
    spells.iter().map(|spell| spell.name.to_string()).collect()
}

fn default_validate_spells() -> Vec<String> {
    names(builtin::VALIDATE_SPELLS)
}

fn default_line_pre_spells() -> Vec<String> {
    names(builtin::LINE_PRE_SPELLS)
}

fn default_transform_spells() -> Vec<String> {
    names(builtin::TRANSFORM_SPELLS)
}

fn default_line_post_spells() -> Vec<String> {
    names(builtin::LINE_POST_SPELLS)
}

impl Default for MagodoConfig {
    fn default() -> Self {
        Self {
            mode: ParseMode::default(),
            validate_spells: default_validate_spells(),
            line_pre_spells: default_line_pre_spells(),
            transform_spells: default_transform_spells(),
            line_post_spells: default_line_post_spells(),
        }
    }
}

impl MagodoConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            log::debug!("no config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config = serde_json::from_str(&content)?;
        log::debug!("loaded config from {}", config_path.display());
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// A config with no spells at all.
    pub fn plain(mode: ParseMode) -> Self {
        Self {
            mode,
            validate_spells: Vec::new(),
            line_pre_spells: Vec::new(),
            transform_spells: Vec::new(),
            line_post_spells: Vec::new(),
        }
    }

    /// Resolves every spell name, failing on the first unknown one.
    pub fn into_spellbook(self, clock: impl Clock + 'static) -> Result<Spellbook> {
        let mut book = Spellbook::plain(self.mode).with_clock(clock);

        for name in &self.validate_spells {
            book = book.validate(builtin::find_validate_spell(name)?);
        }
        for name in &self.line_pre_spells {
            book = book.line_pre(builtin::find_line_pre_spell(name)?);
        }
        for name in &self.transform_spells {
            book = book.transform(builtin::find_transform_spell(name)?);
        }
        for name in &self.line_post_spells {
            book = book.line_post(builtin::find_line_post_spell(name)?);
        }

        Ok(book)
    }
}
