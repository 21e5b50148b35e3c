//! Recipe configuration and the named self-contained presets.

use std::fmt;

use serde::{Deserialize, Serialize};
use trade_model::ProductLevel;

use crate::error::{Result, TransformError};

/// Parameters of the dataset construction recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeConfig {
    /// Output product level.
    pub level: ProductLevel,
    /// Drop product codes containing `A` or `X`.
    pub drop_alpha: bool,
    /// Flag codes against the official SITC revision 2 list.
    pub require_official: bool,
    /// Drop non-official codes instead of flagging them.
    pub drop_non_official: bool,
    /// Apply intertemporal country recodes.
    pub intertemporal_recode: bool,
    /// Drop countries missing from any loaded year.
    pub drop_incomplete_coverage: bool,
    /// Accept partially loaded or already transformed input.
    #[serde(default)]
    pub force: bool,
}

impl Default for RecipeConfig {
    fn default() -> Self {
        PresetVariant::A.config(ProductLevel::RAW)
    }
}

impl RecipeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.drop_non_official && !self.require_official {
            return Err(TransformError::Configuration(
                "drop_non_official requires require_official".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

/// The four flavours of self-contained dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PresetVariant {
    /// Official codes only.
    A,
    /// All codes, non-official ones flagged.
    B,
    /// `A` with intertemporally consistent countries.
    C,
    /// `B` with intertemporally consistent countries.
    D,
}

impl PresetVariant {
    pub const ALL: [PresetVariant; 4] = [
        PresetVariant::A,
        PresetVariant::B,
        PresetVariant::C,
        PresetVariant::D,
    ];

    pub fn letter(&self) -> char {
        match self {
            PresetVariant::A => 'A',
            PresetVariant::B => 'B',
            PresetVariant::C => 'C',
            PresetVariant::D => 'D',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|variant| variant.letter() == letter.to_ascii_uppercase())
    }

    pub fn config(&self, level: ProductLevel) -> RecipeConfig {
        let (drop_non_official, consistent) = match self {
            PresetVariant::A => (true, false),
            PresetVariant::B => (false, false),
            PresetVariant::C => (true, true),
            PresetVariant::D => (false, true),
        };
        RecipeConfig {
            level,
            drop_alpha: true,
            require_official: true,
            drop_non_official,
            intertemporal_recode: consistent,
            drop_incomplete_coverage: consistent,
            force: false,
        }
    }
}

impl fmt::Display for PresetVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A named preset, e.g. `SC_CNTRY_SR2L3_Y62to00_A`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipePreset {
    pub name: String,
    pub variant: PresetVariant,
    pub config: RecipeConfig,
}

fn preset_name(level: ProductLevel, variant: PresetVariant) -> String {
    format!("SC_CNTRY_SR2L{}_Y62to00_{}", level.digits(), variant.letter())
}

/// All sixteen presets, ordered by level then variant.
pub fn presets() -> Vec<RecipePreset> {
    let mut out = Vec::with_capacity(16);
    for digits in 1..=4 {
        let Ok(level) = ProductLevel::new(digits) else {
            continue;
        };
        for variant in PresetVariant::ALL {
            out.push(RecipePreset {
                name: preset_name(level, variant),
                variant,
                config: variant.config(level),
            });
        }
    }
    out
}

/// Looks a preset up by name, ignoring ASCII case.
pub fn preset(name: &str) -> Option<RecipePreset> {
    presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixteen_distinct_presets() {
        let all = presets();
        assert_eq!(all.len(), 16);
        assert_eq!(all[0].name, "SC_CNTRY_SR2L1_Y62to00_A");
        assert_eq!(all[15].name, "SC_CNTRY_SR2L4_Y62to00_D");
        let mut names: Vec<_> = all.iter().map(|p| p.name.clone()).collect();
        names.dedup();
        assert_eq!(names.len(), 16);
    }

    #[test]
    fn variant_flags() {
        let level = ProductLevel::new(3).unwrap();
        let a = PresetVariant::A.config(level);
        assert!(a.drop_alpha && a.require_official && a.drop_non_official);
        assert!(!a.intertemporal_recode && !a.drop_incomplete_coverage);
        let b = PresetVariant::B.config(level);
        assert!(b.require_official && !b.drop_non_official);
        let c = PresetVariant::C.config(level);
        assert!(c.drop_non_official && c.intertemporal_recode && c.drop_incomplete_coverage);
        let d = PresetVariant::D.config(level);
        assert!(!d.drop_non_official && d.intertemporal_recode);
        for variant in PresetVariant::ALL {
            assert!(variant.config(level).validate().is_ok());
        }
    }

    #[test]
    fn preset_lookup() {
        let found = preset("sc_cntry_sr2l3_y62to00_c").expect("preset");
        assert_eq!(found.variant, PresetVariant::C);
        assert_eq!(found.config.level.digits(), 3);
        assert!(preset("SC_CNTRY_SR2L5_Y62to00_A").is_none());
        assert_eq!(PresetVariant::from_letter('d'), Some(PresetVariant::D));
    }

    #[test]
    fn rejects_drop_without_flag() {
        let config = RecipeConfig {
            require_official: false,
            ..RecipeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TransformError::Configuration(_))
        ));
    }
}
