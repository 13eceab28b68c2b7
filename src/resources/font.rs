//! Typeface fonts (the JSON format produced by facetype.js).
//!
//! Only the glyph inventory is read: text shapes are validated against it and
//! outline extrusion is done by the renderer.

use std::collections::{HashMap, HashSet};

use anyhow::Context;
use serde::{Deserialize, Deserializer, de::IgnoredAny};

use crate::{coordinator::Progress, resources::AssetSource};

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Font {
    #[serde(rename = "familyName", default)]
    pub family_name: String,
    #[serde(default)]
    pub resolution: u32,
    #[serde(deserialize_with = "glyph_set")]
    glyphs: HashSet<char>,
}

fn glyph_set<'de, D: Deserializer<'de>>(deserializer: D) -> Result<HashSet<char>, D::Error> {
    let glyphs = HashMap::<String, IgnoredAny>::deserialize(deserializer)?;
    Ok(glyphs
        .keys()
        .filter_map(|key| {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(c),
                _ => None,
            }
        })
        .collect())
}

impl Font {
    pub fn from_json(bytes: &[u8]) -> anyhow::Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub async fn load(source: &dyn AssetSource, path: &str) -> anyhow::Result<Self> {
        let bytes = source.fetch(path, &Progress::detached()).await?;
        Self::from_json(&bytes).with_context(|| format!("`{path}` is not a typeface font"))
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.glyphs.contains(&c)
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Characters of `text` the font cannot draw, in order of first appearance.
    /// Whitespace never needs a glyph.
    pub fn missing_glyphs(&self, text: &str) -> Vec<char> {
        let mut missing = Vec::new();
        for c in text.chars() {
            if !c.is_whitespace() && !self.has_glyph(c) && !missing.contains(&c) {
                missing.push(c);
            }
        }
        missing
    }
}
