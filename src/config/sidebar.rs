//! The `[sidebar]` table of panefm.toml.
//!
//! The sidebar lists the well-known user directories and any pinned ones.

use serde::Deserialize;

const DEFAULT_WIDTH: usize = 20;
const MIN_WIDTH: usize = 12;
const MAX_WIDTH: usize = 40;

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Sidebar {
    enabled: bool,
    width: usize,
    well_known: bool,
    pinned: Vec<String>,
}

impl Default for Sidebar {
    fn default() -> Self {
        Sidebar {
            enabled: true,
            width: DEFAULT_WIDTH,
            well_known: true,
            pinned: Vec::new(),
        }
    }
}

impl Sidebar {
    #[inline]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Columns taken by the sidebar, clamped to a usable range.
    pub fn width(&self) -> usize {
        self.width.clamp(MIN_WIDTH, MAX_WIDTH)
    }

    /// Whether home, downloads, documents and friends are listed.
    #[inline]
    pub fn well_known(&self) -> bool {
        self.well_known
    }

    /// Pinned directories as written in the config, `~` allowed.
    #[inline]
    pub fn pinned(&self) -> &[String] {
        &self.pinned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_is_clamped() -> Result<(), Box<dyn std::error::Error>> {
        let narrow: Sidebar = toml::from_str("width = 1")?;
        assert_eq!(narrow.width(), MIN_WIDTH);
        let wide: Sidebar = toml::from_str("width = 500\npinned = [\"~/src\"]")?;
        assert_eq!(wide.width(), MAX_WIDTH);
        assert_eq!(wide.pinned(), ["~/src".to_string()]);
        assert!(wide.enabled());
        Ok(())
    }
}
