//! Overlay color schemes and the persisted dark/light choice.

use tracing::debug;

use crate::settings::PreferenceStore;

/// Storage key of the overlay theme flag.
pub const DARK_MODE_KEY: &str = "onesketch-perf-overlay-dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayTheme {
    Dark,
    Light,
}

/// Colors as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: u32,
    pub border: u32,
    pub foreground: u32,
    pub muted: u32,
    pub track: u32,
}

impl OverlayTheme {
    pub fn palette(self) -> Palette {
        match self {
            Self::Dark => Palette {
                background: 0x18181b,
                border: 0x3f3f46,
                foreground: 0xf4f4f5,
                muted: 0xa1a1aa,
                track: 0x27272a,
            },
            Self::Light => Palette {
                background: 0xffffff,
                border: 0xe4e4e7,
                foreground: 0x18181b,
                muted: 0x71717a,
                track: 0xf4f4f5,
            },
        }
    }
}

/// Dark/light flag backed by a [`PreferenceStore`].
///
/// Read once on construction. Anything but the literal `"false"` means dark.
pub struct ThemePreference {
    store: Box<dyn PreferenceStore>,
    dark: bool,
}

impl ThemePreference {
    pub fn load(store: Box<dyn PreferenceStore>) -> Self {
        let dark = store.get(DARK_MODE_KEY).as_deref() != Some("false");
        Self { store, dark }
    }

    pub fn theme(&self) -> OverlayTheme {
        if self.dark {
            OverlayTheme::Dark
        } else {
            OverlayTheme::Light
        }
    }

    /// Flip and persist. Returns the new theme.
    pub fn toggle(&mut self) -> OverlayTheme {
        self.dark = !self.dark;
        let value = if self.dark { "true" } else { "false" };
        self.store.set(DARK_MODE_KEY, value);
        debug!(dark = self.dark, "Toggled overlay theme");
        self.theme()
    }
}
