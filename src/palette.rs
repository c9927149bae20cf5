//! Fixed cluster colour table.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Display colours, indexed by cluster id modulo the table length.
pub const CLUSTER_COLORS: [&str; 8] = [
    "#ff3333", "#33ccff", "#33ff77", "#ffcc33", "#ff33cc", "#9933ff", "#ff6600", "#00ffcc",
];

/// Opaque display tag: an index into [`CLUSTER_COLORS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct Color(usize);

impl Color {
    /// Colour assigned to cluster `index`, wrapping around the palette.
    pub fn for_cluster(index: usize) -> Self {
        Self(index % CLUSTER_COLORS.len())
    }

    /// Hex string (`#rrggbb`).
    pub fn hex(self) -> &'static str {
        CLUSTER_COLORS[self.0 % CLUSTER_COLORS.len()]
    }
}
