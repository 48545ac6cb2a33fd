//! Occupancy-based vulnerability classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse occupancy class used to weight repair priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VulnerabilityGroup {
    Residential,
    Commercial,
    Critical,
    Unknown,
}

impl VulnerabilityGroup {
    /// All groups, in classification order.
    pub const ALL: [VulnerabilityGroup; 4] = [
        Self::Residential,
        Self::Commercial,
        Self::Critical,
        Self::Unknown,
    ];

    /// Classifies a free-text occupancy label.
    ///
    /// Case-insensitive substring match, first hit wins:
    /// `residential`/`res`, then `commercial`/`comm`, then
    /// `critical`/`hospital`/`school`. Anything else, including a missing
    /// label, is [`VulnerabilityGroup::Unknown`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hazard_twin::twin::vulnerability::VulnerabilityGroup;
    ///
    /// assert_eq!(
    ///     VulnerabilityGroup::from_occupancy(Some("RES1 single family")),
    ///     VulnerabilityGroup::Residential
    /// );
    /// assert_eq!(VulnerabilityGroup::from_occupancy(None), VulnerabilityGroup::Unknown);
    /// ```
    pub fn from_occupancy(occupancy: Option<&str>) -> Self {
        let Some(label) = occupancy else {
            return Self::Unknown;
        };
        let s = label.trim().to_lowercase();
        if s.contains("residential") || s.contains("res") {
            Self::Residential
        } else if s.contains("commercial") || s.contains("comm") {
            Self::Commercial
        } else if s.contains("critical") || s.contains("hospital") || s.contains("school") {
            Self::Critical
        } else {
            Self::Unknown
        }
    }

    /// Lowercase label, matching the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Residential => "residential",
            Self::Commercial => "commercial",
            Self::Critical => "critical",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for VulnerabilityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
