//! Capability identifiers and static provider metadata

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the three capability domains a provider can serve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Consultation,
    Diagnostics,
    Pharmacy,
}

impl Capability {
    /// All capabilities in a stable order
    pub const ALL: [Capability; 3] = [
        Capability::Consultation,
        Capability::Diagnostics,
        Capability::Pharmacy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consultation => "consultation",
            Self::Diagnostics => "diagnostics",
            Self::Pharmacy => "pharmacy",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "consultation" => Ok(Self::Consultation),
            "diagnostics" => Ok(Self::Diagnostics),
            "pharmacy" => Ok(Self::Pharmacy),
            other => Err(format!(
                "Unknown capability '{other}'. Must be one of: consultation, diagnostics, pharmacy"
            )),
        }
    }
}

/// Capabilities a provider declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilityFlags {
    pub consultation: bool,
    pub diagnostics: bool,
    pub pharmacy: bool,
}

impl CapabilityFlags {
    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Consultation => self.consultation,
            Capability::Diagnostics => self.diagnostics,
            Capability::Pharmacy => self.pharmacy,
        }
    }
}

/// Static metadata returned by `get_provider_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderInfo {
    pub name: String,
    pub display_name: String,
    pub capabilities: CapabilityFlags,
    pub api_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_round_trip_through_str() {
        for capability in Capability::ALL {
            assert_eq!(capability.as_str().parse::<Capability>().unwrap(), capability);
        }
    }

    #[test]
    fn test_capability_parse_is_case_insensitive() {
        assert_eq!("Pharmacy".parse::<Capability>().unwrap(), Capability::Pharmacy);
        assert!("radiology".parse::<Capability>().is_err());
    }

    #[test]
    fn test_flags_supports() {
        let flags = CapabilityFlags {
            consultation: true,
            diagnostics: false,
            pharmacy: true,
        };
        assert!(flags.supports(Capability::Consultation));
        assert!(!flags.supports(Capability::Diagnostics));
    }
}
