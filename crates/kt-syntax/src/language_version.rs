//! Kotlin language version + experimental feature availability model.
//!
//! The parser accepts the newest grammar and the feature gate pass reports
//! constructs that the configured version does not support yet.

use serde::{Deserialize, Serialize};

/// The effective Kotlin language version for a module/file.
///
/// - `major`/`minor`: the language version (`1.9`, `2.0`, ...)
/// - `experimental`: whether experimental features of this version are opted
///   into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguageVersion {
    pub major: u16,
    pub minor: u16,
    #[serde(default)]
    pub experimental: bool,
}

impl LanguageVersion {
    pub const KOTLIN_1_3: Self = Self::new(1, 3);
    pub const KOTLIN_1_4: Self = Self::new(1, 4);
    pub const KOTLIN_1_5: Self = Self::new(1, 5);
    pub const KOTLIN_1_6: Self = Self::new(1, 6);
    pub const KOTLIN_1_7: Self = Self::new(1, 7);
    pub const KOTLIN_1_8: Self = Self::new(1, 8);
    pub const KOTLIN_1_9: Self = Self::new(1, 9);
    pub const KOTLIN_2_0: Self = Self::new(2, 0);

    pub const fn new(major: u16, minor: u16) -> Self {
        Self {
            major,
            minor,
            experimental: false,
        }
    }

    #[inline]
    pub const fn with_experimental(self, experimental: bool) -> Self {
        Self {
            experimental,
            ..self
        }
    }

    fn at_least(self, major: u16, minor: u16) -> bool {
        (self.major, self.minor) >= (major, minor)
    }

    pub fn availability(self, feature: LanguageFeature) -> FeatureAvailability {
        let (stable_major, stable_minor) = feature.stable_since();
        if self.at_least(stable_major, stable_minor) {
            return FeatureAvailability::Stable;
        }
        match feature.experimental_since() {
            Some((major, minor)) if self.at_least(major, minor) => {
                FeatureAvailability::Experimental
            }
            _ => FeatureAvailability::Unavailable,
        }
    }

    /// Is the feature usable in this configuration? (applies the
    /// `experimental` opt-in)
    pub fn is_enabled(self, feature: LanguageFeature) -> bool {
        match self.availability(feature) {
            FeatureAvailability::Stable => true,
            FeatureAvailability::Experimental => self.experimental,
            FeatureAvailability::Unavailable => false,
        }
    }
}

impl Default for LanguageVersion {
    fn default() -> Self {
        LanguageVersion::KOTLIN_2_0
    }
}

impl std::fmt::Display for LanguageVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LanguageFeature {
    TypeAliases,            // 1.1
    FunInterfaces,          // 1.4
    SealedInterfaces,       // 1.5
    ValueClasses,           // 1.5
    DefinitelyNonNullTypes, // 1.7 (experimental 1.6)
    RangeUntil,             // 1.9 (experimental 1.8)
    DataObjects,            // 1.9 (experimental 1.8)
}

impl LanguageFeature {
    pub const fn diagnostic_code(self) -> &'static str {
        match self {
            LanguageFeature::TypeAliases => "KOTLIN_FEATURE_TYPE_ALIASES",
            LanguageFeature::FunInterfaces => "KOTLIN_FEATURE_FUN_INTERFACES",
            LanguageFeature::SealedInterfaces => "KOTLIN_FEATURE_SEALED_INTERFACES",
            LanguageFeature::ValueClasses => "KOTLIN_FEATURE_VALUE_CLASSES",
            LanguageFeature::DefinitelyNonNullTypes => "KOTLIN_FEATURE_DEFINITELY_NON_NULL_TYPES",
            LanguageFeature::RangeUntil => "KOTLIN_FEATURE_RANGE_UNTIL",
            LanguageFeature::DataObjects => "KOTLIN_FEATURE_DATA_OBJECTS",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            LanguageFeature::TypeAliases => "type aliases",
            LanguageFeature::FunInterfaces => "functional interfaces (`fun interface`)",
            LanguageFeature::SealedInterfaces => "sealed interfaces",
            LanguageFeature::ValueClasses => "value classes",
            LanguageFeature::DefinitelyNonNullTypes => "definitely non-nullable types (`T & Any`)",
            LanguageFeature::RangeUntil => "the `..<` operator",
            LanguageFeature::DataObjects => "data objects",
        }
    }

    pub const fn stable_since(self) -> (u16, u16) {
        match self {
            LanguageFeature::TypeAliases => (1, 1),
            LanguageFeature::FunInterfaces => (1, 4),
            LanguageFeature::SealedInterfaces => (1, 5),
            LanguageFeature::ValueClasses => (1, 5),
            LanguageFeature::DefinitelyNonNullTypes => (1, 7),
            LanguageFeature::RangeUntil => (1, 9),
            LanguageFeature::DataObjects => (1, 9),
        }
    }

    pub const fn experimental_since(self) -> Option<(u16, u16)> {
        match self {
            LanguageFeature::DefinitelyNonNullTypes => Some((1, 6)),
            LanguageFeature::RangeUntil | LanguageFeature::DataObjects => Some((1, 8)),
            _ => None,
        }
    }
}

/// Whether the *language* supports a feature in this version, independent of
/// the experimental opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureAvailability {
    Unavailable,
    Experimental,
    Stable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn availability_by_version() {
        let v = LanguageVersion::KOTLIN_1_8;
        assert_eq!(
            v.availability(LanguageFeature::RangeUntil),
            FeatureAvailability::Experimental
        );
        assert!(!v.is_enabled(LanguageFeature::RangeUntil));
        assert!(v.with_experimental(true).is_enabled(LanguageFeature::RangeUntil));
        assert_eq!(
            LanguageVersion::KOTLIN_1_4.availability(LanguageFeature::SealedInterfaces),
            FeatureAvailability::Unavailable
        );
        assert!(LanguageVersion::default().is_enabled(LanguageFeature::DataObjects));
    }

    #[test]
    fn versions_order_numerically() {
        assert!(LanguageVersion::KOTLIN_1_9 < LanguageVersion::KOTLIN_2_0);
        assert_eq!(LanguageVersion::KOTLIN_1_7.to_string(), "1.7");
    }
}
