//! Type-safe identifiers for stop data.
//!
//! All identifiers use Arc<str> so the same code can be shared between the
//! store, the favorite set and every rendered element without copying.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

macro_rules! impl_identifier {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialOrd, Ord)]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(s: impl AsRef<str>) -> Self {
                Self(s.as_ref().into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl PartialEq for $name {
            fn eq(&self, other: &Self) -> bool {
                Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
            }
        }

        impl Eq for $name {}

        impl Hash for $name {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.0.hash(state);
            }
        }

        // Hashes identically to `str`, so sets can be queried with plain strings.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }
    };
}

// ATCO code of a stop.
impl_identifier!(StopIdentifier);
// Local transport authority, used as a filter facet.
impl_identifier!(AuthorityName);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identifier_equality() {
        let id1 = StopIdentifier::new("0100BRP90123");
        let id2 = StopIdentifier::new("0100BRP90123");
        let id3 = id1.clone();

        assert_eq!(id1, id2);
        assert_eq!(id1, id3);
        assert!(Arc::ptr_eq(&id1.0, &id3.0)); // Clone shares Arc
    }

    #[test]
    fn test_lookup_by_str() {
        let mut set = HashSet::new();
        set.insert(StopIdentifier::new("0100BRP90123"));

        assert!(set.contains("0100BRP90123"));
        assert!(!set.contains("0100BRP90124"));
    }

    #[test]
    fn test_blank_authority() {
        assert!(AuthorityName::new("   ").is_blank());
        assert!(!AuthorityName::new("Bristol").is_blank());
    }

    #[test]
    fn test_identifier_display() {
        let id = AuthorityName::new("South Gloucestershire");
        assert_eq!(format!("{}", id), "South Gloucestershire");
    }
}
