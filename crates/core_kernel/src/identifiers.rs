//! Strongly-typed identifiers for domain entities
//!
//! Records are keyed by the integer ids the backing datastore assigns.
//! Newtype wrappers keep a client id from being passed where a service id
//! is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the raw integer id
            pub fn value(&self) -> i64 {
                self.0
            }

            /// Returns the identifier prefix used in labels
            pub fn prefix() -> &'static str {
                $prefix
            }

            /// Prefixed label for log lines and document names, e.g. `CLI-7`
            pub fn label(&self) -> String {
                format!("{}-{}", $prefix, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Strip prefix if present
                let raw = s.strip_prefix(concat!($prefix, "-")).unwrap_or(s);
                Ok(Self(raw.parse()?))
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(ClientId, "CLI");
define_id!(ServiceId, "SVC");
define_id!(AssignmentId, "ASG");
define_id!(InvoiceId, "INV");
