//! Enumerations carried by tasks and links.
//!
//! Each enum has:
//! - Custom Serialize (as snake_case string)
//! - Custom Deserialize (known variants, empty string as the default, and a
//!   catch-all `Custom(String)` that validation rejects)
//! - `as_str()`, `is_default()`, `is_valid()`, `Display`

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ---------------------------------------------------------------------------
// Macro: defines an enum with known string variants + a Custom(String) holder
// for unrecognised input.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, default = $default:ident,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $variant, )+
            /// A value that is not one of the known variants.
            Custom(String),
        }

        impl $name {
            /// Every known variant's string form, in declaration order.
            pub const VARIANTS: &'static [&'static str] = &[ $( $str, )+ ];

            /// Returns the string representation.
            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $str, )+
                    Self::Custom(s) => s.as_str(),
                }
            }

            /// Returns `true` if this is the default variant.
            pub fn is_default(&self) -> bool {
                *self == Self::$default
            }

            /// Returns `true` if this is one of the known variants.
            pub fn is_valid(&self) -> bool {
                !matches!(self, Self::Custom(_))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                Ok(Self::from(s.as_str()))
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                match s {
                    "" => Self::$default,
                    $( $str => Self::$variant, )+
                    other => Self::Custom(other.to_owned()),
                }
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                match Self::from(s.as_str()) {
                    Self::Custom(_) => Self::Custom(s),
                    known => known,
                }
            }
        }
    };
}

// ===========================================================================
// Priority
// ===========================================================================

define_enum! {
    /// How urgent a task is.
    Priority, default = Normal,
    variants: [
        (Minor, "minor"),
        (Normal, "normal"),
        (High, "high"),
        (Critical, "critical"),
    ]
}

// ===========================================================================
// TaskStatus
// ===========================================================================

define_enum! {
    /// Lifecycle state of a task. Any status may follow any other.
    TaskStatus, default = New,
    variants: [
        (New, "new"),
        (InProgress, "in_progress"),
        (Blocked, "blocked"),
        (Done, "done"),
        (Archived, "archived"),
    ]
}

// ===========================================================================
// LinkType
// ===========================================================================

define_enum! {
    /// What kind of evidence a link points at.
    LinkType, default = Other,
    variants: [
        (PullRequest, "pull_request"),
        (SlackThread, "slack_thread"),
        (JiraTicket, "jira_ticket"),
        (Documentation, "documentation"),
        (Other, "other"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_roundtrip_through_str() {
        for s in TaskStatus::VARIANTS {
            let status = TaskStatus::from(*s);
            assert!(status.is_valid());
            assert_eq!(status.as_str(), *s);
        }
    }

    #[test]
    fn empty_string_parses_to_default() {
        assert_eq!(Priority::from(""), Priority::Normal);
        assert_eq!(TaskStatus::from(String::new()), TaskStatus::New);
        assert_eq!(LinkType::from(""), LinkType::Other);
    }

    #[test]
    fn unknown_value_is_kept_but_invalid() {
        let p = Priority::from("urgent");
        assert_eq!(p, Priority::Custom("urgent".into()));
        assert!(!p.is_valid());
        assert_eq!(p.to_string(), "urgent");
    }

    #[test]
    fn serde_uses_snake_case_strings() {
        let json = serde_json::to_string(&LinkType::PullRequest).unwrap();
        assert_eq!(json, "\"pull_request\"");
        let back: LinkType = serde_json::from_str("\"slack_thread\"").unwrap();
        assert_eq!(back, LinkType::SlackThread);
    }

    #[test]
    fn defaults() {
        assert!(Priority::default().is_default());
        assert_eq!(TaskStatus::default(), TaskStatus::New);
        assert!(!TaskStatus::Archived.is_default());
    }
}
