//! Closed status enumerations shared by the wire models.
//!
//! The backend is not consistent about casing ("Completed" vs "completed"),
//! so every enum here parses case-insensitively and always writes one
//! canonical spelling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Error returned when a status string is not a known variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} value: {value:?}")]
pub struct UnknownStatus {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $wire:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Canonical wire spelling.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }

            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$(Self::$variant),+];
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($wire) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(UnknownStatus {
                    kind: $kind,
                    value: s.to_string(),
                })
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.as_str().eq_ignore_ascii_case(other.trim())
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self == *other
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum! {
    /// Lifecycle state of a booking.
    ///
    /// Only `Unpaid -> Paid` (payment confirmation, done by the backend) and
    /// `Unpaid -> removed` (cancel) are legal.
    BookingStatus, "booking status" {
        Unpaid => "Unpaid",
        Pending => "Pending",
        Paid => "Paid",
    }
}

wire_enum! {
    /// Settlement state of a payment record.
    PaymentStatus, "payment status" {
        Paid => "paid",
        Pending => "pending",
    }
}

wire_enum! {
    /// Decorator-reported progress on an assigned payment.
    WorkStatus, "work status" {
        Pending => "pending",
        Processing => "processing",
        Completed => "completed",
    }
}

wire_enum! {
    /// Authorization role of a user account.
    Role, "role" {
        User => "user",
        Decorator => "decorator",
        Admin => "admin",
    }
}

impl WorkStatus {
    /// Position in the `pending -> processing -> completed` progression.
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Pending => 0,
            Self::Processing => 1,
            Self::Completed => 2,
        }
    }

    /// The next status, or `None` when already completed.
    pub const fn next(&self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Processing),
            Self::Processing => Some(Self::Completed),
            Self::Completed => None,
        }
    }

    /// The previous status, or `None` when still pending.
    pub const fn previous(&self) -> Option<Self> {
        match self {
            Self::Pending => None,
            Self::Processing => Some(Self::Pending),
            Self::Completed => Some(Self::Processing),
        }
    }

    /// True if moving to `target` goes strictly forward.
    pub fn is_forward_to(&self, target: WorkStatus) -> bool {
        target.rank() > self.rank()
    }
}

impl Default for WorkStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}
