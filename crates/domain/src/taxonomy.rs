//! Closed string taxonomies of the hub convention.
//!
//! Each taxonomy is a fixed bijection between a variant and its canonical wire
//! token. The "no value" case is expressed as `Option::None` by the callers and
//! is never serialized.

/// Define a taxonomy enum together with its wire-token conversions.
macro_rules! define_taxonomy {
    (
        $(#[doc = $doc:expr])*
        $name:ident ($label:literal) {
            $($variant:ident => $token:literal),+ $(,)?
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Canonical wire token.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $token),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = $crate::error::ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok(Self::$variant),)+
                    _ => Err($crate::error::ValidationError::UnknownToken {
                        taxonomy: $label,
                        token: s.to_string(),
                    }),
                }
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

mod binary_sensor;
mod button;
mod cover;
mod lock;
mod sensor;

pub use binary_sensor::{BinarySensorClass, BinarySensorState};
pub use button::ButtonClass;
pub use cover::{CoverClass, CoverState};
pub use lock::LockState;
pub use sensor::SensorClass;

define_taxonomy!(
    /// Category that moves an entity out of the main controls of a device page.
    EntityCategory("entity category") {
        Config => "config",
        Diagnostic => "diagnostic",
    }
);
