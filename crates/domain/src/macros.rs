//! Macro for implementing the name/code tables of wire enums
//!
//! Every vocabulary enum that crosses the wire has two encodings: a numeric
//! discriminant used in JSON payloads and a stable name used for display and
//! parsing. This macro generates both tables from a single list so the two
//! directions can never drift apart.
//!
//! # Example
//!
//! ```rust
//! use remotebuild_domain::impl_wire_enum;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Priority {
//!     Low,
//!     High,
//! }
//!
//! impl_wire_enum!(Priority {
//!     Low => ("low", 0),
//!     High => ("high", 1),
//! });
//!
//! assert_eq!(Priority::High.as_str(), "high");
//! assert_eq!(Priority::from_code(0), Some(Priority::Low));
//! assert!("medium".parse::<Priority>().is_err());
//! ```

/// Implements the name and code tables for a wire enum
///
/// This macro generates:
/// - `ALL`: every declared variant, in declaration order
/// - `as_str` / `Display`: variant to name
/// - `FromStr`: exact (case-sensitive) name to variant, failing with
///   [`ParseEnumError`](crate::errors::ParseEnumError) on unknown input
/// - `code` / `From<Enum> for u8`: variant to numeric discriminant
/// - `from_code`: numeric discriminant to variant, `None` when unknown
///
/// Lenient parsing (unknown input mapped to a sentinel) is deliberately not
/// generated; types that need it opt in explicitly.
#[macro_export]
macro_rules! impl_wire_enum {
    ($enum_name:ident { $($variant:ident => ($str:literal, $code:literal)),+ $(,)? }) => {
        impl $enum_name {
            /// Every declared variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stable name of this variant.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }

            /// Numeric discriminant used on the wire.
            pub const fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code,)+
                }
            }

            /// Look up a variant by its numeric discriminant.
            pub const fn from_code(code: u8) -> Option<Self> {
                match code {
                    $(c if c == $code => Some(Self::$variant),)+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = $crate::errors::ParseEnumError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                match s {
                    $($str => Ok(Self::$variant),)+
                    _ => Err($crate::errors::ParseEnumError::new(stringify!($enum_name), s)),
                }
            }
        }

        impl From<$enum_name> for u8 {
            fn from(value: $enum_name) -> Self {
                value.code()
            }
        }
    };
}
