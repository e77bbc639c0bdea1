//! Macro for implementing Display and FromStr for status enums
//!
//! Status enums are stored as lowercase text columns; this macro keeps the
//! string mapping in one place for both directions.
//!
//! # Example
//!
//! ```rust
//! use stillmint_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum MintStatus {
//!     Pending,
//!     Confirmed,
//! }
//!
//! impl_domain_status_conversions!(MintStatus {
//!     Pending => "pending",
//!     Confirmed => "confirmed",
//! });
//!
//! assert_eq!(MintStatus::Confirmed.to_string(), "confirmed");
//! assert_eq!("PENDING".parse::<MintStatus>(), Ok(MintStatus::Pending));
//! ```

/// Implements Display and FromStr traits for status enums
///
/// - Display writes the mapped string
/// - FromStr parses case-insensitively and reports the enum name on failure
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
