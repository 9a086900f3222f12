//! Keyword conversions for small configuration and report enums
//!
//! Channel names, policies and statuses appear in configuration files,
//! environment variables and log fields. This macro gives each of them a
//! single canonical spelling for `Display` and a forgiving `FromStr`.
//!
//! # Example
//!
//! ```rust
//! use daybrief_domain::impl_keyword_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum Shift {
//!     Early,
//!     LateNight,
//! }
//!
//! impl_keyword_conversions!(Shift {
//!     Early => "early",
//!     LateNight => "late_night",
//! });
//!
//! assert_eq!("Late-Night".parse::<Shift>(), Ok(Shift::LateNight));
//! ```

/// Implements `Display` and `FromStr` for keyword enums.
///
/// Parsing trims surrounding whitespace, ignores case and treats `-` as `_`,
/// so `FILE-DROP`, `file_drop` and ` File_Drop ` all resolve to the same
/// variant. `Display` always produces the canonical keyword.
#[macro_export]
macro_rules! impl_keyword_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl ::std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(Self::$variant => f.write_str($str),)+
                }
            }
        }

        impl ::std::str::FromStr for $enum_name {
            type Err = ::std::string::String;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                let normalised = s.trim().to_ascii_lowercase().replace('-', "_");
                match normalised.as_str() {
                    $($str => ::core::result::Result::Ok(Self::$variant),)+
                    _ => ::core::result::Result::Err(::std::format!(
                        "unknown {} '{}' (expected one of: {})",
                        stringify!($enum_name),
                        s,
                        [$($str),+].join(", ")
                    )),
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Delivery {
        Mail,
        FileDrop,
    }

    impl_keyword_conversions!(Delivery {
        Mail => "mail",
        FileDrop => "file_drop",
    });

    #[test]
    fn display_uses_canonical_keyword() {
        assert_eq!(Delivery::Mail.to_string(), "mail");
        assert_eq!(Delivery::FileDrop.to_string(), "file_drop");
    }

    #[test]
    fn parsing_ignores_case_whitespace_and_dashes() {
        assert_eq!(Delivery::from_str("MAIL").unwrap(), Delivery::Mail);
        assert_eq!(Delivery::from_str(" file-drop ").unwrap(), Delivery::FileDrop);
        assert_eq!(Delivery::from_str("File_Drop").unwrap(), Delivery::FileDrop);
    }

    #[test]
    fn unknown_keyword_lists_the_accepted_values() {
        let err = Delivery::from_str("pigeon").unwrap_err();
        assert!(err.contains("unknown Delivery 'pigeon'"));
        assert!(err.contains("mail, file_drop"));
    }

    mod with_domain_result_in_scope {
        use std::str::FromStr;

        #[allow(unused_imports)]
        use crate::Result;

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        enum Tone {
            Quiet,
            Loud,
        }

        impl_keyword_conversions!(Tone {
            Quiet => "quiet",
            Loud => "loud",
        });

        #[test]
        fn expands_next_to_the_single_parameter_result_alias() {
            assert_eq!(Tone::from_str("LOUD").unwrap(), Tone::Loud);
            assert_eq!(Tone::Quiet.to_string(), "quiet");
            assert!(Tone::from_str("muted").unwrap_err().contains("quiet, loud"));
        }
    }
}
