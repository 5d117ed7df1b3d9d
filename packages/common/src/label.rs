use std::fmt;

/// Error when parsing a string that is not one of an enum's wire labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLabelError {
    kind: &'static str,
    invalid: String,
    expected: &'static [&'static str],
}

impl ParseLabelError {
    pub(crate) fn new(kind: &'static str, invalid: &str, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            invalid: invalid.to_string(),
            expected,
        }
    }

    /// The rejected input.
    pub fn invalid(&self) -> &str {
        &self.invalid
    }
}

impl fmt::Display for ParseLabelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}'. Valid values: {}",
            self.kind,
            self.invalid,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for ParseLabelError {}

/// Declares a fieldless enum whose wire form (serde, database, query strings)
/// is a fixed kebab/lowercase label per variant.
///
/// Generates `ALL`, `LABELS`, `as_str`, `Display` and `FromStr`. With the
/// `sea-orm` feature the enum is also a string-backed `ActiveEnum`.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $kind:literal enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $label:tt, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
            utoipa::ToSchema,
        )]
        #[cfg_attr(
            feature = "sea-orm",
            derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
            sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
        )]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $label)]
                #[cfg_attr(feature = "sea-orm", sea_orm(string_value = $label))]
                $variant,
            )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Wire labels in declaration order.
            pub const LABELS: &'static [&'static str] = &[$($label),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::label::ParseLabelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err($crate::label::ParseLabelError::new($kind, s, Self::LABELS)),
                }
            }
        }
    };
}

pub(crate) use labelled_enum;
