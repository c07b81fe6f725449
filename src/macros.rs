//! Crate-internal helper macros.

/// Declare a closed set of string tags as a fieldless enum.
///
/// Generates the enum (serde-renamed to its wire tag), an `ALL` slice in
/// declaration order, `COUNT`, `index()`, `as_str()`, `Display`, and a
/// `FromStr` that rejects anything outside the set with
/// [`ContractError::UnknownTag`](crate::error::ContractError::UnknownTag).
///
/// Usage:
/// ```ignore
/// closed_tags! {
///     /// Time of day.
///     pub enum TimeOfDay("time of day") {
///         Morning => "morning",
///         Night => "night",
///     }
/// }
/// ```
macro_rules! closed_tags {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident ($kind:literal) {
            $(
                $(#[$vmeta:meta])*
                $variant:ident => $tag:literal
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            serde::Serialize,
            serde::Deserialize,
        )]
        $vis enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $tag)]
                $variant,
            )+
        }

        impl $name {
            /// Every member, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Number of members.
            pub const COUNT: usize = [$($tag),+].len();

            /// Position in declaration order.
            pub fn index(self) -> usize {
                self as usize
            }

            /// The wire tag.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $tag,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::ContractError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    _ => Err($crate::error::ContractError::UnknownTag {
                        kind: $kind,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}
