//! Enumerated resource keys.
//!
//! Loadable units are named by closed enums rather than free-form strings,
//! so a misspelled component or library name fails to compile. Use the
//! [`resource_keys!`](crate::resource_keys) macro to declare a key type.

use std::fmt;
use std::hash::Hash;

/// A key identifying a loadable unit (a component or a shared library).
///
/// Keys are stable for the lifetime of the process.
pub trait ResourceKey:
    Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Stable external name, used in config files and logs.
    fn name(&self) -> &'static str;

    /// Every variant of this key type, in declaration order.
    fn all() -> &'static [Self];

    /// Look up a key by its external name.
    fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// Declare an enumerated key type implementing [`ResourceKey`].
///
/// ```
/// foresight_core::resource_keys! {
///     /// Lazily loaded screens.
///     pub enum Screen {
///         Dashboard => "dashboard",
///         Reports => "reports",
///     }
/// }
///
/// use foresight_core::ResourceKey;
/// assert_eq!(Screen::Reports.name(), "reports");
/// assert_eq!(Screen::from_name("dashboard"), Some(Screen::Dashboard));
/// assert_eq!("reports".parse::<Screen>().ok(), Some(Screen::Reports));
/// ```
#[macro_export]
macro_rules! resource_keys {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $key:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        $vis enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl $crate::ResourceKey for $name {
            fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $key),+
                }
            }

            fn all() -> &'static [Self] {
                $name::ALL
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str($crate::ResourceKey::name(self))
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::errors::ConfigError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                <$name as $crate::ResourceKey>::from_name(s).ok_or_else(|| {
                    $crate::errors::ConfigError::UnknownKey {
                        kind: stringify!($name),
                        key: s.to_string(),
                    }
                })
            }
        }

        impl $crate::__private::serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                serializer.serialize_str($crate::ResourceKey::name(self))
            }
        }

        impl<'de> $crate::__private::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: $crate::__private::serde::Deserializer<'de>,
            {
                let raw = <::std::string::String as $crate::__private::serde::Deserialize>::deserialize(
                    deserializer,
                )?;
                <$name as $crate::ResourceKey>::from_name(&raw).ok_or_else(|| {
                    <D::Error as $crate::__private::serde::de::Error>::custom(format!(
                        "unknown {} key: {}",
                        stringify!($name),
                        raw
                    ))
                })
            }
        }
    };
}
