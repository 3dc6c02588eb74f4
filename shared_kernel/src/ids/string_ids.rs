/// Declares a serde-transparent `String` newtype used as a key or an opaque value
/// that is persisted and compared, never interpreted.
#[macro_export]
macro_rules! string_key {
    ($TypeName: ident) => {
        #[derive(
            Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $TypeName(String);

        impl $TypeName {
            pub fn inner(&self) -> String {
                self.0.clone()
            }
        }

        impl PartialEq<str> for $TypeName {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl std::fmt::Display for $TypeName {
            fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $TypeName {
            fn from(value: String) -> Self {
                $TypeName(value)
            }
        }

        impl From<&str> for $TypeName {
            fn from(value: &str) -> Self {
                $TypeName(value.to_owned())
            }
        }

        impl From<$TypeName> for String {
            fn from(value: $TypeName) -> Self {
                value.0
            }
        }

        impl AsRef<str> for $TypeName {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}
