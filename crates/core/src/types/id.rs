//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`
/// - `From<String>`, `From<&str>`, `AsRef<str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use drape_core::define_id;
/// define_id!(FabricId);
/// define_id!(SwatchId);
///
/// let fabric = FabricId::new("linen");
/// let swatch = SwatchId::new("linen");
///
/// // These are different types, so this won't compile:
/// // let _: FabricId = swatch;
/// assert_eq!(fabric.as_str(), swatch.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Catalog entity IDs. Product IDs double as URL handles.
define_id!(ProductId);
define_id!(VariantId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_and_as_str() {
        let id = ProductId::new("curtain-001");
        assert_eq!(id.as_str(), "curtain-001");
        assert_eq!(id.to_string(), "curtain-001");
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = VariantId::from("drop-var");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"drop-var\"");

        let parsed: VariantId = serde_json::from_str("\"fabric-panel-var\"").unwrap();
        assert_eq!(parsed.as_str(), "fabric-panel-var");
    }
}
