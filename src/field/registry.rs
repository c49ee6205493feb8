//! Field registry and the overlay target trait.
//!
//! A registry is the per-type ordered list of field descriptors the overlay
//! engine works from. It is normally generated by [`overlay_fields!`], but can
//! be assembled by hand with [`FieldRegistry::new`].

use super::{FieldKind, FieldType, FieldValue};
use crate::error::OverlayError;
use crate::naming;
use std::fmt::Display;
use std::str::FromStr;

/// Reads a field's current value.
pub type Getter<T> = fn(&T) -> FieldValue;

/// Coerces a raw string and assigns it. Must leave the target untouched on
/// error.
pub type Setter<T> = fn(&mut T, &str) -> Result<(), String>;

/// Descriptor for one field of `T`.
pub struct Field<T> {
    name: String,
    kind: FieldKind,
    type_label: String,
    optional: bool,
    required: bool,
    get: Getter<T>,
    set: Setter<T>,
}

impl<T> Field<T> {
    /// Create a descriptor for a field declared as `F`.
    ///
    /// `name` is the camel-case field name overrides are matched against.
    pub fn new<F: FieldType>(name: &str, required: bool, get: Getter<T>, set: Setter<T>) -> Self {
        Self {
            name: name.to_string(),
            kind: F::KIND,
            type_label: F::type_label(),
            optional: F::OPTIONAL,
            required,
            get,
            set,
        }
    }

    /// Create a descriptor for a field whose type is coerced through `FromStr`
    /// and rendered through `Display`. This covers types from other crates,
    /// such as decimals or socket addresses, that cannot implement
    /// [`FieldType`] here.
    pub fn parsed<F>(name: &str, required: bool, get: Getter<T>, set: Setter<T>) -> Self
    where
        F: FromStr + Display,
    {
        Self {
            name: name.to_string(),
            kind: FieldKind::Parsed,
            type_label: short_type_name(std::any::type_name::<F>()).to_string(),
            optional: false,
            required,
            get,
            set,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn type_label(&self) -> &str {
        &self.type_label
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether an overlay must supply this field when validation is on.
    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn env_key(&self, prefix: &str) -> String {
        naming::to_env_key(prefix, &self.name)
    }

    pub fn value(&self, target: &T) -> FieldValue {
        (self.get)(target)
    }

    /// Coerce `raw` into the declared type and assign it into `target`.
    pub fn apply(&self, target: &mut T, raw: &str) -> Result<(), OverlayError> {
        (self.set)(target, raw).map_err(|reason| OverlayError::InvalidOverrideValue {
            field: self.name.clone(),
            value: raw.to_string(),
            expected: self.type_label.clone(),
            reason,
        })
    }
}

impl<T> std::fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("type_label", &self.type_label)
            .field("optional", &self.optional)
            .field("required", &self.required)
            .finish()
    }
}

/// `rust_decimal::decimal::Decimal` becomes `Decimal`; generic paths are kept
/// whole.
fn short_type_name(full: &str) -> &str {
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}

/// Ordered field descriptors for a configuration type.
#[derive(Debug)]
pub struct FieldRegistry<T> {
    fields: Vec<Field<T>>,
}

impl<T> FieldRegistry<T> {
    /// Build a registry. Declaration order is kept; it is the order required
    /// fields are reported in.
    pub fn new(fields: Vec<Field<T>>) -> Self {
        Self { fields }
    }

    /// Look up a field by camel-case name. When two entries share a name the
    /// first one wins.
    pub fn get(&self, name: &str) -> Option<&Field<T>> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<T>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.name.as_str())
    }

    /// The override-required field set, in declaration order.
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name.as_str())
    }

    /// Environment key for every field, in declaration order.
    pub fn env_keys(&self, prefix: &str) -> Vec<(&str, String)> {
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.env_key(prefix)))
            .collect()
    }

    /// Current value of every field of `target`.
    pub fn snapshot(&self, target: &T) -> Vec<(&str, FieldValue)> {
        self.fields
            .iter()
            .map(|field| (field.name.as_str(), field.value(target)))
            .collect()
    }
}

/// A configuration type the overlay engine can operate on.
pub trait OverlayTarget: Sized + 'static {
    /// Field metadata, built once per type.
    fn registry() -> &'static FieldRegistry<Self>;

    /// Independent copy of `self`. Called before any override is applied.
    fn structural_copy(&self) -> Result<Self, OverlayError>;
}

/// Implement [`OverlayTarget`] for a flat struct.
///
/// The struct must implement `Clone`. Field names are the camelized Rust
/// identifiers. Each listed field's type must implement [`FieldType`] unless
/// the field carries `#[parse]`, in which case it only needs `FromStr` and
/// `Display`. Mark override-required fields with `#[required]`; markers can
/// be combined.
///
/// ```
/// use std::net::SocketAddr;
///
/// #[derive(Clone)]
/// struct AppConfig {
///     host: String,
///     retry_count: u32,
///     api_key: Option<String>,
///     listen: SocketAddr,
/// }
///
/// envlay::overlay_fields!(AppConfig {
///     host: String,
///     retry_count: u32,
///     #[required]
///     api_key: Option<String>,
///     #[parse]
///     listen: SocketAddr,
/// });
/// ```
#[macro_export]
macro_rules! overlay_fields {
    ($target:ident { $( $(#[$marker:ident])* $field:ident : $fty:ty ),* $(,)? }) => {
        impl $crate::OverlayTarget for $target {
            fn registry() -> &'static $crate::FieldRegistry<Self> {
                static REGISTRY: ::std::sync::OnceLock<$crate::FieldRegistry<$target>> =
                    ::std::sync::OnceLock::new();
                REGISTRY.get_or_init(|| {
                    $crate::FieldRegistry::new(::std::vec![
                        $(
                            $crate::__overlay_field!(
                                $target, $field, $fty, [$($marker)*], false, coerce
                            ),
                        )*
                    ])
                })
            }

            fn structural_copy(&self) -> ::std::result::Result<Self, $crate::OverlayError> {
                ::std::result::Result::Ok(::std::clone::Clone::clone(self))
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __overlay_field {
    ($target:ident, $field:ident, $fty:ty, [required $($rest:ident)*], $req:tt, $mode:ident) => {
        $crate::__overlay_field!($target, $field, $fty, [$($rest)*], true, $mode)
    };
    ($target:ident, $field:ident, $fty:ty, [parse $($rest:ident)*], $req:tt, $mode:ident) => {
        $crate::__overlay_field!($target, $field, $fty, [$($rest)*], $req, parse)
    };
    ($target:ident, $field:ident, $fty:ty, [], $req:tt, coerce) => {
        $crate::Field::<$target>::new::<$fty>(
            &$crate::field::field_name(::std::stringify!($field)),
            $req,
            |target: &$target| <$fty as $crate::FieldType>::to_value(&target.$field),
            |target: &mut $target, raw: &str| {
                target.$field = <$fty as $crate::FieldType>::parse_raw(raw)?;
                ::std::result::Result::Ok(())
            },
        )
    };
    ($target:ident, $field:ident, $fty:ty, [], $req:tt, parse) => {
        $crate::Field::<$target>::parsed::<$fty>(
            &$crate::field::field_name(::std::stringify!($field)),
            $req,
            |target: &$target| {
                $crate::FieldValue::String(::std::string::ToString::to_string(&target.$field))
            },
            |target: &mut $target, raw: &str| {
                target.$field = $crate::field::parse_from_str::<$fty>(raw)?;
                ::std::result::Result::Ok(())
            },
        )
    };
}
