//! Field type system
//!
//! Every overlay target field has a declared type implementing [`FieldType`],
//! which knows how to coerce a raw environment string into a value and how to
//! render the current value for reports.

pub mod registry;

pub use registry::{Field, FieldRegistry, Getter, OverlayTarget, Setter};

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Type tag stored on each registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    String,
    Bool,
    Char,
    SignedInt,
    UnsignedInt,
    Float,
    Path,
    /// Coerced through `FromStr`, rendered through `Display`
    Parsed,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FieldKind::String => "string",
            FieldKind::Bool => "bool",
            FieldKind::Char => "char",
            FieldKind::SignedInt => "signed integer",
            FieldKind::UnsignedInt => "unsigned integer",
            FieldKind::Float => "float",
            FieldKind::Path => "path",
            FieldKind::Parsed => "parsed",
        };
        f.write_str(label)
    }
}

/// Rendered value of a field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    Char(char),
    SignedInt(i128),
    UnsignedInt(u128),
    Float(f64),
    Path(PathBuf),
    /// An optional field holding no value
    Unset,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(v) => f.write_str(v),
            FieldValue::Bool(v) => write!(f, "{}", v),
            FieldValue::Char(v) => write!(f, "{}", v),
            FieldValue::SignedInt(v) => write!(f, "{}", v),
            FieldValue::UnsignedInt(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{}", v),
            FieldValue::Path(v) => write!(f, "{}", v.display()),
            FieldValue::Unset => f.write_str("<unset>"),
        }
    }
}

/// A type that can be the declared type of an overlay field.
///
/// `parse_raw` must not produce a value unless the whole raw string is a
/// valid representation; the error string becomes the reason in
/// `InvalidOverrideValue`.
pub trait FieldType: Sized {
    const KIND: FieldKind;
    const OPTIONAL: bool = false;

    /// Human readable type name used in error messages.
    fn type_label() -> String;

    fn parse_raw(raw: &str) -> Result<Self, String>;

    fn to_value(&self) -> FieldValue;
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::String;

    fn type_label() -> String {
        "String".to_string()
    }

    fn parse_raw(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::String(self.clone())
    }
}

impl FieldType for PathBuf {
    const KIND: FieldKind = FieldKind::Path;

    fn type_label() -> String {
        "PathBuf".to_string()
    }

    fn parse_raw(raw: &str) -> Result<Self, String> {
        Ok(PathBuf::from(raw))
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Path(self.clone())
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn type_label() -> String {
        "bool".to_string()
    }

    fn parse_raw(raw: &str) -> Result<Self, String> {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err("expected 'true' or 'false'".to_string())
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }
}

impl FieldType for char {
    const KIND: FieldKind = FieldKind::Char;

    fn type_label() -> String {
        "char".to_string()
    }

    fn parse_raw(raw: &str) -> Result<Self, String> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            (None, _) => Err("expected exactly one character, got none".to_string()),
            (Some(_), Some(_)) => Err(format!(
                "expected exactly one character, got {}",
                raw.chars().count()
            )),
        }
    }

    fn to_value(&self) -> FieldValue {
        FieldValue::Char(*self)
    }
}

macro_rules! signed_field_types {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::SignedInt;

                fn type_label() -> String {
                    stringify!($ty).to_string()
                }

                fn parse_raw(raw: &str) -> Result<Self, String> {
                    parse_from_str(raw)
                }

                fn to_value(&self) -> FieldValue {
                    FieldValue::SignedInt(*self as i128)
                }
            }
        )*
    };
}

macro_rules! unsigned_field_types {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::UnsignedInt;

                fn type_label() -> String {
                    stringify!($ty).to_string()
                }

                fn parse_raw(raw: &str) -> Result<Self, String> {
                    parse_from_str(raw)
                }

                fn to_value(&self) -> FieldValue {
                    FieldValue::UnsignedInt(*self as u128)
                }
            }
        )*
    };
}

macro_rules! float_field_types {
    ($($ty:ty),*) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::Float;

                fn type_label() -> String {
                    stringify!($ty).to_string()
                }

                fn parse_raw(raw: &str) -> Result<Self, String> {
                    parse_from_str(raw)
                }

                fn to_value(&self) -> FieldValue {
                    FieldValue::Float(*self as f64)
                }
            }
        )*
    };
}

signed_field_types!(i8, i16, i32, i64, i128, isize);
unsigned_field_types!(u8, u16, u32, u64, u128, usize);
float_field_types!(f32, f64);

/// An empty raw value clears the option; anything else must parse as `T`.
impl<T: FieldType> FieldType for Option<T> {
    const KIND: FieldKind = T::KIND;
    const OPTIONAL: bool = true;

    fn type_label() -> String {
        format!("Option<{}>", T::type_label())
    }

    fn parse_raw(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            Ok(None)
        } else {
            T::parse_raw(raw).map(Some)
        }
    }

    fn to_value(&self) -> FieldValue {
        match self {
            Some(value) => value.to_value(),
            None => FieldValue::Unset,
        }
    }
}

/// Standard textual parse of a trimmed raw value.
pub fn parse_from_str<F>(raw: &str) -> Result<F, String>
where
    F: FromStr,
    F::Err: fmt::Display,
{
    raw.trim().parse::<F>().map_err(|e| e.to_string())
}

/// Field name for a Rust identifier: raw-identifier marker stripped, then
/// camelized the same way environment keys are.
pub fn field_name(ident: &str) -> String {
    let ident = ident.strip_prefix("r#").unwrap_or(ident);
    crate::naming::camelize(ident)
}
