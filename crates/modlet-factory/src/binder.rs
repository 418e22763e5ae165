//! Declarative property binding.
//!
//! Implementations declare their configurable properties in a
//! [`PropertyTable`]: a closed set of named entries, each with a coercion
//! rule and a setter. The binder walks a service's textual properties,
//! coerces each value to the declared kind and invokes the setter. There is
//! no runtime introspection; the table is the whole contract.

use crate::{Error, Result};
use modlet_model::Property;
use std::any::Any;

/// A coerced property value handed to a setter.
#[derive(Debug)]
pub enum PropertyValue {
    Text(String),
    Char(char),
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Output of a [`PropertyKind::Parsed`] rule.
    Other(Box<dyn Any + Send + Sync>),
}

impl PropertyValue {
    pub fn into_text(self) -> Option<String> {
        match self {
            PropertyValue::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_char(self) -> Option<char> {
        match self {
            PropertyValue::Char(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_bool(self) -> Option<bool> {
        match self {
            PropertyValue::Bool(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_int(self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_float(self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_other<T: Any>(self) -> Option<T> {
        match self {
            PropertyValue::Other(v) => v.downcast::<T>().ok().map(|b| *b),
            _ => None,
        }
    }
}

/// Coercion rule applied to the textual value of a property.
#[derive(Clone, Copy)]
pub enum PropertyKind {
    /// Assign the text verbatim.
    Text,
    /// The value must be exactly one character.
    Char,
    Bool,
    Int,
    Float,
    /// Custom single-string factory, the `valueOf`-shaped escape hatch.
    Parsed(fn(&str) -> std::result::Result<PropertyValue, String>),
}

impl PropertyKind {
    /// An integer constrained to `i32` range, carried as
    /// [`PropertyValue::Int`]. Out-of-range values fail the bind instead of
    /// wrapping.
    pub fn int32() -> Self {
        PropertyKind::Parsed(|value| {
            value
                .parse::<i32>()
                .map(|i| PropertyValue::Int(i64::from(i)))
                .map_err(|e| e.to_string())
        })
    }

    fn label(&self) -> &'static str {
        match self {
            PropertyKind::Text => "text",
            PropertyKind::Char => "char",
            PropertyKind::Bool => "bool",
            PropertyKind::Int => "int",
            PropertyKind::Float => "float",
            PropertyKind::Parsed(_) => "parsed",
        }
    }
}

impl std::fmt::Debug for PropertyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Setter invoked with the coerced value, or with `None` for a valueless
/// property.
pub type Setter<T> = fn(&mut T, Option<PropertyValue>);

/// One declared property of a configurable implementation.
pub struct PropertySpec<T> {
    pub name: &'static str,
    pub kind: PropertyKind,
    /// Absent for read-only properties.
    pub setter: Option<Setter<T>>,
}

/// The closed set of properties an implementation accepts.
pub struct PropertyTable<T> {
    entries: Vec<PropertySpec<T>>,
}

impl<T> PropertyTable<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn writable(mut self, name: &'static str, kind: PropertyKind, setter: Setter<T>) -> Self {
        self.entries.push(PropertySpec {
            name,
            kind,
            setter: Some(setter),
        });
        self
    }

    pub fn read_only(mut self, name: &'static str, kind: PropertyKind) -> Self {
        self.entries.push(PropertySpec {
            name,
            kind,
            setter: None,
        });
        self
    }

    fn find(&self, name: &str) -> Option<&PropertySpec<T>> {
        self.entries.iter().find(|e| e.name == name)
    }
}

impl<T> Default for PropertyTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implemented by every service object that accepts declarative properties.
pub trait Configurable: Sized {
    fn property_table() -> PropertyTable<Self>;
}

fn coerce(
    kind: &PropertyKind,
    value: &str,
    implementation: &str,
    property: &str,
) -> Result<PropertyValue> {
    match kind {
        PropertyKind::Text => Ok(PropertyValue::Text(value.to_string())),
        PropertyKind::Char => {
            let mut chars = value.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(PropertyValue::Char(c)),
                _ => Err(Error::UnsupportedPropertyType {
                    implementation: implementation.to_string(),
                    property: property.to_string(),
                    kind: kind.label().to_string(),
                    value: value.to_string(),
                }),
            }
        }
        PropertyKind::Bool => value.parse::<bool>().map(PropertyValue::Bool).map_err(|e| {
            Error::PropertyBinding {
                implementation: implementation.to_string(),
                property: property.to_string(),
                message: e.to_string(),
            }
        }),
        PropertyKind::Int => value.parse::<i64>().map(PropertyValue::Int).map_err(|e| {
            Error::PropertyBinding {
                implementation: implementation.to_string(),
                property: property.to_string(),
                message: e.to_string(),
            }
        }),
        PropertyKind::Float => value.parse::<f64>().map(PropertyValue::Float).map_err(|e| {
            Error::PropertyBinding {
                implementation: implementation.to_string(),
                property: property.to_string(),
                message: e.to_string(),
            }
        }),
        PropertyKind::Parsed(parse) => parse(value).map_err(|message| Error::PropertyBinding {
            implementation: implementation.to_string(),
            property: property.to_string(),
            message,
        }),
    }
}

/// Bind every `Property` onto `target` through its declared table.
///
/// A valueless property invokes the setter with `None` without attempting
/// any conversion.
pub fn bind_properties<T: Configurable>(
    target: &mut T,
    implementation: &str,
    properties: &[Property],
) -> Result<()> {
    let table = T::property_table();
    for property in properties {
        let entry = table.find(&property.name).ok_or_else(|| Error::GetterNotFound {
            implementation: implementation.to_string(),
            property: property.name.clone(),
        })?;
        let setter = entry.setter.ok_or_else(|| Error::SetterNotFound {
            implementation: implementation.to_string(),
            property: property.name.clone(),
        })?;
        match &property.value {
            None => setter(target, None),
            Some(value) => {
                let coerced = coerce(&entry.kind, value, implementation, &property.name)?;
                setter(target, Some(coerced));
            }
        }
    }
    Ok(())
}
