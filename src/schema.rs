//! Record descriptors: what registration reads from an application type.
//!
//! `#[derive(AdminModel)]` generates the impl for structs with named fields;
//! hand-written impls work the same way.

use crate::field::FieldKind;
use std::any::Any;

/// Primitive category of a declared attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    /// `String`, `&str`, `char`, `Cow<str>`.
    Str,
    /// Any integer width or signedness.
    Int,
    /// `f32` / `f64`.
    Float,
    Bool,
    /// Composite value; by convention a date or time.
    Struct,
    /// Pointer-like (`&T`, `Box<T>`, `Rc<T>`, `Arc<T>`): a foreign key to another record.
    Reference,
    /// Arrays, tuples, collections and anything else unmatched.
    Other,
}

impl AttributeKind {
    /// Field variant for this kind, or `None` when the kind has no dedicated variant.
    pub fn field_kind(self) -> Option<FieldKind> {
        match self {
            AttributeKind::Str => Some(FieldKind::Text),
            AttributeKind::Int => Some(FieldKind::Integer),
            AttributeKind::Float => Some(FieldKind::Float),
            AttributeKind::Struct => Some(FieldKind::Time),
            AttributeKind::Bool | AttributeKind::Reference | AttributeKind::Other => None,
        }
    }

    pub fn is_reference(self) -> bool {
        matches!(self, AttributeKind::Reference)
    }
}

/// One declared attribute of a record type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    /// Raw declarative annotation (`label=Title,list`); empty when absent.
    pub tag: &'static str,
}

impl Attribute {
    pub const fn new(name: &'static str, kind: AttributeKind, tag: &'static str) -> Self {
        Attribute { name, kind, tag }
    }
}

/// A record type that can be registered with the admin.
pub trait AdminModel: Any + Send + Sync {
    /// Declared attributes in source order.
    fn attributes() -> Vec<Attribute>
    where
        Self: Sized;

    /// Preferred display name. Overrides the type-derived name when `Some`.
    fn admin_name(&self) -> Option<String> {
        None
    }

    /// Explicit storage table name, bypassing the name-transform.
    fn table_name() -> Option<&'static str>
    where
        Self: Sized,
    {
        None
    }
}

/// Unqualified type name: module path and generic arguments stripped.
pub fn type_display_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    let base = base.trim_start_matches('&').trim_start_matches("mut ");
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod blog {
        pub struct BlogPost<T>(pub T);
    }

    #[test]
    fn display_name_strips_path_and_generics() {
        assert_eq!(type_display_name::<blog::BlogPost<String>>(), "BlogPost");
        assert_eq!(type_display_name::<String>(), "String");
        assert_eq!(type_display_name::<&blog::BlogPost<u8>>(), "BlogPost");
    }

    #[test]
    fn every_kind_resolves_or_falls_back() {
        let kinds = [
            AttributeKind::Str,
            AttributeKind::Int,
            AttributeKind::Float,
            AttributeKind::Bool,
            AttributeKind::Struct,
            AttributeKind::Reference,
            AttributeKind::Other,
        ];
        for kind in kinds {
            let resolved = FieldKind::select(kind, None);
            assert_eq!(resolved, kind.field_kind().unwrap_or(FieldKind::Text));
        }
    }
}
