//! Type helper utilities for syn type analysis.

/// Coercion kind of a field type, matched on the last path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Text,
    Int,
    Float,
    Bool,
}

/// Classify `ty`, or `None` for types a record cannot be coerced into.
///
/// Recognizes `String`, the primitive integer and float types, and `bool`, with or
/// without a leading path (`std::string::String`).
pub fn scalar_kind(ty: &syn::Type) -> Option<ScalarKind> {
    let syn::Type::Path(type_path) = ty else {
        return None;
    };
    if type_path.qself.is_some() {
        return None;
    }
    let seg = type_path.path.segments.last()?;
    if !matches!(seg.arguments, syn::PathArguments::None) {
        return None;
    }

    match seg.ident.to_string().as_str() {
        "String" => Some(ScalarKind::Text),
        "i8" | "i16" | "i32" | "i64" | "isize" | "u8" | "u16" | "u32" | "u64" | "usize" => {
            Some(ScalarKind::Int)
        }
        "f32" | "f64" => Some(ScalarKind::Float),
        "bool" => Some(ScalarKind::Bool),
        _ => None,
    }
}
