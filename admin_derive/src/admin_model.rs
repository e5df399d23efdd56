use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    ext::IdentExt, Attribute, Data, DeriveInput, Error, Expr, ExprLit, Fields, GenericArgument, Lit,
    LitStr, Meta, PathArguments, Type,
};

// derive_admin_model
pub fn derive_admin_model(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };
    expand(&input).unwrap_or_else(Error::into_compile_error)
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ident = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "AdminModel can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "AdminModel can only be derived for structs with named fields",
            ))
        }
    };

    let options = StructOptions::parse(&input.attrs)?;

    let mut attributes = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let name = field_ident.unraw().to_string();
        let kind = format_ident!("{}", classify(&field.ty).as_str());
        let tag = field_tag(&field.attrs)?.map_or_else(String::new, |lit| lit.value());
        attributes.push(quote! {
            ::architect_admin::Attribute::new(#name, ::architect_admin::AttributeKind::#kind, #tag)
        });
    }

    let admin_name = options.name.map(|name| {
        quote! {
            fn admin_name(&self) -> ::std::option::Option<::std::string::String> {
                ::std::option::Option::Some(::std::string::String::from(#name))
            }
        }
    });
    let table_name = options.table.map(|table| {
        quote! {
            fn table_name() -> ::std::option::Option<&'static str> {
                ::std::option::Option::Some(#table)
            }
        }
    });

    Ok(quote! {
        impl #impl_generics ::architect_admin::AdminModel for #ident #ty_generics #where_clause {
            fn attributes() -> ::std::vec::Vec<::architect_admin::Attribute> {
                ::std::vec![#(#attributes),*]
            }

            #admin_name
            #table_name
        }
    })
}

///
/// StructOptions
///

#[derive(Default)]
struct StructOptions {
    name: Option<LitStr>,
    table: Option<LitStr>,
}

impl StructOptions {
    fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut options = StructOptions::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("admin")) {
            attr.parse_nested_meta(|meta| {
                let slot = if meta.path.is_ident("name") {
                    &mut options.name
                } else if meta.path.is_ident("table") {
                    &mut options.table
                } else {
                    return Err(meta.error("unsupported admin option, expected `name` or `table`"));
                };
                if slot.is_some() {
                    return Err(meta.error("duplicate admin option"));
                }
                *slot = Some(meta.value()?.parse()?);
                Ok(())
            })?;
        }
        Ok(options)
    }
}

/// The raw annotation string of one field, if it has an `#[admin]` attribute.
fn field_tag(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut tag = None;
    for attr in attrs.iter().filter(|a| a.path().is_ident("admin")) {
        if tag.is_some() {
            return Err(Error::new_spanned(attr, "duplicate #[admin] attribute"));
        }
        let lit = match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(s), ..
                }) => s.clone(),
                other => return Err(Error::new_spanned(other, "expected a string literal")),
            },
            Meta::List(_) => attr.parse_args::<LitStr>()?,
            Meta::Path(path) => {
                return Err(Error::new_spanned(
                    path,
                    "expected #[admin(\"...\")] or #[admin = \"...\"]",
                ))
            }
        };
        tag = Some(lit);
    }
    Ok(tag)
}

///
/// Kind
///

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Str,
    Int,
    Float,
    Bool,
    Struct,
    Reference,
    Other,
}

impl Kind {
    const fn as_str(self) -> &'static str {
        match self {
            Kind::Str => "Str",
            Kind::Int => "Int",
            Kind::Float => "Float",
            Kind::Bool => "Bool",
            Kind::Struct => "Struct",
            Kind::Reference => "Reference",
            Kind::Other => "Other",
        }
    }
}

/// Primitive category of a field type, by syntax. `Option<T>` classifies as `T`; `&str` is text.
fn classify(ty: &Type) -> Kind {
    match ty {
        Type::Reference(r) => match classify(&r.elem) {
            Kind::Str => Kind::Str,
            _ => Kind::Reference,
        },
        Type::Ptr(_) => Kind::Reference,
        Type::Paren(inner) => classify(&inner.elem),
        Type::Group(inner) => classify(&inner.elem),
        Type::Path(path) if path.qself.is_none() => {
            let Some(segment) = path.path.segments.last() else {
                return Kind::Other;
            };
            match segment.ident.to_string().as_str() {
                "Option" => first_type_arg(&segment.arguments).map_or(Kind::Other, classify),
                "Box" | "Rc" | "Arc" => Kind::Reference,
                "String" | "str" | "char" | "Cow" => Kind::Str,
                "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
                | "u128" | "usize" => Kind::Int,
                "f32" | "f64" => Kind::Float,
                "bool" => Kind::Bool,
                "Vec" | "VecDeque" | "HashMap" | "BTreeMap" | "HashSet" | "BTreeSet" => Kind::Other,
                _ => Kind::Struct,
            }
        }
        _ => Kind::Other,
    }
}

fn first_type_arg(arguments: &PathArguments) -> Option<&Type> {
    match arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(ty) => Some(ty),
            _ => None,
        }),
        _ => None,
    }
}
