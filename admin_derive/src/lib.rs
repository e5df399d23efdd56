use proc_macro::TokenStream;

mod admin_model;

/// Implement `AdminModel` for a struct with named fields.
///
/// Field annotations: `#[admin("label=Title,list")]` or `#[admin = "-"]`.
/// Struct options: `#[admin(name = "Blog Posts", table = "posts")]`.
#[proc_macro_derive(AdminModel, attributes(admin))]
pub fn derive_admin_model(input: TokenStream) -> TokenStream {
    admin_model::derive_admin_model(input.into()).into()
}
