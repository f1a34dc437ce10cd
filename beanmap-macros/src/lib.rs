//! Procedural macros for beanmap.
//!
//! - `#[derive(Bean)]`: Implements `beanmap::Bean` for a struct with named fields,
//!   generating one property descriptor per field.
//!
//! Usage:
//! ```rust,ignore
//! use beanmap::Bean;
//!
//! #[derive(Default, Bean)]
//! struct Person {
//!     name: String,
//!     #[bean(rename = "years")]
//!     age: u8,
//!     #[bean(read_only)]
//!     id: u64,
//!     #[bean(skip)]
//!     cache: Vec<u8>,
//! }
//! ```
use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Field, Fields, LitStr, Path, ext::IdentExt, parse_macro_input,
    spanned::Spanned,
};

/// Derives `beanmap::Bean`.
///
/// Every named field becomes a property of the field's type, readable and
/// writable unless configured otherwise. Field types must implement
/// `beanmap::PropertyType`.
///
/// # Field attributes
///
/// - `#[bean(skip)]`: not a property.
/// - `#[bean(rename = "name")]`: property name other than the field name.
/// - `#[bean(read_only)]` / `#[bean(write_only)]`: omit the mutator / accessor.
/// - `#[bean(getter = path)]`: custom accessor, `fn(&Self) -> Result<T, beanmap::AccessError>`.
/// - `#[bean(setter = path)]`: custom mutator, `fn(&mut Self, T) -> Result<(), beanmap::AccessError>`.
///
/// # Container attributes
///
/// - `#[bean(no_default)]`: the type has no zero-argument constructor, so
///   resetting or cloning a map over it fails. Without it the type must
///   implement `Default`.
///
/// # Example
///
/// ```rust,ignore
/// use beanmap::{AccessError, Bean};
///
/// #[derive(Bean)]
/// #[bean(no_default)]
/// struct Temperature {
///     #[bean(setter = Temperature::set_celsius)]
///     celsius: f64,
/// }
///
/// impl Temperature {
///     fn set_celsius(&mut self, value: f64) -> Result<(), AccessError> {
///         if value < -273.15 {
///             return Err(AccessError::failed("below absolute zero"));
///         }
///         self.celsius = value;
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_derive(Bean, attributes(bean))]
pub fn derive_bean(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_bean(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_bean(input: DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let ident = input.ident.clone();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let container = ContainerOptions::parse(&input.attrs)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new(
                    data.fields.span(),
                    "Bean can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Bean can only be derived for structs with named fields",
            ));
        }
    };

    let mut properties = Vec::new();
    for field in fields {
        let options = FieldOptions::parse(field)?;
        if options.skip {
            continue;
        }
        properties.push(property_descriptor(field, options));
    }

    let new_instance = if container.no_default {
        quote! {
            ::std::result::Result::Err(beanmap::ConstructionError::no_default(
                ::std::any::type_name::<Self>(),
            ))
        }
    } else {
        quote! {
            ::std::result::Result::Ok(::std::boxed::Box::new(
                <Self as ::std::default::Default>::default(),
            ))
        }
    };

    Ok(quote! {
        impl #impl_generics beanmap::Bean for #ident #ty_generics #where_clause {
            fn describe(
                &self,
            ) -> ::std::result::Result<
                ::std::vec::Vec<beanmap::PropertyDescriptor>,
                beanmap::IntrospectionError,
            > {
                ::std::result::Result::Ok(::std::vec![#(#properties),*])
            }

            fn new_instance(
                &self,
            ) -> ::std::result::Result<::std::boxed::Box<dyn beanmap::Bean>, beanmap::ConstructionError>
            {
                #new_instance
            }
        }
    })
}

fn property_descriptor(field: &Field, options: FieldOptions) -> proc_macro2::TokenStream {
    // Named fields always carry an ident.
    let Some(member) = field.ident.as_ref() else {
        return quote! {};
    };
    let ty = &field.ty;
    let name = options
        .rename
        .unwrap_or_else(|| member.unraw().to_string());

    let getter = if options.write_only {
        quote! {}
    } else if let Some(path) = options.getter {
        quote! { .getter(|bean: &Self| #path(bean)) }
    } else {
        quote! {
            .getter(|bean: &Self| {
                ::std::result::Result::Ok(::std::clone::Clone::clone(&bean.#member))
            })
        }
    };

    let setter = if options.read_only {
        quote! {}
    } else if let Some(path) = options.setter {
        quote! { .setter(|bean: &mut Self, value: #ty| #path(bean, value)) }
    } else {
        quote! {
            .setter(|bean: &mut Self, value: #ty| {
                bean.#member = value;
                ::std::result::Result::Ok(())
            })
        }
    };

    quote! {
        beanmap::PropertyDescriptor::typed::<Self, #ty>(#name)
            #getter
            #setter
            .build()
    }
}

#[derive(Default)]
struct ContainerOptions {
    no_default: bool,
}

impl ContainerOptions {
    fn parse(attrs: &[syn::Attribute]) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident("bean")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("no_default") {
                    options.no_default = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported bean container attribute"))
                }
            })?;
        }
        Ok(options)
    }
}

#[derive(Default)]
struct FieldOptions {
    skip: bool,
    read_only: bool,
    write_only: bool,
    rename: Option<String>,
    getter: Option<Path>,
    setter: Option<Path>,
}

impl FieldOptions {
    fn parse(field: &Field) -> syn::Result<Self> {
        let mut options = Self::default();
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("bean")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    options.skip = true;
                } else if meta.path.is_ident("read_only") {
                    options.read_only = true;
                } else if meta.path.is_ident("write_only") {
                    options.write_only = true;
                } else if meta.path.is_ident("rename") {
                    let lit: LitStr = meta.value()?.parse()?;
                    options.rename = Some(lit.value());
                } else if meta.path.is_ident("getter") {
                    options.getter = Some(meta.value()?.parse()?);
                } else if meta.path.is_ident("setter") {
                    options.setter = Some(meta.value()?.parse()?);
                } else {
                    return Err(meta.error("unsupported bean field attribute"));
                }
                Ok(())
            })?;
        }

        if options.read_only && options.write_only {
            return Err(syn::Error::new_spanned(
                field,
                "a property cannot be both read_only and write_only",
            ));
        }
        if options.read_only && options.setter.is_some() {
            return Err(syn::Error::new_spanned(field, "read_only property cannot have a setter"));
        }
        if options.write_only && options.getter.is_some() {
            return Err(syn::Error::new_spanned(field, "write_only property cannot have a getter"));
        }
        Ok(options)
    }
}
