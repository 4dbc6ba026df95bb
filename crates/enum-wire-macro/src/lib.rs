use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{Data, DeriveInput, Fields, Ident, LitBool, LitStr, Result, Variant};

use proc_macro_crate::{FoundCrate, crate_name};

/// `#[wire(...)]` on the enum.
#[derive(Default)]
struct ContainerAttrs {
    /// Bitflag enum; defaults the strategy to `flags`
    flags: bool,
    strategy: Option<LitStr>,
    naming: Option<LitStr>,
    separator: Option<LitStr>,
    comparison: Option<LitStr>,
    allow_numbers: Option<bool>,
    /// Overrides the type name used in errors and config files
    name: Option<LitStr>,
}

/// `#[wire(...)]` on a variant.
#[derive(Default)]
struct VariantAttrs {
    alias: Option<LitStr>,
    description: Option<LitStr>,
}

fn parse_container_attrs(input: &DeriveInput) -> Result<ContainerAttrs> {
    let mut result = ContainerAttrs::default();

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("wire")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("flags") {
                result.flags = true;
            } else if meta.path.is_ident("strategy") {
                result.strategy = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("naming") {
                result.naming = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("separator") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(syn::Error::new(lit.span(), "separator must not be empty"));
                }
                result.separator = Some(lit);
            } else if meta.path.is_ident("comparison") {
                result.comparison = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("allow_numbers") {
                let lit: LitBool = meta.value()?.parse()?;
                result.allow_numbers = Some(lit.value);
            } else if meta.path.is_ident("name") {
                result.name = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unknown wire attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

fn parse_variant_attrs(variant: &Variant) -> Result<VariantAttrs> {
    let mut result = VariantAttrs::default();

    for attr in variant.attrs.iter().filter(|a| a.path().is_ident("wire")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("alias") {
                result.alias = Some(meta.value()?.parse()?);
            } else if meta.path.is_ident("description") {
                result.description = Some(meta.value()?.parse()?);
            } else {
                return Err(meta.error("unknown wire variant attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

// =============================================================================
// Name mapping (validated at expansion time)
// =============================================================================

fn variant_ident(lit: &LitStr, table: &[(&str, &str)], what: &str) -> Result<Ident> {
    let value = lit.value();
    table
        .iter()
        .find(|(name, _)| *name == value)
        .map(|(_, ident)| Ident::new(ident, lit.span()))
        .ok_or_else(|| {
            let expected: Vec<&str> = table.iter().map(|(name, _)| *name).collect();
            syn::Error::new(
                lit.span(),
                format!("unknown {} '{}', expected one of: {}", what, value, expected.join(", ")),
            )
        })
}

const STRATEGIES: &[(&str, &str)] = &[
    ("string_by_name", "StringByName"),
    ("string_by_alias", "StringByAlias"),
    ("string_by_description", "StringByDescription"),
    ("numeric_string", "NumericString"),
    ("numeric", "Numeric"),
    ("flags", "Flags"),
];

const NAMING: &[(&str, &str)] = &[
    ("none", "None"),
    ("camel_case", "CamelCase"),
    ("snake_lower", "SnakeLower"),
    ("snake_upper", "SnakeUpper"),
    ("kebab_lower", "KebabLower"),
    ("kebab_upper", "KebabUpper"),
];

const COMPARISONS: &[(&str, &str)] = &[("ordinal", "Ordinal"), ("ignore_case", "IgnoreCase")];

/// `#[repr(..)]` → `IntWidth` variant. Without a repr the discriminant is `isize`.
fn repr_width(input: &DeriveInput) -> Result<Ident> {
    let mut width = "I64";

    for attr in input.attrs.iter().filter(|a| a.path().is_ident("repr")) {
        attr.parse_nested_meta(|meta| {
            // repr(align(N)) and similar carry arguments
            if meta.input.peek(syn::token::Paren) {
                let _args;
                syn::parenthesized!(_args in meta.input);
                return Ok(());
            }
            let Some(ident) = meta.path.get_ident() else {
                return Ok(());
            };
            width = match ident.to_string().as_str() {
                "i8" => "I8",
                "i16" => "I16",
                "i32" => "I32",
                "i64" | "isize" => "I64",
                "u8" => "U8",
                "u16" => "U16",
                "u32" => "U32",
                "u64" | "usize" => "U64",
                "i128" | "u128" => {
                    return Err(meta.error("128-bit enums are not supported"));
                }
                _ => width,
            };
            Ok(())
        })?;
    }

    Ok(Ident::new(width, Span::call_site()))
}

// =============================================================================
// Crate path resolution
// =============================================================================

fn wire_crate_path() -> TokenStream2 {
    match crate_name("enum-wire") {
        Ok(FoundCrate::Itself) => {
            quote!(::enum_wire)
        }
        Ok(FoundCrate::Name(name)) => {
            let ident = Ident::new(&name, Span::call_site());
            quote!(::#ident)
        }
        Err(_) => quote!(::enum_wire),
    }
}

// =============================================================================
// Code generation
// =============================================================================

fn generate_config(attrs: &ContainerAttrs, wire: &TokenStream2) -> Result<TokenStream2> {
    let strategy = match &attrs.strategy {
        Some(lit) => variant_ident(lit, STRATEGIES, "strategy")?,
        None if attrs.flags => Ident::new("Flags", Span::call_site()),
        None => Ident::new("StringByAlias", Span::call_site()),
    };

    let mut chain = Vec::new();
    if let Some(lit) = &attrs.naming {
        let naming = variant_ident(lit, NAMING, "naming policy")?;
        chain.push(quote!(.with_naming(#wire::NamingPolicy::#naming)));
    }
    if let Some(lit) = &attrs.separator {
        chain.push(quote!(.with_separator(#lit)));
    }
    if let Some(lit) = &attrs.comparison {
        let comparison = variant_ident(lit, COMPARISONS, "comparison")?;
        chain.push(quote!(.with_comparison(#wire::Comparison::#comparison)));
    }
    if let Some(allow) = attrs.allow_numbers {
        chain.push(quote!(.with_allow_numbers(#allow)));
    }

    Ok(quote! {
        #wire::CodecConfig::new(#wire::Strategy::#strategy) #(#chain)*
    })
}

/// Generate the `WireEnum` impl for a fieldless enum.
fn expand(input: &DeriveInput, wire: &TokenStream2) -> Result<TokenStream2> {
    let Data::Enum(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "WireEnum can only be derived for enums",
        ));
    };
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.generics,
            "WireEnum cannot be derived for generic enums",
        ));
    }
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "WireEnum needs at least one variant",
        ));
    }

    let attrs = parse_container_attrs(input)?;
    let width = repr_width(input)?;
    let config = generate_config(&attrs, wire)?;
    let is_flags = attrs.flags;

    let ident = &input.ident;
    let name = match &attrs.name {
        Some(lit) => lit.value(),
        None => ident.to_string(),
    };

    let mut defs = Vec::new();
    let mut to_raw_arms = Vec::new();
    let mut from_raw_arms = Vec::new();

    for variant in &data.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(syn::Error::new_spanned(
                variant,
                "WireEnum variants cannot carry data",
            ));
        }

        let var = &variant.ident;
        let identifier = var.to_string();
        let raw = quote!(#wire::IntWidth::#width.truncate(Self::#var as i128));

        let vattrs = parse_variant_attrs(variant)?;
        let alias = vattrs.alias.map(|lit| quote!(.with_alias(#lit)));
        let description = vattrs.description.map(|lit| quote!(.with_description(#lit)));

        defs.push(quote! {
            #wire::VariantDef::new(#raw, #identifier) #alias #description,
        });
        to_raw_arms.push(quote! {
            Self::#var => #raw,
        });
        from_raw_arms.push(quote! {
            r if r == #raw => ::core::option::Option::Some(Self::#var),
        });
    }

    Ok(quote! {
        impl #wire::WireEnum for #ident {
            const NAME: &'static str = #name;

            fn descriptor() -> ::core::result::Result<#wire::EnumDescriptor, #wire::CodecError> {
                #wire::EnumDescriptor::build(
                    <Self as #wire::WireEnum>::NAME,
                    #wire::IntWidth::#width,
                    #is_flags,
                    &[#(#defs)*],
                )
            }

            fn config() -> #wire::CodecConfig {
                #config
            }

            fn to_raw(&self) -> u64 {
                match self {
                    #(#to_raw_arms)*
                }
            }

            fn from_raw(raw: u64) -> ::core::option::Option<Self> {
                match raw {
                    #(#from_raw_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

// =============================================================================
// Entry point
// =============================================================================

/// Derive `WireEnum` for a fieldless enum.
///
/// Container attributes: `#[wire(flags, strategy = "..", naming = "..",
/// separator = "..", comparison = "..", allow_numbers = bool, name = "..")]`.
/// Variant attributes: `#[wire(alias = "..", description = "..")]`.
#[proc_macro_derive(WireEnum, attributes(wire))]
pub fn derive_wire_enum(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let wire = wire_crate_path();

    expand(&input, &wire)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

// =============================================================================
// Tests
// =============================================================================
