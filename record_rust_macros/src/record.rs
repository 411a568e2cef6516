use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Ident, LitStr, Path};

struct StructAttrs {
    entity: Option<String>,
    configure: Option<Path>,
}

#[derive(Default)]
struct FieldAttrs {
    meta: bool,
    extra: bool,
    skip: bool,
}

pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => TokenStream::from(tokens),
        Err(err) => TokenStream::from(err.to_compile_error()),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let struct_attrs = parse_struct_attrs(input)?;
    let entity = struct_attrs.entity.unwrap_or_else(|| name.to_string());

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    name,
                    "Record derive only supports structs with named fields",
                ))
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                name,
                "Record derive only supports structs",
            ))
        }
    };

    let mut parsed = Vec::with_capacity(fields.len());
    let mut marked_meta: Option<Ident> = None;
    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let attrs = parse_field_attrs(field)?;
        if attrs.meta {
            if marked_meta.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field may be marked #[record(meta)]",
                ));
            }
            marked_meta = Some(ident.clone());
        }
        parsed.push((field, ident, attrs));
    }

    // a field named `meta` is the record meta only when no field is marked
    let implicit_meta = marked_meta.is_none();
    let mut meta_field: Option<Ident> = marked_meta;
    let mut extra_field: Option<Ident> = None;
    let mut skipped: Vec<Ident> = Vec::new();
    let mut attributes: Vec<(Ident, String)> = Vec::new();

    for (field, ident, attrs) in parsed {
        if attrs.meta {
            continue;
        } else if attrs.extra {
            if extra_field.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field may be marked #[record(extra)]",
                ));
            }
            extra_field = Some(ident);
        } else if attrs.skip {
            skipped.push(ident);
        } else if implicit_meta && ident == "meta" {
            meta_field = Some(ident);
        } else {
            let attribute = ident.unraw().to_string();
            attributes.push((ident, attribute));
        }
    }

    let Some(meta_field) = meta_field else {
        return Err(syn::Error::new_spanned(
            name,
            "Record derive needs a `meta: RecordMeta` field or one marked #[record(meta)]",
        ));
    };

    let idents: Vec<&Ident> = attributes.iter().map(|(ident, _)| ident).collect();
    let names: Vec<&String> = attributes.iter().map(|(_, attribute)| attribute).collect();
    let locals: Vec<Ident> = idents
        .iter()
        .map(|ident| format_ident!("__field_{}", ident.unraw()))
        .collect();

    let extra_merge = match &extra_field {
        Some(extra) => quote! {
            for (attribute, value) in &self.#extra {
                if !attrs.contains_key(attribute) {
                    attrs.insert(attribute.clone(), value.clone());
                }
            }
        },
        None => quote! {},
    };

    let extra_read = match &extra_field {
        Some(extra) => quote! { self.#extra.get(attribute).cloned() },
        None => quote! { ::std::option::Option::None },
    };

    let extra_write = match &extra_field {
        Some(extra) => quote! {
            {
                self.#extra.insert(::std::string::String::from(attribute), value);
                ::std::result::Result::Ok(())
            }
        },
        None => quote! {
            ::std::result::Result::Err(::record_rust::RecordError::UnknownAttribute {
                entity: <Self as ::record_rust::Record>::ENTITY,
                attribute: ::std::string::String::from(attribute),
            })
        },
    };

    let (extra_check, extra_init) = match &extra_field {
        Some(extra) => (quote! {}, quote! { #extra: attrs, }),
        None => (
            quote! {
                ::record_rust::reject_unknown(<Self as ::record_rust::Record>::ENTITY, &attrs)?;
            },
            quote! {},
        ),
    };

    let open = extra_field.is_some();

    let configure = match &struct_attrs.configure {
        Some(path) => quote! {
            fn configure(schema: &mut ::record_rust::Schema<Self>) {
                #path(schema)
            }
        },
        None => quote! {},
    };

    let expanded = quote! {
        impl #impl_generics ::record_rust::Record for #name #ty_generics #where_clause {
            const ENTITY: &'static str = #entity;

            fn meta(&self) -> &::record_rust::RecordMeta {
                &self.#meta_field
            }

            fn meta_mut(&mut self) -> &mut ::record_rust::RecordMeta {
                &mut self.#meta_field
            }

            fn attributes(&self) -> ::record_rust::Attributes {
                let mut attrs = ::record_rust::Attributes::new();
                #(
                    attrs.insert(
                        ::std::string::String::from(#names),
                        ::record_rust::to_attribute(&self.#idents),
                    );
                )*
                #extra_merge
                attrs
            }

            fn read_attribute(&self, attribute: &str) -> ::std::option::Option<::record_rust::Value> {
                match attribute {
                    #( #names => ::std::option::Option::Some(::record_rust::to_attribute(&self.#idents)), )*
                    _ => #extra_read,
                }
            }

            fn write_attribute(
                &mut self,
                attribute: &str,
                value: ::record_rust::Value,
            ) -> ::record_rust::Result<()> {
                match attribute {
                    #(
                        #names => {
                            self.#idents = ::record_rust::from_attribute(
                                <Self as ::record_rust::Record>::ENTITY,
                                attribute,
                                value,
                            )?;
                            ::std::result::Result::Ok(())
                        }
                    )*
                    _ => #extra_write,
                }
            }

            #[allow(unused_mut)]
            fn from_attributes(
                mut attrs: ::record_rust::Attributes,
            ) -> ::record_rust::Result<Self> {
                #(
                    let #locals = ::record_rust::take_attribute(
                        <Self as ::record_rust::Record>::ENTITY,
                        &mut attrs,
                        #names,
                    )?;
                )*
                #extra_check
                ::std::result::Result::Ok(Self {
                    #meta_field: ::record_rust::RecordMeta::new(),
                    #( #idents: #locals, )*
                    #( #skipped: ::std::default::Default::default(), )*
                    #extra_init
                })
            }

            fn declares(attribute: &str) -> bool {
                #open || [#(#names),*].contains(&attribute)
            }

            #configure
        }

        impl #impl_generics ::std::cmp::PartialEq for #name #ty_generics #where_clause {
            fn eq(&self, other: &Self) -> bool {
                ::record_rust::attributes_equal(
                    &::record_rust::Record::attributes(self),
                    &::record_rust::Record::attributes(other),
                )
            }
        }
    };

    Ok(expanded)
}

fn parse_struct_attrs(input: &DeriveInput) -> syn::Result<StructAttrs> {
    let mut attrs = StructAttrs {
        entity: None,
        configure: None,
    };

    for attr in &input.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("entity") {
                let value: LitStr = meta.value()?.parse()?;
                attrs.entity = Some(value.value());
                Ok(())
            } else if meta.path.is_ident("configure") {
                let value: Path = meta.value()?.parse()?;
                attrs.configure = Some(value);
                Ok(())
            } else {
                Err(meta.error("expected `entity` or `configure`"))
            }
        })?;
    }

    Ok(attrs)
}

fn parse_field_attrs(field: &syn::Field) -> syn::Result<FieldAttrs> {
    let mut attrs = FieldAttrs::default();

    for attr in &field.attrs {
        if !attr.path().is_ident("record") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("meta") {
                attrs.meta = true;
            } else if meta.path.is_ident("extra") {
                attrs.extra = true;
            } else if meta.path.is_ident("skip") {
                attrs.skip = true;
            } else {
                return Err(meta.error("expected `meta`, `extra` or `skip`"));
            }
            Ok(())
        })?;
    }

    Ok(attrs)
}
