//! Procedural macros for agent tool definitions.
//!
//! `#[tool]` reads a function signature and emits a `<function>_tool()`
//! constructor returning an `agent_tools::ToolBinding`, plus a discovery
//! record picked up by `agent_tools::load_tools`. The annotated function
//! itself is emitted unchanged.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::{
    Attribute, Error, Expr, ExprLit, FnArg, Ident, ItemFn, Lit, LitStr, Meta, Pat, ReturnType,
    Type, parse_macro_input,
};

/// Exposes a function as a tool.
///
/// Without arguments the parameter type is inferred from the signature: each
/// parameter becomes a required field named after it, with the schema
/// `schemars::JsonSchema` gives its type. `Option<T>` parameters accept
/// `null` but stay required unless they get a default. The function's doc
/// comment becomes the tool description.
///
/// Supported arguments:
///
/// * `name = "..."`: tool name (defaults to the function name);
/// * `description = "..."`: overrides the doc comment;
/// * `default(param = expr, ..)`: defaults, making those parameters optional;
/// * `describe(param = "...", ..)`: per-parameter descriptions;
/// * `explicit` or `input = Type`: the function takes one structured
///   parameter deriving `Deserialize` and `JsonSchema`, whose serde
///   attributes shape the schema.
///
/// A function returning `Result<T, E>` reports `Err` values as execution
/// failures; any other return type is treated as infallible.
#[proc_macro_attribute]
pub fn tool(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut options = ToolOptions::default();
    let parser = syn::meta::parser(|meta| options.parse(&meta));
    parse_macro_input!(attr with parser);
    let function = parse_macro_input!(item as ItemFn);

    expand_tool(&options, &function)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}

#[derive(Default)]
struct ToolOptions {
    name: Option<LitStr>,
    description: Option<LitStr>,
    input: Option<Type>,
    explicit: bool,
    defaults: Vec<(Ident, Expr)>,
    describe: Vec<(Ident, LitStr)>,
}

impl ToolOptions {
    fn parse(&mut self, meta: &ParseNestedMeta<'_>) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            self.name = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("description") {
            self.description = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("input") {
            self.input = Some(meta.value()?.parse()?);
        } else if meta.path.is_ident("explicit") {
            self.explicit = true;
        } else if meta.path.is_ident("default") {
            meta.parse_nested_meta(|inner| {
                let ident = inner.path.require_ident()?.clone();
                let value: Expr = inner.value()?.parse()?;
                self.defaults.push((ident, value));
                Ok(())
            })?;
        } else if meta.path.is_ident("describe") {
            meta.parse_nested_meta(|inner| {
                let ident = inner.path.require_ident()?.clone();
                let value: LitStr = inner.value()?.parse()?;
                self.describe.push((ident, value));
                Ok(())
            })?;
        } else {
            return Err(meta.error(
                "unsupported tool argument; expected `name`, `description`, `input`, \
                 `explicit`, `default` or `describe`",
            ));
        }
        Ok(())
    }

    fn is_explicit(&self) -> bool {
        self.explicit || self.input.is_some()
    }
}

struct Param<'a> {
    ident: &'a Ident,
    ty: &'a Type,
}

fn expand_tool(options: &ToolOptions, function: &ItemFn) -> syn::Result<TokenStream2> {
    let sig = &function.sig;
    if let Some(receiver) = sig.receiver() {
        return Err(Error::new_spanned(receiver, "tool functions cannot take `self`"));
    }
    if let Some(asyncness) = &sig.asyncness {
        return Err(Error::new_spanned(asyncness, "tool functions must be synchronous"));
    }
    if !sig.generics.params.is_empty() {
        return Err(Error::new_spanned(&sig.generics, "tool functions cannot be generic"));
    }

    let params = sig
        .inputs
        .iter()
        .map(|input| match input {
            FnArg::Typed(typed) => match typed.pat.as_ref() {
                Pat::Ident(pat) if pat.subpat.is_none() => Ok(Param {
                    ident: &pat.ident,
                    ty: typed.ty.as_ref(),
                }),
                other => Err(Error::new_spanned(
                    other,
                    "tool parameters must be plain identifiers",
                )),
            },
            FnArg::Receiver(receiver) => Err(Error::new_spanned(
                receiver,
                "tool functions cannot take `self`",
            )),
        })
        .collect::<syn::Result<Vec<_>>>()?;

    let fn_ident = &sig.ident;
    let tool_name = options
        .name
        .as_ref()
        .map_or_else(|| fn_ident.unraw().to_string(), LitStr::value);
    let description = options
        .description
        .as_ref()
        .map_or_else(|| doc_string(&function.attrs), LitStr::value);

    let args: Vec<&Ident> = params.iter().map(|param| param.ident).collect();
    let invoke = if returns_result(&sig.output) {
        quote!(#fn_ident(#(#args),*).map_err(::agent_tools::CallError::execution))
    } else {
        quote!(::core::result::Result::Ok(#fn_ident(#(#args),*)))
    };

    let binding = if options.is_explicit() {
        explicit_binding(options, sig, &params, &tool_name, &invoke)?
    } else {
        inferred_binding(options, &params, &tool_name, &invoke)?
    };

    let vis = &function.vis;
    let ctor = format_ident!("{}_tool", fn_ident.unraw());
    let ctor_doc = format!(" Tool binding for [`{fn_ident}`].");

    Ok(quote! {
        #function

        #[doc = #ctor_doc]
        #[allow(unused_mut, unused_variables)]
        #vis fn #ctor() -> ::agent_tools::ToolBinding {
            #binding.with_description(#description)
        }

        ::agent_tools::__private::inventory::submit! {
            ::agent_tools::DiscoveredTool::new(
                ::core::module_path!(),
                #tool_name,
                ::core::line!(),
                #ctor,
            )
        }
    })
}

fn explicit_binding(
    options: &ToolOptions,
    sig: &syn::Signature,
    params: &[Param<'_>],
    tool_name: &str,
    invoke: &TokenStream2,
) -> syn::Result<TokenStream2> {
    let [param] = params else {
        return Err(Error::new_spanned(
            &sig.inputs,
            "explicit tools must take exactly one structured parameter",
        ));
    };
    if let Some((ident, _)) = options.defaults.first() {
        return Err(Error::new_spanned(
            ident,
            "`default` applies to inferred tools; use `#[serde(default)]` on the input type",
        ));
    }
    if let Some((ident, _)) = options.describe.first() {
        return Err(Error::new_spanned(
            ident,
            "`describe` applies to inferred tools; document the input type's fields",
        ));
    }

    let input_ty = options.input.as_ref().unwrap_or(param.ty);
    let ident = param.ident;
    Ok(quote! {
        ::agent_tools::ToolBinding::explicit::<#input_ty, _, _>(
            #tool_name,
            |#ident: #input_ty| #invoke,
        )
    })
}

fn inferred_binding(
    options: &ToolOptions,
    params: &[Param<'_>],
    tool_name: &str,
    invoke: &TokenStream2,
) -> syn::Result<TokenStream2> {
    let keys = options
        .defaults
        .iter()
        .map(|(ident, _)| ident)
        .chain(options.describe.iter().map(|(ident, _)| ident));
    for ident in keys {
        if !params.iter().any(|param| param.ident.unraw() == ident.unraw()) {
            return Err(Error::new_spanned(
                ident,
                format!("no parameter named `{}`", ident.unraw()),
            ));
        }
    }

    let mut fields = Vec::with_capacity(params.len());
    let mut takes = Vec::with_capacity(params.len());
    for Param { ident, ty } in params {
        let name = ident.unraw().to_string();
        let mut spec = quote!(::agent_tools::ParameterSpec::of::<#ty>(#name));
        if let Some((_, value)) = options.defaults.iter().find(|(i, _)| i.unraw() == name) {
            spec = quote!(#spec.with_default(::agent_tools::__private::serde_json::json!(#value)));
        }
        if let Some((_, text)) = options.describe.iter().find(|(i, _)| i.unraw() == name) {
            spec = quote!(#spec.with_description(#text));
        }
        fields.push(spec);
        takes.push(quote!(let #ident: #ty = args.take(#name)?;));
    }

    Ok(quote! {
        ::agent_tools::ToolBinding::inferred(
            #tool_name,
            ::agent_tools::ParameterType::inferred(#tool_name)#(.field(#fields))*,
            |mut args: ::agent_tools::ToolArgs| {
                #(#takes)*
                #invoke
            },
        )
    })
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = ty.as_ref() else {
        return false;
    };
    path.path
        .segments
        .last()
        .is_some_and(|segment| segment.ident == "Result")
}

/// Joins `///` lines, strips their common indentation and trims the result.
fn doc_string(attrs: &[Attribute]) -> String {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(pair) => match &pair.value {
                Expr::Lit(ExprLit {
                    lit: Lit::Str(text),
                    ..
                }) => Some(text.value()),
                _ => None,
            },
            _ => None,
        })
        .flat_map(|text| text.lines().map(str::to_owned).collect::<Vec<_>>())
        .collect();

    let indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading_indent(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| line[indent.min(leading_indent(line))..].trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

/// Byte length of the leading ASCII spaces and tabs of `line`.
fn leading_indent(line: &str) -> usize {
    line.bytes().take_while(|b| matches!(b, b' ' | b'\t')).count()
}
