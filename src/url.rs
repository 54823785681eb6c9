//! RFC 3986 percent-encoding and OpenAPI parameter serialization.
//!
//! Provides the four percent-encoders shared by the runtime and by generated
//! client code, an ordered [`QueryParams`] container, and the
//! style × explode expansion used when serializing OpenAPI parameters into
//! URL fragments.

use std::fmt::Write as _;

/// Unreserved per RFC 3986 §2.3: ALPHA / DIGIT / `-` / `.` / `_` / `~`.
fn is_unreserved(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'_' | b'~')
}

/// Reserved per RFC 3986 §2.2 (gen-delims and sub-delims).
fn is_reserved(c: u8) -> bool {
    matches!(
        c,
        b':' | b'/'
            | b'?'
            | b'#'
            | b'['
            | b']'
            | b'@'
            | b'!'
            | b'$'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'+'
            | b','
            | b';'
            | b'='
    )
}

/// Unreserved for `application/x-www-form-urlencoded`: ALPHA / DIGIT /
/// `-` / `.` / `_` / `*`.
fn is_unreserved_form(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'-' | b'.' | b'_' | b'*')
}

/// `true` when `bytes` starts a valid `%HH` triple.
fn is_pct_encoded(bytes: &[u8]) -> bool {
    bytes.len() >= 3
        && bytes[0] == b'%'
        && bytes[1].is_ascii_hexdigit()
        && bytes[2].is_ascii_hexdigit()
}

fn push_pct(out: &mut String, c: u8) {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    out.push('%');
    out.push(HEX[(c >> 4) as usize] as char);
    out.push(HEX[(c & 15) as usize] as char);
}

/// Percent-encodes a string for use in a URL path or query.
///
/// Everything outside the RFC 3986 unreserved set is encoded; spaces become
/// `%20`.
pub fn encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &c in input.as_bytes() {
        if is_unreserved(c) {
            out.push(c as char);
        } else {
            push_pct(&mut out, c);
        }
    }
    out
}

/// Percent-encodes a string while passing RFC 3986 reserved characters
/// through verbatim.
///
/// Existing `%HH` triples are preserved rather than double-encoded.
pub fn encode_allow_reserved(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b'%' && is_pct_encoded(&bytes[i..]) {
            out.push_str(&input[i..i + 3]);
            i += 3;
            continue;
        }
        if is_unreserved(c) || is_reserved(c) {
            out.push(c as char);
        } else {
            push_pct(&mut out, c);
        }
        i += 1;
    }
    out
}

/// Percent-encodes a string for `application/x-www-form-urlencoded` bodies.
///
/// Spaces become `+`.
pub fn encode_form(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for &c in input.as_bytes() {
        if c == b' ' {
            out.push('+');
        } else if is_unreserved_form(c) {
            out.push(c as char);
        } else {
            push_pct(&mut out, c);
        }
    }
    out
}

/// Form encoding that passes reserved characters through, except the form
/// delimiters `&`, `=` and `+` which are always encoded.
///
/// Existing `%HH` triples are preserved; spaces become `+`.
pub fn encode_form_allow_reserved(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        if c == b' ' {
            out.push('+');
            i += 1;
            continue;
        }
        if is_pct_encoded(&bytes[i..]) {
            out.push_str(&input[i..i + 3]);
            i += 3;
            continue;
        }
        if is_unreserved_form(c) || is_reserved(c) {
            if matches!(c, b'&' | b'=' | b'+') {
                push_pct(&mut out, c);
            } else {
                out.push(c as char);
            }
        } else {
            push_pct(&mut out, c);
        }
        i += 1;
    }
    out
}

#[derive(Debug, Clone)]
struct QueryParam {
    key: String,
    value: String,
    value_is_encoded: bool,
}

/// Ordered key/value container for query string construction.
///
/// Parameters serialize in insertion order. Values added with
/// [`add_encoded`](Self::add_encoded) are assumed already percent-encoded and
/// pass through [`build`](Self::build) untouched, which is how generated code
/// keeps OpenAPI style delimiters (e.g. the comma in `tags=a,b`) intact.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    params: Vec<QueryParam>,
}

impl QueryParams {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parameters added so far.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// `true` when no parameters have been added.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Appends a raw key/value pair; both will be encoded on build.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push(QueryParam {
            key: key.into(),
            value: value.into(),
            value_is_encoded: false,
        });
    }

    /// Appends a pair whose value is already percent-encoded.
    pub fn add_encoded(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.params.push(QueryParam {
            key: key.into(),
            value: value.into(),
            value_is_encoded: true,
        });
    }

    /// Builds the query string, starting with `?`.
    ///
    /// Returns `""` when the container is empty.
    pub fn build(&self) -> String {
        if self.params.is_empty() {
            return String::new();
        }
        let mut out = String::from("?");
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(&encode(&p.key));
            out.push('=');
            if p.value_is_encoded {
                out.push_str(&p.value);
            } else {
                out.push_str(&encode(&p.value));
            }
        }
        out
    }

    /// Builds an `application/x-www-form-urlencoded` body (no leading `?`).
    pub fn build_form(&self) -> String {
        let mut out = String::new();
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                out.push('&');
            }
            out.push_str(&encode_form(&p.key));
            out.push('=');
            if p.value_is_encoded {
                out.push_str(&p.value);
            } else {
                out.push_str(&encode_form(&p.value));
            }
        }
        out
    }
}

/// A typed parameter value, as OpenAPI schemas type them.
#[derive(Debug, Clone, PartialEq)]
pub enum KvValue<'a> {
    /// String value.
    Str(&'a str),
    /// Integer value.
    Int(i64),
    /// Floating-point value.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl KvValue<'_> {
    fn to_raw(&self) -> String {
        match self {
            KvValue::Str(s) => (*s).to_owned(),
            KvValue::Int(i) => i.to_string(),
            KvValue::Number(n) => n.to_string(),
            KvValue::Bool(b) => if *b { "true" } else { "false" }.to_owned(),
        }
    }
}

/// Joins typed key/value pairs into a single form-encoded value string.
///
/// Keys and stringified values are interleaved (`k1,v1,k2,v2`), each encoded
/// with form rules; `delim` is inserted as-is between tokens. This is the
/// value shape used by `style=form` objects with `explode=false`, and by the
/// space/pipe-delimited object styles (`delim` of `%20` or `%7C`).
pub fn kv_join_form(kvs: &[(&str, KvValue<'_>)], delim: &str, allow_reserved: bool) -> String {
    let enc: fn(&str) -> String = if allow_reserved {
        encode_form_allow_reserved
    } else {
        encode_form
    };

    let mut out = String::new();
    for (key, value) in kvs {
        if !out.is_empty() {
            out.push_str(delim);
        }
        out.push_str(&enc(key));
        out.push_str(delim);
        out.push_str(&enc(&value.to_raw()));
    }
    out
}

/// OpenAPI parameter serialization styles.
///
/// See <https://spec.openapis.org/oas/v3.2.0#style-values>.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    /// Ampersand-separated key/value pairs (query, cookie default).
    Form,
    /// Comma-separated values (path, header default).
    Simple,
    /// Semicolon-prefixed path parameters (RFC 6570 path-style).
    Matrix,
    /// Dot-prefixed path parameters (RFC 6570 label).
    Label,
    /// Space-separated array values.
    SpaceDelimited,
    /// Pipe-separated array values.
    PipeDelimited,
    /// `obj[key]=value` query rendering for objects.
    DeepObject,
    /// Cookie-header rendering; serialized like non-exploded form.
    Cookie,
}

/// A parameter value grouped by the shape the style matrix dispatches on.
#[derive(Debug, Clone)]
pub enum StyleValue<'a> {
    /// A single primitive.
    Primitive(KvValue<'a>),
    /// An array of primitives.
    Array(Vec<KvValue<'a>>),
    /// An object of primitive-valued properties, in order.
    Object(Vec<(&'a str, KvValue<'a>)>),
}

fn enc_for(allow_reserved: bool) -> fn(&str) -> String {
    if allow_reserved {
        encode_allow_reserved
    } else {
        encode
    }
}

/// Expands a parameter into its final URL fragment.
///
/// Implements the OpenAPI style × explode × type matrix; generated client
/// code calls this (directly or via its C translation) to build paths and
/// query strings. Delimiters that carry structure (`,`, `;`, `.`, `=`, `&`,
/// `?`, `[`, `]`) are emitted raw; everything else passes through the
/// percent-encoder selected by `allow_reserved`.
pub fn expand_style(
    name: &str,
    style: Style,
    explode: bool,
    value: &StyleValue<'_>,
    allow_reserved: bool,
) -> String {
    let enc = enc_for(allow_reserved);
    let key = encode(name);

    match style {
        Style::Form => match value {
            StyleValue::Primitive(v) => format!("?{key}={}", enc(&v.to_raw())),
            StyleValue::Array(vs) => {
                if explode {
                    let mut out = String::new();
                    for (i, v) in vs.iter().enumerate() {
                        out.push(if i == 0 { '?' } else { '&' });
                        let _ = write!(out, "{key}={}", enc(&v.to_raw()));
                    }
                    out
                } else {
                    let joined = vs
                        .iter()
                        .map(|v| enc(&v.to_raw()))
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("?{key}={joined}")
                }
            }
            StyleValue::Object(kvs) => {
                if explode {
                    let mut out = String::new();
                    for (i, (k, v)) in kvs.iter().enumerate() {
                        out.push(if i == 0 { '?' } else { '&' });
                        let _ = write!(out, "{}={}", encode(k), enc(&v.to_raw()));
                    }
                    out
                } else {
                    let joined = kvs
                        .iter()
                        .flat_map(|(k, v)| [encode(k), enc(&v.to_raw())])
                        .collect::<Vec<_>>()
                        .join(",");
                    format!("?{key}={joined}")
                }
            }
        },

        Style::Simple => match value {
            StyleValue::Primitive(v) => enc(&v.to_raw()),
            StyleValue::Array(vs) => vs
                .iter()
                .map(|v| enc(&v.to_raw()))
                .collect::<Vec<_>>()
                .join(","),
            StyleValue::Object(kvs) => {
                if explode {
                    kvs.iter()
                        .map(|(k, v)| format!("{}={}", encode(k), enc(&v.to_raw())))
                        .collect::<Vec<_>>()
                        .join(",")
                } else {
                    kvs.iter()
                        .flat_map(|(k, v)| [encode(k), enc(&v.to_raw())])
                        .collect::<Vec<_>>()
                        .join(",")
                }
            }
        },

        Style::Matrix => match value {
            StyleValue::Primitive(v) => format!(";{key}={}", enc(&v.to_raw())),
            StyleValue::Array(vs) => {
                if explode {
                    vs.iter()
                        .map(|v| format!(";{key}={}", enc(&v.to_raw())))
                        .collect()
                } else {
                    let joined = vs
                        .iter()
                        .map(|v| enc(&v.to_raw()))
                        .collect::<Vec<_>>()
                        .join(",");
                    format!(";{key}={joined}")
                }
            }
            StyleValue::Object(kvs) => {
                if explode {
                    kvs.iter()
                        .map(|(k, v)| format!(";{}={}", encode(k), enc(&v.to_raw())))
                        .collect()
                } else {
                    let joined = kvs
                        .iter()
                        .flat_map(|(k, v)| [encode(k), enc(&v.to_raw())])
                        .collect::<Vec<_>>()
                        .join(",");
                    format!(";{key}={joined}")
                }
            }
        },

        Style::Label => match value {
            StyleValue::Primitive(v) => format!(".{}", enc(&v.to_raw())),
            StyleValue::Array(vs) => {
                if explode {
                    vs.iter().map(|v| format!(".{}", enc(&v.to_raw()))).collect()
                } else {
                    format!(
                        ".{}",
                        vs.iter()
                            .map(|v| enc(&v.to_raw()))
                            .collect::<Vec<_>>()
                            .join(",")
                    )
                }
            }
            StyleValue::Object(kvs) => {
                if explode {
                    kvs.iter()
                        .map(|(k, v)| format!(".{}={}", encode(k), enc(&v.to_raw())))
                        .collect()
                } else {
                    format!(
                        ".{}",
                        kvs.iter()
                            .flat_map(|(k, v)| [encode(k), enc(&v.to_raw())])
                            .collect::<Vec<_>>()
                            .join(",")
                    )
                }
            }
        },

        Style::SpaceDelimited | Style::PipeDelimited => {
            let delim = if style == Style::SpaceDelimited {
                "%20"
            } else {
                "%7C"
            };
            match value {
                StyleValue::Primitive(v) => format!("?{key}={}", enc(&v.to_raw())),
                StyleValue::Array(vs) => {
                    if explode {
                        // Exploded arrays degrade to form-style key repetition.
                        expand_style(name, Style::Form, true, value, allow_reserved)
                    } else {
                        let joined = vs
                            .iter()
                            .map(|v| enc(&v.to_raw()))
                            .collect::<Vec<_>>()
                            .join(delim);
                        format!("?{key}={joined}")
                    }
                }
                StyleValue::Object(kvs) => {
                    if explode {
                        expand_style(name, Style::Form, true, value, allow_reserved)
                    } else {
                        let joined = kvs
                            .iter()
                            .flat_map(|(k, v)| [encode(k), enc(&v.to_raw())])
                            .collect::<Vec<_>>()
                            .join(delim);
                        format!("?{key}={joined}")
                    }
                }
            }
        }

        Style::DeepObject => match value {
            // deepObject is only defined for objects; other shapes degrade to
            // form rendering.
            StyleValue::Object(kvs) => {
                let mut out = String::new();
                for (i, (k, v)) in kvs.iter().enumerate() {
                    out.push(if i == 0 { '?' } else { '&' });
                    let _ = write!(out, "{key}[{}]={}", encode(k), enc(&v.to_raw()));
                }
                out
            }
            other => expand_style(name, Style::Form, explode, other, allow_reserved),
        },

        Style::Cookie => match value {
            StyleValue::Primitive(v) => format!("{key}={}", enc(&v.to_raw())),
            other => {
                let form = expand_style(name, Style::Form, false, other, allow_reserved);
                form.strip_prefix('?').map(str::to_owned).unwrap_or(form)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn encode_unreserved_untouched() {
        assert_eq!(encode("AZaz09-._~"), "AZaz09-._~");
    }

    #[test]
    fn encode_space_and_reserved() {
        assert_eq!(encode("a b"), "a%20b");
        assert_eq!(encode("a/b?c=d"), "a%2Fb%3Fc%3Dd");
        assert_eq!(encode("100%"), "100%25");
    }

    #[test]
    fn encode_allow_reserved_passes_delimiters() {
        assert_eq!(encode_allow_reserved("a/b?c=d"), "a/b?c=d");
        assert_eq!(encode_allow_reserved("a b"), "a%20b");
    }

    #[test]
    fn encode_allow_reserved_keeps_existing_triples() {
        assert_eq!(encode_allow_reserved("a%20b"), "a%20b");
        // A bare percent that is not a valid triple still gets encoded.
        assert_eq!(encode_allow_reserved("50%"), "50%25");
    }

    #[test]
    fn encode_form_space_is_plus() {
        assert_eq!(encode_form("a b*c"), "a+b*c");
        assert_eq!(encode_form("k&v=x"), "k%26v%3Dx");
    }

    #[test]
    fn encode_form_allow_reserved_escapes_delimiters_only() {
        assert_eq!(encode_form_allow_reserved("a/b,c"), "a/b,c");
        assert_eq!(encode_form_allow_reserved("a&b=c+d"), "a%26b%3Dc%2Bd");
        assert_eq!(encode_form_allow_reserved("pre%2Fenc"), "pre%2Fenc");
    }

    #[test]
    fn query_build_empty_is_empty_string() {
        let qp = QueryParams::new();
        assert_eq!(qp.build(), "");
        assert_eq!(qp.build_form(), "");
    }

    #[test]
    fn query_build_encodes_keys_and_values() {
        let mut qp = QueryParams::new();
        qp.add("q", "hello world");
        qp.add("page", "1");
        assert_eq!(qp.build(), "?q=hello%20world&page=1");
    }

    #[test]
    fn query_build_preserves_pre_encoded_values() {
        let mut qp = QueryParams::new();
        qp.add_encoded("tags", "a,b");
        assert_eq!(qp.build(), "?tags=a,b");
    }

    #[test]
    fn query_build_form_uses_plus() {
        let mut qp = QueryParams::new();
        qp.add("full name", "Jane Doe");
        assert_eq!(qp.build_form(), "full+name=Jane+Doe");
    }

    #[test]
    fn kv_join_interleaves_keys_and_values() {
        let kvs = [
            ("role", KvValue::Str("admin")),
            ("firstName", KvValue::Str("Alex")),
        ];
        assert_eq!(kv_join_form(&kvs, ",", false), "role,admin,firstName,Alex");
    }

    #[test]
    fn kv_join_stringifies_typed_values() {
        let kvs = [
            ("count", KvValue::Int(3)),
            ("ratio", KvValue::Number(1.5)),
            ("ok", KvValue::Bool(true)),
        ];
        assert_eq!(
            kv_join_form(&kvs, "%20", false),
            "count%203%20ratio%201.5%20ok%20true"
        );
    }

    #[test]
    fn style_form_array_no_explode_keeps_commas() {
        let value = StyleValue::Array(vec![KvValue::Str("a"), KvValue::Str("b")]);
        assert_eq!(
            expand_style("tags", Style::Form, false, &value, false),
            "?tags=a,b"
        );
    }

    #[test]
    fn style_form_array_explode_repeats_key() {
        let value = StyleValue::Array(vec![KvValue::Str("a"), KvValue::Str("b")]);
        assert_eq!(
            expand_style("tags", Style::Form, true, &value, false),
            "?tags=a&tags=b"
        );
    }

    #[test]
    fn style_simple_object_explode() {
        let value = StyleValue::Object(vec![
            ("R", KvValue::Int(100)),
            ("G", KvValue::Int(200)),
        ]);
        assert_eq!(
            expand_style("color", Style::Simple, true, &value, false),
            "R=100,G=200"
        );
        assert_eq!(
            expand_style("color", Style::Simple, false, &value, false),
            "R,100,G,200"
        );
    }

    #[test]
    fn style_matrix_and_label() {
        let value = StyleValue::Array(vec![KvValue::Str("blue"), KvValue::Str("black")]);
        assert_eq!(
            expand_style("color", Style::Matrix, true, &value, false),
            ";color=blue;color=black"
        );
        assert_eq!(
            expand_style("color", Style::Matrix, false, &value, false),
            ";color=blue,black"
        );
        assert_eq!(
            expand_style("color", Style::Label, true, &value, false),
            ".blue.black"
        );
        assert_eq!(
            expand_style("color", Style::Label, false, &value, false),
            ".blue,black"
        );
    }

    #[test]
    fn style_delimited_arrays() {
        let value = StyleValue::Array(vec![KvValue::Str("a"), KvValue::Str("b")]);
        assert_eq!(
            expand_style("v", Style::SpaceDelimited, false, &value, false),
            "?v=a%20b"
        );
        assert_eq!(
            expand_style("v", Style::PipeDelimited, false, &value, false),
            "?v=a%7Cb"
        );
    }

    #[test]
    fn style_deep_object() {
        let value = StyleValue::Object(vec![
            ("R", KvValue::Int(100)),
            ("G", KvValue::Int(200)),
        ]);
        assert_eq!(
            expand_style("color", Style::DeepObject, true, &value, false),
            "?color[R]=100&color[G]=200"
        );
    }

    #[test]
    fn style_values_are_encoded() {
        let value = StyleValue::Primitive(KvValue::Str("a b/c"));
        assert_eq!(
            expand_style("q", Style::Form, false, &value, false),
            "?q=a%20b%2Fc"
        );
        assert_eq!(
            expand_style("q", Style::Form, false, &value, true),
            "?q=a%20b/c"
        );
    }
}
