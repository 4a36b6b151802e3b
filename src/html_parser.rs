use select::document::Document;
use select::predicate::{Name, Predicate};

/// Tag kinds whose references are eligible for local download, and the
/// attribute carrying the reference for each kind.
pub const ASSET_TAG_ATTRIBUTES: &[(&str, &str)] = &[
    ("img", "src"),
    ("script", "src"),
    ("link", "href"),
];

/// One asset reference found in a document, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRef {
    pub tag: String,
    pub attribute: &'static str,
    pub value: String,
}

/// Count anchor tags whose `href` is present and non-empty.
pub fn count_links(html: &str) -> usize {
    Document::from(html)
        .find(Name("a"))
        .filter(|node| node.attr("href").is_some_and(|href| !href.is_empty()))
        .count()
}

/// The `href` of the first `<base>` tag, if present and non-empty.
pub fn base_href(html: &str) -> Option<String> {
    Document::from(html)
        .find(Name("base"))
        .next()
        .and_then(|node| node.attr("href"))
        .filter(|href| !href.is_empty())
        .map(str::to_string)
}

/// Collect every asset tag reference into an ordered sequence. Tags whose
/// reference attribute is absent or empty are skipped.
pub fn asset_refs(html: &str) -> Vec<AssetRef> {
    let document = Document::from(html);
    let mut refs = Vec::new();

    for node in document.find(Name("img").or(Name("script")).or(Name("link"))) {
        let Some(name) = node.name() else { continue };
        let Some(&(_, attribute)) = ASSET_TAG_ATTRIBUTES.iter().find(|(tag, _)| *tag == name)
        else {
            continue;
        };

        match node.attr(attribute) {
            Some(value) if !value.is_empty() => refs.push(AssetRef {
                tag: name.to_string(),
                attribute,
                value: value.to_string(),
            }),
            _ => {}
        }
    }

    log::debug!("found {} asset references", refs.len());
    refs
}

/// Rewrite an attribute value in the raw document text, so markup the
/// rewrite does not touch is preserved byte-for-byte. The attribute name
/// must start at a tag boundary (`data-src` never matches `src`), and the
/// value may be double-quoted, single-quoted, or unquoted, with optional
/// whitespace around the `=`.
pub fn rewrite_attribute(html: &str, attribute: &str, from: &str, to: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    let mut rewrote = false;

    while let Some(pos) = rest.find(attribute) {
        let at_boundary = pos == 0
            || rest[..pos]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_ascii_whitespace() || c == '<');
        let after = &rest[pos + attribute.len()..];

        if at_boundary {
            if let Some((start, end)) = attribute_value_span(after, from) {
                out.push_str(&rest[..pos + attribute.len() + start]);
                out.push_str(to);
                rest = &after[end..];
                rewrote = true;
                continue;
            }
        }

        out.push_str(&rest[..pos + attribute.len()]);
        rest = after;
    }
    out.push_str(rest);

    if !rewrote {
        log::warn!("could not rewrite {}={} in document text", attribute, from);
    }
    out
}

/// Span of the attribute value in `after` (the text following the attribute
/// name), but only when that value equals `from`.
fn attribute_value_span(after: &str, from: &str) -> Option<(usize, usize)> {
    let mut i = after.len() - after.trim_start().len();
    if !after[i..].starts_with('=') {
        return None;
    }
    i += 1;
    i += after[i..].len() - after[i..].trim_start().len();

    let value = &after[i..];
    match value.chars().next()? {
        quote @ ('"' | '\'') => {
            let start = i + 1;
            let end = start + after[start..].find(quote)?;
            (&after[start..end] == from).then_some((start, end))
        }
        _ => {
            // Unquoted value, terminated by whitespace or the tag close.
            let end = value
                .find(|c: char| c.is_ascii_whitespace() || c == '>')
                .map_or(after.len(), |offset| i + offset);
            (&after[i..end] == from).then_some((i, end))
        }
    }
}
