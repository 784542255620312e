//! Splits the raw attribute text of a tag into individual attributes while
//! keeping each one's exact source text, so a rewrite can touch one attribute
//! and re-emit the rest byte-for-byte.

use crate::scanner::skip_braced;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrValue<'a> {
    /// `name="value"` or `name='value'`; `value` excludes the quotes
    Quoted { quote: char, value: &'a str },
    /// `name={expr}`; includes the braces
    Expression(&'a str),
    /// `name=value` without quotes or braces
    Bare(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    /// Empty for spread attributes (`{...props}`)
    pub name: &'a str,
    pub value: Option<AttrValue<'a>>,
    /// Exact source text of the whole attribute
    pub raw: &'a str,
}

impl<'a> Attribute<'a> {
    pub fn is_spread(&self) -> bool {
        self.name.is_empty()
    }

    /// Source text with the attribute name swapped, value untouched
    pub fn renamed(&self, new_name: &str) -> String {
        format!("{}{}", new_name, &self.raw[self.name.len()..])
    }

    /// The literal string value, if this attribute has one
    pub fn string_value(&self) -> Option<&'a str> {
        match self.value {
            Some(AttrValue::Quoted { value, .. }) => Some(value),
            _ => None,
        }
    }

    pub fn quote(&self) -> char {
        match self.value {
            Some(AttrValue::Quoted { quote, .. }) => quote,
            _ => '"',
        }
    }
}

fn is_name_char(ch: u8) -> bool {
    !ch.is_ascii_whitespace() && !matches!(ch, b'=' | b'{' | b'"' | b'\'' | b'>' | b'/')
}

/// Parse raw attribute text (as sliced by the attribute extractor).
pub fn parse_attributes(raw: &str) -> Vec<Attribute<'_>> {
    let bytes = raw.as_bytes();
    let mut attrs = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
            continue;
        }

        let start = pos;

        // Spread props {...obj}
        if bytes[pos] == b'{' {
            pos = skip_braced(bytes, pos);
            attrs.push(Attribute { name: "", value: Some(AttrValue::Expression(&raw[start..pos])), raw: &raw[start..pos] });
            continue;
        }

        while pos < bytes.len() && is_name_char(bytes[pos]) {
            pos += 1;
        }
        if pos == start {
            // Stray character; keep it so nothing is lost on re-emit
            pos += 1;
            attrs.push(Attribute { name: &raw[start..pos], value: None, raw: &raw[start..pos] });
            continue;
        }
        let name_end = pos;

        let mut lookahead = pos;
        while lookahead < bytes.len() && bytes[lookahead].is_ascii_whitespace() {
            lookahead += 1;
        }
        if bytes.get(lookahead) != Some(&b'=') {
            attrs.push(Attribute { name: &raw[start..name_end], value: None, raw: &raw[start..name_end] });
            continue;
        }

        pos = lookahead + 1;
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }

        let value = match bytes.get(pos) {
            Some(&q) if q == b'"' || q == b'\'' => {
                let value_start = pos + 1;
                let mut end = value_start;
                while end < bytes.len() && !(bytes[end] == q && bytes[end - 1] != b'\\') {
                    end += 1;
                }
                pos = (end + 1).min(bytes.len());
                Some(AttrValue::Quoted { quote: q as char, value: &raw[value_start..end.min(bytes.len())] })
            }
            Some(b'{') => {
                let value_start = pos;
                pos = skip_braced(bytes, pos);
                Some(AttrValue::Expression(&raw[value_start..pos]))
            }
            Some(_) => {
                let value_start = pos;
                while pos < bytes.len() && !bytes[pos].is_ascii_whitespace() {
                    pos += 1;
                }
                Some(AttrValue::Bare(&raw[value_start..pos]))
            }
            None => None,
        };

        attrs.push(Attribute { name: &raw[start..name_end], value, raw: &raw[start..pos] });
    }

    attrs
}

/// The `className` (or plain `class`) attribute, if present
pub fn class_attribute<'a>(attrs: &[Attribute<'a>]) -> Option<Attribute<'a>> {
    attrs.iter().copied().find(|a| a.name == "className" || a.name == "class")
}

/// Whitespace-separated tokens of a literal class attribute; empty for dynamic ones
pub fn class_tokens(raw_attributes: &str) -> Vec<String> {
    let attrs = parse_attributes(raw_attributes);
    class_attribute(&attrs)
        .and_then(|a| a.string_value())
        .map(|v| v.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parses_every_attribute_kind() {
        let raw = r#" className="flex gap-4" data-id='x' onClick={() => go({ a: "}" })} {...rest} disabled tabIndex=0"#;
        let attrs = parse_attributes(raw);
        let names: Vec<_> = attrs.iter().map(|a| a.name).collect();
        assert_eq!(names, vec!["className", "data-id", "onClick", "", "disabled", "tabIndex"]);

        assert_eq!(attrs[0].string_value(), Some("flex gap-4"));
        assert_eq!(attrs[1].quote(), '\'');
        assert_eq!(attrs[2].raw, r#"onClick={() => go({ a: "}" })}"#);
        assert!(attrs[3].is_spread());
        assert_eq!(attrs[3].raw, "{...rest}");
        assert_eq!(attrs[4].value, None);
        assert_eq!(attrs[5].value, Some(AttrValue::Bare("0")));
    }

    #[test]
    fn test_renamed_keeps_value_verbatim() {
        let attrs = parse_attributes(" onClick = {handle}");
        assert_eq!(attrs[0].raw, "onClick = {handle}");
        assert_eq!(attrs[0].renamed("onPress"), "onPress = {handle}");
    }

    #[test]
    fn test_multiline_attributes() {
        let raw = "\n    className=\"p-4\"\n    aria-label=\"Close\"\n  ";
        let attrs = parse_attributes(raw);
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs[1].raw, "aria-label=\"Close\"");
    }

    #[test]
    fn test_class_tokens() {
        assert_eq!(class_tokens(r#" id="a" className=" flex  gap-2 ""#), vec!["flex", "gap-2"]);
        assert!(class_tokens(r#" className={cx("flex")}"#).is_empty());
        assert_eq!(class_tokens(r#" class="grid""#), vec!["grid"]);
    }
}
