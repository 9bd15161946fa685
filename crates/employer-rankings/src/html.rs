//! Minimal HTML element scanning.
//!
//! Finds elements by tag name, exposes their attributes, and extracts their
//! visible text. Nested elements of the same tag are not matched; ranking pages
//! only need flat `<strong>` and `<a>` elements.

/// One matched element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    attrs: Vec<(String, String)>,
    inner: &'a str,
}

impl<'a> Element<'a> {
    /// Returns true if the element carries the attribute, with or without a value.
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Returns the attribute value, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if the `class` attribute contains every listed class.
    #[must_use]
    pub fn has_classes(&self, classes: &[&str]) -> bool {
        let Some(value) = self.attr("class") else {
            return false;
        };
        classes
            .iter()
            .all(|wanted| value.split_ascii_whitespace().any(|c| c == *wanted))
    }

    /// Raw markup between the opening and closing tag.
    #[must_use]
    pub const fn inner_html(&self) -> &'a str {
        self.inner
    }

    /// Visible text: tags removed, entities decoded, whitespace collapsed.
    #[must_use]
    pub fn text(&self) -> String {
        normalize_ws(&decode_entities(&strip_tags(self.inner)))
    }
}

/// Returns every `<tag ...>...</tag>` element in document order.
#[must_use]
pub fn elements<'a>(html: &'a str, tag: &str) -> Vec<Element<'a>> {
    let lower = html.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let open = format!("<{}", tag.to_ascii_lowercase());
    let close = format!("</{}", tag.to_ascii_lowercase());

    let mut found = Vec::new();
    let mut from = 0;

    while let Some(rel) = lower[from..].find(&open) {
        let start = from + rel;
        let after_name = start + open.len();

        // Reject prefixes of longer tag names, e.g. `<a` matching `<abbr`.
        match bytes.get(after_name) {
            Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {}
            _ => {
                from = after_name;
                continue;
            }
        }

        let Some(open_end) = open_tag_end(bytes, after_name) else {
            break;
        };
        let attrs = parse_attributes(&html[after_name..open_end]);

        if bytes[..open_end].ends_with(b"/") {
            found.push(Element { attrs, inner: "" });
            from = open_end + 1;
            continue;
        }

        let inner_start = open_end + 1;
        let Some(close_rel) = lower[inner_start..].find(&close) else {
            break;
        };
        let inner_end = inner_start + close_rel;

        found.push(Element {
            attrs,
            inner: &html[inner_start..inner_end],
        });
        from = inner_end + close.len();
    }

    found
}

/// Index of the `>` closing an opening tag, skipping quoted attribute values.
fn open_tag_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut quote = None;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Parses `name="value" name='value' name=value name` attribute lists.
fn parse_attributes(s: &str) -> Vec<(String, String)> {
    let bytes = s.as_bytes();
    let mut attrs = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }

        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        let name = s[name_start..i].to_ascii_lowercase();

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = String::new();
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                value = decode_entities(&s[start..i]);
                i = (i + 1).min(bytes.len());
            } else {
                let start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = decode_entities(&s[start..i]);
            }
        }

        if !name.is_empty() {
            attrs.push((name, value));
        }
    }

    attrs
}

/// Removes every `<...>` tag, keeping the text between them.
#[must_use]
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// Collapses whitespace runs into single spaces and trims the ends.
#[must_use]
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes named and numeric character references. Unknown references are kept verbatim.
#[must_use]
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_reference(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "rsquo" => '\u{2019}',
        "lsquo" => '\u{2018}',
        "rdquo" => '\u{201D}',
        "ldquo" => '\u{201C}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        _ => return None,
    };
    Some(c)
}
