// src/core/html.rs
// Small, tolerant HTML scanning helpers.
// Tag and attribute names match case-insensitively; byte offsets returned
// here always sit on ASCII delimiters so they are valid `str` slice bounds.

use super::sanitize::{decode_entities, normalize_ws};

/// Span of one element inside a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Block {
    /// Offset of `<`
    pub start: usize,
    /// Offset just past the open tag's `>`
    pub open_end: usize,
    /// Offset of the closing tag (or of the region end when it is missing)
    pub close_start: usize,
    /// Offset just past the closing tag
    pub end: usize,
}

impl Block {
    pub fn open_tag<'a>(&self, s: &'a str) -> &'a str {
        &s[self.start..self.open_end]
    }
    pub fn inner<'a>(&self, s: &'a str) -> &'a str {
        &s[self.open_end..self.close_start]
    }
}

pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

fn name_ends_at(b: &[u8], i: usize) -> bool {
    match b.get(i) {
        None => true,
        Some(c) => c.is_ascii_whitespace() || *c == b'>' || *c == b'/',
    }
}

/// Offset of the next `<name ...>` open tag at or after `from`.
/// `<th` does not match `<thead`.
pub fn find_open_tag_ci(s: &str, name: &str, from: usize) -> Option<usize> {
    let b = s.as_bytes();
    let n = name.as_bytes();
    let mut i = from;
    while i < b.len() {
        let lt = i + b[i..].iter().position(|&c| c == b'<')?;
        let at = lt + 1;
        if b.len() >= at + n.len()
            && b[at..at + n.len()].eq_ignore_ascii_case(n)
            && name_ends_at(b, at + n.len())
        {
            return Some(lt);
        }
        i = at;
    }
    None
}

/// Offset of the next `</name>` closing tag at or after `from`.
pub fn find_close_tag_ci(s: &str, name: &str, from: usize) -> Option<usize> {
    let b = s.as_bytes();
    let n = name.as_bytes();
    let mut i = from;
    while i + 1 < b.len() {
        let lt = i + b[i..].iter().position(|&c| c == b'<')?;
        let at = lt + 2;
        if b.get(lt + 1) == Some(&b'/')
            && b.len() >= at + n.len()
            && b[at..at + n.len()].eq_ignore_ascii_case(n)
            && name_ends_at(b, at + n.len())
        {
            return Some(lt);
        }
        i = lt + 1;
    }
    None
}

/// Offset just past the `>` that ends the tag starting at `start`.
/// Quotes are honoured only where an attribute value can begin.
pub fn tag_end(s: &str, start: usize) -> Option<usize> {
    let b = s.as_bytes();
    let mut quote: Option<u8> = None;
    let mut prev = 0u8;
    for (off, &c) in b.get(start..)?.iter().enumerate() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                b'"' | b'\'' if prev == b'=' => quote = Some(c),
                b'>' => return Some(start + off + 1),
                _ => {}
            },
        }
        if !c.is_ascii_whitespace() {
            prev = c;
        }
    }
    None
}

/// Next complete `<name>…</name>` element at or after `from`, nesting-aware.
/// A missing closing tag extends the element to the end of `s`.
pub fn element_block_ci(s: &str, name: &str, from: usize) -> Option<Block> {
    let start = find_open_tag_ci(s, name, from)?;
    element_at(s, name, start)
}

/// Element whose open tag begins at `start`.
pub fn element_at(s: &str, name: &str, start: usize) -> Option<Block> {
    let open_end = tag_end(s, start)?;
    if s[start..open_end].ends_with("/>") {
        return Some(Block { start, open_end, close_start: open_end, end: open_end });
    }

    let mut depth = 0usize;
    let mut pos = open_end;
    loop {
        let next_close = match find_close_tag_ci(s, name, pos) {
            Some(c) => c,
            None => return Some(Block { start, open_end, close_start: s.len(), end: s.len() }),
        };
        match find_open_tag_ci(s, name, pos) {
            Some(o) if o < next_close => {
                depth += 1;
                pos = tag_end(s, o).unwrap_or(s.len());
            }
            _ => {
                let close_end = tag_end(s, next_close).unwrap_or(s.len());
                if depth == 0 {
                    return Some(Block { start, open_end, close_start: next_close, end: close_end });
                }
                depth -= 1;
                pos = close_end;
            }
        }
    }
}

/// Children of `s` opened by any of `names`, where each child ends at its own
/// closing tag or where the next sibling starts (HTML's implied `</td>`, `</tr>`).
pub fn loose_children_ci(s: &str, names: &[&str]) -> Vec<Block> {
    let mut starts: Vec<(usize, &str)> = Vec::new();
    for &name in names {
        let mut pos = 0usize;
        while let Some(o) = find_open_tag_ci(s, name, pos) {
            starts.push((o, name));
            pos = o + 1;
        }
    }
    starts.sort_by_key(|(o, _)| *o);

    let mut out = Vec::with_capacity(starts.len());
    for (ix, &(start, name)) in starts.iter().enumerate() {
        let Some(open_end) = tag_end(s, start) else { continue };
        let limit = starts.get(ix + 1).map(|(o, _)| *o).unwrap_or(s.len()).max(open_end);
        let region = &s[open_end..limit];
        let (close_start, end) = match find_close_tag_ci(region, name, 0) {
            Some(c) => {
                let cs = open_end + c;
                (cs, tag_end(s, cs).unwrap_or(limit).min(limit))
            }
            None => (limit, limit),
        };
        out.push(Block { start, open_end, close_start, end });
    }
    out
}

/// Parse the attributes of an open tag. Names are lowercased, values decoded.
pub fn attrs(open_tag: &str) -> Vec<(String, String)> {
    let b = open_tag.as_bytes();
    let n = b.len();
    let mut out = Vec::new();

    // skip '<' and the tag name
    let mut i = 1usize;
    while i < n && !b[i].is_ascii_whitespace() && b[i] != b'>' && b[i] != b'/' { i += 1; }

    loop {
        while i < n && (b[i].is_ascii_whitespace() || b[i] == b'/') { i += 1; }
        if i >= n || b[i] == b'>' { break; }

        let name_start = i;
        while i < n && !b[i].is_ascii_whitespace() && !matches!(b[i], b'=' | b'>' | b'/') { i += 1; }
        let name = to_lower(&open_tag[name_start..i]);

        while i < n && b[i].is_ascii_whitespace() { i += 1; }
        if i < n && b[i] == b'=' {
            i += 1;
            while i < n && b[i].is_ascii_whitespace() { i += 1; }
            let value = if i < n && (b[i] == b'"' || b[i] == b'\'') {
                let q = b[i];
                let vs = i + 1;
                let ve = b[vs..].iter().position(|&c| c == q).map(|p| vs + p).unwrap_or(n);
                i = (ve + 1).min(n);
                &open_tag[vs..ve]
            } else {
                let vs = i;
                while i < n && !b[i].is_ascii_whitespace() && b[i] != b'>' { i += 1; }
                &open_tag[vs..i]
            };
            out.push((name, decode_entities(value)));
        } else if !name.is_empty() {
            out.push((name, s!()));
        }
    }
    out
}

pub fn attr(open_tag: &str, name: &str) -> Option<String> {
    let name = to_lower(name);
    attrs(open_tag).into_iter().find(|(k, _)| *k == name).map(|(_, v)| v)
}

pub fn class_tokens(open_tag: &str) -> Vec<String> {
    attr(open_tag, "class")
        .map(|c| c.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

/// Element carrying `id="<id>"`, whatever its tag name.
pub fn find_by_id(s: &str, id: &str) -> Option<Block> {
    let b = s.as_bytes();
    let mut i = 0usize;
    while i < b.len() {
        let lt = i + b[i..].iter().position(|&c| c == b'<')?;
        let Some(end) = tag_end(s, lt) else { break };
        let tag = &s[lt..end];
        let is_open = b.get(lt + 1).is_some_and(|c| c.is_ascii_alphabetic());
        if is_open && attr(tag, "id").as_deref() == Some(id) {
            let name_len = tag[1..]
                .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
                .unwrap_or(tag.len() - 1);
            let name = &tag[1..1 + name_len];
            return element_at(s, name, lt);
        }
        i = end;
    }
    None
}

/// Every `href` of every `<a>` inside `s`, in document order.
pub fn anchor_hrefs(s: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(o) = find_open_tag_ci(s, "a", pos) {
        let Some(end) = tag_end(s, o) else { break };
        if let Some(href) = attr(&s[o..end], "href") {
            out.push(href);
        }
        pos = end;
    }
    out
}

/// Spans of `<!-- … -->` comments as (start, end) offsets.
pub fn comments(s: &str) -> Vec<(usize, usize)> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some(rel) = s[pos..].find("<!--") {
        let start = pos + rel;
        let body = start + 4;
        let end = s[body..].find("-->").map(|e| body + e + 3).unwrap_or(s.len());
        out.push((start, end));
        pos = end;
    }
    out
}

/// Remove all tags, decode entities, collapse whitespace.
pub fn strip_tags<S: AsRef<str>>(s: S) -> String {
    let s = s.as_ref();

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
    normalize_ws(&decode_entities(&out))
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn th_does_not_match_thead() {
        let s = "<thead><tr><th class=a>X</th></tr></thead>";
        assert_eq!(find_open_tag_ci(s, "th", 0), Some(11));
        assert_eq!(find_open_tag_ci(s, "thead", 0), Some(0));
    }

    #[test]
    fn nested_divs_close_at_matching_tag() {
        let s = r#"<div class="wrap_toh"><div>inner</div>tail</div><p>after</p>"#;
        let b = element_block_ci(s, "div", 0).unwrap();
        assert_eq!(b.inner(s), "<div>inner</div>tail");
        assert_eq!(&s[b.end..], "<p>after</p>");
    }

    #[test]
    fn attrs_handle_quotes_and_bare_values() {
        let tag = r#"<td CLASS="toh_brand x" data-x='{"a":1}' width=10 hidden>"#;
        assert_eq!(attr(tag, "class").as_deref(), Some("toh_brand x"));
        assert_eq!(attr(tag, "data-x").as_deref(), Some(r#"{"a":1}"#));
        assert_eq!(attr(tag, "width").as_deref(), Some("10"));
        assert_eq!(attr(tag, "hidden").as_deref(), Some(""));
        assert_eq!(class_tokens(tag), vec!["toh_brand", "x"]);
    }

    #[test]
    fn gt_inside_quoted_attr_does_not_end_tag() {
        let s = r#"<div data-settings='{"dom":"<f>"}'>x</div>"#;
        let b = element_block_ci(s, "div", 0).unwrap();
        assert_eq!(b.inner(s), "x");
    }

    #[test]
    fn loose_cells_without_closing_tags() {
        let row = "<td>a<td class=b>b</td><td>c";
        let cells = loose_children_ci(row, &["td", "th"]);
        let inner: Vec<&str> = cells.iter().map(|c| c.inner(row)).collect();
        assert_eq!(inner, vec!["a", "b", "c"]);
    }

    #[test]
    fn find_by_id_any_tag() {
        let s = r#"<body><table id="devices"><tr><td>1</td></tr></table></body>"#;
        let b = find_by_id(s, "devices").unwrap();
        assert!(b.open_tag(s).starts_with("<table"));
        assert_eq!(b.inner(s), "<tr><td>1</td></tr>");
    }

    #[test]
    fn anchors_and_comments() {
        let s = r#"<a href="/x">x</a> <!-- ToH: {} --> <A HREF='/y'>y</A>"#;
        assert_eq!(anchor_hrefs(s), vec!["/x", "/y"]);
        let c = comments(s);
        assert_eq!(c.len(), 1);
        assert_eq!(&s[c[0].0..c[0].1], "<!-- ToH: {} -->");
    }

    #[test]
    fn strip_tags_decodes_and_collapses() {
        assert_eq!(strip_tags("<b>TP-Link</b>&nbsp;&amp;\n  Co"), "TP-Link & Co");
    }
}
