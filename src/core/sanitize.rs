// src/core/sanitize.rs

/// Decode the entities that show up in the device tables:
/// the common named ones plus decimal/hex character references.
/// Unknown entities are left as written.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }
    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let semi = tail[1..].find(';').map(|i| i + 1).filter(|&i| i <= 10);
        let decoded = semi.and_then(|i| decode_one(&tail[1..i]).map(|c| (c, i)));
        match decoded {
            Some((ch, i)) => {
                out.push(ch);
                rest = &tail[i + 1..];
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

fn decode_one(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" | "#39" => Some('\''),
        "nbsp" => Some(' '),
        _ => {
            let num = name.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// `a,b` → `a, b` for plain-text cells; existing spacing is kept.
pub fn space_commas(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let mut chars = s.chars().peekable();
    while let Some(ch) = chars.next() {
        out.push(ch);
        if ch == ',' && chars.peek().is_some_and(|c| !c.is_whitespace()) {
            out.push(' ');
        }
    }
    out
}

/// File-system safe stem for a device id (`tp-link_archer_c7_v2`).
pub fn sanitize_file_stem(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut last_us = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '.' { out.push(ch); last_us = false; }
        else if !last_us { out.push('_'); last_us = true; }
    }
    out.trim_matches(|c| c == '_' || c == '.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entities_named_and_numeric() {
        assert_eq!(decode_entities("A&amp;B &lt;x&gt; &#65;&#x42;"), "A&B <x> AB");
        assert_eq!(decode_entities("AT&T &bogus; tail&"), "AT&T &bogus; tail&");
    }

    #[test]
    fn commas_get_a_space() {
        assert_eq!(space_commas("ath79,ramips, mt7621"), "ath79, ramips, mt7621");
        assert_eq!(space_commas("1,"), "1,");
    }

    #[test]
    fn file_stems() {
        assert_eq!(sanitize_file_stem("tp-link_archer c7/v2"), "tp-link_archer_c7_v2");
        assert_eq!(sanitize_file_stem("..//"), "");
    }
}
