// src/scanner/tags.rs
// =============================================================================
// A tiny, forgiving tag lexer for the <head> of an HTML page.
//
// We deliberately do NOT build a DOM here. Link previews only need the
// <meta> tags and the <title> element, and real-world markup is full of
// broken quoting, unclosed tags and odd casing. A DOM parser would spend
// most of its time on the <body> we never look at.
//
// How it works:
// 1. Lowercase a copy of the markup (ASCII only, so byte offsets line up)
// 2. Jump from '<' to '<', recognizing "<meta", "<title" and "<!--"
// 3. Stop at a real "</head" tag or at the end of the input. A "</head"
//    inside a comment or a quoted attribute value is skipped along with it
// 4. For each <meta ...> lex its attributes into (name, value) pairs
//
// Everything returned borrows from the original markup, so attribute
// values keep their original casing.
//
// Rust concepts:
// - Iterator trait: TagScanner yields tokens lazily with next()
// - Lifetimes: Token<'a> borrows from the markup it was lexed from
// - Byte slices: all delimiters are ASCII, so byte indices are valid
//   char boundaries for slicing the &str
// =============================================================================

const END_OF_HEAD: &str = "</head";

/// One attribute of a tag. The name is lowercased, the value is raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: String,
    pub value: &'a str,
}

/// Something interesting found in the markup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// A `<meta ...>` tag and its attributes
    Meta(Vec<Attribute<'a>>),
    /// The raw inner text of a `<title>` element
    Title(&'a str),
}

impl<'a> Token<'a> {
    // Returns the value of the first attribute called `name`
    //
    // `name` must already be lowercase
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        match self {
            Token::Meta(attributes) => attributes
                .iter()
                .find(|attribute| attribute.name == name)
                .map(|attribute| attribute.value),
            Token::Title(_) => None,
        }
    }
}

/// Walks the markup and yields meta/title tokens in document order
pub struct TagScanner<'a> {
    source: &'a str,
    lower: String,
    pos: usize,
    end: usize,
}

impl<'a> TagScanner<'a> {
    pub fn new(source: &'a str) -> Self {
        let lower = source.to_ascii_lowercase();
        let end = lower.len();
        TagScanner { source, lower, pos: 0, end }
    }
}

impl<'a> Iterator for TagScanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        loop {
            if self.pos >= self.end {
                return None;
            }

            let start = self.pos + self.lower[self.pos..self.end].find('<')?;
            let rest = &self.lower[start..self.end];

            if rest.starts_with("<!--") {
                // Skip the whole comment; an unterminated one swallows the rest
                self.pos = match rest[4..].find("-->") {
                    Some(i) => start + 4 + i + 3,
                    None => self.end,
                };
                continue;
            }

            if opens_tag(rest, END_OF_HEAD) {
                self.end = start;
                return None;
            }

            if opens_tag(rest, "<meta") {
                let body_start = start + "<meta".len();
                let close = find_tag_close(&self.source.as_bytes()[body_start..self.end]);
                let body = &self.source[body_start..body_start + close];
                self.pos = (body_start + close + 1).min(self.end);
                return Some(Token::Meta(parse_attributes(body)));
            }

            if opens_tag(rest, "<title") {
                let open_start = start + "<title".len();
                let close = find_tag_close(&self.source.as_bytes()[open_start..self.end]);
                let text_start = (open_start + close + 1).min(self.end);
                // An unclosed <title> still ends where the head does
                let text = &self.lower[text_start..self.end];
                let text_end = [text.find("</title"), text.find(END_OF_HEAD)]
                    .into_iter()
                    .flatten()
                    .min()
                    .map(|i| text_start + i)
                    .unwrap_or(self.end);
                self.pos = text_end.max(text_start + 1).min(self.end);
                return Some(Token::Title(&self.source[text_start..text_end]));
            }

            self.pos = start + 1;
        }
    }
}

// Checks that `rest` starts with `prefix` as a whole tag name
//
// "<meta " and "<meta/" match, "<metadata" does not
fn opens_tag(rest: &str, prefix: &str) -> bool {
    if !rest.starts_with(prefix) {
        return false;
    }
    match rest.as_bytes().get(prefix.len()) {
        None => true,
        Some(b) => b.is_ascii_whitespace() || *b == b'/' || *b == b'>',
    }
}

// Finds the '>' that closes a tag, ignoring any '>' inside quoted values
//
// Returns the index of the '>' or, for a truncated tag, the length of
// `bytes`. If a quote is never closed we fall back to the first '>' at all,
// so one broken attribute can't swallow every tag after it.
fn find_tag_close(bytes: &[u8]) -> usize {
    let mut quote: Option<u8> = None;
    for (i, &b) in bytes.iter().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return i,
            None => {}
        }
    }

    if quote.is_some() {
        if let Some(i) = bytes.iter().position(|&b| b == b'>') {
            return i;
        }
    }
    bytes.len()
}

// Lexes `name="value"` pairs out of the inside of a tag
//
// Tolerates:
// - any attribute order
// - double quotes, single quotes and unquoted values
// - attributes without a value (e.g. `<meta itemprop>`)
// - a trailing "/" from self-closing tags, when it follows whitespace or a
//   quoted value. As in HTML, `content=https://example.com/>` keeps its
//   slash: an unquoted value runs until whitespace, slash included.
// - an unterminated quoted value (runs to the end of the tag)
pub fn parse_attributes(body: &str) -> Vec<Attribute<'_>> {
    let bytes = body.as_bytes();
    let len = bytes.len();
    let mut attributes = Vec::new();
    let mut i = 0;

    while i < len {
        while i < len && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= len {
            break;
        }

        let name_start = i;
        while i < len && !is_name_delimiter(bytes[i]) {
            i += 1;
        }
        if i == name_start {
            // A stray '=' or '>' with no name in front of it
            i += 1;
            continue;
        }
        let name = body[name_start..i].to_ascii_lowercase();

        while i < len && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let mut value = "";
        if i < len && bytes[i] == b'=' {
            i += 1;
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }

            if i < len && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < len && bytes[i] != quote {
                    i += 1;
                }
                value = &body[value_start..i];
                if i < len {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < len && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                value = &body[value_start..i];
            }
        }

        attributes.push(Attribute { name, value });
    }

    attributes
}

fn is_name_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'=' || b == b'/' || b == b'>'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(markup: &str) -> Vec<Token<'_>> {
        TagScanner::new(markup).collect()
    }

    #[test]
    fn test_attributes_in_any_order_and_quoting() {
        let attributes = parse_attributes(r#" content='Hello' PROPERTY="og:title" data-x=1 /"#);
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes[0], Attribute { name: "content".into(), value: "Hello" });
        assert_eq!(attributes[1], Attribute { name: "property".into(), value: "og:title" });
        assert_eq!(attributes[2], Attribute { name: "data-x".into(), value: "1" });
    }

    #[test]
    fn test_self_closing_slash_after_whitespace_is_dropped() {
        let attributes = parse_attributes(" name=og:type content=article /");
        assert_eq!(attributes.len(), 2);
        assert_eq!(attributes[1].value, "article");
    }

    #[test]
    fn test_unquoted_value_keeps_trailing_slash() {
        let found = tokens("<meta property=og:url content=https://example.com/>");
        assert_eq!(found[0].attribute("content"), Some("https://example.com/"));
    }

    #[test]
    fn test_quoted_value_may_contain_gt() {
        let found = tokens(r#"<meta content="a > b" property="og:title">"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attribute("content"), Some("a > b"));
        assert_eq!(found[0].attribute("property"), Some("og:title"));
    }

    #[test]
    fn test_stops_at_end_of_head() {
        let markup = r#"<meta name="a" content="1"></HEAD><meta name="b" content="2">"#;
        assert_eq!(tokens(markup).len(), 1);
    }

    #[test]
    fn test_end_of_head_inside_comment_is_ignored() {
        let found = tokens(r#"<!-- </head> --><meta property="og:title" content="T">"#);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attribute("content"), Some("T"));
    }

    #[test]
    fn test_end_of_head_inside_quoted_value_is_ignored() {
        let markup = r#"<meta property="og:description" content="close with </head>"><meta property="og:title" content="T">"#;
        let found = tokens(markup);
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].attribute("content"), Some("close with </head>"));
        assert_eq!(found[1].attribute("property"), Some("og:title"));
    }

    #[test]
    fn test_unclosed_title_ends_at_end_of_head() {
        let found = tokens("<title>Cut off</head><meta name=x content=y>");
        assert_eq!(found, vec![Token::Title("Cut off")]);
    }

    #[test]
    fn test_skips_comments_and_lookalike_tags() {
        let markup = r#"<!-- <meta name="hidden" content="x"> --><metadata><meta name="shown" content="y">"#;
        let found = tokens(markup);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].attribute("name"), Some("shown"));
    }

    #[test]
    fn test_title_element() {
        let found = tokens("<TITLE lang=en>  My Page </title><meta name=x content=y>");
        assert_eq!(found[0], Token::Title("  My Page "));
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn test_truncated_markup_does_not_panic() {
        for markup in ["<meta", "<meta property=\"og:title", "<title>abc", "<!--", "<", "<meta content='é"] {
            let _ = tokens(markup);
        }
        let found = tokens("<meta property=\"og:title\" content=\"Cut");
        assert_eq!(found[0].attribute("content"), Some("Cut"));
    }

    #[test]
    fn test_unterminated_quote_does_not_swallow_next_tag() {
        let markup = r#"<meta content="broken><meta property="og:url" content="u">"#;
        let found = tokens(markup);
        assert_eq!(found.len(), 2);
        assert_eq!(found[1].attribute("content"), Some("u"));
    }
}
