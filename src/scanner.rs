/// Hand-rolled tag scanner for JSX/TSX markup
/// Locates opening tags, their attribute text and their true matching close
/// without building a syntax tree.
/// All offsets are byte offsets; every delimiter the scanner stops on is ASCII,
/// so offsets it returns are always valid `str` slice boundaries.

/// Where a tag's opening syntax ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagBounds {
    /// Offset just past the closing `>`
    pub end: usize,
    pub self_closing: bool,
}

/// A located opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagOccurrence {
    /// Offset of the tag name's first character (one past the `<`)
    pub start_index: usize,
    /// Offset just past the opening tag's `>`
    pub tag_end: usize,
    /// Raw attribute text between the tag name and `>` / `/>`
    pub attributes: String,
    pub self_closing: bool,
}

impl TagOccurrence {
    /// Offset of the `<` that opens this tag
    pub fn open_index(&self) -> usize {
        self.start_index - 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    None,
    Single,
    Double,
    Template,
}

/// Cursor over the source bytes
struct ScanContext<'a> {
    source: &'a [u8],
    pos: usize,
}

impl<'a> ScanContext<'a> {
    fn new(source: &'a str, pos: usize) -> Self {
        Self { source: source.as_bytes(), pos }
    }

    fn current_char(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn prev_char(&self) -> Option<u8> {
        self.pos.checked_sub(1).and_then(|i| self.source.get(i).copied())
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn skip_tag_name(&mut self) {
        while let Some(ch) = self.current_char() {
            if is_name_terminator(ch) {
                break;
            }
            self.advance();
        }
    }
}

fn is_name_terminator(ch: u8) -> bool {
    matches!(ch, b' ' | b'\t' | b'\n' | b'\r' | b'>' | b'/')
}

/// Offset where the tag name starting at `start` ends
pub fn tag_name_end(source: &str, start: usize) -> usize {
    let mut ctx = ScanContext::new(source, start);
    ctx.skip_tag_name();
    ctx.pos
}

/// Find where the opening tag whose name begins at `start` ends.
///
/// Quotes suspend interpretation of `{`, `}` and `>`; outside quotes, a `>`
/// only terminates the tag at expression-brace depth 0. Returns `None` when
/// the document ends first.
pub fn find_tag_end(source: &str, start: usize) -> Option<TagBounds> {
    let mut ctx = ScanContext::new(source, start);
    ctx.skip_tag_name();

    let mut state = QuoteState::None;
    let mut depth: usize = 0;

    while let Some(ch) = ctx.current_char() {
        let escaped = ctx.prev_char() == Some(b'\\');
        match state {
            QuoteState::Single if ch == b'\'' && !escaped => state = QuoteState::None,
            QuoteState::Double if ch == b'"' && !escaped => state = QuoteState::None,
            QuoteState::Template if ch == b'`' && !escaped => state = QuoteState::None,
            QuoteState::None => match ch {
                b'\'' if !escaped => state = QuoteState::Single,
                b'"' if !escaped => state = QuoteState::Double,
                b'`' if !escaped => state = QuoteState::Template,
                b'{' => depth += 1,
                b'}' => depth = depth.saturating_sub(1),
                b'>' if depth == 0 => {
                    return Some(TagBounds {
                        end: ctx.pos + 1,
                        self_closing: ctx.prev_char() == Some(b'/'),
                    });
                }
                _ => {}
            },
            _ => {}
        }
        ctx.advance();
    }

    None
}

/// Slice out the attribute text of the tag whose name begins at `start`.
pub fn extract_attributes(source: &str, start: usize) -> Option<TagOccurrence> {
    let bounds = find_tag_end(source, start)?;
    let name_end = tag_name_end(source, start);
    let attr_end = if bounds.self_closing { bounds.end - 2 } else { bounds.end - 1 };

    Some(TagOccurrence {
        start_index: start,
        tag_end: bounds.end,
        attributes: source[name_end..attr_end.max(name_end)].to_string(),
        self_closing: bounds.self_closing,
    })
}

/// True when `<name` at `open` is a real opening of `name` and not a longer tag like `<divider`
fn is_genuine_open(source: &str, open: usize, tag_name: &str) -> bool {
    source
        .as_bytes()
        .get(open + 1 + tag_name.len())
        .is_some_and(|&ch| is_name_terminator(ch))
}

/// Find the offset of the `</tag_name>` that closes the tag opened at `start`.
///
/// Same-named opens between here and the close raise the depth unless they
/// are self-closing. Returns `None` for self-closing or unmatched tags.
///
/// Only the opening tag's own quotes and braces are honored; tags quoted in
/// JS strings or JSX comments between the open and the close still count.
pub fn find_matching_close(source: &str, start: usize, tag_name: &str) -> Option<usize> {
    let bounds = find_tag_end(source, start)?;
    if bounds.self_closing {
        return None;
    }

    let open_pattern = format!("<{}", tag_name);
    let close_pattern = format!("</{}>", tag_name);
    let mut depth = 1usize;
    let mut cursor = bounds.end;

    loop {
        let next_close = cursor + source[cursor..].find(&close_pattern)?;
        let next_open = source[cursor..].find(&open_pattern).map(|i| cursor + i);

        match next_open {
            Some(open) if open < next_close => {
                if !is_genuine_open(source, open, tag_name) {
                    cursor = open + open_pattern.len();
                    continue;
                }
                match find_tag_end(source, open + 1) {
                    Some(nested) => {
                        if !nested.self_closing {
                            depth += 1;
                        }
                        cursor = nested.end;
                    }
                    None => cursor = open + open_pattern.len(),
                }
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some(next_close);
                }
                cursor = next_close + close_pattern.len();
            }
        }
    }
}

/// Every opening `<tag_name` in the document, in source order
pub fn find_occurrences(source: &str, tag_name: &str) -> Vec<TagOccurrence> {
    find_occurrences_where(source, tag_name, |_| true)
}

/// Every opening `<tag_name` whose occurrence satisfies `predicate`, in source order
pub fn find_occurrences_where<F>(source: &str, tag_name: &str, predicate: F) -> Vec<TagOccurrence>
where
    F: Fn(&TagOccurrence) -> bool,
{
    let open_pattern = format!("<{}", tag_name);
    let mut found = Vec::new();
    let mut cursor = 0;

    while let Some(rel) = source[cursor..].find(&open_pattern) {
        let open = cursor + rel;
        let name_start = open + 1;
        if !is_genuine_open(source, open, tag_name) {
            cursor = open + open_pattern.len();
            continue;
        }
        match extract_attributes(source, name_start) {
            Some(occurrence) => {
                cursor = occurrence.tag_end;
                if predicate(&occurrence) {
                    found.push(occurrence);
                }
            }
            None => cursor = open + open_pattern.len(),
        }
    }

    found
}

/// Skip a `{ ... }` expression starting at `pos` (which must point at `{`),
/// honouring quotes. Returns the offset just past the closing brace, or the
/// end of input when unbalanced.
pub(crate) fn skip_braced(bytes: &[u8], pos: usize) -> usize {
    let mut i = pos;
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    while i < bytes.len() {
        let ch = bytes[i];
        let escaped = i > 0 && bytes[i - 1] == b'\\';
        match quote {
            Some(q) => {
                if ch == q && !escaped {
                    quote = None;
                }
            }
            None => match ch {
                b'\'' | b'"' | b'`' => quote = Some(ch),
                b'{' => depth += 1,
                b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return i + 1;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    bytes.len()
}
