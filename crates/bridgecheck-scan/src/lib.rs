//! Lexical primitives for scanning foreign-language source text.
//!
//! bridgecheck never parses TypeScript or Rust for real. Everything it
//! needs — command names, parameter lists, payload object literals — can
//! be pulled out with three operations over a flat text buffer:
//!
//! - **String skipping**: jump over a quoted span, honoring `\x` escapes.
//! - **Comment skipping**: jump over `//` and `/* */` spans.
//! - **Balanced-region extraction**: given an opening delimiter, find the
//!   matching closer by depth counting, with string and comment contents
//!   excluded so a brace inside `"{"` never corrupts the depth.
//!
//! All offsets are byte offsets into the original `&str`. Delimiters and
//! quotes are ASCII, so every slice boundary produced here falls on a
//! character boundary even when the surrounding text is multi-byte UTF-8.

/// Which bytes open a quoted string, per source language.
///
/// In script sources `'` and `` ` `` are string quotes; in Rust sources a
/// bare `'` is almost always a lifetime (`State<'_, T>`), and treating it
/// as a quote would swallow the rest of the parameter list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"`, `'`, and `` ` `` — TypeScript/JavaScript/Svelte regions.
    Script,
    /// `"` only — Rust signatures, where `'` marks a lifetime.
    Rust,
}

impl QuoteStyle {
    /// Returns true if `byte` opens a quoted string under this style.
    #[inline]
    pub fn is_quote(self, byte: u8) -> bool {
        match self {
            QuoteStyle::Script => matches!(byte, b'"' | b'\'' | b'`'),
            QuoteStyle::Rust => byte == b'"',
        }
    }
}

/// Skip a quoted string starting at `start` (which must index a quote byte).
///
/// Returns the offset just past the closing quote. A backslash consumes the
/// following byte unconditionally, so an escaped quote or newline never
/// terminates the string. An unterminated string runs to end of text —
/// best-effort recovery, never an error, since the input may be incomplete
/// or unparseable source rather than valid code.
pub fn skip_string(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let quote = bytes[start];
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i + 1,
            _ => i += 1,
        }
    }
    bytes.len()
}

/// Skip a `//` line comment starting at `start` (indexing the first slash).
///
/// Returns the offset of the terminating newline (not past it), or end of
/// text if the comment is the last line.
pub fn skip_line_comment(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = start + 2;
    while i < bytes.len() && bytes[i] != b'\n' {
        i += 1;
    }
    i
}

/// Skip a `/* */` block comment starting at `start` (indexing the slash).
///
/// Returns the offset just past the closing `*/`, or end of text if the
/// comment is unterminated.
pub fn skip_block_comment(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut i = start + 2;
    while i + 1 < bytes.len() {
        if bytes[i] == b'*' && bytes[i + 1] == b'/' {
            return i + 2;
        }
        i += 1;
    }
    bytes.len()
}

/// Extract the balanced region opened by `open` at or after `start`.
///
/// Leading whitespace is skipped. Returns `None` if the first
/// non-whitespace byte is not `open`, or if the text ends before the
/// depth returns to zero (an unterminated region means "no usable
/// literal here", not a hard error).
///
/// On success returns the region *inclusive of both delimiters* and the
/// offset just past the closing delimiter. Strings and comments inside
/// the region are skipped wholesale, so delimiter bytes within them do
/// not affect the depth count.
pub fn extract_balanced(
    text: &str,
    start: usize,
    open: u8,
    close: u8,
    quotes: QuoteStyle,
) -> Option<(&str, usize)> {
    let bytes = text.as_bytes();
    let mut i = start;
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if i >= bytes.len() || bytes[i] != open {
        return None;
    }

    let region_start = i;
    let mut depth = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        if b == open {
            depth += 1;
            i += 1;
        } else if b == close {
            depth = depth.saturating_sub(1);
            i += 1;
            if depth == 0 {
                return Some((&text[region_start..i], i));
            }
        } else if quotes.is_quote(b) {
            i = skip_string(text, i);
        } else if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'/' {
            i = skip_line_comment(text, i);
        } else if b == b'/' && i + 1 < bytes.len() && bytes[i + 1] == b'*' {
            i = skip_block_comment(text, i);
        } else {
            i += 1;
        }
    }
    None
}

/// Split `text` on `sep` at nesting depth zero.
///
/// Tracks `()`, `[]`, `{}`, and `<>` depth so a comma inside
/// `HashMap<String, u64>` or a tuple type never splits a parameter entry.
/// `>` saturates at zero rather than going negative, so `->` in a
/// function-pointer type cannot drive the angle count below the real
/// nesting level. Quoted strings and comments are skipped, so a
/// separator inside either never splits a piece. Pieces are trimmed;
/// empty pieces are dropped.
pub fn split_top_level(text: &str, sep: u8, quotes: QuoteStyle) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut piece_start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'(' | b'[' | b'{' | b'<' => {
                depth += 1;
                i += 1;
            }
            b')' | b']' | b'}' | b'>' => {
                depth = depth.saturating_sub(1);
                i += 1;
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                i = skip_line_comment(text, i);
            }
            b'/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i = skip_block_comment(text, i);
            }
            _ if quotes.is_quote(b) => i = skip_string(text, i),
            _ if b == sep && depth == 0 => {
                pieces.push(&text[piece_start..i]);
                i += 1;
                piece_start = i;
            }
            _ => i += 1,
        }
    }
    pieces.push(&text[piece_start..]);
    pieces.into_iter().map(str::trim).filter(|p| !p.is_empty()).collect()
}

/// 1-based line number of `offset` within `text`.
///
/// Counts newlines in `[0, offset)`; callers pass offsets into the
/// *original* file text, not into an embedded-script slice.
pub fn line_number(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset.min(text.len())]
        .iter()
        .filter(|&&b| b == b'\n')
        .count()
        + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(r#""hello" rest"#, 0, 7)]
    #[case(r#"'a\'b' rest"#, 0, 6)]
    #[case("`tpl ${x}` rest", 0, 10)]
    #[case(r#""unterminated"#, 0, 13)]
    fn skip_string_cases(#[case] text: &str, #[case] start: usize, #[case] expected: usize) {
        assert_eq!(skip_string(text, start), expected);
    }

    #[test]
    fn skip_string_escape_swallows_closing_quote() {
        // \" must not terminate the string
        let text = r#""a\"b" tail"#;
        assert_eq!(skip_string(text, 0), 6);
    }

    #[test]
    fn skip_line_comment_stops_at_newline() {
        let text = "// note\nnext";
        assert_eq!(skip_line_comment(text, 0), 7);
        assert_eq!(&text[7..8], "\n");
    }

    #[test]
    fn skip_block_comment_unterminated_runs_to_end() {
        let text = "/* never closed";
        assert_eq!(skip_block_comment(text, 0), text.len());
    }

    #[test]
    fn extract_balanced_simple_object() {
        let text = "  { a: 1 } tail";
        let (region, end) = extract_balanced(text, 0, b'{', b'}', QuoteStyle::Script)
            .expect("balanced object");
        assert_eq!(region, "{ a: 1 }");
        assert_eq!(&text[end..], " tail");
    }

    #[test]
    fn extract_balanced_nested() {
        let text = "{ a: { b: 2 }, c: [1, 2] }";
        let (region, _) = extract_balanced(text, 0, b'{', b'}', QuoteStyle::Script)
            .expect("balanced object");
        assert_eq!(region, text);
    }

    #[test]
    fn extract_balanced_brace_inside_string_ignored() {
        let text = r#"{ a: "}", b: '{' }"#;
        let (region, _) = extract_balanced(text, 0, b'{', b'}', QuoteStyle::Script)
            .expect("balanced object");
        assert_eq!(region, text);
    }

    #[test]
    fn extract_balanced_brace_inside_comment_ignored() {
        let text = "{ a: 1, // }\n b: 2 /* { */ }";
        let (region, _) = extract_balanced(text, 0, b'{', b'}', QuoteStyle::Script)
            .expect("balanced object");
        assert_eq!(region, text);
    }

    #[test]
    fn extract_balanced_rejects_non_literal() {
        // variable reference, not an object literal
        assert!(extract_balanced(" payload)", 0, b'{', b'}', QuoteStyle::Script).is_none());
    }

    #[test]
    fn extract_balanced_unterminated_is_none() {
        assert!(extract_balanced("{ a: 1", 0, b'{', b'}', QuoteStyle::Script).is_none());
    }

    #[test]
    fn extract_balanced_rust_lifetimes_are_not_strings() {
        let text = "(state: State<'_, AppState>, id: String) {";
        let (region, _) = extract_balanced(text, 0, b'(', b')', QuoteStyle::Rust)
            .expect("balanced params");
        assert_eq!(region, "(state: State<'_, AppState>, id: String)");
    }

    #[test]
    fn split_top_level_respects_generics() {
        let pieces = split_top_level(
            "id: String, map: HashMap<String, u64>, n: u32",
            b',',
            QuoteStyle::Rust,
        );
        assert_eq!(
            pieces,
            vec!["id: String", "map: HashMap<String, u64>", "n: u32"]
        );
    }

    #[test]
    fn split_top_level_respects_tuples_and_arrays() {
        let pieces = split_top_level("pair: (u8, u8), buf: [u8; 4]", b',', QuoteStyle::Rust);
        assert_eq!(pieces, vec!["pair: (u8, u8)", "buf: [u8; 4]"]);
    }

    #[test]
    fn split_top_level_drops_empty_pieces() {
        let pieces = split_top_level("a: u8, , b: u8,", b',', QuoteStyle::Rust);
        assert_eq!(pieces, vec!["a: u8", "b: u8"]);
    }

    #[test]
    fn split_top_level_comma_inside_comment_does_not_split() {
        let pieces = split_top_level("a: u8, /* x, y */ b: u8", b',', QuoteStyle::Rust);
        assert_eq!(pieces, vec!["a: u8", "/* x, y */ b: u8"]);

        let pieces = split_top_level("a: u8, // x, y\n b: u8", b',', QuoteStyle::Rust);
        assert_eq!(pieces, vec!["a: u8", "// x, y\n b: u8"]);
    }

    #[test]
    fn split_top_level_arrow_does_not_underflow() {
        let pieces = split_top_level("f: fn(u8) -> u8, g: u8", b',', QuoteStyle::Rust);
        assert_eq!(pieces, vec!["f: fn(u8) -> u8", "g: u8"]);
    }

    #[rstest]
    #[case("", 0, 1)]
    #[case("a\nb\nc", 0, 1)]
    #[case("a\nb\nc", 2, 2)]
    #[case("a\nb\nc", 4, 3)]
    fn line_number_cases(#[case] text: &str, #[case] offset: usize, #[case] expected: usize) {
        assert_eq!(line_number(text, offset), expected);
    }
}
