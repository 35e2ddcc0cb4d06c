/// A token as byte offsets into a normalized text buffer.
///
/// Spans are non-empty, non-overlapping, in ascending order, and never
/// cross a space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TokenSpan {
    pub start: u32,
    pub len: u32,
}

impl TokenSpan {
    /// The bytes of this token within its normalized buffer.
    pub fn bytes<'a>(&self, norm: &'a str) -> &'a [u8] {
        &norm.as_bytes()[self.start as usize..(self.start + self.len) as usize]
    }
}

/// Normalize raw text for shingling.
///
/// ASCII alphanumerics are lowercased; every other ASCII byte collapses runs
/// into a single space. Bytes >= 128 pass through verbatim, so identical
/// UTF-8 substrings hash identically without Unicode case tables. Trailing
/// spaces are stripped. Idempotent.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_space = true;

    for ch in text.chars() {
        if ch.is_ascii() {
            let c = ch.to_ascii_lowercase();
            if c.is_ascii_alphanumeric() {
                out.push(c);
                prev_space = false;
            } else {
                if !prev_space {
                    out.push(' ');
                }
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Split normalized text into token spans.
///
/// A token is a maximal run of non-space bytes. Empty input yields an empty
/// sequence.
pub fn tokenize_spans(norm: &str) -> Vec<TokenSpan> {
    let bytes = norm.as_bytes();
    let n = bytes.len();
    let mut spans = Vec::new();
    let mut i = 0usize;

    while i < n {
        while i < n && bytes[i] == b' ' {
            i += 1;
        }
        if i >= n {
            break;
        }
        let start = i;
        while i < n && bytes[i] != b' ' {
            i += 1;
        }
        spans.push(TokenSpan {
            start: start as u32,
            len: (i - start) as u32,
        });
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_ascii() {
        assert_eq!(normalize("Hello, World!"), "hello world");
        assert_eq!(normalize("A--B__C"), "a b c");
        assert_eq!(normalize("  leading and trailing  "), "leading and trailing");
    }

    #[test]
    fn test_normalize_preserves_non_ascii() {
        assert_eq!(normalize("naïve Café"), "naïve café");
        // Cyrillic passes through untouched, ASCII punctuation still folds.
        assert_eq!(normalize("привет, мир!"), "привет мир");
    }

    #[test]
    fn test_normalize_empty_and_punctuation_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("!!! ... ???"), "");
    }

    #[test]
    fn test_normalize_idempotent() {
        for s in ["Hello, World!", "naïve Café", "a  b\tc\nd", "", "...x..."] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn test_tokenize_spans_basic() {
        let norm = normalize("alpha beta gamma");
        let spans = tokenize_spans(&norm);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0], TokenSpan { start: 0, len: 5 });
        assert_eq!(spans[0].bytes(&norm), b"alpha");
        assert_eq!(spans[2].bytes(&norm), b"gamma");
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize_spans("").is_empty());
    }

    #[test]
    fn test_spans_reconstruct_normalized_text() {
        for raw in [
            "The quick brown fox, jumps over the lazy dog.",
            "tabs\tand\nnewlines",
            "числа 123 и слова",
        ] {
            let norm = normalize(raw);
            let spans = tokenize_spans(&norm);
            let joined = spans
                .iter()
                .map(|s| std::str::from_utf8(s.bytes(&norm)).unwrap())
                .collect::<Vec<_>>()
                .join(" ");
            assert_eq!(joined, norm);
        }
    }
}
