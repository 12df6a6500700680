//! Quote-aware brace matching.
//!
//! Finds the extent of a code block opened somewhere after a given offset.
//! Braces inside single- or double-quoted string literals are ignored;
//! comments, regex literals, and template strings are not understood, so
//! braces inside those can still mismatch. That is an accepted limitation
//! of the surface-syntax approach.

/// Scan `text` from byte offset `start` and return the byte offset just
/// past the `}` that brings the brace depth back to zero.
///
/// The depth counter starts at zero, increments on `{`, and decrements on
/// `}`; a quote character (`'` or `"`) not preceded by a backslash toggles
/// string-literal mode, during which braces are inert. If no closing brace
/// balances the block before end of text, the end of `text` is returned,
/// so the caller always gets a valid (possibly truncated) extent.
pub fn find_block_end(text: &str, start: usize) -> usize {
    let mut depth: i32 = 0;
    let mut in_string: Option<char> = None;
    let mut prev: Option<char> = None;

    for (i, ch) in text[start..].char_indices() {
        let escaped = prev == Some('\\');
        match in_string {
            Some(quote) => {
                if ch == quote && !escaped {
                    in_string = None;
                }
            }
            None => match ch {
                '\'' | '"' if !escaped => in_string = Some(ch),
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        return start + i + ch.len_utf8();
                    }
                }
                _ => {}
            },
        }
        prev = Some(ch);
    }

    text.len()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
