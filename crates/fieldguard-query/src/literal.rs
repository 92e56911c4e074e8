//! String literal masking.
//!
//! Text inside single-quoted literals must never be mistaken for clause keywords or
//! field references. Masking overwrites it while keeping every byte offset, so a match
//! found in the masked text can be cut from the original text at the same range.

/// Fill for masked literal bytes. Neither whitespace nor an identifier character, so
/// masked text can neither separate clauses nor read as a field.
const MASK: char = '#';

/// Overwrite the contents of single-quoted literals with [`MASK`].
///
/// Quotes are kept and backslash escapes are honoured, so `'it\'s = x'` is masked as a
/// whole. An unterminated literal masks the rest of the text. Each masked character
/// becomes one mask character per UTF-8 byte.
pub(crate) fn mask_string_literals(text: &str) -> String {
    mask(text).0
}

/// Like [`mask_string_literals`], but `None` if a literal is left unterminated.
pub(crate) fn mask_closed_literals(text: &str) -> Option<String> {
    let (masked, in_literal) = mask(text);
    (!in_literal).then_some(masked)
}

/// Returns the masked text and whether it ends inside a literal.
fn mask(text: &str) -> (String, bool) {
    let mut masked = String::with_capacity(text.len());
    let mut in_literal = false;
    let mut escaped = false;

    for c in text.chars() {
        if !in_literal {
            if c == '\'' {
                in_literal = true;
            }
            masked.push(c);
            continue;
        }

        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '\'' {
            in_literal = false;
            masked.push(c);
            continue;
        }
        masked.extend(std::iter::repeat_n(MASK, c.len_utf8()));
    }

    (masked, in_literal)
}
