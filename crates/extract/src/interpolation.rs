//! Removal of `${...}` placeholders from template literal bodies.

/// Replaces every `${...}` placeholder in a template literal body with a single
/// space.
///
/// Braces inside the placeholder are balanced, and string or template literals
/// nested in the placeholder expression are skipped so a `}` inside them does
/// not end the placeholder early. A `$` escaped with a backslash is left alone.
/// An unterminated placeholder swallows the rest of the text.
#[must_use]
pub fn strip_interpolations(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                out.push(c);
                if let Some(escaped) = chars.next() {
                    out.push(escaped);
                }
            }
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                skip_placeholder(&mut chars);
                out.push(' ');
            }
            _ => out.push(c),
        }
    }

    out
}

/// Consumes characters up to and including the `}` that closes a placeholder
/// whose `${` has already been consumed.
fn skip_placeholder(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    let mut depth = 1usize;

    while let Some(c) = chars.next() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
            '\'' | '"' | '`' => skip_quoted(chars, c),
            _ => {}
        }
    }
}

fn skip_quoted(chars: &mut std::iter::Peekable<std::str::Chars<'_>>, quote: char) {
    while let Some(c) = chars.next() {
        if c == '\\' {
            chars.next();
        } else if c == quote {
            return;
        }
    }
}
