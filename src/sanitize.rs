//! Escaping of free text before it is echoed back to clients.

/// Makes user-supplied text safe to embed in an HTML document.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, input: &str) -> String;
}

/// Escapes tag delimiters so markup is rendered as text.
///
/// Quotes and ampersands are left alone, keeping URLs and prose readable.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlEscaper;

impl Sanitizer for HtmlEscaper {
    fn sanitize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        for c in input.chars() {
            match c {
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                _ => out.push(c),
            }
        }
        out
    }
}
