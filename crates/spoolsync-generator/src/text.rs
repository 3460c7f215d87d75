//! Escaping for free text placed into generated output
//!
//! Filament and printer names are user-controlled. Anything that ends up
//! inside a template string literal is escaped; anything that ends up in a
//! YAML comment loses its control characters.

/// Quote text as a single-quoted Jinja string literal
pub fn jinja_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Text that is safe on a single comment line
pub fn comment_text(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Render a template that only prints a literal string
pub fn literal_template(value: &str) -> String {
    format!("{{{{ {} }}}}", jinja_string(value))
}
