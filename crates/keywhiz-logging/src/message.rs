//! Positional message templates.
//!
//! A placeholder is `{n}` where `n` is a zero-based decimal index into the
//! argument list. Placeholders that are malformed or point past the end of the
//! arguments are copied through verbatim, so rendering never fails.

/// Substitute `{n}` placeholders in `template` with `args[n]`.
pub fn render(template: &str, args: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match placeholder(after, args) {
            Some((arg, consumed)) => {
                out.push_str(arg);
                rest = &after[consumed..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Render the template only when arguments are present.
pub fn render_opt(template: &str, args: Option<&[String]>) -> String {
    match args {
        Some(args) => render(template, args),
        None => template.to_string(),
    }
}

/// Resolve the placeholder starting right after a `{`. Returns the argument and
/// the number of bytes consumed, including the closing `}`.
fn placeholder<'a>(after_brace: &str, args: &'a [String]) -> Option<(&'a str, usize)> {
    let close = after_brace.find('}')?;
    let digits = &after_brace[..close];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index: usize = digits.parse().ok()?;
    args.get(index).map(|arg| (arg.as_str(), close + 1))
}
