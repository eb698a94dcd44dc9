/// Quote `value` for a POSIX shell, leaving plain words untouched
///
/// Names, IDs and paths made of safe characters are embedded as-is so rendered commands read
/// exactly like hand-written ones. Anything else is single quoted.
pub fn sh_quote(value: &str) -> String {
    if !value.is_empty() && value.chars().all(is_safe) {
        return value.to_string();
    }
    let mut out = String::from("'");
    out.push_str(&value.replace('\'', r"'\''"));
    out.push('\'');
    out
}

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | ':' | '@' | '=' | ',' | '+' | '%')
}
