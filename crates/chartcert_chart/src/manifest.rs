/// Image references declared in rendered manifest text, in order of appearance.
///
/// Only single-line `image:` entries are recognised; block scalars and
/// templated values are not.
pub fn extract_images(rendered: &str) -> Vec<String> {
    rendered.lines().filter_map(image_value).collect()
}

fn image_value(line: &str) -> Option<String> {
    let value = line.trim().strip_prefix("image")?.trim_start().strip_prefix(':')?.trim();
    let value = match value.chars().next() {
        Some(quote @ ('"' | '\'')) => value[1..].split(quote).next().unwrap_or_default(),
        _ => value.split(" #").next().unwrap_or_default(),
    };
    let value = value.trim();
    // A block scalar indicator means the value continues on following lines.
    let multiline = value.starts_with('|') || value.starts_with('>');
    (!value.is_empty() && !multiline).then(|| value.to_string())
}
