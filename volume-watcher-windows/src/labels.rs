//! Turning executable paths into process labels.

/// File name of `image_path` without its extension.
///
/// Accepts both `\` and `/` separators so Windows paths resolve the same
/// on every host.
pub fn label_from_image_path(image_path: &str) -> Option<String> {
    let file_name = image_path
        .rsplit(['\\', '/'])
        .next()
        .unwrap_or(image_path)
        .trim();

    let stem = match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => file_name,
    };

    (!stem.is_empty()).then(|| stem.to_string())
}
