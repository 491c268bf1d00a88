//! MIME type detection utilities

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file path or URL (extension-based)
pub fn guess_mime_from_path_or_url(path_or_url: &str) -> Option<String> {
    let without_query = path_or_url.split(['?', '#']).next().unwrap_or(path_or_url);
    mime_guess::from_path(without_query)
        .first_raw()
        .map(|s| s.to_string())
}

/// Combined guess: prefer bytes, then the path or URL, otherwise `fallback`.
pub fn guess_mime(bytes: Option<&[u8]>, path_or_url: Option<&str>, fallback: &str) -> String {
    if let Some(b) = bytes
        && let Some(m) = guess_mime_from_bytes(b)
    {
        return m;
    }
    if let Some(p) = path_or_url
        && let Some(m) = guess_mime_from_path_or_url(p)
    {
        return m;
    }
    fallback.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_win_over_extension() {
        let jpeg = [0xFF, 0xD8, 0xFF, 0xE0, 0, 0x10];
        assert_eq!(
            guess_mime(Some(&jpeg), Some("clip.mp4"), "application/octet-stream"),
            "image/jpeg"
        );
    }

    #[test]
    fn query_string_is_ignored() {
        assert_eq!(
            guess_mime(None, Some("https://x/files/a.mp4?alt=media"), "video/mp4"),
            "video/mp4"
        );
        assert_eq!(guess_mime(Some(&[0, 0]), None, "video/mp4"), "video/mp4");
    }
}
