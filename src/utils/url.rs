//! URL helpers

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    format!("{base}/{path}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join_url("http://a/v1beta/", "/models/x"), "http://a/v1beta/models/x");
        assert_eq!(join_url("http://a", "models"), "http://a/models");
        assert_eq!(join_url("http://a/", ""), "http://a");
    }
}
