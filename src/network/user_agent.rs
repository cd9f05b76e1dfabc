//! Request header values

/// User agent identifying this application to the catalog service
pub fn default_user_agent() -> String {
    format!("book-finder/{}", crate::VERSION)
}

/// Standard accept header for JSON requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_user_agent() {
        let ua = default_user_agent();
        assert!(ua.starts_with("book-finder/"));
        assert!(ua.ends_with(crate::VERSION));
    }
}
