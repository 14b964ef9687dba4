use axum::http::HeaderMap;

use crate::middleware::auth::AUTH_USER_ID_HEADER;
use crate::utils::error::{AppError, AppResult};

pub fn extract_user_id(headers: &HeaderMap) -> AppResult<String> {
    headers
        .get(AUTH_USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .ok_or_else(|| AppError::Auth("Missing authenticated user".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_user_id() {
        let mut headers = HeaderMap::new();
        assert!(extract_user_id(&headers).is_err());

        headers.insert(AUTH_USER_ID_HEADER, "user-1".parse().unwrap());
        assert_eq!(extract_user_id(&headers).unwrap(), "user-1");
    }
}
