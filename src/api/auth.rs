use crate::error::AppError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};

/// 网关在校验令牌后写入的用户ID请求头
pub const USER_HEADER: &str = "ch-user";

/// 当前请求的所有者ID (取自 CH-USER 请求头, 本服务不再校验其真实性)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(USER_HEADER)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        value
            .to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(OwnerId)
            .ok_or_else(|| AppError::Unauthorized("Invalid user identification".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<OwnerId, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = header {
            builder = builder.header("CH-USER", value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        OwnerId::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_owner_from_header() {
        assert_eq!(extract(Some("42")).await.unwrap(), OwnerId(42));
    }

    #[tokio::test]
    async fn test_missing_or_invalid_header() {
        assert!(matches!(extract(None).await, Err(AppError::Unauthorized(_))));
        assert!(matches!(
            extract(Some("abc")).await,
            Err(AppError::Unauthorized(_))
        ));
    }
}
