//! Tests for transport module against a mock HTTP server.

#[cfg(test)]
mod tests {
    use super::super::resources::Endpoint;
    use super::super::transport::*;
    use crate::error::SyncError;
    use std::time::Duration;

    fn endpoints() -> Vec<Endpoint> {
        vec![
            Endpoint::new("sectors", "/api/sectors"),
            Endpoint::new("brands", "/api/brands"),
        ]
    }

    #[tokio::test]
    async fn test_fetch_returns_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/sectors")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"name":"Agriculture"}]"#)
            .create_async()
            .await;

        let transport =
            HttpTransport::new(&server.url(), &endpoints(), DEFAULT_REQUEST_TIMEOUT).unwrap();
        let value = transport.fetch("sectors").await.unwrap();

        assert_eq!(value[0]["name"], "Agriculture");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_maps_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/brands")
            .with_status(503)
            .create_async()
            .await;

        let transport =
            HttpTransport::new(&server.url(), &endpoints(), DEFAULT_REQUEST_TIMEOUT).unwrap();
        let err = transport.fetch("brands").await.unwrap_err();

        match err {
            SyncError::Status { key, status } => {
                assert_eq!(key, "brands");
                assert_eq!(status, 503);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_rejects_invalid_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/sectors")
            .with_status(200)
            .with_body("<html>not json</html>")
            .create_async()
            .await;

        let transport =
            HttpTransport::new(&server.url(), &endpoints(), DEFAULT_REQUEST_TIMEOUT).unwrap();
        let err = transport.fetch("sectors").await.unwrap_err();
        assert!(matches!(err, SyncError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_fetch_unknown_key() {
        let transport = HttpTransport::new(
            "http://localhost:5000",
            &endpoints(),
            Duration::from_millis(100),
        )
        .unwrap();
        let err = transport.fetch("admin-stats").await.unwrap_err();
        assert!(matches!(err, SyncError::UnknownResource(k) if k == "admin-stats"));
    }

    #[test]
    fn test_base_url_prefix_is_kept() {
        let transport = HttpTransport::new(
            "https://portal.example.com/seedwave/",
            &endpoints(),
            DEFAULT_REQUEST_TIMEOUT,
        )
        .unwrap();
        assert_eq!(
            transport.url_for("brands").unwrap().as_str(),
            "https://portal.example.com/seedwave/api/brands"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpTransport::new("not a url", &endpoints(), DEFAULT_REQUEST_TIMEOUT);
        assert!(matches!(result, Err(SyncError::InvalidUrl(_))));
    }
}
