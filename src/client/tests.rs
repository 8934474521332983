//! Tests for client module

#[cfg(test)]
mod tests {
    use crate::client::{
        AnalysisRequest, AnalysisResult, Classifier, HealthStatus, HttpClassifier,
        MockClassifier, MockReply,
    };
    use crate::config::ClassifierConfig;
    use crate::error::ErrorKind;
    use axum::{
        extract::State,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    type Seen = Arc<Mutex<Vec<Value>>>;

    async fn spawn_server(router: Router) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String) -> HttpClassifier {
        let config = ClassifierConfig {
            base_url,
            timeout_secs: 1,
            ..ClassifierConfig::default()
        };
        HttpClassifier::new(&config).unwrap()
    }

    fn request(text: &str) -> AnalysisRequest {
        AnalysisRequest::from_input(text).unwrap()
    }

    #[test]
    fn test_request_trims_input() {
        let req = AnalysisRequest::from_input("  I love this!\n").unwrap();
        assert_eq!(req.text, "I love this!");
    }

    #[test]
    fn test_request_rejects_blank_input() {
        assert!(AnalysisRequest::from_input("").is_none());
        assert!(AnalysisRequest::from_input(" \t\n ").is_none());
    }

    #[test]
    fn test_request_serialization() {
        let json = serde_json::to_string(&request("great")).unwrap();
        assert_eq!(json, r#"{"text":"great"}"#);
    }

    #[test]
    fn test_result_deserialization_without_processed_text() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"sentiment":"Positive","confidence":95}"#).unwrap();
        assert_eq!(result, AnalysisResult::new("Positive", 95.0));
    }

    #[test]
    fn test_health_status() {
        let healthy: HealthStatus =
            serde_json::from_str(r#"{"status":"healthy","model_loaded":true}"#).unwrap();
        assert!(healthy.is_healthy());

        let not_loaded: HealthStatus = serde_json::from_str(r#"{"status":"healthy"}"#).unwrap();
        assert!(!not_loaded.is_healthy());
    }

    #[tokio::test]
    async fn test_http_classify_success() {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route(
                "/predict",
                post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    seen.lock().unwrap().push(body);
                    Json(json!({
                        "sentiment": "Positive",
                        "confidence": 95,
                        "processed_text": "love"
                    }))
                }),
            )
            .with_state(seen.clone());
        let client = client_for(spawn_server(router).await);

        let result = client.classify(&request("I love this!")).await.unwrap();

        assert_eq!(result.sentiment, "Positive");
        assert_eq!(result.confidence, 95.0);
        assert_eq!(result.processed_text.as_deref(), Some("love"));
        assert_eq!(*seen.lock().unwrap(), vec![json!({"text": "I love this!"})]);
    }

    #[tokio::test]
    async fn test_http_classify_application_error() {
        let router = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::BAD_REQUEST, Json(json!({"error": "bad text"}))) }),
        );
        let client = client_for(spawn_server(router).await);

        let err = client.classify(&request("???")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Application);
        assert_eq!(err.user_message(), "bad text");
    }

    #[tokio::test]
    async fn test_http_classify_error_without_message() {
        let router = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))) }),
        );
        let client = client_for(spawn_server(router).await);

        let err = client.classify(&request("text")).await.unwrap_err();
        assert_eq!(err.user_message(), "Analysis failed");
    }

    #[tokio::test]
    async fn test_http_classify_non_json_body() {
        let router = Router::new().route(
            "/predict",
            post(|| async { (StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>") }),
        );
        let client = client_for(spawn_server(router).await);

        let err = client.classify(&request("text")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.user_message().is_empty());
    }

    #[tokio::test]
    async fn test_http_classify_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let client = client_for(format!("http://{}", addr));

        let err = client.classify(&request("text")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        let message = err.user_message();
        assert!(message.starts_with(&err.to_string()));
        assert!(message.len() > err.to_string().len());
        assert!(message.to_lowercase().contains("connect"));
    }

    #[tokio::test]
    async fn test_http_classify_timeout() {
        let router = Router::new().route(
            "/predict",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_secs(3)).await;
                Json(json!({"sentiment": "Positive", "confidence": 90}))
            }),
        );
        let client = client_for(spawn_server(router).await);

        let err = client.classify(&request("slow")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(err.user_message().to_lowercase().contains("timed out"));
    }

    #[tokio::test]
    async fn test_http_health() {
        let router = Router::new().route(
            "/health",
            get(|| async { Json(json!({"status": "healthy", "model_loaded": true})) }),
        );
        let client = client_for(spawn_server(router).await);

        let health = client.health().await.unwrap();
        assert!(health.is_healthy());
    }

    #[tokio::test]
    async fn test_http_health_failure_status() {
        let router = Router::new().route(
            "/health",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"error": "loading"}))) }),
        );
        let client = client_for(spawn_server(router).await);

        let err = client.health().await.unwrap_err();
        assert_eq!(err.user_message(), "loading");
    }

    #[test]
    fn test_http_client_rejects_bad_config() {
        let config = ClassifierConfig {
            base_url: String::new(),
            ..ClassifierConfig::default()
        };
        assert!(HttpClassifier::new(&config).is_err());
    }

    #[test]
    fn test_http_client_predict_url() {
        let client = client_for("http://localhost:5000/".to_string());
        assert_eq!(client.predict_url(), "http://localhost:5000/predict");
    }

    #[tokio::test]
    async fn test_mock_replies_in_order_then_fallback() {
        let mock = MockClassifier::new()
            .with_reply(MockReply::success("Positive", 87.0))
            .with_reply(MockReply::raw(400, r#"{"error":"bad text"}"#))
            .with_fallback(MockReply::transport("connection refused"));

        assert_eq!(
            mock.classify(&request("a")).await.unwrap(),
            AnalysisResult::new("Positive", 87.0)
        );
        assert_eq!(mock.classify(&request("b")).await.unwrap_err().to_string(), "bad text");
        assert_eq!(
            mock.classify(&request("c")).await.unwrap_err().to_string(),
            "connection refused"
        );
        assert_eq!(
            mock.classify(&request("d")).await.unwrap_err().to_string(),
            "connection refused"
        );

        let texts: Vec<String> = mock.requests().into_iter().map(|r| r.text).collect();
        assert_eq!(texts, vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_mock_latency() {
        let mock = MockClassifier::new().with_latency(20);
        let started = std::time::Instant::now();
        mock.classify(&request("x")).await.unwrap();
        assert!(started.elapsed() >= std::time::Duration::from_millis(20));
    }

    #[tokio::test]
    async fn test_mock_health() {
        assert!(MockClassifier::new().health().await.unwrap().is_healthy());
        assert!(!MockClassifier::new().unhealthy().health().await.unwrap().is_healthy());
    }
}
