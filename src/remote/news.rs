//! News endpoints

use std::sync::Arc;

use async_trait::async_trait;

use crate::api::{ApiError, ApiRequest, Gateway};
use crate::models::{CreateNewsInput, NewsItem, UpdateNewsInput, UploadedImage};

/// News CRUD, author listing, and image upload.
#[async_trait]
pub trait NewsApi: Send + Sync {
    /// List the feed, optionally server-side filtered by a search query.
    async fn list(&self, query: Option<&str>) -> Result<Vec<NewsItem>, ApiError>;

    /// Fetch one item by id.
    async fn get(&self, id: &str) -> Result<NewsItem, ApiError>;

    /// Submit a new item.
    async fn create(&self, input: &CreateNewsInput) -> Result<NewsItem, ApiError>;

    /// Update an existing item.
    async fn update(&self, id: &str, input: &UpdateNewsInput) -> Result<NewsItem, ApiError>;

    /// Delete an item.
    async fn delete(&self, id: &str) -> Result<(), ApiError>;

    /// The authenticated author's own items.
    async fn my_news(&self) -> Result<Vec<NewsItem>, ApiError>;

    /// Upload an image, returning its public URL.
    async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadedImage, ApiError>;
}

/// HTTP implementation of [`NewsApi`].
pub struct HttpNewsApi {
    gateway: Arc<Gateway>,
}

impl HttpNewsApi {
    pub fn new(gateway: Arc<Gateway>) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl NewsApi for HttpNewsApi {
    async fn list(&self, query: Option<&str>) -> Result<Vec<NewsItem>, ApiError> {
        let path = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(q) => format!("/api/news?q={}", urlencoding::encode(q)),
            None => "/api/news".to_string(),
        };
        // The feed is public; browsing must work logged out.
        self.gateway.send_json(ApiRequest::get(path).no_auth()).await
    }

    async fn get(&self, id: &str) -> Result<NewsItem, ApiError> {
        self.gateway
            .send_json(ApiRequest::get(format!("/api/news/{id}")).no_auth())
            .await
    }

    async fn create(&self, input: &CreateNewsInput) -> Result<NewsItem, ApiError> {
        let body = Gateway::to_body(input)?;
        self.gateway.send_json(ApiRequest::post("/api/news").json(body)).await
    }

    async fn update(&self, id: &str, input: &UpdateNewsInput) -> Result<NewsItem, ApiError> {
        let body = Gateway::to_body(input)?;
        self.gateway
            .send_json(ApiRequest::put(format!("/api/news/{id}")).json(body))
            .await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.gateway.send_unit(ApiRequest::delete(format!("/api/news/{id}"))).await
    }

    async fn my_news(&self) -> Result<Vec<NewsItem>, ApiError> {
        self.gateway.send_json(ApiRequest::get("/api/news/my-news")).await
    }

    async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> Result<UploadedImage, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("image", part);
        self.gateway
            .send_json(ApiRequest::post("/api/upload/image").multipart(form))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::session::credential::MemoryCredentialStore;
    use axum::extract::{Multipart, Query, RawQuery};
    use axum::routing::{get, post};
    use axum::Router;

    async fn spawn_backend(app: Router) -> Arc<Gateway> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        let config = ApiConfig { base_url: format!("http://{}", addr), timeout_seconds: 5 };
        Arc::new(Gateway::new(&config, Arc::new(MemoryCredentialStore::new())).unwrap())
    }

    fn sample_item(id: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "title": "Item",
            "publisher": "p",
            "releaseDate": "2025-08-01"
        })
    }

    #[tokio::test]
    async fn test_list_encodes_query() {
        let app = Router::new().route(
            "/api/news",
            get(|RawQuery(raw): RawQuery| async move {
                assert_eq!(raw.as_deref(), Some("q=rust%20news"));
                axum::Json(serde_json::json!([]))
            }),
        );
        let gateway = spawn_backend(app).await;
        let api = HttpNewsApi::new(gateway);
        let items = api.list(Some("  rust news  ")).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_list_omits_empty_query() {
        #[derive(serde::Deserialize)]
        struct Params {
            q: Option<String>,
        }
        let app = Router::new().route(
            "/api/news",
            get(|Query(params): Query<Params>| async move {
                assert!(params.q.is_none());
                axum::Json(vec![sample_item("1")])
            }),
        );
        let gateway = spawn_backend(app).await;
        let api = HttpNewsApi::new(gateway);
        let items = api.list(Some("   ")).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_upload_image_sends_multipart_part() {
        let app = Router::new().route(
            "/api/upload/image",
            post(|mut multipart: Multipart| async move {
                let field = multipart.next_field().await.unwrap().unwrap();
                assert_eq!(field.name(), Some("image"));
                assert_eq!(field.file_name(), Some("photo.png"));
                let data = field.bytes().await.unwrap();
                assert_eq!(&data[..], b"png-bytes");
                axum::Json(serde_json::json!({ "url": "/uploads/photo.png" }))
            }),
        );
        let gateway = spawn_backend(app).await;
        let api = HttpNewsApi::new(gateway);
        let uploaded = api.upload_image("photo.png", b"png-bytes".to_vec()).await.unwrap();
        assert_eq!(uploaded.url, "/uploads/photo.png");
    }
}
