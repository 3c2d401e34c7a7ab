use reqwest::StatusCode;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{HarvestError, Result};
use crate::surface::{Element, Role, Surface};
use crate::utils::sanitize_file_stem;

/// Where image bytes come from
#[allow(async_fn_in_trait)]
pub trait ImageSource {
    /// Downloads the resource, failing with `Fetch` on transport errors and
    /// on any status other than 200
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

/// Downloads images over HTTP(S)
#[derive(Debug, Clone)]
pub struct HttpImageSource {
    client: reqwest::Client,
}

impl HttpImageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HarvestError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| HarvestError::fetch(url.as_str(), e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(HarvestError::fetch(url.as_str(), format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| HarvestError::fetch(url.as_str(), e))?;
        Ok(bytes.to_vec())
    }
}

/// Persists images as `<dataset-root>/imagenes/<id>.jpg`
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dataset_root: impl AsRef<Path>) -> Self {
        Self {
            dir: dataset_root.as_ref().join("imagenes"),
        }
    }

    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.jpg", sanitize_file_stem(id)))
    }

    /// Writes the bytes for `id`, replacing any earlier file
    pub async fn save(&self, id: &str, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.path_for(id);
        tokio::fs::write(&path, bytes).await?;
        Ok(path)
    }
}

/// Downloads and stores the hero image of a detail page
pub struct ImageCapture<F> {
    source: F,
    store: ImageStore,
}

impl<F: ImageSource> ImageCapture<F> {
    pub fn new(source: F, store: ImageStore) -> Self {
        Self { source, store }
    }

    /// Returns the captured image's source URL, or nothing when the page has
    /// no usable hero image or it could not be fetched and stored
    pub async fn capture<S: Surface>(&self, surface: &S, id: &str) -> Vec<Url> {
        let Some(src) = hero_image_source(surface, id).await else {
            return Vec::new();
        };

        let bytes = match self.source.fetch(&src).await {
            Ok(bytes) => bytes,
            Err(e) => {
                ::log::error!(listing_id = id; "Error downloading image: {}", e);
                return Vec::new();
            }
        };

        match self.store.save(id, &bytes).await {
            Ok(path) => {
                ::log::debug!("Saved image for {} to {}", id, path.display());
                vec![src]
            }
            Err(e) => {
                ::log::error!(listing_id = id; "Error saving image: {}", e);
                Vec::new()
            }
        }
    }
}

/// The hero image URL, if present and HTTP(S)
async fn hero_image_source<S: Surface>(surface: &S, id: &str) -> Option<Url> {
    let image = match surface.find_one(Role::HeroImage).await {
        Ok(Some(image)) => image,
        Ok(None) => {
            ::log::debug!("No hero image for {}", id);
            return None;
        }
        Err(e) => {
            ::log::warn!(listing_id = id; "Could not look up hero image: {}", e);
            return None;
        }
    };

    let src = match image.attr("src").await {
        Ok(src) => src?,
        Err(e) => {
            ::log::warn!(listing_id = id; "Could not read hero image source: {}", e);
            return None;
        }
    };

    match Url::parse(src.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Some(url),
        _ => {
            ::log::debug!("Ignoring non-HTTP image source for {}: {}", id, src);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SnapshotSurface;
    use std::sync::Mutex;

    /// Serves fixed bytes and records every request
    struct FakeSource {
        fail: bool,
        requests: Mutex<Vec<String>>,
    }

    impl FakeSource {
        fn new(fail: bool) -> Self {
            Self {
                fail,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl ImageSource for &FakeSource {
        async fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
            self.requests.lock().unwrap().push(url.to_string());
            if self.fail {
                Err(HarvestError::fetch(url.as_str(), "HTTP 404 Not Found"))
            } else {
                Ok(b"\xff\xd8\xff".to_vec())
            }
        }
    }

    const DETAIL: &str = "https://example.test/rooms/77";

    async fn detail_page(img: &str) -> SnapshotSurface {
        let html = format!("<html><body><h1>Casa</h1>{img}</body></html>");
        let surface = SnapshotSurface::new().with_page(DETAIL, html);
        surface.load(&Url::parse(DETAIL).unwrap()).await.unwrap();
        surface
    }

    #[tokio::test]
    async fn test_capture_saves_under_id() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new(false);
        let capture = ImageCapture::new(&source, ImageStore::new(dir.path()));
        let surface =
            detail_page(r#"<img elementtiming="LCP-target" src="https://img.example.test/a.jpg">"#)
                .await;

        let refs = capture.capture(&surface, "77").await;
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].as_str(), "https://img.example.test/a.jpg");

        let saved = dir.path().join("imagenes").join("77.jpg");
        assert_eq!(std::fs::read(saved).unwrap(), b"\xff\xd8\xff");
    }

    #[tokio::test]
    async fn test_non_http_source_is_not_fetched() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new(false);
        let capture = ImageCapture::new(&source, ImageStore::new(dir.path()));

        let surface =
            detail_page(r#"<img elementtiming="LCP-target" src="data:image/png;base64,AAAA">"#)
                .await;
        assert!(capture.capture(&surface, "77").await.is_empty());

        let surface = detail_page(r#"<img elementtiming="LCP-target">"#).await;
        assert!(capture.capture(&surface, "77").await.is_empty());

        let surface = detail_page("").await;
        assert!(capture.capture(&surface, "77").await.is_empty());

        assert!(source.requests.lock().unwrap().is_empty());
        assert!(!dir.path().join("imagenes").exists());
    }

    #[tokio::test]
    async fn test_fetch_failure_yields_no_refs() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::new(true);
        let capture = ImageCapture::new(&source, ImageStore::new(dir.path()));
        let surface =
            detail_page(r#"<img elementtiming="LCP-target" src="https://img.example.test/a.jpg">"#)
                .await;

        assert!(capture.capture(&surface, "77").await.is_empty());
        assert_eq!(source.requests.lock().unwrap().len(), 1);
        assert!(!dir.path().join("imagenes").join("77.jpg").exists());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = ImageStore::new(dir.path());
        store.save("5", b"old").await.unwrap();
        let path = store.save("5", b"new").await.unwrap();
        assert_eq!(std::fs::read(path).unwrap(), b"new");
    }
}
