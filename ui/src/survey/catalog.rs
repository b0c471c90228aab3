//! Image catalog: list a repository tree and keep the image files under the
//! configured folder.

use dioxus::logger::tracing::{debug, info};
use serde::{Deserialize, Serialize};

use crate::core::config::SurveyConfig;

use super::error::CatalogError;

const TREE_API_HOST: &str = "https://api.github.com";
const RAW_HOST: &str = "https://raw.githubusercontent.com";
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

/// Recursive tree listing as returned by the git trees API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TreeListing {
    #[serde(default)]
    pub tree: Vec<TreeEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreeEntry {
    pub path: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl TreeEntry {
    fn is_file(&self) -> bool {
        self.kind == "blob"
    }
}

/// A resolvable image URL plus the identifier reported with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub id: String,
}

impl ImageRef {
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        let id = image_id(&url).to_string();
        Self { url, id }
    }
}

/// Final path segment of an image URL.
pub fn image_id(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

pub fn tree_url(config: &SurveyConfig) -> String {
    format!(
        "{TREE_API_HOST}/repos/{}/{}/git/trees/{}?recursive=1",
        config.owner, config.repo, config.branch
    )
}

pub fn raw_url(config: &SurveyConfig, path: &str) -> String {
    format!(
        "{RAW_HOST}/{}/{}/{}/{path}",
        config.owner, config.repo, config.branch
    )
}

fn has_image_extension(path: &str) -> bool {
    path.rsplit_once('.')
        .map(|(_, ext)| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// Keep image files under `config.root_path`, in listing order.
pub fn filter_images(listing: &TreeListing, config: &SurveyConfig) -> Vec<ImageRef> {
    let prefix = format!("{}/", config.root_path);
    listing
        .tree
        .iter()
        .filter(|entry| {
            entry.is_file() && entry.path.starts_with(&prefix) && has_image_extension(&entry.path)
        })
        .map(|entry| ImageRef::from_url(raw_url(config, &entry.path)))
        .collect()
}

/// Where tree listings come from. The browser and desktop builds use
/// [`GitHubCatalog`]; tests supply canned listings.
#[allow(async_fn_in_trait)]
pub trait CatalogSource {
    async fn fetch_tree(&self, config: &SurveyConfig) -> Result<TreeListing, CatalogError>;
}

/// Load the full image catalog for `config`.
pub async fn load_catalog<S: CatalogSource>(
    source: &S,
    config: &SurveyConfig,
) -> Result<Vec<ImageRef>, CatalogError> {
    let listing = source.fetch_tree(config).await?;
    let images = filter_images(&listing, config);
    info!(
        entries = listing.tree.len(),
        images = images.len(),
        "catalog loaded"
    );
    if images.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(images)
}

#[derive(Clone)]
pub struct GitHubCatalog {
    client: reqwest::Client,
}

impl GitHubCatalog {
    pub fn new() -> Self {
        Self {
            client: build_client(),
        }
    }
}

impl Default for GitHubCatalog {
    fn default() -> Self {
        Self::new()
    }
}

// The trees API rejects native requests without a user agent; browsers send their own.
#[cfg(not(target_arch = "wasm32"))]
fn build_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(concat!("pixpoll/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn build_client() -> reqwest::Client {
    reqwest::Client::new()
}

impl CatalogSource for GitHubCatalog {
    async fn fetch_tree(&self, config: &SurveyConfig) -> Result<TreeListing, CatalogError> {
        let url = tree_url(config);
        debug!(%url, "requesting repository tree");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|err| CatalogError::Network(err.to_string()))?;
        Ok(serde_json::from_str(&body)?)
    }
}
