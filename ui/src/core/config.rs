//! Static survey configuration: where images come from, where results go.
//!
//! Defaults can be overridden at compile time with `PIXPOLL_*` environment
//! variables (the only option for the web build) and, on native targets, at
//! runtime with the same variable names.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_SIZE: usize = 23;

const DEFAULT_OWNER: &str = "littledoor-ai";
const DEFAULT_REPO: &str = "survey-project";
const DEFAULT_BRANCH: &str = "main";
const DEFAULT_ROOT: &str = "images";
const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/AKfycbwZneOnZe0ZgqQAZ1Ix19NbQbwHybU4WNbiAd02DGIcThiBaXb4rTRPvZwqcGr7b2RS/exec";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Folder inside the repository holding the images, without trailing slash.
    pub root_path: String,
    pub submission_endpoint: String,
    pub sample_size: usize,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.into(),
            repo: DEFAULT_REPO.into(),
            branch: DEFAULT_BRANCH.into(),
            root_path: DEFAULT_ROOT.into(),
            submission_endpoint: DEFAULT_ENDPOINT.into(),
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl SurveyConfig {
    /// Defaults overlaid with values baked in at build time.
    pub fn from_build_env() -> Self {
        let mut config = Self::default();
        config.apply(|key| {
            match key {
                "PIXPOLL_OWNER" => option_env!("PIXPOLL_OWNER"),
                "PIXPOLL_REPO" => option_env!("PIXPOLL_REPO"),
                "PIXPOLL_BRANCH" => option_env!("PIXPOLL_BRANCH"),
                "PIXPOLL_ROOT" => option_env!("PIXPOLL_ROOT"),
                "PIXPOLL_ENDPOINT" => option_env!("PIXPOLL_ENDPOINT"),
                "PIXPOLL_SAMPLE_SIZE" => option_env!("PIXPOLL_SAMPLE_SIZE"),
                _ => None,
            }
            .map(str::to_string)
        });
        config
    }

    /// Build-time values further overridden by the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        let mut config = Self::from_build_env();
        config.apply(|key| std::env::var(key).ok());
        config
    }

    #[cfg(target_arch = "wasm32")]
    pub fn from_env() -> Self {
        Self::from_build_env()
    }

    fn apply(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(owner) = non_empty("PIXPOLL_OWNER") {
            self.owner = owner;
        }
        if let Some(repo) = non_empty("PIXPOLL_REPO") {
            self.repo = repo;
        }
        if let Some(branch) = non_empty("PIXPOLL_BRANCH") {
            self.branch = branch;
        }
        if let Some(root) = non_empty("PIXPOLL_ROOT") {
            self.root_path = root.trim_end_matches('/').to_string();
        }
        if let Some(endpoint) = non_empty("PIXPOLL_ENDPOINT") {
            self.submission_endpoint = endpoint;
        }
        match non_empty("PIXPOLL_SAMPLE_SIZE").map(|raw| raw.trim().parse::<usize>()) {
            Some(Ok(size)) if size > 0 => self.sample_size = size,
            Some(_) => {
                dioxus::logger::tracing::warn!("ignoring invalid PIXPOLL_SAMPLE_SIZE");
            }
            None => {}
        }
    }
}
