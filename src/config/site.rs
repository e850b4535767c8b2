//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    /// Lecture notes, relative to `source_dir`
    pub notes_dir: String,
    /// Page data files, relative to `source_dir`
    pub data_dir: String,

    /// Stylesheet URLs linked from every page
    pub stylesheets: Vec<String>,

    // Lecture notes
    pub notes_credit: String,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Deployment
    #[serde(default)]
    pub deploy: DeployConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Course".to_string(),
            subtitle: String::new(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            notes_dir: "_notes".to_string(),
            data_dir: "_data".to_string(),

            stylesheets: vec![
                "https://cdn.jsdelivr.net/npm/bulma@0.9.4/css/bulma.min.css".to_string(),
            ],

            notes_credit: String::new(),
            highlight: HighlightConfig::default(),

            deploy: DeployConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Timezone used for build timestamps, if configured and known
    pub fn tz(&self) -> Option<chrono_tz::Tz> {
        if self.timezone.is_empty() {
            return None;
        }
        match self.timezone.parse::<chrono_tz::Tz>() {
            Ok(tz) => Some(tz),
            Err(_) => {
                tracing::warn!("Unknown timezone {:?}, using local time", self.timezone);
                None
            }
        }
    }
}

/// Syntax highlighting configuration for code blocks in notes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: "InspiredGitHub".to_string(),
            line_number: false,
        }
    }
}

/// Where `deploy` publishes the public directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub repo: String,
    pub branch: String,
    pub message: String,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            repo: String::new(),
            branch: "master".to_string(),
            message: "Site updated".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Course");
        assert_eq!(config.notes_dir, "_notes");
        assert_eq!(config.deploy.branch, "master");
        assert!(config.deploy.repo.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: "CIS 192: Python Programming"
subtitle: Spring 2020
root: /cis192/
deploy:
  repo: https://github.com/cis192/cis192.github.io.git
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "CIS 192: Python Programming");
        assert_eq!(config.subtitle, "Spring 2020");
        assert_eq!(config.root, "/cis192/");
        assert_eq!(
            config.deploy.repo,
            "https://github.com/cis192/cis192.github.io.git"
        );
        // Unset nested keys keep their defaults
        assert_eq!(config.deploy.branch, "master");
        assert_eq!(config.public_dir, "public");
    }

    #[test]
    fn test_timezone() {
        let mut config = SiteConfig::default();
        assert!(config.tz().is_none());
        config.timezone = "America/New_York".to_string();
        assert_eq!(config.tz(), Some(chrono_tz::America::New_York));
        config.timezone = "Mars/Olympus".to_string();
        assert!(config.tz().is_none());
    }
}
