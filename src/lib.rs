//! course-site: a static site generator for course websites
//!
//! A course site is a syllabus, a lecture schedule, assignments, staff bios
//! and a set of Markdown lecture notes, all sharing one navigation bar. Page
//! records live in YAML data files; notes are Markdown files with a `path`
//! in their front-matter.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod pages;
pub mod records;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use error::SiteError;

/// The main course site application
#[derive(Clone)]
pub struct Course {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Lecture notes directory
    pub notes_dir: PathBuf,
    /// Page data directory
    pub data_dir: PathBuf,
}

impl Course {
    /// Create a new Course instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a Course from an already loaded configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Self {
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let notes_dir = source_dir.join(&config.notes_dir);
        let data_dir = source_dir.join(&config.data_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            notes_dir,
            data_dir,
        }
    }

    /// Path of the site configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join("_config.yml")
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<generator::BuildReport> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }

    /// Publish the public directory
    pub fn deploy(&self) -> Result<()> {
        commands::deploy::run(self, false)
    }
}
