//! Domain errors

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, binding or publishing course content
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("No lecture note found for path: {slug}")]
    DocumentNotFound { slug: String },

    #[error("Path {slug} is claimed by both {first:?} and {second:?}")]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Note {note:?} uses the path {slug}, which belongs to a course page")]
    RouteConflict { slug: String, note: PathBuf },

    #[error("Note {note:?} uses the path {slug}, which leaves the public directory")]
    UnsafeSlug { slug: String, note: PathBuf },

    #[error("Invalid front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("Invalid data file {path:?}: {source}")]
    DataFile {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Deploy is not configured: set `deploy.repo` in _config.yml")]
    DeployNotConfigured,

    #[error("Nothing to deploy: {0:?} does not exist, run `generate` first")]
    NothingToDeploy(PathBuf),

    #[error("Deploy step `{command}` failed with {status}")]
    Deploy { command: String, status: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
