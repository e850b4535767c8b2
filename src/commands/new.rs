//! Create a new lecture note

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::helpers::normalize_slug;
use crate::Course;

/// Create a note in the notes directory and return its file path.
///
/// The note's route is `path` when given, otherwise the slugified title.
pub fn create_note(course: &Course, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let slug = match path {
        Some(p) => normalize_slug(p),
        None => normalize_slug(&slug::slugify(title)),
    };
    if slug == "/" {
        anyhow::bail!("Cannot derive a note path from title {:?}; pass --path", title);
    }

    let filename = format!("{}.md", slug.trim_start_matches('/').replace('/', "-"));
    let file_path = course.notes_dir.join(filename);

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::create_dir_all(&course.notes_dir)?;

    let content = format!(
        "---\ntitle: {}\npath: {}\ndate: {}\n---\n\n# {}\n",
        yaml_string(title),
        slug,
        now.format("%Y-%m-%d %H:%M:%S"),
        title
    );
    fs::write(&file_path, content)?;

    tracing::info!("Created note {} at {:?}", slug, file_path);

    Ok(file_path)
}

/// Quote a front-matter value when YAML would otherwise misread it
fn yaml_string(value: &str) -> String {
    let plain = !value.is_empty()
        && !value.contains(": ")
        && !value.contains(" #")
        && !value.starts_with(|c: char| "-?:,[]{}#&*!|>'\"%@`".contains(c))
        && value.trim() == value;
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', "''"))
    }
}
