//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::content::loader::NoteLoader;
use crate::generator::{BuildReport, Generator};
use crate::pages::SiteData;
use crate::Course;

/// Generate the static site
pub fn run(course: &Course) -> Result<BuildReport> {
    let start = std::time::Instant::now();

    let loader = NoteLoader::new(course);
    let store = loader.load_notes()?;
    let data = SiteData::load(course)?;

    tracing::info!("Loaded {} lecture notes", store.len());

    let generator = Generator::new(course)?;
    let report = generator.generate(&store, &data, loader.renderer())?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {} pages, {} notes and {} assets in {:.2}s",
        report.pages,
        report.notes,
        report.assets,
        duration.as_secs_f64()
    );

    Ok(report)
}

/// Watch for file changes and regenerate
pub async fn watch(course: &Course) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    // Watch source directory
    watcher.watch(course.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    // Watch config file
    let config_path = course.config_path();
    if config_path.exists() {
        watcher.watch(config_path.as_ref(), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                // Only rebuild if more than 500ms since last rebuild
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = reload(course).and_then(|course| run(&course)) {
                        tracing::error!("Generation failed: {:#}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {}
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}

/// Pick up edits to `_config.yml` between rebuilds
pub(crate) fn reload(course: &Course) -> Result<Course> {
    Course::new(&course.base_dir)
}
