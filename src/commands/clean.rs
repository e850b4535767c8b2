//! Clean the public directory

use anyhow::Result;
use std::fs;

use crate::Course;

/// Delete the public directory
pub fn run(course: &Course) -> Result<()> {
    if course.public_dir.exists() {
        fs::remove_dir_all(&course.public_dir)?;
        tracing::info!("Deleted: {:?}", course.public_dir);
    } else {
        tracing::debug!("Nothing to clean at {:?}", course.public_dir);
    }

    Ok(())
}
