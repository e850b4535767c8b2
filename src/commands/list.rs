//! List site content

use anyhow::Result;

use crate::content::loader::NoteLoader;
use crate::generator::{self, RouteKind};
use crate::pages::StaticPage;
use crate::Course;

/// List site content by type
pub fn run(course: &Course, content_type: &str) -> Result<()> {
    for line in lines(course, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

/// The listing as printable lines
pub fn lines(course: &Course, content_type: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();

    match content_type {
        "note" | "notes" => {
            let store = NoteLoader::new(course).load_notes()?;
            out.push(format!("Notes ({}):", store.len()));
            for doc in store.iter() {
                let date = doc
                    .date
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                out.push(format!(
                    "  {} {} - {} [{}]",
                    date, doc.slug, doc.title, doc.source
                ));
            }
        }
        "page" | "pages" => {
            out.push(format!("Pages ({}):", StaticPage::ALL.len()));
            for page in StaticPage::ALL {
                let data = page
                    .data_file()
                    .map(|file| format!(" [{}]", file))
                    .unwrap_or_default();
                out.push(format!("  {} {}{}", page.route(), page.name(), data));
            }
        }
        "route" | "routes" => {
            let store = NoteLoader::new(course).load_notes()?;
            let routes = generator::routes(course, &store);
            out.push(format!("Routes ({}):", routes.len()));
            for route in routes {
                let kind = match route.kind {
                    RouteKind::Page(_) => "page",
                    RouteKind::Note => "note",
                    RouteKind::Asset => "asset",
                };
                out.push(format!(
                    "  {:<6} {} -> {}",
                    kind,
                    route.path,
                    route.output.display()
                ));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: notes, pages, routes",
                content_type
            );
        }
    }

    Ok(out)
}
