//! Generate static files

use anyhow::Result;
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::generator::Generator;
use crate::Docs;

/// Generate the documentation pages
pub fn run(docs: &Docs) -> Result<()> {
    let start = Instant::now();

    let count = Generator::new(docs)?.generate()?;

    tracing::info!(
        "Generated {} document pages in {:.2}s",
        count,
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Watch the document store and configuration, regenerating on change
///
/// Blocks until the watcher channel closes. Failed regenerations are
/// logged and the watch continues.
pub fn watch(docs: &Docs) -> Result<()> {
    let (tx, rx) = channel();

    // Create debouncer to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    debouncer
        .watcher()
        .watch(&docs.docs_dir, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", docs.docs_dir);

    let config_path = docs.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let changed: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path))
                    .collect();
                if changed.is_empty() {
                    continue;
                }

                for event in &changed {
                    tracing::info!("File changed: {}", event.path.display());
                }

                // Configuration edits take effect on the next rebuild
                let result = Docs::new(&docs.base_dir).and_then(|fresh| run(&fresh));
                if let Err(e) = result {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

/// Editor swap files and dotfiles never trigger a rebuild
fn is_relevant(path: &std::path::Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    !name.starts_with('.') && !name.ends_with('~') && !name.ends_with(".swp")
}
