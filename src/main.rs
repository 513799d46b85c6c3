//! Layer set inspection tool.
//!
//! Loads a layer set file, validates its structure, and prints a summary
//! of every layer. Exits nonzero when the file cannot be parsed or its
//! group bookkeeping is inconsistent.

use anyhow::{bail, Context, Result};
use tracing::info;

use layerkit::init_logging;
use layerkit_editor::{layer_bounds, LayerSetFile};

fn main() -> Result<()> {
    init_logging()?;

    let path = match std::env::args().nth(1) {
        Some(path) => path,
        None => {
            eprintln!("Usage: layerkit <layer-set.json>");
            std::process::exit(2);
        }
    };

    let set = LayerSetFile::load_from_file(&path)
        .with_context(|| format!("Failed to load {}", path))?;
    info!(name = %set.metadata.name, version = %set.version, "loaded layer set");

    println!("{} ({} layers)", set.metadata.name, set.layers.len());
    for layer in &set.layers {
        let extent = match layer_bounds(layer) {
            Some(b) => format!("{:.1}x{:.1}", b.width(), b.height()),
            None => "-".to_string(),
        };
        println!(
            "  {:<24} {:<16} visible={} extent={}",
            layer.id,
            layer.kind.type_name(),
            layer.visible,
            extent
        );
    }

    let store = set.into_store();
    if let Err(e) = store.validate() {
        bail!("Layer set is inconsistent: {}", e);
    }
    println!("OK");
    Ok(())
}
