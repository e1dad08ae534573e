use std::path::PathBuf;

use crate::cli::commands::InitArgs;
use crate::io::store_io;

/// Infer a list name from a directory name: replace hyphens and underscores
/// with spaces, title-case.
fn infer_name(dir_name: &str) -> String {
    dir_name
        .split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(c) => {
                    let upper: String = c.to_uppercase().collect();
                    upper + chars.as_str()
                }
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn cmd_init(args: InitArgs, project_dir: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let root = match project_dir {
        Some(dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };

    // Nested lists are allowed; point out the one being shadowed.
    if let Some(parent) = root.parent()
        && let Ok(parent_root) = store_io::discover_store(parent)
    {
        let parent_dir: PathBuf = parent_root.join(store_io::DATA_DIR);
        eprintln!("Note: enclosing list found at {}/", parent_dir.display());
    }

    let name = args.name.unwrap_or_else(|| {
        root.file_name()
            .and_then(|n| n.to_str())
            .map(infer_name)
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "To-do".to_string())
    });

    store_io::init_store(&root, &name, args.force)?;
    println!("Initialized list: {}", name);
    Ok(())
}
