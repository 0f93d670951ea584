//! Linking a package store into the install root

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::common::fs::replace_symlink;
use crate::common::paths;
use crate::error::Result;
use crate::error::fs::io_failure;
use crate::overlay::Binding;

fn walk_error(root: &Path, err: walkdir::Error) -> crate::error::ModlayerError {
    let path = err.path().unwrap_or(root).to_path_buf();
    io_failure(&path, err)
}

/// Link every regular file under `store` into `install_root` at the same
/// relative path, replacing whatever is there
///
/// `on_link` is called with each created link. Returns the number of links.
pub fn materialize(
    store: &Path,
    install_root: &Path,
    on_link: &mut dyn FnMut(&Path),
) -> Result<usize> {
    let mut count = 0;
    for entry in WalkDir::new(store).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| walk_error(store, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(store) else {
            continue;
        };
        let link = install_root.join(relative);
        replace_symlink(entry.path(), &link)?;
        debug!(link = %link.display(), real_file = %entry.path().display(), "Linked");
        on_link(&link);
        count += 1;
    }
    Ok(count)
}

/// Collect the symlinks under `install_root` that point into `store`
///
/// Links are not followed. Only absolute targets are considered.
pub fn scan_bindings(install_root: &Path, store: &Path) -> Result<Vec<Binding>> {
    let mut bindings = Vec::new();
    for entry in WalkDir::new(install_root)
        .follow_links(false)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| walk_error(install_root, e))?;
        if !entry.path_is_symlink() {
            continue;
        }
        let target = fs::read_link(entry.path()).map_err(|e| io_failure(entry.path(), e))?;
        if !target.starts_with(store) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(install_root) else {
            continue;
        };
        bindings.push(Binding {
            real_file: target,
            virtual_path: paths::to_unix(&relative.to_string_lossy()),
        });
    }
    debug!(store = %store.display(), bindings = bindings.len(), "Scanned install root");
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, file).unwrap();
        }
    }

    #[test]
    fn test_materialize_then_scan() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("overlay/SkyUI");
        let data = temp.path().join("data");
        store_with(&store, &["SkyUI_SE.esp", "interface/skyui/map.swf"]);

        let mut linked = Vec::new();
        let count = materialize(&store, &data, &mut |l| linked.push(l.to_path_buf())).unwrap();

        assert_eq!(count, 2);
        assert_eq!(linked.len(), 2);
        let bindings = scan_bindings(&data, &store).unwrap();
        let paths: Vec<_> = bindings.iter().map(|b| b.virtual_path.as_str()).collect();
        assert_eq!(paths, vec!["SkyUI_SE.esp", "interface/skyui/map.swf"]);
        assert_eq!(bindings[0].real_file, store.join("SkyUI_SE.esp"));
    }

    #[test]
    fn test_scan_ignores_foreign_links_and_files() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("overlay/A");
        let other = temp.path().join("overlay/B");
        let data = temp.path().join("data");
        store_with(&store, &["a.esp"]);
        store_with(&other, &["b.esp"]);
        store_with(&data, &["Skyrim.esm"]);

        materialize(&store, &data, &mut |_| {}).unwrap();
        materialize(&other, &data, &mut |_| {}).unwrap();

        let bindings = scan_bindings(&data, &store).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings[0].virtual_path, "a.esp");
    }

    #[test]
    fn test_materialize_replaces_existing_file() {
        let temp = TempDir::new().unwrap();
        let store = temp.path().join("overlay/A");
        let data = temp.path().join("data");
        store_with(&store, &["textures/sky.dds"]);
        store_with(&data, &["textures/sky.dds"]);

        materialize(&store, &data, &mut |_| {}).unwrap();

        assert_eq!(
            fs::read_link(data.join("textures/sky.dds")).unwrap(),
            store.join("textures/sky.dds")
        );
    }
}
