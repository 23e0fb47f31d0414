//! Directory scanning for asset catalog entries that need dedicated `actool` flags.

use std::fs;
use std::path::{Path, PathBuf};

/// Catalog entry extensions mapped to the `actool` flag naming them.
pub const ASSET_TYPE_FLAGS: &[(&str, &str)] = &[
    ("appiconset", "--app-icon"),
    ("launchimage", "--launch-image"),
];

/// Return the flag required for a catalog entry with the given extension, if any.
pub fn flag_for_asset_type(extension: &str) -> Option<&'static str> {
    ASSET_TYPE_FLAGS
        .iter()
        .find(|(asset_type, _)| *asset_type == extension)
        .map(|(_, flag)| *flag)
}

/// Walk the immediate children of every input catalog and collect the special-type flags.
///
/// Each matching child directory contributes a `flag name` pair, where `name` is the
/// directory name without its extension. Inputs that are not directories are skipped and
/// children are visited in file-name order.
pub fn special_asset_flags<P: AsRef<Path>>(inputs: &[P]) -> std::io::Result<Vec<String>> {
    let mut flags = Vec::new();

    for input in inputs {
        let input = input.as_ref();
        if !input.is_dir() {
            continue;
        }

        for child in sorted_child_dirs(input)? {
            let (Some(stem), Some(extension)) = (child.file_stem(), child.extension()) else {
                continue;
            };
            let Some(flag) = flag_for_asset_type(&extension.to_string_lossy()) else {
                continue;
            };

            let asset_name = stem.to_string_lossy().into_owned();
            tracing::debug!(catalog = %input.display(), flag, asset = %asset_name, "found special asset type");
            flags.push(flag.to_string());
            flags.push(asset_name);
        }
    }

    Ok(flags)
}

fn sorted_child_dirs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            children.push(path);
        }
    }
    children.sort();
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn maps_known_asset_types() {
        assert_eq!(flag_for_asset_type("appiconset"), Some("--app-icon"));
        assert_eq!(flag_for_asset_type("launchimage"), Some("--launch-image"));
        assert_eq!(flag_for_asset_type("imageset"), None);
    }

    #[test]
    fn collects_flags_from_catalog_children() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("Assets.xcassets");
        fs::create_dir_all(catalog.join("AppIcon.appiconset")).unwrap();
        fs::create_dir_all(catalog.join("Launch.launchimage")).unwrap();
        fs::create_dir_all(catalog.join("Logo.imageset")).unwrap();
        fs::write(catalog.join("Contents.json"), "{}").unwrap();

        let flags = special_asset_flags(&[&catalog]).unwrap();
        assert_eq!(
            flags,
            vec!["--app-icon", "AppIcon", "--launch-image", "Launch"]
        );
    }

    #[test]
    fn ignores_files_with_special_extensions() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("Assets.xcassets");
        fs::create_dir_all(&catalog).unwrap();
        fs::write(catalog.join("Stray.appiconset"), "").unwrap();

        assert!(special_asset_flags(&[&catalog]).unwrap().is_empty());
    }

    #[test]
    fn hidden_directories_have_no_extension() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("Assets.xcassets");
        fs::create_dir_all(catalog.join(".appiconset")).unwrap();

        assert!(special_asset_flags(&[&catalog]).unwrap().is_empty());
    }

    #[test]
    fn skips_inputs_that_are_not_directories() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("Missing.xcassets");
        let file = dir.path().join("File.xcassets");
        fs::write(&file, "").unwrap();

        assert!(special_asset_flags(&[missing, file]).unwrap().is_empty());
    }
}
