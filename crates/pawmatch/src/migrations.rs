// SPDX-FileCopyrightText: 2026 PawMatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `pawmatch migrations`: lists the schema files to apply, in order.
//!
//! Files are applied by hand through the hosted database console; this
//! command only shows what exists and the order it sorts in.

use std::path::{Path, PathBuf};

use pawmatch_core::PawError;

/// `.sql` files directly under `dir`, sorted by file name.
pub fn list_migrations(dir: &Path) -> Result<Vec<PathBuf>, PawError> {
    let entries = std::fs::read_dir(dir).map_err(|e| {
        PawError::Config(format!("cannot read migrations dir {}: {e}", dir.display()))
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| PawError::Internal(format!("failed to read dir entry: {e}")))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "sql") {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

pub fn run_migrations(dir: &Path) -> Result<(), PawError> {
    let files = list_migrations(dir)?;
    if files.is_empty() {
        println!("no migrations found in {}", dir.display());
        return Ok(());
    }
    for (i, path) in files.iter().enumerate() {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        println!("{:>3}. {name}", i + 1);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_sql_files_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["003_favorites.sql", "001_pets.sql", "README.md", "002_applications.sql"] {
            std::fs::write(dir.path().join(name), "-- schema").unwrap();
        }
        std::fs::create_dir(dir.path().join("004_nested.sql")).unwrap();

        let names: Vec<_> = list_migrations(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["001_pets.sql", "002_applications.sql", "003_favorites.sql"]
        );
    }

    #[test]
    fn missing_dir_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_migrations(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, PawError::Config(_)));
    }

    #[test]
    fn repository_migrations_are_listed() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
        let files = list_migrations(&dir).unwrap();
        assert_eq!(files.len(), 4);
        assert!(files[0].ends_with("001_pets.sql"));
    }
}
