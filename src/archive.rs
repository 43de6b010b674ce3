// Extraction of plugins distributed as zip archives

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

/// Check whether a downloaded file is a zip archive rather than a jar
pub fn is_zip_archive(filename: &str) -> bool {
    filename.to_lowercase().ends_with(".zip")
}

/// Extract every jar in `archive_path` into `destination`, dropping any
/// directories the archive nests them in. Returns the extracted paths.
pub fn extract_jars(archive_path: &Path, destination: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)
        .map_err(|e| anyhow::anyhow!("{} is not a valid zip: {}", archive_path.display(), e))?;

    fs::create_dir_all(destination)?;
    let mut extracted = Vec::new();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }

        let Some(name) = entry
            .enclosed_name()
            .and_then(|p| p.file_name().map(|n| n.to_os_string()))
        else {
            continue;
        };
        if !name.to_string_lossy().to_lowercase().ends_with(".jar") {
            continue;
        }

        let outpath = destination.join(&name);
        let mut outfile = File::create(&outpath)?;
        io::copy(&mut entry, &mut outfile)?;
        extracted.push(outpath);
    }

    if extracted.is_empty() {
        anyhow::bail!("No jar files found in {}", archive_path.display());
    }
    Ok(extracted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::CompressionMethod;
    use zip::write::{FileOptions, ZipWriter};

    fn write_zip(path: &Path, entries: &[(&str, &str)]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        let options = FileOptions::<()>::default().compression_method(CompressionMethod::Stored);
        for (name, contents) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(contents.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }

    #[test]
    fn test_is_zip_archive() {
        assert!(is_zip_archive("Plugin-1.0.zip"));
        assert!(is_zip_archive("PLUGIN.ZIP"));
        assert!(!is_zip_archive("Plugin-1.0.jar"));
    }

    #[test]
    fn test_extract_jars_flattens_and_filters() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("bundle.zip");
        write_zip(
            &archive,
            &[
                ("README.txt", "read me"),
                ("bundle/Core.jar", "core"),
                ("bundle/addons/Addon.jar", "addon"),
            ],
        );
        let plugins = dir.path().join("plugins");

        let mut extracted = extract_jars(&archive, &plugins).unwrap();
        extracted.sort();

        assert_eq!(extracted, vec![plugins.join("Addon.jar"), plugins.join("Core.jar")]);
        assert_eq!(fs::read(plugins.join("Core.jar")).unwrap(), b"core");
        assert!(!plugins.join("README.txt").exists());
    }

    #[test]
    fn test_extract_without_jars_fails() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("docs.zip");
        write_zip(&archive, &[("README.txt", "nothing here")]);

        assert!(extract_jars(&archive, dir.path()).is_err());
    }
}
