use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{DeployError, DeployResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagedArtifact {
    pub path: PathBuf,
    /// Entry names in write order (sorted, `/`-separated).
    pub members: Vec<String>,
    pub size_bytes: u64,
    pub sha256: String,
}

/// Zips every file under `source_dir` into `archive_path`, naming each entry
/// by its path relative to `source_dir`. Overwrites `archive_path`.
pub fn package_directory(source_dir: &Path, archive_path: &Path) -> DeployResult<PackagedArtifact> {
    if !source_dir.is_dir() {
        return Err(DeployError::SourceDirectory {
            path: source_dir.to_path_buf(),
        });
    }

    let file = fs::File::create(archive_path).map_err(|error| {
        DeployError::io(
            format!("failed to create archive '{}'", archive_path.display()),
            error,
        )
    })?;
    // The archive may sit inside the tree it packs.
    let archive_identity = fs::canonicalize(archive_path).ok();

    let mut files = Vec::new();
    collect_files(source_dir, &mut files).map_err(|error| {
        DeployError::io(
            format!("failed to walk source directory '{}'", source_dir.display()),
            error,
        )
    })?;
    files.sort();

    let mut zip = ZipWriter::new(file);
    let mut members = Vec::with_capacity(files.len());
    for path in files {
        if archive_identity.is_some() && fs::canonicalize(&path).ok() == archive_identity {
            continue;
        }
        let name = entry_name(source_dir, &path);
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(file_mode(&path).map_err(|error| {
                DeployError::io(format!("failed to stat '{}'", path.display()), error)
            })?);
        zip.start_file(name.clone(), options)?;
        let mut input = fs::File::open(&path).map_err(|error| {
            DeployError::io(format!("failed to open '{}'", path.display()), error)
        })?;
        io::copy(&mut input, &mut zip).map_err(|error| {
            DeployError::io(format!("failed to compress '{}'", path.display()), error)
        })?;
        members.push(name);
    }
    zip.finish()?;

    let (size_bytes, sha256) = digest_file(archive_path)?;
    tracing::info!(
        archive = %archive_path.display(),
        members = members.len(),
        size_bytes,
        "Created ZIP: {}",
        archive_path.display()
    );

    Ok(PackagedArtifact {
        path: archive_path.to_path_buf(),
        members,
        size_bytes,
        sha256,
    })
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&path, files)?;
        } else if file_type.is_file() {
            files.push(path);
        } else if file_type.is_symlink() {
            // Symlinked files are packed by content; symlinked directories are
            // not descended into. A dangling link fails here.
            if fs::metadata(&path)?.is_file() {
                files.push(path);
            }
        }
    }
    Ok(())
}

fn entry_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(unix)]
fn file_mode(path: &Path) -> io::Result<u32> {
    use std::os::unix::fs::PermissionsExt;

    Ok(fs::metadata(path)?.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn file_mode(_path: &Path) -> io::Result<u32> {
    Ok(0o644)
}

fn digest_file(path: &Path) -> DeployResult<(u64, String)> {
    let bytes = fs::read(path).map_err(|error| {
        DeployError::io(
            format!("failed to read archive '{}'", path.display()),
            error,
        )
    })?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok((bytes.len() as u64, format!("{:x}", hasher.finalize())))
}
