use std::path::{Path, PathBuf};
use uuid::Uuid;

/// What the camera or gallery picker handed back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerResult {
    Canceled,
    Picked { uri: String },
}

/// Where a picked photo ended up.
#[derive(Debug)]
pub enum PhotoImport {
    Copied { path: PathBuf },
    /// The copy failed; the hike references the picked location instead,
    /// which may not survive a cache clear.
    Fallback { uri: String, error: std::io::Error },
}

impl PhotoImport {
    /// The value persisted as an observation's `image_path`.
    pub fn stored_path(&self) -> String {
        match self {
            PhotoImport::Copied { path } => path.to_string_lossy().to_string(),
            PhotoImport::Fallback { uri, .. } => uri.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PhotoImport::Fallback { .. })
    }
}

/// The per-install directory picked photos are copied into.
#[derive(Debug, Clone)]
pub struct PhotoLibrary {
    dir: PathBuf,
}

impl PhotoLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `None` when the picker was canceled.
    pub fn import(&self, picked: &PickerResult) -> Option<PhotoImport> {
        match picked {
            PickerResult::Canceled => None,
            PickerResult::Picked { uri } => Some(self.copy_into_library(uri)),
        }
    }

    /// Copies the file behind `uri` into the library, keeping its file name
    /// unless another photo already has it. A file that already lives in the
    /// library is referenced in place.
    pub fn copy_into_library(&self, uri: &str) -> PhotoImport {
        let source = Path::new(local_path(uri));
        match self.place(source, &library_file_name(uri)) {
            Ok(path) => {
                log::debug!("Stored photo {} as {}", uri, path.display());
                PhotoImport::Copied { path }
            }
            Err(error) => {
                log::warn!("Photo copy failed for {}: {}; keeping original location", uri, error);
                PhotoImport::Fallback {
                    uri: uri.to_string(),
                    error,
                }
            }
        }
    }

    fn place(&self, source: &Path, name: &str) -> std::io::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let source = source.canonicalize()?;
        let library = self.dir.canonicalize()?;

        // Copying a file onto itself truncates it.
        if source.parent() == Some(library.as_path()) {
            if let Some(existing) = source.file_name() {
                return Ok(self.dir.join(existing));
            }
        }

        let mut dest = self.dir.join(name);
        if dest.exists() {
            dest = self.dir.join(format!("{}-{}", Uuid::new_v4(), name));
        }
        std::fs::copy(&source, &dest)?;
        Ok(dest)
    }
}

fn local_path(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}

fn library_file_name(uri: &str) -> String {
    uri.rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.jpg", Uuid::new_v4()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_is_last_uri_segment() {
        assert_eq!(library_file_name("file:///cache/ImagePicker/abc.jpg"), "abc.jpg");
        assert_eq!(library_file_name("photo.png"), "photo.png");
        let generated = library_file_name("file:///cache/");
        assert!(generated.ends_with(".jpg"));
        assert_eq!(generated.len(), 36 + 4);
    }

    #[test]
    fn canceled_pick_imports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let library = PhotoLibrary::new(dir.path());
        assert!(library.import(&PickerResult::Canceled).is_none());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn picked_photo_is_copied_into_library() {
        let src_dir = tempfile::tempdir().unwrap();
        let lib_dir = tempfile::tempdir().unwrap();
        let source = src_dir.path().join("summit.jpg");
        std::fs::write(&source, b"jpeg bytes").unwrap();

        let library = PhotoLibrary::new(lib_dir.path().join("photos"));
        let uri = format!("file://{}", source.display());
        let import = library
            .import(&PickerResult::Picked { uri })
            .unwrap();

        let expected = lib_dir.path().join("photos").join("summit.jpg");
        assert!(!import.is_fallback());
        assert_eq!(import.stored_path(), expected.to_string_lossy());
        assert_eq!(std::fs::read(&expected).unwrap(), b"jpeg bytes");
    }

    #[test]
    fn repicking_a_library_photo_leaves_it_intact() {
        let lib_dir = tempfile::tempdir().unwrap();
        let cover = lib_dir.path().join("cover.jpg");
        std::fs::write(&cover, b"jpeg bytes").unwrap();

        let library = PhotoLibrary::new(lib_dir.path());
        let import = library.copy_into_library(&cover.to_string_lossy());

        assert!(!import.is_fallback());
        assert_eq!(import.stored_path(), cover.to_string_lossy());
        assert_eq!(std::fs::read(&cover).unwrap(), b"jpeg bytes");
        assert_eq!(std::fs::read_dir(lib_dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn same_named_photos_do_not_overwrite_each_other() {
        let src_dir = tempfile::tempdir().unwrap();
        let lib_dir = tempfile::tempdir().unwrap();
        let first_src = src_dir.path().join("a").join("IMG_0001.jpg");
        let second_src = src_dir.path().join("b").join("IMG_0001.jpg");
        for (path, bytes) in [(&first_src, "first hike"), (&second_src, "second hike")] {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, bytes).unwrap();
        }

        let library = PhotoLibrary::new(lib_dir.path());
        let first = library.copy_into_library(&first_src.to_string_lossy());
        let second = library.copy_into_library(&second_src.to_string_lossy());

        assert_ne!(first.stored_path(), second.stored_path());
        assert!(second.stored_path().ends_with("-IMG_0001.jpg"));
        assert_eq!(std::fs::read_to_string(first.stored_path()).unwrap(), "first hike");
        assert_eq!(std::fs::read_to_string(second.stored_path()).unwrap(), "second hike");
    }

    #[test]
    fn failed_copy_falls_back_to_picked_uri() {
        let lib_dir = tempfile::tempdir().unwrap();
        let library = PhotoLibrary::new(lib_dir.path());
        let uri = "file:///definitely/not/here/trail.jpg".to_string();

        let import = library.copy_into_library(&uri);
        assert!(import.is_fallback());
        assert_eq!(import.stored_path(), uri);
    }
}
