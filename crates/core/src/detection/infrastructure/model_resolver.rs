use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::shared::constants::{FACE_MODEL_FOLDER, FACE_MODEL_NAME, FACE_WEIGHTS_NAME};

#[derive(Error, Debug)]
pub enum ModelResolveError {
    #[error("failed to create model directory {path}: {source}")]
    ModelDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("download failed for {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to write model to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not determine cache directory")]
    NoCacheDir,
    #[error("model bundle has no files")]
    EmptyBundle,
}

/// Progress callback: `(bytes_downloaded, total_bytes)`.
/// `total_bytes` is 0 if the server didn't provide Content-Length.
pub type ProgressFn = Box<dyn Fn(u64, u64) + Send>;

/// One file of a model bundle and where to fetch it.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelFile {
    pub name: String,
    pub url: String,
}

impl ModelFile {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// IR topology + weights of face-detection-0200 under `base_url`.
pub fn face_detection_bundle(base_url: &str) -> Vec<ModelFile> {
    let base = base_url.trim_end_matches('/');
    [FACE_MODEL_NAME, FACE_WEIGHTS_NAME]
        .into_iter()
        .map(|name| ModelFile::new(name, format!("{base}/{name}")))
        .collect()
}

/// Default bundle folder: `<model cache>/face-detection-0200`.
pub fn default_bundle_dir() -> Result<PathBuf, ModelResolveError> {
    Ok(model_cache_dir()?.join(FACE_MODEL_FOLDER))
}

/// Makes every file of a bundle available in `dir`, downloading only the
/// missing ones. Returns the path of the first (topology) file.
pub fn resolve_bundle(
    dir: &Path,
    files: &[ModelFile],
    progress: Option<ProgressFn>,
) -> Result<PathBuf, ModelResolveError> {
    let primary = files.first().ok_or(ModelResolveError::EmptyBundle)?;

    let missing: Vec<&ModelFile> = files
        .iter()
        .filter(|f| !dir.join(&f.name).exists())
        .collect();

    if missing.is_empty() {
        log::info!("Model already exists in {}.", dir.display());
        return Ok(dir.join(&primary.name));
    }

    fs::create_dir_all(dir).map_err(|e| ModelResolveError::ModelDir {
        path: dir.to_path_buf(),
        source: e,
    })?;
    log::info!("Downloading model to {}...", dir.display());
    for file in missing {
        log::debug!("Fetching {} from {}", file.name, file.url);
        download(&file.url, &dir.join(&file.name), progress.as_ref())?;
    }

    Ok(dir.join(&primary.name))
}

/// Platform-specific model cache directory.
///
/// - macOS: `~/Library/Application Support/Facewatch/models/`
/// - Linux: `$XDG_CACHE_HOME/Facewatch/models/` or `~/.cache/Facewatch/models/`
/// - Windows: `%LOCALAPPDATA%/Facewatch/models/`
pub fn model_cache_dir() -> Result<PathBuf, ModelResolveError> {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir()
            .map(|d| d.join("Facewatch").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        dirs::cache_dir()
            .map(|d| d.join("Facewatch").join("models"))
            .ok_or(ModelResolveError::NoCacheDir)
    }
}

fn download(url: &str, dest: &Path, progress: Option<&ProgressFn>) -> Result<(), ModelResolveError> {
    let temp_path = part_path(dest);

    let result = download_inner(url, dest, &temp_path, progress);

    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }

    result
}

/// `model.bin` → `model.bin.part`; keeps bundle files from colliding.
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

fn download_inner(
    url: &str,
    dest: &Path,
    temp_path: &Path,
    progress: Option<&ProgressFn>,
) -> Result<(), ModelResolveError> {
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| ModelResolveError::Download {
            url: url.to_string(),
            source: e,
        })?;

    let total = response.content_length().unwrap_or(0);
    let mut downloaded: u64 = 0;

    let write_err = |e: std::io::Error| ModelResolveError::Write {
        path: temp_path.to_path_buf(),
        source: e,
    };

    let mut file = fs::File::create(temp_path).map_err(write_err)?;

    let mut reader = response;
    let mut buf = vec![0u8; 1024 * 1024];
    loop {
        let n = reader.read(&mut buf).map_err(write_err)?;
        if n == 0 {
            break;
        }
        file.write_all(&buf[..n]).map_err(write_err)?;
        downloaded += n as u64;
        if let Some(cb) = progress {
            cb(downloaded, total);
        }
    }

    file.flush().map_err(write_err)?;
    drop(file);

    fs::rename(temp_path, dest).map_err(|e| ModelResolveError::Write {
        path: dest.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::FACE_MODEL_BASE_URL;
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};
    use std::thread;
    use tempfile::TempDir;

    const UNREACHABLE: &str = "http://invalid.nonexistent.example.com/models";

    /// Answers exactly one HTTP request on 127.0.0.1 and returns the base URL.
    fn serve_once(status: &'static str, body: &'static [u8]) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 512];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let header = format!(
                "HTTP/1.1 {status}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            let _ = stream.write_all(header.as_bytes());
            let _ = stream.write_all(body);
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_bundle_urls_join_base() {
        let files = face_detection_bundle("https://host/models/");
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "face-detection-0200.xml");
        assert_eq!(files[0].url, "https://host/models/face-detection-0200.xml");
        assert_eq!(files[1].url, "https://host/models/face-detection-0200.bin");
    }

    #[test]
    fn test_default_bundle_points_at_model_zoo() {
        let files = face_detection_bundle(FACE_MODEL_BASE_URL);
        assert!(files[0].url.starts_with("https://storage.openvinotoolkit.org/"));
        assert!(files[1].url.ends_with("/FP16/face-detection-0200.bin"));
    }

    #[test]
    fn test_resolve_reuses_complete_bundle() {
        let tmp = TempDir::new().unwrap();
        for f in face_detection_bundle(UNREACHABLE) {
            fs::write(tmp.path().join(&f.name), b"cached").unwrap();
        }

        // Unreachable URLs prove nothing is fetched.
        let path = resolve_bundle(tmp.path(), &face_detection_bundle(UNREACHABLE), None).unwrap();
        assert_eq!(path, tmp.path().join("face-detection-0200.xml"));
        assert_eq!(fs::read(&path).unwrap(), b"cached");
    }

    #[test]
    fn test_resolve_fetches_only_missing_weights() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("face-detection-0200.xml"), b"<net/>").unwrap();
        // One response only: a second request would fail to connect.
        let base = serve_once("200 OK", b"weights");

        let path = resolve_bundle(tmp.path(), &face_detection_bundle(&base), None).unwrap();

        assert_eq!(path, tmp.path().join("face-detection-0200.xml"));
        assert_eq!(fs::read(&path).unwrap(), b"<net/>");
        assert_eq!(
            fs::read(tmp.path().join("face-detection-0200.bin")).unwrap(),
            b"weights"
        );
    }

    #[test]
    fn test_resolve_unreachable_host_is_download_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("face-detection-0200.xml"), b"<net/>").unwrap();

        let result = resolve_bundle(tmp.path(), &face_detection_bundle(UNREACHABLE), None);
        assert!(matches!(result, Err(ModelResolveError::Download { .. })));
        assert_eq!(
            fs::read(tmp.path().join("face-detection-0200.xml")).unwrap(),
            b"<net/>"
        );
    }

    #[test]
    fn test_resolve_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("bundle");
        let _ = resolve_bundle(&dir, &face_detection_bundle(UNREACHABLE), None);
        assert!(dir.is_dir());
    }

    #[test]
    fn test_resolve_empty_bundle_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = resolve_bundle(tmp.path(), &[], None);
        assert!(matches!(result, Err(ModelResolveError::EmptyBundle)));
    }

    #[test]
    fn test_default_bundle_dir_layout() {
        let dir = default_bundle_dir().unwrap();
        let text = dir.to_string_lossy();
        assert!(text.contains("Facewatch"));
        assert!(text.ends_with("face-detection-0200"));
    }

    #[test]
    fn test_part_path_appends_suffix() {
        let p = part_path(Path::new("/m/face-detection-0200.bin"));
        assert_eq!(p, PathBuf::from("/m/face-detection-0200.bin.part"));
    }

    #[test]
    fn test_download_success_renames_part_into_place() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("face-detection-0200.bin");
        let url = format!("{}/face-detection-0200.bin", serve_once("200 OK", b"0123456789"));

        download(&url, &dest, None).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"0123456789");
        assert!(!part_path(&dest).exists());
    }

    #[test]
    fn test_download_reports_progress() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let url = format!("{}/model.bin", serve_once("200 OK", b"abcdef"));

        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let progress: ProgressFn = Box::new(move |done, total| {
            sink.lock().unwrap().push((done, total));
        });
        download(&url, &dest, Some(&progress)).unwrap();

        let calls = calls.lock().unwrap();
        assert!(!calls.is_empty());
        assert!(calls.iter().all(|&(_, total)| total == 6));
        assert!(calls.windows(2).all(|w| w[0].0 < w[1].0));
        assert_eq!(calls.last(), Some(&(6, 6)));
    }

    #[test]
    fn test_download_http_error_status_leaves_no_files() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let url = format!("{}/model.bin", serve_once("404 Not Found", b"missing"));

        let result = download(&url, &dest, None);

        assert!(matches!(result, Err(ModelResolveError::Download { .. })));
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }

    #[test]
    fn test_download_invalid_url_returns_error() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("model.bin");
        let result = download("http://invalid.nonexistent.example.com/model", &dest, None);
        assert!(result.is_err());
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }
}
