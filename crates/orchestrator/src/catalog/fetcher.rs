use anyhow::{bail, Context, Result};
use flate2::read::GzDecoder;
use log::debug;
use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

const FETCH_TIMEOUT: Duration = Duration::from_secs(300);
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    Http(Url),
    File(PathBuf),
}

/// Retrieves the raw manifest from an `http(s)://` URL or a local path.
///
/// Local paths (plain or `file://`) serve sites without internet access.
/// Gzip payloads are recognised by their magic bytes and inflated,
/// whatever the URL or content type claims.
pub(crate) struct CatalogFetcher {
    source: Source,
    http: reqwest::Client,
}

impl CatalogFetcher {
    pub(crate) fn new(location: &str) -> Result<Self> {
        let source = match Url::parse(location) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Source::Http(url),
            Ok(url) if url.scheme() == "file" => Source::File(
                url.to_file_path()
                    .map_err(|()| anyhow::anyhow!("invalid file URL: {location}"))?,
            ),
            Ok(url) if url.scheme().len() > 1 => {
                bail!("unsupported catalog scheme: {}", url.scheme())
            }
            // relative paths and Windows drive letters are not URLs
            _ => Source::File(PathBuf::from(location)),
        };

        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build catalog HTTP client")?;
        Ok(Self { source, http })
    }

    pub(crate) fn location(&self) -> String {
        match &self.source {
            Source::Http(url) => url.to_string(),
            Source::File(path) => path.display().to_string(),
        }
    }

    pub(crate) async fn fetch(&self) -> Result<Vec<u8>> {
        let raw = match &self.source {
            Source::Http(url) => {
                let response = self
                    .http
                    .get(url.clone())
                    .send()
                    .await
                    .with_context(|| format!("failed to fetch catalog from {url}"))?;
                if !response.status().is_success() {
                    bail!("catalog fetch returned status {}", response.status());
                }
                response
                    .bytes()
                    .await
                    .context("failed to read catalog body")?
                    .to_vec()
            }
            Source::File(path) => tokio::fs::read(path)
                .await
                .with_context(|| format!("failed to read catalog file {}", path.display()))?,
        };
        debug!("Fetched {} catalog bytes from {}", raw.len(), self.location());
        inflate(raw)
    }
}

fn inflate(raw: Vec<u8>) -> Result<Vec<u8>> {
    if !raw.starts_with(&GZIP_MAGIC) {
        return Ok(raw);
    }
    let mut inflated = Vec::new();
    GzDecoder::new(raw.as_slice())
        .read_to_end(&mut inflated)
        .context("failed to decompress catalog")?;
    Ok(inflated)
}

#[cfg(test)]
pub(crate) fn gzip(data: &[u8]) -> Vec<u8> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
