use crate::session::dto::DataPoint;
use base64::Engine;
use regex::Regex;
use std::path::{Path, PathBuf};

pub const PLOT_FILE_NAME: &str = "decay_plot.png";

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("no simulation result to save")]
    NoResult,
    #[error("plot is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("serialize failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// 一次性的下载物：构造后写入下载目录即被消费
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    pub fn plot_image(plot_base64: &str) -> Result<Self, ExportError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(plot_base64.trim())?;
        Ok(Self {
            file_name: PLOT_FILE_NAME.to_string(),
            bytes,
        })
    }

    pub fn data_json(isotope_name: &str, data: &[DataPoint]) -> Result<Self, ExportError> {
        Ok(Self {
            file_name: data_file_name(isotope_name),
            bytes: serde_json::to_vec_pretty(data)?,
        })
    }

    /// 写入目录，同名文件直接覆盖
    pub fn write_into(self, dir: &Path) -> Result<PathBuf, ExportError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// `<IsotopeName>_data.json`，名称中的路径分隔符等字符替换为 `_`
pub fn data_file_name(isotope_name: &str) -> String {
    let re = Regex::new(r#"[/\\:*?"<>|]"#).unwrap();
    let name = re.replace_all(isotope_name.trim(), "_");
    let name = if name.is_empty() { "isotope".into() } else { name };
    format!("{}_data.json", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_name_is_sanitized() {
        assert_eq!(data_file_name("Cobalt-60"), "Cobalt-60_data.json");
        assert_eq!(data_file_name("Co/60: test"), "Co_60_ test_data.json");
        assert_eq!(data_file_name(""), "isotope_data.json");
    }

    #[test]
    fn json_is_pretty_printed_data_sequence() {
        let data: Vec<DataPoint> = serde_json::from_value(json!([
            { "time": "0.00", "remaining": "10.00", "decayed": "0.00", "rate": "1.00", "gamma": "0" }
        ]))
        .unwrap();
        let artifact = DownloadArtifact::data_json("Test-1", &data).unwrap();
        let text = String::from_utf8(artifact.bytes).unwrap();
        assert!(text.starts_with("[\n  {\n    \"time\": \"0.00\""));
    }

    #[test]
    fn repeated_image_saves_leave_one_file() {
        let dir = tempfile::tempdir().unwrap();
        let plot = base64::engine::general_purpose::STANDARD.encode(b"\x89PNG fake");
        for _ in 0..3 {
            let path = DownloadArtifact::plot_image(&plot)
                .unwrap()
                .write_into(dir.path())
                .unwrap();
            assert_eq!(path, dir.path().join(PLOT_FILE_NAME));
        }
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            std::fs::read(dir.path().join(PLOT_FILE_NAME)).unwrap(),
            b"\x89PNG fake"
        );
    }

    #[test]
    fn invalid_plot_payload_is_rejected() {
        assert!(matches!(
            DownloadArtifact::plot_image("not base64!"),
            Err(ExportError::Decode(_))
        ));
    }
}
