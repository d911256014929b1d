use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::lcp::LcpInfo;
use crate::io::sequence::Record;

/// 构建元数据，写入 `<prefix>.tray`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrayMeta {
    /// 构建方法名
    pub method: String,
    /// 文本长度（含分隔符）
    pub length: u64,
    /// 位置宽度：4 或 8 字节
    pub pos_bytes: u8,
    pub steps: u64,
    pub steps_per_char: f64,
    /// 未计算 LCP 时为 None
    pub lcp: Option<LcpInfo>,
    /// 写出的 LCP 流宽度掩码
    pub lcp_widths: u32,
    /// 构建时校验的结果码；未校验为 None
    pub check_status: Option<u8>,
    /// 输入文件中的记录
    pub records: Vec<Record>,
    pub input_file: Option<String>,
    pub alphabet: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

impl TrayMeta {
    pub fn new(method: &str, length: usize, pos_bytes: usize, steps: u64) -> Self {
        Self {
            method: method.to_string(),
            length: length as u64,
            pos_bytes: pos_bytes as u8,
            steps,
            steps_per_char: steps as f64 / length.max(1) as f64,
            lcp: None,
            lcp_widths: 0,
            check_status: None,
            records: Vec::new(),
            input_file: None,
            alphabet: None,
            build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
            build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let f = std::fs::File::create(path).with_context(|| format!("cannot create '{}'", path.display()))?;
        bincode::serialize_into(std::io::BufWriter::new(f), self)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let f = std::fs::File::open(path).with_context(|| format!("cannot open '{}'", path.display()))?;
        let meta: Self = bincode::deserialize_from(std::io::BufReader::new(f))
            .with_context(|| format!("'{}' is not a suffix tray metadata file", path.display()))?;
        Ok(meta)
    }
}
