/// 构建后缀列表时的参数 / 输入错误。
///
/// 这些错误都在任何构建工作开始之前报告；I/O 错误由文件层以 `anyhow::Result` 返回。
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TrayError {
    #[error("unsupported construction method '{0}' (expected one of L, R, minLR, bothLR, bothLR2)")]
    UnsupportedMethod(String),

    #[error("method '{method}' cannot build a {encoding} suffix list")]
    IncompatibleMethod { method: &'static str, encoding: &'static str },

    #[error("last character in text needs to be a separator (found code {code} at position {pos})")]
    MissingSeparator { pos: usize, code: u8 },

    #[error("invalid code {code} at position {pos}: not part of the alphabet")]
    InvalidCode { pos: usize, code: u8 },

    #[error("character {byte:?} at position {pos} cannot be translated by the alphabet map")]
    InvalidSymbol { pos: usize, byte: char },

    #[error("text of length {len} does not fit a {bits}-bit suffix list")]
    TextTooLong { len: usize, bits: u32 },

    #[error("invalid alphabet map line {line}: {reason}")]
    InvalidAlphabet { line: usize, reason: String },
}
