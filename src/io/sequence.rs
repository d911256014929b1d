//! 读取待索引的文本，得到以分隔符结尾的编码序列。
//!
//! - FASTA（首字符为 `>`）：每条记录编码后追加一个分隔符；
//! - 纯文本：每个非空行视为一条记录；
//! - 已编码文件（`.seq`）：原样读入，由 [`Text::new`](crate::index::text::Text::new) 校验。

use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::fasta::FastaReader;
use crate::util::alphabet::Alphabet;

/// 一条记录在编码序列中的位置（不含其后的分隔符）。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub offset: u64,
    pub len: u64,
}

/// 编码后的序列及记录表。
#[derive(Debug, Clone, Default)]
pub struct CodedSequence {
    pub seq: Vec<u8>,
    pub records: Vec<Record>,
}

impl CodedSequence {
    fn push(&mut self, name: String, raw: &[u8], alphabet: &Alphabet) -> Result<()> {
        let offset = self.seq.len() as u64;
        alphabet
            .encode_into(raw, &mut self.seq, true)
            .with_context(|| format!("record '{}' cannot be translated", name))?;
        self.records.push(Record { name, offset, len: raw.len() as u64 });
        Ok(())
    }

    /// 从 FASTA 或纯文本翻译。
    pub fn translate<R: BufRead>(mut input: R, alphabet: &Alphabet) -> Result<Self> {
        let mut out = CodedSequence::default();
        let is_fasta = input.fill_buf()?.first() == Some(&b'>');
        if is_fasta {
            for rec in FastaReader::new(input) {
                let rec = rec?;
                out.push(rec.name, &rec.seq, alphabet)?;
            }
        } else {
            for (i, line) in input.lines().enumerate() {
                let line = line?;
                let line = line.trim_end_matches(['\r', '\n']);
                if line.is_empty() {
                    continue;
                }
                out.push(format!("line{}", i + 1), line.as_bytes(), alphabet)?;
            }
        }
        Ok(out)
    }

    pub fn from_path(path: &Path, alphabet: &Alphabet) -> Result<Self> {
        let fh = std::fs::File::open(path).with_context(|| format!("cannot open input '{}'", path.display()))?;
        Self::translate(BufReader::new(fh), alphabet)
    }

    /// 读入已编码序列，整体视为一条记录。
    pub fn from_coded_path(path: &Path) -> Result<Self> {
        let seq = std::fs::read(path).with_context(|| format!("cannot read coded sequence '{}'", path.display()))?;
        let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let len = seq.len().saturating_sub(1) as u64;
        Ok(Self { seq, records: vec![Record { name, offset: 0, len }] })
    }

    pub fn from_bytes(bytes: &[u8], alphabet: &Alphabet) -> Result<Self> {
        Self::translate(Cursor::new(bytes), alphabet)
    }

    /// 写出 `.seq`：编码字节，无文件头。
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.seq).with_context(|| format!("cannot write '{}'", path.display()))
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn fasta_records_end_with_separator() {
        let a = Alphabet::dna();
        let cs = CodedSequence::from_bytes(b">r1\nACgt\n>r2\nNA\n", &a).unwrap();
        assert_eq!(cs.seq, vec![0, 1, 2, 3, 0xFF, 4, 0, 0xFF]);
        assert_eq!(cs.records[1], Record { name: "r2".to_string(), offset: 5, len: 2 });
    }

    #[test]
    fn plain_text_lines_become_records() {
        let a = Alphabet::numeric();
        let cs = CodedSequence::from_bytes(b"0123\n\n99\r\n", &a).unwrap();
        assert_eq!(cs.seq, vec![0, 1, 2, 3, 0xFF, 9, 9, 0xFF]);
        assert_eq!(cs.records.len(), 2);
        assert_eq!(cs.records[1].name, "line3");
    }

    #[test]
    fn untranslatable_byte_is_reported() {
        let a = Alphabet::dna();
        let err = CodedSequence::from_bytes(b">bad\nACQ\n", &a).unwrap_err();
        assert!(format!("{:#}", err).contains("'bad'"));
    }

    #[test]
    fn coded_file_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x.seq");
        let a = Alphabet::dna();
        let cs = CodedSequence::from_bytes(b">x\nGATTACA\n", &a).unwrap();
        cs.save(&path).unwrap();
        let back = CodedSequence::from_coded_path(&path).unwrap();
        assert_eq!(back.seq, cs.seq);
        assert_eq!(back.records[0].len, 7);
        assert_eq!(back.records[0].name, "x");
    }
}
