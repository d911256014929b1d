//! 扁平数组文件：定长小端整数，无文件头。
//!
//! `.pos`、`.lcp1/2/4/8` 与异常文件 `.lcp1x/2x/4x` 都是这种格式。

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::index::dll::SuffixOrder;
use crate::util::pos::Pos;

const BUFFER_SIZE: usize = 1 << 16;

/// 带缓冲的小端数组写出器。
pub struct ArrayWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: u64,
}

impl ArrayWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).with_context(|| format!("cannot create '{}'", path.display()))?;
        Ok(Self { path, out: BufWriter::with_capacity(BUFFER_SIZE, file), written: 0 })
    }

    #[inline]
    pub fn write_u8(&mut self, v: u8) -> Result<()> {
        self.put(&[v])
    }

    #[inline]
    pub fn write_u16(&mut self, v: u16) -> Result<()> {
        self.put(&v.to_le_bytes())
    }

    #[inline]
    pub fn write_u32(&mut self, v: u32) -> Result<()> {
        self.put(&v.to_le_bytes())
    }

    #[inline]
    pub fn write_u64(&mut self, v: u64) -> Result<()> {
        self.put(&v.to_le_bytes())
    }

    #[inline]
    pub fn write_pos<I: Pos>(&mut self, v: I) -> Result<()> {
        v.write_le(&mut self.out).with_context(|| format!("write to '{}' failed", self.path.display()))?;
        self.written += I::BYTES as u64;
        Ok(())
    }

    /// 已写出的字节数
    pub fn written(&self) -> u64 {
        self.written
    }

    /// 刷新缓冲并关闭文件。
    pub fn finish(mut self) -> Result<u64> {
        self.out.flush().with_context(|| format!("flush of '{}' failed", self.path.display()))?;
        Ok(self.written)
    }

    fn put(&mut self, bytes: &[u8]) -> Result<()> {
        self.out.write_all(bytes).with_context(|| format!("write to '{}' failed", self.path.display()))?;
        self.written += bytes.len() as u64;
        Ok(())
    }
}

/// 按字典序写出位置流（`.pos`），返回写出的位置个数。
///
/// 沿用链表自身的游标（`reset_to_begin` / `next_up`），因此需要可变借用。
pub fn write_positions<I: Pos, L: SuffixOrder<I>>(list: &mut L, path: &Path) -> Result<usize> {
    let mut w = ArrayWriter::create(path)?;
    let mut count = 0usize;
    list.reset_to_begin();
    if list.current().is_some() {
        loop {
            w.write_pos(list.current())?;
            count += 1;
            if !list.has_next_up() || count >= list.capacity() {
                break;
            }
            list.next_up();
        }
    }
    w.finish()?;
    Ok(count)
}

/// 读回位置流；文件长度必须是位置宽度的整数倍。
pub fn read_positions<I: Pos>(path: &Path) -> Result<Vec<I>> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read '{}'", path.display()))?;
    if bytes.len() % I::BYTES != 0 {
        anyhow::bail!(
            "'{}' has {} bytes, not a multiple of the {}-byte position width",
            path.display(),
            bytes.len(),
            I::BYTES
        );
    }
    Ok(bytes.chunks_exact(I::BYTES).map(I::read_le).collect())
}

/// `<prefix><ext>`，ext 含点号。
pub fn with_extension(prefix: &Path, ext: &str) -> PathBuf {
    let mut s = prefix.as_os_str().to_os_string();
    s.push(ext);
    PathBuf::from(s)
}
