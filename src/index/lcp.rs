//! 最长公共前缀（LCP）数组：Kasai 式线性扫描，由后缀链表驱动。
//!
//! 第一遍按文本位置 p = 0..n 计算 p 与其字典序前驱的 LCP，
//! 利用 `lcp(p+1) >= lcp(p) - 1` 只做增量比较；第二遍按名次输出。
//! 名次 0 没有前驱，不输出，因此流的长度是 n-1。

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use bitflags::bitflags;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::dll::SuffixOrder;
use super::text::Text;
use crate::io::array_file::{with_extension, ArrayWriter};
use crate::util::pos::Pos;

bitflags! {
    /// 要写出的 LCP 流宽度（字节数）。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LcpWidths: u32 {
        const W1 = 1;
        const W2 = 2;
        const W4 = 4;
        const W8 = 8;
    }
}

/// 各宽度的溢出阈值：大于等于阈值的值写成全 1 并记入异常流。
pub const LCP1_LIMIT: u64 = 0xFF;
pub const LCP2_LIMIT: u64 = 0xFFFF;
pub const LCP4_LIMIT: u64 = 0xFFFF_FFFF;

/// LCP 计算结果摘要。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LcpInfo {
    pub max_lcp: u64,
    pub lcp1_exceptions: u64,
    pub lcp2_exceptions: u64,
    pub lcp4_exceptions: u64,
}

impl LcpInfo {
    fn record(&mut self, v: u64) {
        self.max_lcp = self.max_lcp.max(v);
        if v >= LCP1_LIMIT {
            self.lcp1_exceptions += 1;
        }
        if v >= LCP2_LIMIT {
            self.lcp2_exceptions += 1;
        }
        if v >= LCP4_LIMIT {
            self.lcp4_exceptions += 1;
        }
    }
}

/// 第一遍的比较量统计：新增匹配字符数与因进位丢弃的字符数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KasaiTrace {
    pub extended: u64,
    pub dropped: u64,
}

/// LCP 计算器。
pub struct LcpComputer<'a> {
    text: Text<'a>,
}

impl<'a> LcpComputer<'a> {
    pub fn new(text: Text<'a>) -> Self {
        Self { text }
    }

    /// 按文本位置索引的 LCP：`lcp[p]` 为后缀 p 与其字典序前驱的 LCP（无前驱为 0）。
    pub fn by_position<I: Pos, L: SuffixOrder<I>>(&self, list: &L) -> Vec<I> {
        self.by_position_traced(list).0
    }

    pub fn by_position_traced<I: Pos, L: SuffixOrder<I>>(&self, list: &L) -> (Vec<I>, KasaiTrace) {
        debug_assert_eq!(list.capacity(), self.text.len());
        // predecessors first, then overwritten in place by the lcp values
        let mut buffer = list.predecessor_table();
        let trace = self.kasai(&mut buffer);
        (buffer, trace)
    }

    /// 内存中计算：返回名次 1..n 的 LCP 值。
    pub fn compute<I: Pos, L: SuffixOrder<I>>(&self, list: &L) -> (Vec<u64>, LcpInfo) {
        let by_pos = self.by_position(list);
        let mut info = LcpInfo::default();
        let mut out = Vec::with_capacity(self.text.len().saturating_sub(1));
        for (rank, p) in list.positions().enumerate() {
            if rank == 0 {
                continue;
            }
            let v = by_pos[p].to_usize() as u64;
            info.record(v);
            out.push(v);
        }
        (out, info)
    }

    /// 计算并写出 `widths` 选中的 LCP 流及异常流，返回摘要。
    ///
    /// 主流 `<prefix>.lcpW`；异常流 `<prefix>.lcpWx` 为（名次, 值）对，位置宽度。
    pub fn write<I: Pos, L: SuffixOrder<I>>(&self, list: &L, widths: LcpWidths, prefix: &Path) -> Result<LcpInfo> {
        let started = Instant::now();
        let by_pos = self.by_position(list);
        debug!("lcp: first pass done after {:.1} secs", started.elapsed().as_secs_f64());

        let mut streams = LcpStreams::create::<I>(widths, prefix)?;
        let mut info = LcpInfo::default();
        for (rank, p) in list.positions().enumerate() {
            if rank == 0 {
                continue;
            }
            let v = by_pos[p];
            info.record(v.to_usize() as u64);
            streams.push(I::from_usize(rank), v)?;
        }
        streams.finish()?;

        info!(
            "lcp: done after {:.1} secs, max lcp {}, exceptions 1/2/4-byte: {}/{}/{}",
            started.elapsed().as_secs_f64(),
            info.max_lcp,
            info.lcp1_exceptions,
            info.lcp2_exceptions,
            info.lcp4_exceptions
        );
        Ok(info)
    }

    /// 原地把前驱表变为 LCP 表。
    fn kasai<I: Pos>(&self, buffer: &mut [I]) -> KasaiTrace {
        let text = &self.text;
        let n = text.len();
        let alphabet = text.alphabet();
        let mut trace = KasaiTrace::default();
        // first special position >= p+1; a carried prefix must not run across it
        let mut next_special = 0usize;
        let mut h = 0usize;
        for p in 0..n {
            let carried = h;
            h = match buffer[p].get() {
                None => 0,
                Some(prev) => text.suffix_lcp(prev, p, h),
            };
            if h >= carried {
                trace.extended += (h - carried) as u64;
            } else {
                trace.dropped += (carried - h) as u64;
            }
            buffer[p] = I::from_usize(h);

            if next_special <= p {
                next_special = p + 1;
            }
            while next_special < n && !alphabet.is_special(text.at(next_special)) {
                next_special += 1;
            }
            // special-led suffixes are ordered by position, so nothing carries out of them
            let carry = if alphabet.is_special(text.at(p)) {
                0
            } else {
                h.saturating_sub(1).min(next_special - (p + 1))
            };
            trace.dropped += (h - carry) as u64;
            h = carry;
        }
        trace
    }
}

/// 打开的各宽度输出流。
struct LcpStreams {
    w1: Option<(ArrayWriter, ArrayWriter)>,
    w2: Option<(ArrayWriter, ArrayWriter)>,
    w4: Option<(ArrayWriter, ArrayWriter)>,
    w8: Option<ArrayWriter>,
}

impl LcpStreams {
    fn create<I: Pos>(widths: LcpWidths, prefix: &Path) -> Result<Self> {
        let pair = |flag: LcpWidths, ext: &str| -> Result<Option<(ArrayWriter, ArrayWriter)>> {
            if !widths.contains(flag) {
                return Ok(None);
            }
            let main = ArrayWriter::create(with_extension(prefix, ext))?;
            let exc = ArrayWriter::create(with_extension(prefix, &format!("{}x", ext)))?;
            Ok(Some((main, exc)))
        };
        Ok(Self {
            w1: pair(LcpWidths::W1, ".lcp1")?,
            w2: pair(LcpWidths::W2, ".lcp2")?,
            w4: pair(LcpWidths::W4, ".lcp4")?,
            w8: if widths.contains(LcpWidths::W8) {
                Some(ArrayWriter::create(with_extension(prefix, ".lcp8"))?)
            } else {
                None
            },
        })
    }

    fn push<I: Pos>(&mut self, rank: I, lcp: I) -> Result<()> {
        let v = lcp.to_usize() as u64;
        if let Some((main, exc)) = self.w1.as_mut() {
            if v >= LCP1_LIMIT {
                main.write_u8(u8::MAX)?;
                exc.write_pos(rank)?;
                exc.write_pos(lcp)?;
            } else {
                main.write_u8(v as u8)?;
            }
        }
        if let Some((main, exc)) = self.w2.as_mut() {
            if v >= LCP2_LIMIT {
                main.write_u16(u16::MAX)?;
                exc.write_pos(rank)?;
                exc.write_pos(lcp)?;
            } else {
                main.write_u16(v as u16)?;
            }
        }
        if let Some((main, exc)) = self.w4.as_mut() {
            if v >= LCP4_LIMIT {
                main.write_u32(u32::MAX)?;
                exc.write_pos(rank)?;
                exc.write_pos(lcp)?;
            } else {
                main.write_u32(v as u32)?;
            }
        }
        if let Some(main) = self.w8.as_mut() {
            main.write_u64(v)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        for (main, exc) in [self.w1, self.w2, self.w4].into_iter().flatten() {
            main.finish()?;
            exc.finish()?;
        }
        if let Some(main) = self.w8 {
            main.finish()?;
        }
        Ok(())
    }
}
