use std::cmp::Ordering;

use bitflags::bitflags;
use log::{info, warn};

use super::dll::SuffixOrder;
use super::text::Text;
use crate::util::pos::Pos;

bitflags! {
    /// 校验结果：0 表示通过。
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CheckStatus: u8 {
        /// 相邻两个后缀没有严格递增
        const SORTING = 1;
        /// 访问到的位置数与文本长度不符
        const COUNT = 2;
    }
}

impl CheckStatus {
    /// 数值形式，作为进程退出码。
    pub fn code(self) -> u8 {
        self.bits()
    }

    pub fn is_ok(self) -> bool {
        self.is_empty()
    }
}

/// 后缀顺序校验器：只报告，不中断。
pub struct SuffixChecker<'a> {
    text: Text<'a>,
}

impl<'a> SuffixChecker<'a> {
    pub fn new(text: Text<'a>) -> Self {
        Self { text }
    }

    /// 校验内存中的链表；最多走 n+1 步，成环的链表按数量错误报告。
    pub fn check_list<I: Pos, L: SuffixOrder<I>>(&self, list: &L) -> CheckStatus {
        let n = self.text.len();
        self.check_sequence(list.positions().with_limit(n + 1))
    }

    /// 校验从磁盘读回的位置流。
    pub fn check_positions<I: Pos>(&self, positions: &[I]) -> CheckStatus {
        self.check_sequence(positions.iter().map(|&p| if p.is_some() { p.to_usize() } else { usize::MAX }))
    }

    fn check_sequence(&self, positions: impl Iterator<Item = usize>) -> CheckStatus {
        let n = self.text.len();
        let mut status = CheckStatus::empty();
        let mut prev: Option<usize> = None;
        let mut count = 0usize;
        for (rank, p) in positions.enumerate() {
            count += 1;
            if p >= n {
                warn!("check: rank {} holds position {} outside the text (length {})", rank, p, n);
                status |= CheckStatus::SORTING;
                prev = None;
                continue;
            }
            if let Some(q) = prev {
                if self.text.suffixcmp(q, p) != Ordering::Less {
                    warn!("check: suffix {} at rank {} is not smaller than suffix {} at rank {}", q, rank - 1, p, rank);
                    status |= CheckStatus::SORTING;
                }
            }
            prev = Some(p);
        }
        if count != n {
            warn!("check: visited {} positions, but text has length {}", count, n);
            status |= CheckStatus::COUNT;
        }
        info!("check: {} positions, status {}", count, status.code());
        status
    }
}
