//! 后缀双向链表的公共部分：桶首尾表、游标与遍历接口。
//!
//! 链表按字典序把文本位置串起来；同一首字符的后缀在链表中连续（一个“桶”）。
//! 两种编码共用本模块的 [`SuffixOrder`] 接口：
//! - [`SuffixDll`](super::linked::SuffixDll)：前驱 / 后继两个数组；
//! - [`SuffixXorDll`](super::xor::SuffixXorDll)：单个 `prev ^ succ` 数组，省一半内存。

use crate::util::pos::Pos;

/// 可能的首字符（桶）个数
pub const BUCKETS: usize = 256;

/// 链表上的一个位置及其两个邻居。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<I> {
    pub current: I,
    pub predecessor: I,
    pub successor: I,
}

impl<I: Pos> Cursor<I> {
    pub fn none() -> Self {
        Self { current: I::NONE, predecessor: I::NONE, successor: I::NONE }
    }
}

/// 每个桶在字典序中的第一个 / 最后一个位置。
#[derive(Debug, Clone)]
pub struct Buckets<I> {
    first: Vec<I>,
    last: Vec<I>,
}

impl<I: Pos> Buckets<I> {
    pub fn new() -> Self {
        Self { first: vec![I::NONE; BUCKETS], last: vec![I::NONE; BUCKETS] }
    }

    #[inline]
    pub fn first(&self, chi: usize) -> I {
        self.first[chi]
    }

    #[inline]
    pub fn last(&self, chi: usize) -> I {
        self.last[chi]
    }

    #[inline]
    pub fn set_first(&mut self, chi: usize, i: I) {
        self.first[chi] = i;
    }

    #[inline]
    pub fn set_last(&mut self, chi: usize, i: I) {
        self.last[chi] = i;
    }

    /// 最小的非空桶。
    pub fn lowest(&self) -> Option<usize> {
        self.first.iter().position(|p| p.is_some())
    }

    /// chi 之前最近的非空桶的最后一个位置。
    #[inline]
    pub fn last_below(&self, chi: usize) -> I {
        self.last[..chi].iter().rev().copied().find(|p| p.is_some()).unwrap_or(I::NONE)
    }

    /// chi 之后最近的非空桶的第一个位置。
    #[inline]
    pub fn first_above(&self, chi: usize) -> I {
        self.first[chi + 1..].iter().copied().find(|p| p.is_some()).unwrap_or(I::NONE)
    }
}

impl<I: Pos> Default for Buckets<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// 按字典序排列后缀起始位置的双向链表。
///
/// 插入操作都会把内部游标移到新插入的位置（连同其前驱、后继），
/// bothLR 构建依赖这一点从上一次插入处继续行走。
pub trait SuffixOrder<I: Pos> {
    /// 容量，即关联文本的长度
    fn capacity(&self) -> usize;

    fn buckets(&self) -> &Buckets<I>;

    /// 把 i 插入相邻的 p1、p2 之间（p1 < p2，可为哨兵）。
    fn insert_between(&mut self, p1: I, p2: I, i: I);

    /// 把 i 放到桶 chi 的最前面。
    fn insert_as_first(&mut self, chi: usize, i: I);

    /// 把 i 放到桶 chi 的最后面。
    fn insert_as_last(&mut self, chi: usize, i: I);

    /// 字符 chi 第一次出现：链接到最近的非空邻桶之间。
    fn insert_new(&mut self, chi: usize, i: I);

    /// 给定游标，走向字典序中的下一个后缀。
    fn step_up(&self, at: Cursor<I>) -> Cursor<I>;

    /// 给定游标，走向字典序中的上一个后缀。
    fn step_down(&self, at: Cursor<I>) -> Cursor<I>;

    /// 指向全局最小后缀的游标；空链表返回哨兵游标。
    fn begin(&self) -> Cursor<I>;

    fn cursor(&self) -> Cursor<I>;

    fn set_cursor(&mut self, at: Cursor<I>);

    #[inline]
    fn first_pos(&self, chi: usize) -> I {
        self.buckets().first(chi)
    }

    #[inline]
    fn last_pos(&self, chi: usize) -> I {
        self.buckets().last(chi)
    }

    fn lowest_character(&self) -> Option<usize> {
        self.buckets().lowest()
    }

    #[inline]
    fn current(&self) -> I {
        self.cursor().current
    }

    #[inline]
    fn predecessor(&self) -> I {
        self.cursor().predecessor
    }

    #[inline]
    fn successor(&self) -> I {
        self.cursor().successor
    }

    fn reset_to_begin(&mut self) {
        let c = self.begin();
        self.set_cursor(c);
    }

    #[inline]
    fn has_next_up(&self) -> bool {
        self.successor().is_some()
    }

    fn next_up(&mut self) {
        let c = self.step_up(self.cursor());
        self.set_cursor(c);
    }

    #[inline]
    fn has_next_down(&self) -> bool {
        self.predecessor().is_some()
    }

    fn next_down(&mut self) {
        let c = self.step_down(self.cursor());
        self.set_cursor(c);
    }

    /// 每个位置在字典序中的前驱（最小后缀为哨兵）。
    ///
    /// 默认实现沿链表走一遍；能随机访问前驱的编码可以直接复制。
    fn predecessor_table(&self) -> Vec<I> {
        let n = self.capacity();
        let mut table = vec![I::NONE; n];
        let mut at = self.begin();
        let mut visited = 0;
        while let Some(p) = at.current.get() {
            table[p] = at.predecessor;
            visited += 1;
            if at.successor.is_none() || visited >= n {
                break;
            }
            at = self.step_up(at);
        }
        table
    }

    /// 只读遍历：自带游标，不动链表内部状态，可并发使用。
    fn positions(&self) -> Positions<'_, I, Self>
    where
        Self: Sized,
    {
        Positions { list: self, at: self.begin(), limit: self.capacity() }
    }
}

/// 按字典序遍历链表中的位置。
///
/// 最多产生 `capacity` 个位置，损坏成环的链表也能终止。
pub struct Positions<'a, I, L> {
    list: &'a L,
    at: Cursor<I>,
    limit: usize,
}

impl<'a, I: Pos, L: SuffixOrder<I>> Positions<'a, I, L> {
    /// 允许多走若干步（校验器用它发现多余的节点）。
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

impl<'a, I: Pos, L: SuffixOrder<I>> Iterator for Positions<'a, I, L> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.limit == 0 {
            return None;
        }
        let p = self.at.current.get()?;
        self.limit -= 1;
        self.at = if self.at.successor.is_some() { self.list.step_up(self.at) } else { Cursor::none() };
        Some(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_find_neighbours() {
        let mut b: Buckets<i32> = Buckets::new();
        assert_eq!(b.lowest(), None);
        b.set_first(10, 3);
        b.set_last(10, 7);
        b.set_first(200, 1);
        b.set_last(200, 1);
        assert_eq!(b.lowest(), Some(10));
        assert_eq!(b.last_below(100), 7);
        assert_eq!(b.first_above(100), 1);
        assert_eq!(b.last_below(10), -1);
        assert_eq!(b.first_above(200), -1);
        assert_eq!(b.first_above(BUCKETS - 1), -1);
    }
}
