use super::dll::{Buckets, Cursor, SuffixOrder};
use crate::util::pos::Pos;

/// 前驱 / 后继双数组编码的后缀链表。
///
/// 任意位置的两个邻居都可以 O(1) 读取，L、R、minLR、bothLR2 构建与 LCP 计算都依赖这一点。
#[derive(Debug, Clone)]
pub struct SuffixDll<I> {
    buckets: Buckets<I>,
    prev: Vec<I>,
    next: Vec<I>,
    cursor: Cursor<I>,
}

impl<I: Pos> SuffixDll<I> {
    pub fn new(n: usize) -> Self {
        Self {
            buckets: Buckets::new(),
            prev: vec![I::NONE; n],
            next: vec![I::NONE; n],
            cursor: Cursor::none(),
        }
    }

    /// 字典序中 p 的前一个位置（哨兵表示 p 最小）。
    #[inline]
    pub fn lex_previous(&self, p: usize) -> I {
        self.prev[p]
    }

    /// 字典序中 p 的后一个位置（哨兵表示 p 最大）。
    #[inline]
    pub fn lex_next(&self, p: usize) -> I {
        self.next[p]
    }

    /// 把 i 插到同桶的 a 之后；a 若是桶尾则 i 成为新桶尾。
    pub(crate) fn insert_after(&mut self, chi: usize, a: usize, i: I) {
        let a_pos = I::from_usize(a);
        self.insert_between(a_pos, self.next[a], i);
        if self.buckets.last(chi) == a_pos {
            self.buckets.set_last(chi, i);
        }
    }

    /// 把 i 插到同桶的 b 之前；b 若是桶首则 i 成为新桶首。
    pub(crate) fn insert_before(&mut self, chi: usize, b: usize, i: I) {
        let b_pos = I::from_usize(b);
        self.insert_between(self.prev[b], b_pos, i);
        if self.buckets.first(chi) == b_pos {
            self.buckets.set_first(chi, i);
        }
    }
}

impl<I: Pos> SuffixOrder<I> for SuffixDll<I> {
    fn capacity(&self) -> usize {
        self.prev.len()
    }

    fn buckets(&self) -> &Buckets<I> {
        &self.buckets
    }

    fn insert_between(&mut self, p1: I, p2: I, i: I) {
        // before: ... p1, p2 ...
        // after:  ... p1, i, p2 ...
        debug_assert!(p1.is_none() || self.next[p1.to_usize()] == p2, "p1={} p2={} i={}", p1, p2, i);
        debug_assert!(p2.is_none() || self.prev[p2.to_usize()] == p1, "p1={} p2={} i={}", p1, p2, i);
        let iu = i.to_usize();
        self.prev[iu] = p1;
        self.next[iu] = p2;
        if let Some(b) = p2.get() {
            self.prev[b] = i;
        }
        if let Some(a) = p1.get() {
            self.next[a] = i;
        }
        self.cursor = Cursor { current: i, predecessor: p1, successor: p2 };
    }

    fn insert_as_first(&mut self, chi: usize, i: I) {
        let p = self.buckets.first(chi);
        debug_assert!(p.is_some());
        self.insert_between(self.prev[p.to_usize()], p, i);
        self.buckets.set_first(chi, i);
    }

    fn insert_as_last(&mut self, chi: usize, i: I) {
        let p = self.buckets.last(chi);
        debug_assert!(p.is_some());
        self.insert_between(p, self.next[p.to_usize()], i);
        self.buckets.set_last(chi, i);
    }

    fn insert_new(&mut self, chi: usize, i: I) {
        debug_assert!(self.buckets.first(chi).is_none() && self.buckets.last(chi).is_none());
        self.buckets.set_first(chi, i);
        self.buckets.set_last(chi, i);
        let ip = self.buckets.last_below(chi);
        let is = self.buckets.first_above(chi);
        self.insert_between(ip, is, i);
    }

    #[inline]
    fn step_up(&self, at: Cursor<I>) -> Cursor<I> {
        let current = at.successor;
        Cursor { current, predecessor: at.current, successor: self.next[current.to_usize()] }
    }

    #[inline]
    fn step_down(&self, at: Cursor<I>) -> Cursor<I> {
        let current = at.predecessor;
        Cursor { current, predecessor: self.prev[current.to_usize()], successor: at.current }
    }

    fn begin(&self) -> Cursor<I> {
        match self.lowest_character() {
            Some(chi) => {
                let current = self.buckets.first(chi);
                Cursor { current, predecessor: I::NONE, successor: self.next[current.to_usize()] }
            }
            None => Cursor::none(),
        }
    }

    fn cursor(&self) -> Cursor<I> {
        self.cursor
    }

    fn set_cursor(&mut self, at: Cursor<I>) {
        self.cursor = at;
    }

    fn predecessor_table(&self) -> Vec<I> {
        self.prev.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 手工插入：桶 1 = {4, 2}，桶 0 = {3}，桶 5 = {0}
    fn small_list() -> SuffixDll<i32> {
        let mut l = SuffixDll::new(5);
        l.insert_new(1, 4);
        l.insert_new(5, 0);
        l.insert_new(0, 3);
        l.insert_as_last(1, 2);
        l
    }

    #[test]
    fn insert_new_links_neighbouring_buckets() {
        let l = small_list();
        let order: Vec<usize> = l.positions().collect();
        assert_eq!(order, vec![3, 4, 2, 0]);
        assert_eq!(l.first_pos(1), 4);
        assert_eq!(l.last_pos(1), 2);
        assert_eq!(l.lex_previous(4), 3);
        assert_eq!(l.lex_next(2), 0);
        assert_eq!(l.lowest_character(), Some(0));
    }

    #[test]
    fn cursor_follows_insertions() {
        let mut l = small_list();
        assert_eq!(l.current(), 2);
        assert_eq!(l.predecessor(), 4);
        assert_eq!(l.successor(), 0);
        l.insert_as_first(1, 1);
        assert_eq!(l.cursor(), Cursor { current: 1, predecessor: 3, successor: 4 });
        assert_eq!(l.first_pos(1), 1);
    }

    #[test]
    fn walk_up_and_down() {
        let mut l = small_list();
        l.reset_to_begin();
        let mut up = vec![l.current()];
        while l.has_next_up() {
            l.next_up();
            up.push(l.current());
        }
        assert_eq!(up, vec![3, 4, 2, 0]);
        let mut down = vec![l.current()];
        while l.has_next_down() {
            l.next_down();
            down.push(l.current());
        }
        assert_eq!(down, vec![0, 2, 4, 3]);
    }

    #[test]
    fn insert_after_and_before_update_bucket_ends() {
        let mut l = small_list();
        l.insert_after(1, 2, 1);
        assert_eq!(l.last_pos(1), 1);
        let order: Vec<usize> = l.positions().collect();
        assert_eq!(order, vec![3, 4, 2, 1, 0]);

        let mut l = small_list();
        l.insert_before(1, 4, 1);
        assert_eq!(l.first_pos(1), 1);
        let order: Vec<usize> = l.positions().collect();
        assert_eq!(order, vec![3, 1, 4, 2, 0]);
    }

    #[test]
    fn empty_list_has_no_begin() {
        let mut l: SuffixDll<i64> = SuffixDll::new(0);
        l.reset_to_begin();
        assert!(l.current().is_none());
        assert!(!l.has_next_up());
        assert_eq!(l.positions().count(), 0);
    }
}
