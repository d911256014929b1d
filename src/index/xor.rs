use super::dll::{Buckets, Cursor, SuffixOrder};
use crate::util::pos::Pos;

/// XOR 编码的后缀链表：每个位置只存 `prev ^ succ`。
///
/// 只有已知一个邻居时才能求出另一个，因此插入时总要同时给出两侧邻居，
/// 遍历时游标必须带着刚离开的位置。
#[derive(Debug, Clone)]
pub struct SuffixXorDll<I> {
    buckets: Buckets<I>,
    links: Vec<I>,
    cursor: Cursor<I>,
}

impl<I: Pos> SuffixXorDll<I> {
    pub fn new(n: usize) -> Self {
        Self { buckets: Buckets::new(), links: vec![I::NONE; n], cursor: Cursor::none() }
    }

    /// 位置 p 存储的 `prev ^ succ`。
    #[inline]
    pub fn xor_link(&self, p: usize) -> I {
        self.links[p]
    }

    /// 已知 p 的一个邻居 `known`，求另一个。
    #[inline]
    pub fn other_neighbour(&self, p: I, known: I) -> I {
        self.links[p.to_usize()] ^ known
    }
}

impl<I: Pos> SuffixOrder<I> for SuffixXorDll<I> {
    fn capacity(&self) -> usize {
        self.links.len()
    }

    fn buckets(&self) -> &Buckets<I> {
        &self.buckets
    }

    fn insert_between(&mut self, p1: I, p2: I, i: I) {
        // before: ... p1, p2 ...
        // after:  ... p1, i, p2 ...
        self.links[i.to_usize()] = p1 ^ p2;
        if let Some(b) = p2.get() {
            self.links[b] = self.links[b] ^ p1 ^ i;
        }
        if let Some(a) = p1.get() {
            self.links[a] = self.links[a] ^ p2 ^ i;
        }
        self.cursor = Cursor { current: i, predecessor: p1, successor: p2 };
    }

    fn insert_as_first(&mut self, chi: usize, i: I) {
        debug_assert!(self.buckets.first(chi).is_some());
        let ip = self.buckets.last_below(chi);
        self.insert_between(ip, self.buckets.first(chi), i);
        self.buckets.set_first(chi, i);
    }

    fn insert_as_last(&mut self, chi: usize, i: I) {
        debug_assert!(self.buckets.last(chi).is_some());
        let is = self.buckets.first_above(chi);
        self.insert_between(self.buckets.last(chi), is, i);
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
        Cursor { current, predecessor: at.current, successor: self.other_neighbour(current, at.current) }
    }

    #[inline]
    fn step_down(&self, at: Cursor<I>) -> Cursor<I> {
        let current = at.predecessor;
        Cursor { current, predecessor: self.other_neighbour(current, at.current), successor: at.current }
    }

    fn begin(&self) -> Cursor<I> {
        match self.lowest_character() {
            Some(chi) => {
                let current = self.buckets.first(chi);
                Cursor { current, predecessor: I::NONE, successor: self.other_neighbour(current, I::NONE) }
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::linked::SuffixDll;

    fn fill<L: SuffixOrder<i64>>(l: &mut L) {
        l.insert_new(1, 4);
        l.insert_new(5, 0);
        l.insert_new(0, 3);
        l.insert_as_last(1, 2);
        l.insert_as_first(1, 1);
    }

    #[test]
    fn links_hold_xor_of_neighbours() {
        let mut l = SuffixXorDll::<i64>::new(5);
        fill(&mut l);
        // 3, 1, 4, 2, 0
        assert_eq!(l.xor_link(3), -1 ^ 1);
        assert_eq!(l.xor_link(1), 3 ^ 4);
        assert_eq!(l.xor_link(0), 2 ^ -1);
        assert_eq!(l.other_neighbour(4, 1), 2);
    }

    #[test]
    fn traversal_matches_twin_arrays() {
        let mut x = SuffixXorDll::<i64>::new(5);
        let mut d = SuffixDll::<i64>::new(5);
        fill(&mut x);
        fill(&mut d);
        let xs: Vec<usize> = x.positions().collect();
        let ds: Vec<usize> = d.positions().collect();
        assert_eq!(xs, vec![3, 1, 4, 2, 0]);
        assert_eq!(xs, ds);
        assert_eq!(x.cursor(), d.cursor());
    }

    #[test]
    fn cursor_walks_both_ways() {
        let mut x = SuffixXorDll::<i32>::new(3);
        x.insert_new(7, 2);
        x.insert_new(3, 1);
        x.insert_as_last(3, 0);
        x.reset_to_begin();
        assert_eq!(x.current(), 1);
        x.next_up();
        x.next_up();
        assert_eq!(x.current(), 2);
        assert!(!x.has_next_up());
        x.next_down();
        assert_eq!(x.cursor(), Cursor { current: 0, predecessor: 1, successor: 2 });
        x.next_down();
        assert!(!x.has_next_down());
    }
}
