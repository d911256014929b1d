//! 后缀链表构建：从右到左插入每个位置，不做通用排序。
//!
//! 插入位置 p 时，p+1 开头的后缀已在链表中。若 s[p] 是普通字符，
//! 只需从 p+1 出发沿链表行走，找到某个 q 使 s[q-1] == s[p]：
//! 后缀 q-1 与 p 同桶，且二者的相对次序与 q、p+1 的次序一致。
//! 五种方法只在行走方向和停止条件上不同。

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use log::{debug, info};

use super::dll::{Buckets, Cursor, SuffixOrder};
use super::linked::SuffixDll;
use super::text::Text;
use super::xor::SuffixXorDll;
use crate::error::TrayError;
use crate::util::alphabet::bucket_of;
use crate::util::pos::Pos;

/// 构建方法。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Method {
    /// 向左（字典序更小方向）行走
    #[default]
    L,
    /// 向右行走
    R,
    /// 左右交替，先找到者为准
    MinLR,
    /// 两侧都要找到；XOR 编码
    BothLR,
    /// 两侧都要找到；双数组编码
    BothLR2,
}

/// 链表编码。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Linked,
    Xor,
}

impl Method {
    pub const ALL: [Method; 5] = [Method::L, Method::R, Method::MinLR, Method::BothLR, Method::BothLR2];

    pub fn name(self) -> &'static str {
        match self {
            Method::L => "L",
            Method::R => "R",
            Method::MinLR => "minLR",
            Method::BothLR => "bothLR",
            Method::BothLR2 => "bothLR2",
        }
    }

    /// 该方法构建出的链表编码。
    pub fn encoding(self) -> Encoding {
        match self {
            Method::BothLR => Encoding::Xor,
            _ => Encoding::Linked,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = TrayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.name() == s)
            .ok_or_else(|| TrayError::UnsupportedMethod(s.to_string()))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Encoding::Linked => "twin-array",
            Encoding::Xor => "xor-coded",
        })
    }
}

/// 构建完成的后缀链表，编码由方法决定。
#[derive(Debug, Clone)]
pub enum SuffixTray<I> {
    Linked(SuffixDll<I>),
    Xor(SuffixXorDll<I>),
}

impl<I: Pos> SuffixTray<I> {
    pub fn encoding(&self) -> Encoding {
        match self {
            SuffixTray::Linked(_) => Encoding::Linked,
            SuffixTray::Xor(_) => Encoding::Xor,
        }
    }
}

macro_rules! delegate {
    ($self:expr, $l:ident => $e:expr) => {
        match $self {
            SuffixTray::Linked($l) => $e,
            SuffixTray::Xor($l) => $e,
        }
    };
}

impl<I: Pos> SuffixOrder<I> for SuffixTray<I> {
    fn capacity(&self) -> usize {
        delegate!(self, l => l.capacity())
    }

    fn buckets(&self) -> &Buckets<I> {
        delegate!(self, l => l.buckets())
    }

    fn insert_between(&mut self, p1: I, p2: I, i: I) {
        delegate!(self, l => l.insert_between(p1, p2, i))
    }

    fn insert_as_first(&mut self, chi: usize, i: I) {
        delegate!(self, l => l.insert_as_first(chi, i))
    }

    fn insert_as_last(&mut self, chi: usize, i: I) {
        delegate!(self, l => l.insert_as_last(chi, i))
    }

    fn insert_new(&mut self, chi: usize, i: I) {
        delegate!(self, l => l.insert_new(chi, i))
    }

    fn step_up(&self, at: Cursor<I>) -> Cursor<I> {
        delegate!(self, l => l.step_up(at))
    }

    fn step_down(&self, at: Cursor<I>) -> Cursor<I> {
        delegate!(self, l => l.step_down(at))
    }

    fn begin(&self) -> Cursor<I> {
        delegate!(self, l => l.begin())
    }

    fn cursor(&self) -> Cursor<I> {
        delegate!(self, l => l.cursor())
    }

    fn set_cursor(&mut self, at: Cursor<I>) {
        delegate!(self, l => l.set_cursor(at))
    }

    fn predecessor_table(&self) -> Vec<I> {
        delegate!(self, l => l.predecessor_table())
    }
}

/// 后缀链表构建器。
pub struct SuffixTrayBuilder<'a> {
    text: Text<'a>,
    steps: u64,
}

impl<'a> SuffixTrayBuilder<'a> {
    pub fn new(text: Text<'a>) -> Self {
        Self { text, steps: 0 }
    }

    /// 上一次构建的链表行走步数（诊断用）。
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// 按方法构建，编码由方法决定。
    pub fn build<I: Pos>(&mut self, method: Method) -> Result<SuffixTray<I>, TrayError> {
        match method.encoding() {
            Encoding::Linked => self.build_linked(method).map(SuffixTray::Linked),
            Encoding::Xor => self.build_xor(method).map(SuffixTray::Xor),
        }
    }

    /// 构建双数组链表；bothLR 只能用于 XOR 编码。
    pub fn build_linked<I: Pos>(&mut self, method: Method) -> Result<SuffixDll<I>, TrayError> {
        let walk: fn(&mut SuffixDll<I>, &Text<'_>, usize, usize, &mut u64) = match method {
            Method::L => walk_left,
            Method::R => walk_right,
            Method::MinLR => walk_min_lr,
            Method::BothLR2 => walk_both_lr2,
            Method::BothLR => {
                return Err(TrayError::IncompatibleMethod { method: method.name(), encoding: "twin-array" })
            }
        };
        self.check_width::<I>(method)?;
        let text = self.text;
        let mut list = SuffixDll::new(text.len());
        let started = Instant::now();
        self.steps = 0;
        insert_all::<I, _, _>(&mut list, &text, &mut self.steps, |list, p, chi, steps| walk(list, &text, p, chi, steps));
        self.log_done(method, started);
        Ok(list)
    }

    /// 构建 XOR 链表；只有 bothLR 适用。
    pub fn build_xor<I: Pos>(&mut self, method: Method) -> Result<SuffixXorDll<I>, TrayError> {
        if method.encoding() != Encoding::Xor {
            return Err(TrayError::IncompatibleMethod { method: method.name(), encoding: "xor-coded" });
        }
        self.check_width::<I>(method)?;
        let text = self.text;
        let mut list = SuffixXorDll::new(text.len());
        let started = Instant::now();
        self.steps = 0;
        insert_all::<I, _, _>(&mut list, &text, &mut self.steps, |list, p, chi, steps| {
            walk_both_lr(list, &text, p, chi, steps);
        });
        self.log_done(method, started);
        Ok(list)
    }

    fn check_width<I: Pos>(&self, method: Method) -> Result<(), TrayError> {
        if self.text.len() > I::MAX_LEN {
            return Err(TrayError::TextTooLong { len: self.text.len(), bits: I::BITS });
        }
        debug!(
            "building {} suffix list of {} positions ({}-bit) with method {}",
            method.encoding(),
            self.text.len(),
            I::BITS,
            method
        );
        Ok(())
    }

    fn log_done(&self, method: Method, started: Instant) {
        let n = self.text.len().max(1);
        info!(
            "suffixtray: pos completed after {:.1} secs using {} steps ({:.2}/char), method {}",
            started.elapsed().as_secs_f64(),
            self.steps,
            self.steps as f64 / n as f64,
            method
        );
    }
}

/// 所有方法共用的外层循环：p = n-1 … 0。
fn insert_all<I, L, F>(list: &mut L, text: &Text<'_>, steps: &mut u64, mut walk: F)
where
    I: Pos,
    L: SuffixOrder<I>,
    F: FnMut(&mut L, usize, usize, &mut u64),
{
    let alphabet = text.alphabet();
    for p in (0..text.len()).rev() {
        let ch = text.at(p);
        let chi = bucket_of(ch);
        let pos = I::from_usize(p);
        if list.first_pos(chi).is_none() {
            // seeing character ch for the first time
            list.insert_new(chi, pos);
            *steps += 1;
        } else if alphabet.is_special(ch) {
            // special character: always inserted first
            debug_assert!(list.first_pos(chi) > pos && list.last_pos(chi) > pos);
            list.insert_as_first(chi, pos);
            *steps += 1;
        } else {
            walk(list, p, chi, steps);
        }
    }
}

/// L：从 p+1 向左走，直到某个 q 满足 s[q-1] == s[p]，把 p 插在 q-1 之后。
fn walk_left<I: Pos>(list: &mut SuffixDll<I>, text: &Text<'_>, p: usize, chi: usize, steps: &mut u64) {
    let ch = text.at(p);
    let mut q = p + 1;
    loop {
        *steps += 1;
        match list.lex_previous(q).get() {
            None => {
                list.insert_as_first(chi, I::from_usize(p));
                return;
            }
            Some(prev) => {
                q = prev;
                if text.at(q - 1) == ch {
                    list.insert_after(chi, q - 1, I::from_usize(p));
                    return;
                }
            }
        }
    }
}

/// R：向右走，找到后把 p 插在 q-1 之前；走到尽头则为桶尾。
fn walk_right<I: Pos>(list: &mut SuffixDll<I>, text: &Text<'_>, p: usize, chi: usize, steps: &mut u64) {
    let ch = text.at(p);
    let mut q = p + 1;
    loop {
        *steps += 1;
        match list.lex_next(q).get() {
            None => {
                list.insert_as_last(chi, I::from_usize(p));
                return;
            }
            Some(next) => {
                q = next;
                if text.at(q - 1) == ch {
                    list.insert_before(chi, q - 1, I::from_usize(p));
                    return;
                }
            }
        }
    }
}

/// minLR：左右交替各走一步，哪一侧先命中就按哪一侧插入。
fn walk_min_lr<I: Pos>(list: &mut SuffixDll<I>, text: &Text<'_>, p: usize, chi: usize, steps: &mut u64) {
    let ch = text.at(p);
    let i = I::from_usize(p);
    // down: towards smaller suffixes, up: towards larger ones
    let (mut down, mut up) = (p + 1, p + 1);
    loop {
        *steps += 1;
        match list.lex_previous(down).get() {
            None => {
                list.insert_as_first(chi, i);
                return;
            }
            Some(prev) => {
                down = prev;
                if text.at(down - 1) == ch {
                    list.insert_after(chi, down - 1, i);
                    return;
                }
            }
        }
        *steps += 1;
        match list.lex_next(up).get() {
            None => {
                list.insert_as_last(chi, i);
                return;
            }
            Some(next) => {
                up = next;
                if text.at(up - 1) == ch {
                    list.insert_before(chi, up - 1, i);
                    return;
                }
            }
        }
    }
}

/// bothLR2：两侧都找到命中后插在两者之间；任一侧走到尽头则为桶首 / 桶尾。
fn walk_both_lr2<I: Pos>(list: &mut SuffixDll<I>, text: &Text<'_>, p: usize, chi: usize, steps: &mut u64) {
    let ch = text.at(p);
    let i = I::from_usize(p);
    let (mut down, mut up) = (p + 1, p + 1);
    let (mut found_down, mut found_up) = (false, false);
    while !(found_down && found_up) {
        if !found_up {
            *steps += 1;
            match list.lex_next(up).get() {
                None => {
                    list.insert_as_last(chi, i);
                    return;
                }
                Some(next) => {
                    up = next;
                    found_up = text.at(up - 1) == ch;
                }
            }
        }
        if !found_down {
            *steps += 1;
            match list.lex_previous(down).get() {
                None => {
                    list.insert_as_first(chi, i);
                    return;
                }
                Some(prev) => {
                    down = prev;
                    found_down = text.at(down - 1) == ch;
                }
            }
        }
    }
    list.insert_between(I::from_usize(down - 1), I::from_usize(up - 1), i);
}

/// bothLR：与 bothLR2 相同的判定，但在 XOR 链表上行走。
///
/// 起点是上一次插入留下的游标（即 p+1 及其两个邻居），
/// 每一步用 XOR 链接和刚离开的位置求出下一个位置。
fn walk_both_lr<I: Pos>(list: &mut SuffixXorDll<I>, text: &Text<'_>, p: usize, chi: usize, steps: &mut u64) {
    let ch = text.at(p);
    let i = I::from_usize(p);
    let start = list.cursor();
    debug_assert_eq!(start.current.get(), Some(p + 1));
    // up: towards larger suffixes (as next_up), down: towards smaller ones
    let (mut up, mut up_from) = (start.current, start.predecessor);
    let (mut down, mut down_from) = (start.current, start.successor);
    let (mut found_down, mut found_up) = (false, false);
    while !(found_down && found_up) {
        if !found_up {
            *steps += 1;
            let q = list.other_neighbour(up, up_from);
            let Some(qu) = q.get() else {
                list.insert_as_last(chi, i);
                return;
            };
            found_up = text.at(qu - 1) == ch;
            up_from = up;
            up = q;
        }
        if !found_down {
            *steps += 1;
            let q = list.other_neighbour(down, down_from);
            let Some(qd) = q.get() else {
                list.insert_as_first(chi, i);
                return;
            };
            found_down = text.at(qd - 1) == ch;
            down_from = down;
            down = q;
        }
    }
    list.insert_between(I::from_usize(down.to_usize() - 1), I::from_usize(up.to_usize() - 1), i);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::random_text as make_text;
    use crate::util::alphabet::Alphabet;

    fn naive_order(text: &Text<'_>) -> Vec<usize> {
        let mut sa: Vec<usize> = (0..text.len()).collect();
        sa.sort_by(|&i, &j| text.suffixcmp(i, j));
        sa
    }


    fn order_of<I: Pos>(text: &Text<'_>, method: Method) -> Vec<usize> {
        let mut b = SuffixTrayBuilder::new(*text);
        let tray = b.build::<I>(method).unwrap();
        tray.positions().collect()
    }

    #[test]
    fn method_names_roundtrip() {
        for m in Method::ALL {
            assert_eq!(m.name().parse::<Method>().unwrap(), m);
        }
        assert_eq!("minlr".parse::<Method>(), Err(TrayError::UnsupportedMethod("minlr".to_string())));
        assert_eq!(Method::default(), Method::L);
        assert_eq!(Method::BothLR.encoding(), Encoding::Xor);
        assert_eq!(Method::BothLR2.encoding(), Encoding::Linked);
    }

    #[test]
    fn banana_order_all_methods() {
        let a = Alphabet::from_lines(&["##symbols:0", "a", "b", "n", "##separators:-1"]).unwrap();
        let seq = a.encode(b"banana", true).unwrap();
        let text = Text::new(&seq, &a).unwrap();
        for m in Method::ALL {
            assert_eq!(order_of::<i32>(&text, m), vec![6, 5, 3, 1, 0, 4, 2], "method {}", m);
        }
    }

    #[test]
    fn methods_reject_wrong_encoding() {
        let a = Alphabet::dna();
        let seq = vec![0u8, 0xFF];
        let text = Text::new(&seq, &a).unwrap();
        let mut b = SuffixTrayBuilder::new(text);
        assert!(matches!(
            b.build_linked::<i32>(Method::BothLR),
            Err(TrayError::IncompatibleMethod { method: "bothLR", .. })
        ));
        assert!(matches!(
            b.build_xor::<i32>(Method::MinLR),
            Err(TrayError::IncompatibleMethod { method: "minLR", .. })
        ));
        assert_eq!(b.build::<i64>(Method::BothLR).unwrap().encoding(), Encoding::Xor);
    }

    #[test]
    fn all_methods_agree_with_naive_sort() {
        let a = Alphabet::dna();
        for len in 0..=40 {
            for sigma in [1u32, 2, 4, 6] {
                let seq = make_text(len, sigma, 7 + len as u32);
                let text = Text::new(&seq, &a).unwrap();
                let expected = naive_order(&text);
                for m in Method::ALL {
                    assert_eq!(order_of::<i32>(&text, m), expected, "len={} sigma={} method={}", len, sigma, m);
                    assert_eq!(order_of::<i64>(&text, m), expected, "len={} sigma={} method={} (64-bit)", len, sigma, m);
                }
            }
        }
    }

    #[test]
    fn two_sided_walks_agree_on_wildcard_texts() {
        // codes 4 and 5 are wildcards in the dna map
        let a = Alphabet::dna();
        for seed in 0..50u32 {
            let seq = make_text(60, 5 + seed % 2, seed);
            let text = Text::new(&seq, &a).unwrap();
            let expected = naive_order(&text);
            let xor = order_of::<i32>(&text, Method::BothLR);
            let twin = order_of::<i32>(&text, Method::BothLR2);
            assert_eq!(xor, expected, "seed={}", seed);
            assert_eq!(twin, expected, "seed={}", seed);
            assert_eq!(order_of::<i64>(&text, Method::MinLR), expected, "seed={}", seed);
        }
    }

    #[test]
    fn wildcards_and_inner_separators() {
        let a = Alphabet::dna();
        let seq = a.encode(b"ACNNGT#AC", true).unwrap();
        let mut seq2 = a.encode(b"ACGNAC", true).unwrap();
        seq2.extend(a.encode(b"NNNAC", true).unwrap());
        for s in [seq, seq2] {
            let text = Text::new(&s, &a).unwrap();
            let expected = naive_order(&text);
            for m in Method::ALL {
                assert_eq!(order_of::<i32>(&text, m), expected, "method={}", m);
            }
        }
    }

    #[test]
    fn all_special_text_orders_by_position() {
        let a = Alphabet::dna();
        let mut seq = vec![4u8; 12];
        seq.push(0xFF);
        let text = Text::new(&seq, &a).unwrap();
        for m in Method::ALL {
            assert_eq!(order_of::<i32>(&text, m), vec![12, 0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
        }
    }

    #[test]
    fn single_separator() {
        let a = Alphabet::dna();
        let seq = vec![0xFFu8];
        let text = Text::new(&seq, &a).unwrap();
        for m in Method::ALL {
            assert_eq!(order_of::<i64>(&text, m), vec![0]);
        }
    }

    #[test]
    fn steps_are_counted() {
        let a = Alphabet::dna();
        let seq = make_text(200, 4, 99);
        let text = Text::new(&seq, &a).unwrap();
        let mut b = SuffixTrayBuilder::new(text);
        b.build::<i32>(Method::MinLR).unwrap();
        assert!(b.steps() >= 201);
    }
}
