use std::cmp::Ordering;

use crate::error::TrayError;
use crate::util::alphabet::{code_diff, Alphabet};

/// 特殊字符（通配符、分隔符）之间的比较方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpecialOrder {
    /// 相同的特殊字符按出现位置排序，保证全序（构建与校验使用）
    #[default]
    Position,
    /// 相同的特殊字符视为相等；仅影响 LCP 计算
    Value,
}

/// 编码文本及其字母表：所有位置运算与字符比较的上下文。
///
/// 只借用序列与字母表，构建、LCP 与校验都通过同一个 `Text` 访问文本。
#[derive(Debug, Clone, Copy)]
pub struct Text<'a> {
    seq: &'a [u8],
    alphabet: &'a Alphabet,
    order: SpecialOrder,
}

impl<'a> Text<'a> {
    /// 校验文本：每个字节都是合法编码，且（非空时）以分隔符结尾。
    pub fn new(seq: &'a [u8], alphabet: &'a Alphabet) -> Result<Self, TrayError> {
        if let Some(pos) = seq.iter().position(|&c| !alphabet.is_valid(c)) {
            return Err(TrayError::InvalidCode { pos, code: seq[pos] });
        }
        if let Some(&last) = seq.last() {
            if !alphabet.is_separator(last) {
                return Err(TrayError::MissingSeparator { pos: seq.len() - 1, code: last });
            }
        }
        Ok(Self { seq, alphabet, order: SpecialOrder::Position })
    }

    pub fn with_special_order(mut self, order: SpecialOrder) -> Self {
        self.order = order;
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.seq.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    #[inline]
    pub fn bytes(&self) -> &'a [u8] {
        self.seq
    }

    #[inline]
    pub fn at(&self, i: usize) -> u8 {
        self.seq[i]
    }

    #[inline]
    pub fn alphabet(&self) -> &'a Alphabet {
        self.alphabet
    }

    #[inline]
    pub fn special_order(&self) -> SpecialOrder {
        self.order
    }

    /// 比较 s[i] 与 s[j]：普通字符按编码值；相同的特殊字符按位置（或视为相等）。
    #[inline]
    pub fn scmp(&self, i: usize, j: usize) -> Ordering {
        let si = self.seq[i];
        let d = code_diff(si, self.seq[j]);
        if d != 0 || self.alphabet.is_symbol(si) {
            return d.cmp(&0);
        }
        match self.order {
            SpecialOrder::Position => i.cmp(&j),
            SpecialOrder::Value => Ordering::Equal,
        }
    }

    /// 比较后缀 i 与 j；仅当 i == j 时相等。
    pub fn suffixcmp(&self, i: usize, j: usize) -> Ordering {
        if i == j {
            return Ordering::Equal;
        }
        let n = self.seq.len();
        let mut off = 0;
        while i + off < n && j + off < n {
            match self.scmp(i + off, j + off) {
                Ordering::Equal => off += 1,
                c => return c,
            }
        }
        // only reachable with SpecialOrder::Value: the shorter suffix is a prefix of the longer
        j.cmp(&i)
    }

    /// 已知后缀 i、j 至少有 h 个公共字符，求最长公共前缀长度。
    #[inline]
    pub fn suffix_lcp(&self, i: usize, j: usize, h: usize) -> usize {
        let n = self.seq.len();
        if i == j {
            return n - i;
        }
        let mut off = h;
        while i + off < n && j + off < n && self.scmp(i + off, j + off) == Ordering::Equal {
            off += 1;
        }
        off
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banana(a: &Alphabet) -> Vec<u8> {
        a.encode(b"banana", true).unwrap()
    }

    fn banana_alphabet() -> Alphabet {
        Alphabet::from_lines(&["##symbols:0", "a", "b", "n", "##separators:-1"]).unwrap()
    }

    #[test]
    fn rejects_missing_separator() {
        let a = Alphabet::dna();
        let seq = vec![0u8, 1, 2];
        let err = Text::new(&seq, &a).unwrap_err();
        assert_eq!(err, TrayError::MissingSeparator { pos: 2, code: 2 });
    }

    #[test]
    fn rejects_invalid_code() {
        let a = Alphabet::dna();
        let seq = vec![0u8, 42, 0xFF];
        let err = Text::new(&seq, &a).unwrap_err();
        assert_eq!(err, TrayError::InvalidCode { pos: 1, code: 42 });
    }

    #[test]
    fn empty_text_is_accepted() {
        let a = Alphabet::dna();
        let t = Text::new(&[], &a).unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn special_characters_compare_by_position() {
        let a = Alphabet::dna();
        // N A N $
        let seq = vec![4u8, 0, 4, 0xFF];
        let t = Text::new(&seq, &a).unwrap();
        assert_eq!(t.scmp(0, 2), Ordering::Less);
        assert_eq!(t.scmp(2, 0), Ordering::Greater);
        assert_eq!(t.scmp(3, 1), Ordering::Less);
        let by_value = t.with_special_order(SpecialOrder::Value);
        assert_eq!(by_value.scmp(0, 2), Ordering::Equal);
    }

    #[test]
    fn suffix_compare_and_lcp() {
        let a = banana_alphabet();
        let seq = banana(&a);
        let t = Text::new(&seq, &a).unwrap();
        // ana$ < anana$
        assert_eq!(t.suffixcmp(3, 1), Ordering::Less);
        assert_eq!(t.suffixcmp(6, 5), Ordering::Less);
        assert_eq!(t.suffixcmp(4, 4), Ordering::Equal);
        assert_eq!(t.suffix_lcp(3, 1, 0), 3);
        assert_eq!(t.suffix_lcp(3, 1, 2), 3);
        assert_eq!(t.suffix_lcp(2, 2, 0), 5);
        assert_eq!(t.suffix_lcp(0, 1, 0), 0);
    }

    #[test]
    fn lcp_by_value_stops_at_text_end() {
        let a = Alphabet::dna();
        // A $ A $
        let seq = vec![0u8, 0xFF, 0, 0xFF];
        let t = Text::new(&seq, &a).unwrap().with_special_order(SpecialOrder::Value);
        assert_eq!(t.suffix_lcp(0, 2, 0), 2);
        assert_eq!(t.suffixcmp(2, 0), Ordering::Less);
    }
}
