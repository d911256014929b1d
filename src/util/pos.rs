use std::fmt::{Debug, Display};
use std::io::{self, Write};
use std::ops::BitXor;

/// 后缀列表中的文本位置类型（`i32` 或 `i64`）。
///
/// 以 `-1` 作为“无邻居”的哨兵值；XOR 编码直接利用其补码位模式。
pub trait Pos:
    Copy + Eq + Ord + Debug + Display + BitXor<Output = Self> + Send + Sync + 'static
{
    /// 哨兵值 -1
    const NONE: Self;
    /// 序列化时的字节宽度
    const BYTES: usize;
    /// 位宽（用于错误信息）
    const BITS: u32;
    /// 可容纳的最大文本长度
    const MAX_LEN: usize;

    fn from_usize(v: usize) -> Self;
    fn to_usize(self) -> usize;

    #[inline]
    fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    fn is_some(self) -> bool {
        self != Self::NONE
    }

    /// `None` 对应哨兵值。
    #[inline]
    fn get(self) -> Option<usize> {
        if self.is_none() { None } else { Some(self.to_usize()) }
    }

    fn write_le<W: Write>(self, w: &mut W) -> io::Result<()>;
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_pos {
    ($t:ty) => {
        impl Pos for $t {
            const NONE: Self = -1;
            const BYTES: usize = std::mem::size_of::<$t>();
            const BITS: u32 = <$t>::BITS;
            const MAX_LEN: usize = if (<$t>::MAX as u64) < (usize::MAX as u64) {
                <$t>::MAX as usize
            } else {
                usize::MAX
            };

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(v <= Self::MAX_LEN);
                v as $t
            }

            #[inline]
            fn to_usize(self) -> usize {
                debug_assert!(self >= 0, "sentinel used as a position");
                self as usize
            }

            #[inline]
            fn write_le<W: Write>(self, w: &mut W) -> io::Result<()> {
                w.write_all(&self.to_le_bytes())
            }

            #[inline]
            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$t>()];
                buf.copy_from_slice(&bytes[..std::mem::size_of::<$t>()]);
                <$t>::from_le_bytes(buf)
            }
        }
    };
}

impl_pos!(i32);
impl_pos!(i64);
