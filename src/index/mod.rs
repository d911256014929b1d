//! 后缀链表（suffix tray）：构建、LCP 与校验。

pub mod builder;
pub mod checker;
pub mod dll;
pub mod lcp;
pub mod linked;
pub mod meta;
pub mod text;
pub mod xor;

pub use builder::{Encoding, Method, SuffixTray, SuffixTrayBuilder};
pub use checker::{CheckStatus, SuffixChecker};
pub use dll::SuffixOrder;
pub use lcp::{LcpComputer, LcpInfo, LcpWidths};
pub use text::{SpecialOrder, Text};

/// 线性同余生成的编码文本（取值 0..sigma），末尾为分隔符。
#[cfg(test)]
pub(crate) fn random_text(len: usize, sigma: u32, seed: u32) -> Vec<u8> {
    let mut x: u32 = seed.wrapping_add(1_234_567);
    let mut v = Vec::with_capacity(len + 1);
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        v.push(((x >> 16) % sigma) as u8);
    }
    v.push(0xFF);
    v
}
