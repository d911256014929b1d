//! # suffix-tray
//!
//! 基于双向链表的后缀排序（suffix tray）与 LCP 数组计算。
//!
//! 从右到左把每个文本位置插入一个按字典序维护的双向链表，不做通用排序：
//!
//! - **构建**：L、R、minLR、bothLR2（前驱 / 后继双数组）与 bothLR（XOR 单数组）五种插入策略
//! - **LCP**：由链表驱动的 Kasai 式线性扫描，1/2/4/8 字节输出及溢出异常流
//! - **校验**：逐对检查相邻后缀严格递增，并核对位置个数
//! - 位置宽度由类型参数决定：`i32` 或 `i64`
//!
//! ## 快速示例
//!
//! ```rust
//! use suffix_tray::index::{LcpComputer, Method, SuffixOrder, SuffixTrayBuilder, Text};
//! use suffix_tray::util::alphabet::Alphabet;
//!
//! let alphabet = Alphabet::dna();
//! let seq = alphabet.encode(b"GATTACA", true).unwrap();
//! let text = Text::new(&seq, &alphabet).unwrap();
//!
//! let list = SuffixTrayBuilder::new(text).build::<i32>(Method::MinLR).unwrap();
//! let order: Vec<usize> = list.positions().collect();
//! assert_eq!(order[0], 7); // 分隔符最小
//!
//! let (lcp, info) = LcpComputer::new(text).compute(&list);
//! assert_eq!(lcp.len(), 7);
//! assert_eq!(info.max_lcp, 1);
//! ```
//!
//! ## 模块说明
//!
//! - [`index`]：链表、构建器、LCP、校验与元数据
//! - [`io`]：FASTA 解析、序列翻译、小端数组文件
//! - [`util`]：字母表映射与位置类型
//! - [`error`]：参数 / 输入错误

pub mod error;
pub mod index;
pub mod io;
pub mod util;
