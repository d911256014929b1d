use crate::error::TrayError;

/// 编码字节的类别。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeClass {
    Invalid,
    Symbol,
    Whitespace,
    Wildcard,
    Separator,
}

/// 编码字节按有符号值排序：-1（分隔符）排在 0,1,2... 之前。
/// 桶下标即有符号值加 128，范围 0..256。
#[inline]
pub fn bucket_of(code: u8) -> usize {
    (code ^ 0x80) as usize
}

/// 两个编码字节按有符号值比较的差值。
#[inline]
pub fn code_diff(a: u8, b: u8) -> i32 {
    (a as i8) as i32 - (b as i8) as i32
}

/// 字母表映射：原始字符 -> 编码字节，以及编码字节的类别。
///
/// 文本格式与索引项目文件一致，逐行描述：
/// - `##symbols[:n]` / `##wildcards[:n]` / `##separators[:n]` / `##whitespace[:n]`
///   切换模式，可选地把当前编码设为 n（可为负数，按字节回绕）；
/// - 普通行：该行所有字符映射到当前编码，第一个字符为其原像，之后编码加一；
/// - 空行：跳过一个编码。
#[derive(Debug, Clone)]
pub struct Alphabet {
    /// 原始字节 -> 编码
    image: Vec<u8>,
    /// 原始字节是否可翻译
    pre_valid: Vec<bool>,
    /// 编码 -> 原像字符
    preimage: Vec<u8>,
    /// 编码 -> 类别
    classes: Vec<CodeClass>,
    separator: Option<u8>,
    wildcard: Option<u8>,
    whitespace: Option<u8>,
}

impl Alphabet {
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, TrayError> {
        let mut a = Alphabet {
            image: vec![0; 256],
            pre_valid: vec![false; 256],
            preimage: vec![0; 256],
            classes: vec![CodeClass::Invalid; 256],
            separator: None,
            wildcard: None,
            whitespace: None,
        };

        let mut code: i32 = 0;
        let mut mode = CodeClass::Symbol;
        for (lineno, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if let Some(annotation) = line.strip_prefix("##") {
                let (name, start) = match annotation.split_once(':') {
                    Some((name, start)) => (name, start.trim()),
                    None => (annotation, ""),
                };
                if !start.is_empty() {
                    code = parse_code(start).ok_or_else(|| TrayError::InvalidAlphabet {
                        line: lineno + 1,
                        reason: format!("cannot parse code '{}'", start),
                    })?;
                }
                let c = wrap(code);
                let name = name.to_ascii_lowercase();
                if name.starts_with("symbol") {
                    mode = CodeClass::Symbol;
                } else if name.starts_with("wildcard") {
                    mode = CodeClass::Wildcard;
                    a.classes[c as usize] = mode;
                    a.wildcard = Some(c);
                } else if name.starts_with("separator") {
                    mode = CodeClass::Separator;
                    a.classes[c as usize] = mode;
                    a.separator = Some(c);
                } else if name.starts_with("whitespace") {
                    mode = CodeClass::Whitespace;
                    a.classes[c as usize] = mode;
                    a.whitespace = Some(c);
                    a.preimage[c as usize] = b' ';
                    for ch in 0u8..=32 {
                        if ch.is_ascii_whitespace() {
                            a.image[ch as usize] = c;
                            a.pre_valid[ch as usize] = true;
                        }
                    }
                } else {
                    return Err(TrayError::InvalidAlphabet {
                        line: lineno + 1,
                        reason: format!("invalid annotation '{}'", name),
                    });
                }
                continue;
            }

            let c = wrap(code);
            a.classes[c as usize] = mode;
            if let Some(&first) = line.as_bytes().first() {
                a.preimage[c as usize] = first;
                for &ch in line.as_bytes() {
                    a.image[ch as usize] = c;
                    a.pre_valid[ch as usize] = true;
                }
            }
            code += 1;
        }
        Ok(a)
    }

    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("cannot read alphabet map '{}': {}", path, e))?;
        let lines: Vec<&str> = content.lines().collect();
        Ok(Self::from_lines(&lines)?)
    }

    /// DNA：A C G T 为 0..3，IUPAC 通配符为 4，`#` 为 5，分隔符为 -1。
    pub fn dna() -> Self {
        Self::preset(&[
            "##symbols:0", "Aa", "Cc", "Gg", "TtUu",
            "##wildcards", "XxNnWwRrKkYySsMmBbHhDdVv",
            "##wildcards", "#",
            "##separators:-1",
        ])
    }

    /// 互补 DNA：T G C A 为 0..3。
    pub fn cdna() -> Self {
        Self::preset(&[
            "##symbols:0", "TtUu", "Gg", "Cc", "Aa",
            "##wildcards", "XxNnWwRrKkYySsMmBbHhDdVv",
            "##wildcards", "#",
            "##separators:-1",
        ])
    }

    pub fn protein() -> Self {
        Self::preset(&[
            "##symbols:0", "Aa", "Cc", "Dd", "Ee", "Ff", "Gg", "Hh", "Ii", "Kk",
            "Ll", "Mm", "Nn", "Pp", "Qq", "Rr", "Ss", "Tt", "Vv", "Ww", "Yy",
            "##wildcards", "BbXxZz",
            "##wildcards", "#",
            "##separators:-1",
        ])
    }

    /// 数字 0..9 映射到编码 0..9。
    pub fn numeric() -> Self {
        Self::preset(&["0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "##separators:-1"])
    }

    /// 按名称选择预置字母表，否则视为字母表映射文件路径。
    pub fn by_name(name: &str) -> anyhow::Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dna" => Ok(Self::dna()),
            "cdna" => Ok(Self::cdna()),
            "protein" => Ok(Self::protein()),
            "numeric" => Ok(Self::numeric()),
            _ => Self::from_file(name),
        }
    }

    fn preset(lines: &[&str]) -> Self {
        match Self::from_lines(lines) {
            Ok(a) => a,
            Err(e) => unreachable!("built-in alphabet map is malformed: {}", e),
        }
    }

    #[inline]
    pub fn class(&self, code: u8) -> CodeClass {
        self.classes[code as usize]
    }

    #[inline]
    pub fn is_valid(&self, code: u8) -> bool {
        self.class(code) != CodeClass::Invalid
    }

    /// 普通字符（含空白）按值比较。
    #[inline]
    pub fn is_symbol(&self, code: u8) -> bool {
        matches!(self.class(code), CodeClass::Symbol | CodeClass::Whitespace)
    }

    #[inline]
    pub fn is_wildcard(&self, code: u8) -> bool {
        self.class(code) == CodeClass::Wildcard
    }

    #[inline]
    pub fn is_separator(&self, code: u8) -> bool {
        self.class(code) == CodeClass::Separator
    }

    /// 通配符或分隔符：按出现位置排序，而非按值。
    #[inline]
    pub fn is_special(&self, code: u8) -> bool {
        matches!(self.class(code), CodeClass::Wildcard | CodeClass::Separator)
    }

    pub fn separator(&self) -> Option<u8> {
        self.separator
    }

    pub fn wildcard(&self) -> Option<u8> {
        self.wildcard
    }

    pub fn whitespace(&self) -> Option<u8> {
        self.whitespace
    }

    /// 有符号意义下最小 / 最大的普通字符编码。
    pub fn smallest_symbol(&self) -> Option<u8> {
        (0..256usize).map(|b| (b as u8) ^ 0x80).find(|&c| self.class(c) == CodeClass::Symbol)
    }

    pub fn largest_symbol(&self) -> Option<u8> {
        (0..256usize).rev().map(|b| (b as u8) ^ 0x80).find(|&c| self.class(c) == CodeClass::Symbol)
    }

    #[inline]
    pub fn code(&self, byte: u8) -> Option<u8> {
        if self.pre_valid[byte as usize] { Some(self.image[byte as usize]) } else { None }
    }

    #[inline]
    pub fn decode(&self, code: u8) -> Option<u8> {
        if self.is_valid(code) { Some(self.preimage[code as usize]) } else { None }
    }

    /// 翻译原始文本并追加到 `out`；`append_separator` 时在末尾补分隔符。
    pub fn encode_into(&self, raw: &[u8], out: &mut Vec<u8>, append_separator: bool) -> Result<(), TrayError> {
        out.reserve(raw.len() + 1);
        for (pos, &b) in raw.iter().enumerate() {
            match self.code(b) {
                Some(c) => out.push(c),
                None => return Err(TrayError::InvalidSymbol { pos, byte: b as char }),
            }
        }
        if append_separator {
            match self.separator {
                Some(sep) => out.push(sep),
                None => {
                    return Err(TrayError::InvalidAlphabet {
                        line: 0,
                        reason: "alphabet map defines no separator".to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    pub fn encode(&self, raw: &[u8], append_separator: bool) -> Result<Vec<u8>, TrayError> {
        let mut out = Vec::with_capacity(raw.len() + 1);
        self.encode_into(raw, &mut out, append_separator)?;
        Ok(out)
    }
}

fn parse_code(s: &str) -> Option<i32> {
    let (neg, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let v = if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        i32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<i32>().ok()?
    };
    Some(if neg { -v } else { v })
}

#[inline]
fn wrap(code: i32) -> u8 {
    (code & 0xFF) as u8
}
