/// Associates one emitted word with the source line it came from.
/// Multi-instruction pseudo-expansions yield several entries with the
/// same line.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct SourceMapEntry {
    pub address: u16,
    /// 1-based line in the original source.
    pub line: u32,
}

pub type SourceMap = Vec<SourceMapEntry>;
