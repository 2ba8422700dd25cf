//! Fixtures shared by the benchmarks.
//!
//! A [`TestFile`] is an embedded resource holding one input per line; blank
//! lines and lines starting with `#` are skipped. A [`TestCase`] names a file
//! for a benchmark id.

#[derive(Debug, Copy, Clone)]
pub struct TestCase {
    name: &'static str,
    file: TestFile,
}

impl TestCase {
    pub fn new(name: &'static str, file: TestFile) -> Self {
        Self { name, file }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn file(&self) -> &TestFile {
        &self.file
    }

    /// Total number of input bytes, used as the benchmark throughput.
    pub fn bytes(&self) -> u64 {
        self.file.inputs().map(|input| input.len() as u64).sum()
    }
}

#[derive(Debug, Copy, Clone)]
pub struct TestFile {
    file_name: &'static str,
    content: &'static str,
}

impl TestFile {
    pub const fn new(file_name: &'static str, content: &'static str) -> Self {
        Self { file_name, content }
    }

    pub fn file_name(&self) -> &'static str {
        self.file_name
    }

    /// Iterates over the inputs of the file.
    pub fn inputs(&self) -> impl Iterator<Item = &'static str> {
        self.content.lines().map(str::trim).filter(|line| !line.is_empty() && !line.starts_with('#'))
    }

    /// Iterates over `name: value` inputs, such as header lines.
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        self.inputs().filter_map(|line| line.split_once(':')).map(|(name, value)| (name.trim(), value.trim()))
    }
}
