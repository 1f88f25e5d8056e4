use crate::error::ConfigError;

pub const DEFAULT_EXTENSIONS: [&str; 2] = [".fastq", ".fastq.gz"];
pub const DEFAULT_BLOCK_SIZE: usize = 4096;

/// Knobs consumed by the scanner and the record builder.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// File name suffixes that make a file a candidate.
    pub extensions: Vec<String>,
    /// Compute decompressed size and MD5 (reads every candidate in full).
    pub compute_checksum: bool,
    /// Digest block size in bytes.
    pub block_size: usize,
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Follow symbolic links while walking.
    pub follow_links: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            compute_checksum: false,
            block_size: DEFAULT_BLOCK_SIZE,
            recursive: false,
            follow_links: false,
        }
    }
}

impl ScanOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.block_size == 0 {
            return Err(ConfigError::ZeroBlockSize);
        }
        if self.extensions.is_empty() {
            return Err(ConfigError::NoExtensions);
        }
        if let Some(ext) = self.extensions.iter().find(|e| e.trim().is_empty()) {
            return Err(ConfigError::BlankExtension(ext.clone()));
        }
        Ok(())
    }

    /// Longest configured extension the file name ends with.
    pub fn matched_extension(&self, file_name: &str) -> Option<&str> {
        self.extensions
            .iter()
            .filter(|ext| file_name.ends_with(ext.as_str()))
            .max_by_key(|ext| ext.len())
            .map(String::as_str)
    }
}
