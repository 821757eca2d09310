use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

/// Unified input reader that handles both file and pipe input with buffered reading
pub struct InputReader {
    reader: Box<dyn Read>,
    is_pipe: bool,
}

impl InputReader {
    /// Create a new InputReader from a path
    /// Use "-" for stdin pipe input
    pub fn new<P: AsRef<Path>>(input_path: P) -> Result<Self> {
        let path_str = input_path.as_ref().to_string_lossy();
        let is_pipe = path_str == "-";

        let reader: Box<dyn Read> = if is_pipe {
            Box::new(io::stdin().lock())
        } else {
            let file = File::open(input_path.as_ref())
                .with_context(|| format!("Cannot open {}", input_path.as_ref().display()))?;
            Box::new(BufReader::new(file))
        };

        Ok(Self { reader, is_pipe })
    }

    /// Check if this is pipe input
    pub fn is_pipe(&self) -> bool {
        self.is_pipe
    }

    /// Read all remaining data. Banks are decoded from memory in one piece.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.reader.read_to_end(&mut data)?;
        Ok(data)
    }
}

/// Reads a whole file, or stdin for "-".
pub fn read_input<P: AsRef<Path>>(input_path: P) -> Result<Vec<u8>> {
    let data = InputReader::new(&input_path)?
        .read_all()
        .with_context(|| format!("Cannot read {}", input_path.as_ref().display()))?;
    log::debug!("Read {} bytes from {}", data.len(), input_path.as_ref().display());

    Ok(data)
}
