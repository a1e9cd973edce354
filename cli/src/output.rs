//! The movie output file, created on the writer's first byte.

use std::{
    fs::File,
    io::{BufWriter, Seek, SeekFrom, Write},
    path::PathBuf,
};

use led_movie::FrameSink;

/// A file sink that creates (and truncates) its file only when the stream writes to it.
///
/// The writer validates options and allocates its frame buffer before touching the sink, so a
/// stream that fails to open leaves an existing file at `path` as it was.
pub struct OutputFile {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl OutputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: None,
        }
    }

    fn writer(&mut self) -> std::io::Result<&mut BufWriter<File>> {
        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => BufWriter::new(File::create(&self.path)?),
        };
        Ok(self.writer.insert(writer))
    }
}

impl FrameSink for OutputFile {
    fn write_all(&mut self, bytes: &[u8]) -> led_movie::Result<()> {
        self.writer()?.write_all(bytes)?;
        Ok(())
    }

    fn seek_to(&mut self, offset: u64) -> led_movie::Result<()> {
        self.writer()?.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    fn flush(&mut self) -> led_movie::Result<()> {
        if let Some(writer) = &mut self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}
