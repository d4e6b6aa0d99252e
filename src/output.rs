use anyhow::anyhow;
use formatx::formatx;
use std::fmt::Debug;
use std::io;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Somewhere a named report can be written to.
pub trait Output: Debug {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl OutputWriter>;
    /// Whether this output can be considered a no-op, so code that only writes to it can be
    /// skipped.
    fn is_noop(&self) -> bool {
        false
    }
}

/// A writer whose content only lands at its location once [`OutputWriter::finish`] succeeds.
/// Dropping it unfinished discards everything written so far.
pub trait OutputWriter: Write {
    fn finish(self) -> anyhow::Result<()>;
}

/// Writes each location key to its own file in a directory. The file name comes from a template
/// with one `{}` placeholder for the location key, e.g. `"readings__{}.csv"`.
#[derive(Debug)]
pub struct FileOutput {
    directory_path: PathBuf,
    file_template: String,
}

impl FileOutput {
    pub fn new(directory_path: PathBuf, file_template: String) -> Self {
        Self {
            directory_path,
            file_template,
        }
    }

    pub fn path_for_location_key(&self, location_key: &str) -> anyhow::Result<PathBuf> {
        let file_name = formatx!(&self.file_template, location_key).map_err(|e| {
            anyhow!(
                "Output file template '{}' is not usable: {e:?}",
                self.file_template
            )
        })?;

        Ok(self.directory_path.join(file_name))
    }
}

impl Output for FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl OutputWriter> {
        let target = self.path_for_location_key(location_key)?;
        let directory = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        Ok(FileWriter {
            writer: BufWriter::new(NamedTempFile::new_in(directory)?),
            target,
        })
    }
}

impl Output for &FileOutput {
    fn writer_for_location_key(&self, location_key: &str) -> anyhow::Result<impl OutputWriter> {
        <FileOutput as Output>::writer_for_location_key(self, location_key)
    }
}

/// Writes into a temporary file next to the target and renames it into place on finish.
#[derive(Debug)]
struct FileWriter {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
}

impl Write for FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl OutputWriter for FileWriter {
    fn finish(self) -> anyhow::Result<()> {
        let file = self.writer.into_inner().map_err(|e| e.into_error())?;
        file.as_file().sync_all()?;
        file.persist(&self.target)?;

        Ok(())
    }
}

/// An output that goes to nowhere/ a "sink"/ /dev/null.
#[derive(Debug, Default)]
pub struct SinkOutput;

impl Output for SinkOutput {
    fn writer_for_location_key(&self, _location_key: &str) -> anyhow::Result<impl OutputWriter> {
        Ok(io::sink())
    }

    fn is_noop(&self) -> bool {
        true
    }
}

impl OutputWriter for io::Sink {
    fn finish(self) -> anyhow::Result<()> {
        Ok(())
    }
}
