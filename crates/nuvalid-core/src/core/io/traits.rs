use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Common interface of the tabular output formats.
///
/// Implementors serialize one in-memory value into a single file. Formats that stream
/// row by row provide their own writer types in addition.
pub trait TableFile {
    /// The value written to one file.
    type Data: ?Sized;

    /// The error type for I/O operations.
    type Error: Error + From<io::Error>;

    /// Serializes `data` into `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the underlying write fails.
    fn write_to(data: &Self::Data, writer: &mut impl Write) -> Result<(), Self::Error>;

    /// Serializes `data` into a newly created file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or writing fails.
    fn write_to_path<P: AsRef<Path>>(data: &Self::Data, path: P) -> Result<(), Self::Error> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        Self::write_to(data, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
