use std::{
    fs::File,
    io::{self, BufReader, Read, Seek},
    path::Path,
};

use savecheck_core::binary::{self, Deserializer};
use savecheck_format::{check_save, HeaderError, SaveBody, SaveCheck, VersionDescriptor};
use tracing::debug;

/// Everything that can happen to one file.
#[derive(Debug)]
pub enum FileReport {
    NotFound(io::Error),
    /// The file opened but its length could not be determined.
    Unreadable(binary::Error),
    HeaderUnreadable(HeaderError),
    Checked(SaveCheck),
}

impl FileReport {
    pub fn is_failure(&self) -> bool {
        match self {
            FileReport::NotFound(_)
            | FileReport::Unreadable(_)
            | FileReport::HeaderUnreadable(_) => true,
            FileReport::Checked(check) => match &check.body {
                SaveBody::NotCompressed => false,
                SaveBody::Chunks(outcome) => !outcome.is_success(),
            },
        }
    }
}

/// Opens and checks one save. The file is closed before this returns, whatever the outcome.
pub fn check_path(path: &Path, versions: &impl VersionDescriptor) -> FileReport {
    debug!("Opening save");
    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            debug!(%error, "Cannot open save");
            return FileReport::NotFound(error);
        }
    };
    check_stream(BufReader::new(file), versions)
}

pub fn check_stream(reader: impl Read + Seek, versions: &impl VersionDescriptor) -> FileReport {
    let mut deserializer = match Deserializer::new(reader) {
        Ok(deserializer) => deserializer,
        Err(error) => return FileReport::Unreadable(error),
    };
    debug!(len = deserializer.stream_len(), "Checking save");
    match check_save(&mut deserializer, versions) {
        Ok(check) => FileReport::Checked(check),
        Err(error) => FileReport::HeaderUnreadable(error),
    }
}
