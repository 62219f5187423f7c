//! Where a city's trips come from.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::city::City;
use crate::error::{BikeshareError, Result};
use crate::parser::parse_trips;
use crate::record::RecordStore;

/// Supplies the full trip log of a city.
pub trait TripSource {
    /// # Errors
    ///
    /// [`BikeshareError::SourceUnavailable`] if the backing data cannot be
    /// read, [`BikeshareError::DataFormat`] if it cannot be parsed.
    fn load(&self, city: City) -> Result<RecordStore>;
}

/// Reads `<data_dir>/<city file>` CSV logs.
#[derive(Debug, Clone)]
pub struct CsvDirectory {
    data_dir: PathBuf,
}

impl CsvDirectory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn path_for(&self, city: City) -> PathBuf {
        self.data_dir.join(city.file_name())
    }
}

impl TripSource for CsvDirectory {
    #[tracing::instrument(skip_all, fields(city = %city))]
    fn load(&self, city: City) -> Result<RecordStore> {
        let path = self.path_for(city);
        let file = File::open(&path).map_err(|source| BikeshareError::SourceUnavailable {
            city: city.to_string(),
            path: path.display().to_string(),
            source,
        })?;

        let store = parse_trips(BufReader::new(file))?;
        info!(path = %path.display(), rows = store.len(), "Trip log loaded");
        Ok(store)
    }
}
