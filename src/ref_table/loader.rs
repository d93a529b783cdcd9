//! Load-once cache for reference tables.
//!
//! A [`RefTableLoader`] reads its resource on first use and keeps the result
//! for its whole lifetime. A failed load is cached too: the failure is logged
//! once and every later call sees "no table" without touching the disk again.

use super::{RefTable, SourceKind};
use bon::bon;
use log::{error, info};
use std::path::PathBuf;
use std::sync::{LazyLock, OnceLock};

/// Environment variable overriding the directory that holds the resources.
pub const DATA_DIR_ENV: &str = "LOST_YEARS_DATA_DIR";

// ===============================================
// SOURCE CONFIGURATION
// ===============================================

/// Where a source's reference resource lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSourceConfig {
    pub source: SourceKind,
    pub path: PathBuf,
}

#[bon]
impl DataSourceConfig {
    /// Build a configuration; the path defaults to
    /// `<data dir>/<tag>/<file>` (see [`default_data_dir`]).
    #[builder]
    pub fn new(source: SourceKind, #[builder(into)] path: Option<PathBuf>) -> Self {
        let path = path.unwrap_or_else(|| default_data_dir().join(source.default_relative_path()));
        Self { source, path }
    }
}

/// `$LOST_YEARS_DATA_DIR` when set, otherwise `data/` under the crate root.
pub fn default_data_dir() -> PathBuf {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"),
    }
}

// ===============================================
// LOADER
// ===============================================

/// Lazily loads one reference table and caches it.
///
/// Initialization goes through a [`OnceLock`]: concurrent first callers block
/// until the single load completes, and the first result wins.
#[derive(Debug)]
pub struct RefTableLoader {
    config: DataSourceConfig,
    cache: OnceLock<Option<RefTable>>,
}

impl RefTableLoader {
    pub fn new(config: DataSourceConfig) -> Self {
        Self {
            config,
            cache: OnceLock::new(),
        }
    }

    /// Loader for `source` at its default location.
    pub fn for_source(source: SourceKind) -> Self {
        Self::new(DataSourceConfig::builder().source(source).build())
    }

    /// Loader whose cache is already populated with `table`.
    pub fn preloaded(table: RefTable) -> Self {
        let config = DataSourceConfig::builder().source(table.source).build();
        Self {
            config,
            cache: OnceLock::from(Some(table)),
        }
    }

    pub fn source(&self) -> SourceKind {
        self.config.source
    }

    pub fn config(&self) -> &DataSourceConfig {
        &self.config
    }

    /// Whether the cache has been populated (successfully or not).
    pub fn is_initialized(&self) -> bool {
        self.cache.get().is_some()
    }

    /// The cached table, loading it on first call. `None` means the resource
    /// was missing or malformed; the reason was logged when it was loaded.
    pub fn table(&self) -> Option<&RefTable> {
        self.cache.get_or_init(|| self.load()).as_ref()
    }

    fn load(&self) -> Option<RefTable> {
        let DataSourceConfig { source, path } = &self.config;
        info!("Loading {source} reference data from {}", path.display());

        match RefTable::from_path(*source, path) {
            Ok(table) => {
                info!("Loaded {} ({source}): {} records", table.description, table.len());
                if source.is_stratified() {
                    info!("Countries: {}", table.country_count());
                }
                if let Some((year_min, year_max)) = table.year_range() {
                    info!("Year range: {year_min}-{year_max}");
                }
                Some(table)
            }
            Err(e) => {
                error!("Error loading {source} reference data: {e}");
                error!("No {source} matches are possible until the resource is provided");
                None
            }
        }
    }
}

// ===============================================
// PROCESS-WIDE DEFAULT LOADERS
// ===============================================

static SSA_LOADER: LazyLock<RefTableLoader> =
    LazyLock::new(|| RefTableLoader::for_source(SourceKind::Ssa));
static WHO_LOADER: LazyLock<RefTableLoader> =
    LazyLock::new(|| RefTableLoader::for_source(SourceKind::Who));
static HLD_LOADER: LazyLock<RefTableLoader> =
    LazyLock::new(|| RefTableLoader::for_source(SourceKind::Hld));

/// The shared loader used when a caller does not inject one.
pub fn default_loader(source: SourceKind) -> &'static RefTableLoader {
    match source {
        SourceKind::Ssa => &*SSA_LOADER,
        SourceKind::Who => &*WHO_LOADER,
        SourceKind::Hld => &*HLD_LOADER,
    }
}
