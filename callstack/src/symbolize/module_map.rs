//! Executable memory regions of the running process.
//!
//! The OS describes a process's address space as a textual listing, one
//! mapping per line. Parsing it once yields the address ranges of every
//! loaded binary, which is the fallback used to name a module when the
//! dynamic loader knows nothing about an address.
//!
//! The table is built lazily on first use and cached for the process
//! lifetime. It is never refreshed: a library loaded after the first
//! lookup will not be found, matching the cold-start-then-read-only
//! contract the rest of the crate relies on.

use log::{info, warn};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapsError {
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("memory-map listing is not available on this platform")]
    Unsupported,
}

/// One executable mapping: half-open address range plus owning path.
#[derive(Debug, Clone)]
struct Region {
    start: usize,
    end: usize,
    path: String,
}

impl Region {
    fn contains(&self, address: usize) -> bool {
        address >= self.start && address < self.end
    }
}

/// Process-wide table of executable regions.
#[derive(Debug, Default)]
pub struct ModuleMap {
    regions: Vec<Region>,
}

impl ModuleMap {
    /// Parse a memory-map listing, retaining only executable, named
    /// regions.
    ///
    /// Lines look like:
    /// `08048000-08056000 r-xp 00000000 03:0c 64593   /usr/sbin/gpm`
    #[must_use]
    pub fn parse(maps: &str) -> Self {
        let mut regions: Vec<Region> = maps.lines().filter_map(parse_line).collect();
        regions.sort_by_key(|region| region.start);
        Self { regions }
    }

    /// Read and parse this process's own mapping description.
    ///
    /// # Errors
    /// [`MapsError::Unreadable`] when the listing exists but cannot be
    /// read, [`MapsError::Unsupported`] where the OS has no such listing.
    pub fn load() -> Result<Self, MapsError> {
        #[cfg(target_os = "linux")]
        {
            let path = "/proc/self/maps";
            let maps = std::fs::read_to_string(path).map_err(|source| MapsError::Unreadable {
                path: path.to_owned(),
                source,
            })?;
            Ok(Self::parse(&maps))
        }
        #[cfg(not(target_os = "linux"))]
        {
            Err(MapsError::Unsupported)
        }
    }

    /// The process-wide map, built on first use.
    ///
    /// When the listing is unavailable the failure is logged once and every
    /// lookup on the empty map returns `None`; rendering then degrades to
    /// `<unknown>` modules.
    pub fn current() -> &'static ModuleMap {
        static MAP: OnceLock<ModuleMap> = OnceLock::new();
        MAP.get_or_init(|| match ModuleMap::load() {
            Ok(map) => {
                info!("module map: {} executable regions", map.regions.len());
                map
            }
            Err(err) => {
                warn!("module map unavailable: {err}; modules will render as unknown");
                ModuleMap::default()
            }
        })
    }

    /// Path of the executable mapping containing `address`, if any.
    #[must_use]
    pub fn module_for(&self, address: usize) -> Option<&str> {
        let candidates = self.regions.partition_point(|region| region.start <= address);
        let region = self.regions[..candidates].last()?;
        region.contains(address).then(|| region.path.as_str())
    }
}

fn parse_line(line: &str) -> Option<Region> {
    // address           perms offset  dev   inode   pathname
    let mut fields = line.split_whitespace();
    let range = fields.next()?;
    let perms = fields.next()?;
    let _offset = fields.next()?;
    let _dev = fields.next()?;
    let _inode = fields.next()?;
    // A path with spaces keeps only its first token, as scanf-style readers
    // of this format do.
    let path = fields.next()?;

    if perms.as_bytes().get(2) != Some(&b'x') {
        return None;
    }
    let (start, end) = range.split_once('-')?;
    let start = usize::from_str_radix(start, 16).ok()?;
    let end = usize::from_str_radix(end, 16).ok()?;
    Some(Region {
        start,
        end,
        path: path.to_owned(),
    })
}
