//! Vendor driver backend
//!
//! On systems where user code cannot execute port instructions, a kernel
//! driver with a user-space shim library (inpout32/inpoutx64 and
//! compatibles) does the access. The library exports:
//!
//! ```text
//! void          DlPortWritePortUchar(short port, short value)
//! unsigned char DlPortReadPortUchar(short port)
//! ```
//!
//! Both use the `stdcall` convention on 32-bit Windows.

use std::ffi::{c_short, c_uchar};
use std::path::{Path, PathBuf};

use libloading::Library;
use paraport_hal::PortIo;

use crate::error::InitError;

/// Library name, without platform prefix or extension
pub const DRIVER_NAME: &str = "inpoutx64";

/// Read entry point
pub const READ_SYMBOL: &str = "DlPortReadPortUchar";

/// Write entry point
pub const WRITE_SYMBOL: &str = "DlPortWritePortUchar";

type ReadFn = unsafe extern "system" fn(c_short) -> c_uchar;
type WriteFn = unsafe extern "system" fn(c_short, c_short);

/// Port backend calling into a vendor driver library
pub struct VendorDriverPortIo {
    read: ReadFn,
    write: WriteFn,
    path: PathBuf,
    // Keeps the entry points valid
    _library: Library,
}

impl VendorDriverPortIo {
    /// Load the driver library at `path` and resolve its entry points
    pub fn load(path: impl AsRef<Path>) -> Result<Self, InitError> {
        let path = path.as_ref().to_path_buf();

        // SAFETY: loading runs the library's initializers; the library is
        // trusted as the configured port driver.
        let library = unsafe { Library::new(&path) }.map_err(|source| InitError::DriverLoad {
            path: path.clone(),
            source,
        })?;

        // SAFETY: the declared signatures match the driver's exports, and the
        // copied function pointers never outlive `library`, which is stored
        // alongside them.
        let read = unsafe { library.get::<ReadFn>(READ_SYMBOL.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|source| InitError::DriverSymbol {
                path: path.clone(),
                symbol: READ_SYMBOL,
                source,
            })?;
        let write = unsafe { library.get::<WriteFn>(WRITE_SYMBOL.as_bytes()) }
            .map(|symbol| *symbol)
            .map_err(|source| InitError::DriverSymbol {
                path: path.clone(),
                symbol: WRITE_SYMBOL,
                source,
            })?;

        log::info!("loaded port driver {}", path.display());
        Ok(Self {
            read,
            write,
            path,
            _library: library,
        })
    }

    /// Default driver location: `inpoutx64/<library file>` next to the
    /// running executable
    pub fn default_path() -> Option<PathBuf> {
        let exe = std::env::current_exe().ok()?;
        let dir = exe.parent()?;
        Some(
            dir.join(DRIVER_NAME)
                .join(libloading::library_filename(DRIVER_NAME)),
        )
    }

    /// Path the driver was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PortIo for VendorDriverPortIo {
    fn read_byte(&self, address: u16) -> u8 {
        // SAFETY: entry point resolved in `load`; the library is still loaded.
        unsafe { (self.read)(address as c_short) }
    }

    fn write_byte(&self, address: u16, value: u8) {
        // SAFETY: as for `read_byte`.
        unsafe { (self.write)(address as c_short, value as c_short) }
    }
}

impl std::fmt::Debug for VendorDriverPortIo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorDriverPortIo")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
