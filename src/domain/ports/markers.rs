//! Marker Persistence Port

use std::path::Path;

use crate::domain::value_objects::FormatProperty;
use crate::error::RefitResult;

/// Port for recording which format properties of a manifest have been
/// processed, and by which compiler version.
pub trait MarkerRepository {
    /// Merge `{property: version}` entries into the marker of the
    /// manifest in `dir`. One commit covers a whole compilation run
    /// over the entry point.
    fn commit(&self, dir: &Path, properties: &[FormatProperty], version: &str) -> RefitResult<()>;

    /// Strip the marker from the manifest in `dir`.
    ///
    /// Returns whether a marker was present.
    fn clear(&self, dir: &Path) -> RefitResult<bool>;
}
