//! Binary serialization for catalogs using postcard.

use super::Catalog;
use super::json::CatalogError;

impl Catalog {
    /// Deserialize catalog from binary format.
    pub fn from_binary(bytes: &[u8]) -> Result<Self, CatalogError> {
        postcard::from_bytes(bytes).map_err(CatalogError::Binary)
    }

    /// Serialize catalog to binary format.
    pub fn to_binary(&self) -> Result<Vec<u8>, CatalogError> {
        postcard::to_allocvec(self).map_err(CatalogError::Binary)
    }
}
