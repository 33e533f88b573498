use rusqlite;

/// Result type for catalog operations
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-specific errors
#[derive(Debug)]
pub enum CatalogError {
    /// SQLite errors
    Database(rusqlite::Error),

    /// A filename that must be unique already exists
    DuplicateFilename(String),

    /// Referenced item ids absent from the catalog
    MissingItems(Vec<i64>),

    /// Outfit creation attempted with no members
    EmptyOutfit,

    /// Item cannot be removed while an outfit references it
    ItemReferenced(i64),

    /// Errors during database initialization
    Initialization(String),
}

impl From<rusqlite::Error> for CatalogError {
    fn from(err: rusqlite::Error) -> Self {
        CatalogError::Database(err)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Database(err) => write!(f, "Database error: {}", err),
            Self::DuplicateFilename(name) => write!(f, "Filename already catalogued: {}", name),
            Self::MissingItems(ids) => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                write!(f, "Items not found: {}", ids.join(", "))
            }
            Self::EmptyOutfit => write!(f, "An outfit needs at least one item"),
            Self::ItemReferenced(id) => {
                write!(f, "Item {} is referenced by an outfit and cannot be removed", id)
            }
            Self::Initialization(msg) => write!(f, "Database initialization error: {}", msg),
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Database(err) => Some(err),
            _ => None,
        }
    }
}

// Implement conversion from CatalogError to the main Error type
impl From<CatalogError> for crate::Error {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::MissingItems(ids) => crate::Error::NotFound(ids),
            CatalogError::EmptyOutfit => {
                crate::Error::Validation("an outfit needs at least one item".to_string())
            }
            CatalogError::DuplicateFilename(name) => {
                crate::Error::Validation(format!("filename already catalogued: {}", name))
            }
            CatalogError::ItemReferenced(id) => crate::Error::Validation(format!(
                "item {} is referenced by an outfit and cannot be removed",
                id
            )),
            other => crate::Error::Catalog(other.to_string()),
        }
    }
}
