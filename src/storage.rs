use crate::errors::StoreError;
use crate::models::Document;
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::{fs, sync::RwLock};

/// Whole-document key-value access. There are no partial updates and no
/// versioning: the last `set` wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self) -> Result<Option<Document>, StoreError>;
    async fn set(&self, document: &Document) -> Result<(), StoreError>;
}

/// Keeps the document as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentStore for FileStore {
    async fn get(&self) -> Result<Option<Document>, StoreError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn set(&self, document: &Document) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(document)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    document: RwLock<Option<Document>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: Document) -> Self {
        Self {
            document: RwLock::new(Some(document)),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self) -> Result<Option<Document>, StoreError> {
        Ok(self.document.read().await.clone())
    }

    async fn set(&self, document: &Document) -> Result<(), StoreError> {
        *self.document.write().await = Some(document.clone());
        Ok(())
    }
}
