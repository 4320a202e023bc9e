use crate::{
    config::{MonolithConfig, CONFIG_DIR, CONFIG_FILE},
    domain::{Collection, Record},
    error::{MonolithError, Result},
    storage::Storage,
};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// File-based storage implementation
///
/// Each document lives at `.monolith/<collection>/<id>.json`.
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(CONFIG_DIR),
        }
    }

    fn collection_dir(&self, collection: Collection) -> PathBuf {
        self.root_path.join(collection.as_str())
    }

    fn document_file(&self, collection: Collection, id: &str) -> PathBuf {
        self.collection_dir(collection).join(format!("{}.json", id))
    }

    fn config_file(&self) -> PathBuf {
        self.root_path.join(CONFIG_FILE)
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }

    async fn read_document(path: &Path) -> Result<Value> {
        let contents = fs::read_to_string(path).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Copies the top-level fields of `update` over `existing`
fn merge_document(existing: Value, update: Value) -> Value {
    match (existing, update) {
        (Value::Object(mut base), Value::Object(fields)) => {
            base.extend(fields);
            Value::Object(base)
        }
        (_, update) => update,
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn initialize(&self) -> Result<()> {
        self.ensure_directory_exists(&self.root_path).await?;
        for collection in Collection::ALL {
            self.ensure_directory_exists(&self.collection_dir(collection))
                .await?;
        }

        // Write a default config so it can be edited in place
        let config_path = self.config_file();
        if !config_path.exists() {
            let contents = MonolithConfig::default()
                .to_toml()
                .map_err(|e| MonolithError::ConfigError(e.to_string()))?;
            fs::write(&config_path, contents).await?;
        }

        info!(root = %self.root_path.display(), "initialized store");
        Ok(())
    }

    async fn upsert(&self, record: &Record) -> Result<()> {
        let collection = record.collection();
        self.ensure_directory_exists(&self.collection_dir(collection))
            .await?;

        let file_path = self.document_file(collection, record.id());
        let update = record.to_document()?;
        let document = if file_path.exists() {
            merge_document(Self::read_document(&file_path).await?, update)
        } else {
            update
        };

        fs::write(&file_path, serde_json::to_string_pretty(&document)?).await?;
        debug!(%collection, id = record.id(), "upserted document");
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let file_path = self.document_file(collection, id);

        if file_path.exists() {
            fs::remove_file(file_path).await?;
            debug!(%collection, id, "deleted document");
        }
        Ok(())
    }

    async fn load_document(&self, collection: Collection, id: &str) -> Result<Value> {
        let file_path = self.document_file(collection, id);

        if !file_path.exists() {
            return Err(MonolithError::RecordNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        Self::read_document(&file_path).await
    }

    async fn load_collection(&self, collection: Collection) -> Result<Vec<Value>> {
        let dir = self.collection_dir(collection);

        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = fs::read_dir(&dir).await?;
        let mut paths: Vec<PathBuf> = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) == Some("json") {
                paths.push(path);
            }
        }

        paths.sort();
        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            documents.push(Self::read_document(&path).await?);
        }

        Ok(documents)
    }

    async fn is_initialized(&self) -> bool {
        self.root_path.exists() && self.config_file().exists()
    }
}
