use std::path::Path;

use {
    clap::Subcommand,
    regina_store::{JokeStore, SqliteStore},
};

#[derive(Subcommand)]
pub enum DbAction {
    /// Create the database file (and parent directories) with the schema.
    Init,
}

pub async fn handle_db(action: DbAction, db_path: &Path) -> anyhow::Result<()> {
    match action {
        DbAction::Init => init(db_path).await,
    }
}

async fn init(db_path: &Path) -> anyhow::Result<()> {
    let existed = db_path.exists();
    let store = SqliteStore::create(db_path).await?;
    let jokes = store.list_jokes().await?.len();
    if existed {
        println!("Schema checked: {} ({jokes} jokes)", db_path.display());
    } else {
        println!("Created: {}", db_path.display());
        println!("Add jokes with `regina jokes add \"...\"`.");
    }
    Ok(())
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn init_creates_nested_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("data").join("regina.db");

        handle_db(DbAction::Init, &path).await.unwrap();
        assert!(path.exists());

        let store = SqliteStore::open(&path).await.unwrap();
        assert!(store.list_jokes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn init_keeps_existing_jokes() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("regina.db");
        SqliteStore::create(&path)
            .await
            .unwrap()
            .add_joke("kept")
            .await
            .unwrap();

        handle_db(DbAction::Init, &path).await.unwrap();

        let store = SqliteStore::open(&path).await.unwrap();
        assert_eq!(store.list_jokes().await.unwrap().len(), 1);
    }
}
