use std::path::Path;

use {
    anyhow::Context,
    clap::Subcommand,
    regina_store::{Joke, JokeStore, SqliteStore},
};

#[derive(Subcommand)]
pub enum JokesAction {
    /// Add a joke with a usage count of zero.
    Add {
        /// Joke text.
        text: String,
    },
    /// List all jokes with their usage counts.
    List,
}

pub async fn handle_jokes(action: JokesAction, db_path: &Path) -> anyhow::Result<()> {
    let store = SqliteStore::open(db_path)
        .await
        .context("run `regina db init` first")?;
    match action {
        JokesAction::Add { text } => {
            let text = text.trim();
            anyhow::ensure!(!text.is_empty(), "joke text must not be empty");
            let id = store.add_joke(text).await?;
            println!("Added joke {id}");
        },
        JokesAction::List => {
            let jokes = store.list_jokes().await?;
            if jokes.is_empty() {
                println!("No jokes found.");
            } else {
                println!("{:>5}  {:>5}  JOKE", "ID", "USED");
                for joke in &jokes {
                    println!("{}", format_row(joke));
                }
            }
        },
    }
    Ok(())
}

fn format_row(joke: &Joke) -> String {
    format!("{:>5}  {:>5}  {}", joke.id, joke.usage_count, joke.text.replace('\n', " "))
}
