use crate::model::Board;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub trait Storage {
    /// Charge un board depuis un support.
    fn load(&self) -> anyhow::Result<Board>;
    /// Sauvegarde de manière atomique.
    fn save(&self, board: &Board) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }

    /// Board vide si le fichier n'existe pas encore (premier lancement).
    pub fn load_or_empty(&self) -> anyhow::Result<Board> {
        if !self.path.exists() {
            return Ok(Board::default());
        }
        self.load()
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Board> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let board: Board = serde_json::from_slice(&data).with_context(|| "parsing board.json")?;
        Ok(board)
    }

    fn save(&self, board: &Board) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(board)?;
        let mut tmp =
            NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
                .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
