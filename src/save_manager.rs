use crate::core::{SAVE_FILE_NAME, SAVE_VERSION_MAGIC};
use crate::gateway::PersistenceGateway;
use crate::ledger::PlayerLedger;
use directories::ProjectDirs;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Saves and loads the player ledger in a checksummed binary format
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    /// Creates a new SaveManager instance
    ///
    /// Sets up the save directory at the appropriate location for the platform
    /// using the `directories` crate.
    pub fn new() -> io::Result<Self> {
        let project_dirs = ProjectDirs::from("", "", "diamond-hunt").ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            )
        })?;

        let data_dir = project_dirs.data_dir();
        fs::create_dir_all(data_dir)?;

        Ok(Self {
            save_path: data_dir.join(SAVE_FILE_NAME),
        })
    }

    /// Uses an explicit save file, creating its parent directory if needed
    pub fn with_path(path: impl Into<PathBuf>) -> io::Result<Self> {
        let save_path = path.into();
        if let Some(parent) = save_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { save_path })
    }

    pub fn save_path(&self) -> &Path {
        &self.save_path
    }

    /// Checks if a save file exists
    pub fn save_exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Deletes the save file if there is one
    pub fn delete(&self) -> io::Result<()> {
        match fs::remove_file(&self.save_path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }

    /// Writes the ledger to disk
    ///
    /// File format:
    /// - Version magic (8 bytes)
    /// - Data length (4 bytes)
    /// - Serialized ledger (variable length)
    /// - SHA256 checksum (32 bytes)
    ///
    /// The file is written to a sibling temp file first and renamed into place,
    /// so a crash mid-write leaves the previous save intact.
    pub fn write(&self, ledger: &PlayerLedger) -> io::Result<()> {
        let data =
            bincode::serialize(ledger).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let data_len = data.len() as u32;

        // Compute checksum over version + length + data
        let mut hasher = Sha256::new();
        hasher.update(SAVE_VERSION_MAGIC.to_le_bytes());
        hasher.update(data_len.to_le_bytes());
        hasher.update(&data);
        let checksum = hasher.finalize();

        let tmp_path = self.save_path.with_extension("tmp");
        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(&SAVE_VERSION_MAGIC.to_le_bytes())?;
            file.write_all(&data_len.to_le_bytes())?;
            file.write_all(&data)?;
            file.write_all(&checksum)?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, &self.save_path)?;

        Ok(())
    }

    /// Reads the ledger from disk with checksum verification
    ///
    /// Returns an error if:
    /// - The file doesn't exist
    /// - The version magic is incorrect
    /// - The stored data length runs past the end of the file
    /// - The checksum verification fails
    /// - The data cannot be deserialized
    pub fn read(&self) -> io::Result<PlayerLedger> {
        let mut file = fs::File::open(&self.save_path)?;

        // Read and verify version magic
        let mut version_bytes = [0u8; 8];
        file.read_exact(&mut version_bytes)?;
        let version = u64::from_le_bytes(version_bytes);

        if version != SAVE_VERSION_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Invalid save version: expected 0x{:016X}, got 0x{:016X}",
                    SAVE_VERSION_MAGIC, version
                ),
            ));
        }

        let mut length_bytes = [0u8; 4];
        file.read_exact(&mut length_bytes)?;
        let data_len = u32::from_le_bytes(length_bytes);

        // magic + length + data + checksum must fit in the file
        let file_len = file.metadata()?.len();
        if 8 + 4 + u64::from(data_len) + 32 > file_len {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "Save data length {} exceeds file size {}",
                    data_len, file_len
                ),
            ));
        }

        let mut data = vec![0u8; data_len as usize];
        file.read_exact(&mut data)?;

        let mut stored_checksum = [0u8; 32];
        file.read_exact(&mut stored_checksum)?;

        let mut hasher = Sha256::new();
        hasher.update(version_bytes);
        hasher.update(length_bytes);
        hasher.update(&data);
        let computed_checksum = hasher.finalize();

        if stored_checksum != computed_checksum.as_slice() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "Checksum verification failed",
            ));
        }

        bincode::deserialize(&data).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Creates a SaveManager for testing with a unique temporary directory
    #[cfg(test)]
    fn new_for_test() -> io::Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

        let test_id = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let temp_dir = std::env::temp_dir().join(format!(
            "diamond-hunt-test-{}-{}",
            std::process::id(),
            test_id
        ));
        Self::with_path(temp_dir.join(SAVE_FILE_NAME))
    }
}

impl PersistenceGateway for SaveManager {
    fn load(&mut self) -> io::Result<Option<PlayerLedger>> {
        match self.read() {
            Ok(ledger) => Ok(Some(ledger)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn save(&mut self, ledger: &PlayerLedger) -> io::Result<()> {
        self.write(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{GameRecord, RoundResult};
    use crate::power_ups::PowerUpKind;
    use uuid::Uuid;

    fn sample_ledger() -> PlayerLedger {
        let mut ledger = PlayerLedger {
            credits: 1234,
            ..Default::default()
        };
        ledger.power_ups.grant(PowerUpKind::SafeReveal);
        ledger.record_game(GameRecord {
            round_id: Uuid::new_v4(),
            timestamp: 1_700_000_000,
            bet: 100,
            result: RoundResult::CashOut,
            profit: 104,
            grid_size: 16,
            bomb_count: 2,
        });
        ledger
    }

    #[test]
    fn test_save_and_load() {
        let mut manager = SaveManager::new_for_test().expect("Failed to create SaveManager");
        let original = sample_ledger();

        manager.save(&original).expect("Failed to save ledger");
        assert!(manager.save_exists());

        let loaded = manager.load().expect("Failed to load ledger");
        assert_eq!(loaded, Some(original));

        manager.delete().expect("Failed to remove save file");
    }

    #[test]
    fn test_load_nonexistent_is_none() {
        let mut manager = SaveManager::new_for_test().expect("Failed to create SaveManager");
        assert!(!manager.save_exists());
        assert_eq!(manager.load().unwrap(), None);
        assert_eq!(
            manager.read().unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }

    #[test]
    fn test_corrupted_file_fails_checksum() {
        let mut manager = SaveManager::new_for_test().expect("Failed to create SaveManager");
        manager.save(&sample_ledger()).unwrap();

        let mut bytes = fs::read(manager.save_path()).unwrap();
        let last_data_byte = bytes.len() - 33;
        bytes[last_data_byte] ^= 0xFF;
        fs::write(manager.save_path(), bytes).unwrap();

        let err = manager.load().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("Checksum"));

        manager.delete().unwrap();
    }

    #[test]
    fn test_wrong_magic_rejected() {
        let manager = SaveManager::new_for_test().expect("Failed to create SaveManager");
        fs::write(manager.save_path(), [0u8; 64]).unwrap();

        let err = manager.read().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("Invalid save version"));

        manager.delete().unwrap();
    }

    #[test]
    fn test_oversized_length_field_rejected() {
        let manager = SaveManager::new_for_test().expect("Failed to create SaveManager");
        let mut bytes = SAVE_VERSION_MAGIC.to_le_bytes().to_vec();
        bytes.extend_from_slice(&u32::MAX.to_le_bytes());
        bytes.extend_from_slice(&[0u8; 40]);
        fs::write(manager.save_path(), bytes).unwrap();

        let err = manager.read().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert!(err.to_string().contains("exceeds file size"));

        manager.delete().unwrap();
    }

    #[test]
    fn test_delete_missing_file_is_ok() {
        let manager = SaveManager::new_for_test().expect("Failed to create SaveManager");
        assert!(manager.delete().is_ok());
    }
}
