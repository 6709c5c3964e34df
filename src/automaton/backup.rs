//! Backing up an automaton and resuming it later.
//!
//! A backup is a folder holding the committed generation file under `grid/` and
//! the scalar state as `properties.json`.

use std::fs;
use std::path::Path;

use log::info;

use super::grid::GridStore;
use super::lattice::NeighborhoodCache;
use super::stepping::{
    create_grid_folder, generation_file_name, Aether5D, GRID_FOLDER_NAME, MIN_INITIAL_VALUE,
};
use crate::config::Settings;
use crate::error::{AetherError, Result};
use crate::state::Properties;

pub const PROPERTIES_FILE_NAME: &str = "properties.json";

impl Aether5D {
    /// Scalar state that, together with the current generation, resumes this run.
    pub fn properties(&self) -> Properties {
        Properties {
            initial_value: self.initial_value,
            step: self.step,
            max_v: self.max_v,
            changed: self.changed,
        }
    }

    /// Write a backup to `<backup_path>/<name>`, replacing whatever was there.
    pub fn backup(&self, backup_path: impl AsRef<Path>, name: &str) -> Result<()> {
        let folder = backup_path.as_ref().join(name);
        if folder.exists() {
            fs::remove_dir_all(&folder)?;
        }
        let grid_folder = folder.join(GRID_FOLDER_NAME);
        fs::create_dir_all(&grid_folder)?;

        fs::copy(
            self.grid.path(),
            grid_folder.join(generation_file_name(self.step)),
        )?;
        let json = serde_json::to_string_pretty(&self.properties())?;
        fs::write(folder.join(PROPERTIES_FILE_NAME), json)?;
        info!("backed up step {} to {}", self.step, folder.display());
        Ok(())
    }

    /// Resume from a backup folder, writing new generations under `folder`.
    ///
    /// The backed-up generation is read in place and survives the next step.
    pub fn restore(backup_path: impl AsRef<Path>, folder: impl AsRef<Path>) -> Result<Self> {
        Self::restore_with_settings(backup_path, folder, Settings::default())
    }

    pub fn restore_with_settings(
        backup_path: impl AsRef<Path>,
        folder: impl AsRef<Path>,
        settings: Settings,
    ) -> Result<Self> {
        let backup_path = backup_path.as_ref();
        let backup_grid_folder = backup_path.join(GRID_FOLDER_NAME);
        if !backup_grid_folder.is_dir() {
            return Err(AetherError::MissingGridFolder(backup_grid_folder));
        }
        let json = fs::read_to_string(backup_path.join(PROPERTIES_FILE_NAME))?;
        let properties: Properties = serde_json::from_str(&json)?;
        if properties.initial_value < MIN_INITIAL_VALUE {
            return Err(AetherError::InitialValueTooSmall {
                value: properties.initial_value,
                min: MIN_INITIAL_VALUE,
            });
        }
        let grid_file = backup_grid_folder.join(generation_file_name(properties.step));
        if !grid_file.is_file() {
            return Err(AetherError::MissingGridFile(grid_file));
        }
        let grid = GridStore::open(grid_file)?;
        let grid_folder = create_grid_folder(folder.as_ref(), properties.initial_value)?;
        info!(
            "restored step {} of initial value {} from {}",
            properties.step,
            properties.initial_value,
            backup_path.display()
        );
        Ok(Aether5D {
            initial_value: properties.initial_value,
            step: properties.step,
            max_v: properties.max_v,
            changed: properties.changed,
            grid,
            grid_folder,
            reading_backup: true,
            settings,
            cache: NeighborhoodCache::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::lattice::Position;
    use crate::tests::scratch_dir;

    #[test]
    fn test_backup_layout() {
        let dir = scratch_dir("backup_layout");
        let mut aether = Aether5D::new(1_000_000, dir.join("work")).unwrap();
        aether.next_step().unwrap();
        aether.backup(dir.join("backups"), "first").unwrap();

        let folder = dir.join("backups").join("first");
        assert!(folder.join("grid").join("step=1.data").is_file());
        let json = fs::read_to_string(folder.join("properties.json")).unwrap();
        let properties: Properties = serde_json::from_str(&json).unwrap();
        assert_eq!(properties, aether.properties());
        assert_eq!(properties.changed, Some(true));

        aether.close().unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_backup_replaces_previous_contents() {
        let dir = scratch_dir("backup_replace");
        let mut aether = Aether5D::new(500, dir.join("work")).unwrap();
        aether.backup(dir.join("backups"), "slot").unwrap();
        aether.next_step().unwrap();
        aether.backup(dir.join("backups"), "slot").unwrap();

        let grid = dir.join("backups").join("slot").join("grid");
        assert!(!grid.join("step=0.data").exists());
        assert!(grid.join("step=1.data").is_file());
        aether.close().unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_restore_resumes_state() {
        let dir = scratch_dir("backup_restore");
        let mut aether = Aether5D::new(1_000_000, dir.join("work")).unwrap();
        aether.next_step().unwrap();
        aether.backup(dir.join("backups"), "b").unwrap();
        aether.close().unwrap();

        let restored = Aether5D::restore(dir.join("backups").join("b"), dir.join("work")).unwrap();
        assert_eq!(restored.step(), 1);
        assert_eq!(restored.size(), 6);
        assert_eq!(restored.is_changed(), Some(true));
        assert_eq!(restored.initial_value(), 1_000_000);
        assert_eq!(restored.get_from_position(Position::ORIGIN).unwrap(), 90_910);
        assert_eq!(
            restored.get_from_position(Position::new(1, 0, 0, 0, 0)).unwrap(),
            90_909
        );
        restored.close().unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_restore_next_to_live_run() {
        let dir = scratch_dir("backup_live");
        let mut live = Aether5D::new(1_000_000, dir.join("work")).unwrap();
        live.next_step().unwrap();
        live.backup(dir.join("backups"), "b").unwrap();

        let mut restored = Aether5D::restore(dir.join("backups").join("b"), dir.join("work")).unwrap();
        assert_ne!(restored.grid_folder(), live.grid_folder());
        assert!(live.grid_folder().join("step=1.data").is_file());

        restored.next_step().unwrap();
        restored.close().unwrap();
        live.next_step().unwrap();
        assert_eq!(live.step(), 2);
        assert_eq!(live.get_from_position(Position::new(1, 1, 0, 0, 0)).unwrap(), 18_180);
        live.close().unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_restore_missing_grid_folder() {
        let dir = scratch_dir("backup_no_grid");
        fs::write(dir.join("properties.json"), "{}").unwrap();
        let err = Aether5D::restore(&dir, dir.join("work")).err().unwrap();
        assert!(matches!(err, AetherError::MissingGridFolder(_)));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_restore_missing_grid_file() {
        let dir = scratch_dir("backup_no_file");
        fs::create_dir_all(dir.join("grid")).unwrap();
        fs::write(
            dir.join("properties.json"),
            r#"{"initialValue":10,"step":3,"maxV":6,"changed":true}"#,
        )
        .unwrap();
        let err = Aether5D::restore(&dir, dir.join("work")).err().unwrap();
        assert!(matches!(err, AetherError::MissingGridFile(path) if path.ends_with("step=3.data")));
        assert!(!dir.join("work").exists(), "failed restore should not create folders");
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_restore_corrupt_properties() {
        let dir = scratch_dir("backup_corrupt");
        fs::create_dir_all(dir.join("grid")).unwrap();
        fs::write(dir.join("properties.json"), "{\"initialValue\": \"ten\"").unwrap();
        let err = Aether5D::restore(&dir, dir.join("work")).err().unwrap();
        assert!(matches!(err, AetherError::CorruptBackup(_)));
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_restore_missing_properties() {
        let dir = scratch_dir("backup_no_properties");
        fs::create_dir_all(dir.join("grid")).unwrap();
        let err = Aether5D::restore(&dir, dir.join("work")).err().unwrap();
        assert!(matches!(err, AetherError::Io(_)));
        fs::remove_dir_all(&dir).unwrap();
    }
}
