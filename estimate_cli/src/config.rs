//! Resolves CLI arguments into store settings and a project configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use estimate_core::calculations::suggest_related_areas;
use estimate_core::file_io::FileStorage;
use estimate_core::project::ProjectConfiguration;
use estimate_core::store::ProjectStore;

use crate::cli::{Cli, ConfigArgs};

/// Store location and lock identity
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub dir: PathBuf,
    pub user_id: String,
}

impl StoreSettings {
    pub fn from_cli(cli: &Cli) -> Self {
        let user_id = cli
            .user
            .clone()
            .or_else(|| std::env::var("USER").ok())
            .or_else(|| std::env::var("USERNAME").ok())
            .unwrap_or_else(|| "easybuild".to_string());

        StoreSettings {
            dir: cli.store_dir.clone(),
            user_id,
        }
    }

    pub fn open(&self) -> ProjectStore<FileStorage> {
        ProjectStore::new(FileStorage::new(&self.dir, &self.user_id))
    }
}

/// Read a configuration file. Missing optional fields take their defaults.
pub fn read_configuration(path: &Path) -> Result<ProjectConfiguration> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

/// Build the configuration: file (or starter estimate), then flag overrides,
/// then the optional area sync.
pub fn resolve_configuration(args: &ConfigArgs) -> Result<ProjectConfiguration> {
    let mut config = match &args.config {
        Some(path) => read_configuration(path)?,
        None => ProjectConfiguration::default(),
    };

    if let Some(area) = args.area {
        config.civil.area = area;
    }
    if let Some(quality) = args.quality {
        config.civil.set_quality(quality);
    }
    if let Some(floors) = args.floors {
        config.civil.floors = floors;
    }
    if let Some(rate) = args.custom_rate {
        config.civil.set_custom_rate(rate);
    }
    if let Some(quality) = args.paint_quality {
        config.painting.quality = quality;
    }
    if let Some(material) = args.material {
        config.flooring.material = material;
    }

    if args.sync_areas {
        let suggestion = suggest_related_areas(config.civil.area);
        config.apply_suggestions(&suggestion)?;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use estimate_core::rates::{FlooringMaterial, QualityGrade};

    fn args() -> ConfigArgs {
        ConfigArgs {
            config: None,
            area: None,
            quality: None,
            floors: None,
            custom_rate: None,
            paint_quality: None,
            material: None,
            sync_areas: false,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve_configuration(&args()).unwrap();
        assert_eq!(config, ProjectConfiguration::default());
    }

    #[test]
    fn test_overrides_apply() {
        let mut a = args();
        a.area = Some(1500.0);
        a.custom_rate = Some(2200.0);
        a.material = Some(FlooringMaterial::Granite);
        let config = resolve_configuration(&a).unwrap();

        assert_eq!(config.civil.area, 1500.0);
        assert_eq!(config.civil.custom_rate, Some(2200.0));
        assert_eq!(config.flooring.material, FlooringMaterial::Granite);
    }

    #[test]
    fn test_quality_override_clears_file_custom_rate() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut stored = ProjectConfiguration::default();
        stored.civil.set_custom_rate(3000.0);
        fs::write(&path, serde_json::to_string(&stored).unwrap()).unwrap();

        let mut a = args();
        a.config = Some(path);
        a.quality = Some(QualityGrade::Basic);
        let config = resolve_configuration(&a).unwrap();

        assert_eq!(config.civil.quality, QualityGrade::Basic);
        assert!(!config.civil.is_custom_rate());
    }

    #[test]
    fn test_sync_areas() {
        let mut a = args();
        a.area = Some(1200.0);
        a.sync_areas = true;
        let config = resolve_configuration(&a).unwrap();

        assert_eq!(config.painting.area, 4200.0);
        assert_eq!(config.flooring.area, 1080.0);
        assert_eq!(config.electrical.area, 1200.0);
    }

    #[test]
    fn test_sync_areas_keeps_chosen_material() {
        let mut a = args();
        a.material = Some(FlooringMaterial::Marble);
        a.paint_quality = Some(QualityGrade::Premium);
        a.sync_areas = true;
        let config = resolve_configuration(&a).unwrap();

        assert_eq!(config.flooring.material, FlooringMaterial::Marble);
        assert_eq!(config.painting.quality, QualityGrade::Premium);
        assert_eq!(config.flooring.area, 900.0);
    }

    #[test]
    fn test_sync_areas_rejects_zero_area() {
        let mut a = args();
        a.area = Some(0.0);
        a.sync_areas = true;
        assert!(resolve_configuration(&a).is_err());
    }

    #[test]
    fn test_unreadable_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{").unwrap();

        let mut a = args();
        a.config = Some(path);
        assert!(resolve_configuration(&a).is_err());
    }
}
