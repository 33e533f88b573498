//! Core functionality for cataloguing clothing photos and composing outfits.
//!
//! This library provides the foundational components of the pipeline:
//! - Upload staging, naming policy, and the three storage areas
//! - Extraction of a single clothing article via an external AI capability
//! - Durable item/outfit catalog with membership relations
//! - Composite rendering of outfits from catalogued items

// -- External Dependencies --

use image::ImageOutputFormat;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

// -- Standard Library --
use std::io::Cursor;
use std::path::{Path, PathBuf};

// -- Internal Modules --
mod error;

// -- Public Re-exports --
pub use catalog::{Catalog, Item, NewItem, NewOutfit, Outfit, OutfitItem};
pub use config::*;
pub use error::{Error, Result};
pub use extraction::{ExtractionClient, ExtractionError, GeminiClient};
pub use types::*;

// -- Public Modules --
pub mod catalog;
pub mod compose;
pub mod config;
pub mod discovery;
pub mod extraction;
pub mod logging;
pub mod naming;
pub mod types;

use naming::StorageAreas;

/// Main entry point for the processing and composition pipeline
pub struct Closet {
    config: Config,
    areas: StorageAreas,
    catalog: Catalog,
    extractor: Box<dyn ExtractionClient>,
}

/// Outcome of a batch run over the input area
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Items created, in processing order
    pub items: Vec<Item>,

    /// Files whose processing failed, with the failure message
    pub failures: Vec<(PathBuf, String)>,
}

impl Closet {
    /// Create a new Closet with the provided configuration and
    /// extraction client
    pub fn new(config: Config, extractor: Box<dyn ExtractionClient>) -> Result<Self> {
        config.validate()?;

        let areas = StorageAreas::from_config(&config);
        areas.ensure_exists()?;
        let catalog = Catalog::open(&config.database_path)?;

        Ok(Self {
            config,
            areas,
            catalog,
            extractor,
        })
    }

    /// Create a Closet backed by the Gemini extraction service,
    /// reading the API key from the environment
    pub fn with_gemini(config: Config) -> Result<Self> {
        let client = GeminiClient::from_env(&config.extraction_model);
        Self::new(config, Box::new(client))
    }

    /// Accept a raw upload, extract the article, and catalog the result.
    ///
    /// The upload is staged into the input area first; if the extraction
    /// call fails the staged file stays there for resubmission and no
    /// item is created. Archiving, when enabled, happens only after a
    /// successful extraction, so a failed call never strands the
    /// original outside the input area.
    pub fn process_upload(
        &mut self,
        bytes: &[u8],
        filename: &str,
        article: &str,
        archive: bool,
        metadata: &UploadMetadata,
    ) -> Result<Item> {
        validate_request(filename, article)?;
        let staged = self.areas.stage_upload(bytes, filename)?;
        // The output name derives from the name the caller supplied;
        // staging may have renamed its copy to dodge a collision
        self.process_staged(&staged, Path::new(filename), article, archive, metadata)
    }

    /// Process a file already sitting in the input area.
    ///
    /// Used by the batch driver; semantics match `process_upload` from
    /// the extraction step onwards.
    pub fn process_path(
        &mut self,
        input_path: &Path,
        article: &str,
        archive: bool,
        metadata: &UploadMetadata,
    ) -> Result<Item> {
        let filename = input_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        validate_request(filename, article)?;
        self.process_staged(input_path, input_path, article, archive, metadata)
    }

    /// Process every supported image in the input area.
    ///
    /// A single bad file is logged and skipped; the batch carries on.
    pub fn process_folder(
        &mut self,
        article: &str,
        archive: bool,
        metadata: &UploadMetadata,
    ) -> Result<BatchSummary> {
        let uploads = discovery::discover_uploads(self.areas.input_dir())?;
        if uploads.is_empty() {
            warn!("No image files found in {}", self.areas.input_dir().display());
            return Ok(BatchSummary::default());
        }

        let progress_bar = ProgressBar::new(uploads.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("[{eta}] {bar:40.cyan/blue} {pos}/{len} ({percent}%) {msg}")
                .unwrap()
                .progress_chars("##-"),
        );
        progress_bar.set_message("Extracting articles...");

        let mut summary = BatchSummary::default();
        for upload in uploads {
            progress_bar.set_message(
                upload
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
            match self.process_path(&upload, article, archive, metadata) {
                Ok(item) => {
                    info!("Saved {}", item.filename);
                    summary.items.push(item);
                }
                Err(e) => {
                    logging::log_file_error(&upload, "process", &e);
                    summary.failures.push((upload, e.to_string()));
                }
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_with_message(format!(
            "Processed {} of {} files",
            summary.items.len(),
            summary.items.len() + summary.failures.len()
        ));

        Ok(summary)
    }

    /// Compose a new outfit from existing item ids.
    ///
    /// All ids are resolved up front; any missing id aborts before
    /// anything is rendered. The composite file is written before the
    /// outfit row is inserted, so there is never a record without an
    /// image.
    pub fn compose_outfit(
        &mut self,
        item_ids: &[i64],
        description: Option<String>,
    ) -> Result<Outfit> {
        if item_ids.is_empty() {
            return Err(Error::Validation(
                "an outfit needs at least one item".to_string(),
            ));
        }

        let member_ids = dedup_preserving_order(item_ids);
        let items = self.catalog.get_items_by_ids(&member_ids)?;
        let canvas = self.render_members(&items)?;

        let base = format!("outfit {}.png", chrono::Utc::now().format("%Y%m%d-%H%M%S"));
        let output_dir = self.areas.output_dir();
        let name = naming::disambiguate(output_dir, &base, |p| p.exists());
        let path = output_dir.join(&name);
        canvas.save(&path)?;
        logging::log_fs_modification("write_composite", &path, None);

        let outfit = self.catalog.create_outfit(
            &NewOutfit {
                filename: name,
                file_path: path,
                description,
            },
            &member_ids,
        )?;
        Ok(outfit)
    }

    /// Change the membership of an existing outfit and re-render its
    /// composite in place.
    ///
    /// Additions are applied before removals; an id already present (or
    /// already absent) is left alone. Removing the last member is
    /// rejected, an outfit always references at least one item.
    pub fn edit_outfit(
        &mut self,
        outfit_id: i64,
        add: &[i64],
        remove: &[i64],
    ) -> Result<Outfit> {
        if add.is_empty() && remove.is_empty() {
            return Err(Error::Validation(
                "no membership changes given".to_string(),
            ));
        }

        for &item_id in add {
            self.catalog.add_item_to_outfit(outfit_id, item_id)?;
        }
        for &item_id in remove {
            self.catalog.remove_item_from_outfit(outfit_id, item_id)?;
        }

        let outfit = self.catalog.get_outfit(outfit_id)?;
        let member_ids: Vec<i64> = outfit.items.iter().map(|m| m.item_id).collect();
        let items = self.catalog.get_items_by_ids(&member_ids)?;
        let canvas = self.render_members(&items)?;
        canvas.save(&outfit.file_path)?;
        logging::log_fs_modification("rewrite_composite", &outfit.file_path, None);
        Ok(outfit)
    }

    /// Replace the free-text description of a catalogued item
    pub fn set_item_description(
        &mut self,
        item_id: i64,
        description: Option<String>,
    ) -> Result<Item> {
        Ok(self
            .catalog
            .update_item_description(item_id, description.as_deref())?)
    }

    /// Replace the free-text description of a catalogued outfit
    pub fn set_outfit_description(
        &mut self,
        outfit_id: i64,
        description: Option<String>,
    ) -> Result<Outfit> {
        Ok(self
            .catalog
            .update_outfit_description(outfit_id, description.as_deref())?)
    }

    /// All catalogued items, in creation order
    pub fn list_items(&self) -> Result<Vec<Item>> {
        Ok(self.catalog.get_items()?)
    }

    /// Catalogued items carrying the given category, newest first
    pub fn list_items_by_category(&self, category: &str) -> Result<Vec<Item>> {
        Ok(self.catalog.get_items_by_category(category)?)
    }

    /// All catalogued outfits with resolved members, in creation order
    pub fn list_outfits(&self) -> Result<Vec<Outfit>> {
        Ok(self.catalog.get_outfits()?)
    }

    /// The storage areas this pipeline writes to
    pub fn areas(&self) -> &StorageAreas {
        &self.areas
    }

    // -- Internals --

    /// Extraction and cataloguing steps shared by upload and batch paths.
    ///
    /// `source` names the upload as the caller knows it and drives the
    /// output filename; `input_path` is where the staged copy sits. The
    /// catalog handle is not touched until the extraction call has
    /// returned, so a slow external call never holds up readers.
    fn process_staged(
        &mut self,
        input_path: &Path,
        source: &Path,
        article: &str,
        archive: bool,
        metadata: &UploadMetadata,
    ) -> Result<Item> {
        let bytes = std::fs::read(input_path)?;

        let extracted = self.extractor.extract(&bytes, article)?;

        // The service answers with whatever encoding it likes;
        // normalise to PNG
        let decoded = image::load_from_memory(&extracted)
            .map_err(|e| Error::Extraction(format!("unparseable extraction result: {}", e)))?;
        let mut png_bytes = Vec::new();
        decoded.write_to(&mut Cursor::new(&mut png_bytes), ImageOutputFormat::Png)?;

        let name = self.assign_output_name(source, article)?;
        let output_path = self.areas.write_output(&png_bytes, &name)?;

        if archive {
            self.areas.archive_original(input_path)?;
        }

        let item = self.catalog.create_item(&NewItem {
            filename: name,
            file_path: output_path,
            description: metadata.description.clone(),
            categories: metadata.categories.clone(),
            tags: metadata.tags.clone(),
        })?;
        Ok(item)
    }

    /// Policy-assigned output name, unique against both the output area
    /// and the catalog
    fn assign_output_name(&self, source: &Path, article: &str) -> Result<String> {
        let base = naming::output_filename(source, article);
        let catalog = &self.catalog;
        let name = naming::disambiguate(self.areas.output_dir(), &base, |candidate| {
            if candidate.exists() {
                return true;
            }
            match candidate.file_name().and_then(|n| n.to_str()) {
                // Treat a failed uniqueness probe as a collision and move on
                Some(n) => catalog.item_filename_exists(n).unwrap_or(true),
                None => true,
            }
        });
        Ok(name)
    }

    /// Load member images and lay them out on the configured grid
    fn render_members(&self, items: &[Item]) -> Result<image::RgbaImage> {
        let mut images = Vec::with_capacity(items.len());
        for item in items {
            let img = image::open(&item.file_path)?;
            images.push(img);
        }
        compose::render_composite(
            &images,
            self.config.composite_cell_size,
            self.config.composite_padding,
        )
    }
}

fn validate_request(filename: &str, article: &str) -> Result<()> {
    if article.trim().is_empty() {
        return Err(Error::Validation("article must not be empty".to_string()));
    }
    match ImageFormat::from_path(Path::new(filename)) {
        Some(format) if format.is_supported() => Ok(()),
        Some(ImageFormat::Other(ext)) => Err(Error::Validation(format!(
            "unsupported image format: {}",
            ext
        ))),
        _ => Err(Error::Validation(format!(
            "not an image file: {:?}",
            filename
        ))),
    }
}

fn dedup_preserving_order(ids: &[i64]) -> Vec<i64> {
    let mut seen = std::collections::HashSet::new();
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::{tempdir, TempDir};

    /// Extraction stand-in: checks the input decodes, answers with a
    /// fixed PNG
    struct FakeExtractor;

    impl ExtractionClient for FakeExtractor {
        fn extract(&self, image: &[u8], article: &str) -> std::result::Result<Vec<u8>, ExtractionError> {
            image::load_from_memory(image)
                .map_err(|_| ExtractionError::NoImage(format!("no {} found", article)))?;
            Ok(png_bytes(8, 8, [0, 128, 0, 255]))
        }
    }

    /// Extraction stand-in that always fails
    struct BrokenExtractor;

    impl ExtractionClient for BrokenExtractor {
        fn extract(&self, _image: &[u8], _article: &str) -> std::result::Result<Vec<u8>, ExtractionError> {
            Err(ExtractionError::Transport("connection reset".to_string()))
        }
    }

    fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
        let mut img = RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgba(rgba);
        }
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .unwrap();
        bytes
    }

    fn test_config(root: &Path) -> Config {
        let mut config = Config::default();
        config.input_dir = root.join("input");
        config.output_dir = root.join("output");
        config.archive_dir = root.join("archive");
        config.database_path = root.join("data/closet.db");
        config.composite_cell_size = 64;
        config.composite_padding = 4;
        config
    }

    fn closet(root: &Path) -> Closet {
        Closet::new(test_config(root), Box::new(FakeExtractor)).unwrap()
    }

    fn upload(closet: &mut Closet, filename: &str, article: &str) -> Result<Item> {
        closet.process_upload(
            &png_bytes(16, 16, [200, 50, 50, 255]),
            filename,
            article,
            false,
            &UploadMetadata::default(),
        )
    }

    fn upload_archiving(closet: &mut Closet, filename: &str, article: &str) -> Result<Item> {
        closet.process_upload(
            &png_bytes(16, 16, [200, 50, 50, 255]),
            filename,
            article,
            true,
            &UploadMetadata::default(),
        )
    }

    fn setup() -> (TempDir, Closet) {
        let dir = tempdir().unwrap();
        let closet = closet(dir.path());
        (dir, closet)
    }

    #[test]
    fn test_process_upload_creates_item_and_file() {
        let (_dir, mut closet) = setup();

        let item = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        assert_eq!(item.filename, "photo1 - sweater.png");
        assert!(item.file_path.exists());
        assert_eq!(closet.list_items().unwrap().len(), 1);

        // The original stays in the input area unless archiving is on
        assert!(closet.areas().input_dir().join("photo1.jpg").exists());
    }

    #[test]
    fn test_duplicate_upload_gets_disambiguated_name() {
        let (dir, mut closet) = setup();

        let first = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        let second = upload(&mut closet, "photo1.jpg", "sweater").unwrap();

        // The suffix lands after the article, regardless of how the
        // staged copy was renamed to avoid clobbering the first upload
        assert_eq!(first.filename, "photo1 - sweater.png");
        assert_eq!(second.filename, "photo1 - sweater (1).png");
        assert!(first.file_path.exists());
        assert!(second.file_path.exists());
        assert!(dir.path().join("input/photo1.jpg").exists());
        assert!(dir.path().join("input/photo1 (1).jpg").exists());
    }

    #[test]
    fn test_third_duplicate_upload_counts_up() {
        let (_dir, mut closet) = setup();

        upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        let third = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        assert_eq!(third.filename, "photo1 - sweater (2).png");
    }

    #[test]
    fn test_empty_article_rejected() {
        let (dir, mut closet) = setup();

        let err = upload(&mut closet, "photo1.jpg", "   ").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(closet.list_items().unwrap().is_empty());

        // Nothing was staged or written
        let output = std::fs::read_dir(dir.path().join("output")).unwrap().count();
        assert_eq!(output, 0);
        let input = std::fs::read_dir(dir.path().join("input")).unwrap().count();
        assert_eq!(input, 0);
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let (_dir, mut closet) = setup();

        let err = upload(&mut closet, "scan.tiff", "sweater").unwrap_err();
        assert_eq!(err.kind(), "validation");
        let err = upload(&mut closet, "noextension", "sweater").unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(closet.list_items().unwrap().is_empty());
    }

    #[test]
    fn test_extraction_failure_leaves_original_for_retry() {
        let dir = tempdir().unwrap();
        let mut broken = Closet::new(test_config(dir.path()), Box::new(BrokenExtractor)).unwrap();

        let err = upload(&mut broken, "photo1.jpg", "sweater").unwrap_err();
        assert_eq!(err.kind(), "extraction");
        assert!(broken.list_items().unwrap().is_empty());

        // The staged original survives the failure...
        let staged = dir.path().join("input/photo1.jpg");
        assert!(staged.exists());
        drop(broken);

        // ...and resubmitting the same file later succeeds
        let mut closet = closet(dir.path());
        let item = closet
            .process_path(&staged, "sweater", false, &UploadMetadata::default())
            .unwrap();
        assert_eq!(item.filename, "photo1 - sweater.png");
    }

    #[test]
    fn test_archiving_moves_original_after_success() {
        let dir = tempdir().unwrap();
        let mut closet = closet(dir.path());

        upload_archiving(&mut closet, "photo1.jpg", "sweater").unwrap();

        // In archive, not in input: never both
        assert!(!dir.path().join("input/photo1.jpg").exists());
        assert!(dir.path().join("archive/photo1.jpg").exists());
    }

    #[test]
    fn test_no_archiving_on_extraction_failure() {
        let dir = tempdir().unwrap();
        let mut closet = Closet::new(test_config(dir.path()), Box::new(BrokenExtractor)).unwrap();

        upload_archiving(&mut closet, "photo1.jpg", "sweater").unwrap_err();
        assert!(dir.path().join("input/photo1.jpg").exists());
        assert!(!dir.path().join("archive/photo1.jpg").exists());
    }

    #[test]
    fn test_compose_outfit_from_items() {
        let (_dir, mut closet) = setup();

        let a = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        let b = upload(&mut closet, "photo2.jpg", "jeans").unwrap();

        let outfit = closet.compose_outfit(&[b.id, a.id], None).unwrap();
        let member_ids: Vec<_> = outfit.items.iter().map(|m| m.item_id).collect();
        assert_eq!(member_ids, vec![b.id, a.id]);
        assert!(outfit.file_path.exists());
        assert_eq!(closet.list_outfits().unwrap().len(), 1);
    }

    #[test]
    fn test_compose_outfit_rejects_empty_set() {
        let (_dir, mut closet) = setup();

        let err = closet.compose_outfit(&[], None).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert!(closet.list_outfits().unwrap().is_empty());
    }

    #[test]
    fn test_compose_outfit_missing_id_names_it() {
        let (dir, mut closet) = setup();

        let a = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        let b = upload(&mut closet, "photo2.jpg", "jeans").unwrap();
        closet.compose_outfit(&[a.id, b.id], None).unwrap();

        let before = closet.list_outfits().unwrap().len();
        let outputs_before = std::fs::read_dir(dir.path().join("output")).unwrap().count();

        let err = closet.compose_outfit(&[a.id, b.id, 99], None).unwrap_err();
        match err {
            Error::NotFound(ids) => assert_eq!(ids, vec![99]),
            other => panic!("unexpected error: {}", other),
        }

        // No outfit and no composite file from the failed call
        assert_eq!(closet.list_outfits().unwrap().len(), before);
        let outputs_after = std::fs::read_dir(dir.path().join("output")).unwrap().count();
        assert_eq!(outputs_after, outputs_before);
    }

    #[test]
    fn test_compose_outfit_dedups_repeated_ids() {
        let (_dir, mut closet) = setup();

        let a = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        let outfit = closet.compose_outfit(&[a.id, a.id], None).unwrap();
        assert_eq!(outfit.items.len(), 1);
    }

    #[test]
    fn test_edit_outfit_rerenders_composite() {
        let (_dir, mut closet) = setup();

        let a = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        let b = upload(&mut closet, "photo2.jpg", "jeans").unwrap();
        let outfit = closet.compose_outfit(&[a.id], None).unwrap();

        // One 64px cell with 4px padding either side
        assert_eq!(image::open(&outfit.file_path).unwrap().width(), 72);

        let edited = closet.edit_outfit(outfit.id, &[b.id], &[]).unwrap();
        let member_ids: Vec<_> = edited.items.iter().map(|m| m.item_id).collect();
        assert_eq!(member_ids, vec![a.id, b.id]);

        // Same file, now two cells wide
        assert_eq!(edited.file_path, outfit.file_path);
        assert_eq!(image::open(&outfit.file_path).unwrap().width(), 144);
    }

    #[test]
    fn test_edit_outfit_keeps_last_member() {
        let (_dir, mut closet) = setup();

        let a = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        let outfit = closet.compose_outfit(&[a.id], None).unwrap();

        let err = closet.edit_outfit(outfit.id, &[], &[a.id]).unwrap_err();
        assert_eq!(err.kind(), "validation");
        assert_eq!(closet.list_outfits().unwrap()[0].items.len(), 1);

        let err = closet.edit_outfit(outfit.id, &[], &[]).unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[test]
    fn test_set_descriptions_after_the_fact() {
        let (_dir, mut closet) = setup();

        let a = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        let outfit = closet.compose_outfit(&[a.id], None).unwrap();

        let item = closet
            .set_item_description(a.id, Some("cosy".to_string()))
            .unwrap();
        assert_eq!(item.description.as_deref(), Some("cosy"));

        let outfit = closet
            .set_outfit_description(outfit.id, Some("weekend".to_string()))
            .unwrap();
        assert_eq!(outfit.description.as_deref(), Some("weekend"));

        // Edits stick across reads
        assert_eq!(
            closet.list_items().unwrap()[0].description.as_deref(),
            Some("cosy")
        );
    }

    #[test]
    fn test_listing_is_idempotent() {
        let (_dir, mut closet) = setup();

        let a = upload(&mut closet, "photo1.jpg", "sweater").unwrap();
        closet.compose_outfit(&[a.id], None).unwrap();

        let items_first = closet.list_items().unwrap();
        let items_second = closet.list_items().unwrap();
        assert_eq!(items_first.len(), items_second.len());
        assert_eq!(items_first[0].id, items_second[0].id);
        assert_eq!(items_first[0].filename, items_second[0].filename);

        let outfits_first = closet.list_outfits().unwrap();
        let outfits_second = closet.list_outfits().unwrap();
        assert_eq!(outfits_first.len(), outfits_second.len());
        assert_eq!(outfits_first[0].id, outfits_second[0].id);
    }

    #[test]
    fn test_process_folder_continues_past_bad_file() {
        let (dir, mut closet) = setup();

        // One real image and one garbage file the extractor rejects
        std::fs::write(dir.path().join("input/good.png"), png_bytes(8, 8, [1, 2, 3, 255]))
            .unwrap();
        std::fs::write(dir.path().join("input/zzz_garbage.png"), b"NOT AN IMAGE").unwrap();

        let summary = closet
            .process_folder("sweater", false, &UploadMetadata::default())
            .unwrap();
        assert_eq!(summary.items.len(), 1);
        assert_eq!(summary.items[0].filename, "good - sweater.png");
        assert_eq!(summary.failures.len(), 1);
        assert!(summary.failures[0].0.ends_with("zzz_garbage.png"));

        // The failed file stays in the input area for inspection
        assert!(dir.path().join("input/zzz_garbage.png").exists());
    }

    #[test]
    fn test_metadata_reaches_catalog() {
        let (_dir, mut closet) = setup();

        let metadata = UploadMetadata {
            description: Some("cosy".to_string()),
            categories: vec!["tops".to_string()],
            tags: vec!["wool".to_string()],
        };
        let item = closet
            .process_upload(
                &png_bytes(16, 16, [9, 9, 9, 255]),
                "photo1.jpg",
                "sweater",
                false,
                &metadata,
            )
            .unwrap();

        assert_eq!(item.description.as_deref(), Some("cosy"));
        assert_eq!(item.categories, vec!["tops"]);
        assert_eq!(item.tags, vec!["wool"]);

        let tops = closet.list_items_by_category("tops").unwrap();
        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].id, item.id);
        assert!(closet.list_items_by_category("shoes").unwrap().is_empty());
    }
}
