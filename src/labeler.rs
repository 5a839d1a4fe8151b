// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive region labeling session.
//!
//! For every selected image the operator draws rectangles, then names the
//! class of each cropped region. The label store is written back to disk
//! after every image so progress survives an interrupted session.

use crate::filter::{image_key, select_images, ProcessMode};
use crate::io::{media, serialization};
use crate::models::{region::Rect, store::LabelStore};
use anyhow::{Context, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Lets the operator draw rectangles on an image.
pub trait RegionSelector {
    /// Return the rectangles selected on `image`, in selection order.
    fn select_regions(&mut self, key: &str, image: &RgbaImage) -> Result<Vec<Rect>>;
}

/// Asks the operator for the class of a cropped region.
pub trait LabelPrompt {
    fn prompt_class(&mut self, crop: &RgbaImage, rect: &Rect) -> Result<String>;
}

impl<T: RegionSelector + ?Sized> RegionSelector for &mut T {
    fn select_regions(&mut self, key: &str, image: &RgbaImage) -> Result<Vec<Rect>> {
        (**self).select_regions(key, image)
    }
}

impl<T: LabelPrompt + ?Sized> LabelPrompt for &mut T {
    fn prompt_class(&mut self, crop: &RgbaImage, rect: &Rect) -> Result<String> {
        (**self).prompt_class(crop, rect)
    }
}

/// Counters reported at the end of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelSummary {
    pub images_seen: usize,
    pub images_labeled: usize,
    pub regions_labeled: usize,
}

impl std::fmt::Display for LabelSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} images visited, {} labeled, {} regions",
            self.images_seen, self.images_labeled, self.regions_labeled
        )
    }
}

/// Discover the images under `image_dir` and pick the ones to label.
///
/// Fails if the directory holds no valid image at all. An empty selection
/// (for example, every image already labeled in `New` mode) is not an error.
pub fn session_images(
    image_dir: &Path,
    store: &LabelStore,
    mode: ProcessMode,
) -> Result<Vec<PathBuf>> {
    let images = media::discover_images(image_dir)?;
    if images.is_empty() {
        anyhow::bail!("No images found in {}", image_dir.display());
    }

    let selected = select_images(&images, &store.image_keys(), mode);
    log::info!(
        "{} of {} images selected ({:?})",
        selected.len(),
        images.len(),
        mode
    );
    Ok(selected)
}

/// Drives a labeling session with the given operator capabilities.
pub struct Labeler<S, P> {
    selector: S,
    prompt: P,
    store_path: PathBuf,
}

impl<S: RegionSelector, P: LabelPrompt> Labeler<S, P> {
    pub fn new(selector: S, prompt: P, store_path: impl Into<PathBuf>) -> Self {
        Self {
            selector,
            prompt,
            store_path: store_path.into(),
        }
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    /// Label each image in turn, persisting the store after every one.
    pub fn run(&mut self, images: &[PathBuf], store: &mut LabelStore) -> Result<LabelSummary> {
        let mut summary = LabelSummary::default();

        for (position, path) in images.iter().enumerate() {
            log::info!("[{}/{}] {}", position + 1, images.len(), path.display());

            let regions = self
                .label_image(path, store)
                .with_context(|| format!("Failed to label {}", path.display()))?;

            summary.images_seen += 1;
            if regions > 0 {
                summary.images_labeled += 1;
                summary.regions_labeled += regions;
            }

            serialization::save_store(store, &self.store_path)?;
        }

        log::info!("Labeling finished: {}", summary);
        Ok(summary)
    }

    /// Label one image and return the number of regions recorded.
    fn label_image(&mut self, path: &Path, store: &mut LabelStore) -> Result<usize> {
        let key = image_key(path);
        let image = media::load_image(path)?;

        let rects = self.selector.select_regions(&key, &image)?;
        if rects.is_empty() {
            log::info!("No regions selected for {}", key);
            return Ok(0);
        }

        let mut labeled = Vec::with_capacity(rects.len());
        for rect in rects {
            let crop = media::crop_region(&image, &rect);
            let class_name = self.prompt.prompt_class(&crop, &rect)?;
            log::info!("{} {} -> {}", key, rect, class_name);
            labeled.push((rect, class_name));
        }

        let count = labeled.len();
        store.set_regions(&key, labeled);
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::region::Region;
    use image::{Rgb, RgbImage};
    use std::collections::VecDeque;

    struct Selections(VecDeque<Vec<Rect>>);

    impl RegionSelector for Selections {
        fn select_regions(&mut self, _key: &str, _image: &RgbaImage) -> Result<Vec<Rect>> {
            Ok(self.0.pop_front().unwrap_or_default())
        }
    }

    /// Canned class answers; records the size of every crop shown.
    struct Classes {
        answers: VecDeque<&'static str>,
        crops_seen: Vec<(u32, u32)>,
    }

    impl Classes {
        fn new(answers: &[&'static str]) -> Self {
            Self {
                answers: answers.iter().copied().collect(),
                crops_seen: Vec::new(),
            }
        }
    }

    impl LabelPrompt for Classes {
        fn prompt_class(&mut self, crop: &RgbaImage, _rect: &Rect) -> Result<String> {
            self.crops_seen.push(crop.dimensions());
            self.answers
                .pop_front()
                .map(String::from)
                .ok_or_else(|| anyhow::anyhow!("prompt closed"))
        }
    }

    fn write_image(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        RgbImage::from_pixel(100, 80, Rgb([30, 60, 90])).save(&path).unwrap();
        path
    }

    #[test]
    fn test_session_without_images_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = session_images(dir.path(), &LabelStore::new(), ProcessMode::All).unwrap_err();
        assert!(err.to_string().contains("No images found"));

        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        write_image(dir.path(), "scan.bmp");
        let err = session_images(dir.path(), &LabelStore::new(), ProcessMode::All).unwrap_err();
        assert!(err.to_string().contains("No images found"));
    }

    #[test]
    fn test_session_skips_labeled_images() {
        let dir = tempfile::tempdir().unwrap();
        let done = write_image(dir.path(), "a.jpg");
        let todo = write_image(dir.path(), "b.png");

        let mut store = LabelStore::new();
        store.set_regions(&image_key(&done), vec![(Rect::new(0, 0, 5, 5), "cat".to_string())]);

        let new = session_images(dir.path(), &store, ProcessMode::New).unwrap();
        let existing = session_images(dir.path(), &store, ProcessMode::Existing).unwrap();
        assert_eq!(new, vec![todo.clone()]);
        assert_eq!(existing, vec![done]);

        // Everything labeled: nothing selected, but not an error.
        store.set_regions(&image_key(&todo), vec![(Rect::new(1, 1, 2, 2), "dog".to_string())]);
        assert!(session_images(dir.path(), &store, ProcessMode::New).unwrap().is_empty());
    }

    #[test]
    fn test_single_region_entry() {
        let dir = tempfile::tempdir().unwrap();
        let img = write_image(dir.path(), "img1.jpg");
        let store_path = dir.path().join("rois.json");

        let selector = Selections(VecDeque::from(vec![vec![Rect::new(10, 10, 50, 50)]]));
        let mut prompt = Classes::new(&["cat"]);
        let mut store = LabelStore::new();

        let summary = Labeler::new(selector, &mut prompt, &store_path)
            .run(&[img.clone()], &mut store)
            .unwrap();

        assert_eq!(prompt.crops_seen, vec![(50, 50)]);
        assert_eq!(summary.regions_labeled, 1);
        let entry = store.get(&image_key(&img)).unwrap();
        assert_eq!(entry.len(), 1);
        assert_eq!(entry[&0], Region::new(Rect::new(10, 10, 50, 50), "cat"));
        assert_eq!(serialization::load_store(&store_path).unwrap(), store);
    }

    #[test]
    fn test_multiple_regions_keep_selection_order() {
        let dir = tempfile::tempdir().unwrap();
        let img = write_image(dir.path(), "a.png");
        let store_path = dir.path().join("rois.yaml");

        let selector = Selections(VecDeque::from(vec![vec![
            Rect::new(0, 0, 10, 10),
            Rect::new(20, 20, 5, 5),
            Rect::new(50, 40, 30, 30),
        ]]));
        let prompt = Classes::new(&["dog", "cat", "bird"]);
        let mut store = LabelStore::new();

        Labeler::new(selector, prompt, &store_path)
            .run(&[img.clone()], &mut store)
            .unwrap();

        let entry = store.get(&image_key(&img)).unwrap();
        let classes: Vec<_> = entry.values().map(|r| r.class_name.as_str()).collect();
        assert_eq!(entry.keys().copied().collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(classes, vec!["dog", "cat", "bird"]);
    }

    #[test]
    fn test_empty_selection_still_persists_store() {
        let dir = tempfile::tempdir().unwrap();
        let img = write_image(dir.path(), "a.jpg");
        let store_path = dir.path().join("rois.json");

        let mut store = LabelStore::new();
        store.set_regions("other.jpg", vec![(Rect::new(1, 1, 1, 1), "x".to_string())]);

        let summary = Labeler::new(Selections(VecDeque::new()), Classes::new(&[]), &store_path)
            .run(&[img.clone()], &mut store)
            .unwrap();

        assert_eq!(summary.images_seen, 1);
        assert_eq!(summary.images_labeled, 0);
        assert!(!store.contains(&image_key(&img)));
        assert_eq!(serialization::load_store(&store_path).unwrap(), store);
    }

    #[test]
    fn test_progress_is_saved_before_a_failure() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_image(dir.path(), "a.jpg");
        let second = write_image(dir.path(), "b.jpg");
        let store_path = dir.path().join("rois.json");

        let selector = Selections(VecDeque::from(vec![
            vec![Rect::new(0, 0, 10, 10)],
            vec![Rect::new(5, 5, 10, 10)],
        ]));
        // The prompt runs dry on the second image.
        let prompt = Classes::new(&["car"]);
        let mut store = LabelStore::new();

        let err = Labeler::new(selector, prompt, &store_path)
            .run(&[first.clone(), second.clone()], &mut store)
            .unwrap_err();

        assert!(format!("{:#}", err).contains("b.jpg"));
        let saved = serialization::load_store(&store_path).unwrap();
        assert!(saved.contains(&image_key(&first)));
        assert!(!saved.contains(&image_key(&second)));
    }

    #[test]
    fn test_undecodable_image_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("broken.jpg");
        std::fs::write(&bad, "garbage").unwrap();

        let mut store = LabelStore::new();
        let result = Labeler::new(
            Selections(VecDeque::new()),
            Classes::new(&[]),
            dir.path().join("rois.json"),
        )
        .run(&[bad], &mut store);

        assert!(result.is_err());
        assert!(!dir.path().join("rois.json").exists());
    }
}
