use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder, Rgba32FImage};

use crate::helper;
use crate::recolor::{recolor, TargetColor};

/// The host side of the pipeline: resolves items to pixel buffers, encodes
/// results and writes files. Batch tests swap in an in-memory store.
pub trait ImageStore {
    /// Hook for stores whose assets carry a read-protection flag that must be
    /// flipped before pixel access. A plain filesystem has no such concept.
    fn ensure_readable(&mut self, path: &Path) -> Result<()> {
        let _ = path;
        Ok(())
    }

    /// Decode an item to a float RGBA buffer, `None` when it is not an image
    fn load(&mut self, path: &Path) -> Option<Rgba32FImage>;

    /// Create the output directory, succeeding if it already exists
    fn create_dir(&mut self, dir: &Path) -> Result<()>;

    /// Encode to lossless RGBA PNG bytes, `None` on encoder failure
    fn encode(&mut self, image: &Rgba32FImage) -> Option<Vec<u8>>;

    /// Write the byte buffer, overwriting any existing file
    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Filesystem-backed store used by the CLI
pub struct FsStore;

impl ImageStore for FsStore {
    fn load(&mut self, path: &Path) -> Option<Rgba32FImage> {
        image::open(path).ok().map(|img| img.to_rgba32f())
    }

    fn create_dir(&mut self, dir: &Path) -> Result<()> {
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))
    }

    fn encode(&mut self, image: &Rgba32FImage) -> Option<Vec<u8>> {
        // quantization to 8-bit happens here, not in the transform
        let rgba8 = DynamicImage::ImageRgba32F(image.clone()).to_rgba8();
        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(&rgba8, rgba8.width(), rgba8.height(), ColorType::Rgba8)
            .ok()?;
        Some(bytes)
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Terminal outcome of one batch item
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    Processed { input: PathBuf, output: PathBuf },
    NotAnImage(PathBuf),
    EncodeFailed(PathBuf),
    IoFailed(PathBuf, String),
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Processed { input, output } => {
                write!(f, "saved: {} -> {}", input.display(), output.display())
            }
            ItemOutcome::NotAnImage(path) => write!(f, "not an image: {}", path.display()),
            ItemOutcome::EncodeFailed(path) => write!(f, "failed to encode: {}", path.display()),
            ItemOutcome::IoFailed(path, err) => write!(f, "{}: {}", path.display(), err),
        }
    }
}

/// Counters and per-item log for one completed run
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub warnings: usize,
    pub errors: usize,
    pub total: usize,
    pub log: Vec<ItemOutcome>,
}

impl BatchReport {
    fn new(total: usize) -> Self {
        Self { total, ..Default::default() }
    }

    fn record(&mut self, outcome: ItemOutcome) {
        match &outcome {
            ItemOutcome::Processed { .. } => self.processed += 1,
            ItemOutcome::NotAnImage(_) => self.warnings += 1,
            ItemOutcome::EncodeFailed(_) | ItemOutcome::IoFailed(..) => self.errors += 1,
        }
        self.log.push(outcome);
    }

    pub fn is_clean(&self) -> bool {
        self.processed == self.total
    }

    pub fn summary(&self) -> String {
        format!(
            "Processed: {} of {}\nWarnings: {}\nErrors: {}",
            self.processed, self.total, self.warnings, self.errors
        )
    }
}

/// Run the whole batch sequentially, one outcome per item. Items never abort
/// each other; every failure becomes a counter bump plus a log entry.
///
/// Returns `None` for an empty selection so callers can tell "nothing
/// selected" apart from a run where every item failed. `on_progress` is called
/// once per item with its zero-based index, before the item is touched.
pub fn process<S, F>(
    items: &[PathBuf],
    target: &TargetColor,
    store: &mut S,
    mut on_progress: F,
) -> Option<BatchReport>
where
    S: ImageStore,
    F: FnMut(usize, usize),
{
    if items.is_empty() {
        return None;
    }

    let total = items.len();
    let hex = target.hex_code();
    let mut report = BatchReport::new(total);

    // output paths already claimed by this run, for same-name inputs
    let mut taken: HashSet<PathBuf> = HashSet::new();

    for (index, item) in items.iter().enumerate() {
        on_progress(index, total);

        if let Err(e) = store.ensure_readable(item) {
            report.record(ItemOutcome::IoFailed(item.clone(), format!("{e:#}")));
            continue;
        }

        let Some(source) = store.load(item) else {
            report.record(ItemOutcome::NotAnImage(item.clone()));
            continue;
        };

        let recolored = recolor(&source, target);

        let mut out_path = helper::derive_output_path(item, &hex, 1);
        let mut copy = 2;
        while !taken.insert(out_path.clone()) {
            out_path = helper::derive_output_path(item, &hex, copy);
            copy += 1;
        }

        let out_dir = out_path.parent().unwrap_or_else(|| Path::new("."));
        if let Err(e) = store.create_dir(out_dir) {
            report.record(ItemOutcome::IoFailed(item.clone(), format!("{e:#}")));
            continue;
        }

        let Some(bytes) = store.encode(&recolored) else {
            report.record(ItemOutcome::EncodeFailed(item.clone()));
            continue;
        };

        match store.write(&out_path, &bytes) {
            Ok(()) => report.record(ItemOutcome::Processed {
                input: item.clone(),
                output: out_path,
            }),
            Err(e) => report.record(ItemOutcome::IoFailed(item.clone(), format!("{e:#}"))),
        }
    }

    Some(report)
}
