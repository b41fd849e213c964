//! Zone feature vectors and LibSVM training files from labeled documents.

use crate::batch::LABELED_SUFFIX;
use crate::interchange::read_document;
use crate::label::{LabelCategory, ZoneLabel};
use crate::logging::BATCH;
use crate::model::{Document, PageId, ZoneId};
use crate::tree::count_chunks_in_zone;
use anyhow::Context;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Label a zone contributes to training: unlabeled zones become
/// `OthUnknown`, metadata labels stay, the rest collapse to their category.
pub fn training_label(label: Option<ZoneLabel>) -> ZoneLabel {
    match label {
        None => ZoneLabel::OthUnknown,
        Some(label) if label.category() == LabelCategory::Metadata => label,
        Some(label) => label.general_label(),
    }
}

pub trait FeatureCalculator: Send + Sync {
    fn name(&self) -> &str;

    fn value(&self, doc: &Document, page: PageId, zone: ZoneId) -> f64;
}

fn relative(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// Share of lines opening with a square bracket.
pub struct BracketedLineRelativeCount;

impl FeatureCalculator for BracketedLineRelativeCount {
    fn name(&self) -> &str {
        "BracketedRelativeLineCount"
    }

    fn value(&self, doc: &Document, _page: PageId, zone: ZoneId) -> f64 {
        let lines = doc.zone(zone).lines();
        let bracketed = lines
            .iter()
            .filter(|line| matches!(doc.line_text(**line).chars().next(), Some('[' | ']')))
            .count();
        relative(bracketed, lines.len())
    }
}

pub struct LineCount;

impl FeatureCalculator for LineCount {
    fn name(&self) -> &str {
        "LineCount"
    }

    fn value(&self, doc: &Document, _page: PageId, zone: ZoneId) -> f64 {
        doc.zone(zone).lines().len() as f64
    }
}

pub struct ChunkCount;

impl FeatureCalculator for ChunkCount {
    fn name(&self) -> &str {
        "ChunkCount"
    }

    fn value(&self, doc: &Document, _page: PageId, zone: ZoneId) -> f64 {
        count_chunks_in_zone(doc, zone) as f64
    }
}

/// Vertical center of the zone as a fraction of the page height.
pub struct RelativeVerticalPosition;

impl FeatureCalculator for RelativeVerticalPosition {
    fn name(&self) -> &str {
        "RelativeVerticalPosition"
    }

    fn value(&self, doc: &Document, page: PageId, zone: ZoneId) -> f64 {
        let page = doc.page(page).bounds;
        let zone = doc.zone(zone).bounds;
        if page.height() <= 0.0 {
            return 0.0;
        }
        ((zone.y0 + zone.y1) / 2.0 - page.y0) / page.height()
    }
}

pub struct DigitRelativeCount;

impl FeatureCalculator for DigitRelativeCount {
    fn name(&self) -> &str {
        "DigitRelativeCount"
    }

    fn value(&self, doc: &Document, _page: PageId, zone: ZoneId) -> f64 {
        let text = doc.zone_text(zone);
        let visible = text.chars().filter(|c| !c.is_whitespace()).count();
        let digits = text.chars().filter(|c| c.is_ascii_digit()).count();
        relative(digits, visible)
    }
}

pub struct UppercaseRelativeCount;

impl FeatureCalculator for UppercaseRelativeCount {
    fn name(&self) -> &str {
        "UppercaseRelativeCount"
    }

    fn value(&self, doc: &Document, _page: PageId, zone: ZoneId) -> f64 {
        let text = doc.zone_text(zone);
        let letters = text.chars().filter(|c| c.is_alphabetic()).count();
        let upper = text.chars().filter(|c| c.is_uppercase()).count();
        relative(upper, letters)
    }
}

/// Ordered set of calculators; feature `i + 1` in LibSVM output is
/// calculator `i`.
#[derive(Default)]
pub struct FeatureVectorBuilder {
    calculators: Vec<Box<dyn FeatureCalculator>>,
}

impl FeatureVectorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, calculator: impl FeatureCalculator + 'static) -> Self {
        self.calculators.push(Box::new(calculator));
        self
    }

    pub fn names(&self) -> Vec<&str> {
        self.calculators.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }

    pub fn build(&self, doc: &Document, page: PageId, zone: ZoneId) -> Vec<f64> {
        self.calculators
            .iter()
            .map(|calculator| calculator.value(doc, page, zone))
            .collect()
    }
}

/// All built-in zone features.
pub fn default_feature_builder() -> FeatureVectorBuilder {
    FeatureVectorBuilder::new()
        .with(BracketedLineRelativeCount)
        .with(LineCount)
        .with(ChunkCount)
        .with(RelativeVerticalPosition)
        .with(DigitRelativeCount)
        .with(UppercaseRelativeCount)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMapping {
    Identity,
    General,
}

impl LabelMapping {
    pub fn apply(self, label: ZoneLabel) -> ZoneLabel {
        match self {
            LabelMapping::Identity => label,
            LabelMapping::General => label.general_label(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSample {
    pub label: ZoneLabel,
    pub features: Vec<f64>,
}

pub fn zone_training_samples(
    doc: &Document,
    builder: &FeatureVectorBuilder,
    mapping: LabelMapping,
) -> Vec<TrainingSample> {
    let mut samples = Vec::with_capacity(doc.zone_count());
    for &page in doc.pages() {
        for &zone in doc.page(page).zones() {
            samples.push(TrainingSample {
                label: mapping.apply(training_label(doc.label(zone))),
                features: builder.build(doc, page, zone),
            });
        }
    }
    samples
}

pub fn metadata_samples(doc: &Document, builder: &FeatureVectorBuilder) -> Vec<TrainingSample> {
    zone_training_samples(doc, builder, LabelMapping::Identity)
        .into_iter()
        .filter(|sample| sample.label.is_of_category_or_general(LabelCategory::Metadata))
        .collect()
}

pub fn initial_samples(doc: &Document, builder: &FeatureVectorBuilder) -> Vec<TrainingSample> {
    zone_training_samples(doc, builder, LabelMapping::General)
}

pub fn libsvm_line(sample: &TrainingSample) -> String {
    let mut line = sample.label.ordinal().to_string();
    for (idx, value) in sample.features.iter().enumerate() {
        line.push_str(&format!(" {}:{:.5}", idx + 1, value));
    }
    line
}

pub fn write_libsvm<W: Write>(samples: &[TrainingSample], writer: &mut W) -> io::Result<()> {
    for sample in samples {
        writeln!(writer, "{}", libsvm_line(sample))?;
    }
    Ok(())
}

/// Writes `meta_<prefix>.dat` and `initial_<prefix>.dat` into `out_dir` from
/// every `*.labeled.json` in `dir`. Returns the number of documents read.
pub fn export_directory(dir: &Path, out_dir: &Path, prefix: &str) -> anyhow::Result<usize> {
    let mut inputs: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read input directory {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.ends_with(LABELED_SUFFIX))
        })
        .collect();
    inputs.sort();

    let meta_path = out_dir.join(format!("meta_{prefix}.dat"));
    let initial_path = out_dir.join(format!("initial_{prefix}.dat"));
    let mut meta = BufWriter::new(
        File::create(&meta_path).with_context(|| format!("Failed to create {}", meta_path.display()))?,
    );
    let mut initial = BufWriter::new(
        File::create(&initial_path)
            .with_context(|| format!("Failed to create {}", initial_path.display()))?,
    );

    let builder = default_feature_builder();
    for path in &inputs {
        let doc = read_document(path).with_context(|| format!("Failed to read {}", path.display()))?;
        write_libsvm(&metadata_samples(&doc, &builder), &mut meta)?;
        write_libsvm(&initial_samples(&doc, &builder), &mut initial)?;
        debug!(target: BATCH, document = %path.display(), "Exported training samples");
    }
    meta.flush()?;
    initial.flush()?;

    info!(
        target: BATCH,
        documents = inputs.len(),
        meta = %meta_path.display(),
        initial = %initial_path.display(),
        "Wrote LibSVM files"
    );
    Ok(inputs.len())
}
