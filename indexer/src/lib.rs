use anyhow::{bail, Context, Result};
use ascent_core::persist::{save_artifacts, ArtifactPaths, Manifest};
use ascent_core::readability::flesch_reading_ease;
use ascent_core::{CorpusMatrix, CorpusStore, DocId, DocRecord, FitOptions, VocabularyModel};
use serde::Deserialize;
use walkdir::WalkDir;

use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct InputDoc {
    pub id: String,
    pub title: String,
    #[serde(alias = "body")]
    pub content: String,
    pub url: Option<String>,
    /// Precomputed readability; computed from `content` when absent.
    #[serde(default)]
    pub score: Option<f32>,
}

#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub fit: FitOptions,
    /// Prefix for urls derived from titles when a document has none.
    pub url_base: Option<String>,
}

/// All `.json` / `.jsonl` files under `input`, or `input` itself.
pub fn collect_inputs(input: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input.is_dir() {
        for entry in WalkDir::new(input).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() && matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")) {
                files.push(p.to_path_buf());
            }
        }
    } else if input.is_file() {
        files.push(input.to_path_buf());
    }
    files
}

pub fn read_docs(file: &Path) -> Result<Vec<InputDoc>> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
        let mut docs = Vec::new();
        for (n, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let doc = serde_json::from_str(&line).with_context(|| format!("{}:{}", file.display(), n + 1))?;
            docs.push(doc);
        }
        return Ok(docs);
    }
    let json: serde_json::Value = serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    let docs = match json {
        serde_json::Value::Array(arr) => arr.into_iter().map(serde_json::from_value).collect::<Result<Vec<_>, _>>()?,
        obj @ serde_json::Value::Object(_) => vec![serde_json::from_value(obj)?],
        _ => Vec::new(),
    };
    Ok(docs)
}

/// `https://en.wikipedia.org/wiki/` + `"Ada Lovelace"` → `.../Ada_Lovelace`.
pub fn title_url(base: &str, title: &str) -> String {
    format!("{}{}", base, title.replace(' ', "_"))
}

/// Fit the vocabulary over `docs`, vectorize them and fill in metadata.
/// Document ids are assigned in input order.
pub fn vectorize(docs: Vec<InputDoc>, options: &BuildOptions) -> Result<(VocabularyModel, CorpusStore)> {
    if docs.is_empty() {
        bail!("no input documents");
    }
    let mut seen = HashSet::new();
    for doc in &docs {
        if !seen.insert(doc.id.as_str()) {
            bail!("duplicate document id {:?}", doc.id);
        }
    }

    let model = VocabularyModel::fit(docs.iter().map(|d| d.content.as_str()), &options.fit)?;
    tracing::info!(num_docs = docs.len(), vocab_size = model.vocab_size(), "fitted vocabulary");

    let mut matrix = CorpusMatrix::new(model.vocab_size());
    let mut records: HashMap<DocId, DocRecord> = HashMap::with_capacity(docs.len());
    for (i, doc) in docs.into_iter().enumerate() {
        let doc_id = i as DocId;
        matrix.push_row(doc_id, &model.project(&doc.content))?;
        let readability_score = doc.score.unwrap_or_else(|| flesch_reading_ease(&doc.content));
        let url = doc.url.or_else(|| options.url_base.as_deref().map(|base| title_url(base, &doc.title)));
        records.insert(doc_id, DocRecord { external_id: doc.id, title: doc.title, content: doc.content, readability_score, url });
    }
    Ok((model, CorpusStore::new(matrix, records)?))
}

pub fn build_index(input: &Path, output: &Path, options: &BuildOptions) -> Result<Manifest> {
    let mut docs = Vec::new();
    for file in collect_inputs(input) {
        let before = docs.len();
        docs.extend(read_docs(&file)?);
        tracing::debug!(file = %file.display(), docs = docs.len() - before, "read input");
    }
    let (model, corpus) = vectorize(docs, options)?;
    let (matrix, records) = corpus.into_parts();
    let paths = ArtifactPaths::new(output);
    let manifest = save_artifacts(&paths, &model, &matrix, &records)?;
    tracing::info!(output = %output.display(), num_docs = manifest.num_docs, nnz = matrix.nnz(), "artifacts written");
    Ok(manifest)
}
