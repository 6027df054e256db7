use crate::config::ARTIFACT_VERSION;
use crate::corpus::{CorpusMatrix, CorpusStore};
use crate::error::{AscentError, Result};
use crate::vocabulary::VocabularyModel;
use crate::{DocId, DocRecord};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::{create_dir_all, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const VOCABULARY_FILE: &str = "vocabulary.bin";
pub const CORPUS_VECTORS_FILE: &str = "corpus_vectors.bin";
pub const CORPUS_META_FILE: &str = "corpus_meta.bin";
pub const MANIFEST_FILE: &str = "manifest.json";

/// Every file a complete artifact directory holds.
pub const ARTIFACT_FILES: [&str; 4] = [VOCABULARY_FILE, CORPUS_VECTORS_FILE, CORPUS_META_FILE, MANIFEST_FILE];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub num_docs: u32,
    pub vocab_size: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct ArtifactPaths {
    pub root: PathBuf,
}

impl ArtifactPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn vocabulary(&self) -> PathBuf { self.root.join(VOCABULARY_FILE) }
    pub fn corpus_vectors(&self) -> PathBuf { self.root.join(CORPUS_VECTORS_FILE) }
    pub fn corpus_meta(&self) -> PathBuf { self.root.join(CORPUS_META_FILE) }
    pub fn manifest(&self) -> PathBuf { self.root.join(MANIFEST_FILE) }
}

fn write_bincode<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    Ok(())
}

fn read_bincode<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let mut f = File::open(path).map_err(|e| AscentError::artifact(path, e))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(|e| AscentError::artifact(path, e))?;
    bincode::deserialize(&buf).map_err(|e| AscentError::artifact(path, e))
}

pub fn save_vocabulary(paths: &ArtifactPaths, model: &VocabularyModel) -> anyhow::Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.vocabulary(), model)
}

pub fn load_vocabulary(paths: &ArtifactPaths) -> Result<VocabularyModel> {
    let path = paths.vocabulary();
    let model: VocabularyModel = read_bincode(&path)?;
    model.validate().map_err(|e| AscentError::artifact(&path, e))?;
    Ok(model)
}

pub fn save_corpus_vectors(paths: &ArtifactPaths, matrix: &CorpusMatrix) -> anyhow::Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.corpus_vectors(), matrix)
}

pub fn load_corpus_vectors(paths: &ArtifactPaths) -> Result<CorpusMatrix> {
    let path = paths.corpus_vectors();
    let matrix: CorpusMatrix = read_bincode(&path)?;
    matrix.validate().map_err(|reason| AscentError::artifact(&path, reason))?;
    Ok(matrix)
}

pub fn save_corpus_meta(paths: &ArtifactPaths, docs: &HashMap<DocId, DocRecord>) -> anyhow::Result<()> {
    create_dir_all(&paths.root)?;
    write_bincode(&paths.corpus_meta(), docs)
}

pub fn load_corpus_meta(paths: &ArtifactPaths) -> Result<HashMap<DocId, DocRecord>> {
    read_bincode(&paths.corpus_meta())
}

pub fn save_manifest(paths: &ArtifactPaths, manifest: &Manifest) -> anyhow::Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.manifest())?;
    let json = serde_json::to_string_pretty(manifest)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_manifest(paths: &ArtifactPaths) -> Result<Manifest> {
    let path = paths.manifest();
    let mut buf = String::new();
    File::open(&path)
        .and_then(|mut f| f.read_to_string(&mut buf))
        .map_err(|e| AscentError::artifact(&path, e))?;
    let manifest: Manifest = serde_json::from_str(&buf).map_err(|e| AscentError::artifact(&path, e))?;
    if manifest.version != ARTIFACT_VERSION {
        return Err(AscentError::artifact(
            &path,
            format!("artifact version {} is not supported (expected {ARTIFACT_VERSION})", manifest.version),
        ));
    }
    Ok(manifest)
}

/// Persist a fitted model and vectorized corpus as a complete artifact set.
pub fn save_artifacts(paths: &ArtifactPaths, model: &VocabularyModel, matrix: &CorpusMatrix, docs: &HashMap<DocId, DocRecord>) -> anyhow::Result<Manifest> {
    save_vocabulary(paths, model)?;
    save_corpus_vectors(paths, matrix)?;
    save_corpus_meta(paths, docs)?;
    let manifest = Manifest {
        num_docs: matrix.n_rows() as u32,
        vocab_size: model.vocab_size() as u32,
        created_at: time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339).unwrap_or_default(),
        version: ARTIFACT_VERSION,
    };
    save_manifest(paths, &manifest)?;
    Ok(manifest)
}

/// Load and cross-check all artifacts needed to serve queries.
pub fn load_artifacts(paths: &ArtifactPaths) -> Result<(VocabularyModel, CorpusStore, Manifest)> {
    let manifest = load_manifest(paths)?;
    let model = load_vocabulary(paths)?;
    let matrix = load_corpus_vectors(paths)?;
    let docs = load_corpus_meta(paths)?;
    let store = CorpusStore::new(matrix, docs)?;
    store.check_dimensions(model.vocab_size())?;
    if manifest.num_docs as usize != store.len() {
        return Err(AscentError::artifact(
            paths.manifest(),
            format!("manifest lists {} documents, corpus holds {}", manifest.num_docs, store.len()),
        ));
    }
    tracing::info!(num_docs = store.len(), vocab_size = model.vocab_size(), nnz = store.matrix().nnz(), "loaded artifacts");
    Ok((model, store, manifest))
}
