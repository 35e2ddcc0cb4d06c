//! Writes the three-file index directory
//!
//! `index_native.bin` layout (little-endian, no padding):
//!
//! | offset | size        | field                         |
//! |--------|-------------|-------------------------------|
//! | 0      | 4           | magic `PLAG`                  |
//! | 4      | 4           | version u32 = 1               |
//! | 8      | 4           | N_docs u32                    |
//! | 12     | 8           | N_post9 u64                   |
//! | 20     | 8           | N_post13 u64 (0 in v1)        |
//! | 28     | 20 * N_docs | DocMeta records               |
//! | ...    | 12 * N_post9| Posting records               |
//!
//! Any write failure is fatal; a partially written directory is invalid.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::Thresholds;
use crate::Result;

use super::types::{DocInfo, DocMeta, Posting, INDEX_BIN, INDEX_DOCIDS, INDEX_MAGIC,
    INDEX_META, INDEX_VERSION};

#[derive(Serialize)]
struct DocMetaJson<'a> {
    tok_len: u32,
    simhash_hi: u64,
    simhash_lo: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<&'a str>,
}

#[derive(Serialize)]
struct MetaConfig {
    thresholds: Thresholds,
}

#[derive(Serialize)]
struct MetaStats {
    docs: u32,
    k9: u64,
    k13: u64,
}

#[derive(Serialize)]
struct MetaFile<'a> {
    docs_meta: BTreeMap<&'a str, DocMetaJson<'a>>,
    config: MetaConfig,
    stats: MetaStats,
}

/// Write `index_native.bin` plus the doc-id and metadata sidecars.
///
/// `docs`, `infos` and `postings` must already be consistent: one info per
/// meta, postings sorted ascending by `(shingle_hash, doc_idx)` with every
/// `doc_idx` below `docs.len()`.
pub fn write_index(
    out_dir: &Path,
    docs: &[DocMeta],
    infos: &[DocInfo],
    postings: &[Posting],
) -> Result<()> {
    fs::create_dir_all(out_dir)?;

    write_binary(&out_dir.join(INDEX_BIN), docs, postings)?;
    write_docids(&out_dir.join(INDEX_DOCIDS), infos)?;
    write_meta(&out_dir.join(INDEX_META), docs, infos, postings.len() as u64)?;
    Ok(())
}

fn write_binary(path: &Path, docs: &[DocMeta], postings: &[Posting]) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    out.write_all(&INDEX_MAGIC)?;
    out.write_all(&INDEX_VERSION.to_le_bytes())?;
    out.write_all(&(docs.len() as u32).to_le_bytes())?;
    out.write_all(&(postings.len() as u64).to_le_bytes())?;
    out.write_all(&0u64.to_le_bytes())?; // N_post13, reserved

    for dm in docs {
        out.write_all(&dm.tok_len.to_le_bytes())?;
        out.write_all(&dm.simhash_hi.to_le_bytes())?;
        out.write_all(&dm.simhash_lo.to_le_bytes())?;
    }
    for p in postings {
        out.write_all(&p.shingle_hash.to_le_bytes())?;
        out.write_all(&p.doc_idx.to_le_bytes())?;
    }
    out.flush()?;
    Ok(())
}

fn write_docids(path: &Path, infos: &[DocInfo]) -> Result<()> {
    let doc_ids: Vec<&str> = infos.iter().map(|i| i.doc_id.as_str()).collect();
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, &doc_ids)?;
    out.flush()?;
    Ok(())
}

fn write_meta(path: &Path, docs: &[DocMeta], infos: &[DocInfo], n_post9: u64) -> Result<()> {
    let mut docs_meta = BTreeMap::new();
    for (info, dm) in infos.iter().zip(docs) {
        docs_meta.insert(
            info.doc_id.as_str(),
            DocMetaJson {
                tok_len: dm.tok_len,
                simhash_hi: dm.simhash_hi,
                simhash_lo: dm.simhash_lo,
                title: (!info.title.is_empty()).then_some(info.title.as_str()),
                author: (!info.author.is_empty()).then_some(info.author.as_str()),
            },
        );
    }

    let meta = MetaFile {
        docs_meta,
        config: MetaConfig {
            thresholds: Thresholds::default(),
        },
        stats: MetaStats {
            docs: docs.len() as u32,
            k9: n_post9,
            k13: 0,
        },
    };

    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut out, &meta)?;
    out.flush()?;
    Ok(())
}
