//! Subcommand implementations.

use std::{io::Read as _, path::Path};

use anyhow::{Context as _, anyhow, bail};
use cv_core::{document::CvDocument, store::DocumentStore};
use cv_markup::{inline_to_plain_text, parse_document, parse_inline, to_plain_text};
use cv_migrate::migrate;
use cv_store_sqlite::SqliteStore;
use cv_sync::{
  SaveOutcome, StripKeys, SyncPlan, fingerprint, fingerprint_value,
  load_document, plan, save_document,
};
use serde_json::Value;

// ─── Input ───────────────────────────────────────────────────────────────────

/// Read a JSON file, or stdin when `path` is `-`.
pub fn read_json(path: &Path) -> anyhow::Result<Value> {
  let raw = if path == Path::new("-") {
    let mut buf = String::new();
    std::io::stdin()
      .read_to_string(&mut buf)
      .context("failed to read stdin")?;
    buf
  } else {
    std::fs::read_to_string(path)
      .with_context(|| format!("failed to read {}", path.display()))?
  };
  serde_json::from_str(&raw)
    .with_context(|| format!("{} is not valid JSON", path.display()))
}

fn read_document(path: &Path) -> anyhow::Result<CvDocument> {
  Ok(migrate(&read_json(path)?))
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

// ─── Pure commands ───────────────────────────────────────────────────────────

pub fn migrate_file(path: &Path) -> anyhow::Result<()> {
  print_json(&read_document(path)?)
}

/// A rich-text field addressed on the command line as `summary` or
/// `<section>.<index>` (e.g. `experiences.0`, `skills.2`).
pub fn select_field<'a>(doc: &'a CvDocument, field: &str) -> anyhow::Result<&'a str> {
  if field == "summary" {
    return Ok(doc.summary.as_str());
  }

  let (section, index) = field
    .split_once('.')
    .ok_or_else(|| anyhow!("unknown field {field:?}"))?;
  let index: usize = index
    .parse()
    .with_context(|| format!("bad entry index in {field:?}"))?;
  let missing = || anyhow!("{section} has no entry {index}");

  let markup: &str = match section {
    "experiences" => &doc.experiences.get(index).ok_or_else(missing)?.description,
    "education" => &doc.education.get(index).ok_or_else(missing)?.description,
    "skills" => &doc.skills.get(index).ok_or_else(missing)?.skills,
    "courses" => &doc.courses.get(index).ok_or_else(missing)?.description,
    "awards" => &doc.awards.get(index).ok_or_else(missing)?.description,
    other => bail!("section {other:?} has no rich-text field"),
  };
  Ok(markup)
}

pub fn render(
  path: &Path,
  field: &str,
  inline: bool,
  tree: bool,
) -> anyhow::Result<()> {
  let doc = read_document(path)?;
  let markup = select_field(&doc, field)?;

  if inline {
    let content = parse_inline(markup);
    if tree {
      return print_json(&content);
    }
    if content.is_empty() {
      tracing::info!(field, "field is empty");
    } else {
      println!("{}", inline_to_plain_text(&content));
    }
  } else {
    let content = parse_document(markup);
    if tree {
      return print_json(&content);
    }
    if content.is_empty() {
      tracing::info!(field, "field is empty");
    } else {
      println!("{}", to_plain_text(&content));
    }
  }
  Ok(())
}

pub fn fingerprint_file(
  path: &Path,
  raw: bool,
  strip: &StripKeys,
) -> anyhow::Result<()> {
  let value = read_json(path)?;
  let digest = if raw {
    fingerprint_value(&value, strip)
  } else {
    fingerprint(&migrate(&value), strip)
  };
  println!("{digest}");
  Ok(())
}

/// Compare `local` against `remote`, both migrated first. Returns whether
/// they are in sync.
pub fn compare(
  local: &Path,
  remote: &Path,
  strip: &StripKeys,
) -> anyhow::Result<bool> {
  let local_doc = read_document(local)?;
  let remote_value = read_document(remote)?.to_json()?;

  match plan(&local_doc, Some(&remote_value), strip) {
    SyncPlan::InSync => {
      println!("in sync");
      Ok(true)
    }
    SyncPlan::PushLocal { local, remote } => {
      println!("differ\n  local:  {local}\n  remote: {remote}");
      Ok(false)
    }
    SyncPlan::CreateRemote => {
      println!("remote missing");
      Ok(false)
    }
  }
}

// ─── Store commands ──────────────────────────────────────────────────────────

pub async fn import(
  store: &SqliteStore,
  path: &Path,
  key: &str,
  strip: &StripKeys,
) -> anyhow::Result<()> {
  let doc = read_document(path)?;
  let outcome = save_document(store, key, &doc, strip)
    .await
    .with_context(|| format!("failed to save {key:?}"))?;
  match outcome {
    SaveOutcome::Written => println!("imported {key}"),
    SaveOutcome::Unchanged => println!("{key} unchanged"),
  }
  Ok(())
}

pub async fn export(store: &SqliteStore, key: &str) -> anyhow::Result<()> {
  let doc = load_document(store, key)
    .await
    .ok_or_else(|| anyhow!("no document stored under {key:?}"))?;
  print_json(&doc)
}

pub async fn list(store: &SqliteStore) -> anyhow::Result<()> {
  for key in store.keys().await.context("failed to list keys")? {
    match store.updated_at(&key).await? {
      Some(at) => println!("{key}\t{}", at.to_rfc3339()),
      None => println!("{key}"),
    }
  }
  Ok(())
}

pub async fn delete(store: &SqliteStore, key: &str) -> anyhow::Result<()> {
  if store.delete(key).await.context("failed to delete")? {
    println!("deleted {key}");
  } else {
    println!("{key} not found");
  }
  Ok(())
}
