//! Per-document preview pipeline
//!
//! decode -> normalize -> resolve palette -> composite. Every document is
//! independent: a failure turns into [`PreviewOutcome::Unavailable`] for
//! that document only, and batches keep going.

use rayon::prelude::*;
use thiserror::Error;

use crate::cells::{decode_cells, DecodeError};
use crate::compositor::{composite, CompositeError, Composition};
use crate::models::Document;
use crate::normalize::normalize;
use crate::resolve::{PaletteError, PaletteResolver};

/// Coarse failure classes callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Cell array or palette reference missing
    NotFound,
    /// Cell array present but unusable
    MalformedInput,
    /// A color index has no palette entry
    PaletteLookup,
    /// Palette reference names no registered palette
    UnknownPaletteKey,
    /// Anything else (bad scale, oversized canvas)
    Other,
}

/// Why a document could not be previewed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreviewError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error(transparent)]
    Composite(#[from] CompositeError),
}

impl PreviewError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PreviewError::Decode(DecodeError::NotFound) => ErrorKind::NotFound,
            PreviewError::Decode(_) => ErrorKind::MalformedInput,
            PreviewError::Palette(PaletteError::MarkerNotFound) => ErrorKind::NotFound,
            PreviewError::Palette(_) => ErrorKind::UnknownPaletteKey,
            PreviewError::Composite(CompositeError::PaletteLookup { .. }) => ErrorKind::PaletteLookup,
            PreviewError::Composite(_) => ErrorKind::Other,
        }
    }
}

/// Result of previewing one document.
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewOutcome {
    Rendered { name: String, composition: Composition },
    Unavailable { name: String, error: PreviewError },
}

impl PreviewOutcome {
    pub fn name(&self) -> &str {
        match self {
            PreviewOutcome::Rendered { name, .. } | PreviewOutcome::Unavailable { name, .. } => name,
        }
    }

    pub fn is_rendered(&self) -> bool {
        matches!(self, PreviewOutcome::Rendered { .. })
    }
}

/// Run the full pipeline on one document's text.
///
/// # Examples
///
/// ```
/// use gridpaint::models::Palette;
/// use gridpaint::pipeline::preview_text;
/// use gridpaint::registry::PaletteRegistry;
/// use gridpaint::resolve::PaletteResolver;
///
/// let mut registry = PaletteRegistry::new();
/// registry.register(Palette::from_rgba("canvas", &[[255, 0, 0, 128]]));
/// let resolver = PaletteResolver::new(&registry);
///
/// let text = r#"
/// [ext_resource path="res://canvas.meshlib" type="MeshLibrary" id=1]
/// data = { "cells": PoolIntArray( 0, 0, 0, 65537, 0, 0 ) }
/// "#;
/// let composition = preview_text(text, &resolver, 10).unwrap();
/// assert_eq!(composition.pixel_size(), (20, 20));
/// ```
pub fn preview_text(
    text: &str,
    resolver: &PaletteResolver<'_>,
    scale: u32,
) -> Result<Composition, PreviewError> {
    let cells = normalize(&decode_cells(text)?);
    let palette = resolver.resolve(text)?;
    Ok(composite(&cells, palette, scale)?)
}

/// Preview one document, capturing failure as an outcome.
pub fn preview_document(doc: &Document, resolver: &PaletteResolver<'_>, scale: u32) -> PreviewOutcome {
    match preview_text(&doc.text, resolver, scale) {
        Ok(composition) => {
            tracing::debug!(
                document = %doc.name,
                cells = composition.fills.len(),
                width = composition.grid.width,
                height = composition.grid.height,
                "composed preview"
            );
            PreviewOutcome::Rendered { name: doc.name.clone(), composition }
        }
        Err(error) => {
            tracing::warn!(document = %doc.name, kind = ?error.kind(), %error, "no preview");
            PreviewOutcome::Unavailable { name: doc.name.clone(), error }
        }
    }
}

/// Preview many documents in parallel; outcomes keep input order.
pub fn preview_batch(docs: &[Document], resolver: &PaletteResolver<'_>, scale: u32) -> Vec<PreviewOutcome> {
    docs.par_iter().map(|doc| preview_document(doc, resolver, scale)).collect()
}

/// Like [`preview_batch`], but gives up once `keep_going` returns false.
///
/// `keep_going` is checked before each document; `None` means the batch was
/// abandoned and any finished outcomes were dropped.
pub fn preview_batch_while<F>(
    docs: &[Document],
    resolver: &PaletteResolver<'_>,
    scale: u32,
    keep_going: F,
) -> Option<Vec<PreviewOutcome>>
where
    F: Fn() -> bool + Sync,
{
    docs.par_iter().map(|doc| keep_going().then(|| preview_document(doc, resolver, scale))).collect()
}
