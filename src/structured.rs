//! Structure-preserving record translation.
//!
//! Walks a property record, translates exactly its human-readable fields
//! through the text translator, and reassembles a record of identical
//! shape. Identifiers, measurements, enumerations, relational references
//! and unknown extra fields come back byte-identical.

use crate::i18n::Language;
use crate::property::PropertyRecord;
use crate::translator::TextTranslator;

/// A translated record plus how many of its text fields had to fall back
/// to source language. Partial translation is acceptable; the operation as
/// a whole never fails.
#[derive(Debug, Clone)]
pub struct RecordTranslation {
    pub record: PropertyRecord,
    pub fallback_fields: usize,
}

impl RecordTranslation {
    /// Whether any field is still in source language.
    pub fn is_degraded(&self) -> bool {
        self.fallback_fields > 0
    }
}

/// Translates property records field by field via a `TextTranslator`.
pub struct StructuredTranslator<'a> {
    translator: &'a TextTranslator,
}

impl<'a> StructuredTranslator<'a> {
    pub fn new(translator: &'a TextTranslator) -> Self {
        Self { translator }
    }

    /// Translate the record's text fields into `target`.
    ///
    /// Records are always authored in the canonical language, so a canonical
    /// target returns the record unchanged with zero provider calls. The
    /// text fields are dispatched as one batch; a field whose translation
    /// degrades keeps its source text and is counted in `fallback_fields`.
    pub async fn translate_record(
        &self,
        record: &PropertyRecord,
        target: Language,
    ) -> RecordTranslation {
        let source = Language::canonical();
        if target == source {
            return RecordTranslation {
                record: record.clone(),
                fallback_fields: 0,
            };
        }

        // Collect the text fields in a fixed order so the batch result can
        // be written back by position.
        let mut texts: Vec<String> = Vec::new();
        texts.push(record.title.clone());
        if let Some(description) = &record.description {
            texts.push(description.clone());
        }
        for image in &record.images {
            if let Some(title) = &image.title {
                texts.push(title.clone());
            }
            if let Some(caption) = &image.caption {
                texts.push(caption.clone());
            }
        }

        let translations = self.translator.translate_batch(&texts, source, target).await;
        let fallback_fields = translations.iter().filter(|t| t.is_fallback()).count();

        let mut translated = record.clone();
        let mut next = translations.into_iter();
        let mut take = || {
            next.next()
                .expect("batch output matches collected field count")
                .into_text()
        };

        translated.title = take();
        if translated.description.is_some() {
            translated.description = Some(take());
        }
        for image in &mut translated.images {
            if image.title.is_some() {
                image.title = Some(take());
            }
            if image.caption.is_some() {
                image.caption = Some(take());
            }
        }

        RecordTranslation {
            record: translated,
            fallback_fields,
        }
    }
}
