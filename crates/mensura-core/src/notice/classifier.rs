//! Keyword-based document classification.

use tracing::debug;

use crate::models::{ClassifierConfig, DocumentKind};
use crate::text::{fold, NormalizedText};

/// Assigns a [`DocumentKind`] by keyword presence in fixed precedence order.
#[derive(Debug, Clone)]
pub struct DocumentClassifier {
    precedence: Vec<(DocumentKind, Vec<String>)>,
    notice_markers: Vec<String>,
}

impl DocumentClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let folded = |words: &[String]| -> Vec<String> {
            words
                .iter()
                .map(|w| fold(w.trim()))
                .filter(|w| !w.is_empty())
                .collect()
        };

        Self {
            precedence: config
                .precedence
                .iter()
                .map(|rule| (rule.kind, folded(&rule.keywords)))
                .collect(),
            notice_markers: folded(&config.notice_markers),
        }
    }

    pub fn classify(&self, text: &NormalizedText) -> DocumentKind {
        let haystack = text.folded();

        for (kind, keywords) in &self.precedence {
            if let Some(keyword) = keywords.iter().find(|k| haystack.contains(k.as_str())) {
                debug!(kind = %kind, keyword = keyword.as_str(), "Document classified");
                return *kind;
            }
        }

        if let Some(marker) = self
            .notice_markers
            .iter()
            .find(|m| haystack.contains(m.as_str()))
        {
            debug!(marker = marker.as_str(), "Legal notice marker found, classified as extract");
            return DocumentKind::Extract;
        }

        debug!("No classification keyword found");
        DocumentKind::Unknown
    }
}

impl Default for DocumentClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::KindKeywords;

    fn classify(text: &str) -> DocumentKind {
        DocumentClassifier::default().classify(&NormalizedText::from_text(text))
    }

    #[test]
    fn test_single_keyword() {
        assert_eq!(classify("SOLICITUD DE MENSURA"), DocumentKind::Mensura);
        assert_eq!(classify("Manifestación minera"), DocumentKind::Manifestation);
        assert_eq!(classify("pedimento LA ROSA"), DocumentKind::Pedimento);
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            classify("Rectificación de la solicitud de mensura de la manifestación"),
            DocumentKind::Rectification
        );
        assert_eq!(
            classify("Testificación de manifestación, pedimento anterior"),
            DocumentKind::Testification
        );
        assert_eq!(
            classify("EXTRACTO. Solicitud de mensura, Juzgado de Letras"),
            DocumentKind::Mensura
        );
    }

    #[test]
    fn test_notice_markers() {
        assert_eq!(
            classify("EXTRACTO Juzgado de Letras de Copiapó"),
            DocumentKind::Extract
        );
        assert_eq!(classify("Boletín Oficial de Minería"), DocumentKind::Extract);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify("lorem ipsum"), DocumentKind::Unknown);
        assert_eq!(classify(""), DocumentKind::Unknown);
    }

    #[test]
    fn test_custom_precedence() {
        let config = ClassifierConfig {
            precedence: vec![KindKeywords {
                kind: DocumentKind::Pedimento,
                keywords: vec!["pedimento".to_string()],
            }],
            notice_markers: Vec::new(),
        };
        let classifier = DocumentClassifier::new(&config);

        assert_eq!(
            classifier.classify(&NormalizedText::from_text("mensura y pedimento")),
            DocumentKind::Pedimento
        );
        assert_eq!(
            classifier.classify(&NormalizedText::from_text("EXTRACTO")),
            DocumentKind::Unknown
        );
    }
}
