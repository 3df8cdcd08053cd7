//! # Pipeline de Segmentação — Orquestrador com Eventos Observáveis
//!
//! O [`Segmenter`] junta léxico, estratégia de matching e as passadas de
//! correção, e emite eventos em cada passo via um canal Rust (`mpsc`),
//! permitindo que o servidor WebSocket transmita o progresso em tempo real.
//!
//! ## Fluxo
//!
//! 1. **Matching** ([`crate::matcher`]): segmentação bruta com a estratégia escolhida.
//! 2. **Correções** ([`crate::postprocess`]): recheck de palavras curtas e
//!    expansão pela tabela de divisão, se o segmentador tiver essas tabelas.
//! 3. **Avaliação** ([`crate::scorer`], opcional): WER contra uma referência.

use std::sync::mpsc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::corpus::{demo_lexicon, demo_table_params, MISSING_WORDS};
use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::matcher::{segment, MatchStrategy};
use crate::postprocess::{apply_corrections_with, Correction};
use crate::scorer::word_error_rate;
use crate::tables::{build_short_word_allowlist, build_split_table, ShortWordAllowlist, SplitTable, TableDefaults};

/// Opções por chamada.
///
/// As passadas de correção só rodam se o [`Segmenter`] tiver a tabela
/// correspondente; desligá-las aqui permite comparar a saída bruta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentOptions {
    pub strategy: MatchStrategy,
    pub short_word_check: bool,
    pub split_tokens: bool,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::Forward,
            short_word_check: true,
            split_tokens: true,
        }
    }
}

impl SegmentOptions {
    pub fn with_strategy(strategy: MatchStrategy) -> Self {
        Self { strategy, ..Self::default() }
    }

    /// Só o matching, sem nenhuma correção.
    pub fn raw(strategy: MatchStrategy) -> Self {
        Self {
            strategy,
            short_word_check: false,
            split_tokens: false,
        }
    }
}

/// Quais recursos montar ao construir um segmentador a partir de uma lista ranqueada.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BuildOptions {
    /// Acrescenta [`MISSING_WORDS`] ao léxico.
    pub extra_words: bool,
    /// Constrói a lista de palavras curtas.
    pub short_words: bool,
    /// Constrói a tabela de divisão.
    pub split_tokens: bool,
}

/// Resultado de uma segmentação.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segmentation {
    pub tokens: Vec<String>,
    pub corrections: Vec<Correction>,
    /// Presente só quando houve referência e ela não era vazia.
    pub wer: Option<f64>,
}

/// Eventos emitidos durante o processamento de uma linha.
///
/// Permitem que a UI mostre o "raciocínio" do segmentador passo a passo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum SegmentEvent {
    /// **Passo 1**: matching bruto concluído.
    MatchDone {
        strategy: MatchStrategy,
        tokens: Vec<String>,
        total: usize,
    },
    /// **Passo 2**: uma correção foi aplicada (uma por evento).
    /// `tokens` é a lista logo após esta correção; `correction.index` aponta para ela.
    Corrected {
        correction: Correction,
        tokens: Vec<String>,
    },
    /// **Passo 3 (opcional)**: WER contra a referência.
    Scored {
        reference: Vec<String>,
        wer: f64,
    },
    /// **Conclusão**.
    Done {
        tokens: Vec<String>,
        corrections: Vec<Correction>,
        wer: Option<f64>,
        processing_ms: u64,
    },
    /// Falha não fatal (ex: referência vazia). A segmentação continua valendo.
    Error {
        message: String,
    },
}

/// O segmentador: léxico imutável mais as tabelas auxiliares opcionais.
///
/// É `Send + Sync` e pode ser compartilhado entre threads por referência ou `Arc`.
#[derive(Debug, Clone)]
pub struct Segmenter {
    lexicon: Lexicon,
    split_table: Option<SplitTable>,
    short_words: Option<ShortWordAllowlist>,
}

impl Segmenter {
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            split_table: None,
            short_words: None,
        }
    }

    pub fn with_split_table(mut self, split_table: SplitTable) -> Self {
        self.split_table = Some(split_table);
        self
    }

    pub fn with_short_words(mut self, short_words: ShortWordAllowlist) -> Self {
        self.short_words = Some(short_words);
        self
    }

    /// Monta o segmentador a partir de uma lista ranqueada (mais frequente primeiro).
    ///
    /// A lista é truncada em `params.lexicon_limit`; as tabelas auxiliares são
    /// derivadas dessa lista truncada, sem as palavras extras.
    pub fn from_ranked_words<S: AsRef<str> + Sync>(words: &[S], params: &TableDefaults, options: BuildOptions) -> Result<Self> {
        let ranked = &words[..params.lexicon_limit.min(words.len())];
        let extra: &[&str] = if options.extra_words { MISSING_WORDS } else { &[] };

        let lexicon = Lexicon::with_extra(ranked.iter().map(|w| w.as_ref().to_string()), extra.iter().copied())?;
        let mut segmenter = Self::new(lexicon);

        if options.split_tokens {
            let reference = &ranked[..params.reference_words.min(ranked.len())];
            segmenter = segmenter.with_split_table(build_split_table(ranked, reference, params.low_rank_threshold)?);
        }
        if options.short_words {
            segmenter = segmenter.with_short_words(build_short_word_allowlist(
                ranked,
                params.short_word_max_len,
                params.short_word_rank_bound,
                None,
            ));
        }

        debug!(
            lexicon = segmenter.lexicon.len(),
            splits = segmenter.split_table.as_ref().map_or(0, SplitTable::len),
            short_words = segmenter.short_words.as_ref().map_or(0, ShortWordAllowlist::len),
            "segmentador pronto"
        );
        Ok(segmenter)
    }

    /// Segmentador de demonstração com todas as tabelas montadas.
    pub fn demo() -> Result<Self> {
        let options = BuildOptions {
            extra_words: true,
            short_words: true,
            split_tokens: true,
        };
        Self::from_ranked_words(&demo_lexicon(), &demo_table_params(), options)
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    pub fn split_table(&self) -> Option<&SplitTable> {
        self.split_table.as_ref()
    }

    pub fn short_words(&self) -> Option<&ShortWordAllowlist> {
        self.short_words.as_ref()
    }

    /// Segmenta com as opções padrão (Forward + correções disponíveis).
    pub fn segment(&self, text: &str) -> Vec<String> {
        self.segment_with(text, SegmentOptions::default()).tokens
    }

    /// Segmenta de forma síncrona, consumindo os eventos do pipeline.
    pub fn segment_with(&self, text: &str, options: SegmentOptions) -> Segmentation {
        let (tx, rx) = mpsc::channel();
        self.segment_streaming(text, options, None, tx);

        let mut result = Segmentation {
            tokens: vec![],
            corrections: vec![],
            wer: None,
        };
        while let Ok(event) = rx.recv() {
            if let SegmentEvent::Done { tokens, corrections, wer, .. } = event {
                result = Segmentation { tokens, corrections, wer };
            }
        }
        result
    }

    /// Segmenta e calcula a WER contra `reference`.
    ///
    /// Falha com `EmptyReference` se a referência for vazia.
    pub fn score<S: AsRef<str>>(&self, text: &str, options: SegmentOptions, reference: &[S]) -> Result<Segmentation> {
        let mut segmentation = self.segment_with(text, options);
        segmentation.wer = Some(word_error_rate(&segmentation.tokens, reference)?);
        Ok(segmentation)
    }

    /// Executa o pipeline enviando eventos de progresso.
    ///
    /// # Fluxo de Eventos
    /// 1. `MatchDone`
    /// 2. `Corrected` (um por correção)
    /// 3. `Scored` ou `Error` (só com referência)
    /// 4. `Done`
    pub fn segment_streaming(
        &self,
        text: &str,
        options: SegmentOptions,
        reference: Option<&[String]>,
        tx: mpsc::Sender<SegmentEvent>,
    ) {
        let start = Instant::now();

        // === Passo 1: Matching ===
        let mut tokens = segment(&self.lexicon, text, options.strategy);
        let _ = tx.send(SegmentEvent::MatchDone {
            strategy: options.strategy,
            tokens: tokens.clone(),
            total: tokens.len(),
        });

        // === Passo 2: Correções ===
        let split_table = self.split_table.as_ref().filter(|_| options.split_tokens);
        let short_words = self.short_words.as_ref().filter(|_| options.short_word_check);
        let mut corrections = Vec::new();
        apply_corrections_with(&self.lexicon, &mut tokens, split_table, short_words, |correction, current| {
            let _ = tx.send(SegmentEvent::Corrected {
                correction: correction.clone(),
                tokens: current.to_vec(),
            });
            corrections.push(correction.clone());
        });

        // === Passo 3: Avaliação ===
        let wer = reference.and_then(|reference| match word_error_rate(&tokens, reference) {
            Ok(wer) => {
                let _ = tx.send(SegmentEvent::Scored {
                    reference: reference.to_vec(),
                    wer,
                });
                Some(wer)
            }
            Err(err) => {
                let _ = tx.send(SegmentEvent::Error { message: err.to_string() });
                None
            }
        });

        let _ = tx.send(SegmentEvent::Done {
            tokens,
            corrections,
            wer,
            processing_ms: start.elapsed().as_millis() as u64,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SegmentError;

    #[test]
    fn test_demo_split_table_repairs_compounds() {
        let segmenter = Segmenter::demo().unwrap();
        let table = segmenter.split_table().unwrap();
        assert_eq!(table.get("newyork").unwrap(), ["new", "york"]);
        assert_eq!(table.get("happybirthday").unwrap(), ["happy", "birthday"]);
        // "teamfollow" vira "team" + "follow"
        assert!(table.get("teamfollow").is_some());

        let tokens = segmenter.segment("ilovenewyork");
        assert_eq!(tokens, vec!["i", "love", "new", "york"]);
    }

    #[test]
    fn test_raw_options_skip_corrections() {
        let segmenter = Segmenter::demo().unwrap();
        let result = segmenter.segment_with("ilovenewyork", SegmentOptions::raw(MatchStrategy::Forward));
        assert_eq!(result.tokens, vec!["i", "love", "newyork"]);
        assert!(result.corrections.is_empty());
    }

    #[test]
    fn test_extra_words_in_demo() {
        let segmenter = Segmenter::demo().unwrap();
        assert!(segmenter.lexicon().contains("mentalist"));
        assert_eq!(segmenter.segment("thementalist"), vec!["the", "mentalist"]);
    }

    #[test]
    fn test_score() {
        let segmenter = Segmenter::demo().unwrap();
        let result = segmenter
            .score("ilovenewyork", SegmentOptions::default(), &["i", "love", "new", "york"])
            .unwrap();
        assert_eq!(result.wer, Some(0.0));

        let empty: [&str; 0] = [];
        let err = segmenter.score("ilovenewyork", SegmentOptions::default(), &empty).unwrap_err();
        assert_eq!(err, SegmentError::EmptyReference);
    }

    #[test]
    fn test_from_ranked_words_limit() {
        let words = ["new", "york", "newyork"];
        let params = TableDefaults {
            lexicon_limit: 2,
            ..TableDefaults::default()
        };
        let segmenter = Segmenter::from_ranked_words(&words, &params, BuildOptions::default()).unwrap();
        assert!(!segmenter.lexicon().contains("newyork"));
        assert!(segmenter.split_table().is_none());
        assert!(segmenter.short_words().is_none());
    }

    #[test]
    fn test_empty_ranked_words_fail() {
        let words: [&str; 0] = [];
        let err = Segmenter::from_ranked_words(&words, &TableDefaults::default(), BuildOptions::default()).unwrap_err();
        assert_eq!(err, SegmentError::EmptyLexicon);
    }

    #[test]
    fn test_streaming_events_order() {
        let segmenter = Segmenter::demo().unwrap();
        let (tx, rx) = mpsc::channel();
        let reference = vec!["i".to_string(), "love".to_string(), "new".to_string(), "york".to_string()];
        segmenter.segment_streaming("ilovenewyork", SegmentOptions::default(), Some(reference.as_slice()), tx);

        let events: Vec<SegmentEvent> = rx.try_iter().collect();
        assert!(matches!(&events[0], SegmentEvent::MatchDone { total: 3, .. }));
        assert!(events.iter().any(|e| matches!(e, SegmentEvent::Corrected { .. })));
        assert!(events.iter().any(|e| matches!(e, SegmentEvent::Scored { wer, .. } if *wer == 0.0)));
        assert!(matches!(events.last().unwrap(), SegmentEvent::Done { wer: Some(_), .. }));
    }

    #[test]
    fn test_corrected_events_carry_step_snapshots() {
        let lexicon = Lexicon::new(["a", "ab", "newyork", "new", "york"]).unwrap();
        let table: SplitTable = [("newyork", vec!["new".to_string(), "york".to_string()])]
            .into_iter()
            .collect();
        let allow: ShortWordAllowlist = ["a"].into_iter().collect();
        let segmenter = Segmenter::new(lexicon).with_split_table(table).with_short_words(allow);

        let (tx, rx) = mpsc::channel();
        segmenter.segment_streaming("newyorkab", SegmentOptions::default(), None, tx);
        let events: Vec<SegmentEvent> = rx.try_iter().collect();

        // O recheck de "ab" não muda nada e não gera evento; só a divisão aparece
        let corrected: Vec<(&Correction, &Vec<String>)> = events
            .iter()
            .filter_map(|e| match e {
                SegmentEvent::Corrected { correction, tokens } => Some((correction, tokens)),
                _ => None,
            })
            .collect();
        assert_eq!(corrected.len(), 1);
        let (correction, tokens) = corrected[0];
        assert!(matches!(correction, Correction::Split { index: 0, word, .. } if word == "newyork"));
        assert_eq!(tokens, &vec!["new", "york", "ab"]);

        assert!(matches!(events.last().unwrap(), SegmentEvent::Done { corrections, .. } if corrections.len() == 1));
    }

    #[test]
    fn test_corrected_index_matches_event_tokens() {
        let lexicon = Lexicon::new(["a", "ab", "bc", "c", "newyork", "new", "york"]).unwrap();
        let table: SplitTable = [("newyork", vec!["new".to_string(), "york".to_string()])]
            .into_iter()
            .collect();
        let allow: ShortWordAllowlist = ["zz"].into_iter().collect();
        let segmenter = Segmenter::new(lexicon).with_split_table(table).with_short_words(allow);

        let (tx, rx) = mpsc::channel();
        segmenter.segment_streaming("abcnewyork", SegmentOptions::default(), None, tx);

        let snapshots: Vec<(Correction, Vec<String>)> = rx
            .try_iter()
            .filter_map(|e| match e {
                SegmentEvent::Corrected { correction, tokens } => Some((correction, tokens)),
                _ => None,
            })
            .collect();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[0].1, vec!["a", "bc", "newyork"]);
        assert_eq!(snapshots[1].1, vec!["ab", "c", "newyork"]);
        assert_eq!(snapshots[2].1, vec!["ab", "c", "new", "york"]);

        for (correction, tokens) in &snapshots {
            match correction {
                Correction::ShortWord { direction: MatchStrategy::Backward, index, replacement, .. } => {
                    assert_eq!(&tokens[..replacement.len()], replacement.as_slice());
                    assert!(*index < tokens.len());
                }
                Correction::ShortWord { index, replacement, .. } => {
                    assert_eq!(&tokens[*index..], replacement.as_slice());
                }
                Correction::Split { index, parts, .. } => {
                    assert_eq!(&tokens[*index..*index + parts.len()], parts.as_slice());
                }
            }
        }
    }

    #[test]
    fn test_streaming_empty_reference_reports_error() {
        let segmenter = Segmenter::demo().unwrap();
        let (tx, rx) = mpsc::channel();
        let empty: Vec<String> = vec![];
        segmenter.segment_streaming("nowplaying", SegmentOptions::default(), Some(empty.as_slice()), tx);

        let events: Vec<SegmentEvent> = rx.try_iter().collect();
        assert!(events.iter().any(|e| matches!(e, SegmentEvent::Error { .. })));
        assert!(matches!(events.last().unwrap(), SegmentEvent::Done { wer: None, .. }));
    }

    #[test]
    fn test_event_json_shape() {
        let event = SegmentEvent::MatchDone {
            strategy: MatchStrategy::FrontBack,
            tokens: vec!["now".into(), "playing".into()],
            total: 2,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "MatchDone");
        assert_eq!(json["data"]["strategy"], "front_back");
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: SegmentOptions = serde_json::from_str(r#"{"strategy": "backward"}"#).unwrap();
        assert_eq!(options.strategy, MatchStrategy::Backward);
        assert!(options.short_word_check);
        assert!(options.split_tokens);
    }
}
