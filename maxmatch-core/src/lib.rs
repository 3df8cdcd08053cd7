//! # maxmatch-core — Segmentação de Hashtags por Maximum Matching
//!
//! Este crate divide textos sem delimitadores (hashtags, palavras compostas)
//! em palavras usando um dicionário e busca gulosa pela maior palavra.
//! Ele foi projetado para ser didático e modular, permitindo comparar
//! estratégias de matching e o efeito de cada correção.
//!
//! ## Arquitetura do Sistema
//!
//! 1.  **Entrada**: Linha limpa (minúsculas, sem `#`), ver [`corpus`].
//! 2.  **Léxico** ([`lexicon`]): conjunto imutável de palavras conhecidas.
//! 3.  **Matching** ([`matcher`]): Forward, Backward ou Front-Back Maximum Matching.
//! 4.  **Correções** ([`postprocess`]): recheck de palavras curtas e divisão de
//!     compostos, usando as tabelas de [`tables`].
//! 5.  **Avaliação** ([`scorer`]): distância de edição e Word Error Rate contra uma referência.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use maxmatch_core::{MatchStrategy, SegmentOptions, Segmenter};
//!
//! // 1. Segmentador de demonstração (léxico pequeno + tabelas auxiliares)
//! let segmenter = Segmenter::demo().unwrap();
//!
//! // 2. Segmenta uma hashtag já limpa
//! let result = segmenter.segment_with("ilovenewyork", SegmentOptions::with_strategy(MatchStrategy::Backward));
//!
//! // 3. A concatenação dos tokens é sempre o texto original
//! assert_eq!(result.tokens.concat(), "ilovenewyork");
//! ```

pub mod corpus;
pub mod error;
pub mod lexicon;
pub mod matcher;
pub mod pipeline;
pub mod postprocess;
pub mod scorer;
pub mod tables;

pub use error::{Result, SegmentError};
pub use lexicon::{build_lexicon, Lexicon};
pub use matcher::{segment, MatchStrategy};
pub use pipeline::{BuildOptions, SegmentEvent, SegmentOptions, Segmentation, Segmenter};
pub use postprocess::{post_process, Correction};
pub use scorer::{edit_distance, word_error_rate, WerSummary};
pub use tables::{build_short_word_allowlist, build_split_table, ShortWordAllowlist, SplitTable, TableDefaults};
