//! # Tabelas Auxiliares — Divisão de Compostos e Palavras Curtas
//!
//! Listas de frequência extraídas da web estão cheias de "palavras" que na
//! verdade são duas palavras coladas (`"loveyou"`, `"iphone6s"`...). Além disso,
//! o Maximum Matching adora produzir fragmentos de 1–2 letras quando não acha
//! nada melhor. As duas tabelas deste módulo são derivadas do próprio léxico
//! e alimentam o pós-processamento ([`crate::postprocess`]):
//!
//! 1. **SplitTable**: `palavra → [parte1, parte2]` para entradas do léxico
//!    que são concatenações de duas palavras comuns.
//! 2. **ShortWordAllowlist**: palavras de até 2 letras que são legítimas
//!    ("of", "to", "a"...). Qualquer outro token curto é suspeito.
//!
//! Ambas são construídas uma vez na inicialização e nunca mais mudam.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::lexicon::Lexicon;
use crate::matcher::forward_max_match;

/// Palavras de uma letra aceitas por padrão ("a", "i", e o "u" das redes sociais).
pub const DEFAULT_SINGLE_LETTER_WORDS: &[&str] = &["a", "i", "u"];

/// Parâmetros padrão para construir as tabelas a partir de uma lista de
/// frequências grande (na ordem de 10^5 palavras).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefaults {
    /// Quantas palavras do topo do ranking formam o sub-léxico de referência.
    pub reference_words: usize,
    /// Só palavras a partir deste rank são candidatas a divisão.
    pub low_rank_threshold: usize,
    /// Tamanho máximo de uma "palavra curta".
    pub short_word_max_len: usize,
    /// Palavras curtas legítimas são buscadas só entre as `short_word_rank_bound` primeiras.
    pub short_word_rank_bound: usize,
    /// Limite de palavras do léxico carregadas.
    pub lexicon_limit: usize,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            reference_words: 250,
            low_rank_threshold: 20_000,
            short_word_max_len: 2,
            short_word_rank_bound: 200,
            lexicon_limit: 75_000,
        }
    }
}

/// Mapeia palavras do léxico para as sub-palavras que as compõem.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitTable {
    splits: HashMap<String, Vec<String>>,
}

impl SplitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra uma divisão. As partes concatenadas devem reconstruir a palavra
    /// e ser pelo menos duas; entradas inválidas são recusadas.
    pub fn insert(&mut self, word: impl Into<String>, parts: Vec<String>) -> bool {
        let word = word.into();
        if parts.len() < 2 || parts.concat() != word {
            return false;
        }
        self.splits.insert(word, parts);
        true
    }

    pub fn get(&self, word: &str) -> Option<&[String]> {
        self.splits.get(word).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.splits.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl<W: Into<String>> FromIterator<(W, Vec<String>)> for SplitTable {
    fn from_iter<T: IntoIterator<Item = (W, Vec<String>)>>(iter: T) -> Self {
        let mut table = SplitTable::new();
        for (word, parts) in iter {
            let word = word.into();
            if !table.insert(word.clone(), parts) {
                warn!(word = %word, "divisão inválida ignorada: as partes não reconstroem a palavra");
            }
        }
        table
    }
}

/// Palavras curtas (≤ 2 caracteres) consideradas tokens legítimos.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortWordAllowlist {
    words: HashSet<String>,
}

impl ShortWordAllowlist {
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ShortWordAllowlist {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            words: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Constrói a tabela de divisão.
///
/// Cada palavra a partir de `low_rank_threshold` no ranking é segmentada com
/// Forward Maximum Matching usando **apenas** o sub-léxico de referência
/// (as palavras mais comuns). Se o resultado tiver exatamente dois tokens e
/// ambos tiverem mais de um caractere, a palavra é considerada um composto
/// acidental.
///
/// Falha com `EmptyLexicon` se `reference_words` estiver vazio.
///
/// # Exemplo
/// ```rust
/// use maxmatch_core::tables::build_split_table;
///
/// let lexicon = ["love", "you", "so", "loveyou", "sooo"];
/// let table = build_split_table(&lexicon, &lexicon[..3], 3).unwrap();
/// assert_eq!(table.get("loveyou").unwrap(), ["love", "you"]);
/// // "sooo" -> "so", "o", "o": três tokens, não entra
/// assert!(table.get("sooo").is_none());
/// ```
pub fn build_split_table<S, R>(lexicon_words: &[S], reference_words: &[R], low_rank_threshold: usize) -> Result<SplitTable>
where
    S: AsRef<str> + Sync,
    R: AsRef<str>,
{
    let reference = Lexicon::new(reference_words.iter().map(|w| w.as_ref().to_string()))?;
    let candidates = lexicon_words.get(low_rank_threshold..).unwrap_or(&[]);

    // Cada palavra é independente: paraleliza a varredura do léxico via Rayon
    let splits: HashMap<String, Vec<String>> = candidates
        .par_iter()
        .filter_map(|word| {
            let word = word.as_ref();
            let parts = forward_max_match(&reference, word);
            let is_compound = parts.len() == 2 && parts.iter().all(|p| p.chars().count() > 1);
            is_compound.then(|| (word.to_string(), parts))
        })
        .collect();

    debug!(candidates = candidates.len(), splits = splits.len(), "tabela de divisão construída");
    Ok(SplitTable { splits })
}

/// Constrói a lista de palavras curtas legítimas.
///
/// Pega as palavras com `1 < tamanho <= max_len` entre as `rank_bound`
/// primeiras do ranking e acrescenta `extra` (ou
/// [`DEFAULT_SINGLE_LETTER_WORDS`] quando `None`).
pub fn build_short_word_allowlist<S: AsRef<str>>(
    lexicon_words: &[S],
    max_len: usize,
    rank_bound: usize,
    extra: Option<&[&str]>,
) -> ShortWordAllowlist {
    let top = &lexicon_words[..rank_bound.min(lexicon_words.len())];
    let words: HashSet<String> = top
        .iter()
        .map(AsRef::as_ref)
        .filter(|w| {
            let len = w.chars().count();
            len > 1 && len <= max_len
        })
        .chain(extra.unwrap_or(DEFAULT_SINGLE_LETTER_WORDS).iter().copied())
        .map(str::to_string)
        .collect();

    debug!(words = words.len(), "lista de palavras curtas construída");
    ShortWordAllowlist { words }
}
