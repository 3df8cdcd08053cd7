//! # Léxico
//!
//! O léxico é o dicionário de palavras conhecidas contra o qual o texto é
//! segmentado. Ele é construído uma única vez a partir de uma lista de palavras
//! (normalmente ordenada por frequência) e nunca mais muda.
//!
//! Além do conjunto de palavras, guardamos o tamanho da maior palavra
//! (`max_word_len`), que limita a janela de busca dos algoritmos de
//! Maximum Matching: nenhuma substring maior que isso pode estar no léxico.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use maxmatch_core::lexicon::Lexicon;
//!
//! let lexicon = Lexicon::new(["love", "lovely", "day"]).unwrap();
//! assert!(lexicon.contains("lovely"));
//! assert_eq!(lexicon.max_word_len(), 6);
//! ```

use std::collections::HashSet;

use tracing::debug;

use crate::error::{Result, SegmentError};

/// Conjunto imutável de palavras conhecidas.
///
/// Os tamanhos são medidos em *code points* (`char`), não em bytes, para que
/// "ação" tenha tamanho 4 e não 6.
#[derive(Debug, Clone)]
pub struct Lexicon {
    words: HashSet<String>,
    max_word_len: usize,
}

impl Lexicon {
    /// Constrói o léxico. Duplicatas e strings vazias são ignoradas.
    ///
    /// Falha com [`SegmentError::EmptyLexicon`] se não sobrar nenhuma palavra.
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: HashSet<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|w| !w.is_empty())
            .collect();

        let max_word_len = words
            .iter()
            .map(|w| w.chars().count())
            .max()
            .ok_or(SegmentError::EmptyLexicon)?;

        debug!(words = words.len(), max_word_len, "léxico construído");
        Ok(Self { words, max_word_len })
    }

    /// Léxico formado pela união da lista principal com palavras extras
    /// (ex: termos recentes que faltam na lista de frequências).
    pub fn with_extra<I, J, S, T>(words: I, extra: J) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self::new(
            words
                .into_iter()
                .map(Into::into)
                .chain(extra.into_iter().map(Into::into)),
        )
    }

    /// A substring é exatamente uma palavra do léxico?
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    /// Tamanho (em caracteres) da maior palavra.
    pub fn max_word_len(&self) -> usize {
        self.max_word_len
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Sempre `false` para um léxico construído com sucesso.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Itera sobre as palavras (ordem arbitrária).
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// Atalho funcional para [`Lexicon::new`].
pub fn build_lexicon<I, S>(words: I) -> Result<Lexicon>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Lexicon::new(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexicon_basic() {
        let lexicon = Lexicon::new(["a", "ab", "abc", "ab"]).unwrap();
        assert_eq!(lexicon.len(), 3);
        assert_eq!(lexicon.max_word_len(), 3);
        assert!(lexicon.contains("ab"));
        assert!(!lexicon.contains("b"));
    }

    #[test]
    fn test_lexicon_empty_fails() {
        let empty: Vec<String> = vec![];
        assert_eq!(Lexicon::new(empty).unwrap_err(), SegmentError::EmptyLexicon);
        // Só strings vazias também não contam
        assert_eq!(Lexicon::new([""]).unwrap_err(), SegmentError::EmptyLexicon);
    }

    #[test]
    fn test_lexicon_len_in_chars() {
        let lexicon = build_lexicon(["ação", "ab"]).unwrap();
        assert_eq!(lexicon.max_word_len(), 4);
    }

    #[test]
    fn test_lexicon_with_extra() {
        let lexicon = Lexicon::with_extra(["love"], ["ipad", "iphone6s"]).unwrap();
        assert!(lexicon.contains("ipad"));
        assert!(lexicon.contains("love"));
        assert_eq!(lexicon.max_word_len(), 8);
    }
}
