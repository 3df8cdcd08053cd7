//! # Avaliação — Distância de Edição e Word Error Rate (WER)
//!
//! Compara a segmentação produzida com uma segmentação de referência
//! (anotada à mão). A unidade aqui é o **token**, não o caractere:
//!
//! - Inserção custa 1, remoção custa 1.
//! - Substituição custa 0 se os tokens são iguais, 1 caso contrário.
//!
//! A WER é a distância normalizada pelo tamanho da referência:
//!
//! $$ WER = \frac{dist(produzido, referência)}{|referência|} $$
//!
//! Note que a WER pode passar de 1.0 quando a saída tem muito mais tokens
//! que a referência.
//!
//! ## Exemplo
//!
//! ```rust
//! use maxmatch_core::scorer::word_error_rate;
//!
//! let produced = ["new", "york", "er"];
//! let reference = ["new", "yorker"];
//! // "york" -> "yorker" (substituição) + remoção de "er" = 2 edições / 2 tokens
//! assert_eq!(word_error_rate(&produced, &reference).unwrap(), 1.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{Result, SegmentError};

/// Distância de edição mínima entre duas sequências de tokens.
///
/// Programação dinâmica clássica numa matriz `(|target|+1) × (|source|+1)`:
///
/// ```text
/// d[i][0] = i
/// d[0][j] = j
/// d[i][j] = min(d[i-1][j] + 1, d[i][j-1] + 1, d[i-1][j-1] + (target[i-1] != source[j-1]))
/// ```
pub fn edit_distance<T, S>(target: &[T], source: &[S]) -> usize
where
    T: AsRef<str>,
    S: AsRef<str>,
{
    let n = target.len();
    let m = source.len();
    let mut distance = vec![vec![0usize; m + 1]; n + 1];

    for (i, row) in distance.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=m {
        distance[0][j] = j;
    }

    for i in 1..=n {
        for j in 1..=m {
            let substitution = if target[i - 1].as_ref() == source[j - 1].as_ref() { 0 } else { 1 };
            distance[i][j] = (distance[i - 1][j] + 1)
                .min(distance[i][j - 1] + 1)
                .min(distance[i - 1][j - 1] + substitution);
        }
    }
    distance[n][m]
}

/// Word Error Rate de `target` em relação à referência `source`.
///
/// Falha com [`SegmentError::EmptyReference`] se a referência for vazia.
pub fn word_error_rate<T, S>(target: &[T], source: &[S]) -> Result<f64>
where
    T: AsRef<str>,
    S: AsRef<str>,
{
    if source.is_empty() {
        return Err(SegmentError::EmptyReference);
    }
    Ok(edit_distance(target, source) as f64 / source.len() as f64)
}

/// Acumulador da WER ao longo de um corpus (uma entrada por linha).
///
/// Linhas cuja WER não pôde ser calculada são contadas em `failures` e
/// não entram na média.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WerSummary {
    total: f64,
    count: usize,
    failures: usize,
}

impl WerSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registra o resultado de uma linha e devolve-o de volta para o chamador.
    pub fn record(&mut self, result: Result<f64>) -> Result<f64> {
        match &result {
            Ok(wer) => {
                self.total += wer;
                self.count += 1;
            }
            Err(_) => self.failures += 1,
        }
        result
    }

    /// Linhas pontuadas com sucesso.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn failures(&self) -> usize {
        self.failures
    }

    /// Média da WER; `None` se nenhuma linha foi pontuada.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_distance_is_zero() {
        let x = ["new", "york", "city"];
        assert_eq!(edit_distance(&x, &x), 0);
        let empty: [&str; 0] = [];
        assert_eq!(edit_distance(&empty, &empty), 0);
    }

    #[test]
    fn test_distance_against_empty() {
        let x = ["a", "b", "c"];
        let empty: [&str; 0] = [];
        assert_eq!(edit_distance(&x, &empty), 3);
        assert_eq!(edit_distance(&empty, &x), 3);
    }

    #[test]
    fn test_substitution_and_insertion() {
        assert_eq!(edit_distance(&["the", "cat"], &["the", "hat"]), 1);
        assert_eq!(edit_distance(&["throw", "back", "thursday"], &["throwback", "thursday"]), 2);
    }

    #[test]
    fn test_wer_normalizes_by_reference() {
        assert_eq!(word_error_rate(&["a", "b"], &["a"]).unwrap(), 1.0);
        assert_eq!(word_error_rate(&["a"], &["a", "b"]).unwrap(), 0.5);
        assert_eq!(word_error_rate(&["x", "y"], &["x", "y"]).unwrap(), 0.0);
    }

    #[test]
    fn test_wer_accepts_owned_tokens() {
        let produced: Vec<String> = vec!["love".into(), "you".into()];
        let reference: Vec<&str> = vec!["love", "you"];
        assert_eq!(word_error_rate(&produced, &reference).unwrap(), 0.0);
    }

    #[test]
    fn test_wer_empty_reference_fails() {
        let empty: [&str; 0] = [];
        assert_eq!(word_error_rate(&["a"], &empty), Err(SegmentError::EmptyReference));
        assert_eq!(word_error_rate(&empty, &empty), Err(SegmentError::EmptyReference));
    }

    #[test]
    fn test_wer_summary() {
        let mut summary = WerSummary::new();
        assert_eq!(summary.mean(), None);

        summary.record(word_error_rate(&["a", "b"], &["a"])).unwrap();
        summary.record(word_error_rate(&["a"], &["a"])).unwrap();
        let empty: [&str; 0] = [];
        assert!(summary.record(word_error_rate(&["a"], &empty)).is_err());

        assert_eq!(summary.count(), 2);
        assert_eq!(summary.failures(), 1);
        assert_eq!(summary.mean(), Some(0.5));
    }
}
