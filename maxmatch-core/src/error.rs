//! # Erros do Segmentador
//!
//! A segmentação em si é uma função total: qualquer string de entrada produz
//! uma lista de tokens (no pior caso, um token por caractere). Só existem
//! duas falhas possíveis, ambas ligadas a entradas vazias.

use thiserror::Error;

/// Falhas do núcleo de segmentação.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    /// O léxico não tem nenhuma palavra, então `max_word_len` não existe.
    /// Fatal para a execução inteira.
    #[error("o léxico está vazio: é preciso pelo menos uma palavra")]
    EmptyLexicon,
    /// A sequência de referência está vazia e a WER (divisão por |referência|)
    /// não está definida. Reportado por linha; as demais linhas continuam.
    #[error("a referência está vazia: WER indefinida (divisão por zero)")]
    EmptyReference,
}

pub type Result<T> = std::result::Result<T, SegmentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert!(SegmentError::EmptyLexicon.to_string().contains("léxico"));
        assert!(SegmentError::EmptyReference.to_string().contains("referência"));
    }
}
