//! # Pós-processamento Corretivo
//!
//! O Maximum Matching é guloso e erra de formas previsíveis. Duas passadas
//! opcionais corrigem a saída bruta:
//!
//! - **Recheck de palavras curtas**: um token de 1–2 caracteres que não está na
//!   [`ShortWordAllowlist`] indica que o algoritmo "sobrou" pedaços. O trecho é
//!   re-segmentado com a estratégia oposta (uma vez a partir do fim, uma vez a
//!   partir do início).
//! - **Expansão por tabela de divisão**: tokens que são compostos acidentais do
//!   léxico (ver [`crate::tables`]) são trocados pelas suas partes.
//!
//! ## Exemplo
//!
//! ```rust
//! use maxmatch_core::lexicon::Lexicon;
//! use maxmatch_core::postprocess::post_process;
//! use maxmatch_core::tables::SplitTable;
//!
//! let lexicon = Lexicon::new(["x", "abcd", "y"]).unwrap();
//! let table: SplitTable = [("abcd", vec!["ab".to_string(), "cd".to_string()])].into_iter().collect();
//! let tokens = vec!["x".to_string(), "abcd".to_string(), "y".to_string()];
//!
//! let result = post_process(&lexicon, tokens, Some(&table), None);
//! assert_eq!(result, vec!["x", "ab", "cd", "y"]);
//! ```

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::matcher::{backward_max_match, forward_max_match, MatchStrategy};
use crate::tables::{ShortWordAllowlist, SplitTable};

/// Tamanho máximo (em caracteres) de um token considerado "curto".
pub const SHORT_TOKEN_MAX_LEN: usize = 2;

/// Registro de uma correção aplicada sobre a segmentação.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Correction {
    /// Um token curto suspeito disparou a re-segmentação de um trecho.
    ShortWord {
        /// Estratégia usada na re-segmentação (`backward` para o prefixo, `forward` para o sufixo).
        direction: MatchStrategy,
        /// Posição do token suspeito antes da correção.
        index: usize,
        suspect: String,
        /// Tokens removidos (o prefixo ou sufixo inteiro).
        replaced: Vec<String>,
        /// Tokens que entraram no lugar.
        replacement: Vec<String>,
    },
    /// Um composto acidental foi dividido pela tabela.
    Split {
        index: usize,
        word: String,
        parts: Vec<String>,
    },
}

fn is_suspect(token: &str, allowlist: &ShortWordAllowlist) -> bool {
    token.chars().count() <= SHORT_TOKEN_MAX_LEN && !allowlist.contains(token)
}

/// Recheck a partir do fim.
///
/// Encontra o suspeito mais próximo do fim; se ele não for o primeiro token,
/// re-segmenta com Backward Maximum Matching tudo até ele (inclusive).
/// Aplica no máximo uma correção; se a re-segmentação não muda nada, retorna `None`.
pub fn recheck_from_end(lexicon: &Lexicon, tokens: &mut Vec<String>, allowlist: &ShortWordAllowlist) -> Option<Correction> {
    let index = tokens.iter().rposition(|t| is_suspect(t, allowlist))?;
    if index == 0 {
        return None;
    }

    let replacement = backward_max_match(lexicon, &tokens[..=index].concat());
    if replacement[..] == tokens[..=index] {
        return None;
    }

    let suspect = tokens[index].clone();
    let replaced: Vec<String> = tokens.splice(..=index, replacement.iter().cloned()).collect();

    Some(Correction::ShortWord {
        direction: MatchStrategy::Backward,
        index,
        suspect,
        replaced,
        replacement,
    })
}

/// Recheck a partir do início.
///
/// Encontra o primeiro suspeito e re-segmenta com Forward Maximum Matching
/// tudo a partir dele. Aplica no máximo uma correção (`None` se nada muda).
pub fn recheck_from_start(lexicon: &Lexicon, tokens: &mut Vec<String>, allowlist: &ShortWordAllowlist) -> Option<Correction> {
    let index = tokens.iter().position(|t| is_suspect(t, allowlist))?;

    let replacement = forward_max_match(lexicon, &tokens[index..].concat());
    if replacement[..] == tokens[index..] {
        return None;
    }

    let suspect = tokens[index].clone();
    let replaced: Vec<String> = tokens.splice(index.., replacement.iter().cloned()).collect();

    Some(Correction::ShortWord {
        direction: MatchStrategy::Forward,
        index,
        suspect,
        replaced,
        replacement,
    })
}

/// Expande todos os tokens presentes na tabela de divisão.
///
/// Varre da esquerda para a direita; as partes inseridas não são
/// reexaminadas.
pub fn expand_splits(tokens: &mut Vec<String>, split_table: &SplitTable) -> Vec<Correction> {
    let mut corrections = Vec::new();
    expand_splits_with(tokens, split_table, |correction, _| corrections.push(correction.clone()));
    corrections
}

fn expand_splits_with<F>(tokens: &mut Vec<String>, split_table: &SplitTable, mut on_correction: F)
where
    F: FnMut(&Correction, &[String]),
{
    let mut i = 0;

    while i < tokens.len() {
        match split_table.get(&tokens[i]) {
            Some(parts) => {
                let parts = parts.to_vec();
                let width = parts.len();
                let word: String = tokens.splice(i..=i, parts.iter().cloned()).collect();
                on_correction(&Correction::Split { index: i, word, parts }, tokens);
                i += width;
            }
            None => i += 1,
        }
    }
}

/// Aplica as passadas habilitadas em sequência e devolve o que foi corrigido.
///
/// Uma tabela ou lista vazia conta como desabilitada.
pub fn apply_corrections(
    lexicon: &Lexicon,
    tokens: &mut Vec<String>,
    split_table: Option<&SplitTable>,
    allowlist: Option<&ShortWordAllowlist>,
) -> Vec<Correction> {
    let mut corrections = Vec::new();
    apply_corrections_with(lexicon, tokens, split_table, allowlist, |correction, _| {
        corrections.push(correction.clone())
    });
    corrections
}

/// Como [`apply_corrections`], chamando `on_correction` logo após cada
/// correção com a lista de tokens naquele momento.
///
/// O índice da correção sempre aponta para essa lista, não para a final.
pub fn apply_corrections_with<F>(
    lexicon: &Lexicon,
    tokens: &mut Vec<String>,
    split_table: Option<&SplitTable>,
    allowlist: Option<&ShortWordAllowlist>,
    mut on_correction: F,
) where
    F: FnMut(&Correction, &[String]),
{
    if let Some(allowlist) = allowlist.filter(|a| !a.is_empty()) {
        if let Some(correction) = recheck_from_end(lexicon, tokens, allowlist) {
            on_correction(&correction, tokens);
        }
        if let Some(correction) = recheck_from_start(lexicon, tokens, allowlist) {
            on_correction(&correction, tokens);
        }
    }

    if let Some(split_table) = split_table.filter(|t| !t.is_empty()) {
        expand_splits_with(tokens, split_table, &mut on_correction);
    }
}

/// Versão funcional de [`apply_corrections`]: consome e devolve os tokens.
pub fn post_process(
    lexicon: &Lexicon,
    mut tokens: Vec<String>,
    split_table: Option<&SplitTable>,
    allowlist: Option<&ShortWordAllowlist>,
) -> Vec<String> {
    apply_corrections(lexicon, &mut tokens, split_table, allowlist);
    tokens
}
