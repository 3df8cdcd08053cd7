//! # Maximum Matching — Segmentação Gulosa por Dicionário
//!
//! Divide um texto sem espaços (ex: a hashtag `#throwbackthursday`) em palavras,
//! escolhendo sempre a **maior** palavra do léxico que casa na posição atual.
//!
//! ## Estratégias Disponíveis
//!
//! - **Forward**: Varre da esquerda para a direita.
//! - **Backward**: Espelho do Forward, varre da direita para a esquerda.
//! - **FrontBack**: Varre pelas duas pontas ao mesmo tempo, resolvendo
//!   conflitos quando as duas frentes se encontram no meio.
//!
//! Todas as estratégias são funções totais: nunca falham. No pior caso
//! (nada do léxico aparece no texto) o resultado degrada para um token por
//! caractere (Forward/Backward) ou para o trecho restante inteiro (FrontBack).
//!
//! A concatenação dos tokens devolvidos é sempre **idêntica** ao texto de entrada.
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use maxmatch_core::lexicon::Lexicon;
//! use maxmatch_core::matcher::{segment, MatchStrategy};
//!
//! let lexicon = Lexicon::new(["a", "ab", "abc"]).unwrap();
//!
//! // Forward: "abc", "ab"
//! let tokens = segment(&lexicon, "abcab", MatchStrategy::Forward);
//! assert_eq!(tokens, vec!["abc", "ab"]);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;

/// Estratégias de Maximum Matching disponíveis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStrategy {
    /// **Frente**: a partir do início, pega a maior palavra possível e avança.
    #[default]
    Forward,
    /// **Trás**: a partir do fim, pega a maior palavra que termina no cursor e recua.
    /// Costuma acertar mais em inglês, onde sufixos curtos ("s", "ed") confundem o Forward.
    Backward,
    /// **Frente-Trás**: dois cursores que convergem para o meio. Quando as
    /// buscas se sobrepõem, a maior palavra vence e o lado perdedor para de buscar.
    FrontBack,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Forward => "forward",
            MatchStrategy::Backward => "backward",
            MatchStrategy::FrontBack => "front_back",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "forward" | "front" => Ok(MatchStrategy::Forward),
            "backward" | "back" => Ok(MatchStrategy::Backward),
            "front_back" | "frontback" => Ok(MatchStrategy::FrontBack),
            other => Err(format!("estratégia desconhecida: {other}")),
        }
    }
}

/// Segmenta o texto com a estratégia escolhida.
pub fn segment(lexicon: &Lexicon, text: &str, strategy: MatchStrategy) -> Vec<String> {
    match strategy {
        MatchStrategy::Forward => forward_max_match(lexicon, text),
        MatchStrategy::Backward => backward_max_match(lexicon, text),
        MatchStrategy::FrontBack => front_back_max_match(lexicon, text),
    }
}

/// Visão do texto indexada por caractere.
///
/// Os algoritmos trabalham com índices de *code point*; aqui guardamos o
/// offset em bytes de cada fronteira para fatiar a `&str` sem copiar.
struct CharSpans<'a> {
    text: &'a str,
    /// `bounds[i]` = offset em bytes do i-ésimo caractere; o último elemento é `text.len()`.
    bounds: Vec<usize>,
}

impl<'a> CharSpans<'a> {
    fn new(text: &'a str) -> Self {
        let bounds = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, bounds }
    }

    /// Número de caracteres.
    fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    /// Fatia `[start, end)` em índices de caractere.
    fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.bounds[start]..self.bounds[end]]
    }
}

/// Maior palavra do léxico que começa em `start` e termina no máximo em `end_max`.
/// Retorna o índice final da palavra.
fn longest_match_from(lexicon: &Lexicon, chars: &CharSpans, start: usize, end_max: usize) -> Option<usize> {
    ((start + 1)..=end_max)
        .rev()
        .find(|&end| lexicon.contains(chars.slice(start, end)))
}

/// Maior palavra do léxico que termina em `end` e começa no mínimo em `start_min`.
/// Retorna o índice inicial da palavra.
fn longest_match_until(lexicon: &Lexicon, chars: &CharSpans, start_min: usize, end: usize) -> Option<usize> {
    (start_min..end).find(|&start| lexicon.contains(chars.slice(start, end)))
}

/// Maximum Matching da esquerda para a direita.
///
/// Em cada posição tenta a maior substring (limitada por `max_word_len` e pelo
/// fim do texto) que pertence ao léxico. Sem nenhum casamento, emite o
/// caractere atual sozinho e avança um.
pub fn forward_max_match(lexicon: &Lexicon, text: &str) -> Vec<String> {
    let chars = CharSpans::new(text);
    let n = chars.len();
    let max_len = lexicon.max_word_len();
    let mut tokens = Vec::new();
    let mut left = 0;

    while left < n {
        let right = longest_match_from(lexicon, &chars, left, (left + max_len).min(n))
            .unwrap_or(left + 1);
        tokens.push(chars.slice(left, right).to_string());
        left = right;
    }
    tokens
}

/// Maximum Matching da direita para a esquerda.
///
/// Os tokens são coletados do fim para o início e invertidos no final, então
/// a saída sai na ordem natural do texto.
pub fn backward_max_match(lexicon: &Lexicon, text: &str) -> Vec<String> {
    let chars = CharSpans::new(text);
    let max_len = lexicon.max_word_len();
    let mut tokens = Vec::new();
    let mut right = chars.len();

    while right > 0 {
        let left = longest_match_until(lexicon, &chars, right.saturating_sub(max_len), right)
            .unwrap_or(right - 1);
        tokens.push(chars.slice(left, right).to_string());
        right = left;
    }
    tokens.reverse();
    tokens
}

/// Quais lados do Frente-Trás ainda estão buscando.
///
/// Depois que um lado para, ele nunca volta a buscar naquela chamada; o
/// outro lado segue sozinho até o fim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sides {
    Both,
    FrontStopped,
    BackStopped,
}

impl Sides {
    fn front_active(self) -> bool {
        self != Sides::FrontStopped
    }

    fn back_active(self) -> bool {
        self != Sides::BackStopped
    }
}

/// Maximum Matching simultâneo pelas duas pontas.
///
/// Dois cursores, `front` e `back`, convergem para o meio. A cada iteração:
///
/// 1. Se o trecho restante `[front, back)` inteiro é uma palavra, ele fecha a segmentação.
/// 2. Busca a maior palavra que começa em `front` e a maior que termina em `back`.
///    Um lado ativo busca até a ponta oposta do texto (não só até o outro cursor),
///    por isso as duas palavras podem se sobrepor.
/// 3. Resolve:
///    - duas palavras sem sobreposição: aceita ambas;
///    - sobreposição: a maior vence (empate favorece a frente), o perdedor para
///      de buscar e devolve ao meio os tokens que a vencedora invadiu;
///    - só uma encontrada: aceita e para o outro lado;
///    - nenhuma: o trecho restante inteiro vira um token literal.
///
/// Cada lado mantém uma pilha de spans confirmados; o resultado é a pilha da
/// frente seguida da pilha de trás invertida.
pub fn front_back_max_match(lexicon: &Lexicon, text: &str) -> Vec<String> {
    let chars = CharSpans::new(text);
    let n = chars.len();
    let max_len = lexicon.max_word_len();

    let mut front_spans: Vec<(usize, usize)> = Vec::new();
    let mut back_spans: Vec<(usize, usize)> = Vec::new();
    let mut front = 0;
    let mut back = n;
    let mut sides = Sides::Both;

    while front < back {
        if lexicon.contains(chars.slice(front, back)) {
            front_spans.push((front, back));
            break;
        }

        let front_match = if sides.front_active() {
            let limit = if sides.back_active() { n } else { back };
            longest_match_from(lexicon, &chars, front, (front + max_len).min(limit))
        } else {
            None
        };
        let back_match = if sides.back_active() {
            let limit = if sides.front_active() { 0 } else { front };
            longest_match_until(lexicon, &chars, back.saturating_sub(max_len).max(limit), back)
        } else {
            None
        };

        match (front_match, back_match) {
            (Some(front_end), Some(back_start)) if front_end <= back_start => {
                front_spans.push((front, front_end));
                back_spans.push((back_start, back));
                front = front_end;
                back = back_start;
            }
            (Some(front_end), Some(back_start)) => {
                if front_end - front >= back - back_start {
                    sides = Sides::BackStopped;
                    front_spans.push((front, front_end));
                    front = front_end;
                    back = reclaim_back(&mut back_spans, back, front_end);
                } else {
                    sides = Sides::FrontStopped;
                    back_spans.push((back_start, back));
                    back = back_start;
                    front = reclaim_front(&mut front_spans, front, back_start);
                }
            }
            (Some(front_end), None) => {
                sides = Sides::BackStopped;
                front_spans.push((front, front_end));
                front = front_end;
                back = reclaim_back(&mut back_spans, back, front_end);
            }
            (None, Some(back_start)) => {
                sides = Sides::FrontStopped;
                back_spans.push((back_start, back));
                back = back_start;
                front = reclaim_front(&mut front_spans, front, back_start);
            }
            (None, None) => {
                front_spans.push((front, back));
                front = back;
            }
        }
    }

    front_spans
        .into_iter()
        .chain(back_spans.into_iter().rev())
        .map(|(start, end)| chars.slice(start, end).to_string())
        .collect()
}

/// Desempilha tokens de trás enquanto `claimed_end` invade a região deles.
/// Retorna o novo cursor de trás.
fn reclaim_back(back_spans: &mut Vec<(usize, usize)>, mut back: usize, claimed_end: usize) -> usize {
    while claimed_end > back {
        match back_spans.pop() {
            Some((_, end)) => back = end,
            None => break,
        }
    }
    back
}

/// Espelho de [`reclaim_back`] para a pilha da frente.
fn reclaim_front(front_spans: &mut Vec<(usize, usize)>, mut front: usize, claimed_start: usize) -> usize {
    while claimed_start < front {
        match front_spans.pop() {
            Some((start, _)) => front = start,
            None => break,
        }
    }
    front
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lex(words: &[&str]) -> Lexicon {
        Lexicon::new(words.iter().copied()).unwrap()
    }

    #[test]
    fn test_forward_longest_match() {
        let lexicon = lex(&["a", "ab", "abc"]);
        assert_eq!(forward_max_match(&lexicon, "abcab"), vec!["abc", "ab"]);
    }

    #[test]
    fn test_backward_longest_match() {
        // Da direita: "cab" não existe, "ab" sim; depois "abc" inteiro.
        let lexicon = lex(&["a", "ab", "abc"]);
        assert_eq!(backward_max_match(&lexicon, "abcab"), vec!["abc", "ab"]);
    }

    #[test]
    fn test_forward_vs_backward_differ() {
        let lexicon = lex(&["the", "theme", "me", "men", "ending"]);
        // Forward pega "theme" e sobra "nding" em caracteres soltos
        assert_eq!(
            forward_max_match(&lexicon, "themending"),
            vec!["theme", "n", "d", "i", "n", "g"]
        );
        assert_eq!(backward_max_match(&lexicon, "themending"), vec!["the", "m", "ending"]);
    }

    #[test]
    fn test_fallback_single_chars() {
        let lexicon = lex(&["zzz"]);
        assert_eq!(forward_max_match(&lexicon, "abc"), vec!["a", "b", "c"]);
        assert_eq!(backward_max_match(&lexicon, "abc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_front_back_no_match_is_literal() {
        let lexicon = lex(&["zzz"]);
        assert_eq!(front_back_max_match(&lexicon, "abc"), vec!["abc"]);
    }

    #[test]
    fn test_front_back_whole_span() {
        let lexicon = lex(&["ab", "cd"]);
        assert_eq!(front_back_max_match(&lexicon, "cd"), vec!["cd"]);
    }

    #[test]
    fn test_front_back_meet_in_middle() {
        let lexicon = lex(&["a", "e", "bcde"]);
        assert_eq!(front_back_max_match(&lexicon, "abcde"), vec!["a", "bcde"]);
    }

    #[test]
    fn test_front_back_tie_favors_front() {
        // Rodada 2: "bcd" (frente) e "cde" (trás) empatam em tamanho; a frente vence
        let lexicon = lex(&["a", "f", "bcd", "cde"]);
        assert_eq!(front_back_max_match(&lexicon, "abcdef"), vec!["a", "bcd", "e", "f"]);
    }

    #[test]
    fn test_front_back_longer_back_wins() {
        let lexicon = lex(&["a", "f", "bc", "cde"]);
        assert_eq!(front_back_max_match(&lexicon, "abcdef"), vec!["a", "b", "cde", "f"]);
    }

    #[test]
    fn test_front_back_winner_reclaims_front_tokens() {
        // "bcdef" (trás) invade o token "ab" já confirmado pela frente
        let lexicon = lex(&["ab", "g", "bcdef", "cd"]);
        assert_eq!(front_back_max_match(&lexicon, "abcdefg"), vec!["a", "bcdef", "g"]);
    }

    #[test]
    fn test_front_back_single_side_reclaims_back_tokens() {
        // Só a frente encontra "bcde", que invade o token "ef" da pilha de trás
        let lexicon = lex(&["a", "ef", "bcde"]);
        assert_eq!(front_back_max_match(&lexicon, "abcdef"), vec!["a", "bcde", "f"]);
    }

    #[test]
    fn test_unicode_code_points() {
        let lexicon = lex(&["ação", "é"]);
        assert_eq!(forward_max_match(&lexicon, "açãoé"), vec!["ação", "é"]);
        assert_eq!(backward_max_match(&lexicon, "açãoé"), vec!["ação", "é"]);
        assert_eq!(front_back_max_match(&lexicon, "açãoé"), vec!["ação", "é"]);
    }

    #[test]
    fn test_empty_input() {
        let lexicon = lex(&["a"]);
        for strategy in [MatchStrategy::Forward, MatchStrategy::Backward, MatchStrategy::FrontBack] {
            assert!(segment(&lexicon, "", strategy).is_empty());
        }
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("back".parse::<MatchStrategy>().unwrap(), MatchStrategy::Backward);
        assert_eq!("front_back".parse::<MatchStrategy>().unwrap(), MatchStrategy::FrontBack);
        assert!("sideways".parse::<MatchStrategy>().is_err());
        assert_eq!(MatchStrategy::FrontBack.to_string(), "front_back");
        assert_eq!(MatchStrategy::default(), MatchStrategy::Forward);
    }

    proptest! {
        #[test]
        fn segmentation_reconstructs_input(
            words in prop::collection::vec("[a-e]{1,4}", 1..12),
            text in "[a-eé]{0,24}",
        ) {
            let lexicon = Lexicon::new(words).unwrap();
            for strategy in [MatchStrategy::Forward, MatchStrategy::Backward, MatchStrategy::FrontBack] {
                let tokens = segment(&lexicon, &text, strategy);
                prop_assert_eq!(tokens.concat(), text.clone(), "{}", strategy);
                prop_assert!(tokens.iter().all(|t| !t.is_empty()));
            }
        }

        #[test]
        fn fallback_yields_one_token_per_char(text in "[a-e]{0,16}") {
            let lexicon = Lexicon::new(["xyz"]).unwrap();
            let n = text.chars().count();
            prop_assert_eq!(forward_max_match(&lexicon, &text).len(), n);
            prop_assert_eq!(backward_max_match(&lexicon, &text).len(), n);
        }
    }
}
